use codemap::Span;
use indexmap::IndexMap;

use crate::{ast::Node, interner::InternedString};

/// One lexical scope: name → bound value. Insertion order is kept so
/// traces and warnings come out deterministic.
#[derive(Debug, Clone, Default)]
pub(crate) struct Scope {
    bindings: IndexMap<InternedString, Node>,
}

impl Scope {
    pub fn new() -> Self {
        Scope {
            bindings: IndexMap::new(),
        }
    }

    pub fn insert(&mut self, name: InternedString, node: Node) -> Option<Node> {
        self.bindings.insert(name, node)
    }

    pub fn lookup(&self, name: InternedString) -> Option<&Node> {
        self.bindings.get(&name)
    }

    pub fn contains(&self, name: InternedString) -> bool {
        self.bindings.contains_key(&name)
    }
}

/// A scope plus what owns it. Function frames keep the callee name and
/// call site for stack traces.
#[derive(Debug, Clone)]
pub(crate) struct Frame {
    pub scope: Scope,
    pub kind: &'static str,
    pub context: Option<(InternedString, Span)>,
}

impl Frame {
    pub fn new(kind: &'static str) -> Self {
        Frame {
            scope: Scope::new(),
            kind,
            context: None,
        }
    }

    pub fn with_context(kind: &'static str, name: InternedString, span: Span) -> Self {
        Frame {
            scope: Scope::new(),
            kind,
            context: Some((name, span)),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Stack {
    frames: Vec<Frame>,
}

impl Stack {
    pub fn new() -> Self {
        Stack {
            frames: vec![Frame::new("root")],
        }
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) {
        debug_assert!(self.frames.len() > 1);
        self.frames.pop();
    }

    /// Innermost frame, never absent.
    pub fn current_mut(&mut self) -> &mut Frame {
        // unwrap is fine, the global frame is never popped
        self.frames.last_mut().unwrap()
    }

    pub fn current(&self) -> &Frame {
        // unwrap is fine, the global frame is never popped
        self.frames.last().unwrap()
    }

    /// Bind in the innermost scope, shadowing outer frames.
    pub fn define(&mut self, name: InternedString, node: Node) {
        self.current_mut().scope.insert(name, node);
    }

    /// Innermost-first search across all frames.
    pub fn lookup(&self, name: InternedString) -> Option<&Node> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.scope.lookup(name))
    }

    pub fn is_defined(&self, name: InternedString) -> bool {
        self.frames.iter().any(|frame| frame.scope.contains(name))
    }

}
