use lazy_static::lazy_static;
use std::collections::BTreeMap;

use codemap::Span;

use crate::ast::Node;
use crate::color::Color;
use crate::error::{Error, ErrorKind, StyleResult};
use crate::evaluate::Visitor;

mod color;
mod math;
mod meta;

/// Arguments handed to a built-in: already evaluated, and reduced to
/// their first primary unless the built-in is registered `raw`.
pub(crate) struct CallArgs {
    pub args: Vec<Node>,
    pub name: String,
    pub span: Span,
}

impl CallArgs {
    pub fn get(&self, i: usize) -> Option<&Node> {
        self.args.get(i).filter(|n| !n.is_null())
    }

    pub fn max_args(&self, n: usize) -> StyleResult<()> {
        if self.args.len() > n {
            return Err(Error::raw(
                ErrorKind::Type,
                format!(
                    "{}() takes at most {} arguments, got {}",
                    self.name,
                    n,
                    self.args.len()
                ),
                self.span,
            ));
        }
        Ok(())
    }

    pub fn node(&self, i: usize, name: &str) -> StyleResult<&Node> {
        self.get(i).ok_or_else(|| {
            Error::raw(
                ErrorKind::MissingArgument,
                format!("argument \"{}\" required for {}()", name, self.name),
                self.span,
            )
        })
    }

    pub fn number(&self, i: usize, name: &str) -> StyleResult<f64> {
        match self.node(i, name)? {
            Node::Unit(u) => Ok(u.val),
            other => Err(self.type_error(name, "a number", other)),
        }
    }

    pub fn unit(&self, i: usize, name: &str) -> StyleResult<(f64, Option<crate::interner::InternedString>)> {
        match self.node(i, name)? {
            Node::Unit(u) => Ok((u.val, u.suffix)),
            other => Err(self.type_error(name, "a number", other)),
        }
    }

    pub fn color(&self, i: usize, name: &str) -> StyleResult<Color> {
        match self.node(i, name)? {
            Node::Color(c) => Ok(c.val),
            other => Err(self.type_error(name, "a color", other)),
        }
    }

    fn type_error(&self, name: &str, wanted: &str, got: &Node) -> Box<Error> {
        Error::raw(
            ErrorKind::Type,
            format!(
                "{}() expects {} for \"{}\", got {}",
                self.name,
                wanted,
                name,
                got.node_name()
            ),
            self.span,
        )
    }
}

pub(crate) struct Builtin {
    pub func: fn(&mut CallArgs, &mut Visitor<'_, '_>) -> StyleResult<Node>,
    pub raw: bool,
}

impl Builtin {
    fn new(func: fn(&mut CallArgs, &mut Visitor<'_, '_>) -> StyleResult<Node>) -> Self {
        Builtin { func, raw: false }
    }

    /// Receive full expression arguments instead of first primaries.
    fn raw(func: fn(&mut CallArgs, &mut Visitor<'_, '_>) -> StyleResult<Node>) -> Self {
        Builtin { func, raw: true }
    }
}

lazy_static! {
    pub(crate) static ref GLOBAL_FUNCTIONS: BTreeMap<String, Builtin> = {
        let mut m = BTreeMap::new();
        color::register(&mut m);
        math::register(&mut m);
        meta::register(&mut m);
        m
    };
}
