use codemap::Span;

use super::Node;

/// A name built from literal text and `{expr}` segments, used for
/// property names, selectors, and keyframes names.
#[derive(Debug, Clone)]
pub(crate) struct Interpolation {
    pub segments: Vec<Segment>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub(crate) enum Segment {
    Text(String),
    Expr(Node),
}

impl Interpolation {
    pub fn new(span: Span) -> Self {
        Interpolation {
            segments: Vec::new(),
            span,
        }
    }

    pub fn of_text(text: impl Into<String>, span: Span) -> Self {
        Interpolation {
            segments: vec![Segment::Text(text.into())],
            span,
        }
    }

    pub fn add_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Segment::Text(prev)) = self.segments.last_mut() {
            prev.push_str(text);
            return;
        }
        self.segments.push(Segment::Text(text.to_owned()));
    }

    pub fn add_expr(&mut self, expr: Node) {
        self.segments.push(Segment::Expr(expr));
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
