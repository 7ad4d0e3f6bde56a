//! Values exchanged with host-provided functions.

use codemap::Span;

use crate::ast::{Boolean, Expression, Node, Null, Rgba, Str, Unit};
use crate::color::Color;
use crate::common::QuoteKind;
use crate::interner::InternedString;

/// A reduced stylesheet value, as seen by host functions registered
/// through [`Options::function`](crate::Options::function).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    /// A number with an optional unit suffix such as `px` or `%`
    Unit(f64, Option<String>),
    /// Red, green and blue channels 0-255 plus alpha 0-1
    Color(u8, u8, u8, f64),
    Bool(bool),
    Null,
    List(Vec<Value>),
}

/// A native callable exposed to the stylesheet under a function name.
/// Returning `Err` fails the compile with the message attached to the
/// call site.
pub type HostFunction = Box<dyn Fn(&[Value]) -> Result<Value, String> + Send + Sync>;

impl Value {
    pub(crate) fn from_node(node: &Node) -> Value {
        match node {
            Node::Str(s) => Value::Str(s.val.clone()),
            Node::Unit(u) => Value::Unit(u.val, u.suffix.map(|s| s.resolve())),
            Node::Color(c) => Value::Color(
                c.val.red.max(0.0).min(255.0).round() as u8,
                c.val.green.max(0.0).min(255.0).round() as u8,
                c.val.blue.max(0.0).min(255.0).round() as u8,
                c.val.alpha.max(0.0).min(1.0),
            ),
            Node::Boolean(b) => Value::Bool(b.val),
            Node::Null(..) => Value::Null,
            Node::Expression(e) => Value::List(e.nodes.iter().map(Value::from_node).collect()),
            other => Value::Str(other.to_css(false)),
        }
    }

    pub(crate) fn into_node(self, span: Span) -> Node {
        match self {
            Value::Str(val) => Node::Str(Str {
                val,
                quote: QuoteKind::Single,
                span,
            }),
            Value::Unit(val, suffix) => Node::Unit(Unit {
                val,
                suffix: suffix.map(InternedString::get_or_intern),
                span,
            }),
            Value::Color(r, g, b, a) => Node::Color(Rgba {
                val: Color::new(f64::from(r), f64::from(g), f64::from(b), a),
                span,
            }),
            Value::Bool(val) => Node::Boolean(Boolean { val, span }),
            Value::Null => Node::Null(Null { span }),
            Value::List(items) => Node::Expression(Expression {
                nodes: items.into_iter().map(|v| v.into_node(span)).collect(),
                is_list: true,
                parens: false,
                span,
            }),
        }
    }
}
