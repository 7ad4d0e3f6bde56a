//! Binary operator semantics over reduced nodes.
//!
//! `==` and `!=` never fail: values of incompatible types simply compare
//! unequal. Every other operator raises a type error when its operands
//! cannot be coerced together.

use codemap::Span;

use crate::{
    ast::{Boolean, Expression, Ident, Node, Rgba, Str, Unit},
    common::BinaryOp,
    error::{Error, ErrorKind, StyleResult},
    interner::InternedString,
};

pub(crate) fn operate(op: BinaryOp, lhs: &Node, rhs: &Node, span: Span) -> StyleResult<Node> {
    match op {
        BinaryOp::And => Ok(boolean(lhs.to_boolean() && rhs.to_boolean(), span)),
        BinaryOp::Or => Ok(boolean(lhs.to_boolean() || rhs.to_boolean(), span)),
        BinaryOp::Equal => Ok(boolean(nodes_equal(lhs, rhs), span)),
        BinaryOp::NotEqual => Ok(boolean(!nodes_equal(lhs, rhs), span)),
        BinaryOp::IsA => {
            let name = match string_value(rhs) {
                Some(name) => name,
                None => {
                    return Err(Error::raw(
                        ErrorKind::Type,
                        "right-hand side of \"is a\" must be a string",
                        span,
                    ));
                }
            };
            Ok(boolean(lhs.node_name() == name, span))
        }
        BinaryOp::In => {
            let found = match rhs {
                Node::Expression(e) => e.nodes.iter().any(|n| nodes_equal(lhs, n)),
                other => nodes_equal(lhs, other),
            };
            Ok(boolean(found, span))
        }
        BinaryOp::Range | BinaryOp::RangeExclusive => range(op, lhs, rhs, span),
        BinaryOp::Subscript => {
            let index = match rhs.first() {
                Node::Unit(u) => u.val,
                other => {
                    return Err(Error::raw(
                        ErrorKind::Type,
                        format!("cannot index with a {}", other.node_name()),
                        span,
                    ));
                }
            };
            let items: Vec<&Node> = match lhs {
                Node::Expression(e) => e.nodes.iter().collect(),
                other => vec![other],
            };
            if index < 0.0 || index >= items.len() as f64 {
                return Ok(Node::Null(crate::ast::Null { span }));
            }
            Ok(items[index as usize].clone())
        }
        BinaryOp::LessThan
        | BinaryOp::LessThanEqual
        | BinaryOp::GreaterThan
        | BinaryOp::GreaterThanEqual => compare(op, lhs, rhs, span),
        BinaryOp::Plus | BinaryOp::Minus | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem
        | BinaryOp::Pow => arithmetic(op, lhs, rhs, span),
    }
}

pub(crate) fn nodes_equal(a: &Node, b: &Node) -> bool {
    match (a, b) {
        (Node::Unit(x), Node::Unit(y)) => {
            x.val == y.val && (x.suffix == y.suffix || x.suffix.is_none() || y.suffix.is_none())
        }
        (Node::Color(x), Node::Color(y)) => x.val == y.val,
        (Node::Boolean(x), Node::Boolean(y)) => x.val == y.val,
        (Node::Null(..), Node::Null(..)) => true,
        (Node::Expression(x), Node::Expression(y)) => {
            x.nodes.len() == y.nodes.len()
                && x.nodes
                    .iter()
                    .zip(y.nodes.iter())
                    .all(|(m, n)| nodes_equal(m, n))
        }
        _ => match (string_value(a), string_value(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        },
    }
}

/// The textual value of string-like nodes, quotes excluded.
fn string_value(node: &Node) -> Option<String> {
    match node {
        Node::Str(s) => Some(s.val.clone()),
        Node::Ident(i) => Some(i.name.resolve()),
        Node::Literal(l) => Some(l.text.clone()),
        _ => None,
    }
}

fn boolean(val: bool, span: Span) -> Node {
    Node::Boolean(Boolean { val, span })
}

fn compare(op: BinaryOp, lhs: &Node, rhs: &Node, span: Span) -> StyleResult<Node> {
    let ord = match (lhs, rhs) {
        (Node::Unit(a), Node::Unit(b)) => a.val.partial_cmp(&b.val),
        _ => match (string_value(lhs), string_value(rhs)) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => {
                return Err(coerce_error(lhs, rhs, span));
            }
        },
    };
    let ord = match ord {
        Some(ord) => ord,
        None => return Ok(boolean(false, span)),
    };
    let val = match op {
        BinaryOp::LessThan => ord.is_lt(),
        BinaryOp::LessThanEqual => ord.is_le(),
        BinaryOp::GreaterThan => ord.is_gt(),
        BinaryOp::GreaterThanEqual => ord.is_ge(),
        _ => unreachable!("compare only receives relational operators"),
    };
    Ok(boolean(val, span))
}

fn range(op: BinaryOp, lhs: &Node, rhs: &Node, span: Span) -> StyleResult<Node> {
    let (from, to, suffix) = match (lhs, rhs) {
        (Node::Unit(a), Node::Unit(b)) => (a.val, b.val, a.suffix.or(b.suffix)),
        _ => return Err(coerce_error(lhs, rhs, span)),
    };

    let mut nodes = Vec::new();
    let step = if from <= to { 1.0 } else { -1.0 };
    let mut val = from;
    loop {
        let past_end = if step > 0.0 { val > to } else { val < to };
        if past_end {
            break;
        }
        if op == BinaryOp::RangeExclusive && (val - to).abs() < f64::EPSILON {
            break;
        }
        nodes.push(Node::Unit(Unit { val, suffix, span }));
        val += step;
    }

    Ok(Node::Expression(Expression {
        nodes,
        is_list: false,
        parens: false,
        span,
    }))
}

fn arithmetic(op: BinaryOp, lhs: &Node, rhs: &Node, span: Span) -> StyleResult<Node> {
    match (lhs, rhs) {
        (Node::Unit(a), Node::Unit(b)) => {
            let val = apply(op, a.val, b.val);
            Ok(Node::Unit(Unit {
                val,
                suffix: a.suffix.or(b.suffix),
                span,
            }))
        }
        (Node::Color(a), Node::Color(b)) => {
            let val = a.val.zip(b.val, |x, y| apply(op, x, y));
            Ok(Node::Color(Rgba { val, span }))
        }
        (Node::Color(a), Node::Unit(b)) => {
            let val = a.val.map(|x| apply(op, x, b.val));
            Ok(Node::Color(Rgba { val, span }))
        }
        (Node::Unit(a), Node::Color(b)) => {
            let val = b.val.map(|y| apply(op, a.val, y));
            Ok(Node::Color(Rgba { val, span }))
        }
        (Node::Str(a), rhs) if op == BinaryOp::Plus => {
            let mut val = a.val.clone();
            val.push_str(&rhs.to_css(false));
            Ok(Node::Str(Str {
                val,
                quote: a.quote,
                span,
            }))
        }
        (lhs, Node::Str(b)) if op == BinaryOp::Plus => {
            let mut val = lhs.to_css(false);
            val.push_str(&b.val);
            Ok(Node::Str(Str {
                val,
                quote: b.quote,
                span,
            }))
        }
        (Node::Ident(a), rhs) if op == BinaryOp::Plus && string_value(rhs).is_some() => {
            let name = format!("{}{}", a.name, rhs.to_css(false));
            Ok(Node::Ident(Ident {
                name: InternedString::get_or_intern(name),
                val: None,
                span,
            }))
        }
        // idents surviving to arithmetic never resolved to a value
        (Node::Ident(i), ..) | (.., Node::Ident(i)) => Err(Error::raw(
            ErrorKind::Name,
            format!("undefined variable {}", i.name),
            span,
        )),
        _ => Err(coerce_error(lhs, rhs, span)),
    }
}

fn apply(op: BinaryOp, a: f64, b: f64) -> f64 {
    match op {
        BinaryOp::Plus => a + b,
        BinaryOp::Minus => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        BinaryOp::Rem => a % b,
        BinaryOp::Pow => a.powf(b),
        _ => unreachable!("arithmetic only receives arithmetic operators"),
    }
}

fn coerce_error(lhs: &Node, rhs: &Node, span: Span) -> Box<Error> {
    Error::raw(
        ErrorKind::Type,
        format!(
            "cannot coerce {} to {}",
            rhs.node_name(),
            lhs.node_name()
        ),
        span,
    )
}
