use std::collections::BTreeMap;

use crate::ast::{Boolean, Node, Str, Unit};
use crate::common::QuoteKind;
use crate::error::{Error, ErrorKind, StyleResult};
use crate::evaluate::Visitor;
use crate::interner::InternedString;

use super::{Builtin, CallArgs};

pub(crate) fn register(m: &mut BTreeMap<String, Builtin>) {
    m.insert("abs".to_owned(), Builtin::new(abs));
    m.insert("ceil".to_owned(), Builtin::new(ceil));
    m.insert("floor".to_owned(), Builtin::new(floor));
    m.insert("round".to_owned(), Builtin::new(round));
    m.insert("min".to_owned(), Builtin::new(min));
    m.insert("max".to_owned(), Builtin::new(max));
    m.insert("even".to_owned(), Builtin::new(even));
    m.insert("odd".to_owned(), Builtin::new(odd));
    m.insert("unit".to_owned(), Builtin::new(unit));
}

fn abs(args: &mut CallArgs, _: &mut Visitor<'_, '_>) -> StyleResult<Node> {
    map_unit(args, f64::abs)
}

fn ceil(args: &mut CallArgs, _: &mut Visitor<'_, '_>) -> StyleResult<Node> {
    map_unit(args, f64::ceil)
}

fn floor(args: &mut CallArgs, _: &mut Visitor<'_, '_>) -> StyleResult<Node> {
    map_unit(args, f64::floor)
}

fn round(args: &mut CallArgs, _: &mut Visitor<'_, '_>) -> StyleResult<Node> {
    map_unit(args, f64::round)
}

fn min(args: &mut CallArgs, _: &mut Visitor<'_, '_>) -> StyleResult<Node> {
    args.max_args(2)?;
    let (a, suffix) = args.unit(0, "a")?;
    let (b, _) = args.unit(1, "b")?;
    Ok(Node::Unit(Unit {
        val: a.min(b),
        suffix,
        span: args.span,
    }))
}

fn max(args: &mut CallArgs, _: &mut Visitor<'_, '_>) -> StyleResult<Node> {
    args.max_args(2)?;
    let (a, suffix) = args.unit(0, "a")?;
    let (b, _) = args.unit(1, "b")?;
    Ok(Node::Unit(Unit {
        val: a.max(b),
        suffix,
        span: args.span,
    }))
}

fn even(args: &mut CallArgs, _: &mut Visitor<'_, '_>) -> StyleResult<Node> {
    args.max_args(1)?;
    let n = args.number(0, "n")?;
    Ok(Node::Boolean(Boolean {
        val: n % 2.0 == 0.0,
        span: args.span,
    }))
}

fn odd(args: &mut CallArgs, _: &mut Visitor<'_, '_>) -> StyleResult<Node> {
    args.max_args(1)?;
    let n = args.number(0, "n")?;
    Ok(Node::Boolean(Boolean {
        val: n % 2.0 != 0.0,
        span: args.span,
    }))
}

/// `unit(n)` reads the suffix; `unit(n, "px")` replaces it.
fn unit(args: &mut CallArgs, _: &mut Visitor<'_, '_>) -> StyleResult<Node> {
    args.max_args(2)?;
    let (val, suffix) = args.unit(0, "n")?;

    match args.get(1) {
        None => Ok(Node::Str(Str {
            val: suffix.map(|s| s.resolve()).unwrap_or_default(),
            quote: QuoteKind::Single,
            span: args.span,
        })),
        Some(Node::Str(s)) => Ok(Node::Unit(Unit {
            val,
            suffix: if s.val.is_empty() {
                None
            } else {
                Some(InternedString::get_or_intern(&s.val))
            },
            span: args.span,
        })),
        Some(Node::Ident(i)) => Ok(Node::Unit(Unit {
            val,
            suffix: Some(i.name),
            span: args.span,
        })),
        Some(other) => Err(Error::raw(
            ErrorKind::Type,
            format!("unit() expects a string suffix, got {}", other.node_name()),
            args.span,
        )),
    }
}

fn map_unit(args: &mut CallArgs, f: impl Fn(f64) -> f64) -> StyleResult<Node> {
    args.max_args(1)?;
    let (val, suffix) = args.unit(0, "n")?;
    Ok(Node::Unit(Unit {
        val: f(val),
        suffix,
        span: args.span,
    }))
}
