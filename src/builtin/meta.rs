use std::collections::BTreeMap;

use crate::ast::{Node, Null, Str, Unit};
use crate::common::QuoteKind;
use crate::error::{Error, ErrorKind, StyleResult};
use crate::evaluate::Visitor;

use super::{Builtin, CallArgs};

pub(crate) fn register(m: &mut BTreeMap<String, Builtin>) {
    m.insert("type-of".to_owned(), Builtin::new(type_of));
    m.insert("typeof".to_owned(), Builtin::new(type_of));
    m.insert("length".to_owned(), Builtin::raw(length));
    m.insert("last".to_owned(), Builtin::raw(last));
    m.insert("error".to_owned(), Builtin::new(error));
}

fn type_of(args: &mut CallArgs, _: &mut Visitor<'_, '_>) -> StyleResult<Node> {
    args.max_args(1)?;
    let node = args.node(0, "node")?;
    Ok(Node::Str(Str {
        val: node.node_name().to_owned(),
        quote: QuoteKind::Single,
        span: args.span,
    }))
}

fn length(args: &mut CallArgs, _: &mut Visitor<'_, '_>) -> StyleResult<Node> {
    args.max_args(1)?;
    let count = match args.args.first() {
        Some(Node::Expression(e)) => e.nodes.len(),
        Some(Node::Null(..)) | None => 0,
        Some(..) => 1,
    };
    Ok(Node::Unit(Unit {
        val: count as f64,
        suffix: None,
        span: args.span,
    }))
}

fn last(args: &mut CallArgs, _: &mut Visitor<'_, '_>) -> StyleResult<Node> {
    args.max_args(1)?;
    Ok(match args.args.first() {
        Some(Node::Expression(e)) => e
            .nodes
            .last()
            .cloned()
            .unwrap_or(Node::Null(Null { span: args.span })),
        Some(other) => other.clone(),
        None => Node::Null(Null { span: args.span }),
    })
}

/// `error("message")` aborts the compile from user code.
fn error(args: &mut CallArgs, _: &mut Visitor<'_, '_>) -> StyleResult<Node> {
    args.max_args(1)?;
    let message = match args.get(0) {
        Some(Node::Str(s)) => s.val.clone(),
        Some(other) => other.to_css(false),
        None => "error() called".to_owned(),
    };
    Err(Error::raw(ErrorKind::HostFunction, message, args.span))
}
