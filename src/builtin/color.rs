use std::collections::BTreeMap;

use crate::ast::{Node, Rgba, Unit};
use crate::color::Color;
use crate::error::StyleResult;
use crate::evaluate::Visitor;

use super::{Builtin, CallArgs};

pub(crate) fn register(m: &mut BTreeMap<String, Builtin>) {
    m.insert("rgb".to_owned(), Builtin::new(rgb));
    m.insert("rgba".to_owned(), Builtin::new(rgba));
    m.insert("red".to_owned(), Builtin::new(red));
    m.insert("green".to_owned(), Builtin::new(green));
    m.insert("blue".to_owned(), Builtin::new(blue));
    m.insert("alpha".to_owned(), Builtin::new(alpha));
    m.insert("darken".to_owned(), Builtin::new(darken));
    m.insert("lighten".to_owned(), Builtin::new(lighten));
    m.insert("saturate".to_owned(), Builtin::new(saturate));
    m.insert("desaturate".to_owned(), Builtin::new(desaturate));
    m.insert("grayscale".to_owned(), Builtin::new(grayscale));
    m.insert("invert".to_owned(), Builtin::new(invert));
}

fn rgb(args: &mut CallArgs, _: &mut Visitor<'_, '_>) -> StyleResult<Node> {
    args.max_args(3)?;
    let r = args.number(0, "red")?;
    let g = args.number(1, "green")?;
    let b = args.number(2, "blue")?;
    Ok(color_node(Color::new(r, g, b, 1.0), args))
}

fn rgba(args: &mut CallArgs, _: &mut Visitor<'_, '_>) -> StyleResult<Node> {
    args.max_args(4)?;
    // rgba(color, a) or rgba(r, g, b, a)
    if let Some(Node::Color(c)) = args.get(0) {
        let mut val = c.val;
        val.alpha = args.number(1, "alpha")?;
        return Ok(color_node(val, args));
    }
    let r = args.number(0, "red")?;
    let g = args.number(1, "green")?;
    let b = args.number(2, "blue")?;
    let a = args.number(3, "alpha")?;
    Ok(color_node(Color::new(r, g, b, a), args))
}

fn red(args: &mut CallArgs, _: &mut Visitor<'_, '_>) -> StyleResult<Node> {
    channel(args, |c| c.red)
}

fn green(args: &mut CallArgs, _: &mut Visitor<'_, '_>) -> StyleResult<Node> {
    channel(args, |c| c.green)
}

fn blue(args: &mut CallArgs, _: &mut Visitor<'_, '_>) -> StyleResult<Node> {
    channel(args, |c| c.blue)
}

fn alpha(args: &mut CallArgs, _: &mut Visitor<'_, '_>) -> StyleResult<Node> {
    args.max_args(1)?;
    let c = args.color(0, "color")?;
    Ok(Node::Unit(Unit {
        val: c.alpha,
        suffix: None,
        span: args.span,
    }))
}

fn darken(args: &mut CallArgs, _: &mut Visitor<'_, '_>) -> StyleResult<Node> {
    args.max_args(2)?;
    let c = args.color(0, "color")?;
    let (amount, _) = args.unit(1, "amount")?;
    Ok(color_node(c.adjust_lightness(-amount), args))
}

fn lighten(args: &mut CallArgs, _: &mut Visitor<'_, '_>) -> StyleResult<Node> {
    args.max_args(2)?;
    let c = args.color(0, "color")?;
    let (amount, _) = args.unit(1, "amount")?;
    Ok(color_node(c.adjust_lightness(amount), args))
}

fn saturate(args: &mut CallArgs, _: &mut Visitor<'_, '_>) -> StyleResult<Node> {
    args.max_args(2)?;
    let c = args.color(0, "color")?;
    let (amount, _) = args.unit(1, "amount")?;
    Ok(color_node(c.adjust_saturation(amount), args))
}

fn desaturate(args: &mut CallArgs, _: &mut Visitor<'_, '_>) -> StyleResult<Node> {
    args.max_args(2)?;
    let c = args.color(0, "color")?;
    let (amount, _) = args.unit(1, "amount")?;
    Ok(color_node(c.adjust_saturation(-amount), args))
}

fn grayscale(args: &mut CallArgs, _: &mut Visitor<'_, '_>) -> StyleResult<Node> {
    args.max_args(1)?;
    let c = args.color(0, "color")?;
    Ok(color_node(c.adjust_saturation(-100.0), args))
}

fn invert(args: &mut CallArgs, _: &mut Visitor<'_, '_>) -> StyleResult<Node> {
    args.max_args(1)?;
    let c = args.color(0, "color")?;
    Ok(color_node(c.map(|v| 255.0 - v), args))
}

fn channel(args: &mut CallArgs, pick: impl Fn(Color) -> f64) -> StyleResult<Node> {
    args.max_args(1)?;
    let c = args.color(0, "color")?;
    Ok(Node::Unit(Unit {
        val: pick(c).max(0.0).min(255.0).round(),
        suffix: None,
        span: args.span,
    }))
}

fn color_node(val: Color, args: &CallArgs) -> Node {
    Node::Color(Rgba {
        val,
        span: args.span,
    })
}
