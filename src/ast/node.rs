use codemap::Span;

use crate::{
    color::Color,
    common::{BinaryOp, QuoteKind, UnaryOp},
    interner::InternedString,
    output::format_float,
};

use super::Interpolation;

/// Every syntactic and value form in the language.
///
/// The parser produces these; the evaluator reduces them in place until
/// only CSS-emittable variants remain (groups, properties, literals,
/// units, colors, strings, at-rules). There are no parent pointers:
/// enclosing context is threaded by the evaluator and the serializer,
/// which keeps `Clone` a plain deep copy.
#[derive(Debug, Clone)]
pub(crate) enum Node {
    Root(Root),
    Block(Block),
    Group(Group),
    Selector(Selector),
    Property(Property),
    Expression(Expression),
    Ident(Ident),
    Literal(Literal),
    Str(Str),
    Unit(Unit),
    Color(Rgba),
    Boolean(Boolean),
    Null(Null),
    BinOp(BinOp),
    Unary(Unary),
    Ternary(Ternary),
    If(If),
    Each(Each),
    Function(Function),
    Call(Call),
    Return(Return),
    Import(Import),
    Charset(Charset),
    Media(Media),
    Page(Page),
    Keyframes(Keyframes),
}

#[derive(Debug, Clone)]
pub(crate) struct Root {
    pub nodes: Vec<Node>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub(crate) struct Block {
    pub nodes: Vec<Node>,
    /// When false the block shares the enclosing lexical frame
    /// (`if` and `for` bodies)
    pub scope: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub(crate) struct Group {
    pub selectors: Vec<Selector>,
    pub block: Block,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub(crate) struct Selector {
    pub parts: Interpolation,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub(crate) struct Property {
    pub name: Interpolation,
    pub expr: Option<Box<Node>>,
    /// Set once the evaluator has reduced the value; re-visiting such a
    /// property is the identity
    pub literal: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub(crate) struct Expression {
    pub nodes: Vec<Node>,
    /// Comma-separated list rather than space-separated juxtaposition
    pub is_list: bool,
    /// Written inside parentheses
    pub parens: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub(crate) struct Ident {
    pub name: InternedString,
    /// `None` is a lookup; `Some` is an assignment of the value
    pub val: Option<Box<Node>>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub(crate) struct Literal {
    pub text: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub(crate) struct Str {
    pub val: String,
    pub quote: QuoteKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub(crate) struct Unit {
    pub val: f64,
    pub suffix: Option<InternedString>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub(crate) struct Rgba {
    pub val: Color,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub(crate) struct Boolean {
    pub val: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub(crate) struct Null {
    pub span: Span,
}

#[derive(Debug, Clone)]
pub(crate) struct BinOp {
    pub op: BinaryOp,
    pub lhs: Box<Node>,
    pub rhs: Box<Node>,
    /// A `/` written bare in a property value is the CSS shorthand
    /// separator, not division
    pub literal_slash: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub(crate) struct Unary {
    pub op: UnaryOp,
    pub operand: Box<Node>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub(crate) struct Ternary {
    pub cond: Box<Node>,
    pub yes: Box<Node>,
    pub no: Box<Node>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub(crate) struct If {
    pub cond: Box<Node>,
    pub block: Block,
    pub elses: Vec<ElseClause>,
    /// `unless` negates the condition
    pub negate: bool,
    pub postfix: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub(crate) struct ElseClause {
    pub cond: Option<Box<Node>>,
    pub block: Block,
}

#[derive(Debug, Clone)]
pub(crate) struct Each {
    pub val: InternedString,
    pub key: Option<InternedString>,
    pub expr: Box<Node>,
    pub block: Block,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub(crate) struct Function {
    pub name: InternedString,
    pub params: Params,
    pub body: FunctionBody,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub(crate) enum FunctionBody {
    UserDefined(Block),
    /// Resolved against the builtin registry or the host table when called
    Native { raw: bool },
}

#[derive(Debug, Clone)]
pub(crate) struct Params {
    pub list: Vec<Param>,
}

#[derive(Debug, Clone)]
pub(crate) struct Param {
    pub name: InternedString,
    pub default: Option<Node>,
    pub rest: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct Call {
    pub name: InternedString,
    pub args: Vec<Node>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub(crate) struct Return {
    pub expr: Option<Box<Node>>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub(crate) struct Import {
    pub path: Box<Node>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub(crate) struct Charset {
    pub val: Str,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub(crate) struct Media {
    pub query: String,
    pub block: Block,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub(crate) struct Page {
    pub selector: Option<String>,
    pub block: Block,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub(crate) struct Keyframes {
    pub name: Interpolation,
    pub frames: Vec<Keyframe>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub(crate) struct Keyframe {
    pub positions: Vec<String>,
    pub block: Block,
}

impl Node {
    pub fn span(&self) -> Span {
        match self {
            Node::Root(n) => n.span,
            Node::Block(n) => n.span,
            Node::Group(n) => n.span,
            Node::Selector(n) => n.span,
            Node::Property(n) => n.span,
            Node::Expression(n) => n.span,
            Node::Ident(n) => n.span,
            Node::Literal(n) => n.span,
            Node::Str(n) => n.span,
            Node::Unit(n) => n.span,
            Node::Color(n) => n.span,
            Node::Boolean(n) => n.span,
            Node::Null(n) => n.span,
            Node::BinOp(n) => n.span,
            Node::Unary(n) => n.span,
            Node::Ternary(n) => n.span,
            Node::If(n) => n.span,
            Node::Each(n) => n.span,
            Node::Function(n) => n.span,
            Node::Call(n) => n.span,
            Node::Return(n) => n.span,
            Node::Import(n) => n.span,
            Node::Charset(n) => n.span,
            Node::Media(n) => n.span,
            Node::Page(n) => n.span,
            Node::Keyframes(n) => n.span,
        }
    }

    /// The word used in type errors, e.g. "cannot coerce string to unit".
    pub fn node_name(&self) -> &'static str {
        match self {
            Node::Root(..) => "root",
            Node::Block(..) => "block",
            Node::Group(..) => "group",
            Node::Selector(..) => "selector",
            Node::Property(..) => "property",
            Node::Expression(..) => "expression",
            Node::Ident(..) => "ident",
            Node::Literal(..) => "literal",
            Node::Str(..) => "string",
            Node::Unit(..) => "unit",
            Node::Color(..) => "color",
            Node::Boolean(..) => "boolean",
            Node::Null(..) => "null",
            Node::BinOp(..) => "binop",
            Node::Unary(..) => "unaryop",
            Node::Ternary(..) => "ternary",
            Node::If(..) => "if",
            Node::Each(..) => "each",
            Node::Function(..) => "function",
            Node::Call(..) => "call",
            Node::Return(..) => "return",
            Node::Import(..) => "import",
            Node::Charset(..) => "charset",
            Node::Media(..) => "media",
            Node::Page(..) => "page",
            Node::Keyframes(..) => "keyframes",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null(..))
    }

    pub fn to_boolean(&self) -> bool {
        match self {
            Node::Boolean(b) => b.val,
            Node::Null(..) => false,
            Node::Unit(u) => u.suffix.is_some() || u.val != 0.0,
            Node::Str(s) => !s.val.is_empty(),
            Node::Literal(l) => !l.text.is_empty(),
            Node::Ident(i) => !i.name.resolve().is_empty(),
            Node::Expression(e) => !e.nodes.is_empty(),
            _ => true,
        }
    }

    /// The innermost primary of an expression chain; other nodes are
    /// their own first.
    pub fn first(&self) -> &Node {
        match self {
            Node::Expression(e) => e.nodes.first().map_or(self, Node::first),
            _ => self,
        }
    }

    pub fn into_first(self) -> Node {
        match self {
            Node::Expression(mut e) if !e.nodes.is_empty() => e.nodes.remove(0).into_first(),
            other => other,
        }
    }

    /// Flatten an evaluated value into its expression items.
    pub fn into_items(self) -> Vec<Node> {
        match self {
            Node::Expression(e) => e.nodes,
            other => vec![other],
        }
    }

    /// The CSS text of a reduced value. `quote_strings` keeps string
    /// quotes (property values); interpolation and selectors drop them.
    pub fn to_css(&self, quote_strings: bool) -> String {
        match self {
            Node::Expression(e) => {
                let sep = if e.is_list { ", " } else { " " };
                e.nodes
                    .iter()
                    .map(|n| n.to_css(quote_strings))
                    .collect::<Vec<_>>()
                    .join(sep)
            }
            Node::Ident(i) => i.name.resolve(),
            Node::Literal(l) => l.text.clone(),
            Node::Str(s) => {
                if quote_strings {
                    format!("{}{}{}", s.quote, s.val, s.quote)
                } else {
                    s.val.clone()
                }
            }
            Node::Unit(u) => {
                let mut out = format_float(u.val);
                if let Some(suffix) = u.suffix {
                    out.push_str(&suffix.resolve());
                }
                out
            }
            Node::Color(c) => c.val.to_string(),
            Node::Boolean(b) => b.val.to_string(),
            Node::Null(..) => "null".to_owned(),
            Node::Call(call) => {
                let args = call
                    .args
                    .iter()
                    .map(|a| a.to_css(true))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}({})", call.name, args)
            }
            Node::BinOp(op) if op.literal_slash => format!(
                "{}/{}",
                op.lhs.to_css(quote_strings),
                op.rhs.to_css(quote_strings)
            ),
            Node::Unary(u) => format!("{}{}", u.op, u.operand.to_css(quote_strings)),
            _ => String::new(),
        }
    }
}
