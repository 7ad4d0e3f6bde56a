use std::mem;

use codemap::Span;

use crate::{
    ast::{
        Block, Charset, Each, ElseClause, Function, FunctionBody, Group, If, Import,
        Interpolation, Keyframe, Keyframes, Media, Node, Page, Param, Params, Property, Return,
        Root, Selector, Str,
    },
    error::{Error, ErrorKind, StyleResult},
    interner::InternedString,
    lexer::Lexer,
    output::format_float,
    token::{Keyword, Op, Token, TokenKind},
};

mod value;

/// Pseudo-class and pseudo-element names recognized during the
/// selector-vs-property scan. A `:` directly followed by one of these
/// keeps the scan in selector territory; anything else reads as a
/// property value.
static PSEUDO_SELECTORS: &[&str] = &[
    "active",
    "after",
    "before",
    "checked",
    "default",
    "dir",
    "disabled",
    "empty",
    "enabled",
    "first",
    "first-child",
    "first-letter",
    "first-line",
    "first-of-type",
    "focus",
    "focus-visible",
    "focus-within",
    "fullscreen",
    "has",
    "hover",
    "in-range",
    "indeterminate",
    "invalid",
    "is",
    "lang",
    "last-child",
    "last-of-type",
    "left",
    "link",
    "matches",
    "not",
    "nth-child",
    "nth-last-child",
    "nth-last-of-type",
    "nth-of-type",
    "only-child",
    "only-of-type",
    "optional",
    "out-of-range",
    "placeholder",
    "read-only",
    "read-write",
    "required",
    "right",
    "root",
    "scope",
    "selection",
    "target",
    "valid",
    "visited",
    "where",
];

fn is_pseudo(name: &str) -> bool {
    let name = name.trim_start_matches(':');
    PSEUDO_SELECTORS.contains(&name) || name.starts_with('-')
}

/// Parser states disambiguating context-sensitive productions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParseState {
    Root,
    Selector,
    Conditional,
    Function,
    FunctionArguments,
    FunctionParams,
    Keyframe,
    Media,
    For,
    Page,
    Property,
    Expression,
    Assignment,
    Interpolation,
}

pub(crate) struct Parser<'a> {
    pub lexer: Lexer<'a>,
    states: Vec<ParseState>,
    /// Parenthesis nesting of the expression currently being parsed;
    /// a bare `/` in a property is only literal at depth 0
    pub(crate) parens: usize,
    /// Lifted by assignment/expression/call statements so a trailing
    /// `if`/`unless` can wrap them
    allow_postfix: bool,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        Parser {
            lexer,
            states: vec![ParseState::Root],
            parens: 0,
            allow_postfix: false,
        }
    }

    pub fn parse(mut self) -> StyleResult<Root> {
        let span = self.peek_span()?;
        let mut nodes = Vec::new();
        loop {
            self.skip_blank()?;
            if matches!(self.lexer.peek()?.kind, TokenKind::Eos) {
                break;
            }
            nodes.push(self.statement()?);
        }
        Ok(Root { nodes, span })
    }


    pub(crate) fn peek_span(&mut self) -> StyleResult<Span> {
        Ok(self.lexer.peek()?.pos)
    }

    /// Skip spaces, and comments everywhere except selector position.
    pub(crate) fn skip_spaces(&mut self) -> StyleResult<()> {
        while matches!(
            self.lexer.peek()?.kind,
            TokenKind::Space | TokenKind::Comment(..)
        ) {
            self.lexer.next()?;
        }
        Ok(())
    }

    /// Skip spaces, newlines and stray semicolons between statements.
    fn skip_blank(&mut self) -> StyleResult<()> {
        loop {
            match self.lexer.peek()?.kind {
                TokenKind::Space
                | TokenKind::Newline
                | TokenKind::Comment(..)
                | TokenKind::Op(Op::Semicolon) => {
                    self.lexer.next()?;
                }
                _ => return Ok(()),
            }
        }
    }

    pub(crate) fn accept_op(&mut self, op: Op) -> StyleResult<bool> {
        if self.lexer.peek()?.kind == TokenKind::Op(op) {
            self.lexer.next()?;
            return Ok(true);
        }
        Ok(false)
    }

    pub(crate) fn expect_op(&mut self, op: Op) -> StyleResult<Token> {
        let tok = self.lexer.peek()?.clone();
        if tok.kind == TokenKind::Op(op) {
            return self.lexer.next();
        }
        Err(Error::raw(
            ErrorKind::Parse,
            format!("expected \"{}\", got {}", op, tok.kind.describe()),
            tok.pos,
        ))
    }

    fn expect_ident(&mut self) -> StyleResult<(InternedString, Span)> {
        let tok = self.lexer.peek()?.clone();
        match tok.kind {
            TokenKind::Ident(name) => {
                self.lexer.next()?;
                Ok((name, tok.pos))
            }
            other => Err(Error::raw(
                ErrorKind::Parse,
                format!("expected identifier, got {}", other.describe()),
                tok.pos,
            )),
        }
    }

    pub(crate) fn state(&self) -> ParseState {
        *self.states.last().unwrap_or(&ParseState::Root)
    }

    pub(crate) fn push_state(&mut self, state: ParseState) {
        self.states.push(state);
    }

    pub(crate) fn pop_state(&mut self) {
        self.states.pop();
    }


    fn statement(&mut self) -> StyleResult<Node> {
        self.skip_spaces()?;
        self.allow_postfix = false;
        let tok = self.lexer.peek()?.clone();

        let node = match &tok.kind {
            TokenKind::Keyword(kw) => match kw {
                Keyword::Import => self.import()?,
                Keyword::Charset => self.charset()?,
                Keyword::Media => self.media()?,
                Keyword::Page => self.page()?,
                Keyword::Keyframes => self.keyframes()?,
                Keyword::If | Keyword::Unless => self.conditional()?,
                Keyword::For => self.iteration()?,
                Keyword::Return => self.return_statement()?,
                Keyword::Else | Keyword::In => {
                    return Err(Error::raw(
                        ErrorKind::Parse,
                        format!("unexpected {}", tok.kind.describe()),
                        tok.pos,
                    ));
                }
            },
            TokenKind::Function(..) => self.function_or_call()?,
            TokenKind::Ident(..) => self.ident_statement()?,
            TokenKind::Color(..) => {
                if self.looks_like_selector()? {
                    self.selector_group()?
                } else {
                    self.expression_statement()?
                }
            }
            TokenKind::Op(
                Op::Amp
                | Op::Tilde
                | Op::GreaterThan
                | Op::Plus
                | Op::Mul
                | Op::OpenBracket
                | Op::Colon,
            ) => self.selector_group()?,
            // `{expr}` opens either an interpolated selector or an
            // interpolated property name
            TokenKind::Op(Op::OpenBrace) => {
                if self.looks_like_selector()? {
                    self.selector_group()?
                } else {
                    self.property()?
                }
            }
            TokenKind::Literal(text) if text.starts_with('@') => {
                return Err(Error::raw(
                    ErrorKind::Parse,
                    format!("unsupported at-rule \"{}\"", text),
                    tok.pos,
                ));
            }
            _ => self.expression_statement()?,
        };

        if mem::take(&mut self.allow_postfix) {
            return self.postfix_conditional(node);
        }
        Ok(node)
    }

    /// `stmt if cond` / `stmt unless cond`
    fn postfix_conditional(&mut self, node: Node) -> StyleResult<Node> {
        self.skip_spaces()?;
        let kw = match self.lexer.peek()?.kind {
            TokenKind::Keyword(kw @ (Keyword::If | Keyword::Unless)) => kw,
            _ => return Ok(node),
        };
        let tok = self.lexer.next()?;
        self.skip_spaces()?;
        self.push_state(ParseState::Conditional);
        let cond = self.expression_list()?;
        self.pop_state();
        let span = node.span();
        Ok(Node::If(If {
            cond: Box::new(cond),
            block: Block {
                nodes: vec![node],
                scope: false,
                span,
            },
            elses: Vec::new(),
            negate: kw == Keyword::Unless,
            postfix: true,
            span: tok.pos,
        }))
    }

    fn ident_statement(&mut self) -> StyleResult<Node> {
        if self.looks_like_assignment()? {
            return self.assignment();
        }
        if self.looks_like_selector()? {
            return self.selector_group();
        }
        if self.looks_like_property()? {
            return self.property();
        }
        // a bare expression, e.g. an implicit return `n * 2`
        self.expression_statement()
    }

    /// A property is a name followed by `:` or by a value; an ident
    /// followed by an operator or the end of the line is an expression.
    fn looks_like_property(&mut self) -> StyleResult<bool> {
        let mut n = 2;
        loop {
            match self.lexer.lookahead(n)?.kind {
                TokenKind::Space | TokenKind::Comment(..) => n += 1,
                TokenKind::Op(Op::Colon | Op::OpenBrace) => return Ok(true),
                TokenKind::Ident(..)
                | TokenKind::Function(..)
                | TokenKind::Str(..)
                | TokenKind::Unit(..)
                | TokenKind::Color(..)
                | TokenKind::Boolean(..)
                | TokenKind::Null
                | TokenKind::Literal(..) => return Ok(true),
                _ => return Ok(false),
            }
        }
    }

    fn looks_like_assignment(&mut self) -> StyleResult<bool> {
        let mut n = 2;
        loop {
            match self.lexer.lookahead(n)?.kind {
                TokenKind::Space | TokenKind::Comment(..) => n += 1,
                TokenKind::Op(
                    Op::Assign
                    | Op::CondAssign
                    | Op::AddAssign
                    | Op::SubAssign
                    | Op::MulAssign
                    | Op::DivAssign
                    | Op::RemAssign,
                ) => return Ok(true),
                _ => return Ok(false),
            }
        }
    }

    /// Scan forward deciding selector group vs property/expression.
    /// Evidence for a selector: a following indent, a block-opening
    /// brace, or a comma ending its line. Evidence against: the line
    /// simply ends, or (in css mode) `;` / `}` arrives first.
    fn looks_like_selector(&mut self) -> StyleResult<bool> {
        let in_css = self.lexer.in_css();
        let mut n = 1;
        loop {
            let kind = self.lexer.lookahead(n)?.kind.clone();
            match kind {
                TokenKind::Indent => return Ok(true),
                TokenKind::Newline | TokenKind::Outdent | TokenKind::Eos => return Ok(false),
                TokenKind::Op(Op::OpenBrace) => {
                    if self.brace_is_block(n)? {
                        return Ok(true);
                    }
                    // skip the interpolation and keep scanning after it
                    let mut depth = 1usize;
                    n += 1;
                    while depth > 0 {
                        match self.lexer.lookahead(n)?.kind {
                            TokenKind::Op(Op::OpenBrace) => depth += 1,
                            TokenKind::Op(Op::CloseBrace) => depth -= 1,
                            TokenKind::Eos => return Ok(false),
                            _ => {}
                        }
                        n += 1;
                    }
                }
                TokenKind::Op(Op::Semicolon | Op::CloseBrace) if in_css => return Ok(false),
                TokenKind::Op(Op::Comma) => {
                    let mut m = n + 1;
                    loop {
                        match self.lexer.lookahead(m)?.kind {
                            TokenKind::Space => m += 1,
                            TokenKind::Newline => return Ok(true),
                            _ => break,
                        }
                    }
                    n = m;
                }
                TokenKind::Op(Op::Colon) => {
                    match self.lexer.lookahead(n + 1)?.kind.clone() {
                        TokenKind::Ident(name) | TokenKind::Function(name) => {
                            if !is_pseudo(&name.resolve()) {
                                return Ok(false);
                            }
                            n += 2;
                        }
                        // `::before`
                        TokenKind::Op(Op::Colon | Op::Not) => n += 1,
                        _ => return Ok(false),
                    }
                }
                TokenKind::Ident(..)
                | TokenKind::Function(..)
                | TokenKind::Space
                | TokenKind::Comment(..)
                | TokenKind::Str(..)
                | TokenKind::Unit(..)
                | TokenKind::Color(..)
                | TokenKind::Literal(..)
                | TokenKind::Op(
                    Op::Amp
                    | Op::Tilde
                    | Op::GreaterThan
                    | Op::Plus
                    | Op::Mul
                    | Op::Minus
                    | Op::OpenBracket
                    | Op::CloseBracket
                    | Op::Assign
                    | Op::Equal
                    | Op::OpenParen
                    | Op::CloseParen
                    | Op::Not,
                ) => n += 1,
                _ => return Ok(false),
            }
        }
    }

    /// Decide whether a `{` opens a block or an interpolation. Token-scan
    /// to the matching brace: declarations or layout inside mean block.
    fn brace_is_block(&mut self, n: usize) -> StyleResult<bool> {
        let mut depth = 1usize;
        let mut i = n + 1;
        loop {
            match self.lexer.lookahead(i)?.kind {
                TokenKind::Op(Op::OpenBrace) => depth += 1,
                TokenKind::Op(Op::CloseBrace) => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(false);
                    }
                }
                TokenKind::Op(Op::Colon | Op::Semicolon)
                | TokenKind::Newline
                | TokenKind::Indent
                | TokenKind::Outdent
                | TokenKind::Eos => return Ok(true),
                _ => {}
            }
            i += 1;
        }
    }


    fn selector_group(&mut self) -> StyleResult<Node> {
        let span = self.peek_span()?;
        self.push_state(ParseState::Selector);
        let mut selectors = vec![self.selector()?];
        while self.accept_op(Op::Comma)? {
            loop {
                match self.lexer.peek()?.kind {
                    TokenKind::Space | TokenKind::Newline => {
                        self.lexer.next()?;
                    }
                    _ => break,
                }
            }
            selectors.push(self.selector()?);
        }
        self.pop_state();
        let block = self.block(true)?;
        Ok(Node::Group(Group {
            selectors,
            block,
            span,
        }))
    }

    /// Consume selector tokens verbatim, splicing `{expr}` interpolations.
    /// Comment hacks are preserved here and only here.
    fn selector(&mut self) -> StyleResult<Selector> {
        let span = self.peek_span()?;
        let mut parts = Interpolation::new(span);

        loop {
            let kind = self.lexer.peek()?.kind.clone();
            match kind {
                TokenKind::Newline
                | TokenKind::Indent
                | TokenKind::Outdent
                | TokenKind::Eos
                | TokenKind::Op(Op::Comma) => break,
                TokenKind::Op(Op::Semicolon | Op::CloseBrace) if self.lexer.in_css() => break,
                TokenKind::Op(Op::OpenBrace) => {
                    if self.brace_is_block(1)? {
                        break;
                    }
                    self.lexer.next()?;
                    self.skip_spaces()?;
                    self.push_state(ParseState::Interpolation);
                    let expr = self.expression_list()?;
                    self.pop_state();
                    self.skip_spaces()?;
                    self.expect_op(Op::CloseBrace)?;
                    parts.add_expr(expr);
                }
                _ => {
                    let tok = self.lexer.next()?;
                    parts.add_text(&self.lexer.source_slice(tok.pos));
                }
            }
        }

        trim_interpolation(&mut parts);

        if parts.is_empty() {
            return Err(Error::raw(ErrorKind::Parse, "empty selector", span));
        }
        Ok(Selector { parts, span })
    }


    pub(crate) fn block(&mut self, scope: bool) -> StyleResult<Block> {
        self.skip_spaces()?;
        let open = self.lexer.peek()?.clone();
        let css = match open.kind {
            TokenKind::Op(Op::OpenBrace) => {
                self.lexer.next()?;
                self.lexer.enter_css();
                true
            }
            TokenKind::Indent => {
                self.lexer.next()?;
                false
            }
            other => {
                return Err(Error::raw(
                    ErrorKind::Parse,
                    format!(
                        "expected indented block or \"{{\", got {}",
                        other.describe()
                    ),
                    open.pos,
                ));
            }
        };

        let mut nodes = Vec::new();
        loop {
            self.skip_blank()?;
            let tok = self.lexer.peek()?.clone();
            match tok.kind {
                TokenKind::Op(Op::CloseBrace) if css => {
                    self.lexer.next()?;
                    self.lexer.exit_css();
                    break;
                }
                TokenKind::Outdent if !css => {
                    self.lexer.next()?;
                    break;
                }
                TokenKind::Eos => {
                    if css {
                        return Err(Error::raw(ErrorKind::Parse, "expected \"}\"", tok.pos));
                    }
                    break;
                }
                _ => nodes.push(self.statement()?),
            }
        }

        Ok(Block {
            nodes,
            scope,
            span: open.pos,
        })
    }


    fn property(&mut self) -> StyleResult<Node> {
        let span = self.peek_span()?;
        let mut name = Interpolation::new(span);

        loop {
            let kind = self.lexer.peek()?.kind.clone();
            match kind {
                TokenKind::Ident(s) => {
                    self.lexer.next()?;
                    name.add_text(&s.resolve());
                }
                TokenKind::Op(Op::OpenBrace) => {
                    self.lexer.next()?;
                    self.skip_spaces()?;
                    self.push_state(ParseState::Interpolation);
                    let expr = self.expression_list()?;
                    self.pop_state();
                    self.skip_spaces()?;
                    self.expect_op(Op::CloseBrace)?;
                    name.add_expr(expr);
                }
                _ => break,
            }
        }

        if name.is_empty() {
            let tok = self.lexer.peek()?.clone();
            return Err(Error::raw(
                ErrorKind::Parse,
                format!("expected property name, got {}", tok.kind.describe()),
                tok.pos,
            ));
        }

        self.skip_spaces()?;
        self.accept_op(Op::Colon)?;
        self.skip_spaces()?;

        self.push_state(ParseState::Property);
        let expr = if self.at_value_end()? {
            None
        } else {
            Some(Box::new(self.expression_list()?))
        };
        self.pop_state();

        Ok(Node::Property(Property {
            name,
            expr,
            literal: false,
            span,
        }))
    }

    fn at_value_end(&mut self) -> StyleResult<bool> {
        Ok(matches!(
            self.lexer.peek()?.kind,
            TokenKind::Newline
                | TokenKind::Indent
                | TokenKind::Outdent
                | TokenKind::Eos
                | TokenKind::Op(Op::Semicolon)
                | TokenKind::Op(Op::CloseBrace)
        ))
    }


    fn assignment(&mut self) -> StyleResult<Node> {
        use crate::common::BinaryOp;
        use crate::{
            ast::{BinOp, Ident, Ternary, Unary},
            common::UnaryOp,
        };

        let (name, span) = self.expect_ident()?;
        self.skip_spaces()?;
        let op_tok = self.lexer.next()?;
        let op = match op_tok.kind {
            TokenKind::Op(op) => op,
            _ => unreachable!("assignment operator was looked ahead"),
        };
        self.skip_spaces()?;

        self.push_state(ParseState::Assignment);
        let rhs = self.expression_list()?;
        self.pop_state();

        let lookup = |span| {
            Node::Ident(Ident {
                name,
                val: None,
                span,
            })
        };

        let val = match op {
            Op::Assign => rhs,
            // `x ?= v` keeps an existing binding
            Op::CondAssign => Node::Ternary(Ternary {
                cond: Box::new(Node::Unary(Unary {
                    op: UnaryOp::IsDefined,
                    operand: Box::new(lookup(span)),
                    span,
                })),
                yes: Box::new(lookup(span)),
                no: Box::new(rhs),
                span,
            }),
            compound => {
                let bin = match compound {
                    Op::AddAssign => BinaryOp::Plus,
                    Op::SubAssign => BinaryOp::Minus,
                    Op::MulAssign => BinaryOp::Mul,
                    Op::DivAssign => BinaryOp::Div,
                    Op::RemAssign => BinaryOp::Rem,
                    _ => unreachable!("assignment operator was looked ahead"),
                };
                Node::BinOp(BinOp {
                    op: bin,
                    lhs: Box::new(lookup(span)),
                    rhs: Box::new(rhs),
                    literal_slash: false,
                    span,
                })
            }
        };

        self.allow_postfix = true;
        Ok(Node::Ident(crate::ast::Ident {
            name,
            val: Some(Box::new(val)),
            span,
        }))
    }


    /// `name(` opens either a definition or a call statement. Pair the
    /// parens, then peek past: `=`, an indent, or `{` means definition.
    fn function_or_call(&mut self) -> StyleResult<Node> {
        let mut n = 2;
        let mut depth = 0usize;
        loop {
            match self.lexer.lookahead(n)?.kind {
                TokenKind::Op(Op::OpenParen) => depth += 1,
                TokenKind::Op(Op::CloseParen) => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                TokenKind::Eos => {
                    let span = self.peek_span()?;
                    return Err(Error::raw(ErrorKind::Parse, "expected \")\"", span));
                }
                _ => {}
            }
            n += 1;
        }

        let mut m = n + 1;
        loop {
            match self.lexer.lookahead(m)?.kind {
                TokenKind::Space => m += 1,
                TokenKind::Op(Op::Assign) | TokenKind::Indent | TokenKind::Op(Op::OpenBrace) => {
                    return self.function_definition();
                }
                _ => break,
            }
        }

        let call = self.call_expression()?;
        self.allow_postfix = true;
        Ok(call)
    }

    fn function_definition(&mut self) -> StyleResult<Node> {
        let tok = self.lexer.next()?;
        let name = match tok.kind {
            TokenKind::Function(name) => name,
            _ => unreachable!("caller peeked a function token"),
        };

        self.expect_op(Op::OpenParen)?;
        self.push_state(ParseState::FunctionParams);
        let mut list = Vec::new();
        loop {
            self.skip_spaces()?;
            if matches!(self.lexer.peek()?.kind, TokenKind::Op(Op::CloseParen)) {
                break;
            }
            let (pname, _) = self.expect_ident()?;
            self.skip_spaces()?;

            let mut param = Param {
                name: pname,
                default: None,
                rest: false,
            };
            if self.accept_op(Op::RangeExclusive)? {
                param.rest = true;
            } else if self.accept_op(Op::Assign)? {
                self.skip_spaces()?;
                param.default = Some(self.expression()?);
            }
            list.push(param);

            self.skip_spaces()?;
            if !self.accept_op(Op::Comma)? {
                break;
            }
        }
        self.pop_state();
        self.expect_op(Op::CloseParen)?;

        self.skip_spaces()?;
        self.accept_op(Op::Assign)?;
        self.skip_spaces()?;

        self.push_state(ParseState::Function);
        let body = match self.lexer.peek()?.kind {
            TokenKind::Indent | TokenKind::Op(Op::OpenBrace) => self.block(true)?,
            // single-expression body: `add(a, b) = a + b`
            _ => {
                let expr = self.expression_list()?;
                Block {
                    nodes: vec![expr],
                    scope: true,
                    span: tok.pos,
                }
            }
        };
        self.pop_state();

        Ok(Node::Function(Function {
            name,
            params: Params { list },
            body: FunctionBody::UserDefined(body),
            span: tok.pos,
        }))
    }


    fn conditional(&mut self) -> StyleResult<Node> {
        let tok = self.lexer.next()?;
        let negate = tok.kind == TokenKind::Keyword(Keyword::Unless);
        self.skip_spaces()?;

        self.push_state(ParseState::Conditional);
        let cond = self.expression_list()?;
        self.pop_state();

        let block = self.block(false)?;

        let mut elses = Vec::new();
        loop {
            if !self.take_else()? {
                break;
            }
            self.skip_spaces()?;
            if matches!(self.lexer.peek()?.kind, TokenKind::Keyword(Keyword::If)) {
                self.lexer.next()?;
                self.skip_spaces()?;
                self.push_state(ParseState::Conditional);
                let cond = self.expression_list()?;
                self.pop_state();
                let block = self.block(false)?;
                elses.push(ElseClause {
                    cond: Some(Box::new(cond)),
                    block,
                });
            } else {
                let block = self.block(false)?;
                elses.push(ElseClause { cond: None, block });
                break;
            }
        }

        Ok(Node::If(If {
            cond: Box::new(cond),
            block,
            elses,
            negate,
            postfix: false,
            span: tok.pos,
        }))
    }

    /// Consume an upcoming `else`, looking across blank separators
    /// without disturbing anything when no `else` follows.
    fn take_else(&mut self) -> StyleResult<bool> {
        let mut n = 1;
        loop {
            match self.lexer.lookahead(n)?.kind {
                TokenKind::Space | TokenKind::Newline | TokenKind::Comment(..) => n += 1,
                TokenKind::Keyword(Keyword::Else) => {
                    for _ in 0..n {
                        self.lexer.next()?;
                    }
                    return Ok(true);
                }
                _ => return Ok(false),
            }
        }
    }

    fn iteration(&mut self) -> StyleResult<Node> {
        let tok = self.lexer.next()?;
        self.skip_spaces()?;
        let (val, _) = self.expect_ident()?;
        self.skip_spaces()?;

        let key = if self.accept_op(Op::Comma)? {
            self.skip_spaces()?;
            let (key, _) = self.expect_ident()?;
            self.skip_spaces()?;
            Some(key)
        } else {
            None
        };

        let next = self.lexer.peek()?.clone();
        if next.kind != TokenKind::Keyword(Keyword::In) {
            return Err(Error::raw(
                ErrorKind::Parse,
                format!("expected \"in\", got {}", next.kind.describe()),
                next.pos,
            ));
        }
        self.lexer.next()?;
        self.skip_spaces()?;

        self.push_state(ParseState::For);
        let expr = self.expression_list()?;
        self.pop_state();

        let block = self.block(false)?;

        Ok(Node::Each(Each {
            val,
            key,
            expr: Box::new(expr),
            block,
            span: tok.pos,
        }))
    }

    fn return_statement(&mut self) -> StyleResult<Node> {
        let tok = self.lexer.next()?;
        self.skip_spaces()?;
        let expr = if self.at_value_end()? {
            None
        } else {
            Some(Box::new(self.expression_list()?))
        };
        self.allow_postfix = true;
        Ok(Node::Return(Return {
            expr,
            span: tok.pos,
        }))
    }


    fn import(&mut self) -> StyleResult<Node> {
        let tok = self.lexer.next()?;
        self.skip_spaces()?;
        let path = self.expression_list()?;
        Ok(Node::Import(Import {
            path: Box::new(path),
            span: tok.pos,
        }))
    }

    fn charset(&mut self) -> StyleResult<Node> {
        let tok = self.lexer.next()?;
        self.skip_spaces()?;
        let next = self.lexer.next()?;
        match next.kind {
            TokenKind::Str(val, quote) => Ok(Node::Charset(Charset {
                val: Str {
                    val,
                    quote,
                    span: next.pos,
                },
                span: tok.pos,
            })),
            other => Err(Error::raw(
                ErrorKind::Parse,
                format!("expected string after @charset, got {}", other.describe()),
                next.pos,
            )),
        }
    }

    fn media(&mut self) -> StyleResult<Node> {
        let tok = self.lexer.next()?;
        self.skip_spaces()?;
        let query = self.raw_until_block()?;
        self.push_state(ParseState::Media);
        let block = self.block(true)?;
        self.pop_state();
        Ok(Node::Media(Media {
            query,
            block,
            span: tok.pos,
        }))
    }

    fn page(&mut self) -> StyleResult<Node> {
        let tok = self.lexer.next()?;
        self.skip_spaces()?;
        let selector = self.raw_until_block()?;
        let selector = if selector.is_empty() {
            None
        } else {
            Some(selector)
        };
        self.push_state(ParseState::Page);
        let block = self.block(true)?;
        self.pop_state();
        Ok(Node::Page(Page {
            selector,
            block,
            span: tok.pos,
        }))
    }

    fn keyframes(&mut self) -> StyleResult<Node> {
        let tok = self.lexer.next()?;
        self.skip_spaces()?;

        let span = self.peek_span()?;
        let mut name = Interpolation::new(span);
        loop {
            let kind = self.lexer.peek()?.kind.clone();
            match kind {
                TokenKind::Ident(s) => {
                    self.lexer.next()?;
                    name.add_text(&s.resolve());
                }
                TokenKind::Op(Op::OpenBrace) => {
                    if self.brace_is_block(1)? {
                        break;
                    }
                    self.lexer.next()?;
                    self.skip_spaces()?;
                    self.push_state(ParseState::Interpolation);
                    let expr = self.expression_list()?;
                    self.pop_state();
                    self.skip_spaces()?;
                    self.expect_op(Op::CloseBrace)?;
                    name.add_expr(expr);
                }
                _ => break,
            }
        }
        if name.is_empty() {
            return Err(Error::raw(ErrorKind::Parse, "expected keyframes name", span));
        }

        self.push_state(ParseState::Keyframe);
        self.skip_spaces()?;
        let open = self.lexer.peek()?.clone();
        let css = match open.kind {
            TokenKind::Op(Op::OpenBrace) => {
                self.lexer.next()?;
                self.lexer.enter_css();
                true
            }
            TokenKind::Indent => {
                self.lexer.next()?;
                false
            }
            other => {
                return Err(Error::raw(
                    ErrorKind::Parse,
                    format!(
                        "expected indented block or \"{{\", got {}",
                        other.describe()
                    ),
                    open.pos,
                ));
            }
        };

        let mut frames = Vec::new();
        loop {
            self.skip_blank()?;
            let next = self.lexer.peek()?.clone();
            match next.kind {
                TokenKind::Op(Op::CloseBrace) if css => {
                    self.lexer.next()?;
                    self.lexer.exit_css();
                    break;
                }
                TokenKind::Outdent if !css => {
                    self.lexer.next()?;
                    break;
                }
                TokenKind::Eos => break,
                _ => frames.push(self.keyframe()?),
            }
        }
        self.pop_state();

        Ok(Node::Keyframes(Keyframes {
            name,
            frames,
            span: tok.pos,
        }))
    }

    /// One `from`/`to`/`N%` frame with its block.
    fn keyframe(&mut self) -> StyleResult<Keyframe> {
        let mut positions = Vec::new();
        loop {
            let next = self.lexer.peek()?.clone();
            match next.kind {
                TokenKind::Unit(v, suffix) => {
                    self.lexer.next()?;
                    let mut text = format_float(v);
                    if let Some(suffix) = suffix {
                        text.push_str(&suffix.resolve());
                    }
                    positions.push(text);
                }
                TokenKind::Ident(name) => {
                    self.lexer.next()?;
                    positions.push(name.resolve());
                }
                TokenKind::Op(Op::Comma) | TokenKind::Space | TokenKind::Comment(..) => {
                    self.lexer.next()?;
                }
                _ => break,
            }
        }
        if positions.is_empty() {
            let span = self.peek_span()?;
            return Err(Error::raw(
                ErrorKind::Parse,
                "expected keyframe position",
                span,
            ));
        }
        let block = self.block(true)?;
        Ok(Keyframe { positions, block })
    }

    /// Raw text up to a block opener, for media queries and page selectors.
    fn raw_until_block(&mut self) -> StyleResult<String> {
        let mut out = String::new();
        loop {
            let tok = self.lexer.peek()?.clone();
            match tok.kind {
                TokenKind::Indent
                | TokenKind::Newline
                | TokenKind::Outdent
                | TokenKind::Eos
                | TokenKind::Op(Op::OpenBrace) => break,
                _ => {
                    self.lexer.next()?;
                    out.push_str(&self.lexer.source_slice(tok.pos));
                }
            }
        }
        Ok(out.trim().to_owned())
    }

    fn expression_statement(&mut self) -> StyleResult<Node> {
        self.push_state(ParseState::Expression);
        let expr = self.expression_list()?;
        self.pop_state();
        self.allow_postfix = true;
        Ok(expr)
    }
}

fn trim_interpolation(parts: &mut Interpolation) {
    use crate::ast::Segment;
    if let Some(Segment::Text(text)) = parts.segments.first_mut() {
        let trimmed = text.trim_start().to_owned();
        *text = trimmed;
    }
    if let Some(Segment::Text(text)) = parts.segments.last_mut() {
        let trimmed = text.trim_end().to_owned();
        *text = trimmed;
    }
    parts
        .segments
        .retain(|seg| !matches!(seg, Segment::Text(t) if t.is_empty()));
}
