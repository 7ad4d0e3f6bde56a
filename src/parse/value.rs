//! The expression grammar, lowest precedence first: comma lists,
//! juxtaposition, `not`, ternaries, logical, `is a`, equality, `in`,
//! relational, ranges, additive, multiplicative, `is defined`, unary,
//! subscript, primary.

use codemap::Span;

use crate::{
    ast::{BinOp, Call, Expression, Ident, Node, Rgba, Str, Ternary, Unary, Unit},
    common::{BinaryOp, UnaryOp},
    error::{Error, ErrorKind, StyleResult},
    token::{Keyword, Op, TokenKind},
};

use super::{ParseState, Parser};

impl<'a> Parser<'a> {
    pub(crate) fn expression_list(&mut self) -> StyleResult<Node> {
        let span = self.peek_span()?;
        let first = self.expression()?;
        self.skip_spaces()?;
        if self.lexer.peek()?.kind != TokenKind::Op(Op::Comma) {
            return Ok(first);
        }

        let mut nodes = vec![first];
        while self.accept_op(Op::Comma)? {
            self.skip_spaces()?;
            nodes.push(self.expression()?);
            self.skip_spaces()?;
        }
        Ok(Node::Expression(Expression {
            nodes,
            is_list: true,
            parens: false,
            span,
        }))
    }

    /// Space-separated juxtaposition: `1px solid red`.
    pub(crate) fn expression(&mut self) -> StyleResult<Node> {
        let span = self.peek_span()?;
        let mut nodes = vec![self.negation()?];
        loop {
            self.skip_spaces()?;
            if !self.starts_operand()? {
                break;
            }
            nodes.push(self.negation()?);
        }
        if nodes.len() == 1 {
            // unwrap is fine, length was just checked
            return Ok(nodes.pop().unwrap());
        }
        Ok(Node::Expression(Expression {
            nodes,
            is_list: false,
            parens: false,
            span,
        }))
    }

    fn starts_operand(&mut self) -> StyleResult<bool> {
        Ok(matches!(
            self.lexer.peek()?.kind,
            TokenKind::Ident(..)
                | TokenKind::Function(..)
                | TokenKind::Str(..)
                | TokenKind::Unit(..)
                | TokenKind::Color(..)
                | TokenKind::Boolean(..)
                | TokenKind::Null
                | TokenKind::Op(Op::OpenParen)
        ))
    }

    fn negation(&mut self) -> StyleResult<Node> {
        let span = self.peek_span()?;
        if self.accept_op(Op::Not)? {
            self.skip_spaces()?;
            let operand = self.negation()?;
            return Ok(Node::Unary(Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
                span,
            }));
        }
        self.ternary()
    }

    fn ternary(&mut self) -> StyleResult<Node> {
        let span = self.peek_span()?;
        let cond = self.logical()?;
        self.skip_spaces()?;
        if !self.accept_op(Op::Question)? {
            return Ok(cond);
        }
        self.skip_spaces()?;
        let yes = self.ternary()?;
        self.skip_spaces()?;
        self.expect_op(Op::Colon)?;
        self.skip_spaces()?;
        let no = self.ternary()?;
        Ok(Node::Ternary(Ternary {
            cond: Box::new(cond),
            yes: Box::new(yes),
            no: Box::new(no),
            span,
        }))
    }

    fn logical(&mut self) -> StyleResult<Node> {
        let mut lhs = self.typecheck()?;
        loop {
            self.skip_spaces()?;
            let op = match self.lexer.peek()?.kind {
                TokenKind::Op(Op::And) => BinaryOp::And,
                TokenKind::Op(Op::Or) => BinaryOp::Or,
                _ => return Ok(lhs),
            };
            self.lexer.next()?;
            self.skip_spaces()?;
            let rhs = self.typecheck()?;
            lhs = self.binop(op, lhs, rhs, false);
        }
    }

    fn typecheck(&mut self) -> StyleResult<Node> {
        let mut lhs = self.equality()?;
        loop {
            self.skip_spaces()?;
            if self.lexer.peek()?.kind != TokenKind::Op(Op::IsA) {
                return Ok(lhs);
            }
            self.lexer.next()?;
            self.skip_spaces()?;
            let rhs = self.equality()?;
            lhs = self.binop(BinaryOp::IsA, lhs, rhs, false);
        }
    }

    fn equality(&mut self) -> StyleResult<Node> {
        let mut lhs = self.membership()?;
        loop {
            self.skip_spaces()?;
            let op = match self.lexer.peek()?.kind {
                TokenKind::Op(Op::Equal) => BinaryOp::Equal,
                TokenKind::Op(Op::NotEqual) => BinaryOp::NotEqual,
                _ => return Ok(lhs),
            };
            self.lexer.next()?;
            self.skip_spaces()?;
            let rhs = self.membership()?;
            lhs = self.binop(op, lhs, rhs, false);
        }
    }

    fn membership(&mut self) -> StyleResult<Node> {
        let mut lhs = self.relational()?;
        loop {
            self.skip_spaces()?;
            if self.lexer.peek()?.kind != TokenKind::Keyword(Keyword::In) {
                return Ok(lhs);
            }
            self.lexer.next()?;
            self.skip_spaces()?;
            let rhs = self.relational()?;
            lhs = self.binop(BinaryOp::In, lhs, rhs, false);
        }
    }

    fn relational(&mut self) -> StyleResult<Node> {
        let mut lhs = self.range()?;
        loop {
            self.skip_spaces()?;
            let op = match self.lexer.peek()?.kind {
                TokenKind::Op(Op::LessThan) => BinaryOp::LessThan,
                TokenKind::Op(Op::LessThanEqual) => BinaryOp::LessThanEqual,
                TokenKind::Op(Op::GreaterThan) => BinaryOp::GreaterThan,
                TokenKind::Op(Op::GreaterThanEqual) => BinaryOp::GreaterThanEqual,
                _ => return Ok(lhs),
            };
            self.lexer.next()?;
            self.skip_spaces()?;
            let rhs = self.range()?;
            lhs = self.binop(op, lhs, rhs, false);
        }
    }

    fn range(&mut self) -> StyleResult<Node> {
        let lhs = self.additive()?;
        let op = match self.lexer.peek()?.kind {
            TokenKind::Op(Op::Range) => BinaryOp::Range,
            TokenKind::Op(Op::RangeExclusive) => BinaryOp::RangeExclusive,
            _ => return Ok(lhs),
        };
        self.lexer.next()?;
        let rhs = self.additive()?;
        Ok(self.binop(op, lhs, rhs, false))
    }

    fn additive(&mut self) -> StyleResult<Node> {
        let mut lhs = self.multiplicative()?;
        loop {
            self.skip_spaces()?;
            let op = match self.lexer.peek()?.kind {
                TokenKind::Op(Op::Plus) => BinaryOp::Plus,
                TokenKind::Op(Op::Minus) => BinaryOp::Minus,
                _ => return Ok(lhs),
            };
            self.lexer.next()?;
            self.skip_spaces()?;
            let rhs = self.multiplicative()?;
            lhs = self.binop(op, lhs, rhs, false);
        }
    }

    fn multiplicative(&mut self) -> StyleResult<Node> {
        let mut lhs = self.defined()?;
        loop {
            self.skip_spaces()?;
            let op = match self.lexer.peek()?.kind {
                TokenKind::Op(Op::Mul) => BinaryOp::Mul,
                TokenKind::Op(Op::Div) => BinaryOp::Div,
                TokenKind::Op(Op::Rem) => BinaryOp::Rem,
                TokenKind::Op(Op::Pow) => BinaryOp::Pow,
                _ => return Ok(lhs),
            };
            // a bare `/` in a property value is the CSS shorthand
            // separator; parens anywhere around it restore arithmetic
            let literal_slash = op == BinaryOp::Div
                && self.parens == 0
                && self.state() == ParseState::Property;
            self.lexer.next()?;
            self.skip_spaces()?;
            let rhs = self.defined()?;
            lhs = self.binop(op, lhs, rhs, literal_slash);
        }
    }

    fn defined(&mut self) -> StyleResult<Node> {
        let span = self.peek_span()?;
        let mut operand = self.unary()?;
        loop {
            self.skip_spaces()?;
            if self.lexer.peek()?.kind != TokenKind::Op(Op::IsDefined) {
                return Ok(operand);
            }
            self.lexer.next()?;
            operand = Node::Unary(Unary {
                op: UnaryOp::IsDefined,
                operand: Box::new(operand),
                span,
            });
        }
    }

    fn unary(&mut self) -> StyleResult<Node> {
        let tok = self.lexer.peek()?.clone();
        let op = match tok.kind {
            TokenKind::Op(Op::Bang) => UnaryOp::Not,
            TokenKind::Op(Op::Minus) => UnaryOp::Minus,
            TokenKind::Op(Op::Plus) => UnaryOp::Plus,
            TokenKind::Op(Op::Tilde) => UnaryOp::Tilde,
            _ => return self.subscript(),
        };
        self.lexer.next()?;
        let operand = self.unary()?;
        Ok(Node::Unary(Unary {
            op,
            operand: Box::new(operand),
            span: tok.pos,
        }))
    }

    fn subscript(&mut self) -> StyleResult<Node> {
        let span = self.peek_span()?;
        let mut lhs = self.primary()?;
        while self.accept_op(Op::OpenBracket)? {
            self.skip_spaces()?;
            let index = self.expression_list()?;
            self.skip_spaces()?;
            self.expect_op(Op::CloseBracket)?;
            lhs = Node::BinOp(BinOp {
                op: BinaryOp::Subscript,
                lhs: Box::new(lhs),
                rhs: Box::new(index),
                literal_slash: false,
                span,
            });
        }
        Ok(lhs)
    }

    fn primary(&mut self) -> StyleResult<Node> {
        self.skip_spaces()?;
        let tok = self.lexer.peek()?.clone();
        match tok.kind {
            TokenKind::Op(Op::OpenParen) => {
                self.lexer.next()?;
                self.parens += 1;
                self.skip_spaces()?;
                let inner = self.expression_list()?;
                self.skip_spaces()?;
                self.expect_op(Op::CloseParen)?;
                self.parens -= 1;

                Ok(match inner {
                    Node::Expression(mut e) => {
                        e.parens = true;
                        Node::Expression(e)
                    }
                    other => Node::Expression(Expression {
                        nodes: vec![other],
                        is_list: false,
                        parens: true,
                        span: tok.pos,
                    }),
                })
            }
            TokenKind::Unit(val, suffix) => {
                self.lexer.next()?;
                Ok(Node::Unit(Unit {
                    val,
                    suffix,
                    span: tok.pos,
                }))
            }
            TokenKind::Str(val, quote) => {
                self.lexer.next()?;
                Ok(Node::Str(Str {
                    val,
                    quote,
                    span: tok.pos,
                }))
            }
            TokenKind::Color(val) => {
                self.lexer.next()?;
                Ok(Node::Color(Rgba {
                    val,
                    span: tok.pos,
                }))
            }
            TokenKind::Boolean(val) => {
                self.lexer.next()?;
                Ok(Node::Boolean(crate::ast::Boolean {
                    val,
                    span: tok.pos,
                }))
            }
            TokenKind::Null => {
                self.lexer.next()?;
                Ok(Node::Null(crate::ast::Null { span: tok.pos }))
            }
            // `{expr}` interpolation in value position
            TokenKind::Op(Op::OpenBrace) => {
                self.lexer.next()?;
                self.skip_spaces()?;
                self.push_state(ParseState::Interpolation);
                let inner = self.expression_list()?;
                self.pop_state();
                self.skip_spaces()?;
                self.expect_op(Op::CloseBrace)?;
                Ok(inner)
            }
            TokenKind::Function(..) => self.call_expression(),
            TokenKind::Ident(name) => {
                self.lexer.next()?;
                Ok(Node::Ident(Ident {
                    name,
                    val: None,
                    span: tok.pos,
                }))
            }
            TokenKind::Literal(text) => {
                self.lexer.next()?;
                Ok(Node::Literal(crate::ast::Literal {
                    text,
                    span: tok.pos,
                }))
            }
            other => Err(Error::raw(
                ErrorKind::Parse,
                format!("expected expression, got {}", other.describe()),
                tok.pos,
            )),
        }
    }

    /// `name(args)`. The contents of `calc()` and `url()` are opaque to
    /// the expression grammar and pass through verbatim.
    pub(crate) fn call_expression(&mut self) -> StyleResult<Node> {
        let tok = self.lexer.next()?;
        let name = match tok.kind {
            TokenKind::Function(name) => name,
            other => {
                return Err(Error::raw(
                    ErrorKind::Parse,
                    format!("expected function call, got {}", other.describe()),
                    tok.pos,
                ));
            }
        };

        if name.resolve() == "calc" {
            return self.raw_call(tok.pos);
        }

        self.expect_op(Op::OpenParen)?;
        self.parens += 1;
        self.push_state(ParseState::FunctionArguments);

        let mut args = Vec::new();
        loop {
            self.skip_spaces()?;
            if matches!(self.lexer.peek()?.kind, TokenKind::Op(Op::CloseParen)) {
                break;
            }
            args.push(self.expression()?);
            self.skip_spaces()?;
            if !self.accept_op(Op::Comma)? {
                break;
            }
        }

        self.pop_state();
        let close = self.expect_op(Op::CloseParen)?;
        self.parens -= 1;

        Ok(Node::Call(Call {
            name,
            args,
            span: tok.pos.merge(close.pos),
        }))
    }

    fn raw_call(&mut self, start: Span) -> StyleResult<Node> {
        self.expect_op(Op::OpenParen)?;
        let mut depth = 1usize;
        let end;
        loop {
            let tok = self.lexer.next()?;
            match tok.kind {
                TokenKind::Op(Op::OpenParen) => depth += 1,
                TokenKind::Op(Op::CloseParen) => {
                    depth -= 1;
                    if depth == 0 {
                        end = tok.pos;
                        break;
                    }
                }
                TokenKind::Eos => {
                    return Err(Error::raw(ErrorKind::Parse, "expected \")\"", tok.pos));
                }
                _ => {}
            }
        }
        let span = start.merge(end);
        Ok(Node::Literal(crate::ast::Literal {
            text: self.lexer.source_slice(span),
            span,
        }))
    }

    fn binop(&self, op: BinaryOp, lhs: Node, rhs: Node, literal_slash: bool) -> Node {
        let span = lhs.span();
        Node::BinOp(BinOp {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            literal_slash,
            span,
        })
    }
}
