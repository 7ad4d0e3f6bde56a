use std::{collections::VecDeque, str::Chars, sync::Arc};

use codemap::{File, Span};
use peekmore::{PeekMore, PeekMoreIterator};

use crate::{
    color::Color,
    common::QuoteKind,
    error::{Error, ErrorKind, StyleResult},
    interner::InternedString,
    token::{Keyword, Op, Token, TokenKind},
};

/// Tokenizer for the indentation-sensitive syntax.
///
/// Layout is made explicit: a deeper line emits `Indent`, a shallower line
/// emits one `Outdent` per closed level, an equal line emits `Newline`.
/// Newlines inside parentheses are continuations, and inside a `{ ... }`
/// block (entered by the parser via [`Lexer::enter_css`]) the indent stack
/// is left untouched so both syntaxes can mix in one file.
pub(crate) struct Lexer<'a> {
    chars: PeekMoreIterator<Chars<'a>>,
    file: Arc<File>,
    cursor: usize,
    /// Tokens produced ahead of the parser by `lookahead`
    stash: VecDeque<Token>,
    /// Tokens produced as a side effect of layout handling (extra outdents)
    pending: VecDeque<Token>,
    indents: Vec<usize>,
    indent_char: Option<char>,
    paren_depth: usize,
    css_depth: usize,
    eos: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(file: &'a Arc<File>) -> Self {
        Lexer {
            chars: file.source().chars().peekmore(),
            file: Arc::clone(file),
            cursor: 0,
            stash: VecDeque::new(),
            pending: VecDeque::new(),
            indents: Vec::new(),
            indent_char: None,
            paren_depth: 0,
            css_depth: 0,
            eos: false,
        }
    }

    /// Raw source text under `span`, used to reconstruct selector text.
    pub fn source_slice(&self, span: Span) -> String {
        self.file.source_slice(span).to_owned()
    }

    pub fn next(&mut self) -> StyleResult<Token> {
        let tok = match self.stash.pop_front() {
            Some(tok) => tok,
            None => self.read_token()?,
        };
        Ok(tok)
    }

    pub fn peek(&mut self) -> StyleResult<&Token> {
        self.lookahead(1)
    }

    /// The `n`th upcoming token, 1-based. Tokens are produced lazily and
    /// stashed, so arbitrary `n` is supported.
    pub fn lookahead(&mut self, n: usize) -> StyleResult<&Token> {
        debug_assert!(n >= 1);
        while self.stash.len() < n {
            let tok = self.read_token()?;
            self.stash.push_back(tok);
        }
        Ok(&self.stash[n - 1])
    }

    /// Enter a `{`-delimited block. Layout tokens already stashed by
    /// lookahead across the `{` are rewritten to plain newlines.
    pub fn enter_css(&mut self) {
        self.css_depth += 1;
        let indents = &mut self.indents;
        for tok in self.stash.iter_mut().chain(self.pending.iter_mut()) {
            match tok.kind {
                TokenKind::Indent => {
                    indents.pop();
                    tok.kind = TokenKind::Newline;
                }
                TokenKind::Outdent => tok.kind = TokenKind::Newline,
                _ => {}
            }
        }
    }

    pub fn exit_css(&mut self) {
        self.css_depth = self.css_depth.saturating_sub(1);
    }

    pub fn in_css(&self) -> bool {
        self.css_depth > 0
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn peek_char_n(&mut self, n: usize) -> Option<char> {
        let c = self.chars.peek_nth(n).copied();
        self.chars.reset_cursor();
        c
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.cursor += c.len_utf8();
        Some(c)
    }

    fn eat_char(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.next_char();
            true
        } else {
            false
        }
    }

    fn span_from(&self, start: usize) -> Span {
        self.file.span.subspan(start as u64, self.cursor as u64)
    }

    fn span_here(&self) -> Span {
        let end = (self.cursor as u64).min(self.file.span.len() as u64);
        self.file.span.subspan(end, end)
    }

    fn token(&self, start: usize, kind: TokenKind) -> Token {
        Token::new(self.span_from(start), kind)
    }

    /// A `-` starts a signed number only when whitespace (or the start of
    /// input) sits immediately before it; `10px-5` stays a subtraction.
    fn minus_is_sign(&self) -> bool {
        match self.file.source()[..self.cursor].chars().last() {
            Some(c) => c.is_whitespace() || matches!(c, '(' | '[' | ',' | ':'),
            None => true,
        }
    }

    fn err(&self, kind: ErrorKind, message: impl Into<String>, span: Span) -> Box<Error> {
        Error::raw(kind, message, span)
    }

    fn read_token(&mut self) -> StyleResult<Token> {
        if let Some(tok) = self.pending.pop_front() {
            return Ok(tok);
        }

        loop {
            let start = self.cursor;
            let c = match self.peek_char() {
                Some(c) => c,
                None => return Ok(self.end_of_source()),
            };

            match c {
                '\r' | '\n' => {
                    self.next_char();
                    if c == '\r' {
                        self.eat_char('\n');
                    }
                    if self.paren_depth > 0 {
                        // continuation line
                        continue;
                    }
                    if self.css_depth > 0 {
                        return Ok(Token::new(self.span_from(start), TokenKind::Newline));
                    }
                    match self.layout(start)? {
                        Some(tok) => return Ok(tok),
                        None => continue,
                    }
                }
                ' ' | '\t' => {
                    self.next_char();
                    while matches!(self.peek_char(), Some(' ') | Some('\t')) {
                        self.next_char();
                    }
                    return Ok(Token::new(self.span_from(start), TokenKind::Space));
                }
                '/' if self.peek_char_n(1) == Some('/') => {
                    while !matches!(self.peek_char(), Some('\n') | None) {
                        self.next_char();
                    }
                    continue;
                }
                '/' if self.peek_char_n(1) == Some('*') => {
                    return self.block_comment(start);
                }
                '\'' | '"' => return self.string(start, c),
                '#' => {
                    if let Some(tok) = self.hash(start)? {
                        return Ok(tok);
                    }
                    continue;
                }
                '@' => return self.at_word(start),
                '0'..='9' => return self.number(start, false),
                '.' => {
                    if matches!(self.peek_char_n(1), Some('0'..='9')) {
                        return self.number(start, false);
                    }
                    if self.peek_char_n(1) == Some('.') {
                        return self.operator(start);
                    }
                    // class selector fragment like `.btn-primary`
                    return self.ident(start);
                }
                '-' if self.minus_is_sign()
                    && (matches!(self.peek_char_n(1), Some('0'..='9'))
                        || (self.peek_char_n(1) == Some('.')
                            && matches!(self.peek_char_n(2), Some('0'..='9')))) =>
                {
                    self.next_char();
                    return self.number(start, true);
                }
                c if is_ident_start(c) => return self.ident(start),
                '-' if matches!(self.peek_char_n(1), Some(n) if is_ident_start(n) || n == '-') => {
                    return self.ident(start)
                }
                _ => return self.operator(start),
            }
        }
    }

    fn end_of_source(&mut self) -> Token {
        let span = self.span_here();
        if !self.eos {
            self.eos = true;
            while self.indents.pop().is_some() {
                self.pending.push_back(Token::new(span, TokenKind::Outdent));
            }
            self.pending.push_back(Token::new(span, TokenKind::Eos));
            // unwrap is fine, at least Eos was queued
            return self.pending.pop_front().unwrap();
        }
        Token::new(span, TokenKind::Eos)
    }

    /// Handle the indentation of the line following a newline. Returns
    /// `None` when the line is blank or comment-only and lexing should
    /// continue past it.
    fn layout(&mut self, start: usize) -> StyleResult<Option<Token>> {
        let mut width = 0usize;
        while let Some(c) = self.peek_char() {
            if c != ' ' && c != '\t' {
                break;
            }
            match self.indent_char {
                Some(ic) if ic != c => {
                    return Err(self.err(
                        ErrorKind::Lex,
                        "indentation mixes tabs and spaces",
                        self.span_from(start),
                    ));
                }
                None => self.indent_char = Some(c),
                _ => {}
            }
            self.next_char();
            width += 1;
        }

        // blank and comment-only lines carry no layout
        match self.peek_char() {
            None | Some('\n') | Some('\r') => return Ok(None),
            Some('/') if self.peek_char_n(1) == Some('/') => return Ok(None),
            _ => {}
        }

        let span = self.span_from(start);
        let current = self.indents.last().copied().unwrap_or(0);

        if width > current {
            self.indents.push(width);
            return Ok(Some(Token::new(span, TokenKind::Indent)));
        }

        if width == current {
            return Ok(Some(Token::new(span, TokenKind::Newline)));
        }

        while self.indents.last().copied().unwrap_or(0) > width {
            self.indents.pop();
            self.pending.push_back(Token::new(span, TokenKind::Outdent));
        }
        if self.indents.last().copied().unwrap_or(0) != width {
            return Err(self.err(ErrorKind::Lex, "inconsistent indentation", span));
        }
        // unwrap is fine, the loop pushed at least one outdent
        Ok(Some(self.pending.pop_front().unwrap()))
    }

    fn block_comment(&mut self, start: usize) -> StyleResult<Token> {
        self.next_char();
        self.next_char();
        loop {
            match self.next_char() {
                Some('*') if self.peek_char() == Some('/') => {
                    self.next_char();
                    break;
                }
                Some(..) => {}
                None => {
                    return Err(self.err(
                        ErrorKind::Lex,
                        "unterminated block comment",
                        self.span_from(start),
                    ));
                }
            }
        }
        let text = self.file.source()[start..self.cursor].to_owned();
        Ok(self.token(start, TokenKind::Comment(text)))
    }

    fn string(&mut self, start: usize, quote: char) -> StyleResult<Token> {
        self.next_char();
        let mut value = String::new();
        loop {
            match self.next_char() {
                Some(c) if c == quote => break,
                Some('\\') => match self.next_char() {
                    Some(e @ ('\'' | '"' | '\\')) => value.push(e),
                    Some('n') => value.push('\n'),
                    Some(other) => {
                        // leave CSS escapes like \2014 intact
                        value.push('\\');
                        value.push(other);
                    }
                    None => {
                        return Err(self.err(
                            ErrorKind::Lex,
                            "unterminated string",
                            self.span_from(start),
                        ));
                    }
                },
                Some('\n') | None => {
                    return Err(self.err(
                        ErrorKind::Lex,
                        "unterminated string",
                        self.span_from(start),
                    ));
                }
                Some(c) => value.push(c),
            }
        }
        let kind = if quote == '\'' {
            QuoteKind::Single
        } else {
            QuoteKind::Double
        };
        Ok(self.token(start, TokenKind::Str(value, kind)))
    }

    /// `#` starts either a hex color or an id selector fragment.
    fn hash(&mut self, start: usize) -> StyleResult<Option<Token>> {
        self.next_char();
        let digits_at = self.cursor;
        while matches!(self.peek_char(), Some(c) if c.is_ascii_hexdigit()) {
            self.next_char();
        }
        let digits = self.file.source()[digits_at..self.cursor].to_owned();
        let followed_by_ident = matches!(self.peek_char(), Some(c) if is_ident_char(c));

        if !followed_by_ident {
            if let Some(color) = Color::from_hex(&digits) {
                return Ok(Some(self.token(start, TokenKind::Color(color))));
            }
        }

        while matches!(self.peek_char(), Some(c) if is_ident_char(c)) {
            self.next_char();
        }
        if self.cursor == digits_at {
            return Err(self.err(
                ErrorKind::Lex,
                "expected color digits or identifier after \"#\"",
                self.span_from(start),
            ));
        }
        let name = InternedString::get_or_intern(&self.file.source()[start..self.cursor]);
        Ok(Some(self.token(start, TokenKind::Ident(name))))
    }

    fn at_word(&mut self, start: usize) -> StyleResult<Token> {
        self.next_char();
        while matches!(self.peek_char(), Some(c) if c.is_ascii_alphanumeric() || c == '-') {
            self.next_char();
        }
        let word = self.file.source()[start..self.cursor].to_owned();
        let kind = match word.as_str() {
            "@import" => TokenKind::Keyword(Keyword::Import),
            "@charset" => TokenKind::Keyword(Keyword::Charset),
            "@media" => TokenKind::Keyword(Keyword::Media),
            "@page" => TokenKind::Keyword(Keyword::Page),
            "@keyframes" => TokenKind::Keyword(Keyword::Keyframes),
            _ => TokenKind::Literal(word.to_owned()),
        };
        Ok(self.token(start, kind))
    }

    fn number(&mut self, start: usize, negative: bool) -> StyleResult<Token> {
        let digits_at = self.cursor;
        while matches!(self.peek_char(), Some('0'..='9')) {
            self.next_char();
        }
        if self.peek_char() == Some('.') && matches!(self.peek_char_n(1), Some('0'..='9')) {
            self.next_char();
            while matches!(self.peek_char(), Some('0'..='9')) {
                self.next_char();
            }
        }
        let text = &self.file.source()[digits_at..self.cursor];
        let mut value: f64 = text.parse().map_err(|_| {
            self.err(ErrorKind::Lex, "malformed number", self.span_from(start))
        })?;
        if negative {
            value = -value;
        }

        let suffix = if self.eat_char('%') {
            Some(InternedString::get_or_intern("%"))
        } else {
            let suffix_at = self.cursor;
            while matches!(self.peek_char(), Some(c) if c.is_ascii_alphabetic()) {
                self.next_char();
            }
            if self.cursor > suffix_at {
                Some(InternedString::get_or_intern(
                    &self.file.source()[suffix_at..self.cursor],
                ))
            } else {
                None
            }
        };

        Ok(self.token(start, TokenKind::Unit(value, suffix)))
    }

    fn ident(&mut self, start: usize) -> StyleResult<Token> {
        self.next_char();
        while matches!(self.peek_char(), Some(c) if is_ident_char(c)) {
            self.next_char();
        }
        let word = self.file.source()[start..self.cursor].to_owned();

        let kind = match word.as_str() {
            "true" => TokenKind::Boolean(true),
            "false" => TokenKind::Boolean(false),
            "null" => TokenKind::Null,
            "if" => TokenKind::Keyword(Keyword::If),
            "unless" => TokenKind::Keyword(Keyword::Unless),
            "else" => TokenKind::Keyword(Keyword::Else),
            "for" => TokenKind::Keyword(Keyword::For),
            "in" => TokenKind::Keyword(Keyword::In),
            "return" => TokenKind::Keyword(Keyword::Return),
            "not" => TokenKind::Op(Op::Not),
            "and" => TokenKind::Op(Op::And),
            "or" => TokenKind::Op(Op::Or),
            "is" => return self.is_operator(start),
            // the contents of `url(...)` are raw text; `//` in an href
            // must not read as a comment
            "url" if self.peek_char() == Some('(') => return self.url(start),
            _ => {
                let name = InternedString::get_or_intern(&word);
                if self.peek_char() == Some('(') {
                    TokenKind::Function(name)
                } else {
                    TokenKind::Ident(name)
                }
            }
        };
        Ok(self.token(start, kind))
    }

    fn url(&mut self, start: usize) -> StyleResult<Token> {
        self.next_char();
        let mut depth = 1usize;
        let mut quote: Option<char> = None;
        loop {
            match self.next_char() {
                Some(c) if Some(c) == quote => quote = None,
                Some(..) if quote.is_some() => {}
                Some(c @ ('\'' | '"')) => quote = Some(c),
                Some('(') => depth += 1,
                Some(')') => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                Some('\n') | None => {
                    return Err(self.err(
                        ErrorKind::Lex,
                        "unterminated url()",
                        self.span_from(start),
                    ));
                }
                Some(..) => {}
            }
        }
        let text = self.file.source()[start..self.cursor].to_owned();
        Ok(self.token(start, TokenKind::Literal(text)))
    }

    /// `is a` and `is defined` are single multi-word operators.
    fn is_operator(&mut self, start: usize) -> StyleResult<Token> {
        let mut n = 0;
        while matches!(self.peek_char_n(n), Some(' ') | Some('\t')) {
            n += 1;
        }
        let word_at = n;
        while matches!(self.peek_char_n(n), Some(c) if c.is_ascii_alphabetic()) {
            n += 1;
        }

        let mut word = String::new();
        for i in word_at..n {
            match self.peek_char_n(i) {
                Some(c) => word.push(c),
                None => break,
            }
        }

        let op = match word.as_str() {
            "a" => Some(Op::IsA),
            "defined" => Some(Op::IsDefined),
            _ => None,
        };

        match op {
            Some(op) => {
                for _ in 0..n {
                    self.next_char();
                }
                Ok(self.token(start, TokenKind::Op(op)))
            }
            None => Ok(self.token(start, TokenKind::Ident(InternedString::get_or_intern("is")))),
        }
    }

    fn operator(&mut self, start: usize) -> StyleResult<Token> {
        // unwrap is fine, the caller peeked this char
        let c = self.next_char().unwrap();
        let op = match c {
            '?' => {
                if self.eat_char('=') {
                    Op::CondAssign
                } else {
                    Op::Question
                }
            }
            '+' => {
                if self.eat_char('=') {
                    Op::AddAssign
                } else {
                    Op::Plus
                }
            }
            '-' => {
                if self.eat_char('=') {
                    Op::SubAssign
                } else {
                    Op::Minus
                }
            }
            '*' => {
                if self.eat_char('*') {
                    Op::Pow
                } else if self.eat_char('=') {
                    Op::MulAssign
                } else {
                    Op::Mul
                }
            }
            '/' => {
                if self.eat_char('=') {
                    Op::DivAssign
                } else {
                    Op::Div
                }
            }
            '%' => {
                if self.eat_char('=') {
                    Op::RemAssign
                } else {
                    Op::Rem
                }
            }
            '=' => {
                if self.eat_char('=') {
                    Op::Equal
                } else {
                    Op::Assign
                }
            }
            '!' => {
                if self.eat_char('=') {
                    Op::NotEqual
                } else {
                    Op::Bang
                }
            }
            '>' => {
                if self.eat_char('=') {
                    Op::GreaterThanEqual
                } else {
                    Op::GreaterThan
                }
            }
            '<' => {
                if self.eat_char('=') {
                    Op::LessThanEqual
                } else {
                    Op::LessThan
                }
            }
            '&' => {
                if self.eat_char('&') {
                    Op::And
                } else {
                    Op::Amp
                }
            }
            '|' => {
                if self.eat_char('|') {
                    Op::Or
                } else {
                    return Err(self.err(
                        ErrorKind::Lex,
                        "illegal character \"|\"",
                        self.span_from(start),
                    ));
                }
            }
            '.' => {
                self.next_char();
                if self.eat_char('.') {
                    Op::RangeExclusive
                } else {
                    Op::Range
                }
            }
            ':' => Op::Colon,
            '~' => Op::Tilde,
            '[' => Op::OpenBracket,
            ']' => Op::CloseBracket,
            '(' => {
                self.paren_depth += 1;
                Op::OpenParen
            }
            ')' => {
                self.paren_depth = self.paren_depth.saturating_sub(1);
                Op::CloseParen
            }
            '{' => Op::OpenBrace,
            '}' => Op::CloseBrace,
            ',' => Op::Comma,
            ';' => Op::Semicolon,
            _ => {
                return Err(self.err(
                    ErrorKind::Lex,
                    format!("illegal character \"{}\"", c),
                    self.span_from(start),
                ));
            }
        };
        Ok(self.token(start, TokenKind::Op(op)))
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$' || !c.is_ascii()
}

fn is_ident_char(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit() || c == '-'
}

#[cfg(test)]
mod test {
    use codemap::CodeMap;

    use super::{Lexer, TokenKind};

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut map = CodeMap::new();
        let file = map.add_file("test".to_owned(), source.to_owned());
        let mut lexer = Lexer::new(&file);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next().expect("lex failure");
            let done = tok.kind == TokenKind::Eos;
            out.push(tok.kind);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn indents_match_outdents() {
        let toks = kinds("a\n  b\n    c\nd\n");
        let indents = toks.iter().filter(|t| **t == TokenKind::Indent).count();
        let outdents = toks.iter().filter(|t| **t == TokenKind::Outdent).count();
        assert_eq!(indents, outdents);
        assert_eq!(indents, 2);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let toks = kinds("a\n\n\n  b\n");
        assert_eq!(
            toks.iter().filter(|t| **t == TokenKind::Newline).count(),
            0
        );
        assert_eq!(toks.iter().filter(|t| **t == TokenKind::Indent).count(), 1);
    }

    #[test]
    fn mixed_indentation_fails() {
        let mut map = CodeMap::new();
        let file = map.add_file("test".to_owned(), "a\n  b\n\tc\n".to_owned());
        let mut lexer = Lexer::new(&file);
        let mut result = Ok(());
        loop {
            match lexer.next() {
                Ok(tok) if tok.kind == TokenKind::Eos => break,
                Ok(..) => continue,
                Err(e) => {
                    result = Err(e);
                    break;
                }
            }
        }
        assert!(result.is_err());
    }

    #[test]
    fn unit_suffix_is_attached() {
        let toks = kinds("10px");
        assert!(toks
            .iter()
            .any(|t| matches!(t, TokenKind::Unit(v, Some(u)) if *v == 10.0 && u.resolve() == "px")));
    }

    #[test]
    fn function_token_requires_adjacent_paren() {
        let toks = kinds("foo(1)");
        assert!(toks
            .iter()
            .any(|t| matches!(t, TokenKind::Function(name) if name.resolve() == "foo")));

        let toks = kinds("foo (1)");
        assert!(!toks.iter().any(|t| matches!(t, TokenKind::Function(..))));
    }

    #[test]
    fn multi_word_operators() {
        use crate::token::Op;
        let toks = kinds("x is defined");
        assert!(toks.iter().any(|t| *t == TokenKind::Op(Op::IsDefined)));
        let toks = kinds("x is a 'unit'");
        assert!(toks.iter().any(|t| *t == TokenKind::Op(Op::IsA)));
    }

    #[test]
    fn newline_in_parens_is_continuation() {
        let toks = kinds("foo(1,\n    2)");
        assert!(!toks.iter().any(|t| t.is_layout()));
    }
}
