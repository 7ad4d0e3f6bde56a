use std::{
    mem,
    path::{Path, PathBuf},
};

use codemap::{CodeMap, Span};

use crate::{
    ast::{
        Block, Call, Each, Expression, Function, FunctionBody, Group, If, Import, Interpolation,
        Keyframe, Keyframes, Media, Node, Null, Page, Property, Return, Root, Segment, Selector,
        Unit,
    },
    builtin::{CallArgs, GLOBAL_FUNCTIONS},
    color::{Color, NAMED_COLORS},
    common::UnaryOp,
    error::{Error, ErrorKind, StyleResult},
    interner::{keywords, InternedString},
    lexer::Lexer,
    parse::Parser,
    value::Value,
    Options,
};

use super::{bin_op, Frame, Stack};

const MAX_CALL_DEPTH: usize = 200;

/// Whether an invocation yields a value or splices declarations into the
/// caller's block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Mixin,
    Return,
}

/// Tree-walking evaluator. Reduces the parsed AST in place: identifiers
/// resolve, calls dispatch, control flow unrolls, and what remains is
/// directly CSS-emittable.
pub(crate) struct Visitor<'a, 'b> {
    stack: Stack,
    options: &'a Options<'a>,
    map: &'b mut CodeMap,
    /// Directory of the file currently being evaluated, the first
    /// candidate for relative imports
    dir: PathBuf,
    mode: Mode,
    call_depth: usize,
    /// Enclosing block kinds, innermost last; exposed to user code
    /// through the implicit `mixin` local
    block_kinds: Vec<&'static str>,
}

impl<'a, 'b> Visitor<'a, 'b> {
    pub fn new(options: &'a Options<'a>, map: &'b mut CodeMap, filename: &str, span: Span) -> Self {
        let mut visitor = Visitor {
            stack: Stack::new(),
            options,
            map,
            dir: Path::new(filename)
                .parent()
                .map(PathBuf::from)
                .unwrap_or_default(),
            mode: Mode::Mixin,
            call_depth: 0,
            block_kinds: vec!["root"],
        };
        visitor.seed_named_colors(span);
        visitor
    }

    fn seed_named_colors(&mut self, span: Span) {
        for &(name, rgb) in NAMED_COLORS {
            self.stack.define(
                InternedString::get_or_intern(name),
                Node::Color(crate::ast::Rgba {
                    val: Color::from_rgb8(rgb),
                    span,
                }),
            );
        }
    }

    pub fn visit_root(&mut self, root: Root) -> StyleResult<Root> {
        let mut nodes = Vec::new();

        for name in self.options.implicit_imports() {
            let imported = self.import_file(&name, root.span)?;
            if let Node::Block(block) = imported {
                nodes.extend(block.nodes);
            }
        }

        let (evaluated, _) = self.visit_statements(root.nodes)?;
        nodes.extend(evaluated);
        Ok(Root {
            nodes,
            span: root.span,
        })
    }


    fn visit(&mut self, node: Node) -> StyleResult<Node> {
        match node {
            Node::Group(g) => self.visit_group(g),
            Node::Block(b) => self.visit_block(b),
            Node::Property(p) => self.visit_property(p),
            Node::Ident(i) => self.visit_ident(i),
            Node::Expression(e) => self.visit_expression(e),
            Node::BinOp(b) => self.visit_bin_op(b),
            Node::Unary(u) => self.visit_unary(u),
            Node::Ternary(t) => self.visit_ternary(t),
            Node::If(i) => self.visit_if(i),
            Node::Each(e) => self.visit_each(e),
            Node::Function(f) => self.visit_function_decl(f),
            Node::Call(c) => self.visit_call(c),
            Node::Return(r) => self.visit_return(r),
            Node::Import(i) => self.visit_import(i),
            Node::Media(m) => self.visit_media(m),
            Node::Keyframes(k) => self.visit_keyframes(k),
            Node::Page(p) => self.visit_page(p),
            leaf => Ok(leaf),
        }
    }

    /// Evaluate a statement list, splicing block results (mixins, `if`
    /// and `for` bodies) and stopping at the first `return`.
    fn visit_statements(&mut self, stmts: Vec<Node>) -> StyleResult<(Vec<Node>, Option<Return>)> {
        let mut out = Vec::new();
        let mut returned = None;

        'stmts: for stmt in stmts {
            let value = self.visit(stmt)?;
            match value {
                Node::Return(r) => {
                    returned = Some(r);
                    break;
                }
                Node::Block(block) => {
                    for inner in block.nodes {
                        if let Node::Return(r) = inner {
                            returned = Some(r);
                            break 'stmts;
                        }
                        out.push(inner);
                    }
                }
                Node::Null(..) => {}
                other => out.push(other),
            }
        }

        Ok((out, returned))
    }

    fn with_mode<T>(&mut self, mode: Mode, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = mem::replace(&mut self.mode, mode);
        let out = f(self);
        self.mode = saved;
        out
    }

    fn eval_interpolation(&mut self, parts: &Interpolation) -> StyleResult<String> {
        let mut out = String::new();
        for seg in &parts.segments {
            match seg {
                Segment::Text(text) => out.push_str(text),
                Segment::Expr(expr) => {
                    let value = self.with_mode(Mode::Return, |s| s.visit(expr.clone()))?;
                    out.push_str(&value.to_css(false));
                }
            }
        }
        Ok(out)
    }


    fn visit_group(&mut self, group: Group) -> StyleResult<Node> {
        let mut selectors = Vec::with_capacity(group.selectors.len());
        for sel in group.selectors {
            let text = self.eval_interpolation(&sel.parts)?;
            selectors.push(Selector {
                parts: Interpolation::of_text(text, sel.parts.span),
                span: sel.span,
            });
        }

        self.stack.push(Frame::new("group"));
        self.block_kinds.push("group");
        let result = self.visit_statements(group.block.nodes);
        self.block_kinds.pop();
        self.stack.pop();
        let (nodes, _) = result?;

        Ok(Node::Group(Group {
            selectors,
            block: Block {
                nodes,
                scope: true,
                span: group.block.span,
            },
            span: group.span,
        }))
    }

    fn visit_block(&mut self, block: Block) -> StyleResult<Node> {
        if block.scope {
            self.stack.push(Frame::new("block"));
        }
        let result = self.visit_statements(block.nodes);
        if block.scope {
            self.stack.pop();
        }
        let (mut nodes, returned) = result?;
        if let Some(r) = returned {
            nodes.push(Node::Return(r));
        }
        Ok(Node::Block(Block {
            nodes,
            scope: false,
            span: block.span,
        }))
    }

    fn visit_property(&mut self, prop: Property) -> StyleResult<Node> {
        if prop.literal {
            return Ok(Node::Property(prop));
        }

        let name = self.eval_interpolation(&prop.name)?;
        let interned = InternedString::get_or_intern(&name);

        // a property whose name is a user function is a mixin call
        let is_mixin_call = matches!(
            self.stack.lookup(interned).map(Node::first),
            Some(Node::Function(f)) if matches!(f.body, FunctionBody::UserDefined(..))
        );
        if is_mixin_call {
            let args = match prop.expr {
                Some(e) => match *e {
                    Node::Expression(ex) if ex.is_list => ex.nodes,
                    other => vec![other],
                },
                None => Vec::new(),
            };
            return self.visit_call(Call {
                name: interned,
                args,
                span: prop.span,
            });
        }

        let expr = match prop.expr {
            Some(e) => Some(Box::new(self.with_mode(Mode::Return, |s| s.visit(*e))?)),
            None => return Ok(Node::Null(Null { span: prop.span })),
        };

        Ok(Node::Property(Property {
            name: Interpolation::of_text(name, prop.name.span),
            expr,
            literal: true,
            span: prop.span,
        }))
    }


    fn visit_ident(&mut self, ident: crate::ast::Ident) -> StyleResult<Node> {
        match ident.val {
            Some(rhs) => {
                let value = self.with_mode(Mode::Return, |s| s.visit(*rhs))?;
                self.stack.define(ident.name, value.clone());
                Ok(value)
            }
            None => match self.stack.lookup(ident.name) {
                Some(value) => Ok(value.clone()),
                // unknown names pass through to the CSS
                None => Ok(Node::Ident(ident)),
            },
        }
    }


    fn visit_expression(&mut self, mut expr: Expression) -> StyleResult<Node> {
        if expr.nodes.len() == 1 {
            return self.visit(expr.nodes.remove(0));
        }
        let nodes = self.with_mode(Mode::Return, |s| {
            expr.nodes
                .into_iter()
                .map(|n| s.visit(n))
                .collect::<StyleResult<Vec<_>>>()
        })?;
        Ok(Node::Expression(Expression {
            nodes,
            is_list: expr.is_list,
            parens: expr.parens,
            span: expr.span,
        }))
    }

    fn visit_bin_op(&mut self, node: crate::ast::BinOp) -> StyleResult<Node> {
        use crate::common::BinaryOp;

        let span = node.span;
        let lhs = self.with_mode(Mode::Return, |s| s.visit(*node.lhs))?;
        let rhs = self.with_mode(Mode::Return, |s| s.visit(*node.rhs))?;

        // a bare property slash stays a slash
        if node.literal_slash && node.op == BinaryOp::Div {
            return Ok(Node::BinOp(crate::ast::BinOp {
                op: node.op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                literal_slash: true,
                span,
            }));
        }

        // membership and indexing need the whole right/left expression
        let (lhs, rhs) = match node.op {
            BinaryOp::In | BinaryOp::Subscript => (lhs, rhs),
            _ => (lhs.into_first(), rhs.into_first()),
        };

        bin_op::operate(node.op, &lhs, &rhs, span)
    }

    fn visit_unary(&mut self, node: crate::ast::Unary) -> StyleResult<Node> {
        let span = node.span;
        match node.op {
            // checks scope membership without evaluating the operand
            UnaryOp::IsDefined => match node.operand.first() {
                Node::Ident(i) => Ok(Node::Boolean(crate::ast::Boolean {
                    val: self.stack.is_defined(i.name),
                    span,
                })),
                other => Err(Error::raw(
                    ErrorKind::Type,
                    format!(
                        "\"is defined\" requires a variable name, got {}",
                        other.node_name()
                    ),
                    span,
                )),
            },
            UnaryOp::Not => {
                let value = self.with_mode(Mode::Return, |s| s.visit(*node.operand))?;
                Ok(Node::Boolean(crate::ast::Boolean {
                    val: !value.to_boolean(),
                    span,
                }))
            }
            UnaryOp::Minus => {
                let value = self
                    .with_mode(Mode::Return, |s| s.visit(*node.operand))?
                    .into_first();
                match value {
                    Node::Unit(u) => Ok(Node::Unit(Unit {
                        val: -u.val,
                        suffix: u.suffix,
                        span,
                    })),
                    other => Ok(Node::Literal(crate::ast::Literal {
                        text: format!("-{}", other.to_css(false)),
                        span,
                    })),
                }
            }
            UnaryOp::Plus => {
                let value = self.with_mode(Mode::Return, |s| s.visit(*node.operand))?;
                Ok(value.into_first())
            }
            UnaryOp::Tilde => {
                let value = self.with_mode(Mode::Return, |s| s.visit(*node.operand))?;
                Ok(Node::Literal(crate::ast::Literal {
                    text: format!("~{}", value.to_css(false)),
                    span,
                }))
            }
        }
    }

    fn visit_ternary(&mut self, node: crate::ast::Ternary) -> StyleResult<Node> {
        let cond = self.with_mode(Mode::Return, |s| s.visit(*node.cond))?;
        let branch = if cond.to_boolean() {
            *node.yes
        } else {
            *node.no
        };
        self.with_mode(Mode::Return, |s| s.visit(branch))
    }


    fn visit_if(&mut self, node: If) -> StyleResult<Node> {
        let cond = self.with_mode(Mode::Return, |s| s.visit(*node.cond))?;
        let mut truthy = cond.to_boolean();
        if node.negate {
            truthy = !truthy;
        }

        let mut chosen = if truthy { Some(node.block) } else { None };
        if chosen.is_none() {
            for clause in node.elses {
                match clause.cond {
                    Some(c) => {
                        let v = self.with_mode(Mode::Return, |s| s.visit(*c))?;
                        if v.to_boolean() {
                            chosen = Some(clause.block);
                            break;
                        }
                    }
                    None => {
                        chosen = Some(clause.block);
                        break;
                    }
                }
            }
        }

        match chosen {
            Some(block) => {
                // if-bodies share the enclosing frame
                let (mut nodes, returned) = self.visit_statements(block.nodes)?;
                if let Some(r) = returned {
                    nodes.push(Node::Return(r));
                }
                Ok(Node::Block(Block {
                    nodes,
                    scope: false,
                    span: node.span,
                }))
            }
            None => Ok(Node::Null(Null { span: node.span })),
        }
    }

    fn visit_each(&mut self, node: Each) -> StyleResult<Node> {
        let iterable = self.with_mode(Mode::Return, |s| s.visit(*node.expr))?;
        let items = iterable.into_items();

        let key = node
            .key
            .unwrap_or_else(keywords::index);

        let mut out = Vec::new();
        for (i, item) in items.into_iter().enumerate() {
            self.stack.define(node.val, item);
            self.stack.define(
                key,
                Node::Unit(Unit {
                    val: i as f64,
                    suffix: None,
                    span: node.span,
                }),
            );

            let body = node.block.clone();
            let (nodes, returned) = self.visit_statements(body.nodes)?;
            out.extend(nodes);
            if let Some(r) = returned {
                out.push(Node::Return(r));
                break;
            }
        }

        Ok(Node::Block(Block {
            nodes: out,
            scope: false,
            span: node.span,
        }))
    }

    fn visit_return(&mut self, node: Return) -> StyleResult<Node> {
        let expr = match node.expr {
            Some(e) => Some(Box::new(self.with_mode(Mode::Return, |s| s.visit(*e))?)),
            None => None,
        };
        Ok(Node::Return(Return {
            expr,
            span: node.span,
        }))
    }


    fn visit_function_decl(&mut self, func: Function) -> StyleResult<Node> {
        let span = func.span;
        if self.options.warnings_enabled() {
            let plain = func.name.resolve();
            if GLOBAL_FUNCTIONS.contains_key(&plain) {
                eprintln!("Warning: user function {}() shadows a built-in", plain);
            } else if matches!(
                self.stack.current().scope.lookup(func.name),
                Some(Node::Function(..))
            ) {
                eprintln!("Warning: function {}() redefined in the same scope", plain);
            }
        }
        self.stack.define(func.name, Node::Function(func));
        Ok(Node::Null(Null { span }))
    }

    fn visit_call(&mut self, call: Call) -> StyleResult<Node> {
        if self.call_depth >= MAX_CALL_DEPTH {
            return Err(Error::raw(
                ErrorKind::StackOverflow,
                format!("maximum call depth reached while calling {}()", call.name),
                call.span,
            ));
        }

        let target = self
            .stack
            .lookup(call.name)
            .cloned()
            .map(Node::into_first);
        let func = match target {
            Some(Node::Function(f)) => Some(f),
            _ => {
                let plain = call.name.resolve();
                match self.options.function_raw(&plain) {
                    Some(raw) => Some(native_stub(call.name, raw, call.span)),
                    None => GLOBAL_FUNCTIONS
                        .get(&plain)
                        .map(|b| native_stub(call.name, b.raw, call.span)),
                }
            }
        };

        let func = match func {
            Some(f) => f,
            None => return self.literal_call(call),
        };

        let label = self.frame_label(call.name, call.span);
        self.call_depth += 1;
        let result = match &func.body {
            FunctionBody::UserDefined(..) => self.invoke_user(&func, call.args, call.span),
            FunctionBody::Native { raw } => {
                self.invoke_native(call.name, *raw, call.args, call.span)
            }
        };
        self.call_depth -= 1;

        result.map_err(|mut e| {
            e.push_trace(label);
            e
        })
    }

    /// Unknown call targets are emitted verbatim as CSS function syntax,
    /// e.g. `clamp(1rem, 2vw, 3rem)`.
    fn literal_call(&mut self, call: Call) -> StyleResult<Node> {
        let args = self.with_mode(Mode::Return, |s| {
            call.args
                .into_iter()
                .map(|a| s.visit(a))
                .collect::<StyleResult<Vec<_>>>()
        })?;
        Ok(Node::Call(Call {
            name: call.name,
            args,
            span: call.span,
        }))
    }

    fn invoke_user(&mut self, func: &Function, args: Vec<Node>, span: Span) -> StyleResult<Node> {
        let return_mode = self.mode == Mode::Return;
        let evaled = self.with_mode(Mode::Return, |s| {
            args.into_iter()
                .map(|a| s.visit(a))
                .collect::<StyleResult<Vec<_>>>()
        })?;

        // the body is cloned so one call cannot leak mutation into the next
        let body = match &func.body {
            FunctionBody::UserDefined(b) => b.clone(),
            FunctionBody::Native { .. } => unreachable!("native bodies take the other path"),
        };

        self.stack
            .push(Frame::with_context("function", func.name, span));

        for (i, param) in func.params.list.iter().enumerate() {
            if param.rest {
                let rest = evaled.get(i..).unwrap_or(&[]).to_vec();
                self.stack.define(
                    param.name,
                    Node::Expression(Expression {
                        nodes: rest,
                        is_list: true,
                        parens: false,
                        span,
                    }),
                );
                continue;
            }
            let bound = match evaled.get(i) {
                Some(v) if !v.is_null() => v.clone(),
                _ => match &param.default {
                    Some(d) => self.with_mode(Mode::Return, |s| s.visit(d.clone()))?,
                    None => {
                        return Err(Error::raw(
                            ErrorKind::MissingArgument,
                            format!("argument \"{}\" required for {}()", param.name, func.name),
                            span,
                        ));
                    }
                },
            };
            self.stack.define(param.name, bound);
        }

        let arguments = keywords::arguments();
        self.stack.define(
            arguments,
            Node::Expression(Expression {
                nodes: evaled,
                is_list: true,
                parens: false,
                span,
            }),
        );

        // user code can tell mixin context from expression context
        let mixin = keywords::mixin();
        let mixin_val = if return_mode {
            Node::Boolean(crate::ast::Boolean { val: false, span })
        } else {
            Node::Literal(crate::ast::Literal {
                // unwrap is fine, "root" is never popped
                text: (*self.block_kinds.last().unwrap()).to_owned(),
                span,
            })
        };
        self.stack.define(mixin, mixin_val);

        let (nodes, returned) =
            self.with_mode(Mode::Mixin, |s| s.visit_statements(body.nodes))?;
        self.stack.pop();

        if return_mode {
            if let Some(r) = returned {
                return Ok(r.expr.map_or(Node::Null(Null { span }), |e| *e));
            }
            Ok(nodes
                .into_iter()
                .last()
                .unwrap_or(Node::Null(Null { span })))
        } else {
            // a return in mixin mode just stops the splice
            Ok(Node::Block(Block {
                nodes,
                scope: false,
                span,
            }))
        }
    }

    fn invoke_native(
        &mut self,
        name: InternedString,
        raw: bool,
        args: Vec<Node>,
        span: Span,
    ) -> StyleResult<Node> {
        let evaled = self.with_mode(Mode::Return, |s| {
            args.into_iter()
                .map(|a| s.visit(a))
                .collect::<StyleResult<Vec<_>>>()
        })?;
        let prepared: Vec<Node> = if raw {
            evaled
        } else {
            evaled.iter().map(|a| a.first().clone()).collect()
        };

        let plain = name.resolve();
        if let Some(host) = self.options.get_function(&plain) {
            let values: Vec<Value> = prepared.iter().map(Value::from_node).collect();
            return match host(&values) {
                Ok(v) => Ok(v.into_node(span)),
                Err(message) => Err(Error::raw(
                    ErrorKind::HostFunction,
                    format!("{}(): {}", plain, message),
                    span,
                )),
            };
        }

        match GLOBAL_FUNCTIONS.get(&plain) {
            Some(builtin) => {
                let mut call_args = CallArgs {
                    args: prepared,
                    name: plain,
                    span,
                };
                (builtin.func)(&mut call_args, self)
            }
            None => Ok(Node::Call(Call {
                name,
                args: prepared,
                span,
            })),
        }
    }


    fn visit_import(&mut self, node: Import) -> StyleResult<Node> {
        let span = node.span;
        let path = self
            .with_mode(Mode::Return, |s| s.visit(*node.path))?
            .into_first();

        let name = match &path {
            Node::Str(s) => s.val.clone(),
            Node::Ident(i) => i.name.resolve(),
            Node::Literal(l) => l.text.clone(),
            other => {
                return Err(Error::raw(
                    ErrorKind::Type,
                    format!("@import expects a string, got {}", other.node_name()),
                    span,
                ));
            }
        };

        // plain CSS imports pass through untouched
        if name.ends_with(".css")
            || name.starts_with("http://")
            || name.starts_with("https://")
            || name.starts_with("url(")
        {
            return Ok(Node::Import(Import {
                path: Box::new(path),
                span,
            }));
        }

        self.import_file(&name, span)
    }

    /// Locate, parse and evaluate an imported file; its statements splice
    /// in at the import site, depth first.
    fn import_file(&mut self, name: &str, span: Span) -> StyleResult<Node> {
        let path = match self.resolve_import(name) {
            Some(path) => path,
            None => {
                return Err(Error::raw(
                    ErrorKind::Import,
                    format!("failed to locate @import file \"{}\"", name),
                    span,
                ));
            }
        };

        let bytes = self.options.filesystem().read(&path).map_err(|e| {
            Error::raw(
                ErrorKind::Import,
                format!("failed to read \"{}\": {}", path.display(), e),
                span,
            )
        })?;
        let contents = String::from_utf8(bytes)?;

        let file = self.map.add_file(path.display().to_string(), contents);
        let lexer = Lexer::new(&file);
        let root = Parser::new(lexer).parse()?;

        let parent = path.parent().map(PathBuf::from).unwrap_or_default();
        let saved = mem::replace(&mut self.dir, parent);
        let result = self.visit_statements(root.nodes);
        self.dir = saved;
        let (nodes, _) = result?;

        Ok(Node::Block(Block {
            nodes,
            scope: false,
            span,
        }))
    }

    fn resolve_import(&self, name: &str) -> Option<PathBuf> {
        let mut dirs = vec![self.dir.clone()];
        dirs.extend(self.options.paths().iter().cloned());

        for dir in dirs {
            for candidate in [dir.join(name), dir.join(format!("{}.styl", name))] {
                if self.options.filesystem().is_file(&candidate) {
                    return Some(candidate);
                }
            }
        }
        None
    }

    fn visit_media(&mut self, node: Media) -> StyleResult<Node> {
        self.stack.push(Frame::new("media"));
        self.block_kinds.push("media");
        let result = self.visit_statements(node.block.nodes);
        self.block_kinds.pop();
        self.stack.pop();
        let (nodes, _) = result?;

        Ok(Node::Media(Media {
            query: node.query,
            block: Block {
                nodes,
                scope: true,
                span: node.block.span,
            },
            span: node.span,
        }))
    }

    fn visit_keyframes(&mut self, node: Keyframes) -> StyleResult<Node> {
        let name = self.eval_interpolation(&node.name)?;

        let mut frames = Vec::with_capacity(node.frames.len());
        for frame in node.frames {
            self.stack.push(Frame::new("keyframes"));
            self.block_kinds.push("keyframes");
            let result = self.visit_statements(frame.block.nodes);
            self.block_kinds.pop();
            self.stack.pop();
            let (nodes, _) = result?;
            frames.push(Keyframe {
                positions: frame.positions,
                block: Block {
                    nodes,
                    scope: true,
                    span: frame.block.span,
                },
            });
        }

        Ok(Node::Keyframes(Keyframes {
            name: Interpolation::of_text(name, node.name.span),
            frames,
            span: node.span,
        }))
    }

    fn visit_page(&mut self, node: Page) -> StyleResult<Node> {
        self.stack.push(Frame::new("page"));
        self.block_kinds.push("page");
        let result = self.visit_statements(node.block.nodes);
        self.block_kinds.pop();
        self.stack.pop();
        let (nodes, _) = result?;

        Ok(Node::Page(Page {
            selector: node.selector,
            block: Block {
                nodes,
                scope: true,
                span: node.block.span,
            },
            span: node.span,
        }))
    }


    fn frame_label(&self, name: InternedString, span: Span) -> String {
        let loc = self.map.look_up_span(span);
        format!("{}() ({}:{})", name, loc.file.name(), loc.begin.line + 1)
    }
}

fn native_stub(name: InternedString, raw: bool, span: Span) -> Function {
    Function {
        name,
        params: crate::ast::Params { list: Vec::new() },
        body: FunctionBody::Native { raw },
        span,
    }
}
