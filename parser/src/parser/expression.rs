//! Expression parsing: precedence climbing over binary/logical operators,
//! unary/postfix handling, and the two cover grammars (parenthesized
//! expression vs. arrow parameter list; object/array literal vs. pattern).

use esparse_ast::node::*;
use esparse_ast::{DestructuringErrors, ScopeFlags, TokenKind, TokenValue};
use esparse_errors::{ParserError, Result};
use esparse_span::{BytePos, Span, Symbol};

use super::Parser;

/// Binding power for left-associative binary operators; `**` is handled
/// separately since it's right-associative. Ties with `??`/`||`/`&&`
/// forbidden adjacency is enforced at the logical-OR layer.
fn op_text(value: &TokenValue) -> &'static str {
    match value {
        TokenValue::Op(s) => s,
        _ => "",
    }
}

fn binop_precedence(kind: TokenKind, value: &TokenValue) -> Option<(u8, BinKind)> {
    use BinKind::*;
    Some(match kind {
        TokenKind::LogicalOr => (1, Logical(LogicalOp::Or)),
        TokenKind::Nullish => (1, Logical(LogicalOp::Nullish)),
        TokenKind::LogicalAnd => (2, Logical(LogicalOp::And)),
        TokenKind::BitwiseOr => (3, Binary(BinaryOp::BitwiseOr)),
        TokenKind::BitwiseXor => (4, Binary(BinaryOp::BitwiseXor)),
        TokenKind::BitwiseAnd => (5, Binary(BinaryOp::BitwiseAnd)),
        TokenKind::Equality => {
            let op = match op_text(value) {
                "==" => BinaryOp::Equal,
                "!=" => BinaryOp::NotEqual,
                "===" => BinaryOp::StrictEqual,
                "!==" => BinaryOp::StrictNotEqual,
                _ => return None,
            };
            (6, Binary(op))
        }
        TokenKind::Relational => {
            let op = match op_text(value) {
                "<" => BinaryOp::Less,
                ">" => BinaryOp::Greater,
                "<=" => BinaryOp::LessEqual,
                ">=" => BinaryOp::GreaterEqual,
                _ => return None,
            };
            (7, Binary(op))
        }
        TokenKind::In => (7, Binary(BinaryOp::In)),
        TokenKind::InstanceOf => (7, Binary(BinaryOp::InstanceOf)),
        TokenKind::BitShift => {
            let op = match op_text(value) {
                "<<" => BinaryOp::ShiftLeft,
                ">>" => BinaryOp::ShiftRight,
                ">>>" => BinaryOp::UnsignedShiftRight,
                _ => return None,
            };
            (8, Binary(op))
        }
        TokenKind::PlusMin => {
            let op = match op_text(value) {
                "+" => BinaryOp::Add,
                "-" => BinaryOp::Sub,
                _ => return None,
            };
            (9, Binary(op))
        }
        TokenKind::Star => (10, Binary(BinaryOp::Mul)),
        TokenKind::Slash => (10, Binary(BinaryOp::Div)),
        TokenKind::Modulo => (10, Binary(BinaryOp::Mod)),
        _ => return None,
    })
}

enum BinKind {
    Binary(BinaryOp),
    Logical(LogicalOp),
}

/// A snapshot of every piece of mutable parser/tokenizer state that
/// `bump` touches, used to backtrack out of a cover-grammar guess (the
/// `async` arrow-function lookahead, the `static`/`get`/`set` contextual
/// keyword peek).
struct ParserSnapshot {
    pos: usize,
    context: crate::tokenizer::Context,
    token: esparse_ast::Token,
    prev_token: esparse_ast::Token,
}

impl<'a> Parser<'a> {
    pub(crate) fn parse_expression(&mut self) -> Result<Expr> {
        let lo = self.start_span();
        let first = self.parse_assignment_expression()?;
        if self.check(TokenKind::Comma) {
            let mut expressions = vec![first];
            while self.eat(TokenKind::Comma)? {
                expressions.push(self.parse_assignment_expression()?);
            }
            Ok(Expr::SequenceExpression { span: self.span_from(lo), expressions })
        } else {
            Ok(first)
        }
    }

    /// Parses an `Expression` with `in` disabled at the top level -- the
    /// grammar a `for(...)` head's init clause uses, so `for (a in b in c)`
    /// can't swallow the statement's own `in` separator.
    pub(crate) fn parse_expression_no_in(&mut self) -> Result<Expr> {
        let prev = self.no_in;
        self.no_in = true;
        let result = self.parse_expression();
        self.no_in = prev;
        result
    }

    pub(crate) fn parse_assignment_expression_no_in(&mut self) -> Result<Expr> {
        let prev = self.no_in;
        self.no_in = true;
        let result = self.parse_assignment_expression();
        self.no_in = prev;
        result
    }

    pub(crate) fn parse_assignment_expression(&mut self) -> Result<Expr> {
        let mut errors = DestructuringErrors::new();
        let result = self.parse_assignment_expression_inner(&mut errors)?;
        self.check_expression_errors(&errors)?;
        Ok(result)
    }

    /// Same grammar as [`Self::parse_assignment_expression`], but leaves the
    /// final destructuring-error check to the caller. Used by
    /// [`Self::parse_paren_expr_list`], whose elements may yet be
    /// reinterpreted as arrow parameters -- a shorthand default like `{a =
    /// 1}` is only an error when the parens turn out NOT to cover an arrow
    /// parameter list.
    fn parse_assignment_expression_inner(&mut self, errors: &mut DestructuringErrors) -> Result<Expr> {
        if self.is_contextual("yield") && self.in_generator() {
            return self.parse_yield_expression();
        }

        let lo = self.start_span();
        let left = self.parse_conditional_expression(errors)?;

        if let Some(op) = self.assign_op() {
            self.bump()?;
            let target = self.to_assignment_target(left, errors)?;
            let right = self.parse_assignment_expression()?;
            return Ok(Expr::AssignmentExpression {
                span: self.span_from(lo),
                operator: op,
                left: Box::new(target),
                right: Box::new(right),
            });
        }

        Ok(left)
    }

    fn assign_op(&self) -> Option<AssignOp> {
        match self.token.kind {
            TokenKind::Eq => Some(AssignOp::Assign),
            TokenKind::Assign => Some(self.compound_assign_op()),
            _ => None,
        }
    }

    /// The lexer folds every compound assignment into one `Assign` token
    /// kind, carrying the operator text on `TokenValue::Op`.
    fn compound_assign_op(&self) -> AssignOp {
        match op_text(&self.token.value) {
            "+=" => AssignOp::AddAssign,
            "-=" => AssignOp::SubAssign,
            "*=" => AssignOp::MulAssign,
            "/=" => AssignOp::DivAssign,
            "%=" => AssignOp::ModAssign,
            "**=" => AssignOp::PowAssign,
            "<<=" => AssignOp::ShiftLeftAssign,
            ">>=" => AssignOp::ShiftRightAssign,
            ">>>=" => AssignOp::UnsignedShiftRightAssign,
            "&=" => AssignOp::BitwiseAndAssign,
            "|=" => AssignOp::BitwiseOrAssign,
            "^=" => AssignOp::BitwiseXorAssign,
            "&&=" => AssignOp::LogicalAndAssign,
            "||=" => AssignOp::LogicalOrAssign,
            "??=" => AssignOp::NullishAssign,
            _ => AssignOp::AddAssign,
        }
    }

    fn to_assignment_target(&mut self, expr: Expr, errors: &DestructuringErrors) -> Result<PatternOrExpr> {
        match &expr {
            Expr::Identifier(_) | Expr::MemberExpression { .. } => {
                self.check_lval_simple(&expr)?;
                Ok(PatternOrExpr::Expr(expr))
            }
            Expr::ObjectExpression { .. } | Expr::ArrayExpression { .. } | Expr::AssignmentExpression { .. } => {
                let pattern = self.to_assignable(expr)?;
                self.check_lval_pattern(&pattern)?;
                Ok(PatternOrExpr::Pattern(pattern))
            }
            Expr::ParenthesizedExpression { expression, .. } => self.to_assignment_target(*expression.clone(), errors),
            _ => Err(ParserError::InvalidAssignmentTarget { span: expr.span() }.into()),
        }
    }

    fn check_expression_errors(&self, errors: &DestructuringErrors) -> Result<()> {
        if let Some(offset) = errors.parenthesized_assign.or(errors.shorthand_assign) {
            let span = Span::new(BytePos(offset), BytePos(offset));
            return Err(ParserError::InvalidAssignmentTarget { span }.into());
        }
        Ok(())
    }

    fn parse_yield_expression(&mut self) -> Result<Expr> {
        let lo = self.start_span();
        self.bump()?; // 'yield'
        if self.yield_pos.is_none() {
            self.yield_pos = Some(lo.to_usize() as u32);
        }
        let delegate = self.eat(TokenKind::Star)?;
        let argument = if self.can_insert_semicolon()
            || matches!(self.token.kind, TokenKind::ParenR | TokenKind::BracketR | TokenKind::BraceR | TokenKind::Comma | TokenKind::Colon | TokenKind::Semi)
        {
            None
        } else {
            Some(Box::new(self.parse_assignment_expression()?))
        };
        Ok(Expr::YieldExpression { span: self.span_from(lo), argument, delegate })
    }

    fn parse_conditional_expression(&mut self, errors: &mut DestructuringErrors) -> Result<Expr> {
        let lo = self.start_span();
        let test = self.parse_binary_expression(1, errors)?;
        if self.eat(TokenKind::Question)? {
            let consequent = self.parse_assignment_expression()?;
            self.expect(TokenKind::Colon)?;
            let alternate = self.parse_assignment_expression()?;
            return Ok(Expr::ConditionalExpression {
                span: self.span_from(lo),
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            });
        }
        Ok(test)
    }

    fn parse_binary_expression(&mut self, min_prec: u8, errors: &mut DestructuringErrors) -> Result<Expr> {
        let lo = self.start_span();
        let mut left = self.parse_exponential_expression(errors)?;
        loop {
            let Some((prec, kind)) = binop_precedence(self.token.kind, &self.token.value) else { break };
            if prec < min_prec {
                break;
            }
            if self.token.kind == TokenKind::In && self.no_in {
                break;
            }
            self.bump()?;
            let right = self.parse_binary_expression(prec + 1, errors)?;
            left = match kind {
                BinKind::Binary(op) => Expr::BinaryExpression {
                    span: self.span_from(lo),
                    operator: op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                BinKind::Logical(op) => Expr::LogicalExpression {
                    span: self.span_from(lo),
                    operator: op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
            };
        }
        Ok(left)
    }

    fn parse_exponential_expression(&mut self, errors: &mut DestructuringErrors) -> Result<Expr> {
        let lo = self.start_span();
        let left = self.parse_unary_expression(errors)?;
        if self.check(TokenKind::StarStar) {
            if matches!(left, Expr::UnaryExpression { prefix: true, .. }) {
                return Err(ParserError::Unexpected {
                    found: "**".to_owned(),
                    expected: "parenthesized unary expression".to_owned(),
                    span: self.token.span,
                }
                .into());
            }
            self.bump()?;
            let right = self.parse_exponential_expression(errors)?;
            return Ok(Expr::BinaryExpression {
                span: self.span_from(lo),
                operator: BinaryOp::Pow,
                left: Box::new(left),
                right: Box::new(right),
            });
        }
        Ok(left)
    }

    fn parse_unary_expression(&mut self, errors: &mut DestructuringErrors) -> Result<Expr> {
        let lo = self.start_span();
        match self.token.kind {
            TokenKind::PlusMin | TokenKind::Prefix | TokenKind::Typeof | TokenKind::Void | TokenKind::Delete => {
                let op = self.unary_op();
                self.bump()?;
                let argument = self.parse_unary_expression(errors)?;
                if matches!(op, UnaryOp::Delete) && self.strict {
                    if matches!(argument, Expr::Identifier(_)) {
                        self.emit_recoverable(ParserError::StrictDelete { span: self.span_from(lo) });
                    }
                }
                Ok(Expr::UnaryExpression {
                    span: self.span_from(lo),
                    operator: op,
                    prefix: true,
                    argument: Box::new(argument),
                })
            }
            TokenKind::IncDec => {
                let operator = if op_text(&self.token.value) == "--" { UpdateOp::Decrement } else { UpdateOp::Increment };
                self.bump()?;
                let argument = self.parse_unary_expression(errors)?;
                Ok(Expr::UpdateExpression {
                    span: self.span_from(lo),
                    operator,
                    prefix: true,
                    argument: Box::new(argument),
                })
            }
            _ if self.is_contextual("await") && (self.in_async() || self.options_allow_await_outside_function()) => {
                self.bump()?;
                if self.await_pos.is_none() {
                    self.await_pos = Some(lo.to_usize() as u32);
                }
                let argument = self.parse_unary_expression(errors)?;
                Ok(Expr::AwaitExpression { span: self.span_from(lo), argument: Box::new(argument) })
            }
            _ => self.parse_postfix_expression(errors),
        }
    }

    fn options_allow_await_outside_function(&self) -> bool {
        self.options.allow_await_outside_function
    }

    fn unary_op(&self) -> UnaryOp {
        match self.token.kind {
            TokenKind::Typeof => UnaryOp::Typeof,
            TokenKind::Void => UnaryOp::Void,
            TokenKind::Delete => UnaryOp::Delete,
            TokenKind::Prefix => match op_text(&self.token.value) {
                "~" => UnaryOp::BitwiseNot,
                _ => UnaryOp::Not,
            },
            TokenKind::PlusMin => match op_text(&self.token.value) {
                "-" => UnaryOp::Minus,
                _ => UnaryOp::Plus,
            },
            _ => UnaryOp::Minus,
        }
    }

    fn parse_postfix_expression(&mut self, errors: &mut DestructuringErrors) -> Result<Expr> {
        let lo = self.start_span();
        let expr = self.parse_call_expression(errors)?;
        if matches!(self.token.kind, TokenKind::IncDec) && !self.token.preceded_by_newline {
            let operator = if op_text(&self.token.value) == "--" { UpdateOp::Decrement } else { UpdateOp::Increment };
            self.bump()?;
            return Ok(Expr::UpdateExpression {
                span: self.span_from(lo),
                operator,
                prefix: false,
                argument: Box::new(expr),
            });
        }
        Ok(expr)
    }

    fn parse_call_expression(&mut self, errors: &mut DestructuringErrors) -> Result<Expr> {
        let lo = self.start_span();
        let mut base = if self.check(TokenKind::New) {
            self.parse_new_expression()?
        } else {
            self.parse_primary_expression(errors)?
        };
        let mut saw_optional = false;
        loop {
            if self.eat(TokenKind::Dot)? {
                let prop = self.parse_ident_name()?;
                base = Expr::MemberExpression {
                    span: self.span_from(lo),
                    object: Box::new(base),
                    property: Box::new(Expr::Identifier(prop)),
                    computed: false,
                    optional: false,
                };
            } else if self.eat(TokenKind::QuestionDot)? {
                saw_optional = true;
                if self.eat(TokenKind::ParenL)? {
                    let args = self.parse_call_arguments()?;
                    base = Expr::CallExpression { span: self.span_from(lo), callee: Box::new(base), arguments: args, optional: true };
                } else if self.eat(TokenKind::BracketL)? {
                    let prop = self.parse_expression()?;
                    self.expect(TokenKind::BracketR)?;
                    base = Expr::MemberExpression {
                        span: self.span_from(lo),
                        object: Box::new(base),
                        property: Box::new(prop),
                        computed: true,
                        optional: true,
                    };
                } else {
                    let prop = self.parse_ident_name()?;
                    base = Expr::MemberExpression {
                        span: self.span_from(lo),
                        object: Box::new(base),
                        property: Box::new(Expr::Identifier(prop)),
                        computed: false,
                        optional: true,
                    };
                }
            } else if self.eat(TokenKind::BracketL)? {
                let prop = self.parse_expression()?;
                self.expect(TokenKind::BracketR)?;
                base = Expr::MemberExpression {
                    span: self.span_from(lo),
                    object: Box::new(base),
                    property: Box::new(prop),
                    computed: true,
                    optional: false,
                };
            } else if self.check(TokenKind::ParenL) {
                let args = self.parse_call_arguments()?;
                base = Expr::CallExpression { span: self.span_from(lo), callee: Box::new(base), arguments: args, optional: false };
            } else if self.check(TokenKind::BackQuote) {
                if saw_optional {
                    return Err(ParserError::OptionalChainTaggedTemplate { span: self.token.span }.into());
                }
                let quasi = self.parse_template_literal(true)?;
                base = Expr::TaggedTemplateExpression { span: self.span_from(lo), tag: Box::new(base), quasi };
            } else {
                break;
            }
        }
        if saw_optional {
            base = Expr::ChainExpression { span: base.span(), expression: Box::new(base) };
        }
        Ok(base)
    }

    fn parse_call_arguments(&mut self) -> Result<Vec<Expr>> {
        self.expect(TokenKind::ParenL)?;
        let mut args = Vec::new();
        while !self.check(TokenKind::ParenR) {
            if self.eat(TokenKind::Ellipsis)? {
                let arg_lo = self.prev_token.span.lo;
                let argument = self.parse_assignment_expression()?;
                args.push(Expr::SpreadElement { span: self.span_from(arg_lo), argument: Box::new(argument) });
            } else {
                args.push(self.parse_assignment_expression()?);
            }
            if !self.eat(TokenKind::Comma)? {
                break;
            }
        }
        self.expect(TokenKind::ParenR)?;
        Ok(args)
    }

    fn parse_new_expression(&mut self) -> Result<Expr> {
        let lo = self.start_span();
        self.bump()?; // 'new'
        if self.eat(TokenKind::Dot)? {
            let prop = self.parse_ident_name()?;
            if prop.name.as_str() != "target" {
                return Err(ParserError::InvalidNewTarget { span: prop.span }.into());
            }
            if !self.in_function() {
                return Err(ParserError::InvalidNewTarget { span: self.span_from(lo) }.into());
            }
            return Ok(Expr::MetaProperty {
                span: self.span_from(lo),
                meta: Ident { span: lo_span(lo), name: Symbol::intern("new") },
                property: prop,
            });
        }
        let mut errors = DestructuringErrors::new();
        let callee = self.parse_call_expression_no_call(&mut errors)?;
        if matches!(callee, Expr::ChainExpression { .. }) {
            return Err(ParserError::OptionalChainNew { span: self.span_from(lo) }.into());
        }
        let arguments = if self.check(TokenKind::ParenL) { self.parse_call_arguments()? } else { Vec::new() };
        Ok(Expr::NewExpression { span: self.span_from(lo), callee: Box::new(callee), arguments })
    }

    /// Like `parse_call_expression`, but a bare `(` directly after the
    /// callee is left untouched (it belongs to `new Foo(...)`'s argument
    /// list, parsed by the caller) -- only member access chains before that
    /// point belong to the `new` callee.
    fn parse_call_expression_no_call(&mut self, errors: &mut DestructuringErrors) -> Result<Expr> {
        let lo = self.start_span();
        let mut base = if self.check(TokenKind::New) { self.parse_new_expression()? } else { self.parse_primary_expression(errors)? };
        loop {
            if self.eat(TokenKind::Dot)? {
                let prop = self.parse_ident_name()?;
                base = Expr::MemberExpression {
                    span: self.span_from(lo),
                    object: Box::new(base),
                    property: Box::new(Expr::Identifier(prop)),
                    computed: false,
                    optional: false,
                };
            } else if self.eat(TokenKind::BracketL)? {
                let prop = self.parse_expression()?;
                self.expect(TokenKind::BracketR)?;
                base = Expr::MemberExpression {
                    span: self.span_from(lo),
                    object: Box::new(base),
                    property: Box::new(prop),
                    computed: true,
                    optional: false,
                };
            } else {
                break;
            }
        }
        Ok(base)
    }

    pub(crate) fn parse_ident_name(&mut self) -> Result<Ident> {
        let sym = match &self.token.value {
            TokenValue::Ident(s) => *s,
            _ => return self.unexpected("property name"),
        };
        let span = self.token.span;
        self.bump()?;
        Ok(Ident { span, name: sym })
    }

    fn parse_primary_expression(&mut self, errors: &mut DestructuringErrors) -> Result<Expr> {
        let lo = self.start_span();
        match self.token.kind {
            TokenKind::Num => {
                let TokenValue::Num(v) = self.token.value else { unreachable!() };
                let raw = format!("{v}");
                self.bump()?;
                Ok(Expr::Literal(Literal { span: self.span_from(lo), value: LiteralValue::Number(v), raw }))
            }
            TokenKind::BigInt => {
                let TokenValue::BigInt(ref s) = self.token.value else { unreachable!() };
                let s = s.clone();
                self.bump()?;
                Ok(Expr::Literal(Literal { span: self.span_from(lo), value: LiteralValue::BigInt(s.clone()), raw: format!("{s}n") }))
            }
            TokenKind::Str => {
                let TokenValue::Str(ref s) = self.token.value else { unreachable!() };
                let s = s.clone();
                self.bump()?;
                Ok(Expr::Literal(Literal { span: self.span_from(lo), value: LiteralValue::String(s.clone()), raw: s }))
            }
            TokenKind::Null => {
                self.bump()?;
                Ok(Expr::Literal(Literal { span: self.span_from(lo), value: LiteralValue::Null, raw: "null".into() }))
            }
            TokenKind::True | TokenKind::False => {
                let v = self.token.kind == TokenKind::True;
                self.bump()?;
                Ok(Expr::Literal(Literal { span: self.span_from(lo), value: LiteralValue::Bool(v), raw: v.to_string() }))
            }
            TokenKind::This => {
                self.bump()?;
                Ok(Expr::ThisExpression { span: self.span_from(lo) })
            }
            TokenKind::Super => {
                self.bump()?;
                Ok(Expr::Super { span: self.span_from(lo) })
            }
            TokenKind::Regexp => {
                let TokenValue::Regex { ref pattern, ref flags } = self.token.value else { unreachable!() };
                let (pattern, flags) = (pattern.clone(), flags.clone());
                let parsed_flags = crate::regexp::validate_at(&pattern, &flags, lo)?;
                let value = crate::regexp::compile(&pattern, &parsed_flags);
                self.bump()?;
                Ok(Expr::RegExpLiteral { span: self.span_from(lo), pattern, flags, value })
            }
            TokenKind::BackQuote => Ok(Expr::TemplateLiteral(self.parse_template_literal(false)?)),
            TokenKind::ParenL => self.parse_parenthesized_or_arrow(errors),
            TokenKind::BracketL => self.parse_array_expression(errors),
            TokenKind::BraceL => self.parse_object_expression(errors),
            TokenKind::Function => self.parse_function_expression(false),
            TokenKind::Class => self.parse_class_expression(),
            TokenKind::Import => {
                self.bump()?;
                if self.eat(TokenKind::Dot)? {
                    let prop = self.parse_ident_name()?;
                    return Ok(Expr::MetaProperty {
                        span: self.span_from(lo),
                        meta: Ident { span: lo_span(lo), name: Symbol::intern("import") },
                        property: prop,
                    });
                }
                self.expect(TokenKind::ParenL)?;
                let source = self.parse_assignment_expression()?;
                self.expect(TokenKind::ParenR)?;
                Ok(Expr::ImportExpression { span: self.span_from(lo), source: Box::new(source) })
            }
            TokenKind::Name => {
                if self.is_contextual("async") {
                    if let Some(arrow) = self.try_parse_async_arrow(errors)? {
                        return Ok(arrow);
                    }
                }
                let id = self.parse_ident()?;
                if self.check(TokenKind::Arrow) && !self.token.preceded_by_newline {
                    self.bump()?;
                    return self.finish_arrow_function(lo, vec![Pattern::Identifier(id)], false);
                }
                Ok(Expr::Identifier(id))
            }
            _ => self.unexpected("expression"),
        }
    }

    /// Snapshots every piece of state `bump` can touch, so a failed
    /// cover-grammar guess can rewind the tokenizer exactly as if it had
    /// never advanced.
    fn snapshot(&self) -> ParserSnapshot {
        ParserSnapshot {
            pos: self.tokenizer.pos(),
            context: self.tokenizer.context.clone(),
            token: self.token.clone(),
            prev_token: self.prev_token.clone(),
        }
    }

    fn restore(&mut self, snap: ParserSnapshot) {
        self.tokenizer.set_pos(snap.pos);
        self.tokenizer.context = snap.context;
        self.token = snap.token;
        self.prev_token = snap.prev_token;
    }

    /// Looks one token past the current one without consuming it -- used
    /// for the handful of statement-level decisions that need to see past a
    /// contextual keyword (`let`, `async`) before committing to a parse.
    pub(crate) fn peek_token(&mut self) -> Result<esparse_ast::Token> {
        let snap = self.snapshot();
        self.bump()?;
        let tok = self.token.clone();
        self.restore(snap);
        Ok(tok)
    }

    /// `async` is a contextual keyword: `async function`, `async (x) => x`,
    /// and `async x => x` are async forms, but a line terminator after
    /// `async` or any other continuation makes it a plain identifier, in
    /// which case the caller falls back to `parse_ident`.
    fn try_parse_async_arrow(&mut self, _errors: &mut DestructuringErrors) -> Result<Option<Expr>> {
        let lo = self.start_span();
        let snap = self.snapshot();
        self.bump()?; // 'async'
        if self.token.preceded_by_newline {
            self.restore(snap);
            return Ok(None);
        }
        if self.check(TokenKind::Function) {
            return Ok(Some(self.parse_function_expression(true)?));
        }
        if matches!(self.token.kind, TokenKind::Name) {
            let id = self.parse_ident()?;
            if self.check(TokenKind::Arrow) && !self.token.preceded_by_newline {
                self.bump()?;
                return Ok(Some(self.finish_arrow_function(lo, vec![Pattern::Identifier(id)], true)?));
            }
            self.restore(snap);
            return Ok(None);
        }
        if self.check(TokenKind::ParenL) {
            let mut paren_errors = DestructuringErrors::new();
            let exprs = self.parse_paren_expr_list(&mut paren_errors)?;
            if self.check(TokenKind::Arrow) && !self.token.preceded_by_newline {
                self.bump()?;
                let params = self.to_assignable_list(exprs)?;
                return Ok(Some(self.finish_arrow_function(lo, params, true)?));
            }
            self.restore(snap);
            return Ok(None);
        }
        self.restore(snap);
        Ok(None)
    }

    fn finish_arrow_function(&mut self, lo: BytePos, params: Vec<Pattern>, is_async: bool) -> Result<Expr> {
        self.push_scope(ScopeFlags::FUNCTION | ScopeFlags::ARROW | if is_async { ScopeFlags::ASYNC } else { ScopeFlags::empty() });
        for p in &params {
            self.declare_pattern_names(p, esparse_ast::BindingKind::Lexical);
        }
        let body = if self.check(TokenKind::BraceL) {
            let (span, stmts) = self.parse_function_body_block()?;
            FunctionBody::Block { span, body: stmts }
        } else {
            FunctionBody::Expression(Box::new(self.parse_assignment_expression()?))
        };
        self.pop_scope();
        Ok(Expr::ArrowFunctionExpression(Function {
            span: self.span_from(lo),
            id: None,
            params,
            body,
            generator: false,
            is_async,
        }))
    }

    /// Parses `(` ... `)` as a plain comma-separated expression list,
    /// without committing to whether the result is an arrow parameter list
    /// or a parenthesized expression -- that's decided by the caller once it
    /// knows whether `=>` follows (the standard cover-grammar resolution:
    /// reparse the same tokens' already-built `Expr`s as `Pattern`s via
    /// `to_assignable_list` rather than re-lexing). Destructuring-error
    /// checks on each element are deferred to `errors` rather than applied
    /// immediately, for the same reason: an element like `{a = 1}` is only
    /// invalid once the caller learns this wasn't an arrow parameter list.
    fn parse_paren_expr_list(&mut self, errors: &mut DestructuringErrors) -> Result<Vec<Expr>> {
        self.expect(TokenKind::ParenL)?;
        // `(` starts a fresh grammar production: a bare `in` inside is never
        // ambiguous with an enclosing `for(...)` head, even when this list is
        // nested inside one.
        let outer_no_in = std::mem::replace(&mut self.no_in, false);
        let result = (|| {
            let mut exprs = Vec::new();
            while !self.check(TokenKind::ParenR) {
                if self.eat(TokenKind::Ellipsis)? {
                    let arg_lo = self.prev_token.span.lo;
                    let argument = self.parse_assignment_expression()?;
                    exprs.push(Expr::SpreadElement { span: self.span_from(arg_lo), argument: Box::new(argument) });
                    break;
                }
                exprs.push(self.parse_assignment_expression_inner(errors)?);
                if !self.eat(TokenKind::Comma)? {
                    break;
                }
            }
            self.expect(TokenKind::ParenR)?;
            Ok(exprs)
        })();
        self.no_in = outer_no_in;
        result
    }

    fn parse_parenthesized_or_arrow(&mut self, _errors: &mut DestructuringErrors) -> Result<Expr> {
        let lo = self.start_span();
        let mut paren_errors = DestructuringErrors::new();
        let mut exprs = self.parse_paren_expr_list(&mut paren_errors)?;
        if self.check(TokenKind::Arrow) && !self.token.preceded_by_newline {
            self.bump()?;
            let params = self.to_assignable_list(exprs)?;
            return self.finish_arrow_function(lo, params, false);
        }
        self.check_expression_errors(&paren_errors)?;
        let inner = if exprs.len() == 1 {
            exprs.pop().unwrap()
        } else {
            Expr::SequenceExpression { span: self.span_from(lo), expressions: exprs }
        };
        Ok(Expr::ParenthesizedExpression { span: self.span_from(lo), expression: Box::new(inner) })
    }

    fn parse_array_expression(&mut self, _errors: &mut DestructuringErrors) -> Result<Expr> {
        let lo = self.start_span();
        self.expect(TokenKind::BracketL)?;
        let mut elements = Vec::new();
        while !self.check(TokenKind::BracketR) {
            if self.check(TokenKind::Comma) {
                elements.push(None);
                self.bump()?;
                continue;
            }
            if self.eat(TokenKind::Ellipsis)? {
                let arg_lo = self.prev_token.span.lo;
                let argument = self.parse_assignment_expression()?;
                elements.push(Some(Expr::SpreadElement { span: self.span_from(arg_lo), argument: Box::new(argument) }));
            } else {
                elements.push(Some(self.parse_assignment_expression()?));
            }
            if !self.check(TokenKind::BracketR) {
                self.expect(TokenKind::Comma)?;
            }
        }
        self.expect(TokenKind::BracketR)?;
        Ok(Expr::ArrayExpression { span: self.span_from(lo), elements })
    }

    fn parse_object_expression(&mut self, errors: &mut DestructuringErrors) -> Result<Expr> {
        let lo = self.start_span();
        self.expect(TokenKind::BraceL)?;
        let mut properties = Vec::new();
        while !self.check(TokenKind::BraceR) {
            if self.eat(TokenKind::Ellipsis)? {
                let arg_lo = self.prev_token.span.lo;
                let argument = self.parse_assignment_expression()?;
                properties.push(ObjectProp::SpreadElement { span: self.span_from(arg_lo), argument: Box::new(argument) });
            } else {
                properties.push(self.parse_object_property(errors)?);
            }
            if !self.eat(TokenKind::Comma)? {
                break;
            }
        }
        self.expect(TokenKind::BraceR)?;
        Ok(Expr::ObjectExpression { span: self.span_from(lo), properties })
    }

    fn parse_object_property(&mut self, errors: &mut DestructuringErrors) -> Result<ObjectProp> {
        let lo = self.start_span();

        let mut kind = MethodKind::Method;
        if self.is_contextual("get") && !self.peek_kind_is_property_terminator()? {
            self.bump()?;
            kind = MethodKind::Get;
        } else if self.is_contextual("set") && !self.peek_kind_is_property_terminator()? {
            self.bump()?;
            kind = MethodKind::Set;
        }
        let is_async = matches!(kind, MethodKind::Method)
            && self.is_contextual("async")
            && !self.peek_kind_is_property_terminator()?
            && !self.peek_preceded_by_newline()?;
        if is_async {
            self.bump()?;
        }
        let generator = matches!(kind, MethodKind::Method) && self.eat(TokenKind::Star)?;

        let computed = self.check(TokenKind::BracketL);
        let key = self.parse_property_key()?;

        if matches!(kind, MethodKind::Method) {
            if self.eat(TokenKind::Colon)? {
                let value = self.parse_assignment_expression()?;
                return Ok(ObjectProp::Property {
                    span: self.span_from(lo),
                    key,
                    computed,
                    shorthand: false,
                    kind: MethodKind::Method,
                    value: Box::new(value),
                });
            }
        }
        if matches!(kind, MethodKind::Get | MethodKind::Set) || self.check(TokenKind::ParenL) {
            let function = self.parse_method_rest(is_async, generator)?;
            return Ok(ObjectProp::Property {
                span: self.span_from(lo),
                key,
                computed,
                shorthand: false,
                kind,
                value: Box::new(Expr::FunctionExpression(function)),
            });
        }
        // Shorthand property: `{ x }` or `{ x = 1 }` (the latter only valid
        // once this object is reinterpreted as a pattern).
        let name = match &key {
            PropertyKey::Identifier(id) => id.clone(),
            _ => return self.unexpected("property"),
        };
        if self.eat(TokenKind::Eq)? {
            if errors.shorthand_assign.is_none() {
                errors.shorthand_assign = Some(lo.to_usize() as u32);
            }
            let default = self.parse_assignment_expression()?;
            let value = Expr::AssignmentExpression {
                span: self.span_from(lo),
                operator: AssignOp::Assign,
                left: Box::new(PatternOrExpr::Expr(Expr::Identifier(name.clone()))),
                right: Box::new(default),
            };
            return Ok(ObjectProp::Property {
                span: self.span_from(lo),
                key,
                computed: false,
                shorthand: true,
                kind: MethodKind::Method,
                value: Box::new(value),
            });
        }
        Ok(ObjectProp::Property {
            span: self.span_from(lo),
            key,
            computed: false,
            shorthand: true,
            kind: MethodKind::Method,
            value: Box::new(Expr::Identifier(name)),
        })
    }

    fn parse_property_key(&mut self) -> Result<PropertyKey> {
        if self.eat(TokenKind::BracketL)? {
            let expr = self.parse_assignment_expression()?;
            self.expect(TokenKind::BracketR)?;
            return Ok(PropertyKey::Computed(Box::new(expr)));
        }
        match &self.token.value {
            TokenValue::Str(_) => {
                let lo = self.start_span();
                let TokenValue::Str(ref s) = self.token.value else { unreachable!() };
                let s = s.clone();
                self.bump()?;
                Ok(PropertyKey::Literal(Literal { span: self.span_from(lo), value: LiteralValue::String(s.clone()), raw: s }))
            }
            TokenValue::Num(v) => {
                let v = *v;
                let lo = self.start_span();
                self.bump()?;
                Ok(PropertyKey::Literal(Literal { span: self.span_from(lo), value: LiteralValue::Number(v), raw: format!("{v}") }))
            }
            _ => Ok(PropertyKey::Identifier(self.parse_ident_name()?)),
        }
    }

    fn parse_method_rest(&mut self, is_async: bool, generator: bool) -> Result<Function> {
        let lo = self.start_span();
        self.push_scope(ScopeFlags::FUNCTION | if is_async { ScopeFlags::ASYNC } else { ScopeFlags::empty() } | if generator { ScopeFlags::GENERATOR } else { ScopeFlags::empty() });
        let params = self.parse_params()?;
        for p in &params {
            self.declare_pattern_names(p, esparse_ast::BindingKind::Var);
        }
        let (span, stmts) = self.parse_function_body_block()?;
        self.pop_scope();
        Ok(Function { span: self.span_from(lo), id: None, params, body: FunctionBody::Block { span, body: stmts }, generator, is_async })
    }

    pub(crate) fn parse_params(&mut self) -> Result<Vec<Pattern>> {
        self.expect(TokenKind::ParenL)?;
        let mut params = Vec::new();
        while !self.check(TokenKind::ParenR) {
            if self.eat(TokenKind::Ellipsis)? {
                let arg_lo = self.prev_token.span.lo;
                let inner = self.parse_binding_pattern()?;
                params.push(Pattern::RestElement { span: self.span_from(arg_lo), argument: Box::new(inner) });
                break;
            }
            params.push(self.parse_binding_pattern()?);
            if !self.eat(TokenKind::Comma)? {
                break;
            }
        }
        self.expect(TokenKind::ParenR)?;
        Ok(params)
    }

    /// Parses just the pattern itself, without consuming a trailing `=
    /// default` -- used by `var`/`let`/`const` declarators, whose
    /// initializer is tracked separately on `VarDeclarator::init` rather
    /// than folded into the pattern the way a parameter default is.
    pub(crate) fn parse_binding_atom(&mut self) -> Result<Pattern> {
        Ok(match self.token.kind {
            TokenKind::BraceL => self.parse_object_pattern()?,
            TokenKind::BracketL => self.parse_array_pattern()?,
            _ => Pattern::Identifier(self.parse_ident()?),
        })
    }

    pub(crate) fn parse_binding_pattern(&mut self) -> Result<Pattern> {
        let base = self.parse_binding_atom()?;
        if self.eat(TokenKind::Eq)? {
            let lo = base.span().lo;
            let default = self.parse_assignment_expression()?;
            return Ok(Pattern::AssignmentPattern { span: self.span_from(lo), left: Box::new(base), right: Box::new(default) });
        }
        Ok(base)
    }

    fn parse_object_pattern(&mut self) -> Result<Pattern> {
        let lo = self.start_span();
        self.expect(TokenKind::BraceL)?;
        let mut properties = Vec::new();
        while !self.check(TokenKind::BraceR) {
            if self.eat(TokenKind::Ellipsis)? {
                let arg_lo = self.prev_token.span.lo;
                let argument = Box::new(Pattern::Identifier(self.parse_ident()?));
                properties.push(ObjectPatternProp::RestElement { span: self.span_from(arg_lo), argument });
            } else {
                let prop_lo = self.start_span();
                let computed = self.check(TokenKind::BracketL);
                let key = self.parse_property_key()?;
                let value = if self.eat(TokenKind::Colon)? {
                    Box::new(self.parse_binding_pattern()?)
                } else {
                    let name = match &key {
                        PropertyKey::Identifier(id) => id.clone(),
                        _ => return self.unexpected("binding"),
                    };
                    if self.eat(TokenKind::Eq)? {
                        let default = self.parse_assignment_expression()?;
                        Box::new(Pattern::AssignmentPattern {
                            span: self.span_from(prop_lo),
                            left: Box::new(Pattern::Identifier(name)),
                            right: Box::new(default),
                        })
                    } else {
                        Box::new(Pattern::Identifier(name))
                    }
                };
                properties.push(ObjectPatternProp::Property {
                    span: self.span_from(prop_lo),
                    key,
                    computed,
                    shorthand: false,
                    value,
                });
            }
            if !self.eat(TokenKind::Comma)? {
                break;
            }
        }
        self.expect(TokenKind::BraceR)?;
        Ok(Pattern::ObjectPattern { span: self.span_from(lo), properties })
    }

    fn parse_array_pattern(&mut self) -> Result<Pattern> {
        let lo = self.start_span();
        self.expect(TokenKind::BracketL)?;
        let mut elements = Vec::new();
        while !self.check(TokenKind::BracketR) {
            if self.check(TokenKind::Comma) {
                elements.push(None);
                self.bump()?;
                continue;
            }
            if self.eat(TokenKind::Ellipsis)? {
                let arg_lo = self.prev_token.span.lo;
                let inner = self.parse_binding_pattern()?;
                elements.push(Some(Pattern::RestElement { span: self.span_from(arg_lo), argument: Box::new(inner) }));
            } else {
                elements.push(Some(self.parse_binding_pattern()?));
            }
            if !self.check(TokenKind::BracketR) {
                self.expect(TokenKind::Comma)?;
            }
        }
        self.expect(TokenKind::BracketR)?;
        Ok(Pattern::ArrayPattern { span: self.span_from(lo), elements })
    }

    fn parse_function_expression(&mut self, is_async: bool) -> Result<Expr> {
        let lo = self.start_span();
        self.expect(TokenKind::Function)?;
        let generator = self.eat(TokenKind::Star)?;
        let id = if matches!(self.token.kind, TokenKind::Name) { Some(self.parse_ident()?) } else { None };
        self.push_scope(
            ScopeFlags::FUNCTION
                | if is_async { ScopeFlags::ASYNC } else { ScopeFlags::empty() }
                | if generator { ScopeFlags::GENERATOR } else { ScopeFlags::empty() },
        );
        let params = self.parse_params()?;
        for p in &params {
            self.declare_pattern_names(p, esparse_ast::BindingKind::Var);
        }
        let (span, stmts) = self.parse_function_body_block()?;
        self.pop_scope();
        Ok(Expr::FunctionExpression(Function { span: self.span_from(lo), id, params, body: FunctionBody::Block { span, body: stmts }, generator, is_async }))
    }

    fn parse_class_expression(&mut self) -> Result<Expr> {
        Ok(Expr::ClassExpression(self.parse_class_common()?))
    }

    pub(crate) fn parse_class_common(&mut self) -> Result<Class> {
        let lo = self.start_span();
        self.expect(TokenKind::Class)?;
        let id = if matches!(self.token.kind, TokenKind::Name) { Some(self.parse_ident()?) } else { None };
        let super_class = if self.eat(TokenKind::Extends)? { Some(Box::new(self.parse_call_expression_no_call(&mut DestructuringErrors::new())?)) } else { None };
        self.expect(TokenKind::BraceL)?;
        let mut body = Vec::new();
        while !self.check(TokenKind::BraceR) {
            if self.eat(TokenKind::Semi)? {
                continue;
            }
            body.push(self.parse_class_member()?);
        }
        self.expect(TokenKind::BraceR)?;
        Ok(Class { span: self.span_from(lo), id, super_class, body })
    }

    fn parse_class_member(&mut self) -> Result<ClassMember> {
        let lo = self.start_span();
        let is_static = self.is_contextual("static") && !self.peek_kind_is_paren_or_eq()?;
        if is_static {
            self.bump()?;
        }
        if is_static && self.check(TokenKind::BraceL) {
            self.push_scope(ScopeFlags::FUNCTION | ScopeFlags::SUPER);
            let (span, stmts) = self.parse_function_body_block()?;
            self.pop_scope();
            return Ok(ClassMember::StaticBlock { span: self.span_from(lo), body: stmts });
        }
        let mut kind = MethodKind::Method;
        if self.is_contextual("get") && !self.peek_kind_is_paren_or_eq()? {
            self.bump()?;
            kind = MethodKind::Get;
        } else if self.is_contextual("set") && !self.peek_kind_is_paren_or_eq()? {
            self.bump()?;
            kind = MethodKind::Set;
        }
        // `async` must be consumed before the generator `*` check -- `async
        // *gen() {}` would otherwise leave the `*` in front of `parse_property_key`.
        let is_async = matches!(kind, MethodKind::Method)
            && self.is_contextual("async")
            && !self.peek_kind_is_paren_or_eq()?
            && !self.peek_preceded_by_newline()?;
        if is_async {
            self.bump()?;
        }
        let generator = matches!(kind, MethodKind::Method) && self.eat(TokenKind::Star)?;
        let computed = self.check(TokenKind::BracketL);
        let key = self.parse_property_key()?;

        if self.check(TokenKind::ParenL) {
            let mut function = self.parse_method_rest(is_async, generator)?;
            if matches!(&key, PropertyKey::Identifier(id) if id.name.as_str() == "constructor") && !is_static {
                kind = MethodKind::Constructor;
            }
            function.id = None;
            return Ok(ClassMember::MethodDefinition { span: self.span_from(lo), key, computed, kind, is_static, function });
        }

        let value = if self.eat(TokenKind::Eq)? { Some(self.parse_assignment_expression()?) } else { None };
        self.semicolon()?;
        Ok(ClassMember::PropertyDefinition { span: self.span_from(lo), key, computed, is_static, value })
    }

    /// True if the token after the current one is `(` or `=` -- used to
    /// tell a contextual keyword (`static`, `get`, `set`, `async`) used as a
    /// modifier from the same word used as the member's own name (e.g. a
    /// method literally named `get`).
    fn peek_kind_is_paren_or_eq(&mut self) -> Result<bool> {
        let snap = self.snapshot();
        self.bump()?;
        let is = matches!(self.token.kind, TokenKind::ParenL | TokenKind::Eq);
        self.restore(snap);
        Ok(is)
    }

    /// Like [`Self::peek_kind_is_paren_or_eq`], but for object-literal
    /// properties rather than class members: a bare property can also end in
    /// `:` (a regular `key: value` pair) or `,`/`}` (a shorthand property
    /// with no default), either of which means `get`/`set`/`async` here is
    /// the property's own name rather than a modifier.
    fn peek_kind_is_property_terminator(&mut self) -> Result<bool> {
        let snap = self.snapshot();
        self.bump()?;
        let is = matches!(self.token.kind, TokenKind::ParenL | TokenKind::Eq | TokenKind::Colon | TokenKind::Comma | TokenKind::BraceR);
        self.restore(snap);
        Ok(is)
    }

    /// True if a line terminator separates the current token from the next
    /// one -- used by the `async` class-member modifier check, since ASI
    /// forbids treating `async` as a modifier across a newline.
    fn peek_preceded_by_newline(&mut self) -> Result<bool> {
        let snap = self.snapshot();
        self.bump()?;
        let is = self.token.preceded_by_newline;
        self.restore(snap);
        Ok(is)
    }

    /// Parses a template literal starting at the current `` ` `` token. The
    /// tokenizer, once it has produced the opening backtick, switches into
    /// chunk-scanning mode (driven by the context stack's [`Ctx::QTmpl`]
    /// entry) so each subsequent `bump` yields either a `TemplateHead`
    /// (stops right after a consumed `${`) or `TemplateTail` (stops right
    /// after the consumed closing backtick).
    fn parse_template_literal(&mut self, tagged: bool) -> Result<TemplateLiteral> {
        let lo = self.start_span();
        let prev_tagged = self.tokenizer.in_tagged_template;
        self.tokenizer.in_tagged_template = tagged;
        self.expect(TokenKind::BackQuote)?;
        let mut quasis = Vec::new();
        let mut expressions = Vec::new();
        loop {
            let (cooked, raw, tail) = match self.token.value.clone() {
                TokenValue::Template { cooked, raw } => (cooked, raw, self.token.kind == TokenKind::TemplateTail),
                _ => return self.unexpected("template chunk"),
            };
            let span = self.token.span;
            quasis.push(TemplateElement { span, tail, cooked, raw });
            if tail {
                self.bump()?;
                break;
            }
            self.bump()?;
            expressions.push(self.parse_expression()?);
            self.expect(TokenKind::BraceR)?;
        }
        self.tokenizer.in_tagged_template = prev_tagged;
        Ok(TemplateLiteral { span: self.span_from(lo), quasis, expressions })
    }
}

fn lo_span(lo: BytePos) -> Span {
    Span::new(lo, lo)
}

#[cfg(test)]
mod tests {
    use crate::options::{EcmaVersion, ParserOptions};

    fn parses(src: &str) -> bool {
        crate::parse(src, &ParserOptions::default()).is_ok()
    }

    fn parses_with(src: &str, options: &ParserOptions) -> bool {
        crate::parse(src, options).is_ok()
    }

    #[test]
    fn arrow_with_single_bare_parameter() {
        assert!(parses("const f = x => x + 1;"));
    }

    #[test]
    fn arrow_with_destructured_parameters() {
        assert!(parses("const f = ({a, b}, [c]) => a + b + c;"));
    }

    #[test]
    fn parenthesized_sequence_is_not_confused_with_arrow_params() {
        assert!(parses("(a, b);"));
    }

    #[test]
    fn async_arrow_with_await_in_body() {
        assert!(parses("const f = async x => await x;"));
    }

    #[test]
    fn async_identifier_followed_by_newline_is_not_an_arrow() {
        // ASI forbids `async` from binding to an arrow across a newline, so
        // this is the identifier `async` followed by a new statement.
        assert!(parses("async\nx => x;"));
    }

    #[test]
    fn exponent_is_right_associative() {
        assert!(parses("2 ** 3 ** 2;"));
    }

    #[test]
    fn unary_minus_cannot_be_the_left_operand_of_exponent() {
        assert!(!parses("-2 ** 3;"));
    }

    #[test]
    fn optional_chaining_short_circuits_through_call_and_index() {
        assert!(parses("a?.b?.[0]?.();"));
    }

    #[test]
    fn optional_chain_cannot_be_tagged_template() {
        assert!(!parses("a?.b`c`;"));
    }

    #[test]
    fn optional_chain_cannot_be_new_callee() {
        assert!(!parses("new a?.b();"));
    }

    #[test]
    fn new_target_is_valid_inside_a_function() {
        assert!(parses("function f() { return new.target; }"));
    }

    #[test]
    fn new_target_outside_a_function_is_rejected() {
        assert!(!parses("new.target;"));
    }

    #[test]
    fn template_literal_with_two_substitutions() {
        assert!(parses("`a${1}b${2}c`;"));
    }

    #[test]
    fn tagged_template_is_valid() {
        assert!(parses("tag`hello ${name}`;"));
    }

    #[test]
    fn class_expression_with_computed_method_and_getter() {
        assert!(parses("const C = class { [computedName]() {} get x() { return 1; } };"));
    }

    #[test]
    fn class_static_block_is_valid() {
        assert!(parses("class C { static { C.ready = true; } }"));
    }

    #[test]
    fn await_outside_async_function_is_an_identifier_by_default() {
        assert!(parses("function f() { return await + 1; }"));
    }

    #[test]
    fn numeric_separator_requires_es2021_or_later() {
        let old = ParserOptions::default().with_ecma_version(EcmaVersion::Es2020);
        assert!(!parses_with("1_000;", &old));
        let new = ParserOptions::default().with_ecma_version(EcmaVersion::Es2021);
        assert!(parses_with("1_000;", &new));
    }

    #[test]
    fn object_shorthand_with_default_is_only_valid_as_a_pattern() {
        assert!(!parses("({a = 1});"));
        assert!(parses("const {a = 1} = x;"));
    }

    #[test]
    fn arrow_parameter_with_shorthand_object_default_is_valid() {
        // `{a = 1}` is a shorthand-default destructuring error when kept as
        // a plain expression, but the same parenthesized form reinterpreted
        // as an arrow parameter list is legal -- the error must be deferred
        // until the parser knows which one this is.
        assert!(parses("const f = ({a = 1}) => a;"));
    }

    #[test]
    fn object_literal_with_getter_and_setter() {
        assert!(parses("const o = { get x() { return 1; }, set x(v) {} };"));
    }

    #[test]
    fn object_literal_with_async_method() {
        assert!(parses("const o = { async m() { await 1; } };"));
    }

    #[test]
    fn object_literal_with_generator_method() {
        assert!(parses("const o = { *gen() { yield 1; } };"));
    }

    #[test]
    fn object_literal_with_async_generator_method() {
        assert!(parses("const o = { async *gen() { yield 1; } };"));
    }

    #[test]
    fn object_literal_getter_named_get_is_not_confused_with_modifier() {
        // `get` followed by `:`, `,` or `}` is the property's own name, not
        // a getter modifier.
        assert!(parses("const o = { get: 1 };"));
        assert!(parses("const o = { get };"));
    }

    #[test]
    fn class_method_can_be_async_generator() {
        assert!(parses("class C { async *gen() { yield 1; } }"));
    }
}
