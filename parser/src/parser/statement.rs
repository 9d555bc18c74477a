//! Statement and module-item parsing: the `parse_statement` dispatch table,
//! `for`/`for-in`/`for-of` head disambiguation, the label stack backing
//! `break`/`continue` validation, and `import`/`export` declarations.

use esparse_ast::node::*;
use esparse_ast::{BindingKind, ScopeFlags, TokenKind, TokenValue};
use esparse_errors::{ParserError, Result};
use esparse_span::BytePos;

use super::{LabelEntry, Parser};

impl<'a> Parser<'a> {
    /// `allow_declaration` is false in single-statement positions (the body
    /// of `if`/`while`/`for` without braces, `with`'s body): a bare
    /// `function`/`class` there is a syntax error, not sloppy-mode
    /// hoisting (Annex B's exception for `if` bodies is not implemented).
    pub(crate) fn parse_statement(&mut self, allow_declaration: bool) -> Result<Stmt> {
        match self.token.kind {
            TokenKind::BraceL => self.parse_block_statement(),
            TokenKind::Semi => {
                let span = self.token.span;
                self.bump()?;
                Ok(Stmt::EmptyStatement { span })
            }
            TokenKind::If => self.parse_if_statement(),
            TokenKind::Do => self.parse_do_while_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::Switch => self.parse_switch_statement(),
            TokenKind::Throw => self.parse_throw_statement(),
            TokenKind::Try => self.parse_try_statement(),
            TokenKind::Break => self.parse_break_continue_statement(true),
            TokenKind::Continue => self.parse_break_continue_statement(false),
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::With => self.parse_with_statement(),
            TokenKind::Debugger => {
                let lo = self.start_span();
                self.bump()?;
                self.semicolon()?;
                Ok(Stmt::DebuggerStatement { span: self.span_from(lo) })
            }
            TokenKind::Var | TokenKind::Const => {
                if !allow_declaration {
                    return self.unexpected_as_statement("a statement");
                }
                self.parse_var_statement()
            }
            TokenKind::Function => {
                if !allow_declaration {
                    return self.unexpected_as_statement("a statement");
                }
                Ok(Stmt::Declaration(self.parse_function_declaration(false)?))
            }
            TokenKind::Class => {
                if !allow_declaration {
                    return self.unexpected_as_statement("a statement");
                }
                Ok(Stmt::Declaration(Decl::ClassDeclaration(self.parse_class_common()?)))
            }
            TokenKind::Name if self.is_contextual("let") && self.peek_starts_let_binding()? => {
                if !allow_declaration {
                    return self.unexpected_as_statement("a statement");
                }
                self.parse_var_statement()
            }
            TokenKind::Name if allow_declaration && self.is_contextual("async") && self.peek_is_function_no_newline()? => {
                self.bump()?; // 'async'
                Ok(Stmt::Declaration(self.parse_function_declaration(true)?))
            }
            _ => self.parse_expression_or_labeled_statement(),
        }
    }

    fn unexpected_as_statement<T>(&self, expected: &'static str) -> Result<T> {
        Err(ParserError::UnexpectedStatement { expected, span: self.token.span }.into())
    }

    /// `let` is a declaration only when followed by a binding target;
    /// otherwise (sloppy mode) it's a plain identifier, e.g. `let = 1;`.
    fn peek_starts_let_binding(&mut self) -> Result<bool> {
        let next = self.peek_token()?;
        Ok(matches!(next.kind, TokenKind::Name | TokenKind::BraceL | TokenKind::BracketL))
    }

    fn peek_is_function_no_newline(&mut self) -> Result<bool> {
        let next = self.peek_token()?;
        Ok(next.kind == TokenKind::Function && !next.preceded_by_newline)
    }

    pub(crate) fn parse_block_statement(&mut self) -> Result<Stmt> {
        let lo = self.start_span();
        self.push_scope(ScopeFlags::empty());
        let (span, body) = self.parse_statement_list_until(TokenKind::BraceR, false)?;
        self.pop_scope();
        let _ = span;
        Ok(Stmt::BlockStatement { span: self.span_from(lo), body })
    }

    fn parse_statement_list_until(&mut self, end: TokenKind, recognize_directives: bool) -> Result<(esparse_span::Span, Vec<Stmt>)> {
        let lo = self.start_span();
        self.expect(TokenKind::BraceL)?;
        let mut body = Vec::new();
        let mut in_prologue = recognize_directives;
        while !self.check(end) {
            let stmt = self.parse_statement(true)?;
            if in_prologue {
                match directive_value(&stmt) {
                    Some("use strict") => self.strict = true,
                    Some(_) => {}
                    None => in_prologue = false,
                }
            }
            body.push(stmt);
        }
        self.expect(end)?;
        Ok((self.span_from(lo), body))
    }

    /// Parses a function/arrow/method body block. Unlike
    /// [`Self::parse_block_statement`], this doesn't push its own scope --
    /// the caller already pushed the function's scope, and ECMAScript
    /// treats a function body as living directly in that scope rather than
    /// in a nested block. A `'use strict'` directive at the top of the body
    /// applies only for the duration of this call: the flag is restored to
    /// whatever it was on entry once the body is fully parsed, so strictness
    /// introduced by one function's own prologue doesn't leak to sibling
    /// code that follows it.
    pub(crate) fn parse_function_body_block(&mut self) -> Result<(esparse_span::Span, Vec<Stmt>)> {
        let prev_strict = self.strict;
        let result = self.parse_statement_list_until(TokenKind::BraceR, true);
        self.strict = prev_strict;
        result
    }

    fn parse_if_statement(&mut self) -> Result<Stmt> {
        let lo = self.start_span();
        self.bump()?; // 'if'
        self.expect(TokenKind::ParenL)?;
        let test = self.parse_expression()?;
        self.expect(TokenKind::ParenR)?;
        let consequent = Box::new(self.parse_statement(false)?);
        let alternate = if self.eat(TokenKind::Else)? { Some(Box::new(self.parse_statement(false)?)) } else { None };
        Ok(Stmt::IfStatement { span: self.span_from(lo), test, consequent, alternate })
    }

    fn parse_while_statement(&mut self) -> Result<Stmt> {
        let lo = self.start_span();
        self.bump()?; // 'while'
        self.expect(TokenKind::ParenL)?;
        let test = self.parse_expression()?;
        self.expect(TokenKind::ParenR)?;
        self.labels.push(LabelEntry { name: None, is_loop: true, is_switch: false, statement_start: lo.to_usize() as u32 });
        let body = Box::new(self.parse_statement(false)?);
        self.labels.pop();
        Ok(Stmt::WhileStatement { span: self.span_from(lo), test, body })
    }

    fn parse_do_while_statement(&mut self) -> Result<Stmt> {
        let lo = self.start_span();
        self.bump()?; // 'do'
        self.labels.push(LabelEntry { name: None, is_loop: true, is_switch: false, statement_start: lo.to_usize() as u32 });
        let body = Box::new(self.parse_statement(false)?);
        self.labels.pop();
        self.expect(TokenKind::While)?;
        self.expect(TokenKind::ParenL)?;
        let test = self.parse_expression()?;
        self.expect(TokenKind::ParenR)?;
        // ASI after `do...while(test)` is automatic even without a newline.
        self.eat(TokenKind::Semi)?;
        Ok(Stmt::DoWhileStatement { span: self.span_from(lo), body, test })
    }

    fn parse_with_statement(&mut self) -> Result<Stmt> {
        let lo = self.start_span();
        if self.strict {
            self.emit_recoverable(ParserError::StrictWith { span: self.token.span });
        }
        self.bump()?; // 'with'
        self.expect(TokenKind::ParenL)?;
        let object = self.parse_expression()?;
        self.expect(TokenKind::ParenR)?;
        let body = Box::new(self.parse_statement(false)?);
        Ok(Stmt::WithStatement { span: self.span_from(lo), object, body })
    }

    fn parse_switch_statement(&mut self) -> Result<Stmt> {
        let lo = self.start_span();
        self.bump()?; // 'switch'
        self.expect(TokenKind::ParenL)?;
        let discriminant = self.parse_expression()?;
        self.expect(TokenKind::ParenR)?;
        self.expect(TokenKind::BraceL)?;
        self.push_scope(ScopeFlags::empty());
        self.labels.push(LabelEntry { name: None, is_loop: false, is_switch: true, statement_start: lo.to_usize() as u32 });
        let mut cases = Vec::new();
        let mut seen_default = false;
        while !self.check(TokenKind::BraceR) {
            let case_lo = self.start_span();
            let test = if self.eat(TokenKind::Default)? {
                if seen_default {
                    return self.unexpected_as_statement("at most one 'default' clause");
                }
                seen_default = true;
                None
            } else {
                self.expect(TokenKind::Case)?;
                Some(self.parse_expression()?)
            };
            self.expect(TokenKind::Colon)?;
            let mut consequent = Vec::new();
            while !matches!(self.token.kind, TokenKind::Case | TokenKind::Default | TokenKind::BraceR) {
                consequent.push(self.parse_statement(true)?);
            }
            cases.push(SwitchCase { span: self.span_from(case_lo), test, consequent });
        }
        self.labels.pop();
        self.pop_scope();
        self.expect(TokenKind::BraceR)?;
        Ok(Stmt::SwitchStatement { span: self.span_from(lo), discriminant, cases })
    }

    fn parse_throw_statement(&mut self) -> Result<Stmt> {
        let lo = self.start_span();
        self.bump()?; // 'throw'
        if self.token.preceded_by_newline {
            return Err(ParserError::UnexpectedStatement { expected: "an expression on the same line as 'throw'", span: self.token.span }.into());
        }
        let argument = self.parse_expression()?;
        self.semicolon()?;
        Ok(Stmt::ThrowStatement { span: self.span_from(lo), argument })
    }

    fn parse_return_statement(&mut self) -> Result<Stmt> {
        let lo = self.start_span();
        if !self.in_function() && !self.options.allow_return_outside_function {
            self.emit_recoverable(ParserError::IllegalReturn { keyword: "return", span: self.token.span });
        }
        self.bump()?; // 'return'
        let argument = if self.can_insert_semicolon()
            || matches!(self.token.kind, TokenKind::Semi | TokenKind::BraceR | TokenKind::Eof)
        {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.semicolon()?;
        Ok(Stmt::ReturnStatement { span: self.span_from(lo), argument })
    }

    fn parse_break_continue_statement(&mut self, is_break: bool) -> Result<Stmt> {
        let lo = self.start_span();
        self.bump()?; // 'break' / 'continue'
        let label = if !self.can_insert_semicolon() && matches!(self.token.kind, TokenKind::Name) && !self.token.preceded_by_newline {
            Some(self.parse_ident()?)
        } else {
            None
        };
        self.semicolon()?;
        let span = self.span_from(lo);
        self.validate_break_continue(is_break, label.as_ref(), span)?;
        if is_break {
            Ok(Stmt::BreakStatement { span, label })
        } else {
            Ok(Stmt::ContinueStatement { span, label })
        }
    }

    fn validate_break_continue(&self, is_break: bool, label: Option<&Ident>, span: esparse_span::Span) -> Result<()> {
        match label {
            Some(id) => match self.labels.iter().rev().find(|l| l.name == Some(id.name)) {
                None => Err(ParserError::UndefinedLabel { name: id.name.as_str().to_owned(), span: id.span }.into()),
                Some(entry) if !is_break && !entry.is_loop => Err(ParserError::IllegalBreakContinue { is_break, span }.into()),
                Some(_) => Ok(()),
            },
            None => {
                let ok = self.labels.iter().rev().any(|l| if is_break { l.is_loop || l.is_switch } else { l.is_loop });
                if ok {
                    Ok(())
                } else {
                    let expected = if is_break { "a loop or switch enclosing 'break'" } else { "a loop enclosing 'continue'" };
                    Err(ParserError::UnexpectedStatement { expected, span }.into())
                }
            }
        }
    }

    fn parse_try_statement(&mut self) -> Result<Stmt> {
        let lo = self.start_span();
        self.bump()?; // 'try'
        let block = Box::new(self.parse_block_statement()?);
        let handler = if self.eat(TokenKind::Catch)? {
            let catch_lo = self.start_span();
            self.push_scope(ScopeFlags::empty());
            let param = if self.eat(TokenKind::ParenL)? {
                let p = self.parse_binding_atom()?;
                self.declare_pattern_names(&p, BindingKind::SimpleCatch);
                self.expect(TokenKind::ParenR)?;
                Some(p)
            } else {
                None
            };
            // The catch parameter and the body's own `let`/`const`
            // declarations live in one shared scope -- `catch ({a}) { let
            // a; }` is a redeclaration error -- so the body is parsed as a
            // bare statement list rather than through
            // `parse_block_statement`, which would push a second, nested
            // scope of its own.
            let block_lo = self.start_span();
            let (block_span, stmts) = self.parse_statement_list_until(TokenKind::BraceR, false)?;
            let body = Box::new(Stmt::BlockStatement { span: self.span_from(block_lo), body: stmts });
            let _ = block_span;
            self.pop_scope();
            Some(CatchClause { span: self.span_from(catch_lo), param, body })
        } else {
            None
        };
        let finalizer = if self.eat(TokenKind::Finally)? { Some(Box::new(self.parse_block_statement()?)) } else { None };
        if handler.is_none() && finalizer.is_none() {
            return self.unexpected_as_statement("'catch' or 'finally'");
        }
        Ok(Stmt::TryStatement { span: self.span_from(lo), block, handler, finalizer })
    }

    fn parse_for_statement(&mut self) -> Result<Stmt> {
        let lo = self.start_span();
        self.bump()?; // 'for'
        let is_await = self.options.ecma_version.supports_for_await() && self.eat_contextual("await")?;
        self.expect(TokenKind::ParenL)?;
        self.push_scope(ScopeFlags::empty());
        self.labels.push(LabelEntry { name: None, is_loop: true, is_switch: false, statement_start: lo.to_usize() as u32 });
        let result = self.parse_for_statement_inner(lo, is_await);
        self.labels.pop();
        self.pop_scope();
        result
    }

    fn parse_for_statement_inner(&mut self, lo: BytePos, is_await: bool) -> Result<Stmt> {
        if self.eat(TokenKind::Semi)? {
            return self.finish_for_statement(lo, None);
        }

        if matches!(self.token.kind, TokenKind::Var | TokenKind::Const) || self.is_contextual("let") {
            let kind = if self.eat(TokenKind::Var)? {
                VarKind::Var
            } else if self.eat(TokenKind::Const)? {
                VarKind::Const
            } else {
                self.expect_contextual("let")?;
                VarKind::Let
            };
            let bind_kind = if matches!(kind, VarKind::Var) { BindingKind::Var } else { BindingKind::Lexical };

            let d_lo = self.start_span();
            let id = self.parse_binding_atom()?;
            if self.check(TokenKind::In) || self.is_contextual("of") {
                self.declare_pattern_names(&id, bind_kind);
                let span = id.span();
                let decl = VarDeclaration {
                    span: self.span_from(d_lo),
                    kind,
                    declarations: vec![VarDeclarator { span, id, init: None }],
                };
                return self.finish_for_in_of_statement(lo, Box::new(ForInit::VarDecl(decl)), is_await);
            }

            self.declare_pattern_names(&id, bind_kind);
            let init = if self.eat(TokenKind::Eq)? { Some(self.parse_assignment_expression_no_in()?) } else { None };
            let mut declarations = vec![VarDeclarator { span: self.span_from(d_lo), id, init }];
            while self.eat(TokenKind::Comma)? {
                let d2_lo = self.start_span();
                let id2 = self.parse_binding_atom()?;
                self.declare_pattern_names(&id2, bind_kind);
                let init2 = if self.eat(TokenKind::Eq)? { Some(self.parse_assignment_expression_no_in()?) } else { None };
                declarations.push(VarDeclarator { span: self.span_from(d2_lo), id: id2, init: init2 });
            }
            let decl = VarDeclaration { span: self.span_from(d_lo), kind, declarations };
            self.expect(TokenKind::Semi)?;
            return self.finish_for_statement(lo, Some(Box::new(ForInit::VarDecl(decl))));
        }

        let expr = self.parse_expression_no_in()?;
        if self.check(TokenKind::In) || self.is_contextual("of") {
            let left = self.for_left_from_expr(expr)?;
            return self.finish_for_in_of_statement(lo, Box::new(left), is_await);
        }
        self.expect(TokenKind::Semi)?;
        self.finish_for_statement(lo, Some(Box::new(ForInit::Expr(expr))))
    }

    fn for_left_from_expr(&mut self, expr: Expr) -> Result<ForInit> {
        match &expr {
            Expr::Identifier(_) | Expr::MemberExpression { .. } => {
                self.check_lval_simple(&expr)?;
                Ok(ForInit::Expr(expr))
            }
            _ => {
                let pattern = self.to_assignable(expr)?;
                self.check_lval_pattern(&pattern)?;
                Ok(ForInit::Pattern(pattern))
            }
        }
    }

    /// Assumes the `;` (or, for `for-in`/`for-of`, nothing) separating
    /// `init` from `test` has already been consumed by the caller.
    fn finish_for_statement(&mut self, lo: BytePos, init: Option<Box<ForInit>>) -> Result<Stmt> {
        let test = if self.check(TokenKind::Semi) { None } else { Some(self.parse_expression()?) };
        self.expect(TokenKind::Semi)?;
        let update = if self.check(TokenKind::ParenR) { None } else { Some(self.parse_expression()?) };
        self.expect(TokenKind::ParenR)?;
        let body = Box::new(self.parse_statement(false)?);
        Ok(Stmt::ForStatement { span: self.span_from(lo), init, test, update, body })
    }

    fn finish_for_in_of_statement(&mut self, lo: BytePos, left: Box<ForInit>, is_await: bool) -> Result<Stmt> {
        if self.is_contextual("of") {
            self.bump()?; // 'of'
            let right = self.parse_assignment_expression()?;
            self.expect(TokenKind::ParenR)?;
            let body = Box::new(self.parse_statement(false)?);
            return Ok(Stmt::ForOfStatement { span: self.span_from(lo), left, right, body, is_await });
        }
        self.expect(TokenKind::In)?;
        if is_await {
            return self.unexpected_as_statement("'of' after 'for await ('");
        }
        let right = self.parse_expression()?;
        self.expect(TokenKind::ParenR)?;
        let body = Box::new(self.parse_statement(false)?);
        Ok(Stmt::ForInStatement { span: self.span_from(lo), left, right, body })
    }

    fn parse_var_statement(&mut self) -> Result<Stmt> {
        let lo = self.start_span();
        let kind = if self.eat(TokenKind::Var)? {
            VarKind::Var
        } else if self.eat(TokenKind::Const)? {
            VarKind::Const
        } else {
            self.expect_contextual("let")?;
            VarKind::Let
        };
        let declarations = self.parse_var_declarator_list(kind)?;
        self.semicolon()?;
        Ok(Stmt::Declaration(Decl::VariableDeclaration(VarDeclaration { span: self.span_from(lo), kind, declarations })))
    }

    fn parse_var_declarator_list(&mut self, kind: VarKind) -> Result<Vec<VarDeclarator>> {
        let bind_kind = if matches!(kind, VarKind::Var) { BindingKind::Var } else { BindingKind::Lexical };
        let mut out = Vec::new();
        loop {
            let d_lo = self.start_span();
            let id = self.parse_binding_atom()?;
            self.declare_pattern_names(&id, bind_kind);
            let init = if self.eat(TokenKind::Eq)? {
                Some(self.parse_assignment_expression()?)
            } else {
                if matches!(kind, VarKind::Const) || !matches!(id, Pattern::Identifier(_)) {
                    return Err(ParserError::DeclarationMissingInitializer { span: self.span_from(d_lo) }.into());
                }
                None
            };
            out.push(VarDeclarator { span: self.span_from(d_lo), id, init });
            if !self.eat(TokenKind::Comma)? {
                break;
            }
        }
        Ok(out)
    }

    fn parse_function_declaration(&mut self, is_async: bool) -> Result<Decl> {
        let lo = self.start_span();
        self.expect(TokenKind::Function)?;
        let generator = self.eat(TokenKind::Star)?;
        let id = self.parse_ident()?;
        self.declare_name(id.name, BindingKind::Var, id.span);
        self.push_scope(
            ScopeFlags::FUNCTION
                | if is_async { ScopeFlags::ASYNC } else { ScopeFlags::empty() }
                | if generator { ScopeFlags::GENERATOR } else { ScopeFlags::empty() },
        );
        let params = self.parse_params()?;
        for p in &params {
            self.declare_pattern_names(p, BindingKind::Var);
        }
        let (span, stmts) = self.parse_function_body_block()?;
        self.pop_scope();
        Ok(Decl::FunctionDeclaration(Function {
            span: self.span_from(lo),
            id: Some(id),
            params,
            body: FunctionBody::Block { span, body: stmts },
            generator,
            is_async,
        }))
    }

    fn parse_expression_or_labeled_statement(&mut self) -> Result<Stmt> {
        let lo = self.start_span();
        let expr = self.parse_expression()?;
        if let Expr::Identifier(id) = &expr {
            if self.eat(TokenKind::Colon)? {
                let label = id.clone();
                if self.labels.iter().any(|l| l.name == Some(label.name)) {
                    return Err(ParserError::DuplicateLabel { name: label.name.as_str().to_owned(), span: label.span }.into());
                }
                // The label applies to the statement that follows; loops
                // push their own anonymous marker too, so `continue label`
                // into a labeled loop resolves via either entry.
                let is_loop = matches!(self.token.kind, TokenKind::For | TokenKind::While | TokenKind::Do);
                self.labels.push(LabelEntry { name: Some(label.name), is_loop, is_switch: false, statement_start: lo.to_usize() as u32 });
                let body = Box::new(self.parse_statement(true)?);
                self.labels.pop();
                return Ok(Stmt::LabeledStatement { span: self.span_from(lo), label, body });
            }
        }
        self.semicolon()?;
        Ok(Stmt::ExpressionStatement { span: self.span_from(lo), expression: expr })
    }

    fn parse_string_literal(&mut self) -> Result<Literal> {
        let lo = self.start_span();
        let TokenValue::Str(ref s) = self.token.value else { return self.unexpected("string literal") };
        let s = s.clone();
        self.bump()?;
        Ok(Literal { span: self.span_from(lo), value: LiteralValue::String(s.clone()), raw: s })
    }

    pub(crate) fn parse_import(&mut self) -> Result<ModuleItem> {
        let lo = self.start_span();
        self.expect(TokenKind::Import)?;
        if let TokenValue::Str(_) = self.token.value {
            let source = self.parse_string_literal()?;
            self.semicolon()?;
            return Ok(ModuleItem::Import(ImportDeclaration { span: self.span_from(lo), specifiers: Vec::new(), source }));
        }

        let mut specifiers = Vec::new();
        if matches!(self.token.kind, TokenKind::Name) {
            let local = self.parse_ident()?;
            self.declare_name(local.name, BindingKind::Lexical, local.span);
            specifiers.push(ImportSpecifier::Default { span: local.span, local });
            self.eat(TokenKind::Comma)?;
        }
        if specifiers.is_empty() || self.check(TokenKind::Star) || self.check(TokenKind::BraceL) {
            if self.eat(TokenKind::Star)? {
                self.expect_contextual("as")?;
                let local = self.parse_ident()?;
                self.declare_name(local.name, BindingKind::Lexical, local.span);
                specifiers.push(ImportSpecifier::Namespace { span: local.span, local });
            } else if self.eat(TokenKind::BraceL)? {
                while !self.check(TokenKind::BraceR) {
                    let imported = self.parse_ident_name()?;
                    let local = if self.eat_contextual("as")? { self.parse_ident()? } else { imported.clone() };
                    self.declare_name(local.name, BindingKind::Lexical, local.span);
                    specifiers.push(ImportSpecifier::Named {
                        span: esparse_span::Span::new(imported.span.lo, local.span.hi),
                        imported,
                        local,
                    });
                    if !self.eat(TokenKind::Comma)? {
                        break;
                    }
                }
                self.expect(TokenKind::BraceR)?;
            }
        }
        self.expect_contextual("from")?;
        let source = self.parse_string_literal()?;
        self.semicolon()?;
        Ok(ModuleItem::Import(ImportDeclaration { span: self.span_from(lo), specifiers, source }))
    }

    pub(crate) fn parse_export(&mut self) -> Result<ModuleItem> {
        let lo = self.start_span();
        self.expect(TokenKind::Export)?;

        if self.eat(TokenKind::Default)? {
            let decl = if matches!(self.token.kind, TokenKind::Function) {
                ExportDefaultKind::Decl(self.parse_function_declaration(false)?)
            } else if self.is_contextual("async") && self.peek_is_function_no_newline()? {
                self.bump()?;
                ExportDefaultKind::Decl(self.parse_function_declaration(true)?)
            } else if matches!(self.token.kind, TokenKind::Class) {
                ExportDefaultKind::Decl(Decl::ClassDeclaration(self.parse_class_common()?))
            } else {
                let expr = self.parse_assignment_expression()?;
                self.semicolon()?;
                ExportDefaultKind::Expr(Box::new(expr))
            };
            self.mark_exported(esparse_span::Symbol::intern("default"), self.span_from(lo));
            return Ok(ModuleItem::ExportDefault(ExportDefaultDeclaration { span: self.span_from(lo), declaration: decl }));
        }

        if self.eat(TokenKind::Star)? {
            let exported = if self.eat_contextual("as")? { Some(self.parse_ident_name()?) } else { None };
            if let Some(name) = &exported {
                self.mark_exported(name.name, name.span);
            }
            self.expect_contextual("from")?;
            let source = self.parse_string_literal()?;
            self.semicolon()?;
            return Ok(ModuleItem::ExportAll(ExportAllDeclaration { span: self.span_from(lo), exported, source }));
        }

        if self.eat(TokenKind::BraceL)? {
            let mut specifiers = Vec::new();
            while !self.check(TokenKind::BraceR) {
                let local = self.parse_ident_name()?;
                let exported = if self.eat_contextual("as")? { self.parse_ident_name()? } else { local.clone() };
                specifiers.push(ExportSpecifier { span: esparse_span::Span::new(local.span.lo, exported.span.hi), local, exported });
                if !self.eat(TokenKind::Comma)? {
                    break;
                }
            }
            self.expect(TokenKind::BraceR)?;
            let source = if self.eat_contextual("from")? { Some(self.parse_string_literal()?) } else { None };
            if source.is_none() {
                for spec in &specifiers {
                    self.mark_exported(spec.exported.name, spec.exported.span);
                    self.undefined_exports.push((spec.local.name, spec.local.span));
                }
            } else {
                for spec in &specifiers {
                    self.mark_exported(spec.exported.name, spec.exported.span);
                }
            }
            self.semicolon()?;
            return Ok(ModuleItem::ExportNamed(ExportNamedDeclaration { span: self.span_from(lo), declaration: None, specifiers, source }));
        }

        let decl = self.parse_statement(true)?;
        let decl = match decl {
            Stmt::Declaration(d) => d,
            other => return Err(ParserError::UnexpectedStatement { expected: "a declaration after 'export'", span: other.span() }.into()),
        };
        match &decl {
            Decl::FunctionDeclaration(f) => {
                if let Some(id) = &f.id {
                    self.mark_exported(id.name, id.span);
                }
            }
            Decl::ClassDeclaration(c) => {
                if let Some(id) = &c.id {
                    self.mark_exported(id.name, id.span);
                }
            }
            Decl::VariableDeclaration(v) => {
                for d in &v.declarations {
                    self.mark_exported_pattern(&d.id);
                }
            }
        }
        Ok(ModuleItem::ExportNamed(ExportNamedDeclaration {
            span: self.span_from(lo),
            declaration: Some(Box::new(decl)),
            specifiers: Vec::new(),
            source: None,
        }))
    }

    fn mark_exported_pattern(&mut self, pattern: &Pattern) {
        match pattern {
            Pattern::Identifier(id) => self.mark_exported(id.name, id.span),
            Pattern::AssignmentPattern { left, .. } => self.mark_exported_pattern(left),
            Pattern::RestElement { argument, .. } => self.mark_exported_pattern(argument),
            Pattern::ArrayPattern { elements, .. } => {
                for el in elements.iter().flatten() {
                    self.mark_exported_pattern(el);
                }
            }
            Pattern::ObjectPattern { properties, .. } => {
                for prop in properties {
                    match prop {
                        ObjectPatternProp::Property { value, .. } => self.mark_exported_pattern(value),
                        ObjectPatternProp::RestElement { argument, .. } => self.mark_exported_pattern(argument),
                    }
                }
            }
        }
    }

    fn mark_exported(&mut self, name: esparse_span::Symbol, span: esparse_span::Span) {
        if !self.exported_names.insert(name) {
            self.emit_recoverable(ParserError::DuplicateExport { name: name.as_str().to_owned(), span });
        }
    }
}

/// If `stmt` is a directive-prologue candidate -- an `ExpressionStatement`
/// whose expression is a bare string literal -- returns its cooked value.
pub(crate) fn directive_value(stmt: &Stmt) -> Option<&str> {
    match stmt {
        Stmt::ExpressionStatement { expression: Expr::Literal { value: LiteralValue::String(s), .. }, .. } => Some(s.as_str()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crate::options::{EcmaVersion, ParserOptions, SourceType};

    fn parses(src: &str) -> bool {
        crate::parse(src, &ParserOptions::default()).is_ok()
    }

    fn parses_with(src: &str, options: &ParserOptions) -> bool {
        crate::parse(src, options).is_ok()
    }

    #[test]
    fn plain_c_style_for_loop() {
        assert!(parses("for (let i = 0; i < 10; i++) { sum += i; }"));
    }

    #[test]
    fn for_in_over_a_declared_binding() {
        assert!(parses("for (let k in obj) { use(k); }"));
    }

    #[test]
    fn for_of_over_an_existing_identifier() {
        assert!(parses("for (x of items) { use(x); }"));
    }

    #[test]
    fn for_head_in_is_not_confused_with_statement_separator() {
        // A parenthesized `in` inside the init clause must not be eaten by
        // the for-head's own `in`/`;` disambiguation.
        assert!(parses("for (var x = (a in b); x; ) {}"));
    }

    #[test]
    fn for_await_of_requires_es2018_or_later() {
        let old = ParserOptions::default().with_ecma_version(EcmaVersion::Es2017);
        assert!(!parses_with("async function f() { for await (const x of y) {} }", &old));
        let new = ParserOptions::default().with_ecma_version(EcmaVersion::Es2018);
        assert!(parses_with("async function f() { for await (const x of y) {} }", &new));
    }

    #[test]
    fn labeled_continue_to_enclosing_loop() {
        assert!(parses("outer: for (;;) { for (;;) { continue outer; } }"));
    }

    #[test]
    fn unlabeled_break_inside_switch_is_valid() {
        assert!(parses("switch (x) { case 1: break; }"));
    }

    #[test]
    fn unlabeled_continue_inside_switch_is_rejected() {
        // `continue` (unlike `break`) never targets a bare `switch`.
        assert!(!parses("switch (x) { case 1: continue; }"));
    }

    #[test]
    fn break_outside_any_loop_or_switch_is_rejected() {
        assert!(!parses("break;"));
    }

    #[test]
    fn break_to_an_undefined_label_is_rejected() {
        assert!(!parses("for (;;) { break somewhere; }"));
    }

    #[test]
    fn duplicate_label_is_rejected() {
        assert!(!parses("outer: outer: for (;;) {}"));
    }

    #[test]
    fn named_import_and_export_round_trip() {
        let module = ParserOptions::default().with_source_type(SourceType::Module);
        assert!(parses_with("import { a, b as c } from 'mod'; export { a, c };", &module));
    }

    #[test]
    fn export_default_expression() {
        let module = ParserOptions::default().with_source_type(SourceType::Module);
        assert!(parses_with("export default 42;", &module));
    }

    #[test]
    fn duplicate_export_name_is_recorded_as_recoverable() {
        // `DuplicateExport` is one of the recoverable categories: parsing
        // continues to the end of the module, and `crate::parse` still
        // returns `Ok`, but the handler records the diagnostic.
        use esparse_errors::emitter::Handler;
        let module = ParserOptions::default().with_source_type(SourceType::Module);
        esparse_span::with_symbol_interner(|| {
            let handler = Handler::new();
            let mut parser = crate::Parser::new("const a = 1; export { a }; export { a as a };", &module, &handler);
            assert!(parser.parse_program().is_ok());
            assert!(!handler.is_empty());
            assert!(!handler.had_fatal_error());
        });
    }

    #[test]
    fn import_outside_module_is_rejected_by_default() {
        assert!(!parses("import { a } from 'mod';"));
    }

    #[test]
    fn catch_parameter_shadowing_in_body_is_rejected() {
        // `AlreadyDeclared` is also a recoverable category -- the parse
        // still completes and `crate::parse` still returns `Ok`, but the
        // handler records the duplicate binding. This is only true once the
        // catch parameter and the body share one scope; if they were two
        // nested scopes (one per the parameter, one pushed again by the
        // body), `let a` would shadow rather than collide.
        use esparse_errors::emitter::Handler;
        esparse_span::with_symbol_interner(|| {
            let handler = Handler::new();
            let mut parser = crate::Parser::new("try {} catch ({a}) { let a; }", &ParserOptions::default(), &handler);
            assert!(parser.parse_program().is_ok());
            assert!(!handler.is_empty());
        });
    }

    #[test]
    fn catch_without_parameter_gets_its_own_body_scope() {
        assert!(parses("try {} catch { let a; }"));
    }
}
