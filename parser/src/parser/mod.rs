//! The recursive-descent expression/statement parser, built on top of the
//! pull-driven [`Tokenizer`].

mod expression;
mod lval;
mod statement;

use esparse_ast::node::*;
use esparse_ast::{BindingKind, DestructuringErrors, ScopeFlags, ScopeStack, Token, TokenKind, TokenValue};
use esparse_errors::{emitter::Handler, ParserError, Result};
use esparse_span::{BytePos, Span, Symbol};

use crate::options::{ParserOptions, SourceType};
use crate::tokenizer::Tokenizer;

/// A label pushed by a `LabeledStatement`, or anonymously by a loop/switch
/// entering its body, consulted by `break`/`continue` target resolution.
/// `name` is `None` for the anonymous entries loops and switches push around
/// their own body so an unlabeled `break`/`continue` can find its nearest
/// enclosing target without needing a name match.
pub(crate) struct LabelEntry {
    pub(crate) name: Option<Symbol>,
    pub(crate) is_loop: bool,
    pub(crate) is_switch: bool,
    #[allow(dead_code)]
    pub(crate) statement_start: u32,
}

pub struct Parser<'a> {
    tokenizer: Tokenizer<'a>,
    pub(crate) token: Token,
    pub(crate) prev_token: Token,
    handler: &'a Handler,
    options: &'a ParserOptions,
    scopes: ScopeStack,
    labels: Vec<LabelEntry>,

    in_module: bool,
    strict: bool,

    /// Offset at which a bare `(` might start an arrow function's parameter
    /// list; set when the previous token makes that syntactically possible.
    potential_arrow_at: Option<u32>,
    yield_pos: Option<u32>,
    await_pos: Option<u32>,
    await_ident_pos: Option<u32>,

    undefined_exports: Vec<(Symbol, Span)>,
    exported_names: std::collections::HashSet<Symbol>,

    /// Set while parsing a `for(...)` head's init clause, so the binary
    /// expression parser refuses to consume a bare `in` there (it would
    /// otherwise be ambiguous with the `for...in` separator).
    pub(crate) no_in: bool,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, options: &'a ParserOptions, handler: &'a Handler) -> Self {
        let in_module = matches!(options.source_type, SourceType::Module);
        let dummy = Token::eof(Span::dummy());
        Parser {
            tokenizer: Tokenizer::new(source, options, handler),
            token: dummy.clone(),
            prev_token: dummy,
            handler,
            options,
            scopes: ScopeStack::new(),
            labels: Vec::new(),
            in_module,
            strict: in_module,
            potential_arrow_at: None,
            yield_pos: None,
            await_pos: None,
            await_ident_pos: None,
            undefined_exports: Vec::new(),
            exported_names: std::collections::HashSet::new(),
            no_in: false,
        }
    }

    pub fn new_at(source: &'a str, offset: u32, options: &'a ParserOptions, handler: &'a Handler) -> Self {
        let mut p = Self::new(source, options, handler);
        p.tokenizer.set_pos(offset as usize);
        p
    }

    fn prime(&mut self) -> Result<()> {
        if matches!(self.token.kind, TokenKind::Eof) && self.token.span.is_dummy() {
            self.token = self.tokenizer.next_token()?;
        }
        Ok(())
    }

    /// Advances to the next token, updating the context stack for the token
    /// just produced.
    pub(crate) fn bump(&mut self) -> Result<()> {
        let prev_kind = self.token.kind;
        let next = self.tokenizer.next_token()?;
        self.prev_token = std::mem::replace(&mut self.token, next);
        self.tokenizer.update_context(prev_kind, self.token.kind);
        Ok(())
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.token.kind == kind
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> Result<bool> {
        if self.check(kind) {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<Span> {
        if self.eat(kind)? {
            Ok(self.prev_token.span)
        } else {
            self.unexpected(kind.label())
        }
    }

    fn unexpected<T>(&self, expected: impl std::fmt::Display) -> Result<T> {
        Err(ParserError::unexpected(self.token.kind.label(), expected, self.token.span).into())
    }

    /// True if the current token is a `Name` whose symbol equals `word`
    /// (used for contextual keywords: `async`, `of`, `let`, `yield`, …).
    pub(crate) fn is_contextual(&self, word: &str) -> bool {
        matches!((&self.token.kind, &self.token.value), (TokenKind::Name, TokenValue::Ident(sym)) if sym.as_str() == word)
    }

    pub(crate) fn eat_contextual(&mut self, word: &str) -> Result<bool> {
        if self.is_contextual(word) {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn expect_contextual(&mut self, word: &str) -> Result<Span> {
        if self.eat_contextual(word)? {
            Ok(self.prev_token.span)
        } else {
            self.unexpected(format!("'{word}'"))
        }
    }

    fn current_ident_symbol(&self) -> Option<Symbol> {
        match &self.token.value {
            TokenValue::Ident(s) => Some(*s),
            _ => None,
        }
    }

    pub(crate) fn parse_ident(&mut self) -> Result<Ident> {
        let sym = match self.current_ident_symbol().filter(|_| matches!(self.token.kind, TokenKind::Name)) {
            Some(sym) => sym,
            None => return self.unexpected("identifier"),
        };
        if crate::tokenizer::is_reserved_word(sym.as_str(), self.strict) {
            self.emit_recoverable(ParserError::ReservedWord {
                keyword: sym.as_str().to_owned(),
                span: self.token.span,
            });
        }
        let span = self.token.span;
        self.bump()?;
        Ok(Ident { span, name: sym })
    }

    /// Emits through the handler without aborting -- used for the
    /// categories `ParserError::is_recoverable` marks as such.
    fn emit_recoverable(&self, err: ParserError) {
        self.handler.emit_err(err);
    }

    pub(crate) fn start_span(&self) -> BytePos {
        self.token.span.lo
    }

    pub(crate) fn span_from(&self, lo: BytePos) -> Span {
        Span::new(lo, self.prev_token.span.hi)
    }

    /// ASI: true if a statement may end here without an explicit `;`.
    pub(crate) fn can_insert_semicolon(&self) -> bool {
        matches!(self.token.kind, TokenKind::Eof | TokenKind::BraceR) || self.token.preceded_by_newline
    }

    pub(crate) fn semicolon(&mut self) -> Result<()> {
        if self.eat(TokenKind::Semi)? || self.can_insert_semicolon() {
            Ok(())
        } else {
            self.unexpected("';'")
        }
    }

    pub(crate) fn push_scope(&mut self, flags: ScopeFlags) {
        self.scopes.push(flags);
    }

    pub(crate) fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    pub(crate) fn declare_name(&mut self, name: Symbol, kind: BindingKind, span: Span) {
        if self.scopes.declare_name(name, kind, span).is_err() {
            self.emit_recoverable(ParserError::AlreadyDeclared {
                name: name.as_str().to_owned(),
                span,
            });
        }
    }

    pub(crate) fn in_function(&self) -> bool {
        self.scopes.in_function()
    }

    pub(crate) fn in_async(&self) -> bool {
        self.scopes.in_async()
    }

    pub(crate) fn in_generator(&self) -> bool {
        self.scopes.in_generator()
    }

    /// Top-level entry: parses a whole program.
    pub fn parse_program(&mut self) -> Result<Program> {
        self.prime()?;
        let lo = self.start_span();
        let mut body = Vec::new();
        let mut in_prologue = true;
        while !self.check(TokenKind::Eof) {
            let item = self.parse_module_item()?;
            if in_prologue {
                match module_item_directive(&item) {
                    Some("use strict") => self.strict = true,
                    Some(_) => {}
                    None => in_prologue = false,
                }
            }
            body.push(item);
        }
        for (name, span) in &self.undefined_exports {
            if !self.exported_names.contains(name) {
                self.emit_recoverable(ParserError::ModuleExportUndefined {
                    name: name.as_str().to_owned(),
                    span: *span,
                });
            }
        }
        Ok(Program {
            span: self.span_from(lo),
            source_type: if self.in_module { SourceType::Module } else { SourceType::Script },
            body,
        })
    }

    /// Parses a single expression, for `parse_expression_at`.
    pub fn parse_single_expression(&mut self) -> Result<Expr> {
        self.prime()?;
        self.parse_expression()
    }

    fn parse_module_item(&mut self) -> Result<ModuleItem> {
        if self.in_module && self.check(TokenKind::Import) {
            return self.parse_import();
        }
        if self.in_module && self.check(TokenKind::Export) {
            return self.parse_export();
        }
        if !self.in_module && !self.options.allow_import_export_everywhere && matches!(self.token.kind, TokenKind::Import | TokenKind::Export) {
            return Err(ParserError::ImportExportOutsideModule { span: self.token.span }.into());
        }
        Ok(ModuleItem::Stmt(self.parse_statement(true)?))
    }
}

/// If `item` is a directive-prologue candidate -- an `ExpressionStatement`
/// whose expression is a bare string literal, not wrapped in parens or
/// otherwise composed -- returns the literal's cooked value. A prologue is
/// a contiguous run of these at the start of a program or function body;
/// the caller stops recognizing further directives once this returns `None`.
fn module_item_directive(item: &ModuleItem) -> Option<&str> {
    match item {
        ModuleItem::Stmt(stmt) => statement::directive_value(stmt),
        _ => None,
    }
}
