//! The syntactic-context stack that resolves the division-vs-regexp and
//! brace-statement-vs-brace-expression ambiguities.
//!
//! Every token kind updates the stack and the `expr_allowed` flag through
//! `Context::update`, called right after a token is produced (mirroring
//! `updateContext` being invoked immediately after `finishToken`). The
//! parser additionally calls the `enter_*`/`exit_*` helpers directly at
//! points the tokenizer alone can't know about (entering a function body
//! versus a function expression, for instance, depends on whether the
//! parser is in statement or expression position when it saw `function`).

use esparse_ast::TokenKind;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Ctx {
    BStat,
    BExpr,
    BTmpl,
    PStat,
    PExpr,
    FStat,
    FExpr,
    FExprGen,
    FGen,
    QTmpl,
}

impl Ctx {
    fn is_expr(self) -> bool {
        matches!(self, Ctx::BExpr | Ctx::PExpr | Ctx::FExpr | Ctx::FExprGen | Ctx::QTmpl)
    }

    fn preserve_space(self) -> bool {
        matches!(self, Ctx::QTmpl)
    }

    fn is_generator(self) -> bool {
        matches!(self, Ctx::FExprGen | Ctx::FGen)
    }
}

#[derive(Clone)]
pub struct Context {
    stack: Vec<Ctx>,
    pub expr_allowed: bool,
}

impl Default for Context {
    fn default() -> Self {
        Context {
            stack: vec![Ctx::BStat],
            expr_allowed: true,
        }
    }
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Ctx {
        *self.stack.last().expect("context stack is never empty")
    }

    pub fn preserve_space(&self) -> bool {
        self.current().preserve_space()
    }

    fn push(&mut self, ctx: Ctx) {
        self.stack.push(ctx);
    }

    fn pop(&mut self) -> Ctx {
        let popped = self.stack.pop().expect("context stack is never empty");
        if self.stack.is_empty() {
            self.stack.push(Ctx::BStat);
        }
        popped
    }

    /// Invoked right after a token is scanned, with the previous token's
    /// kind (for disambiguating `{`/`function` position) and whether the
    /// tokenizer thinks a statement (not expression) is being parsed.
    pub fn update(&mut self, prev_kind: TokenKind, kind: TokenKind) {
        use TokenKind::*;
        match kind {
            BraceL => {
                let next_is_expr = matches!(
                    prev_kind,
                    ParenR | Arrow | Colon | Semi | BraceL | BraceR | Eof | Else | Return | Comma
                ) || (
                    !matches!(
                        prev_kind,
                        Name | Num | Str | Regexp | BigInt | BracketR | ParenR | This | Super | True | False
                    ) && !self.expr_allowed
                );
                self.push(if next_is_expr { Ctx::BStat } else { Ctx::BExpr });
                self.expr_allowed = true;
            }
            BraceR => {
                if self.stack.len() == 1 {
                    self.expr_allowed = true;
                    return;
                }
                let popped = self.pop();
                if popped == Ctx::BStat && self.current() == Ctx::FStat {
                    self.pop();
                    self.expr_allowed = false;
                } else if popped == Ctx::BTmpl {
                    self.expr_allowed = true;
                } else {
                    self.expr_allowed = !popped.is_expr();
                }
            }
            DollarBraceL | TemplateHead => {
                self.push(Ctx::BTmpl);
                self.expr_allowed = true;
            }
            TemplateTail => {
                self.pop();
                self.expr_allowed = false;
            }
            ParenL => {
                let stat = matches!(prev_kind, If | For | With | While);
                self.push(if stat { Ctx::PStat } else { Ctx::PExpr });
                self.expr_allowed = true;
            }
            ParenR => {
                let popped = self.pop();
                self.expr_allowed = !popped.is_expr();
            }
            BracketL => {
                self.expr_allowed = true;
            }
            Function | Class => {
                let adapt_new_expr_allowed = matches!(
                    prev_kind,
                    Name | Num | Str | Regexp | BigInt | BracketR | ParenR | This | Super | True | False | Default
                );
                if matches!(kind, Function) && !adapt_new_expr_allowed {
                    self.push(Ctx::FStat);
                } else if matches!(kind, Function) {
                    self.push(Ctx::FExpr);
                }
                self.expr_allowed = false;
            }
            BackQuote => {
                if self.current() == Ctx::QTmpl {
                    self.pop();
                } else {
                    self.push(Ctx::QTmpl);
                }
                self.expr_allowed = false;
            }
            _ => {
                self.expr_allowed = kind.before_expr();
            }
        }
    }

    /// Called by the parser when it knows it just finished scanning a
    /// generator's `function*`, since the tokenizer's context push for
    /// `function` alone can't distinguish generator from non-generator.
    pub fn mark_generator(&mut self) {
        if let Some(top) = self.stack.last_mut() {
            *top = match *top {
                Ctx::FExpr => Ctx::FExprGen,
                Ctx::FStat => Ctx::FGen,
                other => other,
            };
        }
    }

    pub fn in_generator(&self) -> bool {
        self.stack.iter().rev().any(|c| c.is_generator())
    }

    /// Entered explicitly by the parser when opening a template
    /// substitution's `{ ... }` so the matching `}` knows to resume
    /// template-continuation scanning instead of a normal token.
    pub fn enter_template_substitution(&mut self) {
        self.push(Ctx::BTmpl);
    }

    pub fn is_template_substitution(&self) -> bool {
        self.current() == Ctx::BTmpl
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}
