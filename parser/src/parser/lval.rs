//! Left-hand-side validation: rewriting a cover-grammar `Expr` into a
//! `Pattern` once the parser learns it was actually a binding/assignment
//! target (`(a, {b}) => …`, `[a, b] = x`), and walking a finished pattern to
//! declare the names it binds.

use esparse_ast::node::*;
use esparse_ast::BindingKind;
use esparse_errors::{ParserError, Result};

use super::Parser;

impl<'a> Parser<'a> {
    /// Rewrites an already-parsed expression into the pattern it covers.
    /// Used once the parser commits to a cover grammar's "pattern" branch:
    /// arrow parameters, and the left-hand side of a destructuring
    /// assignment.
    pub(crate) fn to_assignable(&self, expr: Expr) -> Result<Pattern> {
        match expr {
            Expr::Identifier(id) => Ok(Pattern::Identifier(id)),
            Expr::ParenthesizedExpression { expression, .. } => self.to_assignable(*expression),
            Expr::ArrayExpression { span, elements } => {
                let len = elements.len();
                let mut out = Vec::with_capacity(len);
                for (i, el) in elements.into_iter().enumerate() {
                    match el {
                        None => out.push(None),
                        Some(Expr::SpreadElement { span, argument }) => {
                            if i + 1 != len {
                                return Err(ParserError::ElementAfterRest { span }.into());
                            }
                            out.push(Some(Pattern::RestElement { span, argument: Box::new(self.to_assignable(*argument)?) }));
                        }
                        Some(e) => out.push(Some(self.to_assignable(e)?)),
                    }
                }
                Ok(Pattern::ArrayPattern { span, elements: out })
            }
            Expr::ObjectExpression { span, properties } => {
                let len = properties.len();
                let mut out = Vec::with_capacity(len);
                for (i, prop) in properties.into_iter().enumerate() {
                    match prop {
                        ObjectProp::SpreadElement { span, argument } => {
                            if i + 1 != len {
                                return Err(ParserError::ElementAfterRest { span }.into());
                            }
                            out.push(ObjectPatternProp::RestElement { span, argument: Box::new(self.to_assignable(*argument)?) });
                        }
                        ObjectProp::Property { span, key, computed, shorthand, value, .. } => {
                            let value = Box::new(self.to_assignable(*value)?);
                            out.push(ObjectPatternProp::Property { span, key, computed, shorthand, value });
                        }
                    }
                }
                Ok(Pattern::ObjectPattern { span, properties: out })
            }
            Expr::AssignmentExpression { span, operator: AssignOp::Assign, left, right } => {
                let left = self.pattern_or_expr_to_pattern(*left)?;
                Ok(Pattern::AssignmentPattern { span, left: Box::new(left), right })
            }
            Expr::SpreadElement { span, argument } => Ok(Pattern::RestElement { span, argument: Box::new(self.to_assignable(*argument)?) }),
            other => Err(ParserError::InvalidAssignmentTarget { span: other.span() }.into()),
        }
    }

    fn pattern_or_expr_to_pattern(&self, poe: PatternOrExpr) -> Result<Pattern> {
        match poe {
            PatternOrExpr::Pattern(p) => Ok(p),
            PatternOrExpr::Expr(e) => self.to_assignable(e),
        }
    }

    /// Rewrites a parenthesized expression list into an arrow parameter
    /// list, enforcing that only the last entry may be a rest element.
    pub(crate) fn to_assignable_list(&self, exprs: Vec<Expr>) -> Result<Vec<Pattern>> {
        let len = exprs.len();
        let mut out = Vec::with_capacity(len);
        for (i, e) in exprs.into_iter().enumerate() {
            match e {
                Expr::SpreadElement { span, argument } => {
                    if i + 1 != len {
                        return Err(ParserError::ElementAfterRest { span }.into());
                    }
                    out.push(Pattern::RestElement { span, argument: Box::new(self.to_assignable(*argument)?) });
                }
                other => out.push(self.to_assignable(other)?),
            }
        }
        Ok(out)
    }

    /// Walks a finished pattern, declaring every name it binds with `kind`.
    /// Called for function/arrow parameters (`Var`) and catch/lexical
    /// declarations (`Lexical`/`SimpleCatch`).
    pub(crate) fn declare_pattern_names(&mut self, pattern: &Pattern, kind: BindingKind) {
        match pattern {
            Pattern::Identifier(id) => self.declare_name(id.name, kind, id.span),
            Pattern::AssignmentPattern { left, .. } => self.declare_pattern_names(left, kind),
            Pattern::RestElement { argument, .. } => self.declare_pattern_names(argument, kind),
            Pattern::ArrayPattern { elements, .. } => {
                for el in elements.iter().flatten() {
                    self.declare_pattern_names(el, kind);
                }
            }
            Pattern::ObjectPattern { properties, .. } => {
                for prop in properties {
                    match prop {
                        ObjectPatternProp::Property { value, .. } => self.declare_pattern_names(value, kind),
                        ObjectPatternProp::RestElement { argument, .. } => self.declare_pattern_names(argument, kind),
                    }
                }
            }
        }
    }

    /// Validates that `expr` is a legal simple assignment target (the left
    /// side of `=`/compound assignment that isn't a destructuring pattern):
    /// an identifier or a member expression. Strict mode additionally
    /// forbids assigning to `eval`/`arguments`.
    pub(crate) fn check_lval_simple(&self, expr: &Expr) -> Result<()> {
        match expr {
            Expr::Identifier(id) => {
                if self.strict && matches!(id.name.as_str(), "eval" | "arguments") {
                    return Err(ParserError::StrictAssignToReadonly { name: id.name.as_str().to_owned(), span: id.span }.into());
                }
                Ok(())
            }
            Expr::MemberExpression { .. } => Ok(()),
            _ => Err(ParserError::InvalidAssignmentTarget { span: expr.span() }.into()),
        }
    }

    /// Entry point for validating a destructuring pattern that's already
    /// been rewritten from a cover grammar (via [`Self::to_assignable`]):
    /// an assignment target (`({a} = x)`) rather than a fresh binding, so a
    /// bare identifier is checked the same way [`Self::check_lval_simple`]
    /// checks one.
    pub(crate) fn check_lval_pattern(&self, pattern: &Pattern) -> Result<()> {
        if let Pattern::Identifier(id) = pattern {
            if self.strict && matches!(id.name.as_str(), "eval" | "arguments") {
                return Err(ParserError::StrictAssignToReadonly { name: id.name.as_str().to_owned(), span: id.span }.into());
            }
            return Ok(());
        }
        self.check_lval_inner_pattern(pattern)
    }

    /// Walks the structure of an object/array/assignment/rest pattern,
    /// recursing into every binding position. Unlike
    /// [`Self::check_lval_pattern`], a bare identifier here isn't re-checked
    /// against strict mode -- that happens at the leaf via the recursive
    /// call back into `check_lval_pattern`.
    fn check_lval_inner_pattern(&self, pattern: &Pattern) -> Result<()> {
        match pattern {
            Pattern::Identifier(_) => self.check_lval_pattern(pattern),
            Pattern::AssignmentPattern { left, .. } => self.check_lval_pattern(left),
            Pattern::RestElement { argument, .. } => {
                if matches!(**argument, Pattern::AssignmentPattern { .. }) {
                    return Err(ParserError::RestDefault { span: argument.span() }.into());
                }
                self.check_lval_pattern(argument)
            }
            Pattern::ArrayPattern { elements, .. } => {
                for el in elements.iter().flatten() {
                    self.check_lval_pattern(el)?;
                }
                Ok(())
            }
            Pattern::ObjectPattern { properties, .. } => {
                for prop in properties {
                    match prop {
                        ObjectPatternProp::Property { value, .. } => self.check_lval_pattern(value)?,
                        ObjectPatternProp::RestElement { argument, .. } => {
                            if !matches!(**argument, Pattern::Identifier(_)) {
                                return Err(ParserError::InvalidAssignmentTarget { span: argument.span() }.into());
                            }
                            self.check_lval_pattern(argument)?;
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::options::ParserOptions;

    fn parses(src: &str) -> bool {
        crate::parse(src, &ParserOptions::default()).is_ok()
    }

    #[test]
    fn destructuring_array_assignment_is_valid() {
        assert!(parses("[a, b] = [1, 2];"));
    }

    #[test]
    fn destructuring_object_assignment_with_default_is_valid() {
        assert!(parses("({a, b = 1} = x);"));
    }

    #[test]
    fn rest_element_with_default_is_rejected() {
        assert!(!parses("[...a = 1] = x;"));
    }

    #[test]
    fn object_rest_element_must_be_an_identifier() {
        assert!(!parses("({...{a}} = x);"));
    }

    #[test]
    fn assigning_to_a_literal_is_rejected() {
        assert!(!parses("1 = x;"));
    }

    #[test]
    fn assigning_to_eval_in_strict_mode_is_rejected() {
        assert!(!parses("'use strict'; eval = 1;"));
    }

    #[test]
    fn for_of_destructuring_target_is_valid() {
        assert!(parses("for ([a, b] of pairs) {}"));
    }
}
