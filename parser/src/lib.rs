#![forbid(unsafe_code)]
//! THE CORE of a conformant ECMAScript (editions 3 through 2021) parser:
//! a hand-written, character-code-driven tokenizer, a syntactic-context
//! stack that resolves the `/` division-vs-regexp ambiguity, and a
//! recursive-descent expression/statement parser with cover-grammar
//! rewriting for destructuring and arrow parameters.
//!
//! ```
//! let program = esparse_parser::parse("let x = 1 + 2;", &Default::default()).unwrap();
//! assert_eq!(program.body.len(), 1);
//! ```

pub mod options;
pub mod regexp;
pub mod tokenizer;

mod parser;

pub use esparse_ast as ast;
pub use esparse_errors::{Diagnostic, Result};
pub use options::ParserOptions;
pub use parser::Parser;

use esparse_ast::node::Program;
use esparse_errors::emitter::Handler;

/// Parses a complete program.
///
/// A diagnostic emitted through the [`Handler`] but not propagated as an
/// `Err` from the parse itself (the "recoverable" categories, plus a few
/// categories the parser chooses to keep parsing past so it can report the
/// rest of the program) still fails the overall parse here: the first such
/// diagnostic is surfaced once parsing completes. Callers who want every
/// diagnostic, not just the first, should go through [`Parser`] directly
/// and inspect its `Handler`.
pub fn parse(source: &str, options: &ParserOptions) -> Result<Program> {
    esparse_span::with_symbol_interner(|| {
        esparse_span::with_source_file(source, || {
            let handler = Handler::new();
            let mut parser = Parser::new(source, options, &handler);
            let program = parser.parse_program()?;
            finish(&handler, program)
        })
    })
}

/// Parses a single expression starting at `offset`, for contexts like
/// `eval`-style single-expression inputs.
pub fn parse_expression_at(source: &str, offset: u32, options: &ParserOptions) -> Result<esparse_ast::node::Expr> {
    esparse_span::with_symbol_interner(|| {
        esparse_span::with_source_file(source, || {
            let handler = Handler::new();
            let mut parser = Parser::new_at(source, offset, options, &handler);
            let expr = parser.parse_single_expression()?;
            finish(&handler, expr)
        })
    })
}

fn finish<T>(handler: &Handler, value: T) -> Result<T> {
    if handler.had_fatal_error() {
        let diag = handler.diagnostics().into_iter().find(|d| !d.recoverable).expect("had_fatal_error implies a non-recoverable diagnostic exists");
        return Err(diag);
    }
    Ok(value)
}

/// Tokenizes `source` into a `Vec` of tokens terminated by `Eof`, without
/// building an AST. Mirrors the original's lazy token-iterator entry point,
/// realized eagerly here since the tokenizer has no hidden generator state
/// to preserve.
pub fn tokenize(source: &str, options: &ParserOptions) -> Result<Vec<esparse_ast::Token>> {
    esparse_span::with_symbol_interner(|| {
        esparse_span::with_source_file(source, || {
            let handler = Handler::new();
            let mut lexer = tokenizer::Tokenizer::new(source, options, &handler);
            let mut tokens = Vec::new();
            loop {
                let tok = lexer.next_token()?;
                let is_eof = matches!(tok.kind, esparse_ast::TokenKind::Eof);
                tokens.push(tok);
                if is_eof {
                    break;
                }
            }
            Ok(tokens)
        })
    })
}
