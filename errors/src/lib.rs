//! Diagnostics for the tokenizer, regexp validator, and parser.
//!
//! Diagnostics are constructed as typed [`ParserError`] values and routed
//! through a session-scoped [`emitter::Handler`] rather than returned
//! directly from every call site, so that "recoverable" categories can be
//! collected instead of aborting the parse.

pub mod emitter;

use esparse_span::{BytePos, Loc, Span};
use std::fmt;

pub type Result<T> = std::result::Result<T, Diagnostic>;

/// A realized diagnostic: a message plus the span it was raised at, resolved
/// to a line/column [`Loc`] against the source file being parsed (via
/// `esparse_span::with_source_file`) at the moment it's constructed.
#[derive(Clone, Debug, thiserror::Error)]
pub struct Diagnostic {
    pub message: String,
    pub span: Span,
    /// Offset at which scanning actually stopped; usually equal to
    /// `span.hi`, but differs for lookahead-based errors (e.g. an
    /// unterminated string reports `span` at the opening quote and
    /// `raised_at` at EOF).
    pub raised_at: Span,
    pub recoverable: bool,
    /// `span.lo`, kept alongside `loc` for callers that want the raw offset.
    pub pos: BytePos,
    /// `span` resolved to 1-based line / 0-based column positions.
    pub loc: Loc,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}:{})", self.message, self.loc.start.line, self.loc.start.column)
    }
}

impl From<ParserError> for Diagnostic {
    fn from(err: ParserError) -> Self {
        let recoverable = err.is_recoverable();
        let span = err.span();
        Diagnostic {
            message: err.to_string(),
            span,
            raised_at: span,
            recoverable,
            pos: span.lo,
            loc: esparse_span::resolve_loc(span),
        }
    }
}

/// All diagnosable conditions the tokenizer, regexp validator, scope
/// checker, and expression/statement parser can raise.
#[derive(Clone, Debug, thiserror::Error)]
pub enum ParserError {
    #[error("unexpected token: expected {expected}, found '{found}'")]
    Unexpected { found: String, expected: String, span: Span },

    #[error("unterminated string literal")]
    UnterminatedStringLiteral { span: Span },

    #[error("unterminated comment")]
    UnterminatedComment { span: Span },

    #[error("unterminated template literal")]
    UnterminatedTemplate { span: Span },

    #[error("octal literal are not allowed in strict mode")]
    StrictOctalLiteral { span: Span },

    #[error("\\8 and \\9 are not allowed in strict mode")]
    StrictNumericEscape { span: Span },

    #[error("identifier directly after number")]
    IdentifierAfterNumber { span: Span },

    #[error("invalid or unexpected token")]
    InvalidToken { span: Span },

    #[error("invalid number")]
    InvalidNumber { span: Span },

    #[error("numeric separator can not be used after leading 0")]
    ZeroDigitNumericSeparator { span: Span },

    #[error("unexpected character '{ch}'")]
    UnexpectedChar { ch: char, span: Span },

    #[error("octal escape sequences are not allowed in untagged template literals")]
    StrictOctalInTemplate { span: Span },

    #[error("unterminated regular expression")]
    UnterminatedRegExp { span: Span },

    #[error("invalid regular expression: {reason}")]
    InvalidRegExp { reason: String, span: Span },

    #[error("invalid named capture referenced")]
    InvalidNamedCapture { span: Span },

    #[error("duplicate capture group name")]
    DuplicateCaptureGroupName { span: Span },

    #[error("numbers out of order in {{}} quantifier")]
    QuantifierOutOfOrder { span: Span },

    #[error("range out of order in character class")]
    CharacterClassRangeOutOfOrder { span: Span },

    #[error("invalid unicode property escape: {name}")]
    InvalidUnicodePropertyEscape { name: String, span: Span },

    #[error("'{name}' has already been declared")]
    AlreadyDeclared { name: String, span: Span },

    #[error("identifier '{name}' is not allowed in strict mode")]
    StrictReservedWord { name: String, span: Span },

    #[error("assigning to '{name}' in strict mode is not allowed")]
    StrictAssignToReadonly { name: String, span: Span },

    #[error("argument name clash in strict mode")]
    StrictParamDupe { span: Span },

    #[error("invalid assignment target")]
    InvalidAssignmentTarget { span: Span },

    #[error("rest element may not have a default")]
    RestDefault { span: Span },

    #[error("unexpected trailing comma after rest element")]
    RestTrailingComma { span: Span },

    #[error("complex binding patterns require an initialization value")]
    DeclarationMissingInitializer { span: Span },

    #[error("comma is not permitted after the rest element")]
    ElementAfterRest { span: Span },

    #[error("'await' is only valid in async function")]
    AwaitOutsideFunction { span: Span },

    #[error("'yield' is only valid inside a generator function")]
    YieldOutsideGenerator { span: Span },

    #[error("'{keyword}' outside of function")]
    IllegalReturn { keyword: &'static str, span: Span },

    #[error("'{keyword}' is a reserved word")]
    ReservedWord { keyword: String, span: Span },

    #[error("import and export may only appear at the top level")]
    ImportExportOutsideModule { span: Span },

    #[error("duplicate export '{name}'")]
    DuplicateExport { name: String, span: Span },

    #[error("export '{name}' is not defined")]
    ModuleExportUndefined { name: String, span: Span },

    #[error("a labeled statement can't target a loop or switch outside the label")]
    IllegalBreakContinue { is_break: bool, span: Span },

    #[error("label '{name}' is not defined")]
    UndefinedLabel { name: String, span: Span },

    #[error("label '{name}' is already declared")]
    DuplicateLabel { name: String, span: Span },

    #[error("unexpected statement: expected {expected}")]
    UnexpectedStatement { expected: &'static str, span: Span },

    #[error("new.target can only be used in functions")]
    InvalidNewTarget { span: Span },

    #[error("'with' in strict mode")]
    StrictWith { span: Span },

    #[error("'delete' of an unqualified identifier in strict mode")]
    StrictDelete { span: Span },

    #[error("optional chaining cannot appear in an optional chain call with 'new'")]
    OptionalChainNew { span: Span },

    #[error("invalid tagged template on optional chain")]
    OptionalChainTaggedTemplate { span: Span },
}

impl ParserError {
    pub fn span(&self) -> Span {
        use ParserError::*;
        match self {
            Unexpected { span, .. }
            | UnterminatedStringLiteral { span }
            | UnterminatedComment { span }
            | UnterminatedTemplate { span }
            | StrictOctalLiteral { span }
            | StrictNumericEscape { span }
            | IdentifierAfterNumber { span }
            | InvalidToken { span }
            | InvalidNumber { span }
            | ZeroDigitNumericSeparator { span }
            | UnexpectedChar { span, .. }
            | StrictOctalInTemplate { span }
            | UnterminatedRegExp { span }
            | InvalidRegExp { span, .. }
            | InvalidNamedCapture { span }
            | DuplicateCaptureGroupName { span }
            | QuantifierOutOfOrder { span }
            | CharacterClassRangeOutOfOrder { span }
            | InvalidUnicodePropertyEscape { span, .. }
            | AlreadyDeclared { span, .. }
            | StrictReservedWord { span, .. }
            | StrictAssignToReadonly { span, .. }
            | StrictParamDupe { span }
            | InvalidAssignmentTarget { span }
            | RestDefault { span }
            | RestTrailingComma { span }
            | DeclarationMissingInitializer { span }
            | ElementAfterRest { span }
            | AwaitOutsideFunction { span }
            | YieldOutsideGenerator { span }
            | IllegalReturn { span, .. }
            | ReservedWord { span, .. }
            | ImportExportOutsideModule { span }
            | DuplicateExport { span, .. }
            | ModuleExportUndefined { span, .. }
            | IllegalBreakContinue { span, .. }
            | UndefinedLabel { span, .. }
            | DuplicateLabel { span, .. }
            | UnexpectedStatement { span, .. }
            | InvalidNewTarget { span }
            | StrictWith { span }
            | StrictDelete { span }
            | OptionalChainNew { span }
            | OptionalChainTaggedTemplate { span } => *span,
        }
    }

    /// Whether this category defaults to "recoverable" (collected by the
    /// handler rather than aborting the parse immediately). Only a handful
    /// of ambiguous-but-not-fatal cases qualify; everything else is fatal.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ParserError::AlreadyDeclared { .. } | ParserError::DuplicateExport { .. } | ParserError::ModuleExportUndefined { .. }
        )
    }

    pub fn unexpected(found: impl fmt::Display, expected: impl fmt::Display, span: Span) -> Self {
        ParserError::Unexpected {
            found: found.to_string(),
            expected: expected.to_string(),
            span,
        }
    }
}
