//! The tokenizer's output alphabet: a closed set of token kinds plus the
//! per-kind metadata (`before_expr`, `is_assign`, label text) the context
//! stack and operator-precedence table consult.

use esparse_span::{Span, Symbol};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A scanned token: its kind, payload, and the span of source it covers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub value: TokenValue,
    pub span: Span,
    /// Set when a line terminator was skipped between the previous token and
    /// this one; `canInsertSemicolon`/ASI consults this instead of a
    /// dedicated `LineTerminator` token kind.
    pub preceded_by_newline: bool,
}

impl Token {
    pub fn eof(span: Span) -> Self {
        Token {
            kind: TokenKind::Eof,
            value: TokenValue::None,
            span,
            preceded_by_newline: false,
        }
    }
}

/// The lexeme-dependent payload carried by a token.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TokenValue {
    None,
    /// The literal operator text for a token kind that covers more than one
    /// concrete operator (`Equality` covers `==`/`!=`/`===`/`!==`,
    /// `Assign` covers every compound assignment, etc.) -- mirrors Acorn
    /// storing the operator string on `token.value` rather than minting a
    /// token kind per operator spelling.
    Op(&'static str),
    Str(String),
    Ident(Symbol),
    Num(f64),
    BigInt(String),
    Template { cooked: Option<String>, raw: String },
    Regex { pattern: String, flags: String },
}

macro_rules! token_kinds {
    (
        $(#[$meta:meta])*
        pub enum TokenKind {
            $( $variant:ident { label: $label:expr, before_expr: $before_expr:expr $(, keyword: $kw:expr)? $(,)? } ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        pub enum TokenKind {
            $( $variant ),*
        }

        impl TokenKind {
            pub fn label(self) -> &'static str {
                match self {
                    $( TokenKind::$variant => $label, )*
                }
            }

            /// Whether an expression may legally begin right after this
            /// token -- the default the context stack's `expr_allowed` flag
            /// resets to after each token, absent an `update_context`
            /// override for that specific kind.
            pub fn before_expr(self) -> bool {
                match self {
                    $( TokenKind::$variant => $before_expr, )*
                }
            }
        }
    };
}

token_kinds! {
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Eof { label: "eof", before_expr: false },

    Num { label: "num", before_expr: false },
    BigInt { label: "bigint", before_expr: false },
    Regexp { label: "regexp", before_expr: false },
    Str { label: "string", before_expr: false },
    Name { label: "name", before_expr: false },
    PrivateName { label: "privateName", before_expr: false },
    InvalidTemplate { label: "invalidTemplate", before_expr: false },

    BackQuote { label: "`", before_expr: false },
    TemplateHead { label: "template_head", before_expr: false },
    TemplateMiddle { label: "template_middle", before_expr: false },
    TemplateTail { label: "template_tail", before_expr: false },
    DollarBraceL { label: "${", before_expr: true },

    BracketL { label: "[", before_expr: true },
    BracketR { label: "]", before_expr: false },
    BraceL { label: "{", before_expr: true },
    BraceR { label: "}", before_expr: false },
    ParenL { label: "(", before_expr: true },
    ParenR { label: ")", before_expr: false },
    Comma { label: ",", before_expr: true },
    Semi { label: ";", before_expr: true },
    Colon { label: ":", before_expr: true },
    Dot { label: ".", before_expr: false },
    Question { label: "?", before_expr: true },
    QuestionDot { label: "?.", before_expr: false },
    Arrow { label: "=>", before_expr: true },
    Ellipsis { label: "...", before_expr: true },

    Eq { label: "=", before_expr: true },
    Assign { label: "_=", before_expr: true },
    IncDec { label: "++/--", before_expr: false },
    Prefix { label: "!/~", before_expr: true },
    LogicalOr { label: "||", before_expr: true },
    LogicalAnd { label: "&&", before_expr: true },
    Nullish { label: "??", before_expr: true },
    BitwiseOr { label: "|", before_expr: true },
    BitwiseXor { label: "^", before_expr: true },
    BitwiseAnd { label: "&", before_expr: true },
    Equality { label: "==/!=", before_expr: true },
    Relational { label: "</>", before_expr: true },
    BitShift { label: "<</>>", before_expr: true },
    PlusMin { label: "+/-", before_expr: true },
    Modulo { label: "%", before_expr: true },
    Star { label: "*", before_expr: true },
    Slash { label: "/", before_expr: true },
    StarStar { label: "**", before_expr: true },

    Break { label: "break", before_expr: false, keyword: true },
    Case { label: "case", before_expr: true, keyword: true },
    Catch { label: "catch", before_expr: false, keyword: true },
    Continue { label: "continue", before_expr: false, keyword: true },
    Debugger { label: "debugger", before_expr: false, keyword: true },
    Default { label: "default", before_expr: true, keyword: true },
    Do { label: "do", before_expr: true, keyword: true },
    Else { label: "else", before_expr: true, keyword: true },
    Finally { label: "finally", before_expr: false, keyword: true },
    For { label: "for", before_expr: false, keyword: true },
    Function { label: "function", before_expr: true, keyword: true },
    If { label: "if", before_expr: false, keyword: true },
    Return { label: "return", before_expr: true, keyword: true },
    Switch { label: "switch", before_expr: false, keyword: true },
    Throw { label: "throw", before_expr: true, keyword: true },
    Try { label: "try", before_expr: false, keyword: true },
    Var { label: "var", before_expr: false, keyword: true },
    Const { label: "const", before_expr: false, keyword: true },
    While { label: "while", before_expr: false, keyword: true },
    With { label: "with", before_expr: false, keyword: true },
    New { label: "new", before_expr: true, keyword: true },
    This { label: "this", before_expr: false, keyword: true },
    Super { label: "super", before_expr: false, keyword: true },
    Class { label: "class", before_expr: true, keyword: true },
    Extends { label: "extends", before_expr: true, keyword: true },
    Export { label: "export", before_expr: false, keyword: true },
    Import { label: "import", before_expr: true, keyword: true },
    Null { label: "null", before_expr: false, keyword: true },
    True { label: "true", before_expr: false, keyword: true },
    False { label: "false", before_expr: false, keyword: true },
    In { label: "in", before_expr: true, keyword: true },
    InstanceOf { label: "instanceof", before_expr: true, keyword: true },
    Typeof { label: "typeof", before_expr: true, keyword: true },
    Void { label: "void", before_expr: true, keyword: true },
    Delete { label: "delete", before_expr: true, keyword: true },
}
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether `kind` is a compound-assignment operator (`+=`, `**=`, `??=`, …).
/// Plain `=` is handled separately (`TokenKind::Eq`) since it never desugars
/// to a binary op.
pub fn is_assign_kind(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::Assign)
}

/// Contextual (non-reserved-word) keywords recognized only by position:
/// `async`, `await`, `yield`, `let`, `static`, `of`, `get`, `set`, `from`,
/// `as`. These are lexed as plain `Name` tokens with the matching `Symbol`,
/// and the parser inspects `token.value` to special-case them, mirroring
/// how the original treats them as identifiers with contextual meaning
/// rather than as reserved-word token kinds.
pub const CONTEXTUAL_KEYWORDS: &[&str] =
    &["async", "await", "yield", "let", "static", "of", "get", "set", "from", "as"];
