//! ESTree node definitions, the token alphabet, and scope/cover-grammar
//! bookkeeping shared between the tokenizer and parser crates.

pub mod node;
pub mod regex;
pub mod scope;
pub mod token;

pub use node::*;
pub use scope::{BindingKind, DestructuringErrors, Scope, ScopeFlags, ScopeStack};
pub use token::{Token, TokenKind, TokenValue};
