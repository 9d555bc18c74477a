//! Side-channel error collection, so deep-in-the-parse call sites can emit a
//! diagnostic without threading a `Result` back through every caller for the
//! "recoverable" categories (duplicate bindings, undefined module exports).

use std::cell::RefCell;

use crate::{Diagnostic, ParserError};

/// Collects diagnostics emitted during one parse session.
///
/// Fatal diagnostics still propagate as `Err` from the call that raised
/// them; `Handler` exists for the subset of errors the grammar allows a
/// caller to continue past (see [`ParserError::is_recoverable`]) and for
/// giving a caller visibility into every diagnostic raised, fatal or not.
#[derive(Default)]
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
    had_fatal: RefCell<bool>,
}

impl Handler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `err`. Recoverable categories are only recorded; fatal
    /// categories additionally flip [`Handler::had_fatal_error`].
    pub fn emit_err(&self, err: ParserError) {
        let diag: Diagnostic = err.into();
        if !diag.recoverable {
            *self.had_fatal.borrow_mut() = true;
        }
        self.diagnostics.borrow_mut().push(diag);
    }

    pub fn had_fatal_error(&self) -> bool {
        *self.had_fatal.borrow()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.borrow().is_empty()
    }
}
