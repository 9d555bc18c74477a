//! Global symbol interning, modeled on a scoped thread-local table so that
//! `Symbol` stays `Copy` and comparisons stay pointer/integer cheap, the way
//! identifier interning works in production compiler front-ends.

use std::cell::RefCell;
use std::fmt;

use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

scoped_tls::scoped_thread_local!(static INTERNER: RefCell<SymbolInterner>);

/// An interned identifier or keyword. Cheap to copy and compare; resolve back
/// to text with [`Symbol::as_str`].
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Symbol(u32);

impl Symbol {
    pub fn intern(s: &str) -> Symbol {
        if INTERNER.is_set() {
            INTERNER.with(|i| i.borrow_mut().intern(s))
        } else {
            // Outside a `with_session_globals` scope (e.g. in a unit test that
            // only needs a couple of symbols), fall back to a private
            // process-local table rather than panicking.
            thread_local! {
                static FALLBACK: RefCell<SymbolInterner> = RefCell::new(SymbolInterner::new());
            }
            FALLBACK.with(|i| i.borrow_mut().intern(s))
        }
    }

    pub fn as_str(&self) -> &'static str {
        if INTERNER.is_set() {
            INTERNER.with(|i| i.borrow().resolve(self.0))
        } else {
            thread_local! {
                static FALLBACK: RefCell<SymbolInterner> = RefCell::new(SymbolInterner::new());
            }
            FALLBACK.with(|i| i.borrow().resolve(self.0))
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

/// The actual string table. One lives for the duration of a parse session;
/// [`Symbol`] values from different sessions are not comparable.
pub struct SymbolInterner {
    strings: Vec<&'static str>,
    names: FxHashMap<&'static str, u32>,
}

impl SymbolInterner {
    pub fn new() -> Self {
        let mut interner = SymbolInterner {
            strings: Vec::with_capacity(keywords::ALL.len()),
            names: FxHashMap::default(),
        };
        for kw in keywords::ALL {
            interner.intern(kw);
        }
        interner
    }

    fn intern(&mut self, s: &str) -> Symbol {
        if let Some(&id) = self.names.get(s) {
            return Symbol(id);
        }
        let id = self.strings.len() as u32;
        // Leak once; symbols live for the process/session lifetime, matching
        // the teacher's interner which never frees entries either.
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        self.strings.push(leaked);
        self.names.insert(leaked, id);
        Symbol(id)
    }

    fn resolve(&self, id: u32) -> &'static str {
        self.strings[id as usize]
    }
}

impl Default for SymbolInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs `f` with a fresh interner installed as the thread-local symbol table.
/// A `Parser` session should be wrapped in this so every `Symbol` it produces
/// shares one table; nested calls are not supported (matches the single
/// top-level parse session assumption documented on `Parser`).
pub fn with_symbol_interner<R>(f: impl FnOnce() -> R) -> R {
    let cell = RefCell::new(SymbolInterner::new());
    INTERNER.set(&cell, f)
}

/// Predeclared symbols for names the parser/console-statement checks refer to
/// by identity rather than by re-parsing a string each time.
pub mod sym {
    use super::Symbol;

    macro_rules! predeclare {
        ($($name:ident => $text:expr),* $(,)?) => {
            $(
                #[allow(non_upper_case_globals)]
                pub fn $name() -> Symbol { Symbol::intern($text) }
            )*
        };
    }

    predeclare! {
        r#async => "async",
        of => "of",
        get => "get",
        set => "set",
        from => "from",
        as_ => "as",
        target => "target",
        meta => "meta",
        eval => "eval",
        arguments => "arguments",
        let_ => "let",
        r#yield => "yield",
        r#await => "await",
        static_ => "static",
        prototype => "prototype",
        constructor => "constructor",
    }
}

pub(crate) mod keywords {
    pub const ALL: &[&str] = &[
        "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do", "else",
        "export", "extends", "finally", "for", "function", "if", "import", "in", "instanceof", "new", "return",
        "super", "switch", "this", "throw", "try", "typeof", "var", "void", "while", "with", "null", "true", "false",
        "let", "static", "yield", "await", "async", "of", "get", "set", "from", "as", "target", "meta", "enum",
        "implements", "interface", "package", "private", "protected", "public",
    ];
}
