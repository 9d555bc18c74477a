//! Source positions, byte spans, and a small symbol interner shared by every
//! other crate in the workspace.
//!
//! Positions are counted in UTF-16 code units, matching the indices the
//! tokenizer and parser exchange with callers (mirroring how host JS engines
//! report offsets).

use std::cell::RefCell;
use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

mod symbol;
pub use symbol::{sym, Symbol, SymbolInterner};

scoped_tls::scoped_thread_local!(static SOURCE_FILE: SourceFile);

/// Runs `f` with `source` installed as the thread-local source file used to
/// resolve diagnostic spans to line/column positions. A `Parser` session
/// should be wrapped in this the same way it is wrapped in
/// [`with_symbol_interner`].
pub fn with_source_file<R>(source: &str, f: impl FnOnce() -> R) -> R {
    let file = SourceFile::new(None, source);
    SOURCE_FILE.set(&file, f)
}

/// Resolves `span` to a [`Loc`] against the thread-local source file
/// installed by [`with_source_file`]. Outside such a scope (e.g. a unit test
/// constructing a `Diagnostic` directly) falls back to a degenerate
/// single-line resolution rather than panicking.
pub fn resolve_loc(span: Span) -> Loc {
    if SOURCE_FILE.is_set() {
        SOURCE_FILE.with(|f| f.loc(span))
    } else {
        let start = Position { line: 1, column: span.lo.to_usize() };
        let end = Position { line: 1, column: span.hi.to_usize() };
        Loc { start, end }
    }
}

/// A byte (UTF-16 code unit) offset into a source buffer.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BytePos(pub u32);

impl BytePos {
    pub const fn from_usize(n: usize) -> Self {
        BytePos(n as u32)
    }

    pub const fn to_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for BytePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BytePos({})", self.0)
    }
}

impl Add<u32> for BytePos {
    type Output = BytePos;
    fn add(self, rhs: u32) -> BytePos {
        BytePos(self.0 + rhs)
    }
}

impl Add<usize> for BytePos {
    type Output = BytePos;
    fn add(self, rhs: usize) -> BytePos {
        BytePos(self.0 + rhs as u32)
    }
}

/// A 1-based line, 0-based column position, both in UTF-16 code units.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open byte range `[lo, hi)` in some source buffer.
///
/// Spans compose with `+`: the union of two spans is the smallest span
/// covering both, which is how parent-node spans are built up from their
/// children's spans while parsing.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub lo: BytePos,
    pub hi: BytePos,
}

impl Span {
    pub const fn new(lo: BytePos, hi: BytePos) -> Self {
        Span { lo, hi }
    }

    /// A zero-length span used where no real location is available (e.g.
    /// synthesized error-recovery nodes).
    pub const fn dummy() -> Self {
        Span { lo: BytePos(0), hi: BytePos(0) }
    }

    pub fn is_dummy(&self) -> bool {
        self.lo.0 == 0 && self.hi.0 == 0
    }

    pub fn len(&self) -> usize {
        self.hi.to_usize().saturating_sub(self.lo.to_usize())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.lo.0, self.hi.0)
    }
}

/// Span union: the smallest span covering both operands.
impl Add for Span {
    type Output = Span;
    fn add(self, rhs: Span) -> Span {
        if self.is_dummy() {
            return rhs;
        }
        if rhs.is_dummy() {
            return self;
        }
        Span {
            lo: self.lo.min(rhs.lo),
            hi: self.hi.max(rhs.hi),
        }
    }
}

impl Add<BytePos> for Span {
    type Output = Span;
    fn add(self, rhs: BytePos) -> Span {
        Span {
            lo: self.lo.min(rhs),
            hi: self.hi.max(rhs),
        }
    }
}

/// A source location pairing a span with its resolved start/end `Position`s,
/// attached to nodes and tokens when the caller opts into `locations`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loc {
    pub start: Position,
    pub end: Position,
}

/// Indexes the line-start offsets of a source buffer lazily, on first
/// position lookup, rather than up front -- most parses never need it
/// (locations/ranges are off by default).
pub struct SourceFile {
    pub name: Option<String>,
    src: Vec<u16>,
    line_starts: RefCell<Option<Vec<BytePos>>>,
}

impl SourceFile {
    pub fn new(name: Option<String>, source: &str) -> Self {
        SourceFile {
            name,
            src: source.encode_utf16().collect(),
            line_starts: RefCell::new(None),
        }
    }

    pub fn units(&self) -> &[u16] {
        &self.src
    }

    pub fn len(&self) -> usize {
        self.src.len()
    }

    pub fn is_empty(&self) -> bool {
        self.src.is_empty()
    }

    fn ensure_index(&self) {
        let mut cache = self.line_starts.borrow_mut();
        if cache.is_some() {
            return;
        }
        let mut starts = vec![BytePos(0)];
        for (i, &unit) in self.src.iter().enumerate() {
            if unit == 0x000A || unit == 0x2028 || unit == 0x2029 {
                starts.push(BytePos::from_usize(i + 1));
            } else if unit == 0x000D {
                // `\r\n` counts as a single line terminator.
                if self.src.get(i + 1) != Some(&0x000A) {
                    starts.push(BytePos::from_usize(i + 1));
                }
            }
        }
        *cache = Some(starts);
    }

    /// Resolves a byte offset to a 1-based line / 0-based column position.
    pub fn position(&self, pos: BytePos) -> Position {
        self.ensure_index();
        let cache = self.line_starts.borrow();
        let starts = cache.as_ref().unwrap();
        let line_idx = match starts.binary_search(&pos) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let line_start = starts[line_idx];
        Position {
            line: line_idx + 1,
            column: pos.to_usize() - line_start.to_usize(),
        }
    }

    pub fn loc(&self, span: Span) -> Loc {
        Loc {
            start: self.position(span.lo),
            end: self.position(span.hi),
        }
    }

    /// The raw UTF-16 slice covered by `span`, decoded back to a `String`.
    pub fn slice(&self, span: Span) -> String {
        String::from_utf16_lossy(&self.src[span.lo.to_usize()..span.hi.to_usize()])
    }
}
