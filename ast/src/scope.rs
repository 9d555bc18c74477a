//! Lexical scope tracking for duplicate-binding detection, and the
//! cover-grammar error record used to parse object/array literals and
//! parenthesized lists as the superset of expression-or-pattern shape.

use esparse_span::{Span, Symbol};

bitflags::bitflags! {
    /// Scope kind flags. A function scope sets FUNCTION (and ARROW/ASYNC/
    /// GENERATOR/SUPER/DIRECT_SUPER as applicable); a bare block sets none
    /// of those; the outermost scope additionally sets TOP.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct ScopeFlags: u16 {
        const VAR = 1 << 0;
        const FUNCTION = 1 << 1;
        const ASYNC = 1 << 2;
        const GENERATOR = 1 << 3;
        const ARROW = 1 << 4;
        const SIMPLE_CATCH = 1 << 5;
        const SUPER = 1 << 6;
        const DIRECT_SUPER = 1 << 7;
        const TOP = 1 << 8;
    }
}

/// The kind of binding being declared, which determines what an existing
/// binding of the same name in the same or an enclosing scope conflicts
/// with.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BindingKind {
    Lexical,
    SimpleCatch,
    Function,
    Var,
    /// Used only to validate a name (e.g. as an operand of `typeof`), never
    /// to declare one.
    Outside,
}

#[derive(Default, Debug)]
pub struct Scope {
    pub flags: ScopeFlags,
    pub var: Vec<Symbol>,
    pub lexical: Vec<Symbol>,
    pub functions: Vec<Symbol>,
}

impl Scope {
    pub fn new(flags: ScopeFlags) -> Self {
        Scope {
            flags,
            var: Vec::new(),
            lexical: Vec::new(),
            functions: Vec::new(),
        }
    }

    pub fn is_function(&self) -> bool {
        self.flags.contains(ScopeFlags::FUNCTION)
    }
}

/// A LIFO stack of scopes with the binding-declaration rules from the
/// language's block-scoping semantics. One stack lives per `Parser`.
#[derive(Default)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    pub fn new() -> Self {
        ScopeStack {
            scopes: vec![Scope::new(ScopeFlags::TOP | ScopeFlags::VAR)],
        }
    }

    pub fn push(&mut self, flags: ScopeFlags) {
        self.scopes.push(Scope::new(flags));
    }

    pub fn pop(&mut self) {
        self.scopes.pop();
        debug_assert!(!self.scopes.is_empty(), "popped the top-level scope");
    }

    pub fn current(&self) -> &Scope {
        self.scopes.last().expect("scope stack is never empty")
    }

    pub fn current_mut(&mut self) -> &mut Scope {
        self.scopes.last_mut().expect("scope stack is never empty")
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Nearest enclosing scope whose flags satisfy `pred` (searched from the
    /// top), used to find the function scope (`var`-hoisting target) or
    /// the top-level module scope.
    fn nearest<'a>(&'a self, pred: impl Fn(&ScopeFlags) -> bool) -> &'a Scope {
        self.scopes.iter().rev().find(|s| pred(&s.flags)).unwrap_or_else(|| &self.scopes[0])
    }

    fn nearest_idx(&self, pred: impl Fn(&ScopeFlags) -> bool) -> usize {
        self.scopes
            .iter()
            .enumerate()
            .rev()
            .find(|(_, s)| pred(&s.flags))
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    pub fn in_function(&self) -> bool {
        self.nearest(|f| f.contains(ScopeFlags::FUNCTION)).flags.contains(ScopeFlags::FUNCTION)
    }

    pub fn in_async(&self) -> bool {
        self.nearest(|f| f.contains(ScopeFlags::FUNCTION)).flags.contains(ScopeFlags::ASYNC)
    }

    pub fn in_generator(&self) -> bool {
        self.nearest(|f| f.contains(ScopeFlags::FUNCTION)).flags.contains(ScopeFlags::GENERATOR)
    }

    pub fn allow_super(&self) -> bool {
        self.nearest(|f| f.contains(ScopeFlags::FUNCTION) || f.contains(ScopeFlags::TOP))
            .flags
            .contains(ScopeFlags::SUPER)
    }

    /// Declares `name` of the given `kind` at `pos`, returning the existing
    /// diagnostic-worthy conflict, if any, as a plain bool (the caller
    /// constructs and emits the actual `ParserError`, since this module does
    /// not depend on the errors crate).
    pub fn declare_name(&mut self, name: Symbol, kind: BindingKind, _pos: Span) -> Result<(), DuplicateBinding> {
        match kind {
            BindingKind::Lexical => {
                let idx = self.scopes.len() - 1;
                let scope = &self.scopes[idx];
                if scope.lexical.contains(&name) || scope.functions.contains(&name) || scope.var.contains(&name) {
                    return Err(DuplicateBinding);
                }
                self.scopes[idx].lexical.push(name);
            }
            BindingKind::SimpleCatch => {
                let idx = self.scopes.len() - 1;
                self.scopes[idx].lexical.push(name);
            }
            BindingKind::Function => {
                let idx = self.scopes.len() - 1;
                let scope = &self.scopes[idx];
                if scope.lexical.contains(&name) {
                    return Err(DuplicateBinding);
                }
                self.scopes[idx].functions.push(name);
            }
            BindingKind::Var => {
                let idx = self.nearest_idx(|f| f.contains(ScopeFlags::VAR));
                for i in (0..=idx).rev() {
                    let scope = &self.scopes[i];
                    if scope.lexical.contains(&name) && !(scope.flags.contains(ScopeFlags::SIMPLE_CATCH) && i == idx) {
                        return Err(DuplicateBinding);
                    }
                    if i != idx && scope.functions.contains(&name) {
                        return Err(DuplicateBinding);
                    }
                    if i == idx {
                        break;
                    }
                }
                self.scopes[idx].var.push(name);
            }
            BindingKind::Outside => {}
        }
        Ok(())
    }
}

pub struct DuplicateBinding;

/// Offsets captured while parsing a cover grammar -- a construct that reads
/// as either an expression or a binding pattern depending on what follows it
/// (`(a, b)` vs `(a, b) => …`; `{a}` vs `{a} = x`). `None` means "not seen".
#[derive(Default, Clone, Debug)]
pub struct DestructuringErrors {
    pub shorthand_assign: Option<u32>,
    pub trailing_comma: Option<u32>,
    pub parenthesized_assign: Option<u32>,
    pub parenthesized_bind: Option<u32>,
    pub double_proto: Option<u32>,
}

impl DestructuringErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.shorthand_assign.is_none()
            && self.trailing_comma.is_none()
            && self.parenthesized_assign.is_none()
            && self.parenthesized_bind.is_none()
            && self.double_proto.is_none()
    }
}
