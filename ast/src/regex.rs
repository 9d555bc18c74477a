//! Flag parsing for regular-expression literals. The pattern body itself is
//! validated (not turned into its own AST -- the validator only needs to
//! reject malformed patterns, not build a tree a later pass would consume)
//! by `esparse_parser::regexp`.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegExpFlags {
    pub global: bool,
    pub ignore_case: bool,
    pub multiline: bool,
    pub unicode: bool,
    pub sticky: bool,
    pub dot_all: bool,
    pub has_indices: bool,
    pub unicode_sets: bool,
}

impl RegExpFlags {
    /// Parses a flag string, rejecting unknown or duplicate flags.
    pub fn parse(flags: &str) -> Result<Self, char> {
        let mut out = RegExpFlags::default();
        for ch in flags.chars() {
            let seen = match ch {
                'g' => &mut out.global,
                'i' => &mut out.ignore_case,
                'm' => &mut out.multiline,
                'u' => &mut out.unicode,
                'y' => &mut out.sticky,
                's' => &mut out.dot_all,
                'd' => &mut out.has_indices,
                'v' => &mut out.unicode_sets,
                other => return Err(other),
            };
            if *seen {
                return Err(ch);
            }
            *seen = true;
        }
        if out.unicode && out.unicode_sets {
            return Err('v');
        }
        Ok(out)
    }
}
