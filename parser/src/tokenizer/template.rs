//! Template literal scanning. A template chunk is scanned twice depending on
//! mode: `Strict` (a plain template or the cooked value of a tagged one) and
//! `Tagged`, where an invalid escape does not abort the scan but instead
//! marks the chunk `InvalidTemplate` (the `value.cooked == None` case
//! `String.raw`/custom tag functions rely on). Implemented as a
//! `Result`-returning function with a mode flag rather than throw/catch
//! sentinel unwinding.

use esparse_errors::{ParserError, Result};
use esparse_span::{BytePos, Span};

use super::cursor::Cursor;
use super::string::scan_escape;

#[derive(Copy, Clone, PartialEq, Eq)]
pub enum TemplateMode {
    Strict,
    Tagged,
}

pub struct TemplateChunk {
    pub cooked: Option<String>,
    pub raw: String,
    /// True if scanning stopped at `${`; false if it stopped at the closing
    /// backtick (a tail chunk).
    pub has_substitution: bool,
}

/// Scans from just after the opening `` ` `` or `}` (a template continuation)
/// up to the next `${` or closing `` ` ``.
pub fn scan_template_chunk(cur: &mut Cursor, mode: TemplateMode, lo: BytePos) -> Result<TemplateChunk> {
    let raw_start = cur.pos();
    let mut cooked = String::new();
    let mut cooked_ok = true;

    loop {
        match cur.peek() {
            None => {
                return Err(ParserError::UnterminatedTemplate {
                    span: Span::new(lo, BytePos::from_usize(cur.pos())),
                }
                .into())
            }
            Some(u) if u == b'`' as u16 => {
                let raw = cur.slice_to_string(raw_start, cur.pos());
                cur.bump();
                return Ok(TemplateChunk {
                    cooked: cooked_ok.then_some(cooked),
                    raw,
                    has_substitution: false,
                });
            }
            Some(u) if u == b'$' as u16 && cur.peek_at(1) == Some(b'{' as u16) => {
                let raw = cur.slice_to_string(raw_start, cur.pos());
                cur.advance(2);
                return Ok(TemplateChunk {
                    cooked: cooked_ok.then_some(cooked),
                    raw,
                    has_substitution: true,
                });
            }
            Some(u) if u == b'\\' as u16 => {
                cur.bump();
                match scan_escape(cur, lo) {
                    Ok(Some((ch, octal_at))) => {
                        if octal_at.is_some() {
                            match mode {
                                TemplateMode::Strict => {
                                    return Err(ParserError::StrictOctalInTemplate {
                                        span: Span::new(lo, BytePos::from_usize(cur.pos())),
                                    }
                                    .into())
                                }
                                TemplateMode::Tagged => cooked_ok = false,
                            }
                        }
                        if cooked_ok {
                            cooked.push(ch);
                        }
                    }
                    Ok(None) => {}
                    Err(e) => match mode {
                        TemplateMode::Strict => return Err(e),
                        TemplateMode::Tagged => {
                            cooked_ok = false;
                            // Resynchronize: consume one more unit so we
                            // make scanning progress past the bad escape.
                            cur.bump();
                        }
                    },
                }
            }
            Some(u) if u == 0x000D => {
                // `\r` and `\r\n` both normalize to `\n` in the cooked and
                // raw template value.
                cur.bump();
                cur.eat(0x000A);
                cooked.push('\n');
            }
            Some(_) => {
                let c = cur.bump_char().expect("peeked Some");
                if cooked_ok {
                    cooked.push(c);
                }
            }
        }
    }
}
