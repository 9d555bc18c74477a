//! String literal scanning: quote matching, escape decoding, legacy octal
//! escapes (strict-mode illegal), and line continuations.

use esparse_errors::{ParserError, Result};
use esparse_span::{BytePos, Span};

use super::cursor::Cursor;

pub struct StringResult {
    pub cooked: String,
    /// Offset of a legacy octal/`\8`/`\9` escape, if one was seen -- the
    /// caller decides whether that's fatal (it is, in strict mode).
    pub octal_escape_at: Option<BytePos>,
}

pub fn scan_string(cur: &mut Cursor, quote: u16, lo: BytePos) -> Result<StringResult> {
    let mut out = String::new();
    let mut octal_escape_at = None;
    loop {
        match cur.peek() {
            None => {
                return Err(ParserError::UnterminatedStringLiteral {
                    span: Span::new(lo, BytePos::from_usize(cur.pos())),
                }
                .into())
            }
            Some(u) if u == quote => {
                cur.bump();
                break;
            }
            Some(u) if super::identifier::is_line_terminator(u as u32) && u != 0x2028 && u != 0x2029 => {
                return Err(ParserError::UnterminatedStringLiteral {
                    span: Span::new(lo, BytePos::from_usize(cur.pos())),
                }
                .into())
            }
            Some(u) if u == b'\\' as u16 => {
                cur.bump();
                if let Some((ch, escape_octal_at)) = scan_escape(cur, lo)? {
                    out.push(ch);
                    if escape_octal_at.is_some() {
                        octal_escape_at = octal_escape_at.or(escape_octal_at);
                    }
                }
            }
            Some(_) => {
                let c = cur.bump_char().expect("peeked Some");
                out.push(c);
            }
        }
    }
    Ok(StringResult { cooked: out, octal_escape_at })
}

/// Decodes one escape sequence after the backslash has already been
/// consumed. Returns `None` for a line-continuation (backslash followed by a
/// line terminator), which contributes no character to the cooked value.
pub fn scan_escape(cur: &mut Cursor, lo: BytePos) -> Result<Option<(char, Option<BytePos>)>> {
    let start = BytePos::from_usize(cur.pos());
    let u = match cur.peek() {
        Some(u) => u,
        None => {
            return Err(ParserError::UnterminatedStringLiteral {
                span: Span::new(lo, start),
            }
            .into())
        }
    };

    // Line continuation: `\` + line terminator is elided entirely.
    if super::identifier::is_line_terminator(u as u32) {
        if u == 0x000D {
            cur.bump();
            cur.eat(0x000A);
        } else {
            cur.bump();
        }
        return Ok(None);
    }

    let ch = match u {
        x if x == b'n' as u16 => {
            cur.bump();
            '\n'
        }
        x if x == b'r' as u16 => {
            cur.bump();
            '\r'
        }
        x if x == b't' as u16 => {
            cur.bump();
            '\t'
        }
        x if x == b'b' as u16 => {
            cur.bump();
            '\u{8}'
        }
        x if x == b'f' as u16 => {
            cur.bump();
            '\u{C}'
        }
        x if x == b'v' as u16 => {
            cur.bump();
            '\u{B}'
        }
        x if x == b'x' as u16 => {
            cur.bump();
            scan_hex_escape(cur, 2, lo)?
        }
        x if x == b'u' as u16 => {
            cur.bump();
            scan_unicode_escape(cur, lo)?
        }
        x if x == b'0' as u16 => {
            cur.bump();
            if matches!(cur.peek(), Some(d) if (b'0' as u16..=b'9' as u16).contains(&d)) {
                let oct_start = cur.pos() - 1;
                cur.set_pos(oct_start);
                return scan_legacy_octal_escape(cur, lo).map(Some);
            }
            '\0'
        }
        x if (b'1' as u16..=b'7' as u16).contains(&x) => {
            return scan_legacy_octal_escape(cur, lo).map(Some);
        }
        x if x == b'8' as u16 || x == b'9' as u16 => {
            cur.bump();
            return Ok(Some((char::from_u32(x as u32).unwrap(), Some(start))));
        }
        _ => cur.bump_char().expect("checked Some above"),
    };
    Ok(Some((ch, None)))
}

fn scan_legacy_octal_escape(cur: &mut Cursor, lo: BytePos) -> Result<(char, Option<BytePos>)> {
    let start = BytePos::from_usize(cur.pos());
    let mut value: u32 = 0;
    for i in 0..3 {
        match cur.peek() {
            Some(d) if (b'0' as u16..=b'7' as u16).contains(&d) => {
                let digit = d as u32 - b'0' as u32;
                let candidate = value * 8 + digit;
                if i == 2 && candidate > 0xFF {
                    break;
                }
                value = candidate;
                cur.bump();
            }
            _ => break,
        }
    }
    let _ = lo;
    Ok((char::from_u32(value).unwrap_or('\0'), Some(start)))
}

fn scan_hex_escape(cur: &mut Cursor, len: usize, lo: BytePos) -> Result<char> {
    let start = cur.pos();
    let mut value: u32 = 0;
    for _ in 0..len {
        let d = cur.peek().and_then(|u| hex_digit(u)).ok_or_else(|| -> esparse_errors::Diagnostic {
            ParserError::InvalidToken {
                span: Span::new(lo, BytePos::from_usize(cur.pos())),
            }
            .into()
        })?;
        value = value * 16 + d;
        cur.bump();
    }
    let _ = start;
    Ok(char::from_u32(value).unwrap_or('\u{FFFD}'))
}

/// `\uHHHH` or `\u{H...H}` (the braced form, ES2015+).
pub fn scan_unicode_escape(cur: &mut Cursor, lo: BytePos) -> Result<char> {
    if cur.eat(b'{' as u16) {
        let mut value: u32 = 0;
        let mut any = false;
        while let Some(d) = cur.peek().and_then(hex_digit) {
            value = value.saturating_mul(16).saturating_add(d);
            any = true;
            cur.bump();
            if value > 0x10FFFF {
                return Err(ParserError::InvalidToken {
                    span: Span::new(lo, BytePos::from_usize(cur.pos())),
                }
                .into());
            }
        }
        if !any || !cur.eat(b'}' as u16) {
            return Err(ParserError::InvalidToken {
                span: Span::new(lo, BytePos::from_usize(cur.pos())),
            }
            .into());
        }
        return Ok(char::from_u32(value).unwrap_or('\u{FFFD}'));
    }
    scan_hex_escape(cur, 4, lo)
}

fn hex_digit(u: u16) -> Option<u32> {
    match u {
        0x30..=0x39 => Some(u as u32 - 0x30),
        0x41..=0x46 => Some(u as u32 - 0x41 + 10),
        0x61..=0x66 => Some(u as u32 - 0x61 + 10),
        _ => None,
    }
}
