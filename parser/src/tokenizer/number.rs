//! Numeric literal scanning: decimal, binary, octal, hex, legacy octal,
//! BigInt suffix, and numeric separators.

use esparse_errors::{ParserError, Result};
use esparse_span::{BytePos, Span};

use super::cursor::Cursor;

pub struct NumberResult {
    pub value: f64,
    pub big_int: Option<String>,
    pub raw_end: usize,
}

fn digit_value(c: u16, radix: u32) -> Option<u32> {
    let c = c as u32;
    let v = match c {
        0x30..=0x39 => c - 0x30,
        0x41..=0x5A => c - 0x41 + 10,
        0x61..=0x7A => c - 0x61 + 10,
        _ => return None,
    };
    if v < radix {
        Some(v)
    } else {
        None
    }
}

/// Scans digits of `radix`, allowing `_` separators (not first/last, not
/// doubled) when `allow_separators` is set. Returns the consumed text with
/// separators stripped.
fn scan_digits(cur: &mut Cursor, radix: u32, allow_separators: bool, lo: BytePos) -> Result<String> {
    let mut out = String::new();
    let mut last_was_sep = false;
    let mut any = false;
    loop {
        match cur.peek() {
            Some(u) if u == b'_' as u16 && allow_separators => {
                if !any || last_was_sep {
                    return Err(ParserError::InvalidNumber {
                        span: Span::new(lo, BytePos::from_usize(cur.pos())),
                    }
                    .into());
                }
                last_was_sep = true;
                cur.bump();
            }
            Some(u) if digit_value(u, radix).is_some() => {
                out.push((u as u8) as char);
                last_was_sep = false;
                any = true;
                cur.bump();
            }
            _ => break,
        }
    }
    if last_was_sep {
        return Err(ParserError::InvalidNumber {
            span: Span::new(lo, BytePos::from_usize(cur.pos())),
        }
        .into());
    }
    Ok(out)
}

pub fn scan_number(cur: &mut Cursor, lo: BytePos, allow_separators: bool, allow_bigint: bool) -> Result<NumberResult> {
    let start = cur.pos();

    if cur.peek() == Some(b'0' as u16) {
        match cur.peek_at(1) {
            Some(u) if u == b'x' as u16 || u == b'X' as u16 => {
                let prefix = format!("0{}", u as u8 as char);
                cur.advance(2);
                let digits = scan_digits(cur, 16, allow_separators, lo)?;
                return finish(cur, &digits, 16, lo, allow_bigint, &prefix);
            }
            Some(u) if u == b'o' as u16 || u == b'O' as u16 => {
                let prefix = format!("0{}", u as u8 as char);
                cur.advance(2);
                let digits = scan_digits(cur, 8, allow_separators, lo)?;
                return finish(cur, &digits, 8, lo, allow_bigint, &prefix);
            }
            Some(u) if u == b'b' as u16 || u == b'B' as u16 => {
                let prefix = format!("0{}", u as u8 as char);
                cur.advance(2);
                let digits = scan_digits(cur, 2, allow_separators, lo)?;
                return finish(cur, &digits, 2, lo, allow_bigint, &prefix);
            }
            Some(u) if (b'0' as u16..=b'9' as u16).contains(&u) => {
                // Legacy octal, unless an 8/9 digit appears -- then it's
                // actually decimal (and always strict-mode illegal either
                // way, which the caller checks via `strict`).
                let mut peek_pos = cur.pos() + 1;
                let mut is_octal = true;
                while let Some(d) = cur.unit_at(peek_pos) {
                    if !(b'0' as u16..=b'9' as u16).contains(&d) {
                        break;
                    }
                    if d >= b'8' as u16 {
                        is_octal = false;
                    }
                    peek_pos += 1;
                }
                if is_octal {
                    cur.bump();
                    let digits = scan_digits(cur, 8, false, lo)?;
                    let value = u64::from_str_radix(&digits, 8).unwrap_or(0) as f64;
                    return Ok(NumberResult { value, big_int: None, raw_end: cur.pos() });
                }
            }
            _ => {}
        }
    }

    // Decimal: integer part, optional fraction, optional exponent.
    scan_digits(cur, 10, allow_separators, lo)?;
    let mut is_float = false;
    if cur.peek() == Some(b'.' as u16) {
        is_float = true;
        cur.bump();
        scan_digits(cur, 10, allow_separators, lo)?;
    }
    if matches!(cur.peek(), Some(u) if u == b'e' as u16 || u == b'E' as u16) {
        is_float = true;
        cur.bump();
        if matches!(cur.peek(), Some(u) if u == b'+' as u16 || u == b'-' as u16) {
            cur.bump();
        }
        scan_digits(cur, 10, allow_separators, lo)?;
    }

    let text: String = cur
        .slice(start, cur.pos())
        .iter()
        .filter(|&&u| u != b'_' as u16)
        .map(|&u| u as u8 as char)
        .collect();

    if !is_float && allow_bigint && cur.peek() == Some(b'n' as u16) {
        cur.bump();
        return Ok(NumberResult { value: 0.0, big_int: Some(text), raw_end: cur.pos() });
    }

    let value: f64 = text
        .parse()
        .map_err(|_| -> esparse_errors::Diagnostic {
            ParserError::InvalidNumber {
                span: Span::new(lo, BytePos::from_usize(cur.pos())),
            }
            .into()
        })?;
    Ok(NumberResult { value, big_int: None, raw_end: cur.pos() })
}

fn finish(cur: &mut Cursor, digits: &str, radix: u32, lo: BytePos, allow_bigint: bool, prefix: &str) -> Result<NumberResult> {
    if digits.is_empty() {
        return Err(ParserError::InvalidNumber {
            span: Span::new(lo, BytePos::from_usize(cur.pos())),
        }
        .into());
    }
    if allow_bigint && cur.peek() == Some(b'n' as u16) {
        cur.bump();
        // `big_int` keeps the radix prefix (`0x`/`0o`/`0b`) so the caller can
        // reconstruct both the exact source text (`raw`) and the numeric
        // value without losing which base the digits were written in.
        return Ok(NumberResult { value: 0.0, big_int: Some(format!("{prefix}{digits}")), raw_end: cur.pos() });
    }
    let value = u128::from_str_radix(digits, radix).unwrap_or(0) as f64;
    Ok(NumberResult { value, big_int: None, raw_end: cur.pos() })
}
