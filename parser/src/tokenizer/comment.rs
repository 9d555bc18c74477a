//! Whitespace and comment skipping between tokens. Returns whether a line
//! terminator was crossed, which feeds automatic-semicolon-insertion
//! directly -- no separate `LineTerminator` token is emitted.

use esparse_errors::{ParserError, Result};
use esparse_span::{BytePos, Span};

use super::cursor::Cursor;
use super::identifier::{is_line_terminator, is_whitespace};

pub struct OnComment {
    pub block: bool,
    pub span: Span,
}

/// Skips whitespace and comments, returning `(saw_newline, comments)`.
/// `in_module` disables the two Annex B legacy HTML-comment forms, which
/// apply only to script code.
pub fn skip_space_and_comments(cur: &mut Cursor, at_start: bool, in_module: bool) -> Result<(bool, Vec<OnComment>)> {
    let mut saw_newline = false;
    let mut comments = Vec::new();

    if at_start && cur.pos() == 0 && cur.peek() == Some(b'#' as u16) && cur.peek_at(1) == Some(b'!' as u16) {
        let lo = BytePos::from_usize(cur.pos());
        while let Some(u) = cur.peek() {
            if is_line_terminator(u as u32) {
                break;
            }
            cur.bump();
        }
        comments.push(OnComment { block: false, span: Span::new(lo, BytePos::from_usize(cur.pos())) });
    }

    loop {
        match cur.peek() {
            Some(u) if is_line_terminator(u as u32) => {
                saw_newline = true;
                if u == 0x000D {
                    cur.bump();
                    cur.eat(0x000A);
                } else {
                    cur.bump();
                }
            }
            Some(u) if is_whitespace(u as u32) => {
                cur.bump();
            }
            Some(u) if u == b'/' as u16 && cur.peek_at(1) == Some(b'/' as u16) => {
                let lo = BytePos::from_usize(cur.pos());
                cur.advance(2);
                while let Some(u) = cur.peek() {
                    if is_line_terminator(u as u32) {
                        break;
                    }
                    cur.bump();
                }
                comments.push(OnComment { block: false, span: Span::new(lo, BytePos::from_usize(cur.pos())) });
            }
            Some(u) if u == b'/' as u16 && cur.peek_at(1) == Some(b'*' as u16) => {
                let lo = BytePos::from_usize(cur.pos());
                cur.advance(2);
                let mut terminated = false;
                while let Some(u) = cur.peek() {
                    if u == b'*' as u16 && cur.peek_at(1) == Some(b'/' as u16) {
                        cur.advance(2);
                        terminated = true;
                        break;
                    }
                    if is_line_terminator(u as u32) {
                        saw_newline = true;
                    }
                    cur.bump();
                }
                if !terminated {
                    return Err(ParserError::UnterminatedComment {
                        span: Span::new(lo, BytePos::from_usize(cur.pos())),
                    }
                    .into());
                }
                comments.push(OnComment { block: true, span: Span::new(lo, BytePos::from_usize(cur.pos())) });
            }
            // Legacy HTML-like comments (Annex B), script code only (an
            // `in_module` source never enters either arm).
            Some(u) if !in_module && u == b'<' as u16 && cur.peek_at(1) == Some(b'!' as u16) && cur.peek_at(2) == Some(b'-' as u16) && cur.peek_at(3) == Some(b'-' as u16) => {
                let lo = BytePos::from_usize(cur.pos());
                cur.advance(4);
                while let Some(u) = cur.peek() {
                    if is_line_terminator(u as u32) {
                        break;
                    }
                    cur.bump();
                }
                comments.push(OnComment { block: false, span: Span::new(lo, BytePos::from_usize(cur.pos())) });
            }
            // `-->` additionally requires being at the start of a line: a
            // line terminator must already have been crossed since the end
            // of the previous real token, or this is `x-- > 0`, not a
            // comment.
            Some(u) if !in_module && saw_newline && u == b'-' as u16 && cur.peek_at(1) == Some(b'-' as u16) && cur.peek_at(2) == Some(b'>' as u16) => {
                let lo = BytePos::from_usize(cur.pos());
                cur.advance(3);
                while let Some(u) = cur.peek() {
                    if is_line_terminator(u as u32) {
                        break;
                    }
                    cur.bump();
                }
                comments.push(OnComment { block: false, span: Span::new(lo, BytePos::from_usize(cur.pos())) });
            }
            _ => break,
        }
    }

    Ok((saw_newline, comments))
}
