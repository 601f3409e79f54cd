//! SGF coordinate codec.
//!
//! A board point is written as two lowercase letters, column first:
//! 'a' = 0 through 'z' = 25. Decoding validates against the board size
//! and reports malformed input as `None`; it never clamps.

use crate::Point;

/// Encode a `(row, col)` point as a two-letter SGF coordinate.
pub fn to_sgf((row, col): Point) -> String {
    let mut s = String::with_capacity(2);
    s.push(letter(col));
    s.push(letter(row));
    s
}

/// Decode a two-letter SGF coordinate, rejecting anything malformed:
/// wrong length, characters outside `a..=z`, or a value at or beyond
/// the board size.
pub fn from_sgf(code: &str, board_size: u8) -> Option<Point> {
    let bytes = code.as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let col = value(bytes[0])?;
    let row = value(bytes[1])?;
    if col >= board_size || row >= board_size {
        return None;
    }
    Some((row, col))
}

fn letter(v: u8) -> char {
    debug_assert!(v < 26, "coordinate out of SGF letter range");
    (b'a' + v) as char
}

fn value(b: u8) -> Option<u8> {
    if b.is_ascii_lowercase() {
        Some(b - b'a')
    } else {
        None
    }
}
