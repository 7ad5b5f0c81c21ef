//! Single-byte codepage utilities for Latin thermal printers
//!
//! Receipt printers sold for the Latin American market ship with the
//! WPC1252 character table (ESC t 16). Every printable character occupies
//! exactly one column, so widths are counted in characters.
//!
//! This module provides utilities for:
//! - Encoding UTF-8 text into WPC1252 bytes
//! - Calculating and truncating printed widths

use encoding_rs::WINDOWS_1252;

/// Byte printed in place of characters the codepage cannot represent
const REPLACEMENT: u8 = b'?';

/// Encode text into WPC1252 bytes
///
/// Characters outside the codepage are replaced with `?`, one byte per
/// character, so the printed width never changes.
pub fn encode_text(s: &str) -> Vec<u8> {
    if s.is_ascii() {
        return s.as_bytes().to_vec();
    }

    let mut out = Vec::with_capacity(s.len());
    let mut scratch = [0u8; 4];
    for c in s.chars() {
        if c.is_ascii() {
            out.push(c as u8);
            continue;
        }
        let (bytes, _, had_errors) = WINDOWS_1252.encode(c.encode_utf8(&mut scratch));
        if had_errors || bytes.len() != 1 {
            out.push(REPLACEMENT);
        } else {
            out.extend_from_slice(&bytes);
        }
    }
    out
}

/// Get the printed width of a string in columns
pub fn text_width(s: &str) -> usize {
    s.chars().count()
}

/// Truncate a string to fit within a printed width
pub fn truncate_width(s: &str, max_width: usize) -> String {
    s.chars().take(max_width).collect()
}
