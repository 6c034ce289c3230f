//! Character encoding for transport safety
//!
//! Replaces every character outside the ASCII range with its numeric
//! character reference. Pure and type-preserving; double-encoding is the
//! caller's responsibility and is not guarded here.

use std::fmt::Write;

/// Encode non-ASCII characters of a string as `&#NNN;` references.
#[must_use]
pub fn encode_str(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if ch.is_ascii() {
            out.push(ch);
        } else {
            // Writing into a String cannot fail.
            let _ = write!(out, "&#{};", ch as u32);
        }
    }
    out
}

/// Byte-buffer variant of [`encode_str`]. Non-UTF-8 sequences are replaced
/// before encoding.
#[must_use]
pub fn encode_bytes(input: &[u8]) -> Vec<u8> {
    encode_str(&String::from_utf8_lossy(input)).into_bytes()
}
