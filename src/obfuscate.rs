//! Letter rotation applied to the password before it goes into a barcode.
//!
//! This only stops someone who scans the picture with a phone from reading
//! the combination straight off the screen. It is not encryption.

/// Rotates a single ASCII letter 13 places within its case; anything else
/// is returned unchanged.
pub fn rot13(c: char) -> char {
    match c {
        'a'..='m' | 'A'..='M' => (c as u8 + 13) as char,
        'n'..='z' | 'N'..='Z' => (c as u8 - 13) as char,
        _ => c,
    }
}

/// Applies [`rot13`] to every character.
///
/// The transform is its own inverse, so the same call obfuscates a
/// password before encoding and recovers it after decoding.
pub fn transform(s: &str) -> String {
    s.chars().map(rot13).collect()
}
