//! UTF-8 safe text truncation
//!
//! Budgets are counted in codepoints, not bytes, so a 60-character limit
//! means the same thing for ASCII and for Hebrew text. Cuts always land on a
//! codepoint boundary.

use alloc::borrow::Cow;
use alloc::string::String;

/// Whether `byte` starts a codepoint (is not a `10xxxxxx` continuation byte)
#[inline]
const fn is_char_start(byte: u8) -> bool {
    byte & 0xC0 != 0x80
}

/// Number of codepoints in a UTF-8 byte sequence.
///
/// Counts every byte that is not a continuation byte.
pub fn char_count(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| is_char_start(b)).count()
}

/// Byte offset immediately after the `n`-th codepoint of `text`.
///
/// Returns `text.len()` when the text has `n` or fewer codepoints. The
/// result is always a codepoint boundary.
pub fn byte_offset_of_char(text: &str, n: usize) -> usize {
    if n == 0 {
        return 0;
    }

    let mut seen = 0;
    for (offset, &byte) in text.as_bytes().iter().enumerate() {
        if is_char_start(byte) {
            if seen == n {
                return offset;
            }
            seen += 1;
        }
    }
    text.len()
}

/// Shorten `text` to at most `budget` codepoints, ending in `suffix` when it
/// had to be cut.
///
/// Text that already fits is returned unchanged (borrowed). Otherwise the
/// first `budget - chars(suffix)` codepoints are kept and `suffix` is
/// appended. A suffix longer than the whole budget is dropped and the text
/// is cut at `budget` codepoints instead, so the result never exceeds the
/// budget.
///
/// ```ignore
/// assert_eq!(truncate("hello world", 5, "..."), "he...");
/// assert_eq!(truncate("short", 60, "..."), "short");
/// ```
pub fn truncate<'t>(text: &'t str, budget: usize, suffix: &str) -> Cow<'t, str> {
    let total = char_count(text.as_bytes());
    if total <= budget {
        return Cow::Borrowed(text);
    }

    let suffix_chars = char_count(suffix.as_bytes());
    if suffix_chars > budget {
        let cut = byte_offset_of_char(text, budget);
        return Cow::Borrowed(&text[..cut]);
    }

    let keep = budget - suffix_chars;
    let cut = byte_offset_of_char(text, keep);

    let mut result = String::with_capacity(cut + suffix.len());
    result.push_str(&text[..cut]);
    result.push_str(suffix);
    Cow::Owned(result)
}
