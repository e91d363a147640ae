// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Marked suffix truncation.
//!
//! Every budget in the engine is enforced by cutting the tail of a string
//! and appending [`TRUNCATION_MARKER`], so truncation is always detectable.
//! Lengths are counted in `char`s, never bytes.

use std::borrow::Cow;

/// Appended to every truncated string.
pub const TRUNCATION_MARKER: &str = "...";

/// Keep the first `max_chars` characters of `text`, appending the marker
/// if anything was cut.
pub fn truncate(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        None => Cow::Borrowed(text),
        Some((cut, _)) => {
            let mut out = String::with_capacity(cut + TRUNCATION_MARKER.len());
            out.push_str(&text[..cut]);
            out.push_str(TRUNCATION_MARKER);
            Cow::Owned(out)
        }
    }
}

/// Length in characters.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn short_text_is_borrowed_unchanged() {
        assert!(matches!(truncate("hello", 5), Cow::Borrowed("hello")));
    }

    #[test]
    fn long_text_gets_marker() {
        assert_eq!(truncate("hello world", 5), "hello...");
    }

    #[test]
    fn counts_chars_not_bytes() {
        assert_eq!(truncate("héllo wörld", 4), "héll...");
    }

    proptest! {
        #[test]
        fn truncated_output_is_exact_prefix_plus_marker(text in "\\PC{0,200}", max in 0usize..150) {
            let out = truncate(&text, max);
            let len = char_len(&text);
            if len <= max {
                prop_assert_eq!(out.as_ref(), text.as_str());
            } else {
                prop_assert!(out.ends_with(TRUNCATION_MARKER));
                prop_assert_eq!(char_len(&out), max + char_len(TRUNCATION_MARKER));
                let prefix: String = text.chars().take(max).collect();
                prop_assert!(out.starts_with(&prefix));
            }
        }
    }
}
