#![forbid(unsafe_code)]

//! Render kernel: cells, buffers, diffs, and the ANSI presenter.

pub mod ansi;
pub mod buffer;
pub mod cell;
pub mod diff;
pub mod frame;
pub mod presenter;
pub mod style;

pub use buffer::Buffer;
pub use cell::{Cell, CellContent, PackedRgba, StyleFlags};
pub use cloudsim_core::geometry::Rect;
pub use diff::BufferDiff;
pub use frame::Frame;
pub use presenter::Presenter;
pub use style::Style;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width of a single grapheme cluster, clamped to 1..=2 cells.
///
/// Zero-width clusters (combining marks on their own, control characters)
/// report 0 so callers can skip them.
#[inline]
pub fn grapheme_width(grapheme: &str) -> usize {
    if grapheme.chars().all(char::is_control) {
        return 0;
    }
    match UnicodeWidthStr::width(grapheme) {
        0 => 0,
        1 => 1,
        _ => 2,
    }
}

/// Display width of a string in terminal cells.
pub fn display_width(text: &str) -> usize {
    text.graphemes(true).map(grapheme_width).sum()
}

/// Longest prefix of `text` that fits in `max_width` cells.
pub fn truncate_to_width(text: &str, max_width: usize) -> &str {
    let mut used = 0;
    for (offset, grapheme) in text.grapheme_indices(true) {
        let w = grapheme_width(grapheme);
        if used + w > max_width {
            return &text[..offset];
        }
        used += w;
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_width() {
        assert_eq!(display_width("terraform plan"), 14);
    }

    #[test]
    fn emoji_are_double_width() {
        assert_eq!(display_width("🔧"), 2);
        assert_eq!(display_width("☁️"), 2);
    }

    #[test]
    fn truncate_respects_wide_graphemes() {
        assert_eq!(truncate_to_width("ab🔧cd", 3), "ab");
        assert_eq!(truncate_to_width("ab🔧cd", 4), "ab🔧");
        assert_eq!(truncate_to_width("short", 10), "short");
    }

    proptest::proptest! {
        #[test]
        fn truncation_fits_and_is_a_prefix(text in "[a-z 🔧☁️é]{0,24}", max in 0usize..30) {
            let cut = truncate_to_width(&text, max);
            proptest::prop_assert!(display_width(cut) <= max);
            proptest::prop_assert!(text.starts_with(cut));
        }
    }
}
