#![forbid(unsafe_code)]

//! Text capture helpers for render tests.
//!
//! Rendered buffers are flattened to plain text so tests can assert on what
//! a user would read, locate labels to click on, and show a line diff when a
//! layout drifts.
//!
//! ```ignore
//! let frame = sim.capture_frame(100, 40);
//! let text = buffer_to_text(&frame);
//! assert!(text.contains("Plan: 1 to add"));
//! let (x, y) = find_text(&frame, "Apply").expect("apply button");
//! ```

use std::fmt::Write as FmtWrite;

use cloudsim_render::buffer::Buffer;

pub use cloudsim_core::geometry::Rect;

/// Convert a `Buffer` to plain text, one line per row.
///
/// Continuation cells are skipped so wide graphemes keep their natural
/// display width in the output.
pub fn buffer_to_text(buf: &Buffer) -> String {
    let capacity = (usize::from(buf.width()) + 1) * usize::from(buf.height());
    let mut out = String::with_capacity(capacity);
    for y in 0..buf.height() {
        if y > 0 {
            out.push('\n');
        }
        push_row(buf, y, &mut out);
    }
    out
}

/// Text of a single row, or an empty string when out of range.
pub fn row_text(buf: &Buffer, y: u16) -> String {
    let mut out = String::new();
    push_row(buf, y, &mut out);
    out
}

fn push_row(buf: &Buffer, y: u16, out: &mut String) {
    for x in 0..buf.width() {
        if let Some(cell) = buf.get(x, y) {
            cell.content.push_to(out);
        }
    }
}

/// Cell position of the first occurrence of `needle`, scanning row by row.
///
/// The x coordinate is a column, not a byte offset, so it can be fed
/// straight into a mouse click.
pub fn find_text(buf: &Buffer, needle: &str) -> Option<(u16, u16)> {
    (0..buf.height()).find_map(|y| find_in_row(buf, y, needle).map(|x| (x, y)))
}

/// Number of rows on which `needle` appears at least once.
pub fn rows_containing(buf: &Buffer, needle: &str) -> usize {
    (0..buf.height())
        .filter(|&y| find_in_row(buf, y, needle).is_some())
        .count()
}

fn find_in_row(buf: &Buffer, y: u16, needle: &str) -> Option<u16> {
    // Column at which each cell's text begins in the row string.
    let mut text = String::new();
    let mut starts = Vec::new();
    for x in 0..buf.width() {
        let cell = buf.get(x, y)?;
        if cell.is_continuation() {
            continue;
        }
        starts.push((text.len(), x));
        cell.content.push_to(&mut text);
    }
    let byte = text.find(needle)?;
    starts
        .iter()
        .rev()
        .find(|(offset, _)| *offset <= byte)
        .map(|(_, x)| *x)
}

/// Line-by-line diff of two texts.
///
/// Returns an empty string when they match.
pub fn diff_text(expected: &str, actual: &str) -> String {
    let expected_lines: Vec<&str> = expected.lines().collect();
    let actual_lines: Vec<&str> = actual.lines().collect();
    let mut out = String::new();
    let mut has_diff = false;

    for i in 0..expected_lines.len().max(actual_lines.len()) {
        match (expected_lines.get(i), actual_lines.get(i)) {
            (Some(e), Some(a)) if e == a => {
                let _ = writeln!(out, " {e}");
            }
            (e, a) => {
                if let Some(e) = e {
                    let _ = writeln!(out, "-{e}");
                }
                if let Some(a) = a {
                    let _ = writeln!(out, "+{a}");
                }
                has_diff = true;
            }
        }
    }

    if has_diff { out } else { String::new() }
}

/// Assert that every line of `expected` matches the corresponding line of
/// `actual` after trimming trailing spaces, printing a diff on failure.
#[track_caller]
pub fn assert_text_eq(expected: &str, actual: &str) {
    let trim = |s: &str| -> String {
        s.lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n")
    };
    let diff = diff_text(&trim(expected), &trim(actual));
    assert!(diff.is_empty(), "text mismatch:\n{diff}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudsim_render::style::Style;

    fn sample() -> Buffer {
        let mut buf = Buffer::new(12, 3);
        buf.set_string(0, 0, "🔧 Terraform", Style::new(), 12);
        buf.set_string(2, 2, "[✓ Apply]", Style::new(), 12);
        buf
    }

    #[test]
    fn text_keeps_display_width() {
        let text = buffer_to_text(&sample());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "🔧 Terraform");
        assert_eq!(lines[1], " ".repeat(12));
    }

    #[test]
    fn find_reports_columns_after_wide_graphemes() {
        let buf = sample();
        assert_eq!(find_text(&buf, "Terraform"), Some((3, 0)));
        assert_eq!(find_text(&buf, "Apply"), Some((5, 2)));
        assert_eq!(find_text(&buf, "Destroy"), None);
    }

    #[test]
    fn rows_containing_counts_rows() {
        assert_eq!(rows_containing(&sample(), "Terraform"), 1);
        assert_eq!(rows_containing(&sample(), " "), 3);
    }

    #[test]
    fn diff_marks_changed_lines() {
        assert!(diff_text("a\nb", "a\nb").is_empty());
        let diff = diff_text("a\nb", "a\nc");
        assert!(diff.contains("-b"));
        assert!(diff.contains("+c"));
    }

    #[test]
    fn assert_text_eq_ignores_trailing_spaces() {
        assert_text_eq("abc\nde", "abc   \nde ");
    }
}
