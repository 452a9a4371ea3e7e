#![forbid(unsafe_code)]

//! Badge widget.
//!
//! A single-line label with padding, used for status pills and the
//! environment/region tags in the header.

use crate::{Widget, draw_text_span};
use cloudsim_core::geometry::Rect;
use cloudsim_render::frame::Frame;
use cloudsim_render::{Style, display_width};

/// A compact label with padding and style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge<'a> {
    label: &'a str,
    style: Style,
    pad_left: u16,
    pad_right: u16,
}

impl<'a> Badge<'a> {
    /// Create a new badge with 1 cell padding on each side.
    #[must_use]
    pub fn new(label: &'a str) -> Self {
        Self {
            label,
            style: Style::default(),
            pad_left: 1,
            pad_right: 1,
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_padding(mut self, left: u16, right: u16) -> Self {
        self.pad_left = left;
        self.pad_right = right;
        self
    }

    /// Display width in cells, padding included.
    #[must_use]
    pub fn width(&self) -> u16 {
        (display_width(self.label) as u16)
            .saturating_add(self.pad_left)
            .saturating_add(self.pad_right)
    }
}

impl Widget for Badge<'_> {
    fn render(&self, area: Rect, frame: &mut Frame) {
        if area.is_empty() {
            return;
        }
        let max_x = area.right().min(area.x.saturating_add(self.width()));
        let pad = |n: u16| " ".repeat(usize::from(n));
        let mut x = draw_text_span(frame, area.x, area.y, &pad(self.pad_left), self.style, max_x);
        x = draw_text_span(frame, x, area.y, self.label, self.style, max_x);
        draw_text_span(frame, x, area.y, &pad(self.pad_right), self.style, max_x);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudsim_harness::buffer_to_text;
    use cloudsim_render::PackedRgba;

    #[test]
    fn width_includes_padding() {
        assert_eq!(Badge::new("OK").width(), 4);
        assert_eq!(Badge::new("OK").with_padding(2, 3).width(), 7);
        assert_eq!(Badge::new("").width(), 2);
    }

    #[test]
    fn renders_padded_label_with_style() {
        let style = Style::new()
            .fg(PackedRgba::rgb(1, 2, 3))
            .bg(PackedRgba::rgb(4, 5, 6));
        let mut frame = Frame::new(10, 1);
        Badge::new("OK")
            .with_style(style)
            .render(Rect::new(0, 0, 10, 1), &mut frame);

        assert_eq!(buffer_to_text(&frame.buffer), " OK       ");
        for x in 0..4 {
            let cell = frame.buffer.get(x, 0).expect("cell");
            assert_eq!(cell.bg, PackedRgba::rgb(4, 5, 6));
        }
        assert_eq!(
            frame.buffer.get(4, 0).map(|c| c.bg),
            Some(PackedRgba::TRANSPARENT)
        );
    }

    #[test]
    fn truncates_in_small_area() {
        let mut frame = Frame::new(2, 1);
        Badge::new("OK").render(Rect::new(0, 0, 2, 1), &mut frame);
        assert_eq!(buffer_to_text(&frame.buffer), " O");
    }

    #[test]
    fn wide_label() {
        let mut frame = Frame::new(8, 1);
        Badge::new("🌍 dev").render(frame.area(), &mut frame);
        assert_eq!(buffer_to_text(&frame.buffer), " 🌍 dev ");
    }
}
