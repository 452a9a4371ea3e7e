#![forbid(unsafe_code)]

//! Bracketed push button: `[ label ]`.
//!
//! Buttons only draw; hit testing belongs to the caller, which can use
//! [`Button::width`] to size the rect it hands to `render` and later
//! match clicks against that same rect.

use crate::{Widget, draw_text_span};
use cloudsim_core::geometry::Rect;
use cloudsim_render::frame::Frame;
use cloudsim_render::{Style, display_width};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Button<'a> {
    label: &'a str,
    enabled: bool,
    style: Style,
    disabled_style: Style,
}

impl<'a> Button<'a> {
    pub fn new(label: &'a str) -> Self {
        Self {
            label,
            enabled: true,
            style: Style::new().bold(),
            disabled_style: Style::new().dim(),
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn disabled_style(mut self, style: Style) -> Self {
        self.disabled_style = style;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Width including brackets and inner padding.
    pub fn width(&self) -> u16 {
        display_width(self.label) as u16 + 4
    }
}

impl Widget for Button<'_> {
    fn render(&self, area: Rect, frame: &mut Frame) {
        if area.is_empty() {
            return;
        }
        let style = if self.enabled {
            self.style
        } else {
            self.disabled_style
        };
        let max_x = area.right().min(area.x.saturating_add(self.width()));
        let x = draw_text_span(frame, area.x, area.y, "[ ", style, max_x);
        let x = draw_text_span(frame, x, area.y, self.label, style, max_x);
        draw_text_span(frame, x, area.y, " ]", style, max_x);
    }
}
