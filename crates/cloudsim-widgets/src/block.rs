#![forbid(unsafe_code)]

use crate::borders::{BorderType, Borders};
use crate::{Widget, draw_text_span, set_style_area};
use cloudsim_core::geometry::Rect;
use cloudsim_render::cell::Cell;
use cloudsim_render::frame::Frame;
use cloudsim_render::{Style, display_width};

/// A box with optional borders, title, and background style.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block<'a> {
    borders: Borders,
    border_style: Style,
    border_type: BorderType,
    title: Option<&'a str>,
    title_alignment: Alignment,
    style: Style,
}

/// Text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl<'a> Block<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A block with all four borders.
    pub fn bordered() -> Self {
        Self::default().borders(Borders::ALL)
    }

    pub fn borders(mut self, borders: Borders) -> Self {
        self.borders = borders;
        self
    }

    /// Style for border characters and the title.
    pub fn border_style(mut self, style: Style) -> Self {
        self.border_style = style;
        self
    }

    pub fn border_type(mut self, border_type: BorderType) -> Self {
        self.border_type = border_type;
        self
    }

    /// Title drawn over the top border.
    pub fn title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    pub fn title_alignment(mut self, alignment: Alignment) -> Self {
        self.title_alignment = alignment;
        self
    }

    /// Style applied to the whole area before borders are drawn.
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// The area left for content once borders are taken off.
    pub fn inner(&self, area: Rect) -> Rect {
        let mut inner = area;
        if self.borders.contains(Borders::LEFT) {
            inner.x = inner.x.saturating_add(1);
            inner.width = inner.width.saturating_sub(1);
        }
        if self.borders.contains(Borders::TOP) {
            inner.y = inner.y.saturating_add(1);
            inner.height = inner.height.saturating_sub(1);
        }
        if self.borders.contains(Borders::RIGHT) {
            inner.width = inner.width.saturating_sub(1);
        }
        if self.borders.contains(Borders::BOTTOM) {
            inner.height = inner.height.saturating_sub(1);
        }
        inner
    }

    fn border_cell(&self, c: char) -> Cell {
        Cell::from_char(c).with_style(self.style.patch(self.border_style))
    }

    fn render_borders(&self, area: Rect, frame: &mut Frame) {
        let set = self.border_type.to_border_set();
        let buf = &mut frame.buffer;

        if self.borders.contains(Borders::LEFT) {
            for y in area.y..area.bottom() {
                buf.set(area.x, y, self.border_cell(set.vertical));
            }
        }
        if self.borders.contains(Borders::RIGHT) {
            let x = area.right() - 1;
            for y in area.y..area.bottom() {
                buf.set(x, y, self.border_cell(set.vertical));
            }
        }
        if self.borders.contains(Borders::TOP) {
            for x in area.x..area.right() {
                buf.set(x, area.y, self.border_cell(set.horizontal));
            }
        }
        if self.borders.contains(Borders::BOTTOM) {
            let y = area.bottom() - 1;
            for x in area.x..area.right() {
                buf.set(x, y, self.border_cell(set.horizontal));
            }
        }

        // Corners overwrite the edge characters.
        if self.borders.contains(Borders::LEFT | Borders::TOP) {
            buf.set(area.x, area.y, self.border_cell(set.top_left));
        }
        if self.borders.contains(Borders::RIGHT | Borders::TOP) {
            buf.set(area.right() - 1, area.y, self.border_cell(set.top_right));
        }
        if self.borders.contains(Borders::LEFT | Borders::BOTTOM) {
            buf.set(area.x, area.bottom() - 1, self.border_cell(set.bottom_left));
        }
        if self.borders.contains(Borders::RIGHT | Borders::BOTTOM) {
            buf.set(
                area.right() - 1,
                area.bottom() - 1,
                self.border_cell(set.bottom_right),
            );
        }
    }

    fn render_title(&self, area: Rect, frame: &mut Frame) {
        let Some(title) = self.title else {
            return;
        };
        if !self.borders.contains(Borders::TOP) || area.width < 3 {
            return;
        }
        let available_width = usize::from(area.width - 2);
        let shown = display_width(title).min(available_width) as u16;
        let x = match self.title_alignment {
            Alignment::Left => area.x + 1,
            Alignment::Center => area.x + 1 + (available_width as u16 - shown) / 2,
            Alignment::Right => area.right() - 1 - shown,
        };
        let style = self.style.patch(self.border_style);
        draw_text_span(frame, x, area.y, title, style, area.right() - 1);
    }
}

impl Widget for Block<'_> {
    fn render(&self, area: Rect, frame: &mut Frame) {
        #[cfg(feature = "tracing")]
        let _span = tracing::trace_span!(
            "widget_render",
            widget = "Block",
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height
        )
        .entered();

        if area.is_empty() {
            return;
        }
        set_style_area(frame, area, self.style);
        self.render_borders(area, frame);
        self.render_title(area, frame);
    }
}
