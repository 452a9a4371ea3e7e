#![forbid(unsafe_code)]

use unicode_segmentation::UnicodeSegmentation;

use crate::block::{Alignment, Block};
use crate::{Widget, draw_text_span, set_style_area};
use cloudsim_core::geometry::Rect;
use cloudsim_render::frame::Frame;
use cloudsim_render::{Style, display_width, grapheme_width};

/// Where the visible window of lines is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scroll {
    /// Skip this many lines from the top.
    Top(u16),
    /// Show the tail, this many lines above the last one.
    Bottom(u16),
}

impl Default for Scroll {
    fn default() -> Self {
        Self::Top(0)
    }
}

/// Multi-line text with optional word wrapping and per-line highlighting.
#[derive(Debug, Clone, Default)]
pub struct Paragraph<'a> {
    text: &'a str,
    block: Option<Block<'a>>,
    style: Style,
    wrap: bool,
    alignment: Alignment,
    scroll: Scroll,
    highlight: Option<fn(&str) -> Option<Style>>,
}

impl<'a> Paragraph<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            ..Self::default()
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Word-wrap lines wider than the area.
    pub fn wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn scroll(mut self, scroll: Scroll) -> Self {
        self.scroll = scroll;
        self
    }

    /// Style each source line by its content; `None` keeps the base style.
    pub fn highlight(mut self, f: fn(&str) -> Option<Style>) -> Self {
        self.highlight = Some(f);
        self
    }

    /// Number of visual lines the text occupies at `width` columns.
    pub fn line_count(&self, width: u16) -> usize {
        self.visual_lines(width).len()
    }

    /// Source lines split into display rows, each paired with its source line.
    fn visual_lines(&self, width: u16) -> Vec<(&'a str, &'a str)> {
        let mut rows = Vec::new();
        for line in self.text.split('\n') {
            if self.wrap && display_width(line) > usize::from(width) {
                rows.extend(wrap_line(line, usize::from(width)).into_iter().map(|r| (r, line)));
            } else {
                rows.push((line, line));
            }
        }
        rows
    }
}

/// Greedy word wrap by display width.
///
/// Breaks after the last space that fits; a word longer than `width` is
/// split at the grapheme boundary.
fn wrap_line(line: &str, width: usize) -> Vec<&str> {
    if width == 0 {
        return vec![line];
    }
    let mut rows = Vec::new();
    let mut start = 0;
    let mut used = 0;
    let mut last_space: Option<usize> = None;

    for (offset, grapheme) in line.grapheme_indices(true) {
        let w = grapheme_width(grapheme);
        if used + w > width && offset > start {
            let cut = match last_space {
                Some(space) if space > start => space,
                _ => offset,
            };
            rows.push(line[start..cut].trim_end());
            start = if line[cut..].starts_with(' ') { cut + 1 } else { cut };
            used = display_width(&line[start..offset]);
            last_space = None;
        }
        if grapheme == " " {
            last_space = Some(offset);
        }
        used += w;
    }
    rows.push(&line[start..]);
    rows
}

impl Widget for Paragraph<'_> {
    fn render(&self, area: Rect, frame: &mut Frame) {
        #[cfg(feature = "tracing")]
        let _span = tracing::trace_span!(
            "widget_render",
            widget = "Paragraph",
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height
        )
        .entered();

        set_style_area(frame, area, self.style);
        let text_area = match self.block {
            Some(ref b) => {
                b.render(area, frame);
                b.inner(area)
            }
            None => area,
        };
        if text_area.is_empty() {
            return;
        }

        let rows = self.visual_lines(text_area.width);
        let height = usize::from(text_area.height);
        let skip = match self.scroll {
            Scroll::Top(n) => usize::from(n),
            Scroll::Bottom(n) => rows
                .len()
                .saturating_sub(height)
                .saturating_sub(usize::from(n)),
        };

        for (y, (row, source)) in (text_area.y..text_area.bottom()).zip(rows.into_iter().skip(skip)) {
            let style = match self.highlight {
                Some(f) => f(source).map_or(self.style, |s| self.style.patch(s)),
                None => self.style,
            };
            let width = display_width(row).min(usize::from(text_area.width)) as u16;
            let x = match self.alignment {
                Alignment::Left => text_area.x,
                Alignment::Center => text_area.x + (text_area.width - width) / 2,
                Alignment::Right => text_area.right() - width,
            };
            draw_text_span(frame, x, y, row, style, text_area.right());
        }
    }
}
