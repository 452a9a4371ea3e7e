#![forbid(unsafe_code)]

//! Widgets for the cloudsim demo.

pub mod badge;
pub mod block;
pub mod borders;
pub mod button;
pub mod paragraph;

pub use badge::Badge;
pub use block::{Alignment, Block};
pub use borders::{BorderSet, BorderType, Borders};
pub use button::Button;
pub use paragraph::Paragraph;

use cloudsim_core::geometry::Rect;
use cloudsim_render::Style;
use cloudsim_render::frame::Frame;

/// A renderable component.
///
/// Widgets draw themselves into a [`Frame`] within the given `Rect` and
/// must never write outside it.
pub trait Widget {
    fn render(&self, area: Rect, frame: &mut Frame);
}

/// Draw a single-line span, clipped at `max_x`. Returns the next column.
pub fn draw_text_span(
    frame: &mut Frame,
    x: u16,
    y: u16,
    content: &str,
    style: Style,
    max_x: u16,
) -> u16 {
    frame.buffer.set_string(x, y, content, style, max_x)
}

/// Overlay `style` on every cell in `area`. No-op for the empty style.
pub fn set_style_area(frame: &mut Frame, area: Rect, style: Style) {
    if style == Style::new() {
        return;
    }
    frame.buffer.set_style(area, style);
}
