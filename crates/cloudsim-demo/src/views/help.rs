#![forbid(unsafe_code)]

use cloudsim_layout::Rect;
use cloudsim_render::cell::Cell;
use cloudsim_render::frame::Frame;
use cloudsim_widgets::{Alignment, Block, BorderType, Widget, draw_text_span};

use crate::theme;

pub const TITLE: &str = " Keys ";

const BINDINGS: &[(&str, &str)] = &[
    ("1-8", "Select a resource"),
    ("←↓↑→ / hjkl", "Move the selection"),
    ("Click", "Select a card or press a button"),
    ("p", "Terraform plan"),
    ("a", "Terraform apply"),
    ("PgUp / PgDn", "Scroll the output"),
    ("Home / End", "Oldest / newest output"),
    ("?", "Toggle this help"),
    ("q / Esc", "Quit"),
    ("Ctrl+C", "Quit"),
];

const KEY_COLUMN: u16 = 14;
const WIDTH: u16 = 52;

/// Key binding overlay, centered over `area`.
pub fn render(area: Rect, frame: &mut Frame) {
    let height = BINDINGS.len() as u16 + 4;
    let rect = area.centered(WIDTH, height);
    if rect.is_empty() {
        return;
    }
    frame.buffer.fill(rect, &Cell::default());

    let block = Block::bordered()
        .border_type(BorderType::Heavy)
        .border_style(theme::accent())
        .title(TITLE)
        .title_alignment(Alignment::Center);
    block.render(rect, frame);
    let inner = block.inner(rect);

    let x = inner.x + 1;
    for (row, (key, action)) in BINDINGS.iter().enumerate() {
        let y = inner.y + row as u16;
        if y >= inner.bottom() {
            return;
        }
        draw_text_span(frame, x, y, key, theme::accent(), inner.right());
        draw_text_span(frame, x + KEY_COLUMN, y, action, theme::title(), inner.right());
    }
    let y = inner.bottom().saturating_sub(1);
    if y > inner.y + BINDINGS.len() as u16 - 1 {
        draw_text_span(frame, x, y, "Press any key to close", theme::muted(), inner.right());
    }
}
