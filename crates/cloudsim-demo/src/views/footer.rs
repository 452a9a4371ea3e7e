#![forbid(unsafe_code)]

use cloudsim_layout::Rect;
use cloudsim_render::display_width;
use cloudsim_render::frame::Frame;
use cloudsim_widgets::draw_text_span;

use crate::theme::{self, spacing};

pub const CREDIT: &str = "Built with Terraform • Author: Santanu Dhali";
pub const KEY_HINT: &str = "1-8 select · p plan · a apply · ? help · q quit";

/// Credit line on the left, key hint on the right when there is room.
pub fn render(area: Rect, frame: &mut Frame) {
    if area.is_empty() {
        return;
    }
    let end = draw_text_span(
        frame,
        area.x + spacing::XS,
        area.y,
        CREDIT,
        theme::muted(),
        area.right(),
    );
    let hint_width = display_width(KEY_HINT) as u16;
    let hint_x = area.right().saturating_sub(hint_width + spacing::XS);
    if hint_x >= end + spacing::SM {
        draw_text_span(frame, hint_x, area.y, KEY_HINT, theme::muted(), area.right());
    }
}
