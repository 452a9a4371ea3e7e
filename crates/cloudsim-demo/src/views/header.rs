#![forbid(unsafe_code)]

use cloudsim_layout::Rect;
use cloudsim_render::frame::Frame;
use cloudsim_render::{PackedRgba, Style};
use cloudsim_widgets::{Badge, Block, BorderType, Widget, draw_text_span};

use crate::app::AppModel;
use crate::theme::{self, palette, spacing};

pub const TITLE: &str = "☁️ AWS Infrastructure Demo";

/// Title on the left, environment and region badges on the right.
pub fn render(app: &AppModel, area: Rect, frame: &mut Frame) {
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(theme::border());
    block.render(area, frame);
    let inner = block.inner(area);
    if inner.is_empty() {
        return;
    }

    draw_text_span(
        frame,
        inner.x + spacing::XS,
        inner.y,
        TITLE,
        theme::accent(),
        inner.right(),
    );

    let config = app.config();
    let badges = [
        Badge::new(&config.env).with_style(badge_style(palette::ENV_BG)),
        Badge::new(&config.region).with_style(badge_style(palette::REGION_BG)),
    ];
    let mut x = inner.right().saturating_sub(spacing::XS);
    for badge in badges.iter().rev() {
        x = x.saturating_sub(badge.width());
        if x <= inner.x {
            break;
        }
        badge.render(Rect::new(x, inner.y, badge.width(), 1), frame);
        x = x.saturating_sub(spacing::XS);
    }
}

fn badge_style(bg: PackedRgba) -> Style {
    Style::new().fg(PackedRgba::WHITE).bg(bg).bold()
}
