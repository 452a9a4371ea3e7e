#![forbid(unsafe_code)]

//! The resource cards.
//!
//! Each card is a pure function of its resource and whether it is the
//! selected one:
//!
//! ```text
//! ╭──────────────────[4]╮      ╔══════════════════[4]╗
//! │ 🖥️ EC2 Instance      │      ║ 🖥️ EC2 Instance      ║
//! │ t3.micro | Docker en │      ║ t3.micro | Docker en ║
//! ╰──────────── running ╯      ╚════════════ running ╝
//! ```

use cloudsim_layout::Rect;
use cloudsim_render::frame::Frame;
use cloudsim_widgets::{Alignment, Badge, Block, BorderType, Widget, draw_text_span};

use crate::app::AppModel;
use crate::catalog::{RESOURCES, Resource};
use crate::theme::{self, spacing};
use crate::views::card_grid;

pub const SECTION_TITLE: &str = "📊 Resources";

pub fn render(app: &AppModel, area: Rect, frame: &mut Frame) {
    let hits = app.hits();
    if area.is_empty() {
        for slot in &hits.cards {
            slot.set(Rect::default());
        }
        return;
    }
    draw_text_span(frame, area.x, area.y, SECTION_TITLE, theme::title(), area.right());

    let grid_area = Rect::new(area.x, area.y + 1, area.width, area.height.saturating_sub(1));
    let grid = card_grid(area.width);
    hits.grid_columns.set(grid.columns_for(area.width));

    let selected = app.selected().map(|id| id.index());
    for (index, rect) in grid.cells(grid_area, RESOURCES.len()).into_iter().enumerate() {
        hits.cards[index].set(rect);
        render_card(&RESOURCES[index], index, selected == Some(index), rect, frame);
    }
}

fn render_card(resource: &Resource, index: usize, selected: bool, area: Rect, frame: &mut Frame) {
    if area.is_empty() {
        return;
    }
    let hint = format!("[{}]", index + 1);
    let (border_type, border_style) = if selected {
        (BorderType::Double, theme::selected_border())
    } else {
        (BorderType::Rounded, theme::border())
    };
    let block = Block::bordered()
        .border_type(border_type)
        .border_style(border_style)
        .title(&hint)
        .title_alignment(Alignment::Right);
    block.render(area, frame);

    let inner = block.inner(area);
    if !inner.is_empty() {
        let x = inner.x + spacing::XS;
        let x = draw_text_span(frame, x, inner.y, resource.icon, theme::title(), inner.right());
        draw_text_span(frame, x + 1, inner.y, resource.name, theme::title(), inner.right());
        if inner.height > 1 {
            draw_text_span(
                frame,
                inner.x + spacing::XS,
                inner.y + 1,
                resource.details,
                theme::muted(),
                inner.right(),
            );
        }
    }

    // Status badge sits on the bottom border.
    let badge = Badge::new(resource.status.label()).with_style(theme::status_badge(resource.status));
    if area.height >= 2 && area.width > badge.width() + 3 {
        let x = area.right() - 2 - badge.width();
        badge.render(Rect::new(x, area.bottom() - 1, badge.width(), 1), frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::views::HitTarget;

    #[test]
    fn collapsed_grid_clears_card_hits() {
        let app = AppModel::new(AppConfig::default());
        let mut frame = Frame::new(120, 12);
        render(&app, frame.area(), &mut frame);
        let first = app.hits().cards[0].get();
        assert!(!first.is_empty());
        assert!(matches!(
            app.hits().hit_test(first.x + 1, first.y + 1),
            Some(HitTarget::Card(_))
        ));

        render(&app, Rect::default(), &mut frame);
        assert!(app.hits().cards.iter().all(|slot| slot.get() == Rect::default()));
        assert_eq!(app.hits().hit_test(first.x + 1, first.y + 1), None);
    }
}
