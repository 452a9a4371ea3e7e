#![forbid(unsafe_code)]

//! Screen layout and the per-section renderers.
//!
//! ```text
//! ┌ header ───────────────────────────────────────┐  3 rows
//! 📊 Resources + card grid                          1 + grid rows
//! architecture diagram │ detail panel               up to 11 rows
//! 🔧 Terraform  [buttons] + terminal window          the rest
//! footer                                             1 row
//! ```
//!
//! Views only read the model. The rects they draw clickable things into are
//! recorded in [`HitRegions`] so the next mouse event can be matched
//! against exactly what was on screen.

pub mod detail;
pub mod diagram;
pub mod footer;
pub mod header;
pub mod help;
pub mod resource_grid;
pub mod terraform_panel;

use std::cell::Cell;

use cloudsim_layout::{Constraint, Flex, Grid, Rect, Sides};
use cloudsim_render::frame::Frame;
use cloudsim_render::{Style, display_width};
use cloudsim_widgets::draw_text_span;

use crate::app::AppModel;
use crate::catalog::{RESOURCE_COUNT, RESOURCES, ResourceId};
use crate::theme::spacing;

/// Something the user can click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Card(ResourceId),
    Plan,
    Apply,
    Destroy,
    Output,
}

/// Clickable areas from the last rendered frame.
#[derive(Debug, Default)]
pub struct HitRegions {
    pub cards: [Cell<Rect>; RESOURCE_COUNT],
    pub plan: Cell<Rect>,
    pub apply: Cell<Rect>,
    pub destroy: Cell<Rect>,
    pub output: Cell<Rect>,
    /// Columns the card grid used; 0 before the first frame.
    pub grid_columns: Cell<u16>,
}

impl HitRegions {
    pub fn hit_test(&self, x: u16, y: u16) -> Option<HitTarget> {
        if let Some(index) = self.cards.iter().position(|c| c.get().contains(x, y)) {
            return ResourceId::new(index).map(HitTarget::Card);
        }
        if self.plan.get().contains(x, y) {
            Some(HitTarget::Plan)
        } else if self.apply.get().contains(x, y) {
            Some(HitTarget::Apply)
        } else if self.destroy.get().contains(x, y) {
            Some(HitTarget::Destroy)
        } else if self.output.get().contains(x, y) {
            Some(HitTarget::Output)
        } else {
            None
        }
    }

    pub fn over_output(&self, x: u16, y: u16) -> bool {
        self.output.get().contains(x, y)
    }
}

/// Card grid for the given content width: 4, 2, or 1 columns.
pub fn card_grid(width: u16) -> Grid {
    let grid = Grid::new()
        .max_columns(spacing::GRID_COLUMNS)
        .min_cell_width(spacing::CARD_MIN_WIDTH)
        .row_height(spacing::CARD_HEIGHT)
        .gap(spacing::XS, 0);
    match grid.columns_for(width) {
        3 => grid.max_columns(2),
        _ => grid,
    }
}

pub fn render(app: &AppModel, frame: &mut Frame) {
    let area = frame.area();
    let padding = Sides::horizontal(spacing::XS);
    let content_width = area.inner(padding).width;
    let grid_height = card_grid(content_width).height_for(content_width, RESOURCES.len());

    let rows = Flex::vertical()
        .constraints([
            Constraint::Fixed(3),
            Constraint::Fixed(1 + grid_height),
            Constraint::Max(diagram::HEIGHT),
            Constraint::Min(8),
            Constraint::Fixed(1),
        ])
        .split(area);

    header::render(app, rows[0], frame);
    resource_grid::render(app, rows[1].inner(padding), frame);

    let middle = rows[2].inner(padding);
    match app.selected() {
        Some(id) => {
            let cols = Flex::horizontal()
                .gap(spacing::XS)
                .constraints([Constraint::Percentage(60.0), Constraint::Fill])
                .split(middle);
            diagram::render(cols[0], frame);
            detail::render(id, cols[1], frame);
        }
        None => diagram::render(middle, frame),
    }

    terraform_panel::render(app, rows[3].inner(padding), frame);
    footer::render(rows[4], frame);

    if app.show_help() {
        help::render(area, frame);
    }
}

/// Draw `text` horizontally centered in `area` on row `y`.
fn draw_centered(frame: &mut Frame, area: Rect, y: u16, text: &str, style: Style) {
    if y < area.y || y >= area.bottom() {
        return;
    }
    let width = (display_width(text) as u16).min(area.width);
    let x = area.x + (area.width - width) / 2;
    draw_text_span(frame, x, y, text, style, area.right());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_skips_three_columns() {
        assert_eq!(card_grid(118).columns_for(118), 4);
        assert_eq!(card_grid(90).columns_for(90), 2);
        assert_eq!(card_grid(60).columns_for(60), 2);
        assert_eq!(card_grid(40).columns_for(40), 1);
    }

    #[test]
    fn hit_test_prefers_cards() {
        let hits = HitRegions::default();
        hits.cards[2].set(Rect::new(0, 0, 10, 4));
        hits.plan.set(Rect::new(20, 0, 8, 1));
        hits.output.set(Rect::new(0, 10, 40, 5));
        assert_eq!(hits.hit_test(3, 2), ResourceId::new(2).map(HitTarget::Card));
        assert_eq!(hits.hit_test(21, 0), Some(HitTarget::Plan));
        assert_eq!(hits.hit_test(5, 12), Some(HitTarget::Output));
        assert!(hits.over_output(5, 12));
        assert_eq!(hits.hit_test(50, 50), None);
    }
}
