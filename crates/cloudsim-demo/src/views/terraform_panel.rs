#![forbid(unsafe_code)]

//! Terraform title bar, action buttons, and the terminal window.
//!
//! The terminal shows the tail of the output by default. `scroll_back`
//! counts rows above the tail, so new output that resets it to zero snaps
//! the view back to the bottom.

use cloudsim_layout::{Rect, Sides};
use cloudsim_render::frame::Frame;
use cloudsim_render::{Style, display_width};
use cloudsim_widgets::paragraph::Scroll;
use cloudsim_widgets::{Block, BorderType, Button, Paragraph, Widget, draw_text_span};

use crate::app::AppModel;
use crate::simulation::Action;
use crate::theme::{self, palette, spacing};

pub const PANEL_TITLE: &str = "🔧 Terraform";
pub const PLAN_LABEL: &str = "📋 Plan";
pub const RUNNING_LABEL: &str = "⏳ Running...";
pub const APPLY_LABEL: &str = "✓ Apply";
pub const DESTROY_LABEL: &str = "🗑 Destroy";
pub const PLACEHOLDER: &str =
    "$ terraform plan\n\nClick \"Plan\" to preview infrastructure changes...";

/// Text the terminal window shows.
pub fn output_text(app: &AppModel) -> &str {
    match app.simulation().output() {
        "" => PLACEHOLDER,
        output => output,
    }
}

/// Wrapped row count of the output at `width` columns.
pub fn output_lines(app: &AppModel, width: u16) -> usize {
    Paragraph::new(output_text(app)).wrap(true).line_count(width)
}

pub fn render(app: &AppModel, area: Rect, frame: &mut Frame) {
    let hits = app.hits();
    if area.is_empty() {
        hits.plan.set(Rect::default());
        hits.apply.set(Rect::default());
        hits.destroy.set(Rect::default());
        hits.output.set(Rect::default());
        return;
    }
    let sim = app.simulation();

    let bar = area.take_top(1);
    draw_text_span(frame, bar.x, bar.y, PANEL_TITLE, theme::title(), bar.right());

    let plan = Button::new(if sim.is_running() {
        RUNNING_LABEL
    } else {
        PLAN_LABEL
    })
    .enabled(sim.plan_enabled())
    .style(theme::accent());
    let apply = Button::new(APPLY_LABEL)
        .enabled(sim.apply_enabled())
        .style(Style::new().fg(palette::GREEN).bold());
    let destroy = Button::new(DESTROY_LABEL).enabled(false);

    // Right-aligned, laid out right to left.
    let mut x = bar.right();
    for (button, slot) in [(destroy, &hits.destroy), (apply, &hits.apply), (plan, &hits.plan)] {
        x = x.saturating_sub(button.width());
        let rect = Rect::new(x, bar.y, button.width(), 1).intersection(&bar);
        button.render(rect, frame);
        slot.set(rect);
        x = x.saturating_sub(spacing::XS);
    }

    let terminal = Rect::new(area.x, area.y + 1, area.width, area.height.saturating_sub(1));
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(Style::new().bg(palette::TERMINAL_BG));
    block.render(terminal, frame);
    if terminal.height > 0 {
        draw_title_bar(app, terminal, frame);
    }

    let inner = block.inner(terminal).inner(Sides::horizontal(spacing::XS));
    hits.output.set(inner);
    Paragraph::new(output_text(app))
        .style(Style::new().fg(palette::TEXT))
        .wrap(true)
        .scroll(Scroll::Bottom(app.scroll_back()))
        .highlight(theme::terraform_line)
        .render(inner, frame);
}

/// Three window dots and the command name over the top border.
fn draw_title_bar(app: &AppModel, terminal: Rect, frame: &mut Frame) {
    let y = terminal.y;
    let max_x = terminal.right().saturating_sub(1);
    let mut x = terminal.x + spacing::SM;
    for color in [palette::RED, palette::YELLOW, palette::GREEN] {
        x = draw_text_span(frame, x, y, "●", Style::new().fg(color), max_x);
        x = x.saturating_add(1);
    }
    let title = app
        .simulation()
        .last_action()
        .map_or(Action::Plan.title(), Action::title);
    let x = x.saturating_add(1);
    if usize::from(max_x.saturating_sub(x)) >= display_width(title) {
        draw_text_span(frame, x, y, title, theme::muted(), max_x);
    }
}
