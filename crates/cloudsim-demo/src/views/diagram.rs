#![forbid(unsafe_code)]

//! Static architecture overview. Takes no state.

use cloudsim_layout::{Constraint, Flex, Rect};
use cloudsim_render::Style;
use cloudsim_render::frame::Frame;
use cloudsim_widgets::{Block, BorderType, Widget};

use crate::theme::{self, palette};
use crate::views::draw_centered;

/// Rows needed to show the whole diagram, borders included.
pub const HEIGHT: u16 = 11;

pub const TITLE: &str = " Architecture Overview ";

/// Side column for S3 and IAM is dropped below this inner width.
const SIDE_MIN_WIDTH: u16 = 44;
const SIDE_WIDTH: u16 = 16;

pub fn render(area: Rect, frame: &mut Frame) {
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .title(TITLE);
    block.render(area, frame);
    let inner = block.inner(area);
    if inner.is_empty() {
        return;
    }

    let (main, arrow, side) = if inner.width >= SIDE_MIN_WIDTH {
        let cols = Flex::horizontal()
            .constraints([
                Constraint::Fill,
                Constraint::Fixed(3),
                Constraint::Fixed(SIDE_WIDTH),
            ])
            .split(inner);
        (cols[0], Some(cols[1]), Some(cols[2]))
    } else {
        (inner, None, None)
    };

    let text = Style::new().fg(palette::TEXT);
    let arrow_style = theme::muted();
    draw_centered(frame, main, main.y, "🌍 Internet", text);
    draw_centered(frame, main, main.y + 1, "↓", arrow_style);
    draw_centered(frame, main, main.y + 2, "🚪 Internet Gateway", text);
    draw_centered(frame, main, main.y + 3, "↓", arrow_style);

    let vpc_area = Rect::new(main.x, main.y + 4, main.width, 5).intersection(&main);
    render_vpc(vpc_area, frame);

    if let (Some(arrow), Some(side)) = (arrow, side) {
        draw_centered(frame, arrow, main.y + 6, "↔", arrow_style);
        draw_centered(frame, side, main.y + 5, "📦 S3 Bucket", text);
        draw_centered(frame, side, main.y + 7, "🔐 IAM", text);
    }
}

fn render_vpc(area: Rect, frame: &mut Frame) {
    if area.is_empty() {
        return;
    }
    let vpc = Block::bordered()
        .border_style(theme::accent())
        .title(" VPC (10.0.0.0/16) ");
    vpc.render(area, frame);

    let subnets = Flex::horizontal()
        .gap(1)
        .constraints([Constraint::Fill, Constraint::Fill])
        .split(vpc.inner(area));
    render_subnet(subnets[0], " Public Subnet ", "🖥️ EC2  🛡️ SG", palette::GREEN, frame);
    render_subnet(subnets[1], " Private Subnet ", "🗄️ RDS", palette::BLUE, frame);
}

fn render_subnet(
    area: Rect,
    title: &str,
    contents: &str,
    color: cloudsim_render::PackedRgba,
    frame: &mut Frame,
) {
    if area.is_empty() {
        return;
    }
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::new().fg(color))
        .title(title);
    block.render(area, frame);
    let inner = block.inner(area);
    draw_centered(frame, inner, inner.y, contents, Style::new().fg(palette::TEXT));
}
