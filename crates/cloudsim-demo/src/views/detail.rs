#![forbid(unsafe_code)]

use cloudsim_layout::{Rect, Sides};
use cloudsim_render::frame::Frame;
use cloudsim_widgets::{Block, BorderType, Paragraph, Widget, draw_text_span};

use crate::catalog::ResourceId;
use crate::theme::{self, spacing};

/// Description and metadata of the selected resource.
pub fn render(id: ResourceId, area: Rect, frame: &mut Frame) {
    let resource = id.resource();
    let title = format!(" {} {} ", resource.icon, resource.name);
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(theme::selected_border())
        .title(&title);
    block.render(area, frame);
    let inner = block.inner(area).inner(Sides::horizontal(spacing::XS));
    if inner.is_empty() {
        return;
    }

    let description = Paragraph::new(resource.description).wrap(true);
    let desc_rows = (description.line_count(inner.width) as u16).min(inner.height.saturating_sub(3));
    description.render(Rect::new(inner.x, inner.y, inner.width, desc_rows), frame);

    let meta_y = inner.y + desc_rows + 1;
    for (offset, (label, value)) in [
        ("Status: ", resource.status.label()),
        ("Details: ", resource.details),
    ]
    .into_iter()
    .enumerate()
    {
        let y = meta_y + offset as u16;
        if y >= inner.bottom() {
            break;
        }
        let x = draw_text_span(frame, inner.x, y, label, theme::muted(), inner.right());
        draw_text_span(frame, x, y, value, theme::title(), inner.right());
    }
}
