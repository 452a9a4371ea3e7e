#![forbid(unsafe_code)]

//! Colors, spacing, and shared styles.
//!
//! | Token | Value | Use |
//! |-------|-------|-----|
//! | `spacing::XS` | 1 | gaps between badges and buttons |
//! | `spacing::SM` | 2 | horizontal content padding |
//! | `spacing::CARD_HEIGHT` | 4 | one resource card |

use cloudsim_render::{PackedRgba, Style};

use crate::catalog::ResourceStatus;

pub mod spacing {
    pub const XS: u16 = 1;
    pub const SM: u16 = 2;
    /// Border, title row, details row, border.
    pub const CARD_HEIGHT: u16 = 4;
    /// Narrowest card before the grid drops a column.
    pub const CARD_MIN_WIDTH: u16 = 24;
    pub const GRID_COLUMNS: u16 = 4;
}

pub mod palette {
    use cloudsim_render::PackedRgba;

    pub const ACCENT: PackedRgba = PackedRgba::rgb(255, 153, 0);
    pub const BORDER: PackedRgba = PackedRgba::rgb(88, 96, 112);
    pub const MUTED: PackedRgba = PackedRgba::rgb(140, 148, 160);
    pub const TEXT: PackedRgba = PackedRgba::rgb(230, 234, 240);
    pub const TERMINAL_BG: PackedRgba = PackedRgba::rgb(22, 24, 29);

    pub const GREEN: PackedRgba = PackedRgba::rgb(46, 160, 67);
    pub const BLUE: PackedRgba = PackedRgba::rgb(56, 132, 244);
    pub const PURPLE: PackedRgba = PackedRgba::rgb(137, 87, 229);
    pub const RED: PackedRgba = PackedRgba::rgb(248, 81, 73);
    pub const YELLOW: PackedRgba = PackedRgba::rgb(210, 153, 34);
    pub const ENV_BG: PackedRgba = PackedRgba::rgb(31, 111, 235);
    pub const REGION_BG: PackedRgba = PackedRgba::rgb(48, 54, 61);
}

/// Badge color for a resource status.
pub fn status_color(status: ResourceStatus) -> PackedRgba {
    match status {
        ResourceStatus::Active => palette::GREEN,
        ResourceStatus::Running => palette::BLUE,
        ResourceStatus::Attached => palette::PURPLE,
    }
}

pub fn status_badge(status: ResourceStatus) -> Style {
    Style::new()
        .fg(PackedRgba::WHITE)
        .bg(status_color(status))
        .bold()
}

pub fn border() -> Style {
    Style::new().fg(palette::BORDER)
}

pub fn selected_border() -> Style {
    Style::new().fg(palette::ACCENT).bold()
}

pub fn title() -> Style {
    Style::new().fg(palette::TEXT).bold()
}

pub fn muted() -> Style {
    Style::new().fg(palette::MUTED)
}

pub fn accent() -> Style {
    Style::new().fg(palette::ACCENT).bold()
}

/// Per-line styling of Terraform output.
pub fn terraform_line(line: &str) -> Option<Style> {
    let trimmed = line.trim_start();
    if trimmed.starts_with("Plan:") || trimmed.starts_with("Apply complete!") {
        Some(Style::new().fg(palette::GREEN).bold())
    } else if trimmed.starts_with("Run cancelled") {
        Some(Style::new().fg(palette::YELLOW).bold())
    } else if trimmed.starts_with('+') {
        Some(Style::new().fg(palette::GREEN))
    } else if trimmed.starts_with('#') {
        Some(Style::new().fg(palette::MUTED).dim())
    } else if trimmed.starts_with('$') || trimmed.ends_with("Creation complete!") {
        Some(Style::new().bold())
    } else {
        None
    }
}
