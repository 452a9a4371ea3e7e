#![forbid(unsafe_code)]

//! Partial style overlays.

use crate::cell::{PackedRgba, StyleFlags};

/// A style overlay. Unset colors leave the target cell untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub fg: Option<PackedRgba>,
    pub bg: Option<PackedRgba>,
    pub attrs: StyleFlags,
}

impl Default for Style {
    fn default() -> Self {
        Self::new()
    }
}

impl Style {
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            attrs: StyleFlags::empty(),
        }
    }

    #[must_use]
    pub const fn fg(mut self, color: PackedRgba) -> Self {
        self.fg = Some(color);
        self
    }

    #[must_use]
    pub const fn bg(mut self, color: PackedRgba) -> Self {
        self.bg = Some(color);
        self
    }

    #[must_use]
    pub fn bold(mut self) -> Self {
        self.attrs |= StyleFlags::BOLD;
        self
    }

    #[must_use]
    pub fn dim(mut self) -> Self {
        self.attrs |= StyleFlags::DIM;
        self
    }

    #[must_use]
    pub fn italic(mut self) -> Self {
        self.attrs |= StyleFlags::ITALIC;
        self
    }

    #[must_use]
    pub fn underline(mut self) -> Self {
        self.attrs |= StyleFlags::UNDERLINE;
        self
    }

    #[must_use]
    pub fn reversed(mut self) -> Self {
        self.attrs |= StyleFlags::REVERSE;
        self
    }

    /// Layer `other` on top of `self`: its set colors win, flags accumulate.
    #[must_use]
    pub fn patch(self, other: Style) -> Self {
        Self {
            fg: other.fg.or(self.fg),
            bg: other.bg.or(self.bg),
            attrs: self.attrs | other.attrs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_prefers_overlay_colors() {
        let base = Style::new().fg(PackedRgba::WHITE).bg(PackedRgba::BLACK);
        let over = Style::new().fg(PackedRgba::rgb(1, 2, 3)).bold();
        let merged = base.patch(over);
        assert_eq!(merged.fg, Some(PackedRgba::rgb(1, 2, 3)));
        assert_eq!(merged.bg, Some(PackedRgba::BLACK));
        assert!(merged.attrs.contains(StyleFlags::BOLD));
    }
}
