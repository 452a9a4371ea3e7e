#![forbid(unsafe_code)]

//! Cell types.
//!
//! A [`Cell`] is one column of one row in the terminal grid. Wide graphemes
//! (CJK, most emoji) occupy two cells: the head cell holds the content and
//! the cell to its right is a [`CellContent::Continuation`] marker that the
//! presenter skips.

use crate::grapheme_width;
use crate::style::Style;

/// A compact RGBA color.
///
/// Layout is `0xRRGGBBAA`. Alpha 0 means "terminal default".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[repr(transparent)]
pub struct PackedRgba(pub u32);

impl PackedRgba {
    /// Fully transparent (alpha = 0).
    pub const TRANSPARENT: Self = Self(0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Create an opaque RGB color.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Create an RGBA color with explicit alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (a as u32))
    }

    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }
}

bitflags::bitflags! {
    /// Text attribute flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StyleFlags: u8 {
        const BOLD      = 0b0000_0001;
        const DIM       = 0b0000_0010;
        const ITALIC    = 0b0000_0100;
        const UNDERLINE = 0b0000_1000;
        const REVERSE   = 0b0001_0000;
    }
}

/// What a cell displays.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CellContent {
    /// Nothing drawn; presented as a space.
    #[default]
    Empty,
    /// A single scalar value.
    Char(char),
    /// A multi-codepoint grapheme cluster (e.g. emoji with a variation selector).
    Grapheme(Box<str>),
    /// Right half of a wide grapheme.
    Continuation,
}

impl CellContent {
    /// Build content from one grapheme cluster.
    pub fn from_grapheme(grapheme: &str) -> Self {
        let mut chars = grapheme.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Self::Empty,
            (Some(c), None) => Self::Char(c),
            _ => Self::Grapheme(grapheme.into()),
        }
    }

    /// The character, if this is single-scalar content.
    #[inline]
    pub fn as_char(&self) -> Option<char> {
        match self {
            Self::Char(c) => Some(*c),
            _ => None,
        }
    }

    /// Write the visible text of this content into `out`.
    pub fn push_to(&self, out: &mut String) {
        match self {
            Self::Empty => out.push(' '),
            Self::Char(c) => out.push(*c),
            Self::Grapheme(g) => out.push_str(g),
            Self::Continuation => {}
        }
    }
}

/// A single terminal cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub content: CellContent,
    pub fg: PackedRgba,
    pub bg: PackedRgba,
    pub attrs: StyleFlags,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            content: CellContent::Empty,
            fg: PackedRgba::TRANSPARENT,
            bg: PackedRgba::TRANSPARENT,
            attrs: StyleFlags::empty(),
        }
    }
}

impl Cell {
    /// Create a cell holding one character with default colors.
    #[inline]
    pub fn from_char(c: char) -> Self {
        Self {
            content: CellContent::Char(c),
            ..Self::default()
        }
    }

    /// Create a cell holding one grapheme cluster.
    pub fn from_grapheme(grapheme: &str) -> Self {
        Self {
            content: CellContent::from_grapheme(grapheme),
            ..Self::default()
        }
    }

    /// Continuation marker carrying the colors of its head cell.
    pub(crate) fn continuation_of(head: &Cell) -> Self {
        Self {
            content: CellContent::Continuation,
            fg: head.fg,
            bg: head.bg,
            attrs: head.attrs,
        }
    }

    /// Builder form of [`Cell::apply_style`].
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.apply_style(style);
        self
    }

    /// Overlay the set fields of `style` onto this cell.
    pub fn apply_style(&mut self, style: Style) {
        if let Some(fg) = style.fg {
            self.fg = fg;
        }
        if let Some(bg) = style.bg {
            self.bg = bg;
        }
        self.attrs |= style.attrs;
    }

    /// Columns occupied by this cell's content (0 for continuations).
    pub fn width(&self) -> usize {
        match &self.content {
            CellContent::Empty => 1,
            CellContent::Char(c) => {
                let mut buf = [0u8; 4];
                grapheme_width(c.encode_utf8(&mut buf)).max(1)
            }
            CellContent::Grapheme(g) => grapheme_width(g).max(1),
            CellContent::Continuation => 0,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self.content, CellContent::Empty)
    }

    #[inline]
    pub fn is_continuation(&self) -> bool {
        matches!(self.content, CellContent::Continuation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_channels_round_trip() {
        let c = PackedRgba::rgba(1, 2, 3, 4);
        assert_eq!((c.r(), c.g(), c.b(), c.a()), (1, 2, 3, 4));
        assert_eq!(PackedRgba::rgb(9, 9, 9).a(), 255);
    }

    #[test]
    fn single_char_grapheme_is_char() {
        assert_eq!(CellContent::from_grapheme("x"), CellContent::Char('x'));
        assert!(matches!(
            CellContent::from_grapheme("☁️"),
            CellContent::Grapheme(_)
        ));
    }

    #[test]
    fn widths() {
        assert_eq!(Cell::from_char('a').width(), 1);
        assert_eq!(Cell::from_char('📋').width(), 2);
        assert_eq!(Cell::default().width(), 1);
        assert_eq!(Cell::continuation_of(&Cell::default()).width(), 0);
    }

    #[test]
    fn apply_style_keeps_unset_channels() {
        let mut cell = Cell::from_char('x').with_style(Style::new().bg(PackedRgba::BLACK));
        cell.apply_style(Style::new().fg(PackedRgba::WHITE).bold());
        assert_eq!(cell.bg, PackedRgba::BLACK);
        assert_eq!(cell.fg, PackedRgba::WHITE);
        assert!(cell.attrs.contains(StyleFlags::BOLD));
    }
}
