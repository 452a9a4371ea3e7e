#![forbid(unsafe_code)]

//! Row-major cell grid.
//!
//! All writes are clipped to the buffer bounds. Writing over either half of
//! a wide grapheme blanks the other half so no orphaned continuation cells
//! survive.

use unicode_segmentation::UnicodeSegmentation;

use crate::cell::{Cell, CellContent};
use crate::grapheme_width;
use crate::style::Style;
use cloudsim_core::geometry::Rect;

/// A 2D grid of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Buffer {
    /// Create a blank buffer.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); usize::from(width) * usize::from(height)],
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// The full buffer area.
    #[inline]
    pub fn area(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    /// Cell at `(x, y)`, or `None` when out of bounds.
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Mutable cell at `(x, y)`.
    ///
    /// Bypasses wide-grapheme bookkeeping; use for style-only edits.
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        self.index(x, y).map(move |i| &mut self.cells[i])
    }

    /// Place a cell, keeping wide graphemes consistent.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        let Some(idx) = self.index(x, y) else {
            return;
        };
        self.release(x, y);

        let width = cell.width();
        if width == 2 {
            if x + 1 < self.width {
                self.release(x + 1, y);
                self.cells[idx + 1] = Cell::continuation_of(&cell);
                self.cells[idx] = cell;
            } else {
                // No room for the right half.
                self.cells[idx] = Cell {
                    content: CellContent::Empty,
                    ..cell
                };
            }
        } else {
            self.cells[idx] = cell;
        }
    }

    /// Blank the partner half of any wide grapheme touching `(x, y)`.
    fn release(&mut self, x: u16, y: u16) {
        let Some(idx) = self.index(x, y) else {
            return;
        };
        if self.cells[idx].is_continuation() {
            if x > 0 {
                self.cells[idx - 1].content = CellContent::Empty;
            }
            self.cells[idx].content = CellContent::Empty;
        } else if self.cells[idx].width() == 2 && x + 1 < self.width {
            self.cells[idx + 1].content = CellContent::Empty;
        }
    }

    /// Reset every cell to blank.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Fill `area` with copies of `cell`.
    pub fn fill(&mut self, area: Rect, cell: &Cell) {
        let area = area.intersection(&self.area());
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                self.set(x, y, cell.clone());
            }
        }
    }

    /// Overlay `style` on every cell in `area`, keeping content.
    pub fn set_style(&mut self, area: Rect, style: Style) {
        let area = area.intersection(&self.area());
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                if let Some(cell) = self.get_mut(x, y) {
                    cell.apply_style(style);
                }
            }
        }
    }

    /// Write `text` starting at `(x, y)`, stopping before `max_x`.
    ///
    /// Newlines and other control characters are skipped. A wide grapheme
    /// that would straddle `max_x` is not drawn. Returns the column after
    /// the last written grapheme.
    pub fn set_string(&mut self, x: u16, y: u16, text: &str, style: Style, max_x: u16) -> u16 {
        let limit = max_x.min(self.width);
        if y >= self.height {
            return x;
        }
        let mut col = x;
        for grapheme in text.graphemes(true) {
            let width = grapheme_width(grapheme) as u16;
            if width == 0 {
                continue;
            }
            if col.saturating_add(width) > limit {
                break;
            }
            self.set(col, y, Cell::from_grapheme(grapheme).with_style(style));
            col += width;
        }
        col
    }

    /// Iterate `(x, y, cell)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, u16, &Cell)> + '_ {
        let width = usize::from(self.width.max(1));
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| ((i % width) as u16, (i / width) as u16, cell))
    }
}
