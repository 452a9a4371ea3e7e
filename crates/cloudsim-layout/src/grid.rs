#![forbid(unsafe_code)]

//! Uniform grid of equally sized cells.
//!
//! Items flow left-to-right, then top-to-bottom. The column count is picked
//! from the available width so that each cell is at least `min_cell_width`
//! wide, capped at `max_columns`.

use crate::{Constraint, Flex, Rect};

/// A responsive grid of fixed-height cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    max_columns: u16,
    min_cell_width: u16,
    row_height: u16,
    column_gap: u16,
    row_gap: u16,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            max_columns: 4,
            min_cell_width: 20,
            row_height: 3,
            column_gap: 1,
            row_gap: 0,
        }
    }
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upper bound on the number of columns.
    pub fn max_columns(mut self, columns: u16) -> Self {
        self.max_columns = columns.max(1);
        self
    }

    /// Narrowest acceptable cell width before dropping a column.
    pub fn min_cell_width(mut self, width: u16) -> Self {
        self.min_cell_width = width;
        self
    }

    pub fn row_height(mut self, height: u16) -> Self {
        self.row_height = height;
        self
    }

    pub fn gap(mut self, column_gap: u16, row_gap: u16) -> Self {
        self.column_gap = column_gap;
        self.row_gap = row_gap;
        self
    }

    /// Number of columns used for the given width.
    ///
    /// Never less than one, even when one column is narrower than the minimum.
    pub fn columns_for(&self, width: u16) -> u16 {
        let mut columns = self.max_columns;
        while columns > 1 {
            let gaps = self.column_gap.saturating_mul(columns - 1);
            if width.saturating_sub(gaps) / columns >= self.min_cell_width {
                break;
            }
            columns -= 1;
        }
        columns
    }

    /// Number of rows needed to hold `count` items at the given width.
    pub fn rows_for(&self, width: u16, count: usize) -> u16 {
        let columns = usize::from(self.columns_for(width));
        count.div_ceil(columns) as u16
    }

    /// Total height needed to hold `count` items at the given width.
    pub fn height_for(&self, width: u16, count: usize) -> u16 {
        let rows = self.rows_for(width, count);
        rows.saturating_mul(self.row_height)
            .saturating_add(self.row_gap.saturating_mul(rows.saturating_sub(1)))
    }

    /// Lay out `count` cells inside `area`.
    ///
    /// Always returns `count` rects. Rows that start below the area are
    /// empty; a row cut by the bottom edge is clipped.
    pub fn cells(&self, area: Rect, count: usize) -> Vec<Rect> {
        if count == 0 {
            return Vec::new();
        }
        let columns = self.columns_for(area.width);
        let column_rects = Flex::horizontal()
            .gap(self.column_gap)
            .constraints((0..columns).map(|_| Constraint::Fill))
            .split(area);

        (0..count)
            .map(|index| {
                let column = index % usize::from(columns);
                let row = (index / usize::from(columns)) as u16;
                let y = area
                    .y
                    .saturating_add(row.saturating_mul(self.row_height + self.row_gap));
                if y >= area.bottom() || area.is_empty() {
                    return Rect::default();
                }
                let col = column_rects[column];
                Rect::new(col.x, y, col.width, self.row_height.min(area.bottom() - y))
            })
            .collect()
    }
}
