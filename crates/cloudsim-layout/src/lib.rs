#![forbid(unsafe_code)]

//! Layout primitives.
//!
//! - [`Flex`] - 1D constraint-based layout (rows or columns)
//! - [`Grid`] - uniform cells flowing left-to-right, top-to-bottom
//! - [`Constraint`] - size constraints (Fixed, Percentage, Min, Max, Fill)

pub mod grid;

pub use cloudsim_core::geometry::{Rect, Sides};
pub use grid::Grid;

/// A constraint on the size of a layout area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    /// An exact size in cells.
    Fixed(u16),
    /// A percentage of the total available size (0.0 to 100.0).
    Percentage(f32),
    /// At least this many cells; grows with leftover space.
    Min(u16),
    /// Grows with leftover space, up to this many cells.
    Max(u16),
    /// Fill remaining space (like `Min(0)` but semantically clearer).
    Fill,
}

/// Layout direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Vertical,
    Horizontal,
}

/// A flexible layout container.
#[derive(Debug, Clone, Default)]
pub struct Flex {
    direction: Direction,
    constraints: Vec<Constraint>,
    margin: Sides,
    gap: u16,
}

impl Flex {
    /// Create a new vertical flex layout.
    pub fn vertical() -> Self {
        Self {
            direction: Direction::Vertical,
            ..Default::default()
        }
    }

    /// Create a new horizontal flex layout.
    pub fn horizontal() -> Self {
        Self {
            direction: Direction::Horizontal,
            ..Default::default()
        }
    }

    /// Set the constraints.
    pub fn constraints(mut self, constraints: impl IntoIterator<Item = Constraint>) -> Self {
        self.constraints = constraints.into_iter().collect();
        self
    }

    /// Set the margin.
    pub fn margin(mut self, margin: Sides) -> Self {
        self.margin = margin;
        self
    }

    /// Set the gap between items.
    pub fn gap(mut self, gap: u16) -> Self {
        self.gap = gap;
        self
    }

    /// Split the given area into one rectangle per constraint.
    ///
    /// The output always has exactly as many rects as there are constraints;
    /// items that do not fit get zero size.
    pub fn split(&self, area: Rect) -> Vec<Rect> {
        let inner = area.inner(self.margin);
        let count = self.constraints.len();
        if count == 0 {
            return Vec::new();
        }
        if inner.is_empty() {
            return vec![Rect::default(); count];
        }

        let total_size = match self.direction {
            Direction::Horizontal => inner.width,
            Direction::Vertical => inner.height,
        };
        let total_gap = ((count - 1) as u64 * self.gap as u64).min(u16::MAX as u64) as u16;
        let sizes = solve_constraints(&self.constraints, total_size.saturating_sub(total_gap));

        let mut pos = match self.direction {
            Direction::Horizontal => inner.x,
            Direction::Vertical => inner.y,
        };
        sizes
            .into_iter()
            .map(|size| {
                let rect = match self.direction {
                    Direction::Horizontal => Rect::new(pos, inner.y, size, inner.height),
                    Direction::Vertical => Rect::new(inner.x, pos, inner.width, size),
                };
                pos = pos.saturating_add(size).saturating_add(self.gap);
                rect
            })
            .collect()
    }
}

/// Resolve constraints into sizes that sum to at most `available`.
///
/// Fixed and percentage sizes are claimed first, then minimums, then the
/// leftover is shared evenly between `Min`, `Max`, and `Fill` items (earlier
/// items receive the remainder cells).
pub(crate) fn solve_constraints(constraints: &[Constraint], available: u16) -> Vec<u16> {
    let mut sizes = vec![0u16; constraints.len()];
    let mut remaining = available;

    for (size, constraint) in sizes.iter_mut().zip(constraints) {
        let want = match *constraint {
            Constraint::Fixed(n) => n,
            Constraint::Percentage(p) => {
                let p = p.clamp(0.0, 100.0);
                (available as f32 * p / 100.0).floor() as u16
            }
            Constraint::Min(n) => n,
            Constraint::Max(_) | Constraint::Fill => 0,
        };
        *size = want.min(remaining);
        remaining -= *size;
    }

    while remaining > 0 {
        let open: Vec<usize> = constraints
            .iter()
            .enumerate()
            .filter(|(i, c)| match c {
                Constraint::Max(max) => sizes[*i] < *max,
                Constraint::Min(_) | Constraint::Fill => true,
                Constraint::Fixed(_) | Constraint::Percentage(_) => false,
            })
            .map(|(i, _)| i)
            .collect();
        if open.is_empty() {
            break;
        }

        let share = remaining / open.len() as u16;
        let mut extra = remaining % open.len() as u16;
        let mut progressed = false;
        for i in open {
            let mut add = share;
            if extra > 0 {
                add += 1;
                extra -= 1;
            }
            if let Constraint::Max(max) = constraints[i] {
                add = add.min(max - sizes[i]);
            }
            sizes[i] += add;
            remaining -= add;
            progressed |= add > 0;
        }
        if !progressed {
            break;
        }
    }

    sizes
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fixed_then_fill() {
        let rects = Flex::vertical()
            .constraints([Constraint::Fixed(3), Constraint::Fill, Constraint::Fixed(1)])
            .split(Rect::new(0, 0, 80, 24));
        assert_eq!(rects[0], Rect::new(0, 0, 80, 3));
        assert_eq!(rects[1], Rect::new(0, 3, 80, 20));
        assert_eq!(rects[2], Rect::new(0, 23, 80, 1));
    }

    #[test]
    fn percentage_split_with_gap() {
        let rects = Flex::horizontal()
            .gap(2)
            .constraints([Constraint::Percentage(50.0), Constraint::Fill])
            .split(Rect::new(0, 0, 102, 10));
        assert_eq!(rects[0].width, 50);
        assert_eq!(rects[1].x, 52);
        assert_eq!(rects[1].width, 50);
    }

    #[test]
    fn max_caps_growth() {
        let sizes = solve_constraints(&[Constraint::Max(5), Constraint::Fill], 30);
        assert_eq!(sizes, vec![5, 25]);
    }

    #[test]
    fn min_is_honored_before_fill() {
        let sizes = solve_constraints(&[Constraint::Min(10), Constraint::Fill], 12);
        assert_eq!(sizes, vec![11, 1]);
    }

    #[test]
    fn overflow_truncates_later_items() {
        let sizes = solve_constraints(&[Constraint::Fixed(8), Constraint::Fixed(8)], 10);
        assert_eq!(sizes, vec![8, 2]);
    }

    #[test]
    fn empty_area_yields_empty_rects() {
        let rects = Flex::vertical()
            .constraints([Constraint::Fill, Constraint::Fill])
            .split(Rect::new(0, 0, 0, 10));
        assert_eq!(rects, vec![Rect::default(); 2]);
    }

    proptest! {
        #[test]
        fn sizes_never_exceed_available(
            available in 0u16..500,
            raw in proptest::collection::vec((0u8..5, 0u16..200), 0..8),
        ) {
            let constraints: Vec<Constraint> = raw
                .into_iter()
                .map(|(kind, n)| match kind {
                    0 => Constraint::Fixed(n),
                    1 => Constraint::Percentage(f32::from(n % 101)),
                    2 => Constraint::Min(n),
                    3 => Constraint::Max(n),
                    _ => Constraint::Fill,
                })
                .collect();
            let sizes = solve_constraints(&constraints, available);
            prop_assert_eq!(sizes.len(), constraints.len());
            let total: u32 = sizes.iter().map(|&s| u32::from(s)).sum();
            prop_assert!(total <= u32::from(available));
        }
    }
}
