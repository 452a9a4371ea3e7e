#![forbid(unsafe_code)]

//! Geometric primitives.

/// A rectangle for layout bounds, clipping, and hit testing.
///
/// Uses terminal coordinates (0-indexed, origin at top-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: u16,
    /// Top edge (inclusive).
    pub y: u16,
    /// Width in cells.
    pub width: u16,
    /// Height in cells.
    pub height: u16,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(width: u16, height: u16) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    /// Area in cells.
    #[inline]
    pub const fn area(&self) -> u32 {
        self.width as u32 * self.height as u32
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Compute the intersection with another rectangle.
    ///
    /// Returns an empty rectangle at the origin of `self` when the two do
    /// not overlap.
    pub fn intersection(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            return Rect::new(self.x, self.y, 0, 0);
        }
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Shrink the rectangle by the given margins.
    pub fn inner(&self, margin: Sides) -> Rect {
        let x = self.x.saturating_add(margin.left);
        let y = self.y.saturating_add(margin.top);
        let width = self
            .width
            .saturating_sub(margin.left)
            .saturating_sub(margin.right);
        let height = self
            .height
            .saturating_sub(margin.top)
            .saturating_sub(margin.bottom);
        Rect::new(x, y, width, height)
    }

    /// Rectangle of `height` rows taken from the top.
    pub fn take_top(&self, height: u16) -> Rect {
        Rect::new(self.x, self.y, self.width, height.min(self.height))
    }

    /// Rectangle of `height` rows taken from the bottom.
    pub fn take_bottom(&self, height: u16) -> Rect {
        let height = height.min(self.height);
        Rect::new(self.x, self.bottom() - height, self.width, height)
    }

    /// Center a `width` x `height` rectangle inside this one, clamped to fit.
    pub fn centered(&self, width: u16, height: u16) -> Rect {
        let width = width.min(self.width);
        let height = height.min(self.height);
        Rect::new(
            self.x + (self.width - width) / 2,
            self.y + (self.height - height) / 2,
            width,
            height,
        )
    }
}

/// Margins on the four sides of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Sides {
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
    pub left: u16,
}

impl Sides {
    /// Same margin on every side.
    pub const fn all(value: u16) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Margin on left and right only.
    pub const fn horizontal(value: u16) -> Self {
        Self {
            top: 0,
            right: value,
            bottom: 0,
            left: value,
        }
    }

    /// Margin on top and bottom only.
    pub const fn vertical(value: u16) -> Self {
        Self {
            top: value,
            right: 0,
            bottom: value,
            left: 0,
        }
    }
}

impl From<u16> for Sides {
    fn from(value: u16) -> Self {
        Self::all(value)
    }
}

impl From<(u16, u16)> for Sides {
    /// `(vertical, horizontal)`, CSS shorthand order.
    fn from((vertical, horizontal): (u16, u16)) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn contains_is_half_open() {
        let r = Rect::new(2, 3, 4, 2);
        assert!(r.contains(2, 3));
        assert!(r.contains(5, 4));
        assert!(!r.contains(6, 4));
        assert!(!r.contains(5, 5));
        assert!(!r.contains(1, 3));
    }

    #[test]
    fn intersection_of_disjoint_is_empty() {
        let a = Rect::new(0, 0, 5, 5);
        let b = Rect::new(10, 10, 5, 5);
        assert!(a.intersection(&b).is_empty());
    }

    #[test]
    fn intersection_overlap() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert_eq!(a.intersection(&b), Rect::new(5, 5, 5, 5));
    }

    #[test]
    fn inner_saturates() {
        let r = Rect::new(0, 0, 3, 3);
        let inner = r.inner(Sides::all(2));
        assert!(inner.is_empty());
        assert_eq!(Rect::new(1, 1, 10, 6).inner(Sides::from((1, 2))), Rect::new(3, 2, 6, 4));
    }

    #[test]
    fn take_top_and_bottom() {
        let r = Rect::new(0, 2, 10, 8);
        assert_eq!(r.take_top(3), Rect::new(0, 2, 10, 3));
        assert_eq!(r.take_bottom(3), Rect::new(0, 7, 10, 3));
        assert_eq!(r.take_bottom(20), r);
    }

    #[test]
    fn centered_fits_inside() {
        let r = Rect::new(10, 10, 20, 10);
        assert_eq!(r.centered(10, 4), Rect::new(15, 13, 10, 4));
        assert_eq!(r.centered(50, 50), r);
    }

    proptest! {
        #[test]
        fn intersection_is_contained_in_both(
            ax in 0u16..100, ay in 0u16..100, aw in 0u16..100, ah in 0u16..100,
            bx in 0u16..100, by in 0u16..100, bw in 0u16..100, bh in 0u16..100,
        ) {
            let a = Rect::new(ax, ay, aw, ah);
            let b = Rect::new(bx, by, bw, bh);
            let i = a.intersection(&b);
            prop_assert!(i.area() <= a.area().min(b.area()));
            if !i.is_empty() {
                prop_assert!(a.contains(i.x, i.y) && b.contains(i.x, i.y));
                prop_assert!(a.contains(i.right() - 1, i.bottom() - 1));
                prop_assert!(b.contains(i.right() - 1, i.bottom() - 1));
            }
        }
    }
}
