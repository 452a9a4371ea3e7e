#![forbid(unsafe_code)]

//! Cell-level buffer diffing.

use crate::buffer::Buffer;

/// Positions that differ between two frames, in row-major order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferDiff {
    changes: Vec<(u16, u16)>,
}

impl BufferDiff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare two buffers of the same size.
    ///
    /// When the sizes differ every cell of `new` is reported.
    pub fn compute(old: &Buffer, new: &Buffer) -> Self {
        if old.width() != new.width() || old.height() != new.height() {
            return Self::full(new);
        }
        let changes = old
            .iter()
            .zip(new.iter())
            .filter(|((_, _, a), (_, _, b))| a != b)
            .map(|(_, (x, y, _))| (x, y))
            .collect();
        Self { changes }
    }

    /// Every cell of `buffer`.
    pub fn full(buffer: &Buffer) -> Self {
        Self {
            changes: buffer.iter().map(|(x, y, _)| (x, y)).collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, u16)> + '_ {
        self.changes.iter().copied()
    }
}
