#![forbid(unsafe_code)]

//! Frame: the render target for one pass.
//!
//! [`Frame`] is what `Model::view()` draws into.

use crate::buffer::Buffer;
use cloudsim_core::geometry::Rect;

#[derive(Debug, Clone)]
pub struct Frame {
    pub buffer: Buffer,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            buffer: Buffer::new(width, height),
        }
    }

    /// The full drawable area.
    #[inline]
    pub fn area(&self) -> Rect {
        self.buffer.area()
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.buffer.width()
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.buffer.height()
    }

    /// Take the rendered buffer.
    pub fn into_buffer(self) -> Buffer {
        self.buffer
    }
}
