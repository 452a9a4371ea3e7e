#![forbid(unsafe_code)]

//! Presenter: state-tracked ANSI emission.
//!
//! Turns a [`BufferDiff`] into terminal output, emitting cursor moves and
//! SGR changes only when they differ from what the terminal already has.
//! Output is buffered and flushed once per frame inside a synchronized
//! update block.

use std::io::{self, BufWriter, Write};

use crate::ansi;
use crate::buffer::Buffer;
use crate::cell::{Cell, CellContent, PackedRgba, StyleFlags};
use crate::diff::BufferDiff;

const BUFFER_CAPACITY: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellStyle {
    fg: PackedRgba,
    bg: PackedRgba,
    attrs: StyleFlags,
}

impl CellStyle {
    fn from_cell(cell: &Cell) -> Self {
        Self {
            fg: cell.fg,
            bg: cell.bg,
            attrs: cell.attrs,
        }
    }
}

/// State-tracked ANSI presenter.
pub struct Presenter<W: Write> {
    writer: BufWriter<W>,
    /// `None` means unknown; the next cell always emits a full SGR.
    current_style: Option<CellStyle>,
    cursor: Option<(u16, u16)>,
}

impl<W: Write> Presenter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(BUFFER_CAPACITY, writer),
            current_style: None,
            cursor: None,
        }
    }

    /// Write the changed cells of `buffer` and flush.
    pub fn present(&mut self, buffer: &Buffer, diff: &BufferDiff) -> io::Result<()> {
        #[cfg(feature = "tracing")]
        let _span = tracing::trace_span!("present", changes = diff.len()).entered();

        if diff.is_empty() {
            return Ok(());
        }
        ansi::sync_begin(&mut self.writer)?;
        for (x, y) in diff.iter() {
            let Some(cell) = buffer.get(x, y) else {
                continue;
            };
            if cell.is_continuation() {
                continue;
            }
            self.move_cursor_to(x, y)?;
            self.emit_cell(cell)?;
        }
        ansi::sgr_reset(&mut self.writer)?;
        self.current_style = None;
        ansi::sync_end(&mut self.writer)?;
        self.writer.flush()
    }

    fn emit_cell(&mut self, cell: &Cell) -> io::Result<()> {
        let style = CellStyle::from_cell(cell);
        if self.current_style != Some(style) {
            // Reset + apply is simpler than incremental attribute toggling.
            ansi::sgr_reset(&mut self.writer)?;
            if style.fg.a() > 0 {
                ansi::sgr_fg_packed(&mut self.writer, style.fg)?;
            }
            if style.bg.a() > 0 {
                ansi::sgr_bg_packed(&mut self.writer, style.bg)?;
            }
            ansi::sgr_flags(&mut self.writer, style.attrs)?;
            self.current_style = Some(style);
        }

        match &cell.content {
            CellContent::Char(c) => {
                let mut buf = [0u8; 4];
                self.writer.write_all(c.encode_utf8(&mut buf).as_bytes())?;
            }
            CellContent::Grapheme(g) => self.writer.write_all(g.as_bytes())?,
            CellContent::Empty | CellContent::Continuation => self.writer.write_all(b" ")?,
        }

        if let Some((x, y)) = self.cursor {
            self.cursor = Some((x.saturating_add(cell.width() as u16), y));
        }
        Ok(())
    }

    fn move_cursor_to(&mut self, x: u16, y: u16) -> io::Result<()> {
        if self.cursor == Some((x, y)) {
            return Ok(());
        }
        ansi::cup(&mut self.writer, y, x)?;
        self.cursor = Some((x, y));
        Ok(())
    }

    /// Clear the screen and forget cursor/style state.
    pub fn clear_screen(&mut self) -> io::Result<()> {
        ansi::sgr_reset(&mut self.writer)?;
        ansi::erase_display(&mut self.writer)?;
        ansi::cup(&mut self.writer, 0, 0)?;
        self.cursor = Some((0, 0));
        self.current_style = None;
        self.writer.flush()
    }

    /// Unwrap the underlying writer, flushing first.
    pub fn into_inner(self) -> io::Result<W> {
        self.writer.into_inner().map_err(|e| e.into_error())
    }
}
