#![forbid(unsafe_code)]

//! ANSI escape sequence writers.
//!
//! Pure byte emitters; no state. Coordinates are 0-indexed on input.

use std::io::{self, Write};

use crate::cell::{PackedRgba, StyleFlags};

/// SGR reset: `CSI 0 m`
pub const SGR_RESET: &[u8] = b"\x1b[0m";

#[inline]
pub fn sgr_reset<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(SGR_RESET)
}

/// Emit `CSI n;n;... m` for each set flag. Does not reset first.
pub fn sgr_flags<W: Write>(w: &mut W, flags: StyleFlags) -> io::Result<()> {
    if flags.is_empty() {
        return Ok(());
    }
    let codes: Vec<&str> = [
        (StyleFlags::BOLD, "1"),
        (StyleFlags::DIM, "2"),
        (StyleFlags::ITALIC, "3"),
        (StyleFlags::UNDERLINE, "4"),
        (StyleFlags::REVERSE, "7"),
    ]
    .into_iter()
    .filter(|(flag, _)| flags.contains(*flag))
    .map(|(_, code)| code)
    .collect();
    write!(w, "\x1b[{}m", codes.join(";"))
}

/// Foreground color; alpha 0 selects the terminal default.
pub fn sgr_fg_packed<W: Write>(w: &mut W, color: PackedRgba) -> io::Result<()> {
    if color.a() == 0 {
        return w.write_all(b"\x1b[39m");
    }
    write!(w, "\x1b[38;2;{};{};{}m", color.r(), color.g(), color.b())
}

/// Background color; alpha 0 selects the terminal default.
pub fn sgr_bg_packed<W: Write>(w: &mut W, color: PackedRgba) -> io::Result<()> {
    if color.a() == 0 {
        return w.write_all(b"\x1b[49m");
    }
    write!(w, "\x1b[48;2;{};{};{}m", color.r(), color.g(), color.b())
}

/// CUP (Cursor Position): `CSI row ; col H`, converted to 1-indexed.
pub fn cup<W: Write>(w: &mut W, row: u16, col: u16) -> io::Result<()> {
    write!(
        w,
        "\x1b[{};{}H",
        row.saturating_add(1),
        col.saturating_add(1)
    )
}

/// Erase the whole display: `CSI 2 J`
pub fn erase_display<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// Begin synchronized output (DEC 2026).
pub fn sync_begin<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[?2026h")
}

/// End synchronized output (DEC 2026).
pub fn sync_end<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[?2026l")
}
