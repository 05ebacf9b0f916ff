//! ANSI escape sequences for terminal control.
//!
//! Everything the renderer emits goes through these functions:
//! - Relative cursor movement (frames are drawn inline, not at absolute
//!   screen positions)
//! - Erasing and clearing
//! - Colors (ANSI 16, 256, and TrueColor) and text attributes
//! - Synchronized output for flicker-free rendering

use std::io::{self, Write};

use crate::types::{Attr, Rgba};

// =============================================================================
// Constants
// =============================================================================

/// Control Sequence Introducer.
pub const CSI: &str = "\x1b[";

/// Begin synchronized update (mode 2026).
pub const BEGIN_SYNC: &str = "\x1b[?2026h";

/// End synchronized update (mode 2026).
pub const END_SYNC: &str = "\x1b[?2026l";

/// Reset all SGR attributes.
pub const SGR_RESET: &str = "\x1b[0m";

// =============================================================================
// Cursor Movement
// =============================================================================

/// Move cursor up by n rows.
#[inline]
pub fn cursor_up<W: Write + ?Sized>(w: &mut W, n: u16) -> io::Result<()> {
    if n > 0 {
        write!(w, "\x1b[{}A", n)
    } else {
        Ok(())
    }
}

/// Move cursor forward (right) by n columns.
#[inline]
pub fn cursor_forward<W: Write + ?Sized>(w: &mut W, n: u16) -> io::Result<()> {
    if n > 0 {
        write!(w, "\x1b[{}C", n)
    } else {
        Ok(())
    }
}

/// Move cursor backward (left) by n columns.
#[inline]
pub fn cursor_backward<W: Write + ?Sized>(w: &mut W, n: u16) -> io::Result<()> {
    if n > 0 {
        write!(w, "\x1b[{}D", n)
    } else {
        Ok(())
    }
}

/// Carriage return to column zero.
#[inline]
pub fn carriage_return<W: Write + ?Sized>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\r")
}

/// Move to column zero of the next line, scrolling at the bottom.
#[inline]
pub fn newline<W: Write + ?Sized>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\r\n")
}

/// Hide cursor.
#[inline]
pub fn cursor_hide<W: Write + ?Sized>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show cursor.
#[inline]
pub fn cursor_show<W: Write + ?Sized>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// =============================================================================
// Erasing
// =============================================================================

/// Erase from cursor to end of screen.
#[inline]
pub fn erase_down<W: Write + ?Sized>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[J")
}

/// Clear the whole screen and home the cursor.
#[inline]
pub fn clear_screen<W: Write + ?Sized>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[2J\x1b[H")
}

/// Erase `rows` lines above the cursor (and the cursor line), leaving the
/// cursor at column zero of the topmost erased row.
pub fn erase_rows_above<W: Write + ?Sized>(w: &mut W, rows: u16) -> io::Result<()> {
    cursor_up(w, rows)?;
    carriage_return(w)?;
    erase_down(w)
}

// =============================================================================
// Colors
// =============================================================================

/// Reset all attributes and colors.
#[inline]
pub fn reset<W: Write + ?Sized>(w: &mut W) -> io::Result<()> {
    w.write_all(SGR_RESET.as_bytes())
}

/// Set foreground color.
#[inline]
pub fn fg<W: Write + ?Sized>(w: &mut W, color: Rgba) -> io::Result<()> {
    if color.is_terminal_default() || color.is_transparent() {
        write!(w, "\x1b[39m")
    } else if color.is_ansi() {
        let index = color.ansi_index();
        if index < 8 {
            // Standard colors: 30-37
            write!(w, "\x1b[{}m", 30 + index)
        } else if index < 16 {
            // Bright colors: 90-97
            write!(w, "\x1b[{}m", 90 + index - 8)
        } else {
            write!(w, "\x1b[38;5;{}m", index)
        }
    } else {
        write!(w, "\x1b[38;2;{};{};{}m", color.r, color.g, color.b)
    }
}

/// Set background color.
#[inline]
pub fn bg<W: Write + ?Sized>(w: &mut W, color: Rgba) -> io::Result<()> {
    if color.is_terminal_default() || color.is_transparent() {
        write!(w, "\x1b[49m")
    } else if color.is_ansi() {
        let index = color.ansi_index();
        if index < 8 {
            // Standard colors: 40-47
            write!(w, "\x1b[{}m", 40 + index)
        } else if index < 16 {
            // Bright colors: 100-107
            write!(w, "\x1b[{}m", 100 + index - 8)
        } else {
            write!(w, "\x1b[48;5;{}m", index)
        }
    } else {
        write!(w, "\x1b[48;2;{};{};{}m", color.r, color.g, color.b)
    }
}

// =============================================================================
// Text Attributes
// =============================================================================

/// Set text attributes from bitflags, in a single SGR sequence.
pub fn attrs<W: Write + ?Sized>(w: &mut W, attr: Attr) -> io::Result<()> {
    if attr.is_empty() {
        return Ok(());
    }

    const CODES: [(Attr, u8); 6] = [
        (Attr::BOLD, 1),
        (Attr::DIM, 2),
        (Attr::ITALIC, 3),
        (Attr::UNDERLINE, 4),
        (Attr::INVERSE, 7),
        (Attr::STRIKETHROUGH, 9),
    ];

    w.write_all(CSI.as_bytes())?;
    let mut first = true;
    for (flag, code) in CODES {
        if attr.contains(flag) {
            if !first {
                w.write_all(b";")?;
            }
            write!(w, "{}", code)?;
            first = false;
        }
    }
    w.write_all(b"m")
}

// =============================================================================
// Tests
// =============================================================================
