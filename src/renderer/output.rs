//! Output buffering and stateful cell rendering.
//!
//! These components keep terminal output small:
//! - Batching a frame into a single write
//! - Tracking SGR state to avoid redundant escape codes
//! - Downsampling colors to what the terminal supports

use std::io::{self, Write};

use crate::types::{Attr, Cell, ColorMode, Glyph, Rgba};

use super::ansi;

// =============================================================================
// OutputBuffer
// =============================================================================

/// A buffer that accumulates output for batch writing.
///
/// A frame is assembled here and handed to the writer in one `write_all`.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    data: Vec<u8>,
}

impl OutputBuffer {
    /// Create a new output buffer with default capacity.
    pub fn new() -> Self {
        Self::with_capacity(16384) // 16KB default
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Clear the buffer without deallocating.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.data.extend_from_slice(s.as_bytes());
    }

    #[inline]
    pub fn write_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        let s = c.encode_utf8(&mut buf);
        self.data.extend_from_slice(s.as_bytes());
    }

    /// Write the buffered bytes to `writer` and clear. Returns the byte count.
    pub fn flush_to<W: Write + ?Sized>(&mut self, writer: &mut W) -> io::Result<usize> {
        if self.data.is_empty() {
            return Ok(0);
        }
        let written = self.data.len();
        writer.write_all(&self.data)?;
        writer.flush()?;
        self.data.clear();
        Ok(written)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Take the accumulated bytes, leaving the buffer empty.
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.data)
    }

    /// Get the accumulated data as a string (lossy).
    pub fn as_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }
}

impl Write for OutputBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(()) // Buffering only; the real flush is flush_to
    }
}

// =============================================================================
// StatefulCellRenderer
// =============================================================================

/// Renders cells while tracking terminal SGR state to minimize output.
///
/// It assumes the terminal starts with default attributes and colors, and
/// [`finish`](Self::finish) returns it there, so consecutive frames can share
/// that assumption.
///
/// Within a cell the order is attributes, background, foreground, glyph:
/// the foreground code always sits right before the text it colors.
#[derive(Debug)]
pub struct StatefulCellRenderer {
    mode: ColorMode,
    fg: Rgba,
    bg: Rgba,
    attrs: Attr,
}

impl StatefulCellRenderer {
    pub fn new(mode: ColorMode) -> Self {
        Self {
            mode,
            fg: Rgba::TERMINAL_DEFAULT,
            bg: Rgba::TERMINAL_DEFAULT,
            attrs: Attr::NONE,
        }
    }

    #[inline]
    pub fn color_mode(&self) -> ColorMode {
        self.mode
    }

    /// Forget tracked state; the terminal is assumed to be at defaults.
    pub fn reset(&mut self) {
        self.fg = Rgba::TERMINAL_DEFAULT;
        self.bg = Rgba::TERMINAL_DEFAULT;
        self.attrs = Attr::NONE;
    }

    /// True when the terminal is at default SGR state.
    #[inline]
    pub fn is_default(&self) -> bool {
        self.attrs.is_empty() && self.fg.is_terminal_default() && self.bg.is_terminal_default()
    }

    /// Emit whatever SGR codes are needed to style `cell`.
    pub fn style<W: Write + ?Sized>(&mut self, out: &mut W, cell: &Cell) -> io::Result<()> {
        let fg = normalize(cell.fg.downsample(self.mode));
        let bg = normalize(cell.bg.downsample(self.mode));

        if cell.attrs != self.attrs {
            if cell.attrs.contains(self.attrs) {
                // Only additions: no reset needed.
                ansi::attrs(out, cell.attrs - self.attrs)?;
            } else {
                ansi::reset(out)?;
                ansi::attrs(out, cell.attrs)?;
                self.fg = Rgba::TERMINAL_DEFAULT;
                self.bg = Rgba::TERMINAL_DEFAULT;
            }
            self.attrs = cell.attrs;
        }

        if bg != self.bg {
            ansi::bg(out, bg)?;
            self.bg = bg;
        }
        if fg != self.fg {
            ansi::fg(out, fg)?;
            self.fg = fg;
        }
        Ok(())
    }

    /// Style and write one cell. Continuation cells write nothing.
    pub fn render_cell(&mut self, out: &mut OutputBuffer, cell: &Cell) -> io::Result<()> {
        if cell.glyph.is_continuation() {
            return Ok(());
        }
        self.style(out, cell)?;
        match &cell.glyph {
            Glyph::Char(c) => out.write_char(*c),
            Glyph::Cluster(s) => out.write_str(s),
            Glyph::Continuation => {}
        }
        Ok(())
    }

    /// Write a row of cells left to right, stopping after the last non-blank
    /// cell.
    pub fn render_row(&mut self, out: &mut OutputBuffer, cells: &[Cell]) -> io::Result<()> {
        let end = cells
            .iter()
            .rposition(|cell| !cell.is_blank())
            .map_or(0, |i| i + 1);
        for cell in &cells[..end] {
            self.render_cell(out, cell)?;
        }
        Ok(())
    }

    /// Return the terminal to default SGR state if needed.
    pub fn finish<W: Write + ?Sized>(&mut self, out: &mut W) -> io::Result<()> {
        if !self.is_default() {
            ansi::reset(out)?;
            self.reset();
        }
        Ok(())
    }
}

impl Default for StatefulCellRenderer {
    fn default() -> Self {
        Self::new(ColorMode::default())
    }
}

/// Transparent never reaches the terminal.
#[inline]
fn normalize(color: Rgba) -> Rgba {
    if color.is_transparent() {
        Rgba::TERMINAL_DEFAULT
    } else {
        color
    }
}

// =============================================================================
// Tests
// =============================================================================
