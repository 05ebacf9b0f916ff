//! Differential renderer for inline output.
//!
//! Frames are drawn in the normal screen buffer starting at the line where
//! the app was mounted (the frame origin). Between frames the cursor rests at
//! column zero of the line just below the frame, so every update can be
//! expressed with relative cursor movement.
//!
//! # Algorithm
//!
//! 1. No previous frame, or the width changed: erase what is on screen and
//!    write the frame row by row.
//! 2. Otherwise compare cell by cell and write only changed cells, moving the
//!    cursor relatively between them. New rows are reached with `\r\n` so the
//!    terminal scrolls; rows that disappeared are erased.
//! 3. Non-empty updates are wrapped in synchronized output markers. An
//!    unchanged frame produces no bytes at all.

use std::io::{self, Write};

use crate::types::{Cell, ColorMode};

use super::ansi;
use super::buffer::FrameBuffer;
use super::output::{OutputBuffer, StatefulCellRenderer};

/// Bytes that turn `previous` (on screen, cursor just below it) into `next`,
/// leaving the cursor just below `next`.
pub fn diff(previous: Option<&FrameBuffer>, next: &FrameBuffer, mode: ColorMode) -> Vec<u8> {
    let mut out = OutputBuffer::new();
    // Writing into memory cannot fail.
    let _ = match previous {
        Some(prev) if prev.width() == next.width() => write_changes(&mut out, prev, next, mode),
        _ => write_full(&mut out, previous.map_or(0, FrameBuffer::height), next, mode),
    };
    wrap_sync(out)
}

fn wrap_sync(mut body: OutputBuffer) -> Vec<u8> {
    if body.is_empty() {
        return Vec::new();
    }
    let mut framed = Vec::with_capacity(body.len() + 16);
    framed.extend_from_slice(ansi::BEGIN_SYNC.as_bytes());
    framed.extend_from_slice(&body.take());
    framed.extend_from_slice(ansi::END_SYNC.as_bytes());
    framed
}

/// Erase `on_screen` rows above the cursor and write `next` in full.
fn write_full(
    out: &mut OutputBuffer,
    on_screen: u16,
    next: &FrameBuffer,
    mode: ColorMode,
) -> io::Result<()> {
    if on_screen > 0 {
        ansi::erase_rows_above(out, on_screen)?;
    }
    let mut cells = StatefulCellRenderer::new(mode);
    for y in 0..next.height() {
        cells.render_row(out, next.row(y))?;
        cells.finish(out)?;
        ansi::newline(out)?;
    }
    Ok(())
}

fn write_changes(
    out: &mut OutputBuffer,
    prev: &FrameBuffer,
    next: &FrameBuffer,
    mode: ColorMode,
) -> io::Result<()> {
    let mut writer = CursorWriter::new(out, mode, next.width(), prev.height());

    for y in 0..next.height() {
        let fresh_row = y >= prev.height();
        let row = next.row(y);
        let mut written_to: Option<u16> = None;

        for x in 0..next.width() {
            let cell = &row[x as usize];
            let changed = if fresh_row {
                !cell.is_blank()
            } else {
                prev.get(x, y) != Some(cell)
            };
            if !changed {
                continue;
            }

            if cell.glyph.is_continuation() {
                // The lead half must be rewritten for the pair to change.
                if x > 0 && written_to.is_none_or(|end| end < x) {
                    let lead = x - 1;
                    writer.put(lead, y, &row[lead as usize], true)?;
                    written_to = Some(x);
                }
                continue;
            }

            let wide = row
                .get(x as usize + 1)
                .is_some_and(|next_cell| next_cell.glyph.is_continuation());
            writer.put(x, y, cell, wide)?;
            written_to = Some(if wide { x + 1 } else { x });
        }
    }

    if next.height() < prev.height() {
        writer.move_to(0, next.height())?;
        ansi::erase_down(writer.out)?;
    }
    writer.move_to(0, next.height())?;
    writer.cells.finish(writer.out)
}

/// Tracks the cursor relative to the frame origin.
struct CursorWriter<'a> {
    out: &'a mut OutputBuffer,
    cells: StatefulCellRenderer,
    width: u16,
    row: u16,
    /// `None` after writing the last column (pending wrap state).
    col: Option<u16>,
}

impl<'a> CursorWriter<'a> {
    fn new(out: &'a mut OutputBuffer, mode: ColorMode, width: u16, row: u16) -> Self {
        Self {
            out,
            cells: StatefulCellRenderer::new(mode),
            width,
            row,
            col: Some(0),
        }
    }

    fn move_to(&mut self, x: u16, y: u16) -> io::Result<()> {
        if y < self.row {
            ansi::cursor_up(self.out, self.row - y)?;
            self.row = y;
        } else if y > self.row {
            // Newlines scroll at the bottom; keep colors off while they do.
            self.cells.finish(self.out)?;
            for _ in self.row..y {
                ansi::newline(self.out)?;
            }
            self.row = y;
            self.col = Some(0);
        }

        match self.col {
            Some(col) if col == x => {}
            Some(col) if x > col => ansi::cursor_forward(self.out, x - col)?,
            Some(col) if x == 0 || col - x > x => {
                ansi::carriage_return(self.out)?;
                ansi::cursor_forward(self.out, x)?;
            }
            Some(col) => ansi::cursor_backward(self.out, col - x)?,
            None => {
                ansi::carriage_return(self.out)?;
                ansi::cursor_forward(self.out, x)?;
            }
        }
        self.col = Some(x);
        Ok(())
    }

    fn put(&mut self, x: u16, y: u16, cell: &Cell, wide: bool) -> io::Result<()> {
        self.move_to(x, y)?;
        self.cells.render_cell(self.out, cell)?;
        let end = x + if wide { 2 } else { 1 };
        self.col = if end >= self.width { None } else { Some(end) };
        Ok(())
    }
}

// =============================================================================
// DiffRenderer
// =============================================================================

/// Owns the previous frame and writes minimal updates to a terminal.
///
/// Relative cursor movement only works while the whole frame is on screen.
/// A frame as tall as the terminal (or taller) scrolls its top rows away, so
/// such frames are drawn by clearing the screen and writing them in full.
#[derive(Debug)]
pub struct DiffRenderer {
    mode: ColorMode,
    previous: Option<FrameBuffer>,
    /// Rows of the live frame currently on screen above the cursor.
    on_screen: u16,
    /// Terminal height in rows.
    viewport_height: u16,
}

impl DiffRenderer {
    pub fn new(mode: ColorMode) -> Self {
        Self {
            mode,
            previous: None,
            on_screen: 0,
            viewport_height: u16::MAX,
        }
    }

    /// Set the terminal height the frames are drawn into.
    pub fn set_viewport_height(&mut self, rows: u16) {
        self.viewport_height = rows.max(1);
    }

    /// Render a frame, writing only what changed. Returns bytes written.
    pub fn render(&mut self, next: FrameBuffer, w: &mut dyn Write) -> io::Result<usize> {
        let bytes = match &self.previous {
            Some(prev) if *prev == next => Vec::new(),
            Some(prev) if !self.overflows(&next) => diff(Some(prev), &next, self.mode),
            _ => self.full_bytes(&next),
        };
        self.commit(next, &bytes, w)
    }

    /// Force a full redraw (no diffing).
    pub fn render_full(&mut self, next: FrameBuffer, w: &mut dyn Write) -> io::Result<usize> {
        let bytes = self.full_bytes(&next);
        self.commit(next, &bytes, w)
    }

    /// The previous or the next frame does not fit above the cursor.
    fn overflows(&self, next: &FrameBuffer) -> bool {
        self.on_screen >= self.viewport_height || next.height() >= self.viewport_height
    }

    fn full_bytes(&self, next: &FrameBuffer) -> Vec<u8> {
        let mut out = OutputBuffer::new();
        let _ = if self.overflows(next) {
            ansi::clear_screen(&mut out).and_then(|()| write_full(&mut out, 0, next, self.mode))
        } else {
            write_full(&mut out, self.on_screen, next, self.mode)
        };
        wrap_sync(out)
    }

    fn commit(&mut self, next: FrameBuffer, bytes: &[u8], w: &mut dyn Write) -> io::Result<usize> {
        if !bytes.is_empty() {
            w.write_all(bytes)?;
            w.flush()?;
        }
        self.on_screen = next.height();
        self.previous = Some(next);
        Ok(bytes.len())
    }

    /// Erase the live frame from the screen. The next render is a full one.
    pub fn erase(&mut self, w: &mut dyn Write) -> io::Result<()> {
        if self.on_screen > 0 {
            let mut out = OutputBuffer::new();
            if self.on_screen >= self.viewport_height {
                ansi::clear_screen(&mut out)?;
            } else {
                ansi::erase_rows_above(&mut out, self.on_screen)?;
            }
            out.flush_to(w)?;
        }
        self.on_screen = 0;
        self.previous = None;
        Ok(())
    }

    /// Forget the previous frame. The next render redraws in full over the
    /// rows still on screen.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    /// The screen was cleared externally: nothing of ours is on it.
    pub fn forget_screen(&mut self) {
        self.previous = None;
        self.on_screen = 0;
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// Height of the live frame on screen.
    pub fn height(&self) -> u16 {
        self.on_screen
    }

    pub fn previous(&self) -> Option<&FrameBuffer> {
        self.previous.as_ref()
    }
}

// =============================================================================
// Tests
// =============================================================================
