//! FrameBuffer and drawing primitives.
//!
//! The FrameBuffer is a 2D grid of Cells that represents one frame of output.
//! All painting goes through it, and the diff compares two of them.
//!
//! # Design Decisions
//!
//! - **Flat storage**: `Vec<Cell>` with row-major indexing.
//! - **Clipping**: every drawing call takes a clip rectangle.
//! - **Wide characters**: a two-cell glyph is followed by a `Continuation`
//!   cell. Overwriting either half blanks the other so a frame never holds a
//!   split glyph.

use unicode_segmentation::UnicodeSegmentation;

use crate::layout::grapheme_width;
use crate::types::{Attr, BorderChars, Cell, Glyph, Rect, Rgba};

// =============================================================================
// FrameBuffer
// =============================================================================

/// A 2D buffer of terminal cells.
///
/// Uses flat storage with row-major indexing: `index = y * width + x`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// Create a new buffer filled with blank cells.
    pub fn new(width: u16, height: u16) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::blank(); size],
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// The whole buffer as a rectangle.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    pub fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    /// Cells of row `y` (empty when out of range).
    pub fn row(&self, y: u16) -> &[Cell] {
        if y >= self.height {
            return &[];
        }
        let start = self.index(0, y);
        &self.cells[start..start + self.width as usize]
    }

    /// Plain text of row `y` with trailing spaces removed.
    pub fn row_text(&self, y: u16) -> String {
        let mut out = String::new();
        for cell in self.row(y) {
            cell.glyph.push_to(&mut out);
        }
        out.truncate(out.trim_end().len());
        out
    }

    /// Plain text of the whole buffer, rows joined by `\n`.
    pub fn to_plain_text(&self) -> String {
        (0..self.height)
            .map(|y| self.row_text(y))
            .collect::<Vec<_>>()
            .join("\n")
    }

    // =========================================================================
    // Drawing Primitives
    // =========================================================================

    /// Blank the partner half of any wide glyph touching (x, y).
    fn break_wide(&mut self, x: u16, y: u16) {
        let idx = self.index(x, y);
        if self.cells[idx].glyph.is_continuation() && x > 0 {
            let left = self.index(x - 1, y);
            self.cells[left].glyph = Glyph::Char(' ');
        }
        if x + 1 < self.width {
            let right = self.index(x + 1, y);
            if self.cells[right].glyph.is_continuation() {
                self.cells[right].glyph = Glyph::Char(' ');
            }
        }
    }

    /// Put one glyph of `width` cells at (x, y). Returns false when clipped.
    fn put_glyph(
        &mut self,
        x: u16,
        y: u16,
        glyph: Glyph,
        width: u16,
        style: &CellStyle,
        clip: &Rect,
    ) -> bool {
        if !self.in_bounds(x, y) || !clip.contains(x, y) {
            return false;
        }
        let wide = width == 2;
        let fits = !wide || (self.in_bounds(x + 1, y) && clip.contains(x + 1, y));

        self.break_wide(x, y);
        if wide && fits {
            self.break_wide(x + 1, y);
        }

        let idx = self.index(x, y);
        let cell = &mut self.cells[idx];
        cell.glyph = if fits { glyph } else { Glyph::Char(' ') };
        style.apply(cell);

        if wide && fits {
            let next = self.index(x + 1, y);
            let cell = &mut self.cells[next];
            cell.glyph = Glyph::Continuation;
            style.apply(cell);
        }
        true
    }

    /// Fill `rect` (clipped) with blank cells on `bg`.
    pub fn fill_rect(&mut self, rect: Rect, bg: Rgba, clip: &Rect) {
        let Some(area) = rect.intersect(clip).and_then(|r| r.intersect(&self.bounds())) else {
            return;
        };
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                self.break_wide(x, y);
                let idx = self.index(x, y);
                let cell = &mut self.cells[idx];
                cell.glyph = Glyph::Char(' ');
                cell.bg = bg;
                cell.attrs = Attr::NONE;
            }
        }
    }

    /// Draw text starting at (x, y), grapheme by grapheme.
    ///
    /// Returns the number of columns advanced.
    pub fn draw_text(&mut self, x: u16, y: u16, text: &str, style: &CellStyle, clip: &Rect) -> u16 {
        let mut col = x;
        for grapheme in text.graphemes(true) {
            let width = grapheme_width(grapheme) as u16;
            if width == 0 {
                continue;
            }
            if col >= self.width {
                break;
            }
            self.put_glyph(col, y, Glyph::from_grapheme(grapheme), width, style, clip);
            col = col.saturating_add(width);
        }
        col - x
    }

    /// Draw a one-cell border along the edges of `rect`.
    pub fn draw_border(&mut self, rect: Rect, chars: &BorderChars, style: &CellStyle, clip: &Rect) {
        if rect.width < 2 || rect.height < 2 {
            return;
        }
        let x2 = rect.right() - 1;
        let y2 = rect.bottom() - 1;
        let put = |buf: &mut Self, x: u16, y: u16, c: char| {
            buf.put_glyph(x, y, Glyph::Char(c), 1, style, clip);
        };

        put(self, rect.x, rect.y, chars.top_left);
        put(self, x2, rect.y, chars.top_right);
        put(self, x2, y2, chars.bottom_right);
        put(self, rect.x, y2, chars.bottom_left);

        for col in (rect.x + 1)..x2 {
            put(self, col, rect.y, chars.horizontal);
            put(self, col, y2, chars.horizontal);
        }
        for row in (rect.y + 1)..y2 {
            put(self, rect.x, row, chars.vertical);
            put(self, x2, row, chars.vertical);
        }
    }
}

// =============================================================================
// CellStyle
// =============================================================================

/// Style applied to drawn glyphs. A `None` background keeps whatever the
/// cell already has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellStyle {
    pub fg: Rgba,
    pub bg: Option<Rgba>,
    pub attrs: Attr,
}

impl CellStyle {
    #[inline]
    fn apply(&self, cell: &mut Cell) {
        cell.fg = self.fg;
        if let Some(bg) = self.bg {
            if !bg.is_transparent() {
                cell.bg = bg;
            }
        }
        cell.attrs = self.attrs;
    }
}

// =============================================================================
// Tests
// =============================================================================
