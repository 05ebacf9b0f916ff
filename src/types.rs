//! Core types for ember-tui.
//!
//! These are the values that flow between the node model, the layout engine
//! and the renderer: colors, cell attributes, glyphs, rectangles and the
//! flexbox enums.

use std::ops::Add;
use std::rc::Rc;

// =============================================================================
// Color
// =============================================================================

/// Resolved color with 8-bit channels.
///
/// Two marker encodings live in the red channel:
/// - `r == -1`: terminal default (let the terminal pick)
/// - `r == -2`: ANSI palette color, index stored in `g`
///
/// Alpha is only meaningful for backgrounds: a fully transparent background
/// leaves whatever was painted underneath.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: i16,
    pub g: i16,
    pub b: i16,
    pub a: i16,
}

impl Default for Rgba {
    fn default() -> Self {
        Self::TERMINAL_DEFAULT
    }
}

/// xterm's default values for the 16 base palette entries.
const ANSI16_RGB: [(u8, u8, u8); 16] = [
    (0, 0, 0),
    (205, 0, 0),
    (0, 205, 0),
    (205, 205, 0),
    (0, 0, 238),
    (205, 0, 205),
    (0, 205, 205),
    (229, 229, 229),
    (127, 127, 127),
    (255, 0, 0),
    (0, 255, 0),
    (255, 255, 0),
    (92, 92, 255),
    (255, 0, 255),
    (0, 255, 255),
    (255, 255, 255),
];

const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

const NAMED_COLORS: [&str; 8] = [
    "black", "red", "green", "yellow", "blue", "magenta", "cyan", "white",
];

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as i16,
            g: g as i16,
            b: b as i16,
            a: a as i16,
        }
    }

    /// Opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const TERMINAL_DEFAULT: Self = Self {
        r: -1,
        g: -1,
        b: -1,
        a: 255,
    };

    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// ANSI palette color (0-255).
    pub const fn ansi(index: u8) -> Self {
        Self {
            r: -2,
            g: index as i16,
            b: 0,
            a: 255,
        }
    }

    #[inline]
    pub const fn is_terminal_default(&self) -> bool {
        self.r == -1
    }

    #[inline]
    pub const fn is_ansi(&self) -> bool {
        self.r == -2
    }

    /// Palette index (only valid if `is_ansi()`).
    #[inline]
    pub const fn ansi_index(&self) -> u8 {
        self.g as u8
    }

    #[inline]
    pub const fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Parse a hex color: `#rgb`, `#rrggbb` or `#rrggbbaa` (the `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');

        fn nibble(c: u8) -> Option<u8> {
            (c as char).to_digit(16).map(|d| d as u8)
        }

        fn byte(s: &[u8], i: usize) -> Option<u8> {
            Some((nibble(s[i])? << 4) | nibble(s[i + 1])?)
        }

        let bytes = hex.as_bytes();
        match bytes.len() {
            3 => {
                let r = nibble(bytes[0])?;
                let g = nibble(bytes[1])?;
                let b = nibble(bytes[2])?;
                Some(Self::rgb(r * 17, g * 17, b * 17))
            }
            6 => Some(Self::rgb(byte(bytes, 0)?, byte(bytes, 2)?, byte(bytes, 4)?)),
            8 => Some(Self::new(
                byte(bytes, 0)?,
                byte(bytes, 2)?,
                byte(bytes, 4)?,
                byte(bytes, 6)?,
            )),
            _ => None,
        }
    }

    /// Parse a color string.
    ///
    /// Accepted forms:
    /// - named base colors (`"red"`, `"brightBlue"`, `"bright-blue"`, `"gray"`)
    /// - hex (`"#ff8800"`, `"#f80"`)
    /// - palette index (`"ansi:208"`, `"ansi256(208)"`)
    /// - functional rgb (`"rgb(255, 136, 0)"`)
    /// - keywords `"default"` and `"transparent"`
    ///
    /// ```
    /// use ember_tui::types::Rgba;
    ///
    /// assert_eq!(Rgba::parse("red"), Some(Rgba::ansi(1)));
    /// assert_eq!(Rgba::parse("#ff0000"), Some(Rgba::rgb(255, 0, 0)));
    /// assert_eq!(Rgba::parse("ansi:208"), Some(Rgba::ansi(208)));
    /// assert!(Rgba::parse("no-such-color").is_none());
    /// ```
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        let lower = input.to_ascii_lowercase();
        match lower.as_str() {
            "default" | "inherit" | "reset" => return Some(Self::TERMINAL_DEFAULT),
            "transparent" => return Some(Self::TRANSPARENT),
            "gray" | "grey" => return Some(Self::ansi(8)),
            _ => {}
        }

        if let Some(index) = Self::named_index(&lower) {
            return Some(Self::ansi(index));
        }

        if let Some(rest) = lower.strip_prefix("ansi:") {
            return rest.trim().parse::<u8>().ok().map(Self::ansi);
        }

        if let Some(rest) = lower
            .strip_prefix("ansi256(")
            .and_then(|r| r.strip_suffix(')'))
        {
            return rest.trim().parse::<u8>().ok().map(Self::ansi);
        }

        if let Some(rest) = lower.strip_prefix("rgb(").and_then(|r| r.strip_suffix(')')) {
            let mut parts = rest.split(',').map(|p| p.trim().parse::<u8>());
            let r = parts.next()?.ok()?;
            let g = parts.next()?.ok()?;
            let b = parts.next()?.ok()?;
            if parts.next().is_some() {
                return None;
            }
            return Some(Self::rgb(r, g, b));
        }

        if input.starts_with('#') || input.chars().all(|c| c.is_ascii_hexdigit()) {
            return Self::from_hex(input);
        }

        None
    }

    /// Palette index for a named color: `red` is 1, `brightred` / `redbright` /
    /// `bright-red` / `bright_red` are 9.
    fn named_index(lower: &str) -> Option<u8> {
        let compact: String = lower.chars().filter(|c| *c != '-' && *c != '_').collect();
        let (name, bright) = if let Some(n) = compact.strip_prefix("bright") {
            (n, true)
        } else if let Some(n) = compact.strip_suffix("bright") {
            (n, true)
        } else {
            (compact.as_str(), false)
        };

        let base = NAMED_COLORS.iter().position(|c| *c == name)? as u8;
        Some(if bright { base + 8 } else { base })
    }

    /// RGB channels of this color, expanding palette entries.
    ///
    /// Returns `None` for the terminal default.
    pub fn to_rgb(&self) -> Option<(u8, u8, u8)> {
        if self.is_terminal_default() {
            return None;
        }
        if !self.is_ansi() {
            return Some((self.r as u8, self.g as u8, self.b as u8));
        }
        let index = self.ansi_index();
        Some(match index {
            0..=15 => ANSI16_RGB[index as usize],
            16..=231 => {
                let i = index - 16;
                (
                    CUBE_LEVELS[(i / 36) as usize],
                    CUBE_LEVELS[((i / 6) % 6) as usize],
                    CUBE_LEVELS[(i % 6) as usize],
                )
            }
            _ => {
                let level = 8 + (index - 232) * 10;
                (level, level, level)
            }
        })
    }

    /// Downsample this color for a terminal with the given color support.
    pub fn downsample(self, mode: ColorMode) -> Self {
        if self.is_terminal_default() {
            return self;
        }
        match mode {
            ColorMode::TrueColor => self,
            ColorMode::NoColor => Self::TERMINAL_DEFAULT,
            ColorMode::Ansi256 => {
                if self.is_ansi() {
                    return self;
                }
                Self::ansi(rgb_to_ansi256(self.r as u8, self.g as u8, self.b as u8))
            }
            ColorMode::Ansi16 => {
                if self.is_ansi() && self.ansi_index() < 16 {
                    return self;
                }
                match self.to_rgb() {
                    Some((r, g, b)) => Self::ansi(rgb_to_ansi16(r, g, b)),
                    None => self,
                }
            }
        }
    }
}

fn rgb_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    if r == g && g == b {
        if r < 8 {
            return 16;
        }
        if r > 248 {
            return 231;
        }
        return 232 + ((r as u16 - 8) * 24 / 247) as u8;
    }
    let q = |v: u8| ((v as u16 * 5 + 127) / 255) as u8;
    16 + 36 * q(r) + 6 * q(g) + q(b)
}

fn rgb_to_ansi16(r: u8, g: u8, b: u8) -> u8 {
    let distance = |&(pr, pg, pb): &(u8, u8, u8)| {
        let dr = pr as i32 - r as i32;
        let dg = pg as i32 - g as i32;
        let db = pb as i32 - b as i32;
        dr * dr + dg * dg + db * db
    };
    ANSI16_RGB
        .iter()
        .enumerate()
        .min_by_key(|(_, rgb)| distance(rgb))
        .map(|(i, _)| i as u8)
        .unwrap_or(7)
}

/// How many colors the terminal can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    TrueColor,
    Ansi256,
    Ansi16,
    /// Colors are dropped entirely; attributes still apply.
    NoColor,
}

// =============================================================================
// Cell Attributes (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Text attributes as a bitfield.
    ///
    /// Combine with bitwise OR: `Attr::BOLD | Attr::ITALIC`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Attr: u8 {
        const NONE = 0;
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
        const INVERSE = 1 << 4;
        const STRIKETHROUGH = 1 << 5;
    }
}

// =============================================================================
// Glyph / Cell
// =============================================================================

/// What occupies a cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Glyph {
    /// A single code point.
    Char(char),
    /// A grapheme cluster that is more than one code point (emoji sequences,
    /// combining marks).
    Cluster(Rc<str>),
    /// Right half of a wide glyph drawn in the cell to the left.
    Continuation,
}

impl Glyph {
    /// Build a glyph from a grapheme cluster.
    pub fn from_grapheme(grapheme: &str) -> Self {
        let mut chars = grapheme.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::Char(c),
            (None, _) => Self::Char(' '),
            _ => Self::Cluster(Rc::from(grapheme)),
        }
    }

    #[inline]
    pub fn is_continuation(&self) -> bool {
        matches!(self, Self::Continuation)
    }

    /// Push the glyph's text onto `out`. Continuations write nothing.
    pub fn push_to(&self, out: &mut String) {
        match self {
            Self::Char(c) => out.push(*c),
            Self::Cluster(s) => out.push_str(s),
            Self::Continuation => {}
        }
    }
}

impl Default for Glyph {
    fn default() -> Self {
        Self::Char(' ')
    }
}

/// A single terminal cell: glyph plus resolved style.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    pub glyph: Glyph,
    pub fg: Rgba,
    pub bg: Rgba,
    pub attrs: Attr,
}

impl Cell {
    /// A blank cell (space, terminal default colors, no attributes).
    pub fn blank() -> Self {
        Self::default()
    }

    /// True for a space with default colors and no attributes.
    pub fn is_blank(&self) -> bool {
        self.glyph == Glyph::Char(' ')
            && self.fg.is_terminal_default()
            && self.bg.is_terminal_default()
            && self.attrs.is_empty()
    }
}

// =============================================================================
// Rect / Edges
// =============================================================================

/// An axis-aligned rectangle in cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    #[inline]
    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Intersection of two rects, `None` when they don't overlap.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());

        if x2 > x1 && y2 > y1 {
            Some(Rect::new(x1, y1, x2 - x1, y2 - y1))
        } else {
            None
        }
    }

    /// Shrink by the given edges, clamping at zero size.
    pub fn inset(&self, edges: Edges) -> Rect {
        let width = self.width.saturating_sub(edges.horizontal());
        let height = self.height.saturating_sub(edges.vertical());
        Rect::new(
            self.x.saturating_add(edges.left.min(self.width)),
            self.y.saturating_add(edges.top.min(self.height)),
            width,
            height,
        )
    }
}

/// Per-side sizes used for padding, margin and borders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Edges {
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
    pub left: u16,
}

impl Edges {
    pub const ZERO: Self = Self::all(0);

    pub const fn all(n: u16) -> Self {
        Self {
            top: n,
            right: n,
            bottom: n,
            left: n,
        }
    }

    /// Horizontal (left/right) and vertical (top/bottom) values.
    pub const fn symmetric(horizontal: u16, vertical: u16) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    #[inline]
    pub fn horizontal(&self) -> u16 {
        self.left.saturating_add(self.right)
    }

    #[inline]
    pub fn vertical(&self) -> u16 {
        self.top.saturating_add(self.bottom)
    }

    /// Sum of both edges along an axis.
    #[inline]
    pub fn along(&self, row: bool) -> u16 {
        if row { self.horizontal() } else { self.vertical() }
    }
}

/// Per-side saturating sum.
impl Add for Edges {
    type Output = Edges;

    fn add(self, other: Edges) -> Edges {
        Edges {
            top: self.top.saturating_add(other.top),
            right: self.right.saturating_add(other.right),
            bottom: self.bottom.saturating_add(other.bottom),
            left: self.left.saturating_add(other.left),
        }
    }
}

impl From<u16> for Edges {
    fn from(n: u16) -> Self {
        Self::all(n)
    }
}

// =============================================================================
// Dimension
// =============================================================================

/// A size that is content-determined, absolute, or relative to the parent.
///
/// ```
/// use ember_tui::types::Dimension;
///
/// let width = Dimension::Cells(50);
/// let height = Dimension::Percent(100.0);
/// let auto = Dimension::Auto;
/// # let _ = (width, height, auto);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Dimension {
    #[default]
    Auto,
    Cells(u16),
    /// Percentage of the parent's content box (0-100).
    Percent(f32),
}

impl Dimension {
    /// Resolve against a parent size. Percentages need a known parent size;
    /// `None` means the parent size is itself content-determined.
    pub fn resolve(&self, parent: Option<u16>) -> Option<u16> {
        match *self {
            Self::Auto => None,
            Self::Cells(n) => Some(n),
            Self::Percent(p) => {
                let parent = parent?;
                if !p.is_finite() || p <= 0.0 {
                    return Some(0);
                }
                Some(((parent as f32 * p / 100.0).floor() as u32).min(u16::MAX as u32) as u16)
            }
        }
    }
}

impl From<u16> for Dimension {
    fn from(value: u16) -> Self {
        Self::Cells(value)
    }
}

// =============================================================================
// Border Styles
// =============================================================================

/// Border glyph set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum BorderStyle {
    #[default]
    None,
    /// ─ │ ┌ ┐ └ ┘
    Single,
    /// ═ ║ ╔ ╗ ╚ ╝
    Double,
    /// ─ │ ╭ ╮ ╰ ╯
    Round,
    /// ━ ┃ ┏ ┓ ┗ ┛
    Bold,
    /// - | + + + +
    Classic,
}

/// The six glyphs a border is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderChars {
    pub horizontal: char,
    pub vertical: char,
    pub top_left: char,
    pub top_right: char,
    pub bottom_right: char,
    pub bottom_left: char,
}

impl BorderStyle {
    #[inline]
    pub fn is_set(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Glyphs for this style. With `unicode == false` every style falls back
    /// to the ASCII set.
    pub const fn chars(&self, unicode: bool) -> BorderChars {
        let (h, v, tl, tr, br, bl) = if !unicode {
            ('-', '|', '+', '+', '+', '+')
        } else {
            match self {
                Self::None => (' ', ' ', ' ', ' ', ' ', ' '),
                Self::Single => ('─', '│', '┌', '┐', '┘', '└'),
                Self::Double => ('═', '║', '╔', '╗', '╝', '╚'),
                Self::Round => ('─', '│', '╭', '╮', '╯', '╰'),
                Self::Bold => ('━', '┃', '┏', '┓', '┛', '┗'),
                Self::Classic => ('-', '|', '+', '+', '+', '+'),
            }
        };
        BorderChars {
            horizontal: h,
            vertical: v,
            top_left: tl,
            top_right: tr,
            bottom_right: br,
            bottom_left: bl,
        }
    }
}

// =============================================================================
// Flex Enums
// =============================================================================

/// Main axis of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum FlexDirection {
    Row,
    #[default]
    Column,
    RowReverse,
    ColumnReverse,
}

impl FlexDirection {
    #[inline]
    pub const fn is_row(&self) -> bool {
        matches!(self, Self::Row | Self::RowReverse)
    }

    #[inline]
    pub const fn is_reverse(&self) -> bool {
        matches!(self, Self::RowReverse | Self::ColumnReverse)
    }
}

/// Main-axis distribution of free space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum JustifyContent {
    #[default]
    FlexStart,
    Center,
    FlexEnd,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

/// Cross-axis alignment of children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum AlignItems {
    #[default]
    Stretch,
    FlexStart,
    Center,
    FlexEnd,
}

/// Per-child override of the parent's `AlignItems`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum AlignSelf {
    #[default]
    Auto,
    Stretch,
    FlexStart,
    Center,
    FlexEnd,
}

impl AlignSelf {
    /// Effective alignment given the parent's `align_items`.
    pub const fn resolve(&self, parent: AlignItems) -> AlignItems {
        match self {
            Self::Auto => parent,
            Self::Stretch => AlignItems::Stretch,
            Self::FlexStart => AlignItems::FlexStart,
            Self::Center => AlignItems::Center,
            Self::FlexEnd => AlignItems::FlexEnd,
        }
    }
}

/// Positioning scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Position {
    /// In flow; acts as the containing block for absolute descendants.
    #[default]
    Relative,
    /// Out of flow; placed against the nearest positioned ancestor.
    Absolute,
    /// In flow; not a containing block.
    Static,
}

impl Position {
    #[inline]
    pub const fn is_positioned(&self) -> bool {
        !matches!(self, Self::Static)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Display {
    #[default]
    Flex,
    None,
}

/// How text that exceeds its width is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum TextWrap {
    /// Word wrap, breaking inside words only when one doesn't fit a line.
    #[default]
    Wrap,
    /// Cut the end, marking it with an ellipsis.
    Truncate,
    /// Cut the start.
    TruncateStart,
    /// Cut the middle.
    TruncateMiddle,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_colors() {
        assert_eq!(Rgba::parse("red"), Some(Rgba::ansi(1)));
        assert_eq!(Rgba::parse("Red"), Some(Rgba::ansi(1)));
        assert_eq!(Rgba::parse("redBright"), Some(Rgba::ansi(9)));
        assert_eq!(Rgba::parse("bright-blue"), Some(Rgba::ansi(12)));
        assert_eq!(Rgba::parse("gray"), Some(Rgba::ansi(8)));
        assert_eq!(Rgba::parse("white"), Some(Rgba::ansi(7)));
    }

    #[test]
    fn test_parse_hex_and_functional() {
        assert_eq!(Rgba::parse("#ff8800"), Some(Rgba::rgb(255, 136, 0)));
        assert_eq!(Rgba::parse("#f80"), Some(Rgba::rgb(255, 136, 0)));
        assert_eq!(Rgba::parse("rgb(1, 2, 3)"), Some(Rgba::rgb(1, 2, 3)));
        assert_eq!(Rgba::parse("ansi:208"), Some(Rgba::ansi(208)));
        assert_eq!(Rgba::parse("ansi256(17)"), Some(Rgba::ansi(17)));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Rgba::parse("").is_none());
        assert!(Rgba::parse("ultraviolet").is_none());
        assert!(Rgba::parse("#gg0000").is_none());
        assert!(Rgba::parse("ansi:300").is_none());
        assert!(Rgba::parse("rgb(1,2)").is_none());
    }

    #[test]
    fn test_downsample_256() {
        assert_eq!(Rgba::rgb(255, 0, 0).downsample(ColorMode::Ansi256), Rgba::ansi(196));
        assert_eq!(Rgba::rgb(0, 0, 0).downsample(ColorMode::Ansi256), Rgba::ansi(16));
        assert_eq!(Rgba::ansi(3).downsample(ColorMode::Ansi256), Rgba::ansi(3));
    }

    #[test]
    fn test_downsample_16() {
        assert_eq!(Rgba::rgb(250, 0, 0).downsample(ColorMode::Ansi16), Rgba::ansi(9));
        assert_eq!(Rgba::ansi(196).downsample(ColorMode::Ansi16), Rgba::ansi(9));
        assert!(
            Rgba::rgb(1, 2, 3)
                .downsample(ColorMode::NoColor)
                .is_terminal_default()
        );
    }

    #[test]
    fn test_glyph_from_grapheme() {
        assert_eq!(Glyph::from_grapheme("a"), Glyph::Char('a'));
        assert_eq!(Glyph::from_grapheme(""), Glyph::Char(' '));
        assert!(matches!(Glyph::from_grapheme("e\u{301}"), Glyph::Cluster(_)));
    }

    #[test]
    fn test_rect_intersect_and_inset() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert_eq!(a.intersect(&b), Some(Rect::new(5, 5, 5, 5)));
        assert_eq!(a.intersect(&Rect::new(20, 20, 1, 1)), None);
        assert_eq!(a.inset(Edges::all(1)), Rect::new(1, 1, 8, 8));
        assert_eq!(Rect::new(0, 0, 1, 1).inset(Edges::all(2)).width, 0);
    }

    #[test]
    fn test_edges_add_saturates() {
        let sum = Edges::symmetric(2, 1) + Edges::all(1);
        assert_eq!(sum, Edges { top: 2, right: 3, bottom: 2, left: 3 });
        assert_eq!((Edges::all(u16::MAX) + Edges::all(1)).left, u16::MAX);
    }

    #[test]
    fn test_dimension_resolve() {
        assert_eq!(Dimension::Auto.resolve(Some(80)), None);
        assert_eq!(Dimension::Cells(5).resolve(None), Some(5));
        assert_eq!(Dimension::Percent(50.0).resolve(Some(81)), Some(40));
        assert_eq!(Dimension::Percent(50.0).resolve(None), None);
        assert_eq!(Dimension::Percent(f32::NAN).resolve(Some(10)), Some(0));
        assert_eq!(Dimension::Percent(-5.0).resolve(Some(10)), Some(0));
    }

    #[test]
    fn test_border_ascii_fallback() {
        let chars = BorderStyle::Round.chars(false);
        assert_eq!(chars.horizontal, '-');
        assert_eq!(chars.top_left, '+');
        assert_eq!(BorderStyle::Round.chars(true).top_left, '╭');
    }
}
