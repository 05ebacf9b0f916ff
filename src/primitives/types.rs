//! Style records carried by render nodes.
//!
//! Styles are plain data. Colors stay unresolved ([`ColorValue`]) until the
//! renderer paints them, so a bad color string only affects the subtree that
//! uses it.

use std::rc::Rc;

use crate::error::PaintError;
use crate::types::{
    AlignItems, AlignSelf, Attr, BorderStyle, Dimension, Display, Edges, FlexDirection,
    JustifyContent, Position, Rgba,
};

// =============================================================================
// ColorValue
// =============================================================================

/// A color as written by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorValue {
    Rgba(Rgba),
    /// Parsed with [`Rgba::parse`] at paint time.
    Named(Rc<str>),
}

impl ColorValue {
    pub fn resolve(&self) -> Result<Rgba, PaintError> {
        match self {
            Self::Rgba(rgba) => Ok(*rgba),
            Self::Named(name) => {
                Rgba::parse(name).ok_or_else(|| PaintError::InvalidColor(name.to_string()))
            }
        }
    }
}

impl From<Rgba> for ColorValue {
    fn from(rgba: Rgba) -> Self {
        Self::Rgba(rgba)
    }
}

impl From<&str> for ColorValue {
    fn from(name: &str) -> Self {
        Self::Named(Rc::from(name))
    }
}

impl From<String> for ColorValue {
    fn from(name: String) -> Self {
        Self::Named(Rc::from(name))
    }
}

// =============================================================================
// BoxStyle
// =============================================================================

/// Layout and visual properties of a box.
///
/// Construct with struct update syntax:
///
/// ```
/// use ember_tui::primitives::BoxStyle;
/// use ember_tui::types::{BorderStyle, Dimension, FlexDirection};
///
/// let style = BoxStyle {
///     flex_direction: FlexDirection::Row,
///     width: Dimension::Cells(40),
///     border: BorderStyle::Round,
///     ..Default::default()
/// };
/// # let _ = style;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStyle {
    // Container
    pub flex_direction: FlexDirection,
    pub justify_content: JustifyContent,
    pub align_items: AlignItems,
    /// Space between adjacent flow children along the main axis.
    pub gap: u16,

    // Item
    pub flex_grow: f32,
    pub flex_shrink: f32,
    /// Main-axis starting size; `Auto` uses width/height or content size.
    pub flex_basis: Dimension,
    pub align_self: AlignSelf,

    // Dimensions
    pub width: Dimension,
    pub height: Dimension,
    pub min_width: Dimension,
    pub max_width: Dimension,
    pub min_height: Dimension,
    pub max_height: Dimension,

    // Spacing
    pub margin: Edges,
    pub padding: Edges,

    // Positioning
    pub position: Position,
    pub top: Option<u16>,
    pub right: Option<u16>,
    pub bottom: Option<u16>,
    pub left: Option<u16>,
    pub display: Display,

    // Visual
    pub border: BorderStyle,
    pub border_color: Option<ColorValue>,
    /// Paint the border with the dim attribute.
    pub border_dim_color: bool,
    pub fg: Option<ColorValue>,
    pub bg: Option<ColorValue>,
}

impl Default for BoxStyle {
    fn default() -> Self {
        Self {
            flex_direction: FlexDirection::Column,
            justify_content: JustifyContent::FlexStart,
            align_items: AlignItems::Stretch,
            gap: 0,
            flex_grow: 0.0,
            flex_shrink: 1.0,
            flex_basis: Dimension::Auto,
            align_self: AlignSelf::Auto,
            width: Dimension::Auto,
            height: Dimension::Auto,
            min_width: Dimension::Auto,
            max_width: Dimension::Auto,
            min_height: Dimension::Auto,
            max_height: Dimension::Auto,
            margin: Edges::ZERO,
            padding: Edges::ZERO,
            position: Position::Relative,
            top: None,
            right: None,
            bottom: None,
            left: None,
            display: Display::Flex,
            border: BorderStyle::None,
            border_color: None,
            border_dim_color: false,
            fg: None,
            bg: None,
        }
    }
}

impl BoxStyle {
    /// Row container.
    pub fn row() -> Self {
        Self {
            flex_direction: FlexDirection::Row,
            ..Default::default()
        }
    }

    /// Column container.
    pub fn column() -> Self {
        Self::default()
    }

    /// Border thickness per side (1 when a border is set).
    #[inline]
    pub fn border_edges(&self) -> Edges {
        if self.border.is_set() {
            Edges::all(1)
        } else {
            Edges::ZERO
        }
    }

    /// Padding plus border.
    #[inline]
    pub fn inner_edges(&self) -> Edges {
        self.padding + self.border_edges()
    }
}

// =============================================================================
// TextStyle
// =============================================================================

/// Style of a text node or of one span inside it.
///
/// Unset colors fall back to the enclosing span, then the text node, then the
/// nearest styled ancestor box.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextStyle {
    pub fg: Option<ColorValue>,
    pub bg: Option<ColorValue>,
    pub attrs: Attr,
}

impl TextStyle {
    /// Fill unset fields from `outer`; attributes accumulate.
    pub fn inherit(&self, outer: &TextStyle) -> TextStyle {
        TextStyle {
            fg: self.fg.clone().or_else(|| outer.fg.clone()),
            bg: self.bg.clone().or_else(|| outer.bg.clone()),
            attrs: self.attrs | outer.attrs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_value_resolve() {
        assert_eq!(ColorValue::from("red").resolve(), Ok(Rgba::ansi(1)));
        assert_eq!(
            ColorValue::from(Rgba::rgb(1, 2, 3)).resolve(),
            Ok(Rgba::rgb(1, 2, 3))
        );
        assert_eq!(
            ColorValue::from("nope").resolve(),
            Err(PaintError::InvalidColor("nope".into()))
        );
    }

    #[test]
    fn test_box_style_defaults() {
        let style = BoxStyle::default();
        assert_eq!(style.flex_shrink, 1.0);
        assert_eq!(style.align_items, AlignItems::Stretch);
        assert_eq!(style.flex_direction, FlexDirection::Column);
        assert_eq!(BoxStyle::row().flex_direction, FlexDirection::Row);
    }

    #[test]
    fn test_inner_edges() {
        let style = BoxStyle {
            padding: Edges::symmetric(2, 1),
            border: BorderStyle::Single,
            ..Default::default()
        };
        assert_eq!(style.inner_edges(), Edges { top: 2, right: 3, bottom: 2, left: 3 });
    }

    #[test]
    fn test_text_style_inherit() {
        let outer = TextStyle {
            fg: Some("red".into()),
            bg: Some("blue".into()),
            attrs: Attr::BOLD,
        };
        let inner = TextStyle {
            fg: Some("green".into()),
            bg: None,
            attrs: Attr::ITALIC,
        };
        let merged = inner.inherit(&outer);
        assert_eq!(merged.fg, Some("green".into()));
        assert_eq!(merged.bg, Some("blue".into()));
        assert_eq!(merged.attrs, Attr::BOLD | Attr::ITALIC);
    }
}
