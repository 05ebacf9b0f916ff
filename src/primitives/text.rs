//! Text nodes.
//!
//! A text node is a list of spans, each a string with its own style. Nesting
//! text inside text flattens at construction: the nested node's spans are
//! appended with the nested node's style filled in underneath their own.
//!
//! ```
//! use ember_tui::primitives::text;
//!
//! let line = text("status: ")
//!     .bold()
//!     .child(text("error").fg("red"));
//! assert_eq!(line.plain_text(), "status: error");
//! ```

use std::rc::Rc;

use super::types::{ColorValue, TextStyle};
use crate::types::{Attr, TextWrap};

/// One styled run of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub text: Rc<str>,
    pub style: TextStyle,
}

/// A styled text leaf.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextNode {
    /// Style applied underneath every span.
    pub style: TextStyle,
    pub wrap: TextWrap,
    pub spans: Vec<TextSpan>,
}

/// Create a text node with a single unstyled span.
pub fn text(content: impl Into<String>) -> TextNode {
    let content: String = content.into();
    let mut node = TextNode::default();
    if !content.is_empty() {
        node.spans.push(TextSpan {
            text: Rc::from(content),
            style: TextStyle::default(),
        });
    }
    node
}

/// Something that can be nested inside a text node.
pub enum TextChild {
    Str(String),
    Text(TextNode),
}

impl From<&str> for TextChild {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for TextChild {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<TextNode> for TextChild {
    fn from(node: TextNode) -> Self {
        Self::Text(node)
    }
}

impl TextNode {
    pub fn fg(mut self, color: impl Into<ColorValue>) -> Self {
        self.style.fg = Some(color.into());
        self
    }

    pub fn bg(mut self, color: impl Into<ColorValue>) -> Self {
        self.style.bg = Some(color.into());
        self
    }

    pub fn attrs(mut self, attrs: Attr) -> Self {
        self.style.attrs |= attrs;
        self
    }

    pub fn bold(self) -> Self {
        self.attrs(Attr::BOLD)
    }

    pub fn dim(self) -> Self {
        self.attrs(Attr::DIM)
    }

    pub fn italic(self) -> Self {
        self.attrs(Attr::ITALIC)
    }

    pub fn underline(self) -> Self {
        self.attrs(Attr::UNDERLINE)
    }

    pub fn strikethrough(self) -> Self {
        self.attrs(Attr::STRIKETHROUGH)
    }

    pub fn inverse(self) -> Self {
        self.attrs(Attr::INVERSE)
    }

    pub fn wrap(mut self, wrap: TextWrap) -> Self {
        self.wrap = wrap;
        self
    }

    /// Append a string or a nested text node.
    pub fn child(mut self, child: impl Into<TextChild>) -> Self {
        match child.into() {
            TextChild::Str(s) => {
                if !s.is_empty() {
                    self.spans.push(TextSpan {
                        text: Rc::from(s),
                        style: TextStyle::default(),
                    });
                }
            }
            TextChild::Text(nested) => {
                for span in nested.spans {
                    self.spans.push(TextSpan {
                        style: span.style.inherit(&nested.style),
                        text: span.text,
                    });
                }
            }
        }
        self
    }

    /// Concatenated span text without styling.
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| &*s.text).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(|s| s.text.is_empty())
    }
}

impl From<TextNode> for super::Node {
    fn from(node: TextNode) -> Self {
        super::Node::Text(node)
    }
}
