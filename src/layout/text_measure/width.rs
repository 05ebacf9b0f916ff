//! Display width of text in terminal cells.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

/// Width of a single code point: 0 for controls and combining marks, 2 for
/// wide (CJK, fullwidth, emoji presentation), otherwise 1.
#[inline]
pub fn char_width(c: char) -> usize {
    match c as u32 {
        // Pictographs most terminals draw two cells wide.
        0x1F300..=0x1F64F | 0x1F680..=0x1F6FF | 0x1F900..=0x1F9FF | 0x1FA70..=0x1FAFF => 2,
        _ => c.width().unwrap_or(0),
    }
}

/// Width of one grapheme cluster.
///
/// Emoji sequences (ZWJ joins, VS16, skin tones, keycaps, flag pairs) are two
/// cells; a base character with combining marks is as wide as the base.
pub fn grapheme_width(grapheme: &str) -> usize {
    let mut chars = grapheme.chars();
    let Some(first) = chars.next() else {
        return 0;
    };
    if grapheme.len() == first.len_utf8() {
        return char_width(first);
    }

    if (0x1F1E6..=0x1F1FF).contains(&(first as u32)) {
        return 2;
    }
    let emoji_sequence = chars.any(|c| {
        matches!(c as u32, 0x200D | 0xFE0F | 0x20E3 | 0x1F3FB..=0x1F3FF)
    });
    if emoji_sequence {
        return 2;
    }

    char_width(first)
}

/// Width of a string, summing grapheme widths.
pub fn string_width(s: &str) -> usize {
    if s.is_ascii() {
        return s.bytes().filter(|b| (0x20..0x7f).contains(b)).count();
    }
    s.graphemes(true).map(grapheme_width).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii() {
        assert_eq!(string_width("hello"), 5);
        assert_eq!(string_width(""), 0);
        assert_eq!(string_width("a\tb"), 2);
    }

    #[test]
    fn test_wide_and_combining() {
        assert_eq!(string_width("日本"), 4);
        assert_eq!(grapheme_width("e\u{301}"), 1);
        assert_eq!(grapheme_width("👍🏽"), 2);
        assert_eq!(grapheme_width("🇺🇸"), 2);
        assert_eq!(char_width('\u{200B}'), 0);
    }
}
