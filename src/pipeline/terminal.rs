//! Terminal capabilities, setup and teardown.
//!
//! [`TerminalCaps`] is detected once at mount (or injected by the caller) and
//! only read afterwards. [`TerminalSetup`] remembers which modes it changed so
//! restoring is exact and idempotent.

use std::io::{self, Write};

use crate::renderer::ansi;
use crate::types::ColorMode;

// =============================================================================
// Capabilities
// =============================================================================

/// What the output terminal can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalCaps {
    pub width: u16,
    pub height: u16,
    /// Box-drawing glyphs are available.
    pub unicode: bool,
    pub color_mode: ColorMode,
}

impl Default for TerminalCaps {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
            unicode: true,
            color_mode: ColorMode::TrueColor,
        }
    }
}

impl TerminalCaps {
    /// Query the terminal size through crossterm and read the environment.
    ///
    /// Falls back to 80x24 when stdout is not a terminal.
    pub fn detect() -> Self {
        let (width, height) = crossterm::terminal::size().unwrap_or((80, 24));
        Self::from_env(width, height, |key| std::env::var(key).ok())
    }

    /// Capabilities for a terminal of the given size, with color and charset
    /// support derived from `var` (an environment lookup).
    pub fn from_env(width: u16, height: u16, var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            unicode: unicode_from_env(&var),
            color_mode: color_mode_from_env(&var),
        }
    }
}

fn non_empty(var: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    var(key).filter(|value| !value.is_empty())
}

fn color_mode_from_env(var: &impl Fn(&str) -> Option<String>) -> ColorMode {
    if non_empty(var, "NO_COLOR").is_some() {
        return ColorMode::NoColor;
    }
    if let Some(colorterm) = non_empty(var, "COLORTERM") {
        let colorterm = colorterm.to_ascii_lowercase();
        if colorterm == "truecolor" || colorterm == "24bit" {
            return ColorMode::TrueColor;
        }
    }
    match non_empty(var, "TERM") {
        Some(term) if term == "dumb" => ColorMode::NoColor,
        Some(term) if term.contains("256color") => ColorMode::Ansi256,
        Some(_) => ColorMode::Ansi16,
        None => ColorMode::TrueColor,
    }
}

fn unicode_from_env(var: &impl Fn(&str) -> Option<String>) -> bool {
    if let Some(ascii) = non_empty(var, "EMBER_TUI_ASCII") {
        return ascii == "0";
    }
    if matches!(non_empty(var, "TERM").as_deref(), Some("linux" | "dumb")) {
        return false;
    }
    // First locale variable that is set wins, as in setlocale(3).
    ["LC_ALL", "LC_CTYPE", "LANG"]
        .iter()
        .find_map(|key| non_empty(var, key))
        .is_none_or(|locale| {
            let locale = locale.to_ascii_lowercase();
            locale.contains("utf-8") || locale.contains("utf8")
        })
}

// =============================================================================
// Setup / teardown
// =============================================================================

/// Terminal modes changed at mount.
#[derive(Debug, Default)]
pub(crate) struct TerminalSetup {
    cursor_hidden: bool,
    raw: bool,
}

impl TerminalSetup {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Apply mount-time modes. Raw mode is only touched when `raw` is set.
    pub(crate) fn enter(
        &mut self,
        out: &mut dyn Write,
        clear: bool,
        hide_cursor: bool,
        raw: bool,
    ) -> io::Result<()> {
        if raw {
            crossterm::terminal::enable_raw_mode()?;
            self.raw = true;
        }
        if clear {
            ansi::clear_screen(out)?;
        }
        if hide_cursor {
            ansi::cursor_hide(out)?;
            self.cursor_hidden = true;
        }
        out.flush()
    }

    /// Undo whatever [`enter`](Self::enter) changed. Safe to call twice.
    ///
    /// Every step is attempted; the first failure is returned.
    pub(crate) fn restore(&mut self, out: &mut dyn Write) -> io::Result<()> {
        let mut result = ansi::reset(out);
        if self.cursor_hidden {
            result = result.and(ansi::cursor_show(out));
            self.cursor_hidden = false;
        }
        result = result.and(out.flush());
        if self.raw {
            result = result.and(crossterm::terminal::disable_raw_mode());
            self.raw = false;
        }
        result
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn caps(vars: &[(&str, &str)]) -> TerminalCaps {
        let env: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        TerminalCaps::from_env(100, 30, |key| env.get(key).cloned())
    }

    #[test]
    fn test_color_mode_detection() {
        assert_eq!(caps(&[("NO_COLOR", "1"), ("COLORTERM", "truecolor")]).color_mode, ColorMode::NoColor);
        assert_eq!(caps(&[("COLORTERM", "24bit")]).color_mode, ColorMode::TrueColor);
        assert_eq!(caps(&[("TERM", "xterm-256color")]).color_mode, ColorMode::Ansi256);
        assert_eq!(caps(&[("TERM", "xterm")]).color_mode, ColorMode::Ansi16);
        assert_eq!(caps(&[("TERM", "dumb")]).color_mode, ColorMode::NoColor);
        // An empty NO_COLOR does not count.
        assert_eq!(caps(&[("NO_COLOR", "")]).color_mode, ColorMode::TrueColor);
    }

    #[test]
    fn test_unicode_detection() {
        assert!(caps(&[]).unicode);
        assert!(caps(&[("LANG", "en_US.UTF-8")]).unicode);
        assert!(!caps(&[("LANG", "C")]).unicode);
        assert!(!caps(&[("LC_ALL", "POSIX"), ("LANG", "en_US.UTF-8")]).unicode);
        assert!(!caps(&[("TERM", "linux")]).unicode);
        assert!(!caps(&[("EMBER_TUI_ASCII", "1"), ("LANG", "en_US.UTF-8")]).unicode);
    }

    #[test]
    fn test_size_is_kept() {
        let caps = caps(&[]);
        assert_eq!((caps.width, caps.height), (100, 30));
    }

    #[test]
    fn test_setup_restore_is_idempotent() {
        let mut setup = TerminalSetup::new();
        let mut out = Vec::new();
        setup.enter(&mut out, true, true, false).unwrap();
        assert_eq!(out, b"\x1b[2J\x1b[H\x1b[?25l");

        out.clear();
        setup.restore(&mut out).unwrap();
        assert_eq!(out, b"\x1b[0m\x1b[?25h");

        out.clear();
        setup.restore(&mut out).unwrap();
        assert_eq!(out, b"\x1b[0m");
    }
}
