//! Input sources.
//!
//! The render loop polls an [`InputSource`] for key presses and resizes. The
//! default source reads crossterm events from the process terminal;
//! [`ScriptedInput`] replays a fixed list for tests and headless runs.

use std::collections::VecDeque;
use std::io::{self, IsTerminal};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// An input event the loop cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Resize(u16, u16),
}

impl InputEvent {
    /// Shorthand for a key press with no modifiers.
    pub fn key(code: KeyCode) -> Self {
        Self::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    pub fn ctrl_c() -> Self {
        Self::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
    }

    pub fn is_ctrl_c(&self) -> bool {
        matches!(
            self,
            Self::Key(KeyEvent {
                code: KeyCode::Char('c'),
                modifiers,
                ..
            }) if modifiers.contains(KeyModifiers::CONTROL)
        )
    }
}

/// Where the loop reads events from.
pub trait InputSource {
    /// Wait up to `timeout` for the next event.
    fn poll(&mut self, timeout: Duration) -> io::Result<Option<InputEvent>>;

    /// True when reading from an interactive terminal. Raw mode is only
    /// enabled for terminal input.
    fn is_terminal(&self) -> bool {
        false
    }
}

// =============================================================================
// Crossterm
// =============================================================================

/// Reads key and resize events from the process terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrosstermInput;

impl InputSource for CrosstermInput {
    fn poll(&mut self, timeout: Duration) -> io::Result<Option<InputEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        Ok(match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => Some(InputEvent::Key(key)),
            Event::Resize(width, height) => Some(InputEvent::Resize(width, height)),
            _ => None,
        })
    }

    fn is_terminal(&self) -> bool {
        io::stdin().is_terminal()
    }
}

// =============================================================================
// Scripted
// =============================================================================

/// Replays queued events, one per poll. Never blocks.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    events: VecDeque<InputEvent>,
}

impl ScriptedInput {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, _timeout: Duration) -> io::Result<Option<InputEvent>> {
        Ok(self.events.pop_front())
    }
}
