use serde::{Deserialize, Serialize};

/// Key codes the grid reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    // Arrow keys
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    // Special keys
    Enter,
    Backspace,
    Delete,
    Shift,

    // Character key
    Char(char),

    // Unknown
    Unknown,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` string
    pub fn from_dom(key: &str) -> Self {
        match key {
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "Enter" => Key::Enter,
            "Backspace" => Key::Backspace,
            "Delete" => Key::Delete,
            "Shift" => Key::Shift,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => Key::Unknown,
                }
            }
        }
    }
}

/// Modifier keys state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shift(mut self, shift: bool) -> Self {
        self.shift = shift;
        self
    }

    pub fn with_ctrl(mut self, ctrl: bool) -> Self {
        self.ctrl = ctrl;
        self
    }

    pub fn none_pressed(&self) -> bool {
        !self.shift && !self.ctrl && !self.alt && !self.meta
    }
}

/// Grid step for an arrow key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    Up,
    Down,
    Left,
    Right,
}

impl Step {
    /// Offset in row-major linear order for a grid of the given width
    pub fn linear_offset(self, width: usize) -> isize {
        match self {
            Step::Up => -(width as isize),
            Step::Down => width as isize,
            Step::Left => -1,
            Step::Right => 1,
        }
    }
}

/// What a keydown means to the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavAction {
    /// Delete or Backspace
    Erase,
    /// Enter never inserts anything into a cell
    SuppressEnter,
    /// Arrow key; `extend` when Shift is held
    Move { step: Step, extend: bool },
    /// Left to the host (plain typing, shortcuts)
    None,
}

/// Maps a key and modifiers to a NavAction
pub fn key_to_action(key: Key, modifiers: Modifiers) -> NavAction {
    match key {
        Key::Delete | Key::Backspace => NavAction::Erase,
        Key::Enter => NavAction::SuppressEnter,
        Key::ArrowUp => NavAction::Move {
            step: Step::Up,
            extend: modifiers.shift,
        },
        Key::ArrowDown => NavAction::Move {
            step: Step::Down,
            extend: modifiers.shift,
        },
        Key::ArrowLeft => NavAction::Move {
            step: Step::Left,
            extend: modifiers.shift,
        },
        Key::ArrowRight => NavAction::Move {
            step: Step::Right,
            extend: modifiers.shift,
        },
        _ => NavAction::None,
    }
}
