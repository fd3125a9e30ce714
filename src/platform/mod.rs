//! Platform abstraction layer
//!
//! Turns raw key state from whatever windowing/terminal backend is in use
//! into the per-tick `TickInput` the simulation consumes. Movement is
//! level-triggered (held); menu, ultimate, cancel and quit are edge-triggered
//! so a held key fires once.

use crate::sim::TickInput;

/// Logical keys, independent of the physical binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    /// Ultimate ability (also menu confirm)
    Action,
    Confirm,
    Cancel,
    Quit,
}

impl Key {
    pub const ALL: [Key; 8] = [
        Key::Left,
        Key::Right,
        Key::Up,
        Key::Down,
        Key::Action,
        Key::Confirm,
        Key::Cancel,
        Key::Quit,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Map a browser/winit-style key name to a logical key
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            "ArrowUp" | "w" | "W" => Some(Key::Up),
            "ArrowDown" | "s" | "S" => Some(Key::Down),
            " " | "Space" => Some(Key::Action),
            "Enter" => Some(Key::Confirm),
            "Escape" => Some(Key::Cancel),
            "q" | "Q" => Some(Key::Quit),
            _ => None,
        }
    }
}

/// Which keys are currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    held: [bool; 8],
}

impl KeyState {
    pub fn set(&mut self, key: Key, down: bool) {
        self.held[key.index()] = down;
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held[key.index()]
    }

    /// Convenience for building states in tests and replays
    pub fn with(mut self, key: Key) -> Self {
        self.set(key, true);
        self
    }
}

/// Edge detector: remembers last tick's keys to report fresh presses
#[derive(Debug, Clone, Default)]
pub struct InputLatch {
    previous: KeyState,
    /// Demo mode toggle carried into every input
    pub autopilot: bool,
}

impl InputLatch {
    pub fn new(autopilot: bool) -> Self {
        Self {
            previous: KeyState::default(),
            autopilot,
        }
    }

    /// Build this tick's input from the current key state
    pub fn sample(&mut self, keys: &KeyState) -> TickInput {
        let pressed = |key: Key| keys.is_held(key) && !self.previous.is_held(key);
        let input = TickInput {
            move_left: keys.is_held(Key::Left),
            move_right: keys.is_held(Key::Right),
            ultimate: pressed(Key::Action),
            menu_up: pressed(Key::Up),
            menu_down: pressed(Key::Down),
            confirm: pressed(Key::Confirm) || pressed(Key::Action),
            cancel: pressed(Key::Cancel),
            quit: pressed(Key::Quit),
            autopilot: self.autopilot,
        };
        self.previous = *keys;
        input
    }
}
