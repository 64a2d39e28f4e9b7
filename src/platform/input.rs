//! Keyboard input mapping
//!
//! Browser key names go in, logical controls and commands come out. Only the
//! held-key table reaches the simulation.

use crate::sim::KeyState;

/// A held gameplay control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    MoveLeft,
    MoveRight,
    JumpPrimary,
    JumpSecondary,
}

impl Control {
    /// Record this control as held or released
    pub fn apply(self, keys: &mut KeyState, down: bool) {
        match self {
            Control::MoveLeft => keys.move_left = down,
            Control::MoveRight => keys.move_right = down,
            Control::JumpPrimary => keys.jump_primary = down,
            Control::JumpSecondary => keys.jump_secondary = down,
        }
    }
}

/// A one-shot lifecycle command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Restart,
    Exit,
}

/// A decoded key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(Control),
    KeyUp(Control),
    Command(Command),
}

fn control_for(key: &str) -> Option<Control> {
    match key {
        "ArrowLeft" => Some(Control::MoveLeft),
        "ArrowRight" => Some(Control::MoveRight),
        "ArrowUp" => Some(Control::JumpPrimary),
        " " => Some(Control::JumpSecondary),
        _ => None,
    }
}

/// Decode a `keydown` event's `key` value
pub fn map_key_down(key: &str) -> Option<InputEvent> {
    match key {
        "r" | "R" => Some(InputEvent::Command(Command::Restart)),
        "Escape" => Some(InputEvent::Command(Command::Exit)),
        _ => control_for(key).map(InputEvent::KeyDown),
    }
}

/// Decode a `keyup` event's `key` value; commands have no release
pub fn map_key_up(key: &str) -> Option<InputEvent> {
    control_for(key).map(InputEvent::KeyUp)
}

/// Keys whose browser default (page scroll) must be suppressed
pub fn suppress_default(key: &str) -> bool {
    key == " "
}
