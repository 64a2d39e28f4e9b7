//! Platform abstraction layer
//!
//! Handles host-side plumbing the simulation never sees:
//! - Key events into the held-key table
//! - Frame timing and loop cancellation

pub mod input;
pub mod time;

pub use input::{Command, Control, InputEvent, map_key_down, map_key_up};
pub use time::{FrameClock, FrameTicket, LoopGuard};
