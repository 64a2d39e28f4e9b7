//! Scene rendering
//!
//! Rendering is split from simulation: the host captures an immutable
//! `Snapshot` after ticking, builds a flat list of `DrawCmd`s from it and
//! replays them on whatever 2D surface it has.

pub mod scene;
pub mod theme;

pub use scene::{DrawCmd, Snapshot, build_scene};
pub use theme::Color;
