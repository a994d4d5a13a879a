//! Platform layer
//!
//! Handles the terminal-specific parts of running the game:
//! - Keyboard input into per-frame snapshots
//! - Frame pacing
//! - Raw mode / alternate screen setup and restore

pub mod input;
pub mod session;
pub mod time;

pub use input::{KeyTracker, spawn_event_reader};
pub use session::TerminalSession;
pub use time::FrameClock;
