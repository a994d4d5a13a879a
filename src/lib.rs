//! Monster Tag - a terminal arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, collisions, round state machine)
//! - `settings`: Typed, eagerly validated game configuration
//! - `renderer`: Canvas abstraction and the terminal backend
//! - `audio`: Sound effect dispatch for game events
//! - `platform`: Keyboard input and frame pacing

pub mod audio;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{ConfigError, GameConfig};

/// Game rule constants
pub mod consts {
    /// Points per correct catch, multiplied by the round number
    pub const CATCH_POINTS: u64 = 100;
    /// Round bonus numerator, multiplied by the round number
    pub const ROUND_BONUS_BASE: u64 = 10_000;

    /// Monster speed range in pixels per frame (inclusive)
    pub const MONSTER_MIN_SPEED: i32 = 1;
    pub const MONSTER_MAX_SPEED: i32 = 5;

    /// Default frame rate when the settings file does not set one
    pub const DEFAULT_FPS: u32 = 30;
}

/// Bonus for clearing `round` in `elapsed_secs` seconds
///
/// `floor(10000 * round / (1 + elapsed_secs))`, so faster clears pay more.
#[inline]
pub fn round_bonus(round: u32, elapsed_secs: u32) -> u64 {
    consts::ROUND_BONUS_BASE * round as u64 / (1 + elapsed_secs as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_bonus_examples() {
        assert_eq!(round_bonus(2, 9), 2000);
        assert_eq!(round_bonus(1, 0), 10_000);
        assert_eq!(round_bonus(3, 6), 4285);
        assert_eq!(round_bonus(0, 12), 0);
    }
}
