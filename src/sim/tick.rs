//! Per-frame simulation step
//!
//! One call to `tick` is one frame. Timing is counted in frames, so the round
//! clock runs exactly as fast as the frame loop does.

use super::collision::resolve_collisions;
use super::player::Directions;
use super::state::{GameEvent, GamePhase, GameState};

/// Input snapshot for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Held direction keys
    pub dirs: Directions,
    /// Warp to the safe zone (one-shot)
    pub warp: bool,
    /// Pause toggle (one-shot)
    pub pause: bool,
    /// Acknowledge the current screen (one-shot)
    pub confirm: bool,
    /// Restart from round 1 (one-shot)
    pub reset: bool,
    /// Leave the game (one-shot)
    pub quit: bool,
}

/// Advance the game by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.quit {
        if !state.quit_requested {
            log::info!("Quit requested during {:?}", state.phase);
            state.quit_requested = true;
            state.push_event(GameEvent::Quit);
        }
        return;
    }

    match state.phase {
        GamePhase::Title => {
            if input.confirm {
                state.reset_game();
            }
        }
        GamePhase::Active => tick_active(state, input),
        GamePhase::Paused => {
            if input.confirm || input.pause {
                state.phase = GamePhase::Active;
                state.push_event(GameEvent::Resumed);
            }
        }
        GamePhase::RoundComplete => {
            if input.confirm {
                state.new_round();
                state.phase = GamePhase::Active;
            }
        }
        GamePhase::GameOver => {
            // Monsters keep roaming behind the game over screen
            state.monsters.update_all(state.zones.play);
            if input.confirm {
                state.reset_game();
            }
        }
    }
}

fn tick_active(state: &mut GameState, input: &TickInput) {
    if input.pause {
        state.phase = GamePhase::Paused;
        state.push_event(GameEvent::Paused);
        return;
    }
    if input.reset {
        state.reset_game();
        return;
    }
    if input.warp && state.player.warp(&state.zones) {
        log::debug!("Warped ({} left)", state.player.warps);
        state.push_event(GameEvent::Warped {
            warps_left: state.player.warps,
        });
    }

    // Update before collision check so this frame's draw sees resolved state
    let fps = state.fps();
    state.round.tick_frame(fps);
    state.player.update(input.dirs, &state.zones);
    state.monsters.update_all(state.zones.play);
    resolve_collisions(state);
}
