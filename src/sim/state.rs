//! Game state and round bookkeeping
//!
//! Everything the frame loop mutates lives in `GameState`; it is built once
//! from the validated configuration and owned by the loop.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{MonsterId, Monster};
use super::geom::Rect;
use super::player::Player;
use super::pool::MonsterPool;
use crate::consts::CATCH_POINTS;
use crate::round_bonus;
use crate::settings::{GameConfig, MonsterTemplate};

/// Current phase of the game loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Start screen, waiting for confirm
    Title,
    /// Active gameplay
    Active,
    /// Paused by the player
    Paused,
    /// All monsters caught, round summary shown until confirm
    RoundComplete,
    /// Out of lives; monsters keep roaming until confirm resets the game
    GameOver,
}

/// Things that happened during a tick, drained by the frontend for sound and
/// logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// Correct monster tagged
    Caught { kind: usize, points: u64 },
    /// Wrong monster touched
    WrongCatch { lives_left: u32 },
    Warped { warps_left: u32 },
    RoundCleared { round: u32, elapsed_secs: u32, bonus: u64 },
    RoundStarted { round: u32, monsters: usize },
    GameOver { score: u64, round: u32 },
    GameReset,
    Paused,
    Resumed,
    Quit,
}

/// The three stacked screen regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zones {
    pub screen: Rect,
    /// HUD along the top
    pub dashboard: Rect,
    /// Where monsters roam
    pub play: Rect,
    /// Bottom strip the player can retreat to
    pub safe: Rect,
}

impl Zones {
    pub fn from_config(config: &GameConfig) -> Self {
        let size = config.game.screen_size;
        let dash_h = config.dashboard.height;
        let safe_h = config.safe_zone.height;
        Self {
            screen: Rect::new(0, 0, size.x, size.y),
            dashboard: Rect::new(0, 0, size.x, dash_h),
            play: Rect::new(0, dash_h, size.x, config.play_height()),
            safe: Rect::new(0, size.y - safe_h, size.x, safe_h),
        }
    }

    /// Region the player may move in: play zone plus safe zone
    pub fn player_bound(&self) -> Rect {
        self.play.union(&self.safe)
    }
}

/// Score and timing for the current game
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    /// Current round, 0 before the first round starts
    pub round: u32,
    /// Whole seconds spent in the current round, counted in frames
    pub elapsed_secs: u32,
    /// Frames since the last whole second, always below fps
    pub frame_accumulator: u32,
    pub score: u64,
    /// Bonus awarded for the most recently cleared round
    pub bonus: u64,
}

impl RoundState {
    /// Count one active frame; every `fps` frames adds a second
    pub fn tick_frame(&mut self, fps: u32) {
        self.frame_accumulator += 1;
        if self.frame_accumulator >= fps {
            self.frame_accumulator = 0;
            self.elapsed_secs += 1;
        }
    }

    /// Score a correct catch and return the points awarded
    pub fn add_catch(&mut self) -> u64 {
        let points = CATCH_POINTS * self.round as u64;
        self.score += points;
        points
    }

    /// Bonus the current round is worth if it ended now
    pub fn pending_bonus(&self) -> u64 {
        round_bonus(self.round, self.elapsed_secs)
    }

    /// Bank the round bonus and advance to the next round
    pub fn advance(&mut self) {
        self.bonus = self.pending_bonus();
        self.score += self.bonus;
        self.round += 1;
        self.elapsed_secs = 0;
        self.frame_accumulator = 0;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub zones: Zones,
    pub phase: GamePhase,
    pub player: Player,
    pub monsters: MonsterPool,
    /// Monster the player must tag next; `None` only while the pool is empty
    pub target: Option<MonsterId>,
    pub round: RoundState,
    pub rng: Pcg32,
    /// Set once a quit has been requested; the loop exits after this frame
    pub quit_requested: bool,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Build a session on the title screen. No monsters exist until the first
    /// round is started.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let zones = Zones::from_config(&config);
        let player = Player::new(&config.player, &zones);
        Self {
            config,
            zones,
            phase: GamePhase::Title,
            player,
            monsters: MonsterPool::new(),
            target: None,
            round: RoundState::default(),
            rng: Pcg32::seed_from_u64(seed),
            quit_requested: false,
            events: Vec::new(),
        }
    }

    pub fn fps(&self) -> u32 {
        self.config.game.fps
    }

    pub fn target_monster(&self) -> Option<&Monster> {
        self.target.and_then(|id| self.monsters.get(id))
    }

    /// Template of the current target, used by the HUD
    pub fn target_template(&self) -> Option<&MonsterTemplate> {
        self.target_monster()
            .and_then(|m| self.config.template(m.kind))
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every event raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Pick a new random target from the pool.
    ///
    /// Only called with a non-empty pool; an empty pool means a round
    /// transition was skipped.
    pub fn choose_new_target(&mut self) {
        debug_assert!(!self.monsters.is_empty(), "target chosen from empty pool");
        self.target = self.monsters.choose(&mut self.rng);
    }

    /// Bank the bonus, advance the round counter, respawn `round` copies of
    /// every monster type, pick a target and grant one extra warp.
    pub fn new_round(&mut self) {
        self.round.advance();
        let round = self.round.round;
        self.monsters.populate(
            round,
            &self.config.monsters,
            self.zones.play,
            &mut self.rng,
        );
        self.choose_new_target();
        self.player.warps += 1;

        log::info!(
            "Round {} started with {} monsters (bonus banked: {})",
            round,
            self.monsters.len(),
            self.round.bonus
        );
        self.push_event(GameEvent::RoundStarted {
            round,
            monsters: self.monsters.len(),
        });
    }

    /// Back to round 1 with fresh score, lives and warps
    pub fn reset_game(&mut self) {
        log::info!("Game reset (score was {})", self.round.score);
        self.round.reset();
        self.player.reset_lives();
        self.player.reset_position(&self.zones);
        self.monsters.clear();
        self.target = None;
        self.push_event(GameEvent::GameReset);
        self.new_round();
        self.phase = GamePhase::Active;
    }
}
