//! The player-controlled sprite

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::geom::Rect;
use super::state::Zones;
use crate::settings::PlayerSettings;

/// Currently held direction keys. Opposite directions may both be held; each
/// is applied independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Directions {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
    pub velocity: i32,
    pub lives: u32,
    pub warps: u32,
    pub starting_lives: u32,
    pub starting_warps: u32,
}

impl Player {
    /// Create a player resting in the safe zone with full lives and warps
    pub fn new(settings: &PlayerSettings, zones: &Zones) -> Self {
        let mut player = Self {
            rect: Rect::from_pos_size(IVec2::ZERO, settings.size),
            velocity: settings.velocity,
            lives: settings.lives,
            warps: settings.warps,
            starting_lives: settings.lives,
            starting_warps: settings.warps,
        };
        player.reset_position(zones);
        player
    }

    /// Move one step per held direction. Each step is only taken if the
    /// moved box stays inside the play zone extended by the safe zone.
    pub fn update(&mut self, dirs: Directions, zones: &Zones) {
        let bound = zones.player_bound();
        let v = self.velocity;
        let steps = [
            (dirs.left, IVec2::new(-v, 0)),
            (dirs.right, IVec2::new(v, 0)),
            (dirs.up, IVec2::new(0, -v)),
            (dirs.down, IVec2::new(0, v)),
        ];
        for (held, delta) in steps {
            if !held {
                continue;
            }
            let moved = self.rect.translated(delta);
            if bound.contains_rect(&moved) {
                self.rect = moved;
            }
        }
    }

    /// Teleport down to the safe zone.
    ///
    /// Returns `false` without touching anything when no warps are left or
    /// the player is already inside the safe zone.
    pub fn warp(&mut self, zones: &Zones) -> bool {
        if self.warps == 0 || self.in_safe_zone(zones) {
            return false;
        }
        self.warps -= 1;
        self.rect.set_bottom(zones.safe.bottom());
        true
    }

    /// True once the top of the box has reached the safe zone
    pub fn in_safe_zone(&self, zones: &Zones) -> bool {
        self.rect.top() >= zones.safe.top()
    }

    /// Centre the player horizontally at the bottom of the safe zone
    pub fn reset_position(&mut self, zones: &Zones) {
        self.rect.set_center_x(zones.safe.center_x());
        self.rect.set_bottom(zones.safe.bottom());
    }

    pub fn reset_lives(&mut self) {
        self.lives = self.starting_lives;
        self.warps = self.starting_warps;
    }

    /// Lose a life; returns `true` when none are left
    pub fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.lives == 0
    }
}

impl Entity for Player {
    fn bounds(&self) -> Rect {
        self.rect
    }
}
