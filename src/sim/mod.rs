//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only, one tick per frame
//! - Seeded RNG only
//! - Stable iteration order (by monster ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod geom;
pub mod player;
pub mod pool;
pub mod state;
pub mod tick;

pub use collision::{CollisionOutcome, resolve_collisions};
pub use entity::{Entity, Monster, MonsterId};
pub use geom::Rect;
pub use player::{Directions, Player};
pub use pool::MonsterPool;
pub use state::{GameEvent, GamePhase, GameState, RoundState, Zones};
pub use tick::{TickInput, tick};
