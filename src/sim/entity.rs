//! Moving actors and monster motion

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use crate::consts::{MONSTER_MAX_SPEED, MONSTER_MIN_SPEED};
use crate::settings::MonsterTemplate;

/// Stable monster identifier, never reused within a session
pub type MonsterId = u32;

/// Anything with a bounding box that takes part in collision checks
pub trait Entity {
    fn bounds(&self) -> Rect;
}

/// A roaming monster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monster {
    pub id: MonsterId,
    /// Index of the template this monster was spawned from
    pub kind: usize,
    /// Identity compared against the target's on contact
    pub name: String,
    pub rect: Rect,
    /// Direction sign per axis, each component is +1 or -1
    pub dir: IVec2,
    pub velocity: i32,
}

impl Monster {
    /// Spawn a monster at a random position fully inside `zone`, with a random
    /// diagonal heading and speed.
    pub fn spawn(
        id: MonsterId,
        kind: usize,
        template: &MonsterTemplate,
        zone: Rect,
        rng: &mut impl Rng,
    ) -> Self {
        let size = template.size;
        let x = rng.random_range(zone.left()..=(zone.right() - size.x).max(zone.left()));
        let y = rng.random_range(zone.top()..=(zone.bottom() - size.y).max(zone.top()));
        let mut sign = || if rng.random_bool(0.5) { 1 } else { -1 };
        let dir = IVec2::new(sign(), sign());

        Self {
            id,
            kind,
            name: template.name.clone(),
            rect: Rect::from_pos_size(IVec2::new(x, y), size),
            dir,
            velocity: rng.random_range(MONSTER_MIN_SPEED..=MONSTER_MAX_SPEED),
        }
    }

    /// Advance one tick and bounce off the edges of `zone`.
    ///
    /// When the leading edge reaches or crosses a boundary the box is placed
    /// flush against it and that axis reverses, so the box never leaves the
    /// zone.
    pub fn update(&mut self, zone: Rect) {
        self.rect = self.rect.translated(self.dir * self.velocity);

        if self.dir.x < 0 && self.rect.left() <= zone.left() {
            self.rect.x = zone.left();
            self.dir.x = 1;
        } else if self.dir.x > 0 && self.rect.right() >= zone.right() {
            self.rect.set_right(zone.right());
            self.dir.x = -1;
        }

        if self.dir.y < 0 && self.rect.top() <= zone.top() {
            self.rect.y = zone.top();
            self.dir.y = 1;
        } else if self.dir.y > 0 && self.rect.bottom() >= zone.bottom() {
            self.rect.set_bottom(zone.bottom());
            self.dir.y = -1;
        }
    }
}

impl Entity for Monster {
    fn bounds(&self) -> Rect {
        self.rect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Rgb;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn template() -> MonsterTemplate {
        MonsterTemplate {
            name: "Goblin".to_string(),
            size: IVec2::new(40, 30),
            color: Rgb(0, 255, 0),
            glyph: "G".to_string(),
            sound: "g.wav".to_string(),
        }
    }

    fn monster_at(x: i32, y: i32, dir: IVec2, velocity: i32) -> Monster {
        Monster {
            id: 1,
            kind: 0,
            name: "Goblin".to_string(),
            rect: Rect::new(x, y, 40, 30),
            dir,
            velocity,
        }
    }

    const ZONE: Rect = Rect::new(0, 100, 400, 300);

    #[test]
    fn test_spawn_inside_zone() {
        let mut rng = Pcg32::seed_from_u64(7);
        for id in 0..200 {
            let m = Monster::spawn(id, 0, &template(), ZONE, &mut rng);
            assert!(ZONE.contains_rect(&m.rect), "{:?}", m.rect);
            assert!((MONSTER_MIN_SPEED..=MONSTER_MAX_SPEED).contains(&m.velocity));
            assert_eq!(m.dir.x.abs(), 1);
            assert_eq!(m.dir.y.abs(), 1);
            assert_eq!(m.name, "Goblin");
        }
    }

    #[test]
    fn test_moves_by_velocity_times_direction() {
        let mut m = monster_at(100, 200, IVec2::new(1, -1), 3);
        m.update(ZONE);
        assert_eq!(m.rect.pos(), IVec2::new(103, 197));
        assert_eq!(m.dir, IVec2::new(1, -1));
    }

    #[test]
    fn test_reflects_off_right_edge() {
        // right edge at 358, zone right at 400
        let mut m = monster_at(358, 200, IVec2::new(1, 1), 5);
        m.update(ZONE);
        assert_eq!(m.rect.right(), 400);
        assert_eq!(m.dir.x, -1);
        m.update(ZONE);
        assert_eq!(m.rect.right(), 395);
    }

    #[test]
    fn test_reflects_when_exactly_touching() {
        let mut m = monster_at(2, 200, IVec2::new(-1, 1), 2);
        m.update(ZONE);
        assert_eq!(m.rect.left(), 0);
        assert_eq!(m.dir.x, 1);
    }

    #[test]
    fn test_reflects_off_top_and_bottom() {
        let mut m = monster_at(100, 101, IVec2::new(1, -1), 4);
        m.update(ZONE);
        assert_eq!(m.rect.top(), 100);
        assert_eq!(m.dir.y, 1);

        let mut m = monster_at(100, 368, IVec2::new(1, 1), 4);
        m.update(ZONE);
        assert_eq!(m.rect.bottom(), 400);
        assert_eq!(m.dir.y, -1);
    }

    #[test]
    fn test_no_bounce_when_moving_away_from_edge() {
        let mut m = monster_at(0, 200, IVec2::new(1, 1), 2);
        m.update(ZONE);
        assert_eq!(m.rect.left(), 2);
        assert_eq!(m.dir.x, 1);
    }

    proptest! {
        #[test]
        fn prop_monster_never_leaves_zone(seed in any::<u64>(), ticks in 1usize..500) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut m = Monster::spawn(0, 0, &template(), ZONE, &mut rng);
            for _ in 0..ticks {
                m.update(ZONE);
                prop_assert!(ZONE.contains_rect(&m.rect), "escaped: {:?}", m.rect);
            }
        }
    }
}
