//! The active set of monsters for the current round
//!
//! Monsters are stored in ascending id order. Removal compacts the vector, so
//! iteration never sees a caught monster and pool order is always spawn order.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, Monster, MonsterId};
use super::geom::Rect;
use crate::settings::MonsterTemplate;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonsterPool {
    monsters: Vec<Monster>,
    next_id: MonsterId,
}

impl MonsterPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pool with `copies` monsters of every template, in template
    /// order within each copy.
    pub fn populate(
        &mut self,
        copies: u32,
        templates: &[MonsterTemplate],
        zone: Rect,
        rng: &mut impl Rng,
    ) {
        self.monsters.clear();
        self.monsters.reserve(copies as usize * templates.len());
        for _ in 0..copies {
            for (kind, template) in templates.iter().enumerate() {
                let id = self.next_id;
                self.next_id += 1;
                self.monsters
                    .push(Monster::spawn(id, kind, template, zone, rng));
            }
        }
    }

    pub fn clear(&mut self) {
        self.monsters.clear();
    }

    pub fn len(&self) -> usize {
        self.monsters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monsters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Monster> {
        self.monsters.iter()
    }

    pub fn get(&self, id: MonsterId) -> Option<&Monster> {
        self.index_of(id).map(|i| &self.monsters[i])
    }

    pub fn get_mut(&mut self, id: MonsterId) -> Option<&mut Monster> {
        self.index_of(id).map(|i| &mut self.monsters[i])
    }

    pub fn contains(&self, id: MonsterId) -> bool {
        self.index_of(id).is_some()
    }

    /// Remove a monster, returning it if it was present
    pub fn remove(&mut self, id: MonsterId) -> Option<Monster> {
        self.index_of(id).map(|i| self.monsters.remove(i))
    }

    /// Advance every monster one tick inside `zone`
    pub fn update_all(&mut self, zone: Rect) {
        for monster in &mut self.monsters {
            monster.update(zone);
        }
    }

    /// First monster in pool order whose box overlaps `bounds`
    pub fn first_overlap(&self, bounds: &Rect) -> Option<MonsterId> {
        self.monsters
            .iter()
            .find(|m| m.bounds().overlaps(bounds))
            .map(|m| m.id)
    }

    /// Pick a monster uniformly at random; `None` only when empty
    pub fn choose(&self, rng: &mut impl Rng) -> Option<MonsterId> {
        if self.monsters.is_empty() {
            return None;
        }
        let i = rng.random_range(0..self.monsters.len());
        Some(self.monsters[i].id)
    }

    fn index_of(&self, id: MonsterId) -> Option<usize> {
        self.monsters.binary_search_by_key(&id, |m| m.id).ok()
    }
}
