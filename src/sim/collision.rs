//! Player/monster contact resolution
//!
//! Each active frame the player is tested against the pool in id order and
//! only the first overlapping monster is resolved, so touching two monsters
//! at once always resolves against the older one.

use super::entity::{Entity, MonsterId};
use super::state::{GameEvent, GamePhase, GameState};

/// What a contact led to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionOutcome {
    /// Tagged a monster matching the target
    Caught {
        id: MonsterId,
        points: u64,
        round_cleared: bool,
    },
    /// Touched a monster of the wrong kind
    WrongCatch { id: MonsterId, game_over: bool },
}

/// Check the player against every monster and apply the result.
///
/// A match is decided by monster name, not by instance: any monster of the
/// target's kind counts.
pub fn resolve_collisions(state: &mut GameState) -> Option<CollisionOutcome> {
    let id = state.monsters.first_overlap(&state.player.bounds())?;
    let (kind, name) = state
        .monsters
        .get(id)
        .map(|m| (m.kind, m.name.clone()))?;
    let is_target = state.target_monster().is_some_and(|t| t.name == name);

    if is_target {
        Some(catch_monster(state, id, kind))
    } else {
        Some(wrong_catch(state, id))
    }
}

fn catch_monster(state: &mut GameState, id: MonsterId, kind: usize) -> CollisionOutcome {
    let points = state.round.add_catch();
    state.monsters.remove(id);
    log::debug!(
        "Caught monster {} (+{} points, {} left)",
        id,
        points,
        state.monsters.len()
    );
    state.push_event(GameEvent::Caught { kind, points });

    let round_cleared = state.monsters.is_empty();
    if round_cleared {
        state.target = None;
        state.player.reset_position(&state.zones);
        let bonus = state.round.pending_bonus();
        log::info!(
            "Round {} cleared in {}s (bonus {})",
            state.round.round,
            state.round.elapsed_secs,
            bonus
        );
        state.push_event(GameEvent::RoundCleared {
            round: state.round.round,
            elapsed_secs: state.round.elapsed_secs,
            bonus,
        });
        state.phase = GamePhase::RoundComplete;
    } else {
        state.choose_new_target();
    }

    CollisionOutcome::Caught {
        id,
        points,
        round_cleared,
    }
}

fn wrong_catch(state: &mut GameState, id: MonsterId) -> CollisionOutcome {
    let game_over = state.player.lose_life();
    state.player.reset_position(&state.zones);
    log::debug!(
        "Touched wrong monster {} ({} lives left)",
        id,
        state.player.lives
    );
    state.push_event(GameEvent::WrongCatch {
        lives_left: state.player.lives,
    });

    if game_over {
        log::info!(
            "Game over at round {} with score {}",
            state.round.round,
            state.round.score
        );
        state.push_event(GameEvent::GameOver {
            score: state.round.score,
            round: state.round.round,
        });
        state.phase = GamePhase::GameOver;
    }

    CollisionOutcome::WrongCatch { id, game_over }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::GameConfig;
    use crate::sim::geom::Rect;

    /// Active round-1 state with the player parked in the middle of the
    /// play zone and every monster moved out of the way
    fn active_state() -> GameState {
        let mut s = GameState::new(GameConfig::default(), 99);
        s.reset_game();
        s.drain_events();
        s.player.rect.x = 600;
        s.player.rect.y = 300;
        park_monsters(&mut s);
        s
    }

    fn park_monsters(s: &mut GameState) {
        let ids: Vec<MonsterId> = s.monsters.iter().map(|m| m.id).collect();
        for (i, id) in ids.into_iter().enumerate() {
            move_monster(s, id, 10 + i as i32 * 50, 110);
        }
    }

    fn move_monster(s: &mut GameState, id: MonsterId, x: i32, y: i32) {
        let m = s.monsters.get_mut(id).unwrap();
        m.rect = Rect::new(x, y, m.rect.w, m.rect.h);
    }

    fn target_and_other(s: &GameState) -> (MonsterId, MonsterId) {
        let target = s.target.unwrap();
        let target_name = &s.monsters.get(target).unwrap().name;
        let other = s
            .monsters
            .iter()
            .find(|m| &m.name != target_name)
            .unwrap()
            .id;
        (target, other)
    }

    #[test]
    fn test_no_overlap_no_change() {
        let mut s = active_state();
        let before = s.round;
        assert_eq!(resolve_collisions(&mut s), None);
        assert_eq!(s.round, before);
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn test_correct_catch_scores_and_retargets() {
        let mut s = active_state();
        let (target, _) = target_and_other(&s);
        move_monster(&mut s, target, 600, 300);
        let score = s.round.score;

        let outcome = resolve_collisions(&mut s).unwrap();
        assert_eq!(
            outcome,
            CollisionOutcome::Caught {
                id: target,
                points: 100,
                round_cleared: false
            }
        );
        assert_eq!(s.round.score, score + 100);
        assert_eq!(s.round.round, 1);
        assert!(!s.monsters.contains(target));
        assert!(s.target.is_some_and(|id| s.monsters.contains(id)));
        assert_eq!(s.phase, GamePhase::Active);
    }

    #[test]
    fn test_catch_points_use_round_number() {
        let mut s = active_state();
        s.new_round();
        s.new_round();
        park_monsters(&mut s);
        let (target, _) = target_and_other(&s);
        move_monster(&mut s, target, 600, 300);
        let score = s.round.score;

        resolve_collisions(&mut s);
        assert_eq!(s.round.score, score + 300);
        assert_eq!(s.round.round, 3);
    }

    #[test]
    fn test_wrong_catch_costs_a_life() {
        let mut s = active_state();
        let (_, other) = target_and_other(&s);
        move_monster(&mut s, other, 600, 300);
        let lives = s.player.lives;

        let outcome = resolve_collisions(&mut s).unwrap();
        assert_eq!(
            outcome,
            CollisionOutcome::WrongCatch {
                id: other,
                game_over: false
            }
        );
        assert_eq!(s.player.lives, lives - 1);
        assert!(s.monsters.contains(other));
        assert!(s.player.in_safe_zone(&s.zones));
        assert_eq!(
            s.drain_events(),
            vec![GameEvent::WrongCatch {
                lives_left: lives - 1
            }]
        );
    }

    #[test]
    fn test_last_life_is_game_over() {
        let mut s = active_state();
        let (_, other) = target_and_other(&s);
        move_monster(&mut s, other, 600, 300);
        s.player.lives = 1;

        let outcome = resolve_collisions(&mut s).unwrap();
        assert_eq!(
            outcome,
            CollisionOutcome::WrongCatch {
                id: other,
                game_over: true
            }
        );
        assert_eq!(s.player.lives, 0);
        assert_eq!(s.phase, GamePhase::GameOver);
        assert!(s
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::GameOver { .. })));
    }

    #[test]
    fn test_last_catch_clears_round() {
        let mut s = active_state();
        s.round.elapsed_secs = 9;
        // Catch every monster, retargeting each time
        loop {
            let target = s.target.unwrap();
            move_monster(&mut s, target, 600, 300);
            let outcome = resolve_collisions(&mut s).unwrap();
            s.player.rect.x = 600;
            s.player.rect.y = 300;
            if let CollisionOutcome::Caught {
                round_cleared: true,
                ..
            } = outcome
            {
                break;
            }
            park_monsters(&mut s);
        }
        assert!(s.monsters.is_empty());
        assert_eq!(s.target, None);
        assert_eq!(s.phase, GamePhase::RoundComplete);
        assert_eq!(s.round.score, 400);
        assert!(s.drain_events().contains(&GameEvent::RoundCleared {
            round: 1,
            elapsed_secs: 9,
            bonus: 1000
        }));
    }

    #[test]
    fn test_simultaneous_overlap_resolves_lowest_id() {
        let mut s = active_state();
        let (target, other) = target_and_other(&s);
        move_monster(&mut s, target, 600, 300);
        move_monster(&mut s, other, 605, 305);

        let outcome = resolve_collisions(&mut s).unwrap();
        let first = target.min(other);
        match outcome {
            CollisionOutcome::Caught { id, .. } | CollisionOutcome::WrongCatch { id, .. } => {
                assert_eq!(id, first)
            }
        }
    }
}
