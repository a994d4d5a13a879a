//! Frame composition: turns a `GameState` into canvas calls

use glam::IVec2;

use super::{Canvas, TextAlign};
use crate::sim::{GamePhase, GameState, Rect};

/// Horizontal padding of HUD text from the screen edges
const HUD_MARGIN: i32 = 15;
/// Vertical distance between HUD lines
const HUD_LINE: i32 = 25;
/// Gap between the headline and the prompt of an overlay
const OVERLAY_GAP: i32 = 40;

const SAFE_ZONE_HINT: &str = "Safe Zone (press space to come here)";

/// Draw one complete frame. The caller presents it.
pub fn draw_frame(canvas: &mut impl Canvas, state: &GameState) {
    let config = &state.config;
    canvas.clear(config.game.background);

    draw_safe_zone(canvas, state);

    for monster in state.monsters.iter() {
        if let Some(template) = config.template(monster.kind) {
            canvas.draw_sprite(monster.rect, &template.glyph, template.color);
        }
    }
    canvas.draw_sprite(state.player.rect, &config.player.glyph, config.player.color);

    draw_dashboard(canvas, state);

    // Play zone border takes the colour of the monster to catch
    let border = state
        .target_template()
        .map_or(config.dashboard.font_color, |t| t.color);
    canvas.outline_rect(state.zones.play, border);

    if let Some((headline, prompt)) = overlay_text(state) {
        let center = IVec2::new(state.zones.screen.center_x(), state.zones.screen.center_y());
        let color = config.game.font_color;
        canvas.draw_text(center, &headline, color, TextAlign::Center);
        canvas.draw_text(
            center + IVec2::new(0, OVERLAY_GAP),
            &format!("Press 'Enter' to {prompt}"),
            color,
            TextAlign::Center,
        );
    }
}

fn draw_safe_zone(canvas: &mut impl Canvas, state: &GameState) {
    let zone = state.zones.safe;
    let settings = &state.config.safe_zone;
    canvas.fill_rect(zone, settings.background);
    canvas.draw_text(
        IVec2::new(zone.center_x(), zone.top() + HUD_LINE),
        SAFE_ZONE_HINT,
        settings.font_color,
        TextAlign::Center,
    );
}

fn draw_dashboard(canvas: &mut impl Canvas, state: &GameState) {
    let zone = state.zones.dashboard;
    let settings = &state.config.dashboard;
    let color = settings.font_color;
    canvas.fill_rect(zone, settings.background);

    let line = |n: i32| zone.top() + HUD_LINE * (n + 1) - HUD_LINE / 2;
    let left = zone.left() + HUD_MARGIN;
    let right = zone.right() - HUD_MARGIN;
    let round = &state.round;

    canvas.draw_text(
        IVec2::new(left, line(0)),
        &format!("Score: {}", round.score),
        color,
        TextAlign::Left,
    );
    canvas.draw_text(
        IVec2::new(left, line(1)),
        &format!("Current Round: {}", round.round),
        color,
        TextAlign::Left,
    );
    canvas.draw_text(
        IVec2::new(right, line(0)),
        &format!("Lives: {}", state.player.lives),
        color,
        TextAlign::Right,
    );
    canvas.draw_text(
        IVec2::new(right, line(1)),
        &format!("Warps: {}", state.player.warps),
        color,
        TextAlign::Right,
    );
    canvas.draw_text(
        IVec2::new(right, line(2)),
        &format!("Round Time: {}", round.elapsed_secs),
        color,
        TextAlign::Right,
    );

    canvas.draw_text(
        IVec2::new(zone.center_x(), line(0)),
        "Current Catch",
        color,
        TextAlign::Center,
    );
    if let Some(template) = state.target_template() {
        let size = template.size;
        let pos = IVec2::new(zone.center_x() - size.x / 2, line(1) - HUD_LINE / 2);
        canvas.draw_sprite(Rect::from_pos_size(pos, size), &template.glyph, template.color);
    }
}

/// Headline and "Press 'Enter' to ..." prompt for modal phases
fn overlay_text(state: &GameState) -> Option<(String, &'static str)> {
    match state.phase {
        GamePhase::Active => None,
        GamePhase::Title => Some((state.config.game.title.clone(), "start")),
        GamePhase::Paused => Some(("PAUSED".to_string(), "continue")),
        GamePhase::RoundComplete => Some((
            format!(
                "level {} completed on {} sec. Bonus Points : {}",
                state.round.round,
                state.round.elapsed_secs,
                state.round.pending_bonus()
            ),
            "start next level",
        )),
        GamePhase::GameOver => Some(("Game Over".to_string(), "play again")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{GameConfig, Rgb};
    use std::io;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Clear(Rgb),
        Fill(Rect, Rgb),
        Outline(Rect, Rgb),
        Sprite(Rect, String, Rgb),
        Text(IVec2, String, TextAlign),
    }

    #[derive(Default)]
    struct Recorder {
        ops: Vec<Op>,
    }

    impl Recorder {
        fn texts(&self) -> Vec<&str> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Text(_, text, _) => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }
    }

    impl Canvas for Recorder {
        fn clear(&mut self, color: Rgb) {
            self.ops.push(Op::Clear(color));
        }
        fn fill_rect(&mut self, rect: Rect, color: Rgb) {
            self.ops.push(Op::Fill(rect, color));
        }
        fn outline_rect(&mut self, rect: Rect, color: Rgb) {
            self.ops.push(Op::Outline(rect, color));
        }
        fn draw_sprite(&mut self, rect: Rect, glyph: &str, color: Rgb) {
            self.ops.push(Op::Sprite(rect, glyph.to_string(), color));
        }
        fn draw_text(&mut self, pos: IVec2, text: &str, _color: Rgb, align: TextAlign) {
            self.ops.push(Op::Text(pos, text.to_string(), align));
        }
        fn present(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn active() -> GameState {
        let mut state = GameState::new(GameConfig::default(), 5);
        state.reset_game();
        state
    }

    fn render(state: &GameState) -> Recorder {
        let mut canvas = Recorder::default();
        draw_frame(&mut canvas, state);
        canvas
    }

    #[test]
    fn test_draw_order() {
        let state = active();
        let canvas = render(&state);
        let ops = &canvas.ops;

        assert_eq!(ops[0], Op::Clear(state.config.game.background));
        assert_eq!(
            ops[1],
            Op::Fill(state.zones.safe, state.config.safe_zone.background)
        );

        let player_at = ops
            .iter()
            .position(|op| matches!(op, Op::Sprite(r, _, _) if *r == state.player.rect))
            .unwrap();
        let dashboard_at = ops
            .iter()
            .position(|op| matches!(op, Op::Fill(r, _) if *r == state.zones.dashboard))
            .unwrap();
        let monster_sprites = ops[..player_at]
            .iter()
            .filter(|op| matches!(op, Op::Sprite(..)))
            .count();
        assert_eq!(monster_sprites, state.monsters.len());
        assert!(player_at < dashboard_at);
        assert!(matches!(ops.last(), Some(Op::Outline(..))));
    }

    #[test]
    fn test_dashboard_shows_round_state() {
        let mut state = active();
        state.round.score = 1234;
        state.round.elapsed_secs = 17;
        state.player.lives = 3;
        let canvas = render(&state);
        let texts = canvas.texts();
        for expected in [
            "Score: 1234",
            "Current Round: 1",
            "Lives: 3",
            "Warps: 3",
            "Round Time: 17",
            "Current Catch",
            SAFE_ZONE_HINT,
        ] {
            assert!(texts.contains(&expected), "missing {expected:?} in {texts:?}");
        }
    }

    #[test]
    fn test_target_shown_and_border_colored() {
        let state = active();
        let template = state.target_template().unwrap().clone();
        let canvas = render(&state);

        let dashboard = state.zones.dashboard;
        assert!(canvas.ops.iter().any(|op| matches!(
            op,
            Op::Sprite(r, g, c) if dashboard.contains_rect(r) && *g == template.glyph && *c == template.color
        )));
        assert_eq!(
            canvas.ops.last(),
            Some(&Op::Outline(state.zones.play, template.color))
        );
    }

    #[test]
    fn test_no_overlay_while_active() {
        let state = active();
        let canvas = render(&state);
        assert!(!canvas.texts().iter().any(|t| t.starts_with("Press")));
    }

    #[test]
    fn test_overlays_per_phase() {
        let title = GameState::new(GameConfig::default(), 5);
        let texts = render(&title).ops;
        assert!(texts.contains(&Op::Text(
            IVec2::new(600, 300),
            title.config.game.title.clone(),
            TextAlign::Center
        )));

        let mut state = active();
        state.phase = GamePhase::Paused;
        let canvas = render(&state);
        assert!(canvas.texts().contains(&"PAUSED"));
        assert!(canvas.texts().contains(&"Press 'Enter' to continue"));

        state.phase = GamePhase::GameOver;
        let canvas = render(&state);
        assert!(canvas.texts().contains(&"Game Over"));
        assert!(canvas.texts().contains(&"Press 'Enter' to play again"));

        state.phase = GamePhase::RoundComplete;
        state.round.elapsed_secs = 4;
        let canvas = render(&state);
        assert!(
            canvas
                .texts()
                .contains(&"level 1 completed on 4 sec. Bonus Points : 2000")
        );
    }

    #[test]
    fn test_cleared_round_has_neutral_border() {
        let mut state = active();
        state.monsters.clear();
        state.target = None;
        state.phase = GamePhase::RoundComplete;
        let canvas = render(&state);
        assert!(canvas.ops.contains(&Op::Outline(
            state.zones.play,
            state.config.dashboard.font_color
        )));
    }
}
