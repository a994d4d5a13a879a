//! Sound effects for game events
//!
//! The game has no mixer: each effect resolves to the sound file named in the
//! settings, which is logged, and the terminal bell is rung as the audible
//! cue.

use std::io::Write;

use crate::settings::GameConfig;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Correct monster tagged, by template index
    Catch(usize),
    /// Wrong monster touched
    Die,
    /// Player warped to the safe zone
    Warp,
    /// A round has started, including the first one
    NextLevel,
    /// Out of lives
    GameOver,
}

impl SoundEffect {
    /// Effect triggered by a game event, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Caught { kind, .. } => Some(Self::Catch(*kind)),
            GameEvent::WrongCatch { lives_left } if *lives_left > 0 => Some(Self::Die),
            GameEvent::Warped { .. } => Some(Self::Warp),
            GameEvent::RoundStarted { .. } => Some(Self::NextLevel),
            GameEvent::GameOver { .. } => Some(Self::GameOver),
            _ => None,
        }
    }
}

/// Output device for sound cues
pub trait AudioSink {
    /// Play the sound at `path` with `volume` in `0.0..=1.0`
    fn play(&mut self, path: &str, volume: f32);
}

/// Rings BEL on stdout. Volume is ignored; the terminal decides.
#[derive(Debug, Default)]
pub struct TerminalBell;

impl AudioSink for TerminalBell {
    fn play(&mut self, _path: &str, _volume: f32) {
        let mut out = std::io::stdout();
        if out.write_all(b"\x07").and_then(|_| out.flush()).is_err() {
            log::warn!("Failed to ring terminal bell");
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Box<dyn AudioSink>,
    catch_sounds: Vec<String>,
    die_sound: String,
    warp_sound: String,
    next_level_sound: String,
    muted: bool,
}

/// Volume handed to the sink while unmuted
const VOLUME: f32 = 0.8;

impl AudioManager {
    pub fn new(config: &GameConfig, sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink,
            catch_sounds: config.monsters.iter().map(|m| m.sound.clone()).collect(),
            die_sound: config.player.die_sound.clone(),
            warp_sound: config.player.warp_sound.clone(),
            next_level_sound: config.game.next_level_sound.clone(),
            muted: false,
        }
    }

    /// Flip mute on or off; returns whether audio is now muted
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        log::info!("Audio {}", if self.muted { "muted" } else { "unmuted" });
        self.muted
    }

    /// Configured sound file for an effect
    pub fn sound_path(&self, effect: SoundEffect) -> Option<&str> {
        match effect {
            SoundEffect::Catch(kind) => self.catch_sounds.get(kind).map(String::as_str),
            SoundEffect::Die | SoundEffect::GameOver => Some(&self.die_sound),
            SoundEffect::Warp => Some(&self.warp_sound),
            SoundEffect::NextLevel => Some(&self.next_level_sound),
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        if self.muted {
            return;
        }
        let Some(path) = self.sound_path(effect).map(str::to_owned) else {
            log::warn!("No sound configured for {:?}", effect);
            return;
        };
        log::debug!("Playing {:?} ({})", effect, path);
        self.sink.play(&path, VOLUME);
    }

    /// Play whatever the given events call for, in order
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect);
        }
    }
}
