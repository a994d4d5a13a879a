//! Game configuration
//!
//! Loaded once at startup from a JSON file and passed by reference into every
//! component. The file is read into an all-optional raw schema first so that
//! validation can report every missing or invalid field at once instead of
//! stopping at the first one.

use std::fmt;
use std::path::{Path, PathBuf};

use glam::IVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::DEFAULT_FPS;

/// Default settings file, relative to the working directory
pub const DEFAULT_SETTINGS_PATH: &str = "settings/monsters.json";

/// An RGB colour, written as `[r, g, b]` in the settings file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Overall game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
    pub title: String,
    /// Target frame rate; also the number of frames per round-timer second
    pub fps: u32,
    /// Logical screen size in pixels
    pub screen_size: IVec2,
    /// Logical pixels covered by one terminal cell
    pub cell_size: IVec2,
    pub background: Rgb,
    pub font_color: Rgb,
    /// Fixed RNG seed; wall-clock seeded when absent
    pub seed: Option<u64>,
    pub next_level_sound: String,
}

/// Player settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSettings {
    pub lives: u32,
    pub warps: u32,
    /// Pixels moved per frame per held direction
    pub velocity: i32,
    pub size: IVec2,
    pub glyph: String,
    pub color: Rgb,
    pub die_sound: String,
    pub warp_sound: String,
}

/// Dashboard and safe zone share the same shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSettings {
    pub height: i32,
    pub background: Rgb,
    pub font_color: Rgb,
}

/// One monster type. Every round spawns `round` copies of each template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterTemplate {
    /// Identity used to decide whether a catch matches the target
    pub name: String,
    pub size: IVec2,
    pub color: Rgb,
    pub glyph: String,
    /// Played when a monster of this type is caught
    pub sound: String,
}

/// Fully validated configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub game: GameSettings,
    pub player: PlayerSettings,
    pub dashboard: ZoneSettings,
    pub safe_zone: ZoneSettings,
    pub monsters: Vec<MonsterTemplate>,
}

/// What is wrong with a single field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Problem {
    #[error("missing")]
    Missing,
    #[error("{0}")]
    Invalid(String),
}

/// A field that failed validation, named by its dotted path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub problem: Problem,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`: {}", self.field, self.problem)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed settings in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{} invalid field(s) in {}", .issues.len(), .path.display())]
    Invalid { path: PathBuf, issues: Vec<FieldIssue> },
}

impl ConfigError {
    /// Field issues for `Invalid`, empty otherwise
    pub fn issues(&self) -> &[FieldIssue] {
        match self {
            ConfigError::Invalid { issues, .. } => issues,
            _ => &[],
        }
    }
}

// === Raw schema ===

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    game: Option<RawGame>,
    player: Option<RawPlayer>,
    dashboard: Option<RawZone>,
    safe_zone: Option<RawZone>,
    monsters: Option<Vec<RawMonster>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawGame {
    title: Option<String>,
    fps: Option<u32>,
    screen_size: Option<[i32; 2]>,
    cell_size: Option<[i32; 2]>,
    background: Option<Rgb>,
    font_color: Option<Rgb>,
    seed: Option<u64>,
    sounds: Option<RawGameSounds>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawGameSounds {
    next_level: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPlayer {
    lives: Option<u32>,
    warps: Option<u32>,
    velocity: Option<i32>,
    size: Option<[i32; 2]>,
    glyph: Option<String>,
    color: Option<Rgb>,
    sounds: Option<RawPlayerSounds>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPlayerSounds {
    die: Option<String>,
    warp: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawZone {
    height: Option<i32>,
    background: Option<Rgb>,
    font_color: Option<Rgb>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMonster {
    name: Option<String>,
    size: Option<[i32; 2]>,
    color: Option<Rgb>,
    glyph: Option<String>,
    sound: Option<String>,
}

/// Collects issues while pulling values out of the raw schema.
///
/// Missing values are replaced by a placeholder so that validation can keep
/// going; the placeholder never escapes because any issue fails the build.
#[derive(Default)]
struct Validator {
    issues: Vec<FieldIssue>,
}

impl Validator {
    fn missing(&mut self, field: &str) {
        self.issues.push(FieldIssue {
            field: field.to_string(),
            problem: Problem::Missing,
        });
    }

    fn invalid(&mut self, field: &str, reason: impl Into<String>) {
        self.issues.push(FieldIssue {
            field: field.to_string(),
            problem: Problem::Invalid(reason.into()),
        });
    }

    fn require<T: Default>(&mut self, field: &str, value: Option<T>) -> T {
        value.unwrap_or_else(|| {
            self.missing(field);
            T::default()
        })
    }

    fn positive(&mut self, field: &str, value: Option<i32>) -> i32 {
        match value {
            Some(n) if n <= 0 => {
                self.invalid(field, format!("must be positive, got {n}"));
                n
            }
            Some(n) => n,
            None => {
                self.missing(field);
                1
            }
        }
    }

    fn size(&mut self, field: &str, value: Option<[i32; 2]>) -> IVec2 {
        match value {
            Some([w, h]) => {
                if w <= 0 || h <= 0 {
                    self.invalid(field, format!("must be positive, got [{w}, {h}]"));
                }
                IVec2::new(w, h)
            }
            None => {
                self.missing(field);
                IVec2::ONE
            }
        }
    }

    fn text(&mut self, field: &str, value: Option<String>) -> String {
        match value {
            Some(s) if s.trim().is_empty() => {
                self.invalid(field, "must not be empty");
                s
            }
            Some(s) => s,
            None => {
                self.missing(field);
                String::new()
            }
        }
    }

    fn zone(&mut self, name: &str, raw: Option<RawZone>) -> ZoneSettings {
        let zone = raw.unwrap_or_default();
        ZoneSettings {
            height: self.positive(&format!("{name}.height"), zone.height),
            background: self.require(&format!("{name}.background"), zone.background),
            font_color: self.require(&format!("{name}.font_color"), zone.font_color),
        }
    }

    /// Zones must leave room for a play zone that every sprite fits in
    fn layout(&mut self, config: &GameConfig) {
        let screen = config.game.screen_size;
        let play_height = config.play_height();
        if play_height <= 0 {
            self.invalid(
                "game.screen_size",
                format!(
                    "height {} leaves no play zone under a {}px dashboard and {}px safe zone",
                    screen.y, config.dashboard.height, config.safe_zone.height
                ),
            );
            return;
        }

        let fits = |size: IVec2| size.x <= screen.x && size.y <= play_height;
        if !fits(config.player.size) {
            self.invalid("player.size", "does not fit inside the play zone");
        } else if config.player.size.y > config.safe_zone.height {
            self.invalid("player.size", "taller than the safe zone");
        }
        for (i, m) in config.monsters.iter().enumerate() {
            if !fits(m.size) {
                self.invalid(
                    &format!("monsters[{i}].size"),
                    "does not fit inside the play zone",
                );
            }
        }
    }

    fn monster(&mut self, index: usize, raw: RawMonster) -> MonsterTemplate {
        let prefix = format!("monsters[{index}]");
        MonsterTemplate {
            name: self.text(&format!("{prefix}.name"), raw.name),
            size: self.size(&format!("{prefix}.size"), raw.size),
            color: self.require(&format!("{prefix}.color"), raw.color),
            glyph: self.text(&format!("{prefix}.glyph"), raw.glyph),
            sound: self.text(&format!("{prefix}.sound"), raw.sound),
        }
    }
}

impl RawConfig {
    /// Every leaf field is checked; a missing section reports each of its
    /// fields as missing.
    fn validate(self) -> Result<GameConfig, Vec<FieldIssue>> {
        let mut v = Validator::default();

        let game = self.game.unwrap_or_default();
        let sounds = game.sounds.unwrap_or_default();
        let fps = v.require("game.fps", game.fps);
        if game.fps.is_some() && !(1..=240).contains(&fps) {
            v.invalid("game.fps", format!("must be between 1 and 240, got {fps}"));
        }
        let game = GameSettings {
            title: v.text("game.title", game.title),
            fps,
            screen_size: v.size("game.screen_size", game.screen_size),
            cell_size: v.size("game.cell_size", game.cell_size),
            background: v.require("game.background", game.background),
            font_color: v.require("game.font_color", game.font_color),
            seed: game.seed,
            next_level_sound: v.text("game.sounds.next_level", sounds.next_level),
        };

        let player = self.player.unwrap_or_default();
        let player_sounds = player.sounds.unwrap_or_default();
        let lives = v.require("player.lives", player.lives);
        if player.lives.is_some() && lives == 0 {
            v.invalid("player.lives", "must be at least 1");
        }
        let player = PlayerSettings {
            lives,
            warps: v.require("player.warps", player.warps),
            velocity: v.positive("player.velocity", player.velocity),
            size: v.size("player.size", player.size),
            glyph: v.text("player.glyph", player.glyph),
            color: v.require("player.color", player.color),
            die_sound: v.text("player.sounds.die", player_sounds.die),
            warp_sound: v.text("player.sounds.warp", player_sounds.warp),
        };

        let dashboard = v.zone("dashboard", self.dashboard);
        let safe_zone = v.zone("safe_zone", self.safe_zone);

        let mut monsters: Vec<MonsterTemplate> = Vec::new();
        match self.monsters {
            None => v.missing("monsters"),
            Some(raw) if raw.is_empty() => {
                v.invalid("monsters", "at least one monster type is required")
            }
            Some(raw) => {
                for (i, m) in raw.into_iter().enumerate() {
                    let template = v.monster(i, m);
                    if !template.name.is_empty()
                        && monsters.iter().any(|t| t.name == template.name)
                    {
                        v.invalid(
                            &format!("monsters[{i}].name"),
                            format!("duplicate monster name {:?}", template.name),
                        );
                    }
                    monsters.push(template);
                }
            }
        }

        if !v.issues.is_empty() {
            return Err(v.issues);
        }
        let config = GameConfig {
            game,
            player,
            dashboard,
            safe_zone,
            monsters,
        };
        // Layout checks only make sense once the dimensions themselves are sane
        v.layout(&config);
        if v.issues.is_empty() {
            Ok(config)
        } else {
            Err(v.issues)
        }
    }
}

impl GameConfig {
    /// Load settings from `path`, falling back to the built-in defaults when
    /// the file does not exist. A file that exists but is malformed or
    /// incomplete is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::warn!(
                "Settings file {} not found, using built-in defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json, path)?;
        log::info!(
            "Loaded settings from {} ({} monster types)",
            path.display(),
            config.monsters.len()
        );
        Ok(config)
    }

    /// Parse and validate settings. `origin` is only used in error reports.
    pub fn from_json_str(json: &str, origin: &Path) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        raw.validate().map_err(|issues| ConfigError::Invalid {
            path: origin.to_path_buf(),
            issues,
        })
    }

    /// Height of the play zone between dashboard and safe zone
    pub fn play_height(&self) -> i32 {
        self.game.screen_size.y - self.dashboard.height - self.safe_zone.height
    }

    /// Template by index
    pub fn template(&self, kind: usize) -> Option<&MonsterTemplate> {
        self.monsters.get(kind)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        let monster = |name: &str, glyph: &str, color: Rgb| MonsterTemplate {
            name: name.to_string(),
            size: IVec2::new(45, 40),
            color,
            glyph: glyph.to_string(),
            sound: format!("assets/sounds/catch_{}.wav", name.to_lowercase()),
        };

        Self {
            game: GameSettings {
                title: "Monster Tag".to_string(),
                fps: DEFAULT_FPS,
                screen_size: IVec2::new(1200, 600),
                cell_size: IVec2::new(15, 20),
                background: Rgb(10, 10, 25),
                font_color: Rgb(230, 230, 230),
                seed: None,
                next_level_sound: "assets/sounds/next_level.wav".to_string(),
            },
            player: PlayerSettings {
                lives: 5,
                warps: 2,
                velocity: 6,
                size: IVec2::new(30, 40),
                glyph: "@".to_string(),
                color: Rgb(255, 255, 255),
                die_sound: "assets/sounds/die.wav".to_string(),
                warp_sound: "assets/sounds/warp.wav".to_string(),
            },
            dashboard: ZoneSettings {
                height: 100,
                background: Rgb(30, 30, 60),
                font_color: Rgb(255, 220, 120),
            },
            safe_zone: ZoneSettings {
                height: 100,
                background: Rgb(20, 60, 30),
                font_color: Rgb(200, 255, 200),
            },
            monsters: vec![
                monster("Goblin", "G", Rgb(80, 200, 80)),
                monster("Slime", "o", Rgb(80, 160, 255)),
                monster("Ghost", "W", Rgb(230, 230, 255)),
                monster("Imp", "&", Rgb(255, 90, 90)),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> &'static Path {
        Path::new("test.json")
    }

    fn default_json() -> serde_json::Value {
        serde_json::json!({
            "game": {
                "title": "Monster Tag",
                "fps": 30,
                "screen_size": [1200, 600],
                "cell_size": [15, 20],
                "background": [10, 10, 25],
                "font_color": [230, 230, 230],
                "sounds": { "next_level": "next.wav" }
            },
            "player": {
                "lives": 3,
                "warps": 2,
                "velocity": 5,
                "size": [30, 40],
                "glyph": "@",
                "color": [255, 255, 255],
                "sounds": { "die": "die.wav", "warp": "warp.wav" }
            },
            "dashboard": { "height": 100, "background": [0, 0, 0], "font_color": [255, 255, 255] },
            "safe_zone": { "height": 100, "background": [0, 40, 0], "font_color": [255, 255, 255] },
            "monsters": [
                { "name": "Goblin", "size": [45, 40], "color": [0, 255, 0], "glyph": "G", "sound": "g.wav" },
                { "name": "Slime", "size": [45, 40], "color": [0, 0, 255], "glyph": "o", "sound": "s.wav" }
            ]
        })
    }

    #[test]
    fn test_valid_config_parses() {
        let config = GameConfig::from_json_str(&default_json().to_string(), origin()).unwrap();
        assert_eq!(config.game.fps, 30);
        assert_eq!(config.player.lives, 3);
        assert_eq!(config.monsters.len(), 2);
        assert_eq!(config.monsters[1].name, "Slime");
        assert_eq!(config.play_height(), 400);
        assert_eq!(config.game.seed, None);
    }

    #[test]
    fn test_reports_every_missing_field() {
        let mut json = default_json();
        json["player"].as_object_mut().unwrap().remove("lives");
        json["dashboard"].as_object_mut().unwrap().remove("height");
        json["monsters"][1].as_object_mut().unwrap().remove("glyph");

        let err = GameConfig::from_json_str(&json.to_string(), origin()).unwrap_err();
        let fields: Vec<&str> = err.issues().iter().map(|i| i.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["player.lives", "dashboard.height", "monsters[1].glyph"]
        );
        assert!(err.issues().iter().all(|i| i.problem == Problem::Missing));
    }

    #[test]
    fn test_missing_section_reports_its_fields() {
        let mut json = default_json();
        json.as_object_mut().unwrap().remove("safe_zone");
        let err = GameConfig::from_json_str(&json.to_string(), origin()).unwrap_err();
        let fields: Vec<&str> = err.issues().iter().map(|i| i.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["safe_zone.height", "safe_zone.background", "safe_zone.font_color"]
        );
    }

    #[test]
    fn test_rejects_zones_taller_than_screen() {
        let mut json = default_json();
        json["dashboard"]["height"] = serde_json::json!(300);
        json["safe_zone"]["height"] = serde_json::json!(300);
        let err = GameConfig::from_json_str(&json.to_string(), origin()).unwrap_err();
        assert_eq!(err.issues().len(), 1);
        assert_eq!(err.issues()[0].field, "game.screen_size");
    }

    #[test]
    fn test_rejects_sprites_taller_than_play_zone() {
        let mut json = default_json();
        json["monsters"][0]["size"] = serde_json::json!([45, 401]);
        json["player"]["size"] = serde_json::json!([30, 120]);
        let err = GameConfig::from_json_str(&json.to_string(), origin()).unwrap_err();
        let fields: Vec<&str> = err.issues().iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["player.size", "monsters[0].size"]);
    }

    #[test]
    fn test_rejects_duplicate_monster_names() {
        let mut json = default_json();
        json["monsters"][1]["name"] = serde_json::json!("Goblin");
        let err = GameConfig::from_json_str(&json.to_string(), origin()).unwrap_err();
        assert_eq!(err.issues()[0].field, "monsters[1].name");
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let mut json = default_json();
        json["game"]["fps"] = serde_json::json!(0);
        json["player"]["velocity"] = serde_json::json!(-2);
        json["monsters"] = serde_json::json!([]);
        let err = GameConfig::from_json_str(&json.to_string(), origin()).unwrap_err();
        let fields: Vec<&str> = err.issues().iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["game.fps", "player.velocity", "monsters"]);
    }

    #[test]
    fn test_wrong_type_is_a_parse_error() {
        let mut json = default_json();
        json["game"]["fps"] = serde_json::json!("fast");
        let err = GameConfig::from_json_str(&json.to_string(), origin()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_bundled_settings_file_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_SETTINGS_PATH);
        let json = std::fs::read_to_string(&path).unwrap();
        let config = GameConfig::from_json_str(&json, &path).unwrap();
        assert_eq!(config, GameConfig::default());
    }
}
