//! Monster Tag entry point
//!
//! Loads the settings, sets up the terminal and runs the frame loop.

use std::fs::File;
use std::io::{self, BufWriter, Stdout, stdout};
use std::path::Path;
use std::process::ExitCode;
use std::sync::mpsc;
use std::time::{SystemTime, UNIX_EPOCH};

use crossterm::event::Event;

use monster_tag::audio::{AudioManager, TerminalBell};
use monster_tag::platform::{FrameClock, KeyTracker, TerminalSession, spawn_event_reader};
use monster_tag::renderer::{Canvas, TerminalCanvas, draw_frame};
use monster_tag::settings::DEFAULT_SETTINGS_PATH;
use monster_tag::sim::{GameEvent, GameState, tick};
use monster_tag::{ConfigError, GameConfig};

const LOG_FILE: &str = "monster-tag.log";

/// Everything the frame loop owns besides the terminal
struct Game {
    state: GameState,
    audio: AudioManager,
    keys: KeyTracker,
    canvas: TerminalCanvas<BufWriter<Stdout>>,
}

impl Game {
    fn new(config: GameConfig, seed: u64, release_events: bool) -> Self {
        let canvas = TerminalCanvas::new(
            BufWriter::new(stdout()),
            config.game.screen_size,
            config.game.cell_size,
        );
        let (cols, rows) = canvas.grid_size();
        log::info!("Drawing on a {}x{} cell grid", cols, rows);
        let audio = AudioManager::new(&config, Box::new(TerminalBell));
        Self {
            state: GameState::new(config, seed),
            audio,
            keys: KeyTracker::new(release_events),
            canvas,
        }
    }

    /// One input -> tick -> events -> draw cycle
    fn frame(&mut self, events: &mpsc::Receiver<Event>) -> io::Result<()> {
        while let Ok(event) = events.try_recv() {
            if let Event::Resize(..) = event {
                self.canvas.invalidate();
            }
            self.keys.handle_event(&event);
        }

        if self.keys.take_mute_toggle() {
            self.audio.toggle_mute();
        }
        let input = self.keys.snapshot();
        tick(&mut self.state, &input);

        let outcomes = self.state.drain_events();
        for event in &outcomes {
            log_event(event);
        }
        self.audio.handle_events(&outcomes);

        draw_frame(&mut self.canvas, &self.state);
        self.canvas.present()
    }

    fn run(&mut self, events: &mpsc::Receiver<Event>) -> io::Result<()> {
        let mut clock = FrameClock::new(self.state.fps());
        while !self.state.quit_requested {
            self.frame(events)?;
            clock.wait();
        }
        log::info!(
            "Leaving at round {} with score {}",
            self.state.round.round,
            self.state.round.score
        );
        Ok(())
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::RoundCleared { .. } | GameEvent::GameOver { .. } | GameEvent::Quit => {
            log::info!("{:?}", event)
        }
        _ => log::debug!("{:?}", event),
    }
}

/// Logs go to a file; the terminal belongs to the game
fn init_logging() {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    match File::create(LOG_FILE) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(e) => {
            eprintln!("cannot create {LOG_FILE}: {e}; logging disabled");
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    builder.init();
}

fn report_config_error(err: &ConfigError) {
    log::error!("{}", err);
    eprintln!("{err}");
    for issue in err.issues() {
        log::error!("  {}", issue);
        eprintln!("  {issue}");
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

fn main() -> ExitCode {
    init_logging();
    log::info!("Monster Tag starting...");

    let config = match GameConfig::load(Path::new(DEFAULT_SETTINGS_PATH)) {
        Ok(config) => config,
        Err(err) => {
            report_config_error(&err);
            return ExitCode::FAILURE;
        }
    };
    let seed = config.game.seed.unwrap_or_else(clock_seed);
    log::info!("Game initialized with seed: {}", seed);

    let result = TerminalSession::enter(stdout()).and_then(|session| {
        let events = spawn_event_reader();
        let mut game = Game::new(config, seed, session.keyboard_enhanced());
        game.run(&events)
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Terminal error: {}", e);
            eprintln!("terminal error: {e}");
            ExitCode::FAILURE
        }
    }
}
