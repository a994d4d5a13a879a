//! Keyboard input
//!
//! Terminals report key presses, not key state. `KeyTracker` rebuilds held
//! direction keys from the event stream:
//! * with keyboard enhancement (kitty protocol) a key is held from `Press`
//!   until its `Release`;
//! * otherwise a key counts as held while its last press or auto-repeat is
//!   at most `HOLD_WINDOW` frames old.
//!
//! One-shot actions latch on `Press` and are cleared by `snapshot`. Mute is
//! a frontend toggle and never reaches the simulation.

use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::sim::{Directions, TickInput};

/// Frames a key stays held after its last press or repeat when the terminal
/// does not report releases. OS key repeat runs at 15 Hz or faster, which
/// refreshes the key well inside this window at 30 fps.
pub const HOLD_WINDOW: u64 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Dir {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Move(Dir),
    Warp,
    Pause,
    Confirm,
    Reset,
    Mute,
    Quit,
}

fn action_for(key: &KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c' | 'C')).then_some(Action::Quit);
    }
    let action = match key.code {
        KeyCode::Up | KeyCode::Char('w' | 'W') => Action::Move(Dir::Up),
        KeyCode::Down | KeyCode::Char('s' | 'S') => Action::Move(Dir::Down),
        KeyCode::Left | KeyCode::Char('a' | 'A') => Action::Move(Dir::Left),
        KeyCode::Right | KeyCode::Char('d' | 'D') => Action::Move(Dir::Right),
        KeyCode::Char(' ') => Action::Warp,
        KeyCode::Char('p' | 'P') => Action::Pause,
        KeyCode::Enter => Action::Confirm,
        KeyCode::Char('r' | 'R') => Action::Reset,
        KeyCode::Char('m' | 'M') => Action::Mute,
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Action::Quit,
        _ => return None,
    };
    Some(action)
}

/// Turns terminal key events into per-frame `TickInput` snapshots
#[derive(Debug, Default)]
pub struct KeyTracker {
    /// Frame each held direction was last seen
    held: HashMap<Dir, u64>,
    frame: u64,
    /// Terminal sends release events
    release_events: bool,
    pending: TickInput,
    mute_toggled: bool,
}

impl KeyTracker {
    pub fn new(release_events: bool) -> Self {
        Self {
            release_events,
            ..Default::default()
        }
    }

    pub fn handle_event(&mut self, event: &Event) {
        if let Event::Key(key) = event {
            self.handle_key(key);
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent) {
        let Some(action) = action_for(key) else {
            return;
        };
        match (key.kind, action) {
            (KeyEventKind::Press | KeyEventKind::Repeat, Action::Move(dir)) => {
                self.held.insert(dir, self.frame);
            }
            (KeyEventKind::Release, Action::Move(dir)) => {
                self.held.remove(&dir);
            }
            (KeyEventKind::Press, action) => self.latch(action),
            _ => {}
        }
    }

    fn latch(&mut self, action: Action) {
        let pending = &mut self.pending;
        match action {
            Action::Warp => pending.warp = true,
            Action::Pause => pending.pause = true,
            Action::Confirm => pending.confirm = true,
            Action::Reset => pending.reset = true,
            Action::Quit => pending.quit = true,
            Action::Mute => self.mute_toggled = !self.mute_toggled,
            Action::Move(_) => {}
        }
    }

    /// Whether mute was toggled since the last call
    pub fn take_mute_toggle(&mut self) -> bool {
        std::mem::take(&mut self.mute_toggled)
    }

    fn is_held(&self, dir: Dir) -> bool {
        self.held.get(&dir).is_some_and(|&last| {
            self.release_events || self.frame.saturating_sub(last) <= HOLD_WINDOW
        })
    }

    /// Input for the frame about to run. Clears one-shot actions and advances
    /// the frame counter.
    pub fn snapshot(&mut self) -> TickInput {
        let mut input = std::mem::take(&mut self.pending);
        input.dirs = Directions {
            up: self.is_held(Dir::Up),
            down: self.is_held(Dir::Down),
            left: self.is_held(Dir::Left),
            right: self.is_held(Dir::Right),
        };
        if !self.release_events {
            let frame = self.frame;
            self.held
                .retain(|_, last| frame.saturating_sub(*last) <= HOLD_WINDOW);
        }
        self.frame += 1;
        input
    }
}

/// Read terminal events on a dedicated thread so the frame loop never blocks
/// on input. The thread ends when the receiver is dropped or reading fails.
pub fn spawn_event_reader() -> mpsc::Receiver<Event> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    log::error!("Terminal event read failed: {}", e);
                    break;
                }
            }
        }
    });
    rx
}
