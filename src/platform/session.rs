//! Terminal setup and restore

use std::io::{self, Write};

use crossterm::{
    ExecutableCommand, cursor,
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    terminal,
};

/// Raw mode, alternate screen and hidden cursor for as long as it lives.
/// Dropping it puts the terminal back, including on early returns.
pub struct TerminalSession<W: Write> {
    out: W,
    keyboard_enhanced: bool,
}

impl<W: Write> TerminalSession<W> {
    pub fn enter(mut out: W) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        out.execute(terminal::EnterAlternateScreen)?;
        out.execute(cursor::Hide)?;

        // Ask for press/repeat/release events; terminals without the kitty
        // protocol simply ignore this
        let keyboard_enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false)
            && out
                .execute(PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
                ))
                .is_ok();
        log::info!(
            "Terminal ready (key release events: {})",
            if keyboard_enhanced { "yes" } else { "no" }
        );

        Ok(Self {
            out,
            keyboard_enhanced,
        })
    }

    /// Whether the terminal reports key releases
    pub fn keyboard_enhanced(&self) -> bool {
        self.keyboard_enhanced
    }
}

impl<W: Write> Drop for TerminalSession<W> {
    fn drop(&mut self) {
        if self.keyboard_enhanced {
            let _ = self.out.execute(PopKeyboardEnhancementFlags);
        }
        let _ = self.out.execute(cursor::Show);
        let _ = self.out.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        log::info!("Terminal restored");
    }
}
