//! Frame pacing

use std::thread;
use std::time::{Duration, Instant};

/// Sleeps away whatever is left of each frame
#[derive(Debug)]
pub struct FrameClock {
    frame: Duration,
    frame_start: Instant,
}

impl FrameClock {
    pub fn new(fps: u32) -> Self {
        Self {
            frame: Self::frame_duration(fps),
            frame_start: Instant::now(),
        }
    }

    /// Length of one frame at `fps`, at least one frame per second
    pub fn frame_duration(fps: u32) -> Duration {
        Duration::from_secs(1) / fps.max(1)
    }

    pub fn frame(&self) -> Duration {
        self.frame
    }

    /// Block until the current frame has lasted a full frame, then start the
    /// next one. Returns how long it slept; zero when the frame overran.
    pub fn wait(&mut self) -> Duration {
        let elapsed = self.frame_start.elapsed();
        let remaining = self.frame.saturating_sub(elapsed);
        if remaining.is_zero() {
            log::trace!("Frame overran by {:?}", elapsed - self.frame);
        } else {
            thread::sleep(remaining);
        }
        self.frame_start = Instant::now();
        remaining
    }
}
