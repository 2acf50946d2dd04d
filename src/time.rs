//! Frame timing for the window host.
//!
//! The animation itself is frame-based (velocities are pixels per frame), so
//! time never feeds the simulation. The clock only counts frames, measures
//! FPS for the window title, and carries the pause state.
//!
//! # Example
//!
//! ```ignore
//! let mut clock = FrameClock::new();
//!
//! // once per presented frame:
//! if clock.tick() {
//!     window.set_title(&format!("neuralbg - {:.0} fps", clock.fps()));
//! }
//! ```

use std::time::{Duration, Instant};

/// Frame counter with periodic FPS sampling and pause support.
#[derive(Debug)]
pub struct FrameClock {
    /// Frames counted while running.
    frame_count: u64,
    /// FPS at the last sample.
    fps: f32,
    /// Frame count at the last sample.
    sample_frame: u64,
    /// Time of the last sample.
    sample_time: Instant,
    /// How often FPS is recomputed.
    sample_interval: Duration,
    paused: bool,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_interval(Duration::from_millis(500))
    }

    /// Clock that recomputes FPS every `interval`.
    pub fn with_interval(interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            frame_count: 0,
            fps: 0.0,
            sample_frame: 0,
            sample_time: now,
            sample_interval: interval,
            paused: false,
        }
    }

    /// Count one frame. Returns `true` when a new FPS sample is available.
    ///
    /// Paused clocks do not count frames.
    pub fn tick(&mut self) -> bool {
        if self.paused {
            return false;
        }
        self.frame_count += 1;

        let now = Instant::now();
        let since = now.duration_since(self.sample_time);
        if since < self.sample_interval {
            return false;
        }

        let frames = self.frame_count - self.sample_frame;
        self.fps = frames as f32 / since.as_secs_f32();
        self.sample_frame = self.frame_count;
        self.sample_time = now;
        true
    }

    /// Frames counted since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// FPS at the last sample.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Flip the pause state. Returns the new state.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        if !self.paused {
            // Restart sampling so the pause does not drag the FPS down.
            self.sample_time = Instant::now();
            self.sample_frame = self.frame_count;
        }
        self.paused
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
