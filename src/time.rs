//! Time sources for the animation loop.
//!
//! The loop samples a [`Clock`] exactly once per tick and feeds that single
//! value to both the wave field and the light flicker.
//!
//! - [`Time`] follows the wall clock and also tracks frame count and FPS.
//! - [`FixedStepClock`] advances by a constant step on every sample, which
//!   makes headless runs and tests deterministic.
//!
//! # Example
//!
//! ```
//! use cosmic_field::time::{Clock, FixedStepClock};
//!
//! let mut clock = FixedStepClock::new(10.0, 0.5);
//! assert_eq!(clock.now(), 10.0);
//! assert_eq!(clock.now(), 10.5);
//! ```

use std::time::{Duration, Instant};

/// A source of animation time in seconds.
pub trait Clock {
    /// Sample the current time. Called once per tick.
    fn now(&mut self) -> f64;
}

/// Wall-clock time tracking.
///
/// Elapsed seconds are measured from creation. Every call to [`Clock::now`]
/// counts as one frame for the FPS meter.
#[derive(Debug)]
pub struct Time {
    /// When the timer was created.
    start: Instant,
    /// When the last frame occurred.
    last_frame: Instant,
    /// Offset added to elapsed seconds.
    origin: f64,
    /// Time since last frame in seconds.
    delta_secs: f32,
    /// Total frames since start.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    /// Time of last FPS calculation.
    fps_update_time: Instant,
    /// How often to update FPS calculation.
    fps_update_interval: Duration,
    /// Set when the FPS value was refreshed by the latest sample.
    fps_refreshed: bool,
}

impl Time {
    /// Create a new time tracker starting from now, at `t = 0`.
    pub fn new() -> Self {
        Self::with_origin(0.0)
    }

    /// Create a time tracker whose first sample reads `origin` seconds.
    pub fn with_origin(origin: f64) -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            origin,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            fps_refreshed: false,
        }
    }

    /// Change how often the FPS value is recomputed.
    pub fn set_fps_interval(&mut self, interval: Duration) {
        self.fps_update_interval = interval;
    }

    /// Time between the last two samples, in seconds.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Total samples taken since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Calculated frames per second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Whether the most recent sample refreshed [`Time::fps`].
    #[inline]
    pub fn fps_refreshed(&self) -> bool {
        self.fps_refreshed
    }

    fn sample(&mut self, now: Instant) -> f64 {
        self.delta_secs = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        self.fps_refreshed = fps_elapsed >= self.fps_update_interval;
        if self.fps_refreshed {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.origin + now.duration_since(self.start).as_secs_f64()
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for Time {
    fn now(&mut self) -> f64 {
        self.sample(Instant::now())
    }
}

/// Deterministic clock: `start`, `start + step`, `start + 2 * step`, ...
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedStepClock {
    start: f64,
    step: f64,
    samples: u64,
}

impl FixedStepClock {
    pub fn new(start: f64, step: f64) -> Self {
        Self {
            start,
            step,
            samples: 0,
        }
    }

    /// How many times the clock has been sampled.
    pub fn samples(&self) -> u64 {
        self.samples
    }
}

impl Clock for FixedStepClock {
    fn now(&mut self) -> f64 {
        // Derived from the sample count rather than accumulated.
        let t = self.start + self.samples as f64 * self.step;
        self.samples += 1;
        t
    }
}
