//! Frame timing.
//!
//! The clock is sampled exactly once at the start of each frame. The resulting [`FrameTime`]
//! is handed to every pass and every animated prop so that all three passes of a frame agree
//! on where things are.

use instant::{Duration, Instant};

/// Elapsed time since startup, frozen for the duration of one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameTime {
    millis: u64,
}

impl FrameTime {
    pub const fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    pub fn millis(&self) -> u64 {
        self.millis
    }

    pub fn seconds(&self) -> f32 {
        self.millis as f32 / 1000.0
    }

    /// Phase of the caustic texture cycle.
    pub fn caustic_phase(&self, caustic_speed: f32) -> f32 {
        self.millis as f32 * caustic_speed
    }
}

/// A single per-frame sample: the frozen timestamp and the time since the previous sample.
#[derive(Clone, Copy, Debug)]
pub struct FrameSample {
    pub time: FrameTime,
    pub dt: Duration,
}

#[derive(Debug)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
        }
    }

    pub fn sample(&mut self) -> FrameSample {
        let now = Instant::now();
        let dt = now - self.last;
        self.last = now;
        FrameSample {
            time: FrameTime::from_millis((now - self.start).as_millis() as u64),
            dt,
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
