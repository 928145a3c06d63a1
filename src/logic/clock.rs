//! Fixed-timestep frame driver.
//!
//! Wall-clock time is accumulated and paid out as whole frames, so game logic
//! always advances in identical steps regardless of how late the thread wakes.

use std::time::{Duration, Instant};

/// Upper bound on catch-up frames per wake; the rest of a long stall is dropped.
const MAX_CATCH_UP: u32 = 10;

/// One frame of progression handed to the games.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    /// Frames elapsed. Always 1.0 from the fixed-step driver.
    pub delta: f64,
    /// Wall time covered by this tick.
    pub elapsed_ms: f64,
}

impl FrameTick {
    pub fn frames(frame_rate: u32) -> Self {
        Self {
            delta: 1.0,
            elapsed_ms: 1000.0 / frame_rate.max(1) as f64,
        }
    }
}

pub struct FrameClock {
    accumulator: Duration,
    last_time: Instant,
    target_dt: Duration,
    tick: FrameTick,
}

impl FrameClock {
    pub fn new(frame_rate: u32, now: Instant) -> Self {
        let frame_rate = frame_rate.max(1);
        Self {
            accumulator: Duration::ZERO,
            last_time: now,
            target_dt: Duration::from_secs_f64(1.0 / frame_rate as f64),
            tick: FrameTick::frames(frame_rate),
        }
    }

    /// Number of whole frames due at `now`.
    pub fn advance(&mut self, now: Instant) -> u32 {
        let delta = now.saturating_duration_since(self.last_time);
        self.last_time = now;
        self.accumulator += delta;

        let mut frames = 0;
        while self.accumulator >= self.target_dt && frames < MAX_CATCH_UP {
            self.accumulator -= self.target_dt;
            frames += 1;
        }
        if frames == MAX_CATCH_UP && self.accumulator >= self.target_dt {
            log::debug!(
                "LOGIC: Dropping {:?} of backlog after a stall",
                self.accumulator
            );
            self.accumulator = Duration::ZERO;
        }
        frames
    }

    pub fn tick(&self) -> FrameTick {
        self.tick
    }
}
