//! Monotonic time sources
//!
//! The simulation never reads the clock itself; whoever drives `Game::tick`
//! passes the current time in seconds.

use std::time::{Duration, Instant};

/// A monotonic frame clock reporting seconds since it was created
pub trait Clock {
    fn now(&self) -> f64;

    /// Move to the next frame and return its time
    fn advance(&mut self) -> f64;
}

/// Real time, paced to a fixed frame rate
#[derive(Debug, Clone, Copy)]
pub struct WallClock {
    origin: Instant,
    frame: Duration,
    frames: u32,
}

impl WallClock {
    pub fn new(frame_dt: f64) -> Self {
        assert!(frame_dt > 0.0, "frame length must be positive");
        Self {
            origin: Instant::now(),
            frame: Duration::from_secs_f64(frame_dt),
            frames: 0,
        }
    }
}

impl Clock for WallClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }

    /// Sleep until the next frame boundary. A late frame is not made up.
    fn advance(&mut self) -> f64 {
        self.frames = self.frames.saturating_add(1);
        let due = self.frame * self.frames;
        let elapsed = self.origin.elapsed();
        if due > elapsed {
            std::thread::sleep(due - elapsed);
        } else {
            self.frames = (elapsed.as_secs_f64() / self.frame.as_secs_f64()) as u32;
        }
        self.now()
    }
}

/// Simulated time advancing a fixed step per frame
#[derive(Debug, Clone, Copy)]
pub struct FixedStepClock {
    dt: f64,
    ticks: u64,
}

impl FixedStepClock {
    pub fn new(dt: f64) -> Self {
        assert!(dt > 0.0, "clock step must be positive");
        Self { dt, ticks: 0 }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Clock for FixedStepClock {
    fn now(&self) -> f64 {
        self.ticks as f64 * self.dt
    }

    fn advance(&mut self) -> f64 {
        self.ticks += 1;
        self.now()
    }
}
