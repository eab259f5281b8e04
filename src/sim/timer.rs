//! Run stopwatch

use crate::highscores::format_time;

/// Elapsed run time. Started by a charge, stopped by the finish.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunTimer {
    elapsed: f32,
    running: bool,
    finished: bool,
}

impl RunTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from zero. Ignored while running.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.elapsed = 0.0;
        self.running = true;
        self.finished = false;
        log::info!("Timer started");
        true
    }

    /// Stop and return the final time
    pub fn finish(&mut self) -> f32 {
        if self.running {
            log::info!("Timer stopped at {}", format_time(self.elapsed));
        }
        self.running = false;
        self.finished = true;
        self.elapsed
    }

    pub fn tick(&mut self, dt: f32) {
        if self.running {
            self.elapsed += dt;
        }
    }

    /// Back to zero, ready for a new run
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// `MM:SS:hh`
    pub fn display(&self) -> String {
        format_time(self.elapsed)
    }
}
