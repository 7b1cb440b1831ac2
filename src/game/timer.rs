use std::time::{Duration, Instant};

/// Wall-clock stopwatch for one game
#[derive(Debug, Clone)]
pub struct Stopwatch {
    started: Instant,
    stopped: Option<Duration>,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::start()
    }
}

impl Stopwatch {
    /// A running stopwatch starting now
    #[must_use]
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            stopped: None,
        }
    }

    /// Freeze the elapsed time; later calls keep the first reading
    pub fn stop(&mut self) {
        if self.stopped.is_none() {
            self.stopped = Some(self.started.elapsed());
        }
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.stopped.is_none()
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.stopped.unwrap_or_else(|| self.started.elapsed())
    }
}
