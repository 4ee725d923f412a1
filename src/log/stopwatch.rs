use std::time::{Duration, Instant};

/// Monotonic stopwatch, started on construction.
#[derive(Clone, Copy, Debug)]
pub struct StopWatch {
    started: Instant,
}

impl Default for StopWatch {
    fn default() -> Self {
        Self::new()
    }
}

impl StopWatch {
    #[must_use]
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Whole milliseconds since construction or the last [`reset`](Self::reset).
    #[must_use]
    pub fn elapsed_ms(&self) -> u128 {
        self.elapsed().as_millis()
    }

    pub fn reset(&mut self) {
        self.started = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn measures_sleep_and_resets() {
        let mut sw = StopWatch::new();
        thread::sleep(Duration::from_millis(20));
        let before = sw.elapsed();
        assert!(before >= Duration::from_millis(20));

        sw.reset();
        assert!(sw.elapsed() < before);
    }
}
