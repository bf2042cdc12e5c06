use std::thread;
use std::time::{Duration, Instant};

/**
 * Drift correction for fixed-length actions.
 *
 * Call `checkpoint` when an action starts. `sleep_remaining` then only sleeps for what is
 * left of the nominal duration, so processing done in between is not added on top.
 */
#[derive(Debug, Clone, Copy)]
pub struct TimeFixer {
    checkpoint: Instant,
}

impl TimeFixer {
    pub fn new() -> TimeFixer {
        TimeFixer {
            checkpoint: Instant::now(),
        }
    }

    pub fn checkpoint(&mut self) {
        self.checkpoint = Instant::now();
    }

    pub fn elapsed_since_checkpoint(&self) -> Duration {
        self.checkpoint.elapsed()
    }

    pub fn remaining(&self, nominal: Duration) -> Duration {
        nominal.saturating_sub(self.elapsed_since_checkpoint())
    }

    pub fn sleep_remaining(&self, nominal: Duration) {
        let remaining = self.remaining(nominal);
        if !remaining.is_zero() {
            thread::sleep(remaining);
        }
    }
}

impl Default for TimeFixer {
    fn default() -> TimeFixer {
        TimeFixer::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_subtracts_elapsed() {
        let mut timer = TimeFixer::new();
        timer.checkpoint();
        thread::sleep(Duration::from_millis(30));

        let remaining = timer.remaining(Duration::from_millis(100));
        assert!(remaining <= Duration::from_millis(70));
    }

    #[test]
    fn test_remaining_never_negative() {
        let mut timer = TimeFixer::new();
        timer.checkpoint();
        thread::sleep(Duration::from_millis(20));

        assert_eq!(timer.remaining(Duration::from_millis(5)), Duration::ZERO);
    }

    #[test]
    fn test_observed_duration_matches_nominal() {
        // Purpose: simulated overhead before the sleep must not lengthen the action
        let nominal = Duration::from_millis(120);
        let overhead = Duration::from_millis(50);
        let start = Instant::now();
        let mut timer = TimeFixer::new();
        timer.checkpoint();

        thread::sleep(overhead);
        timer.sleep_remaining(nominal);

        let observed = start.elapsed();
        assert!(observed >= nominal);
        assert!(observed < nominal + overhead);
    }
}
