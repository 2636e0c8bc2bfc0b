//! Time management utilities
//!
//! Simulation time is tracked in [`Duration`] rather than floating point
//! seconds so that repeated small frame deltas accumulate without drift.

use std::time::{Duration, Instant};

/// Fixed-step accumulator.
///
/// Wall-clock frame time goes in through [`FixedTimestep::accumulate`];
/// whole steps come out through [`FixedTimestep::try_consume`]. After the
/// caller drains it, the remainder is always strictly less than one step.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: Duration,
    accumulator: Duration,
    total_steps: u64,
}

impl FixedTimestep {
    /// Create an accumulator with the given step size
    ///
    /// # Panics
    /// Panics if `step` is zero, which would never drain the accumulator.
    pub fn new(step: Duration) -> Self {
        assert!(!step.is_zero(), "fixed timestep must be non-zero");
        Self {
            step,
            accumulator: Duration::ZERO,
            total_steps: 0,
        }
    }

    /// Step size
    pub fn step(&self) -> Duration {
        self.step
    }

    /// Step size in seconds, as used by the integrator
    pub fn step_secs(&self) -> f32 {
        self.step.as_secs_f32()
    }

    /// Add elapsed frame time
    pub fn accumulate(&mut self, delta: Duration) {
        self.accumulator += delta;
    }

    /// Consume one step if enough time has accumulated
    pub fn try_consume(&mut self) -> bool {
        if self.accumulator >= self.step {
            self.accumulator -= self.step;
            self.total_steps += 1;
            true
        } else {
            false
        }
    }

    /// Count one step taken outside the accumulator. The carried-over
    /// time is left alone.
    pub fn advance_one(&mut self) {
        self.total_steps += 1;
    }

    /// Time carried over to the next frame
    pub fn accumulator(&self) -> Duration {
        self.accumulator
    }

    /// Steps consumed since creation
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// Simulated time covered by all consumed steps
    pub fn simulated_time(&self) -> Duration {
        let nanos = self.step.as_nanos() * u128::from(self.total_steps);
        u64::try_from(nanos).map_or(Duration::MAX, Duration::from_nanos)
    }

    /// Drop any carried-over time and step count
    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
        self.total_steps = 0;
    }
}

/// Simple stopwatch for measuring elapsed wall time
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::start_new()
    }
}

impl Stopwatch {
    /// Create a stopwatch that starts running immediately
    pub fn start_new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Wall time since the stopwatch was started
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Elapsed time in milliseconds
    pub fn elapsed_millis(&self) -> f32 {
        self.elapsed().as_secs_f32() * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulator_consumes_whole_steps() {
        let mut timestep = FixedTimestep::new(Duration::from_millis(10));
        timestep.accumulate(Duration::from_millis(35));

        let mut steps = 0;
        while timestep.try_consume() {
            steps += 1;
        }

        assert_eq!(steps, 3);
        assert_eq!(timestep.accumulator(), Duration::from_millis(5));
        assert_eq!(timestep.total_steps(), 3);
    }

    #[test]
    fn test_remainder_carries_into_next_frame() {
        let mut timestep = FixedTimestep::new(Duration::from_millis(10));

        timestep.accumulate(Duration::from_millis(6));
        assert!(!timestep.try_consume());

        timestep.accumulate(Duration::from_millis(6));
        assert!(timestep.try_consume());
        assert!(!timestep.try_consume());
        assert_eq!(timestep.accumulator(), Duration::from_millis(2));
    }

    #[test]
    fn test_simulated_time() {
        let mut timestep = FixedTimestep::new(Duration::from_millis(4));
        timestep.accumulate(Duration::from_millis(20));
        while timestep.try_consume() {}

        assert_eq!(timestep.simulated_time(), Duration::from_millis(20));
        assert_eq!(timestep.accumulator(), Duration::ZERO);
    }

    #[test]
    fn test_advance_one_counts_without_consuming() {
        let mut timestep = FixedTimestep::new(Duration::from_millis(4));
        timestep.accumulate(Duration::from_millis(3));

        timestep.advance_one();
        timestep.advance_one();

        assert_eq!(timestep.total_steps(), 2);
        assert_eq!(timestep.simulated_time(), Duration::from_millis(8));
        assert_eq!(timestep.accumulator(), Duration::from_millis(3));
    }

    #[test]
    #[should_panic(expected = "non-zero")]
    fn test_zero_step_is_rejected() {
        let _ = FixedTimestep::new(Duration::ZERO);
    }
}
