//! Process-wide simulated sample clock

use bridge_core::{wall_clock_millis, BridgeResult};
use parking_lot::Mutex;

/// Monotonically advancing simulated time shared by every request
///
/// Only `advance` mutates it. Each call reserves a contiguous range of
/// simulated time, so concurrent callers never see overlapping ranges.
#[derive(Debug)]
pub struct SimulatedClock {
    elapsed_secs: Mutex<f64>,
    anchor_ms: i64,
}

impl SimulatedClock {
    /// Start at simulated time zero, anchored to the current wall clock
    pub fn new() -> BridgeResult<Self> {
        Ok(Self::with_anchor(wall_clock_millis()?))
    }

    /// Start at simulated time zero with an explicit wall-clock anchor
    pub fn with_anchor(anchor_ms: i64) -> Self {
        Self {
            elapsed_secs: Mutex::new(0.0),
            anchor_ms,
        }
    }

    /// Reserve `n` sample intervals and return the simulated time at the start of the batch
    pub fn advance(&self, n: usize, sample_interval_secs: f64) -> f64 {
        let mut elapsed = self.elapsed_secs.lock();
        let start = *elapsed;
        *elapsed += n as f64 * sample_interval_secs;
        start
    }

    /// Wall-clock milliseconds corresponding to simulated time zero
    pub fn anchor_millis(&self) -> i64 {
        self.anchor_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_advance_returns_pre_advance_time() {
        let clock = SimulatedClock::with_anchor(0);
        assert_eq!(clock.advance(50, 0.004), 0.0);
        assert!((clock.advance(50, 0.004) - 0.2).abs() < 1e-12);
        assert!((clock.advance(10, 0.004) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_zero_advance_does_not_move() {
        let clock = SimulatedClock::with_anchor(0);
        clock.advance(0, 0.004);
        assert_eq!(clock.advance(1, 0.004), 0.0);
    }

    #[test]
    fn test_anchor_is_wall_clock() {
        let before = wall_clock_millis().unwrap();
        let clock = SimulatedClock::new().unwrap();
        assert!(clock.anchor_millis() >= before);
    }

    #[test]
    fn test_concurrent_advances_are_disjoint() {
        let clock = Arc::new(SimulatedClock::with_anchor(0));
        let interval = 0.004;
        let batch = 50;

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let clock = Arc::clone(&clock);
                thread::spawn(move || {
                    (0..20).map(|_| clock.advance(batch, interval)).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut starts: Vec<f64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        starts.sort_by(|a, b| a.partial_cmp(b).unwrap());

        let width = batch as f64 * interval;
        for pair in starts.windows(2) {
            assert!(pair[1] - pair[0] >= width - 1e-9, "overlapping ranges: {:?}", pair);
        }
        assert_eq!(starts.len(), 320);
    }
}
