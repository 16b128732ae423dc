//! Seedable latency simulation for stand-in providers.
//!
//! Demos and tests use [`SimulatedLatency`] to make fixed providers behave
//! like slow real sources. A fixed seed yields the same delay sequence every
//! run.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::Duration;

/// Produces per-call delays drawn uniformly from `[min_ms, max_ms]`.
#[derive(Debug)]
pub struct SimulatedLatency {
    min_ms: u64,
    max_ms: u64,
    rng: Mutex<StdRng>,
}

impl SimulatedLatency {
    /// Delays drawn from `[min_ms, max_ms]` using a seeded generator.
    /// The bounds are swapped if given in the wrong order.
    pub fn seeded(min_ms: u64, max_ms: u64, seed: u64) -> Self {
        let (min_ms, max_ms) = if min_ms <= max_ms {
            (min_ms, max_ms)
        } else {
            (max_ms, min_ms)
        };
        Self {
            min_ms,
            max_ms,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Delays drawn from `[min_ms, max_ms]` with an entropy-seeded generator.
    pub fn random(min_ms: u64, max_ms: u64) -> Self {
        Self::seeded(min_ms, max_ms, rand::random())
    }

    /// Always the same delay.
    pub fn fixed(ms: u64) -> Self {
        Self::seeded(ms, ms, 0)
    }

    pub fn range_ms(&self) -> (u64, u64) {
        (self.min_ms, self.max_ms)
    }

    /// Draw the next delay.
    pub fn next_delay(&self) -> Duration {
        if self.min_ms == self.max_ms {
            return Duration::from_millis(self.min_ms);
        }
        // A poisoned lock only means another caller panicked mid-draw; the
        // generator state is still usable.
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Duration::from_millis(rng.gen_range(self.min_ms..=self.max_ms))
    }
}
