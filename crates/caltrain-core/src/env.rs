//! Environment abstraction for reproducible simulation.
//!
//! The `Environment` trait decouples the actors that drive a [`Station`]
//! (train dispatchers, passengers) from system resources. The station itself
//! never touches time or randomness; only the drivers do.
//!
//! - Seeded simulation: a fixed seed reproduces the same schedule of arrival
//!   delays, boarding delays and train sizes.
//!
//! - Production runtime: wall-clock time and OS entropy, with no change to
//!   the driver code.
//!
//! # Invariants
//!
//! - Monotonicity: `env.now()` must never go backwards
//! - Determinism: Given the same seed, `random_bytes()` produces the same
//!   sequence
//! - Isolation: Implementations must not share global state
//!
//! [`Station`]: crate::Station

use std::time::{Duration, Instant};

/// Abstract environment providing time, randomness and blocking sleep.
///
/// Implementations are shared by every actor thread of a run, so they must be
/// cheap to clone and safe to use concurrently.
pub trait Environment: Clone + Send + Sync + 'static {
    /// Returns the current time.
    ///
    /// # Invariants
    ///
    /// - Monotonicity: Subsequent calls must return times >= previous calls.
    fn now(&self) -> Instant;

    /// Blocks the calling thread for (at least) the specified duration.
    ///
    /// Simulation implementations may compress the duration.
    fn sleep(&self, duration: Duration);

    /// Fills the provided buffer with random bytes.
    ///
    /// # Invariants
    ///
    /// - Determinism during simulations: Given the same RNG seed, this produces
    ///   the same sequence of bytes
    fn random_bytes(&self, buffer: &mut [u8]);

    /// Generates a random `u64`.
    fn random_u64(&self) -> u64 {
        let mut bytes = [0u8; 8];
        self.random_bytes(&mut bytes);
        u64::from_be_bytes(bytes)
    }

    /// Generates a random value in `0..bound`. Returns 0 when `bound` is 0.
    fn random_below(&self, bound: u64) -> u64 {
        if bound == 0 {
            return 0;
        }
        self.random_u64() % bound
    }

    /// Generates a random duration in `0..=max`, at millisecond granularity.
    fn random_duration(&self, max: Duration) -> Duration {
        let max_millis = u64::try_from(max.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(self.random_below(max_millis.saturating_add(1)))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    };

    use super::*;

    /// Counter-backed environment: every byte is the next counter value.
    #[derive(Clone, Default)]
    struct CountingEnv {
        next: Arc<AtomicU64>,
    }

    impl Environment for CountingEnv {
        fn now(&self) -> Instant {
            Instant::now()
        }

        fn sleep(&self, _duration: Duration) {}

        fn random_bytes(&self, buffer: &mut [u8]) {
            for byte in buffer {
                *byte = self.next.fetch_add(1, Ordering::Relaxed) as u8;
            }
        }
    }

    #[test]
    fn random_below_zero_bound_is_zero() {
        let env = CountingEnv::default();
        assert_eq!(env.random_below(0), 0);
    }

    #[test]
    fn random_below_stays_in_range() {
        let env = CountingEnv::default();
        for _ in 0..100 {
            assert!(env.random_below(7) < 7);
        }
    }

    #[test]
    fn random_duration_respects_max() {
        let env = CountingEnv::default();
        let max = Duration::from_millis(25);
        for _ in 0..100 {
            assert!(env.random_duration(max) <= max);
        }
        assert_eq!(env.random_duration(Duration::ZERO), Duration::ZERO);
    }

    #[test]
    fn random_u64_uses_big_endian_bytes() {
        let env = CountingEnv::default();
        assert_eq!(env.random_u64(), 0x0001_0203_0405_0607);
    }
}
