//! Seeded simulation environment.
//!
//! All actors of a run draw from one ChaCha stream, so a seed pins down the
//! multiset of random values handed out (arrival delays, boarding delays,
//! train sizes). Which thread receives which value still depends on the OS
//! scheduler.

use std::{
    sync::{Arc, Mutex, PoisonError},
    thread,
    time::{Duration, Instant},
};

use caltrain_core::Environment;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Simulation environment with a seeded RNG and compressible sleeps.
#[derive(Clone, Debug)]
pub struct SimEnv {
    rng: Arc<Mutex<ChaCha8Rng>>,
    seed: u64,
    time_dilation: u32,
}

impl SimEnv {
    /// Create an environment seeded with 0.
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    /// Create an environment with a specific seed.
    pub fn with_seed(seed: u64) -> Self {
        tracing::debug!(seed, "simulation environment seeded");
        Self {
            rng: Arc::new(Mutex::new(ChaCha8Rng::seed_from_u64(seed))),
            seed,
            time_dilation: 1,
        }
    }

    /// Divide every sleep by `factor`. A factor of 0 is treated as 1.
    #[must_use]
    pub fn with_time_dilation(mut self, factor: u32) -> Self {
        self.time_dilation = factor.max(1);
        self
    }

    /// Seed this environment was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for SimEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for SimEnv {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        let scaled = duration / self.time_dilation;
        if !scaled.is_zero() {
            thread::sleep(scaled);
        }
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        // The RNG holds no invariant a panicking thread could break
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.fill_bytes(buffer);
    }
}
