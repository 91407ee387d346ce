//! Production Environment implementation using system time and RNG.
//!
//! This module provides `SystemEnv`, the `Environment` used when no seed is
//! given: real clock, real sleeps, OS randomness.

use std::{thread, time::Duration};

use caltrain_core::Environment;

/// Environment backed by the wall clock and the OS entropy pool.
///
/// This implementation:
/// - Uses `std::time::Instant::now()` for time
/// - Uses `std::thread::sleep()` for sleeping
/// - Uses `getrandom` for randomness
#[derive(Clone, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    fn now(&self) -> std::time::Instant {
        std::time::Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        getrandom::fill(buffer).unwrap_or_else(|e| {
            // Only schedule jitter depends on this, zeros just mean no delay
            tracing::error!("getrandom failed: {}", e);
            buffer.fill(0);
        });
    }
}
