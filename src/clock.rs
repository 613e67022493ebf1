//! # Microsecond Clock
//!
//! Wrapping 32-bit microsecond timestamps, the time base the decoder expects.

use std::time::Instant;

/// Source of wrapping 32-bit microsecond timestamps
pub trait MicrosClock: Send + Sync {
    fn now_us(&self) -> u32;
}

/// Monotonic clock truncated to 32 bits
///
/// Wraps every ~71.6 minutes, the same as an MCU microsecond counter.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MicrosClock for MonotonicClock {
    fn now_us(&self) -> u32 {
        // Truncation is the wraparound
        self.origin.elapsed().as_micros() as u32
    }
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    /// Hand-driven clock for tests
    #[derive(Debug, Clone, Default)]
    pub struct ManualClock {
        now: Arc<AtomicU32>,
    }

    impl ManualClock {
        pub fn starting_at(now_us: u32) -> Self {
            Self {
                now: Arc::new(AtomicU32::new(now_us)),
            }
        }

        pub fn advance(&self, us: u32) {
            let now = self.now.load(Ordering::SeqCst);
            self.now.store(now.wrapping_add(us), Ordering::SeqCst);
        }
    }

    impl MicrosClock for ManualClock {
        fn now_us(&self) -> u32 {
            self.now.load(Ordering::SeqCst)
        }
    }
}
