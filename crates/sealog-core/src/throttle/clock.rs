//! Time source for the rate limiter.
//!
//! See [`MockClock`](super::MockClock) for a controllable test clock,
//! available in test builds or with the `test-support` feature.

use std::time::Instant;

/// Port for reading the current time.
pub trait Clock {
    /// Current monotonic instant.
    fn now(&self) -> Instant;
}

/// System clock implementation using `Instant::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Create a new system clock.
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[cfg(any(test, feature = "test-support"))]
mod mock {
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    use super::Clock;

    /// Clock whose time only moves when told to.
    ///
    /// Clones share the same time value, so a test can keep one handle while
    /// the limiter owns another.
    #[derive(Debug, Clone)]
    pub struct MockClock {
        current_time: Arc<Mutex<Instant>>,
    }

    impl MockClock {
        /// Create a mock clock starting at a specific instant.
        pub fn new(start: Instant) -> Self {
            Self {
                current_time: Arc::new(Mutex::new(start)),
            }
        }

        /// Advance the clock by a duration.
        pub fn advance(&self, duration: Duration) {
            let mut time = self.current_time.lock().expect("MockClock mutex poisoned");
            *time += duration;
        }
    }

    impl Clock for MockClock {
        fn now(&self) -> Instant {
            *self.current_time.lock().expect("MockClock mutex poisoned")
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use mock::MockClock;
