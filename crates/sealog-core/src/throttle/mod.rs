//! Throughput throttling for the ingest loop.

pub mod clock;
pub mod limiter;

pub use clock::{Clock, SystemClock};
pub use limiter::{
    clamp_limit, LimitDecision, RateLimiter, RateWindow, DEFAULT_EVENTS_PER_SECOND,
    MAX_EVENTS_PER_SECOND, WINDOW,
};

#[cfg(any(test, feature = "test-support"))]
pub use clock::MockClock;
