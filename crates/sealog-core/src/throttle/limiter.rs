//! Fixed-window rate limiter.
//!
//! The limiter counts admitted events in a one-second window that starts at
//! the last reset. Once the window is full, events are denied until an event
//! arrives more than one second after the window start; that event resets the
//! window and is admitted.
//!
//! There is no timer. Windows only roll over when an event is checked, so a
//! burst can get `limit` events admitted just before a rollover and another
//! `limit` just after. That momentary 2× is accepted in exchange for a
//! limiter that is two integers and an instant.

use std::time::{Duration, Instant};

use super::clock::{Clock, SystemClock};

/// Default admitted events per second.
pub const DEFAULT_EVENTS_PER_SECOND: u32 = 100;

/// Hard cap on admitted events per second.
pub const MAX_EVENTS_PER_SECOND: u32 = 3000;

/// Window length.
pub const WINDOW: Duration = Duration::from_secs(1);

/// Decision for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitDecision {
    /// Admit the event
    Allow,
    /// Drop the event
    Deny,
}

impl LimitDecision {
    /// Check if this decision admits the event.
    pub fn is_allow(&self) -> bool {
        matches!(self, LimitDecision::Allow)
    }
}

/// Snapshot of the limiter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateWindow {
    /// When the current window began
    pub window_start: Instant,
    /// Events admitted in the current window
    pub count: u32,
    /// Events admitted per window
    pub limit: u32,
}

/// Clamp a requested rate into `1..=MAX_EVENTS_PER_SECOND`.
pub fn clamp_limit(requested: u32) -> u32 {
    requested.clamp(1, MAX_EVENTS_PER_SECOND)
}

/// Fixed-window rate limiter.
///
/// Owned by the single producer; it needs no locking.
#[derive(Debug)]
pub struct RateLimiter<C: Clock = SystemClock> {
    window: RateWindow,
    clock: C,
}

impl RateLimiter<SystemClock> {
    /// Create a limiter admitting `limit` events per second.
    ///
    /// `limit` is clamped with [`clamp_limit`].
    pub fn new(limit: u32) -> Self {
        Self::with_clock(limit, SystemClock::new())
    }
}

impl<C: Clock> RateLimiter<C> {
    /// Create a limiter reading time from `clock`.
    pub fn with_clock(limit: u32, clock: C) -> Self {
        let window = RateWindow {
            window_start: clock.now(),
            count: 0,
            limit: clamp_limit(limit),
        };
        Self { window, clock }
    }

    /// Decide whether the event arriving now is admitted.
    pub fn check(&mut self) -> LimitDecision {
        if self.window.count < self.window.limit {
            self.window.count += 1;
            return LimitDecision::Allow;
        }

        let now = self.clock.now();
        if now.saturating_duration_since(self.window.window_start) > WINDOW {
            self.window.window_start = now;
            self.window.count = 1;
            return LimitDecision::Allow;
        }

        LimitDecision::Deny
    }

    /// Current window state.
    pub fn window(&self) -> RateWindow {
        self.window
    }

    /// Configured events per second after clamping.
    pub fn limit(&self) -> u32 {
        self.window.limit
    }
}
