//! Date intervals and the injectable clock.
//!
//! Booking dates are UTC date-times at the boundary (ISO-8601 on the wire).
//! A `DateRange` is a validated interval with `end > start`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A validated date interval.
///
/// The overlap test is inclusive on both bounds: a booking ending on day D
/// conflicts with one starting on day D. Same-day checkout/checkin turnover is
/// therefore not allowed. This matches the production behavior and is a
/// product decision, not an interval-arithmetic convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Create a range, rejecting `end <= start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, String> {
        if end <= start {
            return Err("End date must be after start date".to_string());
        }
        Ok(Self { start, end })
    }

    /// Inclusive-bounds overlap test against another range.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    /// Inclusive-bounds overlap test against a raw span.
    pub fn overlaps_span(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start <= end && self.end >= start
    }
}

/// Source of the current time.
///
/// Services never read the wall clock directly; they take a `Clock` so tests
/// can fix "now" and get deterministic `created_at` ordering.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a fixed instant, for tests.
#[derive(Debug)]
pub struct FixedClock {
    now: std::sync::Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: std::sync::Mutex::new(now),
        }
    }

    /// Move the fixed instant forward.
    pub fn advance(&self, delta: chrono::Duration) {
        let mut now = self.now.lock().unwrap();
        *now += delta;
    }
}

impl Clone for FixedClock {
    fn clone(&self) -> Self {
        Self::new(*self.now.lock().unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

#[cfg(test)]
#[path = "time_tests.rs"]
mod time_tests;
