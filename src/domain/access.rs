//! Time-of-day access window policy.
//!
//! A non-admin user whose record has both bounds configured may only hold
//! an authenticated session while the current local time (in the configured
//! reference timezone) lies inside the closed interval `[start, end]`.
//! Admins and users with fewer than two bounds are exempt. This is a
//! stateless predicate evaluated on every request.

use chrono::NaiveTime;

/// Inclusive `[start, end]` local-time interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl AccessWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Both endpoints count as inside. A window with `start > end` matches
    /// nothing; overnight windows are not supported.
    pub fn contains(&self, now: NaiveTime) -> bool {
        self.start <= now && now <= self.end
    }
}
