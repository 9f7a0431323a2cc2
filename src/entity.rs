use std::time;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// [QuotaEntity] is the record of a caller's current window,
/// persisted in the [Store](crate::store::Store) under the caller key.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct QuotaEntity {
    /// quota ceiling of the current window.
    pub total_limit: i64,
    /// requests still permitted in the current window.
    pub times_remaining: i64,
    /// epoch seconds when the current window expires.
    pub reset_timestamp: i64,
}

impl QuotaEntity {
    /// Create a fresh window starting at `now` with the full quota.
    /// A window reaching past `i64::MAX` seconds ends at `i64::MAX`.
    pub fn new(limit: i64, now: DateTime<Utc>, window: time::Duration) -> Self {
        Self {
            total_limit: limit,
            times_remaining: limit,
            reset_timestamp: i64::try_from(window.as_secs())
                .ok()
                .and_then(|secs| now.timestamp().checked_add(secs))
                .unwrap_or(i64::MAX),
        }
    }

    /// Check if the window has expired at `now`.
    /// A window whose reset time equals `now` is already expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.reset_timestamp <= now.timestamp()
    }

    pub fn is_exhausted(&self) -> bool {
        self.times_remaining == 0
    }

    /// `0 <= times_remaining <= total_limit`
    pub fn is_consistent(&self) -> bool {
        0 <= self.times_remaining && self.times_remaining <= self.total_limit
    }

    /// The reset time as a date, if it is representable.
    pub fn reset_date(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.reset_timestamp, 0).single()
    }
}
