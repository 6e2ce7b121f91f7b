//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Time elapsed between `self` and `later`, zero if `later` is earlier.
    pub fn elapsed_until(&self, later: &Timestamp) -> Duration {
        later
            .0
            .signed_duration_since(self.0)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    /// Returns a timestamp shifted back by `by`.
    pub fn minus(&self, by: Duration) -> Self {
        match chrono::Duration::from_std(by) {
            Ok(delta) => Self(self.0 - delta),
            Err(_) => Self(DateTime::<Utc>::MIN_UTC),
        }
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}
