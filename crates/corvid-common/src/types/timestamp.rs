//! Wall-clock timestamp used for node/edge creation and update stamps.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds since the Unix epoch.
///
/// Stored as `i64` (not `u64`) so that timestamps before 1970 can round-trip
/// through the WAL/snapshot codec without wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Constructs a timestamp from raw seconds-since-epoch.
    #[must_use]
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs)
    }

    /// Returns the current wall-clock time.
    #[must_use]
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        Self(secs)
    }

    /// Returns the raw seconds-since-epoch value.
    #[must_use]
    pub const fn as_secs(self) -> i64 {
        self.0
    }
}
