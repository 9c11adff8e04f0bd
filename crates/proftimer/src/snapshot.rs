//! Owned, serializable views of timer state

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Point-in-time copy of one timer.
///
/// Produced by [`TimerRegistry::snapshot`](crate::TimerRegistry::snapshot).
/// Names that were not registered when the snapshot was taken appear with
/// zero `total` and zero `count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    /// Timer name
    pub name: String,
    /// Accumulated duration, serialized as nanoseconds
    #[serde(with = "duration_nanos")]
    pub total: Duration,
    /// Number of recorded events
    pub count: u64,
}

impl TimerSnapshot {
    /// Create a snapshot for a timer that does not exist.
    pub fn zero(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            total: Duration::ZERO,
            count: 0,
        }
    }
}

mod duration_nanos {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // u64 nanoseconds covers ~584 years
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        nanos.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let nanos = u64::deserialize(deserializer)?;
        Ok(Duration::from_nanos(nanos))
    }
}
