//! The `_sync` block embedded in each project entry

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Which side produced the recorded fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FingerprintOrigin {
    Yaml,
    Drawing,
}

/// State recorded after an entity was last reconciled.
///
/// Present if and only if the entity has been materialized at least once.
/// It is replaced as a whole, never field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncMetadata {
    /// Drawing handle of the entity, upper-case hex
    pub stable_id: String,
    pub content_fingerprint: String,
    pub fingerprint_origin: FingerprintOrigin,
    /// Seconds since the Unix epoch
    pub last_sync_time: i64,
}

impl SyncMetadata {
    pub fn new(
        stable_id: impl Into<String>,
        content_fingerprint: impl Into<String>,
        fingerprint_origin: FingerprintOrigin,
        synced_at: DateTime<Utc>,
    ) -> Self {
        Self {
            stable_id: stable_id.into(),
            content_fingerprint: content_fingerprint.into(),
            fingerprint_origin,
            last_sync_time: synced_at.timestamp(),
        }
    }

    pub fn last_synced(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.last_sync_time, 0).single()
    }
}
