use serde::{Deserialize, Serialize};

/// One completed meditation run. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredSession")]
pub struct SessionRecord {
    /// Timestamp-based, strictly increasing within one store
    pub id: u64,
    pub duration_seconds: u32,
    pub completed_at_epoch_millis: u64,
    pub intention: Option<String>,
}

impl SessionRecord {
    pub fn minutes(&self) -> f64 {
        self.duration_seconds as f64 / 60.0
    }
}

/// On-disk session shape. Also reads the older
/// `{id, duration, date, time, intention, completed}` entries, whose id is
/// the completion time in epoch millis and whose date/time are display text.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSession {
    id: u64,
    #[serde(alias = "duration")]
    duration_seconds: u32,
    #[serde(default)]
    completed_at_epoch_millis: Option<u64>,
    #[serde(default)]
    intention: Option<String>,
}

impl From<StoredSession> for SessionRecord {
    fn from(stored: StoredSession) -> Self {
        Self {
            id: stored.id,
            duration_seconds: stored.duration_seconds,
            completed_at_epoch_millis: stored.completed_at_epoch_millis.unwrap_or(stored.id),
            intention: stored.intention,
        }
    }
}
