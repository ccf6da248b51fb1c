use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::session::SessionRecord;

/// Aggregate statistics, persisted as one JSON blob.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stats {
    pub total_minutes: f64,
    pub total_sessions: u64,
    pub current_streak: u32,
    /// Local calendar date of the most recent session, `YYYY-MM-DD`
    pub last_session_date: Option<NaiveDate>,
    pub all_time_sessions: Vec<SessionRecord>,
}

/// Derived figures for display
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatsSummary {
    pub total_minutes: f64,
    pub total_sessions: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub week_minutes: f64,
    pub month_minutes: f64,
}
