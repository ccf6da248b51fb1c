//! Session history and aggregate statistics.
//!
//! Owns both logs and the stats blob, and mirrors every mutation to the
//! storage port. In-memory state is authoritative: a failed write is logged
//! and the store carries on.

use std::rc::Rc;

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Serialize};
use stillpoint_types::{
    config::{MeditationConfig, StatsConfig},
    session::SessionRecord,
    stats::{Stats, StatsSummary},
};

use crate::ports::{ClockPort, StoragePort};
use crate::streak;

pub const MILLIS_PER_DAY: u64 = 86_400_000;

pub struct StatsStore {
    storage: Rc<dyn StoragePort>,
    clock: Rc<dyn ClockPort>,
    limits: StatsConfig,
    sessions_key: String,
    stats_key: String,
    /// Most recent first
    recent: Vec<SessionRecord>,
    stats: Stats,
    last_id: u64,
}

impl StatsStore {
    /// Restore both logs from storage. Missing or unreadable blobs start empty.
    pub fn load(
        storage: Rc<dyn StoragePort>,
        clock: Rc<dyn ClockPort>,
        config: &MeditationConfig,
    ) -> Self {
        let sessions_key = config.storage.sessions_key.clone();
        let stats_key = config.storage.stats_key.clone();

        let mut recent: Vec<SessionRecord> = read_blob(storage.as_ref(), &sessions_key);
        recent.truncate(config.stats.recent_cap());
        let stats: Stats = read_blob(storage.as_ref(), &stats_key);

        let last_id = recent
            .iter()
            .chain(stats.all_time_sessions.iter())
            .map(|r| r.id)
            .max()
            .unwrap_or(0);

        log::info!(
            "Loaded {} recent / {} total sessions from {}",
            recent.len(),
            stats.total_sessions,
            storage.backend_name()
        );

        let mut store = Self {
            storage,
            clock,
            limits: config.stats.clone(),
            sessions_key,
            stats_key,
            recent,
            stats,
            last_id,
        };
        store.backfill_stats();
        store
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn recent(&self) -> &[SessionRecord] {
        &self.recent
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn current_streak(&self) -> u32 {
        self.stats.current_streak
    }

    pub fn last_session_date(&self) -> Option<NaiveDate> {
        self.stats.last_session_date
    }

    /// Longest run of consecutive session days, recomputed from the full log.
    pub fn longest_streak(&self) -> u32 {
        let mut sessions: Vec<&SessionRecord> = self.stats.all_time_sessions.iter().collect();
        sessions.sort_by_key(|r| r.completed_at_epoch_millis);
        streak::longest_run(
            sessions
                .into_iter()
                .map(|r| self.clock.calendar_date(r.completed_at_epoch_millis)),
        )
    }

    /// Minutes logged strictly inside the trailing `window_days` before `now`.
    pub fn window_minutes(&self, now_millis: u64, window_days: u32) -> f64 {
        let cutoff = now_millis as i128 - window_days as i128 * MILLIS_PER_DAY as i128;
        self.stats
            .all_time_sessions
            .iter()
            .filter(|r| r.completed_at_epoch_millis as i128 > cutoff)
            .map(SessionRecord::minutes)
            .sum()
    }

    pub fn summary(&self, now_millis: u64) -> StatsSummary {
        StatsSummary {
            total_minutes: self.stats.total_minutes,
            total_sessions: self.stats.total_sessions,
            current_streak: self.stats.current_streak,
            longest_streak: self.longest_streak(),
            week_minutes: self.window_minutes(now_millis, self.limits.week_days),
            month_minutes: self.window_minutes(now_millis, self.limits.month_days),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn record_session(
        &mut self,
        duration_secs: u32,
        intention: Option<String>,
        completed_at_millis: u64,
    ) -> SessionRecord {
        let id = completed_at_millis.max(self.last_id.saturating_add(1));
        self.last_id = id;

        let record = SessionRecord {
            id,
            duration_seconds: duration_secs,
            completed_at_epoch_millis: completed_at_millis,
            intention,
        };

        self.recent.insert(0, record.clone());
        self.recent.truncate(self.limits.recent_cap());

        self.stats.all_time_sessions.push(record.clone());
        self.stats.total_sessions += 1;
        self.stats.total_minutes += record.minutes();
        let session_date = self.clock.calendar_date(completed_at_millis);
        self.update_streak(session_date);

        self.persist();
        record
    }

    /// Fold one session day into the running streak.
    pub fn update_streak(&mut self, session_date: NaiveDate) {
        self.stats.current_streak = streak::advance(
            self.stats.current_streak,
            self.stats.last_session_date,
            session_date,
        );
        self.stats.last_session_date = Some(session_date);
    }

    pub fn clear_all(&mut self) {
        self.recent.clear();
        self.stats = Stats::default();
        self.last_id = 0;

        for key in [&self.sessions_key, &self.stats_key] {
            if let Err(e) = self.storage.delete(key) {
                log::warn!("Failed to delete {}: {}", key, e);
            }
        }
        log::info!("Session history cleared");
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// A history written without a stats blob (first run over an older
    /// log) seeds the aggregates from the sessions it holds.
    fn backfill_stats(&mut self) {
        if self.recent.is_empty() || self.stats != Stats::default() {
            return;
        }
        let mut oldest_first = self.recent.clone();
        oldest_first.sort_by_key(|r| r.completed_at_epoch_millis);
        for record in oldest_first {
            self.stats.total_sessions += 1;
            self.stats.total_minutes += record.minutes();
            let session_date = self.clock.calendar_date(record.completed_at_epoch_millis);
            self.update_streak(session_date);
            self.stats.all_time_sessions.push(record);
        }
        log::info!("Rebuilt stats from {} logged sessions", self.stats.total_sessions);
        write_blob(self.storage.as_ref(), &self.stats_key, &self.stats);
    }

    fn persist(&self) {
        write_blob(self.storage.as_ref(), &self.sessions_key, &self.recent);
        write_blob(self.storage.as_ref(), &self.stats_key, &self.stats);
    }
}

fn read_blob<T: DeserializeOwned + Default>(storage: &dyn StoragePort, key: &str) -> T {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(e) => {
            log::warn!("Failed to read {}: {}", key, e);
            return T::default();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Discarding malformed {}: {}", key, e);
            T::default()
        }
    }
}

fn write_blob<T: Serialize>(storage: &dyn StoragePort, key: &str, value: &T) {
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            log::warn!("Failed to serialize {}: {}", key, e);
            return;
        }
    };
    if let Err(e) = storage.set(key, &json) {
        log::warn!("Failed to persist {}: {}", key, e);
    }
}
