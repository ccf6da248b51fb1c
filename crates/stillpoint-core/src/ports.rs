//! Port traits: the hexagonal architecture boundary.
//!
//! These traits are defined here in `stillpoint-core` (pure Rust).
//! Implementations live in `stillpoint-platform` (browser adapters).
//! The core never imports platform code; it only depends on these traits.

use chrono::{NaiveDate, NaiveDateTime};
use stillpoint_types::{event::Cue, Result};

// ─── Storage Port ────────────────────────────────────────────

/// Synchronous key-value text store (browser `localStorage` semantics).
pub trait StoragePort {
    /// Get a value by key
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Set a value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value
    fn delete(&self, key: &str) -> Result<()>;

    /// Check if a key exists
    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Name of this backend (for logging/debug)
    fn backend_name(&self) -> &str;
}

// ─── Audio Port ──────────────────────────────────────────────

pub trait AudioPort {
    /// Begin playback and return immediately.
    fn play(&self, cue: Cue) -> Result<()>;
}

// ─── Clock Port ──────────────────────────────────────────────

pub trait ClockPort {
    fn now_millis(&self) -> u64;

    /// Wall-clock time in the user's timezone for an epoch instant.
    fn local_datetime(&self, epoch_millis: u64) -> NaiveDateTime;

    /// Calendar day in the user's timezone; streaks compare these.
    fn calendar_date(&self, epoch_millis: u64) -> NaiveDate {
        self.local_datetime(epoch_millis).date()
    }
}

// ─── Tick Source Port ────────────────────────────────────────

/// A once-per-second scheduler. At most one callback is armed at a time.
pub trait TickSource {
    /// Arm the source, replacing any callback that is already armed.
    fn start(&self, on_tick: Box<dyn FnMut()>);

    /// Disarm. Safe to call from inside the tick callback.
    fn stop(&self);

    fn is_active(&self) -> bool;
}
