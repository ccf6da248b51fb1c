//! Deterministic stand-ins for the platform ports.
//!
//! Used by the unit tests of every crate and by the wasm test suites, so the
//! timer can be driven tick by tick without waiting on a wall clock.
//! Built only for this crate's tests or with the `testing` feature.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use stillpoint_types::{event::Cue, MeditationError, Result};

use crate::ports::{AudioPort, ClockPort, StoragePort, TickSource};

// ─── Clock ───────────────────────────────────────────────────

/// Settable clock. Local time is UTC shifted by a fixed offset.
pub struct ManualClock {
    now: Cell<u64>,
    offset_minutes: i64,
}

impl ManualClock {
    pub fn new(now_millis: u64) -> Self {
        Self::with_offset(now_millis, 0)
    }

    pub fn with_offset(now_millis: u64, offset_minutes: i64) -> Self {
        Self {
            now: Cell::new(now_millis),
            offset_minutes,
        }
    }

    pub fn set(&self, now_millis: u64) {
        self.now.set(now_millis);
    }

    pub fn advance(&self, millis: u64) {
        self.now.set(self.now.get() + millis);
    }

    /// Epoch millis for a UTC wall-clock time. Invalid dates map to 0.
    pub fn millis_at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> u64 {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, minute, 0))
            .map(|dt| dt.and_utc().timestamp_millis() as u64)
            .unwrap_or(0)
    }
}

impl ClockPort for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.get()
    }

    fn local_datetime(&self, epoch_millis: u64) -> NaiveDateTime {
        let shifted = epoch_millis as i64 + self.offset_minutes * 60_000;
        DateTime::from_timestamp_millis(shifted)
            .map(|dt| dt.naive_utc())
            .unwrap_or_default()
    }
}

// ─── Ticker ──────────────────────────────────────────────────

/// Tick source fired by hand with [`ManualTicker::fire`].
#[derive(Default)]
pub struct ManualTicker {
    callback: RefCell<Option<Box<dyn FnMut()>>>,
    armed: Cell<bool>,
    generation: Cell<u64>,
    starts: Cell<u32>,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver one tick. Returns false when nothing is armed.
    pub fn fire(&self) -> bool {
        if !self.armed.get() {
            return false;
        }
        let Some(mut callback) = self.callback.borrow_mut().take() else {
            return false;
        };
        let generation = self.generation.get();
        callback();
        // Put it back unless the callback stopped or re-armed the ticker.
        if self.generation.get() == generation {
            *self.callback.borrow_mut() = Some(callback);
        }
        true
    }

    /// Fire up to `ticks` times, stopping early once disarmed.
    pub fn advance(&self, ticks: u32) -> u32 {
        let mut fired = 0;
        for _ in 0..ticks {
            if !self.fire() {
                break;
            }
            fired += 1;
        }
        fired
    }

    /// How many times the ticker has been armed.
    pub fn start_count(&self) -> u32 {
        self.starts.get()
    }
}

impl TickSource for ManualTicker {
    fn start(&self, on_tick: Box<dyn FnMut()>) {
        self.generation.set(self.generation.get() + 1);
        self.starts.set(self.starts.get() + 1);
        self.armed.set(true);
        *self.callback.borrow_mut() = Some(on_tick);
    }

    fn stop(&self) {
        self.generation.set(self.generation.get() + 1);
        self.armed.set(false);
        self.callback.borrow_mut().take();
    }

    fn is_active(&self) -> bool {
        self.armed.get()
    }
}

// ─── Audio ───────────────────────────────────────────────────

/// Records requested cues; can be told to fail.
#[derive(Default)]
pub struct RecordingAudio {
    played: RefCell<Vec<Cue>>,
    failing: Cell<bool>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    pub fn played(&self) -> Vec<Cue> {
        self.played.borrow().clone()
    }
}

impl AudioPort for RecordingAudio {
    fn play(&self, cue: Cue) -> Result<()> {
        self.played.borrow_mut().push(cue);
        if self.failing.get() {
            return Err(MeditationError::Audio("device unavailable".to_string()));
        }
        Ok(())
    }
}

// ─── Storage ─────────────────────────────────────────────────

/// HashMap-backed store whose writes can be made to fail.
#[derive(Default)]
pub struct FakeStorage {
    data: RefCell<HashMap<String, String>>,
    failing_writes: Cell<bool>,
    writes: Cell<u32>,
}

impl FakeStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing_writes(&self, failing: bool) {
        self.failing_writes.set(failing);
    }

    pub fn insert_raw(&self, key: &str, value: &str) {
        self.data.borrow_mut().insert(key.to_string(), value.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.data.borrow().get(key).cloned()
    }

    pub fn write_count(&self) -> u32 {
        self.writes.get()
    }
}

impl StoragePort for FakeStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.writes.set(self.writes.get() + 1);
        if self.failing_writes.get() {
            return Err(MeditationError::Storage("quota exceeded".to_string()));
        }
        self.data.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        if self.failing_writes.get() {
            return Err(MeditationError::Storage("storage locked".to_string()));
        }
        self.data.borrow_mut().remove(key);
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "fake"
    }
}
