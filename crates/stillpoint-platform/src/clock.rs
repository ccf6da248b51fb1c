//! Browser wall clock.

use chrono::{DateTime, Local, NaiveDateTime};
use stillpoint_core::ports::ClockPort;

/// `Date.now()` for instants, the browser's timezone for calendar days.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserClock;

impl BrowserClock {
    pub fn new() -> Self {
        Self
    }
}

impl ClockPort for BrowserClock {
    fn now_millis(&self) -> u64 {
        js_sys::Date::now() as u64
    }

    fn local_datetime(&self, epoch_millis: u64) -> NaiveDateTime {
        DateTime::from_timestamp_millis(epoch_millis as i64)
            .map(|utc| utc.with_timezone(&Local).naive_local())
            .unwrap_or_default()
    }
}
