//! Text formatting for the timer and history views.

use stillpoint_core::ports::ClockPort;
use stillpoint_types::session::SessionRecord;

/// Countdown text, `m:ss`. Minutes are not wrapped into hours.
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// `"30 minutes"`; odd second counts keep one decimal.
pub fn duration_label(secs: u32) -> String {
    if secs % 60 == 0 {
        format!("{} minutes", secs / 60)
    } else {
        format!("{:.1} minutes", secs as f64 / 60.0)
    }
}

pub fn quoted(text: &str) -> String {
    format!("\"{}\"", text)
}

/// `"<date> at <HH:MM>"` in the clock's local time.
pub fn session_when(record: &SessionRecord, clock: &dyn ClockPort) -> String {
    let local = clock.local_datetime(record.completed_at_epoch_millis);
    format!("{} at {}", local.format("%Y-%m-%d"), local.format("%H:%M"))
}

/// Whole minutes for the stats tiles.
pub fn minutes_total(minutes: f64) -> String {
    format!("{:.0}", minutes.max(0.0).round())
}

pub fn streak_label(days: u32) -> String {
    match days {
        1 => "1 day".to_string(),
        n => format!("{} days", n),
    }
}
