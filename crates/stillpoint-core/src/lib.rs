//! Stillpoint core: countdown engine, session statistics, and the ports
//! the browser adapters plug into.
//!
//! - [`timer::TimerEngine`]: Idle/Running/Paused state machine driven by ticks
//! - [`stats::StatsStore`]: recent and all-time logs, streaks, rolling windows
//! - [`runtime::RuntimeHandle`]: the single owner the presentation layer talks to

pub mod event_bus;
pub mod ports;
pub mod runtime;
pub mod stats;
pub mod streak;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod timer;

#[cfg(test)]
mod tests;
