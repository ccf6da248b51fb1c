//! Countdown state machine.
//!
//! The engine holds no timer of its own: the runtime arms a tick source
//! while the engine is `Running` and forwards each tick to [`TimerEngine::tick`].
//!
//! ```text
//! Idle --start--> Running --pause--> Paused --start--> Running
//!   ^                |                  |
//!   +----reset-------+------reset-------+
//!   ^                |
//!   +--(Completed)---+ final tick
//! ```

use stillpoint_types::config::TimerConfig;
use stillpoint_types::timer::{TimerSnapshot, TimerState};

/// Transitions reported back to the owner of the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    Started {
        duration_secs: u32,
        intention: Option<String>,
    },
    Resumed {
        remaining_secs: u32,
    },
    Paused {
        remaining_secs: u32,
    },
    Reset,
    Halfway {
        remaining_secs: u32,
    },
    /// The run reached zero. The engine is already back in `Idle`.
    Completed {
        duration_secs: u32,
        intention: Option<String>,
        started_at_millis: Option<u64>,
    },
}

#[derive(Debug, Clone)]
pub struct TimerEngine {
    limits: TimerConfig,
    state: TimerState,
    configured_secs: u32,
    remaining_secs: u32,
    intention: Option<String>,
    interval_bell: bool,
    started_at_millis: Option<u64>,
}

impl TimerEngine {
    pub fn new(limits: TimerConfig) -> Self {
        let configured_secs = limits.initial_duration();
        let interval_bell = limits.interval_bell;
        Self {
            limits,
            state: TimerState::Idle,
            configured_secs,
            remaining_secs: configured_secs,
            intention: None,
            interval_bell,
            started_at_millis: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn configured_secs(&self) -> u32 {
        self.configured_secs
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn intention(&self) -> Option<&str> {
        self.intention.as_deref()
    }

    pub fn interval_bell(&self) -> bool {
        self.interval_bell
    }

    pub fn started_at_millis(&self) -> Option<u64> {
        self.started_at_millis
    }

    /// Remaining value at which the interval bell rings.
    pub fn halfway_mark(&self) -> u32 {
        self.configured_secs / 2
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            state: self.state,
            configured_secs: self.configured_secs,
            remaining_secs: self.remaining_secs,
            intention: self.intention.clone(),
            interval_bell: self.interval_bell,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Shift the configured duration by `delta_secs`.
    ///
    /// Only honoured while idle. A target outside the configured bounds is
    /// dropped without touching any state. Returns the new duration.
    pub fn configure(&mut self, delta_secs: i64) -> Option<u32> {
        if self.state != TimerState::Idle {
            return None;
        }
        let target = self.configured_secs as i64 + delta_secs;
        if !self.limits.accepts(target) {
            return None;
        }
        self.configured_secs = target as u32;
        self.remaining_secs = self.configured_secs;
        Some(self.configured_secs)
    }

    /// Store the intention for the next run. Ignored once a run is underway.
    pub fn set_intention(&mut self, text: &str) -> bool {
        if self.state != TimerState::Idle {
            return false;
        }
        let trimmed = text.trim();
        self.intention = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        true
    }

    pub fn set_interval_bell(&mut self, enabled: bool) {
        self.interval_bell = enabled;
    }

    pub fn start(&mut self, now_millis: u64) -> Option<TimerEvent> {
        match self.state {
            TimerState::Idle | TimerState::Completed => {
                self.remaining_secs = self.configured_secs;
                self.started_at_millis = Some(now_millis);
                self.state = TimerState::Running;
                Some(TimerEvent::Started {
                    duration_secs: self.configured_secs,
                    intention: self.intention.clone(),
                })
            }
            TimerState::Paused => {
                self.state = TimerState::Running;
                Some(TimerEvent::Resumed {
                    remaining_secs: self.remaining_secs,
                })
            }
            TimerState::Running => None,
        }
    }

    pub fn pause(&mut self) -> Option<TimerEvent> {
        if self.state != TimerState::Running {
            return None;
        }
        self.state = TimerState::Paused;
        Some(TimerEvent::Paused {
            remaining_secs: self.remaining_secs,
        })
    }

    pub fn reset(&mut self) -> Option<TimerEvent> {
        match self.state {
            TimerState::Running | TimerState::Paused => {
                self.settle();
                Some(TimerEvent::Reset)
            }
            _ => None,
        }
    }

    /// Advance one second. Inert unless running.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if self.state != TimerState::Running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);

        if self.remaining_secs == 0 {
            self.state = TimerState::Completed;
            let event = TimerEvent::Completed {
                duration_secs: self.configured_secs,
                intention: self.intention.clone(),
                started_at_millis: self.started_at_millis,
            };
            self.settle();
            return Some(event);
        }

        if self.interval_bell && self.remaining_secs == self.halfway_mark() {
            return Some(TimerEvent::Halfway {
                remaining_secs: self.remaining_secs,
            });
        }
        None
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn settle(&mut self) {
        self.state = TimerState::Idle;
        self.remaining_secs = self.configured_secs;
        self.started_at_millis = None;
    }
}
