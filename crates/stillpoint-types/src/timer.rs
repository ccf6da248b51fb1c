use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    /// Transient: the engine passes through it on the final tick and
    /// settles back to `Idle` before returning.
    Completed,
}

/// Read-only view of the timer handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub state: TimerState,
    pub configured_secs: u32,
    pub remaining_secs: u32,
    pub intention: Option<String>,
    pub interval_bell: bool,
}

impl TimerSnapshot {
    /// 0.0 .. 100.0 elapsed share of the configured duration.
    pub fn progress_pct(&self) -> f64 {
        if self.configured_secs == 0 {
            return 0.0;
        }
        let elapsed = self.configured_secs.saturating_sub(self.remaining_secs);
        elapsed as f64 / self.configured_secs as f64 * 100.0
    }

    pub fn is_idle(&self) -> bool {
        self.state == TimerState::Idle
    }
}
