//! UI-level state that drives rendering.
//! This is a read-only projection of the meditation runtime,
//! refreshed each frame and updated by draining the EventBus.

use stillpoint_types::config::TimerConfig;
use stillpoint_types::event::MeditationEvent;
use stillpoint_types::session::SessionRecord;
use stillpoint_types::stats::StatsSummary;
use stillpoint_types::timer::{TimerSnapshot, TimerState};

use crate::format::quoted;

pub const BANNER_MILLIS: u64 = 3_000;
pub const BANNER_TEXT: &str = "Meditation Complete - Well Done!";

/// State visible to UI panels
pub struct UiState {
    pub snapshot: TimerSnapshot,
    pub summary: StatsSummary,
    /// Newest first, as held by the stats store
    pub recent: Vec<SessionRecord>,
    /// Intention text field content
    pub intention_input: String,
    /// Clear-history confirmation is showing
    pub confirm_clear: bool,
    /// Status line text
    pub status_text: String,
    /// Completion banner deadline (epoch millis)
    pub banner_until: Option<u64>,
}

impl UiState {
    pub fn new() -> Self {
        let timer = TimerConfig::default();
        let duration = timer.initial_duration();
        Self {
            snapshot: TimerSnapshot {
                state: TimerState::Idle,
                configured_secs: duration,
                remaining_secs: duration,
                intention: None,
                interval_bell: timer.interval_bell,
            },
            summary: StatsSummary::default(),
            recent: Vec::new(),
            intention_input: String::new(),
            confirm_clear: false,
            status_text: "Ready".to_string(),
            banner_until: None,
        }
    }

    /// Replace the cached runtime views
    pub fn sync(&mut self, snapshot: TimerSnapshot, summary: StatsSummary, recent: Vec<SessionRecord>) {
        self.snapshot = snapshot;
        self.summary = summary;
        self.recent = recent;
    }

    /// Process events from the EventBus and update UI state
    pub fn process_events(&mut self, events: Vec<MeditationEvent>, now_millis: u64) {
        for event in events {
            match event {
                MeditationEvent::Started { .. } | MeditationEvent::Resumed { .. } => {
                    self.banner_until = None;
                    self.status_text = "Meditating".to_string();
                }
                MeditationEvent::Paused { .. } => {
                    self.status_text = "Paused".to_string();
                }
                MeditationEvent::Reset => {
                    self.status_text = "Ready".to_string();
                }
                MeditationEvent::Halfway { .. } => {
                    self.status_text = "Halfway there".to_string();
                }
                MeditationEvent::Completed(record) => {
                    log::debug!("UI: session {} completed", record.id);
                    self.banner_until = Some(now_millis + BANNER_MILLIS);
                    self.status_text = "Session complete".to_string();
                }
                MeditationEvent::DurationChanged { .. } => {}
                MeditationEvent::HistoryCleared => {
                    self.confirm_clear = false;
                    self.status_text = "History cleared".to_string();
                }
            }
        }
    }

    pub fn banner_visible(&self, now_millis: u64) -> bool {
        matches!(self.banner_until, Some(until) if now_millis < until)
    }

    /// Drop the banner once its time is up
    pub fn expire_banner(&mut self, now_millis: u64) {
        if !self.banner_visible(now_millis) {
            self.banner_until = None;
        }
    }

    pub fn is_running(&self) -> bool {
        self.snapshot.state == TimerState::Running
    }

    pub fn start_label(&self) -> &'static str {
        if self.snapshot.state == TimerState::Paused {
            "Resume"
        } else {
            "Begin Meditation"
        }
    }

    /// Quoted intention: the live input while idle, the locked one otherwise.
    pub fn intention_display(&self) -> Option<String> {
        let text = if self.snapshot.is_idle() {
            Some(self.intention_input.trim())
        } else {
            self.snapshot.intention.as_deref()
        };
        text.filter(|t| !t.is_empty()).map(quoted)
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}
