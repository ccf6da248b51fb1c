//! Meditation runtime: the single owner of timer and statistics state.
//!
//! Replaces module-level singletons with one object built by the composition
//! root. Every transition follows the same path:
//! 1. Ask the engine to transition (it returns what happened)
//! 2. Arm or disarm the tick source to match the new state
//! 3. Log completed runs into the stats store
//! 4. Publish the event and request its audio cue
//!
//! [`RuntimeHandle`] shares the runtime with the presentation layer and with
//! the tick callback.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use stillpoint_types::{
    config::MeditationConfig,
    event::MeditationEvent,
    session::SessionRecord,
    stats::StatsSummary,
    timer::{TimerSnapshot, TimerState},
};

use crate::event_bus::EventBus;
use crate::ports::*;
use crate::stats::StatsStore;
use crate::timer::{TimerEngine, TimerEvent};

/// Platform collaborators injected at construction
#[derive(Clone)]
pub struct Ports {
    pub storage: Rc<dyn StoragePort>,
    pub audio: Rc<dyn AudioPort>,
    pub clock: Rc<dyn ClockPort>,
    pub ticker: Rc<dyn TickSource>,
}

pub struct MeditationRuntime {
    pub config: MeditationConfig,
    pub engine: TimerEngine,
    pub stats: StatsStore,
    pub event_bus: EventBus,
    audio: Rc<dyn AudioPort>,
    clock: Rc<dyn ClockPort>,
    ticker: Rc<dyn TickSource>,
    /// Start-to-finish wall time of the last completed run, pauses included
    last_wall_secs: Option<u64>,
}

impl MeditationRuntime {
    pub fn new(config: MeditationConfig, event_bus: EventBus, ports: Ports) -> Self {
        let engine = TimerEngine::new(config.timer.clone());
        let stats = StatsStore::load(ports.storage.clone(), ports.clock.clone(), &config);
        Self {
            config,
            engine,
            stats,
            event_bus,
            audio: ports.audio,
            clock: ports.clock,
            ticker: ports.ticker,
            last_wall_secs: None,
        }
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        self.engine.snapshot()
    }

    pub fn summary(&self) -> StatsSummary {
        self.stats.summary(self.clock.now_millis())
    }

    pub fn recent_sessions(&self) -> &[SessionRecord] {
        self.stats.recent()
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_active()
    }

    pub fn last_wall_secs(&self) -> Option<u64> {
        self.last_wall_secs
    }

    pub fn adjust_duration(&mut self, delta_secs: i64) -> bool {
        match self.engine.configure(delta_secs) {
            Some(duration_secs) => {
                self.config.timer.default_duration_secs = duration_secs;
                self.publish(MeditationEvent::DurationChanged { duration_secs });
                true
            }
            None => {
                log::debug!("Duration change of {}s ignored", delta_secs);
                false
            }
        }
    }

    pub fn set_intention(&mut self, text: &str) -> bool {
        self.engine.set_intention(text)
    }

    pub fn set_interval_bell(&mut self, enabled: bool) {
        self.engine.set_interval_bell(enabled);
        self.config.timer.interval_bell = enabled;
    }

    /// Start or resume. Returns true when the tick source must be armed.
    pub fn begin(&mut self) -> bool {
        let now = self.clock.now_millis();
        match self.engine.start(now) {
            Some(event) => {
                self.dispatch(event);
                true
            }
            None => false,
        }
    }

    pub fn pause(&mut self) {
        if let Some(event) = self.engine.pause() {
            self.ticker.stop();
            self.dispatch(event);
        }
    }

    pub fn reset(&mut self) {
        if let Some(event) = self.engine.reset() {
            self.ticker.stop();
            self.dispatch(event);
        }
    }

    pub fn tick(&mut self) {
        if let Some(event) = self.engine.tick() {
            self.dispatch(event);
        }
        if self.engine.state() != TimerState::Running && self.ticker.is_active() {
            self.ticker.stop();
        }
    }

    /// Wipe history and statistics. Callers confirm with the user first.
    pub fn clear_all(&mut self) {
        self.stats.clear_all();
        self.publish(MeditationEvent::HistoryCleared);
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn dispatch(&mut self, event: TimerEvent) {
        let published = match event {
            TimerEvent::Started { duration_secs, intention } => {
                log::info!("Session started ({}s)", duration_secs);
                MeditationEvent::Started { duration_secs, intention }
            }
            TimerEvent::Resumed { remaining_secs } => MeditationEvent::Resumed { remaining_secs },
            TimerEvent::Paused { remaining_secs } => MeditationEvent::Paused { remaining_secs },
            TimerEvent::Reset => {
                log::info!("Session discarded");
                MeditationEvent::Reset
            }
            TimerEvent::Halfway { remaining_secs } => MeditationEvent::Halfway { remaining_secs },
            TimerEvent::Completed { duration_secs, intention, started_at_millis } => {
                self.ticker.stop();
                let completed_at = self.clock.now_millis();
                let record = self.stats.record_session(duration_secs, intention, completed_at);
                let wall_secs = started_at_millis
                    .map(|started| completed_at.saturating_sub(started) / 1000)
                    .unwrap_or_default();
                log::info!(
                    "Session {} completed ({}s, {}s wall clock)",
                    record.id,
                    duration_secs,
                    wall_secs
                );
                self.last_wall_secs = Some(wall_secs);
                MeditationEvent::Completed(record)
            }
        };
        self.publish(published);
    }

    fn publish(&self, event: MeditationEvent) {
        if let Some(cue) = event.cue() {
            if let Err(e) = self.audio.play(cue) {
                log::warn!("Could not play {}: {}", cue.label(), e);
            }
        }
        self.event_bus.emit(event);
    }
}

/// Shared handle to the runtime, clone-cheap via Rc.
#[derive(Clone)]
pub struct RuntimeHandle {
    inner: Rc<RefCell<MeditationRuntime>>,
}

impl RuntimeHandle {
    pub fn new(runtime: MeditationRuntime) -> Self {
        Self {
            inner: Rc::new(RefCell::new(runtime)),
        }
    }

    pub fn start(&self) {
        let arm = self.inner.borrow_mut().begin();
        if arm {
            self.arm_ticker();
        }
    }

    pub fn pause(&self) {
        self.inner.borrow_mut().pause();
    }

    pub fn reset(&self) {
        self.inner.borrow_mut().reset();
    }

    pub fn tick(&self) {
        self.inner.borrow_mut().tick();
    }

    pub fn adjust_duration(&self, delta_secs: i64) -> bool {
        self.inner.borrow_mut().adjust_duration(delta_secs)
    }

    pub fn set_intention(&self, text: &str) -> bool {
        self.inner.borrow_mut().set_intention(text)
    }

    pub fn set_interval_bell(&self, enabled: bool) {
        self.inner.borrow_mut().set_interval_bell(enabled);
    }

    pub fn clear_all(&self) {
        self.inner.borrow_mut().clear_all();
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        self.inner.borrow().snapshot()
    }

    pub fn summary(&self) -> StatsSummary {
        self.inner.borrow().summary()
    }

    pub fn recent_sessions(&self) -> Vec<SessionRecord> {
        self.inner.borrow().recent_sessions().to_vec()
    }

    pub fn config(&self) -> MeditationConfig {
        self.inner.borrow().config.clone()
    }

    pub fn event_bus(&self) -> EventBus {
        self.inner.borrow().event_bus.clone()
    }

    pub fn is_ticking(&self) -> bool {
        self.inner.borrow().is_ticking()
    }

    pub fn last_wall_secs(&self) -> Option<u64> {
        self.inner.borrow().last_wall_secs()
    }

    fn arm_ticker(&self) {
        let ticker = self.inner.borrow().ticker.clone();
        let weak: Weak<RefCell<MeditationRuntime>> = Rc::downgrade(&self.inner);
        ticker.start(Box::new(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            match inner.try_borrow_mut() {
                Ok(mut runtime) => runtime.tick(),
                Err(_) => log::warn!("Tick skipped: runtime busy"),
            };
        }));
    }
}
