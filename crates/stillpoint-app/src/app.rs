//! Main egui application: composes the panels and drives the runtime.

use std::rc::Rc;
use std::time::Duration;

use egui::{self, CentralPanel, ScrollArea};

use stillpoint_core::event_bus::EventBus;
use stillpoint_core::ports::{ClockPort, StoragePort};
use stillpoint_core::runtime::{MeditationRuntime, Ports, RuntimeHandle};
use stillpoint_platform::storage::open_storage;
use stillpoint_platform::{BrowserClock, IntervalTicker, WebAudioCuePlayer};
use stillpoint_types::config::{MeditationConfig, StorageBackendType, CONFIG_KEY};
use stillpoint_types::event::MeditationEvent;
use stillpoint_ui::panels::history::{self, HistoryAction};
use stillpoint_ui::panels::stats;
use stillpoint_ui::panels::timer::{self, TimerAction};
use stillpoint_ui::state::{UiState, BANNER_TEXT};
use stillpoint_ui::theme;

const MAX_CONTENT_WIDTH: f32 = 520.0;
/// Repaint cadence while the countdown or banner is on screen
const LIVE_REPAINT: Duration = Duration::from_millis(250);

/// The main application state
pub struct MeditationApp {
    ui_state: UiState,
    handle: RuntimeHandle,
    event_bus: EventBus,
    storage: Rc<dyn StoragePort>,
    clock: Rc<dyn ClockPort>,
    step_secs: u32,
    first_frame: bool,
}

impl MeditationApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        // Config lives next to the history, so read it through the default
        // backend first and reopen only if it asks for something else.
        let default_storage = open_storage(&StorageBackendType::Auto);
        let config = Self::restore_config(default_storage.as_ref());
        let storage = if config.storage.backend == StorageBackendType::Auto {
            default_storage
        } else {
            open_storage(&config.storage.backend)
        };

        let clock: Rc<dyn ClockPort> = Rc::new(BrowserClock::new());
        let ports = Ports {
            storage: storage.clone(),
            audio: Rc::new(WebAudioCuePlayer::new()),
            clock: clock.clone(),
            ticker: Rc::new(IntervalTicker::new()),
        };

        let step_secs = config.timer.step_secs;
        let event_bus = EventBus::new();
        let runtime = MeditationRuntime::new(config, event_bus.clone(), ports);
        let handle = RuntimeHandle::new(runtime);

        let mut ui_state = UiState::new();
        ui_state.sync(handle.snapshot(), handle.summary(), handle.recent_sessions());

        log::info!("Stillpoint ready (storage: {})", storage.backend_name());

        Self {
            ui_state,
            handle,
            event_bus,
            storage,
            clock,
            step_secs,
            first_frame: true,
        }
    }

    /// Saved config, or defaults when absent, unreadable or out of range
    fn restore_config(storage: &dyn StoragePort) -> MeditationConfig {
        match storage.get(CONFIG_KEY) {
            Ok(Some(json)) => match MeditationConfig::from_json(&json) {
                Ok(config) => {
                    log::info!("Config restored from storage");
                    config
                }
                Err(e) => {
                    log::warn!("Ignoring stored config: {}", e);
                    MeditationConfig::default()
                }
            },
            Ok(None) => MeditationConfig::default(),
            Err(e) => {
                log::warn!("Could not read config: {}", e);
                MeditationConfig::default()
            }
        }
    }

    /// Persist the runtime's current config (best effort)
    fn save_config(&self) {
        let config = self.handle.config();
        let result = serde_json::to_string(&config)
            .map_err(Into::into)
            .and_then(|json| self.storage.set(CONFIG_KEY, &json));
        match result {
            Ok(()) => log::debug!("Config saved to storage"),
            Err(e) => log::warn!("Could not save config: {}", e),
        }
    }

    fn apply_timer_action(&mut self, action: TimerAction) {
        match action {
            TimerAction::None => {}
            TimerAction::Start => self.handle.start(),
            TimerAction::Pause => self.handle.pause(),
            TimerAction::Reset => self.handle.reset(),
            TimerAction::AdjustDuration(delta) => {
                self.handle.adjust_duration(delta);
            }
            TimerAction::IntentionChanged(text) => {
                self.handle.set_intention(&text);
            }
            TimerAction::SetIntervalBell(enabled) => {
                self.handle.set_interval_bell(enabled);
                self.save_config();
            }
        }
    }
}

impl eframe::App for MeditationApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.first_frame {
            theme::apply_theme(ctx);
            self.first_frame = false;
        }

        let now = self.clock.now_millis();

        // Drain events from the runtime
        let events = self.event_bus.drain();
        if !events.is_empty() {
            let duration_changed = events
                .iter()
                .any(|e| matches!(e, MeditationEvent::DurationChanged { .. }));
            self.ui_state.process_events(events, now);
            if duration_changed {
                self.save_config();
            }
        }

        self.ui_state.sync(
            self.handle.snapshot(),
            self.handle.summary(),
            self.handle.recent_sessions(),
        );
        self.ui_state.expire_banner(now);

        if self.ui_state.is_running() || self.ui_state.banner_visible(now) {
            ctx.request_repaint_after(LIVE_REPAINT);
        }

        // ── Main content ─────────────────────────────────────
        let mut timer_action = TimerAction::None;
        let mut history_action = HistoryAction::None;

        CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.set_max_width(MAX_CONTENT_WIDTH);

                    timer_action = timer::timer_panel(ui, &mut self.ui_state, self.step_secs);
                    ui.add_space(12.0);

                    stats::stats_panel(ui, &self.ui_state.summary);
                    ui.add_space(12.0);

                    history_action =
                        history::history_panel(ui, &mut self.ui_state, self.clock.as_ref());
                });
            });
        });

        if self.ui_state.banner_visible(now) {
            timer::completion_banner(ctx, BANNER_TEXT);
        }

        if timer_action != TimerAction::None {
            self.apply_timer_action(timer_action);
            ctx.request_repaint();
        }
        if history_action == HistoryAction::ClearConfirmed {
            self.handle.clear_all();
            ctx.request_repaint();
        }
    }
}
