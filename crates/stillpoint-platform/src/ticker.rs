//! `setInterval`-backed tick source.
//!
//! The runtime disarms the ticker from inside its own callback when a
//! session completes. Dropping a wasm-bindgen closure while it runs is not
//! allowed, so a cancelled interval hands its closure to `retired`, which
//! is released on the next stop.

use std::cell::RefCell;

use gloo_timers::callback::Interval;
use stillpoint_core::ports::TickSource;
use wasm_bindgen::closure::Closure;

pub const TICK_PERIOD_MS: u32 = 1_000;

pub struct IntervalTicker {
    period_ms: u32,
    active: RefCell<Option<Interval>>,
    retired: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl IntervalTicker {
    pub fn new() -> Self {
        Self::with_period(TICK_PERIOD_MS)
    }

    pub fn with_period(period_ms: u32) -> Self {
        Self {
            period_ms,
            active: RefCell::new(None),
            retired: RefCell::new(None),
        }
    }
}

impl Default for IntervalTicker {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for IntervalTicker {
    fn start(&self, mut on_tick: Box<dyn FnMut()>) {
        self.stop();
        let interval = Interval::new(self.period_ms, move || on_tick());
        *self.active.borrow_mut() = Some(interval);
        log::debug!("Ticker armed ({}ms)", self.period_ms);
    }

    fn stop(&self) {
        let Some(interval) = self.active.borrow_mut().take() else {
            return;
        };
        let closure = interval.cancel();
        *self.retired.borrow_mut() = Some(closure);
        log::debug!("Ticker disarmed");
    }

    fn is_active(&self) -> bool {
        self.active.borrow().is_some()
    }
}
