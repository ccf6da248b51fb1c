//! Event bus between the meditation runtime and the presentation layer.
//!
//! Single-threaded (WASM) with RefCell interior mutability. The runtime
//! publishes, the UI drains once per frame. A hidden tab stops egui frames
//! while the ticker keeps running, so the queue is capped and the oldest
//! events are dropped first.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use stillpoint_types::event::MeditationEvent;

pub const MAX_PENDING: usize = 256;

/// Shared event bus, clone-cheap via Rc.
#[derive(Clone)]
pub struct EventBus {
    inner: Rc<RefCell<VecDeque<MeditationEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    pub fn emit(&self, event: MeditationEvent) {
        let mut queue = self.inner.borrow_mut();
        if queue.len() == MAX_PENDING {
            if let Some(dropped) = queue.pop_front() {
                log::warn!("Event bus full, dropping {:?}", dropped);
            }
        }
        queue.push_back(event);
    }

    /// Drain all pending events in publication order.
    pub fn drain(&self) -> Vec<MeditationEvent> {
        self.inner.borrow_mut().drain(..).collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.inner.borrow().is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.inner.borrow().len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
