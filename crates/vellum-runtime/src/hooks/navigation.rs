#![forbid(unsafe_code)]

//! Client-side navigation intent.

use std::cell::Cell;
use std::rc::Rc;

use vellum_core::{Host, MouseEvent, TimerId, TimerQueue};
use web_time::Duration;

use super::force_rerender::ForceRerender;
use crate::instance::Instance;

/// Tracks "a link was just clicked, navigation is in flight".
///
/// A plain link click sets the flag for the navigation window (5000ms by
/// default). Clicks that open a new tab or window (ctrl/meta held) are
/// ignored. A second click restarts the window.
#[derive(Debug)]
pub struct LinkNavigation {
    navigating: Rc<Cell<bool>>,
    pending: Rc<Cell<Option<TimerId>>>,
    timers: TimerQueue,
    rerender: ForceRerender,
    window: Duration,
}

impl LinkNavigation {
    #[must_use]
    pub fn new(host: &Host, instance: &Instance) -> Self {
        Self {
            navigating: Rc::new(Cell::new(false)),
            pending: Rc::new(Cell::new(None)),
            timers: host.timers().clone(),
            rerender: ForceRerender::new(instance),
            window: host.config().navigation_window(),
        }
    }

    #[must_use]
    pub fn is_navigating(&self) -> bool {
        self.navigating.get()
    }

    /// Handle a click on a link. Returns `true` if it counts as navigation.
    pub fn on_link_click(&self, event: &MouseEvent) -> bool {
        if event.modifiers.opens_new_context() {
            return false;
        }
        if !self.navigating.replace(true) {
            self.rerender.trigger();
        }
        if let Some(id) = self.pending.take() {
            self.timers.cancel(id);
        }

        let (flag, slot, rerender) = (
            Rc::clone(&self.navigating),
            Rc::clone(&self.pending),
            self.rerender.clone(),
        );
        let id = self.timers.set_timeout(self.window, move || {
            slot.set(None);
            if flag.replace(false) {
                rerender.trigger();
            }
        });
        self.pending.set(Some(id));
        tracing::debug!(window_ms = self.window.as_millis() as u64, "link navigation started");
        true
    }
}

impl Drop for LinkNavigation {
    fn drop(&mut self) {
        if let Some(id) = self.pending.take() {
            self.timers.cancel(id);
        }
    }
}
