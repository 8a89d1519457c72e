#![forbid(unsafe_code)]

//! Debounced, delayed re-render.

use std::cell::Cell;
use std::rc::Rc;

use web_time::Duration;

use vellum_core::{Host, TimerId, TimerQueue};

use super::force_rerender::ForceRerender;
use crate::instance::Instance;

/// Schedules a single future render of its instance.
///
/// Each [`schedule`](Self::schedule) cancels the pending one first, so rapid
/// calls coalesce into one render, `delay` after the last call. Dropping the
/// hook cancels any pending render.
#[derive(Debug)]
pub struct ScheduledRender {
    timers: TimerQueue,
    rerender: ForceRerender,
    pending: Rc<Cell<Option<TimerId>>>,
}

impl ScheduledRender {
    #[must_use]
    pub fn new(host: &Host, instance: &Instance) -> Self {
        Self {
            timers: host.timers().clone(),
            rerender: ForceRerender::new(instance),
            pending: Rc::new(Cell::new(None)),
        }
    }

    /// (Re)schedule a render `delay` from now.
    pub fn schedule(&self, delay: Duration) {
        self.cancel();
        let rerender = self.rerender.clone();
        let pending = Rc::clone(&self.pending);
        let id = self.timers.set_timeout(delay, move || {
            pending.set(None);
            rerender.trigger();
        });
        self.pending.set(Some(id));
    }

    /// Cancel the pending render, if any.
    pub fn cancel(&self) -> bool {
        match self.pending.take() {
            Some(id) => self.timers.cancel(id),
            None => false,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.get().is_some()
    }

    /// A closure form of [`schedule`](Self::schedule), for event handlers.
    pub fn scheduler(&self) -> impl Fn(Duration) + 'static {
        let timers = self.timers.clone();
        let rerender = self.rerender.clone();
        let pending = Rc::clone(&self.pending);
        move |delay| {
            if let Some(id) = pending.take() {
                timers.cancel(id);
            }
            let (rerender, slot) = (rerender.clone(), Rc::clone(&pending));
            let id = timers.set_timeout(delay, move || {
                slot.set(None);
                rerender.trigger();
            });
            pending.set(Some(id));
        }
    }
}

impl Drop for ScheduledRender {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn reschedule_supersedes_pending() {
        let host = Host::new();
        let instance = Instance::new();
        instance.render(|| ());
        let scheduled = ScheduledRender::new(&host, &instance);

        scheduled.schedule(ms(100));
        host.advance(ms(50));
        scheduled.schedule(ms(100));
        assert_eq!(host.timers().pending(), 1);

        host.advance(ms(99));
        assert!(!instance.needs_render());
        host.advance(ms(1));
        assert!(instance.needs_render());
        assert!(!scheduled.is_pending());
    }

    #[test]
    fn closure_form_shares_the_pending_slot() {
        let host = Host::new();
        let instance = Instance::new();
        instance.render(|| ());
        let scheduled = ScheduledRender::new(&host, &instance);
        let schedule = scheduled.scheduler();

        scheduled.schedule(ms(10));
        schedule(ms(30));
        assert_eq!(host.timers().pending(), 1);
        host.advance(ms(10));
        assert!(!instance.needs_render());
        host.advance(ms(20));
        assert!(instance.needs_render());
    }

    #[test]
    fn drop_cancels_pending() {
        let host = Host::new();
        let instance = Instance::new();
        instance.render(|| ());
        let scheduled = ScheduledRender::new(&host, &instance);
        scheduled.schedule(ms(5));
        drop(scheduled);
        assert_eq!(host.timers().pending(), 0);
        host.advance(ms(10));
        assert!(!instance.needs_render());
    }
}
