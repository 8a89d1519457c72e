#![forbid(unsafe_code)]

//! Re-render on a fixed interval.

use web_time::Duration;

use vellum_core::{Host, TimerId, TimerQueue};

use super::force_rerender::ForceRerender;
use crate::instance::Instance;

/// Forces a render of its instance every `interval`.
///
/// Call [`sync`](Self::sync) on each render with the current interval; a
/// changed value restarts the timer. Dropping the hook clears it.
#[derive(Debug)]
pub struct IntervalRender {
    timers: TimerQueue,
    rerender: ForceRerender,
    active: Option<(Duration, TimerId)>,
}

impl IntervalRender {
    #[must_use]
    pub fn new(host: &Host, instance: &Instance, interval: Duration) -> Self {
        let mut this = Self {
            timers: host.timers().clone(),
            rerender: ForceRerender::new(instance),
            active: None,
        };
        this.sync(interval);
        this
    }

    /// Restart the timer if `interval` differs from the running one.
    pub fn sync(&mut self, interval: Duration) {
        if matches!(self.active, Some((current, _)) if current == interval) {
            return;
        }
        self.stop();
        let rerender = self.rerender.clone();
        let id = self.timers.set_interval(interval, move || rerender.trigger());
        tracing::debug!(interval_ms = interval.as_millis() as u64, "interval render started");
        self.active = Some((interval, id));
    }

    /// The interval currently running.
    #[must_use]
    pub fn interval(&self) -> Option<Duration> {
        self.active.map(|(interval, _)| interval)
    }

    fn stop(&mut self) {
        if let Some((_, id)) = self.active.take() {
            self.timers.cancel(id);
        }
    }
}

impl Drop for IntervalRender {
    fn drop(&mut self) {
        self.stop();
    }
}
