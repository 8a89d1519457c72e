#![forbid(unsafe_code)]

//! Debounced "window is resizing" flag.

use std::cell::Cell;
use std::rc::Rc;

use vellum_core::{Host, ListenerGuard, Size, TimerId, TimerQueue};

use super::force_rerender::ForceRerender;
use crate::instance::Instance;

/// True from the first resize event until a quiet period passes without
/// another one ([`TimingConfig::resize_quiet`](vellum_core::TimingConfig::resize_quiet),
/// 1000ms by default).
///
/// The owning instance is asked to render on each flip. Dropping the hook
/// detaches the resize listener and cancels the pending timer.
pub struct ResizeActivity {
    resizing: Rc<Cell<bool>>,
    pending: Rc<Cell<Option<TimerId>>>,
    timers: TimerQueue,
    _listener: ListenerGuard<Size>,
}

impl std::fmt::Debug for ResizeActivity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResizeActivity")
            .field("resizing", &self.resizing.get())
            .field("pending", &self.pending.get())
            .finish()
    }
}

impl ResizeActivity {
    #[must_use]
    pub fn new(host: &Host, instance: &Instance) -> Self {
        let quiet = host.config().resize_quiet();
        let resizing = Rc::new(Cell::new(false));
        let pending: Rc<Cell<Option<TimerId>>> = Rc::new(Cell::new(None));
        let timers = host.timers().clone();
        let rerender = ForceRerender::new(instance);

        let listener = {
            let (resizing, pending, timers) =
                (Rc::clone(&resizing), Rc::clone(&pending), timers.clone());
            host.resize_listeners().subscribe(move |_size| {
                if !resizing.replace(true) {
                    tracing::trace!("resize activity started");
                    rerender.trigger();
                }
                if let Some(id) = pending.take() {
                    timers.cancel(id);
                }
                let (flag, slot, rerender) =
                    (Rc::clone(&resizing), Rc::clone(&pending), rerender.clone());
                let id = timers.set_timeout(quiet, move || {
                    slot.set(None);
                    if flag.replace(false) {
                        tracing::trace!("resize activity settled");
                        rerender.trigger();
                    }
                });
                pending.set(Some(id));
            })
        };

        Self {
            resizing,
            pending,
            timers,
            _listener: listener,
        }
    }

    /// Whether a resize happened within the quiet period.
    #[must_use]
    pub fn is_resizing(&self) -> bool {
        self.resizing.get()
    }
}

impl Drop for ResizeActivity {
    fn drop(&mut self) {
        if let Some(id) = self.pending.take() {
            self.timers.cancel(id);
        }
    }
}
