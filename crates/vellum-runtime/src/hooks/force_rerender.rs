#![forbid(unsafe_code)]

//! Force re-render trigger.

use std::cell::Cell;
use std::rc::Rc;

use crate::instance::{Instance, RenderHandle};

/// Zero-argument trigger that makes the owning instance render again.
///
/// Each trigger bumps a private counter; the value itself is never exposed,
/// only the render request it causes.
#[derive(Clone)]
pub struct ForceRerender {
    handle: RenderHandle,
    ticks: Rc<Cell<u64>>,
}

impl std::fmt::Debug for ForceRerender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForceRerender")
            .field("handle", &self.handle)
            .finish()
    }
}

impl ForceRerender {
    #[must_use]
    pub fn new(instance: &Instance) -> Self {
        Self {
            handle: instance.handle(),
            ticks: Rc::new(Cell::new(0)),
        }
    }

    /// Request a render of the owning instance.
    pub fn trigger(&self) {
        self.ticks.set(self.ticks.get().wrapping_add(1));
        self.handle.request_render();
    }

    /// The trigger as a plain closure.
    pub fn as_fn(&self) -> impl Fn() + 'static {
        let this = self.clone();
        move || this.trigger()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_requests_render() {
        let instance = Instance::new();
        instance.render(|| ());
        assert!(!instance.needs_render());

        let force = ForceRerender::new(&instance);
        force.trigger();
        assert!(instance.needs_render());

        instance.render(|| ());
        let f = force.as_fn();
        f();
        f();
        assert!(instance.needs_render());
        instance.render(|| ());
        assert!(!instance.needs_render());
    }
}
