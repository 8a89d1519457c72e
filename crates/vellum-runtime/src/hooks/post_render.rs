#![forbid(unsafe_code)]

//! Callbacks deferred until after the next commit.
//!
//! Anything may push onto a [`PostRenderQueue`] (render code, event
//! handlers, timers). The queue drains at the end of every commit of its
//! instance, newest callback first, and each callback runs exactly once.
//! Callbacks queued while the queue is draining run in the same drain.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::instance::{CommitHookGuard, EffectPhase, Instance};

type Deferred = Box<dyn FnOnce()>;
type Queue = RefCell<Vec<Deferred>>;

fn drain(queue: &Queue) -> usize {
    let mut ran = 0;
    loop {
        let next = queue.borrow_mut().pop();
        let Some(callback) = next else { break };
        callback();
        ran += 1;
    }
    if ran > 0 {
        tracing::trace!(ran, "post-render queue drained");
    }
    ran
}

/// Per-instance queue of post-commit callbacks.
pub struct PostRenderQueue {
    queue: Rc<Queue>,
    _hook: CommitHookGuard,
}

impl std::fmt::Debug for PostRenderQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostRenderQueue")
            .field("queued", &self.len())
            .finish()
    }
}

impl PostRenderQueue {
    #[must_use]
    pub fn new(instance: &Instance) -> Self {
        let queue: Rc<Queue> = Rc::new(RefCell::new(Vec::new()));
        let q = Rc::clone(&queue);
        let hook = instance.on_commit(EffectPhase::Commit, move || {
            drain(&q);
        });
        Self { queue, _hook: hook }
    }

    /// Run `callback` after the next commit.
    pub fn defer(&self, callback: impl FnOnce() + 'static) {
        self.queue.borrow_mut().push(Box::new(callback));
    }

    /// A cloneable handle for deferring from closures.
    #[must_use]
    pub fn deferrer(&self) -> Deferrer {
        Deferrer {
            queue: Rc::downgrade(&self.queue),
        }
    }

    /// Callbacks waiting for the next commit.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Weak handle onto a [`PostRenderQueue`].
#[derive(Clone)]
pub struct Deferrer {
    queue: Weak<Queue>,
}

impl std::fmt::Debug for Deferrer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deferrer").finish_non_exhaustive()
    }
}

impl Deferrer {
    /// Queue `callback`. Returns `false` (dropping it) if the queue is gone.
    pub fn defer(&self, callback: impl FnOnce() + 'static) -> bool {
        match self.queue.upgrade() {
            Some(queue) => {
                queue.borrow_mut().push(Box::new(callback));
                true
            }
            None => false,
        }
    }
}
