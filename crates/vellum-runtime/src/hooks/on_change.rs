#![forbid(unsafe_code)]

//! Effects that skip the mount-time run.
//!
//! [`OnChangeEffect`] behaves like a dependency-tracked effect, except that
//! its first qualifying commit only arms it. From then on, every dependency
//! change runs the effect at the next commit, after running the cleanup the
//! previous run returned.
//!
//! The first-run detection is the explicit [`FirstRun`] state machine, which
//! other components (the modal's height transition, for one) reuse.
//!
//! # Invariants
//!
//! 1. Dependency sequence `[init, A, B]` runs the effect exactly twice.
//! 2. Passing `None` as dependencies means "changed on every render".
//! 3. A cleanup runs exactly once: before the next effect run, or on drop.
//! 4. Effects scheduled before the hook is dropped never run afterwards.

use std::cell::RefCell;
use std::rc::Rc;

use crate::instance::{EffectPhase, Instance};

/// Cleanup returned by an effect.
pub type Cleanup = Box<dyn FnOnce()>;

/// Two-state first-evaluation tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FirstRun {
    /// Nothing observed yet.
    #[default]
    Uninitialized,
    /// At least one evaluation happened.
    Active,
}

impl FirstRun {
    /// Record an evaluation. Returns `true` if it was the first one.
    pub fn observe(&mut self) -> bool {
        match self {
            Self::Uninitialized => {
                *self = Self::Active;
                true
            }
            Self::Active => false,
        }
    }

    #[must_use]
    pub fn is_active(self) -> bool {
        self == Self::Active
    }
}

struct Slot<D> {
    deps: Option<D>,
    first: FirstRun,
    cleanup: Option<Cleanup>,
    torn_down: bool,
}

/// Dependency-tracked effect that skips its first run.
pub struct OnChangeEffect<D> {
    instance: Instance,
    phase: EffectPhase,
    slot: Rc<RefCell<Slot<D>>>,
}

impl<D> std::fmt::Debug for OnChangeEffect<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slot = self.slot.borrow();
        f.debug_struct("OnChangeEffect")
            .field("phase", &self.phase)
            .field("first", &slot.first)
            .field("has_cleanup", &slot.cleanup.is_some())
            .finish()
    }
}

impl<D: PartialEq + 'static> OnChangeEffect<D> {
    /// Create an effect that runs in `phase`.
    #[must_use]
    pub fn new(instance: &Instance, phase: EffectPhase) -> Self {
        Self {
            instance: instance.clone(),
            phase,
            slot: Rc::new(RefCell::new(Slot {
                deps: None,
                first: FirstRun::Uninitialized,
                cleanup: None,
                torn_down: false,
            })),
        }
    }

    /// Post-paint variant.
    #[must_use]
    pub fn on_commit(instance: &Instance) -> Self {
        Self::new(instance, EffectPhase::Commit)
    }

    /// Pre-paint variant.
    #[must_use]
    pub fn on_layout(instance: &Instance) -> Self {
        Self::new(instance, EffectPhase::Layout)
    }

    /// Evaluate during render.
    ///
    /// If `deps` differ from the previous evaluation (or are `None`), the
    /// effect is scheduled for the next commit. The first scheduled run is
    /// swallowed.
    pub fn evaluate<F>(&self, deps: Option<D>, effect: F)
    where
        F: FnOnce() -> Option<Cleanup> + 'static,
    {
        {
            let mut slot = self.slot.borrow_mut();
            let changed = match (&deps, &slot.deps) {
                (Some(new), Some(old)) => new != old,
                _ => true,
            };
            if !changed {
                return;
            }
            slot.deps = deps;
        }

        let slot = Rc::clone(&self.slot);
        self.instance.schedule_effect(self.phase, move || {
            let prior = {
                let mut s = slot.borrow_mut();
                if s.torn_down || s.first.observe() {
                    return;
                }
                s.cleanup.take()
            };
            if let Some(cleanup) = prior {
                cleanup();
            }
            let cleanup = effect();
            slot.borrow_mut().cleanup = cleanup;
        });
    }

    /// Whether the mount-time evaluation has been committed.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.slot.borrow().first.is_active()
    }
}

impl<D> Drop for OnChangeEffect<D> {
    fn drop(&mut self) {
        let cleanup = {
            let mut slot = self.slot.borrow_mut();
            slot.torn_down = true;
            slot.cleanup.take()
        };
        if let Some(cleanup) = cleanup {
            cleanup();
        }
    }
}
