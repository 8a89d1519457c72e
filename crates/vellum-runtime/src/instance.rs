#![forbid(unsafe_code)]

//! Owning UI units and their render/commit cycle.
//!
//! An [`Instance`] is the thing a component's hooks belong to. The host
//! drives it in two steps:
//!
//! 1. [`Instance::render`] runs the view. Hooks may *schedule* effects while
//!    rendering but never run them.
//! 2. [`Instance::commit`] runs scheduled effects and persistent commit
//!    hooks, layout phase first, then commit phase.
//!
//! # Invariants
//!
//! 1. Effects scheduled during a render run exactly once, at the next commit.
//! 2. Within a commit, every [`EffectPhase::Layout`] callback runs before any
//!    [`EffectPhase::Commit`] callback; within a phase, one-shot effects run
//!    in scheduling order and then persistent hooks in registration order.
//! 3. After [`Instance::dispose`], render requests are ignored and pending
//!    effects are dropped unrun.
//!
//! # Failure Modes
//!
//! - Render requested during render: honored; `needs_render()` stays true
//!   after the current render returns.
//! - Effect scheduled during commit: deferred to the following commit.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

static INSTANCE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// When a commit-time callback runs relative to painting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectPhase {
    /// Before paint, right after the tree is committed.
    Layout,
    /// After paint.
    Commit,
}

/// Where an instance currently is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Rendering,
    Committing,
}

type Effect = Box<dyn FnOnce()>;

struct CommitHook {
    id: u64,
    phase: EffectPhase,
    run: Rc<dyn Fn()>,
}

struct InstanceInner {
    id: u64,
    pending: Cell<bool>,
    renders: Cell<u64>,
    phase: Cell<Phase>,
    disposed: Cell<bool>,
    effects: RefCell<Vec<(EffectPhase, Effect)>>,
    hooks: RefCell<Vec<CommitHook>>,
    next_hook: Cell<u64>,
}

/// A component instance. Clones share identity.
#[derive(Clone)]
pub struct Instance {
    inner: Rc<InstanceInner>,
}

impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("id", &self.inner.id)
            .field("phase", &self.inner.phase.get())
            .field("renders", &self.inner.renders.get())
            .field("pending", &self.inner.pending.get())
            .field("disposed", &self.inner.disposed.get())
            .finish()
    }
}

impl Default for Instance {
    fn default() -> Self {
        Self::new()
    }
}

impl Instance {
    /// Create an instance that wants its first render.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(InstanceInner {
                id: INSTANCE_ID_COUNTER.fetch_add(1, Ordering::Relaxed),
                pending: Cell::new(true),
                renders: Cell::new(0),
                phase: Cell::new(Phase::Idle),
                disposed: Cell::new(false),
                effects: RefCell::new(Vec::new()),
                hooks: RefCell::new(Vec::new()),
                next_hook: Cell::new(0),
            }),
        }
    }

    /// Unique instance id.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// A weak handle that can request renders without keeping the instance alive.
    #[must_use]
    pub fn handle(&self) -> RenderHandle {
        RenderHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Whether a render has been requested and not yet performed.
    #[must_use]
    pub fn needs_render(&self) -> bool {
        self.inner.pending.get() && !self.inner.disposed.get()
    }

    /// Number of completed or in-progress renders.
    #[must_use]
    pub fn render_count(&self) -> u64 {
        self.inner.renders.get()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.inner.phase.get()
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }

    /// Request a render on the next cycle.
    pub fn request_render(&self) -> bool {
        request(&self.inner)
    }

    /// Run one render pass.
    pub fn render<R>(&self, view: impl FnOnce() -> R) -> R {
        debug_assert_eq!(self.phase(), Phase::Idle, "render while {:?}", self.phase());
        let inner = &self.inner;
        inner.pending.set(false);
        inner.renders.set(inner.renders.get() + 1);
        inner.phase.set(Phase::Rendering);
        let _span = tracing::trace_span!(
            "instance_render",
            instance = inner.id,
            render = inner.renders.get()
        )
        .entered();
        let out = view();
        inner.phase.set(Phase::Idle);
        out
    }

    /// Schedule a one-shot effect for the next commit.
    pub fn schedule_effect(&self, phase: EffectPhase, effect: impl FnOnce() + 'static) {
        if self.is_disposed() {
            return;
        }
        self.inner
            .effects
            .borrow_mut()
            .push((phase, Box::new(effect)));
    }

    /// Run `hook` at every commit until the guard is dropped.
    #[must_use = "dropping the guard removes the commit hook"]
    pub fn on_commit(&self, phase: EffectPhase, hook: impl Fn() + 'static) -> CommitHookGuard {
        let id = self.inner.next_hook.get() + 1;
        self.inner.next_hook.set(id);
        self.inner.hooks.borrow_mut().push(CommitHook {
            id,
            phase,
            run: Rc::new(hook),
        });
        CommitHookGuard {
            inner: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Commit the last render: run scheduled effects and commit hooks.
    ///
    /// Returns the number of callbacks run.
    pub fn commit(&self) -> usize {
        if self.is_disposed() {
            return 0;
        }
        debug_assert_eq!(self.phase(), Phase::Idle, "commit while {:?}", self.phase());
        let inner = &self.inner;
        inner.phase.set(Phase::Committing);
        let effects = std::mem::take(&mut *inner.effects.borrow_mut());
        let (layout, commit): (Vec<_>, Vec<_>) = effects
            .into_iter()
            .partition(|(phase, _)| *phase == EffectPhase::Layout);

        let mut ran = 0;
        for (phase, batch) in [(EffectPhase::Layout, layout), (EffectPhase::Commit, commit)] {
            for (_, effect) in batch {
                effect();
                ran += 1;
            }
            let hooks: Vec<Rc<dyn Fn()>> = inner
                .hooks
                .borrow()
                .iter()
                .filter(|h| h.phase == phase)
                .map(|h| Rc::clone(&h.run))
                .collect();
            for hook in hooks {
                hook();
                ran += 1;
            }
        }

        inner.phase.set(Phase::Idle);
        tracing::trace!(instance = inner.id, ran, "instance committed");
        ran
    }

    /// Tear the instance down. Pending effects are dropped unrun.
    pub fn dispose(&self) {
        if self.inner.disposed.replace(true) {
            return;
        }
        self.inner.pending.set(false);
        self.inner.effects.borrow_mut().clear();
        tracing::debug!(instance = self.inner.id, "instance disposed");
    }
}

fn request(inner: &InstanceInner) -> bool {
    if inner.disposed.get() {
        tracing::trace!(instance = inner.id, "render request on disposed instance ignored");
        return false;
    }
    inner.pending.set(true);
    true
}

/// Weak render-request handle, safe to capture in timers and listeners.
#[derive(Clone)]
pub struct RenderHandle {
    inner: Weak<InstanceInner>,
}

impl std::fmt::Debug for RenderHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderHandle")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl RenderHandle {
    /// Request a render. Returns `false` if the instance is gone or disposed.
    pub fn request_render(&self) -> bool {
        match self.inner.upgrade() {
            Some(inner) => request(&inner),
            None => false,
        }
    }
}

/// Keeps a commit hook installed until dropped.
#[must_use = "dropping the guard removes the commit hook"]
pub struct CommitHookGuard {
    inner: Weak<InstanceInner>,
    id: u64,
}

impl std::fmt::Debug for CommitHookGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommitHookGuard")
            .field("id", &self.id)
            .finish()
    }
}

impl Drop for CommitHookGuard {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.hooks.borrow_mut().retain(|h| h.id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_instance_wants_first_render() {
        let instance = Instance::new();
        assert!(instance.needs_render());
        instance.render(|| ());
        assert!(!instance.needs_render());
        assert_eq!(instance.render_count(), 1);
    }

    #[test]
    fn request_during_render_survives() {
        let instance = Instance::new();
        let handle = instance.handle();
        instance.render(|| {
            assert_eq!(instance.phase(), Phase::Rendering);
            handle.request_render();
        });
        assert!(instance.needs_render());
    }

    #[test]
    fn effects_wait_for_commit_and_run_layout_first() {
        let instance = Instance::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let _hook = {
            let l = Rc::clone(&log);
            instance.on_commit(EffectPhase::Commit, move || l.borrow_mut().push("hook"))
        };

        instance.render(|| {
            let l = Rc::clone(&log);
            instance.schedule_effect(EffectPhase::Commit, move || l.borrow_mut().push("commit"));
            let l = Rc::clone(&log);
            instance.schedule_effect(EffectPhase::Layout, move || l.borrow_mut().push("layout"));
        });
        assert!(log.borrow().is_empty());

        assert_eq!(instance.commit(), 3);
        assert_eq!(*log.borrow(), vec!["layout", "commit", "hook"]);

        // One-shot effects are gone; the hook persists.
        instance.render(|| ());
        assert_eq!(instance.commit(), 1);
    }

    #[test]
    fn dropping_hook_guard_removes_hook() {
        let instance = Instance::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let guard = instance.on_commit(EffectPhase::Layout, move || h.set(h.get() + 1));
        instance.commit();
        drop(guard);
        instance.commit();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn disposed_instance_ignores_requests_and_effects() {
        let instance = Instance::new();
        let handle = instance.handle();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        instance.schedule_effect(EffectPhase::Commit, move || h.set(h.get() + 1));

        instance.dispose();
        assert!(!handle.request_render());
        assert!(!instance.needs_render());
        assert_eq!(instance.commit(), 0);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn handle_outliving_instance_is_inert() {
        let instance = Instance::new();
        let handle = instance.handle();
        drop(instance);
        assert!(!handle.request_render());
    }
}
