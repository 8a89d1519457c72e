#![forbid(unsafe_code)]

//! Host-agnostic timer queue on a virtual clock.
//!
//! [`TimerQueue`] stands in for `setTimeout`/`setInterval` style facilities.
//! The host owns the clock: it calls [`TimerQueue::advance`] from its event
//! loop (or tests call it directly) and every timer that became due within
//! the advanced span fires, in due order.
//!
//! # Invariants
//!
//! 1. Timers fire in ascending due time; ties fire in scheduling order.
//! 2. The clock observed from inside a callback equals that timer's due time.
//! 3. A timer cancelled before it fires never runs, including when the
//!    cancellation happens from inside another callback in the same
//!    `advance` span.
//! 4. The queue never holds its internal borrow while running a callback,
//!    so callbacks may schedule and cancel timers freely.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Cancel of unknown id | Already fired or cancelled | No-op, returns `false` |
//! | Zero interval period | Caller passed `Duration::ZERO` | Clamped to [`MIN_PERIOD`] |
//! | Nested `advance` | Called from a timer callback | Ignored, logged at `warn` |
//! | Panicking callback | Bug in caller code | Panic propagates; the queue stays usable |
//! | Clock overflow | Deadline past `Duration::MAX` | Saturates; a repeat that cannot be rescheduled is dropped |

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use ahash::AHashMap;
use web_time::Duration;

/// Smallest period accepted for repeating timers.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Identifier of a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Raw id value.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

type Callback = Rc<RefCell<dyn FnMut()>>;

struct TimerEntry {
    due: Duration,
    seq: u64,
    period: Option<Duration>,
    callback: Callback,
}

#[derive(Default)]
struct TimerState {
    now: Duration,
    next_id: u64,
    next_seq: u64,
    entries: AHashMap<TimerId, TimerEntry>,
}

impl TimerState {
    fn insert(&mut self, delay: Duration, period: Option<Duration>, callback: Callback) -> TimerId {
        self.next_id += 1;
        self.next_seq += 1;
        let id = TimerId(self.next_id);
        self.entries.insert(
            id,
            TimerEntry {
                due: self.now.saturating_add(delay),
                seq: self.next_seq,
                period,
                callback,
            },
        );
        id
    }

    /// Pop the next timer due at or before `deadline`, rescheduling repeats.
    fn take_due(&mut self, deadline: Duration) -> Option<Callback> {
        let (&id, _) = self
            .entries
            .iter()
            .filter(|(_, e)| e.due <= deadline)
            .min_by_key(|(_, e)| (e.due, e.seq))?;

        let entry = self.entries.get_mut(&id)?;
        self.now = entry.due;
        let callback = Rc::clone(&entry.callback);
        match entry.period.and_then(|period| entry.due.checked_add(period)) {
            Some(next_due) => {
                self.next_seq += 1;
                entry.due = next_due;
                entry.seq = self.next_seq;
            }
            None => {
                self.entries.remove(&id);
            }
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(timer_id = id.0, "timer fired");
        Some(callback)
    }
}

/// Clears the re-entrancy flag even if a callback unwinds.
struct AdvanceGuard<'a>(&'a Cell<bool>);

impl Drop for AdvanceGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Shared timer queue. Cloning yields another handle to the same queue.
#[derive(Clone, Default)]
pub struct TimerQueue {
    state: Rc<RefCell<TimerState>>,
    advancing: Rc<Cell<bool>>,
}

impl std::fmt::Debug for TimerQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("TimerQueue")
            .field("now", &state.now)
            .field("pending", &state.entries.len())
            .finish()
    }
}

impl TimerQueue {
    /// Create an empty queue with the clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    /// Number of timers waiting to fire.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.state.borrow().entries.len()
    }

    /// Whether `id` is still scheduled.
    #[must_use]
    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.state.borrow().entries.contains_key(&id)
    }

    /// Run `callback` once, `delay` from now.
    pub fn set_timeout(&self, delay: Duration, callback: impl FnMut() + 'static) -> TimerId {
        let id = self
            .state
            .borrow_mut()
            .insert(delay, None, Rc::new(RefCell::new(callback)));
        #[cfg(feature = "tracing")]
        tracing::trace!(timer_id = id.0, delay_ms = delay.as_millis() as u64, "timeout scheduled");
        id
    }

    /// Run `callback` every `period`, first firing one period from now.
    pub fn set_interval(&self, period: Duration, callback: impl FnMut() + 'static) -> TimerId {
        let period = period.max(MIN_PERIOD);
        let id = self
            .state
            .borrow_mut()
            .insert(period, Some(period), Rc::new(RefCell::new(callback)));
        #[cfg(feature = "tracing")]
        tracing::trace!(timer_id = id.0, period_ms = period.as_millis() as u64, "interval scheduled");
        id
    }

    /// Cancel a pending timer. Returns `true` if it was still scheduled.
    pub fn cancel(&self, id: TimerId) -> bool {
        let removed = self.state.borrow_mut().entries.remove(&id).is_some();
        #[cfg(feature = "tracing")]
        if removed {
            tracing::trace!(timer_id = id.0, "timer cancelled");
        }
        removed
    }

    /// Advance the clock by `by`, firing every timer that becomes due.
    ///
    /// Returns the number of callbacks invoked.
    pub fn advance(&self, by: Duration) -> usize {
        if self.advancing.replace(true) {
            #[cfg(feature = "tracing")]
            tracing::warn!("nested TimerQueue::advance ignored");
            return 0;
        }
        let _advancing = AdvanceGuard(&self.advancing);

        let deadline = self.now().saturating_add(by);
        let mut fired = 0;
        loop {
            let next = self.state.borrow_mut().take_due(deadline);
            let Some(callback) = next else { break };
            (*callback.borrow_mut())();
            fired += 1;
        }
        self.state.borrow_mut().now = deadline;
        fired
    }

    /// Drop every pending timer without running it.
    pub fn clear(&self) {
        self.state.borrow_mut().entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn timeout_fires_once_at_due_time() {
        let timers = TimerQueue::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        timers.set_timeout(ms(100), move || h.set(h.get() + 1));

        assert_eq!(timers.advance(ms(99)), 0);
        assert_eq!(hits.get(), 0);
        assert_eq!(timers.advance(ms(1)), 1);
        assert_eq!(hits.get(), 1);
        assert_eq!(timers.advance(ms(1000)), 0);
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn ties_fire_in_scheduling_order() {
        let timers = TimerQueue::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for tag in ["a", "b", "c"] {
            let o = Rc::clone(&order);
            timers.set_timeout(ms(10), move || o.borrow_mut().push(tag));
        }
        timers.advance(ms(10));
        assert_eq!(*order.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn callback_sees_due_time() {
        let timers = TimerQueue::new();
        let seen = Rc::new(Cell::new(Duration::ZERO));
        let (t, s) = (timers.clone(), Rc::clone(&seen));
        timers.set_timeout(ms(30), move || s.set(t.now()));
        timers.advance(ms(500));
        assert_eq!(seen.get(), ms(30));
        assert_eq!(timers.now(), ms(500));
    }

    #[test]
    fn cancel_prevents_firing() {
        let timers = TimerQueue::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let id = timers.set_timeout(ms(5), move || h.set(h.get() + 1));
        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));
        timers.advance(ms(10));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn callback_can_cancel_a_later_timer_in_same_span() {
        let timers = TimerQueue::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let victim = timers.set_timeout(ms(20), move || h.set(h.get() + 1));
        let t = timers.clone();
        timers.set_timeout(ms(10), move || {
            t.cancel(victim);
        });
        timers.advance(ms(30));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn callback_can_reschedule_within_span() {
        let timers = TimerQueue::new();
        let hits = Rc::new(Cell::new(0));
        let (t, h) = (timers.clone(), Rc::clone(&hits));
        timers.set_timeout(ms(10), move || {
            let h = Rc::clone(&h);
            t.set_timeout(ms(10), move || h.set(h.get() + 1));
        });
        assert_eq!(timers.advance(ms(20)), 2);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn interval_repeats_until_cancelled() {
        let timers = TimerQueue::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let id = timers.set_interval(ms(100), move || h.set(h.get() + 1));
        timers.advance(ms(350));
        assert_eq!(hits.get(), 3);
        timers.cancel(id);
        timers.advance(ms(1000));
        assert_eq!(hits.get(), 3);
    }

    #[test]
    fn zero_interval_is_clamped() {
        let timers = TimerQueue::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        timers.set_interval(Duration::ZERO, move || h.set(h.get() + 1));
        timers.advance(ms(5));
        assert_eq!(hits.get(), 5);
    }

    #[test]
    fn nested_advance_is_ignored() {
        let timers = TimerQueue::new();
        let inner = Rc::new(Cell::new(usize::MAX));
        let (t, i) = (timers.clone(), Rc::clone(&inner));
        timers.set_timeout(ms(1), move || i.set(t.advance(ms(100))));
        timers.advance(ms(1));
        assert_eq!(inner.get(), 0);
        assert_eq!(timers.now(), ms(1));
    }

    #[test]
    fn panicking_callback_does_not_wedge_the_queue() {
        let timers = TimerQueue::new();
        timers.set_timeout(ms(10), || panic!("callback failure"));
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            timers.advance(ms(10));
        }));
        assert!(outcome.is_err());

        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        timers.set_timeout(ms(5), move || h.set(h.get() + 1));
        assert_eq!(timers.advance(ms(20)), 1);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn far_future_deadlines_saturate() {
        let timers = TimerQueue::new();
        timers.advance(ms(1));
        let hits = Rc::new(Cell::new(0));
        let (a, b) = (Rc::clone(&hits), Rc::clone(&hits));
        timers.set_timeout(Duration::MAX, move || a.set(a.get() + 1));
        timers.set_interval(Duration::MAX, move || b.set(b.get() + 1));

        assert_eq!(timers.advance(Duration::MAX), 2);
        assert_eq!(timers.now(), Duration::MAX);
        assert_eq!(timers.pending(), 0);
        assert_eq!(timers.advance(ms(1)), 0);
        assert_eq!(hits.get(), 2);
    }
}
