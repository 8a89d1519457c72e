#![forbid(unsafe_code)]

//! Global event listener registry with RAII detachment.
//!
//! [`Listeners<E>`] models a host-wide event target (window resize, for
//! example). Subscribing returns a [`ListenerGuard`]; dropping the guard
//! removes the listener before the next emission.
//!
//! Listeners are invoked in registration order. Emission works on a snapshot,
//! so a listener may subscribe or detach others while being called; changes
//! take effect from the next emission.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Listener<E> = Rc<dyn Fn(&E)>;

struct Registry<E> {
    next_id: u64,
    entries: Vec<(u64, Listener<E>)>,
}

impl<E> Default for Registry<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

/// A list of listeners for events of type `E`.
pub struct Listeners<E> {
    registry: Rc<RefCell<Registry<E>>>,
}

impl<E> Clone for Listeners<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
        }
    }
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry::default())),
        }
    }
}

impl<E> std::fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.registry.borrow().entries.len())
            .finish()
    }
}

impl<E: 'static> Listeners<E> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener. It stays attached until the guard is dropped.
    #[must_use = "dropping the guard detaches the listener immediately"]
    pub fn subscribe(&self, listener: impl Fn(&E) + 'static) -> ListenerGuard<E> {
        let mut registry = self.registry.borrow_mut();
        registry.next_id += 1;
        let id = registry.next_id;
        registry.entries.push((id, Rc::new(listener)));
        ListenerGuard {
            registry: Rc::downgrade(&self.registry),
            id,
        }
    }

    /// Invoke every attached listener with `event`.
    pub fn emit(&self, event: &E) -> usize {
        let snapshot: Vec<Listener<E>> = self
            .registry
            .borrow()
            .entries
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in &snapshot {
            listener(event);
        }
        snapshot.len()
    }

    /// Number of attached listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.borrow().entries.len()
    }

    /// Whether no listener is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keeps a listener attached. Dropping it detaches the listener.
#[must_use = "dropping the guard detaches the listener immediately"]
pub struct ListenerGuard<E> {
    registry: Weak<RefCell<Registry<E>>>,
    id: u64,
}

impl<E> std::fmt::Debug for ListenerGuard<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerGuard").field("id", &self.id).finish()
    }
}

impl<E> Drop for ListenerGuard<E> {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().entries.retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn emits_in_registration_order() {
        let listeners = Listeners::<u32>::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let (a, b) = (Rc::clone(&log), Rc::clone(&log));
        let _ga = listeners.subscribe(move |v| a.borrow_mut().push(("a", *v)));
        let _gb = listeners.subscribe(move |v| b.borrow_mut().push(("b", *v)));

        assert_eq!(listeners.emit(&7), 2);
        assert_eq!(*log.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn dropping_guard_detaches() {
        let listeners = Listeners::<()>::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let guard = listeners.subscribe(move |_| h.set(h.get() + 1));
        listeners.emit(&());
        drop(guard);
        listeners.emit(&());
        assert_eq!(hits.get(), 1);
        assert!(listeners.is_empty());
    }

    #[test]
    fn guard_outliving_registry_is_harmless() {
        let listeners = Listeners::<()>::new();
        let guard = listeners.subscribe(|_| {});
        drop(listeners);
        drop(guard);
    }

    #[test]
    fn listener_may_subscribe_during_emit() {
        let listeners = Listeners::<()>::new();
        let extra = Rc::new(RefCell::new(Vec::new()));
        let (l, e) = (listeners.clone(), Rc::clone(&extra));
        let _g = listeners.subscribe(move |_| {
            e.borrow_mut().push(l.subscribe(|_| {}));
        });
        assert_eq!(listeners.emit(&()), 1);
        assert_eq!(listeners.len(), 2);
    }

    // Formatting must not require `E: 'static`.
    fn describe<E>(listeners: &Listeners<E>) -> String {
        format!("{listeners:?}")
    }

    #[test]
    fn debug_reports_listener_count() {
        let listeners = Listeners::<u8>::new();
        assert_eq!(describe(&listeners), "Listeners { len: 0 }");
        let _guard = listeners.subscribe(|_| {});
        assert_eq!(describe(&listeners), "Listeners { len: 1 }");
    }
}
