#![forbid(unsafe_code)]

//! Lazily-initialized value held for an instance's lifetime.

use std::cell::OnceCell;

/// Computes its value on first access and keeps it.
///
/// The initializer is passed at every access (typically every render) but
/// only the first one ever runs.
#[derive(Debug, Default)]
pub struct LazyValue<T> {
    cell: OnceCell<T>,
}

impl<T> LazyValue<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Return the held value, running `init` if nothing is held yet.
    pub fn get_or_init(&self, init: impl FnOnce() -> T) -> &T {
        self.cell.get_or_init(init)
    }

    /// The held value, if initialized.
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    /// Mutable access to the held value, if initialized.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.cell.get_mut()
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn initializer_runs_once() {
        let calls = Cell::new(0);
        let lazy = LazyValue::new();
        assert!(!lazy.is_initialized());
        for _ in 0..5 {
            let v = lazy.get_or_init(|| {
                calls.set(calls.get() + 1);
                vec![1, 2, 3]
            });
            assert_eq!(v.len(), 3);
        }
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn held_value_is_mutable() {
        let mut lazy = LazyValue::new();
        assert!(lazy.get_mut().is_none());
        lazy.get_or_init(|| 1);
        if let Some(v) = lazy.get_mut() {
            *v = 2;
        }
        assert_eq!(lazy.get_or_init(|| 99), &2);
    }
}
