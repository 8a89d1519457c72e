#![forbid(unsafe_code)]

//! Values remembered across renders.
//!
//! - [`Previous`] answers "what was this value last render?".
//! - [`MirrorRef`] answers "what is this value *now*?" from a callback that
//!   was created during an older render.

use std::cell::RefCell;
use std::rc::Rc;

/// Remembers the value passed on the preceding render.
#[derive(Debug, Clone, Default)]
pub struct Previous<T> {
    last: Option<T>,
}

impl<T: Clone> Previous<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Record this render's value and return the previous render's value.
    ///
    /// Returns `None` on the first call.
    pub fn update(&mut self, value: T) -> Option<T> {
        self.last.replace(value)
    }

    /// Like [`update`](Self::update), returning `default` on the first call.
    pub fn update_or(&mut self, value: T, default: T) -> T {
        self.update(value).unwrap_or(default)
    }

    /// The value recorded by the most recent render, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&T> {
        self.last.as_ref()
    }
}

/// Shared cell overwritten with the current value on every render.
#[derive(Debug, Default)]
pub struct MirrorRef<T> {
    cell: Rc<RefCell<T>>,
}

impl<T> Clone for MirrorRef<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<T: Clone> MirrorRef<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            cell: Rc::new(RefCell::new(value)),
        }
    }

    /// Store the current render's value.
    pub fn sync(&self, value: T) {
        *self.cell.borrow_mut() = value;
    }

    /// Read the latest synced value.
    #[must_use]
    pub fn get(&self) -> T {
        self.cell.borrow().clone()
    }

    /// Borrow the latest value without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.cell.borrow())
    }
}
