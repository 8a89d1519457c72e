#![forbid(unsafe_code)]

//! The fixed attachment point modals render into.
//!
//! Modals are painted above everything else regardless of where the caller
//! created them. An [`OverlayRoot`] is the ordered list of modal ids
//! currently attached there; the host paints them in that order.
//!
//! # Invariants
//!
//! 1. An id appears at most once.
//! 2. An id is removed exactly when its [`OverlayAttachment`] is dropped.
//!
//! # Failure Modes
//!
//! - Attaching an id twice: [`AttachError::AlreadyAttached`], the root is
//!   unchanged.
//! - Attachment outliving its root: dropping it is a no-op.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use super::props::ModalId;

/// Failure to attach a modal to the overlay root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachError {
    AlreadyAttached(ModalId),
}

impl fmt::Display for AttachError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyAttached(id) => write!(f, "modal {} is already attached", id.id()),
        }
    }
}

impl std::error::Error for AttachError {}

thread_local! {
    static GLOBAL_OVERLAY: OverlayRoot = OverlayRoot::new();
}

/// Ordered set of attached modals. Clones share the same root.
#[derive(Debug, Clone, Default)]
pub struct OverlayRoot {
    layers: Rc<RefCell<Vec<ModalId>>>,
}

impl OverlayRoot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The per-thread root most hosts use.
    #[must_use]
    pub fn global() -> Self {
        GLOBAL_OVERLAY.with(Clone::clone)
    }

    /// Attach `id` on top of the current layers.
    pub fn attach(&self, id: ModalId) -> Result<OverlayAttachment, AttachError> {
        let mut layers = self.layers.borrow_mut();
        if layers.contains(&id) {
            return Err(AttachError::AlreadyAttached(id));
        }
        layers.push(id);
        #[cfg(feature = "tracing")]
        tracing::debug!(modal_id = id.id(), depth = layers.len(), "modal attached");
        Ok(OverlayAttachment {
            layers: Rc::downgrade(&self.layers),
            id,
        })
    }

    /// Attached ids, bottom to top.
    #[must_use]
    pub fn attached(&self) -> Vec<ModalId> {
        self.layers.borrow().clone()
    }

    #[must_use]
    pub fn contains(&self, id: ModalId) -> bool {
        self.layers.borrow().contains(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.borrow().is_empty()
    }
}

/// Keeps a modal attached until dropped.
#[must_use = "dropping the attachment detaches the modal"]
#[derive(Debug)]
pub struct OverlayAttachment {
    layers: Weak<RefCell<Vec<ModalId>>>,
    id: ModalId,
}

impl OverlayAttachment {
    #[must_use]
    pub fn id(&self) -> ModalId {
        self.id
    }
}

impl Drop for OverlayAttachment {
    fn drop(&mut self) {
        if let Some(layers) = self.layers.upgrade() {
            layers.borrow_mut().retain(|id| *id != self.id);
            #[cfg(feature = "tracing")]
            tracing::debug!(modal_id = self.id.id(), "modal detached");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_detach_keeps_order() {
        let root = OverlayRoot::new();
        let (a, b) = (ModalId::next(), ModalId::next());
        let ga = root.attach(a).unwrap();
        let gb = root.attach(b).unwrap();
        assert_eq!(root.attached(), vec![a, b]);

        drop(ga);
        assert_eq!(root.attached(), vec![b]);
        drop(gb);
        assert!(root.is_empty());
    }

    #[test]
    fn duplicate_attach_is_rejected() {
        let root = OverlayRoot::new();
        let id = ModalId::next();
        let _guard = root.attach(id).unwrap();
        assert_eq!(
            root.attach(id).unwrap_err(),
            AttachError::AlreadyAttached(id)
        );
        assert_eq!(root.len(), 1);
    }

    #[test]
    fn global_root_is_shared_per_thread() {
        let id = ModalId::next();
        let guard = OverlayRoot::global().attach(id).unwrap();
        assert!(OverlayRoot::global().contains(id));
        drop(guard);
        assert!(!OverlayRoot::global().contains(id));
    }

    #[test]
    fn attachment_outliving_root_is_inert() {
        let root = OverlayRoot::new();
        let guard = root.attach(ModalId::next()).unwrap();
        drop(root);
        drop(guard);
    }
}
