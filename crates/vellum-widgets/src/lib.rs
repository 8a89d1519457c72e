#![forbid(unsafe_code)]

//! Widgets built on the Vellum runtime.
//!
//! Currently a single one: the animated [`modal`] presenter.

pub mod modal;

pub use modal::{Modal, ModalFrame, ModalHit, ModalProps, OverlayRoot};
