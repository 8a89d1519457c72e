#![forbid(unsafe_code)]

//! Animated modal presenter.
//!
//! | Piece | Role |
//! |-------|------|
//! | [`Modal`] | open/close lifecycle, gesture routing, paint snapshots |
//! | [`ModalProps`] | required title and content, optional decorations |
//! | [`OverlayRoot`] | global attachment point, one entry per modal |
//! | [`Presence`] | keeps a closing modal mounted until its exit finishes |
//! | [`MotionValue`] / [`HeightTransition`] | interpolation |
//! | [`Measure`] | content measurement reports |
//!
//! # Example
//!
//! ```
//! use vellum_core::{Duration, Host};
//! use vellum_widgets::modal::{Modal, ModalHit, ModalProps, OverlayRoot, PresencePhase};
//!
//! let host = Host::new();
//! let overlay = OverlayRoot::new();
//! let mut modal: Modal<&str> =
//!     Modal::open(&host, &overlay, ModalProps::new("Settings", "body")).unwrap();
//!
//! modal.tick(Duration::from_millis(200));
//! assert_eq!(modal.phase(), PresencePhase::Present);
//!
//! // Not closable unless opted in: clicking the backdrop does nothing.
//! assert!(!modal.handle_hit(ModalHit::Backdrop));
//!
//! modal.close();
//! modal.tick(Duration::from_millis(200));
//! assert!(overlay.is_empty());
//! ```

mod animation;
mod measure;
mod overlay;
mod presence;
mod presenter;
mod props;

pub use animation::{HeightTransition, ModalEasing, MotionValue, Tween};
pub use measure::{Bounds, Measure};
pub use overlay::{AttachError, OverlayAttachment, OverlayRoot};
pub use presence::{Presence, PresencePhase};
pub use presenter::{
    CloseButtonFrame, ESCAPE_HOTKEY, MODAL_CLASS, Modal, ModalError, ModalFrame, ModalHit,
};
pub use props::{CloseCallback, LayoutId, ModalId, ModalProps};
