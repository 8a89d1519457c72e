#![forbid(unsafe_code)]

//! Modal construction parameters.
//!
//! Title and content are required by [`ModalProps::new`]; everything else
//! is optional and set with builder methods.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static MODAL_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier of a modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModalId(u64);

impl ModalId {
    /// Allocate a fresh id.
    #[must_use]
    pub fn next() -> Self {
        Self(MODAL_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Shared-layout identity token, passed through to the frame untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LayoutId(String);

impl LayoutId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LayoutId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for LayoutId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Close callback invoked by close gestures.
pub type CloseCallback = Box<dyn FnMut()>;

/// Parameters for opening a modal.
///
/// `C` is the content the host paints inside the panel, `H` an optional
/// header decoration shown next to the title.
pub struct ModalProps<C, H = ()> {
    pub(crate) title: String,
    pub(crate) content: C,
    pub(crate) header_button: Option<H>,
    pub(crate) layout_id: Option<LayoutId>,
    pub(crate) closable: bool,
    pub(crate) close_on_outside_click: bool,
    pub(crate) on_close: Option<CloseCallback>,
    pub(crate) class_name: Option<String>,
}

impl<C: fmt::Debug, H: fmt::Debug> fmt::Debug for ModalProps<C, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalProps")
            .field("title", &self.title)
            .field("content", &self.content)
            .field("header_button", &self.header_button)
            .field("layout_id", &self.layout_id)
            .field("closable", &self.closable)
            .field("close_on_outside_click", &self.close_on_outside_click)
            .field("has_on_close", &self.on_close.is_some())
            .field("class_name", &self.class_name)
            .finish()
    }
}

impl<C, H> ModalProps<C, H> {
    /// Not closable and ignoring outside clicks until opted in.
    #[must_use]
    pub fn new(title: impl Into<String>, content: C) -> Self {
        Self {
            title: title.into(),
            content,
            header_button: None,
            layout_id: None,
            closable: false,
            close_on_outside_click: false,
            on_close: None,
            class_name: None,
        }
    }

    #[must_use]
    pub fn header_button(mut self, header: H) -> Self {
        self.header_button = Some(header);
        self
    }

    #[must_use]
    pub fn layout_id(mut self, id: impl Into<LayoutId>) -> Self {
        self.layout_id = Some(id.into());
        self
    }

    /// Whether close gestures (Escape, backdrop, close button) are honored.
    #[must_use]
    pub fn closable(mut self, closable: bool) -> Self {
        self.closable = closable;
        self
    }

    #[must_use]
    pub fn close_on_outside_click(mut self, enabled: bool) -> Self {
        self.close_on_outside_click = enabled;
        self
    }

    #[must_use]
    pub fn on_close(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_close = Some(Box::new(callback));
        self
    }

    /// Extra style class appended after `Modal`.
    #[must_use]
    pub fn class_name(mut self, class: impl Into<String>) -> Self {
        self.class_name = Some(class.into());
        self
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }
}
