#![forbid(unsafe_code)]

//! The animated modal presenter.
//!
//! A [`Modal`] attaches itself to an [`OverlayRoot`] when opened, registers
//! a tracked Escape hotkey, and from then on is driven by the host:
//!
//! - pointer hits are routed with [`Modal::handle_hit`],
//! - content measurements arrive through [`Modal::report_content_bounds`],
//! - time advances through [`Modal::tick`],
//! - each paint reads a [`ModalFrame`] snapshot.
//!
//! Closing is always the caller's decision: close gestures only invoke the
//! `on_close` callback, and the caller answers with [`Modal::close`], which
//! plays the exit transition. The modal detaches from the overlay and drops
//! its hotkey once that transition finishes.
//!
//! # Invariants
//!
//! 1. Not closable: no gesture ever invokes `on_close`.
//! 2. Backdrop clicks invoke `on_close` only when closable *and*
//!    `close_on_outside_click`; panel hits never do.
//! 3. Detachment happens only after the exit transition completes.
//! 4. While exiting the wrapper height is natural (`None`).
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | No `on_close` | Close gestures are no-ops |
//! | Gesture during exit | Ignored |
//! | `on_close` re-entering the modal's controls | Callback is not re-entered |

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use web_time::Duration;

use vellum_core::{Host, KeyComboError, MouseButton, MouseEvent, MouseEventKind, TimingConfig};
use vellum_runtime::hooks::TrackedHotkey;

use super::animation::{HeightTransition, ModalEasing, MotionValue};
use super::measure::{Bounds, Measure};
use super::overlay::{AttachError, OverlayAttachment, OverlayRoot};
use super::presence::{Presence, PresencePhase};
use super::props::{CloseCallback, LayoutId, ModalId, ModalProps};

/// Base style class every modal carries.
pub const MODAL_CLASS: &str = "Modal";

/// Hotkey that closes a modal.
pub const ESCAPE_HOTKEY: &str = "esc";

/// Panel offset when fully hidden, as a fraction of its own height.
const PANEL_HIDDEN_OFFSET: f32 = -1.0;

/// Close-button rotation while hovered, in degrees.
const CLOSE_HOVER_ROTATION: f32 = 180.0;

/// What a pointer event landed on, as resolved by the host's hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalHit {
    Backdrop,
    Panel,
    CloseButton,
    /// Not on this modal at all.
    Outside,
}

/// Failure to open a modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalError {
    Attach(AttachError),
    Hotkey(KeyComboError),
}

impl fmt::Display for ModalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attach(err) => write!(f, "cannot attach modal: {err}"),
            Self::Hotkey(err) => write!(f, "cannot register close hotkey: {err}"),
        }
    }
}

impl std::error::Error for ModalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Attach(err) => Some(err),
            Self::Hotkey(err) => Some(err),
        }
    }
}

impl From<AttachError> for ModalError {
    fn from(err: AttachError) -> Self {
        Self::Attach(err)
    }
}

impl From<KeyComboError> for ModalError {
    fn from(err: KeyComboError) -> Self {
        Self::Hotkey(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CloseGesture {
    Escape,
    Backdrop,
    CloseButton,
}

impl CloseGesture {
    fn as_str(self) -> &'static str {
        match self {
            Self::Escape => "escape",
            Self::Backdrop => "backdrop",
            Self::CloseButton => "close_button",
        }
    }
}

/// State shared with the Escape hotkey callback.
struct Controls {
    id: ModalId,
    active: bool,
    closable: bool,
    close_on_outside_click: bool,
    on_close: Option<CloseCallback>,
    /// Bumped whenever `on_close` is replaced or removed.
    generation: u64,
}

impl Controls {
    fn set_on_close(&mut self, callback: Option<CloseCallback>) {
        self.on_close = callback;
        self.generation += 1;
    }

    /// Invoke `on_close` if `gesture` is allowed. Returns whether it ran.
    fn request_close(cell: &RefCell<Self>, gesture: CloseGesture) -> bool {
        let (generation, mut callback) = {
            let Ok(mut controls) = cell.try_borrow_mut() else {
                return false;
            };
            let allowed = controls.active
                && controls.closable
                && (gesture != CloseGesture::Backdrop || controls.close_on_outside_click);
            if !allowed {
                #[cfg(feature = "tracing")]
                tracing::trace!(
                    modal_id = controls.id.id(),
                    gesture = gesture.as_str(),
                    "close gesture ignored"
                );
                return false;
            }
            let Some(callback) = controls.on_close.take() else {
                return false;
            };
            #[cfg(feature = "tracing")]
            tracing::debug!(
                modal_id = controls.id.id(),
                gesture = gesture.as_str(),
                "modal close requested"
            );
            (controls.generation, callback)
        };

        callback();

        // A replacement or removal made by the callback itself wins.
        let mut controls = cell.borrow_mut();
        if controls.generation == generation {
            controls.on_close = Some(callback);
        }
        true
    }
}

/// Close-button paint state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloseButtonFrame {
    pub rotation_deg: f32,
}

/// Everything the host needs to paint one modal frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalFrame<'a, C, H> {
    pub id: ModalId,
    pub phase: PresencePhase,
    pub title: &'a str,
    pub content: &'a C,
    pub header_button: Option<&'a H>,
    pub layout_id: Option<&'a LayoutId>,
    /// `Modal` followed by the extra class, if any.
    pub class_names: Vec<&'a str>,
    pub backdrop_opacity: f32,
    /// Vertical panel offset as a fraction of its height; `-1.0` is fully above.
    pub panel_offset: f32,
    /// Wrapper height, or `None` for natural height.
    pub height: Option<f32>,
    /// Present only when the modal is closable.
    pub close_button: Option<CloseButtonFrame>,
}

/// An open (or closing) modal.
pub struct Modal<C, H = ()> {
    id: ModalId,
    title: String,
    content: C,
    header_button: Option<H>,
    layout_id: Option<LayoutId>,
    class_name: Option<String>,
    controls: Rc<RefCell<Controls>>,
    timing: TimingConfig,
    presence: Presence,
    backdrop: MotionValue,
    offset: MotionValue,
    height: HeightTransition,
    close_rotation: MotionValue,
    measure: Measure,
    attachment: Option<OverlayAttachment>,
    escape: Option<TrackedHotkey>,
}

impl<C, H> fmt::Debug for Modal<C, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Modal")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("phase", &self.presence.phase())
            .field("attached", &self.attachment.is_some())
            .finish_non_exhaustive()
    }
}

impl<C, H> Modal<C, H> {
    /// Attach to `overlay`, register Escape and start the enter transition.
    pub fn open(
        host: &Host,
        overlay: &OverlayRoot,
        props: ModalProps<C, H>,
    ) -> Result<Self, ModalError> {
        let id = ModalId::next();
        let attachment = overlay.attach(id)?;

        let controls = Rc::new(RefCell::new(Controls {
            id,
            active: true,
            closable: props.closable,
            close_on_outside_click: props.close_on_outside_click,
            on_close: props.on_close,
            generation: 0,
        }));
        let weak = Rc::downgrade(&controls);
        let escape = TrackedHotkey::register(host, ESCAPE_HOTKEY, move |_, _| {
            if let Some(controls) = weak.upgrade() {
                Controls::request_close(&controls, CloseGesture::Escape);
            }
        })?;

        let timing = *host.config();
        let mut presence = Presence::new();
        presence.mount();
        let mut backdrop = MotionValue::new(0.0);
        backdrop.animate_to(1.0, timing.backdrop_fade(), ModalEasing::Linear);
        let mut offset = MotionValue::new(PANEL_HIDDEN_OFFSET);
        offset.animate_to(0.0, timing.panel_slide(), ModalEasing::EaseOut);

        #[cfg(feature = "tracing")]
        tracing::debug!(modal_id = id.id(), title = %props.title, "modal opened");
        Ok(Self {
            id,
            title: props.title,
            content: props.content,
            header_button: props.header_button,
            layout_id: props.layout_id,
            class_name: props.class_name,
            controls,
            timing,
            presence,
            backdrop,
            offset,
            height: HeightTransition::new(timing.height_tween()),
            close_rotation: MotionValue::new(0.0),
            measure: Measure::new(),
            attachment: Some(attachment),
            escape: Some(escape),
        })
    }

    #[must_use]
    pub fn id(&self) -> ModalId {
        self.id
    }

    #[must_use]
    pub fn phase(&self) -> PresencePhase {
        self.presence.phase()
    }

    /// Shown and not leaving.
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.presence.is_present()
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attachment.is_some()
    }

    #[must_use]
    pub fn is_closable(&self) -> bool {
        self.controls.borrow().closable
    }

    pub fn set_closable(&mut self, closable: bool) {
        self.controls.borrow_mut().closable = closable;
        if !closable {
            self.close_rotation.jump(0.0);
        }
    }

    pub fn set_close_on_outside_click(&mut self, enabled: bool) {
        self.controls.borrow_mut().close_on_outside_click = enabled;
    }

    /// Replace (or remove) the close callback.
    pub fn set_on_close(&mut self, callback: Option<CloseCallback>) {
        self.controls.borrow_mut().set_on_close(callback);
    }

    /// Route a resolved pointer hit. Returns `true` if `on_close` ran.
    pub fn handle_hit(&mut self, hit: ModalHit) -> bool {
        let gesture = match hit {
            ModalHit::Backdrop => CloseGesture::Backdrop,
            ModalHit::CloseButton => CloseGesture::CloseButton,
            // The panel swallows its own clicks.
            ModalHit::Panel | ModalHit::Outside => return false,
        };
        Controls::request_close(&self.controls, gesture)
    }

    /// Route a raw pointer event; only left-button presses count as clicks.
    pub fn handle_mouse(&mut self, event: &MouseEvent, hit: ModalHit) -> bool {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => self.handle_hit(hit),
            _ => false,
        }
    }

    /// Pointer entered or left the close button.
    pub fn set_close_hover(&mut self, hovering: bool) {
        if !self.is_closable() {
            return;
        }
        let target = if hovering { CLOSE_HOVER_ROTATION } else { 0.0 };
        self.close_rotation
            .animate_to(target, self.timing.close_rotate(), ModalEasing::EaseInOut);
    }

    #[must_use]
    pub fn content(&self) -> &C {
        &self.content
    }

    /// Replace the content. The host re-measures and reports the new bounds.
    pub fn set_content(&mut self, content: C) {
        self.content = content;
    }

    /// Feed a content measurement.
    ///
    /// The first measurement sets the wrapper height directly; later changes
    /// tween. Reports arriving during the exit transition are recorded but do
    /// not move the height.
    pub fn report_content_bounds(&mut self, bounds: Bounds) {
        if !self.measure.report(bounds) || !self.presence.is_present() {
            return;
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(modal_id = self.id.id(), height = bounds.height, "modal content measured");
        self.height.set_target(bounds.height);
    }

    /// Begin the exit transition. Returns `false` if already closing or gone.
    pub fn close(&mut self) -> bool {
        if !self.presence.exit() {
            return false;
        }
        self.controls.borrow_mut().active = false;
        self.backdrop
            .animate_to(0.0, self.timing.backdrop_fade(), ModalEasing::Linear);
        self.offset
            .animate_to(PANEL_HIDDEN_OFFSET, self.timing.panel_slide(), ModalEasing::EaseOut);
        #[cfg(feature = "tracing")]
        tracing::debug!(modal_id = self.id.id(), "modal exit started");
        true
    }

    /// Advance all transitions by `dt`.
    pub fn tick(&mut self, dt: Duration) -> PresencePhase {
        let backdrop_moving = self.backdrop.tick(dt);
        let offset_moving = self.offset.tick(dt);
        self.height.tick(dt);
        self.close_rotation.tick(dt);
        let settled = !backdrop_moving && !offset_moving;

        match self.presence.phase() {
            PresencePhase::Entering if settled => {
                self.presence.enter_complete();
            }
            PresencePhase::Exiting if settled => {
                self.presence.exit_complete();
                self.escape = None;
                self.attachment = None;
                #[cfg(feature = "tracing")]
                tracing::debug!(modal_id = self.id.id(), "modal unmounted");
            }
            _ => {}
        }
        self.presence.phase()
    }

    /// Paint snapshot, or `None` once unmounted.
    #[must_use]
    pub fn frame(&self) -> Option<ModalFrame<'_, C, H>> {
        if !self.presence.is_mounted() {
            return None;
        }
        let mut class_names = vec![MODAL_CLASS];
        class_names.extend(self.class_name.as_deref());
        let height = if self.presence.is_present() {
            self.height.current()
        } else {
            None
        };
        let close_button = self.is_closable().then(|| CloseButtonFrame {
            rotation_deg: self.close_rotation.get(),
        });

        Some(ModalFrame {
            id: self.id,
            phase: self.presence.phase(),
            title: &self.title,
            content: &self.content,
            header_button: self.header_button.as_ref(),
            layout_id: self.layout_id.as_ref(),
            class_names,
            backdrop_opacity: self.backdrop.get(),
            panel_offset: self.offset.get(),
            height,
            close_button,
        })
    }
}
