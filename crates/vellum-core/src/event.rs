#![forbid(unsafe_code)]

//! Host input events.
//!
//! The host translates its native input (DOM events, terminal escape
//! sequences, winit events) into these types before calling
//! [`Host::dispatch`](crate::host::Host::dispatch).

use bitflags::bitflags;

/// Viewport size reported with a resize event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    /// Create a new size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

bitflags! {
    /// Keyboard modifiers held during a key or pointer event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        const META  = 0b1000;
    }
}

impl Modifiers {
    /// Whether the modifiers request opening a link in a new tab or window.
    #[must_use]
    pub fn opens_new_context(self) -> bool {
        self.intersects(Self::CTRL | Self::META)
    }
}

/// Logical key identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Escape,
    Enter,
    Tab,
    Backspace,
    Delete,
    Space,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

/// Press/repeat/release discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyEventKind {
    #[default]
    Press,
    Repeat,
    Release,
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// A plain key press without modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
            kind: KeyEventKind::Press,
        }
    }

    /// Set the modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Set the event kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// Pointer event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    Down(MouseButton),
    Up(MouseButton),
    Moved,
}

/// A pointer event in host coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub x: i32,
    pub y: i32,
    pub modifiers: Modifiers,
}

impl MouseEvent {
    /// Create a pointer event without modifiers.
    #[must_use]
    pub const fn new(kind: MouseEventKind, x: i32, y: i32) -> Self {
        Self {
            kind,
            x,
            y,
            modifiers: Modifiers::empty(),
        }
    }

    /// A left-button click at the origin, the usual shape of a link activation.
    #[must_use]
    pub const fn click() -> Self {
        Self::new(MouseEventKind::Down(MouseButton::Left), 0, 0)
    }

    /// Set the modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Any event the host forwards to Vellum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(Size),
}
