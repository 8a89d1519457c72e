#![forbid(unsafe_code)]

//! Host environment primitives for Vellum.
//!
//! Vellum components never talk to a browser, terminal or windowing system
//! directly. They use the facilities in this crate, which a host wires to its
//! real event loop (or a test drives deterministically):
//!
//! - [`timer`]: timeouts and intervals on a virtual clock.
//! - [`listener`]: global event listeners with RAII detachment.
//! - [`hotkey`]: parsed key combos and the global hotkey table.
//! - [`analytics`]: fire-and-forget event sink.
//! - [`config`]: timing constants.
//! - [`host`]: the handle bundling all of the above.

pub mod analytics;
pub mod config;
pub mod event;
pub mod host;
pub mod hotkey;
pub mod listener;
pub mod timer;

#[cfg(feature = "tracing")]
pub use analytics::TracingSink;
pub use analytics::{AnalyticsSink, HOTKEY_USED_EVENT, NullSink, Properties};
#[cfg(any(test, feature = "test-helpers"))]
pub use analytics::{RecordingSink, TrackedEvent};
pub use config::{ConfigError, TimingConfig};
pub use event::{
    Event, KeyCode, KeyEvent, KeyEventKind, Modifiers, MouseButton, MouseEvent, MouseEventKind,
    Size,
};
pub use host::{Host, HostBuilder};
pub use hotkey::{HotkeyGuard, HotkeyRegistry, HotkeySpec, KeyCombo, KeyComboError};
pub use listener::{ListenerGuard, Listeners};
pub use timer::{TimerId, TimerQueue};
pub use web_time::Duration;
