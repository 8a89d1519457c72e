#![forbid(unsafe_code)]

//! Per-instance scheduling primitives.
//!
//! Every hook here is owned by exactly one [`Instance`](crate::Instance) and
//! releases its timers, listeners and registrations when dropped.
//!
//! | Hook | Purpose |
//! |------|---------|
//! | [`ForceRerender`] | request a render with no state change |
//! | [`Previous`] | value from the preceding render |
//! | [`MirrorRef`] | latest value, readable from old closures |
//! | [`ResizeActivity`] | debounced "resizing" flag |
//! | [`OnChangeEffect`] | effect on dependency change, skipping mount |
//! | [`PostRenderQueue`] | callbacks run after the next commit, LIFO |
//! | [`IntervalRender`] | render every N ms |
//! | [`ScheduledRender`] | debounced delayed render |
//! | [`LazyValue`] | initialize once, keep for the instance lifetime |
//! | [`LinkNavigation`] | "navigation in flight" after a link click |
//! | [`TrackedHotkey`] | hotkey registration with usage analytics |

mod force_rerender;
mod hotkeys;
mod interval;
mod lazy;
mod navigation;
mod on_change;
mod post_render;
mod previous;
mod resize;
mod scheduled;

pub use force_rerender::ForceRerender;
pub use hotkeys::{TrackedHotkey, tracked};
pub use interval::IntervalRender;
pub use lazy::LazyValue;
pub use navigation::LinkNavigation;
pub use on_change::{Cleanup, FirstRun, OnChangeEffect};
pub use post_render::{Deferrer, PostRenderQueue};
pub use previous::{MirrorRef, Previous};
pub use resize::ResizeActivity;
pub use scheduled::ScheduledRender;
