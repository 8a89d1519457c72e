#![forbid(unsafe_code)]

//! Render-cycle instances and deferred-action scheduling for Vellum.
//!
//! [`Instance`] models the owning UI unit (its render and commit steps);
//! [`hooks`] holds the primitives components attach to an instance.
//!
//! # Example
//!
//! ```
//! use vellum_core::{Duration, Host};
//! use vellum_runtime::Instance;
//! use vellum_runtime::hooks::ScheduledRender;
//!
//! let host = Host::new();
//! let instance = Instance::new();
//! instance.render(|| ());
//!
//! let scheduled = ScheduledRender::new(&host, &instance);
//! scheduled.schedule(Duration::from_millis(100));
//! scheduled.schedule(Duration::from_millis(100));
//!
//! host.advance(Duration::from_millis(100));
//! assert!(instance.needs_render());
//! ```

pub mod hooks;
pub mod instance;

pub use instance::{CommitHookGuard, EffectPhase, Instance, Phase, RenderHandle};
