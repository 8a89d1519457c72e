#![forbid(unsafe_code)]

//! The host environment handle.
//!
//! [`Host`] bundles the facilities a browser-like environment would provide
//! globally: a timer queue, window resize listeners, a hotkey table and an
//! analytics sink. It is cheap to clone; every clone refers to the same
//! environment.
//!
//! A host event loop typically looks like:
//!
//! ```ignore
//! loop {
//!     for event in backend.poll() {
//!         host.dispatch(&event);
//!     }
//!     host.advance(frame_delta);
//!     if instance.needs_render() {
//!         instance.render(|| app.view());
//!         instance.commit();
//!     }
//! }
//! ```

use std::rc::Rc;

use web_time::Duration;

use crate::analytics::{AnalyticsSink, NullSink};
use crate::config::TimingConfig;
use crate::event::{Event, KeyEventKind, Size};
use crate::hotkey::HotkeyRegistry;
use crate::listener::Listeners;
use crate::timer::TimerQueue;

struct HostInner {
    timers: TimerQueue,
    resize: Listeners<Size>,
    hotkeys: HotkeyRegistry,
    analytics: Rc<dyn AnalyticsSink>,
    config: TimingConfig,
}

/// Shared handle to the host environment.
#[derive(Clone)]
pub struct Host {
    inner: Rc<HostInner>,
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("timers", &self.inner.timers)
            .field("resize_listeners", &self.inner.resize.len())
            .field("hotkeys", &self.inner.hotkeys.len())
            .field("config", &self.inner.config)
            .finish()
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Host {
    /// A host with default timings and a discarding analytics sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start configuring a host.
    #[must_use]
    pub fn builder() -> HostBuilder {
        HostBuilder::default()
    }

    #[must_use]
    pub fn timers(&self) -> &TimerQueue {
        &self.inner.timers
    }

    #[must_use]
    pub fn resize_listeners(&self) -> &Listeners<Size> {
        &self.inner.resize
    }

    #[must_use]
    pub fn hotkeys(&self) -> &HotkeyRegistry {
        &self.inner.hotkeys
    }

    #[must_use]
    pub fn analytics(&self) -> Rc<dyn AnalyticsSink> {
        Rc::clone(&self.inner.analytics)
    }

    #[must_use]
    pub fn config(&self) -> &TimingConfig {
        &self.inner.config
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.inner.timers.now()
    }

    /// Advance the clock, firing due timers.
    pub fn advance(&self, by: Duration) -> usize {
        self.inner.timers.advance(by)
    }

    /// Route an input event to the matching global facility.
    ///
    /// Pointer events are not global; the host delivers them to components
    /// through its own hit testing.
    pub fn dispatch(&self, event: &Event) {
        match event {
            Event::Resize(size) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(width = size.width, height = size.height, "resize");
                self.inner.resize.emit(size);
            }
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                self.inner.hotkeys.dispatch(key);
            }
            Event::Key(_) | Event::Mouse(_) => {}
        }
    }
}

/// Builder for [`Host`].
#[derive(Default)]
pub struct HostBuilder {
    analytics: Option<Rc<dyn AnalyticsSink>>,
    config: TimingConfig,
}

impl HostBuilder {
    /// Use `sink` for analytics events.
    #[must_use]
    pub fn analytics(mut self, sink: Rc<dyn AnalyticsSink>) -> Self {
        self.analytics = Some(sink);
        self
    }

    /// Use `config` for every timing constant.
    #[must_use]
    pub fn config(mut self, config: TimingConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn build(self) -> Host {
        Host {
            inner: Rc::new(HostInner {
                timers: TimerQueue::new(),
                resize: Listeners::new(),
                hotkeys: HotkeyRegistry::new(),
                analytics: self.analytics.unwrap_or_else(|| Rc::new(NullSink)),
                config: self.config,
            }),
        }
    }
}
