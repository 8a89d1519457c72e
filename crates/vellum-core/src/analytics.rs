#![forbid(unsafe_code)]

//! Fire-and-forget analytics sink.
//!
//! Vellum only ever *emits* analytics: an event name plus a flat property
//! map. Delivery, batching and failure handling belong to the sink.

use std::collections::BTreeMap;

/// Event name emitted whenever a tracked hotkey fires.
pub const HOTKEY_USED_EVENT: &str = "Hotkey used";

/// Flat string properties attached to an analytics event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    /// Empty property map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a property.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Look up a property.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Iterate properties in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Receiver of analytics events.
pub trait AnalyticsSink {
    /// Record one event. Must not panic and must not call back into Vellum.
    fn track(&self, event: &str, properties: &Properties);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl AnalyticsSink for NullSink {
    fn track(&self, _event: &str, _properties: &Properties) {}
}

/// Writes events to the `tracing` subscriber at `info` level.
#[cfg(feature = "tracing")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

#[cfg(feature = "tracing")]
impl AnalyticsSink for TracingSink {
    fn track(&self, event: &str, properties: &Properties) {
        tracing::info!(event, properties = ?properties.entries, "analytics event");
    }
}

/// An event captured by [`RecordingSink`].
#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedEvent {
    pub name: String,
    pub properties: Properties,
}

/// Sink that keeps every event in memory, for assertions.
#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: std::cell::RefCell<Vec<TrackedEvent>>,
}

#[cfg(any(test, feature = "test-helpers"))]
impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<TrackedEvent> {
        self.events.borrow().clone()
    }

    /// Number of recorded events named `name`.
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.events.borrow().iter().filter(|e| e.name == name).count()
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl AnalyticsSink for RecordingSink {
    fn track(&self, event: &str, properties: &Properties) {
        self.events.borrow_mut().push(TrackedEvent {
            name: event.to_string(),
            properties: properties.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[cfg(feature = "tracing")]
    use tracing_test::traced_test;

    #[test]
    fn properties_builder() {
        let props = Properties::new().with("hotkey", "esc").with("surface", "modal");
        assert_eq!(props.get("hotkey"), Some("esc"));
        assert_eq!(props.len(), 2);
        let keys: Vec<_> = props.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["hotkey", "surface"]);
    }

    #[test]
    fn recording_sink_keeps_order() {
        let sink = RecordingSink::new();
        sink.track("a", &Properties::new());
        sink.track("b", &Properties::new().with("k", "v"));
        sink.track("a", &Properties::new());
        let names: Vec<_> = sink.events().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["a", "b", "a"]);
        assert_eq!(sink.count("a"), 2);
    }

    #[cfg(feature = "tracing")]
    #[test]
    #[traced_test]
    fn tracing_sink_logs_event() {
        TracingSink.track(HOTKEY_USED_EVENT, &Properties::new().with("hotkey", "esc"));
        assert!(logs_contain("Hotkey used"));
        assert!(logs_contain("esc"));
    }
}
