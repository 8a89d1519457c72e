#![forbid(unsafe_code)]

//! Hotkey registration with usage analytics.
//!
//! [`tracked`] is a plain decorator: it wraps a hotkey callback so that each
//! trigger first reports [`HOTKEY_USED_EVENT`] with a `hotkey` property
//! naming the combination, then delegates. [`TrackedHotkey`] is the
//! registration convenience most components use.

use std::rc::Rc;

use vellum_core::{
    AnalyticsSink, HOTKEY_USED_EVENT, Host, HotkeyGuard, HotkeySpec, KeyCombo, KeyComboError,
    KeyEvent, Properties,
};

/// Wrap `callback` so every call emits a hotkey analytics event first.
pub fn tracked<F>(
    label: impl Into<String>,
    sink: Rc<dyn AnalyticsSink>,
    mut callback: F,
) -> impl FnMut(&KeyEvent, &KeyCombo) + 'static
where
    F: FnMut(&KeyEvent, &KeyCombo) + 'static,
{
    let label = label.into();
    move |event: &KeyEvent, combo: &KeyCombo| {
        sink.track(HOTKEY_USED_EVENT, &Properties::new().with("hotkey", label.as_str()));
        callback(event, combo);
    }
}

/// A registered, analytics-tracked hotkey. Unregisters on drop.
#[derive(Debug)]
pub struct TrackedHotkey {
    spec: HotkeySpec,
    _guard: HotkeyGuard,
}

impl TrackedHotkey {
    /// Parse `keys` and register `callback` with the host's hotkey table.
    pub fn register(
        host: &Host,
        keys: &str,
        callback: impl FnMut(&KeyEvent, &KeyCombo) + 'static,
    ) -> Result<Self, KeyComboError> {
        let spec = HotkeySpec::parse(keys)?;
        Ok(Self::register_spec(host, spec, callback))
    }

    /// Register key names given separately; the reported name joins them with `+`.
    pub fn register_parts<S: AsRef<str>>(
        host: &Host,
        parts: &[S],
        callback: impl FnMut(&KeyEvent, &KeyCombo) + 'static,
    ) -> Result<Self, KeyComboError> {
        let spec = HotkeySpec::from_parts(parts)?;
        Ok(Self::register_spec(host, spec, callback))
    }

    /// Register an already-parsed spec.
    pub fn register_spec(
        host: &Host,
        spec: HotkeySpec,
        callback: impl FnMut(&KeyEvent, &KeyCombo) + 'static,
    ) -> Self {
        let wrapped = tracked(spec.label(), host.analytics(), callback);
        let guard = host.hotkeys().register(spec.clone(), wrapped);
        Self {
            spec,
            _guard: guard,
        }
    }

    #[must_use]
    pub fn spec(&self) -> &HotkeySpec {
        &self.spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use vellum_core::{Event, KeyCode, Modifiers, RecordingSink};

    #[test]
    fn analytics_precede_callback() {
        let sink = Rc::new(RecordingSink::new());
        let host = Host::builder().analytics(sink.clone()).build();
        let order = Rc::new(RefCell::new(Vec::new()));

        let (o, s) = (Rc::clone(&order), Rc::clone(&sink));
        let _hotkey = TrackedHotkey::register(&host, "ctrl+k", move |_, _| {
            o.borrow_mut().push(format!("callback after {} events", s.events().len()));
        })
        .unwrap();

        host.dispatch(&Event::Key(
            KeyEvent::new(KeyCode::Char('k')).with_modifiers(Modifiers::CTRL),
        ));

        assert_eq!(*order.borrow(), vec!["callback after 1 events"]);
        let events = sink.events();
        assert_eq!(events[0].name, HOTKEY_USED_EVENT);
        assert_eq!(events[0].properties.get("hotkey"), Some("ctrl+k"));
    }

    #[test]
    fn parts_are_joined_for_reporting() {
        let sink = Rc::new(RecordingSink::new());
        let host = Host::builder().analytics(sink.clone()).build();
        let hotkey = TrackedHotkey::register_parts(&host, &["shift", "enter"], |_, _| {}).unwrap();
        assert_eq!(hotkey.spec().label(), "shift+enter");

        host.dispatch(&Event::Key(
            KeyEvent::new(KeyCode::Enter).with_modifiers(Modifiers::SHIFT),
        ));
        assert_eq!(
            sink.events()[0].properties.get("hotkey"),
            Some("shift+enter")
        );
    }

    #[test]
    fn non_matching_keys_emit_nothing() {
        let sink = Rc::new(RecordingSink::new());
        let host = Host::builder().analytics(sink.clone()).build();
        let _hotkey = TrackedHotkey::register(&host, "esc", |_, _| {}).unwrap();
        host.dispatch(&Event::Key(KeyEvent::new(KeyCode::Enter)));
        assert!(sink.events().is_empty());
    }

    #[test]
    fn bad_keys_are_reported() {
        let host = Host::new();
        assert!(matches!(
            TrackedHotkey::register(&host, "ctrl+", |_, _| {}),
            Err(KeyComboError::Empty)
        ));
        assert!(host.hotkeys().is_empty());
    }

    #[test]
    fn drop_unregisters() {
        let host = Host::new();
        let hotkey = TrackedHotkey::register(&host, "esc", |_, _| {}).unwrap();
        assert_eq!(host.hotkeys().len(), 1);
        drop(hotkey);
        assert!(host.hotkeys().is_empty());
    }
}
