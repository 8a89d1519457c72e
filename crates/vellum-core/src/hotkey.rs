#![forbid(unsafe_code)]

//! Global hotkey registration.
//!
//! A [`HotkeySpec`] is parsed from the conventional text form: combos joined
//! by `,`, keys within a combo joined by `+` (`"esc"`, `"ctrl+k"`,
//! `"meta+enter, ctrl+enter"`). [`HotkeyRegistry::register`] attaches a
//! callback and returns a [`HotkeyGuard`] that unregisters on drop.
//!
//! # Matching
//!
//! Only [`KeyEventKind::Press`] events trigger callbacks. Modifiers must
//! match exactly; character keys compare case-insensitively.
//!
//! # Failure Modes
//!
//! | Input | Error |
//! |-------|-------|
//! | `""`, `"ctrl+"` | [`KeyComboError::Empty`] |
//! | `"ctrl+alt"` | [`KeyComboError::MissingKey`] |
//! | `"a+b"` | [`KeyComboError::MultipleKeys`] |
//! | `"hyper+x"` | [`KeyComboError::UnknownKey`] |

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::str::FromStr;

use crate::event::{KeyCode, KeyEvent, KeyEventKind, Modifiers};

/// Errors produced while parsing hotkey text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyComboError {
    /// A combo or one of its parts was empty.
    Empty,
    /// The combo only named modifiers.
    MissingKey(String),
    /// The combo named more than one non-modifier key.
    MultipleKeys(String),
    /// A part was not a known key or modifier name.
    UnknownKey(String),
}

impl fmt::Display for KeyComboError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty hotkey"),
            Self::MissingKey(combo) => write!(f, "hotkey '{combo}' has no key"),
            Self::MultipleKeys(combo) => write!(f, "hotkey '{combo}' names more than one key"),
            Self::UnknownKey(key) => write!(f, "unknown key name: {key}"),
        }
    }
}

impl std::error::Error for KeyComboError {}

/// One key plus its exact modifier set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub modifiers: Modifiers,
    pub code: KeyCode,
}

impl KeyCombo {
    /// Combo for `code` with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            modifiers: Modifiers::empty(),
            code,
        }
    }

    /// Whether a key event matches this combo.
    #[must_use]
    pub fn matches(&self, event: &KeyEvent) -> bool {
        if event.modifiers != self.modifiers {
            return false;
        }
        match (self.code, event.code) {
            (KeyCode::Char(a), KeyCode::Char(b)) => a.eq_ignore_ascii_case(&b),
            (a, b) => a == b,
        }
    }
}

fn parse_modifier(name: &str) -> Option<Modifiers> {
    match name {
        "shift" => Some(Modifiers::SHIFT),
        "ctrl" | "control" => Some(Modifiers::CTRL),
        "alt" | "option" => Some(Modifiers::ALT),
        "meta" | "cmd" | "command" | "super" => Some(Modifiers::META),
        _ => None,
    }
}

fn parse_key(name: &str) -> Option<KeyCode> {
    let code = match name {
        "esc" | "escape" => KeyCode::Escape,
        "enter" | "return" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "backspace" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "space" => KeyCode::Space,
        "up" | "arrowup" => KeyCode::Up,
        "down" | "arrowdown" => KeyCode::Down,
        "left" | "arrowleft" => KeyCode::Left,
        "right" | "arrowright" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        _ => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                (Some('f'), Some(_)) => {
                    let n: u8 = name[1..].parse().ok()?;
                    if !(1..=24).contains(&n) {
                        return None;
                    }
                    KeyCode::F(n)
                }
                _ => return None,
            }
        }
    };
    Some(code)
}

impl FromStr for KeyCombo {
    type Err = KeyComboError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let combo = s.trim();
        if combo.is_empty() {
            return Err(KeyComboError::Empty);
        }

        let mut modifiers = Modifiers::empty();
        let mut code = None;
        for part in combo.split('+') {
            let part = part.trim().to_ascii_lowercase();
            if part.is_empty() {
                return Err(KeyComboError::Empty);
            }
            if let Some(m) = parse_modifier(&part) {
                modifiers |= m;
                continue;
            }
            let key = parse_key(&part).ok_or_else(|| KeyComboError::UnknownKey(part.clone()))?;
            if code.replace(key).is_some() {
                return Err(KeyComboError::MultipleKeys(combo.to_string()));
            }
        }

        let code = code.ok_or_else(|| KeyComboError::MissingKey(combo.to_string()))?;
        Ok(Self { modifiers, code })
    }
}

/// A set of alternative combos plus the text they were written as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotkeySpec {
    label: String,
    combos: Vec<KeyCombo>,
}

impl HotkeySpec {
    /// Parse comma-separated combos, e.g. `"ctrl+s, meta+s"`.
    pub fn parse(keys: &str) -> Result<Self, KeyComboError> {
        let combos = keys
            .split(',')
            .map(str::parse)
            .collect::<Result<Vec<KeyCombo>, _>>()?;
        Ok(Self {
            label: keys.trim().to_string(),
            combos,
        })
    }

    /// Build a single combo from separate key names, e.g. `["ctrl", "k"]`.
    ///
    /// The label is the names joined with `+`.
    pub fn from_parts<S: AsRef<str>>(parts: &[S]) -> Result<Self, KeyComboError> {
        let joined = parts
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join("+");
        let combo = joined.parse()?;
        Ok(Self {
            label: joined,
            combos: vec![combo],
        })
    }

    /// The key combination as written by the caller.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Parsed alternatives.
    #[must_use]
    pub fn combos(&self) -> &[KeyCombo] {
        &self.combos
    }

    /// The first combo matching `event`, if any.
    #[must_use]
    pub fn matching(&self, event: &KeyEvent) -> Option<&KeyCombo> {
        if event.kind != KeyEventKind::Press {
            return None;
        }
        self.combos.iter().find(|c| c.matches(event))
    }
}

impl FromStr for HotkeySpec {
    type Err = KeyComboError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for HotkeySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Callback invoked with the triggering event and the combo it matched.
pub type HotkeyCallback = dyn FnMut(&KeyEvent, &KeyCombo);

struct Registration {
    id: u64,
    spec: HotkeySpec,
    callback: Rc<RefCell<HotkeyCallback>>,
}

#[derive(Default)]
struct RegistryState {
    next_id: u64,
    registrations: Vec<Registration>,
}

/// Host-wide hotkey table.
#[derive(Clone, Default)]
pub struct HotkeyRegistry {
    state: Rc<RefCell<RegistryState>>,
}

impl fmt::Debug for HotkeyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HotkeyRegistry")
            .field("registrations", &self.len())
            .finish()
    }
}

impl HotkeyRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for `spec`.
    #[must_use = "dropping the guard unregisters the hotkey immediately"]
    pub fn register(
        &self,
        spec: HotkeySpec,
        callback: impl FnMut(&KeyEvent, &KeyCombo) + 'static,
    ) -> HotkeyGuard {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = state.next_id;
        #[cfg(feature = "tracing")]
        tracing::debug!(hotkey = spec.label(), id, "hotkey registered");
        state.registrations.push(Registration {
            id,
            spec,
            callback: Rc::new(RefCell::new(callback)),
        });
        HotkeyGuard {
            state: Rc::downgrade(&self.state),
            id,
        }
    }

    /// Route a key event. Returns how many callbacks were triggered.
    pub fn dispatch(&self, event: &KeyEvent) -> usize {
        let triggered: Vec<(KeyCombo, Rc<RefCell<HotkeyCallback>>)> = self
            .state
            .borrow()
            .registrations
            .iter()
            .filter_map(|r| {
                r.spec
                    .matching(event)
                    .map(|combo| (*combo, Rc::clone(&r.callback)))
            })
            .collect();

        for (combo, callback) in &triggered {
            // A callback re-entering itself through a nested dispatch is skipped.
            let Ok(mut cb) = callback.try_borrow_mut() else {
                #[cfg(feature = "tracing")]
                tracing::warn!("re-entrant hotkey dispatch skipped");
                continue;
            };
            (*cb)(event, combo);
        }
        triggered.len()
    }

    /// Number of live registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.borrow().registrations.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keeps a hotkey registered until dropped.
#[must_use = "dropping the guard unregisters the hotkey immediately"]
pub struct HotkeyGuard {
    state: Weak<RefCell<RegistryState>>,
    id: u64,
}

impl fmt::Debug for HotkeyGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HotkeyGuard").field("id", &self.id).finish()
    }
}

impl Drop for HotkeyGuard {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            state
                .borrow_mut()
                .registrations
                .retain(|r| r.id != self.id);
            #[cfg(feature = "tracing")]
            tracing::debug!(id = self.id, "hotkey unregistered");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn parses_named_keys_and_modifiers() {
        let combo: KeyCombo = "Ctrl+Shift+K".parse().unwrap();
        assert_eq!(combo.modifiers, Modifiers::CTRL | Modifiers::SHIFT);
        assert_eq!(combo.code, KeyCode::Char('k'));

        assert_eq!("esc".parse::<KeyCombo>().unwrap().code, KeyCode::Escape);
        assert_eq!("Escape".parse::<KeyCombo>().unwrap().code, KeyCode::Escape);
        assert_eq!("f12".parse::<KeyCombo>().unwrap().code, KeyCode::F(12));
        assert_eq!("cmd+enter".parse::<KeyCombo>().unwrap().modifiers, Modifiers::META);
    }

    #[test]
    fn rejects_malformed_combos() {
        assert_eq!("".parse::<KeyCombo>(), Err(KeyComboError::Empty));
        assert_eq!("ctrl+".parse::<KeyCombo>(), Err(KeyComboError::Empty));
        assert!(matches!(
            "ctrl+alt".parse::<KeyCombo>(),
            Err(KeyComboError::MissingKey(_))
        ));
        assert!(matches!(
            "a+b".parse::<KeyCombo>(),
            Err(KeyComboError::MultipleKeys(_))
        ));
        assert!(matches!(
            "hyper+x".parse::<KeyCombo>(),
            Err(KeyComboError::UnknownKey(_))
        ));
        assert!(matches!(
            "f99".parse::<KeyCombo>(),
            Err(KeyComboError::UnknownKey(_))
        ));
    }

    #[test]
    fn spec_labels() {
        let spec = HotkeySpec::parse("ctrl+s, meta+s").unwrap();
        assert_eq!(spec.label(), "ctrl+s, meta+s");
        assert_eq!(spec.combos().len(), 2);

        let spec = HotkeySpec::from_parts(&["ctrl", "k"]).unwrap();
        assert_eq!(spec.label(), "ctrl+k");
        assert_eq!(spec.to_string(), "ctrl+k");
    }

    #[test]
    fn matching_is_exact_on_modifiers_and_press_only() {
        let spec = HotkeySpec::parse("ctrl+k").unwrap();
        let press = KeyEvent::new(KeyCode::Char('K')).with_modifiers(Modifiers::CTRL);
        assert!(spec.matching(&press).is_some());
        assert!(spec.matching(&KeyEvent::new(KeyCode::Char('k'))).is_none());
        assert!(
            spec.matching(&press.with_modifiers(Modifiers::CTRL | Modifiers::ALT))
                .is_none()
        );
        assert!(spec.matching(&press.with_kind(KeyEventKind::Release)).is_none());
    }

    #[test]
    fn dispatch_and_unregister() {
        let registry = HotkeyRegistry::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let guard = registry.register(HotkeySpec::parse("esc").unwrap(), move |_, combo| {
            assert_eq!(combo.code, KeyCode::Escape);
            h.set(h.get() + 1);
        });

        let esc = KeyEvent::new(KeyCode::Escape);
        assert_eq!(registry.dispatch(&esc), 1);
        assert_eq!(registry.dispatch(&KeyEvent::new(KeyCode::Enter)), 0);
        drop(guard);
        assert_eq!(registry.dispatch(&esc), 0);
        assert_eq!(hits.get(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn callback_may_unregister_itself() {
        let registry = HotkeyRegistry::new();
        let slot: Rc<RefCell<Option<HotkeyGuard>>> = Rc::new(RefCell::new(None));
        let s = Rc::clone(&slot);
        let guard = registry.register(HotkeySpec::parse("enter").unwrap(), move |_, _| {
            s.borrow_mut().take();
        });
        *slot.borrow_mut() = Some(guard);

        assert_eq!(registry.dispatch(&KeyEvent::new(KeyCode::Enter)), 1);
        assert!(registry.is_empty());
    }
}
