use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::input::KeyModifiers;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub keys: Vec<KeyEvent>,
    pub help_key: String,
    pub help_desc: String,
}

impl Binding {
    pub fn new(
        help_key: impl Into<String>,
        help_desc: impl Into<String>,
        keys: Vec<KeyEvent>,
    ) -> Self {
        Self {
            keys,
            help_key: help_key.into(),
            help_desc: help_desc.into(),
        }
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.keys.iter().any(|k| key_event_matches(k, event))
    }
}

/// An ordered list of bindings mapped to app-defined actions. The first match wins.
#[derive(Clone, Debug)]
pub struct Keymap<A> {
    entries: Vec<(Binding, A)>,
}

impl<A> Default for Keymap<A> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<A: Clone> Keymap<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(mut self, binding: Binding, action: A) -> Self {
        self.entries.push((binding, action));
        self
    }

    pub fn action_for(&self, event: &KeyEvent) -> Option<A> {
        self.entries
            .iter()
            .find(|(b, _)| b.matches(event))
            .map(|(_, a)| a.clone())
    }

    /// Bindings in declaration order, for help rendering.
    pub fn bindings(&self) -> Vec<Binding> {
        self.entries.iter().map(|(b, _)| b.clone()).collect()
    }
}

pub fn key_event_matches(pattern: &KeyEvent, event: &KeyEvent) -> bool {
    pattern.code == event.code && modifiers_match(pattern.modifiers, event.modifiers)
}

fn modifiers_match(pattern: KeyModifiers, event: KeyModifiers) -> bool {
    // Shifted characters arrive as uppercase chars; ignore shift for them.
    let shift_ok = pattern.shift == event.shift || !pattern.shift;
    shift_ok && pattern.ctrl == event.ctrl && pattern.alt == event.alt
}

pub fn key_char(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c))
}

pub fn key_ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c)).with_modifiers(KeyModifiers::ctrl())
}

pub fn key_alt(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c)).with_modifiers(KeyModifiers::alt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_matches_exact_chord_modifiers() {
        let b = Binding::new("q", "quit", vec![key_char('q')]);
        assert!(b.matches(&key_char('q')));
        assert!(!b.matches(&key_ctrl('q')));
        assert!(!b.matches(&key_alt('q')));
    }

    #[test]
    fn uppercase_char_matches_with_or_without_shift() {
        let b = Binding::new("G", "bottom", vec![key_char('G')]);
        let shifted = key_char('G').with_modifiers(KeyModifiers {
            shift: true,
            ..KeyModifiers::none()
        });
        assert!(b.matches(&shifted));
        assert!(b.matches(&key_char('G')));
    }

    #[test]
    fn keymap_returns_first_matching_action() {
        let km = Keymap::new()
            .bind(Binding::new("^p", "print", vec![key_ctrl('p')]), 1)
            .bind(Binding::new("^p", "shadowed", vec![key_ctrl('p')]), 2)
            .bind(Binding::new("^q", "quit", vec![key_ctrl('q')]), 3);
        assert_eq!(km.action_for(&key_ctrl('p')), Some(1));
        assert_eq!(km.action_for(&key_ctrl('q')), Some(3));
        assert_eq!(km.action_for(&key_char('p')), None);
        assert_eq!(km.bindings().len(), 3);
    }
}
