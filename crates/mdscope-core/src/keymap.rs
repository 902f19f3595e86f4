use crate::input::KeyEvent;

/// A named group of key patterns, shown in the help bar as `label desc`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub keys: Vec<KeyEvent>,
    pub label: String,
    pub desc: String,
}

impl Binding {
    pub fn new(label: impl Into<String>, desc: impl Into<String>, keys: Vec<KeyEvent>) -> Self {
        Self {
            keys,
            label: label.into(),
            desc: desc.into(),
        }
    }

    /// Exact match: code and the full modifier set must agree.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.keys.iter().any(|k| k == event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_requires_exact_modifiers() {
        let b = Binding::new("q", "quit", vec![KeyEvent::char('q')]);
        assert!(b.matches(&KeyEvent::char('q')));
        assert!(!b.matches(&KeyEvent::ctrl('q')));
    }

    #[test]
    fn binding_matches_any_of_its_keys() {
        let b = Binding::new(
            "^s",
            "save",
            vec![KeyEvent::ctrl('s'), KeyEvent::ctrl('S')],
        );
        assert!(b.matches(&KeyEvent::ctrl('S')));
    }
}
