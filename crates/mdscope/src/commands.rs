//! The command surface: one dispatch table from key bindings to actions.
//!
//! Toolbar-style actions and their keyboard shortcuts are the same entry in
//! the table, so duplicated triggers can never drift apart semantically.

use mdscope_core::input::KeyCode;
use mdscope_core::input::KeyEvent;
use mdscope_core::keymap::Binding;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Open,
    Save,
    NewDocument,
    ToggleEdit,
    ToggleSidebar,
    ToggleTheme,
    ToggleGuide,
    CopyCode,
    FocusNext,
    Quit,
}

pub struct CommandSet {
    entries: Vec<(Binding, Action)>,
}

impl Default for CommandSet {
    fn default() -> Self {
        let entries = vec![
            (
                Binding::new("^o", "open", vec![KeyEvent::ctrl('o')]),
                Action::Open,
            ),
            (
                Binding::new("^s", "save", vec![KeyEvent::ctrl('s')]),
                Action::Save,
            ),
            (
                Binding::new("^n", "new", vec![KeyEvent::ctrl('n')]),
                Action::NewDocument,
            ),
            (
                Binding::new("^e", "edit", vec![KeyEvent::ctrl('e')]),
                Action::ToggleEdit,
            ),
            (
                Binding::new("^b", "panel", vec![KeyEvent::ctrl('b')]),
                Action::ToggleSidebar,
            ),
            (
                Binding::new("^t", "theme", vec![KeyEvent::ctrl('t')]),
                Action::ToggleTheme,
            ),
            (
                Binding::new("^g", "guide", vec![KeyEvent::ctrl('g')]),
                Action::ToggleGuide,
            ),
            (
                Binding::new("y", "copy code", vec![KeyEvent::char('y')]),
                Action::CopyCode,
            ),
            (
                Binding::new("Tab", "focus", vec![KeyEvent::plain(KeyCode::Tab)]),
                Action::FocusNext,
            ),
            (
                Binding::new("q", "quit", vec![KeyEvent::char('q'), KeyEvent::ctrl('q')]),
                Action::Quit,
            ),
        ];
        Self { entries }
    }
}

impl CommandSet {
    /// Resolves a key to an action. While the editor has focus, bare
    /// character keys belong to typing and only modified bindings fire.
    pub fn action_for(&self, key: &KeyEvent, editing: bool) -> Option<Action> {
        self.entries
            .iter()
            .find(|(binding, _)| {
                binding.keys.iter().any(|k| {
                    if editing && is_bare_char(k) {
                        return false;
                    }
                    k == key
                })
            })
            .map(|(_, action)| *action)
    }

    /// Bindings for the help bar, in table order.
    pub fn help_bindings(&self) -> Vec<Binding> {
        self.entries.iter().map(|(b, _)| b.clone()).collect()
    }
}

fn is_bare_char(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char(_)) && !key.modifiers.ctrl && !key.modifiers.alt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortcuts_map_to_their_actions() {
        let set = CommandSet::default();
        assert_eq!(set.action_for(&KeyEvent::ctrl('s'), false), Some(Action::Save));
        assert_eq!(set.action_for(&KeyEvent::ctrl('o'), true), Some(Action::Open));
        assert_eq!(set.action_for(&KeyEvent::char('z'), false), None);
    }

    #[test]
    fn bare_characters_type_instead_of_dispatching_while_editing() {
        let set = CommandSet::default();
        assert_eq!(set.action_for(&KeyEvent::char('q'), false), Some(Action::Quit));
        assert_eq!(set.action_for(&KeyEvent::char('q'), true), None);
        assert_eq!(set.action_for(&KeyEvent::char('y'), true), None);
        // Ctrl-bound keys still work in the editor.
        assert_eq!(set.action_for(&KeyEvent::ctrl('q'), true), Some(Action::Quit));
        assert_eq!(
            set.action_for(&KeyEvent::plain(KeyCode::Tab), true),
            Some(Action::FocusNext)
        );
    }
}
