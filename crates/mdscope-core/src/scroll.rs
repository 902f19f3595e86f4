use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::viewport::ViewportState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollAction {
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Top,
    Bottom,
}

/// Key-to-scroll mapping shared by the preview and any other scrollable pane.
///
/// Defaults follow pager conventions (arrows plus `j`/`k`/`h`/`l`, `g`/`G`,
/// `^u`/`^d`).
#[derive(Clone, Debug)]
pub struct ScrollBindings {
    pub line_step: i32,
    pub horiz_step: i32,
    table: Vec<(ScrollAction, Vec<KeyEvent>)>,
}

impl Default for ScrollBindings {
    fn default() -> Self {
        use ScrollAction::*;
        Self {
            line_step: 1,
            horiz_step: 4,
            table: vec![
                (Up, vec![KeyEvent::plain(KeyCode::Up), KeyEvent::char('k')]),
                (Down, vec![KeyEvent::plain(KeyCode::Down), KeyEvent::char('j')]),
                (Left, vec![KeyEvent::plain(KeyCode::Left), KeyEvent::char('h')]),
                (Right, vec![KeyEvent::plain(KeyCode::Right), KeyEvent::char('l')]),
                (PageUp, vec![KeyEvent::plain(KeyCode::PageUp), KeyEvent::ctrl('u')]),
                (PageDown, vec![KeyEvent::plain(KeyCode::PageDown), KeyEvent::ctrl('d')]),
                (Top, vec![KeyEvent::plain(KeyCode::Home), KeyEvent::char('g')]),
                (Bottom, vec![KeyEvent::plain(KeyCode::End), shifted('G')]),
            ],
        }
    }
}

fn shifted(c: char) -> KeyEvent {
    KeyEvent::char(c).with_modifiers(crate::input::KeyModifiers {
        shift: true,
        ctrl: false,
        alt: false,
    })
}

impl ScrollBindings {
    pub fn action_for(&self, key: &KeyEvent) -> Option<ScrollAction> {
        self.table
            .iter()
            .find(|(_, keys)| keys.contains(key))
            .map(|(action, _)| *action)
    }

    pub fn apply(&self, state: &mut ViewportState, action: ScrollAction) {
        match action {
            ScrollAction::Up => state.scroll_y_by(-self.line_step),
            ScrollAction::Down => state.scroll_y_by(self.line_step),
            ScrollAction::Left => state.scroll_x_by(-self.horiz_step),
            ScrollAction::Right => state.scroll_x_by(self.horiz_step),
            ScrollAction::PageUp => state.page_up(),
            ScrollAction::PageDown => state.page_down(),
            ScrollAction::Top => state.to_top(),
            ScrollAction::Bottom => state.to_bottom(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vim_keys_map_to_scroll_actions() {
        let b = ScrollBindings::default();
        assert_eq!(b.action_for(&KeyEvent::char('j')), Some(ScrollAction::Down));
        assert_eq!(b.action_for(&KeyEvent::ctrl('d')), Some(ScrollAction::PageDown));
        assert_eq!(b.action_for(&KeyEvent::char('x')), None);
    }

    #[test]
    fn apply_moves_viewport() {
        let b = ScrollBindings::default();
        let mut s = ViewportState::default();
        s.set_viewport(10, 5);
        s.set_content(10, 50);
        b.apply(&mut s, ScrollAction::Down);
        assert_eq!(s.y, 1);
        b.apply(&mut s, ScrollAction::Bottom);
        assert_eq!(s.y, 45);
    }
}
