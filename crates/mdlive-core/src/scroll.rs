use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::keymap;
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

/// Key bindings for read-only scrollable panes.
#[derive(Clone, Debug)]
pub struct ScrollBindings {
    pub line_step: i32,
    pub horiz_step: i32,
    /// Lines scrolled per mouse wheel notch.
    pub wheel_step: i32,
    bindings: Vec<(ScrollAction, Vec<KeyEvent>)>,
}

impl Default for ScrollBindings {
    fn default() -> Self {
        use ScrollAction::*;
        Self {
            line_step: 1,
            horiz_step: 4,
            wheel_step: 3,
            bindings: vec![
                (Up, vec![KeyEvent::new(KeyCode::Up), keymap::key_char('k')]),
                (Down, vec![KeyEvent::new(KeyCode::Down), keymap::key_char('j')]),
                (Left, vec![KeyEvent::new(KeyCode::Left), keymap::key_char('h')]),
                (Right, vec![KeyEvent::new(KeyCode::Right), keymap::key_char('l')]),
                (
                    PageUp,
                    vec![KeyEvent::new(KeyCode::PageUp), keymap::key_ctrl('u')],
                ),
                (
                    PageDown,
                    vec![KeyEvent::new(KeyCode::PageDown), keymap::key_ctrl('d')],
                ),
                (Top, vec![KeyEvent::new(KeyCode::Home), keymap::key_char('g')]),
                (Bottom, vec![KeyEvent::new(KeyCode::End), keymap::key_char('G')]),
            ],
        }
    }
}

impl ScrollBindings {
    pub fn action_for(&self, key: &KeyEvent) -> Option<ScrollAction> {
        self.bindings
            .iter()
            .find(|(_, keys)| keys.iter().any(|p| keymap::key_event_matches(p, key)))
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
