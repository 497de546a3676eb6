use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::modes::PlaybackSpeed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Restart,
    ToggleSearchSets,
    TogglePause,
    SetSpeed(PlaybackSpeed),
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,
            KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::ToggleSearchSets,
            KeyCode::Char(' ') => KeyAction::TogglePause,

            // Speed
            KeyCode::Char('1') => KeyAction::SetSpeed(PlaybackSpeed::Slow),
            KeyCode::Char('2') => KeyAction::SetSpeed(PlaybackSpeed::Normal),
            KeyCode::Char('3') => KeyAction::SetSpeed(PlaybackSpeed::Fast),
            KeyCode::Char('4') => KeyAction::SetSpeed(PlaybackSpeed::VeryFast),

            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restart_key() {
        let handler = InputHandler::new();

        let r = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE);
        assert_eq!(handler.handle_key_event(r), KeyAction::Restart);

        let r_upper = KeyEvent::new(KeyCode::Char('R'), KeyModifiers::SHIFT);
        assert_eq!(handler.handle_key_event(r_upper), KeyAction::Restart);
    }

    #[test]
    fn test_toggle_keys() {
        let handler = InputHandler::new();

        let s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE);
        assert_eq!(handler.handle_key_event(s), KeyAction::ToggleSearchSets);

        let space = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE);
        assert_eq!(handler.handle_key_event(space), KeyAction::TogglePause);
    }

    #[test]
    fn test_speed_keys() {
        let handler = InputHandler::new();

        let one = KeyEvent::new(KeyCode::Char('1'), KeyModifiers::NONE);
        assert_eq!(
            handler.handle_key_event(one),
            KeyAction::SetSpeed(PlaybackSpeed::Slow)
        );

        let four = KeyEvent::new(KeyCode::Char('4'), KeyModifiers::NONE);
        assert_eq!(
            handler.handle_key_event(four),
            KeyAction::SetSpeed(PlaybackSpeed::VeryFast)
        );
    }

    #[test]
    fn test_quit_keys() {
        let handler = InputHandler::new();

        let q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(handler.handle_key_event(q), KeyAction::Quit);

        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(handler.handle_key_event(esc), KeyAction::Quit);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handler.handle_key_event(ctrl_c), KeyAction::Quit);
    }

    #[test]
    fn test_unknown_key() {
        let handler = InputHandler::new();

        let x = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(handler.handle_key_event(x), KeyAction::None);
    }
}
