use blockfall_engine::Command;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key press asks the application to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Action {
    Game(Command),
    Quit,
}

/// Translates a terminal event into an action.
///
/// Only key presses count; releases and repeats reported by some terminals are
/// ignored so that one physical press is one command.
pub(super) fn action_for_event(event: &Event) -> Option<Action> {
    event
        .as_key_press_event()
        .and_then(|key| action_for_key(&key))
}

pub(super) fn action_for_key(key: &KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let action = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Left => Action::Game(Command::MoveLeft),
        KeyCode::Right => Action::Game(Command::MoveRight),
        KeyCode::Down => Action::Game(Command::SoftDrop),
        KeyCode::Up => Action::Game(Command::Rotate),
        KeyCode::Char(' ') => Action::Game(Command::HardDrop),
        KeyCode::Enter | KeyCode::Char('s' | 'S') => Action::Game(Command::Start),
        KeyCode::Char('p' | 'P') => Action::Game(Command::TogglePause),
        KeyCode::Char('r' | 'R') => Action::Game(Command::Restart),
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Action::Quit,
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEventState;

    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_movement_keys() {
        let cases = [
            (KeyCode::Left, Command::MoveLeft),
            (KeyCode::Right, Command::MoveRight),
            (KeyCode::Down, Command::SoftDrop),
            (KeyCode::Up, Command::Rotate),
            (KeyCode::Char(' '), Command::HardDrop),
        ];
        for (code, command) in cases {
            assert_eq!(
                action_for_key(&press(code)),
                Some(Action::Game(command)),
                "{code:?}"
            );
        }
    }

    #[test]
    fn test_session_keys() {
        assert_eq!(
            action_for_key(&press(KeyCode::Enter)),
            Some(Action::Game(Command::Start))
        );
        assert_eq!(
            action_for_key(&press(KeyCode::Char('s'))),
            Some(Action::Game(Command::Start))
        );
        assert_eq!(
            action_for_key(&press(KeyCode::Char('p'))),
            Some(Action::Game(Command::TogglePause))
        );
        assert_eq!(
            action_for_key(&press(KeyCode::Char('r'))),
            Some(Action::Game(Command::Restart))
        );
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(action_for_key(&press(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(action_for_key(&press(KeyCode::Esc)), Some(Action::Quit));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(action_for_key(&ctrl_c), Some(Action::Quit));
    }

    #[test]
    fn test_unbound_keys_are_ignored() {
        assert_eq!(action_for_key(&press(KeyCode::Char('x'))), None);
        assert_eq!(action_for_key(&press(KeyCode::Char('c'))), None);
        assert_eq!(action_for_key(&press(KeyCode::Tab)), None);
    }

    #[test]
    fn test_release_is_ignored() {
        let release = KeyEvent::new_with_kind_and_state(
            KeyCode::Left,
            KeyModifiers::NONE,
            KeyEventKind::Release,
            KeyEventState::NONE,
        );
        assert_eq!(action_for_key(&release), None);
        assert_eq!(action_for_event(&Event::Key(release)), None);
    }

    #[test]
    fn test_non_key_events_are_ignored() {
        assert_eq!(action_for_event(&Event::Resize(80, 24)), None);
        assert_eq!(action_for_event(&Event::FocusLost), None);
        assert_eq!(
            action_for_event(&Event::Key(press(KeyCode::Left))),
            Some(Action::Game(Command::MoveLeft))
        );
    }
}
