use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};

use crate::game::Input;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Play(Input),
    Quit,
}

/// Maps raw terminal events onto game signals. Key releases and repeats are
/// dropped so holding space doesn't machine-gun flaps.
pub fn map_event(event: &Event) -> Option<Command> {
    match event {
        Event::Key(key) => map_key(key),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(_) => Some(Command::Play(Input::Primary)),
            _ => None,
        },
        _ => None,
    }
}

fn map_key(key: &KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => Some(Command::Play(Input::Primary)),
        KeyCode::Char('r') => Some(Command::Play(Input::Restart)),
        _ => None,
    }
}
