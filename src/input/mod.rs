use crate::app::actions::Action;
use crate::app::events::{Event, InputEvent};
use crate::app::state::AppState;
use crossterm::event::{
    self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind,
};
use tokio::sync::mpsc;

pub fn spawn_input_task(tx: mpsc::Sender<Event>, mouse_enabled: bool) {
    tokio::task::spawn_blocking(move || {
        loop {
            if event::poll(std::time::Duration::from_millis(250)).unwrap_or(false) {
                let ev = match event::read() {
                    Ok(CtEvent::Key(k)) if k.kind == KeyEventKind::Press => InputEvent::Key(k),
                    Ok(CtEvent::Mouse(m)) if mouse_enabled => InputEvent::Mouse(m),
                    Ok(CtEvent::Resize(_, _)) => InputEvent::Resize,
                    Ok(_) | Err(_) => continue,
                };
                if tx.blocking_send(Event::Input(ev)).is_err() {
                    break;
                }
            } else if tx.is_closed() {
                break;
            }
        }
    });
}

pub fn map_input_to_action(state: &AppState, ev: InputEvent) -> Option<Action> {
    match ev {
        InputEvent::Resize => Some(Action::Resize),
        InputEvent::Mouse(m) => match m.kind {
            MouseEventKind::ScrollUp => Some(Action::ListUp),
            MouseEventKind::ScrollDown => Some(Action::ListDown),
            _ => None,
        },
        InputEvent::Key(k) if state.dialog.is_some() => handle_dialog(k),
        InputEvent::Key(k) if state.search_mode => handle_search_mode(k),
        InputEvent::Key(k) => handle_normal_mode(k),
    }
}

fn handle_dialog(k: KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Esc | KeyCode::Enter => Some(Action::DismissDialog),
        KeyCode::Char('q') => Some(Action::Quit),
        _ => None,
    }
}

fn handle_search_mode(k: KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Esc => Some(Action::CancelSearch),
        KeyCode::Enter => Some(Action::ConfirmSearch),
        KeyCode::Backspace => Some(Action::SearchBackspace),
        KeyCode::Up => Some(Action::ListUp),
        KeyCode::Down => Some(Action::ListDown),
        KeyCode::Char('c') if k.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Char(c) => Some(Action::SearchInput(c)),
        _ => None,
    }
}

fn handle_normal_mode(k: KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('c') if k.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),

        // Navigation - vim style
        KeyCode::Up | KeyCode::Char('k') => Some(Action::ListUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::ListDown),
        KeyCode::Char('g') | KeyCode::Home => Some(Action::GoTop),
        KeyCode::Char('G') | KeyCode::End => Some(Action::GoBottom),
        KeyCode::Enter => Some(Action::PlaySelected),
        KeyCode::Char('d') | KeyCode::Delete => Some(Action::RemoveSelected),
        KeyCode::Char('f') => Some(Action::ToggleFavorite),
        KeyCode::Char('F') => Some(Action::ToggleFavoritesOnly),
        KeyCode::Char('/') => Some(Action::StartSearch),

        // Playback
        KeyCode::Char(' ') => Some(Action::TogglePause),
        KeyCode::Char('x') => Some(Action::Stop),
        KeyCode::Char('n') => Some(Action::PlayNext),
        KeyCode::Char('p') => Some(Action::PlayPrev),
        KeyCode::Char(']') | KeyCode::Right => Some(Action::SeekForward),
        KeyCode::Char('[') | KeyCode::Left => Some(Action::SeekBack),
        KeyCode::Char('=') | KeyCode::Char('+') => Some(Action::VolumeUp),
        KeyCode::Char('-') | KeyCode::Char('_') => Some(Action::VolumeDown),
        KeyCode::Char('m') => Some(Action::ToggleMute),
        KeyCode::Char('r') => Some(Action::CycleRepeat),
        KeyCode::Char('s') => Some(Action::ToggleShuffle),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playlist::Playlist;
    use crate::sync::{LyricsView, SyncSettings};
    use std::time::Duration;

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn state() -> AppState {
        let view = LyricsView::new(SyncSettings::default(), Duration::from_millis(400), 0.001);
        AppState::new(Playlist::default(), view, 50)
    }

    #[test]
    fn test_playback_keys() {
        let s = state();
        assert_eq!(map_input_to_action(&s, key(KeyCode::Char(' '))), Some(Action::TogglePause));
        assert_eq!(map_input_to_action(&s, key(KeyCode::Char(']'))), Some(Action::SeekForward));
        assert_eq!(map_input_to_action(&s, key(KeyCode::Enter)), Some(Action::PlaySelected));
        assert_eq!(map_input_to_action(&s, key(KeyCode::Char('z'))), None);
        assert_eq!(map_input_to_action(&s, key(KeyCode::Esc)), None);
    }

    #[test]
    fn test_playlist_keys() {
        let s = state();
        assert_eq!(map_input_to_action(&s, key(KeyCode::Char('f'))), Some(Action::ToggleFavorite));
        assert_eq!(
            map_input_to_action(&s, key(KeyCode::Char('F'))),
            Some(Action::ToggleFavoritesOnly)
        );
        assert_eq!(map_input_to_action(&s, key(KeyCode::Char('/'))), Some(Action::StartSearch));
        assert_eq!(map_input_to_action(&s, key(KeyCode::Char('x'))), Some(Action::Stop));
    }

    #[test]
    fn test_search_mode_captures_typing() {
        let mut s = state();
        s.search_mode = true;
        // keys that normally control playback become query text
        assert_eq!(map_input_to_action(&s, key(KeyCode::Char('q'))), Some(Action::SearchInput('q')));
        assert_eq!(map_input_to_action(&s, key(KeyCode::Char(' '))), Some(Action::SearchInput(' ')));
        assert_eq!(map_input_to_action(&s, key(KeyCode::Backspace)), Some(Action::SearchBackspace));
        assert_eq!(map_input_to_action(&s, key(KeyCode::Enter)), Some(Action::ConfirmSearch));
        assert_eq!(map_input_to_action(&s, key(KeyCode::Esc)), Some(Action::CancelSearch));
        assert_eq!(map_input_to_action(&s, key(KeyCode::Down)), Some(Action::ListDown));
    }

    #[test]
    fn test_dialog_captures_keys() {
        let mut s = state();
        s.show_error("Playback Error", "boom");
        assert_eq!(map_input_to_action(&s, key(KeyCode::Esc)), Some(Action::DismissDialog));
        assert_eq!(map_input_to_action(&s, key(KeyCode::Char(' '))), None);
        assert_eq!(map_input_to_action(&s, key(KeyCode::Char('q'))), Some(Action::Quit));
    }
}
