use crate::lyrics::{Resolution, SongIdentity};

#[derive(Debug, Clone)]
pub enum Event {
    Input(InputEvent),
    Player(PlayerEvent),
    Lyrics(LyricsEvent),
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    Key(crossterm::event::KeyEvent),
    Mouse(crossterm::event::MouseEvent),
    Resize,
}

/// Playback clock notifications
#[derive(Debug, Clone)]
pub enum PlayerEvent {
    Ready { duration: f64 },
    TimeUpdate { seconds: f64 },
    Paused,
    Resumed,
    Ended,
    Error(String),
}

#[derive(Debug, Clone)]
pub enum LyricsEvent {
    /// Background resolution finished for `song`
    Resolved {
        song: SongIdentity,
        resolution: Resolution,
    },
}
