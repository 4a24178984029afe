use std::time::Instant;

use crate::lyrics::{LyricSource, Resolution, SongIdentity};
use crate::playlist::{Playlist, Song};
use crate::sync::{Highlight, LyricsView};

/// Modal error shown over the UI until dismissed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDialog {
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub created_at: Instant,
}

impl Toast {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            created_at: Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > std::time::Duration::from_secs(3)
    }
}

pub struct AppState {
    pub should_quit: bool,

    // Playlist pane
    pub playlist: Playlist,
    /// Index into the full playlist, kept on a visible song
    pub selected: usize,
    pub scroll_offset: usize,
    /// Typing goes into the playlist search query
    pub search_mode: bool,

    // Playback
    pub now_playing: Option<Song>,
    pub paused: bool,
    pub position_secs: f64,
    pub duration_secs: f64,
    pub volume: u8,
    pub muted: bool,

    // Lyrics
    pub lyrics: LyricsView,
    /// Song whose lyrics are being resolved; other results are stale
    pub lyrics_pending: Option<SongIdentity>,
    /// Song whose lyrics are on screen
    pub lyrics_song: Option<SongIdentity>,
    pub lyrics_source: Option<LyricSource>,
    pub lyrics_synced: bool,
    /// Height of the lyrics pane at the last draw
    pub lyrics_rows: u16,

    pub dialog: Option<ErrorDialog>,
    pub toast: Option<Toast>,
    pub backend: &'static str,
}

impl AppState {
    pub fn new(playlist: Playlist, lyrics: LyricsView, volume: u8) -> Self {
        Self {
            should_quit: false,
            playlist,
            selected: 0,
            scroll_offset: 0,
            search_mode: false,
            now_playing: None,
            paused: false,
            position_secs: 0.0,
            duration_secs: 0.0,
            volume,
            muted: false,
            lyrics,
            lyrics_pending: None,
            lyrics_song: None,
            lyrics_source: None,
            lyrics_synced: false,
            lyrics_rows: 0,
            dialog: None,
            toast: None,
            backend: "none",
        }
    }

    /// Mark `song` as the one we want lyrics for. Returns `false` when its
    /// lyrics are already showing (replay of the same song).
    pub fn begin_lyrics_load(&mut self, song: &SongIdentity) -> bool {
        if self.lyrics_pending.is_none() && self.lyrics_song.as_ref() == Some(song) {
            return false;
        }
        self.lyrics.clear();
        self.lyrics_pending = Some(song.clone());
        self.lyrics_song = None;
        self.lyrics_source = None;
        self.lyrics_synced = false;
        true
    }

    /// Install a finished resolution unless a newer song superseded it.
    pub fn apply_resolution(&mut self, song: SongIdentity, resolution: Resolution) -> bool {
        if self.lyrics_pending.as_ref() != Some(&song) {
            tracing::debug!(title = %song.title, "dropping stale lyrics");
            return false;
        }
        self.lyrics_pending = None;
        self.lyrics_source = resolution.source;
        self.lyrics_synced = resolution.result.is_synced();
        self.lyrics.display_lyrics(resolution.result.into_map());
        self.lyrics_song = Some(song);
        // Catch up with wherever playback already is.
        self.lyrics
            .highlight_current_lyric(self.position_secs, self.lyrics_rows, Instant::now());
        true
    }

    pub fn on_time_update(&mut self, seconds: f64, now: Instant) -> Highlight {
        self.position_secs = seconds;
        self.lyrics
            .highlight_current_lyric(seconds, self.lyrics_rows, now)
    }

    /// Playback stopped: drop lyrics and derived state.
    pub fn stop_playback(&mut self) {
        self.now_playing = None;
        self.paused = false;
        self.position_secs = 0.0;
        self.duration_secs = 0.0;
        self.lyrics.reset();
        self.lyrics_pending = None;
        self.lyrics_song = None;
        self.lyrics_source = None;
        self.lyrics_synced = false;
    }

    pub fn show_error(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.dialog = Some(ErrorDialog {
            title: title.into(),
            message: message.into(),
        });
    }

    /// The selected song, if the filter lets it show.
    pub fn selected_visible(&self) -> Option<usize> {
        let song = self.playlist.songs().get(self.selected)?;
        self.playlist.filter().matches(song).then_some(self.selected)
    }

    pub fn select_prev(&mut self) {
        let visible = self.playlist.visible_indices();
        match visible.iter().position(|&i| i == self.selected) {
            Some(pos) => self.selected = visible[pos.saturating_sub(1)],
            None => self.clamp_selection(),
        }
    }

    pub fn select_next(&mut self) {
        let visible = self.playlist.visible_indices();
        match visible.iter().position(|&i| i == self.selected) {
            Some(pos) => self.selected = visible[(pos + 1).min(visible.len() - 1)],
            None => self.clamp_selection(),
        }
    }

    pub fn select_first(&mut self) {
        if let Some(&first) = self.playlist.visible_indices().first() {
            self.selected = first;
        }
    }

    pub fn select_last(&mut self) {
        if let Some(&last) = self.playlist.visible_indices().last() {
            self.selected = last;
        }
    }

    /// Move the selection onto a visible song after removals or filter changes.
    pub fn clamp_selection(&mut self) {
        let visible = self.playlist.visible_indices();
        self.selected = visible
            .iter()
            .copied()
            .find(|&i| i >= self.selected)
            .or_else(|| visible.last().copied())
            .unwrap_or(0);
    }

    pub fn push_search_char(&mut self, c: char) {
        let mut query = self.playlist.filter().query.clone();
        query.push(c);
        self.playlist.set_query(query);
        self.clamp_selection();
    }

    pub fn pop_search_char(&mut self) {
        let mut query = self.playlist.filter().query.clone();
        query.pop();
        self.playlist.set_query(query);
        self.clamp_selection();
    }

    pub fn clear_search(&mut self) {
        self.search_mode = false;
        self.playlist.set_query("");
        self.clamp_selection();
    }

    /// Keep the selected row inside a window of `visible_height` rows.
    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        let Some(row) = self
            .playlist
            .visible_indices()
            .iter()
            .position(|&i| i == self.selected)
        else {
            self.scroll_offset = 0;
            return;
        };
        if row < self.scroll_offset {
            self.scroll_offset = row;
        } else if row >= self.scroll_offset + visible_height {
            self.scroll_offset = row - visible_height + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::{LyricsResult, TimedLyricMap};
    use crate::sync::{SyncSettings, TrackerPhase};
    use std::time::Duration;

    fn state() -> AppState {
        let view = LyricsView::new(SyncSettings::default(), Duration::from_millis(400), 0.001);
        AppState::new(Playlist::default(), view, 80)
    }

    fn identity(name: &str) -> SongIdentity {
        SongIdentity {
            file_name: format!("{name}.mp3"),
            artist: "Artist".to_string(),
            title: name.to_string(),
        }
    }

    fn synced(pairs: &[(f64, &str)]) -> Resolution {
        Resolution::new(
            LyricSource::Local,
            LyricsResult::Synced(TimedLyricMap::from_pairs(pairs.iter().cloned())),
        )
    }

    #[test]
    fn test_stale_resolution_is_ignored() {
        let mut s = state();
        s.begin_lyrics_load(&identity("first"));
        s.begin_lyrics_load(&identity("second"));

        assert!(!s.apply_resolution(identity("first"), synced(&[(1.0, "old")])));
        assert!(s.lyrics.lines().is_empty());

        assert!(s.apply_resolution(identity("second"), synced(&[(1.0, "new")])));
        assert_eq!(s.lyrics.lines()[0].text, "new");
        assert_eq!(s.lyrics_source, Some(LyricSource::Local));
        assert!(s.lyrics_synced);
    }

    #[test]
    fn test_replay_keeps_lyrics() {
        let mut s = state();
        let song = identity("song");
        assert!(s.begin_lyrics_load(&song));
        s.apply_resolution(song.clone(), synced(&[(1.0, "a")]));
        assert!(!s.begin_lyrics_load(&song));
        assert_eq!(s.lyrics.lines().len(), 1);
    }

    #[test]
    fn test_resolution_catches_up_with_position() {
        let mut s = state();
        let song = identity("song");
        s.begin_lyrics_load(&song);
        s.on_time_update(9.8, Instant::now());
        s.apply_resolution(song, synced(&[(0.0, "a"), (10.0, "b")]));
        assert_eq!(s.lyrics.active_index(), Some(1));
    }

    #[test]
    fn test_stop_goes_idle() {
        let mut s = state();
        let song = identity("song");
        s.begin_lyrics_load(&song);
        s.apply_resolution(song, synced(&[(0.0, "a")]));
        s.on_time_update(0.0, Instant::now());
        s.stop_playback();
        assert_eq!(s.lyrics.phase(), TrackerPhase::Idle);
        assert!(s.lyrics_song.is_none());
    }

    #[test]
    fn test_selection_bounds() {
        let songs = (0..3).map(|i| Song::from_path(format!("{i}.mp3"))).collect();
        let mut s = state();
        s.playlist = Playlist::new(songs);
        s.select_prev();
        assert_eq!(s.selected, 0);
        s.select_next();
        s.select_next();
        s.select_next();
        assert_eq!(s.selected, 2);
        s.update_scroll(2);
        assert_eq!(s.scroll_offset, 1);
    }

    #[test]
    fn test_selection_skips_filtered_songs() {
        let songs = (0..4).map(|i| Song::from_path(format!("{i}.mp3"))).collect();
        let mut s = state();
        s.playlist = Playlist::new(songs);
        s.playlist.toggle_favorite(1);
        s.playlist.toggle_favorite(3);
        s.playlist.toggle_favorites_only();
        s.clamp_selection();
        assert_eq!(s.selected, 1);

        s.select_next();
        assert_eq!(s.selected, 3);
        s.select_next();
        assert_eq!(s.selected, 3);
        s.select_prev();
        assert_eq!(s.selected, 1);

        s.update_scroll(1);
        assert_eq!(s.scroll_offset, 0);
    }

    #[test]
    fn test_search_typing_moves_selection() {
        let songs = ["alpha.mp3", "beta.mp3", "gamma.mp3"]
            .into_iter()
            .map(Song::from_path)
            .collect();
        let mut s = state();
        s.playlist = Playlist::new(songs);

        s.search_mode = true;
        for c in "GAM".chars() {
            s.push_search_char(c);
        }
        assert_eq!(s.selected, 2);
        assert_eq!(s.selected_visible(), Some(2));

        s.push_search_char('z');
        assert_eq!(s.selected_visible(), None);

        s.pop_search_char();
        assert_eq!(s.playlist.filter().query, "GAM");

        s.clear_search();
        assert!(!s.search_mode);
        assert_eq!(s.playlist.visible_indices().len(), 3);
    }
}
