use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;

use crate::lyrics::SongIdentity;

pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "aac", "flac", "ogg"];
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    pub path: PathBuf,
    pub title: String,
    pub artist: String,
    pub favorite: bool,
}

impl Song {
    /// Title from the file stem, artist unknown.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let title = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            title,
            artist: UNKNOWN_ARTIST.to_string(),
            favorite: false,
        }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn identity(&self) -> SongIdentity {
        SongIdentity {
            file_name: self.file_name(),
            artist: self.artist.clone(),
            title: self.title.clone(),
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} - {}", self.title, self.artist)
    }
}

pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| AUDIO_EXTENSIONS.iter().any(|a| a.eq_ignore_ascii_case(e)))
}

/// Expand files and directories (one level deep) into songs, sorted per directory.
pub fn collect_songs(paths: &[PathBuf]) -> Vec<Song> {
    let mut songs = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut files: Vec<PathBuf> = match std::fs::read_dir(path) {
                Ok(entries) => entries
                    .filter_map(|e| e.ok().map(|e| e.path()))
                    .filter(|p| p.is_file() && is_audio_file(p))
                    .collect(),
                Err(e) => {
                    tracing::warn!(dir = %path.display(), error = %e, "cannot read directory");
                    continue;
                }
            };
            files.sort();
            songs.extend(files.into_iter().map(Song::from_path));
        } else if is_audio_file(path) {
            songs.push(Song::from_path(path.clone()));
        } else {
            tracing::debug!(file = %path.display(), "skipping non-audio file");
        }
    }
    songs
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatMode {
    Off,
    One,
    #[default]
    All,
}

impl RepeatMode {
    pub fn next(self) -> Self {
        match self {
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
            RepeatMode::Off => RepeatMode::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RepeatMode::Off => "Repeat: Off",
            RepeatMode::One => "Repeat: One",
            RepeatMode::All => "Repeat: All",
        }
    }
}

/// Which songs the playlist pane shows. Playback order ignores it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistFilter {
    /// Case-insensitive substring of title or artist; empty matches all
    pub query: String,
    pub favorites_only: bool,
}

impl PlaylistFilter {
    pub fn matches(&self, song: &Song) -> bool {
        if self.favorites_only && !song.favorite {
            return false;
        }
        if self.query.is_empty() {
            return true;
        }
        let needle = self.query.to_lowercase();
        song.title.to_lowercase().contains(&needle) || song.artist.to_lowercase().contains(&needle)
    }

    pub fn is_active(&self) -> bool {
        self.favorites_only || !self.query.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Playlist {
    songs: Vec<Song>,
    current_index: Option<usize>,
    repeat: RepeatMode,
    shuffle_enabled: bool,
    shuffle_order: Vec<usize>,
    filter: PlaylistFilter,
}

impl Playlist {
    pub fn new(songs: Vec<Song>) -> Self {
        let mut playlist = Self {
            songs,
            ..Self::default()
        };
        playlist.rebuild_shuffle_order();
        playlist
    }

    /// Remove the song at the given index
    pub fn remove(&mut self, index: usize) -> Option<Song> {
        if index >= self.songs.len() {
            return None;
        }

        let song = self.songs.remove(index);

        if let Some(current) = self.current_index {
            if index < current {
                self.current_index = Some(current - 1);
            } else if index == current {
                // The playing song is gone; nothing is current until the next pick
                self.current_index = None;
            }
        }

        self.rebuild_shuffle_order();
        Some(song)
    }

    /// Flip the favorite mark; returns the new value.
    pub fn toggle_favorite(&mut self, index: usize) -> Option<bool> {
        let song = self.songs.get_mut(index)?;
        song.favorite = !song.favorite;
        Some(song.favorite)
    }

    pub fn filter(&self) -> &PlaylistFilter {
        &self.filter
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.filter.query = query.into();
    }

    pub fn toggle_favorites_only(&mut self) -> bool {
        self.filter.favorites_only = !self.filter.favorites_only;
        self.filter.favorites_only
    }

    /// Indices into `songs()` that pass the filter, in playlist order.
    pub fn visible_indices(&self) -> Vec<usize> {
        self.songs
            .iter()
            .enumerate()
            .filter(|(_, song)| self.filter.matches(song))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn toggle_shuffle(&mut self) {
        self.shuffle_enabled = !self.shuffle_enabled;
        self.rebuild_shuffle_order();
    }

    pub fn is_shuffle_enabled(&self) -> bool {
        self.shuffle_enabled
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat
    }

    pub fn cycle_repeat(&mut self) -> RepeatMode {
        self.repeat = self.repeat.next();
        self.repeat
    }

    /// Set the current playing index
    pub fn set_current(&mut self, index: usize) -> Option<&Song> {
        if index < self.songs.len() {
            self.current_index = Some(index);
            if self.shuffle_enabled {
                self.move_to_shuffle_front(index);
            }
        }
        self.current_song()
    }

    pub fn current_song(&self) -> Option<&Song> {
        self.current_index.and_then(|i| self.songs.get(i))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// Manual "next": wraps around only with `RepeatMode::All`.
    pub fn advance(&mut self) -> Option<&Song> {
        let next = self.next_index(self.repeat == RepeatMode::All)?;
        self.current_index = Some(next);
        self.songs.get(next)
    }

    /// Manual "previous": always wraps around.
    pub fn go_back(&mut self) -> Option<&Song> {
        let prev = self.prev_index()?;
        self.current_index = Some(prev);
        self.songs.get(prev)
    }

    /// What plays after the current song ends on its own.
    pub fn on_song_end(&mut self) -> Option<&Song> {
        match self.repeat {
            RepeatMode::One => self.current_song(),
            RepeatMode::All | RepeatMode::Off => self.advance(),
        }
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    fn order(&self) -> Vec<usize> {
        if self.shuffle_enabled {
            self.shuffle_order.clone()
        } else {
            (0..self.songs.len()).collect()
        }
    }

    fn next_index(&self, wrap: bool) -> Option<usize> {
        let order = self.order();
        if order.is_empty() {
            return None;
        }
        let Some(current) = self.current_index else {
            return order.first().copied();
        };
        let pos = order.iter().position(|&x| x == current)?;
        if pos + 1 < order.len() {
            Some(order[pos + 1])
        } else if wrap {
            Some(order[0])
        } else {
            None
        }
    }

    fn prev_index(&self) -> Option<usize> {
        let order = self.order();
        if order.is_empty() {
            return None;
        }
        let Some(current) = self.current_index else {
            return order.last().copied();
        };
        let pos = order.iter().position(|&x| x == current)?;
        Some(order[(pos + order.len() - 1) % order.len()])
    }

    fn rebuild_shuffle_order(&mut self) {
        if !self.shuffle_enabled || self.songs.is_empty() {
            self.shuffle_order.clear();
            return;
        }

        let mut rng = rand::rng();
        self.shuffle_order = (0..self.songs.len()).collect();
        self.shuffle_order.shuffle(&mut rng);

        if let Some(current) = self.current_index {
            self.move_to_shuffle_front(current);
        }
    }

    fn move_to_shuffle_front(&mut self, index: usize) {
        if let Some(pos) = self.shuffle_order.iter().position(|&x| x == index) {
            self.shuffle_order.swap(0, pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_songs(n: usize) -> Vec<Song> {
        (0..n)
            .map(|i| Song::from_path(format!("/music/track{i}.mp3")))
            .collect()
    }

    #[test]
    fn test_filter_by_query() {
        let mut songs = make_songs(3);
        songs[1].artist = "The Beatles".to_string();
        let mut p = Playlist::new(songs);

        p.set_query("BEAT");
        assert_eq!(p.visible_indices(), vec![1]);

        p.set_query("TRACK2");
        assert_eq!(p.visible_indices(), vec![2]);

        p.set_query("");
        assert_eq!(p.visible_indices(), vec![0, 1, 2]);
        assert!(!p.filter().is_active());
    }

    #[test]
    fn test_favorites_only() {
        let mut p = Playlist::new(make_songs(3));
        assert_eq!(p.toggle_favorite(2), Some(true));
        assert_eq!(p.toggle_favorite(9), None);

        assert!(p.toggle_favorites_only());
        assert_eq!(p.visible_indices(), vec![2]);

        // unmarking hides it again
        p.toggle_favorite(2);
        assert!(p.visible_indices().is_empty());

        p.set_query("track");
        assert!(p.visible_indices().is_empty());
        p.toggle_favorites_only();
        assert_eq!(p.visible_indices(), vec![0, 1, 2]);
    }

    #[test]
    fn test_filter_does_not_change_playback_order() {
        let mut p = Playlist::new(make_songs(3));
        p.set_query("track2");
        p.set_current(0);
        assert_eq!(p.advance().unwrap().title, "track1");
    }

    #[test]
    fn test_song_from_path() {
        let song = Song::from_path("/music/My Song.flac");
        assert_eq!(song.title, "My Song");
        assert_eq!(song.artist, UNKNOWN_ARTIST);
        assert_eq!(song.identity().file_name, "My Song.flac");
    }

    #[test]
    fn test_is_audio_file() {
        assert!(is_audio_file(Path::new("a.MP3")));
        assert!(is_audio_file(Path::new("dir/b.ogg")));
        assert!(!is_audio_file(Path::new("c.lrc")));
        assert!(!is_audio_file(Path::new("noext")));
    }

    #[test]
    fn test_advance_respects_repeat() {
        let mut p = Playlist::new(make_songs(2));
        assert_eq!(p.advance().unwrap().title, "track0");
        assert_eq!(p.advance().unwrap().title, "track1");
        // repeat all wraps
        assert_eq!(p.advance().unwrap().title, "track0");

        p.cycle_repeat(); // One
        p.cycle_repeat(); // Off
        assert_eq!(p.repeat_mode(), RepeatMode::Off);
        p.set_current(1);
        assert!(p.advance().is_none());
        assert_eq!(p.current_index(), Some(1));
    }

    #[test]
    fn test_go_back_wraps() {
        let mut p = Playlist::new(make_songs(3));
        p.set_current(0);
        assert_eq!(p.go_back().unwrap().title, "track2");
    }

    #[test]
    fn test_song_end_repeat_one() {
        let mut p = Playlist::new(make_songs(3));
        p.set_current(1);
        p.cycle_repeat();
        assert_eq!(p.repeat_mode(), RepeatMode::One);
        assert_eq!(p.on_song_end().unwrap().title, "track1");
    }

    #[test]
    fn test_remove_adjusts_current() {
        let mut p = Playlist::new(make_songs(3));
        p.set_current(2);
        p.remove(0);
        assert_eq!(p.current_index(), Some(1));
        assert_eq!(p.current_song().unwrap().title, "track2");

        p.remove(1);
        assert_eq!(p.current_index(), None);
        assert!(p.remove(5).is_none());
    }

    #[test]
    fn test_shuffle_visits_every_song() {
        let mut p = Playlist::new(make_songs(5));
        p.toggle_shuffle();
        p.set_current(3);

        let mut seen = vec![3];
        for _ in 0..4 {
            p.advance();
            seen.push(p.current_index().unwrap());
        }
        seen.sort();
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_empty_playlist() {
        let mut p = Playlist::new(Vec::new());
        assert!(p.advance().is_none());
        assert!(p.go_back().is_none());
        assert!(p.on_song_end().is_none());
    }
}
