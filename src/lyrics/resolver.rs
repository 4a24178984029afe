//! Lyrics resolution
//!
//! Strategies run in order and stop at the first one that produces lines:
//! a local `.lrc` file, the lyrics cache, the remote service, and finally a
//! built-in demonstration map. Failures are logged and never returned.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::error::LyricsError;
use super::lyrics_ovh::RemoteLyrics;
use super::parser::{parse_lrc, space_plain_lines};
use super::store::TimedLyricMap;
use super::{LyricSource, LyricsResult, Resolution, SongIdentity};
use crate::storage::LyricsCache;

#[derive(Debug, Clone)]
pub struct ResolverSettings {
    /// Directory holding `<audio stem>.lrc` files
    pub lyrics_dir: PathBuf,
    /// Seconds between lines of unsynced lyrics
    pub unsynced_spacing: f64,
    /// Use the built-in map when every other strategy fails
    pub fallback: bool,
}

pub struct Resolver {
    settings: ResolverSettings,
    remote: Option<Arc<dyn RemoteLyrics>>,
    cache: Option<LyricsCache>,
}

impl Resolver {
    pub fn new(settings: ResolverSettings) -> Self {
        Self {
            settings,
            remote: None,
            cache: None,
        }
    }

    pub fn with_remote(mut self, remote: Arc<dyn RemoteLyrics>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn with_cache(mut self, cache: LyricsCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Resolve lyrics for a song. Always returns; at worst `LyricsResult::None`
    /// when the fallback is disabled.
    pub async fn resolve(&self, song: &SongIdentity) -> Resolution {
        match self.try_local(song).await {
            Ok(map) => {
                tracing::debug!(file = %song.file_name, lines = map.len(), "local lyrics");
                return Resolution::new(LyricSource::Local, LyricsResult::Synced(map));
            }
            Err(e) => tracing::debug!(file = %song.file_name, error = %e, "no local lyrics"),
        }

        // The cache only ever holds remote text; with no remote it is not consulted.
        if self.remote.is_some()
            && let Some(map) = self.try_cache(song).await
        {
            tracing::debug!(title = %song.title, lines = map.len(), "cached lyrics");
            return Resolution::new(LyricSource::Cache, LyricsResult::Unsynced(map));
        }

        match self.try_remote(song).await {
            Ok(map) => {
                tracing::debug!(title = %song.title, lines = map.len(), "remote lyrics");
                return Resolution::new(LyricSource::Remote, LyricsResult::Unsynced(map));
            }
            Err(e) => tracing::debug!(title = %song.title, error = %e, "no remote lyrics"),
        }

        if self.settings.fallback {
            Resolution::new(LyricSource::Fallback, LyricsResult::Synced(fallback_lyrics()))
        } else {
            tracing::debug!(title = %song.title, "{}", LyricsError::NoLyricsAvailable);
            Resolution {
                source: None,
                result: LyricsResult::None,
            }
        }
    }

    async fn try_local(&self, song: &SongIdentity) -> Result<TimedLyricMap, LyricsError> {
        let path = lrc_path(&self.settings.lyrics_dir, &song.file_name);
        let bytes = tokio::fs::read(&path).await.map_err(|source| LyricsError::Io {
            path: path.clone(),
            source,
        })?;

        let map = parse_lrc(&String::from_utf8_lossy(&bytes));
        if map.is_empty() {
            return Err(LyricsError::NoTimedLines(path));
        }
        Ok(map)
    }

    async fn try_cache(&self, song: &SongIdentity) -> Option<TimedLyricMap> {
        let cache = self.cache.as_ref()?;
        match cache.get(&song.artist, &song.title).await {
            Ok(Some(text)) => {
                let map = space_plain_lines(&text, self.settings.unsynced_spacing);
                (!map.is_empty()).then_some(map)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "lyrics cache read failed");
                None
            }
        }
    }

    async fn try_remote(&self, song: &SongIdentity) -> Result<TimedLyricMap, LyricsError> {
        let remote = self.remote.as_ref().ok_or(LyricsError::NoLyricsAvailable)?;
        if song.artist.trim().is_empty() || song.title.trim().is_empty() {
            return Err(LyricsError::NoLyricsAvailable);
        }

        let text = remote.fetch(&song.artist, &song.title).await?;
        let map = space_plain_lines(&text, self.settings.unsynced_spacing);
        if map.is_empty() {
            return Err(LyricsError::Empty);
        }

        if let Some(cache) = &self.cache
            && let Err(e) = cache.put(&song.artist, &song.title, &text).await
        {
            tracing::warn!(error = %format!("{e:#}"), "lyrics cache write failed");
        }
        Ok(map)
    }
}

/// `<dir>/<stem>.lrc` for an audio file name (any directories in it are ignored).
pub fn lrc_path(lyrics_dir: &Path, file_name: &str) -> PathBuf {
    let name = Path::new(file_name)
        .file_name()
        .map(Path::new)
        .unwrap_or_else(|| Path::new(file_name));
    lyrics_dir.join(name.with_extension("lrc"))
}

/// Demonstration lyrics shown when nothing else is found.
pub fn fallback_lyrics() -> TimedLyricMap {
    TimedLyricMap::from_pairs([
        (2.25, "No lyrics were found for this track"),
        (4.69, "Drop a matching .lrc file into the lyrics folder"),
        (6.97, "Named like the audio file, ending in .lrc"),
        (10.75, "Lines are written as [mm:ss.xx] followed by the text"),
        (215.05, "Enjoy the music"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeRemote {
        calls: AtomicUsize,
        reply: Option<String>,
    }

    impl FakeRemote {
        fn ok(text: &str) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                reply: Some(text.to_string()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                reply: None,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RemoteLyrics for FakeRemote {
        async fn fetch(&self, _artist: &str, _title: &str) -> Result<String, LyricsError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone().ok_or(LyricsError::Status(reqwest::StatusCode::NOT_FOUND))
        }
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lrcplay-resolver-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn settings(dir: &Path, fallback: bool) -> ResolverSettings {
        ResolverSettings {
            lyrics_dir: dir.to_path_buf(),
            unsynced_spacing: 4.2,
            fallback,
        }
    }

    fn song() -> SongIdentity {
        SongIdentity {
            file_name: "track.mp3".to_string(),
            artist: "Artist".to_string(),
            title: "Title".to_string(),
        }
    }

    #[test]
    fn test_lrc_path() {
        let dir = Path::new("/lyrics");
        assert_eq!(lrc_path(dir, "song.mp3"), PathBuf::from("/lyrics/song.lrc"));
        assert_eq!(lrc_path(dir, "a.b.flac"), PathBuf::from("/lyrics/a.b.lrc"));
        assert_eq!(lrc_path(dir, "/music/x.wav"), PathBuf::from("/lyrics/x.lrc"));
        assert_eq!(lrc_path(dir, "noext"), PathBuf::from("/lyrics/noext.lrc"));
    }

    #[tokio::test]
    async fn test_local_file_wins_without_remote_call() {
        let dir = temp_dir("local");
        std::fs::write(dir.join("track.lrc"), "[00:01.00]one\n[00:02.50]two\n").unwrap();
        let remote = FakeRemote::ok("remote line");
        let resolver = Resolver::new(settings(&dir, true)).with_remote(remote.clone());

        let res = resolver.resolve(&song()).await;
        assert_eq!(res.source, Some(LyricSource::Local));
        match res.result {
            LyricsResult::Synced(map) => assert_eq!(map.len(), 2),
            other => panic!("expected synced, got {other:?}"),
        }
        assert_eq!(remote.calls(), 0);
    }

    #[tokio::test]
    async fn test_local_without_timed_lines_falls_through() {
        let dir = temp_dir("untimed");
        std::fs::write(dir.join("track.lrc"), "[ti:Only tags]\nplain text\n").unwrap();
        let remote = FakeRemote::ok("a\n\nb\nc");
        let resolver = Resolver::new(settings(&dir, true)).with_remote(remote.clone());

        let res = resolver.resolve(&song()).await;
        assert_eq!(res.source, Some(LyricSource::Remote));
        let LyricsResult::Unsynced(map) = res.result else {
            panic!("expected unsynced");
        };
        let ts: Vec<f64> = map.entries().iter().map(|l| l.timestamp).collect();
        assert_eq!(ts, vec![0.0, 4.2, 8.4]);
        assert_eq!(remote.calls(), 1);
    }

    #[tokio::test]
    async fn test_fallback_when_everything_fails() {
        let dir = temp_dir("fallback");
        let remote = FakeRemote::failing();
        let resolver = Resolver::new(settings(&dir, true)).with_remote(remote.clone());

        let res = resolver.resolve(&song()).await;
        assert_eq!(res.source, Some(LyricSource::Fallback));
        match res.result {
            LyricsResult::Synced(map) => assert!(!map.is_empty()),
            other => panic!("expected synced fallback, got {other:?}"),
        }
        assert_eq!(remote.calls(), 1);
    }

    #[tokio::test]
    async fn test_no_fallback_yields_none() {
        let dir = temp_dir("none");
        let resolver = Resolver::new(settings(&dir, false)).with_remote(FakeRemote::failing());

        let res = resolver.resolve(&song()).await;
        assert_eq!(res.source, None);
        assert!(matches!(res.result, LyricsResult::None));
    }

    #[tokio::test]
    async fn test_remote_result_is_cached() {
        let dir = temp_dir("cache");
        let cache = LyricsCache::new(dir.join("cache.sqlite3"));
        let remote = FakeRemote::ok("first\nsecond");
        let resolver = Resolver::new(settings(&dir, true))
            .with_remote(remote.clone())
            .with_cache(cache);

        let first = resolver.resolve(&song()).await;
        assert_eq!(first.source, Some(LyricSource::Remote));
        let second = resolver.resolve(&song()).await;
        assert_eq!(second.source, Some(LyricSource::Cache));
        assert_eq!(second.result.map().map(TimedLyricMap::len), Some(2));
        assert_eq!(remote.calls(), 1);
    }

    #[tokio::test]
    async fn test_cache_ignored_without_remote() {
        let dir = temp_dir("cache-offline");
        let cache = LyricsCache::new(dir.join("cache.sqlite3"));
        cache.put("Artist", "Title", "stale\nlines").await.unwrap();

        let resolver = Resolver::new(settings(&dir, true)).with_cache(cache);
        let res = resolver.resolve(&song()).await;
        assert_eq!(res.source, Some(LyricSource::Fallback));
    }

    #[tokio::test]
    async fn test_blank_artist_skips_remote() {
        let dir = temp_dir("blank");
        let remote = FakeRemote::ok("x");
        let resolver = Resolver::new(settings(&dir, true)).with_remote(remote.clone());
        let mut s = song();
        s.artist = "  ".to_string();

        let res = resolver.resolve(&s).await;
        assert_eq!(res.source, Some(LyricSource::Fallback));
        assert_eq!(remote.calls(), 0);
    }
}
