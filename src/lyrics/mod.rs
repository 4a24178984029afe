//! Lyrics module for acquiring and representing timed lyrics
//!
//! This module provides:
//! - Timed lyric store (ordered timestamp -> line map)
//! - LRC format parser for synchronized lyrics
//! - lyrics.ovh API client for unsynced lyrics
//! - Resolver chaining local file, cache, remote and built-in fallback

pub mod error;
pub mod lyrics_ovh;
pub mod parser;
pub mod resolver;
pub mod store;

pub use error::LyricsError;
pub use lyrics_ovh::LyricsOvhClient;
pub use resolver::{Resolver, ResolverSettings};
pub use store::{TimedLine, TimedLyricMap};

/// What the resolver needs to know about a song
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SongIdentity {
    /// Audio file name, e.g. `song.mp3`
    pub file_name: String,
    pub artist: String,
    pub title: String,
}

/// Lyrics for one load; exactly one variant is active
#[derive(Debug, Clone, PartialEq)]
pub enum LyricsResult {
    /// Per-line timing taken from the source
    Synced(TimedLyricMap),
    /// Evenly spaced, approximate timing
    Unsynced(TimedLyricMap),
    None,
}

impl LyricsResult {
    pub fn map(&self) -> Option<&TimedLyricMap> {
        match self {
            LyricsResult::Synced(m) | LyricsResult::Unsynced(m) => Some(m),
            LyricsResult::None => None,
        }
    }

    /// The map, or an empty one for `None`.
    pub fn into_map(self) -> TimedLyricMap {
        match self {
            LyricsResult::Synced(m) | LyricsResult::Unsynced(m) => m,
            LyricsResult::None => TimedLyricMap::new(),
        }
    }

    pub fn is_synced(&self) -> bool {
        matches!(self, LyricsResult::Synced(_))
    }
}

/// Which strategy produced the lyrics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LyricSource {
    Local,
    Cache,
    Remote,
    Fallback,
}

impl LyricSource {
    pub fn label(self) -> &'static str {
        match self {
            LyricSource::Local => "local",
            LyricSource::Cache => "cached",
            LyricSource::Remote => "online",
            LyricSource::Fallback => "demo",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// `None` only when nothing was found and the fallback is disabled
    pub source: Option<LyricSource>,
    pub result: LyricsResult,
}

impl Resolution {
    pub fn new(source: LyricSource, result: LyricsResult) -> Self {
        Self {
            source: Some(source),
            result,
        }
    }
}
