//! Lyric synchronization
//!
//! Maps the playback clock onto the lyric line that should be highlighted.

pub mod scroll;
pub mod view;

pub use view::{Highlight, LyricsView};

use crate::lyrics::{TimedLine, TimedLyricMap};

/// Matching parameters. Both defaults were tuned by ear.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncSettings {
    /// Added to the playback time before matching, to cover display lag
    pub bias: f64,
    /// Largest distance at which the nearest line still counts as active
    pub tolerance: f64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            bias: 0.3,
            tolerance: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerPhase {
    /// No map installed
    Idle,
    /// Map installed, no active line
    Loaded,
    /// A line is active
    Tracking,
}

/// Index of the line nearest to `time + bias`, if it lies within tolerance.
///
/// Ties go to the earlier line.
pub fn find_active_line(lines: &[TimedLine], time: f64, settings: &SyncSettings) -> Option<usize> {
    let adjusted = time + settings.bias;

    let mut best: Option<(usize, f64)> = None;
    for (i, line) in lines.iter().enumerate() {
        let diff = (line.timestamp - adjusted).abs();
        if best.is_none_or(|(_, d)| diff < d) {
            best = Some((i, diff));
        }
    }

    best.filter(|(_, d)| *d < settings.tolerance).map(|(i, _)| i)
}

#[derive(Debug, Clone)]
pub struct LyricTracker {
    settings: SyncSettings,
    map: Option<TimedLyricMap>,
    active: Option<usize>,
    last_query: f64,
}

impl LyricTracker {
    pub fn new(settings: SyncSettings) -> Self {
        Self {
            settings,
            map: None,
            active: None,
            last_query: 0.0,
        }
    }

    /// Install the map for a new song, dropping all derived state.
    pub fn set_map(&mut self, map: TimedLyricMap) {
        self.map = Some(map);
        self.active = None;
        self.last_query = 0.0;
    }

    /// Back to idle (song change or stop).
    pub fn clear(&mut self) {
        self.map = None;
        self.active = None;
        self.last_query = 0.0;
    }

    /// Recompute the active line for the given playback time.
    pub fn on_time_update(&mut self, time: f64) -> Option<usize> {
        self.last_query = time;
        self.active = self
            .map
            .as_ref()
            .and_then(|m| find_active_line(m.entries(), time, &self.settings));
        self.active
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_line(&self) -> Option<&TimedLine> {
        self.map.as_ref()?.get(self.active?)
    }

    pub fn last_query_time(&self) -> f64 {
        self.last_query
    }

    pub fn phase(&self) -> TrackerPhase {
        match (&self.map, self.active) {
            (None, _) => TrackerPhase::Idle,
            (Some(_), None) => TrackerPhase::Loaded,
            (Some(_), Some(_)) => TrackerPhase::Tracking,
        }
    }

    pub fn lines(&self) -> &[TimedLine] {
        self.map.as_ref().map(TimedLyricMap::entries).unwrap_or(&[])
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> Vec<TimedLine> {
        self.map.as_ref().map(TimedLyricMap::snapshot).unwrap_or_default()
    }
}
