//! Lyrics pane model
//!
//! Owns the tracker and the scroll state the lyrics widget renders from.
//! Each line occupies one row, so line `i` starts at row `i`.

use std::time::{Duration, Instant};

use super::scroll::{ScrollAnimator, Viewport};
use super::{LyricTracker, SyncSettings, TrackerPhase};
use crate::lyrics::{TimedLine, TimedLyricMap};

pub const PLACEHOLDER_IDLE: &str = "Lyrics will appear here when a song is playing";
pub const PLACEHOLDER_LOADING: &str = "Loading lyrics...";
pub const PLACEHOLDER_EMPTY: &str = "No lyrics available for this song";

/// Outcome of one highlight pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    pub active: Option<usize>,
    /// The active line differs from the previous pass
    pub changed: bool,
    /// A new scroll animation was started
    pub scrolled: bool,
}

#[derive(Debug, Clone)]
pub struct LyricsView {
    tracker: LyricTracker,
    scroll: ScrollAnimator,
    placeholder: Option<&'static str>,
}

impl LyricsView {
    pub fn new(settings: SyncSettings, scroll_duration: Duration, scroll_epsilon: f64) -> Self {
        Self {
            tracker: LyricTracker::new(settings),
            scroll: ScrollAnimator::new(scroll_duration, scroll_epsilon),
            placeholder: Some(PLACEHOLDER_IDLE),
        }
    }

    /// Show a freshly resolved map; an empty map shows the "no lyrics" text.
    pub fn display_lyrics(&mut self, map: TimedLyricMap) {
        self.placeholder = map.is_empty().then_some(PLACEHOLDER_EMPTY);
        self.tracker.set_map(map);
        self.scroll.reset();
    }

    /// Recompute the active line and scroll it to the middle of the viewport.
    pub fn highlight_current_lyric(&mut self, time: f64, viewport_rows: u16, now: Instant) -> Highlight {
        let previous = self.tracker.active_index();
        let active = self.tracker.on_time_update(time);

        let mut scrolled = false;
        if let Some(index) = active {
            let viewport = self.viewport(viewport_rows);
            if let Some(target) = viewport.center_on(index as f64, 1.0) {
                scrolled = self.scroll.scroll_to(target, now);
            }
        }

        Highlight {
            active,
            changed: active != previous,
            scrolled,
        }
    }

    /// Drop the current lyrics and show the loading text.
    pub fn clear(&mut self) {
        self.tracker.clear();
        self.scroll.reset();
        self.placeholder = Some(PLACEHOLDER_LOADING);
    }

    /// Back to the initial idle text (playback stopped).
    pub fn reset(&mut self) {
        self.tracker.clear();
        self.scroll.reset();
        self.placeholder = Some(PLACEHOLDER_IDLE);
    }

    pub fn placeholder(&self) -> Option<&'static str> {
        self.placeholder
    }

    pub fn lines(&self) -> &[TimedLine] {
        self.tracker.lines()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.tracker.active_index()
    }

    pub fn phase(&self) -> TrackerPhase {
        self.tracker.phase()
    }

    pub fn is_animating(&self) -> bool {
        self.scroll.is_animating()
    }

    /// First visible row for the current scroll position.
    pub fn scroll_offset(&mut self, viewport_rows: u16, now: Instant) -> usize {
        let viewport = self.viewport(viewport_rows);
        let position = self.scroll.position(now);
        viewport.offset_for(position).round() as usize
    }

    fn viewport(&self, rows: u16) -> Viewport {
        Viewport::new(self.tracker.lines().len() as f64, rows as f64)
    }
}
