//! Lyrics pane: one row per line, active line highlighted, eased scroll

use std::time::Instant;

use crate::app::state::AppState;
use crate::sync::TrackerPhase;
use crate::tui::theme::get_theme;
use crate::tui::truncate_str;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let theme = get_theme();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(theme.palette.border))
        .title(title(state, theme.icons.lyrics))
        .title_style(Style::default().fg(theme.palette.accent));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Remember the viewport so time updates can compute scroll targets.
    state.lyrics_rows = inner.height;

    if let Some(text) = state.lyrics.placeholder() {
        let top = inner.height.saturating_sub(1) / 2;
        let mut lines = vec![Line::default(); top as usize];
        lines.push(Line::from(Span::styled(
            text,
            Style::default().fg(theme.palette.fg_secondary),
        )));
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
        return;
    }

    let offset = state.lyrics.scroll_offset(inner.height, Instant::now());
    let active = state.lyrics.active_index();
    let max_width = inner.width.saturating_sub(2) as usize;

    let lines: Vec<Line> = state
        .lyrics
        .lines()
        .iter()
        .enumerate()
        .skip(offset)
        .take(inner.height as usize)
        .map(|(i, line)| {
            let style = match active {
                Some(a) if a == i => Style::default()
                    .fg(theme.palette.accent)
                    .add_modifier(Modifier::BOLD),
                Some(a) if a.abs_diff(i) <= 2 => Style::default().fg(theme.palette.fg_secondary),
                _ => Style::default().fg(theme.palette.fg_dim),
            };
            Line::from(Span::styled(truncate_str(&line.text, max_width), style))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn title(state: &AppState, icon: &str) -> String {
    let source = match state.lyrics_source {
        Some(source) if state.lyrics_synced => format!(" · {}", source.label()),
        Some(source) => format!(" · {} (unsynced)", source.label()),
        None => String::new(),
    };
    let marker = phase_marker(state.lyrics.phase());
    format!(" {icon} Lyrics{source}{marker} ")
}

/// Title suffix for the tracker phase. Idle has none; its placeholder says enough.
fn phase_marker(phase: TrackerPhase) -> &'static str {
    match phase {
        TrackerPhase::Idle => "",
        TrackerPhase::Loaded => " · waiting",
        TrackerPhase::Tracking => " · live",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::{LyricSource, LyricsResult, Resolution, SongIdentity, TimedLyricMap};
    use crate::playlist::Playlist;
    use crate::sync::{LyricsView, SyncSettings};
    use std::time::Duration;

    fn state() -> AppState {
        let view = LyricsView::new(SyncSettings::default(), Duration::from_millis(400), 0.001);
        AppState::new(Playlist::default(), view, 50)
    }

    fn song() -> SongIdentity {
        SongIdentity {
            file_name: "a.mp3".to_string(),
            artist: "Artist".to_string(),
            title: "Title".to_string(),
        }
    }

    #[test]
    fn test_title_follows_phase() {
        let mut s = state();
        assert_eq!(title(&s, "*"), " * Lyrics ");

        s.begin_lyrics_load(&song());
        let map = TimedLyricMap::from_pairs([(10.0, "a"), (20.0, "b")]);
        s.apply_resolution(
            song(),
            Resolution {
                result: LyricsResult::Synced(map),
                source: Some(LyricSource::Local),
            },
        );
        assert_eq!(title(&s, "*"), " * Lyrics · local · waiting ");

        s.on_time_update(10.0, Instant::now());
        assert_eq!(title(&s, "*"), " * Lyrics · local · live ");

        s.stop_playback();
        assert_eq!(title(&s, "*"), " * Lyrics ");
    }
}
