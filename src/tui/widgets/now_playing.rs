//! Now Playing widget: title, progress, volume and playlist modes

use crate::app::state::AppState;
use crate::playlist::RepeatMode;
use crate::tui::theme::{get_theme, Icons};
use crate::tui::{format_clock, truncate_str};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(frame: &mut Frame, state: &AppState, area: Rect) {
    let theme = get_theme();
    let icons = &theme.icons;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(theme.palette.border))
        .title(format!(" {} Player · {} ", icons.music, state.backend))
        .title_style(Style::default().fg(theme.palette.accent));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let padded = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner)[1];

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(1), // Artist
            Constraint::Length(1), // Progress bar
            Constraint::Length(1), // Time + controls + volume
            Constraint::Min(0),    // Toast
        ])
        .split(padded);

    let content_width = padded.width as usize;

    let (title, artist) = match &state.now_playing {
        Some(song) => (song.title.as_str(), song.artist.as_str()),
        None => ("Not playing", ""),
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            truncate_str(title, content_width),
            Style::default()
                .fg(theme.palette.fg_primary)
                .add_modifier(Modifier::BOLD),
        ))),
        rows[0],
    );
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            truncate_str(artist, content_width),
            Style::default().fg(theme.palette.fg_secondary),
        ))),
        rows[1],
    );

    let ratio = if state.now_playing.is_some() && state.duration_secs > 0.0 {
        (state.position_secs / state.duration_secs).clamp(0.0, 1.0)
    } else {
        0.0
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            render_progress_bar(rows[2].width as usize, ratio, icons),
            Style::default().fg(theme.palette.accent),
        ))),
        rows[2],
    );

    let play_icon = match (&state.now_playing, state.paused) {
        (None, _) => icons.stop,
        (Some(_), true) => icons.pause,
        (Some(_), false) => icons.play,
    };
    let vol_icon = if state.muted || state.volume == 0 {
        icons.volume_mute
    } else if state.volume < 50 {
        icons.volume_low
    } else {
        icons.volume_high
    };

    let dim = Style::default().fg(theme.palette.fg_secondary);
    let mut controls = vec![
        Span::styled(play_icon, Style::default().fg(theme.palette.playing)),
        Span::raw(" "),
        Span::styled(
            format!(
                "{}/{}",
                format_clock(state.position_secs),
                format_clock(state.duration_secs)
            ),
            dim,
        ),
        Span::raw("  "),
        Span::styled(vol_icon, dim),
        Span::raw(" "),
        Span::styled(format!("{}%", state.volume), dim),
    ];

    let mode = Style::default().fg(theme.palette.accent_alt);
    match state.playlist.repeat_mode() {
        RepeatMode::Off => {}
        RepeatMode::One => {
            controls.push(Span::raw("  "));
            controls.push(Span::styled(icons.repeat_one, mode));
        }
        RepeatMode::All => {
            controls.push(Span::raw("  "));
            controls.push(Span::styled(icons.repeat, mode));
        }
    }
    if state.playlist.is_shuffle_enabled() {
        controls.push(Span::raw("  "));
        controls.push(Span::styled(icons.shuffle, mode));
    }
    frame.render_widget(Paragraph::new(Line::from(controls)), rows[3]);

    if let Some(toast) = &state.toast
        && !toast.is_expired()
    {
        let toast_line = Line::from(vec![
            Span::styled(format!("{} ", icons.info), dim),
            Span::styled(
                truncate_str(&toast.message, content_width.saturating_sub(3)),
                Style::default().fg(theme.palette.fg_primary),
            ),
        ]);
        frame.render_widget(Paragraph::new(toast_line), rows[4]);
    }
}

fn render_progress_bar(width: usize, ratio: f64, icons: &Icons) -> String {
    if width < 3 {
        return String::new();
    }

    let filled = ((width - 1) as f64 * ratio).round() as usize;
    let empty = width.saturating_sub(filled + 1);

    let mut bar = String::with_capacity(width * 3);
    bar.push_str(&icons.progress_full.repeat(filled));
    bar.push_str(icons.progress_head);
    bar.push_str(&icons.progress_empty.repeat(empty));
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar_width() {
        let icons = Icons::nerd();
        let bar = render_progress_bar(10, 0.5, &icons);
        assert_eq!(bar.chars().count(), 10);
        assert!(bar.starts_with("━━━━"));
        assert!(render_progress_bar(2, 0.5, &icons).is_empty());
    }

    #[test]
    fn test_progress_bar_ends() {
        let icons = Icons::nerd();
        assert!(render_progress_bar(5, 0.0, &icons).starts_with('●'));
        assert!(render_progress_bar(5, 1.0, &icons).ends_with('●'));
    }
}
