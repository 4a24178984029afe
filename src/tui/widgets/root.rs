//! Root layout widget

use crate::app::state::AppState;
use crate::tui::theme::get_theme;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::{lyrics, now_playing, playlist};

const KEY_HINTS: &[(&str, &str)] = &[
    ("space", "play/pause"),
    ("x", "stop"),
    ("n/p", "next/prev"),
    ("[ ]", "seek"),
    ("+/-", "volume"),
    ("r", "repeat"),
    ("s", "shuffle"),
    ("/", "search"),
    ("f/F", "favorite"),
    ("q", "quit"),
];

/// ┌──────────────┬──────────────────────────────┐
/// │  Playlist    │            Lyrics            │
/// │              │                              │
/// ├──────────────┴──────────────────────────────┤
/// │                  Player                     │
/// └─────────────────────────────────────────────┘
///  key hints
pub fn render(frame: &mut Frame, state: &mut AppState) {
    let root = frame.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),
            Constraint::Length(7),
            Constraint::Length(1),
        ])
        .split(root);

    let top_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(rows[0]);

    playlist::render(frame, state, top_cols[0]);
    lyrics::render(frame, state, top_cols[1]);
    now_playing::render(frame, state, rows[1]);
    render_hints(frame, rows[2]);

    if state.dialog.is_some() {
        render_dialog(frame, state, root);
    }
}

fn render_hints(frame: &mut Frame, area: Rect) {
    let theme = get_theme();
    let spans: Vec<Span> = KEY_HINTS
        .iter()
        .flat_map(|(key, what)| {
            [
                Span::styled(format!(" {key} "), Style::default().fg(theme.palette.accent)),
                Span::styled(format!("{what} "), Style::default().fg(theme.palette.fg_secondary)),
            ]
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_dialog(frame: &mut Frame, state: &AppState, area: Rect) {
    let Some(dialog) = &state.dialog else {
        return;
    };
    let theme = get_theme();
    let rect = centered_rect(60, 7, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(theme.palette.error))
        .title(format!(" {} {} ", theme.icons.error, dialog.title))
        .title_style(
            Style::default()
                .fg(theme.palette.error)
                .add_modifier(Modifier::BOLD),
        );

    let body = vec![
        Line::from(Span::styled(
            dialog.message.as_str(),
            Style::default().fg(theme.palette.fg_primary),
        )),
        Line::default(),
        Line::from(Span::styled(
            "Esc/Enter to dismiss",
            Style::default().fg(theme.palette.fg_secondary),
        )),
    ];

    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(body)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        rect,
    );
}

/// Rect of `percent_x` width and fixed `height`, centered in `area`.
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = area.width * percent_x.min(100) / 100;
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect() {
        let r = centered_rect(50, 4, Rect::new(0, 0, 100, 20));
        assert_eq!(r, Rect::new(25, 8, 50, 4));

        let tiny = centered_rect(60, 7, Rect::new(0, 0, 10, 3));
        assert_eq!(tiny.height, 3);
        assert!(tiny.x + tiny.width <= 10);
    }
}
