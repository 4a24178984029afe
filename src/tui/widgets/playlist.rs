use crate::app::state::AppState;
use crate::tui::theme::get_theme;
use crate::tui::truncate_str;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

pub fn render(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let theme = get_theme();
    let icons = &theme.icons;

    let visible = state.playlist.visible_indices();
    let count = if state.playlist.filter().is_active() {
        format!("{}/{}", visible.len(), state.playlist.len())
    } else {
        state.playlist.len().to_string()
    };
    let favorites = if state.playlist.filter().favorites_only {
        format!(" {}", icons.favorite)
    } else {
        String::new()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(theme.palette.border))
        .title(format!(" {} Playlist ({count}){favorites} ", icons.playlist))
        .title_style(Style::default().fg(theme.palette.accent));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let show_search = state.search_mode || !state.playlist.filter().query.is_empty();
    let list_area = if show_search {
        let sub = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(inner);
        render_search_line(frame, state, sub[0]);
        sub[1]
    } else {
        inner
    };

    if visible.is_empty() {
        let msg = if state.playlist.is_empty() {
            "No songs. Pass files or folders on the command line."
        } else {
            "No songs match the filter."
        };
        let empty = Paragraph::new(Line::from(msg))
            .style(Style::default().fg(theme.palette.fg_secondary));
        frame.render_widget(empty, list_area);
        return;
    }

    let visible_height = list_area.height as usize;
    state.update_scroll(visible_height);
    let scroll_offset = state.scroll_offset;
    let current = state.playlist.current_index();
    let max_width = list_area.width.saturating_sub(6) as usize;
    let songs = state.playlist.songs();

    let items: Vec<ListItem> = visible
        .iter()
        .skip(scroll_offset)
        .take(visible_height)
        .filter_map(|&i| songs.get(i).map(|song| (i, song)))
        .map(|(i, song)| {
            let is_current = current == Some(i);
            let marker = if is_current { icons.music } else { " " };
            let style = if is_current {
                Style::default()
                    .fg(theme.palette.playing)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.palette.fg_primary)
            };
            let heart = if song.favorite {
                Span::styled(format!(" {}", icons.favorite), Style::default().fg(theme.palette.error))
            } else {
                Span::raw("")
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{marker} "), style),
                Span::styled(truncate_str(&song.display_name(), max_width), style),
                heart,
            ]))
        })
        .collect();

    let selected_row = visible
        .iter()
        .position(|&i| i == state.selected)
        .map(|row| row.saturating_sub(scroll_offset));
    let mut list_state = ListState::default();
    list_state.select(selected_row);

    let list = List::new(items)
        .highlight_style(
            Style::default()
                .fg(theme.palette.bg_primary)
                .bg(theme.palette.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(icons.selected);

    frame.render_stateful_widget(list, list_area, &mut list_state);
}

fn render_search_line(frame: &mut Frame, state: &AppState, area: Rect) {
    let theme = get_theme();
    let style = if state.search_mode {
        Style::default().fg(theme.palette.accent)
    } else {
        Style::default().fg(theme.palette.fg_secondary)
    };
    let cursor = if state.search_mode { "_" } else { "" };
    let line = Line::from(vec![
        Span::styled(format!("{} /", theme.icons.search), style),
        Span::styled(format!("{}{cursor}", state.playlist.filter().query), style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
