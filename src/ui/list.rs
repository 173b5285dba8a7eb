use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::app::{App, InputMode};
use crate::types::{ListStatus, LoadKind};

use super::{spinner_frame, status_color};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_search_bar(frame, app, chunks[0]);
    render_list(frame, app, chunks[1]);
    render_footer(frame, app, chunks[2]);
}

fn render_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let searching = app.input_mode == InputMode::Search;
    let border_style = if searching {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let input = Paragraph::new(app.search_buffer.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title("Search"),
    );
    frame.render_widget(input, area);

    if searching {
        let x = area.x + 1 + app.search_buffer.chars().count() as u16;
        let max_x = area.x + area.width.saturating_sub(2);
        frame.set_cursor_position((x.min(max_x), area.y + 1));
    }
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    match &app.status {
        ListStatus::LoadingInitial => {
            let loading = Paragraph::new(format!(
                "{} Loading characters...",
                spinner_frame(app.ticks)
            ))
            .block(Block::default().borders(Borders::ALL).title("Characters"))
            .style(Style::default().fg(Color::Yellow));
            frame.render_widget(loading, area);
            return;
        }
        ListStatus::Error {
            error,
            phase: LoadKind::Reset,
        } => {
            let message = vec![
                Line::from("Couldn't load characters"),
                Line::from(Span::styled(
                    error.to_string(),
                    Style::default().fg(Color::Red),
                )),
                Line::from(Span::styled(
                    "Press r to retry",
                    Style::default().fg(Color::Gray),
                )),
            ];
            let failed = Paragraph::new(message)
                .block(Block::default().borders(Borders::ALL).title("Characters"));
            frame.render_widget(failed, area);
            return;
        }
        _ => {}
    }

    if app.characters.is_empty() {
        let empty = Paragraph::new("No characters found")
            .block(Block::default().borders(Borders::ALL).title("Characters"))
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    }

    let w = area.width.saturating_sub(2) as usize;
    let fixed = 53; // name(28) + status(7) + species(14) + spacing(4)
    let flex = w.saturating_sub(fixed).max(10);

    let items: Vec<ListItem> = app
        .characters
        .iter()
        .enumerate()
        .map(|(i, character)| {
            let style = if i == app.selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let line = Line::from(vec![
                Span::styled(format!("{:<28}", truncate(&character.name, 28)), style),
                Span::raw(" "),
                Span::styled(
                    format!("{:<7}", character.status.to_string()),
                    Style::default().fg(status_color(character.status)),
                ),
                Span::raw(" "),
                Span::styled(
                    format!("{:<14}", truncate(&character.species, 14)),
                    Style::default().fg(Color::Gray),
                ),
                Span::raw("  "),
                Span::styled(
                    format!("{:<flex$}", truncate(&character.location, flex)),
                    Style::default().fg(Color::DarkGray),
                ),
            ]);

            ListItem::new(line)
        })
        .collect();

    let title = match app.total {
        Some(total) => format!("Characters ({} of {})", app.characters.len(), total),
        None => format!("Characters ({})", app.characters.len()),
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    state.select(Some(app.selected));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let line = match &app.status {
        ListStatus::LoadingMore => Line::from(Span::styled(
            format!("{} Loading more...", spinner_frame(app.ticks)),
            Style::default().fg(Color::Yellow),
        )),
        ListStatus::Error {
            error,
            phase: LoadKind::Append,
        } => Line::from(Span::styled(
            format!("Couldn't load more: {} | r: retry", error),
            Style::default().fg(Color::Red),
        )),
        _ => return,
    };

    frame.render_widget(Paragraph::new(line), area);
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
