mod detail;
mod list;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{App, InputMode, Screen};
use crate::types::{CharacterStatus, ListStatus};

const SPINNER: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);

    match app.screen {
        Screen::List => list::render(frame, app, chunks[1]),
        Screen::Detail => detail::render(frame, app, chunks[1]),
    }

    render_status_bar(frame, app, chunks[2]);
}

pub(crate) fn spinner_frame(ticks: usize) -> &'static str {
    SPINNER[ticks % SPINNER.len()]
}

pub(crate) fn status_color(status: CharacterStatus) -> Color {
    match status {
        CharacterStatus::Alive => Color::Green,
        CharacterStatus::Dead => Color::Red,
        CharacterStatus::Unknown => Color::Gray,
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.screen {
        Screen::List => {
            if app.active_query.is_empty() {
                "plumbus - Characters".to_string()
            } else {
                format!("plumbus - Characters matching \"{}\"", app.active_query)
            }
        }
        Screen::Detail => {
            if let Some(character) = &app.detail {
                format!("plumbus - {}", character.name)
            } else {
                "plumbus - Character".to_string()
            }
        }
    };

    let header = Paragraph::new(Line::from(vec![Span::styled(
        title,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )]))
    .style(Style::default().bg(Color::DarkGray));

    frame.render_widget(header, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = if let Some(flash) = &app.flash {
        Line::from(vec![Span::styled(
            flash.clone(),
            Style::default().fg(Color::Yellow),
        )])
    } else if let ListStatus::Error { error, .. } = &app.status {
        Line::from(vec![Span::styled(
            format!("Error: {} | r: retry", error),
            Style::default().fg(Color::Red),
        )])
    } else if app.status.is_loading() || app.detail_loading() {
        Line::from(vec![Span::styled(
            format!("{} Loading...", spinner_frame(app.ticks)),
            Style::default().fg(Color::Yellow),
        )])
    } else {
        let help = match (app.screen, app.input_mode) {
            (Screen::List, InputMode::Search) => "type to filter | Enter: apply | Esc: cancel",
            (Screen::List, InputMode::Normal) => {
                "j/k/g/G: nav | Ctrl+d/u: page | Enter: open | /: search | r: refresh | q: quit"
            }
            (Screen::Detail, _) => "r: reload | o: open image | y: copy image URL | q: back",
        };
        Line::from(vec![Span::styled(help, Style::default().fg(Color::Gray))])
    };

    let status_bar = Paragraph::new(status).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status_bar, area);
}
