use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::App;

use super::status_color;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(character) = &app.detail else {
        let block = Block::default().borders(Borders::ALL).title("Character");
        let empty = Paragraph::new("No character selected")
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(
                format!("#{} ", character.id),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(&character.name, Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled(
                character.status.to_string(),
                Style::default()
                    .fg(status_color(character.status))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" | "),
            Span::raw(&character.species),
            Span::raw(" | "),
            Span::raw(&character.gender),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Origin:   ", Style::default().fg(Color::Gray)),
            Span::raw(&character.origin),
        ]),
        Line::from(vec![
            Span::styled("Location: ", Style::default().fg(Color::Gray)),
            Span::raw(&character.location),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Image:    ", Style::default().fg(Color::Gray)),
            Span::styled(&character.image, Style::default().fg(Color::Blue)),
        ]),
        Line::from(vec![
            Span::styled("Created:  ", Style::default().fg(Color::Gray)),
            Span::raw(character.created.format("%Y-%m-%d %H:%M").to_string()),
        ]),
    ];

    let details =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Character"));

    frame.render_widget(details, area);
}
