use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

use crate::app::{App, LoadState};
use crate::format::{format_event_message, NO_EVENTS_PLACEHOLDER};
use crate::theme;

pub fn render(app: &mut App, frame: &mut Frame, area: Rect) {
    let events = match &app.events {
        LoadState::Loaded(events) => events,
        LoadState::Error(msg) => {
            let panel = Paragraph::new(msg.as_str())
                .style(Style::default().fg(theme::RED))
                .block(Block::default().borders(Borders::NONE))
                .wrap(Wrap { trim: false });
            frame.render_widget(panel, inset(area));
            return;
        }
        LoadState::Loading => {
            let loading =
                Paragraph::new(" Loading events...").style(Style::default().fg(theme::TEXT_MUTED));
            frame.render_widget(loading, area);
            return;
        }
        LoadState::NotLoaded => return,
    };

    if events.is_empty() {
        let empty = Paragraph::new(format!(" {}", NO_EVENTS_PLACEHOLDER))
            .style(Style::default().fg(theme::TEXT_DIM));
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from(" Action"),
        Cell::from("Event"),
        Cell::from("Request ID"),
    ])
    .style(
        Style::default()
            .fg(theme::ACCENT)
            .add_modifier(Modifier::BOLD),
    )
    .height(1);

    let rows: Vec<Row> = events
        .iter()
        .map(|event| {
            Row::new(vec![
                Cell::from(format!(" {} {}", event.action.symbol(), event.action.badge()))
                    .style(Style::default().fg(theme::action_color(&event.action))),
                Cell::from(format_event_message(event)).style(Style::default().fg(theme::TEXT)),
                Cell::from(event.request_id.as_str()).style(Style::default().fg(theme::TEXT_DIM)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(17),
        Constraint::Fill(1),
        Constraint::Length(38),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::NONE))
        .row_highlight_style(
            Style::default()
                .bg(theme::BG_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(table, area, &mut app.event_table_state);
}

fn inset(area: Rect) -> Rect {
    Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(1),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;
    use crate::action::Action;
    use crate::domain::{EventAction, WebhookEvent};

    fn draw(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(160, 8)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render(app, frame, area);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app() -> App {
        App::new("http://localhost:5000/api".to_string(), Duration::from_secs(15))
    }

    #[test]
    fn empty_list_shows_only_placeholder() {
        let mut app = app();
        app.update(Action::Connected(0));
        app.update(Action::EventsLoaded(vec![]));

        let screen = draw(&mut app);

        assert_eq!(screen.matches(NO_EVENTS_PLACEHOLDER).count(), 1);
        assert!(!screen.contains("Request ID"));
        assert!(!screen.contains(" on "));
    }

    #[test]
    fn events_render_with_badge_and_message() {
        let mut app = app();
        app.update(Action::EventsLoaded(vec![WebhookEvent {
            action: EventAction::Merge,
            author: "alice".into(),
            from_branch: "dev".into(),
            to_branch: "main".into(),
            timestamp: "2021-04-01T21:30:00Z".into(),
            request_id: "r1".into(),
        }]));

        let screen = draw(&mut app);

        assert!(screen.contains("MERGE"));
        assert!(screen.contains("alice merged branch dev to main on 1st April 2021 - 9:30 PM UTC"));
        assert!(screen.contains("r1"));
        assert!(!screen.contains(NO_EVENTS_PLACEHOLDER));
    }

    #[test]
    fn failure_replaces_list_with_error_panel() {
        let mut app = app();
        app.update(Action::EventsLoaded(vec![WebhookEvent::default()]));
        app.update(Action::Disconnected("HTTP error! status: 503".into()));

        let screen = draw(&mut app);

        assert!(screen.contains("Failed to connect to backend."));
        assert!(screen.contains("Error: HTTP error! status: 503"));
        assert!(!screen.contains("Request ID"));
    }
}
