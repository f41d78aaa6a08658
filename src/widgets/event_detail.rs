use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::{App, LoadState};
use crate::domain::{EventAction, WebhookEvent};
use crate::format::{format_event_message, format_timestamp};
use crate::theme;

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let event = match &app.selected_event {
        LoadState::Loaded(event) => event,
        LoadState::Error(msg) => {
            let error = Paragraph::new(format!(" {}", msg))
                .style(Style::default().fg(theme::RED))
                .wrap(Wrap { trim: true });
            frame.render_widget(error, area);
            return;
        }
        LoadState::Loading | LoadState::NotLoaded => {
            let loading =
                Paragraph::new(" Loading event...").style(Style::default().fg(theme::TEXT_MUTED));
            frame.render_widget(loading, area);
            return;
        }
    };

    let paragraph = Paragraph::new(detail_lines(event))
        .block(Block::default().borders(Borders::NONE))
        .wrap(Wrap { trim: true })
        .scroll((app.detail_scroll, 0));
    frame.render_widget(paragraph, area);
}

/// Number of unwrapped lines the detail pane shows for `event`.
pub fn line_count(event: &WebhookEvent) -> usize {
    detail_lines(event).len()
}

fn detail_lines(event: &WebhookEvent) -> Vec<Line<'_>> {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!(" {}", format_event_message(event)),
            Style::default()
                .fg(theme::TEXT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!(" {:<14}", "Action"), Style::default().fg(theme::TEXT_DIM)),
            Span::styled(
                format!("{} {}", event.action.symbol(), event.action.badge()),
                Style::default().fg(theme::action_color(&event.action)),
            ),
        ]),
        field_line("Author", &event.author),
    ];

    // Only pull requests and merges carry a source branch.
    if matches!(event.action, EventAction::PullRequest | EventAction::Merge) {
        lines.push(field_line("From branch", &event.from_branch));
    }
    lines.push(field_line("To branch", &event.to_branch));
    lines.push(field_line("Timestamp", &format_timestamp(&event.timestamp)));
    lines.push(field_line("Raw timestamp", &event.timestamp));
    lines.push(field_line("Request ID", &event.request_id));
    lines
}

fn field_line(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {:<14}", label), Style::default().fg(theme::TEXT_DIM)),
        Span::styled(value.to_string(), Style::default().fg(theme::TEXT)),
    ])
}
