use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{App, ConnectionStatus, View};
use crate::theme;

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let mut left_spans: Vec<Span> = vec![
        Span::styled(
            " hookwatch ",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("| ", Style::default().fg(theme::TEXT_MUTED)),
        Span::styled(
            "Events",
            Style::default()
                .fg(theme::TEXT)
                .add_modifier(Modifier::BOLD),
        ),
    ];

    if app.view == View::EventDetail {
        let event = app
            .selected_event
            .data()
            .or_else(|| app.selected_list_event());
        if let Some(event) = event {
            left_spans.push(Span::styled(" > ", Style::default().fg(theme::TEXT_MUTED)));
            left_spans.push(Span::styled(
                event.request_id.as_str(),
                Style::default().fg(theme::TEXT_DIM),
            ));
        }
    } else {
        left_spans.push(Span::styled(
            format!("  {}", app.base_url),
            Style::default().fg(theme::TEXT_MUTED),
        ));
    }

    // Build right-aligned status spans
    let mut right_spans: Vec<Span> = Vec::new();

    let connection_indicator = match &app.connection_status {
        ConnectionStatus::Connected => {
            Span::styled("● Connected", Style::default().fg(theme::GREEN))
        }
        ConnectionStatus::Connecting => {
            Span::styled("◌ Connecting...", Style::default().fg(theme::YELLOW))
        }
        ConnectionStatus::Disconnected(_) => {
            Span::styled("✗ Disconnected", Style::default().fg(theme::RED))
        }
    };
    right_spans.push(connection_indicator);

    if let Some(count) = app.event_count {
        let (label, color) = if app.count_stale {
            (format!("  [{} events, stale]", count), theme::YELLOW)
        } else {
            (format!("  [{} events]", count), theme::TEXT_DIM)
        };
        right_spans.push(Span::styled(label, Style::default().fg(color)));
    }

    let updated = app
        .last_updated
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());
    right_spans.push(Span::styled(
        format!("  updated {}", updated),
        Style::default().fg(theme::TEXT_MUTED),
    ));

    right_spans.push(Span::styled(
        format!("  ↻ {}s", app.poll_interval.as_secs_f64()),
        Style::default().fg(theme::TEXT_MUTED),
    ));

    right_spans.push(Span::raw(" "));

    // Calculate widths and fill gap with spaces
    let left_width: usize = left_spans.iter().map(|s| s.width()).sum();
    let right_width: usize = right_spans.iter().map(|s| s.width()).sum();
    let total_width = area.width as usize;
    let gap = total_width.saturating_sub(left_width + right_width);

    let mut spans = left_spans;
    spans.push(Span::raw(" ".repeat(gap)));
    spans.extend(right_spans);

    let line = Line::from(spans);
    let widget = Paragraph::new(line).style(Style::default().bg(theme::BG_BAR));
    frame.render_widget(widget, area);
}
