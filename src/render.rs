use std::io::Write;

use chrono::{DateTime, Local};
use tokio::sync::mpsc;

use crate::action::Action;
use crate::client::ClientError;
use crate::domain::WebhookEvent;
use crate::format::{failure_message, format_event_message, NO_EVENTS_PLACEHOLDER};
use crate::poller::Renderer;

/// Forwards poll outcomes into the TUI event loop.
pub struct ActionRenderer {
    tx: mpsc::UnboundedSender<Action>,
}

impl ActionRenderer {
    pub fn new(tx: mpsc::UnboundedSender<Action>) -> Self {
        Self { tx }
    }

    fn send(&self, action: Action) {
        let _ = self.tx.send(action);
    }
}

impl Renderer for ActionRenderer {
    fn render_connected(&mut self, count: u64) {
        self.send(Action::Connected(count));
    }

    fn render_disconnected(&mut self, error: &ClientError) {
        self.send(Action::Disconnected(error.to_string()));
    }

    fn render_events(&mut self, events: &[WebhookEvent]) {
        self.send(Action::EventsLoaded(events.to_vec()));
    }
}

/// Line-oriented output for `--plain`.
pub struct TextRenderer<W> {
    out: W,
    clock: fn() -> DateTime<Local>,
}

impl<W: Write + Send> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            clock: Local::now,
        }
    }

    pub fn with_clock(out: W, clock: fn() -> DateTime<Local>) -> Self {
        Self { out, clock }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_lines<I: IntoIterator<Item = String>>(&mut self, lines: I) {
        let result = lines
            .into_iter()
            .try_for_each(|line| writeln!(self.out, "{}", line))
            .and_then(|_| self.out.flush());
        if let Err(e) = result {
            tracing::warn!("failed to write output: {}", e);
        }
    }
}

impl<W: Write + Send> Renderer for TextRenderer<W> {
    fn render_connected(&mut self, count: u64) {
        let updated = (self.clock)().format("%H:%M:%S");
        self.write_lines([format!("[connected] {} events (updated {})", count, updated)]);
    }

    fn render_disconnected(&mut self, error: &ClientError) {
        let mut lines = vec!["[disconnected]".to_string()];
        lines.extend(failure_message(&error.to_string()).lines().map(|l| format!("  {}", l)));
        self.write_lines(lines);
    }

    fn render_events(&mut self, events: &[WebhookEvent]) {
        if events.is_empty() {
            self.write_lines([format!("  {}", NO_EVENTS_PLACEHOLDER)]);
            return;
        }
        let lines: Vec<String> = events
            .iter()
            .map(|event| {
                format!(
                    "- {} [{}] (request {})",
                    format_event_message(event),
                    event.action.badge(),
                    event.request_id
                )
            })
            .collect();
        self.write_lines(lines);
    }
}
