use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use ratatui::widgets::TableState;

use crate::action::Action;
use crate::domain::*;
use crate::format::failure_message;
use crate::widgets::event_detail;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    EventList,
    EventDetail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    PendingG,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
}

#[derive(Debug, Clone)]
pub enum LoadState<T> {
    NotLoaded,
    Loading,
    Loaded(T),
    Error(String),
}

impl<T> LoadState<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Disconnected(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    RefreshNow,
    LoadEventDetail(String),
    Quit,
}

pub struct App {
    // View state
    pub view: View,
    pub input_mode: InputMode,
    pub overlay: Overlay,

    // Connection
    pub base_url: String,
    pub connection_status: ConnectionStatus,
    pub poll_interval: Duration,
    pub last_updated: Option<DateTime<Local>>,

    // Event data
    pub events: LoadState<Vec<WebhookEvent>>,
    pub event_count: Option<u64>,
    pub count_stale: bool,
    pub event_table_state: TableState,
    // Selected request id while the list is replaced by the error panel
    selection_anchor: Option<String>,

    // Detail
    pub selected_event: LoadState<WebhookEvent>,
    pub detail_scroll: u16,
    // Lookup the detail view is waiting on; other answers are stale
    detail_request_id: Option<String>,

    // App
    pub should_quit: bool,
    pub last_error: Option<(String, Instant)>,
}

impl App {
    pub fn new(base_url: String, poll_interval: Duration) -> Self {
        Self {
            view: View::EventList,
            input_mode: InputMode::Normal,
            overlay: Overlay::None,

            base_url,
            connection_status: ConnectionStatus::Connecting,
            poll_interval,
            last_updated: None,

            events: LoadState::Loading,
            event_count: None,
            count_stale: false,
            event_table_state: TableState::default(),
            selection_anchor: None,

            selected_event: LoadState::NotLoaded,
            detail_scroll: 0,
            detail_request_id: None,

            should_quit: false,
            last_error: None,
        }
    }

    pub fn update(&mut self, action: Action) -> Vec<Effect> {
        // Clear stale error toasts
        if let Some((_, at)) = &self.last_error {
            if at.elapsed() > Duration::from_secs(5) {
                self.last_error = None;
            }
        }

        match action {
            // Navigation
            Action::NavigateUp => {
                if self.is_detail_view() {
                    self.detail_scroll = self.detail_scroll.saturating_sub(1);
                } else {
                    self.navigate_up();
                }
                vec![]
            }
            Action::NavigateDown => {
                if self.is_detail_view() {
                    self.scroll_detail_to(self.detail_scroll.saturating_add(1));
                } else {
                    self.navigate_down();
                }
                vec![]
            }
            Action::NavigateTop => {
                self.input_mode = InputMode::Normal;
                if self.is_detail_view() {
                    self.detail_scroll = 0;
                } else {
                    self.event_table_state.select_first();
                    self.clamp_selection();
                }
                vec![]
            }
            Action::NavigateBottom => {
                if self.is_detail_view() {
                    self.scroll_detail_to(u16::MAX);
                } else if let Some(len) = self.event_len().checked_sub(1) {
                    self.event_table_state.select(Some(len));
                }
                vec![]
            }
            Action::PageUp => {
                if self.is_detail_view() {
                    self.detail_scroll =
                        self.detail_scroll.saturating_sub(self.page_height() as u16);
                } else {
                    for _ in 0..self.page_height() {
                        self.navigate_up();
                    }
                }
                vec![]
            }
            Action::PageDown => {
                if self.is_detail_view() {
                    self.scroll_detail_to(
                        self.detail_scroll.saturating_add(self.page_height() as u16),
                    );
                } else {
                    for _ in 0..self.page_height() {
                        self.navigate_down();
                    }
                }
                vec![]
            }
            Action::Select => self.handle_select(),
            Action::Back => self.handle_back(),

            Action::EnterPendingG => {
                self.input_mode = InputMode::PendingG;
                vec![]
            }

            // UI
            Action::ToggleHelp => {
                self.overlay = if self.overlay == Overlay::Help {
                    Overlay::None
                } else {
                    Overlay::Help
                };
                vec![]
            }
            Action::CloseOverlay => {
                if self.overlay != Overlay::None {
                    self.overlay = Overlay::None;
                } else {
                    self.input_mode = InputMode::Normal;
                }
                vec![]
            }

            // Poll outcomes
            Action::Connected(count) => {
                self.connection_status = ConnectionStatus::Connected;
                self.event_count = Some(count);
                self.count_stale = false;
                self.last_updated = Some(Local::now());
                vec![]
            }
            Action::Disconnected(cause) => {
                // The count is kept but flagged until the next good poll.
                self.count_stale = self.event_count.is_some();
                if let Some(id) = self.selected_request_id() {
                    self.selection_anchor = Some(id);
                }
                self.events = LoadState::Error(failure_message(&cause));
                self.connection_status = ConnectionStatus::Disconnected(cause);
                vec![]
            }
            Action::EventsLoaded(events) => {
                let previous = self
                    .selected_request_id()
                    .or_else(|| self.selection_anchor.take());
                self.selection_anchor = None;
                self.events = LoadState::Loaded(events);
                self.restore_selection(previous);
                vec![]
            }

            Action::EventDetailLoaded { request_id, event } => {
                if self.awaits_detail(&request_id) {
                    self.detail_request_id = None;
                    self.selected_event = LoadState::Loaded(*event);
                }
                vec![]
            }
            Action::EventDetailFailed {
                request_id,
                message,
            } => {
                if self.awaits_detail(&request_id) {
                    self.detail_request_id = None;
                    self.selected_event = LoadState::Error(message.clone());
                    self.last_error = Some((message, Instant::now()));
                }
                vec![]
            }

            // App control
            Action::Refresh => vec![Effect::RefreshNow],
            Action::Quit => {
                self.should_quit = true;
                vec![Effect::Quit]
            }
            Action::Tick => vec![],
        }
    }

    pub fn selected_list_event(&self) -> Option<&WebhookEvent> {
        let events = self.events.data()?;
        events.get(self.event_table_state.selected()?)
    }

    fn handle_select(&mut self) -> Vec<Effect> {
        if self.view != View::EventList || self.overlay != Overlay::None {
            return vec![];
        }
        let Some(event) = self.selected_list_event().cloned() else {
            return vec![];
        };
        let request_id = event.request_id.clone();
        self.view = View::EventDetail;
        self.detail_scroll = 0;
        if request_id.is_empty() {
            // Nothing to look up; show what the list already has.
            self.detail_request_id = None;
            self.selected_event = LoadState::Loaded(event);
            return vec![];
        }
        self.detail_request_id = Some(request_id.clone());
        self.selected_event = LoadState::Loading;
        vec![Effect::LoadEventDetail(request_id)]
    }

    fn handle_back(&mut self) -> Vec<Effect> {
        self.input_mode = InputMode::Normal;
        if self.overlay != Overlay::None {
            self.overlay = Overlay::None;
        } else if self.is_detail_view() {
            self.view = View::EventList;
            self.selected_event = LoadState::NotLoaded;
            self.detail_request_id = None;
            self.detail_scroll = 0;
        }
        vec![]
    }

    fn awaits_detail(&self, request_id: &str) -> bool {
        self.is_detail_view()
            && self.selected_event.is_loading()
            && self.detail_request_id.as_deref() == Some(request_id)
    }

    /// Scrolls the detail pane, keeping the last line on screen.
    fn scroll_detail_to(&mut self, offset: u16) {
        let last = self
            .selected_event
            .data()
            .map_or(0, |event| event_detail::line_count(event).saturating_sub(1));
        self.detail_scroll = offset.min(u16::try_from(last).unwrap_or(u16::MAX));
    }

    fn selected_request_id(&self) -> Option<String> {
        self.selected_list_event().map(|e| e.request_id.clone())
    }

    /// Keeps the cursor on the same event across polls when it is still
    /// listed; otherwise keeps the row index, clamped.
    fn restore_selection(&mut self, previous: Option<String>) {
        let position = previous.and_then(|id| {
            self.events
                .data()?
                .iter()
                .position(|e| !e.request_id.is_empty() && e.request_id == id)
        });
        match position {
            Some(idx) => self.event_table_state.select(Some(idx)),
            None if self.event_table_state.selected().is_none() => {
                self.event_table_state.select_first()
            }
            None => {}
        }
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let len = self.event_len();
        match self.event_table_state.selected() {
            _ if len == 0 => self.event_table_state.select(None),
            Some(idx) if idx >= len => self.event_table_state.select(Some(len - 1)),
            None => self.event_table_state.select(Some(0)),
            Some(_) => {}
        }
    }

    fn navigate_up(&mut self) {
        if let Some(idx) = self.event_table_state.selected() {
            self.event_table_state.select(Some(idx.saturating_sub(1)));
        }
        self.clamp_selection();
    }

    fn navigate_down(&mut self) {
        let next = self.event_table_state.selected().map_or(0, |idx| idx + 1);
        self.event_table_state.select(Some(next));
        self.clamp_selection();
    }

    fn event_len(&self) -> usize {
        self.events.data().map_or(0, Vec::len)
    }

    fn is_detail_view(&self) -> bool {
        self.view == View::EventDetail
    }

    fn page_height(&self) -> usize {
        10
    }
}
