use crate::domain::*;

#[derive(Debug, Clone)]
pub enum Action {
    // Navigation
    NavigateUp,
    NavigateDown,
    NavigateTop,
    NavigateBottom,
    PageUp,
    PageDown,
    Select,
    Back,

    // Vim chord
    EnterPendingG,

    // UI
    ToggleHelp,
    CloseOverlay,

    // Poll outcomes
    Connected(u64),
    Disconnected(String),
    EventsLoaded(Vec<WebhookEvent>),

    // Detail responses
    EventDetailLoaded {
        request_id: String,
        event: Box<WebhookEvent>,
    },
    EventDetailFailed {
        request_id: String,
        message: String,
    },

    // App control
    Refresh,
    Quit,
    Tick,
}
