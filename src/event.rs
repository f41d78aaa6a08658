use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use tokio::sync::mpsc;

use crate::action::Action;
use crate::app::{InputMode, Overlay, View};

pub enum AppEvent {
    Key(KeyEvent),
    Tick,
}

/// Terminal input plus a steady tick for redraws.
pub struct RawEventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl RawEventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let mut reader = EventStream::new();
            let mut tick = tokio::time::interval(tick_rate);

            loop {
                tokio::select! {
                    _ = tick.tick() => {
                        if tx.send(AppEvent::Tick).is_err() {
                            break;
                        }
                    }
                    event = reader.next() => {
                        match event {
                            Some(Ok(Event::Key(key))) if key.kind != KeyEventKind::Release => {
                                if tx.send(AppEvent::Key(key)).is_err() {
                                    break;
                                }
                            }
                            Some(Ok(_)) => {}
                            Some(Err(_)) => break,
                            None => break,
                        }
                    }
                }
            }
        });

        Self { rx }
    }

    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }
}

/// Map a key event to an action based on current app state
pub fn key_to_action(
    key: KeyEvent,
    view: &View,
    input_mode: &InputMode,
    overlay: &Overlay,
) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('r') => Some(Action::Refresh),
            KeyCode::Char('d') => Some(Action::PageDown),
            KeyCode::Char('u') => Some(Action::PageUp),
            _ => None,
        };
    }

    if *overlay == Overlay::Help {
        return match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => Some(Action::ToggleHelp),
            _ => None,
        };
    }

    if *input_mode == InputMode::PendingG {
        return match key.code {
            KeyCode::Char('g') => Some(Action::NavigateTop),
            _ => Some(Action::CloseOverlay), // Cancel the pending chord
        };
    }

    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('?') => Some(Action::ToggleHelp),
        KeyCode::Char('r') => Some(Action::Refresh),
        KeyCode::Char('j') | KeyCode::Down => Some(Action::NavigateDown),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::NavigateUp),
        KeyCode::PageDown => Some(Action::PageDown),
        KeyCode::PageUp => Some(Action::PageUp),
        KeyCode::Char('g') => Some(Action::EnterPendingG),
        KeyCode::Home => Some(Action::NavigateTop),
        KeyCode::Char('G') | KeyCode::End => Some(Action::NavigateBottom),
        KeyCode::Enter if *view == View::EventList => Some(Action::Select),
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') => Some(Action::Back),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn normal(code: KeyCode) -> Option<Action> {
        key_to_action(key(code), &View::EventList, &InputMode::Normal, &Overlay::None)
    }

    #[test]
    fn list_keys() {
        assert!(matches!(normal(KeyCode::Char('j')), Some(Action::NavigateDown)));
        assert!(matches!(normal(KeyCode::Up), Some(Action::NavigateUp)));
        assert!(matches!(normal(KeyCode::Char('G')), Some(Action::NavigateBottom)));
        assert!(matches!(normal(KeyCode::Enter), Some(Action::Select)));
        assert!(matches!(normal(KeyCode::Char('r')), Some(Action::Refresh)));
        assert!(matches!(normal(KeyCode::Char('q')), Some(Action::Quit)));
        assert!(normal(KeyCode::Char('x')).is_none());
    }

    #[test]
    fn enter_does_nothing_in_detail() {
        let action = key_to_action(
            key(KeyCode::Enter),
            &View::EventDetail,
            &InputMode::Normal,
            &Overlay::None,
        );
        assert!(action.is_none());
    }

    #[test]
    fn gg_chord() {
        assert!(matches!(normal(KeyCode::Char('g')), Some(Action::EnterPendingG)));
        let pending = |code| {
            key_to_action(key(code), &View::EventList, &InputMode::PendingG, &Overlay::None)
        };
        assert!(matches!(pending(KeyCode::Char('g')), Some(Action::NavigateTop)));
        assert!(matches!(pending(KeyCode::Char('j')), Some(Action::CloseOverlay)));
    }

    #[test]
    fn help_overlay_swallows_keys() {
        let help = |code| key_to_action(key(code), &View::EventList, &InputMode::Normal, &Overlay::Help);
        assert!(matches!(help(KeyCode::Esc), Some(Action::ToggleHelp)));
        assert!(help(KeyCode::Char('j')).is_none());
    }

    #[test]
    fn ctrl_c_always_quits() {
        let action = key_to_action(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            &View::EventDetail,
            &InputMode::PendingG,
            &Overlay::Help,
        );
        assert!(matches!(action, Some(Action::Quit)));
    }
}
