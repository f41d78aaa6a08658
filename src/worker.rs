use std::sync::Arc;

use tokio::sync::mpsc;

use crate::action::Action;
use crate::client::EventsClient;

#[derive(Debug)]
pub enum DetailRequest {
    LoadEvent { request_id: String },
}

#[derive(Clone)]
pub struct DetailHandle {
    tx: mpsc::UnboundedSender<DetailRequest>,
}

impl DetailHandle {
    pub fn send(&self, request: DetailRequest) {
        let _ = self.tx.send(request);
    }
}

/// Serves one-off lookups off the UI loop. Poll cycles do not go through
/// here; they belong to the poller.
pub struct DetailWorker {
    client: Arc<dyn EventsClient>,
    rx: mpsc::UnboundedReceiver<DetailRequest>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl DetailWorker {
    pub fn new(
        client: Arc<dyn EventsClient>,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> (Self, DetailHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = DetailHandle { tx };
        let worker = Self {
            client,
            rx,
            action_tx,
        };
        (worker, handle)
    }

    pub async fn run(mut self) {
        while let Some(request) = self.rx.recv().await {
            let action = self.process(request).await;
            if self.action_tx.send(action).is_err() {
                break;
            }
        }
    }

    async fn process(&self, request: DetailRequest) -> Action {
        match request {
            DetailRequest::LoadEvent { request_id } => {
                match self.client.get_event(&request_id).await {
                    Ok(event) => Action::EventDetailLoaded {
                        request_id,
                        event: Box::new(event),
                    },
                    Err(e) => {
                        tracing::warn!("failed to load event {}: {}", request_id, e);
                        Action::EventDetailFailed {
                            request_id,
                            message: format!("failed to load event: {}", e),
                        }
                    }
                }
            }
        }
    }
}
