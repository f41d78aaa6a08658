use async_trait::async_trait;
use thiserror::Error;

use crate::domain::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP error! status: {status}")]
    Status { status: u16, body: String },
    #[error("parse error: {0}")]
    Parse(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// Errors that put the monitor into the disconnected state.
    pub fn is_connection_failure(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Status { .. } | Self::Parse(_)
        )
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[async_trait]
pub trait EventsClient: Send + Sync {
    /// `GET {base}/events`, newest first as ordered by the backend.
    async fn list_events(&self) -> ClientResult<EventsPage>;

    /// `GET {base}/events/{request_id}`.
    async fn get_event(&self, request_id: &str) -> ClientResult<WebhookEvent>;
}
