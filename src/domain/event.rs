use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// What happened in the repository. Tags the backend does not know yet
/// arrive as `Other` and render through the generic message arm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventAction {
    Push,
    PullRequest,
    Merge,
    Other(String),
}

impl EventAction {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "PUSH" => Self::Push,
            "PULL_REQUEST" => Self::PullRequest,
            "MERGE" => Self::Merge,
            other => Self::Other(other.to_string()),
        }
    }

    /// Wire tag, also used as the badge label.
    pub fn badge(&self) -> &str {
        match self {
            Self::Push => "PUSH",
            Self::PullRequest => "PULL_REQUEST",
            Self::Merge => "MERGE",
            Self::Other(tag) => tag,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Push => "↑",
            Self::PullRequest => "⇄",
            Self::Merge => "⋈",
            Self::Other(_) => "•",
        }
    }
}

impl Default for EventAction {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.badge())
    }
}

impl Serialize for EventAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.badge())
    }
}

impl<'de> Deserialize<'de> for EventAction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Ok(Self::from_tag(&tag))
    }
}

/// One webhook-derived record as served by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookEvent {
    #[serde(default)]
    pub action: EventAction,
    #[serde(default, deserialize_with = "nullable_string")]
    pub author: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub to_branch: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub from_branch: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub timestamp: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub request_id: String,
}

/// Body of `GET /events`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EventsPage {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

/// Body of `GET /events/<request_id>`.
#[derive(Debug, Clone, Deserialize)]
pub struct EventEnvelope {
    pub event: WebhookEvent,
}

// The backend stores `from_branch: null` for pushes.
fn nullable_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
