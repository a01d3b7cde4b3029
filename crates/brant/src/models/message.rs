use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::content::RichContent;
use crate::models::role::Role;
use crate::models::source::GroundingSource;

/// One streamed fragment of a model turn. A present `sources` list replaces
/// any previously seen set rather than merging with it; an absent one leaves
/// the carried set alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkPayload {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<GroundingSource>>,
}

impl ChunkPayload {
    pub fn text<S: Into<String>>(text: S) -> Self {
        ChunkPayload {
            text: text.into(),
            sources: None,
        }
    }

    pub fn with_sources(mut self, sources: Vec<GroundingSource>) -> Self {
        self.sources = Some(sources);
        self
    }
}

/// What a completed message resolved to: either prose (rendered as markdown)
/// or a validated rich content payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    PlainText { text: String },
    Rich { content: RichContent },
}

impl MessageContent {
    pub fn plain_text<S: Into<String>>(text: S) -> Self {
        MessageContent::PlainText { text: text.into() }
    }

    pub fn rich(content: RichContent) -> Self {
        MessageContent::Rich { content }
    }

    pub fn as_plain_text(&self) -> Option<&str> {
        match self {
            MessageContent::PlainText { text } => Some(text),
            _ => None,
        }
    }

    pub fn as_rich(&self) -> Option<&RichContent> {
        match self {
            MessageContent::Rich { content } => Some(content),
            _ => None,
        }
    }

    pub fn is_rich(&self) -> bool {
        matches!(self, MessageContent::Rich { .. })
    }
}

/// A chat message after stream resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub created: i64,
    pub content: MessageContent,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<GroundingSource>,
}

impl Message {
    fn new(role: Role, content: MessageContent) -> Self {
        Message {
            id: Uuid::new_v4().to_string(),
            role,
            created: Utc::now().timestamp(),
            content,
            sources: Vec::new(),
        }
    }

    pub fn user<S: Into<String>>(text: S) -> Self {
        Message::new(Role::User, MessageContent::plain_text(text))
    }

    pub fn assistant(content: MessageContent) -> Self {
        Message::new(Role::Assistant, content)
    }

    /// Replaces the attached sources wholesale.
    pub fn with_sources(mut self, sources: Vec<GroundingSource>) -> Self {
        self.sources = sources;
        self
    }

    pub fn as_plain_text(&self) -> Option<&str> {
        self.content.as_plain_text()
    }

    pub fn as_rich(&self) -> Option<&RichContent> {
        self.content.as_rich()
    }
}
