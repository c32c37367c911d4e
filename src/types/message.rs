//! Display messages and the thread message wire format

use serde::{Deserialize, Serialize};

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// A message as the session displays it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    /// Locally constructed user message, shown before the service has confirmed it.
    ///
    /// The id is unique per call and never matches a server message id.
    pub fn local_user(text: impl Into<String>) -> Self {
        Self {
            id: format!("local-{}", uuid::Uuid::new_v4()),
            role: MessageRole::User,
            content: text.into(),
        }
    }

    pub fn is_local(&self) -> bool {
        self.id.starts_with("local-")
    }

    /// Convert a server page (newest first) into chronological display order.
    pub fn from_history(list: MessageList) -> Vec<Message> {
        list.data.into_iter().rev().map(Message::from).collect()
    }
}

impl From<ThreadMessage> for Message {
    fn from(msg: ThreadMessage) -> Self {
        let content = msg.flatten_content();
        Self {
            id: msg.id,
            role: msg.role,
            content,
        }
    }
}

/// A message object as returned by `GET /threads/{id}/messages`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub id: String,
    pub role: MessageRole,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

impl ThreadMessage {
    /// Render every content block into one display string.
    ///
    /// Text blocks are joined by a blank line; image blocks become a short
    /// placeholder; block types this crate does not know are skipped.
    pub fn flatten_content(&self) -> String {
        self.content
            .iter()
            .filter_map(ContentBlock::display_text)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Content block of a thread message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: TextContent },
    #[serde(rename = "image_file")]
    ImageFile { image_file: ImageFileRef },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrlRef },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextContent {
    pub value: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageFileRef {
    pub file_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageUrlRef {
    pub url: String,
}

impl ContentBlock {
    pub fn text(value: impl Into<String>) -> Self {
        ContentBlock::Text {
            text: TextContent {
                value: value.into(),
                annotations: Vec::new(),
            },
        }
    }

    fn display_text(&self) -> Option<String> {
        match self {
            ContentBlock::Text { text } => Some(text.value.clone()),
            ContentBlock::ImageFile { image_file } => {
                Some(format!("[image: {}]", image_file.file_id))
            }
            ContentBlock::ImageUrl { image_url } => Some(format!("[image: {}]", image_url.url)),
            ContentBlock::Unsupported => None,
        }
    }
}

/// One page of thread messages, newest first.
///
/// `last_id` is the cursor for the next (older) page while `has_more` is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageList {
    #[serde(default)]
    pub data: Vec<ThreadMessage>,
    #[serde(default)]
    pub first_id: Option<String>,
    #[serde(default)]
    pub last_id: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

impl MessageList {
    /// Cursor for the following page, if the service reported one.
    pub fn next_cursor(&self) -> Option<&str> {
        if !self.has_more {
            return None;
        }
        self.last_id
            .as_deref()
            .or_else(|| self.data.last().map(|m| m.id.as_str()))
    }
}
