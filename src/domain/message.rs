use serde::{Deserialize, Serialize};

use super::timestamp::Timestamp;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

impl Sender {
    pub fn display_name(self) -> &'static str {
        match self {
            Sender::User => "You",
            Sender::Ai => "Gemini",
        }
    }
}

/// An immutable unit of conversation owned by one chatroom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    #[serde(default)]
    pub timestamp: Timestamp,
    /// Inline image as a `data:` URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Message {
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Returns the display content: image label + text, or just text if no image.
    pub fn display_content(&self) -> String {
        match (self.has_image(), self.content.is_empty()) {
            (true, true) => "[Image]".to_owned(),
            (true, false) => format!("[Image] {}", self.content),
            (false, _) => self.content.clone(),
        }
    }
}

/// Message payload before the store assigns an id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub content: String,
    pub sender: Sender,
    pub image: Option<String>,
}

impl NewMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            sender: Sender::User,
            image: None,
        }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            sender: Sender::Ai,
            image: None,
        }
    }

    pub fn with_image(mut self, image: Option<String>) -> Self {
        self.image = image;
        self
    }
}
