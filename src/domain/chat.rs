use serde::{Deserialize, Serialize};

use super::{message::Message, timestamp::Timestamp};

/// A named conversation container.
///
/// `message_count` and `last_message` mirror the room's message list; only
/// [`ChatState`](super::chat_state::ChatState) updates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chatroom {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<Message>,
    #[serde(default)]
    pub message_count: usize,
}

impl Chatroom {
    pub fn last_message_preview(&self) -> Option<String> {
        self.last_message.as_ref().map(Message::display_content)
    }
}
