use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    chat::Chatroom,
    ids::new_id,
    message::{Message, NewMessage},
    timestamp::Timestamp,
    validation::{self, ValidationError, MAX_MESSAGE_CHARS},
};

/// Number of messages in one history window.
pub const MESSAGES_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("invalid chatroom title: {0}")]
    InvalidTitle(#[source] ValidationError),
    #[error("chatroom {id} does not exist")]
    ChatroomNotFound { id: String },
    #[error("message needs text or an image")]
    EmptyMessage,
    #[error("message must be at most {} characters", MAX_MESSAGE_CHARS)]
    MessageTooLong,
}

/// The persisted projection of chat state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSnapshot {
    #[serde(default)]
    pub chatrooms: Vec<Chatroom>,
    #[serde(default)]
    pub messages: BTreeMap<String, Vec<Message>>,
}

/// Chatrooms, their message lists and the ephemeral UI state around them.
///
/// Rooms are kept newest-first. For every room, `message_count` equals the
/// length of its message list and `last_message` is that list's last element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatState {
    chatrooms: Vec<Chatroom>,
    messages: HashMap<String, Vec<Message>>,
    current_chatroom: Option<String>,
    is_typing: bool,
    search_query: String,
}

impl ChatState {
    /// Rebuilds state from a snapshot, repairing anything that breaks the
    /// room/message invariants. Returns the state and the number of repairs.
    pub fn from_snapshot(snapshot: ChatSnapshot) -> (Self, usize) {
        let mut repairs = 0;
        let mut seen = HashSet::new();
        let mut messages = snapshot.messages;
        let mut state = Self::default();

        for mut room in snapshot.chatrooms {
            if !seen.insert(room.id.clone()) {
                repairs += 1;
                continue;
            }

            let list = messages.remove(&room.id).unwrap_or_default();
            let last_message = list.last().cloned();
            if room.message_count != list.len() || room.last_message != last_message {
                repairs += 1;
                room.message_count = list.len();
                room.last_message = last_message;
            }

            state.messages.insert(room.id.clone(), list);
            state.chatrooms.push(room);
        }

        repairs += messages.len();

        (state, repairs)
    }

    pub fn snapshot(&self) -> ChatSnapshot {
        ChatSnapshot {
            chatrooms: self.chatrooms.clone(),
            messages: self
                .messages
                .iter()
                .map(|(id, list)| (id.clone(), list.clone()))
                .collect(),
        }
    }

    pub fn chatrooms(&self) -> &[Chatroom] {
        &self.chatrooms
    }

    pub fn chatroom(&self, id: &str) -> Option<&Chatroom> {
        self.chatrooms.iter().find(|room| room.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.messages.contains_key(id)
    }

    /// Full history of a room, oldest first; empty for unknown ids.
    pub fn messages(&self, id: &str) -> &[Message] {
        self.messages.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn current_chatroom(&self) -> Option<&str> {
        self.current_chatroom.as_deref()
    }

    pub fn is_typing(&self) -> bool {
        self.is_typing
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn create_chatroom(&mut self, title: &str) -> Result<String, ChatError> {
        let title = validation::validate_chatroom_title(title).map_err(ChatError::InvalidTitle)?;

        let id = new_id();
        self.chatrooms.insert(
            0,
            Chatroom {
                id: id.clone(),
                title: title.to_owned(),
                created_at: Timestamp::now(),
                last_message: None,
                message_count: 0,
            },
        );
        self.messages.insert(id.clone(), Vec::new());

        Ok(id)
    }

    /// Removes a room and its history. Returns whether anything was removed.
    pub fn delete_chatroom(&mut self, id: &str) -> bool {
        let before = self.chatrooms.len();
        self.chatrooms.retain(|room| room.id != id);
        let removed_list = self.messages.remove(id).is_some();

        if self.current_chatroom.as_deref() == Some(id) {
            self.current_chatroom = None;
        }

        removed_list || self.chatrooms.len() != before
    }

    /// Selection is not checked against existing rooms; an unknown id
    /// simply yields an empty message view.
    pub fn set_current_chatroom(&mut self, id: Option<String>) {
        self.current_chatroom = id;
    }

    pub fn add_message(&mut self, chatroom_id: &str, draft: NewMessage) -> Result<Message, ChatError> {
        if !self.contains(chatroom_id) {
            return Err(ChatError::ChatroomNotFound {
                id: chatroom_id.to_owned(),
            });
        }

        let content = draft.content.trim();
        if content.is_empty() && draft.image.is_none() {
            return Err(ChatError::EmptyMessage);
        }
        if content.chars().count() > MAX_MESSAGE_CHARS {
            return Err(ChatError::MessageTooLong);
        }

        let message = Message {
            id: new_id(),
            content: content.to_owned(),
            sender: draft.sender,
            timestamp: Timestamp::now(),
            image: draft.image,
        };
        self.push_message(chatroom_id, message.clone());

        Ok(message)
    }

    /// Appends a message only if the room still exists. Used by deferred
    /// completions, which must never resurrect a deleted room.
    pub fn append_if_present(&mut self, chatroom_id: &str, draft: NewMessage) -> Option<Message> {
        self.add_message(chatroom_id, draft).ok()
    }

    /// Returns the `page`-th window of history counted from the newest end.
    ///
    /// Page 1 holds the newest [`MESSAGES_PAGE_SIZE`] messages, page 2 the ones
    /// before them, and so on. Each window keeps chronological order.
    pub fn load_messages(&self, chatroom_id: &str, page: usize) -> Vec<Message> {
        let list = self.messages(chatroom_id);
        if page == 0 {
            return Vec::new();
        }

        let Some(skipped) = (page - 1).checked_mul(MESSAGES_PAGE_SIZE) else {
            return Vec::new();
        };
        let end = list.len().saturating_sub(skipped);
        let start = end.saturating_sub(MESSAGES_PAGE_SIZE);

        list[start..end].to_vec()
    }

    /// The newest `pages` history windows of a room joined in chronological order.
    pub fn recent_messages(&self, chatroom_id: &str, pages: usize) -> Vec<Message> {
        let list = self.messages(chatroom_id);
        let shown = pages.saturating_mul(MESSAGES_PAGE_SIZE).min(list.len());

        list[list.len() - shown..].to_vec()
    }

    pub fn set_typing(&mut self, typing: bool) {
        self.is_typing = typing;
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Rooms whose title contains the search query, ignoring case.
    pub fn filtered_chatrooms(&self) -> Vec<&Chatroom> {
        let query = self.search_query.trim();
        if query.is_empty() {
            return self.chatrooms.iter().collect();
        }

        let needle = self.search_query.to_lowercase();
        self.chatrooms
            .iter()
            .filter(|room| room.title.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn current_messages(&self) -> &[Message] {
        match self.current_chatroom.as_deref() {
            Some(id) => self.messages(id),
            None => &[],
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn push_message(&mut self, chatroom_id: &str, message: Message) {
        let list = self.messages.entry(chatroom_id.to_owned()).or_default();
        list.push(message.clone());
        let count = list.len();

        if let Some(room) = self.chatrooms.iter_mut().find(|room| room.id == chatroom_id) {
            room.last_message = Some(message);
            room.message_count = count;
        }
    }
}
