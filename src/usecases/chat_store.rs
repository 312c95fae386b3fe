//! Shared chat state with write-through persistence and the simulated
//! assistant reply pipeline.

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Weak},
    time::Duration,
};

use parking_lot::Mutex;
use rand::Rng;
use tokio::{runtime::Handle, sync::watch, task::AbortHandle};

use crate::{
    domain::{
        chat::Chatroom,
        chat_state::{ChatError, ChatSnapshot, ChatState},
        message::{Message, NewMessage, Sender},
    },
    infra::{
        config::AssistantConfig,
        contracts::StateStorage,
        persistence::{self, PersistenceWriter, Slot},
    },
    usecases::{contracts::LogoutHook, responder::Responder},
};

const CHAT_STATE_REPAIRED: &str = "CHAT_STATE_REPAIRED";
const REPLY_DROPPED: &str = "REPLY_DROPPED";

/// Bounds of the simulated "thinking" delay, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyPolicy {
    min_delay_ms: u64,
    max_delay_ms: u64,
}

impl ReplyPolicy {
    pub fn new(min_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            min_delay_ms,
            max_delay_ms: max_delay_ms.max(min_delay_ms),
        }
    }

    pub fn from_config(config: &AssistantConfig) -> Self {
        Self::new(config.min_delay_ms, config.max_delay_ms)
    }

    /// Uniform in `[min, max)`; exactly `min` when the window is empty.
    pub fn sample_delay(&self) -> Duration {
        if self.max_delay_ms <= self.min_delay_ms {
            return Duration::from_millis(self.min_delay_ms);
        }

        Duration::from_millis(
            rand::thread_rng().gen_range(self.min_delay_ms..self.max_delay_ms),
        )
    }
}

impl Default for ReplyPolicy {
    fn default() -> Self {
        Self::from_config(&AssistantConfig::default())
    }
}

struct PendingReply {
    chatroom_id: String,
    abort: AbortHandle,
}

#[derive(Default)]
struct StoreState {
    chat: ChatState,
    pending: HashMap<u64, PendingReply>,
    next_reply_id: u64,
}

impl StoreState {
    fn cancel_replies(&mut self, matches: impl Fn(&PendingReply) -> bool) -> usize {
        let ids: Vec<u64> = self
            .pending
            .iter()
            .filter(|(_, reply)| matches(reply))
            .map(|(id, _)| *id)
            .collect();

        for id in &ids {
            if let Some(reply) = self.pending.remove(id) {
                reply.abort.abort();
            }
        }

        ids.len()
    }

    fn settle_typing(&mut self) {
        if self.pending.is_empty() {
            self.chat.set_typing(false);
        }
    }
}

struct Inner {
    state: Mutex<StoreState>,
    writer: PersistenceWriter,
    responder: Arc<dyn Responder>,
    policy: ReplyPolicy,
    runtime: Handle,
    revision: watch::Sender<u64>,
}

impl Inner {
    fn persist(&self, state: &StoreState) {
        self.writer.save(Slot::Chat, &state.chat.snapshot());
    }

    fn bump_revision(&self) {
        self.revision
            .send_modify(|revision| *revision = revision.wrapping_add(1));
    }

    fn complete_reply(&self, reply_id: u64, prompt: &str) {
        let content = self.responder.respond(prompt);

        let mut state = self.state.lock();
        let Some(pending) = state.pending.remove(&reply_id) else {
            tracing::debug!(code = REPLY_DROPPED, reply_id, "reply was cancelled");
            return;
        };

        match state
            .chat
            .append_if_present(&pending.chatroom_id, NewMessage::ai(content))
        {
            Some(message) => {
                tracing::debug!(
                    chatroom_id = %pending.chatroom_id,
                    message_id = %message.id,
                    "assistant reply appended"
                );
            }
            None => {
                tracing::debug!(
                    code = REPLY_DROPPED,
                    chatroom_id = %pending.chatroom_id,
                    "chatroom is gone; dropping reply"
                );
            }
        }

        state.settle_typing();
        self.persist(&state);
        self.bump_revision();
    }
}

/// Cloneable handle onto the chat state. All mutations are serialized by a
/// single lock and persisted in the order they happen.
#[derive(Clone)]
pub struct ChatStore {
    inner: Arc<Inner>,
}

impl fmt::Debug for ChatStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatStore")
            .field("revision", &self.revision())
            .field("policy", &self.inner.policy)
            .finish_non_exhaustive()
    }
}

impl ChatStore {
    /// Restores the chat slot, falling back to an empty store.
    pub fn rehydrate(
        storage: &dyn StateStorage,
        writer: PersistenceWriter,
        responder: Arc<dyn Responder>,
        policy: ReplyPolicy,
        runtime: Handle,
    ) -> Self {
        let chat = match persistence::rehydrate::<ChatSnapshot>(storage, Slot::Chat) {
            Some(snapshot) => {
                let (chat, repairs) = ChatState::from_snapshot(snapshot);
                if repairs > 0 {
                    tracing::warn!(
                        code = CHAT_STATE_REPAIRED,
                        repairs,
                        "persisted chat state was inconsistent and has been repaired"
                    );
                }
                chat
            }
            None => ChatState::default(),
        };

        let (revision, _) = watch::channel(0);

        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(StoreState {
                    chat,
                    ..StoreState::default()
                }),
                writer,
                responder,
                policy,
                runtime,
                revision,
            }),
        }
    }

    /// Runs `read` against a consistent view of the state.
    pub fn read<R>(&self, read: impl FnOnce(&ChatState) -> R) -> R {
        read(&self.inner.state.lock().chat)
    }

    pub fn chatrooms(&self) -> Vec<Chatroom> {
        self.read(|chat| chat.chatrooms().to_vec())
    }

    pub fn filtered_chatrooms(&self) -> Vec<Chatroom> {
        self.read(|chat| chat.filtered_chatrooms().into_iter().cloned().collect())
    }

    pub fn current_chatroom(&self) -> Option<String> {
        self.read(|chat| chat.current_chatroom().map(str::to_owned))
    }

    pub fn current_messages(&self) -> Vec<Message> {
        self.read(|chat| chat.current_messages().to_vec())
    }

    pub fn messages(&self, chatroom_id: &str) -> Vec<Message> {
        self.read(|chat| chat.messages(chatroom_id).to_vec())
    }

    pub fn load_messages(&self, chatroom_id: &str, page: usize) -> Vec<Message> {
        self.read(|chat| chat.load_messages(chatroom_id, page))
    }

    pub fn is_typing(&self) -> bool {
        self.read(ChatState::is_typing)
    }

    pub fn search_query(&self) -> String {
        self.read(|chat| chat.search_query().to_owned())
    }

    pub fn pending_replies(&self) -> usize {
        self.inner.state.lock().pending.len()
    }

    pub fn revision(&self) -> u64 {
        *self.inner.revision.borrow()
    }

    /// Receiver that changes whenever the state does.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    pub fn create_chatroom(&self, title: &str) -> Result<String, ChatError> {
        let mut state = self.inner.state.lock();
        let id = state.chat.create_chatroom(title)?;

        self.inner.persist(&state);
        self.inner.bump_revision();
        tracing::info!(chatroom_id = %id, "chatroom created");

        Ok(id)
    }

    /// Deletes a room and cancels replies still headed for it.
    pub fn delete_chatroom(&self, chatroom_id: &str) -> bool {
        let mut state = self.inner.state.lock();
        let removed = state.chat.delete_chatroom(chatroom_id);
        let cancelled = state.cancel_replies(|reply| reply.chatroom_id == chatroom_id);
        if cancelled > 0 {
            state.settle_typing();
        }

        if removed {
            self.inner.persist(&state);
            tracing::info!(chatroom_id, cancelled, "chatroom deleted");
        }
        if removed || cancelled > 0 {
            self.inner.bump_revision();
        }

        removed
    }

    pub fn set_current_chatroom(&self, chatroom_id: Option<String>) {
        let mut state = self.inner.state.lock();
        state.chat.set_current_chatroom(chatroom_id);
        self.inner.bump_revision();
    }

    /// Appends a message. A user message also schedules an assistant reply.
    pub fn add_message(&self, chatroom_id: &str, draft: NewMessage) -> Result<Message, ChatError> {
        let mut state = self.inner.state.lock();
        let message = state.chat.add_message(chatroom_id, draft)?;

        if message.sender == Sender::User {
            self.schedule_reply(&mut state, chatroom_id, message.content.clone());
        }

        self.inner.persist(&state);
        self.inner.bump_revision();

        Ok(message)
    }

    pub fn set_typing(&self, typing: bool) {
        let mut state = self.inner.state.lock();
        state.chat.set_typing(typing);
        self.inner.bump_revision();
    }

    pub fn set_search_query(&self, query: impl Into<String>) {
        let mut state = self.inner.state.lock();
        state.chat.set_search_query(query);
        self.inner.bump_revision();
    }

    fn schedule_reply(&self, state: &mut StoreState, chatroom_id: &str, prompt: String) {
        let reply_id = state.next_reply_id;
        state.next_reply_id = state.next_reply_id.wrapping_add(1);

        let delay = self.inner.policy.sample_delay();
        let deadline = tokio::time::Instant::now() + delay;
        let inner: Weak<Inner> = Arc::downgrade(&self.inner);
        let task = self.inner.runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if let Some(inner) = inner.upgrade() {
                inner.complete_reply(reply_id, &prompt);
            }
        });

        state.pending.insert(
            reply_id,
            PendingReply {
                chatroom_id: chatroom_id.to_owned(),
                abort: task.abort_handle(),
            },
        );
        state.chat.set_typing(true);

        tracing::debug!(
            chatroom_id,
            reply_id,
            delay_ms = delay.as_millis() as u64,
            "assistant reply scheduled"
        );
    }
}

impl LogoutHook for ChatStore {
    fn on_logout(&self) {
        let mut state = self.inner.state.lock();
        let cancelled = state.cancel_replies(|_| true);
        state.chat.clear();

        self.inner.writer.remove(Slot::Chat);
        self.inner.bump_revision();
        tracing::info!(cancelled, "chat state cleared on logout");
    }
}
