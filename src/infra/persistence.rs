//! Write-through persistence of store projections.
//!
//! Stores hand serialized snapshots to a [`PersistenceWriter`], which applies
//! them on a dedicated thread so a mutation never waits on disk I/O. Blobs use
//! the `{"state": ..., "version": 0}` envelope.

use std::{
    sync::{mpsc, Arc},
    thread,
};

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::infra::contracts::StateStorage;

const SNAPSHOT_VERSION: u32 = 0;
const WRITER_THREAD_NAME: &str = "rchat-persistence";

const PERSIST_WRITE_FAILED: &str = "PERSIST_WRITE_FAILED";
const PERSIST_REMOVE_FAILED: &str = "PERSIST_REMOVE_FAILED";
const PERSIST_ENCODE_FAILED: &str = "PERSIST_ENCODE_FAILED";
const PERSIST_WRITER_GONE: &str = "PERSIST_WRITER_GONE";
const REHYDRATE_READ_FAILED: &str = "REHYDRATE_READ_FAILED";
const REHYDRATE_DECODE_FAILED: &str = "REHYDRATE_DECODE_FAILED";

/// Independent storage slot per store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Auth,
    Chat,
    Theme,
}

impl Slot {
    pub fn key(self) -> &'static str {
        match self {
            Self::Auth => "auth-storage",
            Self::Chat => "chat-storage",
            Self::Theme => "theme-storage",
        }
    }
}

#[derive(Debug, Serialize)]
struct EnvelopeRef<'a, T> {
    state: &'a T,
    version: u32,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    state: T,
    #[serde(default)]
    version: u32,
}

enum WriteOp {
    Save { slot: Slot, payload: String },
    Remove { slot: Slot },
    Flush(mpsc::Sender<()>),
}

/// Handle onto the background writer. Cheap to clone; the writer thread exits
/// once every handle is dropped.
#[derive(Debug, Clone)]
pub struct PersistenceWriter {
    tx: mpsc::Sender<WriteOp>,
}

impl std::fmt::Debug for WriteOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Save { slot, payload } => f
                .debug_struct("Save")
                .field("slot", slot)
                .field("bytes", &payload.len())
                .finish(),
            Self::Remove { slot } => f.debug_struct("Remove").field("slot", slot).finish(),
            Self::Flush(_) => f.write_str("Flush"),
        }
    }
}

impl PersistenceWriter {
    pub fn spawn(storage: Arc<dyn StateStorage>) -> Self {
        let (tx, rx) = mpsc::channel();

        let spawned = thread::Builder::new()
            .name(WRITER_THREAD_NAME.to_owned())
            .spawn(move || run_writer(storage.as_ref(), rx));

        if let Err(error) = spawned {
            // The receiver was moved into the failed closure and dropped, so
            // every later send reports PERSIST_WRITER_GONE.
            tracing::error!(
                code = PERSIST_WRITER_GONE,
                error = %error,
                "failed to start persistence writer; state will not be saved"
            );
        }

        Self { tx }
    }

    /// Serializes `state` into the slot envelope and queues the write.
    pub fn save<T: Serialize>(&self, slot: Slot, state: &T) {
        let envelope = EnvelopeRef {
            state,
            version: SNAPSHOT_VERSION,
        };

        match serde_json::to_string(&envelope) {
            Ok(payload) => self.send(WriteOp::Save { slot, payload }),
            Err(error) => tracing::warn!(
                code = PERSIST_ENCODE_FAILED,
                slot = slot.key(),
                error = %error,
                "failed to encode state snapshot"
            ),
        }
    }

    pub fn remove(&self, slot: Slot) {
        self.send(WriteOp::Remove { slot });
    }

    /// Blocks until every previously queued operation has been applied.
    pub fn flush(&self) {
        let (done_tx, done_rx) = mpsc::channel();
        self.send(WriteOp::Flush(done_tx));
        let _ = done_rx.recv();
    }

    fn send(&self, op: WriteOp) {
        if let Err(error) = self.tx.send(op) {
            tracing::warn!(
                code = PERSIST_WRITER_GONE,
                op = ?error.0,
                "persistence writer is not running; dropping operation"
            );
        }
    }
}

fn run_writer(storage: &dyn StateStorage, rx: mpsc::Receiver<WriteOp>) {
    while let Ok(op) = rx.recv() {
        match op {
            WriteOp::Save { slot, payload } => {
                if let Err(error) = storage.write(slot.key(), &payload) {
                    tracing::warn!(
                        code = PERSIST_WRITE_FAILED,
                        slot = slot.key(),
                        error = ?error,
                        "failed to persist state snapshot"
                    );
                }
            }
            WriteOp::Remove { slot } => match storage.remove(slot.key()) {
                Ok(existed) => {
                    tracing::debug!(slot = slot.key(), existed, "persisted slot removed");
                }
                Err(error) => {
                    tracing::warn!(
                        code = PERSIST_REMOVE_FAILED,
                        slot = slot.key(),
                        error = ?error,
                        "failed to remove persisted slot"
                    );
                }
            },
            WriteOp::Flush(done) => {
                let _ = done.send(());
            }
        }
    }

    tracing::debug!("persistence writer stopped");
}

/// Loads a slot's state. Missing, unreadable and undecodable slots all yield
/// `None`; the caller falls back to its default state.
pub fn rehydrate<T: DeserializeOwned>(storage: &dyn StateStorage, slot: Slot) -> Option<T> {
    let raw = match storage.read(slot.key()) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!(slot = slot.key(), "no persisted state; using defaults");
            return None;
        }
        Err(error) => {
            tracing::warn!(
                code = REHYDRATE_READ_FAILED,
                slot = slot.key(),
                error = ?error,
                "failed to read persisted state; using defaults"
            );
            return None;
        }
    };

    match serde_json::from_str::<Envelope<T>>(&raw) {
        Ok(envelope) => {
            tracing::debug!(
                slot = slot.key(),
                version = envelope.version,
                "persisted state restored"
            );
            Some(envelope.state)
        }
        Err(error) => {
            tracing::warn!(
                code = REHYDRATE_DECODE_FAILED,
                slot = slot.key(),
                error = %error,
                "persisted state is corrupt; using defaults"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::stubs::MemoryStorage;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Sample {
        is_dark: bool,
    }

    #[test]
    fn save_wraps_state_in_versioned_envelope() {
        let storage = MemoryStorage::default();
        let writer = PersistenceWriter::spawn(Arc::new(storage.clone()));

        writer.save(Slot::Theme, &Sample { is_dark: true });
        writer.flush();

        assert_eq!(
            storage.get("theme-storage").as_deref(),
            Some(r#"{"state":{"isDark":true},"version":0}"#)
        );
    }

    #[test]
    fn operations_apply_in_order() {
        let storage = MemoryStorage::default();
        let writer = PersistenceWriter::spawn(Arc::new(storage.clone()));

        writer.save(Slot::Chat, &Sample { is_dark: false });
        writer.remove(Slot::Chat);
        writer.save(Slot::Auth, &Sample { is_dark: true });
        writer.flush();

        assert_eq!(storage.get("chat-storage"), None);
        assert!(storage.get("auth-storage").is_some());
    }

    #[test]
    fn rehydrate_round_trips_saved_state() {
        let storage = MemoryStorage::default();
        let writer = PersistenceWriter::spawn(Arc::new(storage.clone()));
        writer.save(Slot::Theme, &Sample { is_dark: true });
        writer.flush();

        let restored: Option<Sample> = rehydrate(&storage, Slot::Theme);

        assert_eq!(restored, Some(Sample { is_dark: true }));
    }

    #[test]
    fn rehydrate_treats_missing_and_corrupt_slots_as_absent() {
        let storage = MemoryStorage::default();
        storage.insert("theme-storage", "{not json");

        assert_eq!(rehydrate::<Sample>(&storage, Slot::Auth), None);
        assert_eq!(rehydrate::<Sample>(&storage, Slot::Theme), None);
    }

    #[test]
    fn rehydrate_tolerates_missing_version() {
        let storage = MemoryStorage::default();
        storage.insert("theme-storage", r#"{"state":{"isDark":false}}"#);

        assert_eq!(
            rehydrate::<Sample>(&storage, Slot::Theme),
            Some(Sample { is_dark: false })
        );
    }

    #[test]
    fn failing_storage_is_logged_not_propagated() {
        let storage = MemoryStorage::failing();
        let writer = PersistenceWriter::spawn(Arc::new(storage.clone()));

        writer.save(Slot::Chat, &Sample { is_dark: true });
        writer.flush();

        assert_eq!(rehydrate::<Sample>(&storage, Slot::Chat), None);
    }
}
