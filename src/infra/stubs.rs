use std::{collections::HashMap, sync::Arc};

use anyhow::{anyhow, Result};
use parking_lot::Mutex;

use crate::infra::contracts::{Clipboard, StateStorage};

/// In-memory slot storage. Clones share the same slots.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: Arc<Mutex<HashMap<String, String>>>,
    failing: bool,
}

impl MemoryStorage {
    /// Storage whose every operation errors.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.slots.lock().get(key).cloned()
    }

    pub fn insert(&self, key: &str, value: &str) {
        self.slots.lock().insert(key.to_owned(), value.to_owned());
    }

    fn check(&self) -> Result<()> {
        if self.failing {
            return Err(anyhow!("storage unavailable"));
        }
        Ok(())
    }
}

impl StateStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        self.check()?;
        Ok(self.get(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.check()?;
        self.insert(key, value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        self.check()?;
        Ok(self.slots.lock().remove(key).is_some())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingClipboard {
    copied: Arc<Mutex<Vec<String>>>,
}

impl RecordingClipboard {
    pub fn copied(&self) -> Vec<String> {
        self.copied.lock().clone()
    }
}

impl Clipboard for RecordingClipboard {
    fn copy_text(&self, text: &str) -> bool {
        self.copied.lock().push(text.to_owned());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_clones_share_slots() {
        let storage = MemoryStorage::default();
        let other = storage.clone();

        storage.write("chat-storage", "{}").expect("write must succeed");

        assert_eq!(
            other.read("chat-storage").expect("read must succeed").as_deref(),
            Some("{}")
        );
        assert!(other.remove("chat-storage").expect("remove must succeed"));
        assert!(!storage.remove("chat-storage").expect("remove must succeed"));
    }

    #[test]
    fn failing_storage_errors_everywhere() {
        let storage = MemoryStorage::failing();

        assert!(storage.read("k").is_err());
        assert!(storage.write("k", "v").is_err());
        assert!(storage.remove("k").is_err());
    }
}
