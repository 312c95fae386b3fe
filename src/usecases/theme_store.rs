use std::{fmt, sync::Arc};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::{
    infra::{
        contracts::StateStorage,
        persistence::{self, PersistenceWriter, Slot},
    },
    usecases::contracts::PresentationSink,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSnapshot {
    #[serde(default)]
    pub is_dark: bool,
}

/// Dark-mode flag mirrored into a presentation sink on every change.
pub struct ThemeStore {
    is_dark: Mutex<bool>,
    writer: PersistenceWriter,
    sink: Arc<dyn PresentationSink>,
}

impl fmt::Debug for ThemeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeStore")
            .field("is_dark", &self.is_dark())
            .finish_non_exhaustive()
    }
}

impl ThemeStore {
    /// Restores the saved flag, or `prefer_dark` when none was saved, and
    /// applies it to the sink right away.
    pub fn rehydrate(
        storage: &dyn StateStorage,
        writer: PersistenceWriter,
        sink: Arc<dyn PresentationSink>,
        prefer_dark: bool,
    ) -> Self {
        let is_dark = persistence::rehydrate::<ThemeSnapshot>(storage, Slot::Theme)
            .map_or(prefer_dark, |snapshot| snapshot.is_dark);
        sink.apply_dark_mode(is_dark);

        Self {
            is_dark: Mutex::new(is_dark),
            writer,
            sink,
        }
    }

    pub fn is_dark(&self) -> bool {
        *self.is_dark.lock()
    }

    pub fn set_theme(&self, is_dark: bool) {
        let mut current = self.is_dark.lock();
        *current = is_dark;
        self.commit(is_dark);
    }

    /// Flips the flag and returns the new value.
    pub fn toggle_theme(&self) -> bool {
        let mut current = self.is_dark.lock();
        *current = !*current;
        let is_dark = *current;
        self.commit(is_dark);
        is_dark
    }

    fn commit(&self, is_dark: bool) {
        self.writer.save(Slot::Theme, &ThemeSnapshot { is_dark });
        self.sink.apply_dark_mode(is_dark);
        tracing::debug!(is_dark, "theme changed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::stubs::MemoryStorage;

    #[derive(Default)]
    struct RecordingSink {
        applied: Mutex<Vec<bool>>,
    }

    impl PresentationSink for RecordingSink {
        fn apply_dark_mode(&self, dark: bool) {
            self.applied.lock().push(dark);
        }
    }

    fn theme_on(
        storage: &MemoryStorage,
        prefer_dark: bool,
    ) -> (ThemeStore, Arc<RecordingSink>, PersistenceWriter) {
        let writer = PersistenceWriter::spawn(Arc::new(storage.clone()));
        let sink = Arc::new(RecordingSink::default());
        let store = ThemeStore::rehydrate(storage, writer.clone(), sink.clone(), prefer_dark);
        (store, sink, writer)
    }

    #[test]
    fn unsaved_theme_follows_preference_and_reaches_the_sink() {
        let (store, sink, _writer) = theme_on(&MemoryStorage::default(), true);

        assert!(store.is_dark());
        assert_eq!(*sink.applied.lock(), vec![true]);
    }

    #[test]
    fn toggle_flips_persists_and_notifies() {
        let storage = MemoryStorage::default();
        let (store, sink, writer) = theme_on(&storage, false);

        assert!(store.toggle_theme());
        assert!(!store.toggle_theme());
        store.set_theme(true);
        writer.flush();

        assert_eq!(*sink.applied.lock(), vec![false, true, false, true]);
        assert_eq!(
            storage.get("theme-storage").as_deref(),
            Some(r#"{"state":{"isDark":true},"version":0}"#)
        );
    }

    #[test]
    fn saved_theme_wins_over_preference() {
        let storage = MemoryStorage::default();
        storage.insert("theme-storage", r#"{"state":{"isDark":false},"version":0}"#);

        let (store, sink, _writer) = theme_on(&storage, true);

        assert!(!store.is_dark());
        assert_eq!(*sink.applied.lock(), vec![false]);
    }

    #[test]
    fn corrupt_theme_falls_back_to_preference() {
        let storage = MemoryStorage::default();
        storage.insert("theme-storage", "dark please");

        let (store, _sink, _writer) = theme_on(&storage, false);

        assert!(!store.is_dark());
    }
}
