use std::{fs, io::ErrorKind};

use anyhow::Result;

use crate::infra::{contracts::StateStorage, error::AppError, storage_layout::StorageLayout};

/// Stores each slot as `<state_dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    layout: StorageLayout,
}

impl JsonFileStorage {
    pub fn new(layout: StorageLayout) -> Self {
        Self { layout }
    }
}

impl StateStorage for JsonFileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.layout.slot_file(key);
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(source) if source.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(AppError::StorageRead { path, source }.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.layout.slot_file(key);
        let tmp_path = path.with_extension("json.tmp");

        fs::write(&tmp_path, value).map_err(|source| AppError::StorageWrite {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &path)
            .map_err(|source| AppError::StorageWrite { path, source })?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let path = self.layout.slot_file(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(source) if source.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(AppError::StorageRemove { path, source }.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> (tempfile::TempDir, JsonFileStorage) {
        let dir = tempfile::tempdir().expect("temp dir");
        let layout = StorageLayout::at(dir.path());
        layout.ensure_dirs().expect("dirs");
        (dir, JsonFileStorage::new(layout))
    }

    #[test]
    fn missing_slot_reads_as_none() {
        let (_dir, storage) = storage();

        assert_eq!(storage.read("chat-storage").expect("read"), None);
    }

    #[test]
    fn written_slot_reads_back_and_leaves_no_temp_file() {
        let (dir, storage) = storage();

        storage.write("theme-storage", r#"{"state":{"isDark":true},"version":0}"#).expect("write");

        assert_eq!(
            storage.read("theme-storage").expect("read").as_deref(),
            Some(r#"{"state":{"isDark":true},"version":0}"#)
        );
        assert!(!dir.path().join("theme-storage.json.tmp").exists());
    }

    #[test]
    fn remove_reports_whether_slot_existed() {
        let (_dir, storage) = storage();
        storage.write("auth-storage", "{}").expect("write");

        assert!(storage.remove("auth-storage").expect("remove"));
        assert!(!storage.remove("auth-storage").expect("second remove"));
        assert_eq!(storage.read("auth-storage").expect("read"), None);
    }
}
