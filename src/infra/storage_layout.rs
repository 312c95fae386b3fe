use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::infra::{config::StorageConfig, error::AppError};

const APP_DIR_NAME: &str = "rchat";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    pub state_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl StorageLayout {
    pub fn resolve(config: &StorageConfig) -> Result<Self, AppError> {
        let state_dir = match &config.data_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_dir()
                .map(|base| base.join(APP_DIR_NAME))
                .ok_or_else(|| AppError::StoragePathResolution {
                    details: "unable to resolve data directory (XDG_DATA_HOME/HOME)".into(),
                })?,
        };

        Ok(Self::at(&state_dir))
    }

    pub fn at(state_dir: &Path) -> Self {
        Self {
            state_dir: state_dir.to_path_buf(),
            log_dir: state_dir.join("logs"),
        }
    }

    pub fn ensure_dirs(&self) -> Result<(), AppError> {
        for dir in [&self.state_dir, &self.log_dir] {
            fs::create_dir_all(dir).map_err(|source| AppError::StorageDirCreate {
                path: dir.clone(),
                source,
            })?;
        }

        Ok(())
    }

    /// File backing a named persistence slot.
    pub fn slot_file(&self, key: &str) -> PathBuf {
        self.state_dir.join(format!("{key}.json"))
    }

    pub fn lock_file(&self) -> PathBuf {
        self.state_dir.join("rchat.lock")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_data_dir_wins() {
        let config = StorageConfig {
            data_dir: Some(PathBuf::from("/tmp/rchat-custom")),
        };

        let layout = StorageLayout::resolve(&config).expect("layout should resolve");

        assert_eq!(layout.state_dir, PathBuf::from("/tmp/rchat-custom"));
        assert!(layout.log_dir.starts_with(&layout.state_dir));
    }

    #[test]
    fn slot_files_live_in_state_dir() {
        let layout = StorageLayout::at(Path::new("/var/lib/rchat"));

        assert_eq!(
            layout.slot_file("chat-storage"),
            PathBuf::from("/var/lib/rchat/chat-storage.json")
        );
        assert!(layout.lock_file().starts_with(&layout.state_dir));
    }

    #[test]
    fn ensure_dirs_creates_state_and_log_dirs() {
        let root = tempfile::tempdir().expect("temp dir");
        let layout = StorageLayout::at(&root.path().join("nested"));

        layout.ensure_dirs().expect("dirs should be created");

        assert!(layout.state_dir.is_dir());
        assert!(layout.log_dir.is_dir());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn falls_back_to_xdg_data_home() {
        use std::env;

        use crate::test_support::env_lock;

        let _guard = env_lock();
        let root = tempfile::tempdir().expect("temp dir");
        let old_data_home = env::var_os("XDG_DATA_HOME");
        // SAFETY: env is guarded by process-wide test mutex.
        unsafe { env::set_var("XDG_DATA_HOME", root.path()) };

        let layout = StorageLayout::resolve(&StorageConfig::default());

        match old_data_home {
            Some(value) => {
                // SAFETY: restoring env while guard is held.
                unsafe { env::set_var("XDG_DATA_HOME", value) }
            }
            None => {
                // SAFETY: restoring env while guard is held.
                unsafe { env::remove_var("XDG_DATA_HOME") }
            }
        }

        let layout = layout.expect("layout should resolve");
        assert_eq!(layout.state_dir, root.path().join(APP_DIR_NAME));
    }
}
