use std::{
    fs::{File, OpenOptions},
    path::PathBuf,
};

use fs2::FileExt;

use crate::{
    domain::session::AuthStatus,
    infra::{error::AppError, storage_layout::StorageLayout},
    usecases::auth_store::AuthStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupFlowState {
    LaunchShell,
    GuidedAuth,
}

/// Exclusive hold on the state directory for the life of the process.
#[derive(Debug)]
pub struct InstanceLock {
    file: File,
    path: PathBuf,
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        if let Err(error) = FileExt::unlock(&self.file) {
            tracing::debug!(path = %self.path.display(), error = %error, "failed to release instance lock");
        }
    }
}

pub fn acquire_instance_lock(layout: &StorageLayout) -> Result<InstanceLock, AppError> {
    let path = layout.lock_file();
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&path)
        .map_err(|source| AppError::StateDirLock {
            path: path.clone(),
            source,
        })?;

    match file.try_lock_exclusive() {
        Ok(()) => Ok(InstanceLock { file, path }),
        Err(source) if source.kind() == fs2::lock_contended_error().kind() => {
            Err(AppError::StateDirBusy { path })
        }
        Err(source) => Err(AppError::StateDirLock { path, source }),
    }
}

/// Restores the session and decides whether sign-in is needed first.
pub fn plan_startup(auth: &AuthStore) -> StartupFlowState {
    match auth.initialize_auth() {
        AuthStatus::Authenticated => StartupFlowState::LaunchShell,
        AuthStatus::Anonymous => StartupFlowState::GuidedAuth,
    }
}
