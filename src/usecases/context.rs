use std::sync::Arc;

use tokio::runtime::Runtime;

use crate::{
    infra::{config::AppConfig, persistence::PersistenceWriter, storage_layout::StorageLayout},
    usecases::{
        auth_store::AuthStore, chat_store::ChatStore, startup::InstanceLock,
        theme_store::ThemeStore,
    },
};

/// Everything the entry points need, wired once by [`bootstrap`].
///
/// [`bootstrap`]: crate::usecases::bootstrap::bootstrap
#[derive(Debug)]
pub struct AppContext {
    pub config: AppConfig,
    pub layout: StorageLayout,
    pub writer: PersistenceWriter,
    pub auth: Arc<AuthStore>,
    pub chat: ChatStore,
    pub theme: ThemeStore,
    // Field order matters: stores drop before the runtime that runs their
    // replies, and the lock goes last.
    pub runtime: Runtime,
    pub instance_lock: InstanceLock,
}

impl AppContext {
    /// Blocks until every queued state write has reached storage.
    pub fn flush(&self) {
        self.writer.flush();
    }
}
