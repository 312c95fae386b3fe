use std::sync::{Arc, Mutex, MutexGuard};

use tokio::runtime::Handle;

use crate::{
    infra::{persistence::PersistenceWriter, stubs::MemoryStorage},
    usecases::{
        auth_store::AuthStore,
        chat_store::{ChatStore, ReplyPolicy},
        contracts::PresentationSink,
        responder::CannedResponder,
        theme_store::ThemeStore,
    },
};

static ENV_LOCK: Mutex<()> = Mutex::new(());

pub fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().expect("env lock should not be poisoned")
}

pub struct NoopSink;

impl PresentationSink for NoopSink {
    fn apply_dark_mode(&self, _dark: bool) {}
}

/// Stores wired the way bootstrap wires them, over in-memory storage.
pub struct TestStores {
    pub storage: MemoryStorage,
    pub writer: PersistenceWriter,
    pub chat: ChatStore,
    pub auth: AuthStore,
    pub theme: ThemeStore,
}

/// Must be called inside a tokio runtime.
pub fn memory_stores() -> TestStores {
    let storage = MemoryStorage::default();
    let writer = PersistenceWriter::spawn(Arc::new(storage.clone()));
    let chat = ChatStore::rehydrate(
        &storage,
        writer.clone(),
        Arc::new(CannedResponder),
        ReplyPolicy::default(),
        Handle::current(),
    );
    let auth = AuthStore::rehydrate(&storage, writer.clone());
    auth.register_logout_hook(Arc::new(chat.clone()));
    let theme = ThemeStore::rehydrate(&storage, writer.clone(), Arc::new(NoopSink), false);

    TestStores {
        storage,
        writer,
        chat,
        auth,
        theme,
    }
}
