use std::{path::Path, sync::Arc};

use tracing_appender::non_blocking::WorkerGuard;

use crate::{
    infra::{
        self,
        config::AppConfig,
        contracts::StateStorage,
        error::AppError,
        json_storage::JsonFileStorage,
        persistence::PersistenceWriter,
        storage_layout::StorageLayout,
    },
    usecases::{
        auth_store::AuthStore,
        chat_store::{ChatStore, ReplyPolicy},
        context::AppContext,
        contracts::PresentationSink,
        responder::CannedResponder,
        startup,
        theme_store::ThemeStore,
    },
};

const REPLY_THREAD_NAME: &str = "rchat-replies";

/// Loads config, starts logging and wires the stores. The guard must be held
/// until the process exits.
pub fn bootstrap(
    config_path: Option<&Path>,
    sink: Arc<dyn PresentationSink>,
) -> Result<(AppContext, WorkerGuard), AppError> {
    let config = infra::config::load(config_path)?;
    let layout = StorageLayout::resolve(&config.storage)?;
    layout.ensure_dirs()?;

    let guard = infra::logging::init(&config.logging, &layout.log_dir)?;
    let context = build_context(config, layout, sink)?;
    tracing::info!(state_dir = %context.layout.state_dir.display(), "rchat started");

    Ok((context, guard))
}

pub(crate) fn build_context(
    config: AppConfig,
    layout: StorageLayout,
    sink: Arc<dyn PresentationSink>,
) -> Result<AppContext, AppError> {
    layout.ensure_dirs()?;
    let instance_lock = startup::acquire_instance_lock(&layout)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name(REPLY_THREAD_NAME)
        .enable_time()
        .build()
        .map_err(AppError::RuntimeInit)?;

    let storage: Arc<dyn StateStorage> = Arc::new(JsonFileStorage::new(layout.clone()));
    let writer = PersistenceWriter::spawn(Arc::clone(&storage));

    let auth = Arc::new(AuthStore::rehydrate(storage.as_ref(), writer.clone()));
    let chat = ChatStore::rehydrate(
        storage.as_ref(),
        writer.clone(),
        Arc::new(CannedResponder),
        ReplyPolicy::from_config(&config.assistant),
        runtime.handle().clone(),
    );
    auth.register_logout_hook(Arc::new(chat.clone()));
    let theme = ThemeStore::rehydrate(storage.as_ref(), writer.clone(), sink, config.ui.prefer_dark);

    Ok(AppContext {
        config,
        layout,
        writer,
        auth,
        chat,
        theme,
        runtime,
        instance_lock,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::{domain::session::AuthStatus, domain::user::User};

    #[derive(Default)]
    struct FlagSink(AtomicBool);

    impl PresentationSink for FlagSink {
        fn apply_dark_mode(&self, dark: bool) {
            self.0.store(dark, Ordering::SeqCst);
        }
    }

    fn config_for(dir: &Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.storage.data_dir = Some(dir.to_path_buf());
        config
    }

    fn context_in(dir: &Path, sink: Arc<FlagSink>) -> Result<AppContext, AppError> {
        let config = config_for(dir);
        let layout = StorageLayout::resolve(&config.storage)?;
        build_context(config, layout, sink)
    }

    #[test]
    fn fresh_directory_yields_default_stores() {
        let dir = tempfile::tempdir().expect("tempdir must be created");
        let sink = Arc::new(FlagSink::default());

        let context = context_in(dir.path(), sink.clone()).expect("context should build");

        assert_eq!(context.auth.status(), AuthStatus::Anonymous);
        assert!(context.chat.chatrooms().is_empty());
        assert!(!context.theme.is_dark());
        assert!(!sink.0.load(Ordering::SeqCst));
    }

    #[test]
    fn second_context_on_the_same_directory_is_refused() {
        let dir = tempfile::tempdir().expect("tempdir must be created");
        let _first = context_in(dir.path(), Arc::default()).expect("context should build");

        let second = context_in(dir.path(), Arc::default());

        assert!(matches!(second, Err(AppError::StateDirBusy { .. })));
    }

    #[test]
    fn state_written_by_one_run_is_seen_by_the_next() {
        let dir = tempfile::tempdir().expect("tempdir must be created");

        {
            let context = context_in(dir.path(), Arc::default()).expect("context should build");
            context.auth.login(User::new("5551234567", "+1"));
            context
                .chat
                .create_chatroom("Persisted")
                .expect("room must be created");
            context.theme.set_theme(true);
            context.flush();
        }

        let sink = Arc::new(FlagSink::default());
        let context = context_in(dir.path(), sink.clone()).expect("context should build");

        assert_eq!(context.auth.initialize_auth(), AuthStatus::Authenticated);
        assert_eq!(context.chat.chatrooms()[0].title, "Persisted");
        assert!(context.theme.is_dark());
        assert!(sink.0.load(Ordering::SeqCst));
    }
}
