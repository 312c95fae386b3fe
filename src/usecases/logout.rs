use crate::{domain::session::AuthStatus, usecases::context::AppContext};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutOutcome {
    pub was_authenticated: bool,
}

/// Signs out, wipes chat state through the logout hooks and waits for the
/// writes to land so the next start is anonymous.
pub fn logout_and_reset(context: &AppContext) -> LogoutOutcome {
    let was_authenticated = context.auth.status() == AuthStatus::Authenticated;

    context.auth.logout();
    context.flush();

    LogoutOutcome { was_authenticated }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        domain::user::User,
        infra::{config::AppConfig, persistence::Slot, storage_layout::StorageLayout},
        test_support::NoopSink,
        usecases::bootstrap,
    };

    fn context_in(dir: &std::path::Path) -> AppContext {
        let mut config = AppConfig::default();
        config.storage.data_dir = Some(dir.join("state"));
        let layout = StorageLayout::resolve(&config.storage).expect("layout should resolve");

        bootstrap::build_context(config, layout, Arc::new(NoopSink)).expect("context should build")
    }

    #[test]
    fn logout_removes_chat_slot_and_keeps_theme() {
        let dir = tempfile::tempdir().expect("tempdir must be created");

        {
            let context = context_in(dir.path());
            context.auth.login(User::new("5551234567", "+1"));
            context
                .chat
                .create_chatroom("Doomed")
                .expect("room must be created");
            context.theme.set_theme(true);
            context.flush();

            let outcome = logout_and_reset(&context);

            assert!(outcome.was_authenticated);
            assert!(!context.layout.slot_file(Slot::Chat.key()).exists());
            assert!(context.layout.slot_file(Slot::Theme.key()).exists());
        }

        let context = context_in(dir.path());
        assert_eq!(context.auth.initialize_auth(), AuthStatus::Anonymous);
        assert!(context.chat.chatrooms().is_empty());
        assert!(context.theme.is_dark());
    }

    #[test]
    fn logout_is_idempotent_when_signed_out() {
        let dir = tempfile::tempdir().expect("tempdir must be created");
        let context = context_in(dir.path());

        let outcome = logout_and_reset(&context);

        assert!(!outcome.was_authenticated);
        assert_eq!(context.auth.status(), AuthStatus::Anonymous);
    }
}
