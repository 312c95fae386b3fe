use std::{fmt, sync::Arc};

use parking_lot::Mutex;

use crate::{
    domain::{
        session::{AuthSnapshot, AuthState, AuthStatus},
        user::User,
    },
    infra::{
        contracts::StateStorage,
        persistence::{self, PersistenceWriter, Slot},
        secrets::mask_phone,
    },
    usecases::contracts::LogoutHook,
};

/// The signed-in session. Logout wipes dependent state through the
/// registered [`LogoutHook`]s.
pub struct AuthStore {
    state: Mutex<AuthState>,
    writer: PersistenceWriter,
    hooks: Mutex<Vec<Arc<dyn LogoutHook>>>,
}

impl fmt::Debug for AuthStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthStore")
            .field("status", &self.status())
            .field("hooks", &self.hooks.lock().len())
            .finish_non_exhaustive()
    }
}

impl AuthStore {
    pub fn rehydrate(storage: &dyn StateStorage, writer: PersistenceWriter) -> Self {
        let snapshot =
            persistence::rehydrate::<AuthSnapshot>(storage, Slot::Auth).unwrap_or_default();

        Self {
            state: Mutex::new(AuthState::from_snapshot(snapshot)),
            writer,
            hooks: Mutex::new(Vec::new()),
        }
    }

    pub fn register_logout_hook(&self, hook: Arc<dyn LogoutHook>) {
        self.hooks.lock().push(hook);
    }

    pub fn user(&self) -> Option<User> {
        self.state.lock().user().cloned()
    }

    pub fn status(&self) -> AuthStatus {
        self.state.lock().status()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().is_loading()
    }

    pub fn login(&self, user: User) {
        let mut state = self.state.lock();
        tracing::info!(
            user_id = %user.id,
            phone = %mask_phone(&user.phone),
            "user signed in"
        );
        state.login(user);
        self.writer.save(Slot::Auth, &state.snapshot());
    }

    /// Clears the session, then runs every logout hook outside the lock.
    pub fn logout(&self) {
        {
            let mut state = self.state.lock();
            state.logout();
            self.writer.save(Slot::Auth, &state.snapshot());
        }

        let hooks = self.hooks.lock().clone();
        for hook in &hooks {
            hook.on_logout();
        }

        tracing::info!(hooks = hooks.len(), "user signed out");
    }

    pub fn set_loading(&self, loading: bool) {
        self.state.lock().set_loading(loading);
    }

    /// Trusts a restored user without re-checking credentials.
    pub fn initialize_auth(&self) -> AuthStatus {
        let mut state = self.state.lock();
        let was = state.status();
        state.initialize();
        let status = state.status();

        if status != was {
            self.writer.save(Slot::Auth, &state.snapshot());
        }
        tracing::debug!(status = status.as_label(), "session initialized");

        status
    }
}
