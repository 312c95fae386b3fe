use serde::{Deserialize, Serialize};

use super::user::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Anonymous,
    Authenticated,
}

impl AuthStatus {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Anonymous => "AUTH_ANONYMOUS",
            Self::Authenticated => "AUTH_AUTHENTICATED",
        }
    }
}

/// The persisted projection of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSnapshot {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub is_authenticated: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    user: Option<User>,
    is_authenticated: bool,
    is_loading: bool,
}

impl AuthState {
    /// Restores the stored session as saved. A signed-in flag without a user
    /// is dropped; [`initialize`](Self::initialize) then signs in any stored user.
    pub fn from_snapshot(snapshot: AuthSnapshot) -> Self {
        Self {
            is_authenticated: snapshot.is_authenticated && snapshot.user.is_some(),
            user: snapshot.user,
            is_loading: false,
        }
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        AuthSnapshot {
            user: self.user.clone(),
            is_authenticated: self.is_authenticated,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn status(&self) -> AuthStatus {
        if self.is_authenticated {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Anonymous
        }
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Signs in, replacing any current user.
    pub fn login(&mut self, user: User) {
        self.user = Some(user);
        self.is_authenticated = true;
        self.is_loading = false;
    }

    pub fn logout(&mut self) {
        self.user = None;
        self.is_authenticated = false;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    /// Marks a restored user as signed in without re-checking credentials.
    /// Returns whether the session is authenticated afterwards.
    pub fn initialize(&mut self) -> bool {
        if self.user.is_some() {
            self.is_authenticated = true;
        }
        self.is_authenticated
    }
}
