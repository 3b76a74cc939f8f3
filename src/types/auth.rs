//! Authentication context
//!
//! Explicit session-scoped auth state. Constructed at application start,
//! torn down on logout; there are no ambient auth globals.

use serde::{Deserialize, Serialize};

/// Identity of an authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Display name shown in the UI
    pub name: String,
    /// Email address, also the key under which history is stored
    pub email: String,
}

impl UserIdentity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Current authentication state: an identity, or guest mode
#[derive(Debug, Clone, Default)]
pub struct AuthSession {
    identity: Option<UserIdentity>,
}

impl AuthSession {
    /// Unauthenticated guest session
    pub fn guest() -> Self {
        Self { identity: None }
    }

    /// Session authenticated as the given identity
    pub fn authenticated(identity: UserIdentity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    pub fn identity(&self) -> Option<&UserIdentity> {
        self.identity.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Drop the identity, returning the session to guest mode
    pub fn logout(&mut self) {
        if let Some(identity) = self.identity.take() {
            tracing::info!("logged out {}", identity.email);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_is_not_authenticated() {
        let auth = AuthSession::guest();
        assert!(!auth.is_authenticated());
        assert!(auth.identity().is_none());
    }

    #[test]
    fn test_logout_clears_identity() {
        let mut auth = AuthSession::authenticated(UserIdentity::new("Asha", "asha@example.com"));
        assert!(auth.is_authenticated());

        auth.logout();
        assert!(!auth.is_authenticated());
        assert!(auth.identity().is_none());
    }
}
