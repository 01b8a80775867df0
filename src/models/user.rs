//! User model and the per-request caller identity
//!
//! Authentication itself happens elsewhere; the core only ever sees a
//! `Caller`, which is either anonymous or carries an authenticated user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::UserId;
use crate::error::{PiggyError, PiggyResult};

/// A person who can belong to households
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,

    /// Unique login name
    pub username: String,

    #[serde(default)]
    pub email: String,

    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            username: username.into(),
            email: email.into(),
            created_at: Utc::now(),
        }
    }

    /// The identity this user carries once authenticated
    pub fn as_auth(&self) -> AuthUser {
        AuthUser {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.username)
    }
}

/// An authenticated user identity, as produced by the auth layer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AuthUser {
    pub id: UserId,
    pub username: String,
}

/// Who is making a request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Caller {
    #[default]
    Anonymous,
    Authenticated(AuthUser),
}

impl Caller {
    pub fn user(user: &User) -> Self {
        Self::Authenticated(user.as_auth())
    }

    /// The authenticated user, or `Unauthenticated` for anonymous callers
    pub fn require(&self) -> PiggyResult<&AuthUser> {
        match self {
            Self::Authenticated(user) => Ok(user),
            Self::Anonymous => Err(PiggyError::Unauthenticated),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }
}

impl From<AuthUser> for Caller {
    fn from(user: AuthUser) -> Self {
        Self::Authenticated(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_caller_is_rejected() {
        let caller = Caller::Anonymous;
        assert!(caller.is_anonymous());
        assert!(matches!(caller.require(), Err(PiggyError::Unauthenticated)));
    }

    #[test]
    fn test_authenticated_caller() {
        let user = User::new("alice", "alice@example.com");
        let caller = Caller::user(&user);

        let auth = caller.require().unwrap();
        assert_eq!(auth.id, user.id);
        assert_eq!(auth.username, "alice");
    }
}
