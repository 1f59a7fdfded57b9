//! Requester identity, passed explicitly into every access layer call.

use crate::error::DomainError;

/// An authenticated user as vouched for by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
}

/// Who is making a request. Anonymous requesters may only read.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Requester {
    #[default]
    Anonymous,
    Authenticated(Identity),
}

impl Requester {
    pub fn user(user_id: i64, username: impl Into<String>) -> Self {
        Self::Authenticated(Identity {
            user_id,
            username: username.into(),
        })
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(identity) => Some(identity),
        }
    }

    /// Return the identity or fail with `AuthenticationRequired`.
    pub fn require(&self) -> Result<&Identity, DomainError> {
        self.identity().ok_or(DomainError::AuthenticationRequired)
    }
}
