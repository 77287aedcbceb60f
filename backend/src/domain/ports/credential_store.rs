//! Driven port for the credential store: user records and session tokens.
//!
//! Password hashing and token key generation live inside the adapters; the
//! domain only ever sees opaque tokens and fully-formed users.

use async_trait::async_trait;

use crate::domain::auth::{LoginCredentials, RegistrationRequest, SessionToken};
use crate::domain::user::{User, UserId};

/// Errors raised by credential store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialStoreError {
    /// Store connection could not be established.
    #[error("credential store connection failed: {message}")]
    Connection {
        /// Adapter-specific failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("credential store query failed: {message}")]
    Query {
        /// Adapter-specific failure description.
        message: String,
    },
    /// The requested username is already registered.
    #[error("username is already taken")]
    DuplicateUsername,
}

impl CredentialStoreError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port holding user records and the opaque tokens bound to them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Create a new account, hashing the password at rest.
    ///
    /// Fails with [`CredentialStoreError::DuplicateUsername`] when the
    /// username is taken.
    async fn register(&self, request: &RegistrationRequest) -> Result<User, CredentialStoreError>;

    /// Verify credentials, returning the matching user when they hold.
    async fn verify(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Option<User>, CredentialStoreError>;

    /// Return the user's current token, minting one only if none exists.
    async fn get_or_issue_token(&self, user: &UserId)
    -> Result<SessionToken, CredentialStoreError>;

    /// Invalidate a token. Revoking an unknown token is not an error.
    async fn revoke_token(&self, token: &SessionToken) -> Result<(), CredentialStoreError>;

    /// Resolve a presented token to its user, if the token is live.
    async fn resolve_token(
        &self,
        token: &SessionToken,
    ) -> Result<Option<User>, CredentialStoreError>;
}
