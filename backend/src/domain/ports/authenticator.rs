//! Driving port for registration, login, logout, and token resolution.

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::auth::{AuthSession, LoginCredentials, RegistrationRequest, SessionToken};
use crate::domain::user::User;

/// Domain use-case port for authentication flows.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Create an account and immediately issue a token, so a fresh
    /// registration is already authenticated.
    async fn register(&self, request: RegistrationRequest) -> Result<AuthSession, Error>;

    /// Verify credentials and return the user with their token, reusing an
    /// existing token when one is live.
    async fn login(&self, credentials: LoginCredentials) -> Result<AuthSession, Error>;

    /// Revoke the presented token.
    async fn logout(&self, token: &SessionToken) -> Result<(), Error>;

    /// Resolve a bearer token to its user, if the token is live.
    async fn identify(&self, token: &SessionToken) -> Result<Option<User>, Error>;
}
