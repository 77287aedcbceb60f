//! Authentication domain service.
//!
//! Implements the [`Authenticator`] driving port on top of the credential
//! store. Uniqueness of usernames, password hashing, and token storage are
//! the store's concern; this service only maps outcomes into domain errors.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::Error;
use crate::domain::auth::{AuthSession, LoginCredentials, RegistrationRequest, SessionToken};
use crate::domain::ports::{Authenticator, CredentialStore, CredentialStoreError};
use crate::domain::user::User;

fn map_store_error(error: CredentialStoreError) -> Error {
    match error {
        CredentialStoreError::Connection { message } => {
            Error::service_unavailable(format!("credential store unavailable: {message}"))
        }
        CredentialStoreError::Query { message } => {
            Error::internal(format!("credential store error: {message}"))
        }
        CredentialStoreError::DuplicateUsername => Error::conflict("username is already taken"),
    }
}

/// Authentication service backed by a credential store.
#[derive(Clone)]
pub struct AuthService<C> {
    credentials: Arc<C>,
}

impl<C> AuthService<C> {
    /// Create a new service with the credential store.
    pub fn new(credentials: Arc<C>) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl<C> Authenticator for AuthService<C>
where
    C: CredentialStore,
{
    async fn register(&self, request: RegistrationRequest) -> Result<AuthSession, Error> {
        let user = self
            .credentials
            .register(&request)
            .await
            .map_err(map_store_error)?;
        let token = self
            .credentials
            .get_or_issue_token(user.id())
            .await
            .map_err(map_store_error)?;
        debug!(user = %user.id(), "user registered");
        Ok(AuthSession::new(user, token))
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<AuthSession, Error> {
        let user = self
            .credentials
            .verify(&credentials)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::unauthorized("invalid username or password"))?;
        let token = self
            .credentials
            .get_or_issue_token(user.id())
            .await
            .map_err(map_store_error)?;
        debug!(user = %user.id(), "user logged in");
        Ok(AuthSession::new(user, token))
    }

    async fn logout(&self, token: &SessionToken) -> Result<(), Error> {
        self.credentials
            .revoke_token(token)
            .await
            .map_err(map_store_error)
    }

    async fn identify(&self, token: &SessionToken) -> Result<Option<User>, Error> {
        self.credentials
            .resolve_token(token)
            .await
            .map_err(map_store_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockCredentialStore;
    use crate::domain::user::{EmailAddress, UserId, Username};

    fn fixture_user() -> User {
        User::new(
            UserId::random(),
            Username::new("alice").expect("valid username"),
            EmailAddress::new("alice@example.com").expect("valid email"),
        )
    }

    fn registration() -> RegistrationRequest {
        RegistrationRequest::try_from_parts("alice", "alice@example.com", "password123")
            .expect("valid registration")
    }

    #[tokio::test]
    async fn register_issues_a_token_immediately() {
        let user = fixture_user();
        let mut store = MockCredentialStore::new();
        let registered = user.clone();
        store
            .expect_register()
            .return_once(move |_| Ok(registered));
        store
            .expect_get_or_issue_token()
            .return_once(|_| Ok(SessionToken::new("abc123").expect("valid token")));

        let service = AuthService::new(Arc::new(store));
        let session = service
            .register(registration())
            .await
            .expect("registration succeeds");
        assert_eq!(session.user(), &user);
        assert_eq!(session.token().as_str(), "abc123");
    }

    #[tokio::test]
    async fn duplicate_username_maps_to_conflict() {
        let mut store = MockCredentialStore::new();
        store
            .expect_register()
            .return_once(|_| Err(CredentialStoreError::DuplicateUsername));

        let service = AuthService::new(Arc::new(store));
        let err = service
            .register(registration())
            .await
            .expect_err("duplicate must fail");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn failed_verification_is_unauthorized() {
        let mut store = MockCredentialStore::new();
        store.expect_verify().return_once(|_| Ok(None));

        let service = AuthService::new(Arc::new(store));
        let credentials =
            LoginCredentials::try_from_parts("alice", "wrong").expect("credentials shape");
        let err = service
            .login(credentials)
            .await
            .expect_err("bad credentials must fail");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn store_outage_maps_to_service_unavailable() {
        let mut store = MockCredentialStore::new();
        store
            .expect_verify()
            .return_once(|_| Err(CredentialStoreError::connection("database unavailable")));

        let service = AuthService::new(Arc::new(store));
        let credentials =
            LoginCredentials::try_from_parts("alice", "pw").expect("credentials shape");
        let err = service
            .login(credentials)
            .await
            .expect_err("outage must fail");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
