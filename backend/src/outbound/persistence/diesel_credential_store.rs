//! PostgreSQL-backed `CredentialStore` implementation using Diesel.
//!
//! Password digests never cross the port boundary; they are produced and
//! checked entirely inside this adapter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::auth::{LoginCredentials, RegistrationRequest, SessionToken};
use crate::domain::ports::{CredentialStore, CredentialStoreError};
use crate::domain::user::{EmailAddress, User, UserId, Username};
use crate::outbound::credentials::{generate_token_key, hash_password, verify_password};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewTokenRow, NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{auth_tokens, users};

/// Diesel-backed implementation of the credential store port.
#[derive(Clone)]
pub struct DieselCredentialStore {
    pool: DbPool,
}

impl DieselCredentialStore {
    /// Create a new store with the given connection pool.
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> CredentialStoreError {
    map_pool_error(error, CredentialStoreError::connection)
}

/// Map Diesel errors, routing unique violations to the duplicate-username
/// variant. Only the users table carries a unique constraint the caller
/// can trip.
fn map_write_error(error: diesel::result::Error) -> CredentialStoreError {
    map_diesel_error(
        error,
        || CredentialStoreError::DuplicateUsername,
        CredentialStoreError::query,
        CredentialStoreError::connection,
    )
}

fn map_read_error(error: diesel::result::Error) -> CredentialStoreError {
    map_diesel_error(
        error,
        || CredentialStoreError::query("unexpected unique violation"),
        CredentialStoreError::query,
        CredentialStoreError::connection,
    )
}

/// Convert a database row into a validated domain user.
fn row_to_user(row: UserRow) -> Result<User, CredentialStoreError> {
    let username = Username::new(&row.username)
        .map_err(|err| CredentialStoreError::query(err.to_string()))?;
    let email = EmailAddress::new(&row.email)
        .map_err(|err| CredentialStoreError::query(err.to_string()))?;
    Ok(User::new(UserId::from_uuid(row.id), username, email))
}

fn token_from_key(key: String) -> Result<SessionToken, CredentialStoreError> {
    SessionToken::new(key).map_err(|err| CredentialStoreError::query(err.to_string()))
}

#[async_trait]
impl CredentialStore for DieselCredentialStore {
    async fn register(&self, request: &RegistrationRequest) -> Result<User, CredentialStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let digest = hash_password(request.password());
        let row = NewUserRow {
            id: Uuid::new_v4(),
            username: request.username().as_ref(),
            email: request.email().as_ref(),
            password_digest: &digest,
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_write_error)?;

        Ok(User::new(
            UserId::from_uuid(row.id),
            request.username().clone(),
            request.email().clone(),
        ))
    }

    async fn verify(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Option<User>, CredentialStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row: Option<UserRow> = users::table
            .filter(users::username.eq(credentials.username()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;

        match row {
            Some(row) if verify_password(credentials.password(), &row.password_digest) => {
                row_to_user(row).map(Some)
            }
            _ => Ok(None),
        }
    }

    async fn get_or_issue_token(
        &self,
        user: &UserId,
    ) -> Result<SessionToken, CredentialStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let existing: Option<String> = auth_tokens::table
            .filter(auth_tokens::user_id.eq(user.as_uuid()))
            .select(auth_tokens::key)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        if let Some(key) = existing {
            return token_from_key(key);
        }

        let key = generate_token_key();
        diesel::insert_into(auth_tokens::table)
            .values(&NewTokenRow {
                key: &key,
                user_id: *user.as_uuid(),
            })
            .on_conflict(auth_tokens::user_id)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_read_error)?;

        // Re-read so a concurrent issuance settles on one canonical key.
        let key: String = auth_tokens::table
            .filter(auth_tokens::user_id.eq(user.as_uuid()))
            .select(auth_tokens::key)
            .first(&mut conn)
            .await
            .map_err(map_read_error)?;
        token_from_key(key)
    }

    async fn revoke_token(&self, token: &SessionToken) -> Result<(), CredentialStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        diesel::delete(auth_tokens::table.filter(auth_tokens::key.eq(token.as_str())))
            .execute(&mut conn)
            .await
            .map_err(map_read_error)?;
        Ok(())
    }

    async fn resolve_token(
        &self,
        token: &SessionToken,
    ) -> Result<Option<User>, CredentialStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row: Option<UserRow> = auth_tokens::table
            .inner_join(users::table)
            .filter(auth_tokens::key.eq(token.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        row.map(row_to_user).transpose()
    }
}
