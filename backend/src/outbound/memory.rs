//! In-memory implementations of the driven ports.
//!
//! These adapters back the server when no database is configured and give
//! tests real port semantics (uniqueness, idempotent token issuance)
//! without any I/O. A single mutex per store stands in for the database's
//! transactional guarantees.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::auth::{LoginCredentials, RegistrationRequest, SessionToken};
use crate::domain::event::{Event, EventId};
use crate::domain::ports::{
    CredentialStore, CredentialStoreError, EventFilter, EventRepository, EventStoreError,
};
use crate::domain::user::{User, UserId};
use crate::outbound::credentials::{generate_token_key, hash_password, verify_password};

fn recover<'a, T>(mutex: &'a Mutex<T>) -> MutexGuard<'a, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[derive(Debug, Clone)]
struct StoredAccount {
    user: User,
    password_digest: String,
}

#[derive(Debug, Default)]
struct CredentialState {
    accounts: HashMap<UserId, StoredAccount>,
    tokens: HashMap<String, UserId>,
}

/// Mutex-guarded credential store.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    state: Mutex<CredentialState>,
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn register(&self, request: &RegistrationRequest) -> Result<User, CredentialStoreError> {
        let mut state = recover(&self.state);
        if state
            .accounts
            .values()
            .any(|account| account.user.username() == request.username())
        {
            return Err(CredentialStoreError::DuplicateUsername);
        }

        let user = User::new(
            UserId::random(),
            request.username().clone(),
            request.email().clone(),
        );
        state.accounts.insert(
            *user.id(),
            StoredAccount {
                user: user.clone(),
                password_digest: hash_password(request.password()),
            },
        );
        Ok(user)
    }

    async fn verify(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Option<User>, CredentialStoreError> {
        let state = recover(&self.state);
        let account = state
            .accounts
            .values()
            .find(|account| account.user.username().as_ref() == credentials.username());
        Ok(account
            .filter(|account| verify_password(credentials.password(), &account.password_digest))
            .map(|account| account.user.clone()))
    }

    async fn get_or_issue_token(
        &self,
        user: &UserId,
    ) -> Result<SessionToken, CredentialStoreError> {
        let mut state = recover(&self.state);
        if let Some((key, _)) = state.tokens.iter().find(|(_, owner)| *owner == user) {
            return SessionToken::new(key)
                .map_err(|err| CredentialStoreError::query(err.to_string()));
        }

        let key = generate_token_key();
        state.tokens.insert(key.clone(), *user);
        SessionToken::new(key).map_err(|err| CredentialStoreError::query(err.to_string()))
    }

    async fn revoke_token(&self, token: &SessionToken) -> Result<(), CredentialStoreError> {
        recover(&self.state).tokens.remove(token.as_str());
        Ok(())
    }

    async fn resolve_token(
        &self,
        token: &SessionToken,
    ) -> Result<Option<User>, CredentialStoreError> {
        let state = recover(&self.state);
        Ok(state
            .tokens
            .get(token.as_str())
            .and_then(|user_id| state.accounts.get(user_id))
            .map(|account| account.user.clone()))
    }
}

/// Mutex-guarded `EventId -> Event` store.
#[derive(Debug, Default)]
pub struct InMemoryEventRepository {
    events: Mutex<HashMap<EventId, Event>>,
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn insert(&self, event: &Event) -> Result<(), EventStoreError> {
        let mut events = recover(&self.events);
        if events
            .values()
            .any(|existing| existing.title() == event.title())
        {
            return Err(EventStoreError::DuplicateTitle);
        }
        events.insert(*event.id(), event.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &EventId) -> Result<Option<Event>, EventStoreError> {
        Ok(recover(&self.events).get(id).cloned())
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Event>, EventStoreError> {
        Ok(recover(&self.events)
            .values()
            .find(|event| event.title().as_ref() == title)
            .cloned())
    }

    async fn update(&self, event: &Event) -> Result<(), EventStoreError> {
        let mut events = recover(&self.events);
        if events
            .values()
            .any(|existing| existing.id() != event.id() && existing.title() == event.title())
        {
            return Err(EventStoreError::DuplicateTitle);
        }
        events.insert(*event.id(), event.clone());
        Ok(())
    }

    async fn delete(&self, id: &EventId) -> Result<(), EventStoreError> {
        recover(&self.events).remove(id);
        Ok(())
    }

    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>, EventStoreError> {
        let mut events: Vec<Event> = recover(&self.events)
            .values()
            .filter(|event| filter.matches(event))
            .cloned()
            .collect();
        events.sort_by(|a, b| {
            a.date()
                .cmp(&b.date())
                .then_with(|| a.title().cmp(b.title()))
        });
        Ok(events)
    }
}
