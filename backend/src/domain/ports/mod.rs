//! Domain ports: async traits at the seams between the core and the
//! outside world.
//!
//! Driven ports ([`EventRepository`], [`CredentialStore`]) are implemented
//! by outbound adapters; driving ports ([`EventLifecycle`],
//! [`Authenticator`]) are implemented by the domain services and consumed
//! by inbound adapters.

mod authenticator;
mod credential_store;
mod event_lifecycle;
mod event_repository;

pub use authenticator::Authenticator;
pub use credential_store::{CredentialStore, CredentialStoreError};
pub use event_lifecycle::{EventLifecycle, EventListing};
pub use event_repository::{EventFilter, EventRepository, EventStoreError};

#[cfg(test)]
pub use credential_store::MockCredentialStore;
#[cfg(test)]
pub use event_repository::MockEventRepository;
