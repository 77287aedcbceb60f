//! PostgreSQL persistence adapters built on Diesel.

mod diesel_credential_store;
mod diesel_error_mapping;
mod diesel_event_repository;
mod migrate;
mod models;
mod pool;
mod schema;

pub use diesel_credential_store::DieselCredentialStore;
pub use diesel_event_repository::DieselEventRepository;
pub use migrate::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
