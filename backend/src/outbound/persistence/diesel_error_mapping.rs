//! Shared Diesel error mapping for the persistence adapters.

use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a port-specific connection error constructor.
pub(super) fn map_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map common Diesel error variants into port error constructors.
///
/// Unique violations route to `duplicate` so each adapter can surface its
/// own duplicate-key semantics; connection drops route to `connection`;
/// everything else is a query error.
pub(super) fn map_diesel_error<E, D, Q, C>(
    error: diesel::result::Error,
    duplicate: D,
    query: Q,
    connection: C,
) -> E
where
    D: FnOnce() -> E,
    Q: FnOnce(&'static str) -> E,
    C: FnOnce(&'static str) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => duplicate(),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::NotFound => query("record not found"),
        _ => query("database error"),
    }
}
