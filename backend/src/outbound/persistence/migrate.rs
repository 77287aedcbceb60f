//! Embedded migration runner.
//!
//! Migrations run over a blocking wrapper around the async connection, so
//! the runner must be called from within a Tokio runtime.

use diesel::Connection;
use diesel_async::AsyncPgConnection;
use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

/// All migrations bundled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Errors raised while applying migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// Could not open a connection for the migration run.
    #[error("failed to connect for migrations: {message}")]
    Connection {
        /// Underlying connection failure description.
        message: String,
    },
    /// A migration failed to apply.
    #[error("failed to run migrations: {message}")]
    Apply {
        /// Underlying migration failure description.
        message: String,
    },
}

/// Apply any pending migrations against the given database.
pub async fn run_pending_migrations(database_url: &str) -> Result<(), MigrationError> {
    let database_url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || {
        let mut conn = AsyncConnectionWrapper::<AsyncPgConnection>::establish(&database_url)
            .map_err(|err| MigrationError::Connection {
                message: err.to_string(),
            })?;
        conn.run_pending_migrations(MIGRATIONS)
            .map(|versions| versions.len())
            .map_err(|err| MigrationError::Apply {
                message: err.to_string(),
            })
    })
    .await
    .map_err(|err| MigrationError::Apply {
        message: format!("migration task failed: {err}"),
    })??;

    info!(applied, "database migrations up to date");
    Ok(())
}
