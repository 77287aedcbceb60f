//! Backend entry-point: configures tracing, runs migrations, serves the
//! REST API.

use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use backend::outbound::persistence::run_pending_migrations;
use backend::server::{self, ServerConfig};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = ServerConfig::from_env().map_err(std::io::Error::other)?;
    if let Some(url) = config.database_url() {
        run_pending_migrations(url)
            .await
            .map_err(std::io::Error::other)?;
    }

    server::run(config).await
}
