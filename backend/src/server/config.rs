//! HTTP server configuration object and helpers.

use std::env;
use std::net::SocketAddr;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `BIND_ADDR` did not parse as a socket address.
    #[error("invalid BIND_ADDR {value:?}: {message}")]
    InvalidBindAddr {
        /// Raw value read from the environment.
        value: String,
        /// Parse failure description.
        message: String,
    },
}

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Runtime configuration for creating the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    bind_addr: SocketAddr,
    database_url: Option<String>,
}

impl ServerConfig {
    /// Construct a configuration from explicit values.
    pub const fn new(bind_addr: SocketAddr, database_url: Option<String>) -> Self {
        Self {
            bind_addr,
            database_url,
        }
    }

    /// Read configuration from the environment.
    ///
    /// `BIND_ADDR` defaults to `0.0.0.0:8080`. `DATABASE_URL` is optional;
    /// when absent the server falls back to in-memory stores.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_owned());
        let bind_addr = raw
            .parse()
            .map_err(|err: std::net::AddrParseError| ConfigError::InvalidBindAddr {
                value: raw,
                message: err.to_string(),
            })?;
        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());
        Ok(Self {
            bind_addr,
            database_url,
        })
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Return the configured database URL, if any.
    #[must_use]
    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn explicit_values_round_trip() {
        let addr: SocketAddr = "127.0.0.1:9000".parse().expect("valid address");
        let config = ServerConfig::new(addr, Some("postgres://localhost/app".to_owned()));
        assert_eq!(config.bind_addr(), addr);
        assert_eq!(config.database_url(), Some("postgres://localhost/app"));
    }

    #[test]
    fn invalid_bind_addr_reports_the_value() {
        let err = "not-an-addr"
            .parse::<SocketAddr>()
            .map_err(|err| ConfigError::InvalidBindAddr {
                value: "not-an-addr".to_owned(),
                message: err.to_string(),
            })
            .expect_err("parse must fail");
        assert!(err.to_string().contains("not-an-addr"));
    }
}
