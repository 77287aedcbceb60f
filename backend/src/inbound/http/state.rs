//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{Authenticator, EventLifecycle};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Registration, login, logout, and token resolution.
    pub auth: Arc<dyn Authenticator>,
    /// Event lifecycle use-cases.
    pub events: Arc<dyn EventLifecycle>,
}

impl HttpState {
    /// Bundle the two driving ports for the handlers.
    pub fn new(auth: Arc<dyn Authenticator>, events: Arc<dyn EventLifecycle>) -> Self {
        Self { auth, events }
    }
}
