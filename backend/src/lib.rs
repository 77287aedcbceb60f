//! Event listings backend library modules.
//!
//! The crate is laid out hexagonally: `domain` holds the validated model,
//! services, and ports; `inbound` adapts HTTP requests onto the driving
//! ports; `outbound` implements the driven ports (PostgreSQL and
//! in-memory); `server` wires the pieces together.

pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod server;
