//! Outbound adapters implementing the domain's driven ports.

pub mod credentials;
pub mod memory;
pub mod persistence;
