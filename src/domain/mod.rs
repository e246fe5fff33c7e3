//! Domain layer for the traffic-signal control agents
//!
//! This module contains the phase catalog, the state model, decision records
//! and the ports the agents depend on.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
