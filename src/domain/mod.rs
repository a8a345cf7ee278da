//! Domain layer for the relay
//!
//! Configuration, the remote service's typed models, the error taxonomy, and
//! the port through which services reach the remote service.

pub mod error;
pub mod models;
pub mod ports;

pub use error::GatewayError;
