//! Inbound HTTP surface: router, handlers and request/response mapping

pub mod extract;
pub mod handlers;
pub mod response;
pub mod server;
pub mod uploads;

pub use server::{router, serve, AppState};
