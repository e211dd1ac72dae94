// printdash-api: Async Rust client for OctoPrint-compatible printer hosts.

pub mod client;
mod commands;
pub mod error;
pub mod models;
mod status;
pub mod transport;

pub use client::OctoPrintClient;
pub use error::Error;
pub use transport::TransportConfig;
