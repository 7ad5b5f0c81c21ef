//! Comanda Client - HTTP client for the POS API
//!
//! Covers the print queue, the printer registry and the ticket
//! configuration endpoints.

pub mod config;
pub mod error;
pub mod http;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{HttpPosApi, PosApi};
