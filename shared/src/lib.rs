//! Shared types for Comanda
//!
//! Wire and domain models used by both the API client and the print agent:
//! print jobs, printer definitions, ticket payloads and store decoration,
//! plus the response envelope the POS API wraps them in.

pub mod models;
pub mod response;

// Re-exports
pub use models::*;
pub use response::Envelope;
pub use serde::{Deserialize, Serialize};
