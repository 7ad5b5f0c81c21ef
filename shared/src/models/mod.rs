//! Data models
//!
//! Received from the POS API as JSON. The server still emits its legacy
//! field names for some resources, so wire structs accept both spellings
//! through `#[serde(alias)]`.

pub mod print_job;
pub mod printer;
pub mod store_config;
pub mod ticket;

// Re-exports
pub use print_job::*;
pub use printer::*;
pub use store_config::*;
pub use ticket::*;
