//! Core module - configuration, runtime capability and task lifecycle
//!
//! - [`Config`] - agent configuration from the environment
//! - [`PrintCapability`] - what this runtime can print
//! - [`BackgroundTasks`] - background task ownership and shutdown

pub mod capability;
pub mod config;
pub mod tasks;

pub use capability::PrintCapability;
pub use config::{Config, PrintRuntime};
pub use tasks::BackgroundTasks;
