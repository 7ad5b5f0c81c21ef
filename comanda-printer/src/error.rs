//! Error types for the printer library

use thiserror::Error;

/// Printer error types
#[derive(Debug, Error)]
pub enum PrintError {
    /// Network connection error
    #[error("Connection failed: {0}")]
    Connection(String),

    /// IO error during printing
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Timeout waiting for printer
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Invalid printer configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// OS spooler / driver error
    #[error("Driver printer error: {0}")]
    Driver(String),

    /// The requested transport does not exist on this platform
    #[error("Not supported on this platform: {0}")]
    Unsupported(String),
}

/// Result type for printer operations
pub type PrintResult<T> = Result<T, PrintError>;
