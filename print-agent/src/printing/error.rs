//! Printing error taxonomy
//!
//! Background failures are only logged; interactive failures are returned
//! and shown to the operator through [`PrintingError::user_message`].

use comanda_client::ClientError;
use shared::{JobId, PrinterDefinition};
use thiserror::Error;

/// Failure raised by the host bridge
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("invalid base64 payload: {0}")]
    InvalidPayload(#[from] base64::DecodeError),

    #[error(transparent)]
    Printer(#[from] comanda_printer::PrintError),
}

/// Bytes could not be delivered to a printer
#[derive(Debug, Error)]
#[error("failed to print on {printer}: {cause}")]
pub struct DispatchError {
    pub printer: PrinterDefinition,
    #[source]
    pub cause: BridgeError,
}

/// The native document printer could not hand over a document
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to write document: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum PrintingError {
    /// No usable printer for the requested zone(s)
    #[error("no printer configured for '{zone}'{}", cause_suffix(.cause))]
    ConfigurationMissing {
        zone: String,
        cause: Option<String>,
    },

    /// The payload could not be turned into a ticket
    #[error("cannot render ticket: {0}")]
    RenderFailure(String),

    #[error(transparent)]
    DispatchFailure(#[from] DispatchError),

    /// Printed, but the queue did not accept the acknowledgment
    #[error("failed to acknowledge job {id}: {cause}")]
    AcknowledgeFailure {
        id: JobId,
        #[source]
        cause: ClientError,
    },

    #[error(transparent)]
    DocumentFailure(#[from] DocumentError),

    /// Needs a binary transport, which this runtime does not have
    #[error("{0} requires the desktop runtime")]
    DesktopOnly(String),
}

impl PrintingError {
    pub fn not_found(zone: impl Into<String>) -> Self {
        PrintingError::ConfigurationMissing {
            zone: zone.into(),
            cause: None,
        }
    }

    /// Alert text for the operator
    pub fn user_message(&self) -> String {
        match self {
            PrintingError::ConfigurationMissing { zone, cause: None } => {
                format!("No printer is configured for '{}'.", zone)
            }
            PrintingError::ConfigurationMissing {
                zone,
                cause: Some(cause),
            } => format!(
                "Could not look up the printer for '{}': {}",
                zone, cause
            ),
            PrintingError::RenderFailure(reason) => {
                format!("The ticket could not be prepared: {}", reason)
            }
            PrintingError::DispatchFailure(e) => {
                format!("Printer error ({}): {}", e.printer.name, e.cause)
            }
            PrintingError::AcknowledgeFailure { id, cause } => {
                format!("Job {} printed but could not be marked as done: {}", id, cause)
            }
            PrintingError::DocumentFailure(e) => format!("Could not open the print dialog: {}", e),
            PrintingError::DesktopOnly(action) => {
                format!("Not available in this browser: {} needs the desktop app.", action)
            }
        }
    }
}

fn cause_suffix(cause: &Option<String>) -> String {
    cause
        .as_ref()
        .map(|c| format!(" ({})", c))
        .unwrap_or_default()
}

pub type PrintingResult<T> = Result<T, PrintingError>;
