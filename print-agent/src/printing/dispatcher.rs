//! Transport dispatcher
//!
//! Sends a rendered ESC/POS stream to one printer through the host bridge.
//! A failed send is reported once; retrying is the caller's business.

use super::bridge::{HostBridge, encode_payload};
use super::error::DispatchError;
use shared::{PrinterDefinition, PrinterTransport};
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Clone)]
pub struct Dispatcher {
    bridge: Arc<dyn HostBridge>,
}

impl Dispatcher {
    pub fn new(bridge: Arc<dyn HostBridge>) -> Self {
        Self { bridge }
    }

    pub fn bridge(&self) -> &Arc<dyn HostBridge> {
        &self.bridge
    }

    #[instrument(skip(self, printer, bytes), fields(printer = %printer.name, bytes = bytes.len()))]
    pub async fn dispatch(&self, printer: &PrinterDefinition, bytes: &[u8]) -> Result<(), DispatchError> {
        let payload = encode_payload(bytes);

        let result = match &printer.transport {
            PrinterTransport::Network { host, port } => {
                self.bridge.print_over_network(host, *port, &payload).await
            }
            PrinterTransport::LocalDriver { identifier } => {
                self.bridge.print_via_local_driver(identifier, &payload).await
            }
        };

        result.map_err(|cause| DispatchError {
            printer: printer.clone(),
            cause,
        })?;

        info!(transport = %printer.transport, "Ticket sent");
        Ok(())
    }
}
