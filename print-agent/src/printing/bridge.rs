//! Host bridge
//!
//! The privileged side of the agent: the only code that touches sockets and
//! the OS spooler. Payloads cross the bridge as standard padded base64, the
//! same framing a webview shell uses for its native commands.

use super::error::BridgeError;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use comanda_printer::{NetworkPrinter, PrintError, Printer};
use std::time::Duration;
use tracing::{debug, instrument};

#[async_trait]
pub trait HostBridge: Send + Sync {
    /// Decode and write the payload to `host:port`, then close
    async fn print_over_network(&self, host: &str, port: u16, payload_b64: &str) -> Result<(), BridgeError>;

    /// Decode and submit the payload as a RAW job to an OS printer
    async fn print_via_local_driver(&self, identifier: &str, payload_b64: &str) -> Result<(), BridgeError>;

    /// Installed OS printers, virtual ports excluded
    async fn list_system_printers(&self) -> Result<Vec<String>, BridgeError>;
}

pub fn encode_payload(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn decode_payload(payload_b64: &str) -> Result<Vec<u8>, BridgeError> {
    Ok(STANDARD.decode(payload_b64)?)
}

/// Bridge backed by this process: raw TCP and the OS spooler
#[derive(Debug, Clone)]
pub struct NativeBridge {
    connect_timeout: Duration,
}

impl NativeBridge {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

impl Default for NativeBridge {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

#[async_trait]
impl HostBridge for NativeBridge {
    #[instrument(skip(self, payload_b64), fields(payload_len = payload_b64.len()))]
    async fn print_over_network(&self, host: &str, port: u16, payload_b64: &str) -> Result<(), BridgeError> {
        let data = decode_payload(payload_b64)?;
        let printer = NetworkPrinter::new(host, port)?.with_timeout(self.connect_timeout);
        printer.print(&data).await?;
        debug!(bytes = data.len(), "Network print complete");
        Ok(())
    }

    #[instrument(skip(self, payload_b64), fields(payload_len = payload_b64.len()))]
    async fn print_via_local_driver(&self, identifier: &str, payload_b64: &str) -> Result<(), BridgeError> {
        let data = decode_payload(payload_b64)?;
        comanda_printer::print_via_driver(identifier, &data).await?;
        debug!(bytes = data.len(), "Driver print complete");
        Ok(())
    }

    async fn list_system_printers(&self) -> Result<Vec<String>, BridgeError> {
        let printers = tokio::task::spawn_blocking(comanda_printer::list_system_printers)
            .await
            .map_err(|e| PrintError::Driver(format!("printer enumeration task failed: {}", e)))??;
        Ok(printers)
    }
}
