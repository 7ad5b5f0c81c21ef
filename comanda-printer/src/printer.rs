//! Printer adapters for sending ESC/POS data
//!
//! Supports:
//! - Network printers (raw TCP, port 9100)
//! - Windows driver printers (via the Win32 spooler API)
//! - CUPS queues on Linux and macOS (via `lp` / `lpstat`)

use crate::error::{PrintError, PrintResult};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{info, instrument};

/// Raw printing port used by nearly every network thermal printer
pub const DEFAULT_PORT: u16 = 9100;

/// Trait for printer adapters
#[allow(async_fn_in_trait)]
pub trait Printer {
    /// Send raw ESC/POS data to the printer
    async fn print(&self, data: &[u8]) -> PrintResult<()>;
}

/// Network printer (raw TCP)
///
/// The connection is write-only: bytes are sent, flushed and the socket is
/// closed. Printers do not answer on this channel.
#[derive(Debug, Clone)]
pub struct NetworkPrinter {
    host: String,
    port: u16,
    timeout: Duration,
}

impl NetworkPrinter {
    /// Create a new network printer
    ///
    /// `host` may be an IP address or a hostname.
    pub fn new(host: &str, port: u16) -> PrintResult<Self> {
        let host = host.trim();
        if host.is_empty() {
            return Err(PrintError::InvalidConfig("Empty printer host".to_string()));
        }
        if port == 0 {
            return Err(PrintError::InvalidConfig(format!(
                "Invalid port for {}: 0",
                host
            )));
        }

        Ok(Self {
            host: host.to_string(),
            port,
            timeout: Duration::from_secs(5),
        })
    }

    /// Create from an address string (e.g., "192.168.1.100:9100")
    ///
    /// The port defaults to 9100 when omitted.
    pub fn from_addr(addr: &str) -> PrintResult<Self> {
        match addr.rsplit_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse()
                    .map_err(|_| PrintError::InvalidConfig(format!("Invalid address: {}", addr)))?;
                Self::new(host, port)
            }
            None => Self::new(addr, DEFAULT_PORT),
        }
    }

    /// Set connection timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the printer host
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Get the printer port
    pub fn port(&self) -> u16 {
        self.port
    }

    fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Printer for NetworkPrinter {
    #[instrument(skip(self, data), fields(addr = %self.addr(), data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        info!("Connecting to printer");

        let mut stream = tokio::time::timeout(
            self.timeout,
            TcpStream::connect((self.host.as_str(), self.port)),
        )
        .await
        .map_err(|_| PrintError::Timeout(format!("Connection timeout: {}", self.addr())))?
        .map_err(|e| PrintError::Connection(format!("{}: {}", self.addr(), e)))?;

        info!("Connected, sending {} bytes", data.len());

        stream.write_all(data).await.map_err(|e| {
            PrintError::Io(std::io::Error::new(
                e.kind(),
                format!("Write failed: {}", e),
            ))
        })?;

        stream.flush().await?;
        stream.shutdown().await?;

        info!("Print job sent successfully");
        Ok(())
    }
}

/// Send raw data to an OS-installed printer by its system name
///
/// Windows goes through the Win32 spooler, Unix through CUPS. Other
/// platforms get [`PrintError::Unsupported`].
#[instrument(skip(data), fields(data_len = data.len()))]
pub async fn print_via_driver(name: &str, data: &[u8]) -> PrintResult<()> {
    #[cfg(windows)]
    {
        WindowsPrinter::new(name).print(data).await
    }

    #[cfg(unix)]
    {
        CupsPrinter::new(name).print(data).await
    }

    #[cfg(not(any(windows, unix)))]
    {
        let _ = data;
        Err(PrintError::Unsupported(format!(
            "driver printing to '{}'",
            name
        )))
    }
}

/// List installed OS printers (virtual printers filtered out)
///
/// Blocking; returns an empty list when no spooler is available.
pub fn list_system_printers() -> PrintResult<Vec<String>> {
    #[cfg(windows)]
    {
        WindowsPrinter::list()
    }

    #[cfg(unix)]
    {
        Ok(CupsPrinter::list())
    }

    #[cfg(not(any(windows, unix)))]
    {
        Ok(Vec::new())
    }
}

/// CUPS queue printer
///
/// Jobs are submitted with `lp -o raw`, so ESC/POS bytes reach the device
/// untouched.
#[cfg(unix)]
pub struct CupsPrinter {
    name: String,
}

#[cfg(unix)]
impl CupsPrinter {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Destinations known to CUPS; empty when `lpstat` is missing or fails
    pub fn list() -> Vec<String> {
        match std::process::Command::new("lpstat").arg("-e").output() {
            Ok(output) if output.status.success() => {
                parse_destinations(&String::from_utf8_lossy(&output.stdout))
            }
            Ok(output) => {
                tracing::debug!(status = %output.status, "lpstat failed");
                Vec::new()
            }
            Err(e) => {
                tracing::debug!(error = %e, "lpstat unavailable");
                Vec::new()
            }
        }
    }
}

#[cfg(unix)]
impl Printer for CupsPrinter {
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        use std::process::Stdio;
        use tokio::process::Command;

        let mut child = Command::new("lp")
            .args(["-d", self.name.as_str(), "-o", "raw", "-t", "Comanda Ticket"])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| PrintError::Driver(format!("cannot start lp: {}", e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(data).await?;
            stdin.shutdown().await?;
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PrintError::Driver(format!(
                "lp rejected job for '{}': {}",
                self.name,
                stderr.trim()
            )));
        }

        info!(printer = %self.name, bytes = data.len(), "Job queued on CUPS");
        Ok(())
    }
}

/// Destination names from `lpstat -e`, one per line
#[cfg(unix)]
fn parse_destinations(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Windows driver printer
///
/// Uses Win32 API to print through installed printer drivers.
#[cfg(windows)]
pub struct WindowsPrinter {
    name: String,
}

#[cfg(windows)]
impl WindowsPrinter {
    /// Create a printer with a specific name
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    /// Get the printer name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// List available printers (filters out virtual printers)
    pub fn list() -> PrintResult<Vec<String>> {
        use windows::Win32::Graphics::Printing::{
            EnumPrintersW, PRINTER_ENUM_CONNECTIONS, PRINTER_ENUM_LOCAL, PRINTER_INFO_5W,
        };
        use windows::core::PWSTR;

        unsafe {
            let flags = PRINTER_ENUM_LOCAL | PRINTER_ENUM_CONNECTIONS;
            let mut needed: u32 = 0;
            let mut returned: u32 = 0;

            let _ = EnumPrintersW(flags, None, 5, None, &mut needed, &mut returned);

            if needed == 0 {
                return Ok(Vec::new());
            }

            let mut buf: Vec<u8> = vec![0; needed as usize];
            EnumPrintersW(
                flags,
                None,
                5,
                Some(buf.as_mut_slice()),
                &mut needed,
                &mut returned,
            )
            .map_err(|_| PrintError::Driver("EnumPrintersW failed".to_string()))?;

            let ptr = buf.as_ptr() as *const PRINTER_INFO_5W;
            let slice = std::slice::from_raw_parts(ptr, returned as usize);

            let mut result: Vec<String> = Vec::new();
            for info in slice.iter() {
                if info.pPrinterName.is_null() {
                    continue;
                }
                let name = PWSTR(info.pPrinterName.0).to_string().unwrap_or_default();

                let port = if info.pPortName.is_null() {
                    String::new()
                } else {
                    PWSTR(info.pPortName.0).to_string().unwrap_or_default()
                };

                if !Self::is_virtual_port(&port) {
                    result.push(name);
                }
            }

            Ok(result)
        }
    }

    /// Check if a port is a virtual printer port
    fn is_virtual_port(port: &str) -> bool {
        let p = port.to_lowercase();
        p == "file:"
            || p == "portprompt:"
            || p == "xpsport:"
            || p.starts_with("onenote")
            || p == "nul:"
            || p.starts_with("wfsport:")
    }

    fn write_raw(&self, data: &[u8]) -> PrintResult<()> {
        use core::ffi::c_void;
        use windows::Win32::Graphics::Printing::{
            ClosePrinter, DOC_INFO_1W, EndDocPrinter, EndPagePrinter, OpenPrinterW, PRINTER_HANDLE,
            StartDocPrinterW, StartPagePrinter, WritePrinter,
        };
        use windows::core::{PCWSTR, PWSTR};

        fn to_wide(s: &str) -> Vec<u16> {
            s.encode_utf16().chain(std::iter::once(0)).collect()
        }

        unsafe {
            let mut handle: PRINTER_HANDLE = PRINTER_HANDLE::default();
            let name_w = to_wide(&self.name);

            OpenPrinterW(PCWSTR::from_raw(name_w.as_ptr()), &mut handle, None).map_err(|_| {
                PrintError::Driver(format!("Printer '{}' not found", self.name))
            })?;

            let doc_name_w = to_wide("Comanda Ticket");
            let datatype_w = to_wide("RAW");
            let doc_info = DOC_INFO_1W {
                pDocName: PWSTR(doc_name_w.as_ptr() as *mut _),
                pOutputFile: PWSTR::null(),
                pDatatype: PWSTR(datatype_w.as_ptr() as *mut _),
            };

            if StartDocPrinterW(handle, 1, &doc_info as *const DOC_INFO_1W) == 0 {
                let _ = ClosePrinter(handle);
                return Err(PrintError::Driver("StartDocPrinter failed".to_string()));
            }

            if !StartPagePrinter(handle).as_bool() {
                let _ = EndDocPrinter(handle);
                let _ = ClosePrinter(handle);
                return Err(PrintError::Driver("StartPagePrinter failed".to_string()));
            }

            let mut written: u32 = 0;
            let ok = WritePrinter(
                handle,
                data.as_ptr() as *const c_void,
                data.len() as u32,
                &mut written,
            );

            let _ = EndPagePrinter(handle);
            let _ = EndDocPrinter(handle);
            let _ = ClosePrinter(handle);

            if !ok.as_bool() {
                return Err(PrintError::Driver("WritePrinter failed".to_string()));
            }

            if written != data.len() as u32 {
                return Err(PrintError::Driver("Incomplete write".to_string()));
            }

            Ok(())
        }
    }
}

#[cfg(windows)]
impl Printer for WindowsPrinter {
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        // Windows printing is synchronous, run in blocking task
        let name = self.name.clone();
        let data = data.to_vec();

        tokio::task::spawn_blocking(move || {
            let printer = WindowsPrinter { name };
            printer.write_raw(&data)
        })
        .await
        .map_err(|e| PrintError::Driver(format!("Task join failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    #[test]
    fn test_network_printer_new() {
        let printer = NetworkPrinter::new("192.168.1.100", 9100).unwrap();
        assert_eq!(printer.host(), "192.168.1.100");
        assert_eq!(printer.port(), 9100);
    }

    #[test]
    fn test_network_printer_from_addr() {
        let printer = NetworkPrinter::from_addr("192.168.1.100:9101").unwrap();
        assert_eq!(printer.port(), 9101);

        let printer = NetworkPrinter::from_addr("kitchen-printer.local").unwrap();
        assert_eq!(printer.host(), "kitchen-printer.local");
        assert_eq!(printer.port(), DEFAULT_PORT);
    }

    #[test]
    fn test_invalid_addr() {
        assert!(NetworkPrinter::from_addr("10.0.0.5:port").is_err());
        assert!(NetworkPrinter::new("", 9100).is_err());
        assert!(NetworkPrinter::new("10.0.0.5", 0).is_err());
    }

    #[tokio::test]
    async fn test_network_print_writes_all_bytes() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            socket.read_to_end(&mut received).await.unwrap();
            received
        });

        let payload: Vec<u8> = (0u8..=255).collect();
        let printer = NetworkPrinter::new("127.0.0.1", port).unwrap();
        printer.print(&payload).await.unwrap();

        assert_eq!(server.await.unwrap(), payload);
    }

    #[tokio::test]
    async fn test_network_print_connection_refused() {
        // Bind then drop to get a port nobody listens on
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };

        let printer = NetworkPrinter::new("127.0.0.1", port)
            .unwrap()
            .with_timeout(Duration::from_secs(1));
        let err = printer.print(b"hello").await.unwrap_err();
        assert!(matches!(err, PrintError::Connection(_) | PrintError::Timeout(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_parse_cups_destinations() {
        let output = "EPSON_TM_T20II\nPOS-80\n\n";
        assert_eq!(parse_destinations(output), vec!["EPSON_TM_T20II", "POS-80"]);
        assert!(parse_destinations("").is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unknown_cups_queue_is_a_driver_error() {
        // Fails whether or not lp is installed, never silently succeeds
        let err = print_via_driver("comanda-no-such-queue", b"data")
            .await
            .unwrap_err();
        assert!(matches!(err, PrintError::Driver(_) | PrintError::Io(_)));
    }
}
