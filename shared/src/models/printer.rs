//! Printer Model

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

/// Raw printing port used when a network printer has none configured
pub const DEFAULT_PRINTER_PORT: u16 = 9100;

/// How bytes reach a printer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PrinterTransport {
    /// Raw TCP socket to an IP printer
    Network { host: String, port: u16 },
    /// OS print driver (USB-attached), addressed by its system name
    LocalDriver { identifier: String },
}

impl fmt::Display for PrinterTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrinterTransport::Network { host, port } => write!(f, "{}:{}", host, port),
            PrinterTransport::LocalDriver { identifier } => write!(f, "driver:{}", identifier),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrinterState {
    Active,
    Inactive,
}

/// A configured printer, ready for routing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterDefinition {
    pub name: String,
    /// Zone / role tag ("Kitchen", "Bar", "Cashier")
    pub zone_tag: Option<String>,
    pub transport: PrinterTransport,
    pub state: PrinterState,
}

impl PrinterDefinition {
    pub fn is_active(&self) -> bool {
        self.state == PrinterState::Active
    }

    /// Case-insensitive match of a job zone against the name or zone tag
    pub fn matches_zone(&self, zone: &str) -> bool {
        let zone = zone.trim().to_lowercase();
        if zone.is_empty() {
            return false;
        }
        self.name.to_lowercase() == zone
            || self
                .zone_tag
                .as_deref()
                .is_some_and(|tag| tag.to_lowercase() == zone)
    }

    /// Build an ad-hoc definition from a bare printer identifier
    ///
    /// Identifiers that look like an address (`192.168.1.50`,
    /// `printer.local:9101`) are network printers; anything else is taken
    /// as an OS driver name. Used for test prints that bypass the registry.
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return None;
        }

        let transport = if identifier.contains('.') || identifier.contains(':') {
            let (host, port) = match identifier.rsplit_once(':') {
                Some((host, port)) => (host, port.parse().ok()?),
                None => (identifier, DEFAULT_PRINTER_PORT),
            };
            PrinterTransport::Network {
                host: host.to_string(),
                port,
            }
        } else {
            PrinterTransport::LocalDriver {
                identifier: identifier.to_string(),
            }
        };

        Some(Self {
            name: identifier.to_string(),
            zone_tag: None,
            transport,
            state: PrinterState::Active,
        })
    }
}

impl fmt::Display for PrinterDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.transport)
    }
}

/// Printer record as returned by the printer configuration endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct PrinterRecord {
    #[serde(default, alias = "nombre")]
    pub name: Option<String>,
    #[serde(default, alias = "zone_tag", alias = "tipo_impresora")]
    pub zone: Option<String>,
    /// "network" | "red" | "tcp" | "usb" | "driver" | "local"
    #[serde(default, alias = "tipo_conexion")]
    pub transport: Option<String>,
    #[serde(default, alias = "ip")]
    pub host: Option<String>,
    #[serde(default, alias = "puerto", deserialize_with = "deserialize_port")]
    pub port: Option<u16>,
    #[serde(default, alias = "driver_uri", alias = "puerto_uri")]
    pub driver: Option<String>,
    /// "active" | "Activa" | anything else
    #[serde(default, alias = "estado")]
    pub state: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PrinterRecordError {
    #[error("printer '{0}' uses network transport but has no host")]
    MissingHost(String),

    #[error("printer '{0}' uses a local driver but has no driver identifier")]
    MissingDriver(String),
}

impl TryFrom<PrinterRecord> for PrinterDefinition {
    type Error = PrinterRecordError;

    fn try_from(record: PrinterRecord) -> Result<Self, Self::Error> {
        let host = non_empty(record.host);
        let driver = non_empty(record.driver);
        let name = non_empty(record.name)
            .or_else(|| host.clone())
            .or_else(|| driver.clone())
            .unwrap_or_default();

        let is_network = match record.transport.as_deref().map(str::trim) {
            Some(kind) if !kind.is_empty() => {
                matches!(kind.to_lowercase().as_str(), "network" | "red" | "tcp")
            }
            // No transport given: an address implies a network printer
            _ => host.is_some(),
        };

        let transport = if is_network {
            PrinterTransport::Network {
                host: host.ok_or_else(|| PrinterRecordError::MissingHost(name.clone()))?,
                port: record.port.unwrap_or(DEFAULT_PRINTER_PORT),
            }
        } else {
            PrinterTransport::LocalDriver {
                identifier: driver.ok_or_else(|| PrinterRecordError::MissingDriver(name.clone()))?,
            }
        };

        let state = match record.state.as_deref().map(|s| s.trim().to_lowercase()) {
            Some(s) if s == "active" || s == "activa" => PrinterState::Active,
            _ => PrinterState::Inactive,
        };

        Ok(PrinterDefinition {
            name,
            zone_tag: non_empty(record.zone),
            transport,
            state,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Ports arrive as numbers or numeric strings; blanks mean "unset"
fn deserialize_port<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u16>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u16),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(port)) => Ok(Some(port)),
        Some(Raw::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse()
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("invalid port: {}", text)))
        }
    }
}
