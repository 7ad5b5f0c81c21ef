use crate::printing::{MoneyFormat, RenderSettings};
use comanda_client::ClientConfig;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Where the agent runs, detected once at start-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrintRuntime {
    /// Native shell: raw TCP and OS driver printing available
    #[default]
    Desktop,
    /// Plain browser: only printable documents
    Browser,
}

impl FromStr for PrintRuntime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "desktop" | "native" => Ok(PrintRuntime::Desktop),
            "browser" | "web" => Ok(PrintRuntime::Browser),
            other => Err(format!("unknown print runtime: {}", other)),
        }
    }
}

/// Agent configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | API_BASE_URL | http://localhost:8000/api | POS API base URL |
/// | API_TOKEN | - | Bearer token |
/// | REQUEST_TIMEOUT_SECS | 30 | API request timeout |
/// | PRINT_RUNTIME | desktop | `desktop` or `browser` |
/// | POLL_INTERVAL_MS | 5000 | Print queue polling period |
/// | PRINTER_TIMEOUT_MS | 5000 | Network printer connect timeout |
/// | PAPER_WIDTH | 48 | Characters per line |
/// | ITEM_NAME_WIDTH | 20 | Receipt item name cut-off |
/// | CURRENCY_SYMBOL | $ | Money prefix |
/// | THOUSANDS_SEPARATOR | . | Digit group separator |
/// | RECEIPT_ZONES | Cashier,Ticket | Zones tried for receipts, in order |
/// | DOCUMENT_SPOOL_DIR | spool | Browser runtime document output |
/// | LOG_LEVEL | info | Log filter when RUST_LOG is unset |
/// | LOG_DIR | - | Daily log files, when the directory exists |
///
/// # Example
///
/// ```ignore
/// API_BASE_URL=http://pos.local/api PRINT_RUNTIME=browser print-agent run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub request_timeout_secs: u64,
    pub runtime: PrintRuntime,
    pub poll_interval_ms: u64,
    pub printer_timeout_ms: u64,
    pub paper_width: usize,
    pub item_name_width: usize,
    pub currency_symbol: String,
    pub thousands_separator: String,
    /// Zones tried, in order, when looking up the receipt printer
    pub receipt_zones: Vec<String>,
    pub document_spool_dir: PathBuf,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset or unparsable values fall back to their defaults.
    pub fn from_env() -> Self {
        Self {
            api_base_url: std::env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8000/api".into()),
            api_token: std::env::var("API_TOKEN").ok().filter(|t| !t.trim().is_empty()),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            runtime: std::env::var("PRINT_RUNTIME")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            poll_interval_ms: positive_millis(std::env::var("POLL_INTERVAL_MS").ok(), 5000),
            printer_timeout_ms: positive_millis(std::env::var("PRINTER_TIMEOUT_MS").ok(), 5000),
            paper_width: std::env::var("PAPER_WIDTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(48),
            item_name_width: std::env::var("ITEM_NAME_WIDTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(20),
            currency_symbol: std::env::var("CURRENCY_SYMBOL").unwrap_or_else(|_| "$".into()),
            thousands_separator: std::env::var("THOUSANDS_SEPARATOR")
                .unwrap_or_else(|_| ".".into()),
            receipt_zones: parse_zones(
                &std::env::var("RECEIPT_ZONES").unwrap_or_else(|_| "Cashier,Ticket".into()),
            ),
            document_spool_dir: std::env::var("DOCUMENT_SPOOL_DIR")
                .unwrap_or_else(|_| "spool".into())
                .into(),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(&self.api_base_url).with_timeout(self.request_timeout_secs);
        match &self.api_token {
            Some(token) => config.with_token(token),
            None => config,
        }
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            paper_width: self.paper_width,
            item_name_width: self.item_name_width,
            money: MoneyFormat::new(&self.currency_symbol, &self.thousands_separator),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn printer_timeout(&self) -> Duration {
        Duration::from_millis(self.printer_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Unset, unparsable or zero values fall back to `default`
fn positive_millis(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().parse().ok())
        .filter(|ms| *ms > 0)
        .unwrap_or(default)
}

fn parse_zones(raw: &str) -> Vec<String> {
    let zones: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|z| !z.is_empty())
        .map(str::to_string)
        .collect();
    if zones.is_empty() {
        vec!["Cashier".to_string(), "Ticket".to_string()]
    } else {
        zones
    }
}
