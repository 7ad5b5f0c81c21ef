//! Ticket renderer
//!
//! Turns a [`TicketPayload`] into either an ESC/POS byte stream (thermal
//! printers) or a printable HTML page (browser runtime). Both outputs show
//! the same blocks in the same order, and every amount goes through the same
//! [`MoneyFormat`], so a receipt reads identically on paper and on screen.
//!
//! Rendering is pure: the only clock input is [`RenderContext::printed_at`].

mod binary;
mod document;
mod money;

pub use money::{MoneyFormat, format_quantity, round_amount};

use chrono::NaiveDateTime;
use shared::{ReceiptTicket, StoreConfig, TicketPayload};

/// Banner printed above a receipt that was already printed once
pub const REPRINT_BANNER: &str = "*** REPRINT ***";

/// Layout settings, fixed for the process lifetime
#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// Characters per line (48 for 80mm paper)
    pub paper_width: usize,
    /// Item names are cut to this many characters on receipts
    pub item_name_width: usize,
    pub money: MoneyFormat,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            paper_width: 48,
            item_name_width: 20,
            money: MoneyFormat::default(),
        }
    }
}

/// Per-ticket inputs that are not part of the payload
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub store: &'a StoreConfig,
    pub printed_at: NaiveDateTime,
}

impl<'a> RenderContext<'a> {
    pub fn new(store: &'a StoreConfig, printed_at: NaiveDateTime) -> Self {
        Self { store, printed_at }
    }

    /// Print timestamp, honoring the store's date/time display options
    pub fn timestamp(&self) -> Option<String> {
        let options = self.store.options;
        let pattern = match (options.show_date, options.show_time) {
            (true, true) => "%d-%m-%Y %H:%M",
            (true, false) => "%d-%m-%Y",
            (false, true) => "%H:%M",
            (false, false) => return None,
        };
        Some(self.printed_at.format(pattern).to_string())
    }
}

/// Output format a runtime can deliver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    EscPos,
    Html,
}

/// A rendered ticket, ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedDocument {
    Binary(Vec<u8>),
    Html(String),
}

#[derive(Debug, Clone, Default)]
pub struct TicketRenderer {
    settings: RenderSettings,
}

impl TicketRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// ESC/POS bytes for a thermal printer
    pub fn render_binary(&self, payload: &TicketPayload, ctx: &RenderContext<'_>) -> Vec<u8> {
        match payload {
            TicketPayload::Receipt(ticket) => binary::receipt(&self.settings, ticket, ctx),
            TicketPayload::Kitchen(ticket) => binary::kitchen(&self.settings, ticket),
        }
    }

    /// Standalone HTML page with 80mm print styles
    pub fn render_document(&self, payload: &TicketPayload, ctx: &RenderContext<'_>) -> String {
        match payload {
            TicketPayload::Receipt(ticket) => document::receipt(&self.settings, ticket, ctx),
            TicketPayload::Kitchen(ticket) => document::kitchen(ticket),
        }
    }

    pub fn render(
        &self,
        payload: &TicketPayload,
        ctx: &RenderContext<'_>,
        format: OutputFormat,
    ) -> RenderedDocument {
        match format {
            OutputFormat::EscPos => RenderedDocument::Binary(self.render_binary(payload, ctx)),
            OutputFormat::Html => RenderedDocument::Html(self.render_document(payload, ctx)),
        }
    }
}

/// Server name, unless hidden by the store or blank
fn server_line<'t>(ticket: &'t ReceiptTicket, ctx: &RenderContext<'_>) -> Option<&'t str> {
    if !ctx.store.options.show_server {
        return None;
    }
    ticket
        .server_name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// "{preparer} - {timestamp}", or whichever half is present
fn kitchen_subtitle(preparer: Option<&str>, timestamp: Option<&str>) -> Option<String> {
    let preparer = preparer.map(str::trim).filter(|s| !s.is_empty());
    let timestamp = timestamp.map(str::trim).filter(|s| !s.is_empty());
    match (preparer, timestamp) {
        (Some(p), Some(t)) => Some(format!("{} - {}", p, t)),
        (Some(p), None) => Some(p.to_string()),
        (None, Some(t)) => Some(t.to_string()),
        (None, None) => None,
    }
}
