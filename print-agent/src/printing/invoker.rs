//! Interactive printing
//!
//! Prints requested directly by the operator, outside the queue. Unlike the
//! poller, errors are returned to the caller so they can be shown.

use super::error::{BridgeError, PrintingError, PrintingResult};
use super::poller::load_store_config;
use super::renderer::{RenderContext, RenderedDocument, TicketRenderer};
use super::resolver::PrinterResolver;
use crate::core::PrintCapability;
use comanda_client::PosApi;
use comanda_printer::EscPosBuilder;
use shared::{KitchenTicket, PrinterDefinition, ReceiptTicket, TicketPayload};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument};

/// Where an interactive print ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintOutcome {
    /// Sent to a printer
    Printed { printer: String },
    /// Handed to the document printer for the print dialog
    Spooled { path: PathBuf },
}

/// How to pick the printer for a binary ticket
enum Target<'a> {
    Zones { zones: &'a [String], allow_fallback: bool },
    Explicit(PrinterDefinition),
}

pub struct PrintInvoker {
    api: Arc<dyn PosApi>,
    resolver: PrinterResolver,
    renderer: Arc<TicketRenderer>,
    capability: PrintCapability,
    receipt_zones: Vec<String>,
}

impl PrintInvoker {
    pub fn new(
        api: Arc<dyn PosApi>,
        renderer: Arc<TicketRenderer>,
        capability: PrintCapability,
        receipt_zones: Vec<String>,
    ) -> Self {
        Self {
            resolver: PrinterResolver::new(api.clone()),
            api,
            renderer,
            capability,
            receipt_zones,
        }
    }

    /// Print a customer receipt on the cashier printer
    ///
    /// Tries each receipt zone in order, then any active printer.
    #[instrument(skip(self, ticket), fields(order_id = %ticket.order_id))]
    pub async fn print_receipt(&self, ticket: &ReceiptTicket) -> PrintingResult<PrintOutcome> {
        let target = Target::Zones {
            zones: &self.receipt_zones,
            allow_fallback: true,
        };
        self.deliver(&TicketPayload::Receipt(ticket.clone()), target).await
    }

    /// Test print a receipt on an explicit printer, bypassing the registry
    #[instrument(skip(self, ticket), fields(order_id = %ticket.order_id))]
    pub async fn print_receipt_to(&self, ticket: &ReceiptTicket, identifier: &str) -> PrintingResult<PrintOutcome> {
        let printer = PrinterDefinition::from_identifier(identifier)
            .ok_or_else(|| PrintingError::not_found(identifier))?;
        self.deliver(&TicketPayload::Receipt(ticket.clone()), Target::Explicit(printer))
            .await
    }

    /// Print a kitchen ticket again, on its zone or any active printer
    #[instrument(skip(self, ticket))]
    pub async fn reprint_kitchen(&self, ticket: &KitchenTicket, zone: &str) -> PrintingResult<PrintOutcome> {
        let zones = [zone.to_string()];
        let target = Target::Zones {
            zones: &zones,
            allow_fallback: true,
        };
        self.deliver(&TicketPayload::Kitchen(ticket.clone()), target).await
    }

    /// Kick the cash drawer wired to the cashier printer
    #[instrument(skip(self))]
    pub async fn open_cash_drawer(&self) -> PrintingResult<PrintOutcome> {
        let Some(dispatcher) = &self.capability.binary_dispatch else {
            return Err(PrintingError::DesktopOnly("opening the cash drawer".into()));
        };

        let printer = self.resolver.resolve_any(&self.receipt_zones, true).await?;
        let mut builder = EscPosBuilder::default();
        builder.open_drawer();
        dispatcher.dispatch(&printer, &builder.build()).await?;

        info!(printer = %printer.name, "Cash drawer opened");
        Ok(PrintOutcome::Printed {
            printer: printer.name,
        })
    }

    /// Printers installed on this machine; empty without a host bridge
    pub async fn list_system_printers(&self) -> Result<Vec<String>, BridgeError> {
        match &self.capability.binary_dispatch {
            Some(dispatcher) => dispatcher.bridge().list_system_printers().await,
            None => Ok(Vec::new()),
        }
    }

    async fn deliver(&self, payload: &TicketPayload, target: Target<'_>) -> PrintingResult<PrintOutcome> {
        let store = load_store_config(self.api.as_ref()).await;
        let ctx = RenderContext::new(&store, chrono::Local::now().naive_local());

        // Documents go through the print dialog; only binary output needs a printer
        let printer = match (&self.capability.binary_dispatch, target) {
            (None, _) => None,
            (Some(_), Target::Explicit(printer)) => Some(printer),
            (Some(_), Target::Zones { zones, allow_fallback }) => {
                Some(self.resolver.resolve_any(zones, allow_fallback).await?)
            }
        };

        match self.renderer.render(payload, &ctx, self.capability.output_format()) {
            RenderedDocument::Binary(bytes) => {
                let (Some(dispatcher), Some(printer)) = (&self.capability.binary_dispatch, printer) else {
                    return Err(PrintingError::DesktopOnly("binary printing".into()));
                };
                dispatcher.dispatch(&printer, &bytes).await?;
                info!(printer = %printer.name, ticket = %payload.label(), "Ticket printed");
                Ok(PrintOutcome::Printed {
                    printer: printer.name,
                })
            }
            RenderedDocument::Html(html) => {
                let path = self
                    .capability
                    .native_print
                    .print_document(&payload.label(), &html)
                    .await?;
                Ok(PrintOutcome::Spooled { path })
            }
        }
    }
}
