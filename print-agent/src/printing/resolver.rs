//! Printer registry resolver
//!
//! Maps a logical zone to a concrete printer. The registry is read from the
//! POS API on every call, so configuration changes apply to the next job
//! without a restart.

use super::error::{PrintingError, PrintingResult};
use comanda_client::PosApi;
use shared::PrinterDefinition;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct PrinterResolver {
    api: Arc<dyn PosApi>,
}

impl PrinterResolver {
    pub fn new(api: Arc<dyn PosApi>) -> Self {
        Self { api }
    }

    /// Resolve a single zone
    pub async fn resolve(&self, zone: &str, allow_fallback: bool) -> PrintingResult<PrinterDefinition> {
        self.resolve_any(&[zone], allow_fallback).await
    }

    /// Try each zone in order, then optionally the first active printer
    ///
    /// One registry read covers every attempt.
    pub async fn resolve_any<S: AsRef<str>>(
        &self,
        zones: &[S],
        allow_fallback: bool,
    ) -> PrintingResult<PrinterDefinition> {
        let requested = zones
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join("/");

        let printers = self.active_printers().await.map_err(|cause| {
            PrintingError::ConfigurationMissing {
                zone: requested.clone(),
                cause: Some(cause),
            }
        })?;

        select_printer(printers, zones, allow_fallback).ok_or_else(|| {
            debug!(zones = %requested, allow_fallback, "No printer matched");
            PrintingError::not_found(requested)
        })
    }

    /// Fresh read of the registry, keeping active and usable printers
    async fn active_printers(&self) -> Result<Vec<PrinterDefinition>, String> {
        let records = self.api.printers().await.map_err(|e| e.to_string())?;

        Ok(records
            .into_iter()
            .filter_map(|record| match PrinterDefinition::try_from(record) {
                Ok(printer) => Some(printer),
                Err(e) => {
                    warn!(error = %e, "Skipping unusable printer record");
                    None
                }
            })
            .filter(PrinterDefinition::is_active)
            .collect())
    }
}

/// Pick a printer from the active list: first zone match wins, in zone order
fn select_printer<S: AsRef<str>>(
    printers: Vec<PrinterDefinition>,
    zones: &[S],
    allow_fallback: bool,
) -> Option<PrinterDefinition> {
    let matched = zones
        .iter()
        .find_map(|zone| printers.iter().position(|p| p.matches_zone(zone.as_ref())));

    match matched {
        Some(index) => printers.into_iter().nth(index),
        None if allow_fallback => printers.into_iter().next(),
        None => None,
    }
}
