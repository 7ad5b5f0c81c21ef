//! Print queue poller
//!
//! Every tick fetches the pending jobs, prints them one at a time in queue
//! order and acknowledges each job once its bytes reached the printer.
//! A job that fails at any step is left pending and comes back on the next
//! tick, so delivery is at-least-once: a printer that drops the connection
//! after accepting the data may print the same ticket twice.

use super::dispatcher::Dispatcher;
use super::error::{PrintingError, PrintingResult};
use super::renderer::{RenderContext, TicketRenderer};
use super::resolver::PrinterResolver;
use crate::core::PrintCapability;
use comanda_client::PosApi;
use shared::{PrintJob, StoreConfig, TicketPayload};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

/// Counts for one polling cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollSummary {
    pub fetched: usize,
    pub printed: usize,
    /// Jobs without content, left pending
    pub skipped: usize,
    /// Jobs that failed somewhere and stay pending
    pub failed: usize,
}

enum JobOutcome {
    Printed,
    Skipped,
}

pub struct JobPoller {
    api: Arc<dyn PosApi>,
    resolver: PrinterResolver,
    renderer: Arc<TicketRenderer>,
    dispatcher: Dispatcher,
    interval: Duration,
}

impl JobPoller {
    pub fn new(
        api: Arc<dyn PosApi>,
        renderer: Arc<TicketRenderer>,
        dispatcher: Dispatcher,
        interval: Duration,
    ) -> Self {
        Self {
            resolver: PrinterResolver::new(api.clone()),
            api,
            renderer,
            dispatcher,
            interval,
        }
    }

    /// Poller for the given capability, if it can print binary tickets
    pub fn for_capability(
        api: Arc<dyn PosApi>,
        renderer: Arc<TicketRenderer>,
        capability: &PrintCapability,
        interval: Duration,
    ) -> Option<Self> {
        let dispatcher = capability.binary_dispatch.clone()?;
        Some(Self::new(api, renderer, dispatcher, interval))
    }

    /// Start polling in the background
    ///
    /// Returns `None` outside the desktop runtime, where queue jobs are
    /// printed by a machine that has the printers attached.
    pub fn spawn(
        api: Arc<dyn PosApi>,
        renderer: Arc<TicketRenderer>,
        capability: &PrintCapability,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> Option<JoinHandle<()>> {
        let Some(poller) = Self::for_capability(api, renderer, capability, interval) else {
            info!("Binary printing unavailable, print queue poller not started");
            return None;
        };
        Some(tokio::spawn(poller.run(shutdown)))
    }

    /// Poll until `shutdown` fires
    ///
    /// The first poll happens one interval after start. A job in progress
    /// always finishes before the loop checks for shutdown again.
    pub async fn run(self, shutdown: CancellationToken) {
        info!(interval_ms = self.interval.as_millis() as u64, "Print queue poller started");

        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Print queue poller received shutdown signal");
                    break;
                }
                _ = ticker.tick() => {
                    let summary = self.poll_once().await;
                    if summary.fetched > 0 {
                        info!(
                            fetched = summary.fetched,
                            printed = summary.printed,
                            skipped = summary.skipped,
                            failed = summary.failed,
                            "Print cycle finished"
                        );
                    }
                }
            }
        }
    }

    /// One polling cycle: fetch, then process every job sequentially
    pub async fn poll_once(&self) -> PollSummary {
        let mut summary = PollSummary::default();

        let jobs = match self.api.pending_jobs().await {
            Ok(jobs) => jobs,
            Err(e) if e.is_unreachable() => {
                debug!(error = %e, "Print queue unreachable");
                return summary;
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch pending print jobs");
                return summary;
            }
        };

        summary.fetched = jobs.len();
        for job in &jobs {
            match self.process_job(job).await {
                Ok(JobOutcome::Printed) => summary.printed += 1,
                Ok(JobOutcome::Skipped) => summary.skipped += 1,
                Err(e) => {
                    error!(job_id = %job.id, zone = %job.zone, error = %e, "Print job failed, left pending");
                    summary.failed += 1;
                }
            }
        }
        summary
    }

    #[instrument(skip(self, job), fields(job_id = %job.id, zone = %job.zone))]
    async fn process_job(&self, job: &PrintJob) -> PrintingResult<JobOutcome> {
        let Some(content) = job.content() else {
            warn!("Print job has no content, skipping");
            return Ok(JobOutcome::Skipped);
        };

        // Queue jobs only go to their own zone
        let printer = self.resolver.resolve(&job.zone, false).await?;

        let payload = TicketPayload::from_job_content(content)
            .map_err(|e| PrintingError::RenderFailure(e.to_string()))?;

        let store = load_store_config(self.api.as_ref()).await;
        let ctx = RenderContext::new(&store, chrono::Local::now().naive_local());
        let bytes = self.renderer.render_binary(&payload, &ctx);

        self.dispatcher.dispatch(&printer, &bytes).await?;

        self.api
            .mark_complete(&job.id)
            .await
            .map_err(|cause| PrintingError::AcknowledgeFailure {
                id: job.id.clone(),
                cause,
            })?;

        info!(printer = %printer.name, ticket = %payload.label(), "Print job completed");
        Ok(JobOutcome::Printed)
    }
}

/// Store decoration, falling back to defaults when unavailable
pub(crate) async fn load_store_config(api: &dyn PosApi) -> StoreConfig {
    match api.ticket_config().await {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "Ticket configuration unavailable, using defaults");
            StoreConfig::default()
        }
    }
}
