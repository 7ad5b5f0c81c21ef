//! # print-agent
//!
//! ```bash
//! # Print queued jobs until Ctrl-C
//! print-agent run
//!
//! # Receipt on the cashier printer, or on an explicit one
//! print-agent print-receipt order.json
//! print-agent print-receipt order.json --printer 192.168.1.50
//!
//! # Kitchen ticket again on a zone
//! print-agent reprint ticket.json --zone Kitchen
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use comanda_client::{HttpPosApi, PosApi};
use print_agent::printing::PrintingResult;
use print_agent::{
    BackgroundTasks, Config, JobPoller, PrintCapability, PrintInvoker, PrintOutcome, TicketRenderer,
    print_banner, setup_environment,
};
use serde::de::DeserializeOwned;
use shared::{KitchenTicket, ReceiptTicket};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Comanda print agent
#[derive(Parser, Debug)]
#[command(name = "print-agent")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Poll the print queue until interrupted
    Run,

    /// Print a customer receipt from a JSON file
    PrintReceipt {
        file: PathBuf,

        /// Printer identifier (IP address or OS printer name), skips zone lookup
        #[arg(long)]
        printer: Option<String>,
    },

    /// Print a kitchen ticket from a JSON file again
    Reprint {
        file: PathBuf,

        /// Zone to print on
        #[arg(long)]
        zone: String,
    },

    /// Open the cash drawer on the cashier printer
    OpenDrawer,

    /// List printers installed on this machine
    ListPrinters,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = setup_environment();

    let api: Arc<dyn PosApi> = Arc::new(HttpPosApi::new(&config.client_config())?);
    let renderer = Arc::new(TicketRenderer::new(config.render_settings()));
    let capability = PrintCapability::from_config(&config);
    tracing::debug!(runtime = ?config.runtime, api = %config.api_base_url, "Configuration loaded");

    let invoker = || {
        PrintInvoker::new(
            api.clone(),
            renderer.clone(),
            capability.clone(),
            config.receipt_zones.clone(),
        )
    };

    match cli.command {
        Commands::Run => run(&config, api.clone(), renderer.clone(), &capability).await,
        Commands::PrintReceipt { file, printer } => {
            let ticket: ReceiptTicket = read_json(&file)?;
            let result = match printer {
                Some(identifier) => invoker().print_receipt_to(&ticket, &identifier).await,
                None => invoker().print_receipt(&ticket).await,
            };
            report(result)
        }
        Commands::Reprint { file, zone } => {
            let ticket: KitchenTicket = read_json(&file)?;
            report(invoker().reprint_kitchen(&ticket, &zone).await)
        }
        Commands::OpenDrawer => report(invoker().open_cash_drawer().await),
        Commands::ListPrinters => {
            let printers = invoker()
                .list_system_printers()
                .await
                .context("listing system printers")?;
            if printers.is_empty() {
                println!("No printers found");
            }
            for name in printers {
                println!("{}", name);
            }
            Ok(())
        }
    }
}

async fn run(
    config: &Config,
    api: Arc<dyn PosApi>,
    renderer: Arc<TicketRenderer>,
    capability: &PrintCapability,
) -> anyhow::Result<()> {
    print_banner();
    tracing::info!("Comanda print agent starting...");

    let mut tasks = BackgroundTasks::new();
    if let Some(handle) = JobPoller::spawn(
        api,
        renderer,
        capability,
        config.poll_interval(),
        tasks.shutdown_token(),
    ) {
        tasks.register("print_poller", handle);
    }

    tokio::signal::ctrl_c()
        .await
        .context("waiting for Ctrl-C")?;

    tasks.shutdown(config.printer_timeout() + Duration::from_secs(5)).await;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Print the outcome; failures become the alert text
fn report(result: PrintingResult<PrintOutcome>) -> anyhow::Result<()> {
    match result {
        Ok(PrintOutcome::Printed { printer }) => {
            println!("Printed on {}", printer);
            Ok(())
        }
        Ok(PrintOutcome::Spooled { path }) => {
            println!("Document ready for printing: {}", path.display());
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Print failed");
            anyhow::bail!(e.user_message())
        }
    }
}
