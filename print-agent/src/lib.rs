//! Comanda Print Agent - ticket printing for the POS
//!
//! # Overview
//!
//! - **Queue printing** (`printing::poller`): polls the remote print queue
//!   and prints each pending job on its zone printer
//! - **Interactive printing** (`printing::invoker`): receipts, kitchen
//!   reprints and the cash drawer
//! - **Rendering** (`printing::renderer`): ESC/POS bytes or printable HTML
//!   from the same ticket data
//! - **Transport** (`printing::bridge`): raw TCP and OS driver printing
//!
//! # Module layout
//!
//! ```text
//! print-agent/src/
//! ├── core/          # config, runtime capability, background tasks
//! ├── printing/      # resolver, renderer, bridge, poller, invoker
//! └── utils/         # logging
//! ```

pub mod core;
pub mod printing;
pub mod utils;

pub use core::{BackgroundTasks, Config, PrintCapability, PrintRuntime};
pub use printing::{JobPoller, PrintInvoker, PrintOutcome, PrintingError, TicketRenderer};
pub use utils::logger::init_logger_with_file;

/// Load `.env`, read the configuration and start logging
pub fn setup_environment() -> Config {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    if dotenv_loaded {
        tracing::debug!("Loaded environment from .env");
    }
    config
}

pub fn print_banner() {
    println!(
        r#"
  ___                              _
 / __|___ _ __  __ _ _ _  __| |__ _
| (__/ _ \ '  \/ _` | ' \/ _` / _` |
 \___\___/_|_|_\__,_|_||_\__,_\__,_|
        print agent
    "#
    );
}
