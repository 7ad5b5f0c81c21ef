//! Print capability
//!
//! Built once from the detected runtime and injected everywhere printing
//! happens. Nothing else looks at the runtime.

use super::config::{Config, PrintRuntime};
use crate::printing::{
    Dispatcher, DocumentPrinter, HostBridge, NativeBridge, OutputFormat, SpoolDocumentPrinter,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct PrintCapability {
    /// Binary transport; `None` outside the desktop runtime
    pub binary_dispatch: Option<Dispatcher>,
    /// Document printing, always available
    pub native_print: Arc<dyn DocumentPrinter>,
}

impl PrintCapability {
    pub fn from_config(config: &Config) -> Self {
        let native_print: Arc<dyn DocumentPrinter> =
            Arc::new(SpoolDocumentPrinter::new(config.document_spool_dir.clone()));
        match config.runtime {
            PrintRuntime::Desktop => Self::desktop(
                Arc::new(NativeBridge::new(config.printer_timeout())),
                native_print,
            ),
            PrintRuntime::Browser => Self::browser(native_print),
        }
    }

    pub fn desktop(bridge: Arc<dyn HostBridge>, native_print: Arc<dyn DocumentPrinter>) -> Self {
        Self {
            binary_dispatch: Some(Dispatcher::new(bridge)),
            native_print,
        }
    }

    pub fn browser(native_print: Arc<dyn DocumentPrinter>) -> Self {
        Self {
            binary_dispatch: None,
            native_print,
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        if self.binary_dispatch.is_some() {
            OutputFormat::EscPos
        } else {
            OutputFormat::Html
        }
    }
}
