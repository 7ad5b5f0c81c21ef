//! Ticket Printing Module
//!
//! - Queue printing: the poller prints pending jobs on their zone printer
//!   and acknowledges them
//! - Interactive printing: receipts, kitchen reprints and the cash drawer,
//!   with errors surfaced to the operator
//!
//! Rendering is pure and shared by both paths; bytes reach printers only
//! through the [`HostBridge`].

pub mod bridge;
pub mod dispatcher;
pub mod document;
pub mod error;
pub mod invoker;
pub mod poller;
pub mod renderer;
pub mod resolver;

pub use bridge::{HostBridge, NativeBridge, decode_payload, encode_payload};
pub use dispatcher::Dispatcher;
pub use document::{DocumentPrinter, SpoolDocumentPrinter};
pub use error::{BridgeError, DispatchError, DocumentError, PrintingError, PrintingResult};
pub use invoker::{PrintInvoker, PrintOutcome};
pub use poller::{JobPoller, PollSummary};
pub use renderer::{
    MoneyFormat, OutputFormat, REPRINT_BANNER, RenderContext, RenderSettings, RenderedDocument,
    TicketRenderer,
};
pub use resolver::PrinterResolver;
