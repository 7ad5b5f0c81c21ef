//! # comanda-printer
//!
//! ESC/POS thermal printer library - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - ESC/POS command building
//! - Single-byte codepage encoding (WPC1252) for Latin receipt printers
//! - Network printing (raw TCP, port 9100)
//! - OS spooler printing for USB/driver printers (Windows spooler, CUPS)
//!
//! Business logic (WHAT to print) stays in `print-agent`:
//! - Receipt and kitchen ticket layout
//! - Zone routing and job acknowledgment
//!
//! ## Example
//!
//! ```ignore
//! use comanda_printer::{EscPosBuilder, NetworkPrinter, Printer};
//!
//! let mut builder = EscPosBuilder::new(48);
//! builder.center();
//! builder.double_size();
//! builder.line("NEW ORDER");
//! builder.reset_size();
//! builder.sep_single();
//! builder.left();
//! builder.line("2 x Burger");
//! builder.cut();
//!
//! let printer = NetworkPrinter::new("192.168.1.100", 9100)?;
//! printer.print(&builder.build()).await?;
//! ```

mod encoding;
mod error;
mod escpos;
mod printer;

// Re-exports
pub use encoding::{encode_text, text_width, truncate_width};
pub use error::{PrintError, PrintResult};
pub use escpos::EscPosBuilder;
pub use printer::{DEFAULT_PORT, NetworkPrinter, Printer, list_system_printers, print_via_driver};

#[cfg(windows)]
pub use printer::WindowsPrinter;

#[cfg(unix)]
pub use printer::CupsPrinter;
