//! Native document printing
//!
//! In the browser runtime there is no binary transport; tickets are handed
//! over as HTML documents that open the print dialog as soon as they load.

use super::error::DocumentError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

/// Script that triggers the print dialog once the document is loaded
const AUTO_PRINT: &str = "<script>window.onload = function () { window.focus(); window.print(); };</script>";

#[async_trait]
pub trait DocumentPrinter: Send + Sync {
    /// Hand over an HTML document for printing, returning where it went
    async fn print_document(&self, label: &str, html: &str) -> Result<PathBuf, DocumentError>;
}

/// Writes auto-printing documents into a spool directory watched by the
/// shell's webview
#[derive(Debug, Clone)]
pub struct SpoolDocumentPrinter {
    dir: PathBuf,
}

impl SpoolDocumentPrinter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl DocumentPrinter for SpoolDocumentPrinter {
    async fn print_document(&self, label: &str, html: &str) -> Result<PathBuf, DocumentError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S%3f");
        let path = self.dir.join(format!("{}-{}.html", file_stem(label), stamp));
        tokio::fs::write(&path, with_auto_print(html)).await?;

        info!(path = %path.display(), "Document spooled for printing");
        Ok(path)
    }
}

fn with_auto_print(html: &str) -> String {
    match html.rfind("</body>") {
        Some(at) => format!("{}{}\n{}", &html[..at], AUTO_PRINT, &html[at..]),
        None => format!("{}{}", html, AUTO_PRINT),
    }
}

fn file_stem(label: &str) -> String {
    let stem: String = label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    if stem.is_empty() { "ticket".to_string() } else { stem }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_print_injected_before_body_end() {
        let html = with_auto_print("<html><body><p>x</p></body></html>");
        assert!(html.contains("window.print()"));
        assert!(html.find("window.print()").unwrap() < html.find("</body>").unwrap());
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("receipt-1001"), "receipt-1001");
        assert_eq!(file_stem("kitchen-Mesa 5/A"), "kitchen-Mesa_5_A");
        assert_eq!(file_stem(""), "ticket");
    }

    #[tokio::test]
    async fn test_spool_writes_document() {
        let dir = tempfile::tempdir().unwrap();
        let printer = SpoolDocumentPrinter::new(dir.path().join("spool"));

        let path = printer
            .print_document("receipt-7", "<html><body>hi</body></html>")
            .await
            .unwrap();

        assert!(path.starts_with(printer.dir()));
        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(written.contains("hi"));
        assert!(written.contains("window.print()"));
    }
}
