//! Report rendering
//!
//! Turns a generated `Report` into a document in the reports directory,
//! stored under the report's file name.

use std::fs;
use std::path::PathBuf;

use crate::error::{PiggyError, PiggyResult};
use crate::models::Report;
use crate::storage::write_bytes_atomic;

use super::pdf::{Font, PdfPage};

/// Writes report documents and locates them again for download
pub trait ReportRenderer {
    /// Render the report and return where the document was written
    fn render(&self, report: &Report) -> PiggyResult<PathBuf>;

    /// Where the document for `file_name` lives
    fn path_for(&self, file_name: &str) -> PathBuf;

    /// Delete a rendered document; a missing file is not an error
    fn discard(&self, file_name: &str) -> PiggyResult<()>;
}

/// Renders one-page PDF reports
pub struct PdfReportRenderer {
    reports_dir: PathBuf,
    currency_symbol: String,
}

impl PdfReportRenderer {
    pub fn new(reports_dir: PathBuf) -> Self {
        Self {
            reports_dir,
            currency_symbol: String::new(),
        }
    }

    /// Prefix for the total line, e.g. "$" or "£"
    pub fn with_currency(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    /// Build the PDF page for a report
    pub fn page(&self, report: &Report) -> PdfPage {
        PdfPage::new()
            .line(Font::Bold, 16.0, 16.0, "Expense Report")
            .line(
                Font::Regular,
                12.0,
                34.0,
                format!(
                    "Period: {} - {}",
                    report.start_date().format("%d.%m.%Y"),
                    report.end_date().format("%d.%m.%Y")
                ),
            )
            .line(
                Font::Regular,
                12.0,
                22.7,
                format!(
                    "Total expenses: {}",
                    report.total.format_with_symbol(&self.currency_symbol)
                ),
            )
            .line(
                Font::Regular,
                12.0,
                22.7,
                format!("Payment status: {}", report.payment_status),
            )
    }
}

impl ReportRenderer for PdfReportRenderer {
    fn render(&self, report: &Report) -> PiggyResult<PathBuf> {
        let path = self.path_for(&report.file_name);
        let bytes = self.page(report).to_bytes();

        write_bytes_atomic(&path, &bytes)
            .map_err(|e| PiggyError::Render(format!("{}: {}", report.file_name, e)))?;

        tracing::debug!(path = %path.display(), bytes = bytes.len(), "report rendered");
        Ok(path)
    }

    fn path_for(&self, file_name: &str) -> PathBuf {
        self.reports_dir.join(file_name)
    }

    fn discard(&self, file_name: &str) -> PiggyResult<()> {
        let path = self.path_for(file_name);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PiggyError::Io(format!(
                "Failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}
