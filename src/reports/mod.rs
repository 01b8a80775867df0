//! Reports module for PiggyBank
//!
//! Share breakdowns for charts, and rendering of generated period reports
//! into PDF documents.

pub mod breakdown;
pub mod pdf;
pub mod renderer;

pub use breakdown::{Breakdown, BreakdownEntry};
pub use renderer::{PdfReportRenderer, ReportRenderer};
