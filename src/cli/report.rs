//! Report CLI commands

use std::path::PathBuf;

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_report_details, format_report_list};
use crate::error::{PiggyError, PiggyResult};
use crate::models::Caller;
use crate::reports::PdfReportRenderer;
use crate::services::{ReportRequest, ReportService};
use crate::storage::Storage;

/// Report subcommands
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Generate a PDF report of your shares over a period
    Generate {
        /// First day of the period (YYYY-MM-DD)
        #[arg(short, long)]
        start: String,
        /// Last day of the period, inclusive (YYYY-MM-DD)
        #[arg(short, long)]
        end: String,
        /// all, paid or unpaid
        #[arg(long, default_value = "all")]
        status: String,
    },
    /// List your generated reports
    List,
    /// Fetch one of your reports by file name
    Download {
        /// Report file name
        file: String,
        /// Copy the PDF to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle a report command
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    caller: &Caller,
    cmd: ReportCommands,
) -> PiggyResult<()> {
    let renderer = PdfReportRenderer::new(storage.paths().reports_dir())
        .with_currency(settings.currency_symbol.clone());
    let service = ReportService::from_storage(storage, &renderer);

    match cmd {
        ReportCommands::Generate { start, end, status } => {
            let report = service.generate(caller, &ReportRequest::new(start, end, status))?;
            print!("{}", format_report_details(&report, &settings.currency_symbol));
        }

        ReportCommands::List => {
            let reports = service.list(caller)?;
            println!("{}", format_report_list(&reports).trim_end());
        }

        ReportCommands::Download { file, output } => {
            let found = service.download(caller, &file)?;

            match output {
                Some(dest) => {
                    std::fs::copy(&found.path, &dest).map_err(|e| {
                        PiggyError::Io(format!("Failed to copy report to {}: {}", dest.display(), e))
                    })?;
                    println!("Saved {} to {}", found.report.file_name, dest.display());
                }
                None => println!("{}", found.path.display()),
            }
        }
    }

    Ok(())
}
