//! Share CLI commands
//!
//! Listing, settling and exporting the current user's shares.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_share_list;
use crate::error::{PiggyError, PiggyResult};
use crate::export::export_shares_csv;
use crate::models::Caller;
use crate::services::{ExpenseService, ShareService, UserService};
use crate::storage::Storage;

/// Share subcommands
#[derive(Subcommand)]
pub enum ShareCommands {
    /// List your shares, unpaid first
    List,
    /// Mark a share of an expense as paid
    Pay {
        /// Expense name or ID
        expense: String,
        /// Whose share to settle (defaults to you)
        #[arg(short, long)]
        user: Option<String>,
    },
    /// Export your shares to CSV
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Handle a share command
pub fn handle_share_command(
    storage: &Storage,
    settings: &Settings,
    caller: &Caller,
    cmd: ShareCommands,
) -> PiggyResult<()> {
    let service = ShareService::from_storage(storage);

    match cmd {
        ShareCommands::List => {
            let details = service.my_shares(caller)?;
            println!("{}", format_share_list(&details));
        }

        ShareCommands::Pay { expense, user } => {
            let acting = caller.require()?;
            let expense = ExpenseService::from_storage(storage, settings).find(&expense)?;

            let user_id = match user {
                Some(username) => UserService::from_storage(storage)
                    .get_by_username(&username)?
                    .id,
                None => acting.id,
            };

            let share = service.pay(caller, expense.id, user_id)?;
            println!("Paid {} for {}", share.amount, expense.name);
        }

        ShareCommands::Export { output } => {
            let details = service.my_shares(caller)?;

            let file = File::create(&output).map_err(|e| {
                PiggyError::Export(format!("Failed to create {}: {}", output.display(), e))
            })?;
            let count = export_shares_csv(&details, BufWriter::new(file))?;

            println!("Exported {} share(s) to {}", count, output.display());
        }
    }

    Ok(())
}
