//! Expense CLI commands

use std::str::FromStr;

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_breakdown, format_expense_created, format_expense_list};
use crate::error::PiggyResult;
use crate::models::{Caller, ExpenseForm};
use crate::services::{ChartMode, ExpenseService, MembershipService, ShareService};
use crate::storage::Storage;

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Add an expense and split it among the household's members
    Add {
        /// Expense name, unique across all households
        name: String,
        /// Amount (e.g., "100.00" or "100")
        amount: String,
        /// Category (food, rent, utilities, transport, entertainment, health, shopping, other)
        #[arg(short, long, default_value = "other")]
        category: String,
        /// Household name or ID
        #[arg(short = 'H', long)]
        household: String,
    },
    /// List a household's expenses
    List {
        /// Household name or ID
        #[arg(short = 'H', long)]
        household: String,
    },
    /// Chart your shares by household, category or status
    Chart {
        /// household, category or status
        #[arg(default_value = "status")]
        mode: String,
    },
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    caller: &Caller,
    cmd: ExpenseCommands,
) -> PiggyResult<()> {
    let service = ExpenseService::from_storage(storage, settings);

    match cmd {
        ExpenseCommands::Add {
            name,
            amount,
            category,
            household,
        } => {
            let found = MembershipService::from_storage(storage).find_household(&household)?;
            let form = ExpenseForm::new(name, amount, category);
            let created = service.create(caller, &form, found.id)?;
            print!("{}", format_expense_created(&created));
        }

        ExpenseCommands::List { household } => {
            let found = MembershipService::from_storage(storage).find_household(&household)?;
            let expenses = service.list_for_household(found.id)?;
            println!("{}", format_expense_list(&expenses).trim_end());
        }

        ExpenseCommands::Chart { mode } => {
            let mode = ChartMode::from_str(&mode)?;
            let breakdown = ShareService::from_storage(storage).chart(caller, mode)?;
            print!("{}", format_breakdown(&format!("Shares by {}", mode), &breakdown));
        }
    }

    Ok(())
}
