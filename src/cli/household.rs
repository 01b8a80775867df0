//! Household CLI commands
//!
//! Creating households, listing them and managing their members.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{
    format_expense_list, format_household_created, format_household_list, format_member_list,
};
use crate::error::PiggyResult;
use crate::models::Caller;
use crate::services::{ExpenseService, MembershipService};
use crate::storage::Storage;

/// Household subcommands
#[derive(Subcommand)]
pub enum HouseholdCommands {
    /// Create a household owned by the current user
    Create {
        /// Household name
        name: String,
        /// Optional description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Username to add as a member (repeatable)
        #[arg(short, long = "member")]
        members: Vec<String>,
    },
    /// List the households the current user belongs to
    List,
    /// Show a household's members
    Members {
        /// Household name or ID
        household: String,
    },
    /// Add a member to a household you own
    AddMember {
        /// Household name or ID
        household: String,
        /// Username to add
        username: String,
    },
    /// List a household's expenses
    Expenses {
        /// Household name or ID
        household: String,
    },
}

/// Handle a household command
pub fn handle_household_command(
    storage: &Storage,
    settings: &Settings,
    caller: &Caller,
    cmd: HouseholdCommands,
) -> PiggyResult<()> {
    let service = MembershipService::from_storage(storage);

    match cmd {
        HouseholdCommands::Create {
            name,
            description,
            members,
        } => {
            let created = service.create_household(caller, &name, &description, &members)?;
            print!("{}", format_household_created(&created));
        }

        HouseholdCommands::List => {
            let user = caller.require()?;
            let households = service.households_for_user(user.id)?;
            println!("{}", format_household_list(&households).trim_end());
        }

        HouseholdCommands::Members { household } => {
            let found = service.find_household(&household)?;
            let members = service.member_details(found.id)?;
            println!("{}", format_member_list(&members).trim_end());
        }

        HouseholdCommands::AddMember {
            household,
            username,
        } => {
            let found = service.find_household(&household)?;
            service.add_member(caller, found.id, &username)?;
            println!("Added {} to {}", username.trim(), found.name);
        }

        HouseholdCommands::Expenses { household } => {
            let found = service.find_household(&household)?;
            let expenses = ExpenseService::from_storage(storage, settings)
                .list_for_household(found.id)?;
            println!("Expenses for {}:", found.name);
            println!("{}", format_expense_list(&expenses).trim_end());
        }
    }

    Ok(())
}
