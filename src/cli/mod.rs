//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.
//! Every handler receives the resolved `Caller` explicitly.

pub mod expense;
pub mod household;
pub mod report;
pub mod share;
pub mod user;

pub use expense::{handle_expense_command, ExpenseCommands};
pub use household::{handle_household_command, HouseholdCommands};
pub use report::{handle_report_command, ReportCommands};
pub use share::{handle_share_command, ShareCommands};
pub use user::{handle_user_command, UserCommands};
