//! Display formatting for terminal output
//!
//! Formats households, expenses, shares and reports for the command line.

pub mod expense;
pub mod household;
pub mod report;
pub mod share;

pub use expense::{format_expense_created, format_expense_list};
pub use household::{format_household_created, format_household_list, format_member_list};
pub use report::{format_breakdown, format_report_details, format_report_list};
pub use share::format_share_list;
