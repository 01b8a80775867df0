//! Export module for PiggyBank
//!
//! CSV export of a user's expense shares, for spreadsheets.

pub mod csv;

pub use self::csv::export_shares_csv;
