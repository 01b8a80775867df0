//! CSV Export functionality
//!
//! Exports a user's shares, one row per share, with the expense and
//! household they belong to.

use std::io::Write;

use serde::Serialize;

use crate::error::{PiggyError, PiggyResult};
use crate::models::ShareDetail;

#[derive(Serialize)]
struct ShareRow<'a> {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Expense")]
    expense: &'a str,
    #[serde(rename = "Household")]
    household: &'a str,
    #[serde(rename = "Category")]
    category: &'static str,
    #[serde(rename = "Expense Amount")]
    expense_amount: String,
    #[serde(rename = "Share")]
    share: String,
    #[serde(rename = "Paid")]
    paid: bool,
    #[serde(rename = "Paid At")]
    paid_at: String,
}

impl<'a> From<&'a ShareDetail> for ShareRow<'a> {
    fn from(detail: &'a ShareDetail) -> Self {
        Self {
            date: detail.expense.created_at.format("%Y-%m-%d").to_string(),
            expense: &detail.expense.name,
            household: &detail.household_name,
            category: detail.expense.category.as_str(),
            expense_amount: detail.expense.amount.to_string(),
            share: detail.share.amount.to_string(),
            paid: detail.share.paid,
            paid_at: detail
                .share
                .paid_at
                .map(|at| at.to_rfc3339())
                .unwrap_or_default(),
        }
    }
}

/// Export shares to CSV; returns the number of rows written
pub fn export_shares_csv<W: Write>(details: &[ShareDetail], writer: W) -> PiggyResult<usize> {
    let mut csv_writer = ::csv::Writer::from_writer(writer);

    if details.is_empty() {
        csv_writer
            .write_record([
                "Date",
                "Expense",
                "Household",
                "Category",
                "Expense Amount",
                "Share",
                "Paid",
                "Paid At",
            ])
            .map_err(|e| PiggyError::Export(e.to_string()))?;
    }

    for detail in details {
        csv_writer
            .serialize(ShareRow::from(detail))
            .map_err(|e| PiggyError::Export(e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| PiggyError::Export(e.to_string()))?;

    Ok(details.len())
}
