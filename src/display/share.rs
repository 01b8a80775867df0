//! Share display formatting
//!
//! Renders the caller's shares as a table, unpaid ones first.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::ShareDetail;

#[derive(Tabled)]
struct ShareRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Expense")]
    expense: String,
    #[tabled(rename = "Household")]
    household: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Share")]
    share: String,
    #[tabled(rename = "Status")]
    status: &'static str,
}

impl From<&ShareDetail> for ShareRow {
    fn from(detail: &ShareDetail) -> Self {
        Self {
            date: detail.expense.created_at.format("%Y-%m-%d").to_string(),
            expense: detail.expense.name.clone(),
            household: detail.household_name.clone(),
            category: detail.expense.category.to_string(),
            share: detail.share.amount.to_string(),
            status: if detail.share.paid { "paid" } else { "unpaid" },
        }
    }
}

/// Format shares as a table
pub fn format_share_list(details: &[ShareDetail]) -> String {
    if details.is_empty() {
        return "No shares found.".to_string();
    }

    let rows: Vec<ShareRow> = details.iter().map(ShareRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::psql());
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Expense, ExpenseCategory, ExpenseShare, HouseholdId, Money, UserId, ValidExpense,
    };

    fn detail(paid: bool) -> ShareDetail {
        let valid = ValidExpense {
            name: "Rent".to_string(),
            amount: Money::from_cents(10000),
            category: ExpenseCategory::Rent,
        };
        let expense = Expense::new(valid, HouseholdId::new(), UserId::new());
        let mut share = ExpenseShare::new(expense.id, UserId::new(), Money::from_cents(3334));
        if paid {
            share.mark_paid();
        }
        ShareDetail {
            share,
            expense,
            household_name: "Flat".to_string(),
        }
    }

    #[test]
    fn test_format_share_list() {
        let output = format_share_list(&[detail(false), detail(true)]);
        assert!(output.contains("Expense"));
        assert!(output.contains("33.34"));
        assert!(output.contains("unpaid"));
        assert!(output.contains("paid"));
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(format_share_list(&[]), "No shares found.");
    }
}
