//! Expense display formatting

use crate::models::{Expense, Money};
use crate::services::ExpenseCreated;

/// Format a household's expenses, newest first
pub fn format_expense_list(expenses: &[Expense]) -> String {
    if expenses.is_empty() {
        return "No expenses found.".to_string();
    }

    let mut output = String::new();
    for expense in expenses {
        output.push_str(&format!("  {}\n", expense));
    }

    let total = expenses
        .iter()
        .fold(Money::zero(), |acc, e| acc.saturating_add(e.amount));
    output.push_str(&format!("  Total: {}\n", total));
    output
}

pub fn format_expense_created(created: &ExpenseCreated) -> String {
    let expense = &created.expense;
    let mut output = format!("Added expense: {}\n", expense.name);
    output.push_str(&format!("  Amount:   {}\n", expense.amount));
    output.push_str(&format!("  Category: {}\n", expense.category));
    output.push_str(&format!("  ID:       {}\n", expense.id));

    if let Some(share) = created.shares.first() {
        output.push_str(&format!(
            "  Split {} ways: {} each\n",
            created.shares.len(),
            share.amount
        ));
    }

    if !created.is_complete() {
        output.push_str(&format!(
            "  Warning: {} share(s) could not be recorded\n",
            created.failed_members.len()
        ));
    }
    output
}
