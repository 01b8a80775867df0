//! Expense share model
//!
//! A share is one member's obligation for one expense. Its amount and payer
//! are fixed at creation; the only change it ever sees is being paid.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::expense::Expense;
use super::ids::{ExpenseId, ShareId, UserId};
use super::money::Money;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseShare {
    pub id: ShareId,
    pub expense_id: ExpenseId,
    pub user_id: UserId,
    pub amount: Money,

    #[serde(default)]
    pub paid: bool,

    /// When the share was settled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

impl ExpenseShare {
    /// Create an unpaid share
    pub fn new(expense_id: ExpenseId, user_id: UserId, amount: Money) -> Self {
        Self {
            id: ShareId::new(),
            expense_id,
            user_id,
            amount,
            paid: false,
            paid_at: None,
            created_at: Utc::now(),
        }
    }

    /// Mark the share as paid. Returns false if it already was.
    pub fn mark_paid(&mut self) -> bool {
        if self.paid {
            return false;
        }
        self.paid = true;
        self.paid_at = Some(Utc::now());
        true
    }
}

/// A share joined with its expense and the name of the expense's household
#[derive(Debug, Clone, PartialEq)]
pub struct ShareDetail {
    pub share: ExpenseShare,
    pub expense: Expense,
    pub household_name: String,
}
