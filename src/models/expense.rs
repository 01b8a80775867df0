//! Expense model
//!
//! An expense is recorded once against a household and split into shares.
//! Raw input arrives as an `ExpenseForm` and is validated into typed values
//! before anything is stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{ExpenseId, HouseholdId, UserId};
use super::money::{Money, MoneyParseError};

/// The closed set of expense categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Food,
    Rent,
    Utilities,
    Transport,
    Entertainment,
    Health,
    Shopping,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 8] = [
        Self::Food,
        Self::Rent,
        Self::Utilities,
        Self::Transport,
        Self::Entertainment,
        Self::Health,
        Self::Shopping,
        Self::Other,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "food" => Some(Self::Food),
            "rent" => Some(Self::Rent),
            "utilities" => Some(Self::Utilities),
            "transport" => Some(Self::Transport),
            "entertainment" => Some(Self::Entertainment),
            "health" => Some(Self::Health),
            "shopping" => Some(Self::Shopping),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Rent => "rent",
            Self::Utilities => "utilities",
            Self::Transport => "transport",
            Self::Entertainment => "entertainment",
            Self::Health => "health",
            Self::Shopping => "shopping",
            Self::Other => "other",
        }
    }

    /// Comma-separated list of valid category names, for error messages
    pub fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseCategory {
    type Err = ExpenseValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ExpenseValidationError::InvalidCategory(s.to_string()))
    }
}

/// Limits applied to new expenses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRules {
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,

    #[serde(default = "default_minimum_amount")]
    pub minimum_amount: Money,

    /// Upper bound per expense, keeps share and report totals far from `i64::MAX`
    #[serde(default = "default_maximum_amount")]
    pub maximum_amount: Money,
}

fn default_max_name_length() -> usize {
    40
}

fn default_minimum_amount() -> Money {
    Money::from_cents(1000)
}

fn default_maximum_amount() -> Money {
    Money::from_cents(100_000_000)
}

impl Default for ExpenseRules {
    fn default() -> Self {
        Self {
            max_name_length: default_max_name_length(),
            minimum_amount: default_minimum_amount(),
            maximum_amount: default_maximum_amount(),
        }
    }
}

/// Raw expense input, as submitted by a form or the command line
#[derive(Debug, Clone, Default)]
pub struct ExpenseForm {
    pub name: String,
    pub amount: String,
    pub category: String,
}

impl ExpenseForm {
    pub fn new(
        name: impl Into<String>,
        amount: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            amount: amount.into(),
            category: category.into(),
        }
    }

    /// Check the name, amount and category against the rules
    ///
    /// Name uniqueness needs the store and is checked by the expense service.
    pub fn validate(&self, rules: &ExpenseRules) -> Result<ValidExpense, ExpenseValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ExpenseValidationError::EmptyName);
        }
        if name.chars().count() > rules.max_name_length {
            return Err(ExpenseValidationError::NameTooLong {
                max: rules.max_name_length,
            });
        }

        let amount = Money::parse(&self.amount).map_err(|e| match e {
            MoneyParseError::InvalidFormat(s) => ExpenseValidationError::InvalidAmount(s),
            MoneyParseError::TooManyDecimals(_) => ExpenseValidationError::TooManyDecimals,
        })?;
        if amount < rules.minimum_amount {
            return Err(ExpenseValidationError::BelowMinimum {
                minimum: rules.minimum_amount,
            });
        }
        if amount > rules.maximum_amount {
            return Err(ExpenseValidationError::OutOfRange {
                maximum: rules.maximum_amount,
            });
        }

        let category: ExpenseCategory = self.category.parse()?;

        Ok(ValidExpense {
            name: name.to_string(),
            amount,
            category,
        })
    }
}

/// Expense input that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidExpense {
    pub name: String,
    pub amount: Money,
    pub category: ExpenseCategory,
}

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,

    /// Unique across the whole system
    pub name: String,

    pub amount: Money,

    pub category: ExpenseCategory,

    /// Creation timestamp; reports select expenses by this
    pub created_at: DateTime<Utc>,

    pub household_id: HouseholdId,

    pub created_by: UserId,
}

impl Expense {
    pub fn new(valid: ValidExpense, household_id: HouseholdId, created_by: UserId) -> Self {
        Self::at(valid, household_id, created_by, Utc::now())
    }

    /// Create an expense with an explicit creation timestamp
    pub fn at(
        valid: ValidExpense,
        household_id: HouseholdId,
        created_by: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ExpenseId::new(),
            name: valid.name,
            amount: valid.amount,
            category: valid.category,
            created_at,
            household_id,
            created_by,
        }
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ({})",
            self.created_at.format("%Y-%m-%d"),
            self.name,
            self.amount,
            self.category
        )
    }
}

/// Reasons an expense form is rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    EmptyName,
    NameTooLong { max: usize },
    InvalidAmount(String),
    TooManyDecimals,
    BelowMinimum { minimum: Money },
    OutOfRange { maximum: Money },
    InvalidCategory(String),
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Expense name cannot be empty"),
            Self::NameTooLong { max } => {
                write!(f, "Expense name cannot be longer than {} characters", max)
            }
            Self::InvalidAmount(s) => write!(f, "Invalid amount format: '{}'", s),
            Self::TooManyDecimals => write!(f, "Amount can have at most 2 decimal places"),
            Self::BelowMinimum { minimum } => write!(f, "Amount must be at least {}", minimum),
            Self::OutOfRange { maximum } => write!(f, "Amount cannot be more than {}", maximum),
            Self::InvalidCategory(s) => write!(
                f,
                "Invalid category: '{}'. Valid categories: {}",
                s,
                ExpenseCategory::valid_names()
            ),
        }
    }
}

impl std::error::Error for ExpenseValidationError {}

impl From<ExpenseValidationError> for crate::error::PiggyError {
    fn from(err: ExpenseValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}
