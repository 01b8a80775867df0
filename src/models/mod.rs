//! Core data models for PiggyBank
//!
//! Users, households and memberships, expenses and the shares they are split
//! into, and the reports generated from those shares.

pub mod expense;
pub mod household;
pub mod ids;
pub mod money;
pub mod report;
pub mod share;
pub mod user;

pub use expense::{Expense, ExpenseCategory, ExpenseForm, ExpenseRules, ExpenseValidationError, ValidExpense};
pub use household::{Household, Membership, Role};
pub use ids::{ExpenseId, HouseholdId, MembershipId, ReportId, ShareId, UserId};
pub use money::{Money, MoneyParseError};
pub use report::{PaymentStatus, PeriodError, Report, ReportPeriod};
pub use share::{ExpenseShare, ShareDetail};
pub use user::{AuthUser, Caller, User};
