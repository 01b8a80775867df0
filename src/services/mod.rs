//! Service layer for PiggyBank
//!
//! Business logic on top of the store traits: validation, authorization of
//! the calling user, splitting and cross-entity operations.

pub mod expense;
pub mod membership;
pub mod report;
pub mod share;
pub mod split;
pub mod user;

pub use expense::{ExpenseCreated, ExpenseService};
pub use membership::{HouseholdCreated, MemberDetail, MembershipService};
pub use report::{ReportFile, ReportRequest, ReportService};
pub use share::{ChartMode, ShareService};
pub use split::split;
pub use user::UserService;
