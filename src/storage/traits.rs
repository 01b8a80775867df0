//! Store interfaces consumed by the services
//!
//! Every service receives the stores it needs as trait objects, so tests (or a
//! different backend) can substitute their own. Each write is a single row
//! operation; implementations persist it before returning.

use crate::error::PiggyResult;
use crate::models::{
    Expense, ExpenseId, ExpenseShare, Household, HouseholdId, Membership, Report, User, UserId,
};

pub trait UserStore {
    /// Insert a user; fails with `Duplicate` if the username is taken
    fn insert_user(&self, user: User) -> PiggyResult<()>;
    fn user(&self, id: UserId) -> PiggyResult<Option<User>>;
    fn user_by_username(&self, username: &str) -> PiggyResult<Option<User>>;
    fn all_users(&self) -> PiggyResult<Vec<User>>;
}

pub trait HouseholdStore {
    /// Insert a household; fails with `Duplicate` if the name is taken
    fn insert_household(&self, household: Household) -> PiggyResult<()>;
    fn household(&self, id: HouseholdId) -> PiggyResult<Option<Household>>;
    fn household_by_name(&self, name: &str) -> PiggyResult<Option<Household>>;
    fn remove_household(&self, id: HouseholdId) -> PiggyResult<bool>;
}

pub trait MembershipStore {
    /// Insert a membership and return the stored row
    ///
    /// A (user, household) pair is stored at most once; inserting it again
    /// returns the existing membership unchanged.
    fn insert_membership(&self, membership: Membership) -> PiggyResult<Membership>;

    /// Memberships of a household in the order they were created
    fn memberships_of(&self, household_id: HouseholdId) -> PiggyResult<Vec<Membership>>;
    fn memberships_for_user(&self, user_id: UserId) -> PiggyResult<Vec<Membership>>;
}

pub trait ExpenseStore {
    /// Insert an expense; fails with `Duplicate` if the name is taken
    fn insert_expense(&self, expense: Expense) -> PiggyResult<()>;
    fn expense(&self, id: ExpenseId) -> PiggyResult<Option<Expense>>;
    fn expense_by_name(&self, name: &str) -> PiggyResult<Option<Expense>>;

    /// Expenses of a household, newest first
    fn expenses_for_household(&self, household_id: HouseholdId) -> PiggyResult<Vec<Expense>>;
    fn remove_expense(&self, id: ExpenseId) -> PiggyResult<bool>;
}

pub trait ShareStore {
    /// Insert a share; fails with `Duplicate` if the (expense, user) pair exists
    fn insert_share(&self, share: ExpenseShare) -> PiggyResult<()>;
    fn share(&self, expense_id: ExpenseId, user_id: UserId) -> PiggyResult<Option<ExpenseShare>>;

    /// Replace a stored share; fails with `NotFound` if it was never inserted
    fn update_share(&self, share: ExpenseShare) -> PiggyResult<()>;
    fn shares_for_user(&self, user_id: UserId) -> PiggyResult<Vec<ExpenseShare>>;
    fn shares_for_expense(&self, expense_id: ExpenseId) -> PiggyResult<Vec<ExpenseShare>>;
    fn remove_shares_for_expense(&self, expense_id: ExpenseId) -> PiggyResult<usize>;
}

pub trait ReportStore {
    /// Insert a report; fails with `Duplicate` if the file name is taken
    fn insert_report(&self, report: Report) -> PiggyResult<()>;

    /// Reports owned by a user, newest first
    fn reports_for_user(&self, user_id: UserId) -> PiggyResult<Vec<Report>>;
    fn report_by_file_name(&self, file_name: &str) -> PiggyResult<Option<Report>>;
}
