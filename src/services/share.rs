//! Share service
//!
//! Stores the per-member shares of an expense, settles them, and lists a
//! user's shares for display and charts.

use std::fmt;
use std::str::FromStr;

use crate::audit::{self, AuditEntry, AuditLogger, EntityType};
use crate::error::{PiggyError, PiggyResult};
use crate::models::{Caller, ExpenseId, ExpenseShare, Money, ShareDetail, UserId};
use crate::reports::breakdown::{self, Breakdown};
use crate::storage::{ExpenseStore, HouseholdStore, ShareStore, Storage};

/// How a user's shares are grouped for a chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartMode {
    /// Unpaid shares by household
    Household,
    /// Unpaid shares by expense category
    Category,
    /// All shares, unpaid against paid
    Status,
}

impl ChartMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "household" => Some(Self::Household),
            "category" => Some(Self::Category),
            "status" => Some(Self::Status),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Household => "household",
            Self::Category => "category",
            Self::Status => "status",
        }
    }
}

impl fmt::Display for ChartMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartMode {
    type Err = PiggyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            PiggyError::Validation(format!(
                "Invalid chart mode '{}'. Use household, category or status",
                s
            ))
        })
    }
}

/// Service for expense shares
pub struct ShareService<'a> {
    shares: &'a dyn ShareStore,
    expenses: &'a dyn ExpenseStore,
    households: &'a dyn HouseholdStore,
    audit: Option<&'a AuditLogger>,
}

impl<'a> ShareService<'a> {
    pub fn new(
        shares: &'a dyn ShareStore,
        expenses: &'a dyn ExpenseStore,
        households: &'a dyn HouseholdStore,
    ) -> Self {
        Self {
            shares,
            expenses,
            households,
            audit: None,
        }
    }

    pub fn from_storage(storage: &'a Storage) -> Self {
        Self::new(&storage.shares, &storage.expenses, &storage.households)
            .with_audit(&storage.audit)
    }

    pub fn with_audit(mut self, audit: &'a AuditLogger) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Store a new unpaid share
    pub fn create_share(
        &self,
        expense_id: ExpenseId,
        user_id: UserId,
        amount: Money,
    ) -> PiggyResult<ExpenseShare> {
        if amount.is_negative() {
            return Err(PiggyError::Validation("Share amount cannot be negative".into()));
        }

        let share = ExpenseShare::new(expense_id, user_id, amount);
        self.shares.insert_share(share.clone())?;

        audit::record(
            self.audit,
            AuditEntry::created(EntityType::Share, share.id.to_string(), &share),
        );

        Ok(share)
    }

    /// The share a user owes for an expense
    pub fn get_share(&self, expense_id: ExpenseId, user_id: UserId) -> PiggyResult<ExpenseShare> {
        self.shares.share(expense_id, user_id)?.ok_or_else(|| {
            PiggyError::share_not_found(format!("{} for {}", expense_id, user_id))
        })
    }

    /// Mark a share as paid
    ///
    /// Paying an already paid share succeeds and leaves it unchanged.
    pub fn mark_paid(&self, share: ExpenseShare) -> PiggyResult<ExpenseShare> {
        self.settle(share, None)
    }

    /// Settle the share `user_id` owes for `expense_id`
    pub fn pay(
        &self,
        caller: &Caller,
        expense_id: ExpenseId,
        user_id: UserId,
    ) -> PiggyResult<ExpenseShare> {
        let acting = caller.require()?;
        let share = self.get_share(expense_id, user_id)?;
        self.settle(share, Some(&acting.username))
    }

    fn settle(&self, share: ExpenseShare, actor: Option<&str>) -> PiggyResult<ExpenseShare> {
        if share.paid {
            tracing::debug!(share_id = %share.id, "share already paid");
            return Ok(share);
        }

        let before = share.clone();
        let mut share = share;
        share.mark_paid();
        self.shares.update_share(share.clone())?;

        tracing::info!(
            share_id = %share.id,
            expense_id = %share.expense_id,
            user_id = %share.user_id,
            amount = %share.amount,
            "share paid"
        );

        let mut entry = AuditEntry::changed(EntityType::Share, share.id.to_string(), &before, &share)
            .summary("paid: false -> true");
        if let Some(actor) = actor {
            entry = entry.by(actor);
        }
        audit::record(self.audit, entry);

        Ok(share)
    }

    /// A user's shares with their expenses, unpaid first, newest expense first
    pub fn shares_for_user(&self, user_id: UserId) -> PiggyResult<Vec<ShareDetail>> {
        let mut details = Vec::new();

        for share in self.shares.shares_for_user(user_id)? {
            let expense = match self.expenses.expense(share.expense_id)? {
                Some(expense) => expense,
                None => {
                    tracing::warn!(share_id = %share.id, expense_id = %share.expense_id, "share refers to unknown expense");
                    continue;
                }
            };

            let household_name = self
                .households
                .household(expense.household_id)?
                .map(|h| h.name)
                .unwrap_or_default();

            details.push(ShareDetail {
                share,
                expense,
                household_name,
            });
        }

        details.sort_by(|a, b| {
            b.expense
                .created_at
                .cmp(&a.expense.created_at)
                .then(b.expense.id.cmp(&a.expense.id))
        });
        // Stable, so each group keeps newest-first order
        details.sort_by_key(|d| d.share.paid);

        Ok(details)
    }

    /// The caller's own shares
    pub fn my_shares(&self, caller: &Caller) -> PiggyResult<Vec<ShareDetail>> {
        let user = caller.require()?;
        self.shares_for_user(user.id)
    }

    /// Chart data for the caller's shares
    pub fn chart(&self, caller: &Caller, mode: ChartMode) -> PiggyResult<Breakdown> {
        let details = self.my_shares(caller)?;

        match mode {
            ChartMode::Status => breakdown::by_status(&details),
            ChartMode::Household | ChartMode::Category => {
                let unpaid: Vec<_> = details.into_iter().filter(|d| !d.share.paid).collect();
                if mode == ChartMode::Household {
                    breakdown::by_household(&unpaid)
                } else {
                    breakdown::by_category(&unpaid)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::PiggyPaths;
    use crate::config::settings::Settings;
    use crate::models::{ExpenseForm, Household, Membership, Role, User};
    use crate::services::ExpenseService;
    use crate::storage::{MembershipStore, UserStore};
    use tempfile::TempDir;

    struct Fixture {
        _temp_dir: TempDir,
        storage: Storage,
        alice: User,
        bob: User,
        flat: Household,
    }

    fn fixture() -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let paths = PiggyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        let alice = User::new("alice", "");
        let bob = User::new("bob", "");
        storage.users.insert_user(alice.clone()).unwrap();
        storage.users.insert_user(bob.clone()).unwrap();

        let flat = Household::new("Flat", "", alice.id);
        storage.households.insert_household(flat.clone()).unwrap();
        storage
            .memberships
            .insert_membership(Membership::new(alice.id, flat.id, Role::Owner))
            .unwrap();
        storage
            .memberships
            .insert_membership(Membership::new(bob.id, flat.id, Role::Member))
            .unwrap();

        Fixture {
            _temp_dir: temp_dir,
            storage,
            alice,
            bob,
            flat,
        }
    }

    fn add_expense(fx: &Fixture, name: &str, amount: &str, category: &str) -> ExpenseId {
        ExpenseService::from_storage(&fx.storage, &Settings::default())
            .create(
                &Caller::user(&fx.alice),
                &ExpenseForm::new(name, amount, category),
                fx.flat.id,
            )
            .unwrap()
            .expense
            .id
    }

    #[test]
    fn test_create_and_get_share() {
        let fx = fixture();
        let service = ShareService::from_storage(&fx.storage);
        let expense = ExpenseId::new();

        let share = service
            .create_share(expense, fx.bob.id, Money::from_cents(2500))
            .unwrap();
        assert!(!share.paid);
        assert_eq!(service.get_share(expense, fx.bob.id).unwrap(), share);

        assert!(service
            .get_share(expense, fx.alice.id)
            .unwrap_err()
            .is_not_found());
        assert!(service
            .create_share(expense, fx.alice.id, Money::from_cents(-1))
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_mark_paid_is_idempotent() {
        let fx = fixture();
        let service = ShareService::from_storage(&fx.storage);
        let expense = add_expense(&fx, "Rent", "100.00", "rent");

        let share = service.get_share(expense, fx.bob.id).unwrap();
        let paid = service.mark_paid(share).unwrap();
        assert!(paid.paid);
        let paid_at = paid.paid_at;

        let again = service.mark_paid(paid).unwrap();
        assert!(again.paid);
        assert_eq!(again.paid_at, paid_at);
        assert_eq!(again.amount, Money::from_cents(5000));

        let stored = service.get_share(expense, fx.bob.id).unwrap();
        assert!(stored.paid);
        assert_eq!(stored.paid_at, paid_at);
    }

    #[test]
    fn test_pay() {
        let fx = fixture();
        let service = ShareService::from_storage(&fx.storage);
        let expense = add_expense(&fx, "Rent", "100.00", "rent");

        let err = service.pay(&Caller::Anonymous, expense, fx.bob.id).unwrap_err();
        assert!(matches!(err, PiggyError::Unauthenticated));

        let err = service
            .pay(&Caller::user(&fx.bob), ExpenseId::new(), fx.bob.id)
            .unwrap_err();
        assert!(err.is_not_found());

        let share = service.pay(&Caller::user(&fx.bob), expense, fx.bob.id).unwrap();
        assert!(share.paid);

        let updates: Vec<_> = fx
            .storage
            .audit
            .read_all()
            .unwrap()
            .into_iter()
            .filter(|e| e.operation == audit::Operation::Update)
            .collect();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].actor.as_deref(), Some("bob"));
    }

    #[test]
    fn test_shares_for_user_unpaid_first() {
        let fx = fixture();
        let service = ShareService::from_storage(&fx.storage);

        let first = add_expense(&fx, "Rent", "100", "rent");
        let second = add_expense(&fx, "Food", "30", "food");
        let third = add_expense(&fx, "Power", "40", "utilities");

        service.pay(&Caller::user(&fx.bob), third, fx.bob.id).unwrap();

        let details = service.shares_for_user(fx.bob.id).unwrap();
        let order: Vec<_> = details.iter().map(|d| d.expense.id).collect();
        assert_eq!(order.len(), 3);
        assert_eq!(order[2], third);
        assert!(order[..2].contains(&first));
        assert!(order[..2].contains(&second));
        assert!(details.iter().all(|d| d.household_name == "Flat"));
        assert!(!details[0].share.paid && !details[1].share.paid && details[2].share.paid);
    }

    #[test]
    fn test_chart_modes() {
        let fx = fixture();
        let service = ShareService::from_storage(&fx.storage);
        let caller = Caller::user(&fx.bob);

        add_expense(&fx, "Rent", "100", "rent");
        let food = add_expense(&fx, "Food", "30", "food");
        service.pay(&caller, food, fx.bob.id).unwrap();

        let by_household = service.chart(&caller, ChartMode::Household).unwrap();
        assert_eq!(by_household.labels(), vec!["Flat"]);
        assert_eq!(by_household.totals(), vec![Money::from_cents(5000)]);

        let by_category = service.chart(&caller, ChartMode::Category).unwrap();
        assert_eq!(by_category.labels(), vec!["rent"]);

        let by_status = service.chart(&caller, ChartMode::Status).unwrap();
        assert_eq!(
            by_status.totals(),
            vec![Money::from_cents(5000), Money::from_cents(1500)]
        );

        assert!(service.chart(&Caller::Anonymous, ChartMode::Status).is_err());
    }

    #[test]
    fn test_chart_mode_parse() {
        assert_eq!("Household".parse::<ChartMode>().unwrap(), ChartMode::Household);
        assert_eq!(ChartMode::parse("status"), Some(ChartMode::Status));
        assert!("pie".parse::<ChartMode>().unwrap_err().is_validation());
    }
}
