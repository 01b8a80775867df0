//! Expense service
//!
//! Records expenses and splits each one into a share per household member.

use crate::audit::{self, AuditEntry, AuditLogger, EntityType};
use crate::config::settings::{FanoutPolicy, Settings};
use crate::error::{PiggyError, PiggyResult};
use crate::models::{
    Caller, Expense, ExpenseForm, ExpenseId, ExpenseRules, ExpenseShare, HouseholdId, UserId,
};
use crate::storage::{ExpenseStore, HouseholdStore, MembershipStore, ShareStore, Storage};

use super::split::split;

/// Result of creating an expense
#[derive(Debug, Clone)]
pub struct ExpenseCreated {
    pub expense: Expense,
    /// Shares that were stored, in member order
    pub shares: Vec<ExpenseShare>,
    /// Members whose share could not be stored (best-effort fan-out only)
    pub failed_members: Vec<UserId>,
}

impl ExpenseCreated {
    pub fn is_complete(&self) -> bool {
        self.failed_members.is_empty()
    }
}

/// Service for expense management
pub struct ExpenseService<'a> {
    households: &'a dyn HouseholdStore,
    memberships: &'a dyn MembershipStore,
    expenses: &'a dyn ExpenseStore,
    shares: &'a dyn ShareStore,
    rules: ExpenseRules,
    fanout: FanoutPolicy,
    audit: Option<&'a AuditLogger>,
}

impl<'a> ExpenseService<'a> {
    pub fn new(
        households: &'a dyn HouseholdStore,
        memberships: &'a dyn MembershipStore,
        expenses: &'a dyn ExpenseStore,
        shares: &'a dyn ShareStore,
    ) -> Self {
        Self {
            households,
            memberships,
            expenses,
            shares,
            rules: ExpenseRules::default(),
            fanout: FanoutPolicy::default(),
            audit: None,
        }
    }

    /// Wire the service to the JSON store, applying the configured rules
    pub fn from_storage(storage: &'a Storage, settings: &Settings) -> Self {
        Self::new(
            &storage.households,
            &storage.memberships,
            &storage.expenses,
            &storage.shares,
        )
        .with_rules(settings.expense_rules.clone())
        .with_fanout(settings.share_fanout)
        .with_audit(&storage.audit)
    }

    pub fn with_rules(mut self, rules: ExpenseRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_fanout(mut self, fanout: FanoutPolicy) -> Self {
        self.fanout = fanout;
        self
    }

    pub fn with_audit(mut self, audit: &'a AuditLogger) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Create an expense in a household and split it among its members
    pub fn create(
        &self,
        caller: &Caller,
        form: &ExpenseForm,
        household_id: HouseholdId,
    ) -> PiggyResult<ExpenseCreated> {
        let creator = caller.require()?;

        let valid = form.validate(&self.rules)?;

        if self.expenses.expense_by_name(&valid.name)?.is_some() {
            return Err(PiggyError::Duplicate {
                entity_type: "Expense",
                identifier: valid.name,
            });
        }

        let household = self
            .households
            .household(household_id)?
            .ok_or_else(|| PiggyError::household_not_found(household_id.to_string()))?;

        // Resolved before anything is written, so a memberless household
        // never leaves an expense without shares behind
        let members = self.memberships.memberships_of(household.id)?;
        if members.is_empty() {
            return Err(PiggyError::Validation(format!(
                "Household '{}' has no members to split with",
                household.name
            )));
        }

        let expense = Expense::new(valid, household.id, creator.id);
        self.expenses.insert_expense(expense.clone())?;

        audit::record(
            self.audit,
            AuditEntry::created(EntityType::Expense, expense.id.to_string(), &expense)
                .named(expense.name.clone())
                .by(creator.username.clone()),
        );

        let amounts = split(expense.amount, members.len());
        let mut shares = Vec::with_capacity(members.len());
        let mut failed_members = Vec::new();

        for (member, amount) in members.iter().zip(amounts) {
            let share = ExpenseShare::new(expense.id, member.user_id, amount);

            match self.shares.insert_share(share.clone()) {
                Ok(()) => {
                    audit::record(
                        self.audit,
                        AuditEntry::created(EntityType::Share, share.id.to_string(), &share),
                    );
                    shares.push(share);
                }
                Err(e) => match self.fanout {
                    FanoutPolicy::BestEffort => {
                        tracing::warn!(
                            expense = %expense.name,
                            user_id = %member.user_id,
                            error = %e,
                            "cannot create expense share"
                        );
                        failed_members.push(member.user_id);
                    }
                    FanoutPolicy::AllOrNothing => {
                        self.roll_back(&expense, &shares, &creator.username);
                        return Err(e);
                    }
                },
            }
        }

        tracing::info!(
            expense_id = %expense.id,
            expense = %expense.name,
            amount = %expense.amount,
            household = %household.name,
            shares = shares.len(),
            "expense created"
        );

        Ok(ExpenseCreated {
            expense,
            shares,
            failed_members,
        })
    }

    /// Remove an expense and the shares stored for it so far
    fn roll_back(&self, expense: &Expense, shares: &[ExpenseShare], actor: &str) {
        match self.shares.remove_shares_for_expense(expense.id) {
            Ok(_) => {
                for share in shares {
                    audit::record(
                        self.audit,
                        AuditEntry::removed(EntityType::Share, share.id.to_string(), share)
                            .by(actor),
                    );
                }
            }
            Err(e) => {
                tracing::error!(expense = %expense.name, error = %e, "failed to remove shares during rollback")
            }
        }

        match self.expenses.remove_expense(expense.id) {
            Ok(_) => audit::record(
                self.audit,
                AuditEntry::removed(EntityType::Expense, expense.id.to_string(), expense)
                    .named(expense.name.clone())
                    .by(actor)
                    .summary("share fan-out failed"),
            ),
            Err(e) => {
                tracing::error!(expense = %expense.name, error = %e, "failed to remove expense during rollback")
            }
        }
        tracing::warn!(expense = %expense.name, "expense rolled back after share failure");
    }

    /// Get an expense by ID
    pub fn get(&self, id: ExpenseId) -> PiggyResult<Option<Expense>> {
        self.expenses.expense(id)
    }

    /// Find an expense by exact name, then by id
    pub fn find(&self, identifier: &str) -> PiggyResult<Expense> {
        let identifier = identifier.trim();
        if let Some(expense) = self.expenses.expense_by_name(identifier)? {
            return Ok(expense);
        }

        if let Ok(id) = identifier.parse::<ExpenseId>() {
            if let Some(expense) = self.expenses.expense(id)? {
                return Ok(expense);
            }
        }

        Err(PiggyError::expense_not_found(identifier))
    }

    /// Expenses of a household, newest first
    pub fn list_for_household(&self, household_id: HouseholdId) -> PiggyResult<Vec<Expense>> {
        self.expenses.expenses_for_household(household_id)
    }
}
