//! Expense repository for JSON storage
//!
//! Manages loading and saving expenses to expenses.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{PiggyError, PiggyResult};
use crate::models::{Expense, ExpenseId, HouseholdId};

use super::file_io::{read_json, write_json_atomic};
use super::traits::ExpenseStore;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ExpenseData {
    expenses: Vec<Expense>,
}

/// Repository for expense persistence with indexing
pub struct ExpenseRepository {
    path: PathBuf,
    data: RwLock<HashMap<ExpenseId, Expense>>,
    /// Index: household_id -> expense_ids
    by_household: RwLock<HashMap<HouseholdId, Vec<ExpenseId>>>,
}

impl ExpenseRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_household: RwLock::new(HashMap::new()),
        }
    }

    /// Load expenses from disk and build indexes
    pub fn load(&self) -> Result<(), PiggyError> {
        let file_data: ExpenseData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut by_household = self.by_household.write().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        by_household.clear();

        for expense in file_data.expenses {
            by_household
                .entry(expense.household_id)
                .or_default()
                .push(expense.id);
            data.insert(expense.id, expense);
        }

        Ok(())
    }

    /// Save expenses to disk, newest first
    pub fn save(&self) -> Result<(), PiggyError> {
        let data = self.data.read().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut expenses: Vec<_> = data.values().cloned().collect();
        expenses.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.name.cmp(&b.name)));

        write_json_atomic(&self.path, &ExpenseData { expenses })
    }

    pub fn get(&self, id: ExpenseId) -> Result<Option<Expense>, PiggyError> {
        let data = self.data.read().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// Get an expense by name (exact match)
    pub fn get_by_name(&self, name: &str) -> Result<Option<Expense>, PiggyError> {
        let data = self.data.read().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.values().find(|e| e.name == name).cloned())
    }

    /// Get all expenses, newest first
    pub fn get_all(&self) -> Result<Vec<Expense>, PiggyError> {
        let data = self.data.read().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut expenses: Vec<_> = data.values().cloned().collect();
        expenses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(expenses)
    }

    /// Get the expenses of a household, newest first
    pub fn get_by_household(&self, household_id: HouseholdId) -> Result<Vec<Expense>, PiggyError> {
        let data = self.data.read().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        let by_household = self.by_household.read().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let ids = by_household.get(&household_id).map(|v| v.as_slice()).unwrap_or(&[]);
        let mut expenses: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        expenses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(expenses)
    }

    /// Insert an expense
    ///
    /// The name check and the insert happen under one write lock, so two
    /// concurrent inserts of the same name cannot both succeed.
    pub fn insert(&self, expense: Expense) -> Result<(), PiggyError> {
        let mut data = self.data.write().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut by_household = self.by_household.write().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        if data
            .values()
            .any(|e| e.id != expense.id && e.name == expense.name)
        {
            return Err(PiggyError::Duplicate {
                entity_type: "Expense",
                identifier: expense.name,
            });
        }

        let ids = by_household.entry(expense.household_id).or_default();
        if !ids.contains(&expense.id) {
            ids.push(expense.id);
        }
        data.insert(expense.id, expense);

        Ok(())
    }

    /// Delete an expense
    pub fn delete(&self, id: ExpenseId) -> Result<bool, PiggyError> {
        let mut data = self.data.write().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut by_household = self.by_household.write().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        match data.remove(&id) {
            Some(expense) => {
                if let Some(ids) = by_household.get_mut(&expense.household_id) {
                    ids.retain(|e| *e != id);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl ExpenseStore for ExpenseRepository {
    fn insert_expense(&self, expense: Expense) -> PiggyResult<()> {
        let id = expense.id;
        self.insert(expense)?;

        if let Err(e) = self.save() {
            self.delete(id)?;
            return Err(e);
        }
        Ok(())
    }

    fn expense(&self, id: ExpenseId) -> PiggyResult<Option<Expense>> {
        self.get(id)
    }

    fn expense_by_name(&self, name: &str) -> PiggyResult<Option<Expense>> {
        self.get_by_name(name)
    }

    fn expenses_for_household(&self, household_id: HouseholdId) -> PiggyResult<Vec<Expense>> {
        self.get_by_household(household_id)
    }

    fn remove_expense(&self, id: ExpenseId) -> PiggyResult<bool> {
        let removed = self.delete(id)?;
        if removed {
            self.save()?;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseCategory, Money, UserId, ValidExpense};
    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, ExpenseRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("expenses.json");
        let repo = ExpenseRepository::new(path);
        (temp_dir, repo)
    }

    fn valid(name: &str) -> ValidExpense {
        ValidExpense {
            name: name.to_string(),
            amount: Money::from_cents(10000),
            category: ExpenseCategory::Rent,
        }
    }

    #[test]
    fn test_insert_and_get() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let expense = Expense::new(valid("Rent"), HouseholdId::new(), UserId::new());
        let id = expense.id;
        repo.insert_expense(expense).unwrap();

        assert_eq!(repo.expense(id).unwrap().unwrap().name, "Rent");
        assert_eq!(repo.expense_by_name("Rent").unwrap().unwrap().id, id);
    }

    #[test]
    fn test_duplicate_name_rejected_across_households() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        repo.insert_expense(Expense::new(valid("Rent"), HouseholdId::new(), UserId::new()))
            .unwrap();
        let err = repo
            .insert_expense(Expense::new(valid("Rent"), HouseholdId::new(), UserId::new()))
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[test]
    fn test_household_expenses_newest_first() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let household = HouseholdId::new();
        let user = UserId::new();
        let now = Utc::now();
        repo.insert_expense(Expense::at(valid("Old"), household, user, now - Duration::days(2)))
            .unwrap();
        repo.insert_expense(Expense::at(valid("New"), household, user, now))
            .unwrap();
        repo.insert_expense(Expense::new(valid("Elsewhere"), HouseholdId::new(), user))
            .unwrap();

        let names: Vec<_> = repo
            .expenses_for_household(household)
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["New", "Old"]);
    }

    #[test]
    fn test_remove_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let household = HouseholdId::new();
        let keep = Expense::new(valid("Keep"), household, UserId::new());
        let drop = Expense::new(valid("Drop"), household, UserId::new());
        let drop_id = drop.id;
        repo.insert_expense(keep).unwrap();
        repo.insert_expense(drop).unwrap();

        assert!(repo.remove_expense(drop_id).unwrap());

        let repo2 = ExpenseRepository::new(temp_dir.path().join("expenses.json"));
        repo2.load().unwrap();
        let remaining = repo2.expenses_for_household(household).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "Keep");
    }

    #[test]
    fn test_failed_save_frees_the_name() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        let path = temp_dir.path().join("expenses.json");
        let household = HouseholdId::new();

        std::fs::create_dir(&path).unwrap();
        assert!(repo
            .insert_expense(Expense::new(valid("Rent"), household, UserId::new()))
            .is_err());
        assert!(repo.expense_by_name("Rent").unwrap().is_none());
        assert!(repo.expenses_for_household(household).unwrap().is_empty());

        std::fs::remove_dir(&path).unwrap();
        repo.insert_expense(Expense::new(valid("Rent"), household, UserId::new()))
            .unwrap();

        let repo2 = ExpenseRepository::new(path);
        repo2.load().unwrap();
        assert_eq!(repo2.expenses_for_household(household).unwrap().len(), 1);
    }
}
