//! Share repository for JSON storage
//!
//! Manages loading and saving expense shares to shares.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{PiggyError, PiggyResult};
use crate::models::{ExpenseId, ExpenseShare, ShareId, UserId};

use super::file_io::{read_json, write_json_atomic};
use super::traits::ShareStore;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ShareData {
    shares: Vec<ExpenseShare>,
}

/// Repository for share persistence with indexing
pub struct ShareRepository {
    path: PathBuf,
    data: RwLock<HashMap<ShareId, ExpenseShare>>,
    /// Index: user_id -> share_ids
    by_user: RwLock<HashMap<UserId, Vec<ShareId>>>,
    /// Index: expense_id -> share_ids
    by_expense: RwLock<HashMap<ExpenseId, Vec<ShareId>>>,
}

impl ShareRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_user: RwLock::new(HashMap::new()),
            by_expense: RwLock::new(HashMap::new()),
        }
    }

    /// Load shares from disk and build indexes
    pub fn load(&self) -> Result<(), PiggyError> {
        let file_data: ShareData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut by_user = self.by_user.write().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut by_expense = self.by_expense.write().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        by_user.clear();
        by_expense.clear();

        for share in file_data.shares {
            by_user.entry(share.user_id).or_default().push(share.id);
            by_expense.entry(share.expense_id).or_default().push(share.id);
            data.insert(share.id, share);
        }

        Ok(())
    }

    /// Save shares to disk
    pub fn save(&self) -> Result<(), PiggyError> {
        let data = self.data.read().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut shares: Vec<_> = data.values().cloned().collect();
        shares.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(a.expense_id.cmp(&b.expense_id))
                .then(a.user_id.cmp(&b.user_id))
        });

        write_json_atomic(&self.path, &ShareData { shares })
    }

    /// Get the share a user owes for an expense
    pub fn get_for(
        &self,
        expense_id: ExpenseId,
        user_id: UserId,
    ) -> Result<Option<ExpenseShare>, PiggyError> {
        let data = self.data.read().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        let by_expense = self.by_expense.read().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let ids = by_expense.get(&expense_id).map(|v| v.as_slice()).unwrap_or(&[]);
        Ok(ids
            .iter()
            .filter_map(|id| data.get(id))
            .find(|s| s.user_id == user_id)
            .cloned())
    }

    /// Insert a new share; one share per (expense, user)
    pub fn insert(&self, share: ExpenseShare) -> Result<(), PiggyError> {
        let mut data = self.data.write().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut by_user = self.by_user.write().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut by_expense = self.by_expense.write().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let taken = by_expense
            .get(&share.expense_id)
            .into_iter()
            .flatten()
            .filter_map(|id| data.get(id))
            .any(|s| s.user_id == share.user_id);
        if taken {
            return Err(PiggyError::Duplicate {
                entity_type: "Share",
                identifier: format!("{} for {}", share.expense_id, share.user_id),
            });
        }

        by_user.entry(share.user_id).or_default().push(share.id);
        by_expense.entry(share.expense_id).or_default().push(share.id);
        data.insert(share.id, share);

        Ok(())
    }

    /// Replace an existing share, returning the previous version
    pub fn update(&self, share: ExpenseShare) -> Result<ExpenseShare, PiggyError> {
        let mut data = self.data.write().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        match data.get_mut(&share.id) {
            Some(stored) => Ok(std::mem::replace(stored, share)),
            None => Err(PiggyError::share_not_found(share.id.to_string())),
        }
    }

    /// Delete a single share
    pub fn delete(&self, id: ShareId) -> Result<bool, PiggyError> {
        let mut data = self.data.write().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut by_user = self.by_user.write().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut by_expense = self.by_expense.write().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let Some(share) = data.remove(&id) else {
            return Ok(false);
        };
        if let Some(ids) = by_user.get_mut(&share.user_id) {
            ids.retain(|s| *s != id);
        }
        if let Some(ids) = by_expense.get_mut(&share.expense_id) {
            ids.retain(|s| *s != id);
        }

        Ok(true)
    }

    /// Shares owed by a user
    pub fn get_by_user(&self, user_id: UserId) -> Result<Vec<ExpenseShare>, PiggyError> {
        let data = self.data.read().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        let by_user = self.by_user.read().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let ids = by_user.get(&user_id).map(|v| v.as_slice()).unwrap_or(&[]);
        Ok(ids.iter().filter_map(|id| data.get(id).cloned()).collect())
    }

    /// Shares an expense was split into
    pub fn get_by_expense(&self, expense_id: ExpenseId) -> Result<Vec<ExpenseShare>, PiggyError> {
        let data = self.data.read().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        let by_expense = self.by_expense.read().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let ids = by_expense.get(&expense_id).map(|v| v.as_slice()).unwrap_or(&[]);
        Ok(ids.iter().filter_map(|id| data.get(id).cloned()).collect())
    }

    /// Delete every share of an expense, returning how many were removed
    pub fn delete_for_expense(&self, expense_id: ExpenseId) -> Result<usize, PiggyError> {
        let mut data = self.data.write().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut by_user = self.by_user.write().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut by_expense = self.by_expense.write().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let ids = by_expense.remove(&expense_id).unwrap_or_default();
        let mut removed = 0;
        for id in ids {
            if let Some(share) = data.remove(&id) {
                if let Some(user_ids) = by_user.get_mut(&share.user_id) {
                    user_ids.retain(|s| *s != id);
                }
                removed += 1;
            }
        }

        Ok(removed)
    }

    /// Count all shares
    pub fn count(&self) -> Result<usize, PiggyError> {
        let data = self.data.read().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.len())
    }
}

impl ShareStore for ShareRepository {
    fn insert_share(&self, share: ExpenseShare) -> PiggyResult<()> {
        let id = share.id;
        self.insert(share)?;

        // An unsaved row must not reach disk with a later save
        if let Err(e) = self.save() {
            self.delete(id)?;
            return Err(e);
        }
        Ok(())
    }

    fn share(&self, expense_id: ExpenseId, user_id: UserId) -> PiggyResult<Option<ExpenseShare>> {
        self.get_for(expense_id, user_id)
    }

    fn update_share(&self, share: ExpenseShare) -> PiggyResult<()> {
        let previous = self.update(share)?;

        if let Err(e) = self.save() {
            self.update(previous)?;
            return Err(e);
        }
        Ok(())
    }

    fn shares_for_user(&self, user_id: UserId) -> PiggyResult<Vec<ExpenseShare>> {
        self.get_by_user(user_id)
    }

    fn shares_for_expense(&self, expense_id: ExpenseId) -> PiggyResult<Vec<ExpenseShare>> {
        self.get_by_expense(expense_id)
    }

    fn remove_shares_for_expense(&self, expense_id: ExpenseId) -> PiggyResult<usize> {
        let removed = self.delete_for_expense(expense_id)?;
        if removed > 0 {
            self.save()?;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, ShareRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("shares.json");
        let repo = ShareRepository::new(path);
        (temp_dir, repo)
    }

    #[test]
    fn test_insert_and_lookup() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let expense = ExpenseId::new();
        let user = UserId::new();
        repo.insert_share(ExpenseShare::new(expense, user, Money::from_cents(3334)))
            .unwrap();

        let share = repo.share(expense, user).unwrap().unwrap();
        assert_eq!(share.amount, Money::from_cents(3334));
        assert!(repo.share(expense, UserId::new()).unwrap().is_none());
        assert_eq!(repo.shares_for_user(user).unwrap().len(), 1);
        assert_eq!(repo.shares_for_expense(expense).unwrap().len(), 1);
    }

    #[test]
    fn test_one_share_per_member() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let expense = ExpenseId::new();
        let user = UserId::new();
        repo.insert_share(ExpenseShare::new(expense, user, Money::from_cents(100)))
            .unwrap();
        let err = repo
            .insert_share(ExpenseShare::new(expense, user, Money::from_cents(100)))
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[test]
    fn test_update_persists_paid_flag() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let expense = ExpenseId::new();
        let user = UserId::new();
        repo.insert_share(ExpenseShare::new(expense, user, Money::from_cents(500)))
            .unwrap();

        let mut share = repo.share(expense, user).unwrap().unwrap();
        share.mark_paid();
        repo.update_share(share).unwrap();

        let repo2 = ShareRepository::new(temp_dir.path().join("shares.json"));
        repo2.load().unwrap();
        let reloaded = repo2.share(expense, user).unwrap().unwrap();
        assert!(reloaded.paid);
        assert!(reloaded.paid_at.is_some());
    }

    #[test]
    fn test_update_unknown_share_is_not_found() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let share = ExpenseShare::new(ExpenseId::new(), UserId::new(), Money::from_cents(1));
        assert!(repo.update_share(share).unwrap_err().is_not_found());
    }

    #[test]
    fn test_remove_shares_for_expense() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let expense = ExpenseId::new();
        let other = ExpenseId::new();
        let user = UserId::new();
        repo.insert_share(ExpenseShare::new(expense, user, Money::from_cents(1)))
            .unwrap();
        repo.insert_share(ExpenseShare::new(expense, UserId::new(), Money::from_cents(1)))
            .unwrap();
        repo.insert_share(ExpenseShare::new(other, user, Money::from_cents(1)))
            .unwrap();

        assert_eq!(repo.remove_shares_for_expense(expense).unwrap(), 2);
        assert_eq!(repo.count().unwrap(), 1);
        assert_eq!(repo.shares_for_user(user).unwrap()[0].expense_id, other);
    }

    #[test]
    fn test_failed_save_leaves_no_share_behind() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        let path = temp_dir.path().join("shares.json");

        let expense = ExpenseId::new();
        let lost = UserId::new();
        let kept = UserId::new();

        // A directory in place of the data file makes every save fail
        std::fs::create_dir(&path).unwrap();
        let err = repo
            .insert_share(ExpenseShare::new(expense, lost, Money::from_cents(3334)))
            .unwrap_err();
        assert!(err.is_dependency());
        assert!(repo.share(expense, lost).unwrap().is_none());
        assert!(repo.shares_for_user(lost).unwrap().is_empty());
        assert_eq!(repo.count().unwrap(), 0);

        std::fs::remove_dir(&path).unwrap();
        repo.insert_share(ExpenseShare::new(expense, kept, Money::from_cents(3334)))
            .unwrap();

        let reloaded = ShareRepository::new(path);
        reloaded.load().unwrap();
        assert!(reloaded.share(expense, lost).unwrap().is_none());
        assert!(reloaded.share(expense, kept).unwrap().is_some());
        assert_eq!(reloaded.shares_for_expense(expense).unwrap().len(), 1);
    }

    #[test]
    fn test_failed_update_restores_previous() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        let path = temp_dir.path().join("shares.json");

        let expense = ExpenseId::new();
        let user = UserId::new();
        repo.insert_share(ExpenseShare::new(expense, user, Money::from_cents(500)))
            .unwrap();

        let mut share = repo.share(expense, user).unwrap().unwrap();
        share.mark_paid();

        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();
        assert!(repo.update_share(share).is_err());
        assert!(!repo.share(expense, user).unwrap().unwrap().paid);
    }
}
