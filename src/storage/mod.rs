//! Storage layer for PiggyBank
//!
//! JSON file repositories with atomic writes behind the store traits the
//! services consume. `Storage` owns one repository per entity plus the audit
//! logger.

pub mod expenses;
pub mod file_io;
pub mod households;
pub mod init;
pub mod memberships;
pub mod reports;
pub mod shares;
pub mod traits;
pub mod users;

pub use expenses::ExpenseRepository;
pub use file_io::{read_json, write_bytes_atomic, write_json_atomic};
pub use households::HouseholdRepository;
pub use init::initialize_storage;
pub use memberships::MembershipRepository;
pub use reports::ReportRepository;
pub use shares::ShareRepository;
pub use traits::{ExpenseStore, HouseholdStore, MembershipStore, ReportStore, ShareStore, UserStore};
pub use users::UserRepository;

use crate::audit::AuditLogger;
use crate::config::paths::PiggyPaths;
use crate::error::PiggyError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: PiggyPaths,
    pub users: UserRepository,
    pub households: HouseholdRepository,
    pub memberships: MembershipRepository,
    pub expenses: ExpenseRepository,
    pub shares: ShareRepository,
    pub reports: ReportRepository,
    pub audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: PiggyPaths) -> Result<Self, PiggyError> {
        paths.ensure_directories()?;

        Ok(Self {
            users: UserRepository::new(paths.users_file()),
            households: HouseholdRepository::new(paths.households_file()),
            memberships: MembershipRepository::new(paths.memberships_file()),
            expenses: ExpenseRepository::new(paths.expenses_file()),
            shares: ShareRepository::new(paths.shares_file()),
            reports: ReportRepository::new(paths.reports_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    pub fn paths(&self) -> &PiggyPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), PiggyError> {
        self.users.load()?;
        self.households.load()?;
        self.memberships.load()?;
        self.expenses.load()?;
        self.shares.load()?;
        self.reports.load()?;
        tracing::debug!(base_dir = %self.paths.base_dir().display(), "storage loaded");
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), PiggyError> {
        self.users.save()?;
        self.households.save()?;
        self.memberships.save()?;
        self.expenses.save()?;
        self.shares.save()?;
        self.reports.save()?;
        Ok(())
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PiggyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(temp_dir.path().join("reports").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_save_all_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PiggyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths.clone()).unwrap();
        storage.load_all().unwrap();

        storage.users.insert(User::new("alice", "")).unwrap();
        storage.save_all().unwrap();

        let mut reopened = Storage::new(paths).unwrap();
        reopened.load_all().unwrap();
        assert!(reopened.users.get_by_username("alice").unwrap().is_some());
    }
}
