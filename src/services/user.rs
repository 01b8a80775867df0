//! User service
//!
//! Registers the people that households are made of and resolves a username
//! into the `Caller` identity every other service expects.

use crate::audit::{self, AuditEntry, AuditLogger, EntityType};
use crate::error::{PiggyError, PiggyResult};
use crate::models::{Caller, User};
use crate::storage::{Storage, UserStore};

/// Service for user management
pub struct UserService<'a> {
    users: &'a dyn UserStore,
    audit: Option<&'a AuditLogger>,
}

impl<'a> UserService<'a> {
    pub fn new(users: &'a dyn UserStore) -> Self {
        Self { users, audit: None }
    }

    /// Wire the service to the JSON store and its audit log
    pub fn from_storage(storage: &'a Storage) -> Self {
        Self::new(&storage.users).with_audit(&storage.audit)
    }

    pub fn with_audit(mut self, audit: &'a AuditLogger) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Register a new user
    pub fn create(&self, username: &str, email: &str) -> PiggyResult<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(PiggyError::Validation("Username cannot be empty".into()));
        }
        if username.chars().any(char::is_whitespace) {
            return Err(PiggyError::Validation(
                "Username cannot contain whitespace".into(),
            ));
        }

        if self.users.user_by_username(username)?.is_some() {
            return Err(PiggyError::Duplicate {
                entity_type: "User",
                identifier: username.to_string(),
            });
        }

        let user = User::new(username, email.trim());
        self.users.insert_user(user.clone())?;

        tracing::info!(user_id = %user.id, username = %user.username, "user created");
        audit::record(
            self.audit,
            AuditEntry::created(EntityType::User, user.id.to_string(), &user)
                .named(user.username.clone()),
        );

        Ok(user)
    }

    pub fn list(&self) -> PiggyResult<Vec<User>> {
        self.users.all_users()
    }

    /// Find a user by username, else NotFound
    pub fn get_by_username(&self, username: &str) -> PiggyResult<User> {
        self.users
            .user_by_username(username.trim())?
            .ok_or_else(|| PiggyError::user_not_found(username))
    }

    /// Resolve an optional username into a caller
    ///
    /// No username yields an anonymous caller; an unknown one is NotFound.
    pub fn resolve_caller(&self, username: Option<&str>) -> PiggyResult<Caller> {
        match username.map(str::trim).filter(|u| !u.is_empty()) {
            None => Ok(Caller::Anonymous),
            Some(name) => Ok(Caller::user(&self.get_by_username(name)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::PiggyPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = PiggyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_create_user() {
        let (_temp_dir, storage) = create_test_storage();
        let service = UserService::from_storage(&storage);

        let user = service.create("  alice ", "alice@example.com").unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(service.list().unwrap().len(), 1);

        let entries = storage.audit.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entity_type, EntityType::User);
    }

    #[test]
    fn test_rejects_bad_usernames() {
        let (_temp_dir, storage) = create_test_storage();
        let service = UserService::from_storage(&storage);

        assert!(service.create("   ", "").unwrap_err().is_validation());
        assert!(service.create("al ice", "").unwrap_err().is_validation());

        service.create("alice", "").unwrap();
        assert!(service.create("alice", "").unwrap_err().is_conflict());
    }

    #[test]
    fn test_resolve_caller() {
        let (_temp_dir, storage) = create_test_storage();
        let service = UserService::from_storage(&storage);
        let alice = service.create("alice", "").unwrap();

        assert_eq!(service.resolve_caller(None).unwrap(), Caller::Anonymous);
        assert_eq!(service.resolve_caller(Some("")).unwrap(), Caller::Anonymous);
        assert_eq!(
            service.resolve_caller(Some("alice")).unwrap(),
            Caller::user(&alice)
        );
        assert!(service.resolve_caller(Some("mallory")).unwrap_err().is_not_found());
    }
}
