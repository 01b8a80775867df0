//! User repository for JSON storage
//!
//! Manages loading and saving users to users.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{PiggyError, PiggyResult};
use crate::models::{User, UserId};

use super::file_io::{read_json, write_json_atomic};
use super::traits::UserStore;

/// Serializable user data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct UserData {
    users: Vec<User>,
}

/// Repository for user persistence
pub struct UserRepository {
    path: PathBuf,
    data: RwLock<HashMap<UserId, User>>,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load users from disk
    pub fn load(&self) -> Result<(), PiggyError> {
        let file_data: UserData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        for user in file_data.users {
            data.insert(user.id, user);
        }

        Ok(())
    }

    /// Save users to disk
    pub fn save(&self) -> Result<(), PiggyError> {
        let data = self.data.read().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut users: Vec<_> = data.values().cloned().collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));

        write_json_atomic(&self.path, &UserData { users })
    }

    /// Get a user by ID
    pub fn get(&self, id: UserId) -> Result<Option<User>, PiggyError> {
        let data = self.data.read().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// Get a user by username (exact match)
    pub fn get_by_username(&self, username: &str) -> Result<Option<User>, PiggyError> {
        let data = self.data.read().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.values().find(|u| u.username == username).cloned())
    }

    /// Get all users sorted by username
    pub fn get_all(&self) -> Result<Vec<User>, PiggyError> {
        let data = self.data.read().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut users: Vec<_> = data.values().cloned().collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    /// Insert a user, rejecting a taken username
    pub fn insert(&self, user: User) -> Result<(), PiggyError> {
        let mut data = self.data.write().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        if data
            .values()
            .any(|u| u.id != user.id && u.username == user.username)
        {
            return Err(PiggyError::Duplicate {
                entity_type: "User",
                identifier: user.username,
            });
        }

        data.insert(user.id, user);
        Ok(())
    }

    /// Delete a user
    pub fn delete(&self, id: UserId) -> Result<bool, PiggyError> {
        let mut data = self.data.write().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(data.remove(&id).is_some())
    }

    /// Count users
    pub fn count(&self) -> Result<usize, PiggyError> {
        let data = self.data.read().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.len())
    }
}

impl UserStore for UserRepository {
    fn insert_user(&self, user: User) -> PiggyResult<()> {
        let id = user.id;
        self.insert(user)?;

        if let Err(e) = self.save() {
            self.delete(id)?;
            return Err(e);
        }
        Ok(())
    }

    fn user(&self, id: UserId) -> PiggyResult<Option<User>> {
        self.get(id)
    }

    fn user_by_username(&self, username: &str) -> PiggyResult<Option<User>> {
        self.get_by_username(username)
    }

    fn all_users(&self) -> PiggyResult<Vec<User>> {
        self.get_all()
    }
}
