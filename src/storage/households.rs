//! Household repository for JSON storage
//!
//! Manages loading and saving households to households.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{PiggyError, PiggyResult};
use crate::models::{Household, HouseholdId};

use super::file_io::{read_json, write_json_atomic};
use super::traits::HouseholdStore;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct HouseholdData {
    households: Vec<Household>,
}

/// Repository for household persistence
pub struct HouseholdRepository {
    path: PathBuf,
    data: RwLock<HashMap<HouseholdId, Household>>,
}

impl HouseholdRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load households from disk
    pub fn load(&self) -> Result<(), PiggyError> {
        let file_data: HouseholdData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        for household in file_data.households {
            data.insert(household.id, household);
        }

        Ok(())
    }

    /// Save households to disk, oldest first
    pub fn save(&self) -> Result<(), PiggyError> {
        let data = self.data.read().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut households: Vec<_> = data.values().cloned().collect();
        households.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.name.cmp(&b.name)));

        write_json_atomic(&self.path, &HouseholdData { households })
    }

    pub fn get(&self, id: HouseholdId) -> Result<Option<Household>, PiggyError> {
        let data = self.data.read().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// Get a household by name (exact match)
    pub fn get_by_name(&self, name: &str) -> Result<Option<Household>, PiggyError> {
        let data = self.data.read().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.values().find(|h| h.name == name).cloned())
    }

    /// Get all households sorted by name
    pub fn get_all(&self) -> Result<Vec<Household>, PiggyError> {
        let data = self.data.read().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut households: Vec<_> = data.values().cloned().collect();
        households.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(households)
    }

    /// Insert a household, rejecting a taken name
    pub fn insert(&self, household: Household) -> Result<(), PiggyError> {
        let mut data = self.data.write().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        if data
            .values()
            .any(|h| h.id != household.id && h.name == household.name)
        {
            return Err(PiggyError::Duplicate {
                entity_type: "Household",
                identifier: household.name,
            });
        }

        data.insert(household.id, household);
        Ok(())
    }

    /// Delete a household
    pub fn delete(&self, id: HouseholdId) -> Result<bool, PiggyError> {
        let mut data = self.data.write().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(data.remove(&id).is_some())
    }
}

impl HouseholdStore for HouseholdRepository {
    fn insert_household(&self, household: Household) -> PiggyResult<()> {
        let id = household.id;
        self.insert(household)?;

        if let Err(e) = self.save() {
            self.delete(id)?;
            return Err(e);
        }
        Ok(())
    }

    fn household(&self, id: HouseholdId) -> PiggyResult<Option<Household>> {
        self.get(id)
    }

    fn household_by_name(&self, name: &str) -> PiggyResult<Option<Household>> {
        self.get_by_name(name)
    }

    fn remove_household(&self, id: HouseholdId) -> PiggyResult<bool> {
        let removed = self.delete(id)?;
        if removed {
            self.save()?;
        }
        Ok(removed)
    }
}
