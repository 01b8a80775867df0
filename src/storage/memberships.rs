//! Membership repository for JSON storage
//!
//! Manages loading and saving memberships to memberships.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{PiggyError, PiggyResult};
use crate::models::{HouseholdId, Membership, MembershipId, UserId};

use super::file_io::{read_json, write_json_atomic};
use super::traits::MembershipStore;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct MembershipData {
    memberships: Vec<Membership>,
}

/// Repository for membership persistence with a per-household index
pub struct MembershipRepository {
    path: PathBuf,
    data: RwLock<HashMap<MembershipId, Membership>>,
    /// Index: household_id -> membership_ids, in insertion order
    by_household: RwLock<HashMap<HouseholdId, Vec<MembershipId>>>,
}

impl MembershipRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_household: RwLock::new(HashMap::new()),
        }
    }

    /// Load memberships from disk and build the index
    pub fn load(&self) -> Result<(), PiggyError> {
        let file_data: MembershipData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut by_household = self.by_household.write().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        by_household.clear();

        // Saved oldest first, so the index keeps join order
        for membership in file_data.memberships {
            by_household
                .entry(membership.household_id)
                .or_default()
                .push(membership.id);
            data.insert(membership.id, membership);
        }

        Ok(())
    }

    /// Save memberships to disk
    pub fn save(&self) -> Result<(), PiggyError> {
        let data = self.data.read().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        let by_household = self.by_household.read().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut households: Vec<_> = by_household.keys().copied().collect();
        households.sort();

        let memberships: Vec<_> = households
            .iter()
            .flat_map(|h| by_household.get(h).into_iter().flatten())
            .filter_map(|id| data.get(id).cloned())
            .collect();

        write_json_atomic(&self.path, &MembershipData { memberships })
    }

    /// Find the membership for a (user, household) pair
    pub fn get_for(
        &self,
        user_id: UserId,
        household_id: HouseholdId,
    ) -> Result<Option<Membership>, PiggyError> {
        let data = self.data.read().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data
            .values()
            .find(|m| m.user_id == user_id && m.household_id == household_id)
            .cloned())
    }

    /// Insert a membership unless the pair already exists
    ///
    /// Returns the stored membership and whether it was newly inserted.
    pub fn insert(&self, membership: Membership) -> Result<(Membership, bool), PiggyError> {
        let mut data = self.data.write().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut by_household = self.by_household.write().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        if let Some(existing) = data.values().find(|m| {
            m.user_id == membership.user_id && m.household_id == membership.household_id
        }) {
            return Ok((existing.clone(), false));
        }

        by_household
            .entry(membership.household_id)
            .or_default()
            .push(membership.id);
        data.insert(membership.id, membership.clone());

        Ok((membership, true))
    }

    /// Delete a membership
    pub fn delete(&self, id: MembershipId) -> Result<bool, PiggyError> {
        let mut data = self.data.write().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut by_household = self.by_household.write().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let Some(membership) = data.remove(&id) else {
            return Ok(false);
        };
        if let Some(ids) = by_household.get_mut(&membership.household_id) {
            ids.retain(|m| *m != id);
        }
        Ok(true)
    }

    /// Memberships of a household in join order
    pub fn get_by_household(&self, household_id: HouseholdId) -> Result<Vec<Membership>, PiggyError> {
        let data = self.data.read().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        let by_household = self.by_household.read().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let ids = by_household.get(&household_id).map(|v| v.as_slice()).unwrap_or(&[]);
        Ok(ids.iter().filter_map(|id| data.get(id).cloned()).collect())
    }

    /// Memberships held by a user, oldest first
    pub fn get_by_user(&self, user_id: UserId) -> Result<Vec<Membership>, PiggyError> {
        let data = self.data.read().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut memberships: Vec<_> = data
            .values()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect();
        memberships.sort_by(|a, b| a.joined_at.cmp(&b.joined_at));
        Ok(memberships)
    }
}

impl MembershipStore for MembershipRepository {
    fn insert_membership(&self, membership: Membership) -> PiggyResult<Membership> {
        let (stored, inserted) = self.insert(membership)?;
        if inserted {
            if let Err(e) = self.save() {
                self.delete(stored.id)?;
                return Err(e);
            }
        }
        Ok(stored)
    }

    fn memberships_of(&self, household_id: HouseholdId) -> PiggyResult<Vec<Membership>> {
        self.get_by_household(household_id)
    }

    fn memberships_for_user(&self, user_id: UserId) -> PiggyResult<Vec<Membership>> {
        self.get_by_user(user_id)
    }
}
