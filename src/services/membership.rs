//! Membership service
//!
//! Households and who belongs to them. A household is created together with
//! its owner's membership; everyone added afterwards joins as a member.

use crate::audit::{self, AuditEntry, AuditLogger, EntityType};
use crate::error::{PiggyError, PiggyResult};
use crate::models::{Caller, Household, HouseholdId, Membership, Role, User, UserId};
use crate::storage::{HouseholdStore, MembershipStore, Storage, UserStore};

/// Result of creating a household
#[derive(Debug, Clone)]
pub struct HouseholdCreated {
    pub household: Household,
    pub owner: Membership,
    /// Memberships created for the requested members
    pub members: Vec<Membership>,
    /// Requested usernames that did not resolve to a user
    pub skipped: Vec<String>,
}

/// A membership joined with the member's user record
#[derive(Debug, Clone)]
pub struct MemberDetail {
    pub membership: Membership,
    pub user: User,
}

/// Service for households and memberships
pub struct MembershipService<'a> {
    users: &'a dyn UserStore,
    households: &'a dyn HouseholdStore,
    memberships: &'a dyn MembershipStore,
    audit: Option<&'a AuditLogger>,
}

impl<'a> MembershipService<'a> {
    pub fn new(
        users: &'a dyn UserStore,
        households: &'a dyn HouseholdStore,
        memberships: &'a dyn MembershipStore,
    ) -> Self {
        Self {
            users,
            households,
            memberships,
            audit: None,
        }
    }

    pub fn from_storage(storage: &'a Storage) -> Self {
        Self::new(&storage.users, &storage.households, &storage.memberships)
            .with_audit(&storage.audit)
    }

    pub fn with_audit(mut self, audit: &'a AuditLogger) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Store a membership row
    ///
    /// An existing (user, household) membership is returned as is.
    pub fn create_membership(
        &self,
        user_id: UserId,
        household_id: HouseholdId,
        role: Role,
    ) -> PiggyResult<Membership> {
        let candidate = Membership::new(user_id, household_id, role);
        let candidate_id = candidate.id;
        let stored = self.memberships.insert_membership(candidate)?;

        if stored.id == candidate_id {
            audit::record(
                self.audit,
                AuditEntry::created(EntityType::Membership, stored.id.to_string(), &stored),
            );
        } else {
            tracing::debug!(
                user_id = %user_id,
                household_id = %household_id,
                "membership already exists"
            );
        }

        Ok(stored)
    }

    /// Members of a household, the owner first
    pub fn members_of(&self, household_id: HouseholdId) -> PiggyResult<Vec<Membership>> {
        self.memberships.memberships_of(household_id)
    }

    /// Members of a household with their user records
    pub fn member_details(&self, household_id: HouseholdId) -> PiggyResult<Vec<MemberDetail>> {
        let mut details = Vec::new();
        for membership in self.members_of(household_id)? {
            match self.users.user(membership.user_id)? {
                Some(user) => details.push(MemberDetail { membership, user }),
                None => tracing::warn!(
                    user_id = %membership.user_id,
                    household_id = %household_id,
                    "membership refers to unknown user"
                ),
            }
        }
        Ok(details)
    }

    /// Create a household owned by the caller and add the listed members
    pub fn create_household(
        &self,
        caller: &Caller,
        name: &str,
        description: &str,
        member_usernames: &[String],
    ) -> PiggyResult<HouseholdCreated> {
        let owner = caller.require()?;

        let name = name.trim();
        if name.is_empty() {
            return Err(PiggyError::Validation("Household name cannot be empty".into()));
        }

        if self.households.household_by_name(name)?.is_some() {
            return Err(PiggyError::Duplicate {
                entity_type: "Household",
                identifier: name.to_string(),
            });
        }

        let household = Household::new(name, description.trim(), owner.id);
        household.validate().map_err(PiggyError::Validation)?;

        self.households.insert_household(household.clone())?;

        // The household and its owner stand or fall together
        let owner_membership = match self
            .memberships
            .insert_membership(Membership::new(owner.id, household.id, Role::Owner))
        {
            Ok(membership) => membership,
            Err(e) => {
                if let Err(cleanup) = self.households.remove_household(household.id) {
                    tracing::error!(
                        household_id = %household.id,
                        error = %cleanup,
                        "failed to remove household after owner membership failed"
                    );
                }
                return Err(e);
            }
        };

        tracing::info!(
            household_id = %household.id,
            household = %household.name,
            owner = %owner.username,
            "household created"
        );
        audit::record(
            self.audit,
            AuditEntry::created(EntityType::Household, household.id.to_string(), &household)
                .named(household.name.clone())
                .by(owner.username.clone()),
        );
        audit::record(
            self.audit,
            AuditEntry::created(
                EntityType::Membership,
                owner_membership.id.to_string(),
                &owner_membership,
            )
            .named(owner.username.clone()),
        );

        let mut members = Vec::new();
        let mut skipped = Vec::new();
        for username in member_usernames {
            let username = username.trim();
            if username.is_empty() {
                continue;
            }

            let user = match self.users.user_by_username(username) {
                Ok(Some(user)) => user,
                Ok(None) => {
                    tracing::warn!(
                        username = %username,
                        household = %household.name,
                        "skipping unknown member"
                    );
                    skipped.push(username.to_string());
                    continue;
                }
                Err(e) => {
                    tracing::warn!(username = %username, error = %e, "member lookup failed");
                    skipped.push(username.to_string());
                    continue;
                }
            };

            match self.create_membership(user.id, household.id, Role::Member) {
                Ok(membership) => {
                    let fresh = !membership.is_owner()
                        && members.iter().all(|m: &Membership| m.id != membership.id);
                    if fresh {
                        members.push(membership);
                    }
                }
                Err(e) => tracing::warn!(
                    username = %username,
                    household = %household.name,
                    error = %e,
                    "failed to add member"
                ),
            }
        }

        Ok(HouseholdCreated {
            household,
            owner: owner_membership,
            members,
            skipped,
        })
    }

    /// Add a user to a household; only the owner may do this
    pub fn add_member(
        &self,
        caller: &Caller,
        household_id: HouseholdId,
        username: &str,
    ) -> PiggyResult<Membership> {
        let acting = caller.require()?;

        let household = self
            .households
            .household(household_id)?
            .ok_or_else(|| PiggyError::household_not_found(household_id.to_string()))?;

        let is_owner = self
            .members_of(household.id)?
            .iter()
            .any(|m| m.user_id == acting.id && m.is_owner());
        if !is_owner {
            return Err(PiggyError::Forbidden(format!(
                "only the owner of '{}' can add members",
                household.name
            )));
        }

        let user = self
            .users
            .user_by_username(username.trim())?
            .ok_or_else(|| PiggyError::user_not_found(username.trim()))?;

        let membership = self.create_membership(user.id, household.id, Role::Member)?;
        tracing::info!(household = %household.name, username = %user.username, "member added");
        Ok(membership)
    }

    /// Households the user belongs to, oldest membership first
    pub fn households_for_user(&self, user_id: UserId) -> PiggyResult<Vec<Household>> {
        let mut households = Vec::new();
        for membership in self.memberships.memberships_for_user(user_id)? {
            if let Some(household) = self.households.household(membership.household_id)? {
                households.push(household);
            }
        }
        Ok(households)
    }

    /// Find a household by exact name, then by id
    pub fn find_household(&self, identifier: &str) -> PiggyResult<Household> {
        let identifier = identifier.trim();
        if let Some(household) = self.households.household_by_name(identifier)? {
            return Ok(household);
        }

        if let Ok(id) = identifier.parse::<HouseholdId>() {
            if let Some(household) = self.households.household(id)? {
                return Ok(household);
            }
        }

        Err(PiggyError::household_not_found(identifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::PiggyPaths;
    use crate::services::UserService;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = PiggyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn users(storage: &Storage, names: &[&str]) -> Vec<User> {
        let service = UserService::from_storage(storage);
        names.iter().map(|n| service.create(n, "").unwrap()).collect()
    }

    #[test]
    fn test_create_household_with_members() {
        let (_temp_dir, storage) = create_test_storage();
        let people = users(&storage, &["alice", "bob", "carol"]);
        let service = MembershipService::from_storage(&storage);

        let created = service
            .create_household(
                &Caller::user(&people[0]),
                "Flat",
                "",
                &["bob".to_string(), "nobody".to_string(), "carol".to_string()],
            )
            .unwrap();

        assert_eq!(created.owner.role, Role::Owner);
        assert_eq!(created.members.len(), 2);
        assert_eq!(created.skipped, vec!["nobody".to_string()]);

        let members = service.members_of(created.household.id).unwrap();
        let ids: Vec<_> = members.iter().map(|m| m.user_id).collect();
        assert_eq!(ids, vec![people[0].id, people[1].id, people[2].id]);
        assert_eq!(members.iter().filter(|m| m.is_owner()).count(), 1);
    }

    #[test]
    fn test_owner_listed_as_member_is_not_duplicated() {
        let (_temp_dir, storage) = create_test_storage();
        let people = users(&storage, &["alice"]);
        let service = MembershipService::from_storage(&storage);

        let created = service
            .create_household(&Caller::user(&people[0]), "Flat", "", &["alice".to_string()])
            .unwrap();

        assert!(created.members.is_empty());
        assert_eq!(service.members_of(created.household.id).unwrap().len(), 1);
    }

    #[test]
    fn test_create_household_validation() {
        let (_temp_dir, storage) = create_test_storage();
        let people = users(&storage, &["alice"]);
        let service = MembershipService::from_storage(&storage);
        let caller = Caller::user(&people[0]);

        assert!(matches!(
            service.create_household(&Caller::Anonymous, "Flat", "", &[]),
            Err(PiggyError::Unauthenticated)
        ));
        assert!(service
            .create_household(&caller, "  ", "", &[])
            .unwrap_err()
            .is_validation());

        service.create_household(&caller, "Flat", "", &[]).unwrap();
        assert!(service
            .create_household(&caller, "Flat", "", &[])
            .unwrap_err()
            .is_conflict());
    }

    #[test]
    fn test_only_owner_adds_members() {
        let (_temp_dir, storage) = create_test_storage();
        let people = users(&storage, &["alice", "bob", "carol"]);
        let service = MembershipService::from_storage(&storage);

        let household = service
            .create_household(&Caller::user(&people[0]), "Flat", "", &["bob".to_string()])
            .unwrap()
            .household;

        let err = service
            .add_member(&Caller::user(&people[1]), household.id, "carol")
            .unwrap_err();
        assert!(matches!(err, PiggyError::Forbidden(_)));

        let err = service
            .add_member(&Caller::user(&people[0]), household.id, "dave")
            .unwrap_err();
        assert!(err.is_not_found());

        let membership = service
            .add_member(&Caller::user(&people[0]), household.id, "carol")
            .unwrap();
        assert_eq!(membership.role, Role::Member);
        assert_eq!(service.members_of(household.id).unwrap().len(), 3);
    }

    #[test]
    fn test_households_for_user_and_find() {
        let (_temp_dir, storage) = create_test_storage();
        let people = users(&storage, &["alice", "bob"]);
        let service = MembershipService::from_storage(&storage);

        let flat = service
            .create_household(&Caller::user(&people[0]), "Flat", "", &["bob".to_string()])
            .unwrap()
            .household;
        service
            .create_household(&Caller::user(&people[0]), "Cabin", "", &[])
            .unwrap();

        let bobs = service.households_for_user(people[1].id).unwrap();
        assert_eq!(bobs.len(), 1);
        assert_eq!(bobs[0].id, flat.id);
        assert_eq!(service.households_for_user(people[0].id).unwrap().len(), 2);

        assert_eq!(service.find_household("Flat").unwrap().id, flat.id);
        assert_eq!(
            service.find_household(&flat.id.as_uuid().to_string()).unwrap().id,
            flat.id
        );
        assert!(service.find_household("Castle").unwrap_err().is_not_found());
    }

    #[test]
    fn test_member_details_carry_usernames() {
        let (_temp_dir, storage) = create_test_storage();
        let people = users(&storage, &["alice", "bob"]);
        let service = MembershipService::from_storage(&storage);

        let household = service
            .create_household(&Caller::user(&people[0]), "Flat", "", &["bob".to_string()])
            .unwrap()
            .household;

        let names: Vec<_> = service
            .member_details(household.id)
            .unwrap()
            .into_iter()
            .map(|d| d.user.username)
            .collect();
        assert_eq!(names, vec!["alice", "bob"]);
    }
}
