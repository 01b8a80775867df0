//! Household and membership models
//!
//! A household is the group that scopes membership, expenses and splitting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{HouseholdId, MembershipId, UserId};

/// Role a user holds inside a household
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Created the household; exactly one per household
    Owner,
    Member,
}

impl Role {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "owner" => Some(Self::Owner),
            "member" => Some(Self::Member),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Member => "member",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A shared household
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Household {
    pub id: HouseholdId,

    /// Unique, non-empty name
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// The user who created (and owns) the household
    pub created_by: UserId,

    pub created_at: DateTime<Utc>,
}

impl Household {
    pub fn new(name: impl Into<String>, description: impl Into<String>, created_by: UserId) -> Self {
        Self {
            id: HouseholdId::new(),
            name: name.into(),
            description: description.into(),
            created_by,
            created_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Household name cannot be empty".into());
        }
        Ok(())
    }
}

impl fmt::Display for Household {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A user's membership in a household
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    pub id: MembershipId,
    pub user_id: UserId,
    pub household_id: HouseholdId,
    pub role: Role,
    pub joined_at: DateTime<Utc>,
}

impl Membership {
    pub fn new(user_id: UserId, household_id: HouseholdId, role: Role) -> Self {
        Self {
            id: MembershipId::new(),
            user_id,
            household_id,
            role,
            joined_at: Utc::now(),
        }
    }

    pub fn is_owner(&self) -> bool {
        self.role == Role::Owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("Owner"), Some(Role::Owner));
        assert_eq!(Role::parse("member"), Some(Role::Member));
        assert_eq!(Role::parse("admin"), None);
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Owner).unwrap(), "\"owner\"");
    }

    #[test]
    fn test_household_validation() {
        let owner = UserId::new();
        assert!(Household::new("Flat 4", "", owner).validate().is_ok());
        assert!(Household::new("   ", "", owner).validate().is_err());
    }

    #[test]
    fn test_membership_owner() {
        let m = Membership::new(UserId::new(), HouseholdId::new(), Role::Owner);
        assert!(m.is_owner());
    }
}
