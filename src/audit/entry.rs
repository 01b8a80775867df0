//! One line of the audit trail

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    /// Removal of a row, e.g. when an all-or-nothing expense is rolled back
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    User,
    Household,
    Membership,
    Expense,
    Share,
    Report,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::User => "user",
            EntityType::Household => "household",
            EntityType::Membership => "membership",
            EntityType::Expense => "expense",
            EntityType::Share => "share",
            EntityType::Report => "report",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded change to one PiggyBank row.
///
/// Built with [`AuditEntry::created`], [`AuditEntry::changed`] or
/// [`AuditEntry::removed`] and then decorated:
///
/// ```ignore
/// AuditEntry::created(EntityType::Expense, expense.id.to_string(), &expense)
///     .named(&expense.name)
///     .by(&creator.username)
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub operation: Operation,
    pub entity_type: EntityType,
    pub entity_id: String,

    /// Expense name, username, report file name...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    /// Username of the caller
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl AuditEntry {
    fn blank(operation: Operation, entity_type: EntityType, entity_id: String) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id,
            entity_name: None,
            actor: None,
            before: None,
            after: None,
            summary: None,
        }
    }

    /// A new row; its state goes into `after`
    pub fn created<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        row: &T,
    ) -> Self {
        let mut entry = Self::blank(Operation::Create, entity_type, entity_id.into());
        entry.after = serde_json::to_value(row).ok();
        entry
    }

    pub fn changed<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        before: &T,
        after: &T,
    ) -> Self {
        let mut entry = Self::blank(Operation::Update, entity_type, entity_id.into());
        entry.before = serde_json::to_value(before).ok();
        entry.after = serde_json::to_value(after).ok();
        entry
    }

    /// A removed row; its last state goes into `before`
    pub fn removed<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        row: &T,
    ) -> Self {
        let mut entry = Self::blank(Operation::Delete, entity_type, entity_id.into());
        entry.before = serde_json::to_value(row).ok();
        entry
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.entity_name = Some(name.into());
        self
    }

    pub fn by(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lowercase_names_on_the_wire() {
        assert_eq!(serde_json::to_string(&EntityType::Share).unwrap(), "\"share\"");
        assert_eq!(serde_json::to_string(&Operation::Delete).unwrap(), "\"delete\"");
        assert_eq!(EntityType::Household.to_string(), "household");
    }

    #[test]
    fn test_created_expense_carries_name_and_actor() {
        let entry = AuditEntry::created(
            EntityType::Expense,
            "exp-12345678",
            &json!({"name": "Rent", "amount": 10000}),
        )
        .named("Rent")
        .by("alice");

        assert_eq!(entry.operation, Operation::Create);
        assert_eq!(entry.entity_name.as_deref(), Some("Rent"));
        assert_eq!(entry.actor.as_deref(), Some("alice"));
        assert!(entry.before.is_none());
        assert_eq!(entry.after, Some(json!({"name": "Rent", "amount": 10000})));
    }

    #[test]
    fn test_paid_share_keeps_both_states() {
        let entry = AuditEntry::changed(
            EntityType::Share,
            "shr-12345678",
            &json!({"paid": false}),
            &json!({"paid": true}),
        )
        .summary("paid: false -> true");

        assert_eq!(entry.operation, Operation::Update);
        assert_eq!(entry.before, Some(json!({"paid": false})));
        assert_eq!(entry.after, Some(json!({"paid": true})));
        assert!(entry.actor.is_none());
    }

    #[test]
    fn test_removed_row_has_no_after() {
        let entry = AuditEntry::removed(EntityType::Expense, "exp-1", &json!({"name": "Rent"}));

        assert_eq!(entry.operation, Operation::Delete);
        assert!(entry.before.is_some());
        assert!(entry.after.is_none());

        let line = serde_json::to_string(&entry).unwrap();
        assert!(!line.contains("\"after\""));
        assert!(!line.contains("\"actor\""));
    }
}
