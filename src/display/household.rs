//! Household display formatting

use crate::models::Household;
use crate::services::{HouseholdCreated, MemberDetail};

/// Format a list of households as name/description lines
pub fn format_household_list(households: &[Household]) -> String {
    if households.is_empty() {
        return "No households found.".to_string();
    }

    let name_width = households
        .iter()
        .map(|h| h.name.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    for household in households {
        output.push_str(&format!(
            "  {:<name_width$}  {}\n",
            household.name,
            household.description,
            name_width = name_width,
        ));
    }
    output
}

/// Format the members of a household, owner first
pub fn format_member_list(members: &[MemberDetail]) -> String {
    if members.is_empty() {
        return "No members.".to_string();
    }

    let name_width = members
        .iter()
        .map(|m| m.user.username.len())
        .max()
        .unwrap_or(8)
        .max(8);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<6}  {}\n",
        "Username",
        "Role",
        "Joined",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<6}  {:-<10}\n",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for member in members {
        output.push_str(&format!(
            "{:<name_width$}  {:<6}  {}\n",
            member.user.username,
            member.membership.role.as_str(),
            member.membership.joined_at.format("%Y-%m-%d"),
            name_width = name_width,
        ));
    }
    output
}

/// Summary printed after creating a household
pub fn format_household_created(created: &HouseholdCreated) -> String {
    let mut output = format!("Created household: {}\n", created.household.name);
    output.push_str(&format!("  ID: {}\n", created.household.id));
    output.push_str(&format!("  Members added: {}\n", created.members.len()));

    if !created.skipped.is_empty() {
        output.push_str(&format!(
            "  Skipped (unknown users): {}\n",
            created.skipped.join(", ")
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Membership, Role, User};

    #[test]
    fn test_format_member_list() {
        let alice = User::new("alice", "alice@example.com");
        let household = Household::new("Flat", "", alice.id);
        let members = vec![MemberDetail {
            membership: Membership::new(alice.id, household.id, Role::Owner),
            user: alice,
        }];

        let output = format_member_list(&members);
        assert!(output.starts_with("Username"));
        assert!(output.contains("alice"));
        assert!(output.contains("owner"));
    }

    #[test]
    fn test_format_empty_lists() {
        assert_eq!(format_household_list(&[]), "No households found.");
        assert_eq!(format_member_list(&[]), "No members.");
    }
}
