//! Equal split of an expense among household members
//!
//! Every member owes the same amount: the expense divided by the member count,
//! rounded up to the next cent. The shares therefore cover the expense and may
//! exceed it by less than one cent per member.

use crate::models::Money;

/// Split `amount` into `member_count` identical shares
///
/// Returns an empty vector when there are no members.
pub fn split(amount: Money, member_count: usize) -> Vec<Money> {
    if member_count == 0 {
        return Vec::new();
    }

    vec![per_member(amount, member_count); member_count]
}

/// The amount each of `member_count` members owes, rounded up to the cent
///
/// `member_count` must be non-zero.
pub fn per_member(amount: Money, member_count: usize) -> Money {
    let count = i64::try_from(member_count).unwrap_or(i64::MAX);
    let cents = amount.cents();

    let mut share = cents / count;
    if cents % count > 0 {
        share += 1;
    }

    Money::from_cents(share)
}
