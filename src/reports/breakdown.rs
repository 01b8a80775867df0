//! Share breakdowns
//!
//! Sums a set of shares by household, by expense category or by payment
//! status. The functions only look at the shares they are given; choosing
//! which shares to pass (for instance only unpaid ones) is up to the caller.
//! A total that overflows `Money` is a validation error.

use std::collections::BTreeMap;

use crate::error::{PiggyError, PiggyResult};
use crate::models::{Money, ShareDetail};

/// One labelled total in a breakdown
#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownEntry {
    pub label: String,
    pub total: Money,
    /// Number of shares that went into the total
    pub share_count: usize,
    /// Share of the breakdown's grand total, 0-100
    pub percentage: f64,
}

/// Labelled totals, in label order (status breakdowns: Unpaid, Paid)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Breakdown {
    pub entries: Vec<BreakdownEntry>,
}

impl Breakdown {
    fn from_totals(totals: Vec<(String, Money, usize)>) -> PiggyResult<Self> {
        let grand_total = Money::checked_sum(totals.iter().map(|(_, total, _)| *total))
            .ok_or_else(|| PiggyError::total_out_of_range("Chart total"))?;

        let entries = totals
            .into_iter()
            .map(|(label, total, share_count)| BreakdownEntry {
                percentage: if grand_total.is_zero() {
                    0.0
                } else {
                    (total.cents() as f64 / grand_total.cents() as f64) * 100.0
                },
                label,
                total,
                share_count,
            })
            .collect();

        Ok(Self { entries })
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    pub fn totals(&self) -> Vec<Money> {
        self.entries.iter().map(|e| e.total).collect()
    }

    /// Sum over every entry
    pub fn total(&self) -> Money {
        self.entries
            .iter()
            .fold(Money::zero(), |acc, e| acc.saturating_add(e.total))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn add_share(bucket: &mut (Money, usize), detail: &ShareDetail) -> PiggyResult<()> {
    bucket.0 = bucket
        .0
        .checked_add(detail.share.amount)
        .ok_or_else(|| PiggyError::total_out_of_range("Chart total"))?;
    bucket.1 += 1;
    Ok(())
}

fn group_by<F>(shares: &[ShareDetail], key: F) -> PiggyResult<Breakdown>
where
    F: Fn(&ShareDetail) -> String,
{
    let mut groups: BTreeMap<String, (Money, usize)> = BTreeMap::new();
    for detail in shares {
        add_share(groups.entry(key(detail)).or_insert((Money::zero(), 0)), detail)?;
    }

    Breakdown::from_totals(
        groups
            .into_iter()
            .map(|(label, (total, count))| (label, total, count))
            .collect(),
    )
}

/// Sum shares by the name of their expense's household
pub fn by_household(shares: &[ShareDetail]) -> PiggyResult<Breakdown> {
    group_by(shares, |d| d.household_name.clone())
}

/// Sum shares by their expense's category
pub fn by_category(shares: &[ShareDetail]) -> PiggyResult<Breakdown> {
    group_by(shares, |d| d.expense.category.to_string())
}

/// Sum shares into an "Unpaid" and a "Paid" bucket, always both, in that order
pub fn by_status(shares: &[ShareDetail]) -> PiggyResult<Breakdown> {
    let mut unpaid = (Money::zero(), 0);
    let mut paid = (Money::zero(), 0);

    for detail in shares {
        let bucket = if detail.share.paid { &mut paid } else { &mut unpaid };
        add_share(bucket, detail)?;
    }

    Breakdown::from_totals(vec![
        ("Unpaid".to_string(), unpaid.0, unpaid.1),
        ("Paid".to_string(), paid.0, paid.1),
    ])
}
