//! Report model
//!
//! A report freezes the total of a user's shares over an inclusive range of
//! calendar days. The total is stored by value, so paying a share later never
//! changes a report that was already generated.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ReportId, UserId};
use super::money::Money;

/// Which shares a report counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    All,
    Paid,
    Unpaid,
}

impl PaymentStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => Some(Self::All),
            "paid" => Some(Self::Paid),
            "unpaid" => Some(Self::Unpaid),
            _ => None,
        }
    }

    /// Parse a filter value, treating anything unrecognised as `All`
    pub fn parse_lenient(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }

    /// Whether a share with this paid state passes the filter
    pub fn matches(&self, paid: bool) -> bool {
        match self {
            Self::All => true,
            Self::Paid => paid,
            Self::Unpaid => !paid,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Paid => "paid",
            Self::Unpaid => "unpaid",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An inclusive range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodError> {
        if start > end {
            return Err(PeriodError::StartAfterEnd);
        }
        Ok(Self { start, end })
    }

    /// Parse `YYYY-MM-DD` bounds
    pub fn parse(start: &str, end: &str) -> Result<Self, PeriodError> {
        let start_date = NaiveDate::parse_from_str(start.trim(), "%Y-%m-%d")
            .map_err(|_| PeriodError::InvalidStart(start.to_string()))?;
        let end_date = NaiveDate::parse_from_str(end.trim(), "%Y-%m-%d")
            .map_err(|_| PeriodError::InvalidEnd(end.to_string()))?;
        Self::new(start_date, end_date)
    }

    /// Midnight at the start of the first day
    pub fn window_start(&self) -> DateTime<Utc> {
        self.start.and_time(chrono::NaiveTime::MIN).and_utc()
    }

    /// The last representable instant of the final day
    pub fn window_end(&self) -> DateTime<Utc> {
        let next_midnight = match self.end.succ_opt() {
            Some(next) => next.and_time(chrono::NaiveTime::MIN).and_utc(),
            None => return DateTime::<Utc>::MAX_UTC,
        };
        next_midnight - Duration::nanoseconds(1)
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.window_start() && at <= self.window_end()
    }
}

/// Reasons a report period is rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodError {
    InvalidStart(String),
    InvalidEnd(String),
    StartAfterEnd,
}

impl fmt::Display for PeriodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStart(s) => write!(f, "Invalid start date: '{}'. Use YYYY-MM-DD", s),
            Self::InvalidEnd(s) => write!(f, "Invalid end date: '{}'. Use YYYY-MM-DD", s),
            Self::StartAfterEnd => write!(f, "Start date must be before end date"),
        }
    }
}

impl std::error::Error for PeriodError {}

impl From<PeriodError> for crate::error::PiggyError {
    fn from(err: PeriodError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// A generated report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub user_id: UserId,
    pub period_start: DateTime<Utc>,

    /// Inclusive end of the last day
    pub period_end: DateTime<Utc>,

    pub total: Money,
    pub payment_status: PaymentStatus,
    pub generated_at: DateTime<Utc>,

    /// Unique; the download key
    pub file_name: String,
}

impl Report {
    pub fn new(
        user_id: UserId,
        period: &ReportPeriod,
        total: Money,
        payment_status: PaymentStatus,
    ) -> Self {
        let id = ReportId::new();
        let generated_at = Utc::now();
        let file_name = format!(
            "report_{}_{}_{}.pdf",
            user_id.short(),
            generated_at.timestamp_millis(),
            id.short()
        );
        Self {
            id,
            user_id,
            period_start: period.window_start(),
            period_end: period.window_end(),
            total,
            payment_status,
            generated_at,
            file_name,
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.period_start.date_naive()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.period_end.date_naive()
    }
}
