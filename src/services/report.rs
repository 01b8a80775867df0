//! Report service
//!
//! Totals a user's shares over a period of calendar days, renders the result
//! and keeps it for later download by its owner.

use std::path::PathBuf;

use crate::audit::{self, AuditEntry, AuditLogger, EntityType};
use crate::error::{PiggyError, PiggyResult};
use crate::models::{Caller, Money, PaymentStatus, Report, ReportPeriod, UserId};
use crate::reports::ReportRenderer;
use crate::storage::{ExpenseStore, ReportStore, ShareStore, Storage};

/// Raw report parameters, as submitted by a form or the command line
#[derive(Debug, Clone, Default)]
pub struct ReportRequest {
    /// `YYYY-MM-DD`
    pub period_start: String,
    /// `YYYY-MM-DD`, inclusive
    pub period_end: String,
    /// `all`, `paid` or `unpaid`; anything else means `all`
    pub payment_status: String,
}

impl ReportRequest {
    pub fn new(
        period_start: impl Into<String>,
        period_end: impl Into<String>,
        payment_status: impl Into<String>,
    ) -> Self {
        Self {
            period_start: period_start.into(),
            period_end: period_end.into(),
            payment_status: payment_status.into(),
        }
    }
}

/// A report together with its rendered document
#[derive(Debug, Clone)]
pub struct ReportFile {
    pub report: Report,
    pub path: PathBuf,
}

/// Service for generating and retrieving reports
pub struct ReportService<'a> {
    shares: &'a dyn ShareStore,
    expenses: &'a dyn ExpenseStore,
    reports: &'a dyn ReportStore,
    renderer: &'a dyn ReportRenderer,
    audit: Option<&'a AuditLogger>,
}

impl<'a> ReportService<'a> {
    pub fn new(
        shares: &'a dyn ShareStore,
        expenses: &'a dyn ExpenseStore,
        reports: &'a dyn ReportStore,
        renderer: &'a dyn ReportRenderer,
    ) -> Self {
        Self {
            shares,
            expenses,
            reports,
            renderer,
            audit: None,
        }
    }

    /// Wire the service to the JSON store with the given renderer
    pub fn from_storage(storage: &'a Storage, renderer: &'a dyn ReportRenderer) -> Self {
        Self::new(&storage.shares, &storage.expenses, &storage.reports, renderer)
            .with_audit(&storage.audit)
    }

    pub fn with_audit(mut self, audit: &'a AuditLogger) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Sum a user's shares whose expense was created within the period
    pub fn total_for(
        &self,
        user_id: UserId,
        period: &ReportPeriod,
        status: PaymentStatus,
    ) -> PiggyResult<Money> {
        let mut total = Money::zero();

        for share in self.shares.shares_for_user(user_id)? {
            if !status.matches(share.paid) {
                continue;
            }

            let Some(expense) = self.expenses.expense(share.expense_id)? else {
                tracing::warn!(
                    share_id = %share.id,
                    expense_id = %share.expense_id,
                    "share refers to unknown expense"
                );
                continue;
            };

            if period.contains(expense.created_at) {
                total = total
                    .checked_add(share.amount)
                    .ok_or_else(|| PiggyError::total_out_of_range("Report total"))?;
            }
        }

        Ok(total)
    }

    /// Generate, render and store a report for the caller
    pub fn generate(&self, caller: &Caller, request: &ReportRequest) -> PiggyResult<Report> {
        let user = caller.require()?;

        let period = ReportPeriod::parse(&request.period_start, &request.period_end)?;
        let status = PaymentStatus::parse_lenient(request.payment_status.trim());

        let total = self.total_for(user.id, &period, status)?;
        let report = Report::new(user.id, &period, total, status);

        // A stored row must always have its document
        let path = self.renderer.render(&report)?;
        if let Err(e) = self.reports.insert_report(report.clone()) {
            if let Err(cleanup) = self.renderer.discard(&report.file_name) {
                tracing::error!(
                    file = %report.file_name,
                    error = %cleanup,
                    "failed to discard rendered report"
                );
            }
            return Err(e);
        }

        tracing::info!(
            report_id = %report.id,
            user = %user.username,
            total = %report.total,
            status = %report.payment_status,
            path = %path.display(),
            "report generated"
        );
        audit::record(
            self.audit,
            AuditEntry::created(EntityType::Report, report.id.to_string(), &report)
                .named(report.file_name.clone())
                .by(user.username.clone()),
        );

        Ok(report)
    }

    /// The caller's reports, newest first
    pub fn list(&self, caller: &Caller) -> PiggyResult<Vec<Report>> {
        let user = caller.require()?;
        self.reports.reports_for_user(user.id)
    }

    /// Locate a report document the caller owns
    pub fn download(&self, caller: &Caller, file_name: &str) -> PiggyResult<ReportFile> {
        let user = caller.require()?;

        let file_name = file_name.trim();
        if file_name.is_empty() || file_name.contains(['/', '\\']) || file_name.contains("..") {
            return Err(PiggyError::report_not_found(file_name));
        }

        let report = self
            .reports
            .report_by_file_name(file_name)?
            .ok_or_else(|| PiggyError::report_not_found(file_name))?;

        if report.user_id != user.id {
            tracing::warn!(file = %file_name, user = %user.username, "report download refused");
            return Err(PiggyError::Forbidden(format!(
                "report '{}' belongs to another user",
                file_name
            )));
        }

        let path = self.renderer.path_for(&report.file_name);
        if !path.is_file() {
            return Err(PiggyError::report_not_found(file_name));
        }

        Ok(ReportFile { report, path })
    }
}
