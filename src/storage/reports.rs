//! Report repository for JSON storage
//!
//! Stores report metadata in reports.json; the rendered documents live in
//! the reports directory and are looked up by file name.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{PiggyError, PiggyResult};
use crate::models::{Report, ReportId, UserId};

use super::file_io::{read_json, write_json_atomic};
use super::traits::ReportStore;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ReportData {
    reports: Vec<Report>,
}

pub struct ReportRepository {
    path: PathBuf,
    data: RwLock<HashMap<ReportId, Report>>,
}

impl ReportRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), PiggyError> {
        let file_data: ReportData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        for report in file_data.reports {
            data.insert(report.id, report);
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), PiggyError> {
        let data = self.data.read().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut reports: Vec<_> = data.values().cloned().collect();
        reports.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));

        write_json_atomic(&self.path, &ReportData { reports })
    }

    /// Insert a report, rejecting a file name already in use
    pub fn insert(&self, report: Report) -> Result<(), PiggyError> {
        let mut data = self.data.write().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        if data
            .values()
            .any(|r| r.id != report.id && r.file_name == report.file_name)
        {
            return Err(PiggyError::Duplicate {
                entity_type: "Report",
                identifier: report.file_name,
            });
        }

        data.insert(report.id, report);
        Ok(())
    }

    /// Delete a report row
    pub fn delete(&self, id: ReportId) -> Result<bool, PiggyError> {
        let mut data = self.data.write().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(data.remove(&id).is_some())
    }

    pub fn get_by_file_name(&self, file_name: &str) -> Result<Option<Report>, PiggyError> {
        let data = self.data.read().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.values().find(|r| r.file_name == file_name).cloned())
    }

    /// Reports of a user, most recently generated first
    pub fn get_by_user(&self, user_id: UserId) -> Result<Vec<Report>, PiggyError> {
        let data = self.data.read().map_err(|e| {
            PiggyError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut reports: Vec<_> = data
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        reports.sort_by(|a, b| {
            b.generated_at
                .cmp(&a.generated_at)
                .then(b.file_name.cmp(&a.file_name))
        });
        Ok(reports)
    }
}

impl ReportStore for ReportRepository {
    fn insert_report(&self, report: Report) -> PiggyResult<()> {
        let id = report.id;
        self.insert(report)?;

        if let Err(e) = self.save() {
            self.delete(id)?;
            return Err(e);
        }
        Ok(())
    }

    fn reports_for_user(&self, user_id: UserId) -> PiggyResult<Vec<Report>> {
        self.get_by_user(user_id)
    }

    fn report_by_file_name(&self, file_name: &str) -> PiggyResult<Option<Report>> {
        self.get_by_file_name(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, PaymentStatus, ReportPeriod};
    use chrono::Duration;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, ReportRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("reports.json");
        let repo = ReportRepository::new(path);
        (temp_dir, repo)
    }

    fn report_for(user: UserId) -> Report {
        let period = ReportPeriod::parse("2024-03-01", "2024-03-31").unwrap();
        Report::new(user, &period, Money::from_cents(4200), PaymentStatus::All)
    }

    #[test]
    fn test_reports_for_user_newest_first() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let user = UserId::new();
        let mut older = report_for(user);
        older.generated_at -= Duration::hours(1);
        let newer = report_for(user);
        let newer_name = newer.file_name.clone();

        repo.insert_report(older).unwrap();
        repo.insert_report(newer).unwrap();
        repo.insert_report(report_for(UserId::new())).unwrap();

        let reports = repo.reports_for_user(user).unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].file_name, newer_name);
    }

    #[test]
    fn test_duplicate_file_name_rejected() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let report = report_for(UserId::new());
        let mut clash = report_for(UserId::new());
        clash.file_name = report.file_name.clone();

        repo.insert_report(report).unwrap();
        assert!(repo.insert_report(clash).unwrap_err().is_conflict());
    }

    #[test]
    fn test_lookup_by_file_name_after_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let report = report_for(UserId::new());
        let name = report.file_name.clone();
        repo.insert_report(report.clone()).unwrap();

        let repo2 = ReportRepository::new(temp_dir.path().join("reports.json"));
        repo2.load().unwrap();
        assert_eq!(repo2.report_by_file_name(&name).unwrap(), Some(report));
        assert!(repo2.report_by_file_name("report_x.pdf").unwrap().is_none());
    }
}
