//! Storage initialization
//!
//! Handles first-run setup: directories, default settings and empty data files.

use crate::config::paths::PiggyPaths;
use crate::config::settings::Settings;
use crate::error::PiggyError;

use super::file_io::write_json_atomic;

/// Initialize storage for a fresh installation
///
/// Existing files are left untouched, so running this twice is harmless.
/// Returns true if the settings file was created by this call.
pub fn initialize_storage(paths: &PiggyPaths) -> Result<bool, PiggyError> {
    paths.ensure_directories()?;

    let created = !paths.settings_file().exists();
    if created {
        Settings::default().save(paths)?;
    }

    let empty_files = [
        (paths.users_file(), "users"),
        (paths.households_file(), "households"),
        (paths.memberships_file(), "memberships"),
        (paths.expenses_file(), "expenses"),
        (paths.shares_file(), "shares"),
        (paths.reports_file(), "reports"),
    ];

    for (path, key) in empty_files {
        if !path.exists() {
            write_json_atomic(&path, &serde_json::json!({ key: [] }))?;
        }
    }

    Ok(created)
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &PiggyPaths) -> bool {
    !paths.is_initialized()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Storage;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_creates_layout() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PiggyPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(needs_initialization(&paths));
        assert!(initialize_storage(&paths).unwrap());
        assert!(!needs_initialization(&paths));

        assert!(paths.settings_file().exists());
        assert!(paths.users_file().exists());
        assert!(paths.reports_dir().exists());

        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        assert!(storage.users.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PiggyPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(initialize_storage(&paths).unwrap());
        assert!(!initialize_storage(&paths).unwrap());
    }
}
