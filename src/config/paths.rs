//! Path management for PiggyBank
//!
//! ## Path Resolution Order
//!
//! 1. `PIGGYBANK_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/piggybank` or `~/.config/piggybank`
//! 3. Windows: `%APPDATA%\piggybank`

use std::path::PathBuf;

use crate::error::PiggyError;

/// Manages all paths used by PiggyBank
#[derive(Debug, Clone)]
pub struct PiggyPaths {
    /// Base directory for all PiggyBank data
    base_dir: PathBuf,
}

impl PiggyPaths {
    /// Resolve the base directory from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home or config directory can be determined.
    pub fn new() -> Result<Self, PiggyError> {
        let base_dir = if let Ok(custom) = std::env::var("PIGGYBANK_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create PiggyPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (<base>/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the directory generated report files are written to (<base>/reports/)
    pub fn reports_dir(&self) -> PathBuf {
        self.base_dir.join("reports")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    pub fn users_file(&self) -> PathBuf {
        self.data_dir().join("users.json")
    }

    pub fn households_file(&self) -> PathBuf {
        self.data_dir().join("households.json")
    }

    pub fn memberships_file(&self) -> PathBuf {
        self.data_dir().join("memberships.json")
    }

    pub fn expenses_file(&self) -> PathBuf {
        self.data_dir().join("expenses.json")
    }

    pub fn shares_file(&self) -> PathBuf {
        self.data_dir().join("shares.json")
    }

    /// Get the path to reports.json (report index, not the rendered files)
    pub fn reports_file(&self) -> PathBuf {
        self.data_dir().join("reports.json")
    }

    /// Ensure the base, data and reports directories exist
    pub fn ensure_directories(&self) -> Result<(), PiggyError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| PiggyError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| PiggyError::Io(format!("Failed to create data directory: {}", e)))?;

        std::fs::create_dir_all(self.reports_dir())
            .map_err(|e| PiggyError::Io(format!("Failed to create reports directory: {}", e)))?;

        Ok(())
    }

    /// Check if PiggyBank has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, PiggyError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => {
            let home = std::env::var("HOME").map_err(|_| {
                PiggyError::Config("Could not determine HOME directory".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("piggybank"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, PiggyError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| PiggyError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("piggybank"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PiggyPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
        assert_eq!(paths.reports_dir(), temp_dir.path().join("reports"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PiggyPaths::with_base_dir(temp_dir.path().to_path_buf());

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().exists());
        assert!(paths.reports_dir().exists());
        assert!(!paths.is_initialized());
    }

    #[test]
    fn test_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PiggyPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(
            paths.shares_file(),
            temp_dir.path().join("data").join("shares.json")
        );
        assert_eq!(
            paths.reports_file(),
            temp_dir.path().join("data").join("reports.json")
        );
    }
}
