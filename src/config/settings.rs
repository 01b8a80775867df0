//! User settings for PiggyBank
//!
//! Manages preferences and the tunable business rules: expense validation
//! limits, the share fan-out failure policy and the log filter.

use serde::{Deserialize, Serialize};

use super::paths::PiggyPaths;
use crate::error::PiggyError;
use crate::models::ExpenseRules;

/// What expense creation does when a single member's share cannot be stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FanoutPolicy {
    /// Log the failure and keep going; the expense stands with fewer shares
    #[default]
    BestEffort,
    /// Remove the expense and any shares already written, then fail
    AllOrNothing,
}

impl FanoutPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "best_effort" => Some(Self::BestEffort),
            "all_or_nothing" | "atomic" => Some(Self::AllOrNothing),
            _ => None,
        }
    }
}

impl std::fmt::Display for FanoutPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BestEffort => write!(f, "best_effort"),
            Self::AllOrNothing => write!(f, "all_or_nothing"),
        }
    }
}

/// User settings for PiggyBank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Printed before report totals, on screen and in the PDF
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Limits applied when an expense is created
    #[serde(default)]
    pub expense_rules: ExpenseRules,

    /// Failure policy for the per-member share inserts
    #[serde(default)]
    pub share_fanout: FanoutPolicy,

    /// tracing filter directive used when RUST_LOG is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Emit logs as JSON lines instead of human-readable text
    #[serde(default)]
    pub log_json: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            expense_rules: ExpenseRules::default(),
            share_fanout: FanoutPolicy::default(),
            log_filter: default_log_filter(),
            log_json: false,
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &PiggyPaths) -> Result<Self, PiggyError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| PiggyError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                PiggyError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &PiggyPaths) -> Result<(), PiggyError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| PiggyError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| PiggyError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.share_fanout, FanoutPolicy::BestEffort);
        assert_eq!(settings.expense_rules.max_name_length, 40);
        assert_eq!(settings.expense_rules.minimum_amount, Money::from_cents(1000));
        assert_eq!(settings.log_filter, "warn");
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PiggyPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.share_fanout = FanoutPolicy::AllOrNothing;
        settings.currency_symbol = "zł".to_string();

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.share_fanout, FanoutPolicy::AllOrNothing);
        assert_eq!(loaded.currency_symbol, "zł");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PiggyPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        std::fs::write(paths.settings_file(), r#"{"share_fanout": "all_or_nothing"}"#).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.share_fanout, FanoutPolicy::AllOrNothing);
        assert_eq!(loaded.expense_rules, ExpenseRules::default());
    }

    #[test]
    fn test_fanout_policy_parse() {
        assert_eq!(FanoutPolicy::parse("best-effort"), Some(FanoutPolicy::BestEffort));
        assert_eq!(FanoutPolicy::parse("ALL_OR_NOTHING"), Some(FanoutPolicy::AllOrNothing));
        assert_eq!(FanoutPolicy::parse("sometimes"), None);
    }
}
