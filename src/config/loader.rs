//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the overtime
//! policy from a YAML file.

use rust_decimal::Decimal;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::PolicyConfig;

/// The weekday tier boundary the buffer must stay below.
const WEEKDAY_FIRST_TIER_END: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// Loads and provides access to the overtime policy.
///
/// # Directory Structure
///
/// ```text
/// config/
/// └── policy.yaml   # Buffer hours, daily maximum, allocation mode
/// ```
///
/// # Example
///
/// ```no_run
/// use overtime_ledger::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config").unwrap();
/// println!("Buffer: {} hours", loader.policy().buffer_hours);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    policy: PolicyConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - `policy.yaml` is missing
    /// - `policy.yaml` contains invalid YAML
    /// - a value is out of range
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let policy_path = path.as_ref().join("policy.yaml");
        let policy = Self::load_yaml::<PolicyConfig>(&policy_path)?;
        Self::from_policy(policy)
    }

    /// Builds a loader around an in-memory policy, applying the same validation as [`load`](Self::load).
    pub fn from_policy(policy: PolicyConfig) -> EngineResult<Self> {
        Self::validate(&policy)?;
        Ok(Self { policy })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn validate(policy: &PolicyConfig) -> EngineResult<()> {
        if policy.buffer_hours < Decimal::ZERO || policy.buffer_hours >= WEEKDAY_FIRST_TIER_END {
            return Err(EngineError::InvalidConfig {
                field: "buffer_hours".to_string(),
                message: format!(
                    "must be at least 0 and below {}, got {}",
                    WEEKDAY_FIRST_TIER_END, policy.buffer_hours
                ),
            });
        }

        if policy.max_daily_hours <= Decimal::ZERO {
            return Err(EngineError::InvalidConfig {
                field: "max_daily_hours".to_string(),
                message: format!("must be positive, got {}", policy.max_daily_hours),
            });
        }

        Ok(())
    }

    /// Returns the loaded policy.
    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AllocationMode;
    use std::path::PathBuf;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn scratch_dir(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "overtime-ledger-config-{}-{}",
            name,
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("policy.yaml"), contents).unwrap();
        dir
    }

    #[test]
    fn test_load_shipped_policy() {
        let loader = ConfigLoader::load("config").unwrap();
        let policy = loader.policy();
        assert_eq!(policy.buffer_hours, dec("7.25"));
        assert_eq!(policy.max_daily_hours, dec("24"));
        assert_eq!(policy.allocation_mode, AllocationMode::Atomic);
    }

    #[test]
    fn test_shipped_policy_matches_default() {
        let loader = ConfigLoader::load("config").unwrap();
        assert_eq!(loader.policy(), &PolicyConfig::default());
    }

    #[test]
    fn test_missing_directory_reports_config_not_found() {
        let err = ConfigLoader::load("/definitely/not/here").unwrap_err();
        assert!(matches!(err, EngineError::ConfigNotFound { .. }));
        assert!(err.to_string().contains("policy.yaml"));
    }

    #[test]
    fn test_invalid_yaml_reports_parse_error() {
        let dir = scratch_dir("bad-yaml", "buffer_hours: [unclosed");
        let err = ConfigLoader::load(&dir).unwrap_err();
        assert!(matches!(err, EngineError::ConfigParseError { .. }));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = scratch_dir("partial", "allocation_mode: partial_commit\n");
        let loader = ConfigLoader::load(&dir).unwrap();
        assert_eq!(loader.policy().allocation_mode, AllocationMode::PartialCommit);
        assert_eq!(loader.policy().buffer_hours, dec("7.25"));
    }

    #[test]
    fn test_buffer_out_of_range_rejected() {
        let policy = PolicyConfig {
            buffer_hours: dec("8"),
            ..PolicyConfig::default()
        };
        let err = ConfigLoader::from_policy(policy).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig { ref field, .. } if field == "buffer_hours"));
    }

    #[test]
    fn test_non_positive_daily_maximum_rejected() {
        let policy = PolicyConfig {
            max_daily_hours: Decimal::ZERO,
            ..PolicyConfig::default()
        };
        assert!(ConfigLoader::from_policy(policy).is_err());
    }
}
