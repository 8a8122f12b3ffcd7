//! User configuration
//!
//! Read from `~/.config/sfmc/config.yaml` unless `--config` points elsewhere.
//! Command-line flags and `SFMC_*` variables take precedence over the file.

use serde::{Deserialize, Serialize};
use sfmc_arm::DEFAULT_PAGE_SIZE;
use std::path::{Path, PathBuf};

use crate::error::{CliError, Result};

/// Subscription used when none is configured
pub const DEFAULT_SUBSCRIPTION: &str = "00000000-0000-0000-0000-000000000000";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub default_subscription: Option<String>,

    /// Directory holding resource documents
    pub state_dir: Option<PathBuf>,

    pub page_size: Option<usize>,

    /// Location for new clusters when `--location` is omitted
    pub default_location: Option<String>,
}

impl Config {
    /// Default config path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sfmc").join("config.yaml"))
    }

    /// Load from `path`, or from the default path when `None`
    ///
    /// A missing default file yields the defaults; a missing explicit file
    /// is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match Self::default_path() {
                Some(path) => (path, false),
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            if explicit {
                return Err(CliError::config(
                    format!("config file {} does not exist", path.display()),
                    None,
                ));
            }
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        Self::parse(&content).map_err(|e| {
            CliError::config(
                format!("failed to parse {}: {}", path.display(), e),
                Some("Expected camelCase keys: defaultSubscription, stateDir, pageSize, defaultLocation".into()),
            )
        })
    }

    fn parse(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    pub fn subscription(&self) -> &str {
        self.default_subscription
            .as_deref()
            .unwrap_or(DEFAULT_SUBSCRIPTION)
    }

    /// Configured state directory, else `<data dir>/sfmc/state`
    pub fn state_dir(&self) -> PathBuf {
        self.state_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("sfmc")
                .join("state")
        })
    }

    pub fn page_size(&self) -> usize {
        self.page_size.filter(|size| *size > 0).unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_camel_case() {
        let config = Config::parse(
            "defaultSubscription: 11111111-2222-3333-4444-555555555555\npageSize: 10\ndefaultLocation: westeurope\n",
        )
        .unwrap();

        assert_eq!(config.subscription(), "11111111-2222-3333-4444-555555555555");
        assert_eq!(config.page_size(), 10);
        assert_eq!(config.default_location.as_deref(), Some("westeurope"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.subscription(), DEFAULT_SUBSCRIPTION);
        assert_eq!(config.page_size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.yaml"))).unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "stateDir: /tmp/sfmc-state\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.state_dir(), PathBuf::from("/tmp/sfmc-state"));
    }

    #[test]
    fn test_invalid_page_size_rejected() {
        assert!(Config::parse("pageSize: lots\n").is_err());
    }
}
