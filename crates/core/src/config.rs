//! Storage configuration and backend selection
//!
//! Settings are read from the environment once at startup. Choosing a
//! backend is a pure function of those settings.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::{Error, Result};

pub const ENV_MODE: &str = "TASKER_ENV";
pub const ENV_MODE_FALLBACK: &str = "APP_ENV";
pub const ENV_STORAGE: &str = "TASKER_STORAGE";
pub const ENV_DATA_FILE: &str = "TASKER_DATA_FILE";
pub const DEFAULT_DATA_FILE: &str = "data/tasks.json";

/// Deployment mode of the running process
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeploymentMode {
    #[default]
    Development,
    Production,
    Test,
}

impl DeploymentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl FromStr for DeploymentMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            other => Err(Error::Config(format!(
                "unknown deployment mode '{}' (expected development, production or test)",
                other
            ))),
        }
    }
}

impl fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Available task storage backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    File,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" | "json" => Ok(Self::File),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => Err(Error::Config(format!(
                "unknown storage backend '{}' (expected file or memory)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageSettings {
    pub mode: DeploymentMode,
    /// Explicit backend choice; wins over the mode-based default
    pub backend_override: Option<StorageBackend>,
    pub data_file: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            mode: DeploymentMode::default(),
            backend_override: None,
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
        }
    }
}

impl StorageSettings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mode: DeploymentMode = match get(ENV_MODE).or_else(|| get(ENV_MODE_FALLBACK)) {
            Some(raw) => raw.parse()?,
            None => DeploymentMode::default(),
        };
        let backend_override: Option<StorageBackend> =
            get(ENV_STORAGE).map(|raw| raw.parse()).transpose()?;
        let data_file = get(ENV_DATA_FILE)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));

        Ok(Self {
            mode,
            backend_override,
            data_file,
        })
    }
}

/// Decide which backend to construct for `settings`
pub fn select_backend(settings: &StorageSettings) -> StorageBackend {
    if let Some(backend) = settings.backend_override {
        return backend;
    }
    match settings.mode {
        DeploymentMode::Test => StorageBackend::Memory,
        DeploymentMode::Development | DeploymentMode::Production => StorageBackend::File,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> Result<StorageSettings> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        StorageSettings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let settings = settings_from(&[]).unwrap();
        assert_eq!(settings, StorageSettings::default());
        assert_eq!(settings.data_file, PathBuf::from("data/tasks.json"));
        assert_eq!(select_backend(&settings), StorageBackend::File);
    }

    #[test]
    fn test_mode_selects_backend() {
        let prod = settings_from(&[("TASKER_ENV", "Production")]).unwrap();
        assert_eq!(prod.mode, DeploymentMode::Production);
        assert_eq!(select_backend(&prod), StorageBackend::File);

        let test = settings_from(&[("APP_ENV", "test")]).unwrap();
        assert_eq!(test.mode, DeploymentMode::Test);
        assert_eq!(select_backend(&test), StorageBackend::Memory);
    }

    #[test]
    fn test_primary_mode_variable_wins() {
        let settings = settings_from(&[("TASKER_ENV", "dev"), ("APP_ENV", "test")]).unwrap();
        assert_eq!(settings.mode, DeploymentMode::Development);
    }

    #[test]
    fn test_override_wins_over_mode() {
        let settings = settings_from(&[
            ("TASKER_ENV", "test"),
            ("TASKER_STORAGE", "file"),
            ("TASKER_DATA_FILE", "/var/lib/tasker/tasks.json"),
        ])
        .unwrap();

        assert_eq!(select_backend(&settings), StorageBackend::File);
        assert_eq!(
            settings.data_file,
            PathBuf::from("/var/lib/tasker/tasks.json")
        );
    }

    #[test]
    fn test_selection_is_deterministic() {
        let settings = settings_from(&[("TASKER_STORAGE", "memory")]).unwrap();
        assert_eq!(select_backend(&settings), select_backend(&settings));
    }

    #[test]
    fn test_unknown_values_are_config_errors() {
        assert!(matches!(
            settings_from(&[("TASKER_ENV", "staging")]),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            settings_from(&[("TASKER_STORAGE", "mysql")]),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_blank_values_count_as_unset() {
        let settings = settings_from(&[("TASKER_ENV", "  "), ("TASKER_DATA_FILE", "")]).unwrap();
        assert_eq!(settings, StorageSettings::default());
    }
}
