//! CLI configuration management

use crate::error::CliError;
use banker_core::{Units, DEFAULT_TOTAL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Capacity of each resource class
    #[serde(default = "default_total")]
    pub total: Vec<Units>,
    /// Max demand matrix file
    #[serde(default = "default_max_path")]
    pub max_path: PathBuf,
    /// Allocation matrix file
    #[serde(default = "default_allocation_path")]
    pub allocation_path: PathBuf,
    /// Cap on how many safe sequences `enumerate` prints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enumerate_limit: Option<usize>,
}

fn default_total() -> Vec<Units> {
    DEFAULT_TOTAL.to_vec()
}

fn default_max_path() -> PathBuf {
    PathBuf::from("max.txt")
}

fn default_allocation_path() -> PathBuf {
    PathBuf::from("allocation.txt")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            total: default_total(),
            max_path: default_max_path(),
            allocation_path: default_allocation_path(),
            enumerate_limit: None,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".banker"))
    }

    /// Get the default config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Load config from `path`, or the default location when `None`
    ///
    /// A missing file yields the defaults; a file that exists but does not
    /// parse is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let path = match path.map(Path::to_path_buf).or_else(Self::config_path) {
            Some(path) => path,
            None => return Ok(Self::default()),
        };
        if !path.exists() {
            tracing::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| CliError::ReadFile {
            path: path.clone(),
            source,
        })?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Save config to `path`, or the default location when `None`
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf, CliError> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(Self::config_path)
            .ok_or_else(|| CliError::Config("Cannot determine config path".into()))?;

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| CliError::Config(e.to_string()))?;
        std::fs::write(&path, content)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.total, vec![10, 5, 7]);
        assert_eq!(config.max_path, PathBuf::from("max.txt"));
        assert_eq!(config.allocation_path, PathBuf::from("allocation.txt"));
        assert!(config.enumerate_limit.is_none());
    }

    #[test]
    fn test_config_serialize() {
        let config = Config::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("total"));
        assert!(toml.contains("max_path"));
    }

    #[test]
    fn test_config_deserialize_partial() {
        let toml = r#"
            total = [6, 4]
            enumerate_limit = 3
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.total, vec![6, 4]);
        assert_eq!(config.enumerate_limit, Some(3));
        assert_eq!(config.max_path, PathBuf::from("max.txt"));
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(Some(dir.path().join("nope.toml").as_path())).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            total: vec![3, 3],
            enumerate_limit: Some(5),
            ..Config::default()
        };
        let written = config.save(Some(path.as_path())).unwrap();
        assert_eq!(written, path);

        let loaded = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "total = \"ten\"").unwrap();
        assert!(matches!(Config::load(Some(path.as_path())), Err(CliError::Config(_))));
    }
}
