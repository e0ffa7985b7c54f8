//! Configuration loading and management
//!
//! Handles parsing of `taskrank.toml` configuration files and resolving
//! where the task file lives.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::storage::TASKS_FILE;
use crate::store::DEFAULT_TOP_COUNT;

/// Name of the configuration file
pub const CONFIG_FILE: &str = "taskrank.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Task file location
    #[serde(default)]
    pub storage: StorageConfig,

    /// Defaults for `taskrank top`
    #[serde(default)]
    pub top: TopConfig,

    /// Directory of the file this config was loaded from
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

/// Storage-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Task file path. Relative paths resolve against the config file's
    /// directory.
    #[serde(default = "default_tasks_file")]
    pub file: String,
}

fn default_tasks_file() -> String {
    TASKS_FILE.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            file: default_tasks_file(),
        }
    }
}

/// `top` command configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopConfig {
    /// How many tasks `top` shows without `--count`
    #[serde(default = "default_top_count")]
    pub count: usize,
}

fn default_top_count() -> usize {
    DEFAULT_TOP_COUNT
}

impl Default for TopConfig {
    fn default() -> Self {
        Self {
            count: default_top_count(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "taskrank")
}

/// Platform default location of the config file
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Platform default location of the task file
pub fn default_tasks_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join(TASKS_FILE))
        .unwrap_or_else(|| PathBuf::from(TASKS_FILE))
}

impl Config {
    /// Load configuration from a `taskrank.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.validate()?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Load the explicitly requested config, or the platform default if it
    /// exists, or return defaults.
    ///
    /// An explicit path must exist; the platform default is optional.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Where the task file lives.
    ///
    /// An explicit `--file` wins. A `storage.file` from a loaded config is
    /// resolved against that config's directory; without a config file the
    /// platform data directory is used.
    pub fn tasks_path(&self, explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        let configured = PathBuf::from(&self.storage.file);
        if configured.is_absolute() {
            return configured;
        }
        match &self.base_dir {
            Some(base) => base.join(configured),
            None if self.storage.file == TASKS_FILE => default_tasks_path(),
            None => configured,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.storage.file.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "storage.file cannot be empty".to_string(),
            ));
        }
        if self.top.count == 0 {
            return Err(Error::InvalidConfig(
                "top.count must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}
