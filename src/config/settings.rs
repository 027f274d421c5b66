use super::ConfigError;
use crate::shared::StatePaths;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_EXECUTABLE: &str = "kubectl";
pub const DEFAULT_SUBCOMMAND: &str = "apply";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default = "default_executable")]
    pub executable: String,
    #[serde(default = "default_subcommand")]
    pub default_subcommand: String,
    #[serde(default = "default_state_root")]
    pub state_root: PathBuf,
    #[serde(default = "default_true")]
    pub save_audit: bool,
    #[serde(default)]
    pub exec_timeout_seconds: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            executable: default_executable(),
            default_subcommand: default_subcommand(),
            state_root: default_state_root(),
            save_audit: true,
            exec_timeout_seconds: None,
        }
    }
}

impl Settings {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.executable.trim().is_empty() {
            return Err(ConfigError::Settings(
                "`executable` must be non-empty".to_string(),
            ));
        }
        if self.default_subcommand.trim().is_empty() {
            return Err(ConfigError::Settings(
                "`default_subcommand` must be non-empty".to_string(),
            ));
        }
        if self.exec_timeout_seconds == Some(0) {
            return Err(ConfigError::Settings(
                "`exec_timeout_seconds` must be >= 1 when set".to_string(),
            ));
        }
        Ok(())
    }

    pub fn state_paths(&self) -> StatePaths {
        StatePaths::new(&self.state_root)
    }

    pub fn exec_timeout(&self) -> Option<Duration> {
        self.exec_timeout_seconds.map(Duration::from_secs)
    }
}

fn default_executable() -> String {
    DEFAULT_EXECUTABLE.to_string()
}

fn default_subcommand() -> String {
    DEFAULT_SUBCOMMAND.to_string()
}

fn default_state_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}
