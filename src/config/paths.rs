use super::ConfigError;
use std::path::PathBuf;

pub const CONFIG_PATH_ENV: &str = "KUBEAPPLY_CONFIG";
pub const GLOBAL_STATE_DIR: &str = ".kubeapply";
pub const GLOBAL_SETTINGS_FILE_NAME: &str = "config.yaml";

pub fn default_global_config_path() -> Result<PathBuf, ConfigError> {
    let home = std::env::var_os("HOME").ok_or(ConfigError::HomeDirectoryUnavailable)?;
    Ok(PathBuf::from(home)
        .join(GLOBAL_STATE_DIR)
        .join(GLOBAL_SETTINGS_FILE_NAME))
}

pub fn env_config_path() -> Option<PathBuf> {
    std::env::var_os(CONFIG_PATH_ENV)
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
}

/// `KUBEAPPLY_CONFIG` wins over the home-directory default.
pub fn resolve_config_path() -> Result<PathBuf, ConfigError> {
    match env_config_path() {
        Some(path) => Ok(path),
        None => default_global_config_path(),
    }
}
