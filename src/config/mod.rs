pub mod error;
pub mod paths;
pub mod settings;

pub use error::ConfigError;
pub use paths::{
    default_global_config_path, env_config_path, resolve_config_path, CONFIG_PATH_ENV,
};
pub use settings::{Settings, DEFAULT_EXECUTABLE, DEFAULT_SUBCOMMAND};

/// Loads settings from `path`, then `KUBEAPPLY_CONFIG`, then the home
/// directory. Only a missing home-directory file falls back to defaults.
pub fn load_settings(path: Option<&std::path::Path>) -> Result<Settings, ConfigError> {
    let explicit = path.map(std::path::Path::to_path_buf).or_else(env_config_path);
    let settings = match explicit {
        Some(path) => Settings::from_path(&path)?,
        None => {
            let path = default_global_config_path()?;
            if path.exists() {
                Settings::from_path(&path)?
            } else {
                Settings::default()
            }
        }
    };
    settings.validate()?;
    Ok(settings)
}
