use crate::config::types::{ConfigFile, EnvConfig};
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads the configuration file and selects one environment
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
/// * `env` - Name of the environment table to select (e.g. "prod")
///
/// # Returns
///
/// * `Ok(EnvConfig)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, select, or validate
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use hoopline::config::load_config;
///
/// let config = load_config(Path::new("config.toml"), "prod").unwrap();
/// println!("Max retries: {}", config.api.max_retries);
/// ```
pub fn load_config(path: &Path, env: &str) -> Result<EnvConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let file: ConfigFile = toml::from_str(&content)?;

    let config = file
        .environments
        .get(env)
        .cloned()
        .ok_or_else(|| ConfigError::UnknownEnvironment(env.to_string()))?;

    validate(&config)?;

    Ok(config)
}
