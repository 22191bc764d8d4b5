use crate::config::types::{ApiConfig, EnvConfig, FileTargets, LoggingConfig};
use crate::ConfigError;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validates a selected environment configuration
pub fn validate(config: &EnvConfig) -> Result<(), ConfigError> {
    validate_file_targets("output-files", &config.output_files)?;
    validate_file_targets("skipped-files", &config.skipped_files)?;
    validate_api_config(&config.api)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

fn validate_file_targets(section: &str, targets: &FileTargets) -> Result<(), ConfigError> {
    if targets.stats.is_empty() {
        return Err(ConfigError::Validation(format!(
            "{}.stats must not be empty",
            section
        )));
    }

    if targets.positions.is_empty() {
        return Err(ConfigError::Validation(format!(
            "{}.positions must not be empty",
            section
        )));
    }

    if targets.stats == targets.positions {
        return Err(ConfigError::Validation(format!(
            "{}.stats and {}.positions must be distinct paths, both are '{}'",
            section, section, targets.stats
        )));
    }

    Ok(())
}

fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    if config.max_retries < 1 {
        return Err(ConfigError::Validation(format!(
            "api.max-retries must be >= 1, got {}",
            config.max_retries
        )));
    }

    // Season labels look like "2024-25": start year, dash, two-digit suffix.
    let season = config.season.as_bytes();
    let valid_season = season.len() == 7
        && season[0..4].iter().all(u8::is_ascii_digit)
        && season[4] == b'-'
        && season[5..7].iter().all(u8::is_ascii_digit);

    if !valid_season {
        return Err(ConfigError::Validation(format!(
            "api.season must look like '2024-25', got '{}'",
            config.season
        )));
    }

    Ok(())
}

fn validate_logging_config(config: &LoggingConfig) -> Result<(), ConfigError> {
    if !LOG_LEVELS.contains(&config.level.as_str()) {
        return Err(ConfigError::Validation(format!(
            "logging.level must be one of {:?}, got '{}'",
            LOG_LEVELS, config.level
        )));
    }

    if config.file.is_empty() {
        return Err(ConfigError::Validation(
            "logging.file must not be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> EnvConfig {
        EnvConfig {
            output_files: FileTargets {
                stats: "stats.csv".to_string(),
                positions: "positions.csv".to_string(),
            },
            skipped_files: FileTargets {
                stats: "skipped_stats.csv".to_string(),
                positions: "skipped_positions.csv".to_string(),
            },
            api: ApiConfig {
                sleep_delay_ms: 500,
                max_retries: 3,
                season: "2024-25".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file: "hoopline.log".to_string(),
            },
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&base_config()).is_ok());
    }

    #[test]
    fn test_zero_retries_rejected() {
        let mut config = base_config();
        config.api.max_retries = 0;
        assert!(matches!(
            validate(&config).unwrap_err(),
            ConfigError::Validation(_)
        ));
    }

    #[test]
    fn test_zero_delay_allowed() {
        // Deliberate: dev environments run with no courtesy delay.
        let mut config = base_config();
        config.api.sleep_delay_ms = 0;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_bad_season_label_rejected() {
        for bad in ["2024", "24-25", "2024/25", "season"] {
            let mut config = base_config();
            config.api.season = bad.to_string();
            assert!(validate(&config).is_err(), "accepted '{}'", bad);
        }
    }

    #[test]
    fn test_empty_output_path_rejected() {
        let mut config = base_config();
        config.output_files.stats = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_colliding_paths_rejected() {
        let mut config = base_config();
        config.skipped_files.positions = config.skipped_files.stats.clone();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        let mut config = base_config();
        config.logging.level = "verbose".to_string();
        assert!(validate(&config).is_err());
    }
}
