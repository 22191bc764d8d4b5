//! Configuration loading and validation
//!
//! The config file is TOML with one table per environment (`dev`, `prod`).
//! Each environment supplies the output/skip file paths, the API pacing
//! knobs, and the logging destination. Loaded once at startup.

mod parser;
mod types;
mod validation;

pub use parser::load_config;
pub use types::{ApiConfig, ConfigFile, EnvConfig, FileTargets, LoggingConfig};
pub use validation::validate;
