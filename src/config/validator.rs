//! Configuration validator
//!
//! Validates configuration values to ensure they are within acceptable ranges.

use super::loader::{Config, ConfigError, LoggingConfig, ScannerConfig};

/// Largest chunk a single scan buffer may hold (256MB)
pub const MAX_CHUNK_SIZE: usize = 256 * 1024 * 1024;

/// Upper bound on matching workers
pub const MAX_THREADS: usize = 128;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the entire configuration
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        Self::validate_scanner(&config.scanner)?;
        Self::validate_logging(&config.logging)?;
        Ok(())
    }

    /// Validates scanner configuration
    pub fn validate_scanner(scanner: &ScannerConfig) -> Result<(), ConfigError> {
        if scanner.max_threads == 0 {
            return Err(ConfigError::Invalid(
                "Scanner threads must be at least 1".to_string(),
            ));
        }

        if scanner.max_threads > MAX_THREADS {
            return Err(ConfigError::Invalid(format!(
                "Scanner threads cannot exceed {}",
                MAX_THREADS
            )));
        }

        if scanner.chunk_size == 0 {
            return Err(ConfigError::Invalid(
                "Chunk size must be at least 1 byte".to_string(),
            ));
        }

        if scanner.chunk_size > MAX_CHUNK_SIZE {
            return Err(ConfigError::Invalid(format!(
                "Chunk size cannot exceed {} bytes",
                MAX_CHUNK_SIZE
            )));
        }

        Ok(())
    }

    /// Validates logging configuration
    fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                logging.level, valid_levels
            )));
        }

        Ok(())
    }
}

/// Validates a configuration
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    ConfigValidator::validate(config)
}
