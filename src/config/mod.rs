//! Configuration module
//!
//! Provides configuration loading, validation, and default settings
//! for the scanner and the demo binary.

mod defaults;
mod loader;
mod validator;

pub use defaults::{default_config, ConfigDefaults};
pub use loader::{load_config, ConfigLoader, DEFAULT_CONFIG_FILE};
pub use validator::{validate_config, ConfigValidator, MAX_CHUNK_SIZE, MAX_THREADS};

pub use loader::{Config, LoggingConfig, ScannerConfig};

pub use loader::ConfigError;

pub type ConfigResult<T> = Result<T, ConfigError>;
