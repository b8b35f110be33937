//! Configuration module for Edgesite
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (EDGESITE_*)
//! 3. Project config (edgesite.toml)
//! 4. User config ($XDG_CONFIG_HOME/edgesite/config.toml)
//! 5. Built-in defaults (lowest priority)

mod env_validator;
mod loader;
mod types;

pub use loader::{user_config_path, with_overrides_from, ConfigWarning, LoadedConfig, PROJECT_CONFIG};
pub use types::{
    Config, DistributionSettings, OutputConfig, ProviderConfig, SiteConfig, ValidationConfig,
    Verbosity,
};
