//! Configuration type definitions

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::ApplyOptions;
use crate::domain::entities::{SiteSpec, ViewerPolicy};
use crate::domain::services::Backoff;
use crate::error::{ProvisionError, ProvisionResult};

use super::loader::{self, ConfigWarning, LoadedConfig};

/// Account, region and credentials shared by every site
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ProviderConfig {
    #[serde(default)]
    pub account: Option<String>,

    #[serde(default)]
    pub region: Option<String>,

    /// Named credentials profile
    #[serde(default)]
    pub profile: Option<String>,

    /// Local cloud state file, relative to the config file
    #[serde(default)]
    pub cloud: Option<PathBuf>,
}

/// Certificate validation polling
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_initial_backoff_secs")]
    pub initial_backoff_secs: u64,

    #[serde(default = "default_max_backoff_secs")]
    pub max_backoff_secs: u64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            initial_backoff_secs: default_initial_backoff_secs(),
            max_backoff_secs: default_max_backoff_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    1800
}

fn default_initial_backoff_secs() -> u64 {
    5
}

fn default_max_backoff_secs() -> u64 {
    60
}

impl ValidationConfig {
    pub fn backoff(&self) -> Backoff {
        Backoff::new(
            Duration::from_secs(self.initial_backoff_secs.max(1)),
            Duration::from_secs(self.max_backoff_secs.max(self.initial_backoff_secs)),
            Duration::from_secs(self.timeout_secs),
        )
    }
}

/// Distribution settings
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct DistributionSettings {
    #[serde(default)]
    pub viewer_policy: ViewerPolicy,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct OutputConfig {
    #[serde(default)]
    pub verbosity: Verbosity,
}

/// Verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

/// One `[[site]]` entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteConfig {
    pub domain: String,

    /// Content folder, relative to the config file
    pub source: PathBuf,

    /// Optional stack label
    #[serde(default)]
    pub stack: Option<String>,

    /// Explicit hosted zone instead of suffix search
    #[serde(default)]
    pub hosted_zone: Option<String>,

    /// Per-site override of `[provider].account`
    #[serde(default)]
    pub account: Option<String>,

    /// Per-site override of `[provider].region`
    #[serde(default)]
    pub region: Option<String>,
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub validation: ValidationConfig,

    #[serde(default)]
    pub distribution: DistributionSettings,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default, rename = "site")]
    pub sites: Vec<SiteConfig>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> ProvisionResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> ProvisionResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Explicit file, project file, user file, or defaults
    pub fn discover(project_root: &Path, explicit: Option<&Path>) -> ProvisionResult<LoadedConfig> {
        loader::discover(project_root, explicit)
    }

    /// Apply environment variable overrides (EDGESITE_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }

    /// Options the apply pipeline runs with
    pub fn apply_options(&self) -> ApplyOptions {
        ApplyOptions::new()
            .with_backoff(self.validation.backoff())
            .with_viewer_policy(self.distribution.viewer_policy)
            .with_profile(self.provider.profile.clone())
    }

    /// Site specifications, with sources resolved against `base_dir`
    pub fn site_specs(&self, base_dir: &Path) -> ProvisionResult<Vec<SiteSpec>> {
        self.sites
            .iter()
            .map(|site| self.site_spec(site, base_dir))
            .collect()
    }

    /// Specification of the site serving `domain`
    pub fn find_site(&self, domain: &str, base_dir: &Path) -> ProvisionResult<SiteSpec> {
        let wanted = domain.trim_end_matches('.').to_ascii_lowercase();
        let site = self
            .sites
            .iter()
            .find(|s| s.domain.trim_end_matches('.').to_ascii_lowercase() == wanted)
            .ok_or_else(|| {
                ProvisionError::InvalidSpec(format!("no [[site]] configured for '{}'", domain))
            })?;
        self.site_spec(site, base_dir)
    }

    fn site_spec(&self, site: &SiteConfig, base_dir: &Path) -> ProvisionResult<SiteSpec> {
        let account = site
            .account
            .as_deref()
            .or(self.provider.account.as_deref())
            .ok_or_else(|| missing_setting(&site.domain, "account"))?;
        let region = site
            .region
            .as_deref()
            .or(self.provider.region.as_deref())
            .ok_or_else(|| missing_setting(&site.domain, "region"))?;

        let source = if site.source.is_absolute() {
            site.source.clone()
        } else {
            base_dir.join(&site.source)
        };

        let mut spec = SiteSpec::new(&site.domain, source, account, region)?;
        if let Some(zone) = &site.hosted_zone {
            spec = spec.with_hosted_zone(zone.clone());
        }
        if let Some(stack) = &site.stack {
            spec = spec.with_stack_name(stack.clone());
        }
        spec.validate()?;
        Ok(spec)
    }

    /// Local cloud state file, resolved against `base_dir`
    pub fn cloud_path(&self, base_dir: &Path) -> Option<PathBuf> {
        self.provider.cloud.as_ref().map(|p| {
            if p.is_absolute() {
                p.clone()
            } else {
                base_dir.join(p)
            }
        })
    }
}

fn missing_setting(domain: &str, key: &str) -> ProvisionError {
    ProvisionError::InvalidSpec(format!(
        "site '{}' has no {}; set [provider].{} or EDGESITE_{}",
        domain,
        key,
        key,
        key.to_ascii_uppercase()
    ))
}
