//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::entities::ViewerPolicy;
use crate::error::{ProvisionError, ProvisionResult};

use super::env_validator::{levenshtein, EnvVarValidator};
use super::types::Config;

/// Project config file name
pub const PROJECT_CONFIG: &str = "edgesite.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// A loaded configuration and where it came from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    /// File the configuration was read from, if any
    pub path: Option<PathBuf>,
    pub warnings: Vec<ConfigWarning>,
}

impl LoadedConfig {
    /// Directory relative paths in the configuration resolve against
    pub fn base_dir(&self, project_root: &Path) -> PathBuf {
        self.path
            .as_deref()
            .and_then(Path::parent)
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| project_root.to_path_buf())
    }
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> ProvisionResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path).map_err(|e| ProvisionError::Config {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ProvisionError::Config {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Resolve the configuration file.
///
/// An explicit path must exist. Otherwise `edgesite.toml` in the project
/// root wins over the user config; with neither, defaults apply.
/// Environment overrides are applied in every case.
pub fn discover(project_root: &Path, explicit: Option<&Path>) -> ProvisionResult<LoadedConfig> {
    let candidate = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let project = project_root.join(PROJECT_CONFIG);
            if project.is_file() {
                Some(project)
            } else {
                user_config_path().filter(|p| p.is_file())
            }
        }
    };

    let Some(path) = candidate else {
        return Ok(LoadedConfig {
            config: with_env_overrides(Config::default()),
            path: None,
            warnings: Vec::new(),
        });
    };

    let (config, warnings) = load_with_warnings(&path)?;
    Ok(LoadedConfig {
        config: with_env_overrides(config),
        path: Some(path),
        warnings,
    })
}

/// `$XDG_CONFIG_HOME/edgesite/config.toml`, else the platform config dir
pub fn user_config_path() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::config_dir)
        .map(|dir| dir.join("edgesite").join("config.toml"))
}

/// Apply environment variable overrides (EDGESITE_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    with_overrides_from(config, |name| std::env::var(name).ok(), &mut std::io::stderr())
}

/// Apply overrides read through `lookup`, writing warnings to `warn`
pub fn with_overrides_from<F, W>(mut config: Config, lookup: F, warn: &mut W) -> Config
where
    F: Fn(&str) -> Option<String>,
    W: std::io::Write,
{
    let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(account) = non_empty("EDGESITE_ACCOUNT") {
        config.provider.account = Some(account.trim().to_string());
    }
    if let Some(region) = non_empty("EDGESITE_REGION") {
        config.provider.region = Some(region.trim().to_string());
    }
    if let Some(profile) = non_empty("EDGESITE_PROFILE") {
        config.provider.profile = Some(profile.trim().to_string());
    }

    if let Some(raw) = non_empty("EDGESITE_VALIDATION_TIMEOUT") {
        match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => config.validation.timeout_secs = secs,
            _ => {
                let _ = writeln!(
                    warn,
                    "Warning: Invalid EDGESITE_VALIDATION_TIMEOUT value '{}'; expected seconds",
                    raw
                );
            }
        }
    }

    if let Some(raw) = non_empty("EDGESITE_VIEWER_POLICY") {
        let current = config.distribution.viewer_policy;
        config.distribution.viewer_policy = EnvVarValidator::new(
            "EDGESITE_VIEWER_POLICY",
            &["https-only", "redirect-to-https"],
        )
        .parse_with_writer(
            &raw,
            |s| match s.trim().to_ascii_lowercase().as_str() {
                "https-only" => Some(ViewerPolicy::HttpsOnly),
                "redirect-to-https" => Some(ViewerPolicy::RedirectToHttps),
                _ => None,
            },
            current,
            warn,
        );
    }

    config
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "provider",
        "account",
        "region",
        "profile",
        "cloud",
        "validation",
        "timeout_secs",
        "initial_backoff_secs",
        "max_backoff_secs",
        "distribution",
        "viewer_policy",
        "output",
        "verbosity",
        "site",
        "domain",
        "source",
        "stack",
        "hosted_zone",
    ];

    CANDIDATES
        .iter()
        .map(|candidate| (*candidate, levenshtein(unknown, candidate)))
        .min_by_key(|(_, dist)| *dist)
        .filter(|(_, dist)| *dist <= 2)
        .map(|(candidate, _)| candidate.to_string())
}
