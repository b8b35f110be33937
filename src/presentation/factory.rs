//! Use Case Factory
//!
//! Creates use cases with infrastructure dependencies wired up.
//! This is the dependency injection point for the application.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::ApplyUseCase;
use crate::config::{Config, ConfigWarning, LoadedConfig};
use crate::domain::entities::SiteSpec;
use crate::domain::ports::{ProviderContext, Providers, ProvisionEventSink, StateRepository};
use crate::domain::value_objects::CancelToken;
use crate::error::{ProvisionError, ProvisionResult};
use crate::infrastructure::{
    ConsoleEventSink, FsContentSource, JsonEventSink, LocalCloud, SystemClock,
    TomlStateRepository,
};

/// Local cloud file used when neither `--cloud` nor `[provider].cloud` is set
pub const DEFAULT_CLOUD_FILE: &str = ".edgesite/cloud.json";

/// Everything a command needs: resolved config, state location and backend
pub struct Session {
    pub loaded: LoadedConfig,
    /// Directory relative config paths resolve against
    pub base_dir: PathBuf,
    pub cloud: Arc<LocalCloud>,
    pub cloud_path: PathBuf,
}

impl Session {
    /// Discover configuration under `project_root` and open the cloud backend.
    ///
    /// The cloud file comes from `cloud` (the `--cloud` flag), then
    /// `[provider].cloud`, then `.edgesite/cloud.json` next to the config.
    pub fn open(
        project_root: &Path,
        config: Option<&Path>,
        cloud: Option<&Path>,
    ) -> ProvisionResult<Self> {
        let loaded = Config::discover(project_root, config)?;
        let base_dir = loaded.base_dir(project_root);

        let cloud_path = cloud
            .map(Path::to_path_buf)
            .or_else(|| loaded.config.cloud_path(&base_dir))
            .unwrap_or_else(|| base_dir.join(DEFAULT_CLOUD_FILE));

        let backend = LocalCloud::open(&cloud_path)
            .map_err(|e| ProvisionError::provider("open local cloud", e.to_string()))?;

        Ok(Self {
            loaded,
            base_dir,
            cloud: Arc::new(backend),
            cloud_path,
        })
    }

    pub fn config(&self) -> &Config {
        &self.loaded.config
    }

    pub fn warnings(&self) -> &[ConfigWarning] {
        &self.loaded.warnings
    }

    pub fn providers(&self) -> Providers {
        Providers::from_backend(self.cloud.clone())
    }

    pub fn state_repository(&self) -> Arc<TomlStateRepository> {
        Arc::new(TomlStateRepository::in_project(&self.base_dir))
    }

    /// Configured sites, or only the one serving `domain`
    pub fn sites(&self, domain: Option<&str>) -> ProvisionResult<Vec<SiteSpec>> {
        match domain {
            Some(domain) => Ok(vec![self.config().find_site(domain, &self.base_dir)?]),
            None => {
                let sites = self.config().site_specs(&self.base_dir)?;
                if sites.is_empty() {
                    return Err(ProvisionError::InvalidSpec(
                        "no [[site]] entries configured".to_string(),
                    ));
                }
                Ok(sites)
            }
        }
    }

    pub fn context(&self, spec: &SiteSpec) -> ProviderContext {
        ProviderContext::new(spec.account.clone(), spec.region.clone())
            .with_profile(self.config().provider.profile.clone())
    }

    /// Apply use case wired to the local cloud, the filesystem and the wall clock
    pub fn apply_use_case(
        &self,
        events: Arc<dyn ProvisionEventSink>,
        cancel: CancelToken,
    ) -> ApplyUseCase {
        let state: Arc<dyn StateRepository> = self.state_repository();
        ApplyUseCase::new(
            self.providers(),
            Arc::new(FsContentSource::new()),
            state,
            Arc::new(SystemClock::new()),
        )
        .with_events(events)
        .with_options(self.config().apply_options())
        .with_cancel(cancel)
    }
}

/// NDJSON on stdout for `--json`, progress lines on stderr otherwise
pub fn create_event_sink(json: bool, verbose: u8) -> Arc<dyn ProvisionEventSink> {
    if json {
        Arc::new(JsonEventSink::stdout())
    } else {
        Arc::new(ConsoleEventSink::stderr(verbose))
    }
}
