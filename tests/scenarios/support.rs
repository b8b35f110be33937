//! Shared wiring for scenarios.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use edgesite::application::{ApplyOptions, ApplyUseCase};
use edgesite::domain::ports::{ProviderContext, Providers};
use edgesite::domain::services::Backoff;
use edgesite::infrastructure::{FsContentSource, ManualClock, TomlStateRepository};
use edgesite::{LocalCloud, SiteSpec};
use tempfile::TempDir;

use crate::common::ACCOUNT;

pub struct World {
    pub cloud: Arc<LocalCloud>,
    pub clock: Arc<ManualClock>,
    pub state: Arc<TomlStateRepository>,
    pub root: TempDir,
}

impl World {
    /// Cloud with a public `example.com` zone
    pub fn new() -> Self {
        let cloud = Arc::new(LocalCloud::in_memory());
        cloud.seed_zone(ACCOUNT, "example.com", false).unwrap();
        let root = TempDir::new().unwrap();
        Self {
            cloud,
            clock: Arc::new(ManualClock::new()),
            state: Arc::new(TomlStateRepository::in_project(root.path())),
            root,
        }
    }

    /// A site whose source folder holds `files`
    pub fn site(&self, domain: &str, region: &str, files: &[(&str, &str)]) -> SiteSpec {
        let source = self.root.path().join(domain);
        for (rel, body) in files {
            write(&source, rel, body);
        }
        fs::create_dir_all(&source).unwrap();
        SiteSpec::new(domain, source, ACCOUNT, region).unwrap()
    }

    pub fn use_case(&self) -> ApplyUseCase {
        ApplyUseCase::new(
            Providers::from_backend(self.cloud.clone()),
            Arc::new(FsContentSource::new()),
            self.state.clone(),
            self.clock.clone(),
        )
        .with_options(ApplyOptions::new().with_backoff(Backoff::new(
            Duration::from_secs(5),
            Duration::from_secs(60),
            Duration::from_secs(600),
        )))
    }

    pub fn providers(&self) -> Providers {
        Providers::from_backend(self.cloud.clone())
    }

    pub fn context(&self, spec: &SiteSpec) -> ProviderContext {
        ProviderContext::new(ACCOUNT, spec.region.clone())
    }
}

pub fn write(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}
