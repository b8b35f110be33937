//! TOML State Repository
//!
//! Persists every site's state in one file, `.edgesite/state.toml` by
//! default. Writes take an exclusive `fs2` lock and re-read the file under
//! it, so concurrent site pipelines never drop each other's updates.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::domain::entities::SiteState;
use crate::domain::ports::{StateError, StateRepository};
use crate::domain::value_objects::DomainName;

const STATE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TomlStateFile {
    version: u32,
    #[serde(default)]
    sites: BTreeMap<String, SiteState>,
}

impl Default for TomlStateFile {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            sites: BTreeMap::new(),
        }
    }
}

pub struct TomlStateRepository {
    path: PathBuf,
}

impl TomlStateRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<project>/.edgesite/state.toml`
    pub fn in_project(project_root: &Path) -> Self {
        Self::new(project_root.join(".edgesite").join("state.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    fn read_file(&self) -> Result<TomlStateFile, StateError> {
        if !self.path.exists() {
            return Ok(TomlStateFile::default());
        }
        let content =
            fs::read_to_string(&self.path).map_err(|e| StateError::Access(e.to_string()))?;
        let file: TomlStateFile = toml::from_str(&content)
            .map_err(|e| StateError::Corrupted(format!("{}: {}", self.path.display(), e)))?;
        if file.version != STATE_VERSION {
            return Err(StateError::VersionMismatch {
                found: file.version,
                expected: STATE_VERSION,
            });
        }
        Ok(file)
    }

    fn write_file(&self, file: &TomlStateFile) -> Result<(), StateError> {
        let content =
            toml::to_string_pretty(file).map_err(|e| StateError::Corrupted(e.to_string()))?;
        // Replace via rename so unlocked readers never see a partial file.
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .map_err(|e| StateError::Access(e.to_string()))?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| StateError::Access(e.to_string()))?;
        tmp.persist(&self.path)
            .map_err(|e| StateError::Access(e.to_string()))?;
        Ok(())
    }

    /// Run `update` on the file contents under an exclusive lock
    fn update<F>(&self, update: F) -> Result<(), StateError>
    where
        F: FnOnce(&mut TomlStateFile),
    {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StateError::Access(e.to_string()))?;
        }
        let lock_file =
            fs::File::create(self.lock_path()).map_err(|e| StateError::Access(e.to_string()))?;
        lock_file
            .lock_exclusive()
            .map_err(|e| StateError::Access(e.to_string()))?;

        let result = self.read_file().and_then(|mut file| {
            update(&mut file);
            self.write_file(&file)
        });

        let _ = lock_file.unlock();
        result
    }
}

impl StateRepository for TomlStateRepository {
    fn load(&self, domain: &DomainName) -> Result<Option<SiteState>, StateError> {
        Ok(self.read_file()?.sites.remove(domain.as_str()))
    }

    fn save(&self, state: &SiteState) -> Result<(), StateError> {
        self.update(|file| {
            file.sites
                .insert(state.domain.as_str().to_string(), state.clone());
        })
    }

    fn remove(&self, domain: &DomainName) -> Result<(), StateError> {
        if !self.path.exists() {
            return Ok(());
        }
        self.update(|file| {
            file.sites.remove(domain.as_str());
        })
    }

    fn list(&self) -> Result<Vec<SiteState>, StateError> {
        Ok(self.read_file()?.sites.into_values().collect())
    }
}
