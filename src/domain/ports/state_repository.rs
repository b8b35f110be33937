//! StateRepository port - persistence of per-site resource state

use thiserror::Error;

use crate::domain::entities::SiteState;
use crate::domain::value_objects::DomainName;

/// State persistence errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("state file is corrupted: {0}")]
    Corrupted(String),

    #[error("state file version {found} is not supported (expected {expected})")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("state access failed: {0}")]
    Access(String),
}

/// Abstract repository for site state
///
/// Implementations must make `save` safe against concurrent pipelines
/// writing different sites to the same backing store.
pub trait StateRepository: Send + Sync {
    fn load(&self, domain: &DomainName) -> Result<Option<SiteState>, StateError>;

    fn save(&self, state: &SiteState) -> Result<(), StateError>;

    fn remove(&self, domain: &DomainName) -> Result<(), StateError>;

    fn list(&self) -> Result<Vec<SiteState>, StateError>;
}
