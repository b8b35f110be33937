//! Site State Entity
//!
//! Physical ids of the resources a site owns, keyed by stable logical id.
//! Lets a resumed apply find the certificate it already requested and lets
//! redeploys update the same distribution in place.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{DomainName, LogicalId, ResourceKind};

/// Recorded physical resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub kind: ResourceKind,
    pub physical_id: String,
    pub updated_at: DateTime<Utc>,
}

/// Last deploy bookkeeping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    pub at: DateTime<Utc>,
    pub uploaded_object_count: usize,
    pub invalidation_id: Option<String>,
}

/// Persisted state of one site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteState {
    pub domain: DomainName,
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceRecord>,
    /// Content synced but the cache purge never went out
    #[serde(default)]
    pub pending_invalidation: bool,
    #[serde(default)]
    pub last_deployment: Option<DeploymentRecord>,
}

impl SiteState {
    pub fn new(domain: DomainName) -> Self {
        Self {
            domain,
            resources: BTreeMap::new(),
            pending_invalidation: false,
            last_deployment: None,
        }
    }

    /// Physical id for a kind, looking under legacy logical ids too
    pub fn physical_id(&self, kind: ResourceKind) -> Option<&str> {
        let current = LogicalId::for_kind(kind);
        if let Some(record) = self.resources.get(current.as_str()) {
            return Some(record.physical_id.as_str());
        }
        LogicalId::legacy_aliases(kind)
            .iter()
            .find_map(|legacy| self.resources.get(*legacy))
            .map(|record| record.physical_id.as_str())
    }

    /// Record a physical id under the current logical id, dropping any
    /// legacy entry for the same resource.
    pub fn record(&mut self, kind: ResourceKind, physical_id: impl Into<String>) {
        for legacy in LogicalId::legacy_aliases(kind) {
            self.resources.remove(*legacy);
        }
        self.resources.insert(
            LogicalId::for_kind(kind).as_str().to_string(),
            ResourceRecord {
                kind,
                physical_id: physical_id.into(),
                updated_at: Utc::now(),
            },
        );
    }

    pub fn forget(&mut self, kind: ResourceKind) {
        self.resources.remove(LogicalId::for_kind(kind).as_str());
        for legacy in LogicalId::legacy_aliases(kind) {
            self.resources.remove(*legacy);
        }
    }

    /// Whether any legacy logical id is still present
    pub fn has_legacy_entries(&self) -> bool {
        self.resources.keys().any(|key| {
            LogicalId::resolve(key)
                .is_some_and(|kind| LogicalId::for_kind(kind).as_str() != key.as_str())
        })
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty() && !self.pending_invalidation
    }
}
