//! Logical Resource Identity
//!
//! Each managed resource has a logical id that is stable across tool
//! versions. Persisted state is keyed by these ids, so renaming one would
//! orphan the physical resource it points at. Ids that earlier releases
//! used are listed in [`LogicalId::legacy_aliases`] and adopted on load.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of resource in a site topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    HostedZone,
    HostingBucket,
    Certificate,
    Distribution,
    AliasRecord,
    Deployment,
}

impl ResourceKind {
    /// All kinds in declaration order
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::HostedZone,
        ResourceKind::HostingBucket,
        ResourceKind::Certificate,
        ResourceKind::Distribution,
        ResourceKind::AliasRecord,
        ResourceKind::Deployment,
    ];

    /// Read-only lookups never create or mutate anything
    pub fn is_lookup(&self) -> bool {
        matches!(self, ResourceKind::HostedZone)
    }

    /// Whether teardown removes this resource
    pub fn is_destroyable(&self) -> bool {
        !matches!(self, ResourceKind::HostedZone | ResourceKind::Deployment)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::HostedZone => "hosted zone",
            ResourceKind::HostingBucket => "hosting bucket",
            ResourceKind::Certificate => "certificate",
            ResourceKind::Distribution => "distribution",
            ResourceKind::AliasRecord => "alias record",
            ResourceKind::Deployment => "deployment",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Stable logical id of a resource within a site
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LogicalId(String);

impl LogicalId {
    pub fn for_kind(kind: ResourceKind) -> Self {
        let id = match kind {
            ResourceKind::HostedZone => "HostedZone",
            ResourceKind::HostingBucket => "SiteBucket",
            ResourceKind::Certificate => "Certificate",
            // Pinned: changing this value orphans every deployed distribution.
            ResourceKind::Distribution => "SiteDistribution",
            ResourceKind::AliasRecord => "SiteAliasRecord",
            ResourceKind::Deployment => "DeployWithInvalidation",
        };
        Self(id.to_string())
    }

    /// Ids that earlier releases persisted for the same resource
    pub fn legacy_aliases(kind: ResourceKind) -> &'static [&'static str] {
        match kind {
            ResourceKind::Distribution => &["SiteDistributionCFDistribution"],
            _ => &[],
        }
    }

    /// Resolve a persisted id (current or legacy) to its resource kind
    pub fn resolve(raw: &str) -> Option<ResourceKind> {
        ResourceKind::ALL.into_iter().find(|kind| {
            Self::for_kind(*kind).as_str() == raw || Self::legacy_aliases(*kind).contains(&raw)
        })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
