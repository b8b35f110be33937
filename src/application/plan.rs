//! Site planning
//!
//! Builds the dependency graph of one site and orders it. The hosted zone
//! lookup carries the lowest priority so it runs before anything mutating:
//! a missing zone fails the run while nothing exists yet.

use crate::domain::entities::SiteSpec;
use crate::domain::services::{GraphError, ResourceGraph};
use crate::domain::value_objects::{DomainName, LogicalId, ResourceKind};
use crate::error::{ProvisionError, ProvisionResult};

const LOOKUP_PRIORITY: u8 = 0;
const RESOURCE_PRIORITY: u8 = 1;

/// Declared dependencies of each node in the site topology
const DEPENDENCIES: [(ResourceKind, &[ResourceKind]); 6] = [
    (ResourceKind::HostedZone, &[]),
    (ResourceKind::HostingBucket, &[]),
    (ResourceKind::Certificate, &[ResourceKind::HostedZone]),
    (
        ResourceKind::Distribution,
        &[ResourceKind::HostingBucket, ResourceKind::Certificate],
    ),
    (
        ResourceKind::AliasRecord,
        &[ResourceKind::Distribution, ResourceKind::HostedZone],
    ),
    (
        ResourceKind::Deployment,
        &[ResourceKind::HostingBucket, ResourceKind::Distribution],
    ),
];

/// One node of a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedResource {
    pub kind: ResourceKind,
    pub logical_id: LogicalId,
    pub dependencies: Vec<ResourceKind>,
}

/// Ordered resources for one site
#[derive(Debug, Clone)]
pub struct Plan {
    pub domain: DomainName,
    pub stack: String,
    /// Apply order
    pub resources: Vec<PlannedResource>,
    graph: ResourceGraph<ResourceKind>,
}

impl Plan {
    pub fn order(&self) -> Vec<ResourceKind> {
        self.resources.iter().map(|r| r.kind).collect()
    }

    /// Destroy order: the apply order reversed
    pub fn teardown_order(&self) -> Vec<ResourceKind> {
        let mut order = self.order();
        order.reverse();
        order
    }

    pub fn get(&self, kind: ResourceKind) -> Option<&PlannedResource> {
        self.resources.iter().find(|r| r.kind == kind)
    }

    /// Nodes that directly or indirectly need `kind`
    pub fn dependents_of(&self, kind: ResourceKind) -> Vec<ResourceKind> {
        self.graph.transitive_dependents(&kind)
    }
}

/// Plan the resources of one site
pub fn plan_site(spec: &SiteSpec) -> ProvisionResult<Plan> {
    spec.validate()?;
    let graph = site_graph().map_err(|e| ProvisionError::InvalidSpec(e.to_string()))?;
    let order = graph
        .topological_order()
        .map_err(|e| ProvisionError::InvalidSpec(e.to_string()))?;

    let resources = order
        .into_iter()
        .map(|kind| PlannedResource {
            kind,
            logical_id: LogicalId::for_kind(kind),
            dependencies: graph.dependencies_of(&kind),
        })
        .collect();

    Ok(Plan {
        domain: spec.domain_name.clone(),
        stack: spec.stack_label(),
        resources,
        graph,
    })
}

fn site_graph() -> Result<ResourceGraph<ResourceKind>, GraphError> {
    let mut graph = ResourceGraph::new();
    for (kind, _) in DEPENDENCIES {
        let priority = if kind.is_lookup() {
            LOOKUP_PRIORITY
        } else {
            RESOURCE_PRIORITY
        };
        graph.add_node(kind, priority)?;
    }
    for (kind, deps) in DEPENDENCIES {
        for dep in deps {
            graph.add_dependency(&kind, dep)?;
        }
    }
    Ok(graph)
}
