//! Apply result types

use crate::domain::entities::DeploymentResult;
use crate::domain::value_objects::{DomainName, ResourceKind};
use crate::error::ProvisionError;

/// What happened to one node during apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceOutcome {
    /// Created (`created`) or changed in place
    Applied { physical_id: String, created: bool },
    /// Already matched the desired configuration
    Unchanged { physical_id: String },
    Failed { error: ProvisionError },
    /// Not attempted because these dependencies did not complete
    Blocked { unmet: Vec<ResourceKind> },
    /// Not attempted because an earlier fatal error stopped the run
    Aborted,
}

impl ResourceOutcome {
    /// Node completed and its dependents may proceed
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Applied { .. } | Self::Unchanged { .. })
    }

    pub fn physical_id(&self) -> Option<&str> {
        match self {
            Self::Applied { physical_id, .. } | Self::Unchanged { physical_id } => {
                Some(physical_id)
            }
            _ => None,
        }
    }
}

/// Result of applying one site
#[derive(Debug, Clone)]
pub struct ApplyReport {
    pub domain: DomainName,
    /// Outcomes in apply order
    pub outcomes: Vec<(ResourceKind, ResourceOutcome)>,
    /// Present when the deployment node ran
    pub deployment: Option<DeploymentResult>,
}

impl ApplyReport {
    pub fn new(domain: DomainName) -> Self {
        Self {
            domain,
            outcomes: Vec::new(),
            deployment: None,
        }
    }

    pub fn outcome(&self, kind: ResourceKind) -> Option<&ResourceOutcome> {
        self.outcomes
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, outcome)| outcome)
    }

    pub fn physical_id(&self, kind: ResourceKind) -> Option<&str> {
        self.outcome(kind).and_then(ResourceOutcome::physical_id)
    }

    /// Every node resolved and the deploy completed its invalidation
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|(_, o)| o.is_resolved())
            && self.deployment.as_ref().map_or(true, |d| d.is_complete())
    }

    /// First node that failed, with its error
    pub fn first_failure(&self) -> Option<(ResourceKind, &ProvisionError)> {
        self.outcomes.iter().find_map(|(kind, outcome)| match outcome {
            ResourceOutcome::Failed { error } => Some((*kind, error)),
            _ => None,
        })
    }

    /// Nodes that were skipped, with their unmet dependencies
    pub fn blocked(&self) -> impl Iterator<Item = (ResourceKind, &[ResourceKind])> {
        self.outcomes.iter().filter_map(|(kind, outcome)| match outcome {
            ResourceOutcome::Blocked { unmet } => Some((*kind, unmet.as_slice())),
            _ => None,
        })
    }

    pub fn created_count(&self) -> usize {
        self.count(|o| matches!(o, ResourceOutcome::Applied { created: true, .. }))
    }

    pub fn applied_count(&self) -> usize {
        self.count(|o| matches!(o, ResourceOutcome::Applied { .. }))
    }

    pub fn unchanged_count(&self) -> usize {
        self.count(|o| matches!(o, ResourceOutcome::Unchanged { .. }))
    }

    pub fn failed_count(&self) -> usize {
        self.count(|o| matches!(o, ResourceOutcome::Failed { .. }))
    }

    /// Blocked plus aborted nodes
    pub fn skipped_count(&self) -> usize {
        self.count(|o| matches!(o, ResourceOutcome::Blocked { .. } | ResourceOutcome::Aborted))
    }

    fn count(&self, pred: impl Fn(&ResourceOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }
}
