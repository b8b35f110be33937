//! Orchestration driver
//!
//! Walks a [`Plan`] in dependency order. A node only runs once every one of
//! its dependencies resolved. Retryable failures block the failing node's
//! dependents and let independent branches continue; fatal failures stop
//! the run. Nothing already applied is rolled back.

use std::collections::HashSet;
use std::sync::Arc;

use crate::application::plan::{Plan, PlannedResource};
use crate::domain::ports::{ProvisionEvent, ProvisionEventSink};
use crate::domain::value_objects::ResourceKind;
use crate::error::ProvisionResult;

use super::result::{ApplyReport, ResourceOutcome};

/// Successful result of a single node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Created(String),
    Updated(String),
    Unchanged(String),
}

impl StepOutcome {
    fn into_outcome(self) -> ResourceOutcome {
        match self {
            Self::Created(physical_id) => ResourceOutcome::Applied {
                physical_id,
                created: true,
            },
            Self::Updated(physical_id) => ResourceOutcome::Applied {
                physical_id,
                created: false,
            },
            Self::Unchanged(physical_id) => ResourceOutcome::Unchanged { physical_id },
        }
    }
}

/// Create-or-update of one planned node
pub trait ResourceStep {
    fn apply(&mut self, resource: &PlannedResource) -> ProvisionResult<StepOutcome>;
}

/// Dependency-ordered executor
pub struct Orchestrator {
    events: Arc<dyn ProvisionEventSink>,
}

impl Orchestrator {
    pub fn new(events: Arc<dyn ProvisionEventSink>) -> Self {
        Self { events }
    }

    pub fn apply(&self, plan: &Plan, step: &mut dyn ResourceStep) -> ApplyReport {
        let domain = plan.domain.as_str().to_string();
        let mut report = ApplyReport::new(plan.domain.clone());
        let mut resolved: HashSet<ResourceKind> = HashSet::new();
        let mut aborted = false;

        self.events.on_event(ProvisionEvent::PlanComputed {
            domain: domain.clone(),
            order: plan.order(),
        });

        for resource in &plan.resources {
            let kind = resource.kind;
            if aborted {
                report.outcomes.push((kind, ResourceOutcome::Aborted));
                continue;
            }

            let unmet: Vec<ResourceKind> = resource
                .dependencies
                .iter()
                .copied()
                .filter(|dep| !resolved.contains(dep))
                .collect();
            if !unmet.is_empty() {
                self.events.on_event(ProvisionEvent::ResourceBlocked {
                    domain: domain.clone(),
                    kind,
                    unmet: unmet.clone(),
                });
                report
                    .outcomes
                    .push((kind, ResourceOutcome::Blocked { unmet }));
                continue;
            }

            self.events.on_event(ProvisionEvent::ResourceStarted {
                domain: domain.clone(),
                kind,
            });
            let outcome = match step.apply(resource) {
                Ok(done) => {
                    let outcome = done.into_outcome();
                    self.emit_resolved(&domain, kind, &outcome);
                    resolved.insert(kind);
                    outcome
                }
                Err(error) => {
                    let fatal = error.is_fatal();
                    self.events.on_event(ProvisionEvent::ResourceFailed {
                        domain: domain.clone(),
                        kind,
                        error: error.to_string(),
                        fatal,
                    });
                    aborted = fatal;
                    ResourceOutcome::Failed { error }
                }
            };
            report.outcomes.push((kind, outcome));
        }

        self.events.on_event(ProvisionEvent::Completed {
            domain,
            applied: report.applied_count(),
            unchanged: report.unchanged_count(),
            failed: report.failed_count(),
            blocked: report.skipped_count(),
        });
        report
    }

    fn emit_resolved(&self, domain: &str, kind: ResourceKind, outcome: &ResourceOutcome) {
        let event = match outcome {
            ResourceOutcome::Applied {
                physical_id,
                created,
            } => ProvisionEvent::ResourceApplied {
                domain: domain.to_string(),
                kind,
                physical_id: physical_id.clone(),
                created: *created,
            },
            ResourceOutcome::Unchanged { physical_id } => ProvisionEvent::ResourceUnchanged {
                domain: domain.to_string(),
                kind,
                physical_id: physical_id.clone(),
            },
            _ => return,
        };
        self.events.on_event(event);
    }
}
