//! Concurrent multi-site apply
//!
//! Each site runs its own pipeline on a worker thread. Pipelines share
//! nothing but a cached, read-only hosted zone lookup.

use std::sync::Arc;

use crate::application::apply::{ApplyReport, ApplyUseCase};
use crate::application::zone::CachedZoneLookup;
use crate::bridge::{offload, BridgeError};
use crate::domain::entities::SiteSpec;
use crate::domain::value_objects::DomainName;
use crate::error::{ProvisionError, ProvisionResult};

/// Result of one site's pipeline
#[derive(Debug, Clone)]
pub struct SiteRun {
    pub domain: DomainName,
    pub result: ProvisionResult<ApplyReport>,
}

impl SiteRun {
    pub fn is_success(&self) -> bool {
        self.result.as_ref().is_ok_and(ApplyReport::is_success)
    }
}

/// Apply every site concurrently, returning runs in input order
pub fn apply_all(use_case: &ApplyUseCase, sites: &[SiteSpec]) -> Vec<SiteRun> {
    let providers = use_case.providers().clone();
    let shared_dns = Arc::new(CachedZoneLookup::new(providers.dns.clone()));
    let shared = use_case
        .clone()
        .with_providers(providers.with_dns(shared_dns));

    let pending: Vec<_> = sites
        .iter()
        .map(|spec| {
            let pipeline = shared.clone();
            let site = spec.clone();
            (spec.domain_name.clone(), offload(move || pipeline.execute(&site)))
        })
        .collect();

    pending
        .into_iter()
        .map(|(domain, handle)| {
            let result = handle.wait().unwrap_or_else(|e: BridgeError| {
                Err(ProvisionError::provider("site pipeline", e.to_string()))
            });
            SiteRun { domain, result }
        })
        .collect()
}
