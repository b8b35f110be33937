//! Per-site resource step
//!
//! Dispatches each planned node to its manager, carrying resolved values
//! (zone, bucket, certificate, distribution) forward to the nodes that need
//! them. State is saved after every node so a failed run can resume.

use chrono::Utc;

use crate::application::alias::AliasRecordManager;
use crate::application::bucket::ensure_bucket;
use crate::application::certificate::CertificateIssuer;
use crate::application::deploy::DeploymentExecutor;
use crate::application::distribution::DistributionConfigurer;
use crate::application::plan::PlannedResource;
use crate::application::zone::resolve_zone;
use crate::domain::entities::{
    Certificate, CompletionStatus, DeploymentRecord, DeploymentResult, Distribution, HostedZone,
    HostingBucket, SiteSpec, SiteState,
};
use crate::domain::ports::{ProviderContext, Providers, StateRepository};
use crate::domain::value_objects::ResourceKind;
use crate::error::{ProvisionError, ProvisionResult};

use super::orchestrator::{ResourceStep, StepOutcome};

/// Managers a site step delegates to
pub struct SiteManagers {
    pub certificates: CertificateIssuer,
    pub distributions: DistributionConfigurer,
    pub aliases: AliasRecordManager,
    pub executor: DeploymentExecutor,
}

pub struct SiteProvisioner<'a> {
    spec: &'a SiteSpec,
    ctx: ProviderContext,
    providers: &'a Providers,
    state_repo: &'a dyn StateRepository,
    managers: SiteManagers,
    state: SiteState,
    zone: Option<HostedZone>,
    bucket: Option<HostingBucket>,
    certificate: Option<Certificate>,
    distribution: Option<Distribution>,
    deployment: Option<DeploymentResult>,
}

impl<'a> SiteProvisioner<'a> {
    pub fn new(
        spec: &'a SiteSpec,
        ctx: ProviderContext,
        providers: &'a Providers,
        state_repo: &'a dyn StateRepository,
        managers: SiteManagers,
        state: SiteState,
    ) -> Self {
        Self {
            spec,
            ctx,
            providers,
            state_repo,
            managers,
            state,
            zone: None,
            bucket: None,
            certificate: None,
            distribution: None,
            deployment: None,
        }
    }

    /// Deployment result, if the deployment node ran
    pub fn take_deployment(&mut self) -> Option<DeploymentResult> {
        self.deployment.take()
    }

    fn save(&self) -> ProvisionResult<()> {
        self.state_repo
            .save(&self.state)
            .map_err(|e| ProvisionError::State(e.to_string()))
    }

    fn record(&mut self, kind: ResourceKind, outcome: &StepOutcome) -> ProvisionResult<()> {
        let id = match outcome {
            StepOutcome::Created(id) | StepOutcome::Updated(id) | StepOutcome::Unchanged(id) => id,
        };
        self.state.record(kind, id.clone());
        self.save()
    }

    fn apply_zone(&mut self) -> ProvisionResult<StepOutcome> {
        let zone = resolve_zone(self.providers.dns.as_ref(), &self.ctx, self.spec)?;
        let outcome = StepOutcome::Unchanged(zone.zone_id.clone());
        self.zone = Some(zone);
        Ok(outcome)
    }

    fn apply_bucket(&mut self) -> ProvisionResult<StepOutcome> {
        let (bucket, outcome) = ensure_bucket(self.providers.hosting.as_ref(), &self.ctx, self.spec)?;
        self.bucket = Some(bucket);
        self.record(ResourceKind::HostingBucket, &outcome)?;
        Ok(outcome)
    }

    fn apply_certificate(&mut self) -> ProvisionResult<StepOutcome> {
        let zone = resolved(&self.zone, ResourceKind::HostedZone)?.clone();
        let known_arn = self
            .state
            .physical_id(ResourceKind::Certificate)
            .map(str::to_string);

        let state = &mut self.state;
        let state_repo = self.state_repo;
        let mut checkpoint = |cert: &Certificate| {
            state.record(ResourceKind::Certificate, cert.arn.clone());
            state_repo
                .save(&*state)
                .map_err(|e| ProvisionError::State(e.to_string()))
        };
        let (certificate, outcome) = self.managers.certificates.ensure(
            &self.ctx,
            self.spec,
            &zone,
            known_arn.as_deref(),
            &mut checkpoint,
        )?;
        self.certificate = Some(certificate);
        Ok(outcome)
    }

    fn apply_distribution(&mut self) -> ProvisionResult<StepOutcome> {
        let bucket = resolved(&self.bucket, ResourceKind::HostingBucket)?;
        let certificate = resolved(&self.certificate, ResourceKind::Certificate)?;
        let known_id = self.state.physical_id(ResourceKind::Distribution);
        let (distribution, outcome) = self.managers.distributions.ensure(
            &self.ctx,
            self.spec,
            bucket,
            certificate,
            known_id,
        )?;
        self.distribution = Some(distribution);
        self.record(ResourceKind::Distribution, &outcome)?;
        Ok(outcome)
    }

    fn apply_alias(&mut self) -> ProvisionResult<StepOutcome> {
        let zone = resolved(&self.zone, ResourceKind::HostedZone)?;
        let distribution = resolved(&self.distribution, ResourceKind::Distribution)?;
        let (_, outcome) = self.managers.aliases.ensure(
            &self.ctx,
            zone,
            &self.spec.domain_name,
            distribution,
        )?;
        self.record(ResourceKind::AliasRecord, &outcome)?;
        Ok(outcome)
    }

    fn apply_deployment(&mut self) -> ProvisionResult<StepOutcome> {
        let bucket = resolved(&self.bucket, ResourceKind::HostingBucket)?.name.clone();
        let distribution_id = resolved(&self.distribution, ResourceKind::Distribution)?
            .id
            .clone();

        let deployed = self
            .managers
            .executor
            .deploy(&self.ctx, self.spec, &bucket, &distribution_id);
        match deployed {
            Ok(result) => {
                self.state.pending_invalidation = false;
                self.state.last_deployment = Some(DeploymentRecord {
                    at: Utc::now(),
                    uploaded_object_count: result.uploaded_object_count,
                    invalidation_id: result.invalidation_id.clone(),
                });
                self.save()?;
                let id = result.invalidation_id.clone().unwrap_or_default();
                self.deployment = Some(result);
                Ok(StepOutcome::Updated(id))
            }
            Err(failure) => {
                if failure.result.completion_status == CompletionStatus::SyncedInvalidationPending {
                    self.state.pending_invalidation = true;
                }
                self.deployment = Some(failure.result);
                self.save()?;
                Err(failure.error)
            }
        }
    }
}

impl ResourceStep for SiteProvisioner<'_> {
    fn apply(&mut self, resource: &PlannedResource) -> ProvisionResult<StepOutcome> {
        match resource.kind {
            ResourceKind::HostedZone => self.apply_zone(),
            ResourceKind::HostingBucket => self.apply_bucket(),
            ResourceKind::Certificate => self.apply_certificate(),
            ResourceKind::Distribution => self.apply_distribution(),
            ResourceKind::AliasRecord => self.apply_alias(),
            ResourceKind::Deployment => self.apply_deployment(),
        }
    }
}

fn resolved<T>(value: &Option<T>, kind: ResourceKind) -> ProvisionResult<&T> {
    value
        .as_ref()
        .ok_or_else(|| ProvisionError::State(format!("{} was not resolved before use", kind)))
}
