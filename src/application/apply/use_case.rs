//! Apply Use Case
//!
//! Orchestrates one site:
//! 1. Plan the resource graph
//! 2. Check the source folder exists
//! 3. Load recorded state
//! 4. Walk the plan, saving state after every node
//!
//! All dependencies are behind `Arc`, so the use case is cheap to clone into
//! concurrent per-site pipelines.

use std::sync::Arc;

use crate::application::alias::AliasRecordManager;
use crate::application::certificate::CertificateIssuer;
use crate::application::deploy::DeploymentExecutor;
use crate::application::distribution::DistributionConfigurer;
use crate::application::plan::plan_site;
use crate::domain::entities::{SiteSpec, SiteState};
use crate::domain::ports::{
    Clock, ContentSource, NoopEventSink, ProviderContext, ProvisionEventSink, Providers,
    StateRepository,
};
use crate::domain::value_objects::CancelToken;
use crate::error::{ProvisionError, ProvisionResult};

use super::options::ApplyOptions;
use super::orchestrator::Orchestrator;
use super::result::ApplyReport;
use super::site_step::{SiteManagers, SiteProvisioner};

#[derive(Clone)]
pub struct ApplyUseCase {
    providers: Providers,
    content: Arc<dyn ContentSource>,
    state: Arc<dyn StateRepository>,
    clock: Arc<dyn Clock>,
    events: Arc<dyn ProvisionEventSink>,
    options: ApplyOptions,
    cancel: CancelToken,
}

impl ApplyUseCase {
    pub fn new(
        providers: Providers,
        content: Arc<dyn ContentSource>,
        state: Arc<dyn StateRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            providers,
            content,
            state,
            clock,
            events: Arc::new(NoopEventSink),
            options: ApplyOptions::default(),
            cancel: CancelToken::new(),
        }
    }

    pub fn with_events(mut self, events: Arc<dyn ProvisionEventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn with_options(mut self, options: ApplyOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_providers(mut self, providers: Providers) -> Self {
        self.providers = providers;
        self
    }

    pub fn providers(&self) -> &Providers {
        &self.providers
    }

    /// Provider context for a site
    pub fn context(&self, spec: &SiteSpec) -> ProviderContext {
        ProviderContext::new(spec.account.clone(), spec.region.clone())
            .with_profile(self.options.profile.clone())
    }

    /// Apply one site. `Err` means nothing was attempted; per-resource
    /// failures are reported in the returned [`ApplyReport`].
    pub fn execute(&self, spec: &SiteSpec) -> ProvisionResult<ApplyReport> {
        let plan = plan_site(spec)?;

        if !spec.source_folder.is_dir() {
            return Err(ProvisionError::InvalidSpec(format!(
                "source folder '{}' does not exist",
                spec.source_folder.display()
            )));
        }

        let state = self
            .state
            .load(&spec.domain_name)
            .map_err(|e| ProvisionError::State(e.to_string()))?
            .unwrap_or_else(|| SiteState::new(spec.domain_name.clone()));

        let mut step = SiteProvisioner::new(
            spec,
            self.context(spec),
            &self.providers,
            self.state.as_ref(),
            self.managers(),
            state,
        );
        let mut report = Orchestrator::new(self.events.clone()).apply(&plan, &mut step);
        report.deployment = step.take_deployment();
        Ok(report)
    }

    fn managers(&self) -> SiteManagers {
        SiteManagers {
            certificates: CertificateIssuer::new(
                self.providers.certificates.clone(),
                self.providers.dns.clone(),
                self.clock.clone(),
                self.options.backoff,
                self.events.clone(),
                self.cancel.clone(),
            ),
            distributions: DistributionConfigurer::new(
                self.providers.cdn.clone(),
                self.options.viewer_policy,
            ),
            aliases: AliasRecordManager::new(self.providers.dns.clone()),
            executor: DeploymentExecutor::new(
                self.providers.hosting.clone(),
                self.providers.cdn.clone(),
                self.content.clone(),
                self.events.clone(),
                self.cancel.clone(),
            ),
        }
    }
}
