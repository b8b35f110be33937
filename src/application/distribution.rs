//! Distribution configurer
//!
//! One distribution per site, found first through its recorded id (the
//! current `SiteDistribution` logical id or the adopted legacy one) and then
//! through the alias it serves. Existing distributions are updated in place
//! so their edge hostname, and the alias record pointing at it, stay valid.

use std::sync::Arc;

use crate::application::apply::StepOutcome;
use crate::domain::entities::{
    Certificate, Distribution, DistributionConfig, HostingBucket, SiteSpec, ViewerPolicy,
};
use crate::domain::ports::{CdnProvider, ProviderContext};
use crate::error::{ProvisionError, ProvisionResult};

pub struct DistributionConfigurer {
    cdn: Arc<dyn CdnProvider>,
    viewer_policy: ViewerPolicy,
}

impl DistributionConfigurer {
    pub fn new(cdn: Arc<dyn CdnProvider>, viewer_policy: ViewerPolicy) -> Self {
        Self { cdn, viewer_policy }
    }

    /// Desired configuration for a site
    pub fn desired(
        &self,
        spec: &SiteSpec,
        bucket: &HostingBucket,
        certificate: &Certificate,
    ) -> ProvisionResult<DistributionConfig> {
        let config =
            DistributionConfig::for_site(&spec.domain_name, bucket, certificate, self.viewer_policy);
        if config.domain_aliases != certificate.coverage() {
            return Err(ProvisionError::conflict(
                "distribution",
                spec.domain_name.as_str(),
                format!(
                    "aliases {:?} differ from certificate coverage {:?}",
                    config.domain_aliases,
                    certificate.coverage()
                ),
            ));
        }
        Ok(config)
    }

    pub fn ensure(
        &self,
        ctx: &ProviderContext,
        spec: &SiteSpec,
        bucket: &HostingBucket,
        certificate: &Certificate,
        known_id: Option<&str>,
    ) -> ProvisionResult<(Distribution, StepOutcome)> {
        let desired = self.desired(spec, bucket, certificate)?;
        let alias = spec.domain_name.as_str();

        let claimed = self
            .cdn
            .find_distribution_by_alias(ctx, alias)
            .map_err(|e| ProvisionError::provider("ListDistributions", e.to_string()))?;
        let owned = match known_id {
            Some(id) => self
                .cdn
                .get_distribution(ctx, id)
                .map_err(|e| ProvisionError::provider("GetDistribution", e.to_string()))?,
            None => None,
        };

        let existing = match (owned, claimed) {
            (Some(owned), Some(claimed)) if owned.id != claimed.id => {
                return Err(ProvisionError::conflict(
                    "distribution",
                    &claimed.id,
                    format!("already serves alias '{}'", alias),
                ));
            }
            (Some(owned), _) => Some(owned),
            (None, Some(claimed)) => {
                if claimed.origin_ref() != desired.origin.domain_name {
                    return Err(ProvisionError::conflict(
                        "distribution",
                        &claimed.id,
                        format!(
                            "serves alias '{}' from origin {}",
                            alias,
                            claimed.origin_ref()
                        ),
                    ));
                }
                Some(claimed)
            }
            (None, None) => None,
        };

        match existing {
            Some(current) if current.config.same_shape(&desired) => {
                let id = current.id.clone();
                Ok((current, StepOutcome::Unchanged(id)))
            }
            Some(current) => {
                // The logical id the distribution was created under is kept.
                let mut config = desired;
                config.logical_id = current.config.logical_id.clone();
                let updated = self
                    .cdn
                    .update_distribution(ctx, &current.id, &config)
                    .map_err(|e| ProvisionError::provider("UpdateDistribution", e.to_string()))?;
                let id = updated.id.clone();
                Ok((updated, StepOutcome::Updated(id)))
            }
            None => {
                let created = self
                    .cdn
                    .create_distribution(ctx, &desired)
                    .map_err(|e| ProvisionError::provider("CreateDistribution", e.to_string()))?;
                let id = created.id.clone();
                Ok((created, StepOutcome::Created(id)))
            }
        }
    }
}
