//! Site teardown
//!
//! Walks the plan in reverse: alias record, distribution, certificate with
//! its challenge records, then the bucket after emptying it. The hosted
//! zone is only looked up, never deleted.
//!
//! A distribution or alias record found by name rather than through state
//! is deleted only when it belongs to this site; otherwise the teardown
//! stops with a conflict before anything is removed.

use crate::application::plan::plan_site;
use crate::application::zone::resolve_zone;
use crate::domain::entities::{
    AliasRecord, Distribution, HostedZone, HostingBucket, RecordType, SiteSpec, SiteState,
};
use crate::domain::ports::{
    ProviderContext, Providers, ProvisionEvent, ProvisionEventSink, StateRepository,
};
use crate::domain::value_objects::{DomainName, Region, ResourceKind};
use crate::error::{ProvisionError, ProvisionResult};

/// Result of destroying one site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestroyReport {
    pub domain: DomainName,
    /// Resources deleted, in deletion order
    pub destroyed: Vec<(ResourceKind, String)>,
    /// Resources that did not exist
    pub absent: Vec<ResourceKind>,
    /// Objects removed while emptying the bucket
    pub deleted_object_count: usize,
}

/// Resources a destroy would remove, in deletion order
pub fn teardown_targets(spec: &SiteSpec) -> ProvisionResult<Vec<ResourceKind>> {
    let plan = plan_site(spec)?;
    Ok(plan
        .teardown_order()
        .into_iter()
        .filter(ResourceKind::is_destroyable)
        .collect())
}

pub fn destroy_site(
    providers: &Providers,
    ctx: &ProviderContext,
    spec: &SiteSpec,
    state_repo: &dyn StateRepository,
    events: &dyn ProvisionEventSink,
) -> ProvisionResult<DestroyReport> {
    let mut state = state_repo
        .load(&spec.domain_name)
        .map_err(|e| ProvisionError::State(e.to_string()))?
        .unwrap_or_else(|| SiteState::new(spec.domain_name.clone()));

    let zone = match resolve_zone(providers.dns.as_ref(), ctx, spec) {
        Ok(zone) => Some(zone),
        Err(ProvisionError::Lookup { .. }) => None,
        Err(e) => return Err(e),
    };

    let mut teardown = Teardown {
        providers,
        ctx,
        spec,
        zone,
        distribution: None,
        report: DestroyReport {
            domain: spec.domain_name.clone(),
            destroyed: Vec::new(),
            absent: Vec::new(),
            deleted_object_count: 0,
        },
    };
    teardown.distribution = teardown.owned_distribution(
        state
            .physical_id(ResourceKind::Distribution)
            .map(str::to_string),
    )?;

    for kind in teardown_targets(spec)? {
        let removed = match kind {
            ResourceKind::AliasRecord => teardown.alias_record()?,
            ResourceKind::Distribution => teardown.distribution()?,
            ResourceKind::Certificate => {
                teardown.certificate(state.physical_id(kind).map(str::to_string))?
            }
            ResourceKind::HostingBucket => teardown.bucket()?,
            ResourceKind::HostedZone | ResourceKind::Deployment => continue,
        };

        match removed {
            Some(physical_id) => {
                events.on_event(ProvisionEvent::ResourceDestroyed {
                    domain: spec.domain_name.as_str().to_string(),
                    kind,
                    physical_id: physical_id.clone(),
                });
                teardown.report.destroyed.push((kind, physical_id));
            }
            None => teardown.report.absent.push(kind),
        }
        state.forget(kind);
        state_repo
            .save(&state)
            .map_err(|e| ProvisionError::State(e.to_string()))?;
    }

    state_repo
        .remove(&spec.domain_name)
        .map_err(|e| ProvisionError::State(e.to_string()))?;
    Ok(teardown.report)
}

struct Teardown<'a> {
    providers: &'a Providers,
    ctx: &'a ProviderContext,
    spec: &'a SiteSpec,
    zone: Option<HostedZone>,
    /// This site's distribution, resolved before anything is deleted
    distribution: Option<Distribution>,
    report: DestroyReport,
}

impl Teardown<'_> {
    fn alias_record(&self) -> ProvisionResult<Option<String>> {
        let Some(zone) = &self.zone else {
            return Ok(None);
        };
        let record_name = self.spec.domain_name.record_name();
        let current: Option<AliasRecord> = self
            .providers
            .dns
            .get_alias_record(self.ctx, &zone.zone_id, &record_name, RecordType::A)
            .map_err(|e| ProvisionError::provider("ListResourceRecordSets", e.to_string()))?;
        let Some(record) = current else {
            return Ok(None);
        };
        let ours = self
            .distribution
            .as_ref()
            .is_some_and(|d| d.domain_name == record.target_dns_name);
        if !ours {
            return Err(ProvisionError::conflict(
                "alias record",
                record.identifier(),
                format!(
                    "targets {}, which is not this site's distribution",
                    record.target_dns_name
                ),
            ));
        }
        self.providers
            .dns
            .delete_alias_record(self.ctx, &record)
            .map_err(|e| ProvisionError::provider("ChangeResourceRecordSets", e.to_string()))?;
        Ok(Some(record.identifier()))
    }

    /// The recorded distribution, or the one serving the alias if it
    /// fronts this site's bucket. Any other alias holder is a conflict.
    fn owned_distribution(
        &self,
        known_id: Option<String>,
    ) -> ProvisionResult<Option<Distribution>> {
        let cdn = &self.providers.cdn;
        if let Some(id) = known_id {
            let recorded = cdn
                .get_distribution(self.ctx, &id)
                .map_err(|e| ProvisionError::provider("GetDistribution", e.to_string()))?;
            if recorded.is_some() {
                return Ok(recorded);
            }
        }

        let alias = self.spec.domain_name.as_str();
        let Some(claimed) = cdn
            .find_distribution_by_alias(self.ctx, alias)
            .map_err(|e| ProvisionError::provider("ListDistributions", e.to_string()))?
        else {
            return Ok(None);
        };
        let bucket = HostingBucket::desired(
            self.spec.bucket_name(),
            &self.spec.region,
            &self.spec.account,
        );
        let origin = bucket.website_endpoint();
        if claimed.origin_ref() != origin {
            return Err(ProvisionError::conflict(
                "distribution",
                &claimed.id,
                format!("serves alias '{}' from origin {}", alias, claimed.origin_ref()),
            ));
        }
        Ok(Some(claimed))
    }

    fn distribution(&self) -> ProvisionResult<Option<String>> {
        let Some(distribution) = &self.distribution else {
            return Ok(None);
        };
        self.providers
            .cdn
            .delete_distribution(self.ctx, &distribution.id)
            .map_err(|e| ProvisionError::provider("DeleteDistribution", e.to_string()))?;
        Ok(Some(distribution.id.clone()))
    }

    fn certificate(&self, known_arn: Option<String>) -> ProvisionResult<Option<String>> {
        let certs = &self.providers.certificates;
        let vctx = self.ctx.in_region(Region::validation());
        let mut found = match known_arn {
            Some(arn) => certs
                .describe_certificate(&vctx, &arn)
                .map_err(|e| ProvisionError::provider("DescribeCertificate", e.to_string()))?,
            None => None,
        };
        if found.is_none() {
            found = certs
                .find_certificate(&vctx, &self.spec.domain_name)
                .map_err(|e| ProvisionError::provider("ListCertificates", e.to_string()))?;
        }
        let Some(certificate) = found else {
            return Ok(None);
        };

        if let Some(zone) = &self.zone {
            let challenges = certs
                .challenge_records(&vctx, &certificate.arn)
                .map_err(|e| ProvisionError::provider("DescribeCertificate", e.to_string()))?;
            for challenge in &challenges {
                self.providers
                    .dns
                    .delete_challenge_record(self.ctx, &zone.zone_id, challenge)
                    .map_err(|e| {
                        ProvisionError::provider("ChangeResourceRecordSets", e.to_string())
                    })?;
            }
        }
        certs
            .delete_certificate(&vctx, &certificate.arn)
            .map_err(|e| ProvisionError::provider("DeleteCertificate", e.to_string()))?;
        Ok(Some(certificate.arn))
    }

    fn bucket(&mut self) -> ProvisionResult<Option<String>> {
        let hosting = &self.providers.hosting;
        let name = self.spec.bucket_name();
        let bucket = hosting
            .get_bucket(self.ctx, name)
            .map_err(|e| ProvisionError::provider("GetBucket", e.to_string()))?;
        let Some(bucket) = bucket else {
            return Ok(None);
        };
        if bucket.owner_account != self.spec.account {
            return Err(ProvisionError::conflict(
                "bucket",
                name,
                format!("owned by account {}", bucket.owner_account),
            ));
        }

        let objects = hosting
            .list_objects(self.ctx, name)
            .map_err(|e| ProvisionError::provider("ListObjects", e.to_string()))?;
        for object in &objects {
            hosting
                .delete_object(self.ctx, name, &object.key)
                .map_err(|e| ProvisionError::provider("DeleteObject", e.to_string()))?;
            self.report.deleted_object_count += 1;
        }
        hosting
            .delete_bucket(self.ctx, name)
            .map_err(|e| ProvisionError::provider("DeleteBucket", e.to_string()))?;
        Ok(Some(bucket.name))
    }
}
