//! Alias record manager

use std::sync::Arc;

use crate::application::apply::StepOutcome;
use crate::domain::entities::{AliasRecord, Distribution, HostedZone};
use crate::domain::ports::{DnsProvider, ProviderContext};
use crate::domain::value_objects::DomainName;
use crate::error::{ProvisionError, ProvisionResult};

pub struct AliasRecordManager {
    dns: Arc<dyn DnsProvider>,
}

impl AliasRecordManager {
    pub fn new(dns: Arc<dyn DnsProvider>) -> Self {
        Self { dns }
    }

    /// Point `domain.` at the distribution's edge hostname.
    ///
    /// A record with the same name and type is overwritten, never duplicated.
    pub fn ensure(
        &self,
        ctx: &ProviderContext,
        zone: &HostedZone,
        domain: &DomainName,
        distribution: &Distribution,
    ) -> ProvisionResult<(AliasRecord, StepOutcome)> {
        let desired = AliasRecord::for_distribution(zone, domain, distribution);
        let current = self
            .dns
            .get_alias_record(ctx, &zone.zone_id, &desired.record_name, desired.record_type)
            .map_err(|e| ProvisionError::provider("ListResourceRecordSets", e.to_string()))?;

        let id = desired.identifier();
        if current.as_ref() == Some(&desired) {
            return Ok((desired, StepOutcome::Unchanged(id)));
        }

        self.dns
            .upsert_alias_record(ctx, &desired)
            .map_err(|e| ProvisionError::provider("ChangeResourceRecordSets", e.to_string()))?;
        let outcome = if current.is_some() {
            StepOutcome::Updated(id)
        } else {
            StepOutcome::Created(id)
        };
        Ok((desired, outcome))
    }
}
