//! Hosted zone resolution
//!
//! Read-only. Tries the configured zone, or every suffix of the domain from
//! the most specific down to the registrable two-label name.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::entities::{AliasRecord, ChallengeRecord, HostedZone, RecordType, SiteSpec};
use crate::domain::ports::{DnsProvider, ProviderContext, ProviderResult};
use crate::error::{ProvisionError, ProvisionResult};

/// Find the public zone that will hold the site's records
pub fn resolve_zone(
    dns: &dyn DnsProvider,
    ctx: &ProviderContext,
    spec: &SiteSpec,
) -> ProvisionResult<HostedZone> {
    let candidates = spec.zone_candidates();
    for name in &candidates {
        let found = dns
            .find_hosted_zone(ctx, name)
            .map_err(|e| ProvisionError::provider("FindHostedZone", e.to_string()))?;
        if let Some(zone) = found.filter(|z| !z.private_zone) {
            return Ok(zone);
        }
    }
    Err(ProvisionError::Lookup {
        domain: spec.domain_name.as_str().to_string(),
        tried: candidates,
    })
}

/// DNS provider wrapper that memoizes zone lookups.
///
/// Shared between concurrent site pipelines; every other call passes
/// straight through.
pub struct CachedZoneLookup {
    inner: Arc<dyn DnsProvider>,
    zones: Mutex<HashMap<(String, String), Option<HostedZone>>>,
}

impl CachedZoneLookup {
    pub fn new(inner: Arc<dyn DnsProvider>) -> Self {
        Self {
            inner,
            zones: Mutex::new(HashMap::new()),
        }
    }
}

impl DnsProvider for CachedZoneLookup {
    fn find_hosted_zone(
        &self,
        ctx: &ProviderContext,
        name: &str,
    ) -> ProviderResult<Option<HostedZone>> {
        let key = (ctx.account.clone(), name.to_string());
        if let Ok(cache) = self.zones.lock() {
            if let Some(hit) = cache.get(&key) {
                return Ok(hit.clone());
            }
        }
        let found = self.inner.find_hosted_zone(ctx, name)?;
        if let Ok(mut cache) = self.zones.lock() {
            cache.insert(key, found.clone());
        }
        Ok(found)
    }

    fn get_alias_record(
        &self,
        ctx: &ProviderContext,
        zone_id: &str,
        record_name: &str,
        record_type: RecordType,
    ) -> ProviderResult<Option<AliasRecord>> {
        self.inner
            .get_alias_record(ctx, zone_id, record_name, record_type)
    }

    fn upsert_alias_record(&self, ctx: &ProviderContext, record: &AliasRecord) -> ProviderResult<()> {
        self.inner.upsert_alias_record(ctx, record)
    }

    fn delete_alias_record(&self, ctx: &ProviderContext, record: &AliasRecord) -> ProviderResult<()> {
        self.inner.delete_alias_record(ctx, record)
    }

    fn upsert_challenge_record(
        &self,
        ctx: &ProviderContext,
        zone_id: &str,
        record: &ChallengeRecord,
    ) -> ProviderResult<()> {
        self.inner.upsert_challenge_record(ctx, zone_id, record)
    }

    fn delete_challenge_record(
        &self,
        ctx: &ProviderContext,
        zone_id: &str,
        record: &ChallengeRecord,
    ) -> ProviderResult<()> {
        self.inner.delete_challenge_record(ctx, zone_id, record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Region;
    use crate::infrastructure::LocalCloud;

    const ACCOUNT: &str = "123456789012";

    fn ctx() -> ProviderContext {
        ProviderContext::new(ACCOUNT, Region::parse("us-west-2").unwrap())
    }

    fn spec(domain: &str) -> SiteSpec {
        SiteSpec::new(domain, "./site", ACCOUNT, "us-west-2").unwrap()
    }

    #[test]
    fn test_most_specific_public_zone_wins() {
        let cloud = LocalCloud::in_memory();
        cloud.seed_zone(ACCOUNT, "example.com", false).unwrap();
        let inner = cloud.seed_zone(ACCOUNT, "eu.example.com", false).unwrap();

        let zone = resolve_zone(&cloud, &ctx(), &spec("docs.eu.example.com")).unwrap();
        assert_eq!(zone, inner);
    }

    #[test]
    fn test_private_zones_are_skipped() {
        let cloud = LocalCloud::in_memory();
        cloud.seed_zone(ACCOUNT, "docs.example.com", true).unwrap();
        let public = cloud.seed_zone(ACCOUNT, "example.com", false).unwrap();

        let zone = resolve_zone(&cloud, &ctx(), &spec("docs.example.com")).unwrap();
        assert_eq!(zone, public);
    }

    #[test]
    fn test_missing_zone_lists_every_candidate() {
        let cloud = LocalCloud::in_memory();
        let err = resolve_zone(&cloud, &ctx(), &spec("docs.example.com")).unwrap_err();
        assert!(err.is_fatal());

        match err {
            ProvisionError::Lookup { domain, tried } => {
                assert_eq!(domain, "docs.example.com");
                assert_eq!(tried, vec!["docs.example.com", "example.com"]);
            }
            other => panic!("expected lookup error, got {:?}", other),
        }
    }

    #[test]
    fn test_explicit_zone_is_the_only_candidate() {
        let cloud = LocalCloud::in_memory();
        cloud.seed_zone(ACCOUNT, "docs.example.com", false).unwrap();
        let configured = cloud.seed_zone(ACCOUNT, "example.com", false).unwrap();

        let spec = spec("docs.example.com").with_hosted_zone("example.com.");
        assert_eq!(resolve_zone(&cloud, &ctx(), &spec).unwrap(), configured);
    }

    #[test]
    fn test_cached_lookup_hits_the_provider_once() {
        let cloud = Arc::new(LocalCloud::in_memory());
        cloud.seed_zone(ACCOUNT, "example.com", false).unwrap();
        let cached = CachedZoneLookup::new(cloud.clone());

        for _ in 0..3 {
            resolve_zone(&cached, &ctx(), &spec("example.com")).unwrap();
        }
        assert_eq!(cloud.calls_to("ListHostedZonesByName").len(), 1);
    }
}
