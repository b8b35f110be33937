//! Local Cloud
//!
//! A self-contained provider backend implementing every provider port. It
//! keeps zones, records, buckets, certificates, distributions and
//! invalidations in memory, optionally mirrored to a JSON file so state
//! survives between CLI runs (`--cloud <file>`).
//!
//! Behaviour follows the real services where the tool depends on it:
//! bucket names are global, aliases are claimed by at most one
//! distribution, distributions keep their id and edge hostname across
//! updates, and a certificate only issues once its challenge record exists.
//!
//! Faults can be injected for testing partial failure, and every call is
//! recorded with the region it ran in.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::domain::entities::{
    AliasRecord, Certificate, CertificateStatus, ChallengeRecord, Distribution,
    DistributionConfig, HostedZone, HostingBucket, RecordType,
};
use crate::domain::ports::{
    CdnProvider, CertificateProvider, DnsProvider, HostingProvider, ObjectUpload,
    ProviderContext, ProviderError, ProviderResult, RemoteObject,
};
use crate::domain::value_objects::{ContentHash, DomainName, Region};

/// Describe calls a pending certificate needs before it issues
const DEFAULT_POLLS_TO_ISSUE: u32 = 1;

/// One recorded provider call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCall {
    pub operation: &'static str,
    pub account: String,
    pub region: Region,
}

/// Issued invalidation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidationEntry {
    pub id: String,
    pub distribution_id: String,
    pub paths: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ZoneEntry {
    account: String,
    zone: HostedZone,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredObject {
    hash: ContentHash,
    size: u64,
    content_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BucketEntry {
    bucket: HostingBucket,
    #[serde(default)]
    objects: BTreeMap<String, StoredObject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CertificateEntry {
    account: String,
    certificate: Certificate,
    challenge: ChallengeRecord,
    polls_remaining: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DistributionEntry {
    account: String,
    distribution: Distribution,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CloudState {
    #[serde(default)]
    zones: Vec<ZoneEntry>,
    /// Keyed by `AliasRecord::identifier`
    #[serde(default)]
    alias_records: BTreeMap<String, AliasRecord>,
    /// Keyed by `zone_id/name`
    #[serde(default)]
    challenge_records: BTreeMap<String, ChallengeRecord>,
    #[serde(default)]
    buckets: BTreeMap<String, BucketEntry>,
    #[serde(default)]
    certificates: BTreeMap<String, CertificateEntry>,
    #[serde(default)]
    distributions: BTreeMap<String, DistributionEntry>,
    #[serde(default)]
    invalidations: Vec<InvalidationEntry>,
    #[serde(default)]
    next_id: u64,
}

impl CloudState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn has_challenge(&self, challenge: &ChallengeRecord) -> bool {
        self.challenge_records.values().any(|r| r == challenge)
    }
}

#[derive(Debug, Clone, Default)]
struct Faults {
    uploads_before_failure: Option<usize>,
    reject_invalidation: bool,
    certificate_never_issues: bool,
    polls_to_issue: Option<u32>,
}

/// In-process cloud backend
#[derive(Debug, Default)]
pub struct LocalCloud {
    state: Mutex<CloudState>,
    faults: Mutex<Faults>,
    calls: Mutex<Vec<ProviderCall>>,
    path: Option<PathBuf>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn rejected(operation: &str, message: impl Into<String>) -> ProviderError {
    ProviderError::Rejected {
        operation: operation.to_string(),
        message: message.into(),
    }
}

fn challenge_key(zone_id: &str, name: &str) -> String {
    format!("{}/{}", zone_id, name)
}

impl LocalCloud {
    /// Backend with no persistence
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Backend mirrored to a JSON file, created on first write
    pub fn open(path: impl Into<PathBuf>) -> ProviderResult<Self> {
        let path = path.into();
        let state = if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| ProviderError::Transport(format!("{}: {}", path.display(), e)))?;
            serde_json::from_str(&content)
                .map_err(|e| ProviderError::Transport(format!("{}: {}", path.display(), e)))?
        } else {
            CloudState::default()
        };
        Ok(Self {
            state: Mutex::new(state),
            path: Some(path),
            ..Self::default()
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    // ------------------------------------------------------------------
    // Seeding
    // ------------------------------------------------------------------

    /// Create a hosted zone owned by `account`
    pub fn seed_zone(
        &self,
        account: &str,
        name: &str,
        private_zone: bool,
    ) -> ProviderResult<HostedZone> {
        let mut state = lock(&self.state);
        let zone = HostedZone {
            zone_id: format!("Z{:013X}", state.next_id()),
            domain_suffix: name.trim_end_matches('.').to_string(),
            private_zone,
        };
        state.zones.push(ZoneEntry {
            account: account.to_string(),
            zone: zone.clone(),
        });
        self.persist(&state)?;
        Ok(zone)
    }

    /// Place a bucket directly, e.g. one owned by another account
    pub fn seed_bucket(&self, bucket: HostingBucket) -> ProviderResult<()> {
        let mut state = lock(&self.state);
        state.buckets.insert(
            bucket.name.clone(),
            BucketEntry {
                bucket,
                objects: BTreeMap::new(),
            },
        );
        self.persist(&state)
    }

    /// Place a distribution directly, e.g. one created by an earlier release
    pub fn seed_distribution(
        &self,
        account: &str,
        config: DistributionConfig,
    ) -> ProviderResult<Distribution> {
        let mut state = lock(&self.state);
        let distribution = Self::new_distribution(&mut state, config);
        state.distributions.insert(
            distribution.id.clone(),
            DistributionEntry {
                account: account.to_string(),
                distribution: distribution.clone(),
            },
        );
        self.persist(&state)?;
        Ok(distribution)
    }

    // ------------------------------------------------------------------
    // Fault injection
    // ------------------------------------------------------------------

    /// Let `count` uploads succeed, then fail every later one
    pub fn fail_upload_after(&self, count: usize) {
        lock(&self.faults).uploads_before_failure = Some(count);
    }

    pub fn reject_invalidation(&self) {
        lock(&self.faults).reject_invalidation = true;
    }

    /// Requested certificates stay in validation forever
    pub fn certificate_never_issues(&self) {
        lock(&self.faults).certificate_never_issues = true;
    }

    /// Describe calls a new certificate needs before it issues
    pub fn certificate_polls_to_issue(&self, polls: u32) {
        lock(&self.faults).polls_to_issue = Some(polls);
    }

    /// Remove every injected fault
    pub fn clear_faults(&self) {
        *lock(&self.faults) = Faults::default();
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    pub fn calls(&self) -> Vec<ProviderCall> {
        lock(&self.calls).clone()
    }

    /// Recorded calls of one operation
    pub fn calls_to(&self, operation: &str) -> Vec<ProviderCall> {
        lock(&self.calls)
            .iter()
            .filter(|c| c.operation == operation)
            .cloned()
            .collect()
    }

    pub fn bucket(&self, name: &str) -> Option<HostingBucket> {
        lock(&self.state)
            .buckets
            .get(name)
            .map(|entry| entry.bucket.clone())
    }

    /// Keys stored in a bucket, sorted
    pub fn object_keys(&self, bucket: &str) -> Vec<String> {
        lock(&self.state)
            .buckets
            .get(bucket)
            .map(|entry| entry.objects.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn certificates(&self) -> Vec<Certificate> {
        lock(&self.state)
            .certificates
            .values()
            .map(|entry| entry.certificate.clone())
            .collect()
    }

    pub fn distributions(&self) -> Vec<Distribution> {
        lock(&self.state)
            .distributions
            .values()
            .map(|entry| entry.distribution.clone())
            .collect()
    }

    pub fn alias_records(&self) -> Vec<AliasRecord> {
        lock(&self.state).alias_records.values().cloned().collect()
    }

    pub fn challenge_records(&self) -> Vec<ChallengeRecord> {
        lock(&self.state)
            .challenge_records
            .values()
            .cloned()
            .collect()
    }

    pub fn invalidations(&self) -> Vec<InvalidationEntry> {
        lock(&self.state).invalidations.clone()
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn record(&self, operation: &'static str, ctx: &ProviderContext) {
        lock(&self.calls).push(ProviderCall {
            operation,
            account: ctx.account.clone(),
            region: ctx.region.clone(),
        });
    }

    /// Mirror state to disk. A failed write leaves the previous file intact
    /// and is reported to the caller.
    fn persist(&self, state: &CloudState) -> ProviderResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let transport = |e: &dyn std::fmt::Display| {
            ProviderError::Transport(format!("{}: {}", path.display(), e))
        };

        let json = serde_json::to_string_pretty(state).map_err(|e| transport(&e))?;
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).map_err(|e| transport(&e))?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| transport(&e))?;
        tmp.write_all(json.as_bytes()).map_err(|e| transport(&e))?;
        tmp.persist(path).map_err(|e| transport(&e.error))?;
        Ok(())
    }

    fn new_distribution(state: &mut CloudState, config: DistributionConfig) -> Distribution {
        let n = state.next_id();
        Distribution {
            id: format!("E{:013X}", n),
            domain_name: format!("d{:013x}.cloudfront.net", n),
            config,
        }
    }

    fn alias_owner<'a>(state: &'a CloudState, alias: &str) -> Option<&'a DistributionEntry> {
        state
            .distributions
            .values()
            .find(|entry| entry.distribution.domain_aliases().iter().any(|a| a == alias))
    }
}

impl DnsProvider for LocalCloud {
    fn find_hosted_zone(
        &self,
        ctx: &ProviderContext,
        name: &str,
    ) -> ProviderResult<Option<HostedZone>> {
        self.record("ListHostedZonesByName", ctx);
        let name = name.trim_end_matches('.');
        Ok(lock(&self.state)
            .zones
            .iter()
            .find(|entry| entry.account == ctx.account && entry.zone.domain_suffix == name)
            .map(|entry| entry.zone.clone()))
    }

    fn get_alias_record(
        &self,
        ctx: &ProviderContext,
        zone_id: &str,
        record_name: &str,
        record_type: RecordType,
    ) -> ProviderResult<Option<AliasRecord>> {
        self.record("ListResourceRecordSets", ctx);
        Ok(lock(&self.state)
            .alias_records
            .values()
            .find(|r| {
                r.zone_id == zone_id && r.record_name == record_name && r.record_type == record_type
            })
            .cloned())
    }

    fn upsert_alias_record(&self, ctx: &ProviderContext, record: &AliasRecord) -> ProviderResult<()> {
        self.record("ChangeResourceRecordSets", ctx);
        let mut state = lock(&self.state);
        if !state.zones.iter().any(|z| z.zone.zone_id == record.zone_id) {
            return Err(ProviderError::NotFound(format!("hosted zone {}", record.zone_id)));
        }
        state
            .alias_records
            .insert(record.identifier(), record.clone());
        self.persist(&state)?;
        Ok(())
    }

    fn delete_alias_record(&self, ctx: &ProviderContext, record: &AliasRecord) -> ProviderResult<()> {
        self.record("ChangeResourceRecordSets", ctx);
        let mut state = lock(&self.state);
        if state.alias_records.remove(&record.identifier()).is_none() {
            return Err(ProviderError::NotFound(format!("record {}", record.identifier())));
        }
        self.persist(&state)?;
        Ok(())
    }

    fn upsert_challenge_record(
        &self,
        ctx: &ProviderContext,
        zone_id: &str,
        record: &ChallengeRecord,
    ) -> ProviderResult<()> {
        self.record("ChangeResourceRecordSets", ctx);
        let mut state = lock(&self.state);
        if !state.zones.iter().any(|z| z.zone.zone_id == zone_id) {
            return Err(ProviderError::NotFound(format!("hosted zone {}", zone_id)));
        }
        state
            .challenge_records
            .insert(challenge_key(zone_id, &record.name), record.clone());
        self.persist(&state)?;
        Ok(())
    }

    fn delete_challenge_record(
        &self,
        ctx: &ProviderContext,
        zone_id: &str,
        record: &ChallengeRecord,
    ) -> ProviderResult<()> {
        self.record("ChangeResourceRecordSets", ctx);
        let mut state = lock(&self.state);
        // Deleting an absent challenge is a no-op; validation may never have run.
        state
            .challenge_records
            .remove(&challenge_key(zone_id, &record.name));
        self.persist(&state)?;
        Ok(())
    }
}

impl CertificateProvider for LocalCloud {
    fn find_certificate(
        &self,
        ctx: &ProviderContext,
        domain: &DomainName,
    ) -> ProviderResult<Option<Certificate>> {
        self.record("ListCertificates", ctx);
        Ok(lock(&self.state)
            .certificates
            .values()
            .rev()
            .find(|entry| {
                entry.account == ctx.account
                    && entry.certificate.validation_region == ctx.region
                    && entry.certificate.domain_name == *domain
                    && entry.certificate.status != CertificateStatus::Failed
            })
            .map(|entry| entry.certificate.clone()))
    }

    fn describe_certificate(
        &self,
        ctx: &ProviderContext,
        arn: &str,
    ) -> ProviderResult<Option<Certificate>> {
        self.record("DescribeCertificate", ctx);
        let never_issues = lock(&self.faults).certificate_never_issues;
        let mut state = lock(&self.state);

        let Some(entry) = state.certificates.get(arn).cloned() else {
            return Ok(None);
        };
        if entry.certificate.validation_region != ctx.region {
            return Ok(None);
        }

        let mut updated = entry;
        if !updated.certificate.status.is_terminal() && state.has_challenge(&updated.challenge) {
            updated.certificate.status = CertificateStatus::Validating;
            if !never_issues {
                updated.polls_remaining = updated.polls_remaining.saturating_sub(1);
                if updated.polls_remaining == 0 {
                    updated.certificate.status = CertificateStatus::Issued;
                }
            }
        }
        let certificate = updated.certificate.clone();
        state.certificates.insert(arn.to_string(), updated);
        self.persist(&state)?;
        Ok(Some(certificate))
    }

    fn request_certificate(
        &self,
        ctx: &ProviderContext,
        domain: &DomainName,
    ) -> ProviderResult<Certificate> {
        self.record("RequestCertificate", ctx);
        let polls = lock(&self.faults)
            .polls_to_issue
            .unwrap_or(DEFAULT_POLLS_TO_ISSUE);
        let mut state = lock(&self.state);
        let n = state.next_id();
        let certificate = Certificate {
            arn: format!(
                "arn:aws:acm:{}:{}:certificate/{:08x}-0000-4000-8000-{:012x}",
                ctx.region, ctx.account, n, n
            ),
            domain_name: domain.clone(),
            validation_region: ctx.region.clone(),
            status: CertificateStatus::Pending,
        };
        let challenge = ChallengeRecord {
            name: format!("_{:032x}.{}.", n, domain.as_str()),
            value: format!("_{:032x}.acm-validations.aws.", n.wrapping_mul(31)),
        };
        state.certificates.insert(
            certificate.arn.clone(),
            CertificateEntry {
                account: ctx.account.clone(),
                certificate: certificate.clone(),
                challenge,
                polls_remaining: polls,
            },
        );
        self.persist(&state)?;
        Ok(certificate)
    }

    fn challenge_records(
        &self,
        ctx: &ProviderContext,
        arn: &str,
    ) -> ProviderResult<Vec<ChallengeRecord>> {
        self.record("DescribeCertificate", ctx);
        lock(&self.state)
            .certificates
            .get(arn)
            .map(|entry| vec![entry.challenge.clone()])
            .ok_or_else(|| ProviderError::NotFound(format!("certificate {}", arn)))
    }

    fn delete_certificate(&self, ctx: &ProviderContext, arn: &str) -> ProviderResult<()> {
        self.record("DeleteCertificate", ctx);
        let mut state = lock(&self.state);
        let in_use = state
            .distributions
            .values()
            .any(|entry| entry.distribution.certificate_ref() == arn);
        if in_use {
            return Err(rejected("DeleteCertificate", "ResourceInUseException"));
        }
        if state.certificates.remove(arn).is_none() {
            return Err(ProviderError::NotFound(format!("certificate {}", arn)));
        }
        self.persist(&state)?;
        Ok(())
    }
}

impl HostingProvider for LocalCloud {
    fn get_bucket(&self, ctx: &ProviderContext, name: &str) -> ProviderResult<Option<HostingBucket>> {
        self.record("GetBucket", ctx);
        Ok(lock(&self.state)
            .buckets
            .get(name)
            .map(|entry| entry.bucket.clone()))
    }

    fn create_bucket(&self, ctx: &ProviderContext, bucket: &HostingBucket) -> ProviderResult<()> {
        self.record("CreateBucket", ctx);
        let mut state = lock(&self.state);
        if state.buckets.contains_key(&bucket.name) {
            return Err(rejected("CreateBucket", "BucketAlreadyExists"));
        }
        state.buckets.insert(
            bucket.name.clone(),
            BucketEntry {
                bucket: bucket.clone(),
                objects: BTreeMap::new(),
            },
        );
        self.persist(&state)?;
        Ok(())
    }

    fn update_bucket(&self, ctx: &ProviderContext, bucket: &HostingBucket) -> ProviderResult<()> {
        self.record("PutBucketWebsite", ctx);
        let mut state = lock(&self.state);
        let entry = state
            .buckets
            .get_mut(&bucket.name)
            .ok_or_else(|| ProviderError::NotFound(format!("bucket {}", bucket.name)))?;
        if entry.bucket.owner_account != ctx.account {
            return Err(ProviderError::AccessDenied(format!("bucket {}", bucket.name)));
        }
        entry.bucket.website = bucket.website.clone();
        entry.bucket.public_read = bucket.public_read;
        self.persist(&state)?;
        Ok(())
    }

    fn delete_bucket(&self, ctx: &ProviderContext, name: &str) -> ProviderResult<()> {
        self.record("DeleteBucket", ctx);
        let mut state = lock(&self.state);
        let entry = state
            .buckets
            .get(name)
            .ok_or_else(|| ProviderError::NotFound(format!("bucket {}", name)))?;
        if !entry.objects.is_empty() {
            return Err(rejected("DeleteBucket", "BucketNotEmpty"));
        }
        state.buckets.remove(name);
        self.persist(&state)?;
        Ok(())
    }

    fn list_objects(&self, ctx: &ProviderContext, bucket: &str) -> ProviderResult<Vec<RemoteObject>> {
        self.record("ListObjectsV2", ctx);
        let state = lock(&self.state);
        let entry = state
            .buckets
            .get(bucket)
            .ok_or_else(|| ProviderError::NotFound(format!("bucket {}", bucket)))?;
        Ok(entry
            .objects
            .iter()
            .map(|(key, object)| RemoteObject {
                key: key.clone(),
                hash: object.hash.clone(),
                size: object.size,
            })
            .collect())
    }

    fn put_object(
        &self,
        ctx: &ProviderContext,
        bucket: &str,
        object: &ObjectUpload,
    ) -> ProviderResult<()> {
        self.record("PutObject", ctx);
        {
            let mut faults = lock(&self.faults);
            if let Some(remaining) = faults.uploads_before_failure.as_mut() {
                if *remaining == 0 {
                    return Err(ProviderError::Transport(format!(
                        "connection reset uploading {}",
                        object.key
                    )));
                }
                *remaining -= 1;
            }
        }

        let mut state = lock(&self.state);
        let entry = state
            .buckets
            .get_mut(bucket)
            .ok_or_else(|| ProviderError::NotFound(format!("bucket {}", bucket)))?;
        entry.objects.insert(
            object.key.clone(),
            StoredObject {
                hash: object.hash.clone(),
                size: object.body.len() as u64,
                content_type: object.content_type.clone(),
            },
        );
        self.persist(&state)?;
        Ok(())
    }

    fn delete_object(&self, ctx: &ProviderContext, bucket: &str, key: &str) -> ProviderResult<()> {
        self.record("DeleteObject", ctx);
        let mut state = lock(&self.state);
        let entry = state
            .buckets
            .get_mut(bucket)
            .ok_or_else(|| ProviderError::NotFound(format!("bucket {}", bucket)))?;
        entry.objects.remove(key);
        self.persist(&state)?;
        Ok(())
    }
}

impl CdnProvider for LocalCloud {
    fn get_distribution(&self, ctx: &ProviderContext, id: &str) -> ProviderResult<Option<Distribution>> {
        self.record("GetDistribution", ctx);
        Ok(lock(&self.state)
            .distributions
            .get(id)
            .filter(|entry| entry.account == ctx.account)
            .map(|entry| entry.distribution.clone()))
    }

    fn find_distribution_by_alias(
        &self,
        ctx: &ProviderContext,
        alias: &str,
    ) -> ProviderResult<Option<Distribution>> {
        self.record("ListDistributions", ctx);
        let state = lock(&self.state);
        Ok(Self::alias_owner(&state, alias).map(|entry| entry.distribution.clone()))
    }

    fn create_distribution(
        &self,
        ctx: &ProviderContext,
        config: &DistributionConfig,
    ) -> ProviderResult<Distribution> {
        self.record("CreateDistribution", ctx);
        let mut state = lock(&self.state);
        for alias in &config.domain_aliases {
            if Self::alias_owner(&state, alias).is_some() {
                return Err(rejected(
                    "CreateDistribution",
                    format!("CNAMEAlreadyExists: {}", alias),
                ));
            }
        }
        let issued = state
            .certificates
            .get(&config.certificate_arn)
            .is_some_and(|entry| entry.certificate.status == CertificateStatus::Issued);
        if !issued {
            return Err(rejected(
                "CreateDistribution",
                format!("InvalidViewerCertificate: {}", config.certificate_arn),
            ));
        }

        let distribution = Self::new_distribution(&mut state, config.clone());
        state.distributions.insert(
            distribution.id.clone(),
            DistributionEntry {
                account: ctx.account.clone(),
                distribution: distribution.clone(),
            },
        );
        self.persist(&state)?;
        Ok(distribution)
    }

    fn update_distribution(
        &self,
        ctx: &ProviderContext,
        id: &str,
        config: &DistributionConfig,
    ) -> ProviderResult<Distribution> {
        self.record("UpdateDistribution", ctx);
        let mut state = lock(&self.state);
        for alias in &config.domain_aliases {
            if let Some(owner) = Self::alias_owner(&state, alias) {
                if owner.distribution.id != id {
                    return Err(rejected(
                        "UpdateDistribution",
                        format!("CNAMEAlreadyExists: {}", alias),
                    ));
                }
            }
        }
        let entry = state
            .distributions
            .get_mut(id)
            .filter(|entry| entry.account == ctx.account)
            .ok_or_else(|| ProviderError::NotFound(format!("distribution {}", id)))?;
        entry.distribution.config = config.clone();
        let updated = entry.distribution.clone();
        self.persist(&state)?;
        Ok(updated)
    }

    fn delete_distribution(&self, ctx: &ProviderContext, id: &str) -> ProviderResult<()> {
        self.record("DeleteDistribution", ctx);
        let mut state = lock(&self.state);
        let owned = state
            .distributions
            .get(id)
            .is_some_and(|entry| entry.account == ctx.account);
        if !owned {
            return Err(ProviderError::NotFound(format!("distribution {}", id)));
        }
        state.distributions.remove(id);
        self.persist(&state)?;
        Ok(())
    }

    fn create_invalidation(
        &self,
        ctx: &ProviderContext,
        id: &str,
        paths: &[String],
    ) -> ProviderResult<String> {
        self.record("CreateInvalidation", ctx);
        if lock(&self.faults).reject_invalidation {
            return Err(rejected("CreateInvalidation", "TooManyInvalidationsInProgress"));
        }
        let mut state = lock(&self.state);
        if !state.distributions.contains_key(id) {
            return Err(ProviderError::NotFound(format!("distribution {}", id)));
        }
        let invalidation_id = format!("I{:013X}", state.next_id());
        state.invalidations.push(InvalidationEntry {
            id: invalidation_id.clone(),
            distribution_id: id.to_string(),
            paths: paths.to_vec(),
        });
        self.persist(&state)?;
        Ok(invalidation_id)
    }
}
