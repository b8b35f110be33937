//! Cloud Provider Ports
//!
//! One trait per provider service. Every call receives the
//! [`ProviderContext`] it runs under. Implementations:
//! - `LocalCloud` - persistent local cloud (infrastructure)
//! - test fakes with fault injection

use std::sync::Arc;

use thiserror::Error;

use super::ProviderContext;
use crate::domain::entities::{
    AliasRecord, Certificate, ChallengeRecord, Distribution, DistributionConfig, HostedZone,
    HostingBucket, RecordType,
};
use crate::domain::value_objects::{ContentHash, DomainName};

/// Result type for provider calls
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Provider call failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The referenced resource does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// The provider refused the request
    #[error("{operation} rejected: {message}")]
    Rejected { operation: String, message: String },

    /// Credentials do not grant access
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// Network or service failure
    #[error("transport error: {0}")]
    Transport(String),
}

/// Object stored in the bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteObject {
    pub key: String,
    pub hash: ContentHash,
    pub size: u64,
}

/// Object to write into the bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectUpload {
    pub key: String,
    pub body: Vec<u8>,
    pub content_type: String,
    pub hash: ContentHash,
}

/// DNS service (hosted zones and records)
pub trait DnsProvider: Send + Sync {
    /// Find a public zone by exact name (no trailing dot)
    fn find_hosted_zone(&self, ctx: &ProviderContext, name: &str)
        -> ProviderResult<Option<HostedZone>>;

    fn get_alias_record(
        &self,
        ctx: &ProviderContext,
        zone_id: &str,
        record_name: &str,
        record_type: RecordType,
    ) -> ProviderResult<Option<AliasRecord>>;

    /// Create or overwrite an alias record
    fn upsert_alias_record(&self, ctx: &ProviderContext, record: &AliasRecord)
        -> ProviderResult<()>;

    fn delete_alias_record(&self, ctx: &ProviderContext, record: &AliasRecord)
        -> ProviderResult<()>;

    /// Create or overwrite a validation CNAME
    fn upsert_challenge_record(
        &self,
        ctx: &ProviderContext,
        zone_id: &str,
        record: &ChallengeRecord,
    ) -> ProviderResult<()>;

    fn delete_challenge_record(
        &self,
        ctx: &ProviderContext,
        zone_id: &str,
        record: &ChallengeRecord,
    ) -> ProviderResult<()>;
}

/// Certificate authority. The context region selects where certificates live.
pub trait CertificateProvider: Send + Sync {
    /// Latest non-failed certificate covering `domain` in the context region
    fn find_certificate(
        &self,
        ctx: &ProviderContext,
        domain: &DomainName,
    ) -> ProviderResult<Option<Certificate>>;

    fn describe_certificate(
        &self,
        ctx: &ProviderContext,
        arn: &str,
    ) -> ProviderResult<Option<Certificate>>;

    /// Request a new DNS-validated certificate
    fn request_certificate(
        &self,
        ctx: &ProviderContext,
        domain: &DomainName,
    ) -> ProviderResult<Certificate>;

    fn challenge_records(
        &self,
        ctx: &ProviderContext,
        arn: &str,
    ) -> ProviderResult<Vec<ChallengeRecord>>;

    fn delete_certificate(&self, ctx: &ProviderContext, arn: &str) -> ProviderResult<()>;
}

/// Object storage
pub trait HostingProvider: Send + Sync {
    fn get_bucket(&self, ctx: &ProviderContext, name: &str)
        -> ProviderResult<Option<HostingBucket>>;

    fn create_bucket(&self, ctx: &ProviderContext, bucket: &HostingBucket) -> ProviderResult<()>;

    fn update_bucket(&self, ctx: &ProviderContext, bucket: &HostingBucket) -> ProviderResult<()>;

    /// Delete an empty bucket
    fn delete_bucket(&self, ctx: &ProviderContext, name: &str) -> ProviderResult<()>;

    fn list_objects(&self, ctx: &ProviderContext, bucket: &str)
        -> ProviderResult<Vec<RemoteObject>>;

    fn put_object(
        &self,
        ctx: &ProviderContext,
        bucket: &str,
        object: &ObjectUpload,
    ) -> ProviderResult<()>;

    fn delete_object(&self, ctx: &ProviderContext, bucket: &str, key: &str)
        -> ProviderResult<()>;
}

/// Content delivery network
pub trait CdnProvider: Send + Sync {
    fn get_distribution(&self, ctx: &ProviderContext, id: &str)
        -> ProviderResult<Option<Distribution>>;

    /// Distribution that currently claims `alias`, if any
    fn find_distribution_by_alias(
        &self,
        ctx: &ProviderContext,
        alias: &str,
    ) -> ProviderResult<Option<Distribution>>;

    fn create_distribution(
        &self,
        ctx: &ProviderContext,
        config: &DistributionConfig,
    ) -> ProviderResult<Distribution>;

    /// Update in place; the id and edge hostname never change
    fn update_distribution(
        &self,
        ctx: &ProviderContext,
        id: &str,
        config: &DistributionConfig,
    ) -> ProviderResult<Distribution>;

    fn delete_distribution(&self, ctx: &ProviderContext, id: &str) -> ProviderResult<()>;

    /// Purge cached paths, returning the invalidation id
    fn create_invalidation(
        &self,
        ctx: &ProviderContext,
        id: &str,
        paths: &[String],
    ) -> ProviderResult<String>;
}

/// The full set of providers a site pipeline talks to
#[derive(Clone)]
pub struct Providers {
    pub hosting: Arc<dyn HostingProvider>,
    pub dns: Arc<dyn DnsProvider>,
    pub certificates: Arc<dyn CertificateProvider>,
    pub cdn: Arc<dyn CdnProvider>,
}

impl Providers {
    /// Use one backend for every service
    pub fn from_backend<P>(backend: Arc<P>) -> Self
    where
        P: HostingProvider + DnsProvider + CertificateProvider + CdnProvider + 'static,
    {
        Self {
            hosting: backend.clone(),
            dns: backend.clone(),
            certificates: backend.clone(),
            cdn: backend,
        }
    }

    /// Replace the DNS provider (e.g. with a caching wrapper)
    pub fn with_dns(mut self, dns: Arc<dyn DnsProvider>) -> Self {
        self.dns = dns;
        self
    }
}
