//! Managed Resource Entities
//!
//! Desired and observed shapes of every resource in a site topology.
//! Provider adapters translate these to and from their own wire types.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{DomainName, LogicalId, Region, ResourceKind};

/// Hosted zone id used by every alias that targets the edge network
pub const EDGE_ALIAS_ZONE_ID: &str = "Z2FDTNDATAQYW2";

/// Managed "CachingOptimized" cache policy
pub const CACHING_OPTIMIZED_POLICY_ID: &str = "658327ea-f89d-4fab-a63d-7e88639e58f6";

/// Every cached path
pub const INVALIDATE_ALL_PATHS: &str = "/*";

/// Pre-existing DNS zone. Looked up, never owned or mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedZone {
    pub zone_id: String,
    /// Zone name without trailing dot
    pub domain_suffix: String,
    #[serde(default)]
    pub private_zone: bool,
}

/// Website hosting settings of the bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebsiteConfig {
    pub index_document: String,
    pub error_document: String,
}

impl Default for WebsiteConfig {
    fn default() -> Self {
        Self {
            index_document: "index.html".to_string(),
            error_document: "error.html".to_string(),
        }
    }
}

/// Object-storage bucket acting as the website origin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostingBucket {
    pub name: String,
    pub region: Region,
    pub owner_account: String,
    pub website: WebsiteConfig,
    pub public_read: bool,
}

impl HostingBucket {
    /// Desired bucket for a site
    pub fn desired(name: &str, region: &Region, account: &str) -> Self {
        Self {
            name: name.to_string(),
            region: region.clone(),
            owner_account: account.to_string(),
            website: WebsiteConfig::default(),
            public_read: true,
        }
    }

    /// Website endpoint used as the distribution origin
    pub fn website_endpoint(&self) -> String {
        format!("{}.s3-website-{}.amazonaws.com", self.name, self.region)
    }

    /// Settings that may be updated in place
    pub fn same_settings(&self, other: &HostingBucket) -> bool {
        self.website == other.website && self.public_read == other.public_read
    }
}

/// Lifecycle of a certificate request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateStatus {
    Pending,
    Validating,
    Issued,
    Failed,
}

impl CertificateStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, CertificateStatus::Issued | CertificateStatus::Failed)
    }
}

/// TLS certificate requested in the validation region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub arn: String,
    pub domain_name: DomainName,
    pub validation_region: Region,
    pub status: CertificateStatus,
}

impl Certificate {
    /// Names this certificate is valid for
    pub fn coverage(&self) -> Vec<String> {
        vec![self.domain_name.as_str().to_string()]
    }
}

/// DNS challenge the certificate authority expects to observe
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChallengeRecord {
    pub name: String,
    pub value: String,
}

/// How viewers may reach the distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ViewerPolicy {
    /// Plain HTTP requests are refused
    #[default]
    HttpsOnly,
    /// Plain HTTP requests are redirected to HTTPS
    RedirectToHttps,
}

/// Edge price tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceClass {
    /// Lowest-cost edge locations only
    #[serde(rename = "PriceClass_100")]
    PriceClass100,
}

/// Origin of a distribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
    pub id: String,
    pub domain_name: String,
    /// The website endpoint only speaks HTTP
    pub http_only: bool,
}

/// Desired configuration of a distribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionConfig {
    pub logical_id: LogicalId,
    pub domain_aliases: Vec<String>,
    pub origin: Origin,
    pub certificate_arn: String,
    pub viewer_policy: ViewerPolicy,
    pub compress: bool,
    pub cache_policy_id: String,
    pub price_class: PriceClass,
    pub minimum_protocol_version: String,
    pub sni_only: bool,
    pub default_root_object: String,
    pub enabled: bool,
}

impl DistributionConfig {
    /// The one supported shape: bucket origin, single default behavior,
    /// bound certificate, aliases equal to the certificate's coverage.
    pub fn for_site(
        domain: &DomainName,
        bucket: &HostingBucket,
        certificate: &Certificate,
        viewer_policy: ViewerPolicy,
    ) -> Self {
        Self {
            logical_id: LogicalId::for_kind(ResourceKind::Distribution),
            domain_aliases: vec![domain.as_str().to_string()],
            origin: Origin {
                id: format!("origin-{}", bucket.name),
                domain_name: bucket.website_endpoint(),
                http_only: true,
            },
            certificate_arn: certificate.arn.clone(),
            viewer_policy,
            compress: true,
            cache_policy_id: CACHING_OPTIMIZED_POLICY_ID.to_string(),
            price_class: PriceClass::PriceClass100,
            minimum_protocol_version: "TLSv1.2_2018".to_string(),
            sni_only: true,
            default_root_object: bucket.website.index_document.clone(),
            enabled: true,
        }
    }

    /// Whether two configurations would render the same distribution.
    /// The logical id is tool bookkeeping and never forces an update.
    pub fn same_shape(&self, other: &DistributionConfig) -> bool {
        let mut a = self.clone();
        a.logical_id = other.logical_id.clone();
        a == *other
    }
}

/// CDN distribution fronting the bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    pub id: String,
    /// Canonical edge hostname, e.g. `d111111abcdef8.cloudfront.net`
    pub domain_name: String,
    pub config: DistributionConfig,
}

impl Distribution {
    pub fn domain_aliases(&self) -> &[String] {
        &self.config.domain_aliases
    }

    pub fn origin_ref(&self) -> &str {
        &self.config.origin.domain_name
    }

    pub fn certificate_ref(&self) -> &str {
        &self.config.certificate_arn
    }

    pub fn viewer_policy(&self) -> ViewerPolicy {
        self.config.viewer_policy
    }
}

/// DNS record types this tool writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    A,
    #[serde(rename = "CNAME")]
    Cname,
}

/// Alias record resolving the domain to the distribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasRecord {
    pub zone_id: String,
    pub record_name: String,
    pub record_type: RecordType,
    pub target_dns_name: String,
    pub target_zone_id: String,
}

impl AliasRecord {
    pub fn for_distribution(zone: &HostedZone, domain: &DomainName, dist: &Distribution) -> Self {
        Self {
            zone_id: zone.zone_id.clone(),
            record_name: domain.record_name(),
            record_type: RecordType::A,
            target_dns_name: dist.domain_name.clone(),
            target_zone_id: EDGE_ALIAS_ZONE_ID.to_string(),
        }
    }

    /// `zone_id/record_name/type`, used as the record's physical id
    pub fn identifier(&self) -> String {
        format!(
            "{}/{}/{}",
            self.zone_id,
            self.record_name,
            match self.record_type {
                RecordType::A => "A",
                RecordType::Cname => "CNAME",
            }
        )
    }
}
