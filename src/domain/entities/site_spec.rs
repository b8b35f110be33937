//! Site Specification Entity
//!
//! The declarative input of one pipeline run. Immutable once validated.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{DomainName, Region};
use crate::error::{ProvisionError, ProvisionResult};

/// Bucket names are capped at 63 characters and the bucket is named after
/// the domain, so the domain inherits that limit.
const MAX_BUCKET_NAME_LEN: usize = 63;

/// Maximum stack label length
const MAX_STACK_NAME_LEN: usize = 128;

/// Declarative description of one static site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSpec {
    /// Fully qualified domain the site is served on
    pub domain_name: DomainName,
    /// Local content tree mirrored into the bucket
    pub source_folder: PathBuf,
    /// Account that owns every managed resource
    pub account: String,
    /// Home region for the bucket (the certificate ignores this)
    pub region: Region,
    /// Explicit hosted zone name; derived from the domain when absent
    #[serde(default)]
    pub hosted_zone: Option<String>,
    /// Optional human label for the site's resource group
    #[serde(default)]
    pub stack_name: Option<String>,
}

impl SiteSpec {
    pub fn new(
        domain_name: &str,
        source_folder: impl Into<PathBuf>,
        account: &str,
        region: &str,
    ) -> ProvisionResult<Self> {
        let domain_name = DomainName::parse(domain_name).map_err(ProvisionError::InvalidSpec)?;
        let region = Region::parse(region).map_err(ProvisionError::InvalidSpec)?;
        let spec = Self {
            domain_name,
            source_folder: source_folder.into(),
            account: account.trim().to_string(),
            region,
            hosted_zone: None,
            stack_name: None,
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn with_hosted_zone(mut self, zone: impl Into<String>) -> Self {
        self.hosted_zone = Some(zone.into());
        self
    }

    pub fn with_stack_name(mut self, name: impl Into<String>) -> Self {
        self.stack_name = Some(name.into());
        self
    }

    /// Check cross-field rules that the value objects cannot enforce alone.
    pub fn validate(&self) -> ProvisionResult<()> {
        if self.account.len() != 12 || !self.account.chars().all(|c| c.is_ascii_digit()) {
            return Err(ProvisionError::InvalidSpec(format!(
                "account '{}' must be a 12-digit account id",
                self.account
            )));
        }

        if self.domain_name.as_str().len() > MAX_BUCKET_NAME_LEN {
            return Err(ProvisionError::InvalidSpec(format!(
                "domain '{}' is longer than {} characters and cannot name a bucket",
                self.domain_name, MAX_BUCKET_NAME_LEN
            )));
        }

        if self.source_folder.as_os_str().is_empty() {
            return Err(ProvisionError::InvalidSpec(
                "source folder must not be empty".to_string(),
            ));
        }

        if let Some(zone) = &self.hosted_zone {
            if !self.domain_name.is_within(zone) {
                return Err(ProvisionError::InvalidSpec(format!(
                    "hosted zone '{}' does not contain domain '{}'",
                    zone, self.domain_name
                )));
            }
        }

        if let Some(stack) = &self.stack_name {
            validate_stack_name(stack)?;
        }

        Ok(())
    }

    /// The bucket is named exactly after the domain
    pub fn bucket_name(&self) -> &str {
        self.domain_name.as_str()
    }

    /// Stack label, defaulting to one derived from the domain
    pub fn stack_label(&self) -> String {
        match &self.stack_name {
            Some(name) => name.clone(),
            None => format!("{}-site", self.domain_name.as_str().replace('.', "-")),
        }
    }

    /// Zone names to try, most specific first
    pub fn zone_candidates(&self) -> Vec<String> {
        match &self.hosted_zone {
            Some(zone) => vec![zone.trim_end_matches('.').to_ascii_lowercase()],
            None => self.domain_name.candidate_zones(),
        }
    }
}

// Alphanumerics and hyphens, starting with a letter.
fn validate_stack_name(name: &str) -> ProvisionResult<()> {
    let restriction = "must only consist of alphanumeric characters and hyphens, start with a letter, and be at most 128 characters";
    let starts_alpha = name.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
    let charset_ok = name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    if !starts_alpha || !charset_ok || name.len() > MAX_STACK_NAME_LEN {
        return Err(ProvisionError::InvalidSpec(format!(
            "invalid stack name '{}': {}",
            name, restriction
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> SiteSpec {
        SiteSpec::new("docs.example.com", "./site", "123456789012", "us-west-2").unwrap()
    }

    #[test]
    fn test_bucket_is_named_after_domain() {
        assert_eq!(spec().bucket_name(), "docs.example.com");
    }

    #[test]
    fn test_rejects_bad_account() {
        let err = SiteSpec::new("docs.example.com", "./site", "12", "us-west-2").unwrap_err();
        assert!(matches!(err, ProvisionError::InvalidSpec(_)));
    }

    #[test]
    fn test_rejects_domain_too_long_for_bucket() {
        let domain = format!("{}.{}.example.com", "a".repeat(30), "b".repeat(30));
        let err = SiteSpec::new(&domain, "./site", "123456789012", "us-west-2").unwrap_err();
        assert!(err.to_string().contains("cannot name a bucket"));
    }

    #[test]
    fn test_rejects_zone_not_containing_domain() {
        let spec = spec().with_hosted_zone("other.org");
        assert!(spec.validate().is_err());
    }

    #[test]
    fn test_explicit_zone_is_only_candidate() {
        let spec = spec().with_hosted_zone("Example.com.");
        assert_eq!(spec.zone_candidates(), vec!["example.com"]);
    }

    #[test]
    fn test_derived_zone_candidates() {
        assert_eq!(
            spec().zone_candidates(),
            vec!["docs.example.com", "example.com"]
        );
    }

    #[test]
    fn test_stack_label_defaults_from_domain() {
        assert_eq!(spec().stack_label(), "docs-example-com-site");
        let named = spec().with_stack_name("prod-DocsStack");
        assert_eq!(named.stack_label(), "prod-DocsStack");
    }

    #[test]
    fn test_rejects_invalid_stack_name() {
        let spec = spec().with_stack_name("1-bad_name");
        assert!(spec.validate().is_err());
    }
}
