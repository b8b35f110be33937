//! Domain Name Value Object
//!
//! A validated, lowercase, fully-qualified DNS name (without trailing dot).
//! Resource identity is keyed by this value: the bucket is named after it,
//! the certificate covers it, the distribution aliases it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum length of a full DNS name
const MAX_NAME_LEN: usize = 253;

/// Maximum length of a single label
const MAX_LABEL_LEN: usize = 63;

/// Validated domain name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DomainName(String);

impl DomainName {
    /// Parse and normalize a domain name.
    ///
    /// Accepts mixed case (normalized to lowercase). Rejects trailing dots,
    /// wildcards, single-label names and labels that are empty, too long,
    /// or start/end with a hyphen.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let name = raw.trim().to_ascii_lowercase();
        if name.is_empty() {
            return Err("domain name must not be empty".to_string());
        }
        if name.ends_with('.') {
            return Err(format!(
                "domain name '{}' must not end with '.' (the record name adds it)",
                raw
            ));
        }
        if name.len() > MAX_NAME_LEN {
            return Err(format!(
                "domain name '{}' is longer than {} characters",
                raw, MAX_NAME_LEN
            ));
        }
        if name.contains('*') {
            return Err(format!("wildcard domain '{}' cannot host a site", raw));
        }

        let labels: Vec<&str> = name.split('.').collect();
        if labels.len() < 2 {
            return Err(format!(
                "domain name '{}' must have at least two labels (e.g. docs.example.com)",
                raw
            ));
        }
        for label in &labels {
            if label.is_empty() {
                return Err(format!("domain name '{}' contains an empty label", raw));
            }
            if label.len() > MAX_LABEL_LEN {
                return Err(format!(
                    "label '{}' in '{}' is longer than {} characters",
                    label, raw, MAX_LABEL_LEN
                ));
            }
            if label.starts_with('-') || label.ends_with('-') {
                return Err(format!(
                    "label '{}' in '{}' must not start or end with '-'",
                    label, raw
                ));
            }
            if !label
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
            {
                return Err(format!(
                    "label '{}' in '{}' may only contain letters, digits and '-'",
                    label, raw
                ));
            }
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// DNS record name for this domain (fully qualified, trailing dot)
    pub fn record_name(&self) -> String {
        format!("{}.", self.0)
    }

    /// Zone names that could host this domain, most specific first.
    ///
    /// `docs.example.com` yields `["docs.example.com", "example.com"]`.
    /// Stops at the two-label suffix; a bare TLD is never a candidate.
    pub fn candidate_zones(&self) -> Vec<String> {
        let labels: Vec<&str> = self.0.split('.').collect();
        (0..=labels.len().saturating_sub(2))
            .map(|start| labels[start..].join("."))
            .collect()
    }

    /// Whether this domain is `zone` itself or lives beneath it
    pub fn is_within(&self, zone: &str) -> bool {
        let zone = zone.trim_end_matches('.').to_ascii_lowercase();
        self.0 == zone || self.0.ends_with(&format!(".{}", zone))
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for DomainName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DomainName> for String {
    fn from(value: DomainName) -> Self {
        value.0
    }
}

impl AsRef<str> for DomainName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case() {
        let name = DomainName::parse("Docs.Example.COM").unwrap();
        assert_eq!(name.as_str(), "docs.example.com");
    }

    #[test]
    fn test_parse_rejects_trailing_dot() {
        assert!(DomainName::parse("docs.example.com.").is_err());
    }

    #[test]
    fn test_parse_rejects_single_label() {
        assert!(DomainName::parse("localhost").is_err());
    }

    #[test]
    fn test_parse_rejects_wildcard() {
        assert!(DomainName::parse("*.example.com").is_err());
    }

    #[test]
    fn test_parse_rejects_bad_labels() {
        assert!(DomainName::parse("a..example.com").is_err());
        assert!(DomainName::parse("-a.example.com").is_err());
        assert!(DomainName::parse("a_b.example.com").is_err());
        let long = format!("{}.example.com", "a".repeat(64));
        assert!(DomainName::parse(&long).is_err());
    }

    #[test]
    fn test_record_name_has_trailing_dot() {
        let name = DomainName::parse("docs.example.com").unwrap();
        assert_eq!(name.record_name(), "docs.example.com.");
    }

    #[test]
    fn test_candidate_zones_most_specific_first() {
        let name = DomainName::parse("a.docs.example.com").unwrap();
        assert_eq!(
            name.candidate_zones(),
            vec!["a.docs.example.com", "docs.example.com", "example.com"]
        );
    }

    #[test]
    fn test_apex_domain_is_its_own_only_candidate() {
        let name = DomainName::parse("example.com").unwrap();
        assert_eq!(name.candidate_zones(), vec!["example.com"]);
    }

    #[test]
    fn test_is_within_matches_suffix_on_label_boundary() {
        let name = DomainName::parse("docs.example.com").unwrap();
        assert!(name.is_within("example.com"));
        assert!(name.is_within("example.com."));
        assert!(name.is_within("docs.example.com"));
        assert!(!name.is_within("ample.com"));
    }

    #[test]
    fn test_deserializes_through_validation() {
        let ok: Result<DomainName, _> = serde_json::from_str("\"docs.example.com\"");
        assert!(ok.is_ok());
        let bad: Result<DomainName, _> = serde_json::from_str("\"nope\"");
        assert!(bad.is_err());
    }
}
