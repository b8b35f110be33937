//! Region Value Object

use std::fmt;

use serde::{Deserialize, Serialize};

/// The region in which edge-network certificates must be requested.
///
/// Fixed by the edge network; never derived from the site's home region.
pub const VALIDATION_REGION: &str = "us-east-1";

/// A provider region identifier such as `us-west-2`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Region(String);

impl Region {
    pub fn parse(raw: &str) -> Result<Self, String> {
        let region = raw.trim().to_ascii_lowercase();
        if region.is_empty() {
            return Err("region must not be empty".to_string());
        }
        let well_formed = region
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
            && !region.starts_with('-')
            && !region.ends_with('-')
            && region.contains('-');
        if !well_formed {
            return Err(format!(
                "region '{}' is not a valid region identifier (e.g. us-west-2)",
                raw
            ));
        }
        Ok(Self(region))
    }

    /// The fixed certificate validation region
    pub fn validation() -> Self {
        Self(VALIDATION_REGION.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_validation_region(&self) -> bool {
        self.0 == VALIDATION_REGION
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Region {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Region> for String {
    fn from(value: Region) -> Self {
        value.0
    }
}
