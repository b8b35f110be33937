//! Provider Context
//!
//! Account, region and credential selection threaded explicitly through
//! every provider call. Nothing reads ambient global state, so several site
//! pipelines can run side by side with different contexts.

use crate::domain::value_objects::Region;

/// Explicit provider configuration for one operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderContext {
    pub account: String,
    pub region: Region,
    /// Named credentials profile, if any
    pub profile: Option<String>,
}

impl ProviderContext {
    pub fn new(account: impl Into<String>, region: Region) -> Self {
        Self {
            account: account.into(),
            region,
            profile: None,
        }
    }

    pub fn with_profile(mut self, profile: Option<String>) -> Self {
        self.profile = profile;
        self
    }

    /// Same credentials, different region
    pub fn in_region(&self, region: Region) -> Self {
        Self {
            region,
            ..self.clone()
        }
    }
}
