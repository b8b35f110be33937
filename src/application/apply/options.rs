//! Apply options

use crate::domain::entities::ViewerPolicy;
use crate::domain::services::Backoff;

/// Options shared by every site in an apply
#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    /// Certificate polling schedule
    pub backoff: Backoff,
    pub viewer_policy: ViewerPolicy,
    /// Credentials profile passed to providers
    pub profile: Option<String>,
}

impl ApplyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_viewer_policy(mut self, policy: ViewerPolicy) -> Self {
        self.viewer_policy = policy;
        self
    }

    pub fn with_profile(mut self, profile: Option<String>) -> Self {
        self.profile = profile;
        self
    }
}
