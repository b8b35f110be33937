//! Domain Entities
//!
//! - `SiteSpec` - declarative input for one site
//! - Resource shapes (`HostingBucket`, `Certificate`, `Distribution`, ...)
//! - `DeploymentResult` - outcome of a content deploy
//! - `SiteState` - recorded physical ids for a site

mod deployment;
mod resources;
mod site_spec;
mod state;

pub use deployment::{CompletionStatus, DeploymentResult};
pub use resources::{
    AliasRecord, Certificate, CertificateStatus, ChallengeRecord, Distribution,
    DistributionConfig, HostedZone, HostingBucket, Origin, PriceClass, RecordType,
    ViewerPolicy, WebsiteConfig, CACHING_OPTIMIZED_POLICY_ID, EDGE_ALIAS_ZONE_ID,
    INVALIDATE_ALL_PATHS,
};
pub use site_spec::SiteSpec;
pub use state::{DeploymentRecord, ResourceRecord, SiteState};
