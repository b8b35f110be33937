//! Application Layer
//!
//! Use cases that orchestrate provisioning.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates providers through the domain ports
//!
//! ## Use Cases
//!
//! - `plan_site` - Dependency-ordered resource plan for one site
//! - `ApplyUseCase` - Create or update every resource, then deploy content
//! - `destroy_site` - Reverse-order teardown that never touches the zone
//! - `apply_all` - Concurrent apply of several sites

pub mod alias;
pub mod apply;
pub mod bucket;
pub mod certificate;
pub mod deploy;
pub mod destroy;
pub mod distribution;
pub mod multi_site;
pub mod plan;
pub mod zone;

pub use alias::AliasRecordManager;
pub use apply::{
    ApplyOptions, ApplyReport, ApplyUseCase, Orchestrator, ResourceOutcome, ResourceStep,
    StepOutcome,
};
pub use bucket::ensure_bucket;
pub use certificate::CertificateIssuer;
pub use deploy::{DeployError, DeploymentExecutor};
pub use destroy::{destroy_site, teardown_targets, DestroyReport};
pub use distribution::DistributionConfigurer;
pub use multi_site::{apply_all, SiteRun};
pub use plan::{plan_site, Plan, PlannedResource};
pub use zone::{resolve_zone, CachedZoneLookup};
