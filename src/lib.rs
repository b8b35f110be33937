//! Edgesite - provision TLS-terminated, CDN-backed static websites
//!
//! A site is a domain name plus a folder of static files. Edgesite resolves
//! the hosted zone, creates the hosting bucket, issues a DNS-validated
//! certificate in the edge network's validation region, fronts the bucket
//! with a distribution, points an alias record at it, and finally syncs the
//! content and invalidates the edge cache.
//!
//! Resources are applied in dependency order. Fatal errors stop the run;
//! retryable ones only hold back the resources that depend on the failure,
//! and re-running `apply` picks up where the last run stopped.

pub mod application;
pub mod bridge;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

// Re-exports for convenience
pub use application::{apply_all, destroy_site, plan_site, ApplyReport, ApplyUseCase, Plan};
pub use config::Config;
pub use domain::entities::{CompletionStatus, DeploymentResult, SiteSpec};
pub use domain::value_objects::{CancelToken, DomainName, Region, ResourceKind};
pub use error::{ProvisionError, ProvisionResult};
pub use infrastructure::LocalCloud;
