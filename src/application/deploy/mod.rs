//! Deployment executor
//!
//! Mirrors the source folder into the bucket, then purges the distribution
//! cache. The two phases never overlap.

mod executor;

pub use executor::{DeployError, DeploymentExecutor};
