//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod cancel;
mod domain_name;
mod hash;
mod ignore_patterns;
mod logical_id;
mod region;

pub use cancel::CancelToken;
pub use domain_name::DomainName;
pub use hash::ContentHash;
pub use ignore_patterns::{IgnoreError, IgnorePatterns, IGNORE_FILE};
pub use logical_id::{LogicalId, ResourceKind};
pub use region::{Region, VALIDATION_REGION};
