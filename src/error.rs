//! Error types for Edgesite
//!
//! Uses `thiserror` for library errors. Every variant is classified as
//! either fatal (aborts the whole apply) or retryable (halts only the
//! resources that depend on the failing one).

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Edgesite operations
pub type ProvisionResult<T> = Result<T, ProvisionError>;

/// Main error type for provisioning operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProvisionError {
    /// Hosted zone for the domain does not exist
    #[error("no public hosted zone found for '{domain}' (tried: {})", .tried.join(", "))]
    Lookup { domain: String, tried: Vec<String> },

    /// Certificate DNS challenge not observed in time
    #[error("certificate {arn} was not issued within {waited_secs}s; re-run apply to resume polling")]
    ValidationTimeout { arn: String, waited_secs: u64 },

    /// Existing resource with an incompatible configuration
    #[error("{resource} '{identifier}' conflicts with the desired configuration: {reason}")]
    ResourceConflict {
        resource: String,
        identifier: String,
        reason: String,
    },

    /// Content sync failed part way
    #[error("content sync to '{bucket}' failed after {completed} of {total} changes: {message}")]
    Upload {
        bucket: String,
        completed: usize,
        total: usize,
        message: String,
    },

    /// Cache purge rejected
    #[error("invalidation of distribution {distribution_id} was rejected: {message}")]
    Invalidation {
        distribution_id: String,
        message: String,
    },

    /// Operator interrupted a blocking stage
    #[error("{stage} was cancelled")]
    Cancelled { stage: String },

    /// Site specification failed validation
    #[error("invalid site specification: {0}")]
    InvalidSpec(String),

    /// Configuration file could not be loaded
    #[error("invalid configuration in {file}: {message}")]
    Config { file: PathBuf, message: String },

    /// Persisted state could not be read or written
    #[error("state error: {0}")]
    State(String),

    /// Provider call failed in transport
    #[error("{operation} failed: {message}")]
    Provider { operation: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(String),
}

impl ProvisionError {
    /// Fatal errors abort the apply immediately and need operator action.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Lookup { .. }
                | Self::ResourceConflict { .. }
                | Self::InvalidSpec(_)
                | Self::Config { .. }
                | Self::State(_)
        )
    }

    /// Retryable errors permit re-invoking apply without manual teardown.
    pub fn is_retryable(&self) -> bool {
        !self.is_fatal()
    }

    /// Short machine-readable kind, used in event streams
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Lookup { .. } => "lookup",
            Self::ValidationTimeout { .. } => "validation_timeout",
            Self::ResourceConflict { .. } => "resource_conflict",
            Self::Upload { .. } => "upload",
            Self::Invalidation { .. } => "invalidation",
            Self::Cancelled { .. } => "cancelled",
            Self::InvalidSpec(_) => "invalid_spec",
            Self::Config { .. } => "config",
            Self::State(_) => "state",
            Self::Provider { .. } => "provider",
            Self::Io(_) => "io",
        }
    }

    pub fn provider(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn conflict(
        resource: impl Into<String>,
        identifier: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::ResourceConflict {
            resource: resource.into(),
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }

    pub fn cancelled(stage: impl Into<String>) -> Self {
        Self::Cancelled {
            stage: stage.into(),
        }
    }
}

impl From<std::io::Error> for ProvisionError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
