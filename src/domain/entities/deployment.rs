//! Deployment Result Entity
//!
//! Produced fresh by every deploy. `completion_status` records whether the
//! cache invalidation was actually issued, so a synced-but-stale site is
//! never reported as a success.

use serde::{Deserialize, Serialize};

/// How far a deploy got
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStatus {
    /// Content synced and invalidation issued
    Invalidated,
    /// Content synced, invalidation not issued (cancelled or rejected).
    /// Viewers may still receive stale cached assets.
    SyncedInvalidationPending,
    /// Content sync failed; no invalidation was requested
    SyncFailed,
    /// Cancelled during content sync; safe to restart from scratch
    Cancelled,
}

impl CompletionStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, CompletionStatus::Invalidated)
    }

    pub fn invalidation_issued(&self) -> bool {
        matches!(self, CompletionStatus::Invalidated)
    }
}

/// Outcome of one deploy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentResult {
    /// Objects written (new or changed)
    pub uploaded_object_count: usize,
    /// Remote objects removed because they left the source tree
    pub deleted_object_count: usize,
    /// Objects already matching the source tree
    pub unchanged_object_count: usize,
    pub invalidation_id: Option<String>,
    pub completion_status: CompletionStatus,
}

impl DeploymentResult {
    pub fn is_complete(&self) -> bool {
        self.completion_status.is_complete()
    }
}
