//! Two-phase content deploy
//!
//! Phase 1 uploads new and changed objects, then deletes objects that left
//! the source tree. Phase 2 invalidates `/*` and only starts once phase 1
//! reported full completion. A cancel between the phases leaves the bucket
//! current and the cache stale, reported as `SyncedInvalidationPending`.

use std::sync::Arc;

use crate::domain::entities::{
    CompletionStatus, DeploymentResult, SiteSpec, INVALIDATE_ALL_PATHS,
};
use crate::domain::ports::{
    CdnProvider, ContentSource, HostingProvider, ObjectUpload, ProviderContext, ProvisionEvent,
    ProvisionEventSink,
};
use crate::domain::services::{Planner, SyncPlan};
use crate::domain::value_objects::CancelToken;
use crate::error::ProvisionError;

/// A deploy that stopped before completing, with how far it got
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployError {
    pub result: DeploymentResult,
    pub error: ProvisionError,
}

impl DeployError {
    fn new(result: DeploymentResult, error: ProvisionError) -> Self {
        Self { result, error }
    }
}

struct SyncCounts {
    uploaded: usize,
    deleted: usize,
    unchanged: usize,
}

impl SyncCounts {
    fn result(&self, status: CompletionStatus, invalidation_id: Option<String>) -> DeploymentResult {
        DeploymentResult {
            uploaded_object_count: self.uploaded,
            deleted_object_count: self.deleted,
            unchanged_object_count: self.unchanged,
            invalidation_id,
            completion_status: status,
        }
    }
}

pub struct DeploymentExecutor {
    hosting: Arc<dyn HostingProvider>,
    cdn: Arc<dyn CdnProvider>,
    content: Arc<dyn ContentSource>,
    events: Arc<dyn ProvisionEventSink>,
    cancel: CancelToken,
}

impl DeploymentExecutor {
    pub fn new(
        hosting: Arc<dyn HostingProvider>,
        cdn: Arc<dyn CdnProvider>,
        content: Arc<dyn ContentSource>,
        events: Arc<dyn ProvisionEventSink>,
        cancel: CancelToken,
    ) -> Self {
        Self {
            hosting,
            cdn,
            content,
            events,
            cancel,
        }
    }

    /// Sync `spec.source_folder` into `bucket` and invalidate `distribution_id`
    pub fn deploy(
        &self,
        ctx: &ProviderContext,
        spec: &SiteSpec,
        bucket: &str,
        distribution_id: &str,
    ) -> Result<DeploymentResult, DeployError> {
        let domain = spec.domain_name.as_str();
        let mut counts = SyncCounts {
            uploaded: 0,
            deleted: 0,
            unchanged: 0,
        };

        let plan = self
            .plan(ctx, spec, bucket)
            .map_err(|e| DeployError::new(counts.result(CompletionStatus::SyncFailed, None), e))?;
        counts.unchanged = plan.unchanged_count();

        self.sync(ctx, domain, bucket, &plan, &mut counts)?;
        self.events.on_event(ProvisionEvent::ContentSynced {
            domain: domain.to_string(),
            uploaded: counts.uploaded,
            deleted: counts.deleted,
            unchanged: counts.unchanged,
        });

        if self.cancel.is_cancelled() {
            return Err(DeployError::new(
                counts.result(CompletionStatus::SyncedInvalidationPending, None),
                ProvisionError::cancelled("cache invalidation"),
            ));
        }

        let paths = vec![INVALIDATE_ALL_PATHS.to_string()];
        match self.cdn.create_invalidation(ctx, distribution_id, &paths) {
            Ok(invalidation_id) => {
                self.events.on_event(ProvisionEvent::InvalidationIssued {
                    domain: domain.to_string(),
                    distribution_id: distribution_id.to_string(),
                    invalidation_id: invalidation_id.clone(),
                });
                Ok(counts.result(CompletionStatus::Invalidated, Some(invalidation_id)))
            }
            Err(e) => Err(DeployError::new(
                counts.result(CompletionStatus::SyncedInvalidationPending, None),
                ProvisionError::Invalidation {
                    distribution_id: distribution_id.to_string(),
                    message: e.to_string(),
                },
            )),
        }
    }

    fn plan(
        &self,
        ctx: &ProviderContext,
        spec: &SiteSpec,
        bucket: &str,
    ) -> Result<SyncPlan, ProvisionError> {
        let upload_err = |message: String| ProvisionError::Upload {
            bucket: bucket.to_string(),
            completed: 0,
            total: 0,
            message,
        };
        let local = self
            .content
            .scan(&spec.source_folder)
            .map_err(|e| upload_err(e.to_string()))?;
        let remote = self
            .hosting
            .list_objects(ctx, bucket)
            .map_err(|e| upload_err(e.to_string()))?;
        Ok(Planner::plan(&local, &remote))
    }

    // Phase 1. Every write lands before the first deletion.
    fn sync(
        &self,
        ctx: &ProviderContext,
        domain: &str,
        bucket: &str,
        plan: &SyncPlan,
        counts: &mut SyncCounts,
    ) -> Result<(), DeployError> {
        let total = plan.change_count();
        let detailed = self.events.wants_detailed_events();
        let mut completed = 0;

        let failed = |counts: &SyncCounts, completed: usize, message: String| {
            DeployError::new(
                counts.result(CompletionStatus::SyncFailed, None),
                ProvisionError::Upload {
                    bucket: bucket.to_string(),
                    completed,
                    total,
                    message,
                },
            )
        };

        for planned in plan.writes() {
            self.check_cancel(counts)?;
            let Some(local) = &planned.local else {
                continue;
            };
            let body = self
                .content
                .read(local)
                .map_err(|e| failed(&*counts, completed, e.to_string()))?;
            let upload = ObjectUpload {
                key: planned.key.clone(),
                body,
                content_type: local.content_type.clone(),
                hash: local.hash.clone(),
            };
            self.hosting
                .put_object(ctx, bucket, &upload)
                .map_err(|e| failed(&*counts, completed, e.to_string()))?;
            completed += 1;
            counts.uploaded += 1;
            if detailed {
                self.events.on_event(ProvisionEvent::ObjectUploaded {
                    domain: domain.to_string(),
                    key: planned.key.clone(),
                });
            }
        }

        for planned in plan.deletions() {
            self.check_cancel(counts)?;
            self.hosting
                .delete_object(ctx, bucket, &planned.key)
                .map_err(|e| failed(&*counts, completed, e.to_string()))?;
            completed += 1;
            counts.deleted += 1;
            if detailed {
                self.events.on_event(ProvisionEvent::ObjectDeleted {
                    domain: domain.to_string(),
                    key: planned.key.clone(),
                });
            }
        }
        Ok(())
    }

    fn check_cancel(&self, counts: &SyncCounts) -> Result<(), DeployError> {
        if self.cancel.is_cancelled() {
            return Err(DeployError::new(
                counts.result(CompletionStatus::Cancelled, None),
                ProvisionError::cancelled("content sync"),
            ));
        }
        Ok(())
    }
}
