//! Scenario: Upload Fails Part Way
//!
//! Journey: The network drops during the content sync of a first deploy.
//!
//! Steps:
//! 1. Apply with the second upload failing
//! 2. Infrastructure is in place but the deployment failed, uninvalidated
//! 3. Operator re-runs apply once the network is back
//! 4. Everything is reused and the content finishes syncing
//!
//! Success Criteria:
//! - No invalidation is issued for a partial sync
//! - Re-running apply needs no manual cleanup and creates no duplicates

use edgesite::application::ResourceOutcome;
use edgesite::{CompletionStatus, ProvisionError, ResourceKind};

use crate::assert_bucket_keys;
use crate::common::*;
use crate::support::World;

#[test]
fn scenario_rerun_after_upload_failure_completes_without_duplicates() {
    let world = World::new();
    let site = world.site(
        "docs.example.com",
        "eu-west-1",
        &[
            ("index.html", INDEX_HTML),
            ("error.html", ERROR_HTML),
            ("css/site.css", STYLE_CSS),
        ],
    );

    // Step 1
    world.cloud.fail_upload_after(1);
    let first = world.use_case().execute(&site).unwrap();

    // Step 2
    assert!(!first.is_success());
    for kind in [
        ResourceKind::HostingBucket,
        ResourceKind::Certificate,
        ResourceKind::Distribution,
        ResourceKind::AliasRecord,
    ] {
        assert!(first.outcome(kind).unwrap().is_resolved(), "{} not resolved", kind);
    }
    assert!(matches!(
        first.outcome(ResourceKind::Deployment),
        Some(ResourceOutcome::Failed {
            error: ProvisionError::Upload { completed: 1, total: 3, .. }
        })
    ));
    assert_eq!(
        first.deployment.as_ref().unwrap().completion_status,
        CompletionStatus::SyncFailed
    );
    assert!(world.cloud.invalidations().is_empty());
    let (kind, error) = first.first_failure().unwrap();
    assert_eq!(kind, ResourceKind::Deployment);
    assert!(error.is_retryable());

    // Step 3
    world.cloud.clear_faults();
    let second = world.use_case().execute(&site).unwrap();

    // Step 4
    assert!(second.is_success(), "{:?}", second.first_failure());
    for kind in [
        ResourceKind::HostingBucket,
        ResourceKind::Certificate,
        ResourceKind::Distribution,
        ResourceKind::AliasRecord,
    ] {
        assert!(
            matches!(second.outcome(kind), Some(ResourceOutcome::Unchanged { .. })),
            "{} changed on rerun",
            kind
        );
    }
    let deployment = second.deployment.unwrap();
    assert_eq!(deployment.uploaded_object_count, 2);
    assert_eq!(deployment.unchanged_object_count, 1);
    assert_eq!(world.cloud.distributions().len(), 1);
    assert_eq!(world.cloud.certificates().len(), 1);
    assert_eq!(world.cloud.invalidations().len(), 1);
    assert_bucket_keys!(world.cloud, "docs.example.com", ["css/site.css", "error.html", "index.html"]);
}
