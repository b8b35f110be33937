//! Scenario: Privacy Policy and Support Sites
//!
//! Journey: An app publisher hosts two small sites under one zone.
//!
//! Steps:
//! 1. Both sites are applied concurrently
//! 2. Each gets its own bucket, certificate, distribution and alias
//! 3. The support site is torn down
//! 4. The privacy policy site keeps serving, and the zone is untouched
//!
//! Success Criteria:
//! - No resource is shared between the sites
//! - Teardown of one site never touches the other

use edgesite::application::{apply_all, destroy_site};
use edgesite::domain::ports::{DnsProvider, NoopEventSink, StateRepository};
use edgesite::CompletionStatus;

use crate::assert_bucket_keys;
use crate::common::*;
use crate::support::World;

#[test]
fn scenario_two_sites_share_only_the_zone() {
    let world = World::new();
    let privacy = world.site(
        "ezmempass-privacy-policy.example.com",
        "us-west-2",
        &[("index.html", INDEX_HTML), ("error.html", ERROR_HTML)],
    );
    let support = world.site(
        "ezmempass-support.example.com",
        "us-west-2",
        &[("index.html", INDEX_HTML), ("faq/index.html", INDEX_HTML)],
    );

    // Steps 1-2
    let runs = apply_all(&world.use_case(), &[privacy.clone(), support.clone()]);
    assert_eq!(runs.len(), 2);
    for run in &runs {
        assert!(run.is_success(), "{} failed: {:?}", run.domain, run.result);
        let report = run.result.as_ref().unwrap();
        assert_eq!(
            report.deployment.as_ref().unwrap().completion_status,
            CompletionStatus::Invalidated
        );
    }

    assert_eq!(world.cloud.certificates().len(), 2);
    assert_eq!(world.cloud.distributions().len(), 2);
    assert_eq!(world.cloud.alias_records().len(), 2);
    assert_bucket_keys!(world.cloud, "ezmempass-support.example.com", ["faq/index.html", "index.html"]);

    // Step 3
    let report = destroy_site(
        &world.providers(),
        &world.context(&support),
        &support,
        world.state.as_ref(),
        &NoopEventSink,
    )
    .unwrap();
    assert_eq!(report.destroyed.len(), 4);
    assert_eq!(report.deleted_object_count, 2);

    // Step 4
    assert!(world.cloud.bucket("ezmempass-support.example.com").is_none());
    assert_bucket_keys!(world.cloud, "ezmempass-privacy-policy.example.com", ["error.html", "index.html"]);
    assert_eq!(world.cloud.distributions().len(), 1);
    assert_eq!(world.cloud.certificates().len(), 1);
    assert_eq!(
        world.cloud.distributions()[0].domain_aliases(),
        ["ezmempass-privacy-policy.example.com".to_string()]
    );
    assert!(world
        .cloud
        .find_hosted_zone(&world.context(&privacy), "example.com")
        .unwrap()
        .is_some());

    let states = world.state.list().unwrap();
    assert_eq!(states.len(), 1);
    assert_eq!(states[0].domain, privacy.domain_name);
}
