//! Scenario: Teardown Without Recorded State
//!
//! Journey: An operator lost `.edgesite/state.toml` and destroys a site
//! anyway.
//!
//! Steps:
//! 1. The site is applied, then destroyed from an empty state file
//! 2. A distribution fronting another origin claims the alias
//! 3. The alias record points at a distribution the site does not own
//!
//! Success Criteria:
//! - Resources found by name are removed only when they belong to the site
//! - Anything else is a conflict and nothing is deleted

use edgesite::application::destroy_site;
use edgesite::domain::entities::{
    AliasRecord, Certificate, CertificateStatus, DistributionConfig, HostingBucket, RecordType,
    ViewerPolicy, EDGE_ALIAS_ZONE_ID,
};
use edgesite::domain::ports::{DnsProvider, NoopEventSink};
use edgesite::infrastructure::TomlStateRepository;
use edgesite::{ProvisionError, Region, ResourceKind};
use tempfile::TempDir;

use crate::common::*;
use crate::support::World;

fn empty_state() -> (TempDir, TomlStateRepository) {
    let dir = TempDir::new().unwrap();
    let repo = TomlStateRepository::in_project(dir.path());
    (dir, repo)
}

#[test]
fn scenario_destroy_without_state_removes_own_resources() {
    let world = World::new();
    let spec = world.site("docs.example.com", "us-west-2", &[("index.html", INDEX_HTML)]);
    assert!(world.use_case().execute(&spec).unwrap().is_success());

    // Step 1
    let (_dir, state) = empty_state();
    let report = destroy_site(
        &world.providers(),
        &world.context(&spec),
        &spec,
        &state,
        &NoopEventSink,
    )
    .unwrap();

    let kinds: Vec<ResourceKind> = report.destroyed.iter().map(|(kind, _)| *kind).collect();
    assert_eq!(
        kinds,
        vec![
            ResourceKind::AliasRecord,
            ResourceKind::Distribution,
            ResourceKind::Certificate,
            ResourceKind::HostingBucket,
        ]
    );
    assert!(world.cloud.distributions().is_empty());
    assert!(world.cloud.alias_records().is_empty());
}

#[test]
fn scenario_foreign_distribution_on_alias_is_left_alone() {
    let world = World::new();
    let spec = world.site("docs.example.com", "us-west-2", &[("index.html", INDEX_HTML)]);

    // Step 2
    let legacy_origin = HostingBucket::desired(
        "legacy-origin",
        &Region::parse("eu-west-1").unwrap(),
        ACCOUNT,
    );
    let certificate = Certificate {
        arn: "arn:aws:acm:us-east-1:123456789012:certificate/legacy".to_string(),
        domain_name: spec.domain_name.clone(),
        validation_region: Region::validation(),
        status: CertificateStatus::Issued,
    };
    let foreign = world
        .cloud
        .seed_distribution(
            ACCOUNT,
            DistributionConfig::for_site(
                &spec.domain_name,
                &legacy_origin,
                &certificate,
                ViewerPolicy::HttpsOnly,
            ),
        )
        .unwrap();

    let (_dir, state) = empty_state();
    let err = destroy_site(
        &world.providers(),
        &world.context(&spec),
        &spec,
        &state,
        &NoopEventSink,
    )
    .unwrap_err();

    match err {
        ProvisionError::ResourceConflict {
            resource,
            identifier,
            ..
        } => {
            assert_eq!(resource, "distribution");
            assert_eq!(identifier, foreign.id);
        }
        other => panic!("expected a conflict, got {:?}", other),
    }
    assert_eq!(world.cloud.distributions(), vec![foreign]);
}

#[test]
fn scenario_alias_record_targeting_another_distribution_is_left_alone() {
    let world = World::new();
    let spec = world.site("docs.example.com", "us-west-2", &[("index.html", INDEX_HTML)]);
    assert!(world.use_case().execute(&spec).unwrap().is_success());

    // Step 3
    let ctx = world.context(&spec);
    let zone = world
        .cloud
        .find_hosted_zone(&ctx, "example.com")
        .unwrap()
        .unwrap();
    let hijacked = AliasRecord {
        zone_id: zone.zone_id.clone(),
        record_name: spec.domain_name.record_name(),
        record_type: RecordType::A,
        target_dns_name: "d0000000000999.cloudfront.net".to_string(),
        target_zone_id: EDGE_ALIAS_ZONE_ID.to_string(),
    };
    world.cloud.upsert_alias_record(&ctx, &hijacked).unwrap();

    let err = destroy_site(
        &world.providers(),
        &ctx,
        &spec,
        world.state.as_ref(),
        &NoopEventSink,
    )
    .unwrap_err();

    assert!(
        matches!(&err, ProvisionError::ResourceConflict { resource, .. } if resource == "alias record"),
        "{:?}",
        err
    );
    assert_eq!(world.cloud.alias_records(), vec![hijacked]);
    assert_eq!(world.cloud.distributions().len(), 1);
    assert!(world.cloud.bucket("docs.example.com").is_some());
}
