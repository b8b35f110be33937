//! Scenario: Certificate Validation Outlasts the Timeout
//!
//! Journey: DNS propagation is slow and validation exceeds the wait budget.
//!
//! Steps:
//! 1. Apply while the certificate never issues
//! 2. Polling backs off, then times out; dependents are held back
//! 3. DNS catches up and the operator re-runs apply
//! 4. The same certificate is polled again instead of re-requested
//!
//! Success Criteria:
//! - The bucket exists after step 2, nothing downstream of the certificate does
//! - Exactly one certificate is ever requested

use std::time::Duration;

use edgesite::application::ResourceOutcome;
use edgesite::{ProvisionError, ResourceKind};

use crate::common::*;
use crate::support::World;

#[test]
fn scenario_validation_timeout_resumes_same_certificate() {
    let world = World::new();
    let site = world.site("docs.example.com", "us-west-2", &[("index.html", INDEX_HTML)]);

    // Step 1
    world.cloud.certificate_never_issues();
    let first = world.use_case().execute(&site).unwrap();

    // Step 2
    let arn = match first.outcome(ResourceKind::Certificate) {
        Some(ResourceOutcome::Failed {
            error: ProvisionError::ValidationTimeout { arn, waited_secs },
        }) => {
            assert_eq!(*waited_secs, 600);
            arn.clone()
        }
        other => panic!("expected a validation timeout, got {:?}", other),
    };
    let sleeps = world.clock.sleeps();
    assert_eq!(sleeps[0], Duration::from_secs(5));
    assert_eq!(sleeps[1], Duration::from_secs(10));
    assert!(sleeps.iter().all(|s| *s <= Duration::from_secs(60)));
    assert_eq!(sleeps.iter().sum::<Duration>(), Duration::from_secs(600));

    assert!(world.cloud.bucket("docs.example.com").is_some());
    assert!(world.cloud.distributions().is_empty());
    assert!(world.cloud.alias_records().is_empty());
    assert!(matches!(
        first.outcome(ResourceKind::Distribution),
        Some(ResourceOutcome::Blocked { .. })
    ));

    // Step 3
    world.cloud.clear_faults();
    let second = world.use_case().execute(&site).unwrap();

    // Step 4
    assert!(second.is_success(), "{:?}", second.first_failure());
    assert_eq!(second.physical_id(ResourceKind::Certificate), Some(arn.as_str()));
    assert_eq!(world.cloud.certificates().len(), 1);
    assert_eq!(world.cloud.calls_to("RequestCertificate").len(), 1);
}
