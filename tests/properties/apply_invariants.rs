//! Property tests for whole-site apply.
//!
//! Each case provisions a fresh site against the in-process cloud with a
//! manual clock, so certificate polling never really sleeps.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;

use edgesite::application::{ApplyOptions, ApplyUseCase, ResourceOutcome};
use edgesite::domain::ports::Providers;
use edgesite::domain::services::Backoff;
use edgesite::infrastructure::{FsContentSource, ManualClock, TomlStateRepository};
use edgesite::{LocalCloud, ResourceKind, SiteSpec};
use tempfile::TempDir;

const ACCOUNT: &str = "123456789012";

const CERTIFICATE_OPERATIONS: &[&str] = &["ListCertificates", "RequestCertificate", "DescribeCertificate"];

fn region() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("us-east-1"),
        Just("us-west-2"),
        Just("eu-west-1"),
        Just("ap-southeast-2"),
    ]
}

fn subdomain() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9-]{0,10}[a-z0-9]").unwrap()
}

struct Site {
    cloud: Arc<LocalCloud>,
    use_case: ApplyUseCase,
    spec: SiteSpec,
    _root: TempDir,
}

fn site(label: &str, region: &str, pages: usize) -> Site {
    let cloud = Arc::new(LocalCloud::in_memory());
    cloud.seed_zone(ACCOUNT, "example.com", false).unwrap();

    let root = TempDir::new().unwrap();
    let source = root.path().join("public");
    fs::create_dir_all(&source).unwrap();
    fs::write(source.join("index.html"), "<h1>home</h1>").unwrap();
    for page in 0..pages {
        fs::write(source.join(format!("page-{}.html", page)), format!("<p>{}</p>", page)).unwrap();
    }

    let domain = format!("{}.example.com", label);
    let spec = SiteSpec::new(&domain, source, ACCOUNT, region).unwrap();
    let use_case = ApplyUseCase::new(
        Providers::from_backend(cloud.clone()),
        Arc::new(FsContentSource::new()),
        Arc::new(TomlStateRepository::in_project(root.path())),
        Arc::new(ManualClock::new()),
    )
    .with_options(ApplyOptions::new().with_backoff(Backoff::new(
        Duration::from_secs(5),
        Duration::from_secs(60),
        Duration::from_secs(600),
    )));

    Site {
        cloud,
        use_case,
        spec,
        _root: root,
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 16,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Certificate work always happens in the validation region.
    #[test]
    fn property_certificate_calls_use_validation_region(label in subdomain(), region in region()) {
        let site = site(&label, region, 1);
        let report = site.use_case.execute(&site.spec).unwrap();
        prop_assert!(report.is_success());

        for operation in CERTIFICATE_OPERATIONS {
            for call in site.cloud.calls_to(operation) {
                prop_assert!(call.region.is_validation_region(), "{} in {}", operation, call.region);
            }
        }
        let certificates = site.cloud.certificates();
        prop_assert_eq!(certificates.len(), 1);
        prop_assert!(certificates[0].validation_region.is_validation_region());
    }

    /// PROPERTY: The distribution points at this site's bucket and certificate.
    #[test]
    fn property_distribution_references_its_dependencies(label in subdomain(), region in region()) {
        let site = site(&label, region, 0);
        site.use_case.execute(&site.spec).unwrap();

        let domain = site.spec.domain_name.as_str().to_string();
        let bucket = site.cloud.bucket(&domain).unwrap();
        prop_assert_eq!(bucket.region.as_str(), region);

        let distributions = site.cloud.distributions();
        prop_assert_eq!(distributions.len(), 1);
        let distribution = &distributions[0];
        prop_assert_eq!(distribution.origin_ref(), bucket.website_endpoint());
        let certificates = site.cloud.certificates();
        prop_assert_eq!(distribution.certificate_ref(), certificates[0].arn.as_str());
        prop_assert_eq!(distribution.domain_aliases(), &[domain.clone()][..]);

        let aliases = site.cloud.alias_records();
        prop_assert_eq!(aliases.len(), 1);
        prop_assert_eq!(&aliases[0].target_dns_name, &distribution.domain_name);
    }

    /// PROPERTY: Re-applying an unchanged site only re-issues the invalidation.
    #[test]
    fn property_reapply_is_idempotent(label in subdomain(), region in region(), pages in 0usize..4) {
        let site = site(&label, region, pages);
        let first = site.use_case.execute(&site.spec).unwrap();
        prop_assert!(first.is_success());

        let second = site.use_case.execute(&site.spec).unwrap();
        prop_assert!(second.is_success());
        prop_assert_eq!(second.created_count(), 0);

        for (kind, outcome) in &second.outcomes {
            if *kind == ResourceKind::Deployment {
                let reissued = matches!(outcome, ResourceOutcome::Applied { created: false, .. });
                prop_assert!(reissued);
            } else {
                let unchanged = matches!(outcome, ResourceOutcome::Unchanged { .. });
                prop_assert!(unchanged, "{} was {:?}", kind, outcome);
                prop_assert_eq!(outcome.physical_id(), first.physical_id(*kind));
            }
        }

        let deployment = second.deployment.unwrap();
        prop_assert_eq!(deployment.uploaded_object_count, 0);
        prop_assert_eq!(deployment.deleted_object_count, 0);
        prop_assert_eq!(deployment.unchanged_object_count, pages + 1);

        prop_assert_eq!(site.cloud.certificates().len(), 1);
        prop_assert_eq!(site.cloud.distributions().len(), 1);
        prop_assert_eq!(site.cloud.calls_to("RequestCertificate").len(), 1);
        prop_assert_eq!(site.cloud.invalidations().len(), 2);
    }
}
