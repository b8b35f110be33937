mod common;

use common::*;

#[test]
fn test_apply_provisions_site_and_uploads_content() {
    let env = TestEnv::builder()
        .with_config(SINGLE_SITE_CONFIG)
        .with_default_site()
        .with_file("public/css/site.css", STYLE_CSS)
        .build();

    let result = env.run(&["apply"]);
    assert_success!(result);
    assert_output_contains!(result, "docs.example.com is live");
    assert_output_contains!(result, "Content: 3 uploaded, 0 deleted, 0 unchanged");

    let cloud = env.cloud();
    assert_bucket_keys!(cloud, "docs.example.com", ["css/site.css", "error.html", "index.html"]);
    assert_eq!(cloud.certificates().len(), 1);
    assert_eq!(cloud.distributions().len(), 1);
    assert_eq!(cloud.alias_records().len(), 1);
    assert_eq!(cloud.invalidations().len(), 1);
    assert_eq!(cloud.invalidations()[0].paths, vec!["/*".to_string()]);

    let state = env.read_state();
    assert!(state.contains("SiteDistribution"), "{}", state);
    assert!(state.contains(&cloud.distributions()[0].id), "{}", state);
}

#[test]
fn test_second_apply_only_invalidates() {
    let env = TestEnv::builder()
        .with_config(SINGLE_SITE_CONFIG)
        .with_default_site()
        .build();

    assert_success!(env.run(&["apply"]));
    let result = env.run(&["apply"]);
    assert_success!(result);
    assert_output_contains!(result, "Content: 0 uploaded, 0 deleted, 2 unchanged");
    assert_output_not_contains!(result, "created");

    let cloud = env.cloud();
    assert_eq!(cloud.certificates().len(), 1);
    assert_eq!(cloud.distributions().len(), 1);
    assert_eq!(cloud.invalidations().len(), 2);
}

#[test]
fn test_apply_removes_deleted_files_from_bucket() {
    let env = TestEnv::builder()
        .with_config(SINGLE_SITE_CONFIG)
        .with_default_site()
        .build();

    assert_success!(env.run(&["apply"]));
    env.remove_project_file("public/error.html");
    let result = env.run(&["apply"]);
    assert_success!(result);
    assert_output_contains!(result, "Content: 0 uploaded, 1 deleted, 1 unchanged");

    assert_bucket_keys!(env.cloud(), "docs.example.com", ["index.html"]);
}

#[test]
fn test_missing_zone_fails_before_creating_bucket() {
    let env = TestEnv::builder()
        .with_config(SINGLE_SITE_CONFIG)
        .with_default_site()
        .without_zone()
        .build();

    let result = env.run(&["apply"]);
    assert!(!result.success);
    assert_ne!(result.exit_code, 0);
    assert_output_contains!(result, "no public hosted zone found for 'docs.example.com'");
    assert_output_contains!(result, "hosted zone failed");

    assert!(env.cloud().bucket("docs.example.com").is_none());
}

#[test]
fn test_dry_run_prints_plan_and_touches_nothing() {
    let env = TestEnv::builder()
        .with_config(SINGLE_SITE_CONFIG)
        .with_default_site()
        .build();

    let result = env.run(&["apply", "--dry-run"]);
    assert_success!(result);
    assert_output_contains!(result, "Plan for docs.example.com");
    assert!(env.cloud().bucket("docs.example.com").is_none());
    assert!(env.read_state().is_empty());
}

#[test]
fn test_missing_source_folder_is_reported() {
    let env = TestEnv::builder().with_config(SINGLE_SITE_CONFIG).build();

    let result = env.run(&["apply"]);
    assert!(!result.success);
    assert_output_contains!(result, "source folder");
    assert!(env.cloud().bucket("docs.example.com").is_none());
}

#[test]
fn test_apply_single_site_of_many() {
    let env = TestEnv::builder()
        .with_config(TWO_SITE_CONFIG)
        .with_file("docs/support/index.html", INDEX_HTML)
        .build();

    let result = env.run(&["apply", "--site", "support.example.com"]);
    assert_success!(result);

    let cloud = env.cloud();
    assert!(cloud.bucket("support.example.com").is_some());
    assert!(cloud.bucket("privacy.example.com").is_none());
}
