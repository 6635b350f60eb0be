//! Version check scenarios against an in-memory hosting API

mod helper;

use rstest::rstest;

use helper::{MockHosting, check_config};
use version_gate::version::checker::{ComparisonOutcome, run_check};
use version_gate::version::record::VersionFileRecord;

fn version_json(version: &str) -> String {
    format!(r#"{{"name": "j789", "version": "{version}"}}"#)
}

#[rstest]
#[case::major_bump("1.2.9", "2.0.2", ComparisonOutcome::Pass)]
#[case::minor_bump("1.2.9", "1.3.2", ComparisonOutcome::Pass)]
#[case::patch_bump("1.3.1", "1.3.2", ComparisonOutcome::Pass)]
#[case::major_regression("1.3.1", "0.9.9", ComparisonOutcome::Fail)]
#[case::minor_regression("1.3.1", "0.1.9", ComparisonOutcome::Fail)]
#[case::patch_regression("1.3.1", "1.3.0", ComparisonOutcome::Fail)]
#[case::equal("1.3.1", "1.3.1", ComparisonOutcome::Fail)]
#[case::release_after_prerelease("2.0.0-rc.2", "2.0.0", ComparisonOutcome::Pass)]
#[case::prerelease_of_current("2.0.0", "2.0.0-rc.2", ComparisonOutcome::Fail)]
#[tokio::test]
async fn compares_pull_request_version_with_target_branch(
    #[case] base: &str,
    #[case] candidate: &str,
    #[case] expected: ComparisonOutcome,
) {
    let hosting = MockHosting::new()
        .with_file_at_ref("main", "version.json", &version_json(base))
        .with_changed_file("README.md", "# j789")
        .with_changed_file("version.json", &version_json(candidate));

    let report = run_check(&hosting, &check_config()).await;

    assert_eq!(report.outcome, expected, "{}", report.message);
    assert_eq!(report.base_version().map(|v| v.as_str()), Some(base));
    assert_eq!(
        report.candidate_version().map(|v| v.as_str()),
        Some(candidate)
    );
}

#[rstest]
#[case::base_present(Some("1.3.1"))]
#[case::base_absent(None)]
#[tokio::test]
async fn fails_when_pull_request_does_not_change_version_file(#[case] base: Option<&str>) {
    let mut hosting = MockHosting::new().with_changed_file("src/lib.rs", "pub fn f() {}");
    if let Some(base) = base {
        hosting = hosting.with_file_at_ref("main", "version.json", &version_json(base));
    }

    let report = run_check(&hosting, &check_config()).await;

    assert_eq!(report.outcome, ComparisonOutcome::Fail);
    assert!(report.candidate.is_absent());
    assert!(
        report
            .message
            .starts_with("no version file found in the pull request")
    );
}

#[tokio::test]
async fn passes_first_version_when_target_branch_has_no_version_file() {
    let hosting = MockHosting::new().with_changed_file("version.json", &version_json("0.1.0"));

    let report = run_check(&hosting, &check_config()).await;

    assert_eq!(report.outcome, ComparisonOutcome::Pass);
    assert!(report.base.is_absent());
}

#[tokio::test]
async fn reads_base_version_from_configured_branch() {
    let mut config = check_config();
    config.base_ref = "release/1.x".to_string();
    let hosting = MockHosting::new()
        .with_file_at_ref("main", "version.json", &version_json("3.0.0"))
        .with_file_at_ref("release/1.x", "version.json", &version_json("1.4.0"))
        .with_changed_file("version.json", &version_json("1.4.1"));

    let report = run_check(&hosting, &config).await;

    assert_eq!(report.outcome, ComparisonOutcome::Pass);
    assert_eq!(report.base_version().map(|v| v.as_str()), Some("1.4.0"));
}

#[tokio::test]
async fn finds_version_file_beyond_first_page_of_changes() {
    let hosting = MockHosting::new()
        .with_page_size(10)
        .with_file_at_ref("main", "version.json", &version_json("1.0.0"))
        .with_unrelated_changes(25)
        .with_changed_file("version.json", &version_json("1.1.0"));

    let report = run_check(&hosting, &check_config()).await;

    assert_eq!(report.outcome, ComparisonOutcome::Pass);
}

#[tokio::test]
async fn malformed_candidate_is_indeterminate() {
    let hosting = MockHosting::new()
        .with_file_at_ref("main", "version.json", &version_json("1.0.0"))
        .with_changed_file("version.json", r#"{"version": "next"}"#);

    let report = run_check(&hosting, &check_config()).await;

    assert_eq!(report.outcome, ComparisonOutcome::Indeterminate);
    assert!(matches!(report.candidate, VersionFileRecord::Malformed(_)));
    assert!(
        report
            .message
            .starts_with("candidate version file version.json in pull request #1 is malformed")
    );
}

#[tokio::test]
async fn malformed_base_is_indeterminate() {
    let hosting = MockHosting::new()
        .with_file_at_ref("main", "version.json", "not json")
        .with_changed_file("version.json", &version_json("1.0.0"));

    let report = run_check(&hosting, &check_config()).await;

    assert_eq!(report.outcome, ComparisonOutcome::Indeterminate);
    assert!(
        report
            .message
            .starts_with("base version file version.json at main is malformed")
    );
}
