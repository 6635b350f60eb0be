//! Version bump check for pull requests

use std::fmt;

use futures::future::join;
use tracing::{info, warn};

use crate::hosting::{HostingApi, RepoCoordinates};
use crate::version::record::{AbsentReason, VersionFileRecord, VersionString};
use crate::version::resolvers::{BaseVersionResolver, CandidateVersionResolver};
use crate::version::semver::{Comparison, compare};

/// What to compare: the version file on `base_ref` against the one in `pull_request`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckConfig {
    pub repo: RepoCoordinates,
    pub pull_request: u64,
    /// Repository-relative path of the version file
    pub version_path: String,
    /// Branch or commit the pull request targets
    pub base_ref: String,
}

/// Final decision of the check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOutcome {
    /// Candidate version is strictly greater than base
    Pass,
    /// Candidate version is missing or not greater than base
    Fail,
    /// A version could not be read or parsed
    Indeterminate,
}

impl ComparisonOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Indeterminate => "indeterminate",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

impl fmt::Display for ComparisonOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which version file a message is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Base,
    Candidate,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base => f.write_str("base"),
            Self::Candidate => f.write_str("candidate"),
        }
    }
}

/// Everything the check learned, for outputs and diagnostics
#[derive(Debug)]
pub struct CheckReport {
    pub outcome: ComparisonOutcome,
    pub base: VersionFileRecord,
    pub candidate: VersionFileRecord,
    pub message: String,
}

impl CheckReport {
    pub fn base_version(&self) -> Option<&VersionString> {
        self.base.version()
    }

    pub fn candidate_version(&self) -> Option<&VersionString> {
        self.candidate.version()
    }
}

impl CheckConfig {
    /// Human-readable location of one side's version file
    pub fn source(&self, side: Side) -> String {
        match side {
            Side::Base => format!("{} at {}", self.version_path, self.base_ref),
            Side::Candidate => format!(
                "{} in pull request #{}",
                self.version_path, self.pull_request
            ),
        }
    }
}

/// Resolve both versions concurrently and decide the outcome
pub async fn run_check(api: &dyn HostingApi, config: &CheckConfig) -> CheckReport {
    let base_resolver = BaseVersionResolver::new(api);
    let candidate_resolver = CandidateVersionResolver::new(api);

    let (base, candidate) = join(
        base_resolver.resolve(&config.repo, &config.version_path, &config.base_ref),
        candidate_resolver.resolve(&config.repo, config.pull_request, &config.version_path),
    )
    .await;

    let (outcome, message) = decide(config, &base, &candidate);
    match outcome {
        ComparisonOutcome::Pass => info!("Version check passed: {}", message),
        _ => warn!("Version check {}: {}", outcome, message),
    }

    CheckReport {
        outcome,
        base,
        candidate,
        message,
    }
}

/// Run the check unless `shutdown` completes first.
///
/// Returns `None` when cancelled. In-flight requests are dropped with the
/// check future, so nothing is left to report.
pub async fn run_check_until(
    api: &dyn HostingApi,
    config: &CheckConfig,
    shutdown: impl Future<Output = ()>,
) -> Option<CheckReport> {
    tokio::select! {
        report = run_check(api, config) => Some(report),
        _ = shutdown => {
            warn!("Version check cancelled before completion");
            None
        }
    }
}

/// Apply the check policy to two resolved records
pub fn decide(
    config: &CheckConfig,
    base: &VersionFileRecord,
    candidate: &VersionFileRecord,
) -> (ComparisonOutcome, String) {
    if let Some(reason) = candidate.absent_reason() {
        return (
            ComparisonOutcome::Fail,
            format!(
                "no version file found in the pull request: {}",
                absent_cause(config, reason)
            ),
        );
    }

    let problems: Vec<String> = [(Side::Candidate, candidate), (Side::Base, base)]
        .into_iter()
        .filter_map(|(side, record)| describe_problem(config, side, record))
        .collect();
    if !problems.is_empty() {
        return (ComparisonOutcome::Indeterminate, problems.join("; "));
    }

    let Some(candidate_version) = candidate.version() else {
        // Absent, malformed and unreachable candidates were handled above
        return (
            ComparisonOutcome::Indeterminate,
            format!("{} version is unavailable", Side::Candidate),
        );
    };

    let Some(base_version) = base.version() else {
        return (
            ComparisonOutcome::Pass,
            format!(
                "{} does not exist at {}; accepting {} as the first version",
                config.version_path, config.base_ref, candidate_version
            ),
        );
    };

    match compare(candidate_version.parsed(), base_version.parsed()) {
        Comparison::Greater => (
            ComparisonOutcome::Pass,
            format!(
                "candidate version {} ({}) is greater than base version {} ({})",
                candidate_version,
                config.source(Side::Candidate),
                base_version,
                config.source(Side::Base)
            ),
        ),
        Comparison::LessOrEqual => (
            ComparisonOutcome::Fail,
            format!(
                "candidate version {} ({}) must be greater than base version {} ({})",
                candidate_version,
                config.source(Side::Candidate),
                base_version,
                config.source(Side::Base)
            ),
        ),
    }
}

fn absent_cause(config: &CheckConfig, reason: AbsentReason) -> String {
    let (pr, path) = (config.pull_request, &config.version_path);
    match reason {
        AbsentReason::NotChanged => format!("#{pr} does not change {path}"),
        AbsentReason::Removed => format!("#{pr} deletes {path}"),
        AbsentReason::ContentNotFound => {
            format!("content of {path} at the head of #{pr} was not found")
        }
        AbsentReason::MissingAtRef => format!("{path} does not exist in #{pr}"),
    }
}

fn describe_problem(config: &CheckConfig, side: Side, record: &VersionFileRecord) -> Option<String> {
    match record {
        VersionFileRecord::Malformed(e) => Some(format!(
            "{} version file {} is malformed: {}",
            side,
            config.source(side),
            e
        )),
        VersionFileRecord::Unreachable(e) => Some(format!(
            "could not read {} version file {}: {}",
            side,
            config.source(side),
            e
        )),
        VersionFileRecord::Found(_) | VersionFileRecord::Absent(_) => None,
    }
}
