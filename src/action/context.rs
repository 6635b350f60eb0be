//! Check inputs gathered from flags, action inputs and the runner environment

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::config::{ClientConfig, DEFAULT_API_URL};
use crate::hosting::RepoCoordinates;
use crate::version::checker::CheckConfig;

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("Missing required input: {0}")]
    MissingInput(&'static str),

    #[error("Invalid repository: {0}")]
    InvalidRepository(String),

    #[error("Failed to read event payload {path:?}: {source}")]
    EventPayload {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid event payload: {0}")]
    InvalidEvent(#[from] serde_json::Error),

    #[error("Could not determine the pull request number; run on a pull_request event or pass --pull-request")]
    NoPullRequest,
}

/// Inputs supplied explicitly, by flag or by the action's `INPUT_*` variables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inputs {
    pub version_json_path: Option<String>,
    pub github_token: Option<String>,
    pub branch_name: Option<String>,
    pub repository: Option<String>,
    pub pull_request: Option<u64>,
    pub api_url: Option<String>,
    pub timeout_ms: Option<u64>,
}

/// Variables the CI runner sets for every job, used as fallbacks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunnerEnv {
    /// `GITHUB_TOKEN`
    pub github_token: Option<String>,
    /// `GITHUB_BASE_REF`, set for pull_request events
    pub base_ref: Option<String>,
    /// `GITHUB_EVENT_PATH`
    pub event_path: Option<PathBuf>,
    /// `GITHUB_REF`, e.g. `refs/pull/12/merge`
    pub github_ref: Option<String>,
}

impl RunnerEnv {
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok();
        Self {
            github_token: var("GITHUB_TOKEN"),
            base_ref: var("GITHUB_BASE_REF"),
            event_path: var("GITHUB_EVENT_PATH").map(PathBuf::from),
            github_ref: var("GITHUB_REF"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct EventPayload {
    number: Option<u64>,
    pull_request: Option<PullRequestPayload>,
}

#[derive(Debug, Deserialize)]
struct PullRequestPayload {
    number: u64,
    base: Option<BaseRefPayload>,
}

#[derive(Debug, Deserialize)]
struct BaseRefPayload {
    #[serde(rename = "ref")]
    git_ref: String,
}

/// Pull request details found in an event payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDetails {
    pub pull_request: Option<u64>,
    pub base_ref: Option<String>,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionContext {
    pub check: CheckConfig,
    pub client: ClientConfig,
}

impl ActionContext {
    /// Combine explicit inputs with runner fallbacks.
    ///
    /// Empty strings count as unset, since the runner exports optional
    /// action inputs as empty variables.
    pub fn resolve(inputs: Inputs, runner: RunnerEnv) -> Result<Self, ContextError> {
        let version_path = non_empty(inputs.version_json_path)
            .map(|p| normalize_path(&p))
            .ok_or(ContextError::MissingInput("version-json-path"))?;

        let token = non_empty(inputs.github_token)
            .or_else(|| non_empty(runner.github_token))
            .ok_or(ContextError::MissingInput("github-token"))?;

        let repository = non_empty(inputs.repository)
            .ok_or(ContextError::MissingInput("repository"))?;
        let repo: RepoCoordinates = repository
            .parse()
            .map_err(ContextError::InvalidRepository)?;

        let event = match runner.event_path.as_deref() {
            Some(path) => read_event(path)?,
            None => EventDetails::default(),
        };

        let base_ref = non_empty(inputs.branch_name)
            .or_else(|| non_empty(runner.base_ref))
            .or(event.base_ref)
            .ok_or(ContextError::MissingInput("branch_name"))?;

        let pull_request = inputs
            .pull_request
            .or(event.pull_request)
            .or_else(|| runner.github_ref.as_deref().and_then(pull_request_from_ref))
            .ok_or(ContextError::NoPullRequest)?;

        let api_url = non_empty(inputs.api_url).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let mut client = ClientConfig::new(api_url, token);
        if let Some(timeout_ms) = inputs.timeout_ms {
            client = client.with_timeout(Duration::from_millis(timeout_ms));
        }

        Ok(Self {
            check: CheckConfig {
                repo,
                pull_request,
                version_path,
                base_ref,
            },
            client,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Strip a leading `./` so the path matches the API's repository-relative names
fn normalize_path(path: &str) -> String {
    path.trim_start_matches("./").to_string()
}

/// Read pull request details from the event payload file
pub fn read_event(path: &Path) -> Result<EventDetails, ContextError> {
    let payload = std::fs::read_to_string(path).map_err(|source| ContextError::EventPayload {
        path: path.to_path_buf(),
        source,
    })?;
    parse_event(&payload)
}

/// Parse pull request details from an event payload
///
/// `pull_request` events carry `pull_request.number`; some other events
/// (e.g. `issue_comment`) only carry a top-level `number`.
pub fn parse_event(payload: &str) -> Result<EventDetails, ContextError> {
    let event: EventPayload = serde_json::from_str(payload)?;

    Ok(match event.pull_request {
        Some(pr) => EventDetails {
            pull_request: Some(pr.number),
            base_ref: pr.base.map(|b| b.git_ref),
        },
        None => EventDetails {
            pull_request: event.number,
            base_ref: None,
        },
    })
}

/// Extract the number from `refs/pull/<n>/merge` or `refs/pull/<n>/head`
pub fn pull_request_from_ref(git_ref: &str) -> Option<u64> {
    let rest = git_ref.strip_prefix("refs/pull/")?;
    let (number, suffix) = rest.split_once('/')?;
    match suffix {
        "merge" | "head" => number.parse().ok(),
        _ => None,
    }
}
