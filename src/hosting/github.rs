//! GitHub REST API implementation of [`HostingApi`]

use reqwest::header::{ACCEPT, HeaderMap, LINK, RETRY_AFTER};
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use tracing::{debug, warn};

use crate::config::{ClientConfig, FILES_PER_PAGE, GITHUB_API_VERSION, USER_AGENT};
use crate::hosting::api::HostingApi;
use crate::hosting::error::HostingError;
use crate::hosting::types::{ChangedFileEntry, ChangedFilesPage, EncodedContent, RepoCoordinates};

const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw";

/// Hosting client for the GitHub REST API (github.com or GitHub Enterprise)
pub struct GitHubClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl GitHubClient {
    /// Creates a client from connection settings
    ///
    /// The timeout applies to every request the client issues.
    pub fn new(config: &ClientConfig) -> Result<Self, HostingError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
            token: config.token.clone(),
        })
    }

    /// Builds an API URL from path segments, percent-encoding each one
    fn api_url<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url, HostingError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| HostingError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| HostingError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn get(&self, url: Url, accept: &str) -> RequestBuilder {
        self.client
            .get(url)
            .bearer_auth(&self.token)
            .header(ACCEPT, accept)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response, HostingError> {
        let response = request.send().await.map_err(HostingError::from_transport)?;
        check_status(response, what)
    }
}

/// Map non-success statuses onto [`HostingError`]
fn check_status(response: Response, what: &str) -> Result<Response, HostingError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::NOT_FOUND {
        return Err(HostingError::NotFound(what.to_string()));
    }

    let rate_limit_exhausted = response
        .headers()
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "0");

    if status == StatusCode::TOO_MANY_REQUESTS
        || (status == StatusCode::FORBIDDEN && rate_limit_exhausted)
    {
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        return Err(HostingError::RateLimited {
            retry_after_secs: retry_after,
        });
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(HostingError::Unauthorized {
            status: status.as_u16(),
        });
    }

    warn!("GitHub API returned status {} for {}", status, what);
    Err(HostingError::InvalidResponse(format!(
        "Unexpected status {} for {}",
        status, what
    )))
}

/// Whether a `Link` header advertises a `rel="next"` page
fn has_next_page(headers: &HeaderMap) -> bool {
    headers
        .get(LINK)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|link| {
            link.split(',')
                .any(|part| part.split(';').skip(1).any(|p| p.trim() == r#"rel="next""#))
        })
}

#[async_trait::async_trait]
impl HostingApi for GitHubClient {
    async fn file_content_at_ref(
        &self,
        repo: &RepoCoordinates,
        path: &str,
        git_ref: &str,
    ) -> Result<EncodedContent, HostingError> {
        let mut url = self.api_url(
            ["repos", repo.owner.as_str(), repo.repo.as_str(), "contents"]
                .into_iter()
                .chain(path.split('/').filter(|s| !s.is_empty())),
        )?;
        url.query_pairs_mut().append_pair("ref", git_ref);
        debug!("Fetching {} at {} from {}", path, git_ref, url);

        let what = format!("{} at {} in {}", path, git_ref, repo);
        let response = self.send(self.get(url, JSON_MEDIA_TYPE), &what).await?;

        // A directory listing comes back as an array and fails here
        response.json().await.map_err(|e| {
            warn!("Failed to parse contents response for {}: {}", what, e);
            HostingError::InvalidResponse(e.to_string())
        })
    }

    async fn list_changed_files(
        &self,
        repo: &RepoCoordinates,
        pull_request: u64,
        page: u32,
    ) -> Result<ChangedFilesPage, HostingError> {
        let pull_request_segment = pull_request.to_string();
        let mut url = self.api_url([
            "repos",
            repo.owner.as_str(),
            repo.repo.as_str(),
            "pulls",
            pull_request_segment.as_str(),
            "files",
        ])?;
        url.query_pairs_mut()
            .append_pair("per_page", &FILES_PER_PAGE.to_string())
            .append_pair("page", &page.to_string());
        debug!("Listing changed files page {} from {}", page, url);

        let what = format!("pull request #{} in {}", pull_request, repo);
        let response = self.send(self.get(url, JSON_MEDIA_TYPE), &what).await?;
        let has_next = has_next_page(response.headers());

        let entries: Vec<ChangedFileEntry> = response.json().await.map_err(|e| {
            warn!("Failed to parse changed files of {}: {}", what, e);
            HostingError::InvalidResponse(e.to_string())
        })?;

        Ok(ChangedFilesPage { entries, has_next })
    }

    /// Download `url` with the raw media type.
    ///
    /// The bearer token goes to whatever host `url` names, not to `api_url`.
    /// For a listing's `raw_url` that is the web host (`github.com`), which
    /// redirects to `raw.githubusercontent.com`; reqwest strips the
    /// `Authorization` header on that cross-host redirect, so private content
    /// that needs the token may come back as `NotFound`.
    async fn fetch_raw(&self, url: &str) -> Result<Vec<u8>, HostingError> {
        let parsed = Url::parse(url).map_err(|e| HostingError::InvalidUrl(format!("{url}: {e}")))?;
        debug!("Fetching raw content from {}", parsed);

        let response = self.send(self.get(parsed, RAW_MEDIA_TYPE), url).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(HostingError::from_transport)?;

        Ok(bytes.to_vec())
    }
}
