//! Hosting API trait for reading repository and pull request data

#[cfg(test)]
use mockall::automock;

use crate::hosting::error::HostingError;
use crate::hosting::types::{ChangedFilesPage, EncodedContent, RepoCoordinates};

/// Read operations the check needs from a source-control host.
///
/// Credentials belong to the implementation; callers only pass coordinates.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait HostingApi: Send + Sync {
    /// Fetches the content of `path` as it exists at `git_ref`
    ///
    /// # Returns
    /// * `Ok(EncodedContent)` - Content still in its transport encoding
    /// * `Err(HostingError::NotFound)` - The file does not exist at that ref
    /// * `Err(HostingError)` - Any other failure
    async fn file_content_at_ref(
        &self,
        repo: &RepoCoordinates,
        path: &str,
        git_ref: &str,
    ) -> Result<EncodedContent, HostingError>;

    /// Fetches one page (1-based) of the files changed by a pull request
    async fn list_changed_files(
        &self,
        repo: &RepoCoordinates,
        pull_request: u64,
        page: u32,
    ) -> Result<ChangedFilesPage, HostingError>;

    /// Fetches raw bytes from a content URL taken from a changed-file entry
    async fn fetch_raw(&self, url: &str) -> Result<Vec<u8>, HostingError>;
}
