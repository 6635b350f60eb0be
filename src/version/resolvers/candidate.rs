//! Resolves the version a pull request proposes

use tracing::{debug, info, warn};

use crate::config::MAX_FILE_PAGES;
use crate::hosting::{ChangedFileEntry, FileStatus, HostingApi, HostingError, RepoCoordinates};
use crate::version::file::parse_version_file;
use crate::version::record::{AbsentReason, VersionFileRecord};

/// Reads the version file from a pull request's changed files
pub struct CandidateVersionResolver<'a> {
    api: &'a dyn HostingApi,
}

impl<'a> CandidateVersionResolver<'a> {
    pub fn new(api: &'a dyn HostingApi) -> Self {
        Self { api }
    }

    /// Find `path` among the files changed by `pull_request` and extract its version.
    ///
    /// Returns `Absent` when the pull request does not touch the file, deletes
    /// it, or its content at the head cannot be found.
    pub async fn resolve(
        &self,
        repo: &RepoCoordinates,
        pull_request: u64,
        path: &str,
    ) -> VersionFileRecord {
        let entry = match self.find_changed_file(repo, pull_request, path).await {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                info!("Pull request #{} does not change {}", pull_request, path);
                return VersionFileRecord::Absent(AbsentReason::NotChanged);
            }
            Err(e) => {
                warn!(
                    "Failed to list files of pull request #{} in {}: {}",
                    pull_request, repo, e
                );
                return VersionFileRecord::Unreachable(e);
            }
        };

        if entry.status == FileStatus::Removed {
            info!("Pull request #{} removes {}", pull_request, path);
            return VersionFileRecord::Absent(AbsentReason::Removed);
        }

        let Some(raw_url) = entry.raw_url else {
            warn!("Changed file entry for {} has no raw_url", path);
            return VersionFileRecord::Unreachable(HostingError::InvalidResponse(format!(
                "no content URL for {path}"
            )));
        };

        match self.api.fetch_raw(&raw_url).await {
            Ok(bytes) => {
                let record: VersionFileRecord = parse_version_file(&bytes).into();
                if let VersionFileRecord::Malformed(e) = &record {
                    warn!("{} in pull request #{} is malformed: {}", path, pull_request, e);
                }
                record
            }
            Err(e) if e.is_not_found() => {
                info!("Content of {} not found at {}", path, raw_url);
                VersionFileRecord::Absent(AbsentReason::ContentNotFound)
            }
            Err(e) => {
                warn!("Failed to fetch {} from {}: {}", path, raw_url, e);
                VersionFileRecord::Unreachable(e)
            }
        }
    }

    /// Walk the changed-files listing page by page until `path` is found
    /// or the listing ends.
    pub async fn find_changed_file(
        &self,
        repo: &RepoCoordinates,
        pull_request: u64,
        path: &str,
    ) -> Result<Option<ChangedFileEntry>, HostingError> {
        for page in 1..=MAX_FILE_PAGES {
            let listing = self.api.list_changed_files(repo, pull_request, page).await?;
            debug!(
                "Page {} of pull request #{} lists {} files",
                page,
                pull_request,
                listing.entries.len()
            );

            if let Some(entry) = listing.entries.into_iter().find(|e| e.path == path) {
                return Ok(Some(entry));
            }
            if !listing.has_next {
                return Ok(None);
            }
        }

        warn!(
            "Stopped listing pull request #{} after {} pages",
            pull_request, MAX_FILE_PAGES
        );
        Ok(None)
    }
}
