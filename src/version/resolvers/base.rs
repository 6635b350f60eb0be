//! Resolves the version currently declared on the target branch

use tracing::{info, warn};

use crate::hosting::{HostingApi, RepoCoordinates};
use crate::version::file::{decode_content, parse_version_file};
use crate::version::record::{AbsentReason, VersionFileRecord};

/// Reads the version file as it exists at a ref
pub struct BaseVersionResolver<'a> {
    api: &'a dyn HostingApi,
}

impl<'a> BaseVersionResolver<'a> {
    pub fn new(api: &'a dyn HostingApi) -> Self {
        Self { api }
    }

    /// Fetch `path` at `git_ref` and extract its version.
    ///
    /// Never fails: errors are folded into the record and logged.
    pub async fn resolve(
        &self,
        repo: &RepoCoordinates,
        path: &str,
        git_ref: &str,
    ) -> VersionFileRecord {
        let content = match self.api.file_content_at_ref(repo, path, git_ref).await {
            Ok(content) => content,
            Err(e) if e.is_not_found() => {
                info!("{} does not exist at {} in {}", path, git_ref, repo);
                return VersionFileRecord::Absent(AbsentReason::MissingAtRef);
            }
            Err(e) => {
                warn!("Failed to fetch {} at {} in {}: {}", path, git_ref, repo, e);
                return VersionFileRecord::Unreachable(e);
            }
        };

        let record: VersionFileRecord = decode_content(&content.content, &content.encoding)
            .and_then(|bytes| parse_version_file(&bytes))
            .into();

        if let VersionFileRecord::Malformed(e) = &record {
            warn!("{} at {} is malformed: {}", path, git_ref, e);
        }
        record
    }
}
