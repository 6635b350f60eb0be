use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Owner and name of a hosted repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoCoordinates {
    pub owner: String,
    pub repo: String,
}

impl RepoCoordinates {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl fmt::Display for RepoCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for RepoCoordinates {
    type Err = String;

    /// Parses `owner/repo`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once('/') {
            Some((owner, repo))
                if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') =>
            {
                Ok(Self::new(owner, repo))
            }
            _ => Err(format!("expected `owner/repo`, got {s:?}")),
        }
    }
}

/// File content as returned by the contents API, still transport-encoded
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EncodedContent {
    #[serde(default)]
    pub content: String,
    pub encoding: String,
}

/// How a pull request changed a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    Removed,
    Modified,
    Renamed,
    Copied,
    Changed,
    Unchanged,
    #[serde(other)]
    Unknown,
}

/// One entry of a pull request's changed-files listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChangedFileEntry {
    #[serde(rename = "filename")]
    pub path: String,
    pub status: FileStatus,
    /// Content of the file at the pull request head
    pub raw_url: Option<String>,
}

/// A single page of the changed-files listing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChangedFilesPage {
    pub entries: Vec<ChangedFileEntry>,
    pub has_next: bool,
}
