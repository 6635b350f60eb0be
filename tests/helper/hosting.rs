//! In-memory hosting API for tests

use std::collections::HashMap;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

use version_gate::hosting::{
    ChangedFileEntry, ChangedFilesPage, EncodedContent, FileStatus, HostingApi, HostingError,
    RepoCoordinates,
};
use version_gate::version::checker::CheckConfig;

const RAW_BASE_URL: &str = "https://github.com/ebuckley23/j789/raw/head";

/// Mock hosting API serving files from memory
pub struct MockHosting {
    /// (ref, path) -> file contents
    files_at_ref: HashMap<(String, String), String>,
    changed_files: Vec<ChangedFileEntry>,
    raw_content: HashMap<String, Vec<u8>>,
    page_size: usize,
}

impl MockHosting {
    pub fn new() -> Self {
        Self {
            files_at_ref: HashMap::new(),
            changed_files: Vec::new(),
            raw_content: HashMap::new(),
            page_size: 100,
        }
    }

    /// Serve `contents` for `path` at `git_ref`
    pub fn with_file_at_ref(mut self, git_ref: &str, path: &str, contents: &str) -> Self {
        self.files_at_ref
            .insert((git_ref.to_string(), path.to_string()), contents.to_string());
        self
    }

    /// List `path` as modified by the pull request, with `contents` at its head
    pub fn with_changed_file(mut self, path: &str, contents: &str) -> Self {
        let raw_url = format!("{RAW_BASE_URL}/{path}");
        self.raw_content
            .insert(raw_url.clone(), contents.as_bytes().to_vec());
        self.changed_files.push(ChangedFileEntry {
            path: path.to_string(),
            status: FileStatus::Modified,
            raw_url: Some(raw_url),
        });
        self
    }

    /// List `count` unrelated files ahead of anything added later
    pub fn with_unrelated_changes(mut self, count: usize) -> Self {
        for i in 0..count {
            self.changed_files.push(ChangedFileEntry {
                path: format!("src/file_{i}.rs"),
                status: FileStatus::Modified,
                raw_url: Some(format!("{RAW_BASE_URL}/src/file_{i}.rs")),
            });
        }
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }
}

#[async_trait]
impl HostingApi for MockHosting {
    async fn file_content_at_ref(
        &self,
        _repo: &RepoCoordinates,
        path: &str,
        git_ref: &str,
    ) -> Result<EncodedContent, HostingError> {
        match self
            .files_at_ref
            .get(&(git_ref.to_string(), path.to_string()))
        {
            Some(contents) => Ok(EncodedContent {
                content: BASE64.encode(contents),
                encoding: "base64".to_string(),
            }),
            None => Err(HostingError::NotFound(format!("{path} at {git_ref}"))),
        }
    }

    async fn list_changed_files(
        &self,
        _repo: &RepoCoordinates,
        _pull_request: u64,
        page: u32,
    ) -> Result<ChangedFilesPage, HostingError> {
        let start = (page as usize - 1) * self.page_size;
        let entries: Vec<ChangedFileEntry> = self
            .changed_files
            .iter()
            .skip(start)
            .take(self.page_size)
            .cloned()
            .collect();
        let has_next = start + self.page_size < self.changed_files.len();

        Ok(ChangedFilesPage { entries, has_next })
    }

    async fn fetch_raw(&self, url: &str) -> Result<Vec<u8>, HostingError> {
        self.raw_content
            .get(url)
            .cloned()
            .ok_or_else(|| HostingError::NotFound(url.to_string()))
    }
}

/// Check configuration used across tests
pub fn check_config() -> CheckConfig {
    CheckConfig {
        repo: RepoCoordinates::new("ebuckley23", "j789"),
        pull_request: 1,
        version_path: "version.json".to_string(),
        base_ref: "main".to_string(),
    }
}
