//! Source-control hosting API access
//!
//! - [`api`]: `HostingApi` trait, the seam resolvers depend on
//! - [`github`]: GitHub REST implementation over reqwest
//! - [`error`]: Transport and status errors
//! - [`types`]: Repository coordinates and API payloads

pub mod api;
pub mod error;
pub mod github;
pub mod types;

pub use api::HostingApi;
pub use error::HostingError;
pub use github::GitHubClient;
pub use types::{ChangedFileEntry, ChangedFilesPage, EncodedContent, FileStatus, RepoCoordinates};
