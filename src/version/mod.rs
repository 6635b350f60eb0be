//! Version file decoding, resolution and comparison
//!
//! # Modules
//!
//! - [`checker`]: Orchestrates both resolvers and decides pass/fail
//! - [`error`]: Reasons a version file is malformed
//! - [`file`]: Transport decoding and `version` field extraction
//! - [`record`]: `VersionString` and the per-side `VersionFileRecord`
//! - [`resolvers`]: Base (target branch) and candidate (pull request) resolvers
//! - [`semver`]: Strict-greater-than comparison under semver precedence

pub mod checker;
pub mod error;
pub mod file;
pub mod record;
pub mod resolvers;
pub mod semver;
