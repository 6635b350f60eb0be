//! Results produced by the version resolvers

use std::fmt;

use semver::Version;

use crate::hosting::error::HostingError;
use crate::version::error::VersionFileError;

/// A version string as written in a version file, with its parsed form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionString {
    raw: String,
    parsed: Version,
}

impl VersionString {
    pub fn new(raw: String, parsed: Version) -> Self {
        Self { raw, parsed }
    }

    /// The string exactly as it appeared in the file
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn parsed(&self) -> &Version {
        &self.parsed
    }
}

impl fmt::Display for VersionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Why a version file has no version to offer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbsentReason {
    /// The file does not exist at the requested ref
    MissingAtRef,
    /// The pull request does not touch the file
    NotChanged,
    /// The pull request deletes the file
    Removed,
    /// The file is listed as changed but its content at the head was not found
    ContentNotFound,
}

/// Outcome of resolving one side of the check
#[derive(Debug)]
pub enum VersionFileRecord {
    /// The file exists and declares a valid version
    Found(VersionString),
    /// There is no file to read a version from
    Absent(AbsentReason),
    /// The file exists but does not contain a usable version
    Malformed(VersionFileError),
    /// The hosting API could not be reached or answered unexpectedly
    Unreachable(HostingError),
}

impl VersionFileRecord {
    pub fn version(&self) -> Option<&VersionString> {
        match self {
            Self::Found(version) => Some(version),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent(_))
    }

    pub fn absent_reason(&self) -> Option<AbsentReason> {
        match self {
            Self::Absent(reason) => Some(*reason),
            _ => None,
        }
    }
}

impl From<Result<VersionString, VersionFileError>> for VersionFileRecord {
    fn from(result: Result<VersionString, VersionFileError>) -> Self {
        match result {
            Ok(version) => Self::Found(version),
            Err(e) => Self::Malformed(e),
        }
    }
}
