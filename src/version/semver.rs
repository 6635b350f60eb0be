use std::cmp::Ordering;

use semver::Version;

use crate::version::error::VersionFileError;

/// Result of checking a candidate version against a base version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Candidate is strictly newer than base
    Greater,
    /// Candidate is equal to or older than base
    LessOrEqual,
}

/// Normalize a version string by trimming whitespace and a single leading 'v'
///
/// Examples:
/// - " 1.2.3 " -> "1.2.3"
/// - "v1.2.3" -> "1.2.3"
pub fn normalize_version(version: &str) -> &str {
    let trimmed = version.trim();
    trimmed.strip_prefix('v').unwrap_or(trimmed)
}

/// Parse a version string as a full `MAJOR.MINOR.PATCH[-PRE][+BUILD]` semver.
///
/// Partial versions such as "1.2" are rejected: a version file must
/// declare all three components.
pub fn parse_version(version: &str) -> Result<Version, VersionFileError> {
    Version::parse(normalize_version(version)).map_err(|e| VersionFileError::InvalidVersion {
        value: version.to_string(),
        reason: e.to_string(),
    })
}

/// Semver precedence of two versions, ignoring build metadata.
///
/// `semver::Version`'s own `Ord` breaks ties on build metadata, which
/// precedence must not do. `Prerelease` orders an empty tag above any
/// non-empty one and compares identifiers field by field.
pub fn precedence(a: &Version, b: &Version) -> Ordering {
    a.major
        .cmp(&b.major)
        .then(a.minor.cmp(&b.minor))
        .then(a.patch.cmp(&b.patch))
        .then_with(|| a.pre.cmp(&b.pre))
}

/// Decide whether `candidate` is strictly greater than `base`
pub fn compare(candidate: &Version, base: &Version) -> Comparison {
    match precedence(candidate, base) {
        Ordering::Greater => Comparison::Greater,
        Ordering::Equal | Ordering::Less => Comparison::LessOrEqual,
    }
}

/// Parse both strings and compare them
pub fn compare_versions(candidate: &str, base: &str) -> Result<Comparison, VersionFileError> {
    Ok(compare(&parse_version(candidate)?, &parse_version(base)?))
}
