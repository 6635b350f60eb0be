use thiserror::Error;

/// Reasons a version file could not be turned into a version string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionFileError {
    #[error("Unsupported content encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("Invalid base64 content: {0}")]
    Encoding(String),

    #[error("File is not valid UTF-8")]
    Utf8,

    #[error("Invalid JSON: {0}")]
    Json(String),

    #[error("Missing `version` field")]
    MissingVersion,

    #[error("`version` field is not a string")]
    VersionNotString,

    #[error("Invalid semantic version {value:?}: {reason}")]
    InvalidVersion { value: String, reason: String },
}
