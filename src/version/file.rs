//! Decoding of version files
//!
//! A version file is a JSON document with a top-level `version` string.
//! Both resolvers feed their bytes through [`parse_version_file`]; the base
//! resolver first strips the API's base64 transport encoding with
//! [`decode_content`].

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde_json::Value;

use crate::version::error::VersionFileError;
use crate::version::record::VersionString;
use crate::version::semver::parse_version;

/// Decode API file content according to its encoding tag.
///
/// GitHub wraps base64 content at 60 columns, so all ASCII whitespace is
/// removed before decoding.
pub fn decode_content(content: &str, encoding: &str) -> Result<Vec<u8>, VersionFileError> {
    match encoding {
        "base64" => {
            let compact: String = content
                .chars()
                .filter(|c| !c.is_ascii_whitespace())
                .collect();
            BASE64
                .decode(compact)
                .map_err(|e| VersionFileError::Encoding(e.to_string()))
        }
        "utf-8" | "utf8" => Ok(content.as_bytes().to_vec()),
        other => Err(VersionFileError::UnsupportedEncoding(other.to_string())),
    }
}

/// Extract and validate the `version` field from raw file bytes
pub fn parse_version_file(bytes: &[u8]) -> Result<VersionString, VersionFileError> {
    let text = std::str::from_utf8(bytes).map_err(|_| VersionFileError::Utf8)?;
    // Editors on Windows like to leave a byte order mark
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let document: Value =
        serde_json::from_str(text).map_err(|e| VersionFileError::Json(e.to_string()))?;

    let raw = match document.get("version") {
        None | Some(Value::Null) => return Err(VersionFileError::MissingVersion),
        Some(Value::String(raw)) => raw,
        Some(_) => return Err(VersionFileError::VersionNotString),
    };

    let parsed = parse_version(raw)?;
    Ok(VersionString::new(raw.clone(), parsed))
}
