//! Reporting the check result back to the CI runner
//!
//! Step outputs go to the file named by `GITHUB_OUTPUT`, a markdown table
//! to `GITHUB_STEP_SUMMARY`, and a workflow command annotation to stdout.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::version::checker::{CheckConfig, CheckReport, ComparisonOutcome, Side};
use crate::version::record::VersionFileRecord;

const ANNOTATION_TITLE: &str = "Version check";

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write annotation: {0}")]
    Annotation(#[source] std::io::Error),
}

/// Where the runner expects outputs; either file may be absent on local runs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionOutputs {
    pub output_file: Option<PathBuf>,
    pub summary_file: Option<PathBuf>,
}

impl ActionOutputs {
    pub fn from_env() -> Self {
        let path = |name: &str| {
            std::env::var(name)
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };
        Self {
            output_file: path("GITHUB_OUTPUT"),
            summary_file: path("GITHUB_STEP_SUMMARY"),
        }
    }

    /// Write step outputs, the job summary and an annotation for `report`
    pub fn publish(
        &self,
        config: &CheckConfig,
        report: &CheckReport,
        stdout: &mut impl Write,
    ) -> Result<(), OutputError> {
        if let Some(path) = &self.output_file {
            let base = version_label(&report.base);
            let candidate = version_label(&report.candidate);
            write_outputs(
                path,
                &[
                    ("result", report.outcome.as_str()),
                    ("base-version", base.as_str()),
                    ("candidate-version", candidate.as_str()),
                    ("message", report.message.as_str()),
                ],
            )?;
        }

        if let Some(path) = &self.summary_file {
            append_file(path, &summary_markdown(config, report))?;
        }

        let annotation = match report.outcome {
            ComparisonOutcome::Pass => workflow_command("notice", &report.message),
            ComparisonOutcome::Fail | ComparisonOutcome::Indeterminate => {
                workflow_command("error", &report.message)
            }
        };
        writeln!(stdout, "{annotation}").map_err(OutputError::Annotation)
    }
}

/// Short label for a record in outputs and the summary
fn version_label(record: &VersionFileRecord) -> String {
    match record {
        VersionFileRecord::Found(version) => version.to_string(),
        VersionFileRecord::Absent(_) => String::new(),
        VersionFileRecord::Malformed(_) => "malformed".to_string(),
        VersionFileRecord::Unreachable(_) => "unreachable".to_string(),
    }
}

/// Format a `::command title=...::message` workflow command
pub fn workflow_command(command: &str, message: &str) -> String {
    format!(
        "::{} title={}::{}",
        command,
        escape_property(ANNOTATION_TITLE),
        escape_data(message)
    )
}

fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}

/// Render outputs in the runner's `name<<DELIMITER` file format
pub fn format_outputs(outputs: &[(&str, &str)]) -> String {
    let mut formatted = String::new();
    for (name, value) in outputs {
        let mut delimiter = String::from("VERSION_GATE_EOF");
        while value.contains(delimiter.as_str()) {
            delimiter.push('_');
        }
        formatted.push_str(&format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"));
    }
    formatted
}

/// Append step outputs to the `GITHUB_OUTPUT` file
pub fn write_outputs(path: &Path, outputs: &[(&str, &str)]) -> Result<(), OutputError> {
    append_file(path, &format_outputs(outputs))
}

fn append_file(path: &Path, contents: &str) -> Result<(), OutputError> {
    let io_error = |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_error)?;
    file.write_all(contents.as_bytes()).map_err(io_error)
}

/// Markdown table summarizing both sides and the decision
pub fn summary_markdown(config: &CheckConfig, report: &CheckReport) -> String {
    let icon = if report.outcome.is_success() {
        "✅"
    } else {
        "❌"
    };
    let row = |side: Side, record: &VersionFileRecord| {
        let version = match version_label(record) {
            label if label.is_empty() => "(none)".to_string(),
            label => format!("`{label}`"),
        };
        format!("| {} | {} | {} |\n", side, config.source(side), version)
    };

    let mut markdown = format!("### {icon} Version check: {}\n\n", report.outcome);
    markdown.push_str("| | Source | Version |\n|---|---|---|\n");
    markdown.push_str(&row(Side::Base, &report.base));
    markdown.push_str(&row(Side::Candidate, &report.candidate));
    markdown.push_str(&format!("\n{}\n", report.message));
    markdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hosting::RepoCoordinates;
    use crate::version::record::{AbsentReason, VersionString};
    use crate::version::semver::parse_version;
    use tempfile::TempDir;

    fn config() -> CheckConfig {
        CheckConfig {
            repo: RepoCoordinates::new("ebuckley23", "j789"),
            pull_request: 1,
            version_path: "version.json".to_string(),
            base_ref: "main".to_string(),
        }
    }

    fn found(version: &str) -> VersionFileRecord {
        VersionFileRecord::Found(VersionString::new(
            version.to_string(),
            parse_version(version).unwrap(),
        ))
    }

    fn failed_report() -> CheckReport {
        CheckReport {
            outcome: ComparisonOutcome::Fail,
            base: found("1.3.1"),
            candidate: found("1.3.1"),
            message: "candidate version 1.3.1 must be greater\nthan base 1.3.1".to_string(),
        }
    }

    #[test]
    fn workflow_command_escapes_message() {
        assert_eq!(
            workflow_command("error", "50% done\nnext line"),
            "::error title=Version check::50%25 done%0Anext line"
        );
    }

    #[test]
    fn format_outputs_uses_heredoc_delimiters() {
        assert_eq!(
            format_outputs(&[("result", "pass"), ("message", "line 1\nline 2")]),
            "result<<VERSION_GATE_EOF\npass\nVERSION_GATE_EOF\n\
             message<<VERSION_GATE_EOF\nline 1\nline 2\nVERSION_GATE_EOF\n"
        );
    }

    #[test]
    fn format_outputs_avoids_delimiter_inside_value() {
        let formatted = format_outputs(&[("message", "VERSION_GATE_EOF")]);

        assert_eq!(
            formatted,
            "message<<VERSION_GATE_EOF_\nVERSION_GATE_EOF\nVERSION_GATE_EOF_\n"
        );
    }

    #[test]
    fn publish_writes_outputs_summary_and_error_annotation() {
        let dir = TempDir::new().unwrap();
        let outputs = ActionOutputs {
            output_file: Some(dir.path().join("output")),
            summary_file: Some(dir.path().join("summary.md")),
        };
        let mut stdout = Vec::new();

        outputs
            .publish(&config(), &failed_report(), &mut stdout)
            .unwrap();

        let written = std::fs::read_to_string(dir.path().join("output")).unwrap();
        assert!(written.starts_with("result<<VERSION_GATE_EOF\nfail\nVERSION_GATE_EOF\n"));
        assert!(written.contains("base-version<<VERSION_GATE_EOF\n1.3.1\n"));
        assert!(written.contains("candidate-version<<VERSION_GATE_EOF\n1.3.1\n"));

        let summary = std::fs::read_to_string(dir.path().join("summary.md")).unwrap();
        assert!(summary.starts_with("### ❌ Version check: fail"));
        assert!(summary.contains("| base | version.json at main | `1.3.1` |"));
        assert!(summary.contains("| candidate | version.json in pull request #1 | `1.3.1` |"));

        assert_eq!(
            String::from_utf8(stdout).unwrap(),
            "::error title=Version check::candidate version 1.3.1 must be greater%0Athan base 1.3.1\n"
        );
    }

    #[test]
    fn publish_without_files_only_annotates() {
        let report = CheckReport {
            outcome: ComparisonOutcome::Pass,
            base: VersionFileRecord::Absent(AbsentReason::MissingAtRef),
            candidate: found("0.1.0"),
            message: "first version".to_string(),
        };
        let mut stdout = Vec::new();

        ActionOutputs::default()
            .publish(&config(), &report, &mut stdout)
            .unwrap();

        assert_eq!(
            String::from_utf8(stdout).unwrap(),
            "::notice title=Version check::first version\n"
        );
    }

    #[test]
    fn summary_marks_absent_version() {
        let report = CheckReport {
            outcome: ComparisonOutcome::Fail,
            base: found("1.0.0"),
            candidate: VersionFileRecord::Absent(AbsentReason::Removed),
            message: "no version file found in the pull request".to_string(),
        };

        let summary = summary_markdown(&config(), &report);

        assert!(summary.contains("| candidate | version.json in pull request #1 | (none) |"));
    }
}
