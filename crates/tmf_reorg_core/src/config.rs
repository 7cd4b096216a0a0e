//! Run configuration for the reorganisation tools.
//!
//! # Responsibility
//! - Replace hardcoded tree locations with one explicit structure.
//! - Expose ambiguity and generator-failure handling as named policies.
//!
//! # Invariants
//! - `old_root` and `new_root` are non-empty and distinct after `validate()`.
//! - Every optional JSON field has a default matching the historical scripts.

use crate::error::{ReorgError, ReorgResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_CONFORMANCE_PATTERN: &str = "*.yaml";
const DEFAULT_GENERATOR_PROGRAM: &str = "node";
const DEFAULT_GENERATOR_SCRIPT: &str = "rules2oas";

/// How a scan that should produce one path treats several results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Take the first path in sorted order.
    #[default]
    FirstMatch,
    /// Fail with `ReorgError::Ambiguous`.
    RequireUnique,
}

/// What the batch driver does after a generator exits unsuccessfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Record the failure and move on to the next conformance file.
    #[default]
    Continue,
    /// Stop the run with `ReorgError::GeneratorFailed`.
    Abort,
}

/// Boolean switches forwarded to the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorFlags {
    pub add_notification_examples: bool,
    pub validate_properties: bool,
    pub overwrite_events: bool,
    pub overwrite_examples: bool,
}

impl Default for GeneratorFlags {
    fn default() -> Self {
        Self {
            add_notification_examples: true,
            validate_properties: true,
            overwrite_events: true,
            overwrite_examples: true,
        }
    }
}

/// External generator command settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Interpreter or executable, `node` by default.
    pub program: String,
    /// Script passed as the first argument, `rules2oas` by default.
    pub script: String,
    /// Working directory for the process; inherits the caller's when unset.
    pub working_dir: Option<PathBuf>,
    pub flags: GeneratorFlags,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_GENERATOR_PROGRAM.to_string(),
            script: DEFAULT_GENERATOR_SCRIPT.to_string(),
            working_dir: None,
            flags: GeneratorFlags::default(),
        }
    }
}

/// Locations and policies shared by the batch driver, copier and relocator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReorgConfig {
    /// Previous API/schema tree (source of rules files, samples, schemas).
    pub old_root: PathBuf,
    /// Target API/schema tree.
    pub new_root: PathBuf,
    /// Directory holding conformance descriptors.
    #[serde(default)]
    pub conformance_root: PathBuf,
    /// Schema directory handed to the generator; `<new_root>/schemas` when unset.
    #[serde(default)]
    pub schema_directory: Option<PathBuf>,
    /// File name pattern for conformance descriptors, e.g. `TMF669*.yaml`.
    #[serde(default = "default_conformance_pattern")]
    pub conformance_pattern: String,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub match_policy: MatchPolicy,
    #[serde(default)]
    pub generator_failure: FailurePolicy,
    /// Resolve and report without touching the filesystem or spawning processes.
    #[serde(default)]
    pub dry_run: bool,
}

fn default_conformance_pattern() -> String {
    DEFAULT_CONFORMANCE_PATTERN.to_string()
}

impl ReorgConfig {
    /// Creates a configuration with default policies.
    pub fn new(
        old_root: impl Into<PathBuf>,
        new_root: impl Into<PathBuf>,
        conformance_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            old_root: old_root.into(),
            new_root: new_root.into(),
            conformance_root: conformance_root.into(),
            schema_directory: None,
            conformance_pattern: default_conformance_pattern(),
            generator: GeneratorConfig::default(),
            match_policy: MatchPolicy::default(),
            generator_failure: FailurePolicy::default(),
            dry_run: false,
        }
    }

    /// Reads a JSON configuration file.
    ///
    /// # Errors
    /// - `ReorgError::Io` when the file cannot be read.
    /// - `ReorgError::Config` when the JSON is malformed or incomplete.
    pub fn load(path: impl AsRef<Path>) -> ReorgResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|err| ReorgError::io("read config", path, err))?;
        Self::from_json(&raw)
            .map_err(|err| ReorgError::Config(format!("{}: {err}", path.display())))
    }

    /// Parses configuration from a JSON string.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Checks cross-field invariants.
    pub fn validate(&self) -> ReorgResult<()> {
        if self.old_root.as_os_str().is_empty() {
            return Err(ReorgError::Config("old_root must not be empty".to_string()));
        }
        if self.new_root.as_os_str().is_empty() {
            return Err(ReorgError::Config("new_root must not be empty".to_string()));
        }
        if self.old_root == self.new_root {
            return Err(ReorgError::Config(format!(
                "old_root and new_root must differ, both are `{}`",
                self.old_root.display()
            )));
        }
        if self.conformance_pattern.trim().is_empty() {
            return Err(ReorgError::Config(
                "conformance_pattern must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Checks `validate()` plus the settings only the batch driver reads.
    pub fn validate_for_batch(&self) -> ReorgResult<()> {
        self.validate()?;
        if self.conformance_root.as_os_str().is_empty() {
            return Err(ReorgError::Config(
                "conformance_root must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Effective schema directory passed to the generator.
    pub fn schema_directory(&self) -> PathBuf {
        self.schema_directory
            .clone()
            .unwrap_or_else(|| self.new_root.join("schemas"))
    }
}

#[cfg(test)]
mod tests {
    use super::{FailurePolicy, MatchPolicy, ReorgConfig};
    use crate::error::ReorgError;
    use std::path::PathBuf;

    #[test]
    fn json_config_fills_defaults() {
        let config = ReorgConfig::from_json(
            r#"{
                "old_root": "/data/old",
                "new_root": "/data/new",
                "conformance_root": "/data/conformance"
            }"#,
        )
        .expect("minimal config should parse");

        assert_eq!(config.conformance_pattern, "*.yaml");
        assert_eq!(config.generator.program, "node");
        assert_eq!(config.generator.script, "rules2oas");
        assert!(config.generator.flags.overwrite_examples);
        assert_eq!(config.match_policy, MatchPolicy::FirstMatch);
        assert_eq!(config.generator_failure, FailurePolicy::Continue);
        assert!(!config.dry_run);
        assert_eq!(
            config.schema_directory(),
            PathBuf::from("/data/new/schemas")
        );
    }

    #[test]
    fn json_config_reads_policies_and_flags() {
        let config = ReorgConfig::from_json(
            r#"{
                "old_root": "/data/old",
                "new_root": "/data/new",
                "conformance_pattern": "TMF669*.yaml",
                "schema_directory": "/data/schemas",
                "match_policy": "require_unique",
                "generator_failure": "abort",
                "generator": { "flags": { "validate_properties": false } }
            }"#,
        )
        .expect("full config should parse");

        assert_eq!(config.conformance_pattern, "TMF669*.yaml");
        assert_eq!(config.match_policy, MatchPolicy::RequireUnique);
        assert_eq!(config.generator_failure, FailurePolicy::Abort);
        assert!(!config.generator.flags.validate_properties);
        assert!(config.generator.flags.add_notification_examples);
        assert_eq!(config.schema_directory(), PathBuf::from("/data/schemas"));
    }

    #[test]
    fn validate_rejects_identical_roots() {
        let config = ReorgConfig::new("/data/tree", "/data/tree", "/data/conformance");
        let err = config.validate().expect_err("identical roots must be rejected");
        assert!(matches!(err, ReorgError::Config(_)));
    }

    #[test]
    fn batch_validation_requires_conformance_root() {
        let config = ReorgConfig::from_json(r#"{"old_root": "/data/old", "new_root": "/data/new"}"#)
            .expect("config without conformance_root should parse");
        assert!(config.validate().is_ok());
        let err = config
            .validate_for_batch()
            .expect_err("empty conformance_root must be rejected");
        assert!(matches!(err, ReorgError::Config(ref message) if message.contains("conformance_root")));

        let config = ReorgConfig::new("/data/old", "/data/new", "/data/conformance");
        assert!(config.validate_for_batch().is_ok());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = ReorgConfig::from_json(
            r#"{"old_root": "/data/old", "new_root": "/data/new", "match_polcy": "require_unique"}"#,
        )
        .expect_err("misspelled key must not be ignored");
        assert!(err.to_string().contains("match_polcy"));

        let err = ReorgConfig::from_json(
            r#"{"old_root": "/a", "new_root": "/b", "generator": {"flags": {"overwrite": false}}}"#,
        )
        .expect_err("unknown flag must not be ignored");
        assert!(err.to_string().contains("overwrite"));
    }

    #[test]
    fn load_reports_missing_file_as_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReorgConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ReorgError::Io { .. }));
    }
}
