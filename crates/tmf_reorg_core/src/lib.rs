//! Reorganisation tools for the TM Forum API and schema documentation trees.
//! All scanning, matching and file moves live here; the CLI only wires config.

pub mod batch;
pub mod config;
pub mod error;
pub mod events;
pub mod generator;
pub mod logging;
pub mod naming;
pub mod paths;
pub mod samples;
pub mod scan;

pub use batch::{api_id_from_conformance, BatchDriver, BatchReport, BatchStatus};
pub use config::{FailurePolicy, GeneratorConfig, GeneratorFlags, MatchPolicy, ReorgConfig};
pub use error::{ReorgError, ReorgResult};
pub use events::{
    event_folder_for, EventRelocator, RelocationOutcome, RelocationPhase, RelocationReport,
    SchemaMatch,
};
pub use generator::{Generator, GeneratorInvocation, GeneratorOutcome, ProcessGenerator};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use naming::{candidate_prefixes, split_words, strip_schema_suffix};
pub use samples::{CopyReport, SampleCopier, SampleKind};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
