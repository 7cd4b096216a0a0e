//! Batch conversion driver.
//!
//! # Responsibility
//! - Map each conformance descriptor to an API identifier.
//! - Resolve the API's rules file (old tree) and target directory (new tree).
//! - Run the generator once per descriptor and report the outcomes.
//!
//! # Invariants
//! - Every descriptor is resolved before the first generator run, so a missing
//!   rules file or target directory aborts the run without partial output.
//! - Descriptors are processed in sorted path order.
//! - Dry runs never call the generator.

use crate::config::{FailurePolicy, ReorgConfig};
use crate::error::{ReorgError, ReorgResult};
use crate::generator::{Generator, GeneratorInvocation};
use crate::paths::file_name_str;
use crate::scan::{select_one, PathPattern};
use log::{error, info};
use std::path::{Path, PathBuf};

/// Derives the API identifier from a conformance file path.
///
/// The identifier is the file name up to its first underscore:
/// `TMF669_PartyRole_conformance.yaml` gives `TMF669`.
pub fn api_id_from_conformance(path: &Path) -> ReorgResult<String> {
    let name = file_name_str(path)?;
    Ok(name.split('_').next().unwrap_or(name).to_string())
}

/// A fully resolved generator call for one descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedInvocation {
    pub conformance: PathBuf,
    pub api: String,
    pub invocation: GeneratorInvocation,
}

/// Result of one planned call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    Succeeded,
    /// Generator exited with a non-zero code, or `None` for a signal.
    Failed(Option<i32>),
    /// Dry run; the generator was not called.
    Planned,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    pub planned: PlannedInvocation,
    pub status: BatchStatus,
}

/// Per-descriptor outcomes of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.count(|status| status == BatchStatus::Succeeded)
    }

    pub fn failed(&self) -> usize {
        self.count(|status| matches!(status, BatchStatus::Failed(_)))
    }

    fn count(&self, predicate: impl Fn(BatchStatus) -> bool) -> usize {
        self.entries
            .iter()
            .filter(|entry| predicate(entry.status))
            .count()
    }
}

/// Drives the generator across all matching conformance descriptors.
pub struct BatchDriver<'cfg, G: Generator> {
    config: &'cfg ReorgConfig,
    generator: G,
}

impl<'cfg, G: Generator> BatchDriver<'cfg, G> {
    pub fn new(config: &'cfg ReorgConfig, generator: G) -> Self {
        Self { config, generator }
    }

    /// Lists conformance descriptors matching the configured pattern.
    pub fn conformance_files(&self) -> ReorgResult<Vec<PathBuf>> {
        PathPattern::parse(&self.config.conformance_pattern).expand(&self.config.conformance_root)
    }

    /// Resolves one generator call per descriptor.
    ///
    /// # Errors
    /// - `ReorgError::Config` when `conformance_root` is unset.
    /// - `ReorgError::NoMatch` when an API has no rules file or target directory.
    /// - `ReorgError::Ambiguous` on several candidates under `RequireUnique`.
    pub fn plan(&self) -> ReorgResult<Vec<PlannedInvocation>> {
        self.config.validate_for_batch()?;
        let mut planned = Vec::new();
        for conformance in self.conformance_files()? {
            let api = api_id_from_conformance(&conformance)?;
            let rules_file = self.resolve_rules_file(&api)?;
            let api_target_directory = self.resolve_target_dir(&api)?;
            info!(
                "event=batch_plan module=batch status=ok api={} conformance={} rules={} target={}",
                api,
                conformance.display(),
                rules_file.display(),
                api_target_directory.display()
            );
            planned.push(PlannedInvocation {
                conformance,
                api,
                invocation: GeneratorInvocation {
                    rules_file,
                    schema_directory: self.config.schema_directory(),
                    api_target_directory,
                    flags: self.config.generator.flags,
                },
            });
        }
        Ok(planned)
    }

    /// Plans and then runs every generator call in order.
    ///
    /// # Errors
    /// - Any planning error from [`Self::plan`].
    /// - `ReorgError::GeneratorSpawn` when the generator cannot start.
    /// - `ReorgError::GeneratorFailed` on a failed run under `FailurePolicy::Abort`.
    pub fn run(&self) -> ReorgResult<BatchReport> {
        let planned = self.plan()?;
        info!(
            "event=batch_run module=batch status=start descriptors={} dry_run={}",
            planned.len(),
            self.config.dry_run
        );

        let mut report = BatchReport::default();
        for item in planned {
            if self.config.dry_run {
                info!(
                    "event=batch_run module=batch status=skip reason=dry_run api={} args=\"{}\"",
                    item.api,
                    item.invocation.command_line()
                );
                report.entries.push(BatchEntry {
                    planned: item,
                    status: BatchStatus::Planned,
                });
                continue;
            }

            let outcome = self.generator.run(&item.invocation)?;
            let status = if outcome.success() {
                BatchStatus::Succeeded
            } else {
                error!(
                    "event=batch_run module=batch status=error error_code=generator_failed api={} exit_code={:?}",
                    item.api, outcome.code
                );
                if self.config.generator_failure == FailurePolicy::Abort {
                    return Err(ReorgError::GeneratorFailed {
                        api: item.api,
                        code: outcome.code,
                    });
                }
                BatchStatus::Failed(outcome.code)
            };
            report.entries.push(BatchEntry {
                planned: item,
                status,
            });
        }

        info!(
            "event=batch_run module=batch status=ok succeeded={} failed={}",
            report.succeeded(),
            report.failed()
        );
        Ok(report)
    }

    fn resolve_rules_file(&self, api: &str) -> ReorgResult<PathBuf> {
        let pattern = PathPattern::parse(&format!("apis/{api}*/*.rules.yaml"));
        let matches = pattern.expand(&self.config.old_root)?;
        select_one(
            "rules file",
            pattern.as_str(),
            matches,
            self.config.match_policy,
        )
    }

    fn resolve_target_dir(&self, api: &str) -> ReorgResult<PathBuf> {
        let pattern = PathPattern::parse(&format!("apis/{api}*/"));
        let matches = pattern.expand(&self.config.new_root)?;
        select_one(
            "api target directory",
            pattern.as_str(),
            matches,
            self.config.match_policy,
        )
    }
}
