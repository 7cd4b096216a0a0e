//! Event schema relocation by fuzzy name matching.
//!
//! # Responsibility
//! - Find the old-tree schema whose name shares the most leading words with an
//!   event or payload schema in the new tree.
//! - Move the file into the `Event` folder mirrored from that schema's location.
//!
//! # Invariants
//! - Longer leading-word matches always win over shorter ones.
//! - Files with no match stay where they are and are reported as unmatched.
//! - Moves are renames; the original location no longer exists afterwards.

use crate::config::ReorgConfig;
use crate::error::{ReorgError, ReorgResult};
use crate::naming::{candidate_prefixes, split_words, strip_schema_suffix, SCHEMA_SUFFIX};
use crate::paths::{file_name_str, insert_tmf_segment, parent_dir, relative_to};
use crate::scan::{select_one, PathPattern};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

const EVENT_FOLDER: &str = "Event";

/// Group of new-tree files handled in one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelocationPhase {
    /// Everything under `schemas/Tmf/schemas/Event/`.
    EventSchemas,
    /// `*.schema.json` directly under `schemas/Tmf/schemas/`.
    PayloadSchemas,
}

impl RelocationPhase {
    pub const ALL: [RelocationPhase; 2] = [
        RelocationPhase::EventSchemas,
        RelocationPhase::PayloadSchemas,
    ];

    /// Pattern relative to the new tree root.
    pub fn pattern(self) -> &'static str {
        match self {
            Self::EventSchemas => "schemas/Tmf/schemas/Event/*",
            Self::PayloadSchemas => "schemas/Tmf/schemas/*.schema.json",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::EventSchemas => "event",
            Self::PayloadSchemas => "payload",
        }
    }
}

/// Best old-tree match for a candidate name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaMatch {
    /// Joined leading words that matched, e.g. `ResourceCreate`.
    pub name: String,
    pub words_used: usize,
    pub matched_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelocationOutcome {
    Moved { from: PathBuf, to: PathBuf },
    /// Dry run; the move was resolved but not performed.
    Planned { from: PathBuf, to: PathBuf },
    Unmatched { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocationEntry {
    pub phase: RelocationPhase,
    pub outcome: RelocationOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelocationReport {
    pub entries: Vec<RelocationEntry>,
}

impl RelocationReport {
    pub fn moved(&self) -> usize {
        self.count(|o| matches!(o, RelocationOutcome::Moved { .. }))
    }

    pub fn planned(&self) -> usize {
        self.count(|o| matches!(o, RelocationOutcome::Planned { .. }))
    }

    pub fn unmatched(&self) -> usize {
        self.count(|o| matches!(o, RelocationOutcome::Unmatched { .. }))
    }

    fn count(&self, predicate: impl Fn(&RelocationOutcome) -> bool) -> usize {
        self.entries.iter().filter(|e| predicate(&e.outcome)).count()
    }
}

/// Destination folder for files belonging next to `matched_file`.
///
/// `old/schemas/Foo/Bar.schema.json` maps to `new/schemas/Tmf/Foo/Event`.
pub fn event_folder_for(config: &ReorgConfig, matched_file: &Path) -> ReorgResult<PathBuf> {
    let matched_dir = parent_dir(matched_file);
    let relative = relative_to(&matched_dir, &config.old_root)?;
    Ok(config
        .new_root
        .join(insert_tmf_segment(relative))
        .join(EVENT_FOLDER))
}

pub struct EventRelocator<'cfg> {
    config: &'cfg ReorgConfig,
}

impl<'cfg> EventRelocator<'cfg> {
    pub fn new(config: &'cfg ReorgConfig) -> Self {
        Self { config }
    }

    /// Looks up the longest leading-word match for `file_name` in the old tree.
    ///
    /// Returns `Ok(None)` when no prefix matches.
    ///
    /// # Errors
    /// - `ReorgError::Ambiguous` when a prefix matches several files under
    ///   `MatchPolicy::RequireUnique`.
    pub fn find_best_match(&self, file_name: &str) -> ReorgResult<Option<SchemaMatch>> {
        let words = split_words(strip_schema_suffix(file_name));
        for (index, name) in candidate_prefixes(&words).into_iter().enumerate() {
            let pattern = PathPattern::parse(&format!("schemas/*/{name}{SCHEMA_SUFFIX}"));
            let matches = pattern.expand(&self.config.old_root)?;
            debug!(
                "event=schema_match module=events status=probe candidate={} matches={}",
                name,
                matches.len()
            );
            if matches.is_empty() {
                continue;
            }
            let matched_file = select_one(
                "old schema",
                pattern.as_str(),
                matches,
                self.config.match_policy,
            )?;
            return Ok(Some(SchemaMatch {
                name,
                words_used: words.len() - index,
                matched_file,
            }));
        }
        Ok(None)
    }

    /// Moves one file next to its best match, or leaves it in place.
    ///
    /// # Errors
    /// - `ReorgError::Io` when the destination cannot be created or the rename fails.
    pub fn relocate(&self, path: &Path) -> ReorgResult<RelocationOutcome> {
        let file_name = file_name_str(path)?;
        let Some(found) = self.find_best_match(file_name)? else {
            warn!(
                "event=schema_relocate module=events status=skip reason=no_match file={}",
                path.display()
            );
            return Ok(RelocationOutcome::Unmatched {
                path: path.to_path_buf(),
            });
        };

        let folder = event_folder_for(self.config, &found.matched_file)?;
        let destination = folder.join(file_name);
        if self.config.dry_run {
            info!(
                "event=schema_relocate module=events status=skip reason=dry_run from={} to={} matched={}",
                path.display(),
                destination.display(),
                found.name
            );
            return Ok(RelocationOutcome::Planned {
                from: path.to_path_buf(),
                to: destination,
            });
        }

        fs::create_dir_all(&folder)
            .map_err(|err| ReorgError::io("create directory", &folder, err))?;
        fs::rename(path, &destination).map_err(|err| ReorgError::io("move", path, err))?;
        info!(
            "event=schema_relocate module=events status=ok from={} to={} matched={} words={}",
            path.display(),
            destination.display(),
            found.name,
            found.words_used
        );
        Ok(RelocationOutcome::Moved {
            from: path.to_path_buf(),
            to: destination,
        })
    }

    /// Relocates event schemas, then payload schemas.
    pub fn run(&self) -> ReorgResult<RelocationReport> {
        let mut report = RelocationReport::default();
        for phase in RelocationPhase::ALL {
            let files = PathPattern::parse(phase.pattern()).expand(&self.config.new_root)?;
            info!(
                "event=schema_relocate module=events status=start phase={} files={}",
                phase.label(),
                files.len()
            );
            for file in files {
                let outcome = self.relocate(&file)?;
                report.entries.push(RelocationEntry { phase, outcome });
            }
        }
        info!(
            "event=schema_relocate module=events status=ok moved={} planned={} unmatched={}",
            report.moved(),
            report.planned(),
            report.unmatched()
        );
        Ok(report)
    }
}
