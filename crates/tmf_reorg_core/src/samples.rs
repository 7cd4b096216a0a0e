//! Operation and resource sample copier.
//!
//! # Responsibility
//! - Mirror sample files from the old API tree into the new one.
//!
//! # Invariants
//! - Destination directories are created transitively before each copy.
//! - Existing destination files are overwritten byte-for-byte.
//! - The run stops at the first I/O error; files copied so far remain.

use crate::config::ReorgConfig;
use crate::error::{ReorgError, ReorgResult};
use crate::paths::{parent_dir, rebase};
use crate::scan::PathPattern;
use log::{error, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Sample category copied by [`SampleCopier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    /// Request/response samples for API operations.
    Operation,
    /// Example instances of API resources.
    Resource,
}

impl SampleKind {
    pub const ALL: [SampleKind; 2] = [SampleKind::Operation, SampleKind::Resource];

    /// Pattern relative to a tree root.
    pub fn pattern(self) -> &'static str {
        match self {
            Self::Operation => "apis/*/documentation/operation-samples/*.sample.json",
            Self::Resource => "apis/*/documentation/resource-samples/*.example.json",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Operation => "operation",
            Self::Resource => "resource",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopiedSample {
    pub kind: SampleKind,
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Copies performed (or planned, for dry runs) in scan order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    pub copied: Vec<CopiedSample>,
    pub dry_run: bool,
}

impl CopyReport {
    pub fn count(&self, kind: SampleKind) -> usize {
        self.copied.iter().filter(|c| c.kind == kind).count()
    }
}

pub struct SampleCopier<'cfg> {
    config: &'cfg ReorgConfig,
}

impl<'cfg> SampleCopier<'cfg> {
    pub fn new(config: &'cfg ReorgConfig) -> Self {
        Self { config }
    }

    /// Copies operation samples, then resource samples.
    ///
    /// # Errors
    /// - `ReorgError::Io` when scanning, directory creation or copying fails.
    pub fn run(&self) -> ReorgResult<CopyReport> {
        let mut report = CopyReport {
            copied: Vec::new(),
            dry_run: self.config.dry_run,
        };
        for kind in SampleKind::ALL {
            self.copy_kind(kind, &mut report)?;
        }
        info!(
            "event=sample_copy module=samples status=ok operation={} resource={} dry_run={}",
            report.count(SampleKind::Operation),
            report.count(SampleKind::Resource),
            report.dry_run
        );
        Ok(report)
    }

    fn copy_kind(&self, kind: SampleKind, report: &mut CopyReport) -> ReorgResult<()> {
        let sources = PathPattern::parse(kind.pattern()).expand(&self.config.old_root)?;
        for source in sources {
            let destination = rebase(&source, &self.config.old_root, &self.config.new_root)?;
            if !self.config.dry_run {
                copy_file(&source, &destination)?;
            }
            info!(
                "event=sample_copy module=samples status={} kind={} src={} dst={}",
                if self.config.dry_run { "skip" } else { "ok" },
                kind.label(),
                source.display(),
                destination.display()
            );
            report.copied.push(CopiedSample {
                kind,
                source,
                destination,
            });
        }
        Ok(())
    }
}

fn copy_file(source: &Path, destination: &Path) -> ReorgResult<()> {
    let dir = parent_dir(destination);
    fs::create_dir_all(&dir).map_err(|err| {
        error!(
            "event=sample_copy module=samples status=error error_code=mkdir_failed dir={} error={}",
            dir.display(),
            err
        );
        ReorgError::io("create directory", &dir, err)
    })?;
    fs::copy(source, destination).map_err(|err| {
        error!(
            "event=sample_copy module=samples status=error error_code=copy_failed src={} dst={} error={}",
            source.display(),
            destination.display(),
            err
        );
        ReorgError::io("copy", source, err)
    })?;
    Ok(())
}
