//! External schema-to-OpenAPI generator seam.
//!
//! # Responsibility
//! - Describe one generator call as structured data.
//! - Run it as a child process, or let tests substitute a recorder.
//!
//! # Invariants
//! - Every option and every path is a separate argument token.
//! - The call is synchronous; the child has exited when `run` returns.

use crate::config::{GeneratorConfig, GeneratorFlags};
use crate::error::{ReorgError, ReorgResult};
use log::{error, info};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;
use std::time::Instant;

/// Arguments for one generator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorInvocation {
    pub rules_file: PathBuf,
    pub schema_directory: PathBuf,
    pub api_target_directory: PathBuf,
    pub flags: GeneratorFlags,
}

impl GeneratorInvocation {
    /// Argument tokens following the script name.
    pub fn to_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--input".into(),
            self.rules_file.clone().into_os_string(),
            "--schema-directory".into(),
            self.schema_directory.clone().into_os_string(),
            "--api-target-directory".into(),
            self.api_target_directory.clone().into_os_string(),
        ];
        let switches = [
            (
                self.flags.add_notification_examples,
                "--add-notification-examples",
            ),
            (self.flags.validate_properties, "--validate-properties"),
            (self.flags.overwrite_events, "--overwrite-events"),
            (self.flags.overwrite_examples, "--overwrite-examples"),
        ];
        for (enabled, switch) in switches {
            if enabled {
                args.push(switch.into());
            }
        }
        args
    }

    /// Space-joined rendering for log lines.
    pub fn command_line(&self) -> String {
        self.to_args()
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Exit information from a finished generator run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorOutcome {
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
}

impl GeneratorOutcome {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs the generator for one invocation.
pub trait Generator {
    /// Returns the outcome of a finished run.
    ///
    /// Errors are reserved for failing to run at all; an unsuccessful exit is
    /// an `Ok` outcome.
    fn run(&self, invocation: &GeneratorInvocation) -> ReorgResult<GeneratorOutcome>;
}

impl<T: Generator + ?Sized> Generator for &T {
    fn run(&self, invocation: &GeneratorInvocation) -> ReorgResult<GeneratorOutcome> {
        (**self).run(invocation)
    }
}

/// Generator backed by a child process, `node rules2oas …` by default.
#[derive(Debug, Clone)]
pub struct ProcessGenerator {
    program: String,
    script: String,
    working_dir: Option<PathBuf>,
}

impl ProcessGenerator {
    pub fn new(program: impl Into<String>, script: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            script: script.into(),
            working_dir: None,
        }
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self {
            program: config.program.clone(),
            script: config.script.clone(),
            working_dir: config.working_dir.clone(),
        }
    }
}

impl Generator for ProcessGenerator {
    fn run(&self, invocation: &GeneratorInvocation) -> ReorgResult<GeneratorOutcome> {
        let started_at = Instant::now();
        info!(
            "event=generator_run module=generator status=start program={} script={} args=\"{}\"",
            self.program,
            self.script,
            invocation.command_line()
        );

        let mut command = Command::new(&self.program);
        if !self.script.is_empty() {
            command.arg(&self.script);
        }
        command.args(invocation.to_args());
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        let status = command.status().map_err(|err| {
            error!(
                "event=generator_run module=generator status=error error_code=spawn_failed program={} error={}",
                self.program, err
            );
            ReorgError::GeneratorSpawn {
                program: self.program.clone(),
                source: err,
            }
        })?;

        let outcome = GeneratorOutcome {
            code: status.code(),
        };
        info!(
            "event=generator_run module=generator status={} exit_code={:?} duration_ms={}",
            if outcome.success() { "ok" } else { "failed" },
            outcome.code,
            started_at.elapsed().as_millis()
        );
        Ok(outcome)
    }
}
