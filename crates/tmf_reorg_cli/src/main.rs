//! Command-line entry point for the reorganisation tools.
//!
//! # Responsibility
//! - Build a `ReorgConfig` from an optional JSON file plus flag overrides.
//! - Run one operation per subcommand and print a short summary.

use clap::{Parser, Subcommand};
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;
use tmf_reorg_core::{
    default_log_level, init_logging, BatchDriver, EventRelocator, FailurePolicy, MatchPolicy,
    ProcessGenerator, RelocationOutcome, ReorgConfig, ReorgError, SampleCopier,
};

#[derive(Parser, Debug)]
#[command(name = "tmf-reorg", version, about = "Reorganise TMF API and schema trees")]
struct Cli {
    #[arg(long, global = true, help = "JSON configuration file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Previous API/schema tree")]
    old_root: Option<PathBuf>,
    #[arg(long, global = true, help = "Target API/schema tree")]
    new_root: Option<PathBuf>,
    #[arg(long, global = true, help = "Directory holding conformance descriptors")]
    conformance_root: Option<PathBuf>,
    #[arg(long, global = true, help = "Report actions without changing anything")]
    dry_run: bool,
    #[arg(long, global = true, help = "Fail when a lookup matches several paths")]
    require_unique: bool,
    #[arg(long, global = true, help = "trace|debug|info|warn|error")]
    log_level: Option<String>,
    #[arg(long, global = true, help = "Write rolling log files here instead of stderr")]
    log_dir: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the rules2oas generator for every conformance descriptor.
    Generate {
        #[arg(long, help = "Conformance file pattern, e.g. TMF669*.yaml")]
        pattern: Option<String>,
        #[arg(long, help = "Stop at the first failed generator run")]
        fail_fast: bool,
    },
    /// Copy operation and resource samples from the old tree to the new one.
    CopySamples,
    /// Move event and payload schemas into per-resource Event folders.
    MoveEvents,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| default_log_level().to_string());
    if let Err(message) = init_logging(&level, cli.log_dir.as_deref()) {
        eprintln!("error: {message}");
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), ReorgError> {
    let mut config = build_config(&cli)?;

    match cli.command {
        Commands::Generate { pattern, fail_fast } => {
            if let Some(pattern) = pattern {
                config.conformance_pattern = pattern;
            }
            if fail_fast {
                config.generator_failure = FailurePolicy::Abort;
            }
            config.validate_for_batch()?;
            let generator = ProcessGenerator::from_config(&config.generator);
            let report = BatchDriver::new(&config, generator).run()?;
            for entry in &report.entries {
                println!(
                    "{}\t{:?}\t{}",
                    entry.planned.api,
                    entry.status,
                    entry.planned.conformance.display()
                );
            }
            println!(
                "generated: {} ok, {} failed",
                report.succeeded(),
                report.failed()
            );
        }
        Commands::CopySamples => {
            config.validate()?;
            let report = SampleCopier::new(&config).run()?;
            for copied in &report.copied {
                println!(
                    "{} -> {}",
                    copied.source.display(),
                    copied.destination.display()
                );
            }
            println!(
                "{} {} samples",
                if report.dry_run { "would copy" } else { "copied" },
                report.copied.len()
            );
        }
        Commands::MoveEvents => {
            config.validate()?;
            let report = EventRelocator::new(&config).run()?;
            for entry in &report.entries {
                match &entry.outcome {
                    RelocationOutcome::Moved { from, to } => {
                        println!("moved {} -> {}", from.display(), to.display())
                    }
                    RelocationOutcome::Planned { from, to } => {
                        println!("would move {} -> {}", from.display(), to.display())
                    }
                    RelocationOutcome::Unmatched { path } => {
                        println!("unmatched {}", path.display())
                    }
                }
            }
            println!(
                "moved: {}, planned: {}, unmatched: {}",
                report.moved(),
                report.planned(),
                report.unmatched()
            );
        }
    }
    Ok(())
}

fn build_config(cli: &Cli) -> Result<ReorgConfig, ReorgError> {
    let mut config = match &cli.config {
        Some(path) => ReorgConfig::load(path)?,
        None => {
            let (Some(old_root), Some(new_root)) = (&cli.old_root, &cli.new_root) else {
                return Err(ReorgError::Config(
                    "pass --config or both --old-root and --new-root".to_string(),
                ));
            };
            ReorgConfig::new(
                old_root,
                new_root,
                cli.conformance_root.clone().unwrap_or_default(),
            )
        }
    };

    if let Some(old_root) = &cli.old_root {
        config.old_root = old_root.clone();
    }
    if let Some(new_root) = &cli.new_root {
        config.new_root = new_root.clone();
    }
    if let Some(conformance_root) = &cli.conformance_root {
        config.conformance_root = conformance_root.clone();
    }
    if cli.dry_run {
        config.dry_run = true;
    }
    if cli.require_unique {
        config.match_policy = MatchPolicy::RequireUnique;
    }
    Ok(config)
}
