//! Error taxonomy shared by all reorganisation operations.
//!
//! # Responsibility
//! - Carry enough context (action, path, pattern) to explain a failed run.
//! - Keep filesystem, configuration, matching and generator failures distinct.
//!
//! # Invariants
//! - Filesystem errors always name the path that was being touched.
//! - Match errors always name the pattern that was scanned.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

pub type ReorgResult<T> = Result<T, ReorgError>;

/// Error returned by scanning, copying, relocating and generator runs.
#[derive(Debug)]
pub enum ReorgError {
    /// Filesystem call failed.
    Io {
        action: &'static str,
        path: PathBuf,
        source: io::Error,
    },
    /// Configuration is missing or invalid.
    Config(String),
    /// A scan that must resolve to one path found nothing.
    NoMatch { what: &'static str, pattern: String },
    /// A scan found several paths while uniqueness was required.
    Ambiguous {
        what: &'static str,
        pattern: String,
        matches: Vec<PathBuf>,
    },
    /// The generator process could not be started.
    GeneratorSpawn { program: String, source: io::Error },
    /// The generator exited unsuccessfully and the run is configured to abort.
    GeneratorFailed { api: String, code: Option<i32> },
    /// A scanned path has no usable UTF-8 file name.
    InvalidFileName(PathBuf),
}

impl ReorgError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

impl Display for ReorgError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io {
                action,
                path,
                source,
            } => write!(f, "failed to {action} `{}`: {source}", path.display()),
            Self::Config(message) => write!(f, "invalid configuration: {message}"),
            Self::NoMatch { what, pattern } => {
                write!(f, "no {what} matches `{pattern}`")
            }
            Self::Ambiguous {
                what,
                pattern,
                matches,
            } => write!(
                f,
                "{} {what} candidates match `{pattern}`; expected exactly one",
                matches.len()
            ),
            Self::GeneratorSpawn { program, source } => {
                write!(f, "failed to start generator `{program}`: {source}")
            }
            Self::GeneratorFailed { api, code } => match code {
                Some(code) => write!(f, "generator failed for {api} with exit code {code}"),
                None => write!(f, "generator for {api} was terminated by a signal"),
            },
            Self::InvalidFileName(path) => {
                write!(f, "path has no valid file name: `{}`", path.display())
            }
        }
    }
}

impl Error for ReorgError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::GeneratorSpawn { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ReorgError;
    use std::error::Error;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn io_error_names_action_and_path() {
        let err = ReorgError::io(
            "copy",
            "/tmp/a.json",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let message = err.to_string();
        assert!(message.contains("copy"));
        assert!(message.contains("/tmp/a.json"));
        assert!(err.source().is_some());
    }

    #[test]
    fn ambiguous_error_reports_match_count() {
        let err = ReorgError::Ambiguous {
            what: "rules file",
            pattern: "apis/TMF620*/*.rules.yaml".to_string(),
            matches: vec![PathBuf::from("a"), PathBuf::from("b")],
        };
        assert!(err.to_string().starts_with("2 rules file candidates"));
    }
}
