//! Glob-style directory scanning.
//!
//! # Responsibility
//! - Expand fixed-depth patterns such as `apis/*/documentation/*.sample.json`.
//! - Resolve "exactly one" lookups under the configured `MatchPolicy`.
//!
//! # Invariants
//! - Expansion output is sorted, so "first match" is stable across filesystems.
//! - Missing directories produce no matches instead of errors.
//! - Hidden entries only match segments that start with `.`.

use crate::config::MatchPolicy;
use crate::error::{ReorgError, ReorgResult};
use log::warn;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// One `/`-separated part of a [`PathPattern`].
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Wildcard(String),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        if raw.contains(['*', '?']) {
            Self::Wildcard(raw.to_string())
        } else {
            Self::Literal(raw.to_string())
        }
    }

    fn matches(&self, name: &str) -> bool {
        match self {
            Self::Literal(literal) => literal == name,
            Self::Wildcard(pattern) => {
                if name.starts_with('.') && !pattern.starts_with('.') {
                    return false;
                }
                wildcard_match(pattern, name)
            }
        }
    }
}

/// Relative path pattern with `*` and `?` wildcards inside segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
    dirs_only: bool,
}

impl PathPattern {
    /// Parses a relative pattern. A trailing `/` restricts the last segment to directories.
    pub fn parse(raw: &str) -> Self {
        let dirs_only = raw.ends_with('/');
        let segments = raw
            .split('/')
            .filter(|part| !part.is_empty() && *part != ".")
            .map(Segment::parse)
            .collect();
        Self {
            raw: raw.to_string(),
            segments,
            dirs_only,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Lists every path under `root` matching this pattern, sorted.
    ///
    /// # Errors
    /// - `ReorgError::Io` when an existing directory cannot be read.
    pub fn expand(&self, root: &Path) -> ReorgResult<Vec<PathBuf>> {
        let mut current = vec![root.to_path_buf()];
        let last = self.segments.len().saturating_sub(1);

        for (index, segment) in self.segments.iter().enumerate() {
            let want_dir = index < last || self.dirs_only;
            let mut next = Vec::new();
            for dir in &current {
                match segment {
                    Segment::Literal(name) => {
                        let candidate = dir.join(name);
                        if entry_kind_matches(&candidate, want_dir) {
                            next.push(candidate);
                        }
                    }
                    Segment::Wildcard(_) => {
                        for candidate in read_dir_sorted(dir)? {
                            let Some(name) = candidate.file_name().and_then(|n| n.to_str())
                            else {
                                continue;
                            };
                            if segment.matches(name) && entry_kind_matches(&candidate, want_dir) {
                                next.push(candidate);
                            }
                        }
                    }
                }
            }
            current = next;
            if current.is_empty() {
                break;
            }
        }

        if self.segments.is_empty() {
            return Ok(Vec::new());
        }
        current.sort();
        Ok(current)
    }
}

fn entry_kind_matches(path: &Path, want_dir: bool) -> bool {
    if want_dir {
        path.is_dir()
    } else {
        path.is_file()
    }
}

fn read_dir_sorted(dir: &Path) -> ReorgResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(ReorgError::io("list directory", dir, err)),
    };
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| ReorgError::io("list directory", dir, err))?;
        paths.push(entry.path());
    }
    paths.sort();
    Ok(paths)
}

/// Shell-style match of `name` against a segment pattern (`*` and `?`).
pub fn wildcard_match(pattern: &str, name: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let name: Vec<char> = name.chars().collect();
    let (mut p, mut n) = (0usize, 0usize);
    let mut star: Option<usize> = None;
    let mut resume = 0usize;

    while n < name.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == name[n]) {
            p += 1;
            n += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            star = Some(p);
            p += 1;
            resume = n;
        } else if let Some(star_at) = star {
            p = star_at + 1;
            resume += 1;
            n = resume;
        } else {
            return false;
        }
    }
    while p < pattern.len() && pattern[p] == '*' {
        p += 1;
    }
    p == pattern.len()
}

/// Reduces scan results to one path according to `policy`.
///
/// # Errors
/// - `ReorgError::NoMatch` when `matches` is empty.
/// - `ReorgError::Ambiguous` when several paths match under `RequireUnique`.
pub fn select_one(
    what: &'static str,
    pattern: &str,
    mut matches: Vec<PathBuf>,
    policy: MatchPolicy,
) -> ReorgResult<PathBuf> {
    match matches.len() {
        0 => Err(ReorgError::NoMatch {
            what,
            pattern: pattern.to_string(),
        }),
        1 => Ok(matches.remove(0)),
        count => match policy {
            MatchPolicy::FirstMatch => {
                warn!(
                    "event=select_match module=scan status=ambiguous what={} pattern={} count={} chosen={}",
                    what,
                    pattern,
                    count,
                    matches[0].display()
                );
                Ok(matches.remove(0))
            }
            MatchPolicy::RequireUnique => Err(ReorgError::Ambiguous {
                what,
                pattern: pattern.to_string(),
                matches,
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{select_one, wildcard_match, PathPattern};
    use crate::config::MatchPolicy;
    use crate::error::ReorgError;
    use std::fs;
    use std::path::PathBuf;

    #[test]
    fn wildcard_match_handles_star_and_question_mark() {
        assert!(wildcard_match("*.sample.json", "create.sample.json"));
        assert!(wildcard_match("TMF669*", "TMF669_PartyRole"));
        assert!(wildcard_match("TMF66?_*.yaml", "TMF669_conformance.yaml"));
        assert!(!wildcard_match("*.sample.json", "create.example.json"));
        assert!(!wildcard_match("TMF669*", "TMF620_Catalog"));
        assert!(wildcard_match("*", ""));
    }

    #[test]
    fn expand_walks_wildcard_directories_in_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        for api in ["TMF669_B", "TMF620_A"] {
            let samples = dir.path().join("apis").join(api).join("samples");
            fs::create_dir_all(&samples).unwrap();
            fs::write(samples.join("one.sample.json"), "{}").unwrap();
            fs::write(samples.join("notes.txt"), "").unwrap();
        }

        let found = PathPattern::parse("apis/*/samples/*.sample.json")
            .expand(dir.path())
            .unwrap();
        let rel: Vec<PathBuf> = found
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            rel,
            vec![
                PathBuf::from("apis/TMF620_A/samples/one.sample.json"),
                PathBuf::from("apis/TMF669_B/samples/one.sample.json"),
            ]
        );
    }

    #[test]
    fn expand_skips_hidden_entries_and_respects_dir_suffix() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("apis/TMF669_Party")).unwrap();
        fs::create_dir_all(dir.path().join("apis/.TMF669_hidden")).unwrap();
        fs::write(dir.path().join("apis/TMF669_notes.md"), "").unwrap();

        let found = PathPattern::parse("apis/TMF669*/")
            .expand(dir.path())
            .unwrap();
        assert_eq!(found, vec![dir.path().join("apis/TMF669_Party")]);
    }

    #[test]
    fn expand_of_missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let found = PathPattern::parse("schemas/*/Bar.schema.json")
            .expand(&dir.path().join("absent"))
            .unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn select_one_applies_policy() {
        let many = vec![PathBuf::from("a"), PathBuf::from("b")];
        let chosen = select_one("rules file", "x", many.clone(), MatchPolicy::FirstMatch).unwrap();
        assert_eq!(chosen, PathBuf::from("a"));

        let err = select_one("rules file", "x", many, MatchPolicy::RequireUnique).unwrap_err();
        assert!(matches!(err, ReorgError::Ambiguous { .. }));

        let err = select_one("rules file", "x", Vec::new(), MatchPolicy::FirstMatch).unwrap_err();
        assert!(matches!(err, ReorgError::NoMatch { .. }));
    }
}
