//! Path re-rooting between the old and new trees.

use crate::error::{ReorgError, ReorgResult};
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

const SCHEMAS_SEGMENT: &str = "schemas";
const TMF_SEGMENT: &str = "Tmf";

/// Replaces the `from_root` prefix of `path` with `to_root`.
///
/// # Errors
/// - `ReorgError::Config` when `path` is not located under `from_root`.
pub fn rebase(path: &Path, from_root: &Path, to_root: &Path) -> ReorgResult<PathBuf> {
    Ok(to_root.join(relative_to(path, from_root)?))
}

/// Part of `path` below `root`.
pub fn relative_to<'p>(path: &'p Path, root: &Path) -> ReorgResult<&'p Path> {
    path.strip_prefix(root).map_err(|_| {
        ReorgError::Config(format!(
            "`{}` is not under `{}`",
            path.display(),
            root.display()
        ))
    })
}

/// Follows every `schemas` component of a relative path with a `Tmf` component.
pub fn insert_tmf_segment(relative: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in relative.components() {
        out.push(component.as_os_str());
        if let Component::Normal(name) = component {
            if name == OsStr::new(SCHEMAS_SEGMENT) {
                out.push(TMF_SEGMENT);
            }
        }
    }
    out
}

/// Containing directory of `path`, or an empty path for bare file names.
pub fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

/// UTF-8 file name of `path`.
pub fn file_name_str(path: &Path) -> ReorgResult<&str> {
    path.file_name()
        .and_then(OsStr::to_str)
        .ok_or_else(|| ReorgError::InvalidFileName(path.to_path_buf()))
}
