//! Lexical path helpers.
//!
//! Declared directories may not exist yet when a plan is assembled, so paths
//! are compared after lexical normalization rather than canonicalization.

use std::path::{Component, Path, PathBuf};

/// Removes `.` components and folds `..` into the preceding component.
///
/// A leading `..` on a relative path is kept since there is nothing to fold
/// it into.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                },
                Some(Component::RootDir | Component::Prefix(_)) => {},
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// The logical name of an exported directory: its final component.
pub fn logical_name(dir: &Path) -> Option<&str> {
    dir.file_name().and_then(|n| n.to_str())
}
