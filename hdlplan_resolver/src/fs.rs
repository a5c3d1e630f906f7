//! File-system collaborator used for template existence checks.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use hdlplan_common::paths::normalize;

/// Answers whether a template file exists.
///
/// Checks are independent of each other, so implementations must be safe to
/// call from several threads.
pub trait FileSystem: Send + Sync {
    /// True when `path` names an existing regular file.
    fn is_file(&self, path: &Path) -> bool;
}

/// The host file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostFs;

impl FileSystem for HostFs {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// An in-memory set of files, for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    files: HashSet<PathBuf>,
}

impl MemoryFs {
    /// No files.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file; the path is normalized first.
    #[must_use]
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.insert(path);
        self
    }

    /// Adds a file in place; the path is normalized first.
    pub fn insert(&mut self, path: impl AsRef<Path>) {
        self.files.insert(normalize(path.as_ref()));
    }
}

impl FileSystem for MemoryFs {
    fn is_file(&self, path: &Path) -> bool {
        self.files.contains(&normalize(path))
    }
}

impl<F: FileSystem + ?Sized> FileSystem for &F {
    fn is_file(&self, path: &Path) -> bool {
        (**self).is_file(path)
    }
}
