//! Module groups: descriptors sharing directories and dependencies.

use std::path::{Path, PathBuf};

use contracts::*;
use indexmap::IndexMap;
use itertools::Itertools;

use crate::ModuleDescriptor;

/// A dependency of a module group on a library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dependency<'a> {
    /// Name of the library depended upon.
    pub library: &'a str,
    /// Whether a missing library is an error (`true`) or ignored (`false`).
    pub required: bool,
}

/// A named collection of module descriptors.
///
/// Directories are stored as declared, relative to the owning library's
/// root; [`crate::Library::resolve_dir`] turns them into full paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleGroup {
    name: String,
    source_dir: PathBuf,
    testbench_dir: Option<PathBuf>,
    include_dirs: Vec<PathBuf>,
    extra_export_dirs: Vec<PathBuf>,
    dependencies: IndexMap<String, bool>,
    modules: Vec<ModuleDescriptor>,
}

impl ModuleGroup {
    /// Creates an empty group compiled from `source_dir`.
    pub fn new(name: impl Into<String>, source_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            source_dir: source_dir.into(),
            testbench_dir: None,
            include_dirs: Vec::new(),
            extra_export_dirs: Vec::new(),
            dependencies: IndexMap::new(),
            modules: Vec::new(),
        }
    }

    /// Sets the testbench source directory.
    #[must_use]
    pub fn with_testbench_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.testbench_dir = Some(dir.into());
        self
    }

    /// Appends an include directory.
    #[must_use]
    #[ensures(ret.include_dirs.len() == old(self.include_dirs.len()) + 1)]
    pub fn with_include_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.include_dirs.push(dir.into());
        self
    }

    /// Appends an export directory on top of the implicit
    /// `include_dirs ∪ {source_dir}` exports.
    #[must_use]
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.extra_export_dirs.push(dir.into());
        self
    }

    /// Declares a dependency on `library`.
    ///
    /// Redeclaring a library keeps its original position and updates the flag.
    #[must_use]
    #[ensures(ret.dependencies.get(library) == Some(&required))]
    pub fn with_dependency(mut self, library: &str, required: bool) -> Self {
        self.dependencies.insert(library.to_owned(), required);
        self
    }

    /// Appends a module descriptor.
    #[must_use]
    pub fn with_module(mut self, module: ModuleDescriptor) -> Self {
        self.modules.push(module);
        self
    }

    /// The group name, unique within its library.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source directory, relative to the library root.
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Testbench directory, relative to the library root.
    #[must_use]
    pub fn testbench_dir(&self) -> Option<&Path> {
        self.testbench_dir.as_deref()
    }

    /// Include directories in declaration order.
    #[must_use]
    pub fn include_dirs(&self) -> &[PathBuf] {
        &self.include_dirs
    }

    /// The directories this group exports to its dependents.
    ///
    /// Always `include_dirs`, then `source_dir`, then any extra exports, with
    /// repeats removed.
    #[must_use]
    pub fn export_dirs(&self) -> Vec<PathBuf> {
        self.include_dirs
            .iter()
            .chain(std::iter::once(&self.source_dir))
            .chain(&self.extra_export_dirs)
            .unique()
            .cloned()
            .collect()
    }

    /// Dependencies in declaration order.
    pub fn dependencies(&self) -> impl Iterator<Item = Dependency<'_>> {
        self.dependencies
            .iter()
            .map(|(library, &required)| Dependency { library, required })
    }

    /// Module descriptors in declaration order.
    #[must_use]
    pub fn modules(&self) -> &[ModuleDescriptor] {
        &self.modules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_dirs_default() {
        let group = ModuleGroup::new("pipeline", "cdl").with_include_dir("inc");
        assert_eq!(
            group.export_dirs(),
            vec![PathBuf::from("inc"), PathBuf::from("cdl")]
        );
    }

    #[test]
    fn test_export_dirs_no_repeat() {
        let group = ModuleGroup::new("pipeline", "cdl")
            .with_include_dir("cdl")
            .with_export_dir("gen")
            .with_export_dir("cdl");
        assert_eq!(
            group.export_dirs(),
            vec![PathBuf::from("cdl"), PathBuf::from("gen")]
        );
    }

    #[test]
    fn test_dependency_order() {
        let group = ModuleGroup::new("pipeline", "cdl")
            .with_dependency("std", true)
            .with_dependency("utils", false);
        let deps: Vec<_> = group.dependencies().collect();
        assert_eq!(
            deps,
            vec![
                Dependency {
                    library: "std",
                    required: true
                },
                Dependency {
                    library: "utils",
                    required: false
                },
            ]
        );
    }
}
