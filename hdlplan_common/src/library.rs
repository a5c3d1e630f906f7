//! Libraries: the unit module groups depend on.

use std::path::{Path, PathBuf};

use crate::paths::normalize;
use crate::{ModuleDescriptor, ModuleGroup, QualifiedName};

/// A named namespace owning module groups; the unit groups depend on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Library {
    name: String,
    root: PathBuf,
    groups: Vec<ModuleGroup>,
}

impl Library {
    /// Creates an empty library whose group directories are relative to `root`.
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            groups: Vec::new(),
        }
    }

    /// Appends a module group.
    #[must_use]
    pub fn with_group(mut self, group: ModuleGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// The library name, unique within a registry.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The directory group directories are relative to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Groups in declaration order.
    pub fn groups(&self) -> &[ModuleGroup] {
        &self.groups
    }

    /// Looks up a group by name.
    pub fn group(&self, name: &str) -> Option<&ModuleGroup> {
        self.groups.iter().find(|g| g.name() == name)
    }

    /// The `library.group` name of one of this library's groups.
    pub fn qualified(&self, group: &ModuleGroup) -> QualifiedName {
        QualifiedName::new(&self.name, group.name())
    }

    /// Joins a declared directory onto the library root and normalizes it.
    pub fn resolve_dir(&self, dir: &Path) -> PathBuf {
        normalize(&self.root.join(dir))
    }

    /// Full path of the template a module in `group` is built from.
    ///
    /// The path is not confined to the group's source directory; see
    /// [`Library::template_in_source_dir`].
    pub fn template_path(&self, group: &ModuleGroup, module: &ModuleDescriptor) -> PathBuf {
        normalize(
            &self
                .root
                .join(group.source_dir())
                .join(module.template_file_name()),
        )
    }

    /// True when the module's template resolves inside the group's source
    /// directory. Absolute templates and templates climbing out with `..`
    /// do not.
    pub fn template_in_source_dir(&self, group: &ModuleGroup, module: &ModuleDescriptor) -> bool {
        self.template_path(group, module)
            .starts_with(self.resolve_dir(group.source_dir()))
    }
}
