//! Registry of declared libraries.
//!
//! A `Registry` is created when a configuration load starts and dropped once
//! the plan is assembled (or assembly fails). It owns the declarations and
//! enforces name uniqueness at declaration time:
//!
//! - library names are unique within the registry,
//! - group names are unique within their library,
//! - module instance names are unique within their group.
//!
//! Uniqueness of instance names across groups can only be checked once the
//! whole plan is known; that happens during assembly.

use std::collections::HashMap;

use hdlplan_common::{Library, ModuleGroup};

use crate::error::{DuplicateName, LoadError, NameKind};
use crate::location::{Location, Origin};

/// Declared libraries in declaration order.
#[derive(Debug, Default)]
pub struct Registry {
    /// Libraries in declaration order.
    libraries: Vec<Library>,
    /// Origin of each library, aligned with `libraries`.
    origins: Vec<Origin>,
    /// Library name to index.
    by_name: HashMap<String, usize>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a library loaded from `origin`.
    ///
    /// The declaration is all-or-nothing: if any name inside the library is
    /// invalid or duplicated the registry is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::InvalidDeclaration`] for empty names and
    /// [`LoadError::DuplicateName`] for names already taken in their scope.
    pub fn declare(&mut self, library: Library, origin: Origin) -> Result<(), LoadError> {
        if library.name().is_empty() {
            return Err(LoadError::invalid(
                Location::library(&origin),
                "library name is empty",
            ));
        }
        if let Some(&existing) = self.by_name.get(library.name()) {
            return Err(DuplicateName {
                kind: NameKind::Library,
                name: library.name().to_owned(),
                first: Location::library(&self.origins[existing]),
                second: Location::library(&origin),
            }
            .into());
        }

        Self::check_groups(&library, &origin)?;

        tracing::debug!(
            library = library.name(),
            groups = library.groups().len(),
            %origin,
            "declared library"
        );

        self.by_name
            .insert(library.name().to_owned(), self.libraries.len());
        self.libraries.push(library);
        self.origins.push(origin);
        Ok(())
    }

    /// Declare a library built in code rather than read from a manifest.
    ///
    /// # Errors
    ///
    /// Same as [`Registry::declare`].
    pub fn declare_inline(&mut self, library: Library) -> Result<(), LoadError> {
        let origin = Origin::Inline(self.libraries.len());
        self.declare(library, origin)
    }

    /// Group and module names within one library.
    fn check_groups(library: &Library, origin: &Origin) -> Result<(), LoadError> {
        let mut groups: HashMap<&str, usize> = HashMap::new();
        for (gi, group) in library.groups().iter().enumerate() {
            if group.name().is_empty() {
                return Err(LoadError::invalid(
                    Location::group(origin, gi),
                    "module group name is empty",
                ));
            }
            if let Some(&first) = groups.get(group.name()) {
                return Err(DuplicateName {
                    kind: NameKind::Group,
                    name: group.name().to_owned(),
                    first: Location::group(origin, first),
                    second: Location::group(origin, gi),
                }
                .into());
            }
            groups.insert(group.name(), gi);

            Self::check_modules(group, gi, origin)?;
        }
        Ok(())
    }

    fn check_modules(group: &ModuleGroup, gi: usize, origin: &Origin) -> Result<(), LoadError> {
        let mut modules: HashMap<&str, usize> = HashMap::new();
        for (mi, module) in group.modules().iter().enumerate() {
            if module.instance_name().is_empty() {
                return Err(LoadError::invalid(
                    Location::module(origin, gi, mi),
                    "module instance name is empty",
                ));
            }
            if module.template_file().is_empty() {
                return Err(LoadError::invalid(
                    Location::module(origin, gi, mi),
                    "module template name is empty",
                ));
            }
            if let Some(&first) = modules.get(module.instance_name()) {
                return Err(DuplicateName {
                    kind: NameKind::Module,
                    name: module.instance_name().to_owned(),
                    first: Location::module(origin, gi, first),
                    second: Location::module(origin, gi, mi),
                }
                .into());
            }
            modules.insert(module.instance_name(), mi);
        }
        Ok(())
    }

    /// Check if a library is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Declaration index of a library.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Where the library at `index` was declared.
    pub fn origin(&self, index: usize) -> Option<&Origin> {
        self.origins.get(index)
    }

    /// All libraries in declaration order.
    pub fn libraries(&self) -> &[Library] {
        &self.libraries
    }

    /// Number of declared libraries.
    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    /// Every group with its library, libraries first then groups, both in
    /// declaration order. The indices are `(library, group)` positions.
    pub fn groups(&self) -> impl Iterator<Item = ((usize, usize), &Library, &ModuleGroup)> {
        self.libraries.iter().enumerate().flat_map(|(li, library)| {
            library
                .groups()
                .iter()
                .enumerate()
                .map(move |(gi, group)| ((li, gi), library, group))
        })
    }

    /// Location of module `mi` of group `gi` of library `li`.
    ///
    /// # Panics
    ///
    /// Panics if `li` is not a declared library index.
    pub fn module_location(&self, li: usize, gi: usize, mi: usize) -> Location {
        Location::module(&self.origins[li], gi, mi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdlplan_common::ModuleDescriptor;

    fn std_lib() -> Library {
        Library::new("std", "/lib/std").with_group(
            ModuleGroup::new("srams", "cdl").with_module(ModuleDescriptor::new("sram_1rw")),
        )
    }

    #[test]
    fn test_registry_declare() {
        let mut registry = Registry::new();
        registry.declare_inline(std_lib()).unwrap();

        assert!(registry.contains("std"));
        assert!(!registry.contains("utils"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.origin(0), Some(&Origin::Inline(0)));
    }

    #[test]
    fn test_registry_duplicate_library() {
        let mut registry = Registry::new();
        registry
            .declare(std_lib(), Origin::Manifest("a/library.toml".into()))
            .unwrap();

        let err = registry
            .declare(std_lib(), Origin::Manifest("b/library.toml".into()))
            .unwrap_err();

        match err {
            LoadError::DuplicateName(dup) => {
                assert_eq!(dup.kind, NameKind::Library);
                assert_eq!(dup.name, "std");
                assert_eq!(dup.first.origin, Origin::Manifest("a/library.toml".into()));
                assert_eq!(dup.second.origin, Origin::Manifest("b/library.toml".into()));
            },
            other => panic!("unexpected error: {other}"),
        }
        // First declaration wins
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_duplicate_group() {
        let library = std_lib().with_group(ModuleGroup::new("srams", "cdl2"));

        let err = Registry::new().declare_inline(library).unwrap_err();
        match err {
            LoadError::DuplicateName(dup) => {
                assert_eq!(dup.kind, NameKind::Group);
                assert_eq!(dup.first.item, "groups[0]");
                assert_eq!(dup.second.item, "groups[1]");
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_registry_duplicate_module_leaves_registry_unchanged() {
        let library = Library::new("utils", "/lib/utils").with_group(
            ModuleGroup::new("apb", "cdl")
                .with_module(ModuleDescriptor::new("apb_target"))
                .with_module(ModuleDescriptor::new("apb_target").with_template("other")),
        );

        let mut registry = Registry::new();
        let err = registry.declare_inline(library).unwrap_err();
        assert!(matches!(
            err,
            LoadError::DuplicateName(DuplicateName {
                kind: NameKind::Module,
                ..
            })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_registry_empty_name() {
        let err = Registry::new()
            .declare_inline(Library::new("", "/lib"))
            .unwrap_err();
        assert!(matches!(err, LoadError::InvalidDeclaration { .. }));
    }

    #[test]
    fn test_registry_groups_in_declaration_order() {
        let mut registry = Registry::new();
        registry.declare_inline(std_lib()).unwrap();
        registry
            .declare_inline(
                Library::new("utils", "/lib/utils")
                    .with_group(ModuleGroup::new("apb", "cdl"))
                    .with_group(ModuleGroup::new("axi", "cdl")),
            )
            .unwrap();

        let names: Vec<String> = registry
            .groups()
            .map(|(_, library, group)| library.qualified(group).to_string())
            .collect();
        assert_eq!(names, vec!["std.srams", "utils.apb", "utils.axi"]);
    }
}
