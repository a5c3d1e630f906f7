//! Descriptor loading and validation.
//!
//! Reading a manifest turns it into a [`Library`] and declares it in a
//! [`Registry`]; once every library is declared, [`check_templates`] confirms
//! that each module's template can be found under its group's source
//! directory. [`check_template_locations`] does the same without touching
//! the file system, for plans whose sources are generated later.

use std::path::Path;

use hdlplan_common::{Library, Manifest, ModuleGroup};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{LoadError, UnknownTemplate};
use crate::fs::FileSystem;
use crate::location::Origin;
use crate::registry::Registry;

/// Reads and parses one manifest file.
///
/// The library root is resolved against the manifest's directory.
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the file cannot be read and
/// [`LoadError::Parse`] if it is not a valid manifest.
pub fn read_manifest(path: &Path) -> Result<Library, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_manifest(&text, path)
}

/// Parses manifest text as if it had been read from `path`.
///
/// # Errors
///
/// Returns [`LoadError::Parse`] if the text is not a valid manifest.
pub fn parse_manifest(text: &str, path: &Path) -> Result<Library, LoadError> {
    let manifest = Manifest::parse(text).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    Ok(manifest.into_library(dir))
}

/// Reads a manifest and declares its library.
///
/// # Errors
///
/// Any error from [`read_manifest`] or [`Registry::declare`].
pub fn load_manifest(registry: &mut Registry, path: &Path) -> Result<(), LoadError> {
    let library = read_manifest(path)?;
    tracing::debug!(path = %path.display(), library = library.name(), "read manifest");
    registry.declare(library, Origin::Manifest(path.to_path_buf()))
}

/// Checks that every declared module template exists under its group's
/// source directory.
///
/// All missing templates are collected before failing so a single run
/// reports every one of them, in declaration order.
///
/// # Errors
///
/// Returns [`LoadError::UnknownTemplate`] listing every missing template.
pub fn check_templates<F: FileSystem>(registry: &Registry, fs: &F) -> Result<(), LoadError> {
    unknown_templates(registry, |path| fs.is_file(path))
}

/// Checks only that every template path stays inside its group's source
/// directory.
///
/// # Errors
///
/// Returns [`LoadError::UnknownTemplate`] listing every template that is
/// absolute or climbs out of its source directory.
pub fn check_template_locations(registry: &Registry) -> Result<(), LoadError> {
    unknown_templates(registry, |_| true)
}

fn unknown_templates<P>(registry: &Registry, exists: P) -> Result<(), LoadError>
where
    P: Fn(&Path) -> bool + Sync,
{
    let groups: Vec<(&Library, &ModuleGroup)> = registry
        .groups()
        .map(|(_, library, group)| (library, group))
        .collect();

    #[cfg(feature = "parallel")]
    let per_group: Vec<Vec<UnknownTemplate>> = groups
        .par_iter()
        .map(|(library, group)| missing_templates(library, group, &exists))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let per_group: Vec<Vec<UnknownTemplate>> = groups
        .iter()
        .map(|(library, group)| missing_templates(library, group, &exists))
        .collect();

    let missing: Vec<UnknownTemplate> = per_group.into_iter().flatten().collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(LoadError::UnknownTemplate(missing))
    }
}

fn missing_templates<P>(library: &Library, group: &ModuleGroup, exists: &P) -> Vec<UnknownTemplate>
where
    P: Fn(&Path) -> bool,
{
    group
        .modules()
        .iter()
        .filter_map(|module| {
            let path = library.template_path(group, module);
            if library.template_in_source_dir(group, module) && exists(&path) {
                None
            } else {
                Some(UnknownTemplate {
                    group: library.qualified(group),
                    module: module.instance_name().to_owned(),
                    path,
                })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFs;
    use hdlplan_common::ModuleDescriptor;
    use std::path::PathBuf;

    #[test]
    fn test_parse_manifest_root_from_path() {
        let library = parse_manifest(
            "[library]\nname = \"std\"\n",
            Path::new("/lib/std/library.toml"),
        )
        .unwrap();
        assert_eq!(library.root(), Path::new("/lib/std"));
    }

    #[test]
    fn test_parse_manifest_error_names_path() {
        let err = parse_manifest("[library", Path::new("broken.toml")).unwrap_err();
        assert!(matches!(err, LoadError::Parse { ref path, .. } if path == Path::new("broken.toml")));
    }

    #[test]
    fn test_check_templates_collects_all() {
        let mut registry = Registry::new();
        registry
            .declare_inline(
                Library::new("reve_r", "/lib/reve_r").with_group(
                    ModuleGroup::new("pipeline", "cdl")
                        .with_module(ModuleDescriptor::new("reve_r_alu"))
                        .with_module(ModuleDescriptor::new("reve_r_decode"))
                        .with_module(ModuleDescriptor::new("reve_r_fetch")),
                ),
            )
            .unwrap();

        let fs = MemoryFs::new().with_file("/lib/reve_r/cdl/reve_r_decode.cdl");

        let err = check_templates(&registry, &fs).unwrap_err();
        let LoadError::UnknownTemplate(missing) = err else {
            panic!("expected unknown template error");
        };
        let modules: Vec<&str> = missing.iter().map(|m| m.module.as_str()).collect();
        assert_eq!(modules, vec!["reve_r_alu", "reve_r_fetch"]);
        assert_eq!(
            missing[0].path,
            PathBuf::from("/lib/reve_r/cdl/reve_r_alu.cdl")
        );
    }

    #[test]
    fn test_templates_outside_source_dir_are_unknown() {
        let mut registry = Registry::new();
        registry
            .declare_inline(
                Library::new("a", "/lib/a").with_group(
                    ModuleGroup::new("g", "cdl")
                        .with_module(
                            ModuleDescriptor::new("x").with_template("../../../etc/hostname.txt"),
                        )
                        .with_module(ModuleDescriptor::new("y").with_template("/abs/elsewhere"))
                        .with_module(ModuleDescriptor::new("z").with_template("sub/../z")),
                ),
            )
            .unwrap();

        // Every path exists, so only the location can reject them
        let fs = MemoryFs::new()
            .with_file("/etc/hostname.txt.cdl")
            .with_file("/abs/elsewhere.cdl")
            .with_file("/lib/a/cdl/z.cdl");

        for result in [
            check_templates(&registry, &fs),
            check_template_locations(&registry),
        ] {
            let Err(LoadError::UnknownTemplate(missing)) = result else {
                panic!("expected unknown template error");
            };
            let modules: Vec<&str> = missing.iter().map(|m| m.module.as_str()).collect();
            assert_eq!(modules, vec!["x", "y"]);
            assert_eq!(missing[1].path, PathBuf::from("/abs/elsewhere.cdl"));
        }
    }
}
