//! On-disk library manifest schema.
//!
//! One manifest describes one library. Group directories are relative to the
//! library root, which defaults to the directory holding the manifest.
//!
//! ```toml
//! [library]
//! name = "reve_r"
//!
//! [[groups]]
//! name = "pipeline"
//! src_dir = "cdl"
//! tb_src_dir = "tb_cdl"
//! include_dirs = ["cdl"]
//! libraries = { std = true, utils = true }
//!
//! [[groups.modules]]
//! name = "reve_r_alu"
//! ```

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::{ConstantSet, Library, ModuleDescriptor, ModuleGroup, ModuleKind};

/// A parsed library manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// The `[library]` table.
    pub library: LibrarySection,
    /// The `[[groups]]` array.
    #[serde(default)]
    pub groups: Vec<GroupSection>,
}

/// The `[library]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LibrarySection {
    /// Library name.
    pub name: String,
    /// Library root; relative roots are taken from the manifest directory.
    #[serde(default)]
    pub root: Option<PathBuf>,
}

/// One `[[groups]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupSection {
    /// Group name.
    pub name: String,
    /// Module source directory.
    pub src_dir: PathBuf,
    /// Testbench source directory.
    #[serde(default)]
    pub tb_src_dir: Option<PathBuf>,
    /// Include search directories.
    #[serde(default, alias = "cdl_include_dirs")]
    pub include_dirs: Vec<PathBuf>,
    /// Extra exports on top of `include_dirs` and `src_dir`.
    #[serde(default)]
    pub export_dirs: Vec<PathBuf>,
    /// Library dependencies, `name = required`.
    #[serde(default)]
    pub libraries: IndexMap<String, bool>,
    /// The `[[groups.modules]]` array.
    #[serde(default)]
    pub modules: Vec<ModuleSection>,
}

/// One `[[groups.modules]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleSection {
    /// Instance name.
    pub name: String,
    /// Template file; defaults to `name`.
    #[serde(default)]
    pub template: Option<String>,
    /// Source kind of the template.
    #[serde(default)]
    pub kind: ModuleKind,
    /// Constant overrides for this instance.
    #[serde(default)]
    pub constants: ConstantSet,
}

impl Manifest {
    /// Parses a manifest from TOML text.
    ///
    /// # Errors
    ///
    /// Returns the TOML error when the text is malformed or does not match
    /// the schema.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Converts the manifest into a [`Library`], resolving the root against
    /// `manifest_dir`.
    #[must_use]
    pub fn into_library(self, manifest_dir: &Path) -> Library {
        let root = match self.library.root {
            Some(root) => manifest_dir.join(root),
            None => manifest_dir.to_path_buf(),
        };

        self.groups
            .into_iter()
            .fold(Library::new(self.library.name, root), |library, section| {
                library.with_group(section.into_group())
            })
    }
}

impl GroupSection {
    fn into_group(self) -> ModuleGroup {
        let mut group = ModuleGroup::new(self.name, self.src_dir);
        if let Some(tb) = self.tb_src_dir {
            group = group.with_testbench_dir(tb);
        }
        for dir in self.include_dirs {
            group = group.with_include_dir(dir);
        }
        for dir in self.export_dirs {
            group = group.with_export_dir(dir);
        }
        for (library, required) in &self.libraries {
            group = group.with_dependency(library, *required);
        }
        for module in self.modules {
            group = group.with_module(module.into_descriptor());
        }
        group
    }
}

impl ModuleSection {
    fn into_descriptor(self) -> ModuleDescriptor {
        let desc = ModuleDescriptor::new(self.name)
            .with_kind(self.kind)
            .with_constants(self.constants);
        match self.template {
            Some(template) => desc.with_template(template),
            None => desc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConstantValue;

    const PIPELINE: &str = r#"
        [library]
        name = "reve_r"

        [[groups]]
        name = "pipeline"
        src_dir = "cdl"
        tb_src_dir = "tb_cdl"
        cdl_include_dirs = ["cdl"]
        libraries = { utils = true, std = false }

        [[groups.modules]]
        name = "reve_r_alu"

        [[groups.modules]]
        name = "x"
        template = "base"
        constants = { mode = 1, e32 = true }
    "#;

    #[test]
    fn test_parse_pipeline_manifest() {
        let library = Manifest::parse(PIPELINE)
            .unwrap()
            .into_library(Path::new("/lib/reve_r"));

        assert_eq!(library.name(), "reve_r");
        assert_eq!(library.root(), Path::new("/lib/reve_r"));

        let group = library.group("pipeline").unwrap();
        assert_eq!(group.testbench_dir(), Some(Path::new("tb_cdl")));
        assert_eq!(group.include_dirs(), &[PathBuf::from("cdl")]);

        let deps: Vec<_> = group.dependencies().map(|d| d.library).collect();
        assert_eq!(deps, vec!["utils", "std"]);

        let x = &group.modules()[1];
        assert_eq!(x.template_file(), "base");
        assert_eq!(x.constants().get("mode"), Some(ConstantValue::Int(1)));
        assert_eq!(x.constants().get("e32"), Some(ConstantValue::Bool(true)));
    }

    #[test]
    fn test_relative_root() {
        let library = Manifest::parse("[library]\nname = \"std\"\nroot = \"src\"\n")
            .unwrap()
            .into_library(Path::new("/lib/std"));
        assert_eq!(library.root(), Path::new("/lib/std/src"));
        assert!(library.groups().is_empty());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let text = "[library]\nname = \"std\"\nversion = 2\n";
        assert!(Manifest::parse(text).is_err());
    }
}
