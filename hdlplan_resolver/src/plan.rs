//! The build plan handed to the downstream toolchain driver.

use std::fmt::{self, Display};
use std::path::{Path, PathBuf};

use hdlplan_common::{ConstantSet, ModuleKind, QualifiedName};
use serde::Serialize;

use crate::warning::PlanWarning;

/// One concrete build unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ExpandedModule {
    /// The instance name, unique across the whole plan.
    pub instance_name: String,
    /// Full path of the template the instance is compiled from.
    pub resolved_template_path: PathBuf,
    /// Constant overrides applied to the template.
    pub constants: ConstantSet,
    /// Source kind of the template.
    pub kind: ModuleKind,
}

/// A module group with its directories resolved and modules expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedGroup {
    /// Library the group belongs to.
    pub library_name: String,
    /// Group name, unique within its library.
    pub group_name: String,
    /// Where the group's templates live.
    pub source_dir: PathBuf,
    /// Testbench sources, if the group declares any.
    pub testbench_dir: Option<PathBuf>,
    /// Search path for compiling this group: its include dirs followed by
    /// the exports of every group it depends on.
    pub resolved_include_dirs: Vec<PathBuf>,
    /// What this group makes visible to its dependents, including the
    /// exports it inherited.
    pub resolved_export_dirs: Vec<PathBuf>,
    /// One entry per declared module, in declaration order.
    pub expanded_modules: Vec<ExpandedModule>,
}

impl ResolvedGroup {
    /// `library.group`.
    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName::new(&self.library_name, &self.group_name)
    }

    /// Looks up an expanded module by instance name.
    pub fn module(&self, instance_name: &str) -> Option<&ExpandedModule> {
        self.expanded_modules
            .iter()
            .find(|m| m.instance_name == instance_name)
    }
}

/// The dependency-ordered result of plan assembly.
///
/// Every group appears after all groups of the libraries it depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildPlan {
    /// Groups in build order.
    pub groups: Vec<ResolvedGroup>,
    /// Recoverable problems found during assembly.
    pub warnings: Vec<PlanWarning>,
}

impl BuildPlan {
    /// The build order as qualified group names.
    pub fn order(&self) -> Vec<QualifiedName> {
        self.groups.iter().map(ResolvedGroup::qualified_name).collect()
    }

    /// Looks up a group by library and group name.
    pub fn group(&self, library: &str, group: &str) -> Option<&ResolvedGroup> {
        self.groups
            .iter()
            .find(|g| g.library_name == library && g.group_name == group)
    }

    /// Position of a group in the build order.
    pub fn position(&self, library: &str, group: &str) -> Option<usize> {
        self.groups
            .iter()
            .position(|g| g.library_name == library && g.group_name == group)
    }

    /// Every expanded module in build order.
    pub fn modules(&self) -> impl Iterator<Item = &ExpandedModule> {
        self.groups.iter().flat_map(|g| g.expanded_modules.iter())
    }

    /// True when assembly produced no warnings.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

fn write_dirs(f: &mut fmt::Formatter<'_>, label: &str, dirs: &[PathBuf]) -> fmt::Result {
    writeln!(f, "    {label}:")?;
    for dir in dirs {
        writeln!(f, "      {}", dir.display())?;
    }
    Ok(())
}

fn display_opt(path: Option<&Path>) -> String {
    path.map_or_else(|| "-".to_owned(), |p| p.display().to_string())
}

impl Display for BuildPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, group) in self.groups.iter().enumerate() {
            writeln!(f, "{i}: {}", group.qualified_name())?;
            writeln!(f, "    source: {}", group.source_dir.display())?;
            writeln!(
                f,
                "    testbench: {}",
                display_opt(group.testbench_dir.as_deref())
            )?;
            write_dirs(f, "include", &group.resolved_include_dirs)?;
            write_dirs(f, "export", &group.resolved_export_dirs)?;
            writeln!(f, "    modules:")?;
            for module in &group.expanded_modules {
                write!(
                    f,
                    "      {} <- {}",
                    module.instance_name,
                    module.resolved_template_path.display()
                )?;
                if !module.constants.is_empty() {
                    write!(f, " {}", module.constants)?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
