//! Build plan assembly.
//!
//! A [`Planner`] collects library declarations and turns them into a
//! [`BuildPlan`] in one all-or-nothing pass:
//!
//! 1. declarations are checked for name uniqueness as they arrive,
//! 2. template files are checked for existence inside their source
//!    directories,
//! 3. groups are put in dependency order,
//! 4. modules are expanded and include/export directories merged.

use std::fmt::{self, Display};
use std::path::Path;

use hdlplan_common::Library;

use crate::config::PlanOptions;
use crate::error::{LoadError, PlanError, ResolutionError};
use crate::expand::{expand_group, InstanceTable};
use crate::fs::{FileSystem, HostFs};
use crate::loader;
use crate::merge::ExportMerger;
use crate::plan::{BuildPlan, ResolvedGroup};
use crate::registry::Registry;
use crate::resolve::GroupGraph;
use crate::warning::PlanWarning;

/// Where a [`Planner`] is in the assembly process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stage {
    /// Nothing declared yet.
    #[default]
    Unloaded,
    /// At least one library declared; more may follow.
    Loading,
    /// Declarations and templates checked.
    Validated,
    /// Groups ordered.
    Resolved,
    /// A plan was produced.
    Exported,
    /// A declaration or template check failed.
    LoadFailed,
    /// Ordering or plan assembly failed.
    ResolutionFailed,
}

impl Stage {
    /// True for the two failure stages.
    pub const fn is_failed(self) -> bool {
        matches!(self, Self::LoadFailed | Self::ResolutionFailed)
    }

    const fn accepts_declarations(self) -> bool {
        matches!(self, Self::Unloaded | Self::Loading)
    }

    const fn can_assemble(self) -> bool {
        matches!(self, Self::Unloaded | Self::Loading | Self::Exported)
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unloaded => "unloaded",
            Self::Loading => "loading",
            Self::Validated => "validated",
            Self::Resolved => "resolved",
            Self::Exported => "exported",
            Self::LoadFailed => "failed to load",
            Self::ResolutionFailed => "failed to resolve",
        };
        f.write_str(s)
    }
}

/// Collects declarations and assembles them into a [`BuildPlan`].
///
/// A failed declaration or assembly leaves the planner in a failed stage;
/// every later call is rejected with [`LoadError::InvalidStage`].
#[derive(Debug)]
pub struct Planner<F: FileSystem = HostFs> {
    registry: Registry,
    fs: F,
    options: PlanOptions,
    stage: Stage,
}

impl Planner<HostFs> {
    /// A planner checking templates on the host file system.
    pub fn new(options: PlanOptions) -> Self {
        Self::with_fs(HostFs, options)
    }
}

impl Default for Planner<HostFs> {
    fn default() -> Self {
        Self::new(PlanOptions::default())
    }
}

impl<F: FileSystem> Planner<F> {
    /// A planner checking templates through `fs`.
    pub fn with_fs(fs: F, options: PlanOptions) -> Self {
        Self {
            registry: Registry::new(),
            fs,
            options,
            stage: Stage::Unloaded,
        }
    }

    /// The current stage.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Options this planner was built with.
    pub fn options(&self) -> &PlanOptions {
        &self.options
    }

    /// Every library declared so far.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Reads a manifest file and declares its library.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::InvalidStage`] once assembly has started, and any
    /// error from [`loader::load_manifest`].
    pub fn load_manifest(&mut self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        self.begin_declaration("load a manifest")?;
        let result = loader::load_manifest(&mut self.registry, path.as_ref());
        self.finish_declaration(result)
    }

    /// Declares a library built in code.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::InvalidStage`] once assembly has started, and any
    /// error from [`Registry::declare_inline`].
    pub fn declare(&mut self, library: Library) -> Result<(), LoadError> {
        self.begin_declaration("declare a library")?;
        let result = self.registry.declare_inline(library);
        self.finish_declaration(result)
    }

    fn begin_declaration(&self, action: &'static str) -> Result<(), LoadError> {
        if self.stage.accepts_declarations() {
            Ok(())
        } else {
            Err(LoadError::InvalidStage {
                action,
                stage: self.stage,
            })
        }
    }

    fn finish_declaration(&mut self, result: Result<(), LoadError>) -> Result<(), LoadError> {
        match result {
            Ok(()) => {
                self.transition(Stage::Loading);
                Ok(())
            },
            Err(e) => {
                self.transition(Stage::LoadFailed);
                Err(e)
            },
        }
    }

    fn transition(&mut self, to: Stage) {
        if self.stage != to {
            tracing::debug!(from = %self.stage, %to, "planner stage");
            self.stage = to;
        }
    }

    /// Validates every declaration and assembles the build plan.
    ///
    /// Calling this again after a successful assembly produces the same plan.
    ///
    /// # Errors
    ///
    /// - [`PlanError::Load`] if a template is missing or lies outside its
    ///   source directory, or the planner is in a stage that cannot assemble,
    /// - [`PlanError::Resolution`] for a missing required dependency, a
    ///   dependency cycle or a repeated instance name,
    /// - [`PlanError::Warnings`] if warnings were produced and
    ///   [`PlanOptions::deny_warnings`] is set.
    pub fn assemble(&mut self) -> Result<BuildPlan, PlanError> {
        if !self.stage.can_assemble() {
            return Err(LoadError::InvalidStage {
                action: "assemble a plan",
                stage: self.stage,
            }
            .into());
        }

        let templates = if self.options.check_templates {
            loader::check_templates(&self.registry, &self.fs)
        } else {
            loader::check_template_locations(&self.registry)
        };
        if let Err(e) = templates {
            self.transition(Stage::LoadFailed);
            return Err(e.into());
        }
        self.transition(Stage::Validated);

        let mut stage = self.stage;
        let result = build_plan(&self.registry, &mut stage);
        self.transition(stage);

        let plan = match result {
            Ok(plan) => plan,
            Err(e) => {
                self.transition(Stage::ResolutionFailed);
                return Err(e.into());
            },
        };

        if self.options.deny_warnings && !plan.is_clean() {
            self.transition(Stage::ResolutionFailed);
            return Err(PlanError::Warnings(plan.warnings));
        }

        self.transition(Stage::Exported);
        tracing::debug!(
            groups = plan.groups.len(),
            warnings = plan.warnings.len(),
            "assembled build plan"
        );
        Ok(plan)
    }
}

/// Orders, expands and merges every declared group.
///
/// Sets `stage` to [`Stage::Resolved`] once the order is known.
fn build_plan(registry: &Registry, stage: &mut Stage) -> Result<BuildPlan, ResolutionError> {
    let mut warnings: Vec<PlanWarning> = Vec::new();
    let graph = GroupGraph::build(registry, &mut warnings)?;
    let order = graph.order()?;
    *stage = Stage::Resolved;

    let mut instances = InstanceTable::new();
    for node in &graph.nodes {
        for (mi, module) in node.group.modules().iter().enumerate() {
            instances.claim(
                module.instance_name(),
                registry.module_location(node.library_index, node.group_index, mi),
            )?;
        }
    }

    let mut merger = ExportMerger::new(&graph);
    let mut groups = Vec::with_capacity(order.len());
    for node in order {
        let current = &graph.nodes[node];
        let expanded_modules = expand_group(current.library, current.group, &mut warnings);
        let dirs = merger.merge(node, &mut warnings);

        groups.push(ResolvedGroup {
            library_name: current.library.name().to_owned(),
            group_name: current.group.name().to_owned(),
            source_dir: current.library.resolve_dir(current.group.source_dir()),
            testbench_dir: current
                .group
                .testbench_dir()
                .map(|dir| current.library.resolve_dir(dir)),
            resolved_include_dirs: dirs.include_dirs,
            resolved_export_dirs: dirs.export_dirs,
            expanded_modules,
        });
    }

    Ok(BuildPlan { groups, warnings })
}
