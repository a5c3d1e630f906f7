//! Error types for plan assembly.
//!
//! Failures are split by the stage that produces them: [`LoadError`] while
//! declarations are read and validated, [`ResolutionError`] while the
//! dependency graph is ordered and the plan is assembled. Either one aborts
//! assembly; no partial plan is returned.

use std::fmt::{self, Display};
use std::path::PathBuf;

use hdlplan_common::QualifiedName;
use itertools::Itertools;
use thiserror::Error;

use crate::location::Location;
use crate::planner::Stage;
use crate::warning::PlanWarning;

/// Which namespace a duplicate name collided in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameKind {
    /// Two libraries in one registry.
    Library,
    /// Two groups within one library.
    Group,
    /// Two modules within one group.
    Module,
    /// Two expanded build units anywhere in the plan.
    Instance,
}

impl Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Library => "library",
            Self::Group => "module group",
            Self::Module => "module",
            Self::Instance => "instance",
        };
        f.write_str(s)
    }
}

/// A name declared twice in the same namespace.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Duplicate {kind} name '{name}' declared at {first} and {second}")]
pub struct DuplicateName {
    /// The namespace the collision happened in.
    pub kind: NameKind,
    /// The colliding name.
    pub name: String,
    /// The earlier declaration.
    pub first: Location,
    /// The later declaration.
    pub second: Location,
}

/// A module whose template file could not be found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTemplate {
    /// The group declaring the module.
    pub group: QualifiedName,
    /// The module's instance name.
    pub module: String,
    /// Where the template was expected.
    pub path: PathBuf,
}

impl Display for UnknownTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "template for module '{}' in {} not found at {}",
            self.module,
            self.group,
            self.path.display()
        )
    }
}

/// Errors raised while loading and validating declarations.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The manifest file could not be read.
    #[error("Failed to read manifest {}: {source}", .path.display())]
    Io {
        /// The manifest path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The manifest is not valid TOML or does not match the schema.
    #[error("Failed to parse manifest {}: {source}", .path.display())]
    Parse {
        /// The manifest path.
        path: PathBuf,
        /// The underlying TOML error.
        source: toml::de::Error,
    },

    /// A declaration is structurally invalid (for example an empty name).
    #[error("Invalid declaration at {location}: {reason}")]
    InvalidDeclaration {
        /// Where the declaration was made.
        location: Location,
        /// What is wrong with it.
        reason: String,
    },

    /// A library, group or module name was declared twice.
    #[error(transparent)]
    DuplicateName(#[from] DuplicateName),

    /// One or more module templates do not exist.
    #[error("{} template file(s) not found: {}", .0.len(), .0.iter().join("; "))]
    UnknownTemplate(Vec<UnknownTemplate>),

    /// The planner was asked to do something its current stage forbids.
    #[error("Cannot {action} while the planner is {stage}")]
    InvalidStage {
        /// The rejected operation.
        action: &'static str,
        /// The planner stage at the time.
        stage: Stage,
    },
}

impl LoadError {
    /// Create an invalid declaration error.
    pub fn invalid(location: Location, reason: impl Into<String>) -> Self {
        Self::InvalidDeclaration {
            location,
            reason: reason.into(),
        }
    }
}

/// Errors raised while ordering groups and assembling the plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// A required dependency names an undeclared library.
    #[error("Module group {requested_by} requires library '{library}', which is not declared")]
    MissingDependency {
        /// The missing library.
        library: String,
        /// The group declaring the dependency.
        requested_by: QualifiedName,
    },

    /// The dependency graph contains a cycle.
    ///
    /// The cycle starts and ends at the same group; every consecutive pair is
    /// a dependency edge.
    #[error("Dependency cycle: {}", .cycle.iter().join(" -> "))]
    CyclicDependency {
        /// The closed walk of group names.
        cycle: Vec<QualifiedName>,
    },

    /// Two expanded build units share an instance name.
    #[error(transparent)]
    DuplicateName(#[from] DuplicateName),
}

impl ResolutionError {
    /// Create a missing dependency error.
    pub fn missing_dep(library: impl Into<String>, requested_by: QualifiedName) -> Self {
        Self::MissingDependency {
            library: library.into(),
            requested_by,
        }
    }
}

/// Any failure of plan assembly.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Loading or validation failed.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Dependency resolution or plan assembly failed.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// Warnings were produced and the options deny them.
    #[error("{} warning(s) denied: {}", .0.len(), .0.iter().join("; "))]
    Warnings(Vec<PlanWarning>),
}
