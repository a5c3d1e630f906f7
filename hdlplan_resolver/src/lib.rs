//! Build plan resolution for hdlplan.
//!
//! This crate takes declared libraries and module groups, validates them,
//! orders groups by their library dependencies, expands module variants and
//! merges include/export directories into a [`BuildPlan`] for the downstream
//! hardware toolchain.

pub mod config;
pub mod error;
pub mod expand;
pub mod fs;
pub mod graph;
pub mod loader;
pub mod location;
pub mod merge;
pub mod plan;
pub mod planner;
pub mod registry;
pub mod resolve;
pub mod warning;

pub use config::PlanOptions;
pub use error::{
    DuplicateName, LoadError, NameKind, PlanError, ResolutionError, UnknownTemplate,
};
pub use fs::{FileSystem, HostFs, MemoryFs};
pub use location::{Location, Origin};
pub use plan::{BuildPlan, ExpandedModule, ResolvedGroup};
pub use planner::{Planner, Stage};
pub use registry::Registry;
pub use warning::{ExportSource, PlanWarning};

pub use hdlplan_common::{
    ConstantSet, ConstantValue, Library, ModuleDescriptor, ModuleGroup, ModuleKind, QualifiedName,
};
