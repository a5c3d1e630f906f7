//! Common data model for the hdlplan workspace.
//!
//! This crate provides the declaration types (libraries, module groups, module
//! descriptors and constant sets), the on-disk manifest schema, and the path
//! helpers shared by the resolver and the CLI.

mod constants;
mod descriptor;
mod group;
mod library;
mod manifest;
mod name;
pub mod paths;

pub use crate::constants::{ConstantSet, ConstantValue};
pub use crate::descriptor::{ModuleDescriptor, ModuleKind};
pub use crate::group::{Dependency, ModuleGroup};
pub use crate::library::Library;
pub use crate::manifest::{GroupSection, LibrarySection, Manifest, ModuleSection};
pub use crate::name::QualifiedName;
