//! Recoverable findings returned alongside a successful plan.

use std::fmt::{self, Display};
use std::path::PathBuf;

use hdlplan_common::QualifiedName;
use serde::Serialize;
use thiserror::Error;

/// A directory contributed to a merged search path, with the group that
/// exported it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ExportSource {
    /// The exporting group.
    pub group: QualifiedName,
    /// The exported directory.
    pub dir: PathBuf,
}

impl Display for ExportSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (from {})", self.dir.display(), self.group)
    }
}

/// A non-fatal problem found while assembling a plan.
///
/// The plan is still produced; callers decide whether to treat these as
/// errors (see [`crate::PlanOptions::deny_warnings`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanWarning {
    /// Two groups export different directories with the same base name into
    /// one search path. The earlier one keeps precedence.
    #[error(
        "Conflicting exports for '{logical_name}' while resolving {group}: {kept} shadows {shadowed}"
    )]
    ConflictingExport {
        /// The group whose search path holds both directories.
        group: QualifiedName,
        /// The shared base name.
        logical_name: String,
        /// The directory searched first.
        kept: ExportSource,
        /// The directory searched later.
        shadowed: ExportSource,
    },

    /// An optional dependency names a library that is not declared.
    #[error("Optional library '{library}' requested by {requested_by} is not declared; ignored")]
    OptionalDependencyAbsent {
        /// The absent library.
        library: String,
        /// The group declaring the dependency.
        requested_by: QualifiedName,
    },

    /// Two modules of one group instantiate the same template with the same
    /// constants under different names.
    #[error(
        "Modules '{first}' and '{second}' in {group} both instantiate {} with identical constants",
        .template.display()
    )]
    RedundantVariant {
        /// The declaring group.
        group: QualifiedName,
        /// The earlier instance.
        first: String,
        /// The later instance.
        second: String,
        /// The shared template path.
        template: PathBuf,
    },
}
