//! Declaring locations, used to point diagnostics at the source of a name.

use std::fmt::{self, Display};
use std::path::PathBuf;

/// Where a library declaration came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Loaded from a manifest file.
    Manifest(PathBuf),
    /// Declared programmatically; the ordinal counts declarations in the registry.
    Inline(usize),
}

impl Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manifest(path) => write!(f, "{}", path.display()),
            Self::Inline(ordinal) => write!(f, "inline declaration #{ordinal}"),
        }
    }
}

/// A declaration site: the origin plus the item's position within it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    /// The declaring manifest or inline declaration.
    pub origin: Origin,
    /// Position of the item, e.g. `groups[0].modules[2]`.
    pub item: String,
}

impl Location {
    /// Location of a library declaration.
    pub fn library(origin: &Origin) -> Self {
        Self {
            origin: origin.clone(),
            item: "[library]".to_owned(),
        }
    }

    /// Location of the `group`th group of a library.
    pub fn group(origin: &Origin, group: usize) -> Self {
        Self {
            origin: origin.clone(),
            item: format!("groups[{group}]"),
        }
    }

    /// Location of the `module`th module of the `group`th group.
    pub fn module(origin: &Origin, group: usize, module: usize) -> Self {
        Self {
            origin: origin.clone(),
            item: format!("groups[{group}].modules[{module}]"),
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.origin, self.item)
    }
}
