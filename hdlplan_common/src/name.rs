//! Qualified `library.group` names.

use std::fmt::{self, Display};

use serde::{Serialize, Serializer};

/// A module group name qualified by its library, printed as `library.group`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    /// Owning library.
    pub library: String,
    /// Group within the library.
    pub group: String,
}

impl QualifiedName {
    /// Builds a qualified name from its parts.
    pub fn new(library: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            library: library.into(),
            group: group.into(),
        }
    }
}

impl Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.library, self.group)
    }
}

impl Serialize for QualifiedName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
