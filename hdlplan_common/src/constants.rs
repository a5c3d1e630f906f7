//! Constant sets used to specialize a module template into a variant.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use contracts::*;
use serde::{Deserialize, Serialize};

/// A single constant override value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstantValue {
    /// A boolean constant, passed through as 0/1 by most toolchains.
    Bool(bool),
    /// An integer constant.
    Int(i64),
}

impl Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
        }
    }
}

impl From<i64> for ConstantValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for ConstantValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// An immutable set of named constant overrides.
///
/// Keys are kept sorted so that two sets with the same contents compare and
/// hash equal regardless of declaration order. The keys are not interpreted
/// here; they belong to the downstream toolchain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConstantSet(BTreeMap<String, ConstantValue>);

impl ConstantSet {
    /// Creates an empty constant set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a constant.
    #[must_use]
    #[ensures(ret.get(key).is_some())]
    pub fn with(mut self, key: &str, value: impl Into<ConstantValue>) -> Self {
        self.0.insert(key.to_owned(), value.into());
        self
    }

    /// Returns the value bound to `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<ConstantValue> {
        self.0.get(key).copied()
    }

    /// Number of constants in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the set carries no overrides.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the constants in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ConstantValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>, V: Into<ConstantValue>> FromIterator<(K, V)> for ConstantSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl Display for ConstantSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key}={value}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_set_order_independent() {
        let a = ConstantSet::new().with("mode", 1).with("e32", true);
        let b = ConstantSet::new().with("e32", true).with("mode", 1);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "{e32=true, mode=1}");
    }

    #[test]
    fn test_constant_set_replace() {
        let set = ConstantSet::new().with("mode", 1).with("mode", 2);
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("mode"), Some(ConstantValue::Int(2)));
    }
}
