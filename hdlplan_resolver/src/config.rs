//! Options controlling plan assembly.

use contracts::*;

/// Configuration for a [`crate::Planner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlanOptions {
    /// Check that every module template exists before resolving. Templates
    /// outside their source directory are rejected either way.
    pub check_templates: bool,
    /// Fail assembly when any warning was produced.
    pub deny_warnings: bool,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            check_templates: true,
            deny_warnings: false,
        }
    }
}

impl PlanOptions {
    /// Creates the default options: templates checked, warnings allowed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether template files are checked for existence.
    #[must_use]
    #[ensures(ret.check_templates == check_templates)]
    pub fn with_check_templates(mut self, check_templates: bool) -> Self {
        self.check_templates = check_templates;
        self
    }

    /// Sets whether warnings are promoted to a failure.
    #[must_use]
    #[ensures(ret.deny_warnings == deny_warnings)]
    pub fn with_deny_warnings(mut self, deny_warnings: bool) -> Self {
        self.deny_warnings = deny_warnings;
        self
    }
}
