//! Module descriptors: one buildable unit referencing a template.

use std::path::Path;

use contracts::*;
use serde::{Deserialize, Serialize};

use crate::ConstantSet;

/// The kind of source a module template is written in.
///
/// Only the default template extension depends on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    /// A CDL hardware module (`.cdl`).
    #[default]
    Cdl,
    /// A hand-written C++ model of a module (`.cpp`).
    CModel,
    /// Plain C++ support source compiled alongside the models (`.cpp`).
    CSrc,
}

impl ModuleKind {
    /// File extension appended to templates declared without one.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Cdl => "cdl",
            Self::CModel | Self::CSrc => "cpp",
        }
    }
}

/// A single named instantiation of a template.
///
/// Several descriptors may point at the same template with different
/// constant sets; each one becomes its own build unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleDescriptor {
    instance_name: String,
    template_file: Option<String>,
    constants: ConstantSet,
    kind: ModuleKind,
}

impl ModuleDescriptor {
    /// Creates a descriptor whose template defaults to its instance name.
    pub fn new(instance_name: impl Into<String>) -> Self {
        Self {
            instance_name: instance_name.into(),
            template_file: None,
            constants: ConstantSet::new(),
            kind: ModuleKind::default(),
        }
    }

    /// Sets the template file this instance is built from.
    #[must_use]
    #[ensures(ret.template_file.is_some())]
    pub fn with_template(mut self, template_file: impl Into<String>) -> Self {
        self.template_file = Some(template_file.into());
        self
    }

    /// Replaces the constant set.
    #[must_use]
    pub fn with_constants(mut self, constants: ConstantSet) -> Self {
        self.constants = constants;
        self
    }

    /// Sets the module kind.
    #[must_use]
    #[ensures(ret.kind == kind)]
    pub fn with_kind(mut self, kind: ModuleKind) -> Self {
        self.kind = kind;
        self
    }

    /// The instance name, used by the toolchain as the external identifier.
    #[must_use]
    pub fn instance_name(&self) -> &str {
        &self.instance_name
    }

    /// The template name, falling back to the instance name.
    #[must_use]
    pub fn template_file(&self) -> &str {
        self.template_file.as_deref().unwrap_or(&self.instance_name)
    }

    /// The constant overrides for this instance.
    #[must_use]
    pub const fn constants(&self) -> &ConstantSet {
        &self.constants
    }

    /// The module kind.
    #[must_use]
    pub const fn kind(&self) -> ModuleKind {
        self.kind
    }

    /// The template file name, with the kind's extension appended unless the
    /// declared name already ends in it.
    ///
    /// Dots elsewhere in the name are part of the name: `riscv_i32.alu`
    /// becomes `riscv_i32.alu.cdl`.
    #[must_use]
    pub fn template_file_name(&self) -> String {
        let template = self.template_file();
        let extension = Path::new(template).extension().and_then(|e| e.to_str());
        if extension == Some(self.kind.extension()) {
            template.to_owned()
        } else {
            format!("{template}.{}", self.kind.extension())
        }
    }
}
