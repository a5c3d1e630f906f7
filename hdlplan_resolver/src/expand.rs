//! Variant expansion: module descriptors to concrete build units.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::PathBuf;

use hdlplan_common::{ConstantSet, Library, ModuleGroup};

use crate::error::{DuplicateName, NameKind};
use crate::location::Location;
use crate::plan::ExpandedModule;
use crate::warning::PlanWarning;

/// Expands every descriptor of `group` into a build unit.
///
/// Descriptors sharing a template stay separate units. Two descriptors with
/// the same template and the same constants are kept too, but reported as
/// [`PlanWarning::RedundantVariant`].
pub fn expand_group(
    library: &Library,
    group: &ModuleGroup,
    warnings: &mut Vec<PlanWarning>,
) -> Vec<ExpandedModule> {
    let mut seen: HashMap<(PathBuf, &ConstantSet), &str> = HashMap::new();
    let mut expanded = Vec::with_capacity(group.modules().len());

    for module in group.modules() {
        let resolved_template_path = library.template_path(group, module);

        match seen.entry((resolved_template_path.clone(), module.constants())) {
            Entry::Occupied(first) => {
                warnings.push(PlanWarning::RedundantVariant {
                    group: library.qualified(group),
                    first: (*first.get()).to_owned(),
                    second: module.instance_name().to_owned(),
                    template: resolved_template_path.clone(),
                });
            },
            Entry::Vacant(slot) => {
                slot.insert(module.instance_name());
            },
        }

        expanded.push(ExpandedModule {
            instance_name: module.instance_name().to_owned(),
            resolved_template_path,
            constants: module.constants().clone(),
            kind: module.kind(),
        });
    }

    expanded
}

/// Instance names claimed so far across the plan.
///
/// Instance names become the toolchain's external identifiers, so they must
/// be unique across every group, not just within one.
#[derive(Debug, Default)]
pub struct InstanceTable {
    claimed: HashMap<String, Location>,
}

impl InstanceTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `name` for the module declared at `location`.
    ///
    /// # Errors
    ///
    /// Returns a [`DuplicateName`] of kind [`NameKind::Instance`] naming both
    /// declarations if `name` is already claimed.
    pub fn claim(&mut self, name: &str, location: Location) -> Result<(), DuplicateName> {
        match self.claimed.entry(name.to_owned()) {
            Entry::Occupied(first) => Err(DuplicateName {
                kind: NameKind::Instance,
                name: name.to_owned(),
                first: first.get().clone(),
                second: location,
            }),
            Entry::Vacant(slot) => {
                slot.insert(location);
                Ok(())
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Origin;
    use hdlplan_common::{ConstantValue, ModuleDescriptor};

    #[test]
    fn test_variants_stay_distinct() {
        let library = Library::new("reve_r", "/lib/reve_r");
        let group = ModuleGroup::new("pipeline", "cdl")
            .with_module(
                ModuleDescriptor::new("x")
                    .with_template("base")
                    .with_constants(ConstantSet::new().with("mode", 1)),
            )
            .with_module(
                ModuleDescriptor::new("x2")
                    .with_template("base")
                    .with_constants(ConstantSet::new().with("mode", 2)),
            );

        let mut warnings = Vec::new();
        let modules = expand_group(&library, &group, &mut warnings);

        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0].resolved_template_path, modules[1].resolved_template_path);
        assert_eq!(
            modules[0].resolved_template_path,
            PathBuf::from("/lib/reve_r/cdl/base.cdl")
        );
        assert_eq!(modules[0].constants.get("mode"), Some(ConstantValue::Int(1)));
        assert_eq!(modules[1].constants.get("mode"), Some(ConstantValue::Int(2)));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_identical_variants_warn() {
        let library = Library::new("reve_r", "/lib/reve_r");
        let group = ModuleGroup::new("pipeline", "cdl")
            .with_module(ModuleDescriptor::new("alu"))
            .with_module(ModuleDescriptor::new("alu_copy").with_template("alu"));

        let mut warnings = Vec::new();
        let modules = expand_group(&library, &group, &mut warnings);

        assert_eq!(modules.len(), 2);
        assert!(matches!(
            &warnings[..],
            [PlanWarning::RedundantVariant { first, second, .. }] if first == "alu" && second == "alu_copy"
        ));
    }

    #[test]
    fn test_instance_table_rejects_repeat() {
        let origin = Origin::Inline(0);
        let mut table = InstanceTable::new();
        table.claim("alu", Location::module(&origin, 0, 0)).unwrap();

        let dup = table
            .claim("alu", Location::module(&origin, 1, 0))
            .unwrap_err();
        assert_eq!(dup.kind, NameKind::Instance);
        assert_eq!(dup.first.item, "groups[0].modules[0]");
        assert_eq!(dup.second.item, "groups[1].modules[0]");
        table.claim("alu2", Location::module(&origin, 1, 0)).unwrap();
    }
}
