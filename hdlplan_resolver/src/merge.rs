//! Include and export directory merging.
//!
//! Exports flow from a library's groups to every group depending on that
//! library. Groups are merged in build order, so by the time a group is
//! merged each of its dependencies already carries its transitive exports.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use hdlplan_common::paths::{logical_name, normalize};

use crate::resolve::GroupGraph;
use crate::warning::{ExportSource, PlanWarning};

/// A merged directory with the node of the group that first exported it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    dir: PathBuf,
    owner: usize,
}

/// Include and export lists of one group after merging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedDirs {
    /// The group's own include directories, then its dependencies' exports.
    pub include_dirs: Vec<PathBuf>,
    /// What dependents of this group see.
    pub export_dirs: Vec<PathBuf>,
}

/// Accumulates resolved exports per graph node.
#[derive(Debug)]
pub struct ExportMerger<'g, 'a> {
    graph: &'g GroupGraph<'a>,
    exports: Vec<Option<Vec<Entry>>>,
}

impl<'g, 'a> ExportMerger<'g, 'a> {
    /// A merger with nothing merged yet.
    pub fn new(graph: &'g GroupGraph<'a>) -> Self {
        Self {
            graph,
            exports: vec![None; graph.nodes.len()],
        }
    }

    /// Merges the directories of `node`.
    ///
    /// Every dependency of `node` must have been merged already; nodes taken
    /// from [`GroupGraph::order`] satisfy this. Conflicting exports found in
    /// the merged include list or the merged export list are appended to
    /// `warnings`, each pair of directories once.
    ///
    /// # Panics
    ///
    /// Panics if a dependency of `node` has not been merged yet.
    pub fn merge(&mut self, node: usize, warnings: &mut Vec<PlanWarning>) -> MergedDirs {
        let current = &self.graph.nodes[node];

        let inherited: Vec<Entry> = self
            .graph
            .dependencies(node)
            .iter()
            .flat_map(|&dep| {
                self.exports[dep]
                    .as_deref()
                    .unwrap_or_else(|| panic!("{} merged before its dependencies", current.name))
                    .iter()
                    .cloned()
            })
            .collect();

        let own = |dirs: &[PathBuf]| -> Vec<Entry> {
            dirs.iter()
                .map(|dir| Entry {
                    dir: current.library.resolve_dir(dir),
                    owner: node,
                })
                .collect()
        };

        let includes = dedup(
            own(current.group.include_dirs())
                .into_iter()
                .chain(inherited.iter().cloned()),
        );
        let exports = dedup(
            own(&current.group.export_dirs())
                .into_iter()
                .chain(inherited),
        );

        let mut reported = HashSet::new();
        self.report_conflicts(node, &includes, &mut reported, warnings);
        self.report_conflicts(node, &exports, &mut reported, warnings);

        let merged = MergedDirs {
            include_dirs: includes.into_iter().map(|e| e.dir).collect(),
            export_dirs: exports.iter().map(|e| e.dir.clone()).collect(),
        };
        self.exports[node] = Some(exports);
        merged
    }

    fn report_conflicts(
        &self,
        node: usize,
        entries: &[Entry],
        reported: &mut HashSet<(PathBuf, PathBuf)>,
        warnings: &mut Vec<PlanWarning>,
    ) {
        let mut first_by_name: HashMap<&str, &Entry> = HashMap::new();

        for entry in entries {
            let Some(name) = logical_name(&entry.dir) else {
                continue;
            };
            let Some(&kept) = first_by_name.get(name) else {
                first_by_name.insert(name, entry);
                continue;
            };
            if kept.owner == entry.owner
                || !reported.insert((kept.dir.clone(), entry.dir.clone()))
            {
                continue;
            }

            let warning = PlanWarning::ConflictingExport {
                group: self.graph.nodes[node].name.clone(),
                logical_name: name.to_owned(),
                kept: self.source(kept),
                shadowed: self.source(entry),
            };
            tracing::warn!("{warning}");
            warnings.push(warning);
        }
    }

    fn source(&self, entry: &Entry) -> ExportSource {
        ExportSource {
            group: self.graph.nodes[entry.owner].name.clone(),
            dir: entry.dir.clone(),
        }
    }
}

/// Removes repeated directories, keeping the first occurrence and its owner.
fn dedup(entries: impl IntoIterator<Item = Entry>) -> Vec<Entry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .map(|e| Entry {
            dir: normalize(&e.dir),
            owner: e.owner,
        })
        .filter(|e| seen.insert(e.dir.clone()))
        .collect()
}
