//! Builds the group dependency graph from a registry and orders it.
//!
//! Every module group becomes a node, numbered libraries first then groups,
//! both in declaration order. A dependency of group `G` on library `L` adds
//! an edge from `G` to every group of `L`.

use std::ops::Range;

use hdlplan_common::{Library, ModuleGroup, QualifiedName};

use crate::error::ResolutionError;
use crate::graph::DependencyGraph;
use crate::registry::Registry;
use crate::warning::PlanWarning;

/// One module group as a graph node.
#[derive(Debug, Clone)]
pub struct GroupNode<'a> {
    /// Declaration index of the owning library.
    pub library_index: usize,
    /// Declaration index of the group within its library.
    pub group_index: usize,
    /// The owning library.
    pub library: &'a Library,
    /// The group itself.
    pub group: &'a ModuleGroup,
    /// `library.group`.
    pub name: QualifiedName,
}

/// The dependency graph over every declared group.
#[derive(Debug, Clone)]
pub struct GroupGraph<'a> {
    /// Nodes in declaration order.
    pub nodes: Vec<GroupNode<'a>>,
    /// Edges from each group to the groups it depends on.
    pub graph: DependencyGraph,
    /// Node range owned by each library, by library declaration index.
    library_nodes: Vec<Range<usize>>,
}

impl<'a> GroupGraph<'a> {
    /// Builds the graph.
    ///
    /// Optional dependencies on undeclared libraries are skipped and reported
    /// as [`PlanWarning::OptionalDependencyAbsent`].
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::MissingDependency`] for the first required
    /// dependency (in declaration order) on an undeclared library.
    pub fn build(
        registry: &'a Registry,
        warnings: &mut Vec<PlanWarning>,
    ) -> Result<Self, ResolutionError> {
        let mut nodes = Vec::new();
        let mut library_nodes = Vec::with_capacity(registry.len());
        for (li, library) in registry.libraries().iter().enumerate() {
            let start = nodes.len();
            for (gi, group) in library.groups().iter().enumerate() {
                nodes.push(GroupNode {
                    library_index: li,
                    group_index: gi,
                    library,
                    group,
                    name: library.qualified(group),
                });
            }
            library_nodes.push(start..nodes.len());
        }

        let mut graph = DependencyGraph::with_nodes(nodes.len());
        for (from, node) in nodes.iter().enumerate() {
            for dep in node.group.dependencies() {
                let Some(li) = registry.index_of(dep.library) else {
                    if dep.required {
                        return Err(ResolutionError::missing_dep(dep.library, node.name.clone()));
                    }
                    tracing::debug!(
                        library = dep.library,
                        group = %node.name,
                        "optional dependency not declared"
                    );
                    warnings.push(PlanWarning::OptionalDependencyAbsent {
                        library: dep.library.to_owned(),
                        requested_by: node.name.clone(),
                    });
                    continue;
                };
                for to in library_nodes[li].clone() {
                    graph.add_edge(from, to);
                }
            }
        }

        tracing::debug!(nodes = nodes.len(), "built dependency graph");

        Ok(Self {
            nodes,
            graph,
            library_nodes,
        })
    }

    /// Orders the groups so that each comes after every group it depends on.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::CyclicDependency`] with the cycle as group
    /// names if the dependencies are cyclic.
    pub fn order(&self) -> Result<Vec<usize>, ResolutionError> {
        self.graph
            .topological_order()
            .map_err(|cycle| ResolutionError::CyclicDependency {
                cycle: cycle
                    .into_iter()
                    .map(|node| self.nodes[node].name.clone())
                    .collect(),
            })
    }

    /// The groups `node` depends on, dependency declaration order first,
    /// then group declaration order.
    pub fn dependencies(&self, node: usize) -> &[usize] {
        self.graph.successors(node)
    }

    /// Nodes belonging to the library at declaration index `library`.
    pub fn library_nodes(&self, library: usize) -> Range<usize> {
        self.library_nodes.get(library).cloned().unwrap_or(0..0)
    }
}
