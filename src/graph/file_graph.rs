//! File relation graph implementation using petgraph.
//!
//! Nodes are project files; an edge points from an importing file to the
//! file it imports.

use petgraph::algo::{is_cyclic_directed, tarjan_scc};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::analysis::FileRelation;

/// A directed graph of file imports.
///
/// # Example
///
/// ```rust
/// use std::path::Path;
/// use jsxscope::graph::FileGraph;
///
/// let mut graph = FileGraph::new();
/// graph.add_import(Path::new("src/main.jsx"), Path::new("src/App.jsx"));
/// graph.add_import(Path::new("src/App.jsx"), Path::new("src/Card.jsx"));
///
/// assert_eq!(graph.roots(), vec![Path::new("src/main.jsx")]);
/// assert_eq!(graph.reachable_from(Path::new("src/main.jsx")).len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FileGraph {
    graph: DiGraph<PathBuf, ()>,
    /// Maps file paths to their node indices for O(1) lookup
    node_indices: HashMap<PathBuf, NodeIndex>,
}

impl FileGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new graph with pre-allocated capacity.
    ///
    /// # Arguments
    ///
    /// * `nodes` - Expected number of files
    /// * `edges` - Expected number of imports
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(nodes, edges),
            node_indices: HashMap::with_capacity(nodes),
        }
    }

    /// Builds the graph of a scan result.
    ///
    /// Every target file becomes a node, in order, whether or not it imports
    /// anything; each relation file adds an edge.
    pub fn from_relations(relations: &[FileRelation]) -> Self {
        let edges = relations.iter().map(|r| r.relation_files.len()).sum();
        let mut graph = Self::with_capacity(relations.len(), edges);
        for relation in relations {
            graph.add_file(&relation.target_file);
        }
        for relation in relations {
            for imported in &relation.relation_files {
                graph.add_import(&relation.target_file, imported);
            }
        }
        graph
    }

    /// Adds a file, returning the existing node if it is already present.
    pub fn add_file(&mut self, path: &Path) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(path) {
            return idx;
        }
        let idx = self.graph.add_node(path.to_path_buf());
        self.node_indices.insert(path.to_path_buf(), idx);
        idx
    }

    /// Records that `from` imports `to`, adding either file if missing.
    ///
    /// Repeated imports of the same file produce a single edge.
    pub fn add_import(&mut self, from: &Path, to: &Path) {
        let from_idx = self.add_file(from);
        let to_idx = self.add_file(to);
        self.graph.update_edge(from_idx, to_idx, ());
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.node_indices.contains_key(path)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// All files, in insertion order.
    pub fn files(&self) -> Vec<&Path> {
        self.graph.node_weights().map(PathBuf::as_path).collect()
    }

    /// Files imported by `path`, in the order the imports were added.
    pub fn imports_of(&self, path: &Path) -> Vec<&Path> {
        let Some(&idx) = self.node_indices.get(path) else {
            return Vec::new();
        };
        self.ordered_neighbors(idx, Direction::Outgoing)
            .into_iter()
            .map(|n| self.graph[n].as_path())
            .collect()
    }

    /// Files that import `path`.
    pub fn importers_of(&self, path: &Path) -> Vec<&Path> {
        let Some(&idx) = self.node_indices.get(path) else {
            return Vec::new();
        };
        self.ordered_neighbors(idx, Direction::Incoming)
            .into_iter()
            .map(|n| self.graph[n].as_path())
            .collect()
    }

    /// Files no other file imports, in insertion order.
    pub fn roots(&self) -> Vec<&Path> {
        self.graph
            .node_indices()
            .filter(|&idx| {
                self.graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|idx| self.graph[idx].as_path())
            .collect()
    }

    /// Every file transitively imported by `path`, depth-first in import
    /// order. `path` itself is never included.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::path::Path;
    /// use jsxscope::graph::FileGraph;
    ///
    /// let mut graph = FileGraph::new();
    /// graph.add_import(Path::new("a"), Path::new("b"));
    /// graph.add_import(Path::new("b"), Path::new("c"));
    /// graph.add_import(Path::new("a"), Path::new("d"));
    ///
    /// assert_eq!(
    ///     graph.reachable_from(Path::new("a")),
    ///     vec![Path::new("b"), Path::new("c"), Path::new("d")]
    /// );
    /// ```
    pub fn reachable_from(&self, path: &Path) -> Vec<&Path> {
        let Some(&start) = self.node_indices.get(path) else {
            return Vec::new();
        };

        let mut visited = HashSet::from([start]);
        let mut order = Vec::new();
        let mut stack: Vec<NodeIndex> = self
            .ordered_neighbors(start, Direction::Outgoing)
            .into_iter()
            .rev()
            .collect();

        while let Some(idx) = stack.pop() {
            if !visited.insert(idx) {
                continue;
            }
            order.push(self.graph[idx].as_path());
            stack.extend(
                self.ordered_neighbors(idx, Direction::Outgoing)
                    .into_iter()
                    .rev(),
            );
        }
        order
    }

    /// Checks if any import chain leads back to where it started.
    pub fn has_cycles(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Detects all import cycles.
    ///
    /// Each strongly connected component with more than one file, or a file
    /// importing itself, is one cycle. Cycles are listed by their first
    /// file; see [`CycleInfo`] for the member order.
    pub fn cycles(&self) -> Vec<CycleInfo> {
        let mut cycles: Vec<CycleInfo> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| {
                scc.len() > 1 || self.graph.contains_edge(scc[0], scc[0])
            })
            .map(|scc| CycleInfo {
                files: self.cycle_order(&scc),
            })
            .collect();
        cycles.sort_by(|a, b| a.files.cmp(&b.files));
        cycles
    }

    /// Orders a component by walking imports from its smallest path,
    /// always taking the first import that stays inside the component.
    fn cycle_order(&self, scc: &[NodeIndex]) -> Vec<PathBuf> {
        let members: HashSet<NodeIndex> = scc.iter().copied().collect();
        let Some(&start) = scc.iter().min_by(|a, b| self.graph[**a].cmp(&self.graph[**b])) else {
            return Vec::new();
        };

        let mut seen = HashSet::from([start]);
        let mut order = vec![self.graph[start].clone()];
        let mut current = start;
        while let Some(next) = self
            .ordered_neighbors(current, Direction::Outgoing)
            .into_iter()
            .find(|n| members.contains(n) && !seen.contains(n))
        {
            seen.insert(next);
            order.push(self.graph[next].clone());
            current = next;
        }

        // Members the walk did not reach (non-simple components).
        let mut rest: Vec<PathBuf> = scc
            .iter()
            .filter(|idx| !seen.contains(*idx))
            .map(|&idx| self.graph[idx].clone())
            .collect();
        rest.sort();
        order.extend(rest);
        order
    }

    /// petgraph yields the most recent edge first; this restores insertion
    /// order.
    fn ordered_neighbors(&self, idx: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let mut neighbors: Vec<NodeIndex> = self.graph.neighbors_directed(idx, direction).collect();
        neighbors.reverse();
        neighbors
    }
}

/// Information about one import cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleInfo {
    /// Files in the cycle; the last imports the first when the cycle is
    /// simple.
    pub files: Vec<PathBuf>,
}

impl CycleInfo {
    /// Returns a formatted string representation of the cycle path.
    ///
    /// For example: "a.js -> b.js -> a.js"
    pub fn cycle_path(&self) -> String {
        let Some(first) = self.files.first() else {
            return String::new();
        };
        let mut parts: Vec<String> = self.files.iter().map(|f| f.display().to_string()).collect();
        parts.push(first.display().to_string());
        parts.join(" -> ")
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn p(path: &str) -> &Path {
        Path::new(path)
    }

    fn relation(target: &str, imports: &[&str]) -> FileRelation {
        FileRelation {
            target_file: PathBuf::from(target),
            relation_files: imports.iter().map(PathBuf::from).collect(),
            import_map: BTreeMap::new(),
        }
    }

    // ===== Construction =====

    #[test]
    fn test_new_graph_is_empty() {
        let graph = FileGraph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_add_file_is_idempotent() {
        let mut graph = FileGraph::new();
        let first = graph.add_file(p("a.js"));
        let second = graph.add_file(p("a.js"));
        assert_eq!(first, second);
        assert_eq!(graph.node_count(), 1);
        assert!(graph.contains(p("a.js")));
    }

    #[test]
    fn test_duplicate_imports_collapse() {
        let mut graph = FileGraph::new();
        graph.add_import(p("a.js"), p("b.js"));
        graph.add_import(p("a.js"), p("b.js"));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_from_relations_keeps_isolated_files() {
        let graph = FileGraph::from_relations(&[
            relation("main.js", &["App.js"]),
            relation("App.js", &[]),
            relation("orphan.js", &[]),
        ]);
        assert_eq!(graph.files(), vec![p("main.js"), p("App.js"), p("orphan.js")]);
        assert_eq!(graph.edge_count(), 1);
    }

    // ===== Traversal =====

    #[test]
    fn test_neighbors_in_insertion_order() {
        let mut graph = FileGraph::new();
        graph.add_import(p("a"), p("c"));
        graph.add_import(p("a"), p("b"));
        graph.add_import(p("d"), p("b"));
        assert_eq!(graph.imports_of(p("a")), vec![p("c"), p("b")]);
        assert_eq!(graph.importers_of(p("b")), vec![p("a"), p("d")]);
        assert!(graph.imports_of(p("missing")).is_empty());
    }

    #[test]
    fn test_roots() {
        let graph = FileGraph::from_relations(&[
            relation("main.js", &["App.js"]),
            relation("App.js", &["Card.js"]),
            relation("Card.js", &[]),
            relation("story.js", &["Card.js"]),
        ]);
        assert_eq!(graph.roots(), vec![p("main.js"), p("story.js")]);
    }

    #[test]
    fn test_reachable_from_is_depth_first() {
        let graph = FileGraph::from_relations(&[
            relation("main", &["App", "theme"]),
            relation("App", &["Card", "theme"]),
            relation("Card", &["Icon"]),
        ]);
        assert_eq!(
            graph.reachable_from(p("main")),
            vec![p("App"), p("Card"), p("Icon"), p("theme")]
        );
        assert!(graph.reachable_from(p("unknown")).is_empty());
    }

    #[test]
    fn test_reachable_from_excludes_start_in_cycle() {
        let mut graph = FileGraph::new();
        graph.add_import(p("a"), p("b"));
        graph.add_import(p("b"), p("a"));
        assert_eq!(graph.reachable_from(p("a")), vec![p("b")]);
    }

    // ===== Cycles =====

    #[test]
    fn test_no_cycles() {
        let mut graph = FileGraph::new();
        graph.add_import(p("a"), p("b"));
        graph.add_import(p("b"), p("c"));
        assert!(!graph.has_cycles());
        assert!(graph.cycles().is_empty());
    }

    #[test]
    fn test_cycle_order_and_path() {
        let mut graph = FileGraph::new();
        graph.add_import(p("store.js"), p("api.js"));
        graph.add_import(p("api.js"), p("auth.js"));
        graph.add_import(p("auth.js"), p("store.js"));
        graph.add_import(p("auth.js"), p("util.js"));

        assert!(graph.has_cycles());
        let cycles = graph.cycles();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].len(), 3);
        assert_eq!(
            cycles[0].cycle_path(),
            "api.js -> auth.js -> store.js -> api.js"
        );
    }

    #[test]
    fn test_self_import_is_a_cycle() {
        let mut graph = FileGraph::new();
        graph.add_import(p("a"), p("a"));
        graph.add_import(p("b"), p("c"));
        let cycles = graph.cycles();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].files, vec![PathBuf::from("a")]);
        assert_eq!(cycles[0].cycle_path(), "a -> a");
    }

    #[test]
    fn test_multiple_cycles_sorted() {
        let mut graph = FileGraph::new();
        graph.add_import(p("y"), p("z"));
        graph.add_import(p("z"), p("y"));
        graph.add_import(p("b"), p("a"));
        graph.add_import(p("a"), p("b"));
        let cycles = graph.cycles();
        assert_eq!(cycles.len(), 2);
        assert_eq!(cycles[0].files, vec![PathBuf::from("a"), PathBuf::from("b")]);
        assert_eq!(cycles[1].files, vec![PathBuf::from("y"), PathBuf::from("z")]);
    }

    #[test]
    fn test_empty_cycle_info() {
        let info = CycleInfo { files: Vec::new() };
        assert!(info.is_empty());
        assert_eq!(info.cycle_path(), "");
    }
}
