use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Graph};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Prefix of synthesized ids for call targets that matched no known symbol.
pub const EXTERNAL_PREFIX: &str = "ext:";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Module,
    Class,
    Function,
    External,
}

impl SymbolKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SymbolKind::Module => "module",
            SymbolKind::Class => "class",
            SymbolKind::Function => "function",
            SymbolKind::External => "external",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Contains,
    Imports,
    Calls,
}

impl ReferenceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ReferenceKind::Contains => "contains",
            ReferenceKind::Imports => "imports",
            ReferenceKind::Calls => "calls",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declared entity, or a placeholder for a name that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub id: String,
    pub kind: SymbolKind,
    pub label: String,
}

impl Symbol {
    pub fn new(id: impl Into<String>, kind: SymbolKind, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            label: label.into(),
        }
    }

    pub fn module(id: &str) -> Self {
        Self::new(id, SymbolKind::Module, id)
    }

    /// Placeholder for a call hint with no matching local symbol.
    pub fn external(hint: &str) -> Self {
        Self::new(format!("{EXTERNAL_PREFIX}{hint}"), SymbolKind::External, hint)
    }
}

/// A typed, directed relationship: `source` depends on `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub kind: ReferenceKind,
    pub source: String,
    pub target: String,
}

impl Reference {
    pub fn new(kind: ReferenceKind, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            kind,
            source: source.into(),
            target: target.into(),
        }
    }

    /// Identifier used by graph consumers, unique per `(source, target, kind)`.
    pub fn composite_id(&self) -> String {
        format!("{}-{}-{}", self.source, self.target, self.kind)
    }
}

/// Directed multigraph of symbols and references, built fresh per analysis.
///
/// Node indices follow registration order, which the call resolver and the
/// seed fallback both rely on.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: Graph<Symbol, Reference, Directed>,
    node_map: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node_map.contains_key(id)
    }

    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    pub fn symbol(&self, id: &str) -> Option<&Symbol> {
        self.index_of(id).map(|idx| &self.graph[idx])
    }

    /// Symbols in registration order.
    pub fn symbols(&self) -> impl Iterator<Item = (NodeIndex, &Symbol)> + '_ {
        self.graph
            .node_indices()
            .map(move |idx| (idx, &self.graph[idx]))
    }

    /// References in insertion order, with their endpoint indices.
    pub fn references(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex, &Reference)> + '_ {
        self.graph
            .edge_references()
            .map(|edge| (edge.source(), edge.target(), edge.weight()))
    }

    pub fn has_reference(&self, kind: ReferenceKind, source: &str, target: &str) -> bool {
        self.references()
            .any(|(_, _, r)| r.kind == kind && r.source == source && r.target == target)
    }

    pub fn as_petgraph(&self) -> &Graph<Symbol, Reference, Directed> {
        &self.graph
    }
}

pub struct GraphBuilder {
    graph: DependencyGraph,
    seen_edges: HashSet<(NodeIndex, NodeIndex, ReferenceKind)>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: DependencyGraph::default(),
            seen_edges: HashSet::new(),
        }
    }

    /// Registers `symbol` unless its id is already taken; the first
    /// registration keeps its kind and label.
    pub fn add_node(&mut self, symbol: Symbol) -> NodeIndex {
        if let Some(&index) = self.graph.node_map.get(&symbol.id) {
            return index;
        }
        let id = symbol.id.clone();
        let index = self.graph.graph.add_node(symbol);
        self.graph.node_map.insert(id, index);
        index
    }

    /// Adds `reference` if both endpoints exist. A repeated reference of the
    /// same kind between the same pair collapses onto the existing edge.
    pub fn add_edge(&mut self, reference: Reference) -> Option<EdgeIndex> {
        let source_idx = self.graph.index_of(&reference.source)?;
        let target_idx = self.graph.index_of(&reference.target)?;

        if !self
            .seen_edges
            .insert((source_idx, target_idx, reference.kind))
        {
            return self
                .graph
                .graph
                .edges_connecting(source_idx, target_idx)
                .find(|edge| edge.weight().kind == reference.kind)
                .map(|edge| edge.id());
        }

        Some(self.graph.graph.add_edge(source_idx, target_idx, reference))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.graph.contains(id)
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.graph.symbols().map(|(_, symbol)| symbol.id.as_str())
    }

    pub fn build(self) -> DependencyGraph {
        self.graph
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
