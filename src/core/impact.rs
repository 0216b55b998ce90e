//! Blast-radius computation over a [`DependencyGraph`].
//!
//! Every reference `A -> B` means "A depends on B", so a change to `B`
//! impacts `A`. Starting from the seeds picked out of the intent text, the
//! analyzer walks references backwards and collects everything reachable.
//!
//! ## Seed selection
//!
//! A node is a seed when its label (case-insensitive) occurs in the intent
//! and is longer than [`MIN_SEED_LABEL_LEN`] characters. With no match the
//! first module in registration order is used. With neither, the analysis
//! fails with [`AnalysisError::NoStartingPoint`].

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use tracing::debug;

use super::error::{AnalysisError, AnalysisResult};
use super::graph::{DependencyGraph, ReferenceKind, Symbol, SymbolKind};

/// Labels this short or shorter never select a seed on their own.
pub const MIN_SEED_LABEL_LEN: usize = 3;

pub const DIRECT_CHANGE_EXPLANATION: &str = "Directly modified component as per change intent.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImpactCategory {
    #[serde(rename = "API Contract")]
    ApiContract,
    #[serde(rename = "Data Handling")]
    DataHandling,
    #[serde(rename = "Business Logic")]
    BusinessLogic,
    #[serde(rename = "General")]
    General,
}

impl ImpactCategory {
    /// Lexical classification on the id, first rule wins.
    pub fn classify(symbol: &Symbol) -> Self {
        let id = symbol.id.to_lowercase();
        let mentions = |needles: &[&str]| needles.iter().any(|needle| id.contains(needle));

        if mentions(&["api", "app"]) {
            ImpactCategory::ApiContract
        } else if mentions(&["db", "data", "connector"]) {
            ImpactCategory::DataHandling
        } else if symbol.kind == SymbolKind::Function || mentions(&["service"]) {
            ImpactCategory::BusinessLogic
        } else {
            ImpactCategory::General
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ImpactCategory::ApiContract => "API Contract",
            ImpactCategory::DataHandling => "Data Handling",
            ImpactCategory::BusinessLogic => "Business Logic",
            ImpactCategory::General => "General",
        }
    }

    /// Message for a node reached indirectly.
    pub fn explain(self, id: &str) -> String {
        match self {
            ImpactCategory::ApiContract => format!(
                "Downstream layer '{id}' relies on modified component. May break external API consumers."
            ),
            ImpactCategory::DataHandling => format!(
                "Data model or query execution in '{id}' might be affected by upstream schema or logic changes."
            ),
            ImpactCategory::BusinessLogic => format!(
                "Execution flow or state in '{id}' depends on modified logic. Requires regression testing."
            ),
            ImpactCategory::General => {
                format!("Triggered indirect dependency recalculation for '{id}'.")
            }
        }
    }
}

impl fmt::Display for ImpactCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactedNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: SymbolKind,
    #[serde(rename = "is_direct")]
    pub is_seed: bool,
    pub category: ImpactCategory,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: SymbolKind,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "label")]
    pub kind: ReferenceKind,
}

/// Every graph node and edge, with impacted nodes highlighted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visualization {
    pub nodes: Vec<VisualNode>,
    pub edges: Vec<VisualEdge>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactResult {
    pub intent: String,
    pub seeds: Vec<String>,
    #[serde(rename = "impacts")]
    pub impacted: Vec<ImpactedNode>,
    #[serde(rename = "graph")]
    pub visualization: Visualization,
}

impl ImpactResult {
    pub fn impacted_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.impacted.iter().map(|node| node.id.as_str())
    }

    pub fn is_impacted(&self, id: &str) -> bool {
        self.impacted.iter().any(|node| node.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&ImpactedNode> {
        self.impacted.iter().find(|node| node.id == id)
    }
}

pub struct ImpactAnalyzer<'g> {
    graph: &'g DependencyGraph,
}

impl<'g> ImpactAnalyzer<'g> {
    pub fn new(graph: &'g DependencyGraph) -> Self {
        Self { graph }
    }

    pub fn analyze(&self, intent: &str) -> AnalysisResult<ImpactResult> {
        let seeds = self.find_seeds(intent)?;
        let impacted = self.propagate(&seeds);
        debug!(
            seeds = seeds.len(),
            impacted = impacted.iter().filter(|&&hit| hit).count(),
            "Impact propagation complete"
        );

        let mut is_seed = vec![false; self.graph.node_count()];
        for seed in &seeds {
            is_seed[seed.index()] = true;
        }

        let impacted_nodes = self
            .graph
            .symbols()
            .filter(|(idx, _)| impacted[idx.index()])
            .map(|(idx, symbol)| self.describe(symbol, is_seed[idx.index()]))
            .collect();

        Ok(ImpactResult {
            intent: intent.to_string(),
            seeds: seeds
                .iter()
                .map(|&idx| self.graph.as_petgraph()[idx].id.clone())
                .collect(),
            impacted: impacted_nodes,
            visualization: self.visualize(&impacted),
        })
    }

    /// Seeds in registration order.
    pub fn find_seeds(&self, intent: &str) -> AnalysisResult<Vec<NodeIndex>> {
        let intent = intent.to_lowercase();
        let matched: Vec<NodeIndex> = self
            .graph
            .symbols()
            .filter(|(_, symbol)| {
                symbol.label.chars().count() > MIN_SEED_LABEL_LEN
                    && intent.contains(&symbol.label.to_lowercase())
            })
            .map(|(idx, _)| idx)
            .collect();

        if !matched.is_empty() {
            return Ok(matched);
        }

        let fallback = self
            .graph
            .symbols()
            .find(|(_, symbol)| symbol.kind == SymbolKind::Module)
            .map(|(idx, _)| idx)
            .ok_or(AnalysisError::NoStartingPoint)?;
        debug!(
            seed = %self.graph.as_petgraph()[fallback].id,
            "No label matched the intent; falling back to the first module"
        );
        Ok(vec![fallback])
    }

    /// Breadth-first reachability over dependents. Returns a membership mask
    /// indexed by node index; seeds are always members.
    pub fn propagate(&self, seeds: &[NodeIndex]) -> Vec<bool> {
        let dependents = self.dependents();
        let mut visited = vec![false; self.graph.node_count()];
        let mut queue: VecDeque<NodeIndex> = VecDeque::new();

        for &seed in seeds {
            if !visited[seed.index()] {
                visited[seed.index()] = true;
                queue.push_back(seed);
            }
        }

        while let Some(current) = queue.pop_front() {
            for &dependent in &dependents[current.index()] {
                if !visited[dependent.index()] {
                    visited[dependent.index()] = true;
                    queue.push_back(dependent);
                }
            }
        }

        visited
    }

    /// Inverted adjacency: `dependents[b]` lists every `a` with a reference
    /// `a -> b`, of any kind.
    fn dependents(&self) -> Vec<Vec<NodeIndex>> {
        let mut dependents = vec![Vec::new(); self.graph.node_count()];
        for (source, target, _) in self.graph.references() {
            dependents[target.index()].push(source);
        }
        dependents
    }

    fn describe(&self, symbol: &Symbol, is_seed: bool) -> ImpactedNode {
        let category = ImpactCategory::classify(symbol);
        let explanation = if is_seed {
            DIRECT_CHANGE_EXPLANATION.to_string()
        } else {
            category.explain(&symbol.id)
        };

        ImpactedNode {
            id: symbol.id.clone(),
            label: symbol.label.clone(),
            kind: symbol.kind,
            is_seed,
            category,
            explanation,
        }
    }

    fn visualize(&self, impacted: &[bool]) -> Visualization {
        let nodes = self
            .graph
            .symbols()
            .map(|(idx, symbol)| VisualNode {
                id: symbol.id.clone(),
                label: symbol.label.clone(),
                kind: symbol.kind,
                highlighted: impacted[idx.index()],
            })
            .collect();

        let edges = self
            .graph
            .references()
            .map(|(_, _, reference)| VisualEdge {
                id: reference.composite_id(),
                source: reference.source.clone(),
                target: reference.target.clone(),
                kind: reference.kind,
            })
            .collect();

        Visualization { nodes, edges }
    }
}
