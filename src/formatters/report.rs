//! Plain-text blast-radius report for terminals.
//!
//! ## Output Structure
//!
//! - **SEEDS**: components the intent names directly
//! - **IMPACTS**: every impacted component, grouped by category
//! - **GRAPH**: node/edge totals and edge counts per reference kind

use anyhow::Result;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::core::{ImpactCategory, ImpactResult, ImpactedNode};

const CATEGORY_ORDER: [ImpactCategory; 4] = [
    ImpactCategory::ApiContract,
    ImpactCategory::DataHandling,
    ImpactCategory::BusinessLogic,
    ImpactCategory::General,
];

pub struct ReportFormatter {
    /// Include the per-node explanation under each entry
    include_explanations: bool,
}

impl ReportFormatter {
    pub fn new() -> Self {
        Self {
            include_explanations: true,
        }
    }

    pub fn with_explanations(mut self, include: bool) -> Self {
        self.include_explanations = include;
        self
    }

    pub fn format_to_file(&self, result: &ImpactResult, output_path: &Path) -> Result<()> {
        fs::write(output_path, self.format(result))?;
        Ok(())
    }

    pub fn format(&self, result: &ImpactResult) -> String {
        let mut output = String::new();

        output.push_str("# BLAST RADIUS\n");
        output.push_str(&format!("INTENT: {}\n\n", result.intent));

        output.push_str(&format!("## SEEDS ({})\n", result.seeds.len()));
        for seed in &result.seeds {
            output.push_str(&format!("- {}\n", seed));
        }
        output.push('\n');

        self.format_impacts(&mut output, result);
        self.format_graph_summary(&mut output, result);

        output
    }

    fn format_impacts(&self, output: &mut String, result: &ImpactResult) {
        output.push_str(&format!("## IMPACTS ({})\n", result.impacted.len()));

        for category in CATEGORY_ORDER {
            let members: Vec<&ImpactedNode> = result
                .impacted
                .iter()
                .filter(|node| node.category == category)
                .collect();
            if members.is_empty() {
                continue;
            }

            output.push_str(&format!("### {} ({})\n", category, members.len()));
            for node in members {
                let marker = if node.is_seed { "*" } else { "-" };
                output.push_str(&format!("{} {} [{}]\n", marker, node.id, node.kind));
                if self.include_explanations {
                    output.push_str(&format!("    {}\n", node.explanation));
                }
            }
        }
        output.push('\n');
    }

    fn format_graph_summary(&self, output: &mut String, result: &ImpactResult) {
        let graph = &result.visualization;
        let highlighted = graph.nodes.iter().filter(|node| node.highlighted).count();

        output.push_str("## GRAPH\n");
        output.push_str(&format!(
            "NODES:{} EDGES:{} HIGHLIGHTED:{}\n",
            graph.nodes.len(),
            graph.edges.len(),
            highlighted
        ));

        let mut edge_counts: BTreeMap<&str, usize> = BTreeMap::new();
        for edge in &graph.edges {
            *edge_counts.entry(edge.kind.as_str()).or_insert(0) += 1;
        }
        for (kind, count) in edge_counts {
            output.push_str(&format!("{}: {}\n", kind, count));
        }
    }
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new()
    }
}
