use std::path::Path;
use tracing::{info, warn};

use super::error::{AnalysisError, AnalysisResult};
use super::{DependencyGraph, GraphAssembler, ImpactAnalyzer, ImpactResult, ParseResult};
use super::scanner::{ScanOptions, SourceScanner};

/// Runs scan, assemble and analyze for one request. Holds no graph state
/// between calls; every call builds and drops its own graph.
pub struct CodebaseAnalyzer {
    source_scanner: SourceScanner,
    graph_assembler: GraphAssembler,
}

impl CodebaseAnalyzer {
    pub fn new() -> Self {
        Self::with_options(ScanOptions::default())
    }

    pub fn with_options(options: ScanOptions) -> Self {
        Self {
            source_scanner: SourceScanner::with_options(options),
            graph_assembler: GraphAssembler::new(),
        }
    }

    /// Scans `root_path` and assembles its dependency graph.
    pub fn build_graph(&self, root_path: &Path) -> AnalysisResult<(DependencyGraph, ParseResult)> {
        if !root_path.is_dir() {
            return Err(AnalysisError::InvalidRoot(root_path.to_path_buf()));
        }

        let parsed = self
            .source_scanner
            .scan(root_path)
            .map_err(AnalysisError::Scan)?;
        for failure in &parsed.failures {
            warn!(%failure, "File excluded from analysis");
        }

        let graph = self.graph_assembler.assemble(&parsed);
        Ok((graph, parsed))
    }

    pub fn analyze(&self, root_path: &Path, intent: &str) -> AnalysisResult<ImpactResult> {
        if intent.trim().is_empty() {
            return Err(AnalysisError::EmptyIntent);
        }

        let (graph, parsed) = self.build_graph(root_path)?;
        info!(
            files = parsed.modules.len(),
            skipped = parsed.failures.len(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Analyzing change intent"
        );

        let result = ImpactAnalyzer::new(&graph).analyze(intent)?;
        info!(
            seeds = result.seeds.len(),
            impacted = result.impacted.len(),
            "Blast radius computed"
        );
        Ok(result)
    }
}

impl Default for CodebaseAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot analysis with default scan options.
pub fn analyze(root_path: impl AsRef<Path>, intent: &str) -> AnalysisResult<ImpactResult> {
    CodebaseAnalyzer::new().analyze(root_path.as_ref(), intent)
}
