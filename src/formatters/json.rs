use anyhow::Result;
use serde_json::json;
use std::fs;
use std::path::Path;

use crate::core::{AnalysisError, ImpactResult};

/// Serializes an [`ImpactResult`] as the JSON payload graph renderers consume:
/// `{intent, seeds, impacts, graph: {nodes, edges}}`.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn format(&self, result: &ImpactResult) -> Result<String> {
        let content = if self.pretty {
            serde_json::to_string_pretty(result)?
        } else {
            serde_json::to_string(result)?
        };
        Ok(content)
    }

    pub fn format_to_file(&self, result: &ImpactResult, output_path: &Path) -> Result<()> {
        fs::write(output_path, self.format(result)?)?;
        Ok(())
    }

    /// `{"error": "..."}` for a failed analysis.
    pub fn format_error(&self, error: &AnalysisError) -> Result<String> {
        let payload = json!({ "error": error.to_string() });
        let content = if self.pretty {
            serde_json::to_string_pretty(&payload)?
        } else {
            serde_json::to_string(&payload)?
        };
        Ok(content)
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}
