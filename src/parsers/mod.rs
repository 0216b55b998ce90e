pub mod common;
pub mod python;

use anyhow::Result;
use std::path::Path;

use crate::core::model::{ModuleInfo, ParsedFile};

pub trait LanguageParser {
    /// Parses one file into its symbols and unresolved references.
    fn parse_file(&self, file_path: &Path, module: ModuleInfo) -> Result<ParsedFile>;
    fn language_name(&self) -> &str;
}

pub struct ParserFactory;

impl ParserFactory {
    pub fn new() -> Self {
        Self
    }

    pub fn get_parser(&self, language: &str) -> Result<Box<dyn LanguageParser + Send + Sync>> {
        match language {
            "python" => Ok(Box::new(python::PythonParser::new()?)),
            _ => anyhow::bail!("Unsupported language: {}", language),
        }
    }

    /// Language for a file extension, if any parser handles it.
    pub fn language_for_extension(&self, extension: &str) -> Option<&'static str> {
        match extension {
            "py" | "pyi" | "pyw" => Some("python"),
            _ => None,
        }
    }
}

impl Default for ParserFactory {
    fn default() -> Self {
        Self::new()
    }
}
