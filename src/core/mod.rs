pub mod analyzer;
pub mod assembler;
pub mod error;
pub mod graph;
pub mod impact;
pub mod model;
pub mod resolver;
pub mod scanner;

pub use analyzer::{analyze, CodebaseAnalyzer};
pub use assembler::GraphAssembler;
pub use error::{AnalysisError, AnalysisResult};
pub use graph::{DependencyGraph, GraphBuilder, Reference, ReferenceKind, Symbol, SymbolKind};
pub use impact::{ImpactAnalyzer, ImpactCategory, ImpactResult, ImpactedNode, Visualization};
pub use model::{FileFailure, ParseResult, ParsedFile};
pub use resolver::CallResolver;
pub use scanner::{FileScanner, ScanOptions, SourceScanner};
