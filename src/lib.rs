//! # BLAST-RADIUS
//!
//! Estimate which parts of a codebase a proposed change is likely to affect.
//!
//! The pipeline runs in three stages, each built fresh per request:
//!
//! - **Scan**: walk the source tree and extract modules, classes, functions,
//!   imports and calls with a scope-aware tree-sitter walk
//! - **Assemble**: build a directed multigraph of `contains`, `imports` and
//!   `calls` references, resolving call targets by name
//! - **Analyze**: pick seed nodes from the change intent, collect everything
//!   that transitively depends on them, then classify and explain each hit
//!
//! ## Supported Languages
//!
//! Python

pub mod core;
pub mod formatters;
pub mod parsers;

pub use crate::core::{analyze, AnalysisError, CodebaseAnalyzer, ImpactResult, ScanOptions};
