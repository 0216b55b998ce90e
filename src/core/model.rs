//! Flat records produced by the source scanner.
//!
//! Each parsed file yields a [`ParsedFile`]; the scanner folds those into a
//! single [`ParseResult`] in file-walk order. Nothing here is resolved yet:
//! import targets and call hints are carried exactly as written.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInfo {
    pub id: String,
    /// Path relative to the scan root.
    pub file_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassInfo {
    pub id: String,
    pub name: String,
    pub module: String,
    pub line_number: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub id: String,
    pub name: String,
    pub module: String,
    /// Enclosing class id, if the function is declared inside a class body.
    pub class: Option<String>,
    pub line_number: usize,
    pub is_async: bool,
}

impl FunctionInfo {
    /// The symbol that owns this function: its class, else its module.
    pub fn parent(&self) -> &str {
        self.class.as_deref().unwrap_or(&self.module)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportStyle {
    /// `import a.b`
    Import,
    /// `from a import b`
    FromImport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRef {
    pub source_module: String,
    /// Possibly partial, possibly empty (`from . import x`).
    pub target_module: String,
    /// The member named by a `from` import.
    pub imported_name: Option<String>,
    pub style: ImportStyle,
    pub line_number: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRef {
    pub caller: String,
    /// Best-effort callee name, not guaranteed to be a symbol id.
    pub callee: String,
    pub line_number: usize,
}

/// Everything extracted from one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedFile {
    pub module: ModuleInfo,
    pub classes: Vec<ClassInfo>,
    pub functions: Vec<FunctionInfo>,
    pub imports: Vec<ImportRef>,
    pub calls: Vec<CallRef>,
}

impl ParsedFile {
    pub fn new(module: ModuleInfo) -> Self {
        Self {
            module,
            classes: Vec::new(),
            functions: Vec::new(),
            imports: Vec::new(),
            calls: Vec::new(),
        }
    }
}

/// A file the scanner skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub message: String,
}

impl fmt::Display for FileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

/// Aggregate scanner output across all successfully parsed files.
///
/// Maps keep first-insertion position; a later duplicate id replaces the
/// metadata in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    pub modules: IndexMap<String, ModuleInfo>,
    pub classes: IndexMap<String, ClassInfo>,
    pub functions: IndexMap<String, FunctionInfo>,
    pub imports: Vec<ImportRef>,
    pub calls: Vec<CallRef>,
    pub failures: Vec<FileFailure>,
}

impl ParseResult {
    /// Folds one file's partial result into the aggregate.
    pub fn absorb(mut self, file: ParsedFile) -> Self {
        self.modules.insert(file.module.id.clone(), file.module);
        self.classes
            .extend(file.classes.into_iter().map(|c| (c.id.clone(), c)));
        self.functions
            .extend(file.functions.into_iter().map(|f| (f.id.clone(), f)));
        self.imports.extend(file.imports);
        self.calls.extend(file.calls);
        self
    }

    pub fn with_failure(mut self, failure: FileFailure) -> Self {
        self.failures.push(failure);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(module: &str, functions: &[(&str, usize)]) -> ParsedFile {
        let mut parsed = ParsedFile::new(ModuleInfo {
            id: module.to_string(),
            file_path: PathBuf::from(format!("{module}.py")),
        });
        for (name, line) in functions {
            parsed.functions.push(FunctionInfo {
                id: format!("{module}.{name}"),
                name: name.to_string(),
                module: module.to_string(),
                class: None,
                line_number: *line,
                is_async: false,
            });
        }
        parsed
    }

    #[test]
    fn absorb_preserves_fold_order() {
        let result = [file("b", &[("run", 1)]), file("a", &[("run", 1)])]
            .into_iter()
            .fold(ParseResult::default(), ParseResult::absorb);

        let modules: Vec<_> = result.modules.keys().cloned().collect();
        assert_eq!(modules, vec!["b", "a"]);
        let functions: Vec<_> = result.functions.keys().cloned().collect();
        assert_eq!(functions, vec!["b.run", "a.run"]);
    }

    #[test]
    fn duplicate_id_keeps_position_and_takes_latest_metadata() {
        let result = ParseResult::default().absorb(file("m", &[("f", 1), ("g", 4), ("f", 9)]));

        let ids: Vec<_> = result.functions.keys().cloned().collect();
        assert_eq!(ids, vec!["m.f", "m.g"]);
        assert_eq!(result.functions["m.f"].line_number, 9);
    }
}
