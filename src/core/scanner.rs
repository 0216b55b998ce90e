use anyhow::{bail, Result};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use super::model::{FileFailure, ModuleInfo, ParseResult, ParsedFile};
use crate::parsers::{LanguageParser, ParserFactory};

#[derive(Debug, Clone)]
pub struct FileInfo {
    pub path: PathBuf,
    pub relative_path: PathBuf,
    pub module_id: String,
    pub language: &'static str,
    pub size: u64,
}

/// Knobs for walking and reading a source tree.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// File extensions to analyze, without the leading dot.
    pub extensions: Vec<String>,
    pub follow_links: bool,
    /// Files larger than this are skipped and recorded as failures.
    pub max_file_bytes: Option<u64>,
}

impl ScanOptions {
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    pub fn with_max_file_bytes(mut self, limit: Option<u64>) -> Self {
        self.max_file_bytes = limit;
        self
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extensions: vec!["py".to_string()],
            follow_links: false,
            max_file_bytes: None,
        }
    }
}

/// Dotted module id for `path` relative to `root`: `pkg/sub/mod.py` is
/// `pkg.sub.mod`. Only `.py` is dropped, so `mod.pyi` stays `mod.pyi` and
/// never shares an id with `mod.py`.
pub fn module_id(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let relative = match relative.extension() {
        Some(extension) if extension == "py" => relative.with_extension(""),
        _ => relative.to_path_buf(),
    };
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join(".")
}

/// Files of a directory come before its subdirectories, each group sorted by
/// name, so the walk order is stable across platforms and runs.
fn walk_order(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

pub struct FileScanner {
    parser_factory: ParserFactory,
}

impl FileScanner {
    pub fn new() -> Self {
        Self {
            parser_factory: ParserFactory::new(),
        }
    }

    pub fn scan_directory(&self, root_path: &Path, options: &ScanOptions) -> Result<Vec<FileInfo>> {
        if !root_path.is_dir() {
            bail!("{} is not a directory", root_path.display());
        }

        let files = WalkDir::new(root_path)
            .follow_links(options.follow_links)
            .sort_by(walk_order)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    warn!(error = %err, "Skipping unreadable directory entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| self.file_info(root_path, &entry, options))
            .collect();

        Ok(files)
    }

    fn file_info(&self, root_path: &Path, entry: &DirEntry, options: &ScanOptions) -> Option<FileInfo> {
        let path = entry.path();
        let extension = path.extension()?.to_str()?;
        if !options.extensions.iter().any(|wanted| wanted == extension) {
            return None;
        }
        let language = self.parser_factory.language_for_extension(extension)?;

        Some(FileInfo {
            path: path.to_path_buf(),
            relative_path: path.strip_prefix(root_path).unwrap_or(path).to_path_buf(),
            module_id: module_id(root_path, path),
            language,
            size: entry.metadata().map(|m| m.len()).unwrap_or(0),
        })
    }
}

impl Default for FileScanner {
    fn default() -> Self {
        Self::new()
    }
}

type ParserTable = HashMap<&'static str, Box<dyn LanguageParser + Send + Sync>>;

/// Walks a source tree and folds every file's symbols and references into
/// one [`ParseResult`].
///
/// Files are parsed in parallel, but results are folded in walk order, so the
/// output matches a sequential scan exactly. A file that fails to read or
/// parse is recorded in [`ParseResult::failures`] and skipped.
pub struct SourceScanner {
    file_scanner: FileScanner,
    parser_factory: ParserFactory,
    options: ScanOptions,
}

impl SourceScanner {
    pub fn new() -> Self {
        Self::with_options(ScanOptions::default())
    }

    pub fn with_options(options: ScanOptions) -> Self {
        Self {
            file_scanner: FileScanner::new(),
            parser_factory: ParserFactory::new(),
            options,
        }
    }

    pub fn scan(&self, root_path: &Path) -> Result<ParseResult> {
        let files = self.file_scanner.scan_directory(root_path, &self.options)?;
        info!(root = %root_path.display(), files = files.len(), "Scanning source files");

        let parsers = self.parsers_for(&files)?;
        let outcomes: Vec<(FileInfo, Result<ParsedFile>)> = files
            .into_par_iter()
            .map(|file| {
                let outcome = self.parse_one(&parsers, &file);
                (file, outcome)
            })
            .collect();

        let result = outcomes
            .into_iter()
            .fold(ParseResult::default(), |acc, (file, outcome)| match outcome {
                Ok(parsed) => acc.absorb(parsed),
                Err(err) => {
                    warn!(path = %file.path.display(), error = %err, "Skipping file that failed to parse");
                    acc.with_failure(FileFailure {
                        path: file.relative_path,
                        message: format!("{err:#}"),
                    })
                }
            });

        debug!(
            modules = result.modules.len(),
            classes = result.classes.len(),
            functions = result.functions.len(),
            imports = result.imports.len(),
            calls = result.calls.len(),
            failures = result.failures.len(),
            "Scan complete"
        );
        Ok(result)
    }

    /// One parser per language present in `files`, shared by every worker.
    fn parsers_for(&self, files: &[FileInfo]) -> Result<ParserTable> {
        let mut parsers = ParserTable::new();
        for file in files {
            if !parsers.contains_key(file.language) {
                let parser = self.parser_factory.get_parser(file.language)?;
                parsers.insert(file.language, parser);
            }
        }
        Ok(parsers)
    }

    fn parse_one(&self, parsers: &ParserTable, file: &FileInfo) -> Result<ParsedFile> {
        if let Some(limit) = self.options.max_file_bytes {
            if file.size > limit {
                bail!("file is {} bytes, over the {} byte limit", file.size, limit);
            }
        }

        let Some(parser) = parsers.get(file.language) else {
            bail!("no parser for language {}", file.language);
        };
        parser.parse_file(
            &file.path,
            ModuleInfo {
                id: file.module_id.clone(),
                file_path: file.relative_path.clone(),
            },
        )
    }
}

impl Default for SourceScanner {
    fn default() -> Self {
        Self::new()
    }
}
