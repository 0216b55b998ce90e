use anyhow::{anyhow, bail, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tree_sitter::{Language, Node as TSNode, Parser, Tree};

pub struct TreeSitterParser {
    parser: Parser,
}

impl TreeSitterParser {
    pub fn new(language: Language) -> Result<Self> {
        let mut parser = Parser::new();
        parser.set_language(language)?;
        Ok(Self { parser })
    }

    /// Parses `source`, rejecting trees that contain syntax errors.
    pub fn parse_source(&mut self, source: &str, file_path: &Path) -> Result<Tree> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| anyhow!("Failed to parse file: {}", file_path.display()))?;

        let root = tree.root_node();
        if root.has_error() {
            let line = first_error_line(&root).unwrap_or(1);
            bail!("syntax error near line {}", line);
        }
        Ok(tree)
    }
}

/// Buffered read of a whole source file. Non-UTF-8 content is an error.
pub fn read_source(file_path: &Path) -> Result<String> {
    let file = File::open(file_path)?;
    let file_size = file.metadata()?.len() as usize;

    let mut reader = BufReader::with_capacity(file_size.clamp(1, 8192), file);
    let mut content = String::with_capacity(file_size);
    reader.read_to_string(&mut content)?;
    Ok(content)
}

pub fn extract_text<'a>(node: &TSNode, source: &'a [u8]) -> &'a str {
    std::str::from_utf8(&source[node.byte_range()]).unwrap_or("")
}

pub fn find_child_by_kind<'t>(node: &TSNode<'t>, kind: &str) -> Option<TSNode<'t>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|child| child.kind() == kind);
    found
}

/// 1-based line of the first ERROR or MISSING node, in document order.
fn first_error_line(root: &TSNode) -> Option<usize> {
    let mut stack = vec![*root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node.start_position().row + 1);
        }
        if !node.has_error() {
            continue;
        }
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    None
}
