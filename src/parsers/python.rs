use anyhow::Result;
use std::path::Path;
use tree_sitter::{Language, Node as TSNode};

use super::common::{extract_text, find_child_by_kind, read_source, TreeSitterParser};
use super::LanguageParser;
use crate::core::model::{
    CallRef, ClassInfo, FunctionInfo, ImportRef, ImportStyle, ModuleInfo, ParsedFile,
};

pub struct PythonParser {
    language: Language,
}

impl PythonParser {
    pub fn new() -> Result<Self> {
        let language = tree_sitter_python::language();
        // Fail early on an ABI mismatch rather than on the first file.
        TreeSitterParser::new(language)?;
        Ok(Self { language })
    }

    /// Extracts symbols and references from already-loaded source text.
    pub fn parse_source(
        &self,
        source: &str,
        file_path: &Path,
        module: ModuleInfo,
    ) -> Result<ParsedFile> {
        let mut parser = TreeSitterParser::new(self.language)?;
        let tree = parser.parse_source(source, file_path)?;
        let walker = ScopeWalker::new(source.as_bytes(), module);
        Ok(walker.walk(tree.root_node()))
    }
}

impl LanguageParser for PythonParser {
    fn parse_file(&self, file_path: &Path, module: ModuleInfo) -> Result<ParsedFile> {
        let source = read_source(file_path)?;
        self.parse_source(&source, file_path, module)
    }

    fn language_name(&self) -> &str {
        "python"
    }
}

/// The node shapes the scope walk distinguishes; everything else is `Other`.
#[derive(Debug)]
enum SyntaxNode<'s> {
    Module,
    Class { name: &'s str },
    Function { name: &'s str, is_async: bool },
    Import(Vec<ImportTarget>),
    Call { callee: Option<String> },
    Other,
}

#[derive(Debug)]
struct ImportTarget {
    module: String,
    member: Option<String>,
    style: ImportStyle,
}

fn classify<'s>(node: &TSNode, source: &'s [u8]) -> SyntaxNode<'s> {
    match node.kind() {
        "module" => SyntaxNode::Module,
        "class_definition" => match node.child_by_field_name("name") {
            Some(name) => SyntaxNode::Class {
                name: extract_text(&name, source),
            },
            None => SyntaxNode::Other,
        },
        "function_definition" => match node.child_by_field_name("name") {
            Some(name) => SyntaxNode::Function {
                name: extract_text(&name, source),
                is_async: node.child(0).is_some_and(|first| first.kind() == "async"),
            },
            None => SyntaxNode::Other,
        },
        "import_statement" => SyntaxNode::Import(plain_imports(node, source)),
        "import_from_statement" => SyntaxNode::Import(from_imports(node, source)),
        "future_import_statement" => {
            SyntaxNode::Import(imported_members(node, source, "__future__"))
        }
        "call" => SyntaxNode::Call {
            callee: callee_hint(node, source),
        },
        _ => SyntaxNode::Other,
    }
}

/// `import a.b, c as d` names `a.b` and `c`.
fn plain_imports(node: &TSNode, source: &[u8]) -> Vec<ImportTarget> {
    let mut cursor = node.walk();
    let names: Vec<_> = node.children_by_field_name("name", &mut cursor).collect();
    names
        .iter()
        .map(|name| ImportTarget {
            module: dotted_name(name, source).to_string(),
            member: None,
            style: ImportStyle::Import,
        })
        .collect()
}

/// `from m import x, y` yields one target per member, all pointing at `m`.
fn from_imports(node: &TSNode, source: &[u8]) -> Vec<ImportTarget> {
    let module = match node.child_by_field_name("module_name") {
        Some(name) if name.kind() == "relative_import" => find_child_by_kind(&name, "dotted_name")
            .map(|dotted| extract_text(&dotted, source))
            .unwrap_or(""),
        Some(name) => extract_text(&name, source),
        None => "",
    };
    imported_members(node, source, module)
}

fn imported_members(node: &TSNode, source: &[u8], module: &str) -> Vec<ImportTarget> {
    let mut cursor = node.walk();
    let names: Vec<_> = node.children_by_field_name("name", &mut cursor).collect();

    let mut members: Vec<String> = names
        .iter()
        .map(|name| dotted_name(name, source).to_string())
        .collect();
    if find_child_by_kind(node, "wildcard_import").is_some() {
        members.push("*".to_string());
    }

    members
        .into_iter()
        .map(|member| ImportTarget {
            module: module.to_string(),
            member: Some(member),
            style: ImportStyle::FromImport,
        })
        .collect()
}

/// The imported name of a `dotted_name` or `aliased_import`, alias dropped.
fn dotted_name<'s>(node: &TSNode, source: &'s [u8]) -> &'s str {
    if node.kind() == "aliased_import" {
        if let Some(name) = node.child_by_field_name("name") {
            return extract_text(&name, source);
        }
    }
    extract_text(node, source)
}

/// `f()` gives `f`, `obj.m()` gives `obj.m`, `a.b.m()` gives `m`.
/// Any other callee shape gives nothing.
fn callee_hint(call: &TSNode, source: &[u8]) -> Option<String> {
    let function = call.child_by_field_name("function")?;
    let hint = match function.kind() {
        "identifier" => extract_text(&function, source).to_string(),
        "attribute" => {
            let attribute = extract_text(&function.child_by_field_name("attribute")?, source);
            match function.child_by_field_name("object") {
                Some(object) if object.kind() == "identifier" => {
                    format!("{}.{}", extract_text(&object, source), attribute)
                }
                _ => attribute.to_string(),
            }
        }
        _ => return None,
    };
    (!hint.is_empty()).then_some(hint)
}

/// Queues the children of `node` in source order. The `visited` child has
/// already been recorded, so only its body is queued.
fn push_children<'t>(stack: &mut Vec<Step<'t>>, node: TSNode<'t>, visited: Option<TSNode<'t>>) {
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    stack.extend(children.into_iter().rev().map(|child| {
        if visited.is_some_and(|visited| visited.id() == child.id()) {
            Step::Body(child)
        } else {
            Step::Enter(child)
        }
    }));
}

#[derive(Debug, Clone, Default)]
struct Scope {
    class: Option<String>,
    function: Option<String>,
}

enum Step<'t> {
    Enter(TSNode<'t>),
    /// Visit only the children of a definition whose scope is already open.
    Body(TSNode<'t>),
    Leave,
}

/// Pre-order walk with an explicit scope stack. Class and function nodes push
/// a frame that is popped once their whole subtree has been visited.
///
/// A decorated definition opens its scope before its decorators are walked,
/// so calls inside `@decorator(...)` belong to the decorated symbol.
struct ScopeWalker<'s> {
    source: &'s [u8],
    scopes: Vec<Scope>,
    file: ParsedFile,
}

impl<'s> ScopeWalker<'s> {
    fn new(source: &'s [u8], module: ModuleInfo) -> Self {
        Self {
            source,
            scopes: vec![Scope::default()],
            file: ParsedFile::new(module),
        }
    }

    fn walk(mut self, root: TSNode) -> ParsedFile {
        let mut stack = vec![Step::Enter(root)];

        while let Some(step) = stack.pop() {
            let node = match step {
                Step::Enter(node) => node,
                Step::Body(node) => {
                    push_children(&mut stack, node, None);
                    continue;
                }
                Step::Leave => {
                    self.scopes.pop();
                    continue;
                }
            };

            if node.kind() == "decorated_definition" {
                let definition = node.child_by_field_name("definition");
                let opened = definition.filter(|definition| self.visit(definition));
                if opened.is_some() {
                    stack.push(Step::Leave);
                }
                push_children(&mut stack, node, opened);
                continue;
            }

            if self.visit(&node) {
                stack.push(Step::Leave);
            }
            push_children(&mut stack, node, None);
        }

        self.file
    }

    /// Records what `node` declares or references. Returns true when it
    /// opened a scope that must be closed after its subtree.
    fn visit(&mut self, node: &TSNode) -> bool {
        let line_number = node.start_position().row + 1;
        match classify(node, self.source) {
            SyntaxNode::Class { name } => {
                self.enter_class(name, line_number);
                true
            }
            SyntaxNode::Function { name, is_async } => {
                self.enter_function(name, is_async, line_number);
                true
            }
            SyntaxNode::Import(targets) => {
                self.record_imports(targets, line_number);
                false
            }
            SyntaxNode::Call { callee } => {
                if let Some(callee) = callee {
                    self.record_call(callee, line_number);
                }
                false
            }
            SyntaxNode::Module | SyntaxNode::Other => false,
        }
    }

    fn module_id(&self) -> &str {
        &self.file.module.id
    }

    fn current(&self) -> Scope {
        self.scopes.last().cloned().unwrap_or_default()
    }

    fn enter_class(&mut self, name: &str, line_number: usize) {
        let module = self.module_id().to_string();
        let id = format!("{}.{}", module, name);
        self.file.classes.push(ClassInfo {
            id: id.clone(),
            name: name.to_string(),
            module,
            line_number,
        });

        let scope = Scope {
            class: Some(id),
            ..self.current()
        };
        self.scopes.push(scope);
    }

    fn enter_function(&mut self, name: &str, is_async: bool, line_number: usize) {
        let current = self.current();
        let module = self.module_id().to_string();
        let id = format!("{}.{}", current.class.as_deref().unwrap_or(module.as_str()), name);
        self.file.functions.push(FunctionInfo {
            id: id.clone(),
            name: name.to_string(),
            module,
            class: current.class.clone(),
            line_number,
            is_async,
        });

        self.scopes.push(Scope {
            function: Some(id),
            ..current
        });
    }

    fn record_imports(&mut self, targets: Vec<ImportTarget>, line_number: usize) {
        let source_module = self.module_id().to_string();
        self.file
            .imports
            .extend(targets.into_iter().map(|target| ImportRef {
                source_module: source_module.clone(),
                target_module: target.module,
                imported_name: target.member,
                style: target.style,
                line_number,
            }));
    }

    fn record_call(&mut self, callee: String, line_number: usize) {
        let current = self.current();
        let caller = current
            .function
            .or(current.class)
            .unwrap_or_else(|| self.module_id().to_string());
        self.file.calls.push(CallRef {
            caller,
            callee,
            line_number,
        });
    }
}
