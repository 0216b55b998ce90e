use tracing::{debug, warn};

use super::graph::{DependencyGraph, GraphBuilder, Reference, ReferenceKind, Symbol, SymbolKind};
use super::model::ParseResult;
use super::resolver::CallResolver;

/// Turns scanner output into a [`DependencyGraph`].
///
/// Output is deterministic for identical input: nodes are registered in
/// scan order, and call resolution depends on that order.
pub struct GraphAssembler;

impl GraphAssembler {
    pub fn new() -> Self {
        Self
    }

    pub fn assemble(&self, parsed: &ParseResult) -> DependencyGraph {
        let mut builder = GraphBuilder::new();

        self.register_symbols(&mut builder, parsed);
        self.link_containment(&mut builder, parsed);
        self.link_imports(&mut builder, parsed);
        self.link_calls(&mut builder, parsed);

        let graph = builder.build();
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Dependency graph assembled"
        );
        graph
    }

    fn register_symbols(&self, builder: &mut GraphBuilder, parsed: &ParseResult) {
        for id in parsed.modules.keys() {
            builder.add_node(Symbol::module(id));
        }
        for (id, class) in &parsed.classes {
            builder.add_node(Symbol::new(id, SymbolKind::Class, &class.name));
        }
        for (id, function) in &parsed.functions {
            builder.add_node(Symbol::new(id, SymbolKind::Function, &function.name));
        }
    }

    fn link_containment(&self, builder: &mut GraphBuilder, parsed: &ParseResult) {
        for (id, class) in &parsed.classes {
            builder.add_edge(Reference::new(ReferenceKind::Contains, &class.module, id));
        }
        for (id, function) in &parsed.functions {
            builder.add_edge(Reference::new(
                ReferenceKind::Contains,
                function.parent(),
                id,
            ));
        }
    }

    /// Import targets are taken at face value; one that names no scanned
    /// module becomes a module node of its own.
    fn link_imports(&self, builder: &mut GraphBuilder, parsed: &ParseResult) {
        for import in &parsed.imports {
            if import.target_module.is_empty() {
                debug!(
                    module = %import.source_module,
                    line = import.line_number,
                    "Ignoring import without a module name"
                );
                continue;
            }
            builder.add_node(Symbol::module(&import.target_module));
            builder.add_edge(Reference::new(
                ReferenceKind::Imports,
                &import.source_module,
                &import.target_module,
            ));
        }
    }

    /// Resolves each callee hint against the nodes registered so far; the
    /// external placeholders created here are not candidates themselves.
    fn link_calls(&self, builder: &mut GraphBuilder, parsed: &ParseResult) {
        let mut resolver = CallResolver::new();
        resolver.build_index(builder.node_ids());

        let mut external = 0usize;
        for call in &parsed.calls {
            let target = match resolver.resolve(&call.callee) {
                Some(target) => target.to_string(),
                None => {
                    let placeholder = Symbol::external(&call.callee);
                    let id = placeholder.id.clone();
                    if !builder.contains(&id) {
                        external += 1;
                    }
                    builder.add_node(placeholder);
                    id
                }
            };

            if builder
                .add_edge(Reference::new(ReferenceKind::Calls, &call.caller, target))
                .is_none()
            {
                warn!(caller = %call.caller, callee = %call.callee, "Dropping call from unknown caller");
            }
        }
        debug!(
            calls = parsed.calls.len(),
            external, "Call references linked"
        );
    }
}

impl Default for GraphAssembler {
    fn default() -> Self {
        Self::new()
    }
}
