//! Compilation state
//!
//! Every dictionary the reader fills and the annotator consults lives here,
//! so independent compilations never share anything.

use super::nodes::{AttributeGroup, AttributeNode, ElementGroup, Node, NodeArena, NodeId};
use super::CompileOptions;
use crate::error::{Warning, WarningKind};
use crate::namespaces::{NamespaceContext, SchemaNames};
use indexmap::IndexMap;

/// All state of a single compilation
#[derive(Debug, Clone, Default)]
pub struct CompilationContext {
    /// Options the compilation runs with
    pub options: CompileOptions,
    /// Names bound to the detected XSD prefix
    pub names: SchemaNames,
    /// Every node of the schema
    pub arena: NodeArena,
    /// Named elements and types (first registration wins)
    pub element_index: IndexMap<String, NodeId>,
    /// Named simple types
    pub simple_types: IndexMap<String, NodeId>,
    /// Nodes that resolved to a simple type
    pub simple_elements: IndexMap<String, NodeId>,
    /// Named attribute groups
    pub attribute_groups: IndexMap<String, AttributeGroup>,
    /// Named element groups
    pub element_groups: IndexMap<String, ElementGroup>,
    /// Substitution group members keyed by head name
    pub substitution_groups: IndexMap<String, Vec<String>>,
    /// Top-level attribute declarations
    pub global_attributes: IndexMap<String, AttributeNode>,
    /// Namespace bindings of the schema element
    pub namespaces: NamespaceContext,
    /// `targetNamespace` of the schema
    pub target_namespace: Option<String>,
    /// Recoverable problems, in the order found
    pub warnings: Vec<Warning>,
}

impl CompilationContext {
    /// Create an empty context
    pub fn new(options: CompileOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Record a recoverable problem
    pub fn warn(&mut self, kind: WarningKind, detail: impl Into<String>) {
        let warning = Warning::new(kind, detail);
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }

    /// Node behind a handle
    pub fn node(&self, id: NodeId) -> &Node {
        self.arena.get(id)
    }

    /// Element registered under `name`
    pub fn indexed_element(&self, name: &str) -> Option<NodeId> {
        self.element_index.get(name).copied()
    }

    /// Register a named node unless the name is already taken
    ///
    /// Returns whether the node was added.
    pub fn register_element(&mut self, name: &str, id: NodeId) -> bool {
        if name.is_empty() || self.element_index.contains_key(name) {
            return false;
        }
        self.element_index.insert(name.to_string(), id);
        true
    }

    /// Record `member` as substitutable for `head`
    pub fn add_substitution(&mut self, head: &str, member: &str) {
        let members = self.substitution_groups.entry(head.to_string()).or_default();
        if !members.iter().any(|m| m == member) {
            members.push(member.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::nodes::SimpleTypeNode;

    #[test]
    fn test_first_registration_wins() {
        let mut ctx = CompilationContext::default();
        let a = ctx.arena.alloc(Node::SimpleType(SimpleTypeNode::new("A")));
        let b = ctx.arena.alloc(Node::SimpleType(SimpleTypeNode::new("A")));

        assert!(ctx.register_element("A", a));
        assert!(!ctx.register_element("A", b));
        assert!(!ctx.register_element("", b));
        assert_eq!(ctx.indexed_element("A"), Some(a));
    }

    #[test]
    fn test_substitution_members_deduplicated() {
        let mut ctx = CompilationContext::default();
        ctx.add_substitution("Shape", "Circle");
        ctx.add_substitution("Shape", "Square");
        ctx.add_substitution("Shape", "Circle");
        assert_eq!(ctx.substitution_groups["Shape"], vec!["Circle", "Square"]);
    }

    #[test]
    fn test_warnings_accumulate() {
        let mut ctx = CompilationContext::default();
        ctx.warn(WarningKind::UndefinedGroup, "G");
        assert_eq!(ctx.warnings.len(), 1);
        assert_eq!(ctx.warnings[0].kind, WarningKind::UndefinedGroup);
    }
}
