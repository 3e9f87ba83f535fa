//! Raw schema model
//!
//! Nodes live in a [`NodeArena`] and refer to each other through [`NodeId`]
//! handles. The reader creates them, the annotator mutates them in place, and
//! the resolved model exposes them read-only.

use crate::namespaces::{strip_namespace, SchemaNames};
use indexmap::IndexMap;
use rust_decimal::Decimal;

/// `maxOccurs="unbounded"`
pub const UNBOUNDED: u32 = 99999;

/// Type marker carried by `any` wildcards
pub const ANY_TYPE_MARKER: &str = "__ANY__";

/// Raw attribute map of a start tag, in document order
pub type Attrs = IndexMap<String, String>;

/// XSD boolean attribute value
pub(crate) fn is_true(value: &str) -> bool {
    let value = value.trim();
    value == "1" || value.eq_ignore_ascii_case("true")
}

/// Handle of a node inside a [`NodeArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position in the arena
    pub fn index(self) -> usize {
        self.0
    }
}

/// Which construct produced an [`ElementNode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// The `schema` root
    Schema,
    /// An `element` declaration
    Element,
    /// A top-level `complexType`
    ComplexType,
    /// A `group` definition or reference
    Group,
    /// The carrier of an `attributeGroup` definition
    AttributeGroup,
    /// An `any` wildcard
    Any,
}

/// Inclusive numeric bounds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeRestriction {
    /// `minInclusive`
    pub minimum: Option<Decimal>,
    /// `maxInclusive`
    pub maximum: Option<Decimal>,
}

/// Interpretation of the facets attached to a restriction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Restriction {
    /// Ordered set of literal values
    Enumeration(Vec<String>),
    /// Numeric range
    Range(RangeRestriction),
    /// Plain alias of the base type
    Unconstrained,
}

/// Facets collected while a restriction is open
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    enumeration: Vec<String>,
    range: Option<RangeRestriction>,
}

impl Facets {
    /// No enumeration and no bounds
    pub fn is_empty(&self) -> bool {
        self.enumeration.is_empty() && self.range.is_none()
    }

    /// Enumeration members in document order
    pub fn enumeration(&self) -> &[String] {
        &self.enumeration
    }

    /// Inclusive bounds, if any were declared
    pub fn range(&self) -> Option<&RangeRestriction> {
        self.range.as_ref()
    }

    /// Append an enumeration member, ignoring repeats
    pub fn push_enumeration(&mut self, value: impl Into<String>) {
        let value = value.into();
        if !self.enumeration.contains(&value) {
            self.enumeration.push(value);
        }
    }

    /// Set the lower bound, seeding the range record when needed
    pub fn set_minimum(&mut self, value: Decimal) {
        self.range.get_or_insert_with(RangeRestriction::default).minimum = Some(value);
    }

    /// Set the upper bound, seeding the range record when needed
    pub fn set_maximum(&mut self, value: Decimal) {
        self.range.get_or_insert_with(RangeRestriction::default).maximum = Some(value);
    }

    /// Decide what the collected facets mean
    pub fn restriction(&self) -> Restriction {
        if !self.enumeration.is_empty() {
            Restriction::Enumeration(self.enumeration.clone())
        } else if let Some(range) = &self.range {
            Restriction::Range(range.clone())
        } else {
            Restriction::Unconstrained
        }
    }
}

/// The `use` of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttributeUse {
    /// `optional` (the default)
    #[default]
    Optional,
    /// `required`
    Required,
    /// `prohibited`
    Prohibited,
}

impl AttributeUse {
    /// Parse the `use` attribute value, defaulting to optional
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "required" => AttributeUse::Required,
            "prohibited" => AttributeUse::Prohibited,
            _ => AttributeUse::Optional,
        }
    }

    /// The XSD spelling
    pub fn as_str(self) -> &'static str {
        match self {
            AttributeUse::Optional => "optional",
            AttributeUse::Required => "required",
            AttributeUse::Prohibited => "prohibited",
        }
    }
}

/// An `attribute` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeNode {
    /// Attribute name
    pub name: String,
    /// Identifier-safe name
    pub clean_name: String,
    /// Declared type (or restriction base)
    pub data_type: String,
    /// Built-in type the declared type resolves to
    pub resolved_type: Option<String>,
    /// optional / required / prohibited
    pub usage: AttributeUse,
    /// Default value
    pub default: Option<String>,
    /// Name of the global attribute this one refers to
    pub reference: Option<String>,
    /// Enumeration / range facets
    pub facets: Facets,
}

impl AttributeNode {
    /// Create an optional attribute
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            clean_name: crate::names::cleanup_name(&name),
            name,
            data_type: data_type.into(),
            resolved_type: None,
            usage: AttributeUse::Optional,
            default: None,
            reference: None,
            facets: Facets::default(),
        }
    }

    /// Resolved type when known, declared type otherwise
    pub fn type_name(&self) -> &str {
        self.resolved_type.as_deref().unwrap_or(&self.data_type)
    }

    /// Copy of this attribute under a different name
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            clean_name: crate::names::cleanup_name(&name),
            name,
            ..self.clone()
        }
    }
}

/// A named `attributeGroup` definition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeGroup {
    /// Group name
    pub name: String,
    /// Member attributes by name
    pub attributes: IndexMap<String, AttributeNode>,
    /// Attribute groups this group includes by reference
    pub group_refs: Vec<String>,
}

impl AttributeGroup {
    /// Create an empty group
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A named `group` definition; its node's children are the members
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementGroup {
    /// Group name
    pub name: String,
    /// Node holding the member declarations
    pub definition: NodeId,
}

/// Occurrence bounds declared on an enclosing `choice`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChoiceOccurs {
    /// Raw `minOccurs`
    pub min_occurs: Option<String>,
    /// Raw `maxOccurs`
    pub max_occurs: Option<String>,
}

/// A named `simpleType` definition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimpleTypeNode {
    /// Type name
    pub name: String,
    /// Restriction base, or list item type
    pub base: Option<String>,
    /// Whether the type is a `list`
    pub is_list: bool,
    /// `memberTypes` of a `union`
    pub union_members: Vec<String>,
    /// Enumeration / range facets
    pub facets: Facets,
    /// `whiteSpace value="collapse"`
    pub collapse_whitespace: bool,
    /// `default` attribute
    pub default: Option<String>,
    /// Restriction attributes, verbatim
    pub restriction_attrs: Attrs,
    /// Collected documentation text
    pub documentation: String,
}

impl SimpleTypeNode {
    /// Create an empty simple type
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// An `element`, `complexType`, `group`, `any` (or the `schema` root)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementNode {
    /// Producing construct
    pub kind: ElementKind,
    /// Name, synthesized from `type`/`ref` when absent
    pub name: String,
    /// Identifier-safe name after reserved-word mapping
    pub clean_name: String,
    /// Identifier-safe name before reserved-word mapping
    pub unmapped_clean_name: String,
    /// Start-tag attributes, with an inner `complexType`'s merged in
    pub attrs: Attrs,
    /// Type reference; replaced by the resolved type during annotation
    pub raw_type: Option<String>,
    /// The `type` attribute as written
    pub schema_type: Option<String>,
    /// The `ref` attribute, namespace stripped
    pub reference: Option<String>,
    /// Inheritance parent
    pub base: Option<String>,
    /// Base of a `complexContent` restriction
    pub restriction_base: Option<String>,
    /// Restriction attributes, verbatim
    pub restriction_attrs: Attrs,
    /// Normalized `minOccurs`
    pub min_occurs: u32,
    /// Normalized `maxOccurs`, [`UNBOUNDED`] for `unbounded`
    pub max_occurs: u32,
    /// `minOccurs = 0`
    pub optional: bool,
    /// Bounds of the enclosing `choice`
    pub choice_occurs: Option<ChoiceOccurs>,
    /// `abstract="true"`
    pub is_abstract: bool,
    /// Mixed content
    pub is_mixed: bool,
    /// Resolved as complex
    pub complex: bool,
    /// Declared directly under `schema`
    pub top_level: bool,
    /// Declares its own content (no `type`, no `ref`)
    pub explicit_define: bool,
    /// Contains `anyAttribute`
    pub any_attribute: bool,
    /// Contains `simpleContent`
    pub simple_content: bool,
    /// Value is a whitespace separated list
    pub is_list: bool,
    /// Whitespace collapses
    pub collapse_whitespace: bool,
    /// Some other node extends this one
    pub extended: bool,
    /// Mixed flag disagrees with the base chain
    pub mixed_extension_error: bool,
    /// Simple type named by `type`
    pub simple_type: Option<String>,
    /// Has an anonymous nested `simpleType`
    pub inline_simple_type: bool,
    /// Child declarations in document order
    pub children: Vec<NodeId>,
    /// Attribute declarations by name
    pub attribute_defs: IndexMap<String, AttributeNode>,
    /// `attributeGroup` definition being read
    pub open_attribute_group: Option<AttributeGroup>,
    /// Referenced attribute groups, merged during annotation
    pub attribute_group_refs: Vec<String>,
    /// Referenced element group, expanded during annotation
    pub group_ref: Option<String>,
    /// Enumeration / range facets
    pub facets: Facets,
    /// Ancestor simple types, nearest first
    pub simple_base_chain: Vec<String>,
    /// `default` attribute
    pub default: Option<String>,
    /// Collected documentation text
    pub documentation: String,
}

impl ElementNode {
    /// Build a node from start-tag attributes
    ///
    /// `name`, `type` and `ref` fall back on each other the way schema
    /// authors use them: a reference names the node and supplies its type.
    pub fn new(kind: ElementKind, mut attrs: Attrs, names: &SchemaNames) -> Self {
        let mut name = attrs
            .get("name")
            .map(|v| strip_namespace(v).to_string())
            .unwrap_or_default();
        let mut type_val = attrs.get("type").map(|v| {
            if names.is_xsd_qualified(v) {
                v.clone()
            } else {
                strip_namespace(v).to_string()
            }
        });
        let reference = attrs.get("ref").map(|v| strip_namespace(v).to_string());

        if name.is_empty() {
            if let Some(t) = type_val.as_ref().or(reference.as_ref()) {
                name = t.clone();
            }
        }
        if type_val.is_none() {
            type_val = reference.clone();
        }
        if !name.is_empty() {
            attrs.insert("name".to_string(), name.clone());
        }

        let is_abstract = attrs.get("abstract").map(|v| is_true(v)).unwrap_or(false);
        let default = attrs.get("default").cloned();
        let schema_type = attrs.get("type").cloned();
        let raw_type = if kind == ElementKind::Any {
            Some(ANY_TYPE_MARKER.to_string())
        } else {
            type_val
        };

        Self {
            kind,
            name,
            clean_name: String::new(),
            unmapped_clean_name: String::new(),
            attrs,
            raw_type,
            schema_type,
            reference,
            base: None,
            restriction_base: None,
            restriction_attrs: Attrs::new(),
            min_occurs: 1,
            max_occurs: 1,
            optional: false,
            choice_occurs: None,
            is_abstract,
            is_mixed: false,
            complex: false,
            top_level: false,
            explicit_define: false,
            any_attribute: false,
            simple_content: false,
            is_list: false,
            collapse_whitespace: false,
            extended: false,
            mixed_extension_error: false,
            simple_type: None,
            inline_simple_type: false,
            children: Vec::new(),
            attribute_defs: IndexMap::new(),
            open_attribute_group: None,
            attribute_group_refs: Vec::new(),
            group_ref: None,
            facets: Facets::default(),
            simple_base_chain: Vec::new(),
            default,
            documentation: String::new(),
        }
    }

    /// An `any` wildcard
    pub fn is_wildcard(&self) -> bool {
        self.raw_type.as_deref() == Some(ANY_TYPE_MARKER)
    }

    /// Record an ancestor simple type once
    pub fn add_simple_base(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.simple_base_chain.contains(&name) {
            self.simple_base_chain.push(name);
        }
    }
}

/// A raw node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// `element` / `complexType` / `group` / `any` / `schema`
    Element(ElementNode),
    /// `simpleType`
    SimpleType(SimpleTypeNode),
}

impl Node {
    /// Node name
    pub fn name(&self) -> &str {
        match self {
            Node::Element(e) => &e.name,
            Node::SimpleType(s) => &s.name,
        }
    }

    /// Inheritance or restriction base
    pub fn base(&self) -> Option<&str> {
        match self {
            Node::Element(e) => e.base.as_deref(),
            Node::SimpleType(s) => s.base.as_deref(),
        }
    }

    /// Facets of the node
    pub fn facets(&self) -> &Facets {
        match self {
            Node::Element(e) => &e.facets,
            Node::SimpleType(s) => &s.facets,
        }
    }

    /// Mutable facets of the node
    pub fn facets_mut(&mut self) -> &mut Facets {
        match self {
            Node::Element(e) => &mut e.facets,
            Node::SimpleType(s) => &mut s.facets,
        }
    }

    /// Store the attributes of an open restriction
    pub fn set_restriction_attrs(&mut self, attrs: Attrs) {
        match self {
            Node::Element(e) => e.restriction_attrs = attrs,
            Node::SimpleType(s) => s.restriction_attrs = attrs,
        }
    }

    /// Mark whitespace as collapsing
    pub fn set_collapse_whitespace(&mut self) {
        match self {
            Node::Element(e) => e.collapse_whitespace = true,
            Node::SimpleType(s) => s.collapse_whitespace = true,
        }
    }

    /// Collected documentation
    pub fn documentation(&self) -> &str {
        match self {
            Node::Element(e) => &e.documentation,
            Node::SimpleType(s) => &s.documentation,
        }
    }

    /// Append documentation text
    pub fn append_documentation(&mut self, text: &str) {
        let doc = match self {
            Node::Element(e) => &mut e.documentation,
            Node::SimpleType(s) => &mut s.documentation,
        };
        if !doc.is_empty() {
            doc.push(' ');
        }
        doc.push_str(text);
    }

    /// The element variant
    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            Node::Element(e) => Some(e),
            Node::SimpleType(_) => None,
        }
    }

    /// The element variant, mutably
    pub fn as_element_mut(&mut self) -> Option<&mut ElementNode> {
        match self {
            Node::Element(e) => Some(e),
            Node::SimpleType(_) => None,
        }
    }

    /// The simple type variant
    pub fn as_simple_type(&self) -> Option<&SimpleTypeNode> {
        match self {
            Node::SimpleType(s) => Some(s),
            Node::Element(_) => None,
        }
    }

    /// The simple type variant, mutably
    pub fn as_simple_type_mut(&mut self) -> Option<&mut SimpleTypeNode> {
        match self {
            Node::SimpleType(s) => Some(s),
            Node::Element(_) => None,
        }
    }
}

/// Owner of every node of one compilation
#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    /// Create an empty arena
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a node and hand out its handle
    pub fn alloc(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Node behind a handle
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Node behind a handle, mutably
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Element node behind a handle
    pub fn element(&self, id: NodeId) -> Option<&ElementNode> {
        self.get(id).as_element()
    }

    /// Element node behind a handle, mutably
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementNode> {
        self.get_mut(id).as_element_mut()
    }

    /// Simple type behind a handle
    pub fn simple_type(&self, id: NodeId) -> Option<&SimpleTypeNode> {
        self.get(id).as_simple_type()
    }

    /// Simple type behind a handle, mutably
    pub fn simple_type_mut(&mut self, id: NodeId) -> Option<&mut SimpleTypeNode> {
        self.get_mut(id).as_simple_type_mut()
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// No nodes yet
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Attrs {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_name_synthesized_from_ref() {
        let names = SchemaNames::new("xs:");
        let node = ElementNode::new(ElementKind::Element, attrs(&[("ref", "tns:Item")]), &names);
        assert_eq!(node.name, "Item");
        assert_eq!(node.raw_type.as_deref(), Some("Item"));
        assert_eq!(node.reference.as_deref(), Some("Item"));
    }

    #[test]
    fn test_builtin_type_keeps_prefix() {
        let names = SchemaNames::new("xs:");
        let node = ElementNode::new(
            ElementKind::Element,
            attrs(&[("name", "Count"), ("type", "xs:unsignedInt")]),
            &names,
        );
        assert_eq!(node.raw_type.as_deref(), Some("xs:unsignedInt"));

        let node = ElementNode::new(
            ElementKind::Element,
            attrs(&[("name", "Owner"), ("type", "tns:Person")]),
            &names,
        );
        assert_eq!(node.raw_type.as_deref(), Some("Person"));
        assert_eq!(node.schema_type.as_deref(), Some("tns:Person"));
    }

    #[test]
    fn test_wildcard_marker() {
        let names = SchemaNames::new("xs:");
        let node = ElementNode::new(ElementKind::Element, attrs(&[("name", "Solo")]), &names);
        assert!(!node.is_wildcard());

        let any = ElementNode::new(ElementKind::Any, Attrs::new(), &names);
        assert!(any.is_wildcard());
        assert_eq!(any.raw_type.as_deref(), Some(ANY_TYPE_MARKER));
    }

    #[test]
    fn test_abstract_flag() {
        let names = SchemaNames::default();
        let node = ElementNode::new(
            ElementKind::ComplexType,
            attrs(&[("name", "Base"), ("abstract", "TRUE")]),
            &names,
        );
        assert!(node.is_abstract);
    }

    #[test]
    fn test_facets_interpretation() {
        let mut facets = Facets::default();
        assert_eq!(facets.restriction(), Restriction::Unconstrained);

        facets.set_maximum(Decimal::from(10));
        assert_eq!(
            facets.restriction(),
            Restriction::Range(RangeRestriction {
                minimum: None,
                maximum: Some(Decimal::from(10)),
            })
        );

        facets.push_enumeration("red");
        facets.push_enumeration("blue");
        facets.push_enumeration("red");
        assert_eq!(
            facets.restriction(),
            Restriction::Enumeration(vec!["red".into(), "blue".into()])
        );
    }

    #[test]
    fn test_arena_variants() {
        let mut arena = NodeArena::new();
        let names = SchemaNames::default();
        let e = arena.alloc(Node::Element(ElementNode::new(
            ElementKind::Element,
            attrs(&[("name", "A")]),
            &names,
        )));
        let s = arena.alloc(Node::SimpleType(SimpleTypeNode::new("S")));

        assert_eq!(arena.len(), 2);
        assert!(arena.element(e).is_some());
        assert!(arena.element(s).is_none());
        assert_eq!(arena.get(s).name(), "S");

        arena.get_mut(e).append_documentation("first");
        arena.get_mut(e).append_documentation("second");
        assert_eq!(arena.get(e).documentation(), "first second");
    }

    #[test]
    fn test_attribute_renamed_keeps_type() {
        let mut attr = AttributeNode::new("id-ref", "xs:int");
        attr.usage = AttributeUse::Required;
        let renamed = attr.renamed("id-ref_attr");
        assert_eq!(renamed.clean_name, "id_ref_attr");
        assert_eq!(renamed.data_type, "xs:int");
        assert_eq!(renamed.usage, AttributeUse::Required);
    }
}
