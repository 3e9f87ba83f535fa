//! Resolved model
//!
//! The read-only result of a compilation. Generators walk it through
//! [`ResolvedModel`] lookups and [`ElementRef`] accessors; nothing here
//! mutates the underlying nodes.

use super::context::CompilationContext;
use super::nodes::{
    AttributeGroup, AttributeNode, ElementKind, ElementNode, Facets, NodeId, Restriction,
    SimpleTypeNode, UNBOUNDED,
};
use crate::builtins::BuiltinType;
use crate::dump::ModelDump;
use crate::error::Warning;
use crate::namespaces::{NamespaceContext, SchemaNames};
use indexmap::IndexMap;
use std::fmt;

/// What a restriction constrains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestrictionScope {
    /// The value itself
    Value,
    /// Each item of a list or repeated value
    Item,
}

/// A fully annotated schema
#[derive(Debug, Clone)]
pub struct ResolvedModel {
    ctx: CompilationContext,
    root: NodeId,
}

impl ResolvedModel {
    pub(crate) fn new(ctx: CompilationContext, root: NodeId) -> Self {
        Self { ctx, root }
    }

    /// The `schema` node
    pub fn root(&self) -> Option<ElementRef<'_>> {
        self.try_element_at(self.root)
    }

    /// Element or type registered under `name`
    pub fn lookup_element(&self, name: &str) -> Option<ElementRef<'_>> {
        self.ctx
            .indexed_element(name)
            .and_then(|id| self.try_element_at(id))
    }

    /// Named `simpleType` definition
    pub fn lookup_simple_type(&self, name: &str) -> Option<&SimpleTypeNode> {
        self.ctx
            .simple_types
            .get(name)
            .and_then(|id| self.ctx.arena.simple_type(*id))
    }

    /// Node that resolved to a simple type, by name
    pub fn lookup_simple_element(&self, name: &str) -> Option<ElementRef<'_>> {
        self.ctx
            .simple_elements
            .get(name)
            .and_then(|id| self.try_element_at(*id))
    }

    /// Every indexed element and type, in registration order
    pub fn all_named_elements(&self) -> impl Iterator<Item = ElementRef<'_>> + '_ {
        self.ctx
            .element_index
            .values()
            .filter_map(move |id| self.try_element_at(*id))
    }

    /// Every named simple type, in document order
    pub fn simple_types(&self) -> impl Iterator<Item = &SimpleTypeNode> + '_ {
        self.ctx
            .simple_types
            .values()
            .filter_map(move |id| self.ctx.arena.simple_type(*id))
    }

    /// Top-level declarations
    pub fn top_level_elements(&self) -> impl Iterator<Item = ElementRef<'_>> + '_ {
        self.all_named_elements().filter(|e| e.is_top_level())
    }

    /// Named attribute group
    pub fn attribute_group(&self, name: &str) -> Option<&AttributeGroup> {
        self.ctx.attribute_groups.get(name)
    }

    /// Top-level attribute declaration
    pub fn global_attribute(&self, name: &str) -> Option<&AttributeNode> {
        self.ctx.global_attributes.get(name)
    }

    /// Members of the substitution group headed by `head`
    pub fn substitution_group(&self, head: &str) -> &[String] {
        self.ctx
            .substitution_groups
            .get(head)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All substitution groups keyed by head
    pub fn substitution_groups(&self) -> &IndexMap<String, Vec<String>> {
        &self.ctx.substitution_groups
    }

    /// Recoverable problems found while compiling
    pub fn warnings(&self) -> &[Warning] {
        &self.ctx.warnings
    }

    /// `targetNamespace` of the schema
    pub fn target_namespace(&self) -> Option<&str> {
        self.ctx.target_namespace.as_deref()
    }

    /// Namespace bindings of the schema element
    pub fn namespaces(&self) -> &NamespaceContext {
        &self.ctx.namespaces
    }

    /// Detected XSD prefix, with its trailing `:` (empty when unprefixed)
    pub fn xsd_prefix(&self) -> &str {
        self.ctx.names.prefix()
    }

    /// Names bound to the detected prefix
    pub fn names(&self) -> &SchemaNames {
        &self.ctx.names
    }

    /// Serializable snapshot of the model
    pub fn dump(&self) -> ModelDump {
        ModelDump::from_model(self)
    }

    fn try_element_at(&self, id: NodeId) -> Option<ElementRef<'_>> {
        self.ctx.arena.element(id).map(|node| ElementRef {
            model: self,
            id,
            node,
        })
    }
}

/// Read-only view of one element, complex type, group or wildcard
#[derive(Clone, Copy)]
pub struct ElementRef<'m> {
    model: &'m ResolvedModel,
    id: NodeId,
    node: &'m ElementNode,
}

impl fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementRef")
            .field("id", &self.id)
            .field("name", &self.node.name)
            .field("type", &self.node.raw_type)
            .finish()
    }
}

impl<'m> ElementRef<'m> {
    /// Handle of the underlying node
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The underlying raw node
    pub fn node(&self) -> &'m ElementNode {
        self.node
    }

    /// Producing construct
    pub fn kind(&self) -> ElementKind {
        self.node.kind
    }

    /// Name as declared (or synthesized from type / ref)
    pub fn name(&self) -> &'m str {
        &self.node.name
    }

    /// Identifier-safe name
    pub fn clean_name(&self) -> &'m str {
        &self.node.clean_name
    }

    /// Resolved type: a prefixed built-in for simple nodes, a type name otherwise
    pub fn type_name(&self) -> Option<&'m str> {
        self.node.raw_type.as_deref()
    }

    /// The built-in type a simple node resolved to
    pub fn builtin(&self) -> Option<BuiltinType> {
        if self.node.complex {
            return None;
        }
        self.type_name().and_then(|t| self.model.names().builtin(t))
    }

    /// Has structure (children or attributes) rather than a simple value
    pub fn is_complex(&self) -> bool {
        self.node.complex
    }

    /// Child declarations in document order
    pub fn children(&self) -> impl Iterator<Item = ElementRef<'m>> + 'm {
        let model = self.model;
        self.node
            .children
            .iter()
            .filter_map(move |id| model.try_element_at(*id))
    }

    /// Attribute declarations
    pub fn attributes(&self) -> impl Iterator<Item = &'m AttributeNode> + 'm {
        self.node.attribute_defs.values()
    }

    /// Attribute by name
    pub fn attribute(&self, name: &str) -> Option<&'m AttributeNode> {
        self.node.attribute_defs.get(name)
    }

    /// Inheritance parent
    pub fn base(&self) -> Option<&'m str> {
        self.node.base.as_deref()
    }

    /// Inheritance parent, when it is a declaration of this schema
    pub fn base_element(&self) -> Option<ElementRef<'m>> {
        let model = self.model;
        self.base().and_then(|b| model.lookup_element(b))
    }

    /// Base of a `complexContent` restriction
    pub fn restriction_base(&self) -> Option<&'m str> {
        self.node.restriction_base.as_deref()
    }

    /// Normalized `minOccurs`
    pub fn min_occurs(&self) -> u32 {
        self.node.min_occurs
    }

    /// Normalized `maxOccurs`, [`UNBOUNDED`] for `unbounded`
    pub fn max_occurs(&self) -> u32 {
        self.node.max_occurs
    }

    /// `maxOccurs="unbounded"`
    pub fn is_unbounded(&self) -> bool {
        self.node.max_occurs >= UNBOUNDED
    }

    /// `minOccurs="0"`
    pub fn is_optional(&self) -> bool {
        self.node.optional
    }

    /// Mixed content
    pub fn is_mixed(&self) -> bool {
        self.node.is_mixed
    }

    /// Mixed flag disagrees with the base chain
    pub fn has_mixed_extension_error(&self) -> bool {
        self.node.mixed_extension_error
    }

    /// Some other declaration extends this one
    pub fn is_extended(&self) -> bool {
        self.node.extended
    }

    /// Declared `abstract`
    pub fn is_abstract(&self) -> bool {
        self.node.is_abstract
    }

    /// Value is a whitespace separated list
    pub fn is_list(&self) -> bool {
        self.node.is_list
    }

    /// An `any` wildcard
    pub fn is_wildcard(&self) -> bool {
        self.node.is_wildcard()
    }

    /// Declared directly under `schema`
    pub fn is_top_level(&self) -> bool {
        self.node.top_level
    }

    /// Declares its own content instead of naming a type
    pub fn is_explicit_define(&self) -> bool {
        self.node.explicit_define
    }

    /// Contains `anyAttribute`
    pub fn has_any_attribute(&self) -> bool {
        self.node.any_attribute
    }

    /// Contains `simpleContent`
    pub fn has_simple_content(&self) -> bool {
        self.node.simple_content
    }

    /// Whitespace collapses
    pub fn collapses_whitespace(&self) -> bool {
        self.node.collapse_whitespace
    }

    /// Enumeration / range facets, uninterpreted
    pub fn facets(&self) -> &'m Facets {
        &self.node.facets
    }

    /// Interpreted restriction
    pub fn restriction(&self) -> Restriction {
        self.node.facets.restriction()
    }

    /// Whether [`restriction`](Self::restriction) applies per item
    pub fn restriction_scope(&self) -> RestrictionScope {
        if self.node.is_list || self.node.max_occurs > 1 {
            RestrictionScope::Item
        } else {
            RestrictionScope::Value
        }
    }

    /// Ancestor simple types, nearest first
    pub fn simple_base_chain(&self) -> &'m [String] {
        &self.node.simple_base_chain
    }

    /// Simple type named by `type`
    pub fn simple_type(&self) -> Option<&'m SimpleTypeNode> {
        let model = self.model;
        self.node
            .simple_type
            .as_deref()
            .and_then(|name| model.lookup_simple_type(crate::namespaces::strip_namespace(name)))
    }

    /// `default` attribute
    pub fn default_value(&self) -> Option<&'m str> {
        self.node.default.as_deref()
    }

    /// Collected documentation text
    pub fn documentation(&self) -> &'m str {
        &self.node.documentation
    }

    /// Members of this element's substitution group
    pub fn substitutes(&self) -> &'m [String] {
        self.model.substitution_group(&self.node.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile_str;
    use pretty_assertions::assert_eq;

    const SCHEMA: &str = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
            xmlns:tns="urn:shapes" targetNamespace="urn:shapes">
        <xsd:simpleType name="Percent">
            <xsd:restriction base="xsd:integer">
                <xsd:minInclusive value="0"/>
                <xsd:maxInclusive value="100"/>
            </xsd:restriction>
        </xsd:simpleType>
        <xsd:simpleType name="Tags">
            <xsd:list itemType="xsd:string"/>
        </xsd:simpleType>
        <xsd:complexType name="Shape" abstract="true">
            <xsd:sequence>
                <xsd:element name="opacity" type="Percent"/>
                <xsd:element name="label" type="xsd:string" minOccurs="0" maxOccurs="unbounded"/>
            </xsd:sequence>
            <xsd:attribute name="id" type="xsd:ID" use="required"/>
        </xsd:complexType>
        <xsd:complexType name="Circle">
            <xsd:complexContent>
                <xsd:extension base="tns:Shape">
                    <xsd:sequence>
                        <xsd:element name="radius" type="xsd:double"/>
                        <xsd:element name="tags" type="Tags"/>
                    </xsd:sequence>
                </xsd:extension>
            </xsd:complexContent>
        </xsd:complexType>
        <xsd:element name="shape" type="tns:Shape"/>
        <xsd:element name="circle" type="tns:Circle" substitutionGroup="tns:shape"/>
    </xsd:schema>"#;

    #[test]
    fn test_lookup_and_children() {
        let model = compile_str(SCHEMA).unwrap();
        let shape = model.lookup_element("Shape").unwrap();

        assert!(shape.is_complex());
        assert!(shape.is_abstract());
        assert!(shape.is_extended());
        let names: Vec<_> = shape.children().map(|c| c.name()).collect();
        assert_eq!(names, vec!["opacity", "label"]);

        let label = shape.children().nth(1).unwrap();
        assert!(label.is_optional());
        assert!(label.is_unbounded());
        assert_eq!(label.builtin(), Some(BuiltinType::String));
    }

    #[test]
    fn test_range_restriction() {
        let model = compile_str(SCHEMA).unwrap();
        let opacity = model
            .lookup_element("Shape")
            .unwrap()
            .children()
            .next()
            .unwrap();

        assert_eq!(opacity.type_name(), Some("xsd:integer"));
        match opacity.restriction() {
            Restriction::Range(range) => {
                assert_eq!(range.minimum, Some(0.into()));
                assert_eq!(range.maximum, Some(100.into()));
            }
            other => panic!("expected a range, got {:?}", other),
        }
        assert_eq!(opacity.restriction_scope(), RestrictionScope::Value);
    }

    #[test]
    fn test_base_and_list() {
        let model = compile_str(SCHEMA).unwrap();
        let circle = model.lookup_element("Circle").unwrap();

        assert_eq!(circle.base(), Some("Shape"));
        assert_eq!(circle.base_element().unwrap().name(), "Shape");
        assert!(!circle.is_extended());

        let tags = circle.children().find(|c| c.name() == "tags").unwrap();
        assert!(tags.is_list());
        assert_eq!(tags.restriction_scope(), RestrictionScope::Item);
        assert!(model.lookup_simple_type("Tags").unwrap().is_list);
    }

    #[test]
    fn test_identity_attribute_coerced() {
        let model = compile_str(SCHEMA).unwrap();
        let id = model.lookup_element("Shape").unwrap().attribute("id").unwrap();
        assert_eq!(id.type_name(), "xsd:string");
    }

    #[test]
    fn test_schema_level_data() {
        let model = compile_str(SCHEMA).unwrap();

        assert_eq!(model.target_namespace(), Some("urn:shapes"));
        assert_eq!(model.namespaces().get_namespace("tns"), Some("urn:shapes"));
        assert_eq!(model.xsd_prefix(), "xsd:");
        assert_eq!(model.substitution_group("shape"), ["circle".to_string()]);
        assert_eq!(
            model.lookup_element("shape").unwrap().substitutes(),
            ["circle".to_string()]
        );
        assert!(model.substitution_group("missing").is_empty());
        assert!(model.warnings().is_empty());
    }

    #[test]
    fn test_all_named_elements_in_order() {
        let model = compile_str(SCHEMA).unwrap();
        let top: Vec<_> = model.top_level_elements().map(|e| e.name()).collect();
        assert_eq!(top, vec!["Shape", "Circle", "shape", "circle"]);
        assert!(model.all_named_elements().count() >= top.len());
        assert_eq!(model.root().unwrap().kind(), ElementKind::Schema);
    }
}
