//! Serializable model snapshot
//!
//! A flat, `serde`-friendly picture of a [`ResolvedModel`], used by the `xsdc`
//! binary for JSON output and handy for comparing compilations in tests.

use crate::compiler::nodes::{AttributeNode, Restriction, SimpleTypeNode};
use crate::compiler::{ElementRef, ResolvedModel, UNBOUNDED};
use serde::{Deserialize, Serialize};

/// Complete model dump
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ModelDump {
    /// Target namespace of the schema
    pub target_namespace: Option<String>,

    /// Detected XSD prefix
    pub xsd_prefix: String,

    /// Indexed elements and types, in registration order
    pub elements: Vec<ElementInfo>,

    /// Named simple type definitions
    pub simple_types: Vec<SimpleTypeInfo>,

    /// Substitution group members keyed by head
    pub substitution_groups: Vec<SubstitutionInfo>,

    /// Warnings, rendered
    pub warnings: Vec<String>,
}

impl ModelDump {
    /// Snapshot a resolved model
    pub fn from_model(model: &ResolvedModel) -> Self {
        let namespace = model.target_namespace();
        Self {
            target_namespace: namespace.map(str::to_string),
            xsd_prefix: model.xsd_prefix().to_string(),
            elements: model
                .all_named_elements()
                .map(|e| ElementInfo::from_element(e, namespace))
                .collect(),
            simple_types: model.simple_types().map(SimpleTypeInfo::from).collect(),
            substitution_groups: model
                .substitution_groups()
                .iter()
                .map(|(head, members)| SubstitutionInfo {
                    head: head.clone(),
                    members: members.clone(),
                })
                .collect(),
            warnings: model.warnings().iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Element entry by name
    pub fn element(&self, name: &str) -> Option<&ElementInfo> {
        self.elements.iter().find(|e| e.name == name)
    }
}

/// Element or type information
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementInfo {
    /// Declared name
    pub name: String,

    /// Name in `{namespace}localName` form
    pub qualified_name: String,

    /// Identifier-safe name
    pub clean_name: String,

    /// Resolved type
    #[serde(rename = "type")]
    pub element_type: Option<String>,

    /// Whether the node resolved as complex
    pub is_complex: bool,

    /// Inheritance parent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,

    /// Minimum occurrences
    pub min_occurs: u32,

    /// Maximum occurrences (None means unbounded)
    pub max_occurs: Option<u32>,

    /// Mixed content
    pub mixed: bool,

    /// Mixed flag disagrees with the base chain
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub mixed_extension_error: bool,

    /// Declared abstract
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_abstract: bool,

    /// Extended by another declaration
    pub extended: bool,

    /// Value restriction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restriction: Option<RestrictionInfo>,

    /// Attributes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeInfo>,

    /// Child elements in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub child_elements: Vec<ChildElementInfo>,
}

impl ElementInfo {
    fn from_element(element: ElementRef<'_>, namespace: Option<&str>) -> Self {
        Self {
            name: element.name().to_string(),
            qualified_name: format_qualified_name(namespace, element.name()),
            clean_name: element.clean_name().to_string(),
            element_type: element.type_name().map(str::to_string),
            is_complex: element.is_complex(),
            base: element.base().map(str::to_string),
            min_occurs: element.min_occurs(),
            max_occurs: max_occurs(element.max_occurs()),
            mixed: element.is_mixed(),
            mixed_extension_error: element.has_mixed_extension_error(),
            is_abstract: element.is_abstract(),
            extended: element.is_extended(),
            restriction: RestrictionInfo::from_restriction(element.restriction()),
            attributes: element.attributes().map(AttributeInfo::from).collect(),
            child_elements: element
                .children()
                .map(|c| ChildElementInfo {
                    name: c.name().to_string(),
                    element_type: c.type_name().unwrap_or_default().to_string(),
                    min_occurs: c.min_occurs(),
                    max_occurs: max_occurs(c.max_occurs()),
                })
                .collect(),
        }
    }
}

/// Child element reference
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChildElementInfo {
    /// Element name
    pub name: String,

    /// Resolved type
    #[serde(rename = "type")]
    pub element_type: String,

    /// Minimum occurrences
    pub min_occurs: u32,

    /// Maximum occurrences (None means unbounded)
    pub max_occurs: Option<u32>,
}

/// Attribute information
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttributeInfo {
    /// Attribute name (after duplicate-name fixups)
    pub name: String,

    /// Resolved type
    #[serde(rename = "type")]
    pub attr_type: String,

    /// Use mode: optional, required, prohibited
    #[serde(rename = "use")]
    pub use_mode: String,

    /// Default value
    pub default: Option<String>,

    /// Value restriction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restriction: Option<RestrictionInfo>,
}

impl From<&AttributeNode> for AttributeInfo {
    fn from(attr: &AttributeNode) -> Self {
        Self {
            name: attr.name.clone(),
            attr_type: attr.type_name().to_string(),
            use_mode: attr.usage.as_str().to_string(),
            default: attr.default.clone(),
            restriction: RestrictionInfo::from_restriction(attr.facets.restriction()),
        }
    }
}

/// Simple type information
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimpleTypeInfo {
    /// Type name
    pub name: String,

    /// Base type
    pub base_type: Option<String>,

    /// List-valued
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_list: bool,

    /// Union member types
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub union_members: Vec<String>,

    /// Whitespace collapses
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub collapse_whitespace: bool,

    /// Value restriction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restriction: Option<RestrictionInfo>,
}

impl From<&SimpleTypeNode> for SimpleTypeInfo {
    fn from(simple: &SimpleTypeNode) -> Self {
        Self {
            name: simple.name.clone(),
            base_type: simple.base.clone(),
            is_list: simple.is_list,
            union_members: simple.union_members.clone(),
            collapse_whitespace: simple.collapse_whitespace,
            restriction: RestrictionInfo::from_restriction(simple.facets.restriction()),
        }
    }
}

/// Substitution group
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubstitutionInfo {
    /// Head element
    pub head: String,

    /// Members, in declaration order
    pub members: Vec<String>,
}

/// Restriction information
///
/// Bounds are written as strings so decimal precision survives JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RestrictionInfo {
    /// `Enumeration` or `Range`
    pub kind: String,

    /// Lower bound of a range
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<String>,

    /// Upper bound of a range
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<String>,

    /// Values for enumeration restrictions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
}

impl RestrictionInfo {
    fn from_restriction(restriction: Restriction) -> Option<Self> {
        match restriction {
            Restriction::Enumeration(values) => Some(Self {
                kind: "Enumeration".to_string(),
                minimum: None,
                maximum: None,
                values: Some(values),
            }),
            Restriction::Range(range) => Some(Self {
                kind: "Range".to_string(),
                minimum: range.minimum.map(|d| d.to_string()),
                maximum: range.maximum.map(|d| d.to_string()),
                values: None,
            }),
            Restriction::Unconstrained => None,
        }
    }
}

fn max_occurs(value: u32) -> Option<u32> {
    (value < UNBOUNDED).then_some(value)
}

/// Format a qualified name in the {namespace}localName format
pub fn format_qualified_name(namespace: Option<&str>, local_name: &str) -> String {
    match namespace {
        Some(ns) => format!("{{{}}}{}", ns, local_name),
        None => local_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile_str;
    use pretty_assertions::assert_eq;

    const SCHEMA: &str = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
            targetNamespace="http://example.com/book">
        <xs:simpleType name="isbnType">
            <xs:restriction base="xs:string">
                <xs:enumeration value="0-306-40615-2"/>
            </xs:restriction>
        </xs:simpleType>
        <xs:element name="book">
            <xs:complexType>
                <xs:sequence>
                    <xs:element name="isbn" type="isbnType"/>
                    <xs:element name="pages" type="xs:int" maxOccurs="unbounded"/>
                </xs:sequence>
                <xs:attribute name="lang" type="xs:language" default="en"/>
            </xs:complexType>
        </xs:element>
    </xs:schema>"#;

    #[test]
    fn test_format_qualified_name() {
        assert_eq!(
            format_qualified_name(Some("http://example.com"), "test"),
            "{http://example.com}test"
        );
        assert_eq!(format_qualified_name(None, "local"), "local");
    }

    #[test]
    fn test_dump_contents() {
        let dump = compile_str(SCHEMA).unwrap().dump();

        assert_eq!(dump.target_namespace.as_deref(), Some("http://example.com/book"));
        assert_eq!(dump.xsd_prefix, "xs:");

        let book = dump.element("book").unwrap();
        assert_eq!(book.qualified_name, "{http://example.com/book}book");
        assert!(book.is_complex);
        assert_eq!(
            book.child_elements,
            vec![
                ChildElementInfo {
                    name: "isbn".to_string(),
                    element_type: "xs:string".to_string(),
                    min_occurs: 1,
                    max_occurs: Some(1),
                },
                ChildElementInfo {
                    name: "pages".to_string(),
                    element_type: "xs:int".to_string(),
                    min_occurs: 1,
                    max_occurs: None,
                },
            ]
        );
        assert_eq!(book.attributes[0].use_mode, "optional");
        assert_eq!(book.attributes[0].default.as_deref(), Some("en"));

        let isbn = &dump.simple_types[0];
        assert_eq!(isbn.name, "isbnType");
        assert_eq!(
            isbn.restriction.as_ref().and_then(|r| r.values.clone()),
            Some(vec!["0-306-40615-2".to_string()])
        );
    }

    #[test]
    fn test_dump_serialization() {
        let dump = compile_str(SCHEMA).unwrap().dump();

        let json = serde_json::to_string_pretty(&dump).unwrap();
        assert!(json.contains("\"type\": \"xs:int\""));

        let parsed: ModelDump = serde_json::from_str(&json).unwrap();
        assert_eq!(dump, parsed);
    }

    #[test]
    fn test_range_bounds_as_strings() {
        let info = RestrictionInfo::from_restriction(Restriction::Range(
            crate::compiler::RangeRestriction {
                minimum: Some("0.5".parse().unwrap()),
                maximum: None,
            },
        ))
        .unwrap();

        assert_eq!(info.kind, "Range");
        assert_eq!(info.minimum.as_deref(), Some("0.5"));
        assert_eq!(info.maximum, None);
    }
}
