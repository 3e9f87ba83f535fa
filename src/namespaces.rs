//! XML namespace handling
//!
//! Detects which prefix a schema document binds to the XSD namespace and
//! classifies prefixed tag names into [`ConstructKind`]s once, at parse time.

use crate::builtins::BuiltinType;
use crate::{XSD_1_0_NAMESPACE, XSD_1_1_NAMESPACE};
use indexmap::IndexMap;

/// Namespace prefix mappings declared on the schema element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceContext {
    /// Mapping from prefix to namespace URI
    prefixes: IndexMap<String, String>,
    /// Default namespace (no prefix)
    default_namespace: Option<String>,
}

impl NamespaceContext {
    /// Create a new empty namespace context
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a namespace prefix mapping
    pub fn add_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    /// Set the default namespace
    pub fn set_default_namespace(&mut self, namespace: impl Into<String>) {
        self.default_namespace = Some(namespace.into());
    }

    /// Get the namespace for a prefix
    pub fn get_namespace(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(|s| s.as_str())
    }

    /// Get the prefix bound to a namespace URI
    pub fn get_prefix(&self, namespace: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .find(|(_, ns)| ns.as_str() == namespace)
            .map(|(prefix, _)| prefix.as_str())
    }

    /// Get the default namespace
    pub fn get_default_namespace(&self) -> Option<&str> {
        self.default_namespace.as_deref()
    }

    /// Iterate over `(prefix, namespace)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(p, n)| (p.as_str(), n.as_str()))
    }
}

/// Drop everything up to and including the last `:`
pub fn strip_namespace(value: &str) -> &str {
    value.rsplit(':').next().unwrap_or(value)
}

fn is_xsd_namespace(uri: &str) -> bool {
    uri == XSD_1_0_NAMESPACE || uri == XSD_1_1_NAMESPACE
}

/// Discover the XSD prefix from the first start tag of a document
///
/// Returns the prefix including its trailing `:`, the empty prefix when the
/// tag is unprefixed and no binding exists, or `None` when nothing can be
/// inferred.
pub fn detect_schema_prefix<'a, I>(tag: &str, attributes: I) -> Option<String>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    for (key, value) in attributes {
        if let Some(prefix) = key.strip_prefix("xmlns:") {
            if is_xsd_namespace(value) {
                return Some(format!("{}:", prefix));
            }
        }
    }

    if !tag.contains(':') {
        Some(String::new())
    } else {
        None
    }
}

/// Schema constructs the reader dispatches on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstructKind {
    /// `schema`
    Schema,
    /// `element`
    Element,
    /// `complexType`
    ComplexType,
    /// `any`
    Any,
    /// `group`
    Group,
    /// `sequence`
    Sequence,
    /// `choice`
    Choice,
    /// `all`
    All,
    /// `attribute`
    Attribute,
    /// `attributeGroup`
    AttributeGroup,
    /// `anyAttribute`
    AnyAttribute,
    /// `simpleContent`
    SimpleContent,
    /// `complexContent`
    ComplexContent,
    /// `extension`
    Extension,
    /// `simpleType`
    SimpleType,
    /// `restriction`
    Restriction,
    /// `enumeration`
    Enumeration,
    /// `minInclusive`
    MinInclusive,
    /// `maxInclusive`
    MaxInclusive,
    /// `whiteSpace`
    WhiteSpace,
    /// `union`
    Union,
    /// `list`
    List,
    /// `annotation`
    Annotation,
    /// `documentation`
    Documentation,
    /// Anything else, including non-XSD markup inside documentation
    Other,
}

impl ConstructKind {
    /// Map an XSD local name
    pub fn from_local_name(local: &str) -> Self {
        match local {
            "schema" => ConstructKind::Schema,
            "element" => ConstructKind::Element,
            "complexType" => ConstructKind::ComplexType,
            "any" => ConstructKind::Any,
            "group" => ConstructKind::Group,
            "sequence" => ConstructKind::Sequence,
            "choice" => ConstructKind::Choice,
            "all" => ConstructKind::All,
            "attribute" => ConstructKind::Attribute,
            "attributeGroup" => ConstructKind::AttributeGroup,
            "anyAttribute" => ConstructKind::AnyAttribute,
            "simpleContent" => ConstructKind::SimpleContent,
            "complexContent" => ConstructKind::ComplexContent,
            "extension" => ConstructKind::Extension,
            "simpleType" => ConstructKind::SimpleType,
            "restriction" => ConstructKind::Restriction,
            "enumeration" => ConstructKind::Enumeration,
            "minInclusive" => ConstructKind::MinInclusive,
            "maxInclusive" => ConstructKind::MaxInclusive,
            "whiteSpace" => ConstructKind::WhiteSpace,
            "union" => ConstructKind::Union,
            "list" => ConstructKind::List,
            "annotation" => ConstructKind::Annotation,
            "documentation" => ConstructKind::Documentation,
            _ => ConstructKind::Other,
        }
    }
}

/// Construct and built-in type names bound to the detected XSD prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaNames {
    prefix: String,
}

impl Default for SchemaNames {
    fn default() -> Self {
        Self::new("xs:")
    }
}

impl SchemaNames {
    /// Bind names to a prefix (including the trailing `:`, or empty)
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// The bound prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Classify a qualified tag name
    pub fn classify(&self, tag: &str) -> ConstructKind {
        match tag.strip_prefix(self.prefix.as_str()) {
            Some(local) if !local.contains(':') => ConstructKind::from_local_name(local),
            _ => ConstructKind::Other,
        }
    }

    /// Whether a type reference carries the XSD prefix
    pub fn is_xsd_qualified(&self, value: &str) -> bool {
        !self.prefix.is_empty() && value.starts_with(self.prefix.as_str())
    }

    /// Look up a prefixed type name among the built-ins
    pub fn builtin(&self, type_name: &str) -> Option<BuiltinType> {
        type_name
            .strip_prefix(self.prefix.as_str())
            .and_then(BuiltinType::from_local_name)
    }

    /// Whether a prefixed type name is a built-in simple type
    pub fn is_builtin(&self, type_name: &str) -> bool {
        self.builtin(type_name).is_some()
    }

    /// Prefixed name of a built-in type
    pub fn qualify(&self, builtin: BuiltinType) -> String {
        format!("{}{}", self.prefix, builtin.local_name())
    }

    /// The fallback type every unresolvable reference degrades to
    pub fn default_string(&self) -> String {
        self.qualify(BuiltinType::String)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_namespace() {
        assert_eq!(strip_namespace("xs:string"), "string");
        assert_eq!(strip_namespace("Color"), "Color");
        assert_eq!(strip_namespace("a:b:c"), "c");
    }

    #[test]
    fn test_detect_prefix_from_binding() {
        let attrs = vec![
            ("xmlns:tns", "http://example.com"),
            ("xmlns:xsd", XSD_1_0_NAMESPACE),
        ];
        assert_eq!(
            detect_schema_prefix("xsd:schema", attrs),
            Some("xsd:".to_string())
        );
    }

    #[test]
    fn test_detect_prefix_unprefixed() {
        let attrs = vec![("xmlns", XSD_1_0_NAMESPACE)];
        assert_eq!(detect_schema_prefix("schema", attrs), Some(String::new()));
        assert_eq!(detect_schema_prefix("xs:schema", Vec::new()), None);
    }

    #[test]
    fn test_classify() {
        let names = SchemaNames::new("xsd:");
        assert_eq!(names.classify("xsd:element"), ConstructKind::Element);
        assert_eq!(names.classify("xsd:minInclusive"), ConstructKind::MinInclusive);
        assert_eq!(names.classify("xs:element"), ConstructKind::Other);
        assert_eq!(names.classify("element"), ConstructKind::Other);

        let bare = SchemaNames::new("");
        assert_eq!(bare.classify("complexType"), ConstructKind::ComplexType);
        assert_eq!(bare.classify("html:p"), ConstructKind::Other);
    }

    #[test]
    fn test_builtin_lookup() {
        let names = SchemaNames::new("xs:");
        assert_eq!(names.builtin("xs:unsignedInt"), Some(BuiltinType::UnsignedInt));
        assert!(!names.is_builtin("unsignedInt"));
        assert!(!names.is_builtin("xs:Color"));
        assert_eq!(names.default_string(), "xs:string");
        assert!(names.is_xsd_qualified("xs:int"));
        assert!(!names.is_xsd_qualified("xsint"));
    }

    #[test]
    fn test_namespace_context() {
        let mut ctx = NamespaceContext::new();
        ctx.add_prefix("xs", XSD_1_0_NAMESPACE);
        ctx.set_default_namespace("http://example.com");

        assert_eq!(ctx.get_namespace("xs"), Some(XSD_1_0_NAMESPACE));
        assert_eq!(ctx.get_prefix(XSD_1_0_NAMESPACE), Some("xs"));
        assert_eq!(ctx.get_default_namespace(), Some("http://example.com"));
        assert_eq!(ctx.iter().count(), 1);
    }
}
