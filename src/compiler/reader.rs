//! Streaming schema reader
//!
//! Turns the event stream of a flattened schema document into the raw node
//! tree. The reader keeps an explicit stack of open constructs and an
//! explicit stack of open nodes; only constructs that create nodes push onto
//! the latter.

use super::context::CompilationContext;
use super::nodes::{
    is_true, AttributeGroup, AttributeNode, AttributeUse, Attrs, ChoiceOccurs, ElementGroup,
    ElementKind, ElementNode, Node, NodeId, SimpleTypeNode,
};
use crate::error::{MalformedSchema, Result, WarningKind};
use crate::namespaces::{detect_schema_prefix, strip_namespace, ConstructKind, SchemaNames};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

/// An open construct
#[derive(Debug)]
struct Frame {
    kind: ConstructKind,
    tag: String,
    pushed: bool,
}

/// An open `sequence`, `choice` or `all`
#[derive(Debug)]
struct Compositor {
    /// Node stack depth when the compositor opened
    owner_depth: usize,
    /// Occurrence bounds when the compositor is a `choice`
    choice: Option<ChoiceOccurs>,
}

/// Where the most recent `attribute` was stored
#[derive(Debug, Clone)]
enum AttributeSlot {
    Global(String),
    Group(NodeId, String),
    Local(NodeId, String),
}

/// Event-driven builder of the raw tree
pub struct SchemaReader<'a> {
    ctx: &'a mut CompilationContext,
    frames: Vec<Frame>,
    stack: Vec<NodeId>,
    compositors: Vec<Compositor>,
    last_attribute: Option<AttributeSlot>,
    first_element: bool,
    root: Option<NodeId>,
}

impl<'a> SchemaReader<'a> {
    /// Create a reader filling `ctx`
    pub fn new(ctx: &'a mut CompilationContext) -> Self {
        Self {
            ctx,
            frames: Vec::new(),
            stack: Vec::new(),
            compositors: Vec::new(),
            last_attribute: None,
            first_element: true,
            root: None,
        }
    }

    /// Read a whole document and return the schema root
    pub fn read(mut self, input: &[u8]) -> Result<NodeId> {
        let mut reader = Reader::from_reader(input);
        reader.trim_text(true);
        let mut buf = Vec::new();

        loop {
            let event = reader.read_event_into(&mut buf);
            let position = reader.buffer_position();
            let done = self.handle(event, input, position)?;
            buf.clear();
            if done {
                break;
            }
        }

        if !self.frames.is_empty() {
            return Err(self
                .malformed(None, "unexpected end of document", input, input.len())
                .into());
        }

        self.root.ok_or_else(|| {
            MalformedSchema::new("schema", "document contains no schema element").into()
        })
    }

    /// Dispatch one event; returns `true` at end of input
    fn handle(
        &mut self,
        event: quick_xml::Result<Event<'_>>,
        input: &[u8],
        position: usize,
    ) -> Result<bool> {
        match event {
            Ok(Event::Start(e)) => self.start(&e, input, position)?,
            Ok(Event::Empty(e)) => {
                self.start(&e, input, position)?;
                self.end(input, position)?;
            }
            Ok(Event::End(_)) => self.end(input, position)?,
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(|err| {
                    self.malformed(None, format!("failed to unescape text: {}", err), input, position)
                })?;
                self.text(&text);
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(&e).into_owned();
                self.text(&text);
            }
            Ok(Event::Eof) => return Ok(true),
            Err(e) => {
                return Err(self
                    .malformed(None, format!("XML syntax error: {}", e), input, position)
                    .into())
            }
            // Comments, processing instructions and the declaration carry nothing
            _ => {}
        }
        Ok(false)
    }

    fn malformed(
        &self,
        construct: Option<&str>,
        message: impl Into<String>,
        input: &[u8],
        position: usize,
    ) -> MalformedSchema {
        let construct = construct
            .or_else(|| self.frames.last().map(|f| f.tag.as_str()))
            .unwrap_or("document");
        MalformedSchema::new(construct, message).with_location(line_column(input, position))
    }

    fn start(&mut self, e: &BytesStart, input: &[u8], position: usize) -> Result<()> {
        let tag = std::str::from_utf8(e.name().as_ref())
            .map_err(|err| {
                self.malformed(None, format!("invalid tag name: {}", err), input, position)
            })?
            .to_string();
        let attrs = collect_attrs(e)
            .map_err(|message| self.malformed(Some(&tag), message, input, position))?;

        if self.first_element {
            self.first_element = false;
            let pairs = attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()));
            if let Some(prefix) = detect_schema_prefix(&tag, pairs) {
                debug!(prefix = %prefix, "detected XSD prefix");
                self.ctx.names = SchemaNames::new(prefix);
            }
        }

        self.ctx.options.limits.check_xml_depth(self.frames.len() + 1)?;

        let kind = self.ctx.names.classify(&tag);
        debug!(tag = %tag, ?kind, stack = self.stack.len(), "start element");
        let pushed = self.open(kind, attrs);
        self.frames.push(Frame { kind, tag, pushed });
        Ok(())
    }

    fn end(&mut self, input: &[u8], position: usize) -> Result<()> {
        let frame = match self.frames.pop() {
            Some(frame) => frame,
            None => {
                return Err(self
                    .malformed(None, "end tag without start tag", input, position)
                    .into())
            }
        };
        debug!(tag = %frame.tag, stack = self.stack.len(), "end element");

        match frame.kind {
            ConstructKind::Schema => {
                if self.stack.len() != 1 {
                    let message =
                        format!("unbalanced node stack: {} open nodes", self.stack.len());
                    return Err(self
                        .malformed(Some(&frame.tag), message, input, position)
                        .into());
                }
                self.root = self.stack.pop();
            }
            ConstructKind::Element | ConstructKind::ComplexType | ConstructKind::Any
                if frame.pushed =>
            {
                self.close_child();
            }
            ConstructKind::Group if frame.pushed => self.close_group(),
            ConstructKind::AttributeGroup if frame.pushed => self.close_attribute_group(),
            ConstructKind::SimpleType if frame.pushed => {
                self.stack.pop();
            }
            ConstructKind::Sequence | ConstructKind::Choice | ConstructKind::All => {
                self.compositors.pop();
            }
            ConstructKind::Attribute => self.last_attribute = None,
            _ => {}
        }
        Ok(())
    }

    fn text(&mut self, text: &str) {
        if !self.within(ConstructKind::Documentation) || self.stack.len() < 2 {
            return;
        }
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if text.is_empty() {
            return;
        }
        if let Some(id) = self.top() {
            self.ctx.arena.get_mut(id).append_documentation(&text);
        }
    }

    fn open(&mut self, kind: ConstructKind, attrs: Attrs) -> bool {
        match kind {
            ConstructKind::Schema => {
                self.open_schema(attrs);
                true
            }
            ConstructKind::Element => {
                self.open_element(ElementKind::Element, attrs);
                true
            }
            ConstructKind::ComplexType if self.stack.len() == 1 => {
                self.open_element(ElementKind::ComplexType, attrs);
                true
            }
            ConstructKind::ComplexType => {
                self.merge_complex_type(attrs);
                false
            }
            ConstructKind::Any => {
                let node = ElementNode::new(ElementKind::Any, attrs, &self.ctx.names);
                self.push_node(Node::Element(node));
                true
            }
            ConstructKind::Group => {
                let mut node = ElementNode::new(ElementKind::Group, attrs, &self.ctx.names);
                node.top_level = self.stack.len() == 1;
                node.group_ref = node.attrs.get("ref").cloned();
                self.push_node(Node::Element(node));
                true
            }
            ConstructKind::Sequence | ConstructKind::All => {
                self.compositors.push(Compositor {
                    owner_depth: self.stack.len(),
                    choice: None,
                });
                false
            }
            ConstructKind::Choice => {
                self.compositors.push(Compositor {
                    owner_depth: self.stack.len(),
                    choice: Some(ChoiceOccurs {
                        min_occurs: attrs.get("minOccurs").cloned(),
                        max_occurs: attrs.get("maxOccurs").cloned(),
                    }),
                });
                false
            }
            ConstructKind::Attribute => {
                self.open_attribute(attrs);
                false
            }
            ConstructKind::AttributeGroup => self.open_attribute_group(attrs),
            ConstructKind::AnyAttribute => {
                if let Some(node) = self.top_element_mut() {
                    node.any_attribute = true;
                }
                false
            }
            ConstructKind::SimpleContent => {
                if let Some(node) = self.top_element_mut() {
                    node.simple_content = true;
                }
                false
            }
            ConstructKind::ComplexContent => {
                if attrs.get("mixed").map(|m| is_true(m)).unwrap_or(false) {
                    if let Some(node) = self.top_element_mut() {
                        node.is_mixed = true;
                    }
                }
                false
            }
            ConstructKind::Extension => {
                self.open_extension(&attrs);
                false
            }
            ConstructKind::SimpleType => self.open_simple_type(attrs),
            ConstructKind::Restriction => {
                self.open_restriction(attrs);
                false
            }
            ConstructKind::Enumeration
            | ConstructKind::MinInclusive
            | ConstructKind::MaxInclusive => {
                self.open_facet(kind, &attrs);
                false
            }
            ConstructKind::WhiteSpace => {
                let collapse = attrs.get("value").map(|v| v == "collapse").unwrap_or(false);
                if collapse && self.within(ConstructKind::Restriction) {
                    if let Some(id) = self.top() {
                        self.ctx.arena.get_mut(id).set_collapse_whitespace();
                    }
                }
                false
            }
            ConstructKind::Union => {
                if let Some(members) = attrs.get("memberTypes") {
                    if let Some(st) = self.top_simple_type_mut() {
                        st.union_members
                            .extend(members.split_whitespace().map(str::to_string));
                    }
                }
                false
            }
            ConstructKind::List => {
                if self.within(ConstructKind::SimpleType) {
                    if let Some(st) = self.top_simple_type_mut() {
                        st.is_list = true;
                        if let Some(item) = attrs.get("itemType") {
                            st.base = Some(item.clone());
                        }
                    }
                }
                false
            }
            ConstructKind::Annotation | ConstructKind::Documentation | ConstructKind::Other => {
                false
            }
        }
    }

    fn open_schema(&mut self, attrs: Attrs) {
        for (key, value) in &attrs {
            if key == "xmlns" {
                self.ctx.namespaces.set_default_namespace(value.as_str());
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                self.ctx.namespaces.add_prefix(prefix, value.as_str());
            } else if key == "targetNamespace" {
                self.ctx.target_namespace = Some(value.clone());
            }
        }
        let node = ElementNode::new(ElementKind::Schema, attrs, &self.ctx.names);
        self.push_node(Node::Element(node));
    }

    fn open_element(&mut self, kind: ElementKind, attrs: Attrs) {
        let explicit_define = !attrs.contains_key("type") && !attrs.contains_key("ref");
        let substitution = match (attrs.get("substitutionGroup"), attrs.get("name")) {
            (Some(head), Some(name)) => Some((strip_namespace(head).to_string(), name.clone())),
            _ => None,
        };

        let mut node = ElementNode::new(kind, attrs, &self.ctx.names);
        node.explicit_define = explicit_define;
        node.top_level = self.stack.len() == 1;
        node.choice_occurs = self.enclosing_choice();

        if let Some((head, member)) = substitution {
            self.ctx.add_substitution(&head, &member);
        }
        self.push_node(Node::Element(node));
    }

    /// A nested `complexType` qualifies the element around it
    fn merge_complex_type(&mut self, attrs: Attrs) {
        if self.stack.len() < 2 || attrs.is_empty() {
            return;
        }
        if let Some(node) = self.top_element_mut() {
            for (key, value) in attrs {
                if key == "name" {
                    continue;
                }
                if key == "abstract" {
                    node.is_abstract = is_true(&value);
                }
                node.attrs.insert(key, value);
            }
        }
    }

    fn open_attribute(&mut self, attrs: Attrs) {
        let reference = attrs.get("ref").map(|r| strip_namespace(r).to_string());
        let name = attrs
            .get("name")
            .cloned()
            .or_else(|| reference.clone())
            .unwrap_or_else(|| "no_attribute_name".to_string());
        let data_type = attrs
            .get("type")
            .cloned()
            .unwrap_or_else(|| self.ctx.names.default_string());

        let mut attribute = AttributeNode::new(name.clone(), data_type);
        attribute.usage = attrs
            .get("use")
            .map(|u| AttributeUse::parse(u))
            .unwrap_or_default();
        attribute.default = attrs.get("default").cloned();
        attribute.reference = reference;

        let Some(owner) = self.top() else {
            return;
        };
        let slot = match self.ctx.arena.element_mut(owner) {
            Some(node) if node.kind == ElementKind::Schema => {
                self.ctx.global_attributes.insert(name.clone(), attribute);
                AttributeSlot::Global(name)
            }
            Some(node) => match node.open_attribute_group.as_mut() {
                Some(group) => {
                    group.attributes.insert(name.clone(), attribute);
                    AttributeSlot::Group(owner, name)
                }
                None => {
                    node.attribute_defs.insert(name.clone(), attribute);
                    AttributeSlot::Local(owner, name)
                }
            },
            None => return,
        };
        self.last_attribute = Some(slot);
    }

    fn open_attribute_group(&mut self, attrs: Attrs) -> bool {
        let reference = attrs.get("ref").cloned();
        let mut pushed = false;

        if let Some(name) = attrs.get("name").cloned() {
            let group = AttributeGroup::new(strip_namespace(&name));
            let mut node = ElementNode::new(ElementKind::AttributeGroup, attrs, &self.ctx.names);
            node.top_level = self.stack.len() == 1;
            node.open_attribute_group = Some(group);
            self.push_node(Node::Element(node));
            pushed = true;
        }

        if let Some(reference) = reference {
            if let Some(node) = self.top_element_mut() {
                match node.open_attribute_group.as_mut() {
                    Some(group) if !pushed => group.group_refs.push(reference),
                    _ => node.attribute_group_refs.push(reference),
                }
            }
        }
        pushed
    }

    fn open_extension(&mut self, attrs: &Attrs) {
        let Some(base) = attrs.get("base") else {
            return;
        };
        let builtin = self.ctx.names.is_builtin(base);
        if let Some(node) = self.top_element_mut() {
            if builtin {
                node.add_simple_base(base.clone());
            } else {
                node.base = Some(base.clone());
            }
        }
    }

    fn open_simple_type(&mut self, attrs: Attrs) -> bool {
        if self.within(ConstructKind::Attribute) || self.in_simple_type_context() {
            return false;
        }

        let parent = self.top();
        let name = match attrs.get("name") {
            Some(name) => strip_namespace(name).to_string(),
            None => parent
                .map(|id| self.ctx.arena.get(id).name().to_string())
                .unwrap_or_default(),
        };

        if let Some(node) = self.top_element_mut() {
            if node.kind != ElementKind::Schema {
                node.inline_simple_type = true;
            }
        }

        let mut simple_type = SimpleTypeNode::new(name.clone());
        simple_type.default = attrs.get("default").cloned();
        let id = self.push_node(Node::SimpleType(simple_type));
        if !name.is_empty() {
            self.ctx.simple_types.entry(name).or_insert(id);
        }
        true
    }

    fn open_restriction(&mut self, attrs: Attrs) {
        let base = attrs.get("base").cloned();

        if self.within(ConstructKind::Attribute) {
            if let (Some(base), Some(attribute)) = (base, self.last_attribute_mut()) {
                attribute.data_type = base;
            }
            return;
        }

        let simple_context =
            self.within(ConstructKind::SimpleType) || self.within(ConstructKind::SimpleContent);
        let Some(id) = self.top() else {
            return;
        };
        match self.ctx.arena.get_mut(id) {
            Node::SimpleType(st) => {
                if st.base.is_none() {
                    st.base = base;
                }
            }
            Node::Element(node) => {
                if simple_context && base.is_some() {
                    node.base = base;
                } else if base.is_some() {
                    node.restriction_base = base;
                }
            }
        }
        self.ctx.arena.get_mut(id).set_restriction_attrs(attrs);
    }

    fn open_facet(&mut self, kind: ConstructKind, attrs: &Attrs) {
        let Some(value) = attrs.get("value") else {
            let context = self
                .top()
                .map(|id| self.ctx.arena.get(id).name().to_string())
                .unwrap_or_default();
            self.ctx.warn(
                WarningKind::MissingFacetValue,
                format!("{:?} without value in '{}'", kind, context),
            );
            return;
        };

        let bound = match kind {
            ConstructKind::MinInclusive | ConstructKind::MaxInclusive => {
                match Decimal::from_str(value.trim()) {
                    Ok(bound) => Some(bound),
                    Err(_) => {
                        self.ctx.warn(
                            WarningKind::InvalidFacetValue,
                            format!("'{}' is not a numeric bound", value),
                        );
                        return;
                    }
                }
            }
            _ => None,
        };

        let in_attribute = self.within(ConstructKind::Attribute) && self.last_attribute.is_some();
        let facets = if in_attribute {
            self.last_attribute_mut().map(|a| &mut a.facets)
        } else if let Some(id) = self.nearest_declaration() {
            Some(self.ctx.arena.get_mut(id).facets_mut())
        } else {
            match self.top() {
                Some(id) if self.ctx.arena.simple_type(id).is_some() => {
                    Some(self.ctx.arena.get_mut(id).facets_mut())
                }
                _ => None,
            }
        };

        let Some(facets) = facets else {
            self.ctx.warn(
                WarningKind::DetachedFacet,
                format!("facet value '{}' has no enclosing declaration", value),
            );
            return;
        };
        match (kind, bound) {
            (ConstructKind::MinInclusive, Some(bound)) => facets.set_minimum(bound),
            (ConstructKind::MaxInclusive, Some(bound)) => facets.set_maximum(bound),
            _ => facets.push_enumeration(value.as_str()),
        }
    }

    fn close_child(&mut self) {
        if self.stack.len() < 2 {
            return;
        }
        if let Some(child) = self.stack.pop() {
            if let Some(parent) = self.top_element_mut() {
                parent.children.push(child);
            }
        }
    }

    fn close_group(&mut self) {
        let Some(id) = self.stack.pop() else {
            return;
        };
        let Some(node) = self.ctx.arena.element(id) else {
            return;
        };
        let name = node.name.clone();
        let is_reference = node.group_ref.is_some();

        if self.stack.len() == 1 && !is_reference {
            self.ctx
                .element_groups
                .entry(name.clone())
                .or_insert(ElementGroup {
                    name,
                    definition: id,
                });
        } else if self.stack.len() > 1 && is_reference {
            if let Some(parent) = self.top_element_mut() {
                parent.children.push(id);
            }
        }
    }

    fn close_attribute_group(&mut self) {
        let Some(id) = self.stack.pop() else {
            return;
        };
        let group = self
            .ctx
            .arena
            .element_mut(id)
            .and_then(|node| node.open_attribute_group.take());
        if let Some(group) = group {
            self.ctx
                .attribute_groups
                .entry(group.name.clone())
                .or_insert(group);
        }
    }

    fn push_node(&mut self, node: Node) -> NodeId {
        let id = self.ctx.arena.alloc(node);
        self.stack.push(id);
        id
    }

    fn top(&self) -> Option<NodeId> {
        self.stack.last().copied()
    }

    fn top_element_mut(&mut self) -> Option<&mut ElementNode> {
        let id = self.top()?;
        self.ctx.arena.element_mut(id)
    }

    fn top_simple_type_mut(&mut self) -> Option<&mut SimpleTypeNode> {
        let id = self.top()?;
        self.ctx.arena.simple_type_mut(id)
    }

    fn within(&self, kind: ConstructKind) -> bool {
        self.frames.iter().any(|f| f.kind == kind)
    }

    /// Inside a `simpleType` that already opened a restriction, list or union
    fn in_simple_type_context(&self) -> bool {
        let Some(pos) = self
            .frames
            .iter()
            .rposition(|f| f.kind == ConstructKind::SimpleType)
        else {
            return false;
        };
        self.frames[pos + 1..].iter().any(|f| {
            matches!(
                f.kind,
                ConstructKind::Restriction | ConstructKind::List | ConstructKind::Union
            )
        })
    }

    /// Innermost open `element` or top-level `complexType`
    fn nearest_declaration(&self) -> Option<NodeId> {
        self.stack.iter().rev().copied().find(|id| {
            self.ctx
                .arena
                .element(*id)
                .map(|e| matches!(e.kind, ElementKind::Element | ElementKind::ComplexType))
                .unwrap_or(false)
        })
    }

    /// Occurrence bounds of a `choice` opened directly in the current node
    fn enclosing_choice(&self) -> Option<ChoiceOccurs> {
        let depth = self.stack.len();
        self.compositors
            .iter()
            .rev()
            .take_while(|c| c.owner_depth == depth)
            .find_map(|c| c.choice.clone())
    }

    fn last_attribute_mut(&mut self) -> Option<&mut AttributeNode> {
        match self.last_attribute.as_ref()? {
            AttributeSlot::Global(name) => self.ctx.global_attributes.get_mut(name),
            AttributeSlot::Group(owner, name) => self
                .ctx
                .arena
                .element_mut(*owner)?
                .open_attribute_group
                .as_mut()?
                .attributes
                .get_mut(name),
            AttributeSlot::Local(owner, name) => self
                .ctx
                .arena
                .element_mut(*owner)?
                .attribute_defs
                .get_mut(name),
        }
    }
}

fn collect_attrs(start: &BytesStart) -> std::result::Result<Attrs, String> {
    let mut attrs = Attrs::new();
    for attr_result in start.attributes() {
        let attr = attr_result.map_err(|e| format!("failed to parse attribute: {}", e))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| format!("invalid attribute name: {}", e))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| format!("failed to unescape attribute value: {}", e))?
            .to_string();
        attrs.insert(key, value);
    }
    Ok(attrs)
}

/// `line:column` of a byte offset, both 1-based
fn line_column(input: &[u8], position: usize) -> String {
    let consumed = &input[..position.min(input.len())];
    let line = consumed.iter().filter(|b| **b == b'\n').count() + 1;
    let column = match consumed.iter().rposition(|b| *b == b'\n') {
        Some(newline) => consumed.len() - newline,
        None => consumed.len() + 1,
    };
    format!("{}:{}", line, column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::nodes::Restriction;
    use crate::error::Error;

    fn read(xsd: &str) -> (CompilationContext, Result<NodeId>) {
        let mut ctx = CompilationContext::default();
        let result = SchemaReader::new(&mut ctx).read(xsd.as_bytes());
        (ctx, result)
    }

    fn child_names(ctx: &CompilationContext, id: NodeId) -> Vec<String> {
        ctx.arena
            .element(id)
            .map(|e| {
                e.children
                    .iter()
                    .map(|c| ctx.arena.get(*c).name().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn test_top_level_declarations() {
        let (ctx, root) = read(
            r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
                <xsd:element name="Count" type="xsd:unsignedInt"/>
                <xsd:complexType name="Person">
                    <xsd:sequence>
                        <xsd:element name="first" type="xsd:string"/>
                        <xsd:element name="last" type="xsd:string"/>
                    </xsd:sequence>
                </xsd:complexType>
            </xsd:schema>"#,
        );
        let root = root.unwrap();

        assert_eq!(ctx.names.prefix(), "xsd:");
        assert_eq!(child_names(&ctx, root), vec!["Count", "Person"]);

        let person = ctx.arena.element(root).unwrap().children[1];
        assert_eq!(child_names(&ctx, person), vec!["first", "last"]);
        let person = ctx.arena.element(person).unwrap();
        assert!(person.top_level);
        assert!(person.explicit_define);
        assert_eq!(person.kind, ElementKind::ComplexType);
    }

    #[test]
    fn test_simple_type_with_enumeration() {
        let (ctx, root) = read(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                <xs:simpleType name="Color">
                    <xs:restriction base="xs:string">
                        <xs:enumeration value="red"/>
                        <xs:enumeration value="blue"/>
                    </xs:restriction>
                </xs:simpleType>
            </xs:schema>"#,
        );
        root.unwrap();

        let id = ctx.simple_types["Color"];
        let color = ctx.arena.simple_type(id).unwrap();
        assert_eq!(color.base.as_deref(), Some("xs:string"));
        assert_eq!(
            color.facets.restriction(),
            Restriction::Enumeration(vec!["red".into(), "blue".into()])
        );
        assert_eq!(color.restriction_attrs.get("base").map(String::as_str), Some("xs:string"));
    }

    #[test]
    fn test_inline_enumeration_attaches_to_element() {
        let (ctx, root) = read(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                <xs:element name="Size">
                    <xs:simpleType>
                        <xs:restriction base="xs:string">
                            <xs:enumeration value="S"/>
                            <xs:enumeration value="L"/>
                        </xs:restriction>
                    </xs:simpleType>
                </xs:element>
            </xs:schema>"#,
        );
        let root = root.unwrap();
        let size = ctx.arena.element(root).unwrap().children[0];
        let size = ctx.arena.element(size).unwrap();

        assert!(size.inline_simple_type);
        assert_eq!(size.facets.enumeration(), ["S", "L"]);
        assert!(ctx.simple_types.contains_key("Size"));
    }

    #[test]
    fn test_attribute_restriction_and_range() {
        let (ctx, root) = read(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                <xs:complexType name="Port">
                    <xs:attribute name="number" use="required">
                        <xs:simpleType>
                            <xs:restriction base="xs:int">
                                <xs:minInclusive value="1"/>
                                <xs:maxInclusive value="65535"/>
                            </xs:restriction>
                        </xs:simpleType>
                    </xs:attribute>
                </xs:complexType>
            </xs:schema>"#,
        );
        let root = root.unwrap();
        let port = ctx.arena.element(root).unwrap().children[0];
        let attr = &ctx.arena.element(port).unwrap().attribute_defs["number"];

        assert_eq!(attr.data_type, "xs:int");
        assert_eq!(attr.usage, AttributeUse::Required);
        let range = attr.facets.range().unwrap();
        assert_eq!(range.minimum, Some(Decimal::from(1)));
        assert_eq!(range.maximum, Some(Decimal::from(65535)));
        assert!(ctx.simple_types.is_empty());
    }

    #[test]
    fn test_groups_and_attribute_groups() {
        let (ctx, root) = read(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                <xs:group name="Common">
                    <xs:sequence><xs:element name="id" type="xs:int"/></xs:sequence>
                </xs:group>
                <xs:attributeGroup name="Audit">
                    <xs:attribute name="created" type="xs:dateTime"/>
                    <xs:attributeGroup ref="Owner"/>
                </xs:attributeGroup>
                <xs:complexType name="Item">
                    <xs:sequence><xs:group ref="Common"/></xs:sequence>
                    <xs:attributeGroup ref="Audit"/>
                </xs:complexType>
            </xs:schema>"#,
        );
        let root = root.unwrap();

        assert!(ctx.element_groups.contains_key("Common"));
        let audit = &ctx.attribute_groups["Audit"];
        assert!(audit.attributes.contains_key("created"));
        assert_eq!(audit.group_refs, vec!["Owner"]);

        assert_eq!(child_names(&ctx, root), vec!["Item"]);
        let item = ctx.arena.element(root).unwrap().children[0];
        let item_node = ctx.arena.element(item).unwrap();
        assert_eq!(item_node.attribute_group_refs, vec!["Audit"]);
        let group_ref = ctx.arena.element(item_node.children[0]).unwrap();
        assert_eq!(group_ref.group_ref.as_deref(), Some("Common"));
    }

    #[test]
    fn test_choice_occurs_scoped_to_content_model() {
        let (ctx, root) = read(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                <xs:complexType name="Shape">
                    <xs:choice minOccurs="0" maxOccurs="unbounded">
                        <xs:element name="circle">
                            <xs:complexType>
                                <xs:sequence><xs:element name="radius" type="xs:int"/></xs:sequence>
                            </xs:complexType>
                        </xs:element>
                    </xs:choice>
                </xs:complexType>
            </xs:schema>"#,
        );
        let root = root.unwrap();
        let shape = ctx.arena.element(root).unwrap().children[0];
        let circle = ctx.arena.element(shape).unwrap().children[0];
        let circle_node = ctx.arena.element(circle).unwrap();
        let occurs = circle_node.choice_occurs.as_ref().unwrap();
        assert_eq!(occurs.max_occurs.as_deref(), Some("unbounded"));

        let radius = ctx.arena.element(circle_node.children[0]).unwrap();
        assert!(radius.choice_occurs.is_none());
    }

    #[test]
    fn test_extension_bases_and_flags() {
        let (ctx, root) = read(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
                          xmlns:tns="urn:test" targetNamespace="urn:test">
                <xs:complexType name="Label">
                    <xs:simpleContent>
                        <xs:extension base="xs:string">
                            <xs:attribute name="lang" type="xs:language"/>
                        </xs:extension>
                    </xs:simpleContent>
                </xs:complexType>
                <xs:complexType name="Derived">
                    <xs:complexContent mixed="true">
                        <xs:extension base="tns:Base"><xs:anyAttribute/></xs:extension>
                    </xs:complexContent>
                </xs:complexType>
            </xs:schema>"#,
        );
        let root = root.unwrap();
        let children = &ctx.arena.element(root).unwrap().children;
        let label = ctx.arena.element(children[0]).unwrap();
        let derived = ctx.arena.element(children[1]).unwrap();

        assert!(label.simple_content);
        assert_eq!(label.simple_base_chain, vec!["xs:string"]);
        assert!(label.base.is_none());
        assert_eq!(derived.base.as_deref(), Some("tns:Base"));
        assert!(derived.is_mixed);
        assert!(derived.any_attribute);
        assert_eq!(ctx.target_namespace.as_deref(), Some("urn:test"));
        assert_eq!(ctx.namespaces.get_namespace("tns"), Some("urn:test"));
    }

    #[test]
    fn test_union_and_list() {
        let (ctx, root) = read(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                <xs:simpleType name="Either"><xs:union memberTypes="xs:int xs:string"/></xs:simpleType>
                <xs:simpleType name="Ints"><xs:list itemType="xs:int"/></xs:simpleType>
            </xs:schema>"#,
        );
        root.unwrap();
        let either = ctx.arena.simple_type(ctx.simple_types["Either"]).unwrap();
        assert_eq!(either.union_members, vec!["xs:int", "xs:string"]);
        let ints = ctx.arena.simple_type(ctx.simple_types["Ints"]).unwrap();
        assert!(ints.is_list);
        assert_eq!(ints.base.as_deref(), Some("xs:int"));
    }

    #[test]
    fn test_documentation_and_comments() {
        let (ctx, root) = read(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                <!-- only a comment -->
                <xs:element name="Note" type="xs:string">
                    <xs:annotation>
                        <xs:documentation>A   short
                            note</xs:documentation>
                    </xs:annotation>
                </xs:element>
                <xs:annotation><!-- nothing --></xs:annotation>
            </xs:schema>"#,
        );
        let root = root.unwrap();
        let note = ctx.arena.element(root).unwrap().children[0];
        assert_eq!(ctx.arena.get(note).documentation(), "A short note");
    }

    #[test]
    fn test_missing_facet_value_warns() {
        let (ctx, root) = read(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                <xs:simpleType name="T">
                    <xs:restriction base="xs:string"><xs:enumeration/></xs:restriction>
                </xs:simpleType>
            </xs:schema>"#,
        );
        root.unwrap();
        assert_eq!(ctx.warnings.len(), 1);
        assert_eq!(ctx.warnings[0].kind, WarningKind::MissingFacetValue);
    }

    #[test]
    fn test_unprefixed_schema() {
        let (ctx, root) = read(
            r#"<schema xmlns="http://www.w3.org/2001/XMLSchema">
                <element name="Flag" type="boolean"/>
            </schema>"#,
        );
        let root = root.unwrap();
        assert_eq!(ctx.names.prefix(), "");
        assert_eq!(child_names(&ctx, root), vec!["Flag"]);
    }

    #[test]
    fn test_substitution_groups() {
        let (ctx, root) = read(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                <xs:element name="Shape" type="xs:string"/>
                <xs:element name="Circle" substitutionGroup="tns:Shape" type="xs:string"/>
            </xs:schema>"#,
        );
        root.unwrap();
        assert_eq!(ctx.substitution_groups["Shape"], vec!["Circle"]);
    }

    #[test]
    fn test_unclosed_schema_is_malformed() {
        let (_, root) = read(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                <xs:element name="A">"#,
        );
        match root {
            Err(Error::Malformed(err)) => assert!(err.location.is_some()),
            other => panic!("expected malformed schema, got {:?}", other),
        }
    }

    #[test]
    fn test_line_column() {
        assert_eq!(line_column(b"ab\ncd", 4), "2:2");
        assert_eq!(line_column(b"abc", 0), "1:1");
    }
}
