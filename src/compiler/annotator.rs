//! Annotation passes
//!
//! Turns the raw tree into the resolved model in eight ordered passes:
//!
//! 1. group reference expansion
//! 2. element index construction
//! 3. type resolution
//! 4. tree annotation (names, attribute groups, occurrence bounds, mixed)
//! 5. duplicate-name fixups
//! 6. attribute type coercion
//! 7. mixed-content consistency
//! 8. extended-type marking
//!
//! Each pass runs over the whole tree before the next one starts. Tree walks
//! visit every node once, and every chain walk is bounded by [`Limits`].
//!
//! [`Limits`]: crate::limits::Limits

use super::context::CompilationContext;
use super::nodes::{is_true, AttributeNode, ElementKind, Facets, NodeId, UNBOUNDED};
use super::FallbackPolicy;
use crate::error::{Result, SemanticError, WarningKind};
use crate::names::cleanup_name;
use crate::namespaces::strip_namespace;
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Where a node's nominal type came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NominalSource {
    Type,
    Reference,
    Name,
}

#[derive(Debug, Clone)]
struct Nominal {
    name: String,
    source: NominalSource,
}

/// Runs the annotation passes over one compilation
pub struct Annotator<'a> {
    ctx: &'a mut CompilationContext,
    root: NodeId,
}

impl<'a> Annotator<'a> {
    /// Annotate the tree below `root`
    pub fn new(ctx: &'a mut CompilationContext, root: NodeId) -> Self {
        Self { ctx, root }
    }

    /// Run every pass in order
    pub fn run(&mut self) -> Result<()> {
        self.expand_group_references()?;
        self.collect_element_index();
        self.resolve_types()?;
        self.annotate_tree()?;
        self.fix_dup_names()?;
        self.coerce_attribute_types()?;
        self.check_mixed_bases()?;
        self.mark_extended_types();
        debug!(
            elements = self.ctx.element_index.len(),
            warnings = self.ctx.warnings.len(),
            "annotation complete"
        );
        Ok(())
    }

    /// Element nodes reachable from the root, preorder, each once
    fn walk(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut visited = HashSet::new();
        let mut pending = vec![self.root];

        while let Some(id) = pending.pop() {
            if !visited.insert(id) {
                continue;
            }
            let Some(node) = self.ctx.arena.element(id) else {
                continue;
            };
            order.push(id);
            pending.extend(node.children.iter().rev().copied());
        }
        order
    }

    // =========================================================================
    // Pass 1: Group Reference Expansion
    // =========================================================================

    /// Inline group references, first inside group definitions, then in the tree
    pub fn expand_group_references(&mut self) -> Result<()> {
        debug!("expanding group references");
        let definitions: Vec<NodeId> = self
            .ctx
            .element_groups
            .values()
            .map(|g| g.definition)
            .collect();
        for definition in definitions {
            let mut path = vec![definition];
            self.expand_children(definition, &mut path)?;
        }

        let mut visited = HashSet::new();
        let mut pending = vec![self.root];
        while let Some(id) = pending.pop() {
            if !visited.insert(id) {
                continue;
            }
            self.expand_children(id, &mut Vec::new())?;
            if let Some(node) = self.ctx.arena.element(id) {
                pending.extend(node.children.iter().copied());
            }
        }
        Ok(())
    }

    fn expand_children(&mut self, id: NodeId, path: &mut Vec<NodeId>) -> Result<()> {
        self.ctx.options.limits.check_group_depth(path.len())?;

        let Some(node) = self.ctx.arena.element(id) else {
            return Ok(());
        };
        let owner = node.name.clone();
        let children = node.children.clone();
        if !children.iter().any(|c| self.group_reference(*c).is_some()) {
            return Ok(());
        }

        let mut expanded = Vec::with_capacity(children.len());
        for child in children {
            let Some(reference) = self.group_reference(child) else {
                expanded.push(child);
                continue;
            };
            let Some(definition) = self.lookup_group(&reference) else {
                self.ctx.warn(
                    WarningKind::UndefinedGroup,
                    format!("'{}' referenced from '{}'", reference, owner),
                );
                continue;
            };
            if path.contains(&definition) {
                self.ctx.warn(
                    WarningKind::CircularGroupReference,
                    format!("'{}' referenced from '{}'", reference, owner),
                );
                continue;
            }

            path.push(definition);
            self.expand_children(definition, path)?;
            path.pop();

            if let Some(group) = self.ctx.arena.element(definition) {
                expanded.extend(group.children.iter().copied());
            }
        }

        if let Some(node) = self.ctx.arena.element_mut(id) {
            node.children = expanded;
        }
        Ok(())
    }

    fn group_reference(&self, id: NodeId) -> Option<String> {
        self.ctx
            .arena
            .element(id)
            .filter(|n| n.kind == ElementKind::Group)
            .and_then(|n| n.group_ref.clone())
    }

    fn lookup_group(&self, reference: &str) -> Option<NodeId> {
        self.ctx
            .element_groups
            .get(reference)
            .or_else(|| self.ctx.element_groups.get(strip_namespace(reference)))
            .map(|g| g.definition)
    }

    // =========================================================================
    // Pass 2: Element Index
    // =========================================================================

    /// Index every named declaration other passes and consumers look up
    pub fn collect_element_index(&mut self) {
        for id in self.walk() {
            let Some(node) = self.ctx.arena.element(id) else {
                continue;
            };
            let indexed = node.top_level
                || !node.children.is_empty()
                || !node.attribute_defs.is_empty()
                || node.base.is_some();
            if indexed {
                let name = node.name.clone();
                self.ctx.register_element(&name, id);
            }
        }
        debug!(count = self.ctx.element_index.len(), "element index built");
    }

    // =========================================================================
    // Pass 3: Type Resolution
    // =========================================================================

    /// Resolve every node's type to a built-in or a named definition
    pub fn resolve_types(&mut self) -> Result<()> {
        let order = self.walk();
        let nominals: HashMap<NodeId, Nominal> = order
            .iter()
            .filter_map(|id| self.nominal(*id).map(|n| (*id, n)))
            .collect();

        for id in order {
            let skip = self
                .ctx
                .arena
                .element(id)
                .map(|n| n.kind == ElementKind::Schema || n.is_wildcard())
                .unwrap_or(true);
            if !skip {
                self.resolve_node_type(id, &nominals)?;
            }
        }
        debug!(
            simple = self.ctx.simple_elements.len(),
            "type resolution complete"
        );
        Ok(())
    }

    fn nominal(&self, id: NodeId) -> Option<Nominal> {
        let node = self.ctx.arena.element(id)?;
        if let Some(t) = node.raw_type.as_ref().filter(|_| node.schema_type.is_some()) {
            Some(Nominal {
                name: t.clone(),
                source: NominalSource::Type,
            })
        } else if let Some(r) = &node.reference {
            Some(Nominal {
                name: r.clone(),
                source: NominalSource::Reference,
            })
        } else if !node.name.is_empty() {
            Some(Nominal {
                name: node.name.clone(),
                source: NominalSource::Name,
            })
        } else {
            None
        }
    }

    fn resolve_node_type(&mut self, id: NodeId, nominals: &HashMap<NodeId, Nominal>) -> Result<()> {
        let Some(node) = self.ctx.arena.element(id) else {
            return Ok(());
        };
        let node_name = node.name.clone();
        let mut complex = !node.attribute_defs.is_empty();

        let Some(nominal) = nominals.get(&id) else {
            let default = self.ctx.names.default_string();
            self.finish_resolution(id, default, complex, None);
            return Ok(());
        };
        let type_val = nominal.name.clone();

        if self.ctx.simple_types.contains_key(&type_val) {
            let is_list = self.is_list_type(&type_val);
            if let Some(node) = self.ctx.arena.element_mut(id) {
                node.add_simple_base(type_val.clone());
                node.is_list |= is_list;
                if nominal.source == NominalSource::Type {
                    node.simple_type = Some(type_val.clone());
                }
            }
        }

        let mut carried = None;
        let resolved = if self.ctx.element_index.contains_key(&type_val) {
            match self.follow_element_alias(&type_val, &node_name, nominals, &mut carried)? {
                Some(name) if self.ctx.names.is_builtin(&name) => name,
                _ => {
                    complex = true;
                    type_val
                }
            }
        } else if self.ctx.simple_types.contains_key(&type_val) {
            self.walk_simple_chain(&type_val, &node_name, &mut carried)?
        } else if self.ctx.names.is_builtin(&type_val) {
            type_val
        } else if nominal.source == NominalSource::Name {
            self.ctx.names.default_string()
        } else {
            self.fallback(&node_name, format!("unknown type '{}'", type_val))?
        };

        self.finish_resolution(id, resolved, complex, carried);
        Ok(())
    }

    fn finish_resolution(
        &mut self,
        id: NodeId,
        resolved: String,
        complex: bool,
        carried: Option<Facets>,
    ) {
        let Some(node) = self.ctx.arena.element_mut(id) else {
            return;
        };
        node.raw_type = Some(resolved);
        node.complex = complex;
        if let Some(facets) = carried {
            if node.facets.is_empty() {
                node.facets = facets;
            }
        }
        if !complex && !node.name.is_empty() {
            let name = node.name.clone();
            self.ctx.simple_elements.entry(name).or_insert(id);
        }
    }

    /// Follow element aliases until a simple type or a non-element name
    ///
    /// Returns `None` when the alias is self-referential, which makes the
    /// referring node complex.
    fn follow_element_alias(
        &mut self,
        start: &str,
        node_name: &str,
        nominals: &HashMap<NodeId, Nominal>,
        carried: &mut Option<Facets>,
    ) -> Result<Option<String>> {
        let mut current = start.to_string();
        let mut visited = HashSet::new();
        visited.insert(current.clone());
        let mut first = true;

        loop {
            let Some(&element) = self.ctx.element_index.get(&current) else {
                return Ok(Some(current));
            };
            if carried.is_none() {
                let facets = self.ctx.node(element).facets();
                if !facets.is_empty() {
                    *carried = Some(facets.clone());
                }
            }

            let Some(next) = nominals.get(&element).map(|n| n.name.clone()) else {
                return Ok(None);
            };
            if self.ctx.simple_types.contains_key(&next) {
                return self.walk_simple_chain(&next, node_name, carried).map(Some);
            }
            if next == current && !first {
                return Ok(None);
            }
            if !self.ctx.element_index.contains_key(&next) {
                return Ok(Some(next));
            }
            if next != current && !visited.insert(next.clone()) {
                return Ok(None);
            }
            current = next;
            first = false;
        }
    }

    /// Walk `base` links through the simple-type table
    ///
    /// Returns the first base outside the table.
    fn walk_simple_chain(
        &mut self,
        start: &str,
        node_name: &str,
        carried: &mut Option<Facets>,
    ) -> Result<String> {
        let max_hops = self.ctx.options.limits.max_simple_type_hops;
        let mut current = start.to_string();
        let mut hops = 0;

        loop {
            let Some(simple_type) = self
                .ctx
                .simple_types
                .get(&current)
                .and_then(|id| self.ctx.arena.simple_type(*id))
            else {
                return Ok(current);
            };
            if carried.is_none() && !simple_type.facets.is_empty() {
                *carried = Some(simple_type.facets.clone());
            }
            let is_union = !simple_type.union_members.is_empty();

            let base = match simple_type.base.clone() {
                Some(base) => base,
                None if is_union => return Ok(self.ctx.names.default_string()),
                None => {
                    return self.fallback(
                        node_name,
                        format!("simple type '{}' has no base", current),
                    )
                }
            };
            let base = if self.ctx.names.is_builtin(&base) {
                base
            } else {
                strip_namespace(&base).to_string()
            };

            if !self.ctx.simple_types.contains_key(&base) {
                return Ok(base);
            }
            hops += 1;
            if hops > max_hops {
                return self.fallback(
                    node_name,
                    format!("simple type chain from '{}' does not terminate", start),
                );
            }
            current = base;
        }
    }

    fn is_list_type(&self, name: &str) -> bool {
        let mut current = name.to_string();
        for _ in 0..=self.ctx.options.limits.max_simple_type_hops {
            let Some(simple_type) = self
                .ctx
                .simple_types
                .get(&current)
                .and_then(|id| self.ctx.arena.simple_type(*id))
            else {
                return false;
            };
            if simple_type.is_list {
                return true;
            }
            match &simple_type.base {
                Some(base) => current = strip_namespace(base).to_string(),
                None => return false,
            }
        }
        false
    }

    fn fallback(&self, node: &str, reason: String) -> Result<String> {
        match self.ctx.options.fallback {
            FallbackPolicy::Lenient => {
                debug!(node, reason = %reason, "falling back to string");
                Ok(self.ctx.names.default_string())
            }
            FallbackPolicy::Strict => Err(SemanticError::new(node, reason).into()),
        }
    }

    // =========================================================================
    // Pass 4: Tree Annotation
    // =========================================================================

    /// Clean names, attribute groups, occurrence bounds, mixed, whitespace
    pub fn annotate_tree(&mut self) -> Result<()> {
        for id in self.walk() {
            self.annotate_node(id)?;
        }
        Ok(())
    }

    fn annotate_node(&mut self, id: NodeId) -> Result<()> {
        let Some(node) = self.ctx.arena.element(id) else {
            return Ok(());
        };
        let name = node.name.clone();
        let group_refs = node.attribute_group_refs.clone();

        let mut merged = IndexMap::new();
        for reference in &group_refs {
            let mut path = Vec::new();
            self.collect_group_attributes(reference, &name, &mut path, &mut merged);
        }

        let unmapped = cleanup_name(&name);
        let clean = self.ctx.options.name_map.map_name(&unmapped);
        let (min_occurs, max_occurs) = self.occurs(id)?;
        let Some(node) = self.ctx.arena.element(id) else {
            return Ok(());
        };
        let base = node.base.as_deref().map(|b| {
            if self.ctx.names.is_builtin(b) {
                b.to_string()
            } else {
                strip_namespace(b).to_string()
            }
        });
        let collapse = [base.as_ref(), node.simple_type.as_ref()]
            .into_iter()
            .flatten()
            .filter_map(|t| self.ctx.simple_types.get(t))
            .filter_map(|st| self.ctx.arena.simple_type(*st))
            .any(|st| st.collapse_whitespace);

        let Some(node) = self.ctx.arena.element_mut(id) else {
            return Ok(());
        };
        node.base = base;
        node.unmapped_clean_name = unmapped;
        node.clean_name = clean;
        for (key, attribute) in merged {
            node.attribute_defs.insert(key, attribute);
        }
        for attribute in node.attribute_defs.values_mut() {
            let global = attribute
                .reference
                .as_ref()
                .and_then(|r| self.ctx.global_attributes.get(r));
            if let Some(global) = global {
                attribute.data_type = global.data_type.clone();
                if attribute.default.is_none() {
                    attribute.default = global.default.clone();
                }
                if attribute.facets.is_empty() {
                    attribute.facets = global.facets.clone();
                }
            }
        }

        node.min_occurs = min_occurs;
        node.max_occurs = max_occurs;
        node.optional = min_occurs == 0;
        if node.attrs.get("mixed").map(|m| is_true(m)).unwrap_or(false) {
            node.is_mixed = true;
        }
        if collapse {
            node.collapse_whitespace = true;
        }
        Ok(())
    }

    fn collect_group_attributes(
        &mut self,
        reference: &str,
        owner: &str,
        path: &mut Vec<String>,
        out: &mut IndexMap<String, AttributeNode>,
    ) {
        let key = if self.ctx.attribute_groups.contains_key(reference) {
            reference.to_string()
        } else {
            strip_namespace(reference).to_string()
        };
        let Some(group) = self.ctx.attribute_groups.get(&key).cloned() else {
            self.ctx.warn(
                WarningKind::UndefinedAttributeGroup,
                format!("'{}' referenced from '{}'", reference, owner),
            );
            return;
        };
        if path.contains(&key) {
            self.ctx.warn(
                WarningKind::CircularAttributeGroup,
                format!("'{}' includes itself", key),
            );
            return;
        }

        path.push(key);
        for nested in &group.group_refs {
            self.collect_group_attributes(nested, owner, path, out);
        }
        path.pop();
        out.extend(group.attributes);
    }

    fn occurs(&self, id: NodeId) -> Result<(u32, u32)> {
        let Some(node) = self.ctx.arena.element(id) else {
            return Ok((1, 1));
        };
        let choice = node.choice_occurs.as_ref();
        let min_raw = node
            .attrs
            .get("minOccurs")
            .or_else(|| choice.and_then(|c| c.min_occurs.as_ref()));
        let max_raw = node
            .attrs
            .get("maxOccurs")
            .or_else(|| choice.and_then(|c| c.max_occurs.as_ref()));

        let min_occurs = match min_raw {
            None => 1,
            Some(value) => value.trim().parse::<u32>().map_err(|_| {
                SemanticError::new(
                    &node.name,
                    format!("minOccurs must be an integer, found '{}'", value),
                )
            })?,
        };
        let max_occurs = match max_raw.map(|v| v.trim()) {
            None => 1,
            Some("unbounded") => UNBOUNDED,
            Some(value) => value.parse::<u32>().map_err(|_| {
                SemanticError::new(
                    &node.name,
                    format!("maxOccurs must be an integer or \"unbounded\", found '{}'", value),
                )
            })?,
        };

        if min_occurs > max_occurs {
            return Err(SemanticError::new(
                &node.name,
                format!("minOccurs {} exceeds maxOccurs {}", min_occurs, max_occurs),
            )
            .into());
        }
        Ok((min_occurs, max_occurs))
    }

    // =========================================================================
    // Pass 5: Duplicate Names
    // =========================================================================

    /// Rename attributes whose clean name collides with a child element
    ///
    /// Children of every base are considered. Running the pass again on a
    /// fixed tree changes nothing.
    pub fn fix_dup_names(&mut self) -> Result<()> {
        for id in self.walk() {
            let chain = self.base_chain(id)?;
            let mut element_names = HashSet::new();
            for owner in std::iter::once(id).chain(chain) {
                if let Some(node) = self.ctx.arena.element(owner) {
                    for child in &node.children {
                        if let Some(child) = self.ctx.arena.element(*child) {
                            element_names.insert(child.unmapped_clean_name.clone());
                        }
                    }
                }
            }

            let Some(node) = self.ctx.arena.element_mut(id) else {
                continue;
            };
            let collides = node
                .attribute_defs
                .values()
                .any(|a| element_names.contains(&a.clean_name));
            if !collides {
                continue;
            }

            let original: HashSet<String> = node.attribute_defs.keys().cloned().collect();
            let mut fixed = IndexMap::new();
            for (key, attribute) in node.attribute_defs.drain(..) {
                if !element_names.contains(&attribute.clean_name) {
                    fixed.insert(key, attribute);
                    continue;
                }
                let mut new_name = format!("{}_attr", attribute.name);
                while element_names.contains(&cleanup_name(&new_name))
                    || original.contains(&new_name)
                    || fixed.contains_key(&new_name)
                {
                    new_name.push_str("_attr");
                }
                debug!(from = %attribute.name, to = %new_name, "renaming attribute");
                let renamed = attribute.renamed(new_name.clone());
                fixed.insert(new_name, renamed);
            }
            node.attribute_defs = fixed;
        }
        Ok(())
    }

    /// Ancestors of a node through `base`, nearest first
    ///
    /// Chains longer than the configured limit are taken to be cyclic.
    fn base_chain(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let limit = self.ctx.options.limits.max_base_depth;
        let mut chain = Vec::new();
        let mut current = id;

        while let Some(base) = self.ctx.arena.element(current).and_then(|n| n.base.as_ref()) {
            let Some(&parent) = self.ctx.element_index.get(base) else {
                break;
            };
            if chain.len() >= limit {
                let name = self.ctx.node(id).name().to_string();
                return Err(SemanticError::new(
                    name,
                    format!(
                        "likely cyclic definition: inheritance through '{}' exceeds {} levels",
                        base, limit
                    ),
                )
                .into());
            }
            chain.push(parent);
            current = parent;
        }
        Ok(chain)
    }

    // =========================================================================
    // Pass 6: Attribute Types
    // =========================================================================

    /// Resolve attribute types to built-ins, with ID types reduced to string
    pub fn coerce_attribute_types(&mut self) -> Result<()> {
        for id in self.walk() {
            let Some(node) = self.ctx.arena.element(id) else {
                continue;
            };
            let owner = node.name.clone();
            let pending: Vec<(String, String)> = node
                .attribute_defs
                .iter()
                .map(|(k, a)| (k.clone(), a.data_type.clone()))
                .collect();

            for (key, data_type) in pending {
                let (resolved, carried) = self.resolve_attribute_type(&owner, &key, &data_type)?;
                let coerce = self
                    .ctx
                    .names
                    .builtin(&resolved)
                    .map(|b| b.is_identity())
                    .unwrap_or(false);
                let string = self.ctx.names.default_string();

                let Some(attribute) = self
                    .ctx
                    .arena
                    .element_mut(id)
                    .and_then(|n| n.attribute_defs.get_mut(&key))
                else {
                    continue;
                };
                if coerce {
                    if attribute.data_type == resolved {
                        attribute.data_type = string.clone();
                    }
                    attribute.resolved_type = Some(string);
                } else {
                    attribute.resolved_type = Some(resolved);
                }
                if let Some(facets) = carried {
                    if attribute.facets.is_empty() {
                        attribute.facets = facets;
                    }
                }
            }
        }
        Ok(())
    }

    fn resolve_attribute_type(
        &mut self,
        owner: &str,
        attribute: &str,
        data_type: &str,
    ) -> Result<(String, Option<Facets>)> {
        if self.ctx.names.is_builtin(data_type) {
            return Ok((data_type.to_string(), None));
        }
        let local = strip_namespace(data_type);
        let context = format!("{}@{}", owner, attribute);
        if self.ctx.simple_types.contains_key(local) {
            let mut carried = None;
            let resolved = self.walk_simple_chain(local, &context, &mut carried)?;
            return Ok((resolved, carried));
        }
        let resolved = self.fallback(&context, format!("unknown attribute type '{}'", data_type))?;
        Ok((resolved, None))
    }

    // =========================================================================
    // Pass 7: Mixed Content
    // =========================================================================

    /// Equalize mixed flags along base chains and flag remaining mismatches
    pub fn check_mixed_bases(&mut self) -> Result<()> {
        let order = self.walk();
        let mut chains = Vec::with_capacity(order.len());

        for id in order {
            let chain = self.base_chain(id)?;
            let members: Vec<NodeId> = std::iter::once(id).chain(chain.iter().copied()).collect();
            let any_mixed = members
                .iter()
                .filter_map(|n| self.ctx.arena.element(*n))
                .any(|n| n.is_mixed);
            if any_mixed {
                for member in &members {
                    if let Some(node) = self.ctx.arena.element_mut(*member) {
                        node.is_mixed = true;
                    }
                }
            }
            self.collect_simple_bases(id);
            chains.push((id, chain));
        }

        // A later chain may have turned a shared base mixed.
        for (id, chain) in chains {
            self.check_mixed_chain(id, &chain);
        }
        Ok(())
    }

    fn check_mixed_chain(&mut self, id: NodeId, chain: &[NodeId]) {
        let Some(node_mixed) = self.ctx.arena.element(id).map(|n| n.is_mixed) else {
            return;
        };
        let mut link = id;
        for &parent in chain {
            let parent_mixed = self
                .ctx
                .arena
                .element(parent)
                .map(|n| n.is_mixed)
                .unwrap_or(node_mixed);
            if parent_mixed != node_mixed {
                let Some(node) = self.ctx.arena.element_mut(link) else {
                    return;
                };
                // Descendants reach the same link through their own chains.
                if node.mixed_extension_error {
                    return;
                }
                node.mixed_extension_error = true;
                let name = node.name.clone();
                let base = self.ctx.node(parent).name().to_string();
                self.ctx.warn(
                    WarningKind::MixedContentMismatch,
                    format!("'{}' extends '{}' with different mixed content", name, base),
                );
                return;
            }
            link = parent;
        }
    }

    /// Record every simple ancestor type on the node
    fn collect_simple_bases(&mut self, id: NodeId) {
        let simple_base = self
            .ctx
            .arena
            .element(id)
            .and_then(|n| n.base.clone())
            .filter(|b| !self.ctx.element_index.contains_key(b));
        if let (Some(base), Some(node)) = (simple_base, self.ctx.arena.element_mut(id)) {
            node.add_simple_base(base);
        }

        let Some(node) = self.ctx.arena.element(id) else {
            return;
        };
        let mut additions = Vec::new();
        if let Some(first) = node.simple_base_chain.first() {
            let mut visited = HashSet::new();
            let mut next = self
                .ctx
                .simple_types
                .get(first)
                .and_then(|st| self.ctx.arena.simple_type(*st))
                .and_then(|st| st.base.clone());
            while let Some(base) = next {
                if !visited.insert(base.clone())
                    || visited.len() > self.ctx.options.limits.max_simple_type_hops
                {
                    break;
                }
                let key = if self.ctx.names.is_builtin(&base) {
                    base.clone()
                } else {
                    strip_namespace(&base).to_string()
                };
                next = self
                    .ctx
                    .simple_types
                    .get(&key)
                    .and_then(|st| self.ctx.arena.simple_type(*st))
                    .and_then(|st| st.base.clone());
                additions.push(key);
            }
        }

        if let Some(node) = self.ctx.arena.element_mut(id) {
            for base in additions {
                node.add_simple_base(base);
            }
        }
    }

    // =========================================================================
    // Pass 8: Extended Types
    // =========================================================================

    /// Mark every node some other node extends
    pub fn mark_extended_types(&mut self) {
        for id in self.walk() {
            let parent = self
                .ctx
                .arena
                .element(id)
                .and_then(|n| n.base.as_ref())
                .and_then(|b| self.ctx.element_index.get(b))
                .copied();
            if let Some(node) = parent.and_then(|p| self.ctx.arena.element_mut(p)) {
                node.extended = true;
            }
        }
    }
}
