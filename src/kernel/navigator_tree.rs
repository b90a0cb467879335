//! Navigator tree: per-extension fragments and the merged arena.
//!
//! Extensions describe their fragment with `SectionSpec`/`NodeSpec` using
//! local keys only. `build_sections` prefixes every key with the owning
//! namespace and stamps the namespace into each node's user data.
//! `NavigatorTree` then indexes all sections of all extensions by unique key.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use slotmap::{new_key_type, SlotMap};

use crate::core::uri::DELIMITER;
use crate::core::DocumentUri;
use crate::error::{Facet, Result, WorkspaceError};
use crate::kernel::extensions::Extension;

/// User-data attribute carrying the owning namespace of a node.
pub const NAMESPACE_ATTR: &str = "namespace";
/// User-data attribute set on nodes created with `NodeSpec::document`.
pub const DOCUMENT_TYPE_ATTR: &str = "documentType";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSpec {
    pub local_key: String,
    pub label: String,
    #[serde(default)]
    pub children: Vec<NodeSpec>,
    #[serde(default)]
    pub user_data: Map<String, Value>,
}

impl NodeSpec {
    pub fn new(local_key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            local_key: local_key.into(),
            label: label.into(),
            children: Vec::new(),
            user_data: Map::new(),
        }
    }

    /// A node that addresses a document. Its unique key becomes the
    /// serialized `DocumentUri`, so the navigator can open it by URI.
    pub fn document(
        document_type: impl Into<String>,
        key: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        let document_type = document_type.into();
        let local_key = format!("{document_type}{DELIMITER}{}", key.into());
        Self::new(local_key, label).with_data(DOCUMENT_TYPE_ATTR, Value::String(document_type))
    }

    pub fn with_child(mut self, child: NodeSpec) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = NodeSpec>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: Value) -> Self {
        self.user_data.insert(key.into(), value);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSpec {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
}

impl SectionSpec {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            nodes: Vec::new(),
        }
    }

    pub fn with_node(mut self, node: NodeSpec) -> Self {
        self.nodes.push(node);
        self
    }
}

/// Key-prefixing helper handed to an extension while it builds its fragment.
#[derive(Debug, Clone)]
pub struct NamespaceScope {
    namespace: String,
}

impl NamespaceScope {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Global key for a local key, e.g. `posts` -> `blog:posts`.
    pub fn key(&self, local_key: &str) -> String {
        format!("{}{DELIMITER}{local_key}", self.namespace)
    }

    pub fn document_uri(&self, document_type: &str, key: &str) -> Result<DocumentUri> {
        DocumentUri::new(self.namespace.as_str(), document_type, key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigatorNode {
    pub unique_key: String,
    pub label: String,
    #[serde(default)]
    pub children: Vec<NavigatorNode>,
    #[serde(default)]
    pub user_data: Map<String, Value>,
}

impl NavigatorNode {
    pub fn namespace(&self) -> Option<&str> {
        self.user_data.get(NAMESPACE_ATTR).and_then(Value::as_str)
    }

    /// Parses the unique key as a document URI, if it is one.
    pub fn document_uri(&self) -> Option<DocumentUri> {
        DocumentUri::parse(&self.unique_key, true)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub label: String,
    pub namespace: String,
    #[serde(default)]
    pub nodes: Vec<NavigatorNode>,
}

/// Asks `extension` for its fragment and turns it into namespaced sections.
/// Order is kept exactly as returned. No sections is a valid answer.
pub fn build_sections(
    extension: &dyn Extension,
    document_type_filter: Option<&str>,
) -> Result<Vec<Section>> {
    let scope = NamespaceScope::new(extension.namespace());
    let specs = extension
        .navigator_sections(&scope, document_type_filter)
        .map_err(|source| WorkspaceError::Assembly {
            namespace: scope.namespace().to_string(),
            facet: Facet::NavigatorSections,
            source,
        })?;

    let mut seen = FxHashSet::default();
    let mut sections = Vec::with_capacity(specs.len());
    for spec in specs {
        let mut nodes = Vec::with_capacity(spec.nodes.len());
        for node in spec.nodes {
            nodes.push(materialize(&scope, node, &mut seen)?);
        }
        sections.push(Section {
            id: spec.id,
            label: spec.label,
            namespace: scope.namespace().to_string(),
            nodes,
        });
    }

    for section in &mut sections {
        stamp_namespace(&mut section.nodes, scope.namespace());
    }

    tracing::debug!(
        namespace = %scope.namespace(),
        sections = sections.len(),
        "navigator sections built"
    );
    Ok(sections)
}

fn materialize(
    scope: &NamespaceScope,
    spec: NodeSpec,
    seen: &mut FxHashSet<String>,
) -> Result<NavigatorNode> {
    if spec.local_key.is_empty() {
        return Err(WorkspaceError::validation(format!(
            "extension '{}' returned a navigator node with an empty key",
            scope.namespace()
        )));
    }

    let unique_key = scope.key(&spec.local_key);
    if !seen.insert(unique_key.clone()) {
        return Err(WorkspaceError::validation(format!(
            "duplicate navigator key '{unique_key}'"
        )));
    }

    let mut children = Vec::with_capacity(spec.children.len());
    for child in spec.children {
        children.push(materialize(scope, child, seen)?);
    }

    Ok(NavigatorNode {
        unique_key,
        label: spec.label,
        children,
        user_data: spec.user_data,
    })
}

fn stamp_namespace(nodes: &mut [NavigatorNode], namespace: &str) {
    let mut stack: Vec<&mut NavigatorNode> = nodes.iter_mut().collect();
    while let Some(node) = stack.pop() {
        node.user_data.insert(
            NAMESPACE_ATTR.to_string(),
            Value::String(namespace.to_string()),
        );
        stack.extend(node.children.iter_mut());
    }
}

new_key_type! { pub struct NodeId; }

#[derive(Debug, Clone)]
struct Node {
    unique_key: String,
    label: String,
    namespace: String,
    user_data: Map<String, Value>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct TreeSection {
    pub id: String,
    pub label: String,
    pub namespace: String,
    pub roots: Vec<NodeId>,
}

/// Merged navigator tree. Nodes live in an arena; parent and child links are
/// ids, and `by_key` resolves unique keys.
#[derive(Debug, Clone, Default)]
pub struct NavigatorTree {
    arena: SlotMap<NodeId, Node>,
    by_key: FxHashMap<String, NodeId>,
    sections: Vec<TreeSection>,
}

impl NavigatorTree {
    /// Sections are merged in the order given. A unique key seen twice is a
    /// validation error.
    pub fn from_sections<'a>(sections: impl IntoIterator<Item = &'a Section>) -> Result<Self> {
        let mut tree = Self::default();
        for section in sections {
            let mut roots = Vec::with_capacity(section.nodes.len());
            for node in &section.nodes {
                roots.push(tree.insert(node, None, &section.namespace)?);
            }
            tree.sections.push(TreeSection {
                id: section.id.clone(),
                label: section.label.clone(),
                namespace: section.namespace.clone(),
                roots,
            });
        }
        Ok(tree)
    }

    fn insert(
        &mut self,
        node: &NavigatorNode,
        parent: Option<NodeId>,
        section_namespace: &str,
    ) -> Result<NodeId> {
        if self.by_key.contains_key(&node.unique_key) {
            return Err(WorkspaceError::validation(format!(
                "duplicate navigator key '{}'",
                node.unique_key
            )));
        }

        let namespace = node
            .namespace()
            .unwrap_or(section_namespace)
            .to_string();
        let id = self.arena.insert(Node {
            unique_key: node.unique_key.clone(),
            label: node.label.clone(),
            namespace,
            user_data: node.user_data.clone(),
            parent,
            children: Vec::with_capacity(node.children.len()),
        });
        self.by_key.insert(node.unique_key.clone(), id);

        for child in &node.children {
            let child_id = self.insert(child, Some(id), section_namespace)?;
            if let Some(entry) = self.arena.get_mut(id) {
                entry.children.push(child_id);
            }
        }
        Ok(id)
    }

    pub fn find(&self, unique_key: &str) -> Option<NodeId> {
        self.by_key.get(unique_key).copied()
    }

    pub fn contains(&self, unique_key: &str) -> bool {
        self.by_key.contains_key(unique_key)
    }

    pub fn unique_key(&self, id: NodeId) -> Option<&str> {
        self.arena.get(id).map(|n| n.unique_key.as_str())
    }

    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.arena.get(id).map(|n| n.label.as_str())
    }

    pub fn namespace(&self, id: NodeId) -> Option<&str> {
        self.arena.get(id).map(|n| n.namespace.as_str())
    }

    pub fn user_data(&self, id: NodeId) -> Option<&Map<String, Value>> {
        self.arena.get(id).map(|n| &n.user_data)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.arena
            .get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn has_children(&self, id: NodeId) -> bool {
        !self.children(id).is_empty()
    }

    /// Nearest parent first.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.parent(id);
        while let Some(parent) = current {
            out.push(parent);
            current = self.parent(parent);
        }
        out
    }

    pub fn sections(&self) -> &[TreeSection] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Every node, sections in order, each subtree depth-first pre-order.
    pub fn depth_first(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.arena.len());
        for section in &self.sections {
            let mut stack: Vec<NodeId> = section.roots.iter().rev().copied().collect();
            while let Some(id) = stack.pop() {
                out.push(id);
                stack.extend(self.children(id).iter().rev().copied());
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/navigator_tree.rs"]
mod tests;
