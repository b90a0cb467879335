//! Navigator controller: expansion, selection, open tabs and drag gestures
//! over the merged tree.
//!
//! The navigator never mutates documents. Everything that needs an owner's
//! decision goes out as a command scoped to the namespace of the node
//! involved.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::core::{Command, DocumentUri, NAVIGATOR_SELECTED, NODE_MOVED};
use crate::error::Result;
use crate::kernel::navigator_tree::{NavigatorTree, NodeId};
use crate::kernel::services::bus::CommandSender;
use crate::kernel::workspace_state::WorkspaceState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropPosition {
    Before,
    After,
    Into,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    Section { index: usize },
    Node { id: NodeId, unique_key: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigatorRow {
    pub kind: RowKind,
    pub depth: u16,
    pub label: String,
    pub has_children: bool,
    pub is_expanded: bool,
    pub is_selected: bool,
}

pub struct Navigator {
    tree: NavigatorTree,
    expanded: FxHashSet<NodeId>,
    selected: Option<NodeId>,
    open_tabs: Vec<String>,
    sender: CommandSender,
}

impl Navigator {
    pub fn new(tree: NavigatorTree, sender: CommandSender) -> Self {
        Self {
            tree,
            expanded: FxHashSet::default(),
            selected: None,
            open_tabs: Vec::new(),
            sender,
        }
    }

    pub fn from_state(state: &WorkspaceState, sender: CommandSender) -> Result<Self> {
        let tree = NavigatorTree::from_sections(state.navigator_sections())?;
        Ok(Self::new(tree, sender))
    }

    pub fn tree(&self) -> &NavigatorTree {
        &self.tree
    }

    pub fn selected_key(&self) -> Option<&str> {
        self.selected.and_then(|id| self.tree.unique_key(id))
    }

    pub fn open_tabs(&self) -> &[String] {
        &self.open_tabs
    }

    /// Opens the node addressed by `uri`. Returns false, and emits nothing,
    /// when no such node exists.
    pub fn open_document(&mut self, uri: &DocumentUri) -> bool {
        self.open_key(&uri.serialize())
    }

    /// Same as `open_document` for any navigator key, document or not.
    pub fn open_key(&mut self, unique_key: &str) -> bool {
        if !self.select(unique_key) {
            return false;
        }
        if !self.open_tabs.iter().any(|k| k == unique_key) {
            self.open_tabs.push(unique_key.to_string());
        }
        true
    }

    /// Selects a node as a click would: it becomes the selection and the
    /// owning extension receives `navigator-selected`.
    pub fn select(&mut self, unique_key: &str) -> bool {
        let Some(id) = self.tree.find(unique_key) else {
            tracing::debug!(key = %unique_key, "navigator key not found");
            return false;
        };
        self.selected = Some(id);
        self.emit_selected(id);
        true
    }

    /// Expands every ancestor and selects the node. No command is emitted;
    /// an unknown key is ignored.
    pub fn reveal(&mut self, unique_key: &str) {
        let Some(id) = self.tree.find(unique_key) else {
            return;
        };
        for ancestor in self.tree.ancestors(id) {
            self.expanded.insert(ancestor);
        }
        self.selected = Some(id);
    }

    pub fn toggle_expand(&mut self, unique_key: &str) -> bool {
        let Some(id) = self.tree.find(unique_key) else {
            return false;
        };
        if !self.tree.has_children(id) {
            return false;
        }
        if !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
        true
    }

    pub fn is_expanded(&self, unique_key: &str) -> bool {
        self.tree
            .find(unique_key)
            .is_some_and(|id| self.expanded.contains(&id))
    }

    pub fn close_tab(&mut self, unique_key: &str) -> bool {
        let before = self.open_tabs.len();
        self.open_tabs.retain(|k| k != unique_key);
        self.open_tabs.len() != before
    }

    /// Reopens persisted tabs in order, document URIs and plain navigator
    /// keys alike. Entries that no longer resolve are dropped silently.
    /// Returns how many reopened.
    pub fn restore_tabs(&mut self, tabs: &[String]) -> usize {
        let mut restored = 0;
        for raw in tabs {
            if self.open_key(raw) {
                restored += 1;
            }
        }
        if restored != tabs.len() {
            tracing::debug!(
                restored,
                dropped = tabs.len() - restored,
                "stale tabs dropped on restore"
            );
        }
        restored
    }

    pub fn tabs_for_storage(&self) -> Vec<String> {
        self.open_tabs.clone()
    }

    /// Nodes dragged within the navigator. The destination's owner decides
    /// whether the move is legal; the navigator only reports it.
    pub fn on_node_drop(&mut self, moved: &[String], target: &str, position: DropPosition) -> bool {
        self.emit_moved(
            target,
            position,
            json!({
                "source": "navigator",
                "nodes": moved,
            }),
        )
    }

    /// Items dragged in from outside the navigator (files, other panels).
    pub fn on_external_drop(&mut self, items: Vec<Value>, target: &str, position: DropPosition) -> bool {
        self.emit_moved(
            target,
            position,
            json!({
                "source": "external",
                "items": items,
            }),
        )
    }

    fn emit_moved(&mut self, target: &str, position: DropPosition, mut payload: Value) -> bool {
        let Some(id) = self.tree.find(target) else {
            return false;
        };
        let Some(namespace) = self.tree.namespace(id) else {
            return false;
        };
        if let Value::Object(map) = &mut payload {
            map.insert("target".to_string(), Value::String(target.to_string()));
            map.insert("position".to_string(), json!(position));
        }
        self.sender
            .send(Command::scoped(namespace, NODE_MOVED, payload))
    }

    fn emit_selected(&self, id: NodeId) {
        let (Some(namespace), Some(unique_key)) = (self.tree.namespace(id), self.tree.unique_key(id))
        else {
            return;
        };
        let user_data = self
            .tree
            .user_data(id)
            .cloned()
            .map(Value::Object)
            .unwrap_or(Value::Null);
        let document_uri = DocumentUri::parse(unique_key, true).map(|u| u.serialize());

        let payload = json!({
            "uniqueKey": unique_key,
            "documentUri": document_uri,
            "userData": user_data,
        });
        self.sender
            .send(Command::scoped(namespace, NAVIGATOR_SELECTED, payload));
    }

    /// Visible rows: a header per section, then its expanded subtrees.
    pub fn rows(&self) -> Vec<NavigatorRow> {
        let mut result = Vec::new();
        for (index, section) in self.tree.sections().iter().enumerate() {
            result.push(NavigatorRow {
                kind: RowKind::Section { index },
                depth: 0,
                label: section.label.clone(),
                has_children: !section.roots.is_empty(),
                is_expanded: true,
                is_selected: false,
            });

            let mut stack: Vec<(NodeId, u16)> =
                section.roots.iter().rev().map(|&id| (id, 1)).collect();
            while let Some((id, depth)) = stack.pop() {
                let is_expanded = self.expanded.contains(&id);
                result.push(NavigatorRow {
                    kind: RowKind::Node {
                        id,
                        unique_key: self.tree.unique_key(id).unwrap_or_default().to_string(),
                    },
                    depth,
                    label: self.tree.label(id).unwrap_or_default().to_string(),
                    has_children: self.tree.has_children(id),
                    is_expanded,
                    is_selected: self.selected == Some(id),
                });
                if is_expanded {
                    for &child in self.tree.children(id).iter().rev() {
                        stack.push((child, depth + 1));
                    }
                }
            }
        }
        result
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/navigator.rs"]
mod tests;
