//! Extension contract and the registry that owns installed extensions.
//!
//! An extension is one independently developed contributor. It owns a
//! namespace, and everything it contributes (navigator keys, commands,
//! localized strings) lives under that namespace. The registry is filled once
//! at bootstrap through `ExtensionRegistryBuilder` and cannot change after
//! `build()`.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::uri::DELIMITER;
use crate::error::{FacetResult, Result, WorkspaceError};
use crate::kernel::navigator_tree::{NamespaceScope, SectionSpec};
use crate::kernel::services::bus::{CommandBus, NamespaceRoutes};

/// Template used when the user creates a new document of `document_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDocumentDefaults {
    pub document_type: String,
    pub label: String,
    #[serde(default)]
    pub defaults: Value,
}

/// A settings panel contributed to the workspace settings screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsForm {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub fields: Value,
}

/// Capability facets of one extension. Every facet is computed once per
/// session bootstrap; an `Err` from any of them aborts the whole bootstrap.
pub trait Extension {
    fn namespace(&self) -> &str;

    /// Navigator fragment. `scope` builds keys under this extension's
    /// namespace; `document_type_filter` narrows the listing when the host
    /// only wants one document type.
    fn navigator_sections(
        &self,
        scope: &NamespaceScope,
        document_type_filter: Option<&str>,
    ) -> FacetResult<Vec<SectionSpec>>;

    fn new_document_defaults(&self) -> FacetResult<Vec<NewDocumentDefaults>>;

    fn inspector_schema(&self) -> FacetResult<Value>;

    fn custom_data(&self) -> FacetResult<Map<String, Value>>;

    fn settings_forms(&self) -> FacetResult<Vec<SettingsForm>> {
        Ok(Vec::new())
    }

    fn localized_string_keys(&self) -> BTreeSet<String> {
        BTreeSet::new()
    }

    /// Registers command handlers. `routes` only accepts verbs inside this
    /// extension's namespace.
    fn subscribe(&self, _routes: &mut NamespaceRoutes<'_>) -> Result<()> {
        Ok(())
    }
}

pub fn validate_namespace(namespace: &str) -> Result<()> {
    if namespace.is_empty() {
        return Err(WorkspaceError::validation("extension namespace is empty"));
    }
    if namespace.contains(DELIMITER) || namespace.chars().any(char::is_whitespace) {
        return Err(WorkspaceError::validation(format!(
            "extension namespace '{namespace}' must not contain '{DELIMITER}' or whitespace"
        )));
    }
    Ok(())
}

#[derive(Default)]
pub struct ExtensionRegistryBuilder {
    extensions: Vec<Box<dyn Extension>>,
    index: FxHashMap<String, usize>,
}

impl ExtensionRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails immediately on a malformed or already-taken namespace.
    pub fn register<E: Extension + 'static>(&mut self, extension: E) -> Result<&mut Self> {
        self.register_boxed(Box::new(extension))
    }

    pub fn register_boxed(&mut self, extension: Box<dyn Extension>) -> Result<&mut Self> {
        let namespace = extension.namespace().to_string();
        validate_namespace(&namespace)?;
        if self.index.contains_key(&namespace) {
            tracing::error!(namespace = %namespace, "namespace registered twice");
            return Err(WorkspaceError::NamespaceConflict { namespace });
        }

        tracing::debug!(namespace = %namespace, order = self.extensions.len(), "extension registered");
        self.index.insert(namespace, self.extensions.len());
        self.extensions.push(extension);
        Ok(self)
    }

    pub fn build(self) -> ExtensionRegistry {
        tracing::info!(extensions = self.extensions.len(), "extension registry sealed");
        ExtensionRegistry {
            extensions: self.extensions,
            index: self.index,
        }
    }
}

pub struct ExtensionRegistry {
    extensions: Vec<Box<dyn Extension>>,
    index: FxHashMap<String, usize>,
}

impl ExtensionRegistry {
    pub fn builder() -> ExtensionRegistryBuilder {
        ExtensionRegistryBuilder::new()
    }

    /// Registration order.
    pub fn list_extensions(&self) -> impl Iterator<Item = &dyn Extension> {
        self.extensions.iter().map(|e| e.as_ref())
    }

    pub fn namespaces(&self) -> Vec<&str> {
        self.extensions.iter().map(|e| e.namespace()).collect()
    }

    pub fn get_extension(&self, namespace: &str) -> Result<&dyn Extension> {
        self.index
            .get(namespace)
            .and_then(|&idx| self.extensions.get(idx))
            .map(|e| e.as_ref())
            .ok_or_else(|| WorkspaceError::NotFound {
                namespace: namespace.to_string(),
            })
    }

    pub fn contains(&self, namespace: &str) -> bool {
        self.index.contains_key(namespace)
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Lets every extension fill its namespace's slice of the bus route
    /// table, in registration order.
    pub fn bind_commands(&self, bus: &mut CommandBus) -> Result<()> {
        for extension in &self.extensions {
            let mut routes = bus.namespace_routes(extension.namespace());
            extension.subscribe(&mut routes)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/extensions.rs"]
mod tests;
