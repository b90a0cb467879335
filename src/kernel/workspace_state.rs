//! Session bootstrap snapshot.
//!
//! `WorkspaceStateAssembler` walks the registry in registration order and
//! folds every extension's facets under its namespace, then adds the
//! workspace-global messages and the user's capability flags and tabs. The
//! result is handed to the client as one JSON document. It is never patched;
//! a structural change means building a new one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Facet, FacetError, FacetResult, Result, WorkspaceError};
use crate::kernel::extensions::{Extension, ExtensionRegistry, NewDocumentDefaults, SettingsForm};
use crate::kernel::navigator_tree::{build_sections, Section};
use crate::kernel::services::ports::{Authorization, Localization, TabStore, WorkspaceSettings};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionParams {
    pub user: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type_filter: Option<String>,
}

impl SessionParams {
    pub fn for_user(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            document_type_filter: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionState {
    pub navigator_sections: Vec<Section>,
    pub new_document_defaults: Vec<NewDocumentDefaults>,
    pub localized_strings: BTreeMap<String, String>,
    pub settings_forms: Vec<SettingsForm>,
    pub inspector_configurations: Value,
    pub custom_data: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub capabilities: BTreeMap<String, bool>,
    /// Persisted tab list, in tab order, exactly as stored.
    pub open_tabs: Vec<String>,
}

impl UserPreferences {
    pub fn has_capability(&self, name: &str) -> bool {
        self.capabilities.get(name).copied().unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceState {
    pub per_extension_state: BTreeMap<String, ExtensionState>,
    /// Registration order of the keys in `per_extension_state`.
    pub extension_order: Vec<String>,
    pub global_localized_strings: BTreeMap<String, String>,
    pub user_preferences: UserPreferences,
}

impl WorkspaceState {
    pub fn extension(&self, namespace: &str) -> Option<&ExtensionState> {
        self.per_extension_state.get(namespace)
    }

    pub fn extensions_in_order(&self) -> impl Iterator<Item = (&str, &ExtensionState)> {
        self.extension_order.iter().filter_map(|ns| {
            self.per_extension_state
                .get(ns)
                .map(|state| (ns.as_str(), state))
        })
    }

    /// All sections of all extensions, registration order.
    pub fn navigator_sections(&self) -> impl Iterator<Item = &Section> {
        self.extensions_in_order()
            .flat_map(|(_, state)| state.navigator_sections.iter())
    }

    /// Flat lookup table. Extensions apply in registration order, so on a
    /// shared key the last registered one wins; global messages apply last.
    pub fn translations(&self) -> BTreeMap<String, String> {
        let mut merged = BTreeMap::new();
        for (_, state) in self.extensions_in_order() {
            for (key, value) in &state.localized_strings {
                merged.insert(key.clone(), value.clone());
            }
        }
        for (key, value) in &self.global_localized_strings {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }

    pub fn translate(&self, key: &str) -> Option<&str> {
        if let Some(value) = self.global_localized_strings.get(key) {
            return Some(value.as_str());
        }
        self.extension_order
            .iter()
            .rev()
            .filter_map(|ns| self.per_extension_state.get(ns))
            .find_map(|state| state.localized_strings.get(key))
            .map(String::as_str)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

pub struct WorkspaceStateAssembler<'a> {
    registry: &'a ExtensionRegistry,
    localization: &'a dyn Localization,
    authorization: &'a dyn Authorization,
    settings: &'a WorkspaceSettings,
    tab_store: Option<&'a dyn TabStore>,
}

impl<'a> WorkspaceStateAssembler<'a> {
    pub fn new(
        registry: &'a ExtensionRegistry,
        localization: &'a dyn Localization,
        authorization: &'a dyn Authorization,
        settings: &'a WorkspaceSettings,
    ) -> Self {
        Self {
            registry,
            localization,
            authorization,
            settings,
            tab_store: None,
        }
    }

    pub fn with_tab_store(mut self, tab_store: &'a dyn TabStore) -> Self {
        self.tab_store = Some(tab_store);
        self
    }

    /// Any facet failure aborts the whole bootstrap; there is no partially
    /// populated state.
    pub fn build_initial_state(&self, params: &SessionParams) -> Result<WorkspaceState> {
        let _span = tracing::info_span!("build_initial_state", user = %params.user).entered();
        let mut state = WorkspaceState::default();

        for extension in self.registry.list_extensions() {
            let namespace = extension.namespace().to_string();
            let ext_state = self.assemble_extension(extension, params).map_err(|e| {
                tracing::error!(namespace = %namespace, error = %e, "workspace bootstrap aborted");
                e
            })?;
            state.extension_order.push(namespace.clone());
            state.per_extension_state.insert(namespace, ext_state);
        }

        for key in self.settings.global_message_keys() {
            let text = self.localization.translate(&key);
            state.global_localized_strings.insert(key, text);
        }

        for name in &self.settings.capabilities {
            let granted = self.authorization.user_has_capability(name);
            state
                .user_preferences
                .capabilities
                .insert(name.clone(), granted);
        }

        state.user_preferences.open_tabs = self.load_tabs(&params.user);

        tracing::info!(
            extensions = state.extension_order.len(),
            tabs = state.user_preferences.open_tabs.len(),
            "workspace state assembled"
        );
        Ok(state)
    }

    fn assemble_extension(
        &self,
        extension: &dyn Extension,
        params: &SessionParams,
    ) -> Result<ExtensionState> {
        let namespace = extension.namespace();
        tracing::debug!(namespace = %namespace, "assembling extension state");

        let navigator_sections = build_sections(extension, params.document_type_filter.as_deref())
            .map_err(|e| match e {
                WorkspaceError::Validation(message) => WorkspaceError::Assembly {
                    namespace: namespace.to_string(),
                    facet: Facet::NavigatorSections,
                    source: FacetError::new(message),
                },
                other => other,
            })?;
        let new_document_defaults = facet(
            namespace,
            Facet::NewDocumentDefaults,
            extension.new_document_defaults(),
        )?;
        let inspector_configurations =
            facet(namespace, Facet::InspectorSchema, extension.inspector_schema())?;
        let settings_forms = facet(namespace, Facet::SettingsForms, extension.settings_forms())?;
        let custom_data = facet(namespace, Facet::CustomData, extension.custom_data())?;

        let localized_strings = extension
            .localized_string_keys()
            .into_iter()
            .map(|key| {
                let text = self.localization.translate(&key);
                (key, text)
            })
            .collect();

        Ok(ExtensionState {
            navigator_sections,
            new_document_defaults,
            localized_strings,
            settings_forms,
            inspector_configurations,
            custom_data,
        })
    }

    fn load_tabs(&self, user: &str) -> Vec<String> {
        let Some(store) = self.tab_store else {
            return Vec::new();
        };
        match store.load_tabs(user) {
            Ok(tabs) => tabs,
            Err(e) => {
                tracing::warn!(user = %user, error = %e, "open tabs unavailable; starting empty");
                Vec::new()
            }
        }
    }
}

fn facet<T>(namespace: &str, facet: Facet, result: FacetResult<T>) -> Result<T> {
    result.map_err(|source| WorkspaceError::Assembly {
        namespace: namespace.to_string(),
        facet,
        source,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/workspace_state.rs"]
mod tests;
