use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Workspace-global messages every session ships, whatever the settings say.
pub const BUILTIN_GLOBAL_MESSAGE_KEYS: &[&str] = &[
    "workspace.bootstrapFailed",
    "workspace.conflict.title",
    "workspace.conflict.message",
    "workspace.conflict.reload",
    "workspace.conflict.saveOverwrite",
    "workspace.navigator.empty",
];

/// Capabilities queried for the session user unless settings replace them.
pub const DEFAULT_CAPABILITIES: &[&str] = &["workspace.edit", "workspace.settings", "workspace.publish"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceSettings {
    /// Added to `BUILTIN_GLOBAL_MESSAGE_KEYS`.
    #[serde(default)]
    pub global_message_keys: Vec<String>,
    #[serde(default = "default_capabilities")]
    pub capabilities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tabs_dir: Option<PathBuf>,
}

impl WorkspaceSettings {
    /// Built-in keys first, then configured ones; duplicates removed.
    pub fn global_message_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = BUILTIN_GLOBAL_MESSAGE_KEYS
            .iter()
            .map(|k| k.to_string())
            .collect();
        for key in &self.global_message_keys {
            if !keys.contains(key) {
                keys.push(key.clone());
            }
        }
        keys
    }
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            global_message_keys: Vec::new(),
            capabilities: default_capabilities(),
            log_filter: None,
            tabs_dir: None,
        }
    }
}

fn default_capabilities() -> Vec<String> {
    DEFAULT_CAPABILITIES.iter().map(|c| c.to_string()).collect()
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/settings.rs"]
mod tests;
