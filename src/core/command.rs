//! Namespaced commands: `namespace:verb` plus an opaque JSON payload.
//!
//! The namespace prefix is the only routing information; the bus never looks
//! at the payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::uri::DELIMITER;

/// Emitted by the navigator when a node is opened or clicked.
pub const NAVIGATOR_SELECTED: &str = "navigator-selected";
/// Emitted by the navigator when nodes are dragged onto another node.
pub const NODE_MOVED: &str = "node-moved";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    pub qualified_name: String,
    #[serde(default)]
    pub payload: Value,
}

impl Command {
    pub fn new(qualified_name: impl Into<String>, payload: Value) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            payload,
        }
    }

    pub fn scoped(namespace: &str, verb: &str, payload: Value) -> Self {
        Self::new(qualify(namespace, verb), payload)
    }

    pub fn name(&self) -> &str {
        &self.qualified_name
    }

    /// `(namespace, verb)`, or `None` when the name is not routable.
    pub fn route(&self) -> Option<(&str, &str)> {
        split_qualified_name(&self.qualified_name)
    }

    pub fn namespace(&self) -> Option<&str> {
        self.route().map(|(ns, _)| ns)
    }

    pub fn verb(&self) -> Option<&str> {
        self.route().map(|(_, verb)| verb)
    }
}

pub fn qualify(namespace: &str, verb: &str) -> String {
    format!("{namespace}{DELIMITER}{verb}")
}

/// Splits at the first delimiter. The verb may itself contain delimiters.
pub fn split_qualified_name(name: &str) -> Option<(&str, &str)> {
    let (namespace, verb) = name.split_once(DELIMITER)?;
    if namespace.is_empty() || verb.is_empty() {
        return None;
    }
    Some((namespace, verb))
}

#[cfg(test)]
#[path = "../../tests/unit/core/command.rs"]
mod tests;
