//! Canonical document address: `namespace:documentType:key`.
//!
//! Segments are opaque tokens supplied by extensions. Nothing is trimmed,
//! lowercased or escaped, so `serialize` is the exact inverse of `parse`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, WorkspaceError};

pub const DELIMITER: char = ':';

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentUri {
    namespace: String,
    document_type: String,
    key: String,
}

impl DocumentUri {
    /// Every segment must be non-empty and free of the delimiter, so any URI
    /// built here survives a strict `parse` of its serialized form.
    pub fn new(
        namespace: impl Into<String>,
        document_type: impl Into<String>,
        key: impl Into<String>,
    ) -> Result<Self> {
        let namespace = namespace.into();
        let document_type = document_type.into();
        let key = key.into();

        check_segment("namespace", &namespace)?;
        check_segment("document type", &document_type)?;
        check_segment("document key", &key)?;

        Ok(Self {
            namespace,
            document_type,
            key,
        })
    }

    /// Returns `None` instead of failing, since most navigator keys are not
    /// document URIs. Lenient mode keeps any extra delimiters in the key.
    pub fn parse(raw: &str, lenient: bool) -> Option<Self> {
        let mut parts = raw.splitn(3, DELIMITER);
        let namespace = parts.next()?;
        let document_type = parts.next()?;
        let key = parts.next()?;

        if namespace.is_empty() || document_type.is_empty() || key.is_empty() {
            return None;
        }
        if !lenient && key.contains(DELIMITER) {
            return None;
        }

        Some(Self {
            namespace: namespace.to_string(),
            document_type: document_type.to_string(),
            key: key.to_string(),
        })
    }

    pub fn serialize(&self) -> String {
        let mut out = String::with_capacity(
            self.namespace.len() + self.document_type.len() + self.key.len() + 2,
        );
        out.push_str(&self.namespace);
        out.push(DELIMITER);
        out.push_str(&self.document_type);
        out.push(DELIMITER);
        out.push_str(&self.key);
        out
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn document_type(&self) -> &str {
        &self.document_type
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Navigator-local part of the key, i.e. everything after the namespace.
    pub fn local_key(&self) -> String {
        format!("{}{}{}", self.document_type, DELIMITER, self.key)
    }
}

fn check_segment(what: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(WorkspaceError::validation(format!("{what} is empty")));
    }
    if value.contains(DELIMITER) {
        return Err(WorkspaceError::validation(format!(
            "{what} '{value}' contains '{DELIMITER}'"
        )));
    }
    Ok(())
}

impl fmt::Display for DocumentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{DELIMITER}{}{DELIMITER}{}",
            self.namespace, self.document_type, self.key
        )
    }
}

impl FromStr for DocumentUri {
    type Err = WorkspaceError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, false)
            .ok_or_else(|| WorkspaceError::validation(format!("malformed document uri '{s}'")))
    }
}

impl Serialize for DocumentUri {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&DocumentUri::serialize(self))
    }
}

impl<'de> Deserialize<'de> for DocumentUri {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DocumentUri::parse(&raw, true)
            .ok_or_else(|| serde::de::Error::custom(format!("malformed document uri '{raw}'")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/core/uri.rs"]
mod tests;
