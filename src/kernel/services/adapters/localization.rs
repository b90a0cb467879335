//! Key/value message catalog, loadable from a flat JSON object.

use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::kernel::services::ports::Localization;

#[derive(Debug, Clone, Default)]
pub struct CatalogLocalization {
    messages: FxHashMap<String, String>,
}

impl CatalogLocalization {
    pub fn new() -> Self {
        Self::default()
    }

    /// `{"key": "text", ...}`
    pub fn from_json(data: &str) -> Result<Self> {
        let messages: FxHashMap<String, String> = serde_json::from_str(data)?;
        Ok(Self { messages })
    }

    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.messages.insert(key.into(), text.into());
    }

    pub fn with(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(key, text);
        self
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Localization for CatalogLocalization {
    /// Unknown keys come back unchanged so the UI still shows something.
    fn translate(&self, key: &str) -> String {
        match self.messages.get(key) {
            Some(text) => text.clone(),
            None => {
                tracing::debug!(key = %key, "missing translation");
                key.to_string()
            }
        }
    }
}
