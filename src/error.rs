//! Crate-wide error type.
//!
//! Only failures that must stop the caller live here. Routing misses, navigator
//! lookups that find nothing and dismissed conflict prompts are ordinary return
//! values, not errors.

use std::fmt;

pub type Result<T> = std::result::Result<T, WorkspaceError>;

/// Which capability facet of an extension was being computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facet {
    NavigatorSections,
    NewDocumentDefaults,
    InspectorSchema,
    SettingsForms,
    CustomData,
}

impl Facet {
    pub fn name(&self) -> &'static str {
        match self {
            Facet::NavigatorSections => "navigatorSections",
            Facet::NewDocumentDefaults => "newDocumentDefaults",
            Facet::InspectorSchema => "inspectorSchema",
            Facet::SettingsForms => "settingsForms",
            Facet::CustomData => "customData",
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Failure reported by an extension's facet provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FacetError {
    pub message: String,
}

impl FacetError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type FacetResult<T> = std::result::Result<T, FacetError>;

#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("namespace already registered: {namespace}")]
    NamespaceConflict { namespace: String },

    #[error("extension not found: {namespace}")]
    NotFound { namespace: String },

    #[error("extension '{namespace}' failed to provide {facet}: {source}")]
    Assembly {
        namespace: String,
        facet: Facet,
        #[source]
        source: FacetError,
    },

    #[error("a conflict resolution is already pending")]
    ResolutionPending,

    #[error("repository error: {0}")]
    Repository(String),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl WorkspaceError {
    pub fn validation(message: impl Into<String>) -> Self {
        WorkspaceError::Validation(message.into())
    }

    /// Errors that mean the workspace could not be assembled at all.
    pub fn is_fatal_for_bootstrap(&self) -> bool {
        matches!(
            self,
            WorkspaceError::Assembly { .. }
                | WorkspaceError::Validation(_)
                | WorkspaceError::NamespaceConflict { .. }
        )
    }
}
