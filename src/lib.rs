//! workdesk - multi-extension document workspace core
//!
//! Modules:
//! - core: document URIs and namespaced commands
//! - error: `WorkspaceError` and facet errors
//! - kernel: extension registry, navigator tree, state assembly, command bus,
//!   conflict resolution and the session that wires them together

pub mod core;
pub mod error;
pub mod kernel;
