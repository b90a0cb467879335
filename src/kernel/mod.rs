//! Workspace kernel: extension registry, navigator, command routing and the
//! conflict-guarded save path.

pub mod conflict;
pub mod extensions;
pub mod navigator;
pub mod navigator_tree;
pub mod save;
pub mod services;
pub mod session;
pub mod workspace_state;

pub use conflict::{
    ConflictDecision, ConflictPrompt, ConflictResolver, PendingResolution, ResolutionPhase,
};
pub use extensions::{Extension, ExtensionRegistry, ExtensionRegistryBuilder};
pub use navigator::{DropPosition, Navigator, NavigatorRow};
pub use navigator_tree::{NavigatorNode, NavigatorTree, NodeSpec, Section, SectionSpec};
pub use save::{save_document, SaveOutcome};
pub use session::{SessionPorts, WorkspaceSession};
pub use workspace_state::{SessionParams, WorkspaceState, WorkspaceStateAssembler};

#[cfg(test)]
#[path = "../../tests/unit/kernel/fixtures.rs"]
pub(crate) mod fixtures;
