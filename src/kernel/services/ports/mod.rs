//! Service ports: contracts for the collaborators this crate does not own.
//!
//! Concrete implementations live in `adapters` or in the host application.

pub mod authorization;
pub mod localization;
pub mod repository;
pub mod settings;
pub mod tabs;

pub use authorization::Authorization;
pub use localization::Localization;
pub use repository::{DocumentRepository, DocumentSnapshot, SaveReport};
pub use settings::WorkspaceSettings;
pub use tabs::TabStore;
