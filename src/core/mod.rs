//! Core value types shared by every layer:
//! - `uri`: canonical document addresses
//! - `command`: namespaced commands routed by the bus

pub mod command;
pub mod uri;

pub use command::{Command, NAVIGATOR_SELECTED, NODE_MOVED};
pub use uri::DocumentUri;
