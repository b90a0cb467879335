//! Services layer (ports + adapters) and the command bus.
//!
//! - `ports`: contracts for external collaborators
//! - `adapters`: reference implementations (files, memory)
//! - `bus`: command routing

pub mod adapters;
pub mod bus;
pub mod ports;

pub use bus::{CommandBus, CommandSender, DispatchReport, NamespaceRoutes, SubscriptionId};
