//! One user session: registry routes bound to a bus, the assembled state and
//! the navigator built from it.

use crate::core::Command;
use crate::error::Result;
use crate::kernel::extensions::ExtensionRegistry;
use crate::kernel::navigator::Navigator;
use crate::kernel::services::bus::{CommandBus, CommandSender, DispatchReport};
use crate::kernel::services::ports::{Authorization, Localization, TabStore, WorkspaceSettings};
use crate::kernel::workspace_state::{SessionParams, WorkspaceState, WorkspaceStateAssembler};

/// Collaborators consulted during bootstrap.
#[derive(Clone, Copy)]
pub struct SessionPorts<'a> {
    pub localization: &'a dyn Localization,
    pub authorization: &'a dyn Authorization,
}

pub struct WorkspaceSession {
    registry: ExtensionRegistry,
    bus: CommandBus,
    state: WorkspaceState,
    navigator: Navigator,
    tab_store: Option<Box<dyn TabStore>>,
    user: String,
}

impl WorkspaceSession {
    pub fn bootstrap(
        registry: ExtensionRegistry,
        ports: SessionPorts<'_>,
        tab_store: Option<Box<dyn TabStore>>,
        settings: &WorkspaceSettings,
        params: SessionParams,
    ) -> Result<Self> {
        let mut bus = CommandBus::new();
        registry.bind_commands(&mut bus)?;

        let mut assembler = WorkspaceStateAssembler::new(
            &registry,
            ports.localization,
            ports.authorization,
            settings,
        );
        if let Some(store) = tab_store.as_deref() {
            assembler = assembler.with_tab_store(store);
        }
        let state = assembler.build_initial_state(&params)?;

        let mut navigator = Navigator::from_state(&state, bus.sender())?;
        let restored = navigator.restore_tabs(&state.user_preferences.open_tabs);
        let report = bus.pump();

        tracing::info!(
            user = %params.user,
            extensions = registry.len(),
            nodes = navigator.tree().len(),
            restored_tabs = restored,
            delivered = report.delivered,
            "workspace session ready"
        );

        Ok(Self {
            registry,
            bus,
            state,
            navigator,
            tab_store,
            user: params.user,
        })
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn registry(&self) -> &ExtensionRegistry {
        &self.registry
    }

    pub fn state(&self) -> &WorkspaceState {
        &self.state
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Navigator gestures queue commands; call `pump` to deliver them.
    pub fn navigator_mut(&mut self) -> &mut Navigator {
        &mut self.navigator
    }

    pub fn bus_mut(&mut self) -> &mut CommandBus {
        &mut self.bus
    }

    pub fn sender(&self) -> CommandSender {
        self.bus.sender()
    }

    pub fn dispatch(&mut self, command: Command) -> DispatchReport {
        self.bus.dispatch(command)
    }

    pub fn pump(&mut self) -> DispatchReport {
        self.bus.pump()
    }

    /// Writes the current tab order. A session without a tab store keeps
    /// tabs in memory only.
    pub fn persist_tabs(&self) -> Result<()> {
        let Some(store) = self.tab_store.as_deref() else {
            return Ok(());
        };
        store.save_tabs(&self.user, &self.navigator.tabs_for_storage())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/session.rs"]
mod tests;
