//! Command bus: one FIFO queue plus an explicit `namespace -> verb -> handlers`
//! route table.
//!
//! Handlers run one at a time on the dispatching thread. A handler never gets
//! the bus itself; it reacts by queueing follow-up commands through the
//! `CommandSender` it is handed, and those are delivered later in the same
//! drain.

use std::sync::mpsc::{self, Receiver, Sender};

use rustc_hash::FxHashMap;

use crate::core::command::{qualify, split_qualified_name};
use crate::core::Command;
use crate::error::{Result, WorkspaceError};

/// Upper bound on commands delivered by a single `pump`. Anything beyond stays
/// queued for the next one.
const MAX_COMMANDS_PER_PUMP: usize = 4096;

pub type CommandHandler = Box<dyn FnMut(&Command, &CommandSender)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Clone)]
pub struct CommandSender {
    tx: Sender<Command>,
}

impl CommandSender {
    /// Queues a command. Returns false once the bus is gone.
    pub fn send(&self, command: Command) -> bool {
        self.tx.send(command).is_ok()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    /// Commands that reached at least one handler.
    pub delivered: usize,
    /// Handler invocations across all delivered commands.
    pub invocations: usize,
    /// Commands nobody subscribed to. Dropped without error.
    pub misses: usize,
}

impl DispatchReport {
    fn merge(&mut self, other: DispatchReport) {
        self.delivered += other.delivered;
        self.invocations += other.invocations;
        self.misses += other.misses;
    }
}

struct Subscriber {
    id: SubscriptionId,
    handler: CommandHandler,
}

pub struct CommandBus {
    sender: CommandSender,
    rx: Receiver<Command>,
    routes: FxHashMap<String, FxHashMap<String, Vec<Subscriber>>>,
    next_id: u64,
}

impl CommandBus {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            sender: CommandSender { tx },
            rx,
            routes: FxHashMap::default(),
            next_id: 0,
        }
    }

    pub fn sender(&self) -> CommandSender {
        self.sender.clone()
    }

    /// Subscribes to a fully qualified `namespace:verb`. Workspace-level
    /// subscribers use this directly; extensions go through `NamespaceRoutes`.
    pub fn subscribe<F>(&mut self, qualified_name: &str, handler: F) -> Result<SubscriptionId>
    where
        F: FnMut(&Command, &CommandSender) + 'static,
    {
        let (namespace, verb) = split_qualified_name(qualified_name).ok_or_else(|| {
            WorkspaceError::validation(format!(
                "command name '{qualified_name}' is not of the form namespace:verb"
            ))
        })?;

        let id = SubscriptionId(self.next_id);
        self.next_id += 1;

        self.routes
            .entry(namespace.to_string())
            .or_default()
            .entry(verb.to_string())
            .or_default()
            .push(Subscriber {
                id,
                handler: Box::new(handler),
            });

        tracing::debug!(command = %qualified_name, "command subscriber registered");
        Ok(id)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        for verbs in self.routes.values_mut() {
            for subscribers in verbs.values_mut() {
                if let Some(pos) = subscribers.iter().position(|s| s.id == id) {
                    subscribers.remove(pos);
                    return true;
                }
            }
        }
        false
    }

    /// Route scope that can only subscribe inside `namespace`.
    pub fn namespace_routes(&mut self, namespace: &str) -> NamespaceRoutes<'_> {
        NamespaceRoutes {
            bus: self,
            namespace: namespace.to_string(),
        }
    }

    pub fn has_route(&self, qualified_name: &str) -> bool {
        self.subscriber_count(qualified_name) > 0
    }

    pub fn subscriber_count(&self, qualified_name: &str) -> usize {
        split_qualified_name(qualified_name)
            .and_then(|(ns, verb)| self.routes.get(ns)?.get(verb))
            .map_or(0, Vec::len)
    }

    /// Queues `command` and drains the queue, including any follow-ups the
    /// handlers emit.
    pub fn dispatch(&mut self, command: Command) -> DispatchReport {
        let _ = self.sender.send(command);
        self.pump()
    }

    /// Delivers everything currently queued, e.g. commands emitted by the
    /// navigator since the last pump.
    pub fn pump(&mut self) -> DispatchReport {
        let mut report = DispatchReport::default();
        let mut processed = 0usize;

        while processed < MAX_COMMANDS_PER_PUMP {
            let Ok(command) = self.rx.try_recv() else {
                return report;
            };
            processed += 1;
            report.merge(self.deliver(&command));
        }

        tracing::warn!(
            limit = MAX_COMMANDS_PER_PUMP,
            "command queue not drained; remaining commands deferred"
        );
        report
    }

    fn deliver(&mut self, command: &Command) -> DispatchReport {
        let sender = self.sender.clone();
        let subscribers = match command.route() {
            Some((ns, verb)) => self
                .routes
                .get_mut(ns)
                .and_then(|verbs| verbs.get_mut(verb))
                .filter(|subs| !subs.is_empty()),
            None => None,
        };

        let Some(subscribers) = subscribers else {
            tracing::debug!(command = %command.name(), "no subscriber; command dropped");
            return DispatchReport {
                misses: 1,
                ..DispatchReport::default()
            };
        };

        for subscriber in subscribers.iter_mut() {
            (subscriber.handler)(command, &sender);
        }

        DispatchReport {
            delivered: 1,
            invocations: subscribers.len(),
            misses: 0,
        }
    }
}

impl Default for CommandBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Subscription scope handed to an extension: every verb is prefixed with the
/// extension's own namespace, so an extension cannot listen on another's
/// commands.
pub struct NamespaceRoutes<'a> {
    bus: &'a mut CommandBus,
    namespace: String,
}

impl NamespaceRoutes<'_> {
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn on<F>(&mut self, verb: &str, handler: F) -> Result<SubscriptionId>
    where
        F: FnMut(&Command, &CommandSender) + 'static,
    {
        if verb.is_empty() {
            return Err(WorkspaceError::validation(format!(
                "empty command verb in namespace '{}'",
                self.namespace
            )));
        }
        let name = qualify(&self.namespace, verb);
        self.bus.subscribe(&name, handler)
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/services/bus.rs"]
mod tests;
