//! Modal conflict prompt guarding saves against stale overwrites.
//!
//! `Idle -> AwaitingDecision -> {ReloadChosen | SaveChosen | Dismissed} -> Idle`
//!
//! The save side holds a `PendingResolution` and awaits it; the UI side
//! watches the phase, shows the prompt and calls one of the `choose_*`
//! methods or `dismiss`. The terminal phase lasts until the waiting side has
//! taken the decision.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tokio::sync::{oneshot, watch};

use crate::core::DocumentUri;
use crate::error::{Result, WorkspaceError};

/// Localization key of the default prompt text.
pub const CONFLICT_MESSAGE_KEY: &str = "workspace.conflict.message";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionPhase {
    Idle,
    AwaitingDecision,
    ReloadChosen,
    SaveChosen,
    Dismissed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictDecision {
    Reload,
    SaveOverwrite,
    /// Closed without a choice. Callers must not proceed.
    Dismissed,
}

impl ConflictDecision {
    fn phase(self) -> ResolutionPhase {
        match self {
            ConflictDecision::Reload => ResolutionPhase::ReloadChosen,
            ConflictDecision::SaveOverwrite => ResolutionPhase::SaveChosen,
            ConflictDecision::Dismissed => ResolutionPhase::Dismissed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictPrompt {
    pub uri: DocumentUri,
    /// Localization key or literal text for the UI.
    pub message: String,
}

impl ConflictPrompt {
    pub fn new(uri: DocumentUri, message: impl Into<String>) -> Self {
        Self {
            uri,
            message: message.into(),
        }
    }

    pub fn for_document(uri: DocumentUri) -> Self {
        Self::new(uri, CONFLICT_MESSAGE_KEY)
    }
}

#[derive(Default)]
struct Inner {
    prompt: Option<ConflictPrompt>,
    reply: Option<oneshot::Sender<ConflictDecision>>,
}

#[derive(Clone)]
pub struct ConflictResolver {
    inner: Arc<Mutex<Inner>>,
    phase: Arc<watch::Sender<ResolutionPhase>>,
}

impl Default for ConflictResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ConflictResolver {
    pub fn new() -> Self {
        let (phase, _) = watch::channel(ResolutionPhase::Idle);
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            phase: Arc::new(phase),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn phase(&self) -> ResolutionPhase {
        *self.phase.borrow()
    }

    /// Phase changes, for whoever renders the prompt.
    pub fn watch_phase(&self) -> watch::Receiver<ResolutionPhase> {
        self.phase.subscribe()
    }

    pub fn prompt(&self) -> Option<ConflictPrompt> {
        self.lock().prompt.clone()
    }

    /// Opens the prompt. Fails with `ResolutionPending` unless idle.
    pub fn request_resolution(&self, prompt: ConflictPrompt) -> Result<PendingResolution> {
        let mut inner = self.lock();
        if self.phase() != ResolutionPhase::Idle {
            return Err(WorkspaceError::ResolutionPending);
        }

        let (tx, rx) = oneshot::channel();
        tracing::info!(uri = %prompt.uri, "conflict prompt opened");
        inner.prompt = Some(prompt);
        inner.reply = Some(tx);
        self.phase.send_replace(ResolutionPhase::AwaitingDecision);

        Ok(PendingResolution {
            rx,
            resolver: self.clone(),
        })
    }

    pub fn choose_reload(&self) -> bool {
        self.decide(ConflictDecision::Reload)
    }

    pub fn choose_save_overwrite(&self) -> bool {
        self.decide(ConflictDecision::SaveOverwrite)
    }

    pub fn dismiss(&self) -> bool {
        self.decide(ConflictDecision::Dismissed)
    }

    /// Returns false when no prompt is awaiting a decision.
    fn decide(&self, decision: ConflictDecision) -> bool {
        let mut inner = self.lock();
        let Some(reply) = inner.reply.take() else {
            return false;
        };
        if let Some(prompt) = &inner.prompt {
            tracing::info!(uri = %prompt.uri, ?decision, "conflict resolved");
        }
        self.phase.send_replace(decision.phase());
        // The waiting side may be gone already; its drop resets the phase.
        let _ = reply.send(decision);
        true
    }

    fn reset(&self) {
        let mut inner = self.lock();
        inner.prompt = None;
        inner.reply = None;
        self.phase.send_replace(ResolutionPhase::Idle);
    }
}

/// The save side's handle on an open prompt. Dropping it closes the prompt.
pub struct PendingResolution {
    rx: oneshot::Receiver<ConflictDecision>,
    resolver: ConflictResolver,
}

impl PendingResolution {
    /// Resolves once a decision is made. A prompt that goes away without one
    /// counts as `Dismissed`.
    pub async fn wait(mut self) -> ConflictDecision {
        (&mut self.rx).await.unwrap_or(ConflictDecision::Dismissed)
    }
}

impl Drop for PendingResolution {
    fn drop(&mut self) {
        self.resolver.reset();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/conflict.rs"]
mod tests;
