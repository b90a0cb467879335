//! Guarded save: write, detect a stale copy, ask, then reload or overwrite.

use crate::core::DocumentUri;
use crate::error::Result;
use crate::kernel::conflict::{ConflictDecision, ConflictPrompt, ConflictResolver};
use crate::kernel::services::ports::{DocumentRepository, DocumentSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Saved { revision: u64 },
    /// The user chose the remote copy; local edits are discarded.
    Reloaded(DocumentSnapshot),
    /// The prompt was dismissed. Nothing was written.
    Abandoned,
}

pub async fn save_document<R: DocumentRepository>(
    repo: &R,
    resolver: &ConflictResolver,
    uri: &DocumentUri,
    snapshot: &DocumentSnapshot,
) -> Result<SaveOutcome> {
    let report = repo.save(uri, snapshot, false).await?;
    if !report.stale {
        tracing::debug!(uri = %uri, revision = report.revision, "document saved");
        return Ok(SaveOutcome::Saved {
            revision: report.revision,
        });
    }

    tracing::info!(
        uri = %uri,
        local = snapshot.revision,
        remote = report.revision,
        "stale save detected"
    );
    let pending = resolver.request_resolution(ConflictPrompt::for_document(uri.clone()))?;

    match pending.wait().await {
        ConflictDecision::Reload => {
            let fresh = repo.load(uri).await?;
            Ok(SaveOutcome::Reloaded(fresh))
        }
        ConflictDecision::SaveOverwrite => {
            let report = repo.save(uri, snapshot, true).await?;
            Ok(SaveOutcome::Saved {
                revision: report.revision,
            })
        }
        ConflictDecision::Dismissed => Ok(SaveOutcome::Abandoned),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/save.rs"]
mod tests;
