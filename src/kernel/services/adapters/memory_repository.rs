//! In-process document store with revision-based staleness. Backs the demo
//! binary and the save-flow tests; real document types bring their own
//! repository.

use std::cell::RefCell;

use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::core::DocumentUri;
use crate::error::{Result, WorkspaceError};
use crate::kernel::services::ports::{DocumentRepository, DocumentSnapshot, SaveReport};

#[derive(Debug, Default)]
pub struct MemoryRepository {
    documents: RefCell<FxHashMap<DocumentUri, DocumentSnapshot>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `content` as revision 1, replacing anything present.
    pub fn insert(&self, uri: DocumentUri, content: Value) -> DocumentSnapshot {
        let snapshot = DocumentSnapshot::new(1, content);
        self.documents.borrow_mut().insert(uri, snapshot.clone());
        snapshot
    }

    /// A write from some other session: bumps the revision so copies loaded
    /// earlier become stale.
    pub fn write_remote(&self, uri: &DocumentUri, content: Value) -> Result<u64> {
        let mut documents = self.documents.borrow_mut();
        let stored = documents
            .get_mut(uri)
            .ok_or_else(|| WorkspaceError::Repository(format!("no document at {uri}")))?;
        stored.revision += 1;
        stored.content = content;
        Ok(stored.revision)
    }

    pub fn current(&self, uri: &DocumentUri) -> Option<DocumentSnapshot> {
        self.documents.borrow().get(uri).cloned()
    }
}

impl DocumentRepository for MemoryRepository {
    async fn load(&self, uri: &DocumentUri) -> Result<DocumentSnapshot> {
        self.current(uri)
            .ok_or_else(|| WorkspaceError::Repository(format!("no document at {uri}")))
    }

    async fn save(
        &self,
        uri: &DocumentUri,
        snapshot: &DocumentSnapshot,
        force: bool,
    ) -> Result<SaveReport> {
        let mut documents = self.documents.borrow_mut();
        let stored = documents
            .get_mut(uri)
            .ok_or_else(|| WorkspaceError::Repository(format!("no document at {uri}")))?;

        if stored.revision != snapshot.revision && !force {
            return Ok(SaveReport {
                stale: true,
                revision: stored.revision,
            });
        }

        stored.revision += 1;
        stored.content = snapshot.content.clone();
        Ok(SaveReport {
            stale: false,
            revision: stored.revision,
        })
    }
}
