use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::DocumentUri;
use crate::error::Result;

/// Document content as loaded, tagged with the revision the save path uses to
/// detect stale copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub revision: u64,
    pub content: Value,
}

impl DocumentSnapshot {
    pub fn new(revision: u64, content: Value) -> Self {
        Self { revision, content }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveReport {
    /// The stored document changed since `snapshot.revision` was loaded and
    /// nothing was written.
    pub stale: bool,
    /// Revision after the save, or the current remote revision when stale.
    pub revision: u64,
}

/// Per-document persistence owned by whichever extension defines the document
/// type. Calls run to completion once issued; there is no cancellation.
#[allow(async_fn_in_trait)]
pub trait DocumentRepository {
    async fn load(&self, uri: &DocumentUri) -> Result<DocumentSnapshot>;

    /// With `force` the write happens even if the copy is stale.
    async fn save(
        &self,
        uri: &DocumentUri,
        snapshot: &DocumentSnapshot,
        force: bool,
    ) -> Result<SaveReport>;
}
