use crate::error::Result;

/// User-scoped storage for the open-tab list. Entries are serialized
/// document URIs or navigator keys, in tab order.
pub trait TabStore {
    /// An unknown user has no tabs; that is not an error.
    fn load_tabs(&self, user: &str) -> Result<Vec<String>>;
    fn save_tabs(&self, user: &str, tabs: &[String]) -> Result<()>;
}
