use rustc_hash::FxHashSet;

use crate::kernel::services::ports::Authorization;

/// Fixed capability set, e.g. resolved once from a session token by the host.
#[derive(Debug, Clone, Default)]
pub struct StaticAuthorization {
    granted: FxHashSet<String>,
}

impl StaticAuthorization {
    pub fn new<I, S>(granted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            granted: granted.into_iter().map(Into::into).collect(),
        }
    }

    pub fn grant(&mut self, capability: impl Into<String>) {
        self.granted.insert(capability.into());
    }
}

impl Authorization for StaticAuthorization {
    fn user_has_capability(&self, name: &str) -> bool {
        self.granted.contains(name)
    }
}
