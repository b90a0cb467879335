//! Open-tab persistence: one JSON array of strings per user.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::kernel::services::ports::TabStore;

use super::paths::{get_tabs_dir, user_file_stem};

#[derive(Debug, Clone)]
pub struct JsonTabStore {
    dir: PathBuf,
}

impl JsonTabStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store under the application data directory, if one can be determined.
    pub fn default_location() -> Option<Self> {
        get_tabs_dir().map(Self::new)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, user: &str) -> PathBuf {
        self.dir.join(format!("{}.json", user_file_stem(user)))
    }
}

impl TabStore for JsonTabStore {
    fn load_tabs(&self, user: &str) -> Result<Vec<String>> {
        let path = self.path_for(user);
        let data = match std::fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&data)?)
    }

    fn save_tabs(&self, user: &str, tabs: &[String]) -> Result<()> {
        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir)?;
        }
        let content = serde_json::to_string_pretty(tabs)?;
        std::fs::write(self.path_for(user), content)?;
        tracing::debug!(user = %user, tabs = tabs.len(), "open tabs saved");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/tab_store.rs"]
mod tests;
