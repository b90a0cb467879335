use crate::kernel::services::ports::settings::WorkspaceSettings;
use std::path::{Path, PathBuf};

const SETTINGS_DIR: &str = ".workdesk";
const SETTINGS_FILE: &str = "setting.json";

/// `.workdesk/setting.json` under the user cache directory.
pub fn get_settings_path() -> Option<PathBuf> {
    get_cache_dir().map(|dir| dir.join(SETTINGS_DIR).join(SETTINGS_FILE))
}

pub fn ensure_settings_file() -> std::io::Result<PathBuf> {
    let path = get_settings_path().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Cannot determine settings directory",
        )
    })?;
    ensure_settings_file_at(&path)?;
    Ok(path)
}

/// Writes the default settings to `path` unless a file is already there.
pub fn ensure_settings_file_at(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    if !path.exists() {
        let content = serde_json::to_string_pretty(&WorkspaceSettings::default())
            .unwrap_or_else(|_| "{}".to_string());
        std::fs::write(path, content)?;
    }
    Ok(())
}

/// `None` when the file is missing or unreadable; callers fall back to
/// `WorkspaceSettings::default()`.
pub fn load_settings() -> Option<WorkspaceSettings> {
    let path = get_settings_path()?;
    load_settings_from(&path)
}

pub fn load_settings_from(path: &Path) -> Option<WorkspaceSettings> {
    let data = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&data) {
        Ok(settings) => Some(settings),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "invalid settings file ignored");
            None
        }
    }
}

/// Per-OS user cache root, or `None` when the environment names none.
fn get_cache_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        return std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join("Library/Caches"));
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
            return Some(PathBuf::from(xdg));
        }
        return std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".cache"));
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(local) = std::env::var("LOCALAPPDATA") {
            return Some(PathBuf::from(local));
        }
        return std::env::var("APPDATA").ok().map(PathBuf::from);
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        None
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/settings.rs"]
mod tests;
