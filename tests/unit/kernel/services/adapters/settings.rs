use super::*;
use tempfile::tempdir;

#[test]
fn test_ensure_settings_file_writes_defaults_once() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join(SETTINGS_FILE);

    ensure_settings_file_at(&path).unwrap();
    assert_eq!(load_settings_from(&path), Some(WorkspaceSettings::default()));

    std::fs::write(&path, r#"{ "capabilities": ["blog.publish"] }"#).unwrap();
    ensure_settings_file_at(&path).unwrap();
    let settings = load_settings_from(&path).unwrap();
    assert_eq!(settings.capabilities, vec!["blog.publish".to_string()]);
}

#[test]
fn test_load_settings_from_missing_or_invalid_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(SETTINGS_FILE);
    assert_eq!(load_settings_from(&path), None);

    std::fs::write(&path, "not json").unwrap();
    assert_eq!(load_settings_from(&path), None);
}

#[test]
fn test_settings_path_lives_under_app_dir() {
    if let Some(path) = get_settings_path() {
        assert!(path.ends_with(format!("{SETTINGS_DIR}/{SETTINGS_FILE}")));
    }
}
