use super::*;
use tempfile::tempdir;

#[test]
fn test_unknown_user_has_no_tabs() {
    let dir = tempdir().unwrap();
    let store = JsonTabStore::new(dir.path().join("tabs"));
    assert!(store.load_tabs("ann").unwrap().is_empty());
}

#[test]
fn test_save_then_load_keeps_order() {
    let dir = tempdir().unwrap();
    let store = JsonTabStore::new(dir.path().join("tabs"));
    let tabs = vec![
        "pages:page:home".to_string(),
        "blog:post:2".to_string(),
        "blog:post:1".to_string(),
    ];

    store.save_tabs("ann", &tabs).unwrap();
    assert_eq!(store.load_tabs("ann").unwrap(), tabs);
    assert!(store.load_tabs("bob").unwrap().is_empty());
}

#[test]
fn test_corrupt_file_is_an_error() {
    let dir = tempdir().unwrap();
    let store = JsonTabStore::new(dir.path());
    std::fs::write(store.path_for("ann"), "{ not json").unwrap();
    assert!(matches!(
        store.load_tabs("ann"),
        Err(crate::error::WorkspaceError::Serde(_))
    ));
}
