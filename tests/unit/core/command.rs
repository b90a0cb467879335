use super::*;
use serde_json::json;

#[test]
fn test_scoped_command_name() {
    let cmd = Command::scoped("editor", NAVIGATOR_SELECTED, json!({ "key": "editor:doc:1" }));
    assert_eq!(cmd.name(), "editor:navigator-selected");
    assert_eq!(cmd.namespace(), Some("editor"));
    assert_eq!(cmd.verb(), Some("navigator-selected"));
}

#[test]
fn test_route_splits_at_first_delimiter() {
    assert_eq!(
        split_qualified_name("blog:post:publish"),
        Some(("blog", "post:publish"))
    );
    assert_eq!(split_qualified_name("blog:"), None);
    assert_eq!(split_qualified_name(":delete"), None);
    assert_eq!(split_qualified_name("nodelimiter"), None);
}

#[test]
fn test_command_serde_shape() {
    let cmd = Command::new("pages:delete-post", json!({ "id": 3 }));
    let value = serde_json::to_value(&cmd).unwrap();
    assert_eq!(
        value,
        json!({ "qualifiedName": "pages:delete-post", "payload": { "id": 3 } })
    );

    let parsed: Command = serde_json::from_value(json!({ "qualifiedName": "x:y" })).unwrap();
    assert_eq!(parsed.payload, serde_json::Value::Null);
}
