use super::*;
use crate::core::Command;
use crate::kernel::fixtures::StubExtension;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn test_registration_order_is_kept() {
    let mut builder = ExtensionRegistry::builder();
    for ns in ["pages", "blog", "assets", "forms"] {
        builder.register(StubExtension::new(ns)).unwrap();
    }
    let registry = builder.build();

    assert_eq!(registry.len(), 4);
    assert_eq!(registry.namespaces(), vec!["pages", "blog", "assets", "forms"]);
    let listed: Vec<_> = registry.list_extensions().map(|e| e.namespace()).collect();
    assert_eq!(listed, vec!["pages", "blog", "assets", "forms"]);
}

#[test]
fn test_duplicate_namespace_fails_at_registration() {
    let mut builder = ExtensionRegistry::builder();
    builder.register(StubExtension::new("blog")).unwrap();
    let err = builder.register(StubExtension::new("blog")).err().unwrap();
    assert!(matches!(err, WorkspaceError::NamespaceConflict { ref namespace } if namespace == "blog"));

    let registry = builder.build();
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_malformed_namespace_is_rejected() {
    let mut builder = ExtensionRegistry::builder();
    for bad in ["", "blog:posts", "my blog", "blog\t", "\nblog"] {
        assert!(matches!(
            builder.register(StubExtension::new(bad)),
            Err(WorkspaceError::Validation(_))
        ));
    }
    assert!(builder.build().is_empty());
}

#[test]
fn test_get_extension() {
    let mut builder = ExtensionRegistry::builder();
    builder
        .register(StubExtension::new("blog"))
        .unwrap()
        .register(StubExtension::new("pages"))
        .unwrap();
    let registry = builder.build();

    assert_eq!(registry.get_extension("pages").unwrap().namespace(), "pages");
    assert!(registry.contains("blog"));
    assert!(matches!(
        registry.get_extension("shop"),
        Err(WorkspaceError::NotFound { .. })
    ));
}

#[test]
fn test_bind_commands_scopes_handlers_to_namespace() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut builder = ExtensionRegistry::builder();
    builder
        .register(
            StubExtension::new("blog")
                .handling("delete-post")
                .with_log(Rc::clone(&log)),
        )
        .unwrap();
    builder
        .register(
            StubExtension::new("pages")
                .handling("delete-post")
                .with_log(Rc::clone(&log)),
        )
        .unwrap();
    let registry = builder.build();

    let mut bus = CommandBus::new();
    registry.bind_commands(&mut bus).unwrap();
    assert!(bus.has_route("blog:delete-post"));
    assert!(bus.has_route("pages:delete-post"));

    bus.dispatch(Command::new("blog:delete-post", json!({ "id": 9 })));
    assert_eq!(*log.borrow(), vec!["blog handled blog:delete-post"]);
}
