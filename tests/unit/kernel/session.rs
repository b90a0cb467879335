use super::*;
use crate::error::{Facet, WorkspaceError};
use crate::kernel::fixtures::{CallLog, StubExtension};
use crate::kernel::navigator_tree::{NodeSpec, SectionSpec};
use crate::kernel::services::adapters::{CatalogLocalization, JsonTabStore, StaticAuthorization};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

fn pages(log: &CallLog) -> StubExtension {
    StubExtension::new("pages")
        .with_section(
            SectionSpec::new("site", "Site")
                .with_node(NodeSpec::document("page", "home", "Home"))
                .with_node(NodeSpec::document("page", "about", "About")),
        )
        .handling("navigator-selected")
        .with_log(Rc::clone(log))
}

fn registry(extensions: Vec<StubExtension>) -> ExtensionRegistry {
    let mut builder = ExtensionRegistry::builder();
    for ext in extensions {
        builder.register(ext).unwrap();
    }
    builder.build()
}

fn bootstrap(
    registry: ExtensionRegistry,
    tab_store: Option<Box<dyn TabStore>>,
) -> Result<WorkspaceSession> {
    let localization = CatalogLocalization::new();
    let authorization = StaticAuthorization::new(["workspace.edit"]);
    let ports = SessionPorts {
        localization: &localization,
        authorization: &authorization,
    };
    WorkspaceSession::bootstrap(
        registry,
        ports,
        tab_store,
        &WorkspaceSettings::default(),
        SessionParams::for_user("ann"),
    )
}

#[test]
fn test_bootstrap_wires_navigator_to_handlers() {
    let log: CallLog = Rc::new(RefCell::new(Vec::new()));
    let mut session = bootstrap(registry(vec![pages(&log)]), None).unwrap();

    assert_eq!(session.user(), "ann");
    assert!(session.state().extension("pages").is_some());
    assert!(session.navigator().tree().contains("pages:page:home"));
    assert!(log.borrow().is_empty());

    assert!(session.navigator_mut().open_key("pages:page:about"));
    let report = session.pump();
    assert_eq!(report.delivered, 1);
    assert_eq!(*log.borrow(), vec!["pages handled pages:navigator-selected"]);
}

#[test]
fn test_dispatch_miss_is_counted() {
    let log: CallLog = Rc::new(RefCell::new(Vec::new()));
    let mut session = bootstrap(registry(vec![pages(&log)]), None).unwrap();

    let report = session.dispatch(Command::new("pages:unknown-verb", json!({})));
    assert_eq!(report.misses, 1);
    assert_eq!(report.delivered, 0);
    assert!(log.borrow().is_empty());
}

#[test]
fn test_tabs_restore_and_persist() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonTabStore::new(dir.path());
    store
        .save_tabs(
            "ann",
            &["pages:page:about".to_string(), "pages:page:removed".to_string()],
        )
        .unwrap();

    let log: CallLog = Rc::new(RefCell::new(Vec::new()));
    let mut session = bootstrap(
        registry(vec![pages(&log)]),
        Some(Box::new(store.clone())),
    )
    .unwrap();

    assert_eq!(session.navigator().open_tabs(), ["pages:page:about"]);
    assert_eq!(log.borrow().len(), 1);

    session.navigator_mut().open_key("pages:page:home");
    session.persist_tabs().unwrap();
    assert_eq!(
        store.load_tabs("ann").unwrap(),
        vec!["pages:page:about", "pages:page:home"]
    );
}

#[test]
fn test_persist_without_store_is_a_no_op() {
    let log: CallLog = Rc::new(RefCell::new(Vec::new()));
    let mut session = bootstrap(registry(vec![pages(&log)]), None).unwrap();
    session.navigator_mut().open_key("pages:page:home");
    assert!(session.persist_tabs().is_ok());
}

#[test]
fn test_bootstrap_fails_on_facet_error() {
    let log: CallLog = Rc::new(RefCell::new(Vec::new()));
    let failing = pages(&log).failing(Facet::CustomData);
    let err = bootstrap(registry(vec![failing]), None).err().unwrap();
    assert!(matches!(
        err,
        WorkspaceError::Assembly {
            facet: Facet::CustomData,
            ..
        }
    ));
}
