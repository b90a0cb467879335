//! Sample session: a blog and a pages extension, a few navigator gestures and
//! one stale save.

use std::collections::BTreeSet;

use serde_json::{json, Map, Value};

use workdesk::core::{Command, DocumentUri};
use workdesk::error::{FacetResult, Result};
use workdesk::kernel::conflict::{ConflictResolver, ResolutionPhase};
use workdesk::kernel::extensions::{Extension, ExtensionRegistry, NewDocumentDefaults, SettingsForm};
use workdesk::kernel::navigator::DropPosition;
use workdesk::kernel::navigator_tree::{NamespaceScope, NodeSpec, SectionSpec};
use workdesk::kernel::save::{save_document, SaveOutcome};
use workdesk::kernel::services::adapters::{
    CatalogLocalization, JsonTabStore, MemoryRepository, StaticAuthorization,
};
use workdesk::kernel::services::bus::{CommandSender, NamespaceRoutes};
use workdesk::kernel::services::ports::{DocumentSnapshot, TabStore, WorkspaceSettings};
use workdesk::kernel::session::{SessionPorts, WorkspaceSession};
use workdesk::kernel::workspace_state::SessionParams;

const CATALOG: &str = r#"{
    "workspace.bootstrapFailed": "The workspace could not be loaded.",
    "workspace.conflict.title": "Document changed",
    "workspace.conflict.message": "Someone else saved this document after you opened it.",
    "workspace.conflict.reload": "Reload",
    "workspace.conflict.saveOverwrite": "Save anyway",
    "workspace.navigator.empty": "Nothing here yet",
    "blog.posts": "Posts",
    "blog.newPost": "New post",
    "pages.site": "Site",
    "pages.newPage": "New page"
}"#;

struct BlogExtension;

impl Extension for BlogExtension {
    fn namespace(&self) -> &str {
        "blog"
    }

    fn navigator_sections(
        &self,
        _scope: &NamespaceScope,
        document_type_filter: Option<&str>,
    ) -> FacetResult<Vec<SectionSpec>> {
        if document_type_filter.is_some_and(|ty| ty != "post") {
            return Ok(Vec::new());
        }
        let posts = NodeSpec::new("posts", "Posts").with_children([
            NodeSpec::document("post", "hello-world", "Hello world"),
            NodeSpec::document("post", "release-notes", "Release notes")
                .with_data("draft", Value::Bool(true)),
        ]);
        Ok(vec![SectionSpec::new("content", "Content").with_node(posts)])
    }

    fn new_document_defaults(&self) -> FacetResult<Vec<NewDocumentDefaults>> {
        Ok(vec![NewDocumentDefaults {
            document_type: "post".to_string(),
            label: "blog.newPost".to_string(),
            defaults: json!({ "title": "", "body": "", "draft": true }),
        }])
    }

    fn inspector_schema(&self) -> FacetResult<Value> {
        Ok(json!({
            "post": {
                "fields": [
                    { "name": "title", "type": "text" },
                    { "name": "draft", "type": "toggle" }
                ]
            }
        }))
    }

    fn custom_data(&self) -> FacetResult<Map<String, Value>> {
        let mut data = Map::new();
        data.insert("postsPerPage".to_string(), json!(10));
        Ok(data)
    }

    fn settings_forms(&self) -> FacetResult<Vec<SettingsForm>> {
        Ok(vec![SettingsForm {
            id: "feed".to_string(),
            label: "Feed".to_string(),
            fields: json!([{ "name": "postsPerPage", "type": "number" }]),
        }])
    }

    fn localized_string_keys(&self) -> BTreeSet<String> {
        ["blog.posts", "blog.newPost"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn subscribe(&self, routes: &mut NamespaceRoutes<'_>) -> Result<()> {
        routes.on("navigator-selected", |cmd: &Command, _: &CommandSender| {
            tracing::info!(key = %cmd.payload["uniqueKey"], "blog: open post");
        })?;
        routes.on("delete-post", |cmd: &Command, _: &CommandSender| {
            tracing::info!(payload = %cmd.payload, "blog: delete post");
        })?;
        routes.on("node-moved", |cmd: &Command, _: &CommandSender| {
            tracing::info!(payload = %cmd.payload, "blog: move rejected, posts are ordered by date");
        })?;
        Ok(())
    }
}

struct PagesExtension;

impl Extension for PagesExtension {
    fn namespace(&self) -> &str {
        "pages"
    }

    fn navigator_sections(
        &self,
        _scope: &NamespaceScope,
        document_type_filter: Option<&str>,
    ) -> FacetResult<Vec<SectionSpec>> {
        if document_type_filter.is_some_and(|ty| ty != "page") {
            return Ok(Vec::new());
        }
        let site = SectionSpec::new("site", "Site")
            .with_node(
                NodeSpec::document("page", "home", "Home")
                    .with_child(NodeSpec::document("page", "about", "About")),
            )
            .with_node(NodeSpec::document("page", "contact", "Contact"));
        Ok(vec![site])
    }

    fn new_document_defaults(&self) -> FacetResult<Vec<NewDocumentDefaults>> {
        Ok(vec![NewDocumentDefaults {
            document_type: "page".to_string(),
            label: "pages.newPage".to_string(),
            defaults: json!({ "title": "", "blocks": [] }),
        }])
    }

    fn inspector_schema(&self) -> FacetResult<Value> {
        Ok(json!({ "page": { "fields": [{ "name": "slug", "type": "text" }] } }))
    }

    fn custom_data(&self) -> FacetResult<Map<String, Value>> {
        Ok(Map::new())
    }

    fn localized_string_keys(&self) -> BTreeSet<String> {
        ["pages.site", "pages.newPage"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn subscribe(&self, routes: &mut NamespaceRoutes<'_>) -> Result<()> {
        routes.on("navigator-selected", |cmd: &Command, _: &CommandSender| {
            tracing::info!(key = %cmd.payload["uniqueKey"], "pages: open page");
        })?;
        routes.on("delete-post", |_: &Command, _: &CommandSender| {
            tracing::warn!("pages: delete-post reached the wrong extension");
        })?;
        routes.on("node-moved", |cmd: &Command, _: &CommandSender| {
            tracing::info!(payload = %cmd.payload, "pages: page moved");
        })?;
        Ok(())
    }
}

pub fn catalog() -> CatalogLocalization {
    CatalogLocalization::from_json(CATALOG).unwrap_or_default()
}

fn registry() -> Result<ExtensionRegistry> {
    let mut builder = ExtensionRegistry::builder();
    builder.register(BlogExtension)?;
    builder.register(PagesExtension)?;
    Ok(builder.build())
}

fn tab_store(settings: &WorkspaceSettings) -> Option<Box<dyn TabStore>> {
    let store = match &settings.tabs_dir {
        Some(dir) => JsonTabStore::new(dir),
        None => JsonTabStore::default_location()?,
    };
    Some(Box::new(store))
}

pub fn run(settings: &WorkspaceSettings, overwrite: bool) -> Result<()> {
    let localization = catalog();
    let authorization = StaticAuthorization::new(["workspace.edit", "workspace.settings"]);
    let user = std::env::var("USER").unwrap_or_else(|_| "demo".to_string());

    let mut session = WorkspaceSession::bootstrap(
        registry()?,
        SessionPorts {
            localization: &localization,
            authorization: &authorization,
        },
        tab_store(settings),
        settings,
        SessionParams::for_user(user),
    )?;

    println!("{}", serde_json::to_string_pretty(session.state())?);

    let post = DocumentUri::new("blog", "post", "hello-world")?;
    let navigator = session.navigator_mut();
    navigator.open_document(&post);
    navigator.reveal("pages:page:about");
    navigator.on_node_drop(
        &["pages:page:contact".to_string()],
        "pages:page:home",
        DropPosition::Into,
    );
    let report = session.pump();
    tracing::info!(?report, "navigator gestures delivered");

    let report = session.dispatch(Command::new("blog:delete-post", json!({ "key": "release-notes" })));
    tracing::info!(?report, "delete-post dispatched");

    for row in session.navigator().rows() {
        println!("{}{}", "  ".repeat(usize::from(row.depth)), row.label);
    }

    if let Err(e) = session.persist_tabs() {
        tracing::warn!(error = %e, "open tabs not saved");
    }

    stale_save(&post, overwrite)
}

/// Loads a post, lets another writer change it, then saves the local copy.
fn stale_save(uri: &DocumentUri, overwrite: bool) -> Result<()> {
    let rt = tokio::runtime::Builder::new_current_thread().build()?;
    let repo = MemoryRepository::new();
    let loaded = repo.insert(uri.clone(), json!({ "title": "Hello world" }));
    repo.write_remote(uri, json!({ "title": "Hello, world" }))?;

    let resolver = ConflictResolver::new();
    let prompt_side = resolver.clone();
    let mut phases = resolver.watch_phase();
    let edited = DocumentSnapshot::new(loaded.revision, json!({ "title": "Hello there" }));

    let outcome = rt.block_on(async {
        tokio::spawn(async move {
            if phases
                .wait_for(|p| *p == ResolutionPhase::AwaitingDecision)
                .await
                .is_ok()
            {
                if overwrite {
                    prompt_side.choose_save_overwrite();
                } else {
                    prompt_side.choose_reload();
                }
            }
        });
        save_document(&repo, &resolver, uri, &edited).await
    })?;

    match outcome {
        SaveOutcome::Saved { revision } => println!("saved {uri} at revision {revision}"),
        SaveOutcome::Reloaded(fresh) => {
            println!("reloaded {uri}: {}", fresh.content)
        }
        SaveOutcome::Abandoned => println!("save of {uri} abandoned"),
    }
    Ok(())
}
