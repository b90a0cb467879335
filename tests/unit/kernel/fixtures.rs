//! Shared test extension used by the kernel unit tests.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use serde_json::{json, Map, Value};

use crate::core::Command;
use crate::error::{Facet, FacetError, FacetResult, Result};
use crate::kernel::extensions::{Extension, NewDocumentDefaults, SettingsForm};
use crate::kernel::navigator_tree::{NamespaceScope, NodeSpec, SectionSpec, DOCUMENT_TYPE_ATTR};
use crate::kernel::services::bus::{CommandSender, NamespaceRoutes};

pub(crate) type CallLog = Rc<RefCell<Vec<String>>>;

pub(crate) struct StubExtension {
    pub namespace: String,
    pub sections: Vec<SectionSpec>,
    pub fail_on: Option<Facet>,
    pub strings: BTreeSet<String>,
    pub verbs: Vec<String>,
    pub log: CallLog,
}

impl StubExtension {
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            sections: Vec::new(),
            fail_on: None,
            strings: BTreeSet::new(),
            verbs: Vec::new(),
            log: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn with_section(mut self, section: SectionSpec) -> Self {
        self.sections.push(section);
        self
    }

    /// One section holding a single plain node.
    pub fn with_node(self, local_key: &str, label: &str) -> Self {
        let section = SectionSpec::new("main", "Main").with_node(NodeSpec::new(local_key, label));
        self.with_section(section)
    }

    pub fn failing(mut self, facet: Facet) -> Self {
        self.fail_on = Some(facet);
        self
    }

    pub fn with_strings(mut self, keys: &[&str]) -> Self {
        self.strings = keys.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn handling(mut self, verb: &str) -> Self {
        self.verbs.push(verb.to_string());
        self
    }

    pub fn with_log(mut self, log: CallLog) -> Self {
        self.log = log;
        self
    }

    fn check(&self, facet: Facet) -> FacetResult<()> {
        if self.fail_on == Some(facet) {
            return Err(FacetError::new(format!("{facet} unavailable")));
        }
        Ok(())
    }
}

fn keep_document_type(node: &NodeSpec, filter: &str) -> Option<NodeSpec> {
    let matches = node
        .user_data
        .get(DOCUMENT_TYPE_ATTR)
        .and_then(Value::as_str)
        .map_or(true, |ty| ty == filter);
    if !matches {
        return None;
    }
    let mut kept = node.clone();
    kept.children = node
        .children
        .iter()
        .filter_map(|c| keep_document_type(c, filter))
        .collect();
    Some(kept)
}

impl Extension for StubExtension {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn navigator_sections(
        &self,
        _scope: &NamespaceScope,
        document_type_filter: Option<&str>,
    ) -> FacetResult<Vec<SectionSpec>> {
        self.check(Facet::NavigatorSections)?;
        let Some(filter) = document_type_filter else {
            return Ok(self.sections.clone());
        };
        Ok(self
            .sections
            .iter()
            .map(|s| SectionSpec {
                nodes: s
                    .nodes
                    .iter()
                    .filter_map(|n| keep_document_type(n, filter))
                    .collect(),
                ..s.clone()
            })
            .collect())
    }

    fn new_document_defaults(&self) -> FacetResult<Vec<NewDocumentDefaults>> {
        self.check(Facet::NewDocumentDefaults)?;
        Ok(vec![NewDocumentDefaults {
            document_type: "doc".to_string(),
            label: format!("New {} document", self.namespace),
            defaults: json!({ "title": "" }),
        }])
    }

    fn inspector_schema(&self) -> FacetResult<Value> {
        self.check(Facet::InspectorSchema)?;
        Ok(json!({ "doc": { "fields": ["title"] } }))
    }

    fn custom_data(&self) -> FacetResult<Map<String, Value>> {
        self.check(Facet::CustomData)?;
        let mut data = Map::new();
        data.insert("owner".to_string(), Value::String(self.namespace.clone()));
        Ok(data)
    }

    fn settings_forms(&self) -> FacetResult<Vec<SettingsForm>> {
        self.check(Facet::SettingsForms)?;
        Ok(vec![SettingsForm {
            id: "general".to_string(),
            label: "General".to_string(),
            fields: json!([]),
        }])
    }

    fn localized_string_keys(&self) -> BTreeSet<String> {
        self.strings.clone()
    }

    fn subscribe(&self, routes: &mut NamespaceRoutes<'_>) -> Result<()> {
        for verb in &self.verbs {
            let log = Rc::clone(&self.log);
            let tag = self.namespace.clone();
            routes.on(verb, move |cmd: &Command, _: &CommandSender| {
                log.borrow_mut().push(format!("{tag} handled {}", cmd.name()));
            })?;
        }
        Ok(())
    }
}
