// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Evomap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use super::component::Component;
use super::ids::{ComponentId, DiagramId};

pub const DEFAULT_USER_NEED_TITLE: &str = "User Need";
pub const DEFAULT_USER_NEED_DESCRIPTION: &str = "Leverage mapped features within an application.";

/// A saved map: named, independently persisted, with user-need metadata and its components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagram {
    id: DiagramId,
    name: String,
    #[serde(default)]
    user_need_title: String,
    #[serde(default)]
    user_need_description: String,
    #[serde(default)]
    nodes: Vec<Component>,
    #[serde(default)]
    last_modified: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    copied_from_id: Option<DiagramId>,
}

impl Diagram {
    pub fn new(id: DiagramId, name: impl Into<String>, nodes: Vec<Component>, now: u64) -> Self {
        Self {
            id,
            name: name.into(),
            user_need_title: DEFAULT_USER_NEED_TITLE.to_owned(),
            user_need_description: DEFAULT_USER_NEED_DESCRIPTION.to_owned(),
            nodes,
            last_modified: now,
            copied_from_id: None,
        }
    }

    /// Deep copy under a new id that remembers where it came from.
    pub fn duplicate(&self, id: DiagramId, now: u64) -> Self {
        Self {
            id,
            name: format!("{} (Copy)", self.name),
            user_need_title: self.user_need_title.clone(),
            user_need_description: self.user_need_description.clone(),
            nodes: self.nodes.clone(),
            last_modified: now,
            copied_from_id: Some(self.id.clone()),
        }
    }

    pub fn id(&self) -> &DiagramId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn user_need_title(&self) -> &str {
        &self.user_need_title
    }

    pub fn set_user_need_title(&mut self, title: impl Into<String>) {
        self.user_need_title = title.into();
    }

    pub fn user_need_description(&self) -> &str {
        &self.user_need_description
    }

    pub fn set_user_need_description(&mut self, description: impl Into<String>) {
        self.user_need_description = description.into();
    }

    pub fn nodes(&self) -> &[Component] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut Vec<Component> {
        &mut self.nodes
    }

    pub fn component(&self, id: &ComponentId) -> Option<&Component> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    pub fn component_mut(&mut self, id: &ComponentId) -> Option<&mut Component> {
        self.nodes.iter_mut().find(|node| node.id() == id)
    }

    pub fn contains_component(&self, id: &str) -> bool {
        self.nodes.iter().any(|node| node.id().as_str() == id)
    }

    pub fn last_modified(&self) -> u64 {
        self.last_modified
    }

    pub fn touch(&mut self, now: u64) {
        self.last_modified = now;
    }

    pub fn copied_from_id(&self) -> Option<&DiagramId> {
        self.copied_from_id.as_ref()
    }

    /// Every edge as `(from, to)`, in node order then dependency order.
    pub fn edges(&self) -> impl Iterator<Item = (&ComponentId, &ComponentId)> + '_ {
        self.nodes
            .iter()
            .flat_map(|node| node.dependencies().iter().map(move |to| (node.id(), to)))
    }

    /// Fills missing or empty user-need fields with their defaults. Returns whether anything
    /// changed.
    pub fn backfill_user_need(&mut self) -> bool {
        let mut changed = false;
        if self.user_need_title.is_empty() {
            self.user_need_title = DEFAULT_USER_NEED_TITLE.to_owned();
            changed = true;
        }
        if self.user_need_description.is_empty() {
            self.user_need_description = DEFAULT_USER_NEED_DESCRIPTION.to_owned();
            changed = true;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::{Diagram, DEFAULT_USER_NEED_DESCRIPTION, DEFAULT_USER_NEED_TITLE};
    use crate::model::{Component, ComponentId, DiagramId};

    fn did(value: &str) -> DiagramId {
        DiagramId::new(value).expect("diagram id")
    }

    fn cid(value: &str) -> ComponentId {
        ComponentId::new(value).expect("component id")
    }

    #[test]
    fn new_diagram_carries_default_user_need() {
        let diagram = Diagram::new(did("map_1"), "Map", Vec::new(), 10);
        assert_eq!(diagram.user_need_title(), DEFAULT_USER_NEED_TITLE);
        assert_eq!(diagram.user_need_description(), DEFAULT_USER_NEED_DESCRIPTION);
        assert_eq!(diagram.last_modified(), 10);
        assert_eq!(diagram.copied_from_id(), None);
    }

    #[test]
    fn duplicate_is_deep_and_back_references_the_source() {
        let mut source = Diagram::new(
            did("map_1"),
            "Map",
            vec![Component::new(cid("a"), "A")],
            10,
        );
        let copy = source.duplicate(did("map_2"), 20);

        assert_eq!(copy.name(), "Map (Copy)");
        assert_eq!(copy.copied_from_id(), Some(&did("map_1")));
        assert_eq!(copy.nodes(), source.nodes());
        assert_eq!(copy.last_modified(), 20);

        source.component_mut(&cid("a")).expect("a").set_name("Changed");
        assert_eq!(copy.component(&cid("a")).expect("a").name(), "A");
    }

    #[test]
    fn backfill_replaces_missing_and_empty_fields() {
        let json = r#"{"id":"map_1","name":"Old","userNeedTitle":"","nodes":[],"lastModified":1}"#;
        let mut diagram: Diagram = serde_json::from_str(json).expect("parse");
        assert!(diagram.backfill_user_need());
        assert_eq!(diagram.user_need_title(), DEFAULT_USER_NEED_TITLE);
        assert_eq!(diagram.user_need_description(), DEFAULT_USER_NEED_DESCRIPTION);
        assert!(!diagram.backfill_user_need());
    }

    #[test]
    fn serializes_with_camel_case_keys_and_omits_absent_copy_source() {
        let diagram = Diagram::new(did("map_1"), "Map", Vec::new(), 5);
        let value = serde_json::to_value(&diagram).expect("serialize");
        assert_eq!(value["userNeedTitle"], DEFAULT_USER_NEED_TITLE);
        assert_eq!(value["lastModified"], 5);
        assert!(value.get("copiedFromId").is_none());
    }

    #[test]
    fn edges_follow_node_then_dependency_order() {
        let mut a = Component::new(cid("a"), "A");
        a.add_dependency(cid("c"));
        a.add_dependency(cid("b"));
        let mut b = Component::new(cid("b"), "B");
        b.add_dependency(cid("c"));
        let c = Component::new(cid("c"), "C");
        let diagram = Diagram::new(did("map_1"), "Map", vec![a, b, c], 0);

        let edges = diagram
            .edges()
            .map(|(from, to)| (from.as_str(), to.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(edges, vec![("a", "c"), ("a", "b"), ("b", "c")]);
    }
}
