// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Evomap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::ops::{apply_ops, ApplyError, Delta, Op};

use super::component::Component;
use super::diagram::Diagram;
use super::ids::{ComponentId, DiagramId, IdAllocator};

/// The collection of saved maps plus the currently active one.
///
/// Every method that changes the collection bumps [`Session::rev`], which the workspace compares
/// against the last persisted revision. Timestamps are passed in by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    diagrams: Vec<Diagram>,
    active_diagram_id: Option<DiagramId>,
    map_ids: IdAllocator,
    node_ids: IdAllocator,
    rev: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            diagrams: Vec::new(),
            active_diagram_id: None,
            map_ids: IdAllocator::new("map"),
            node_ids: IdAllocator::new("node"),
            rev: 0,
        }
    }

    /// Wraps an already-loaded collection. Nothing is active yet.
    pub fn from_diagrams(diagrams: Vec<Diagram>) -> Self {
        Self {
            diagrams,
            ..Self::new()
        }
    }

    pub fn diagrams(&self) -> &[Diagram] {
        &self.diagrams
    }

    pub fn is_empty(&self) -> bool {
        self.diagrams.is_empty()
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn diagram(&self, id: &DiagramId) -> Option<&Diagram> {
        self.diagrams.iter().find(|diagram| diagram.id() == id)
    }

    fn diagram_mut(&mut self, id: &DiagramId) -> Option<&mut Diagram> {
        self.diagrams.iter_mut().find(|diagram| diagram.id() == id)
    }

    pub fn active_diagram_id(&self) -> Option<&DiagramId> {
        self.active_diagram_id.as_ref()
    }

    pub fn active_diagram(&self) -> Option<&Diagram> {
        self.active_diagram_id
            .as_ref()
            .and_then(|id| self.diagram(id))
    }

    /// The most recently modified map. Ties go to the one created later.
    pub fn most_recent(&self) -> Option<&Diagram> {
        self.diagrams
            .iter()
            .max_by_key(|diagram| diagram.last_modified())
    }

    /// All maps, most recently modified first.
    pub fn by_recency(&self) -> Vec<&Diagram> {
        let mut out = self.diagrams.iter().rev().collect::<Vec<_>>();
        out.sort_by(|a, b| b.last_modified().cmp(&a.last_modified()));
        out
    }

    fn bump(&mut self) {
        self.rev = self.rev.wrapping_add(1);
    }

    fn allocate_diagram_id(&mut self, now: u64) -> DiagramId {
        let diagrams = &self.diagrams;
        self.map_ids
            .allocate(now, |candidate| diagrams.iter().any(|d| d.id().as_str() == candidate))
    }

    /// A component id unused by any map in the collection.
    pub fn next_component_id(&mut self, now: u64) -> ComponentId {
        let diagrams = &self.diagrams;
        self.node_ids.allocate(now, |candidate| {
            diagrams.iter().any(|d| d.contains_component(candidate))
        })
    }

    pub fn create(
        &mut self,
        name: impl Into<String>,
        components: Vec<Component>,
        make_active: bool,
        now: u64,
    ) -> DiagramId {
        let id = self.allocate_diagram_id(now);
        self.diagrams
            .push(Diagram::new(id.clone(), name, components, now));
        if make_active {
            self.active_diagram_id = Some(id.clone());
        }
        self.bump();
        id
    }

    /// Duplicates `source` and makes the copy active. `None` if the source does not exist.
    pub fn copy(&mut self, source: &DiagramId, now: u64) -> Option<DiagramId> {
        self.diagram(source)?;
        let id = self.allocate_diagram_id(now);
        let copy = self.diagram(source)?.duplicate(id.clone(), now);
        self.diagrams.push(copy);
        self.active_diagram_id = Some(id.clone());
        self.bump();
        Some(id)
    }

    /// Removes a map. Deleting the active map activates the most recent remaining one.
    pub fn delete(&mut self, id: &DiagramId) -> bool {
        let before = self.diagrams.len();
        self.diagrams.retain(|diagram| diagram.id() != id);
        if self.diagrams.len() == before {
            return false;
        }
        if self.active_diagram_id.as_ref() == Some(id) {
            self.active_diagram_id = self.most_recent().map(|diagram| diagram.id().clone());
        }
        self.bump();
        true
    }

    pub fn rename(&mut self, id: &DiagramId, name: &str, now: u64) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.update(id, now, |diagram| diagram.set_name(name))
    }

    pub fn set_user_need_title(&mut self, id: &DiagramId, title: &str, now: u64) -> bool {
        let title = title.trim();
        if title.is_empty() {
            return false;
        }
        self.update(id, now, |diagram| diagram.set_user_need_title(title))
    }

    /// Unlike the title, an empty description is accepted.
    pub fn set_user_need_description(&mut self, id: &DiagramId, text: &str, now: u64) -> bool {
        let text = text.trim();
        self.update(id, now, |diagram| diagram.set_user_need_description(text))
    }

    fn update(&mut self, id: &DiagramId, now: u64, f: impl FnOnce(&mut Diagram)) -> bool {
        let Some(diagram) = self.diagram_mut(id) else {
            return false;
        };
        f(diagram);
        diagram.touch(now);
        self.bump();
        true
    }

    pub fn select(&mut self, id: &DiagramId) -> bool {
        if self.diagram(id).is_none() {
            return false;
        }
        self.active_diagram_id = Some(id.clone());
        true
    }

    pub fn clear_active(&mut self) {
        self.active_diagram_id = None;
    }

    /// Runs `f` against the active map and refreshes its modification time, whatever `f` did.
    pub fn mutate_active<R>(&mut self, now: u64, f: impl FnOnce(&mut Diagram) -> R) -> Option<R> {
        let id = self.active_diagram_id.clone()?;
        let diagram = self.diagram_mut(&id)?;
        let out = f(diagram);
        diagram.touch(now);
        self.bump();
        Some(out)
    }

    /// Applies a mutation to the active map. Rejected ops leave the map and its timestamp alone.
    pub fn apply_to_active(&mut self, op: &Op, now: u64) -> Option<Result<Delta, ApplyError>> {
        let id = self.active_diagram_id.clone()?;
        let diagram = self.diagram_mut(&id)?;
        let result = apply_ops(diagram, std::slice::from_ref(op));
        if result.is_ok() {
            diagram.touch(now);
            self.bump();
        }
        Some(result)
    }
}
