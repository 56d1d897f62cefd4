// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Evomap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mutation operations for a single map.
//!
//! Ops are applied all-or-nothing against a working copy of the component list and produce a
//! coarse delta that the UI can use to refresh derived state. Missing ids are silent no-ops;
//! only a self-dependency or a duplicate component id is rejected.

pub mod draw;

use std::collections::BTreeSet;
use std::fmt;

use crate::model::{clamp_axis, Component, ComponentId, ComponentType, Diagram, NEW_COMPONENT_NAME};

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    AddComponent {
        component_id: ComponentId,
    },
    RemoveComponent {
        component_id: ComponentId,
    },
    UpdateComponent {
        component_id: ComponentId,
        patch: ComponentPatch,
    },
    /// `from` depends on `to`.
    AddDependency {
        from: ComponentId,
        to: ComponentId,
    },
    RemoveDependency {
        from: ComponentId,
        to: ComponentId,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentPatch {
    pub name: Option<String>,
    pub value: Option<f64>,
    pub evolution: Option<f64>,
    pub component_type: Option<ComponentType>,
}

impl ComponentPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn position(evolution: f64, value: f64) -> Self {
        Self {
            value: Some(value),
            evolution: Some(evolution),
            ..Self::default()
        }
    }

    pub fn component_type(component_type: ComponentType) -> Self {
        Self {
            component_type: Some(component_type),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.value.is_none()
            && self.evolution.is_none()
            && self.component_type.is_none()
    }
}

/// Which components changed as the result of applying ops.
///
/// Deliberately coarse: an edge change is reported as an update of its source component.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delta {
    pub added: Vec<ComponentId>,
    pub removed: Vec<ComponentId>,
    pub updated: Vec<ComponentId>,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }
}

#[derive(Debug, Default)]
struct DeltaBuilder {
    added: BTreeSet<ComponentId>,
    removed: BTreeSet<ComponentId>,
    updated: BTreeSet<ComponentId>,
}

impl DeltaBuilder {
    fn record_added(&mut self, id: ComponentId) {
        self.removed.remove(&id);
        self.updated.remove(&id);
        self.added.insert(id);
    }

    fn record_removed(&mut self, id: ComponentId) {
        let was_added = self.added.remove(&id);
        self.updated.remove(&id);
        if !was_added {
            self.removed.insert(id);
        }
    }

    fn record_updated(&mut self, id: ComponentId) {
        if self.added.contains(&id) || self.removed.contains(&id) {
            return;
        }
        self.updated.insert(id);
    }

    fn finish(self) -> Delta {
        Delta {
            added: self.added.into_iter().collect(),
            removed: self.removed.into_iter().collect(),
            updated: self.updated.into_iter().collect(),
        }
    }
}

/// Applies `ops` in order. On error the map is left untouched.
///
/// Does not refresh the map's modification time; the session does that for committed changes.
pub fn apply_ops(diagram: &mut Diagram, ops: &[Op]) -> Result<Delta, ApplyError> {
    if ops.is_empty() {
        return Ok(Delta::default());
    }

    let mut nodes = diagram.nodes().to_vec();
    let mut delta = DeltaBuilder::default();
    for op in ops {
        apply_one(&mut nodes, op, &mut delta)?;
    }

    *diagram.nodes_mut() = nodes;
    Ok(delta.finish())
}

pub fn apply_op(diagram: &mut Diagram, op: &Op) -> Result<Delta, ApplyError> {
    apply_ops(diagram, std::slice::from_ref(op))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    SelfDependency { component_id: ComponentId },
    DuplicateComponent { component_id: ComponentId },
}

impl fmt::Display for ApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfDependency { component_id } => {
                write!(f, "component cannot depend on itself (id={component_id})")
            }
            Self::DuplicateComponent { component_id } => {
                write!(f, "component already exists (id={component_id})")
            }
        }
    }
}

impl std::error::Error for ApplyError {}

// Per-op mutation bodies.
include!("ops_impl.rs");
