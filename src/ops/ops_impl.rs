// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Evomap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Mutation bodies used by `apply_ops`; each works on the working copy of the node list.
fn apply_one(
    nodes: &mut Vec<Component>,
    op: &Op,
    delta: &mut DeltaBuilder,
) -> Result<(), ApplyError> {
    match op {
        Op::AddComponent { component_id } => {
            if nodes.iter().any(|node| node.id() == component_id) {
                return Err(ApplyError::DuplicateComponent {
                    component_id: component_id.clone(),
                });
            }
            nodes.push(Component::new(component_id.clone(), NEW_COMPONENT_NAME));
            delta.record_added(component_id.clone());
            Ok(())
        }
        Op::RemoveComponent { component_id } => {
            let before = nodes.len();
            nodes.retain(|node| node.id() != component_id);
            if nodes.len() == before {
                return Ok(());
            }
            for node in nodes.iter_mut() {
                if node.remove_dependency(component_id) {
                    delta.record_updated(node.id().clone());
                }
            }
            delta.record_removed(component_id.clone());
            Ok(())
        }
        Op::UpdateComponent {
            component_id,
            patch,
        } => {
            let Some(node) = nodes.iter_mut().find(|node| node.id() == component_id) else {
                return Ok(());
            };
            if patch.is_empty() {
                return Ok(());
            }
            if let Some(name) = &patch.name {
                node.set_name(name.clone());
            }
            if let Some(value) = patch.value {
                node.set_value(clamp_axis(value));
            }
            if let Some(evolution) = patch.evolution {
                node.set_evolution(clamp_axis(evolution));
            }
            if let Some(component_type) = patch.component_type {
                node.set_component_type(component_type);
            }
            delta.record_updated(component_id.clone());
            Ok(())
        }
        Op::AddDependency { from, to } => {
            if from == to {
                return Err(ApplyError::SelfDependency {
                    component_id: from.clone(),
                });
            }
            let Some(node) = nodes.iter_mut().find(|node| node.id() == from) else {
                return Ok(());
            };
            if node.add_dependency(to.clone()) {
                delta.record_updated(from.clone());
            }
            Ok(())
        }
        Op::RemoveDependency { from, to } => {
            let Some(node) = nodes.iter_mut().find(|node| node.id() == from) else {
                return Ok(());
            };
            if node.remove_dependency(to) {
                delta.record_updated(from.clone());
            }
            Ok(())
        }
    }
}
