// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Evomap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The component set seeded into a fresh store.

use super::component::{Component, ComponentType, Position};
use super::ids::ComponentId;

pub const SEEDED_MAP_NAME: &str = "AI Inference Map";
pub const FALLBACK_MAP_NAME: &str = "My First Map";

// (id, name, value, evolution, type, dependencies)
const DEFAULT_NODES: &[(&str, &str, f64, f64, ComponentType, &[&str])] = &[
    ("ai_app", "AI Application", 95.0, 50.0, ComponentType::Software, &["app_backend"]),
    ("app_backend", "Application Backend", 85.0, 60.0, ComponentType::Software, &["model_api"]),
    ("model_api", "AI Model API (e.g. Gemini)", 75.0, 65.0, ComponentType::Service, &["model_serving"]),
    (
        "model_serving",
        "Model Serving Framework",
        60.0,
        55.0,
        ComponentType::Software,
        &["orchestration", "ml_framework"],
    ),
    (
        "orchestration",
        "Container Orchestration (K8s)",
        50.0,
        70.0,
        ComponentType::Software,
        &["containerization", "cloud_compute"],
    ),
    ("containerization", "Containerization (Docker)", 45.0, 80.0, ComponentType::Software, &["cloud_compute"]),
    ("ml_framework", "ML Frameworks (PyTorch, TF)", 40.0, 65.0, ComponentType::Software, &["hardware_sdk"]),
    ("hardware_sdk", "Hardware Drivers/SDK (CUDA)", 30.0, 60.0, ComponentType::Software, &["accelerators"]),
    (
        "cloud_compute",
        "Cloud Compute (IaaS)",
        25.0,
        85.0,
        ComponentType::Service,
        &["server_hardware", "data_center"],
    ),
    ("accelerators", "Hardware Accelerators (GPU/TPU)", 20.0, 58.0, ComponentType::Hardware, &["server_hardware"]),
    ("server_hardware", "Server Hardware (CPU, RAM)", 10.0, 88.0, ComponentType::Hardware, &["power"]),
    ("data_center", "Data Center", 8.0, 92.0, ComponentType::Service, &["power"]),
    ("power", "Power", 2.0, 98.0, ComponentType::Service, &[]),
];

fn cid(value: &str) -> ComponentId {
    ComponentId::new(value).expect("fixture id")
}

/// The thirteen-component AI inference stack, from the user-facing application down to power.
pub fn default_components() -> Vec<Component> {
    DEFAULT_NODES
        .iter()
        .map(|&(id, name, value, evolution, component_type, deps)| {
            Component::new_with(
                cid(id),
                name,
                Position::new(evolution, value),
                component_type,
                deps.iter().map(|dep| cid(dep)).collect(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::default_components;
    use crate::model::ComponentId;

    #[test]
    fn default_components_reference_only_each_other() {
        let nodes = default_components();
        assert_eq!(nodes.len(), 13);

        let ids = nodes
            .iter()
            .map(|node| node.id().as_str())
            .collect::<BTreeSet<_>>();
        assert_eq!(ids.len(), 13);
        for node in &nodes {
            for dep in node.dependencies() {
                assert!(ids.contains(dep.as_str()), "dangling {dep} in {}", node.id());
            }
        }
    }

    #[test]
    fn default_components_chain_from_application_to_power() {
        let nodes = default_components();
        let find = |id: &str| {
            nodes
                .iter()
                .find(|node| node.id().as_str() == id)
                .expect("node")
        };

        let mut current = find("ai_app");
        assert_eq!(current.name(), "AI Application");
        let mut hops = 0;
        while let Some(next) = current.dependencies().first() {
            current = find(next.as_str());
            hops += 1;
            assert!(hops < 13, "dependency chain loops");
        }
        assert_eq!(current.name(), "Power");
        assert!(current.dependencies().is_empty());
        assert_eq!(current.value(), 2.0);
        assert_eq!(current.evolution(), 98.0);
        assert_eq!(
            find("power").id(),
            &ComponentId::new("power").expect("id")
        );
    }
}
