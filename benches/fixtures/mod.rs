// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Evomap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use evomap::model::fixtures::default_components;
use evomap::model::{Component, ComponentId, ComponentType, Diagram, DiagramId, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    /// The seeded thirteen-component inference stack.
    Default,
    /// 120 components, each depending on the next three.
    MediumDense,
    /// 400 components with 60-character names.
    LargeLongLabels,
}

impl Case {
    pub fn id(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::MediumDense => "medium_dense",
            Self::LargeLongLabels => "large_long_labels",
        }
    }
}

pub fn component_id(idx: usize) -> ComponentId {
    ComponentId::new(format!("bench_node_{idx:04}")).expect("component id")
}

fn ascii_repeat_to_len(prefix: &str, fill: char, target_len: usize) -> String {
    let mut out = prefix.chars().take(target_len).collect::<String>();
    while out.len() < target_len {
        out.push(fill);
    }
    out
}

fn generated(count: usize, fan_out: usize, name_len: usize) -> Vec<Component> {
    (0..count)
        .map(|idx| {
            // A deterministic scatter over both axes.
            let evolution = ((idx * 37) % 101) as f64;
            let value = 100.0 - ((idx * 100) / count.max(1)) as f64;
            let component_type = match idx % 3 {
                0 => ComponentType::Software,
                1 => ComponentType::Hardware,
                _ => ComponentType::Service,
            };
            let deps = (1..=fan_out)
                .map(|step| idx + step)
                .filter(|&dep| dep < count)
                .map(component_id)
                .collect();
            Component::new_with(
                component_id(idx),
                ascii_repeat_to_len(&format!("Component {idx} "), '=', name_len),
                Position::new(evolution, value),
                component_type,
                deps,
            )
        })
        .collect()
}

pub fn fixture(case: Case) -> Diagram {
    let nodes = match case {
        Case::Default => default_components(),
        Case::MediumDense => generated(120, 3, 18),
        Case::LargeLongLabels => generated(400, 1, 60),
    };
    Diagram::new(
        DiagramId::new(format!("bench_{}", case.id())).expect("diagram id"),
        case.id(),
        nodes,
        0,
    )
}
