// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Evomap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Keyboard hint labels over canvas targets (components and dependency lines).

use std::collections::HashSet;

use crate::model::ComponentId;
use crate::render::{Hit, MapCanvas};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HintAction {
    Component(ComponentId),
    Edge { from: ComponentId, to: ComponentId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HintTarget {
    pub(crate) label: String,
    /// Canvas cell the label is drawn at.
    pub(crate) x: usize,
    pub(crate) y: usize,
    pub(crate) action: HintAction,
}

/// One target per badge, labelled at the badge's first cell.
pub(crate) fn component_targets(map: &MapCanvas, hint_chars: &str) -> Vec<HintTarget> {
    let labels = gen_labels(map.badges().len(), hint_chars);
    map.badges()
        .iter()
        .zip(labels)
        .map(|(badge, label)| HintTarget {
            label,
            x: badge.x0,
            y: badge.row,
            action: HintAction::Component(badge.id.clone()),
        })
        .collect()
}

/// One target per visible dependency line, labelled at its middle cell.
pub(crate) fn edge_targets(map: &MapCanvas, hint_chars: &str) -> Vec<HintTarget> {
    let mut edges: Vec<((ComponentId, ComponentId), Vec<(usize, usize)>)> = Vec::new();
    for y in 0..map.height() {
        for x in 0..map.width() {
            let Hit::Edge { from, to } = map.hit_at(x, y) else {
                continue;
            };
            match edges.iter_mut().find(|((f, t), _)| f == from && t == to) {
                Some((_, cells)) => cells.push((x, y)),
                None => edges.push(((from.clone(), to.clone()), vec![(x, y)])),
            }
        }
    }

    let labels = gen_labels(edges.len(), hint_chars);
    edges
        .into_iter()
        .zip(labels)
        .map(|(((from, to), cells), label)| {
            let (x, y) = cells[cells.len() / 2];
            HintTarget {
                label,
                x,
                y,
                action: HintAction::Edge { from, to },
            }
        })
        .collect()
}

/// Generates `n` distinct labels over `hint_chars`, all of the same length so no label is a prefix
/// of another.
pub(crate) fn gen_labels(n: usize, hint_chars: &str) -> Vec<String> {
    let alphabet: Vec<char> = hint_chars.chars().collect();
    assert!(!alphabet.is_empty(), "hint_chars must not be empty");

    let mut seen = HashSet::with_capacity(alphabet.len());
    for &ch in &alphabet {
        assert!(seen.insert(ch), "hint_chars must not contain duplicate characters");
    }

    if n == 0 {
        return Vec::new();
    }

    let k = alphabet.len();
    if k == 1 {
        // A single symbol cannot form same-length distinct labels.
        return (1..=n).map(|len| alphabet[0].to_string().repeat(len)).collect();
    }

    let mut len = 1u32;
    while k.saturating_pow(len) < n {
        len += 1;
    }

    (0..n)
        .map(|i| {
            let mut x = i;
            let mut chars = vec![alphabet[0]; len as usize];
            for slot in chars.iter_mut().rev() {
                *slot = alphabet[x % k];
                x /= k;
            }
            chars.into_iter().collect()
        })
        .collect()
}
