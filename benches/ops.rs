// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Evomap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};

use evomap::model::{ComponentId, Diagram};
use evomap::ops::{apply_ops, ComponentPatch, Delta, Op};

mod fixtures;

// Benchmark identity (keep stable):
// - Group name in this file: `ops.apply`
// - Case IDs (the string after the `/`) must remain stable across refactors so
//   results stay comparable over time.
fn checksum_delta(delta: &Delta) -> u64 {
    let mut acc = 0u64;
    acc = acc.wrapping_mul(131).wrapping_add(delta.added.len() as u64);
    acc = acc.wrapping_mul(131).wrapping_add(delta.updated.len() as u64);
    acc = acc.wrapping_mul(131).wrapping_add(delta.removed.len() as u64);
    acc
}

fn add_dependency_ops(nodes: &[ComponentId], count: usize) -> Vec<Op> {
    assert!(nodes.len() >= 2, "fixture must contain >= 2 components");

    (0..count)
        .map(|idx| {
            let from_index = idx.wrapping_mul(7) % nodes.len();
            let mut to_index = idx.wrapping_mul(7).wrapping_add(3) % nodes.len();
            if to_index == from_index {
                to_index = (to_index + 1) % nodes.len();
            }
            Op::AddDependency {
                from: nodes[from_index].clone(),
                to: nodes[to_index].clone(),
            }
        })
        .collect()
}

fn move_ops(nodes: &[ComponentId], count: usize) -> Vec<Op> {
    (0..count)
        .map(|idx| Op::UpdateComponent {
            component_id: nodes[idx % nodes.len()].clone(),
            patch: ComponentPatch::position((idx % 100) as f64, 100.0 - (idx % 100) as f64),
        })
        .collect()
}

fn bench_case(c: &mut Criterion, id: &str, template: &Diagram, ops: Vec<Op>) {
    let mut group = c.benchmark_group("ops.apply");
    group.throughput(Throughput::Elements(ops.len() as u64));
    let template = template.clone();
    group.bench_function(id, move |b| {
        b.iter_batched(
            || template.clone(),
            |mut diagram| {
                let delta = apply_ops(&mut diagram, black_box(&ops)).expect("apply_ops");
                black_box(checksum_delta(&delta))
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn benches_ops(c: &mut Criterion) {
    let dense = fixtures::fixture(fixtures::Case::MediumDense);
    let nodes = dense
        .nodes()
        .iter()
        .map(|component| component.id().clone())
        .collect::<Vec<_>>();

    bench_case(c, "link_single", &dense, add_dependency_ops(&nodes, 1));
    bench_case(c, "link_batch_200", &dense, add_dependency_ops(&nodes, 200));
    bench_case(c, "move_batch_200", &dense, move_ops(&nodes, 200));

    // Removal also strips every inbound dependency.
    let remove_all = nodes
        .iter()
        .map(|id| Op::RemoveComponent {
            component_id: id.clone(),
        })
        .collect::<Vec<_>>();
    bench_case(c, "remove_all", &dense, remove_all);

    let add_ops = (0..200)
        .map(|idx| Op::AddComponent {
            component_id: ComponentId::new(format!("bench_added_{idx:04}")).expect("component id"),
        })
        .collect::<Vec<_>>();
    bench_case(c, "add_batch_200", &dense, add_ops);
}

criterion_group!(benches, benches_ops);
criterion_main!(benches);
