// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Evomap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use evomap::render::{render_map, RenderOptions};

mod fixtures;

// Benchmark identity (keep stable):
// - Group name in this file: `render.map`
// - Case IDs are `<fixture>_<width>x<height>`.
fn benches_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render.map");
    let options = RenderOptions::default();

    for case in [
        fixtures::Case::Default,
        fixtures::Case::MediumDense,
        fixtures::Case::LargeLongLabels,
    ] {
        let diagram = fixtures::fixture(case);
        for (width, height) in [(80u16, 24u16), (200, 60)] {
            let id = format!("{}_{width}x{height}", case.id());
            let options = options.clone();
            let diagram = diagram.clone();
            group.bench_function(id, move |b| {
                b.iter(|| {
                    let map = render_map(
                        black_box(&diagram),
                        black_box(width),
                        black_box(height),
                        &options,
                    )
                    .expect("render_map");
                    black_box(map.badges().len())
                })
            });
        }
    }

    group.finish();
}

criterion_group!(benches, benches_render);
criterion_main!(benches);
