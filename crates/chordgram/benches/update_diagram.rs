use chordgram::ChordData;
use chordgram::render::{DiagramRenderer, DiagramSettings, Viewport};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

/// Dense `n x n` matrix with deterministic, uneven weights.
fn dense(n: usize) -> ChordData {
    let matrix = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| ((i * 7919 + j * 104_729) % 997) as f64 + 1.0)
                .collect()
        })
        .collect();
    let names = (0..n).map(|i| format!("entity-{i}")).collect();
    ChordData::new(matrix, names)
}

fn bench_update_diagram(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_diagram");
    for n in [4usize, 16, 64] {
        let data = dense(n);
        let mut renderer =
            DiagramRenderer::new(Viewport::default(), DiagramSettings::default()).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n), &data, |b, data| {
            b.iter(|| {
                renderer.update_diagram(black_box(data)).unwrap();
            })
        });
    }
    group.finish();
}

fn bench_to_svg(c: &mut Criterion) {
    let mut renderer =
        DiagramRenderer::new(Viewport::default(), DiagramSettings::default()).unwrap();
    renderer.update_diagram(&dense(32)).unwrap();
    c.bench_function("to_svg/32", |b| b.iter(|| black_box(renderer.to_svg())));
}

criterion_group!(benches, bench_update_diagram, bench_to_svg);
criterion_main!(benches);
