use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use lifelike::{Engine, Pos2};

fn make_engine(size: i32) -> Engine {
    let mut engine = Engine::new(size, size);
    let alive = (0..size)
        .flat_map(|y| (0..size).map(move |x| Pos2 { x, y }))
        .filter(|pos| (pos.x + pos.y) % 3 == 0);
    engine.set_cells(alive);
    engine
}

fn bench_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("advance");
    for size in [64, 128, 256] {
        let engine = make_engine(size);

        group.bench_with_input(BenchmarkId::new("serial", size), &engine, |b, engine| {
            b.iter_batched(
                || engine.clone(),
                |mut engine| engine.advance(),
                BatchSize::LargeInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("parallel", size), &engine, |b, engine| {
            b.iter_batched(
                || engine.clone(),
                |mut engine| engine.advance_parallel(),
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let engine = make_engine(256);
    let encoded = engine.to_pattern_string();

    c.bench_function("encode 256", |b| b.iter(|| engine.to_pattern_string()));
    c.bench_function("decode 256", |b| {
        b.iter_batched(
            || Engine::new(256, 256),
            |mut engine| engine.read_pattern(&encoded).map(|p| p.cells.len()),
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(benches, bench_advance, bench_codec);
criterion_main!(benches);
