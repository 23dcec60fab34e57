use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use jresults::{aggregate, RunResult, Sample};

fn samples(count: usize, labels: usize) -> Vec<Sample> {
    (0..count)
        .map(|i| {
            Sample::new(
                1_709_287_200_000 + i as i64 * 3,
                (i as u64 * 7919) % 2_000,
                format!("request-{}", i % labels),
                i % 50 != 0,
            )
        })
        .collect()
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    for count in [1_000, 10_000, 100_000] {
        let input = samples(count, 20);
        group.bench_with_input(BenchmarkId::from_parameter(count), &input, |b, input| {
            b.iter(|| aggregate(black_box(input)).unwrap())
        });
    }
    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let result = aggregate(&samples(10_000, 200)).unwrap();
    let bytes = result.encode().unwrap();

    c.bench_function("encode", |b| b.iter(|| black_box(&result).encode().unwrap()));
    c.bench_function("decode", |b| {
        b.iter(|| RunResult::decode(black_box(&bytes)).unwrap())
    });
}

criterion_group!(benches, bench_aggregate, bench_codec);
criterion_main!(benches);
