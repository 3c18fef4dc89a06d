use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use glp2report::graph::{self, AxisDefinition, GraphData, GraphGrammar, Sample, SampleMatrix};

fn generate_payload(num_samples: usize, num_axes: usize) -> String {
    let axes = (0..num_axes)
        .map(|a| AxisDefinition::new([format!("axis{a}"), "V".into(), "black".into(), "0".into(), "5000".into(), "%.1f".into()]))
        .collect();
    let samples = (0..num_samples)
        .map(|i| Sample::new((0..num_axes).map(|a| format!("{:.3}", (i * (a + 1)) as f64 * 0.25))))
        .collect();
    GraphGrammar::default().encode(&GraphData {
        axes,
        samples: SampleMatrix::new(samples),
    })
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph_parse");

    for &num_samples in &[100usize, 1_000, 10_000] {
        let payload = generate_payload(num_samples, 3);
        group.throughput(Throughput::Bytes(payload.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(num_samples), &payload, |b, payload| {
            b.iter(|| graph::parse(black_box(payload)).unwrap())
        });
    }

    group.finish();
}

fn bench_axis_values(c: &mut Criterion) {
    let graph = graph::parse(&generate_payload(10_000, 3)).unwrap();

    c.bench_function("axis_values_10k", |b| {
        b.iter(|| graph.axis_values(black_box(2)).unwrap())
    });
}

criterion_group!(benches, bench_parse, bench_axis_values);
criterion_main!(benches);
