use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glsample_core::{CSRBuilder, Fanout, NeighborLoader, NeighborSampler, SamplerConfig, CSR};

fn power_law_graph(num_nodes: u32, num_edges: u32) -> CSR
{
    // skewed targets give a handful of very high degree rows
    let edges = (0..num_edges).map(|i| {
        let v = ((i as u64 * i as u64) % num_nodes as u64) as u32;
        let u = (i.wrapping_mul(2_654_435_761)) % num_nodes;
        [v, u]
    });
    CSRBuilder::new()
        .num_nodes(num_nodes as usize)
        .build(edges)
        .unwrap()
}

fn bench_sample(c: &mut Criterion)
{
    let csr = power_law_graph(100_000, 2_000_000);
    let batch: Vec<u32> = (0..1024u32).map(|i| i * 97).collect();

    let mut group = c.benchmark_group("sample");

    for (name, fanouts) in [
        ("25_10", vec![Fanout::Sample(25), Fanout::Sample(10)]),
        ("15_10_5", vec![Fanout::Sample(15), Fanout::Sample(10), Fanout::Sample(5)]),
        ("all", vec![Fanout::All]),
    ] {
        for replace in [false, true] {
            let sampler = NeighborSampler::new(&csr, &fanouts).replace(replace);
            group.bench_with_input(
                BenchmarkId::new(name, if replace { "replace" } else { "no_replace" }),
                &batch,
                |b, batch| b.iter(|| black_box(sampler.sample_seeded(black_box(batch), 7))),
            );
        }
    }

    group.finish();
}

fn bench_epoch(c: &mut Criterion)
{
    let csr = power_law_graph(50_000, 500_000);
    let mut group = c.benchmark_group("epoch");
    group.sample_size(10);

    for threads in [1, 4] {
        let config = SamplerConfig::new(vec![Fanout::Sample(10), Fanout::Sample(5)])
            .batch_size(512)
            .shuffle(true)
            .seed(1)
            .num_threads(threads);
        let loader = NeighborLoader::new(&csr, (0..50_000).collect(), &config).unwrap();
        group.bench_function(format!("threads_{}", threads), |b| {
            b.iter(|| black_box(loader.sample_epoch(0)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sample, bench_epoch);
criterion_main!(benches);
