use bytecuts::classifier::{ByteCutsClassifier, Classifier};
use bytecuts::config::Config;
use bytecuts::linear::LinearClassifier;
use bytecuts::simulation::Simulation;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("Build");
    group.sample_size(20);

    for &n_rules in &[100usize, 1_000, 5_000, 20_000] {
        let mut sim = Simulation::new(42);
        let rules = sim.generate_rules(n_rules);
        let config = Config::default();

        group.bench_with_input(BenchmarkId::new("ByteCuts", n_rules), &rules, |b, rules| {
            b.iter(|| ByteCutsClassifier::construct(rules, &config));
        });
    }
    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("Classification");
    group.sample_size(50);

    for &n_rules in &[100usize, 300, 500, 700, 900, 1_000, 3_000, 5_000, 7_000, 9_000, 10_000, 20_000] {
        let mut sim = Simulation::new(42);
        let rules = sim.generate_rules(n_rules);
        let packets = sim.generate_packets(1_000);
        let config = Config::default();

        let linear = LinearClassifier::build(&rules, &config);
        let tree = ByteCutsClassifier::build(&rules, &config);

        group.bench_function(format!("Linear/{n_rules}"), |b| {
            b.iter(|| {
                for p in &packets {
                    linear.classify(p);
                }
            })
        });

        group.bench_function(format!("ByteCuts/{n_rules}"), |b| {
            b.iter(|| {
                for p in &packets {
                    tree.classify(p);
                }
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_classify);
criterion_main!(benches);
