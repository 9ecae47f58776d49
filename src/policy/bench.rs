use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

use wecsim::{PolicyKind, TraceRecord, WecConfig};

// Test configuration
const TRACE_LEN: usize = 100_000;
const ADDRESS_SPACE: u64 = 50_000;
const CAPACITY: usize = 50_000;

// Skewed trace: most requests hit a small hot set
fn skewed_trace() -> Vec<TraceRecord> {
    let mut rng = StdRng::seed_from_u64(0x9e3779b97f4a7c15);
    (0..TRACE_LEN)
        .map(|_| {
            let address = if rng.gen_bool(0.8) {
                rng.gen_range(0..ADDRESS_SPACE / 20)
            } else {
                rng.gen_range(0..ADDRESS_SPACE)
            };
            if rng.gen_bool(0.1) {
                TraceRecord::write(address)
            } else {
                TraceRecord::read(address)
            }
        })
        .collect()
}

// Replay the same trace through every policy
pub fn bench_policy_replay(c: &mut Criterion) {
    let trace = skewed_trace();
    let config = WecConfig::new(CAPACITY).with_update_period(1_000);
    let mut group = c.benchmark_group("PolicyReplay");
    group.sample_size(20);

    for kind in [PolicyKind::Wec, PolicyKind::Lru, PolicyKind::Lfu] {
        group.bench_with_input(BenchmarkId::from_parameter(kind), &trace, |b, trace| {
            b.iter(|| {
                let mut policy = kind.build(&config).unwrap();
                for record in trace {
                    policy.ingest(record).unwrap();
                }
                black_box(*policy.stats())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_policy_replay);
criterion_main!(benches);
