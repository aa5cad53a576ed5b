use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use rand::{thread_rng, Rng};

use mkm::MultiKeyMap;

// Insert-heavy workload with occasional prefix erases, meant to simulate how
// a real application index churns rather than a pure insert loop.
pub fn map_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_insert");
    group.throughput(Throughput::Elements(1));
    group.bench_function("insert_full_key", |b| {
        let mut map = MultiKeyMap::<(u32, u8, bool), u64>::new();
        b.iter(|| {
            let mut rng = thread_rng();
            let key = (rng.gen_range(0..10_000u32), rng.gen::<u8>(), rng.gen::<bool>());
            map.insert(key, 42);
            // 1 in 8 chance of erasing a whole first-part prefix.
            if rng.gen_range(0..8) == 0 {
                map.remove(&(rng.gen_range(0..10_000u32),));
            }
        });
    });
    group.finish();
}

pub fn map_prefix_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_prefix_scan");

    let mut map = MultiKeyMap::<(u32, u8, bool), u64>::new();
    let mut rng = thread_rng();
    for i in 0..100_000u32 {
        map.insert((i % 1_000, rng.gen::<u8>(), rng.gen::<bool>()), u64::from(i));
    }

    group.throughput(Throughput::Elements(1));
    group.bench_function("count_level1_prefix", |b| {
        b.iter(|| {
            let first = rng.gen_range(0..1_000u32);
            map.count(&(first,))
        });
    });
    group.finish();
}

criterion_group!(map_benches, map_insert, map_prefix_scan);
criterion_main!(map_benches);
