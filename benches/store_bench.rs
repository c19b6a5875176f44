//! Benchmarks for cordkv store operations

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use tempfile::TempDir;

use cordkv::{Bincode, Store};

type BenchStore = Store<Bincode<String>, Bincode<String>>;

fn store_benchmarks(c: &mut Criterion) {
    // Build a 100-key chain and commit it in one batch
    c.bench_function("set_100_commit", |b| {
        b.iter_batched(
            || {
                let dir = TempDir::new().unwrap();
                let store = BenchStore::open_path(dir.path().join("bench.db")).unwrap();
                (dir, store)
            },
            |(_dir, mut store)| {
                for i in 0..100 {
                    store
                        .set(format!("key{}", i), format!("value{}", i))
                        .unwrap();
                }
                store.commit().unwrap();
            },
            BatchSize::SmallInput,
        )
    });

    // Point lookups against a committed, cache-warm chain
    c.bench_function("get_mid_chain", |b| {
        let dir = TempDir::new().unwrap();
        let mut store = BenchStore::open_path(dir.path().join("bench.db")).unwrap();
        for i in 0..100 {
            store
                .set(format!("key{}", i), format!("value{}", i))
                .unwrap();
        }
        store.commit().unwrap();

        let needle = "key50".to_string();
        b.iter(|| store.get(&needle).unwrap());
    });
}

criterion_group!(benches, store_benchmarks);
criterion_main!(benches);
