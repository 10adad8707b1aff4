//! Throughput Benchmark for nestkv
//!
//! This benchmark measures the performance of the transaction store and the
//! command handler under various workloads.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use nestkv::commands::CommandHandler;
use nestkv::protocol::tokenize;
use nestkv::storage::{CountScope, StoreConfig, TransactionStore};

/// Benchmark SET operations
fn bench_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("set");
    group.throughput(Throughput::Elements(1));

    group.bench_function("set_base", |b| {
        let mut store = TransactionStore::new();
        let mut i = 0i64;
        b.iter(|| {
            store.set(format!("key{}", i % 100_000), i);
            i += 1;
        });
    });

    group.bench_function("set_in_transaction", |b| {
        let mut store = TransactionStore::new();
        for _ in 0..8 {
            store.begin();
        }
        let mut i = 0i64;
        b.iter(|| {
            store.set(format!("key{}", i % 100_000), i);
            i += 1;
        });
    });

    group.finish();
}

/// Benchmark GET operations
fn bench_get(c: &mut Criterion) {
    let mut store = TransactionStore::new();

    // Pre-populate the base layer, then bury it under open transactions
    for i in 0..100_000 {
        store.set(format!("key{}", i), i);
    }
    for _ in 0..32 {
        store.begin();
    }

    let mut group = c.benchmark_group("get");
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_through_32_layers", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = format!("key{}", i % 100_000);
            black_box(store.get(&key));
            i += 1;
        });
    });

    group.bench_function("get_missing", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = format!("missing{}", i);
            black_box(store.get(&key));
            i += 1;
        });
    });

    group.finish();
}

/// Benchmark BEGIN/COMMIT and BEGIN/ROLLBACK cycles
fn bench_transactions(c: &mut Criterion) {
    let mut group = c.benchmark_group("transactions");

    group.bench_function("nested_commit_16", |b| {
        let mut store = TransactionStore::new();
        b.iter(|| {
            for depth in 0..16 {
                store.begin();
                store.set("counter", depth);
                store.set(format!("level{}", depth), depth);
            }
            store.commit().unwrap();
        });
    });

    group.bench_function("begin_rollback", |b| {
        let mut store = TransactionStore::new();
        b.iter(|| {
            store.begin();
            store.set("scratch", 1);
            store.rollback().unwrap();
        });
    });

    group.finish();
}

/// Benchmark NUMEQUALTO in both counting scopes
fn bench_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("numequalto");

    for scope in [CountScope::Raw, CountScope::Effective] {
        let mut store = TransactionStore::with_config(StoreConfig { count_scope: scope });
        for layer in 0..4 {
            for i in 0..10_000 {
                store.set(format!("key{}", i), (i % 10) + layer);
            }
            store.begin();
        }

        group.bench_function(format!("count_{}", scope), |b| {
            b.iter(|| black_box(store.count_equal(5)));
        });
    }

    group.finish();
}

/// Benchmark full line execution (tokenize + validate + execute)
fn bench_execute(c: &mut Criterion) {
    let mut group = c.benchmark_group("execute");
    group.throughput(Throughput::Elements(1));

    group.bench_function("tokenize", |b| {
        b.iter(|| black_box(tokenize(black_box("SET somekey 12345\n"))));
    });

    group.bench_function("80_read_20_write", |b| {
        let mut handler = CommandHandler::new();
        let reads: Vec<String> = (0..1_000).map(|i| format!("GET key{}\n", i)).collect();
        let writes: Vec<String> = (0..1_000).map(|i| format!("SET key{} {}\n", i, i)).collect();
        let mut i = 0usize;
        b.iter(|| {
            let line = if i % 5 == 0 {
                &writes[i % 1_000]
            } else {
                &reads[i % 1_000]
            };
            black_box(handler.execute_line(line).ok());
            i += 1;
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_set,
    bench_get,
    bench_transactions,
    bench_count,
    bench_execute,
);

criterion_main!(benches);
