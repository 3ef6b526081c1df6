//! Microbenchmarks of AvlTree against the standard library's BTreeSet.

use balanced_tree::AvlTree;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeSet;

fn generate_keys(n: usize) -> Vec<String> {
    let mut keys: Vec<String> = (0..n).map(|i| format!("room:{:08}", i)).collect();
    let mut rng = StdRng::seed_from_u64(42);
    keys.shuffle(&mut rng);
    keys
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for size in [1_000, 10_000].iter() {
        let keys = generate_keys(*size);

        group.bench_with_input(BenchmarkId::new("BTreeSet", size), size, |b, _| {
            b.iter(|| {
                let mut set: BTreeSet<String> = BTreeSet::new();
                for key in keys.iter() {
                    set.insert(key.clone());
                }
                black_box(set)
            });
        });

        group.bench_with_input(BenchmarkId::new("AvlTree", size), size, |b, _| {
            b.iter(|| {
                let mut tree: AvlTree<String> = AvlTree::new();
                for key in keys.iter() {
                    tree.insert(key.clone());
                }
                black_box(tree)
            });
        });
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    for size in [1_000, 10_000].iter() {
        let keys = generate_keys(*size);

        let btree: BTreeSet<String> = keys.iter().cloned().collect();
        let tree: AvlTree<String> = keys.iter().cloned().collect();

        group.bench_with_input(BenchmarkId::new("BTreeSet", size), size, |b, _| {
            b.iter(|| {
                let mut found = 0usize;
                for key in keys.iter() {
                    if btree.contains(key.as_str()) {
                        found += 1;
                    }
                }
                black_box(found)
            });
        });

        group.bench_with_input(BenchmarkId::new("AvlTree", size), size, |b, _| {
            b.iter(|| {
                let mut found = 0usize;
                for key in keys.iter() {
                    if tree.contains(key.as_str()) {
                        found += 1;
                    }
                }
                black_box(found)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_insert, bench_lookup);
criterion_main!(benches);
