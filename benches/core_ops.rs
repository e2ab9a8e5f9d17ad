// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Core tree operation benchmarks.
//!
//! Measures performance of:
//! - insert() - Splice a new element into the tree
//! - lookup() - Exact-key descent
//! - lookup_ge() / lookup_le() - Nearest-neighbour range descent
//! - next() - Successor walk
//! - delete() - Detach an element and relocate its interior-node role
//!
//! ## Performance Targets
//!
//! Every operation is O(W), W the key width in bits — these benchmarks
//! track that the constant factor stays flat as tree size grows, not an
//! absolute latency target.

use cebtree::node::{KeyedScalar, Node, NodeSlot};
use cebtree::tree::U32Tree;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

struct Entry {
    key: u32,
    slot: NodeSlot<Entry>,
}

impl Entry {
    fn new(key: u32) -> Box<Self> {
        Box::new(Entry {
            key,
            slot: NodeSlot::detached(),
        })
    }
}

impl Node for Entry {
    fn slot(&self) -> &NodeSlot<Self> {
        &self.slot
    }
    fn slot_mut(&mut self) -> &mut NodeSlot<Self> {
        &mut self.slot
    }
}

impl KeyedScalar<u32> for Entry {
    fn key_scalar(&self) -> u32 {
        self.key
    }
}

/// Build a tree over a pseudo-random permutation of `0..n`, returning the
/// tree plus the owning boxes (which must outlive the tree).
fn build(n: u32) -> (U32Tree<Entry>, Vec<Box<Entry>>) {
    let mut keys: Vec<u32> = (0..n).collect();
    // Deterministic shuffle (xorshift), so benches are reproducible without
    // a `rand` dependency on the hot path.
    let mut state: u32 = 0x9E3779B9;
    for i in (1..keys.len()).rev() {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let j = (state as usize) % (i + 1);
        keys.swap(i, j);
    }

    let mut boxes: Vec<Box<Entry>> = keys.iter().map(|&k| Entry::new(k)).collect();
    let mut tree: U32Tree<Entry> = U32Tree::new();
    unsafe {
        for b in boxes.iter_mut() {
            tree.insert(&mut **b);
        }
    }
    (tree, boxes)
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for size in [1_000u32, 10_000, 100_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &n| {
            b.iter_batched(
                || build(n),
                |(mut tree, mut boxes)| {
                    let mut extra = Entry::new(n + 1);
                    unsafe {
                        black_box(tree.insert(&mut *extra));
                    }
                    boxes.push(extra);
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    for size in [1_000u32, 10_000, 100_000].iter() {
        let (tree, _boxes) = build(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &n| {
            b.iter(|| unsafe {
                black_box(tree.lookup(n / 2));
            });
        });
    }

    group.finish();
}

fn bench_lookup_ge(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup_ge");

    for size in [1_000u32, 10_000, 100_000].iter() {
        let (tree, _boxes) = build(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &n| {
            b.iter(|| unsafe {
                black_box(tree.lookup_ge(n / 2));
            });
        });
    }

    group.finish();
}

fn bench_next_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("next_walk_1000_steps");

    for size in [10_000u32, 100_000].iter() {
        let (tree, _boxes) = build(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| unsafe {
                let mut cur = tree.first();
                for _ in 0..1000 {
                    match cur {
                        Some(e) => cur = tree.next(e),
                        None => break,
                    }
                }
                black_box(cur);
            });
        });
    }

    group.finish();
}

fn bench_delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("delete");

    for size in [1_000u32, 10_000, 100_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &n| {
            b.iter_batched(
                || build(n),
                |(mut tree, boxes)| unsafe {
                    let victim = &*boxes[(n / 2) as usize] as *const Entry as *mut Entry;
                    black_box(tree.delete(victim));
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_lookup,
    bench_lookup_ge,
    bench_next_walk,
    bench_delete
);
criterion_main!(benches);
