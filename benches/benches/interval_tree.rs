// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_interval::{IntervalTree, Span};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn below(&mut self, n: i64) -> i64 {
        (self.next_u64() % n as u64) as i64
    }
}

/// Back-to-back clips on `tracks` tracks, like a typical edit.
fn gen_tracks(tracks: usize, clips_per_track: usize, clip_len: i64) -> Vec<(Span<i64>, u32)> {
    let mut out = Vec::with_capacity(tracks * clips_per_track);
    let mut id = 0_u32;
    for t in 0..tracks {
        let offset = t as i64 * (clip_len / 3);
        for c in 0..clips_per_track {
            let start = offset + c as i64 * clip_len;
            out.push((Span::new(start, start + clip_len), id));
            id += 1;
        }
    }
    out
}

/// Random clips of varying length over `[0, extent)`.
fn gen_random(count: usize, extent: i64, max_len: i64, seed: u64) -> Vec<(Span<i64>, u32)> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|i| {
            let start = rng.below(extent);
            let len = 1 + rng.below(max_len);
            (Span::new(start, start + len), i as u32)
        })
        .collect()
}

fn tree_of(items: &[(Span<i64>, u32)]) -> IntervalTree<(Span<i64>, u32)> {
    items.iter().copied().collect()
}

fn bench_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("rebuild");
    for &n in &[100_usize, 1_000, 10_000] {
        let items = gen_random(n, 1_000_000, 5_000, 0x5eed);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("random_{n}"), |b| {
            b.iter_batched(
                || tree_of(&items),
                |mut tree| {
                    tree.rebuild();
                    black_box(tree.node_count())
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_playhead(c: &mut Criterion) {
    let mut group = c.benchmark_group("playhead");
    let items = gen_tracks(32, 200, 480);
    let mut tree = tree_of(&items);
    tree.rebuild();
    let mut hits = Vec::with_capacity(64);
    group.bench_function("point_32x200", |b| {
        let mut t = 0_i64;
        b.iter(|| {
            hits.clear();
            tree.intersects_with(black_box(t), &mut hits);
            t = (t + 97) % 96_000;
            black_box(hits.len())
        });
    });
    group.finish();
}

fn bench_window(c: &mut Criterion) {
    let mut group = c.benchmark_group("window");
    let items = gen_random(10_000, 1_000_000, 5_000, 0xfeed);
    let mut tree = tree_of(&items);
    tree.rebuild();
    for &width in &[1_000_i64, 20_000, 200_000] {
        group.bench_function(format!("range_{width}"), |b| {
            let mut start = 0_i64;
            let mut hits = Vec::new();
            b.iter(|| {
                hits.clear();
                tree.intersects_with_range(black_box(start), start + width, &mut hits);
                start = (start + 7_919) % 1_000_000;
                black_box(hits.len())
            });
        });
    }
    group.finish();
}

fn bench_linear_scan(c: &mut Criterion) {
    let items = gen_random(10_000, 1_000_000, 5_000, 0xfeed);
    c.bench_function("window/linear_scan_20000", |b| {
        let mut start = 0_i64;
        b.iter(|| {
            let end = start + 20_000;
            let n = items
                .iter()
                .filter(|(s, _)| s.overlaps_query(start, end))
                .count();
            start = (start + 7_919) % 1_000_000;
            black_box(n)
        });
    });
}

criterion_group!(
    benches,
    bench_rebuild,
    bench_playhead,
    bench_window,
    bench_linear_scan
);
criterion_main!(benches);
