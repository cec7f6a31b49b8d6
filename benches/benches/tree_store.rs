// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::convert::Infallible;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use futures::FutureExt;
use futures::executor::block_on;
use futures::future::LocalBoxFuture;
use understory_tree_store::{SelectOptions, TreeItem, TreeNode, TreeSource, TreeStore};

#[derive(Clone, Debug)]
struct GridCell {
    id: u64,
    leaf: bool,
}

impl TreeItem for GridCell {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }

    fn has_children(&self) -> Option<bool> {
        Some(!self.leaf)
    }
}

/// A complete `fanout`-ary tree of `depth` levels with heap-style ids.
struct Grid {
    fanout: u64,
    depth: u32,
}

impl TreeSource<GridCell> for Grid {
    type Error = Infallible;

    fn fetch_children(
        &self,
        parent: Option<&TreeNode<GridCell>>,
    ) -> LocalBoxFuture<'static, Result<Vec<GridCell>, Infallible>> {
        let base = parent.map_or(0, |p| *p.id());
        let level = parent.map_or(1, |p| p.level() + 1);
        let cells = if level > self.depth {
            Vec::new()
        } else {
            (0..self.fanout)
                .map(|i| GridCell {
                    id: base * self.fanout + i + 1,
                    leaf: level == self.depth,
                })
                .collect()
        };
        futures::future::ready(Ok(cells)).boxed_local()
    }
}

/// Loads the grid with every non-leaf node open.
fn expanded(fanout: u64, depth: u32) -> TreeStore<GridCell, Grid> {
    let store = TreeStore::new(Grid { fanout, depth });
    block_on(async {
        store.refresh(None).await.unwrap();
        let mut frontier: Vec<u64> = store.state().root_items().unwrap_or(&[]).to_vec();
        for _ in 1..depth {
            let mut next = Vec::new();
            for id in frontier {
                store.open(&id).await.unwrap();
                if let Some(children) = store.state().get(&id).and_then(|n| n.children()) {
                    next.extend_from_slice(children);
                }
            }
            frontier = next;
        }
    });
    store
}

fn bench_refresh(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_store/refresh_reopen");

    // A root refresh re-fetches every open node; cost is dominated by install.
    for fanout in [4u64, 8, 16] {
        let store = expanded(fanout, 3);
        group.throughput(Throughput::Elements(store.state().len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(fanout), &store, |b, store| {
            b.iter(|| block_on(store.refresh(None)).unwrap());
        });
    }

    group.finish();
}

fn bench_visible_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_store/visible_rows");

    for fanout in [4u64, 8, 16] {
        let store = expanded(fanout, 3);
        group.throughput(Throughput::Elements(store.state().len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(fanout), &store, |b, store| {
            b.iter(|| black_box(store.state().visible_rows()));
        });
    }

    group.finish();
}

fn bench_select_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_store/select_range_all");

    for fanout in [4u64, 8, 16] {
        let store = expanded(fanout, 3);
        let rows = store.state().visible_rows();
        let (first, last) = (rows[0].id, rows[rows.len() - 1].id);
        group.throughput(Throughput::Elements(rows.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(fanout), &store, |b, store| {
            b.iter(|| {
                store.select(&first, SelectOptions::default().quiet());
                store.select_range(&last);
            });
        });
    }

    group.finish();
}

fn bench_common_parent(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_store/find_common_parent");

    for depth in [3u32, 5] {
        let store = expanded(4, depth);
        let mut leaves: Vec<u64> = store
            .state()
            .items_by_id()
            .values()
            .filter(|n| n.level() == depth)
            .map(|n| *n.id())
            .collect();
        leaves.sort_unstable();
        group.bench_with_input(BenchmarkId::from_parameter(depth), &leaves, |b, leaves| {
            b.iter(|| black_box(store.find_common_parent(leaves)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_refresh,
    bench_visible_rows,
    bench_select_range,
    bench_common_parent
);
criterion_main!(benches);
