// src/tiles/builder.rs
//
// One-time background build of the tile world. The spawned thread runs
// generation, quadtree indexing and pyramid merging on a dedicated rayon
// pool and ships the result over a bounded channel; the main loop polls
// with try_recv and renders a clear background until it arrives.

use std::time::Instant;

use crossbeam_channel::{bounded, Receiver};
use once_cell::sync::Lazy;
use rayon::{ThreadPool, ThreadPoolBuilder};

use super::generator::{self, GridParams};
use super::pyramid::Pyramid;
use super::quadtree::{QuadItem, Quadtree, Rect};
use super::TileWorld;
use crate::config;

static BUILD_POOL: Lazy<ThreadPool> = Lazy::new(|| {
    ThreadPoolBuilder::new()
        .num_threads(config::WORKER_THREADS)
        .thread_name(|i| format!("tile-build-{}", i))
        .build()
        .expect("failed to build tile build thread pool")
});

pub fn spawn_build(params: GridParams) -> Receiver<TileWorld> {
    let (tx, rx) = bounded::<TileWorld>(1);

    std::thread::spawn(move || {
        let t0 = Instant::now();
        let world = BUILD_POOL.install(|| build_world(&params));
        log::info!(
            "tile world ready: {} leaves, {} quadtree nodes, {} LOD levels in {:.0} ms",
            world.leaves.len(),
            world.quadtree.node_count(),
            world.pyramid.level_count(),
            t0.elapsed().as_secs_f64() * 1000.0,
        );
        let _ = tx.send(world);
    });

    rx
}

pub fn build_world(params: &GridParams) -> TileWorld {
    let leaves = generator::generate(params);
    let side = params.tile_side();

    // Root bounds pad the disk by one tile so every center is in-bounds.
    let extent = 2.0 * (params.radius.max(1.0) + side);
    let mut quadtree = Quadtree::new(Rect::new(0.0, 0.0, extent, extent));
    for (i, t) in leaves.iter().enumerate() {
        quadtree.insert(QuadItem { index: i as u32, x: t.x, y: t.y, side: t.side });
    }

    let pyramid = Pyramid::build(&leaves, config::LOD_LEVELS, side);

    TileWorld { leaves, quadtree, pyramid }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_world_is_consistent() {
        let params = GridParams { radius: 40.0, budget: 4_000, bad_rate: 0.0, seed: 2 };
        let world = build_world(&params);

        assert_eq!(world.quadtree.len(), world.leaves.len());
        assert_eq!(world.pyramid.level_count(), config::LOD_LEVELS);
        assert_eq!(world.pyramid.base_side(), params.tile_side());

        // the whole disk comes back out of the index
        let mut out = Vec::new();
        world.quadtree.query_range(&Rect::new(0.0, 0.0, 200.0, 200.0), &mut out);
        assert_eq!(out.len(), world.leaves.len());
    }

    #[test]
    fn background_build_delivers_once() {
        let rx = spawn_build(GridParams { radius: 20.0, budget: 1_000, bad_rate: 0.0, seed: 8 });
        let world = rx.recv().expect("builder thread died");
        assert!(!world.leaves.is_empty());
        assert!(rx.try_recv().is_err());
    }
}
