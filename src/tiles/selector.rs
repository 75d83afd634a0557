// src/tiles/selector.rs
//
// Per-frame visible-tile selection:
// 1) derive a base LOD level from zoom,
// 2) pull candidate leaves from the quadtree with the view rectangle,
// 3) per candidate, drop the level by distance from the view center,
// 4) deduplicate by (level, cell) and resolve each cell in the pyramid,
//    falling through to finer levels when a cell or a whole level is
//    missing, and to the candidate leaf itself as the last resort.
//
// Scratch buffers persist across frames; a frame with no candidates just
// yields an empty slice.

use glam::Vec2;
use rustc_hash::FxHashSet as HashSet;

use super::quadtree::Rect;
use super::tile::{cell_key, CellKey};
use super::TileWorld;
use crate::config;
use crate::render::gpu_types::TileInstance;

/// World-space view rectangle for one frame.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Viewport {
    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(0.5 * (self.left + self.right), 0.5 * (self.bottom + self.top))
    }

    #[inline]
    pub fn as_rect(&self) -> Rect {
        let c = self.center();
        Rect::new(c.x, c.y, self.width(), self.height())
    }
}

/// Base level from zoom alone: sub-linear ramp over [ZOOM_MIN, ZOOM_MAX],
/// non-decreasing in zoom.
pub fn base_level(zoom: f32, level_count: usize) -> usize {
    let t = ((zoom - config::ZOOM_MIN) / (config::ZOOM_MAX - config::ZOOM_MIN)).clamp(0.0, 1.0);
    let u = t.powf(config::LEVEL_CURVE_EXP);
    let max = level_count - 1;
    ((u * max as f32).floor() as usize).min(max)
}

/// Levels to drop for a candidate `dist` away from the view center, with
/// `span` the larger viewport extent.
#[inline]
pub fn falloff_drop(dist: f32, span: f32) -> usize {
    let f = (dist / (config::FALLOFF_RADIUS_FRAC * span)).min(1.0);
    (config::FALLOFF_DROP_SCALE * f.powf(config::FALLOFF_DROP_EXP)).floor() as usize
}

pub struct Selector {
    candidates: Vec<u32>,
    emitted: HashSet<(u8, i32, i32)>,
    out: Vec<TileInstance>,
}

impl Selector {
    pub fn new() -> Self {
        Self {
            candidates: Vec::new(),
            emitted: HashSet::default(),
            out: Vec::new(),
        }
    }

    pub fn select(&mut self, world: &TileWorld, view: &Viewport, zoom: f32) -> &[TileInstance] {
        self.candidates.clear();
        self.emitted.clear();
        self.out.clear();

        let level_count = world.pyramid.level_count();
        let base = base_level(zoom, level_count);

        world.quadtree.query_range(&view.as_rect(), &mut self.candidates);

        let center = view.center();
        let span = view.width().max(view.height());

        for ci in 0..self.candidates.len() {
            let t = &world.leaves[self.candidates[ci] as usize];
            let dist = Vec2::new(t.x, t.y).distance(center);
            let target = base.saturating_sub(falloff_drop(dist, span));

            let key = cell_key(t.x, t.y, world.pyramid.side_for(target));
            let dedup = (target as u8, key.0, key.1);
            if self.emitted.contains(&dedup) {
                continue;
            }

            if let Some(m) = world.pyramid.tile_at(target, key, &world.leaves) {
                self.out.push(TileInstance::from_tile(m));
                self.emitted.insert(dedup);
            } else if target + 1 < level_count && self.emit_finer(world, target, key) {
                // The cell resolved one level (or more) finer. Its own key
                // stays unmarked so it never shadows a different cell; the
                // finer emissions were marked individually.
            } else {
                self.out.push(TileInstance::from_tile(t));
                self.emitted.insert(dedup);
            }
        }

        &self.out
    }

    /// Walk finer levels below `target`, emitting every tile found in the
    /// sub-cells of `key` at the first level that has any. Absent levels
    /// are skipped. Returns whether anything was found.
    fn emit_finer(&mut self, world: &TileWorld, target: usize, key: CellKey) -> bool {
        let level_count = world.pyramid.level_count();

        for finer in target + 1..level_count {
            if world.pyramid.level(finer).is_none() {
                continue;
            }

            let factor = 1i32 << (finer - target);
            let mut any = false;

            for sy in 0..factor {
                for sx in 0..factor {
                    let sub = (key.0 * factor + sx, key.1 * factor + sy);
                    let Some(t) = world.pyramid.tile_at(finer, sub, &world.leaves) else {
                        continue;
                    };
                    any = true;
                    if self.emitted.insert((finer as u8, sub.0, sub.1)) {
                        self.out.push(TileInstance::from_tile(t));
                    }
                }
            }

            if any {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::builder::build_world;
    use crate::tiles::generator::GridParams;

    fn test_world() -> TileWorld {
        build_world(&GridParams { radius: 80.0, budget: 20_000, bad_rate: 0.01, seed: 31 })
    }

    fn view(cx: f32, cy: f32, w: f32, h: f32) -> Viewport {
        Viewport {
            left: cx - 0.5 * w,
            right: cx + 0.5 * w,
            top: cy + 0.5 * h,
            bottom: cy - 0.5 * h,
        }
    }

    #[test]
    fn base_level_is_monotonic_in_zoom() {
        let mut prev = 0;
        let mut z = config::ZOOM_MIN;
        while z <= config::ZOOM_MAX {
            let l = base_level(z, config::LOD_LEVELS);
            assert!(l >= prev, "level dropped at zoom {z}");
            assert!(l < config::LOD_LEVELS);
            prev = l;
            z += 0.05;
        }
        assert_eq!(base_level(config::ZOOM_MIN, config::LOD_LEVELS), 0);
        assert_eq!(base_level(config::ZOOM_MAX, config::LOD_LEVELS), config::LOD_LEVELS - 1);
    }

    // Scenario: 800x600 canvas at zoom 1 -> span 1333.33. A tile at the
    // center drops nothing; a tile 500 away still drops nothing.
    #[test]
    fn falloff_keeps_base_level_near_center() {
        let span = 4.0 / 3.0 * 1000.0;
        assert_eq!(falloff_drop(0.0, span), 0);
        assert_eq!(falloff_drop(500.0, span), 0);
        // at the falloff radius the full drop applies
        assert_eq!(falloff_drop(span, span), 2);
    }

    #[test]
    fn no_two_emissions_share_a_cell() {
        let world = test_world();
        for (zoom, v) in [
            (0.1, view(0.0, 0.0, 2000.0, 1500.0)),
            (1.0, view(20.0, -30.0, 400.0, 300.0)),
            (6.0, view(0.0, 0.0, 220.0, 160.0)),
            (10.0, view(-50.0, 40.0, 130.0, 100.0)),
        ] {
            let mut sel = Selector::new();
            let out: Vec<TileInstance> = sel.select(&world, &v, zoom).to_vec();
            assert!(!out.is_empty());

            let mut seen = std::collections::HashSet::new();
            for inst in &out {
                // reconstruct the emission's own (level, cell) identity from
                // its side, which is unique per level
                let level = (0..world.pyramid.level_count())
                    .find(|&l| (world.pyramid.side_for(l) - inst.size).abs() < 1e-4)
                    .expect("emitted side matches some level");
                let key = cell_key(inst.pos[0], inst.pos[1], inst.size);
                assert!(seen.insert((level, key)), "duplicate cell at zoom {zoom}");
            }
        }
    }

    #[test]
    fn zoomed_out_frame_is_coarse_and_small() {
        let world = test_world();
        let mut sel = Selector::new();
        let out = sel.select(&world, &view(0.0, 0.0, 2000.0, 1500.0), config::ZOOM_MIN);
        // base level 0 -> side 32 cells over a 160-wide disk
        assert!(out.len() < 200, "{} instances", out.len());
        assert!(out.iter().all(|i| i.size >= world.pyramid.base_side()));
    }

    #[test]
    fn empty_viewport_yields_empty_frame() {
        let world = test_world();
        let mut sel = Selector::new();
        let out = sel.select(&world, &view(5000.0, 5000.0, 100.0, 100.0), 1.0);
        assert!(out.is_empty());
    }

    #[test]
    fn missing_level_falls_through_to_finer() {
        let mut world = test_world();
        let mut sel = Selector::new();
        let v = view(0.0, 0.0, 2000.0, 1500.0);

        let with_level = sel.select(&world, &v, config::ZOOM_MIN).len();
        assert!(with_level > 0);

        // Drop the coarsest level; the same frame must resolve one level
        // finer instead of going blank.
        world.pyramid.levels[0] = None;
        let without = sel.select(&world, &v, config::ZOOM_MIN).to_vec();
        assert!(!without.is_empty());
        let finer_side = world.pyramid.side_for(1);
        assert!(without.iter().all(|i| (i.size - finer_side).abs() < 1e-4 || i.size < finer_side));
        assert!(without.len() >= with_level);
    }

    #[test]
    fn selection_scratch_is_reusable() {
        let world = test_world();
        let mut sel = Selector::new();
        let a = sel.select(&world, &view(0.0, 0.0, 300.0, 200.0), 2.0).len();
        let b = sel.select(&world, &view(0.0, 0.0, 300.0, 200.0), 2.0).len();
        assert_eq!(a, b);
    }
}
