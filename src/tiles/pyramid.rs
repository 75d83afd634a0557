// src/tiles/pyramid.rs
//
// Pre-merged LOD levels. Slot L-1 indexes the leaf array by cell key; each
// coarser slot k owns merged tiles for cells of side s_k = s0 * 2^(L-1-k).
// A merged tile's members point at tiles of the next finer level, so the
// member counts at level k sum to the tile count of level k+1.
//
// Built once after generation; a slot may be absent (the selector falls
// through to the next finer level).

use rayon::prelude::*;
use rustc_hash::FxHashMap as HashMap;

use super::tile::{cell_key, CellKey, MemberSpan, Tile, TileKind};

/// One merged level. For the leaf slot `tiles` is empty and `by_cell`
/// values index the shared leaf array instead.
pub struct Level {
    pub side: f32,
    pub tiles: Vec<Tile>,
    pub members: Vec<u32>,
    pub by_cell: HashMap<CellKey, u32>,
}

pub struct Pyramid {
    pub(crate) levels: Vec<Option<Level>>,
    base_side: f32,
}

impl Pyramid {
    /// Build all levels, coarsest at index 0, from the finest down.
    pub fn build(leaves: &[Tile], level_count: usize, base_side: f32) -> Self {
        assert!(level_count >= 1);

        let mut levels: Vec<Option<Level>> = Vec::with_capacity(level_count);
        levels.resize_with(level_count, || None);

        let mut by_cell = HashMap::default();
        for (i, t) in leaves.iter().enumerate() {
            by_cell.insert(cell_key(t.x, t.y, base_side), i as u32);
        }
        levels[level_count - 1] = Some(Level {
            side: base_side,
            tiles: Vec::new(),
            members: Vec::new(),
            by_cell,
        });

        for k in (0..level_count - 1).rev() {
            let side = base_side * (1u32 << (level_count - 1 - k)) as f32;
            let built = {
                let source: &[Tile] = if k + 1 == level_count - 1 {
                    leaves
                } else {
                    &levels[k + 1].as_ref().expect("finer level built first").tiles
                };
                build_level(source, side)
            };
            levels[k] = Some(built);
        }

        Self { levels, base_side }
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn base_side(&self) -> f32 {
        self.base_side
    }

    /// Cell side at `level` (level_count-1 is the leaf side).
    #[inline]
    pub fn side_for(&self, level: usize) -> f32 {
        self.base_side * (1u32 << (self.levels.len() - 1 - level)) as f32
    }

    pub fn level(&self, level: usize) -> Option<&Level> {
        self.levels.get(level)?.as_ref()
    }

    /// Resolve the tile stored for `key` at `level`; the leaf slot resolves
    /// through `leaves`.
    pub fn tile_at<'a>(&'a self, level: usize, key: CellKey, leaves: &'a [Tile]) -> Option<&'a Tile> {
        let lv = self.levels.get(level)?.as_ref()?;
        let &i = lv.by_cell.get(&key)?;
        if level + 1 == self.levels.len() {
            leaves.get(i as usize)
        } else {
            lv.tiles.get(i as usize)
        }
    }
}

fn build_level(source: &[Tile], side: f32) -> Level {
    let mut cells: HashMap<CellKey, Vec<u32>> = HashMap::default();
    for (i, t) in source.iter().enumerate() {
        cells.entry(cell_key(t.x, t.y, side)).or_default().push(i as u32);
    }

    // Sorted key order keeps the build deterministic across runs.
    let mut keys: Vec<CellKey> = cells.keys().copied().collect();
    keys.sort_unstable();

    let merged: Vec<Tile> = keys
        .par_iter()
        .map(|key| {
            let idxs = &cells[key];
            let inv = 1.0 / idxs.len() as f32;
            let mut color = [0.0f32; 4];
            for &i in idxs {
                let c = source[i as usize].color;
                for ch in 0..4 {
                    color[ch] += c[ch];
                }
            }
            for ch in color.iter_mut() {
                *ch *= inv;
            }
            Tile {
                x: (key.0 as f32 + 0.5) * side,
                y: (key.1 as f32 + 0.5) * side,
                side,
                color,
                // span patched once the member array is assembled
                kind: TileKind::Merged { members: MemberSpan { start: 0, len: 0 } },
            }
        })
        .collect();

    let mut tiles = Vec::with_capacity(merged.len());
    let mut members = Vec::with_capacity(source.len());
    let mut by_cell = HashMap::default();

    for (key, mut tile) in keys.into_iter().zip(merged) {
        let idxs = &cells[&key];
        let start = members.len() as u32;
        members.extend_from_slice(idxs);
        tile.kind = TileKind::Merged {
            members: MemberSpan { start, len: idxs.len() as u32 },
        };
        by_cell.insert(key, tiles.len() as u32);
        tiles.push(tile);
    }

    Level { side, tiles, members, by_cell }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::generator::{generate, GridParams};
    use crate::tiles::tile::{COLOR_BAD, COLOR_GOOD};

    fn small_world() -> (Vec<Tile>, Pyramid) {
        let params = GridParams { radius: 60.0, budget: 12_000, bad_rate: 0.05, seed: 17 };
        let leaves = generate(&params);
        let side = params.tile_side();
        let pyramid = Pyramid::build(&leaves, 6, side);
        (leaves, pyramid)
    }

    fn member_span(t: &Tile) -> MemberSpan {
        match t.kind {
            TileKind::Merged { members } => members,
            TileKind::Leaf { .. } => panic!("expected a merged tile"),
        }
    }

    #[test]
    fn member_counts_conserve_the_finer_level() {
        let (leaves, pyramid) = small_world();
        for k in 0..pyramid.level_count() - 1 {
            let lv = pyramid.level(k).unwrap();
            let finer_count = if k + 2 == pyramid.level_count() {
                leaves.len()
            } else {
                pyramid.level(k + 1).unwrap().tiles.len()
            };
            let total: usize = lv.tiles.iter().map(|t| member_span(t).len as usize).sum();
            assert_eq!(total, finer_count, "level {k}");
            assert_eq!(lv.members.len(), finer_count, "level {k}");
        }
    }

    #[test]
    fn every_finer_tile_appears_exactly_once_in_members() {
        let (leaves, pyramid) = small_world();
        let lv = pyramid.level(pyramid.level_count() - 2).unwrap();
        let mut seen = vec![false; leaves.len()];
        for &m in &lv.members {
            assert!(!seen[m as usize], "leaf {m} merged twice");
            seen[m as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn merged_colors_stay_within_member_extremes() {
        let (leaves, pyramid) = small_world();
        for k in 0..pyramid.level_count() - 1 {
            let lv = pyramid.level(k).unwrap();
            let source: &[Tile] = if k + 2 == pyramid.level_count() {
                &leaves
            } else {
                &pyramid.level(k + 1).unwrap().tiles
            };
            for t in &lv.tiles {
                let span = member_span(t);
                let idxs = &lv.members[span.start as usize..(span.start + span.len) as usize];
                for ch in 0..4 {
                    let lo = idxs.iter().map(|&i| source[i as usize].color[ch]).fold(f32::MAX, f32::min);
                    let hi = idxs.iter().map(|&i| source[i as usize].color[ch]).fold(f32::MIN, f32::max);
                    assert!(t.color[ch] >= lo - 1e-4 && t.color[ch] <= hi + 1e-4);
                }
            }
        }
    }

    #[test]
    fn merged_tiles_sit_on_their_cell_centers() {
        let (leaves, pyramid) = small_world();
        for k in 0..pyramid.level_count() - 1 {
            let lv = pyramid.level(k).unwrap();
            for t in &lv.tiles {
                let key = cell_key(t.x, t.y, lv.side);
                // lookup by the tile's own center returns the tile itself
                let found = pyramid.tile_at(k, key, &leaves).unwrap();
                assert_eq!((found.x, found.y), (t.x, t.y));
                assert_eq!(t.side, lv.side);
            }
        }
    }

    // Scenario: L=6, s0=1; a 10x10 leaf block merges into 25 level-4 tiles
    // (side 2) covering the same region.
    #[test]
    fn ten_by_ten_block_merges_to_twenty_five() {
        let mut leaves = Vec::new();
        for j in 0..10 {
            for i in 0..10 {
                leaves.push(Tile {
                    x: i as f32 + 0.5,
                    y: j as f32 + 0.5,
                    side: 1.0,
                    color: COLOR_GOOD,
                    kind: TileKind::Leaf { radial: 0.0, angle: 0.0, bad: false },
                });
            }
        }
        let pyramid = Pyramid::build(&leaves, 6, 1.0);

        let l4 = pyramid.level(4).unwrap();
        assert_eq!(l4.side, 2.0);
        assert_eq!(l4.tiles.len(), 25);

        let l0 = pyramid.level(0).unwrap();
        assert_eq!(l0.side, 32.0);
        assert_eq!(l0.tiles.len(), 1);
    }

    #[test]
    fn mean_color_of_mixed_cell() {
        // Three good tiles and one bad tile in a single level-4 cell.
        let coords = [(0.5, 0.5), (1.5, 0.5), (0.5, 1.5), (1.5, 1.5)];
        let leaves: Vec<Tile> = coords
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Tile {
                x,
                y,
                side: 1.0,
                color: if i == 0 { COLOR_BAD } else { COLOR_GOOD },
                kind: TileKind::Leaf { radial: 0.0, angle: 0.0, bad: i == 0 },
            })
            .collect();
        let pyramid = Pyramid::build(&leaves, 6, 1.0);

        let l4 = pyramid.level(4).unwrap();
        assert_eq!(l4.tiles.len(), 1);
        let c = l4.tiles[0].color;
        assert!((c[0] - 1.0).abs() < 1e-6);
        assert!((c[1] - 0.75).abs() < 1e-6);
        assert!((c[2] - 0.75).abs() < 1e-6);
        assert!((c[3] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn leaf_slot_resolves_through_the_leaf_array() {
        let (leaves, pyramid) = small_world();
        let leaf_level = pyramid.level_count() - 1;
        let t = &leaves[0];
        let key = cell_key(t.x, t.y, pyramid.base_side());
        let found = pyramid.tile_at(leaf_level, key, &leaves).unwrap();
        assert_eq!((found.x, found.y), (t.x, t.y));
    }
}
