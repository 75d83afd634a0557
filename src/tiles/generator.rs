// src/tiles/generator.rs
//
// Disk grid generation. Tiles sit on a regular square lattice centered on
// the origin; a cell is emitted iff its center lies inside the disk. The
// tile side is chosen so the disk-covered cell count stays within the
// budget. Rows generate in parallel; each row re-derives its RNG from the
// injected seed, so the seed is the only source of randomness.

use std::f32::consts::{PI, TAU};

use rand::{rngs::SmallRng, Rng, SeedableRng};
use rayon::prelude::*;

use super::tile::{Tile, TileKind, COLOR_BAD, COLOR_GOOD};
use crate::config;

#[derive(Clone, Copy, Debug)]
pub struct GridParams {
    pub radius: f32,
    pub budget: usize,
    pub bad_rate: f32,
    pub seed: u64,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            radius: config::DISK_RADIUS,
            budget: config::TILE_BUDGET,
            bad_rate: config::BAD_TILE_RATE,
            seed: config::GRID_SEED,
        }
    }
}

impl GridParams {
    /// Side length meeting the tile budget: max(1, sqrt(pi R^2 / B)).
    pub fn tile_side(&self) -> f32 {
        let r = self.radius.max(1.0);
        let b = self.budget.max(1) as f32;
        (PI * r * r / b).sqrt().max(1.0)
    }
}

fn row_rng(seed: u64, row: i32) -> SmallRng {
    SmallRng::seed_from_u64(seed ^ (row as i64 as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Emit the leaf tile set for `params`.
pub fn generate(params: &GridParams) -> Vec<Tile> {
    let r = params.radius.max(1.0);
    let s = params.tile_side();
    let half = (r / s).ceil() as i32;

    let rows: Vec<Vec<Tile>> = (-half..half)
        .into_par_iter()
        .map(|j| {
            let mut rng = row_rng(params.seed, j);
            let cy = (j as f32 + 0.5) * s;
            let mut row = Vec::new();

            for i in -half..half {
                let cx = (i as f32 + 0.5) * s;
                let dist = (cx * cx + cy * cy).sqrt();
                if dist > r {
                    continue;
                }

                let bad = rng.gen::<f32>() < params.bad_rate;

                // atan2 on the negative x axis lands exactly on 1.0; wrap
                // so the angle stays in [0, 1).
                let mut angle = (cy.atan2(cx) + PI) / TAU;
                if angle >= 1.0 {
                    angle -= 1.0;
                }

                row.push(Tile {
                    x: cx,
                    y: cy,
                    side: s,
                    color: if bad { COLOR_BAD } else { COLOR_GOOD },
                    kind: TileKind::Leaf {
                        radial: dist / r,
                        angle,
                        bad,
                    },
                });
            }
            row
        })
        .collect();

    rows.into_iter().flatten().collect()
}
