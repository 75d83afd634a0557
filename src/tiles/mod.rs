// src/tiles/mod.rs
pub mod builder;
pub mod generator;
pub mod pyramid;
pub mod quadtree;
pub mod selector;
pub mod tile;

pub use tile::{cell_key, CellKey, MemberSpan, Tile, TileKind};

/// The static tile dataset, built once at startup. The leaf vector owns
/// every generated tile; quadtree buckets and pyramid slots refer to leaves
/// by index.
pub struct TileWorld {
    pub leaves: Vec<Tile>,
    pub quadtree: quadtree::Quadtree,
    pub pyramid: pyramid::Pyramid,
}
