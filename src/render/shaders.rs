// src/render/shaders.rs
//
// Centralized shader sources.

pub const TILES_WGSL: &str = include_str!("../shaders/tiles.wgsl");
