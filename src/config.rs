// Disk grid shape. The generator clamps radius and budget to >= 1.
pub const DISK_RADIUS: f32 = 500.0;
pub const TILE_BUDGET: usize = 900_000;
pub const BAD_TILE_RATE: f32 = 0.005;
pub const GRID_SEED: u64 = 12345;

pub const LOD_LEVELS: usize = 6;

pub const QUADTREE_MAX_DEPTH: u32 = 8;
pub const QUADTREE_MAX_ITEMS: usize = 10;

pub const ZOOM_MIN: f32 = 0.1;
pub const ZOOM_MAX: f32 = 10.0;

pub const PAN_SPEED: f32 = 0.25;
pub const PAN_LIMIT: f32 = 10_000.0;
pub const PAN_SMOOTHING: f32 = 0.2;

// World-space height of the view window at zoom 1; width scales by aspect.
pub const VIEW_WORLD_HEIGHT: f32 = 1000.0;

// Zoom -> base LOD curve (sub-linear so coarse levels dominate zoomed out),
// and the distance-to-center falloff shape applied per candidate.
pub const LEVEL_CURVE_EXP: f32 = 0.8;
pub const FALLOFF_RADIUS_FRAC: f32 = 0.8;
pub const FALLOFF_DROP_SCALE: f32 = 2.5;
pub const FALLOFF_DROP_EXP: f32 = 1.5;

pub const WORKER_THREADS: usize = 4;

// Instances per draw call, and the full-frame instance buffer capacity.
pub const INSTANCE_BATCH: usize = 8192;
pub const INSTANCE_CAPACITY: usize = 1 << 20;

// Keyboard pan rate in pixels per frame; wheel notch -> zoom factor step.
pub const KEY_PAN_PX: f32 = 8.0;
pub const WHEEL_ZOOM_STEP: f32 = 0.1;
