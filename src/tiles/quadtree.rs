// src/tiles/quadtree.rs
//
// Region quadtree over tile centers. Nodes live in a flat arena and refer
// to their four children by a contiguous base index, so the build allocates
// nothing per node beyond bucket storage. Bounds are half-open in both axes
// (x in [cx - w/2, cx + w/2)), which gives every in-bounds point exactly
// one owning child; ties on a split line go to the higher-coordinate child.
//
// Built once at startup, never mutated afterwards.

use crate::config;

pub const NO_CHILD: u32 = u32::MAX;

/// Axis-aligned rectangle described by center and extent.
#[derive(Clone, Copy, Debug)]
pub struct Rect {
    pub cx: f32,
    pub cy: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self { cx, cy, w, h }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.cx - 0.5 * self.w
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.cx + 0.5 * self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.cy - 0.5 * self.h
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.cy + 0.5 * self.h
    }

    /// Half-open ownership test.
    #[inline]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left() && x < self.right() && y >= self.bottom() && y < self.top()
    }

    /// Closed overlap test (touching edges count).
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.right() < other.left()
            || self.left() > other.right()
            || self.top() < other.bottom()
            || self.bottom() > other.top())
    }
}

/// One indexed tile as the tree sees it: center plus bounding-square side.
#[derive(Clone, Copy, Debug)]
pub struct QuadItem {
    pub index: u32,
    pub x: f32,
    pub y: f32,
    pub side: f32,
}

impl QuadItem {
    #[inline]
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.side, self.side)
    }
}

struct Node {
    bounds: Rect,
    depth: u32,
    child_base: u32,
    bucket: Vec<QuadItem>,
}

pub struct Quadtree {
    nodes: Vec<Node>,
    len: usize,
}

impl Quadtree {
    pub fn new(bounds: Rect) -> Self {
        Self {
            nodes: vec![Node {
                bounds,
                depth: 0,
                child_base: NO_CHILD,
                bucket: Vec::new(),
            }],
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn insert(&mut self, item: QuadItem) {
        let mut ni = 0usize;
        loop {
            if self.nodes[ni].child_base != NO_CHILD {
                match self.child_containing(ni, item.x, item.y) {
                    Some(c) => {
                        ni = c;
                        continue;
                    }
                    // Center outside this node's bounds (only possible at
                    // the root): hold it here so it is still reported.
                    None => {
                        self.nodes[ni].bucket.push(item);
                        break;
                    }
                }
            }

            self.nodes[ni].bucket.push(item);
            if self.nodes[ni].bucket.len() > config::QUADTREE_MAX_ITEMS
                && self.nodes[ni].depth < config::QUADTREE_MAX_DEPTH
            {
                self.subdivide(ni);
            }
            break;
        }
        self.len += 1;
    }

    /// Collect indices of all items whose bounding square intersects `rect`.
    pub fn query_range(&self, rect: &Rect, out: &mut Vec<u32>) {
        self.query_node(0, rect, out);
    }

    fn query_node(&self, ni: usize, rect: &Rect, out: &mut Vec<u32>) {
        let n = &self.nodes[ni];
        for it in &n.bucket {
            if it.bounds().intersects(rect) {
                out.push(it.index);
            }
        }
        if n.child_base != NO_CHILD {
            for c in 0..4 {
                let ci = n.child_base as usize + c;
                if self.nodes[ci].bounds.intersects(rect) {
                    self.query_node(ci, rect, out);
                }
            }
        }
    }

    /// Collect indices of all items whose bounding square contains (x, y).
    pub fn query_point(&self, x: f32, y: f32, out: &mut Vec<u32>) {
        self.point_node(0, x, y, out);
    }

    fn point_node(&self, ni: usize, x: f32, y: f32, out: &mut Vec<u32>) {
        let n = &self.nodes[ni];
        for it in &n.bucket {
            if (x - it.x).abs() <= 0.5 * it.side && (y - it.y).abs() <= 0.5 * it.side {
                out.push(it.index);
            }
        }
        if n.child_base != NO_CHILD {
            // Closed containment here: a point on a split line can be
            // covered by tiles owned by either side.
            for c in 0..4 {
                let ci = n.child_base as usize + c;
                let b = &self.nodes[ci].bounds;
                if x >= b.left() && x <= b.right() && y >= b.bottom() && y <= b.top() {
                    self.point_node(ci, x, y, out);
                }
            }
        }
    }

    #[inline]
    fn child_containing(&self, ni: usize, x: f32, y: f32) -> Option<usize> {
        let n = &self.nodes[ni];
        if n.child_base == NO_CHILD || !n.bounds.contains(x, y) {
            return None;
        }
        let east = (x >= n.bounds.cx) as usize;
        let north = (y >= n.bounds.cy) as usize;
        Some(n.child_base as usize + (east | (north << 1)))
    }

    fn subdivide(&mut self, ni: usize) {
        let Rect { cx, cy, w, h } = self.nodes[ni].bounds;
        let depth = self.nodes[ni].depth;
        let base = self.nodes.len() as u32;

        // Child order matches child_containing: east bit 0, north bit 1.
        for (ox, oy) in [(-0.25, -0.25), (0.25, -0.25), (-0.25, 0.25), (0.25, 0.25)] {
            self.nodes.push(Node {
                bounds: Rect::new(cx + ox * w, cy + oy * h, 0.5 * w, 0.5 * h),
                depth: depth + 1,
                child_base: NO_CHILD,
                bucket: Vec::new(),
            });
        }
        self.nodes[ni].child_base = base;

        let held = std::mem::take(&mut self.nodes[ni].bucket);
        for it in held {
            match self.child_containing(ni, it.x, it.y) {
                Some(c) => {
                    self.nodes[c].bucket.push(it);
                    if self.nodes[c].bucket.len() > config::QUADTREE_MAX_ITEMS
                        && self.nodes[c].depth < config::QUADTREE_MAX_DEPTH
                    {
                        self.subdivide(c);
                    }
                }
                None => self.nodes[ni].bucket.push(it),
            }
        }
    }
}
