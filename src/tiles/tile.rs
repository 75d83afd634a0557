// src/tiles/tile.rs

pub const COLOR_GOOD: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
pub const COLOR_BAD: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

/// Integer lattice coordinate of a square cell at some level.
pub type CellKey = (i32, i32);

#[inline]
pub fn cell_key(x: f32, y: f32, side: f32) -> CellKey {
    ((x / side).floor() as i32, (y / side).floor() as i32)
}

#[derive(Clone, Copy, Debug)]
pub struct Tile {
    pub x: f32,
    pub y: f32,
    pub side: f32,
    pub color: [f32; 4],
    pub kind: TileKind,
}

#[derive(Clone, Copy, Debug)]
pub enum TileKind {
    /// Generator-produced tile at the finest level. `radial` is |pos|/R in
    /// [0, 1], `angle` is (atan2(y,x)+pi)/2pi in [0, 1).
    Leaf { radial: f32, angle: f32, bad: bool },
    /// Pre-merged summary tile owned by a pyramid level.
    Merged { members: MemberSpan },
}

/// Contiguous run in the owning level's member-index array. Member indices
/// refer to tiles of the next finer level (leaves for level L-2).
#[derive(Clone, Copy, Debug)]
pub struct MemberSpan {
    pub start: u32,
    pub len: u32,
}

impl Tile {
    #[inline]
    fn is_bad(&self) -> bool {
        matches!(self.kind, TileKind::Leaf { bad: true, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_key_floors_toward_negative() {
        assert_eq!(cell_key(0.5, 0.5, 1.0), (0, 0));
        assert_eq!(cell_key(-0.5, -0.5, 1.0), (-1, -1));
        assert_eq!(cell_key(-2.0, 3.0, 2.0), (-1, 1));
    }

    #[test]
    fn bad_flag_reads_through_the_kind() {
        let mut t = Tile {
            x: 0.0,
            y: 0.0,
            side: 1.0,
            color: COLOR_BAD,
            kind: TileKind::Leaf { radial: 0.0, angle: 0.0, bad: true },
        };
        assert!(t.is_bad());

        t.kind = TileKind::Leaf { radial: 0.0, angle: 0.0, bad: false };
        assert!(!t.is_bad());

        // merged tiles never carry the flag
        t.kind = TileKind::Merged { members: MemberSpan { start: 0, len: 1 } };
        assert!(!t.is_bad());
    }

    #[test]
    fn merged_cell_center_maps_back_to_its_own_cell() {
        // A tile merged into cell g sits at ((g+0.5)*s, ...); looking its
        // center up with the same cell size must return g again.
        for s in [1.0f32, 2.0, 8.0, 32.0] {
            for g in [-17i32, -1, 0, 1, 42] {
                let c = (g as f32 + 0.5) * s;
                assert_eq!(cell_key(c, c, s), (g, g), "s={s} g={g}");
            }
        }
    }
}
