//! Dungeon data model
//!
//! Cell rectangles produced by the partitioner, the tiles of the floor grid,
//! per-room statistics, room graph edges and the wall segments handed to map export.

use serde::{Deserialize, Serialize};

use crate::tilemap::Tilemap;

/// Inclusive rectangle of grid cells (`x1 <= x2`, `y1 <= y2`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x1: usize,
    pub y1: usize,
    pub x2: usize,
    pub y2: usize,
}

impl Rect {
    pub fn new(x1: usize, y1: usize, x2: usize, y2: usize) -> Self {
        debug_assert!(x1 <= x2 && y1 <= y2);
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> usize {
        self.x2 - self.x1 + 1
    }

    pub fn height(&self) -> usize {
        self.y2 - self.y1 + 1
    }

    /// Number of cells covered.
    pub fn area(&self) -> usize {
        self.width() * self.height()
    }

    /// Pull every side inward by `margin` cells. `None` if nothing is left.
    pub fn shrink(&self, margin: usize) -> Option<Rect> {
        if self.x2 < self.x1 + 2 * margin || self.y2 < self.y1 + 2 * margin {
            return None;
        }
        Some(Rect::new(
            self.x1 + margin,
            self.y1 + margin,
            self.x2 - margin,
            self.y2 - margin,
        ))
    }
}

/// Display colour of a tile, interpreted by the renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorTag {
    #[default]
    Void,
    Floor,
}

/// Texture asset slot of a tile, interpreted by the renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternTag {
    #[default]
    Background,
    Flooring,
}

/// One grid cell. Room id 0 means the cell belongs to no room.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub room_id: u32,
    pub is_floor: bool,
    pub color: ColorTag,
    pub pattern: PatternTag,
}

impl Tile {
    /// Floor tile not yet assigned to a room.
    pub fn floor() -> Self {
        Self {
            room_id: 0,
            is_floor: true,
            color: ColorTag::Floor,
            pattern: PatternTag::Flooring,
        }
    }

    /// Turn this cell into floor owned by `room_id`. Cells that are already floor
    /// keep their room.
    pub fn carve(&mut self, room_id: u32) {
        if !self.is_floor {
            *self = Tile {
                room_id,
                ..Tile::floor()
            };
        }
    }
}

/// The tile grid that flows through the pipeline.
pub type Grid = Tilemap<Tile>;

/// Statistics of one labelled room.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RoomStats {
    pub id: u32,
    /// Number of floor cells
    pub size: usize,
    pub centroid_x: f64,
    pub centroid_y: f64,
    /// A cell known to belong to the room (last one met in the statistics scan)
    pub representative: (usize, usize),
}

impl RoomStats {
    pub fn distance_to(&self, other: &RoomStats) -> f64 {
        let dx = self.centroid_x - other.centroid_x;
        let dy = self.centroid_y - other.centroid_y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Undirected connection between two rooms.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Edge {
    pub a: u32,
    pub b: u32,
    /// Centroid-to-centroid distance
    pub distance: f64,
}

impl Edge {
    pub fn touches(&self, room: u32) -> bool {
        self.a == room || self.b == room
    }

    pub fn joins(&self, r1: u32, r2: u32) -> bool {
        (self.a == r1 && self.b == r2) || (self.a == r2 && self.b == r1)
    }

    /// The endpoint that is not `room`.
    pub fn other(&self, room: u32) -> u32 {
        if self.a == room {
            self.b
        } else {
            self.a
        }
    }
}

/// Grid-corner coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Orientation of a wall segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Vertical,
    Horizontal,
}

/// Axis-aligned wall between two grid corners, `p1` being the lower end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct WallSegment {
    pub p1: Point,
    pub p2: Point,
}

impl WallSegment {
    /// Vertical wall on corner column `x`, spanning `y1..y2`.
    pub fn vertical(x: usize, y1: usize, y2: usize) -> Self {
        Self {
            p1: Point::new(x, y1.min(y2)),
            p2: Point::new(x, y1.max(y2)),
        }
    }

    /// Horizontal wall on corner row `y`, spanning `x1..x2`.
    pub fn horizontal(y: usize, x1: usize, x2: usize) -> Self {
        Self {
            p1: Point::new(x1.min(x2), y),
            p2: Point::new(x1.max(x2), y),
        }
    }

    pub fn axis(&self) -> Axis {
        if self.p1.x == self.p2.x {
            Axis::Vertical
        } else {
            Axis::Horizontal
        }
    }

    /// Coordinate shared by both endpoints.
    pub fn fixed(&self) -> usize {
        match self.axis() {
            Axis::Vertical => self.p1.x,
            Axis::Horizontal => self.p1.y,
        }
    }

    /// `(low, high)` along the free axis.
    pub fn span(&self) -> (usize, usize) {
        match self.axis() {
            Axis::Vertical => (self.p1.y, self.p2.y),
            Axis::Horizontal => (self.p1.x, self.p2.x),
        }
    }

    pub fn length(&self) -> usize {
        let (lo, hi) = self.span();
        hi - lo
    }
}
