//! Procedural dungeon generation
//!
//! Turns a handful of shape parameters and a random source into a tile grid of
//! rooms joined by corridors, plus the wall segments outlining the floor:
//!
//! 1. Partition the grid into room rectangles (BSP)
//! 2. Floor the rectangles and label connected regions as rooms
//! 3. Connect the rooms with a spanning tree plus extra edges for large rooms
//! 4. Carve a shortest corridor for every edge
//! 5. Trace and merge the floor boundary into walls

pub mod generation;
pub mod params;
pub mod types;
pub mod walls;

use log::{info, warn};
use rand::Rng;

use crate::error::DungeonError;
use generation::{
    bsp::partition_rooms,
    graph::{build_room_graph, is_graph_connected},
    hallways::carve_hallways,
    labeling::{count_floor_components, label_rooms},
};
use params::DungeonParams;
use types::{Edge, Grid, Rect, RoomStats, WallSegment};
use walls::extract_walls;

/// Result of one generation run
#[derive(Clone, Debug)]
pub struct Dungeon {
    /// Finished tile grid, `width x height`
    pub grid: Grid,
    /// Room rectangles picked by the partitioner, largest first
    pub rects: Vec<Rect>,
    /// `rooms[k]` describes room id `k + 1`
    pub rooms: Vec<RoomStats>,
    /// Room graph the corridors were carved from
    pub edges: Vec<Edge>,
    pub walls: Vec<WallSegment>,
    pub rooms_requested: usize,
}

impl Dungeon {
    pub fn width(&self) -> usize {
        self.grid.width
    }

    pub fn height(&self) -> usize {
        self.grid.height
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// The grid could not hold as many rooms as requested.
    pub fn is_short_of_rooms(&self) -> bool {
        self.rooms.len() < self.rooms_requested
    }

    /// All floor forms a single 4-connected region.
    pub fn is_connected(&self) -> bool {
        count_floor_components(&self.grid) <= 1
    }

    pub fn floor_tile_count(&self) -> usize {
        self.grid.iter().filter(|(_, _, tile)| tile.is_floor).count()
    }

    /// Floor tiles added by corridor carving.
    pub fn corridor_tile_count(&self) -> usize {
        let room_tiles: usize = self.rooms.iter().map(|room| room.size).sum();
        self.floor_tile_count() - room_tiles
    }
}

/// Run the whole pipeline.
///
/// Fails only on invalid parameters, before any grid is built; that includes a
/// padding so wide that no room is left. Getting fewer rooms than requested is
/// not an error; see [`Dungeon::is_short_of_rooms`].
pub fn generate_dungeon<R: Rng + ?Sized>(
    params: &DungeonParams,
    rng: &mut R,
) -> Result<Dungeon, DungeonError> {
    let rects = partition_rooms(params, rng)?;
    if rects.len() < params.room_count {
        warn!(
            "Only {} of {} requested rooms fit in a {}x{} grid",
            rects.len(),
            params.room_count,
            params.width,
            params.height
        );
    }

    let grid = Grid::new(params.width, params.height);
    let (grid, rooms) = label_rooms(grid, &rects);
    let edges = build_room_graph(&rooms);
    if !is_graph_connected(rooms.len(), &edges) {
        warn!("Room graph with {} rooms is not connected", rooms.len());
    }
    let grid = carve_hallways(grid, &rooms, &edges);
    let walls = extract_walls(&grid);

    let dungeon = Dungeon {
        grid,
        rects,
        rooms,
        edges,
        walls,
        rooms_requested: params.room_count,
    };

    info!(
        "Generated {}x{} dungeon: {} rooms, {} edges, {} corridor tiles, {} walls",
        dungeon.width(),
        dungeon.height(),
        dungeon.room_count(),
        dungeon.edges.len(),
        dungeon.corridor_tile_count(),
        dungeon.walls.len()
    );

    Ok(dungeon)
}
