//! Hallway carving
//!
//! For every room, floods a distance field from the room over the whole grid and
//! walks back from each connected room's closest cell, turning the walked cells
//! into corridor floor.

use std::collections::VecDeque;

use log::{debug, warn};

use crate::dungeon::types::{Edge, Grid, RoomStats};
use crate::tilemap::Tilemap;

const UNREACHED: u32 = u32::MAX;

/// Shortest distances from one room plus the closest cell of every other room.
struct RoomDistances {
    distances: Tilemap<u32>,
    /// Indexed by `room_id - 1`
    nearest: Vec<Option<(usize, usize)>>,
}

/// 0-1 breadth-first search from the room's representative cell.
///
/// Entering a cell of the source room costs nothing, any other cell costs one,
/// so distances measure how far a cell is from the nearest cell of the room.
/// Cells are settled in non-decreasing distance order; the first settled cell of
/// each other room is its closest one, ties going to discovery order.
fn search_from_room(grid: &Grid, source: &RoomStats, room_count: usize) -> RoomDistances {
    let mut distances = Tilemap::new_with(grid.width, grid.height, UNREACHED);
    let mut settled = Tilemap::new_with(grid.width, grid.height, false);
    let mut nearest = vec![None; room_count];

    let (sx, sy) = source.representative;
    distances.set(sx, sy, 0);
    let mut queue = VecDeque::from([(sx, sy)]);

    while let Some((x, y)) = queue.pop_front() {
        if *settled.get(x, y) {
            continue;
        }
        settled.set(x, y, true);

        let room_id = grid.get(x, y).room_id;
        if room_id != 0 && room_id != source.id {
            if let Some(slot) = nearest.get_mut((room_id - 1) as usize) {
                if slot.is_none() {
                    *slot = Some((x, y));
                }
            }
        }

        let distance = *distances.get(x, y);
        for (nx, ny) in grid.neighbors(x, y) {
            let free = grid.get(nx, ny).room_id == source.id;
            let next = if free { distance } else { distance + 1 };
            if next < *distances.get(nx, ny) {
                distances.set(nx, ny, next);
                if free {
                    queue.push_front((nx, ny));
                } else {
                    queue.push_back((nx, ny));
                }
            }
        }
    }

    RoomDistances { distances, nearest }
}

/// Walk downhill through the distance field from `start` until reaching the
/// source room, carving every non-floor cell on the way. Returns cells carved.
fn carve_path(
    grid: &mut Grid,
    distances: &Tilemap<u32>,
    start: (usize, usize),
    room_id: u32,
) -> usize {
    let (mut x, mut y) = start;
    let mut distance = *distances.get(x, y);
    let mut carved = 0;

    while distance > 0 && distance != UNREACHED {
        let step = distances
            .neighbors(x, y)
            .into_iter()
            .find(|&(nx, ny)| *distances.get(nx, ny) == distance - 1);

        let Some((nx, ny)) = step else {
            warn!("Corridor walk stuck at ({}, {}) with distance {}", x, y, distance);
            break;
        };

        let tile = grid.get_mut(nx, ny);
        if !tile.is_floor {
            tile.carve(room_id);
            carved += 1;
        }
        x = nx;
        y = ny;
        distance -= 1;
    }

    carved
}

/// Carve a shortest corridor for every edge.
///
/// Rooms are processed in id order; each edge is used once, by the pass of the
/// first of its endpoints to come up. Corridor cells take the id of the room
/// whose pass carved them.
pub fn carve_hallways(mut grid: Grid, rooms: &[RoomStats], edges: &[Edge]) -> Grid {
    let mut pending: Vec<Option<Edge>> = edges.iter().copied().map(Some).collect();
    let mut total_carved = 0;

    for room in rooms {
        let mut targets = Vec::new();
        for slot in pending.iter_mut() {
            if matches!(slot, Some(edge) if edge.touches(room.id)) {
                if let Some(edge) = slot.take() {
                    targets.push(edge.other(room.id));
                }
            }
        }
        if targets.is_empty() {
            continue;
        }

        let RoomDistances { distances, nearest } = search_from_room(&grid, room, rooms.len());

        for target in targets {
            let closest = nearest
                .get((target - 1) as usize)
                .copied()
                .flatten();
            match closest {
                Some(start) => {
                    total_carved += carve_path(&mut grid, &distances, start, room.id);
                }
                None => warn!("Room {} cannot reach room {}", room.id, target),
            }
        }
    }

    debug!("Carved {} corridor tiles for {} edges", total_carved, edges.len());
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::generation::graph::build_room_graph;
    use crate::dungeon::generation::labeling::{count_floor_components, label_rooms};
    use crate::dungeon::types::Rect;

    fn floor_count(grid: &Grid) -> usize {
        grid.iter().filter(|(_, _, t)| t.is_floor).count()
    }

    #[test]
    fn test_distances_are_zero_inside_source_room() {
        let (grid, rooms) = label_rooms(Grid::new(8, 3), &[Rect::new(0, 0, 2, 2)]);
        let field = search_from_room(&grid, &rooms[0], rooms.len());
        for y in 0..3 {
            for x in 0..3 {
                assert_eq!(*field.distances.get(x, y), 0);
            }
            for x in 3..8 {
                assert_eq!(*field.distances.get(x, y), (x - 2) as u32);
            }
        }
    }

    #[test]
    fn test_corridor_bridges_gap_exactly() {
        let rects = [Rect::new(1, 1, 3, 3), Rect::new(8, 1, 10, 3)];
        let (grid, rooms) = label_rooms(Grid::new(12, 5), &rects);
        let edges = build_room_graph(&rooms);
        assert_eq!(count_floor_components(&grid), 2);
        assert_eq!(floor_count(&grid), 18);

        let grid = carve_hallways(grid, &rooms, &edges);
        assert_eq!(count_floor_components(&grid), 1);
        // Gap is four cells wide
        assert_eq!(floor_count(&grid), 22);

        for x in 4..=7 {
            let column_floor: Vec<_> = (0..5).filter(|&y| grid.get(x, y).is_floor).collect();
            assert_eq!(column_floor.len(), 1);
            assert_eq!(grid.get(x, column_floor[0]).room_id, 1);
        }
    }

    #[test]
    fn test_corridor_through_other_room_keeps_its_id() {
        let rects = [Rect::new(1, 1, 2, 1), Rect::new(5, 1, 6, 1), Rect::new(9, 1, 10, 1)];
        let (grid, rooms) = label_rooms(Grid::new(12, 3), &rects);
        assert_eq!(rooms.len(), 3);

        let edges = [Edge {
            a: 1,
            b: 3,
            distance: rooms[0].distance_to(&rooms[2]),
        }];
        let grid = carve_hallways(grid, &rooms, &edges);

        assert_eq!(count_floor_components(&grid), 1);
        assert_eq!(grid.get(5, 1).room_id, 2);
        assert_eq!(grid.get(6, 1).room_id, 2);
        for x in [3, 4, 7, 8] {
            assert!(grid.get(x, 1).is_floor);
            assert_eq!(grid.get(x, 1).room_id, 1);
        }
    }

    #[test]
    fn test_tied_corridors_follow_neighbor_order() {
        // Opposite corners of a 3x3 grid: the walk back from the top-right room
        // prefers -x over +y, so it runs along the top row and down the left column
        let rects = [Rect::new(0, 2, 0, 2), Rect::new(2, 0, 2, 0)];
        let (grid, rooms) = label_rooms(Grid::new(3, 3), &rects);
        assert_eq!(grid.get(0, 2).room_id, 1);
        assert_eq!(grid.get(2, 0).room_id, 2);

        let edges = build_room_graph(&rooms);
        let grid = carve_hallways(grid, &rooms, &edges);

        for (x, y) in [(1, 0), (0, 0), (0, 1)] {
            assert!(grid.get(x, y).is_floor, "({}, {}) should be carved", x, y);
            assert_eq!(grid.get(x, y).room_id, 1);
        }
        for (x, y) in [(1, 1), (2, 1), (2, 2), (1, 2)] {
            assert!(!grid.get(x, y).is_floor, "({}, {}) should stay solid", x, y);
        }
        assert_eq!(floor_count(&grid), 5);
    }

    #[test]
    fn test_no_edges_no_carving() {
        let (grid, rooms) = label_rooms(Grid::new(10, 10), &[Rect::new(2, 2, 6, 6)]);
        let before = grid.clone();
        let edges = build_room_graph(&rooms);
        let grid = carve_hallways(grid, &rooms, &edges);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_many_rooms_end_up_connected() {
        let rects = [
            Rect::new(1, 1, 4, 4),
            Rect::new(10, 2, 14, 5),
            Rect::new(20, 1, 23, 8),
            Rect::new(2, 12, 8, 16),
            Rect::new(15, 14, 18, 18),
            Rect::new(22, 15, 26, 18),
        ];
        let (grid, rooms) = label_rooms(Grid::new(28, 20), &rects);
        let edges = build_room_graph(&rooms);
        let grid = carve_hallways(grid, &rooms, &edges);

        assert_eq!(count_floor_components(&grid), 1);
        let room_count = rooms.len() as u32;
        for (_, _, tile) in grid.iter() {
            if tile.is_floor {
                assert!(tile.room_id >= 1 && tile.room_id <= room_count);
            }
        }
    }
}
