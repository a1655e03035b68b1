//! Room labeling
//!
//! Marks room rectangles as floor, then assigns every 4-connected floor region its
//! own room id. Touching or overlapping rectangles merge into one room.

use log::debug;

use crate::dungeon::types::{Grid, Rect, RoomStats, Tile};
use crate::tilemap::Tilemap;

/// Floor the rectangles, label connected floor regions `1..=R` and compute
/// per-room statistics. `stats[k]` describes room `k + 1`.
pub fn label_rooms(mut grid: Grid, rooms: &[Rect]) -> (Grid, Vec<RoomStats>) {
    for room in rooms {
        for y in room.y1..=room.y2 {
            for x in room.x1..=room.x2 {
                if grid.in_bounds(x, y) {
                    grid.set(x, y, Tile::floor());
                }
            }
        }
    }

    // Depth-first flood from each unlabeled floor cell, scanning column by column
    let mut room_count = 0u32;
    let mut stack = Vec::new();
    for x in 0..grid.width {
        for y in 0..grid.height {
            let tile = grid.get(x, y);
            if !tile.is_floor || tile.room_id != 0 {
                continue;
            }

            room_count += 1;
            grid.get_mut(x, y).room_id = room_count;
            stack.push((x, y));

            while let Some((cx, cy)) = stack.pop() {
                for (nx, ny) in grid.neighbors(cx, cy) {
                    let neighbor = grid.get_mut(nx, ny);
                    if neighbor.is_floor && neighbor.room_id == 0 {
                        neighbor.room_id = room_count;
                        stack.push((nx, ny));
                    }
                }
            }
        }
    }

    let stats = compute_room_stats(&grid, room_count);
    debug!(
        "Labeled {} rooms from {} rectangles",
        stats.len(),
        rooms.len()
    );

    (grid, stats)
}

/// Size, centroid and a representative cell for each room id `1..=room_count`.
fn compute_room_stats(grid: &Grid, room_count: u32) -> Vec<RoomStats> {
    let mut sizes = vec![0usize; room_count as usize];
    let mut sum_x = vec![0usize; room_count as usize];
    let mut sum_y = vec![0usize; room_count as usize];
    let mut representative = vec![(0usize, 0usize); room_count as usize];

    for x in 0..grid.width {
        for y in 0..grid.height {
            let room_id = grid.get(x, y).room_id;
            if room_id == 0 {
                continue;
            }
            let idx = (room_id - 1) as usize;
            sizes[idx] += 1;
            sum_x[idx] += x;
            sum_y[idx] += y;
            representative[idx] = (x, y);
        }
    }

    (0..room_count as usize)
        .map(|idx| RoomStats {
            id: idx as u32 + 1,
            size: sizes[idx],
            centroid_x: sum_x[idx] as f64 / sizes[idx] as f64,
            centroid_y: sum_y[idx] as f64 / sizes[idx] as f64,
            representative: representative[idx],
        })
        .collect()
}

/// Number of 4-connected floor regions, ignoring room ids.
///
/// A finished dungeon should have exactly one.
pub fn count_floor_components(grid: &Grid) -> usize {
    let mut visited = Tilemap::new_with(grid.width, grid.height, false);
    let mut components = 0;
    let mut stack = Vec::new();

    for (x, y, tile) in grid.iter() {
        if !tile.is_floor || *visited.get(x, y) {
            continue;
        }
        components += 1;
        visited.set(x, y, true);
        stack.push((x, y));

        while let Some((cx, cy)) = stack.pop() {
            for (nx, ny) in grid.neighbors(cx, cy) {
                if grid.get(nx, ny).is_floor && !*visited.get(nx, ny) {
                    visited.set(nx, ny, true);
                    stack.push((nx, ny));
                }
            }
        }
    }

    components
}
