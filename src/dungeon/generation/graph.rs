//! Room connectivity graph
//!
//! Builds a minimum spanning tree over room centroids with Prim's algorithm, then
//! gives every above-average room one extra connection to its nearest room it is
//! not yet joined to.

use log::debug;

use crate::dungeon::types::{Edge, RoomStats};

/// Symmetric centroid-distance matrix, indexed by `room_id - 1`.
fn distance_matrix(rooms: &[RoomStats]) -> Vec<Vec<f64>> {
    let n = rooms.len();
    let mut distances = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in i + 1..n {
            let d = rooms[i].distance_to(&rooms[j]);
            distances[i][j] = d;
            distances[j][i] = d;
        }
    }
    distances
}

/// Prim's algorithm from room 1 over the dense distance matrix.
///
/// Runs until every room is in the tree. Ties go to the earliest visited
/// source and then the lowest destination id.
fn minimum_spanning_tree(rooms: &[RoomStats], distances: &[Vec<f64>]) -> Vec<Edge> {
    let n = rooms.len();
    if n < 2 {
        return Vec::new();
    }

    let mut in_tree = vec![false; n];
    let mut visited = vec![0usize];
    in_tree[0] = true;
    let mut edges = Vec::with_capacity(n - 1);

    while visited.len() < n {
        let mut best: Option<(usize, usize, f64)> = None;
        for &from in &visited {
            for to in 0..n {
                if in_tree[to] {
                    continue;
                }
                let d = distances[from][to];
                if best.map_or(true, |(_, _, best_d)| d < best_d) {
                    best = Some((from, to, d));
                }
            }
        }

        let Some((from, to, distance)) = best else {
            break;
        };
        in_tree[to] = true;
        visited.push(to);
        edges.push(Edge {
            a: rooms[from].id,
            b: rooms[to].id,
            distance,
        });
    }

    edges
}

/// Give each room larger than the average an edge to its nearest room it has no
/// edge to yet. Edges added here count for later rooms' checks.
fn augment_large_rooms(rooms: &[RoomStats], distances: &[Vec<f64>], edges: &mut Vec<Edge>) {
    if rooms.is_empty() {
        return;
    }
    let average = rooms.iter().map(|r| r.size as f64).sum::<f64>() / rooms.len() as f64;

    let mut added = 0;
    for (i, room) in rooms.iter().enumerate() {
        if room.size as f64 <= average {
            continue;
        }

        let mut nearest: Option<(usize, f64)> = None;
        for (j, other) in rooms.iter().enumerate() {
            if i == j || edges.iter().any(|e| e.joins(room.id, other.id)) {
                continue;
            }
            let d = distances[i][j];
            if nearest.map_or(true, |(_, best_d)| d < best_d) {
                nearest = Some((j, d));
            }
        }

        // Already joined to every other room
        if let Some((j, distance)) = nearest {
            edges.push(Edge {
                a: room.id,
                b: rooms[j].id,
                distance,
            });
            added += 1;
        }
    }

    debug!("Added {} extra edges for rooms above {:.1} cells", added, average);
}

/// Build the edge set the hallway carver connects: MST plus large-room extras.
///
/// `rooms[k]` must describe room `k + 1`.
pub fn build_room_graph(rooms: &[RoomStats]) -> Vec<Edge> {
    let distances = distance_matrix(rooms);
    let mut edges = minimum_spanning_tree(rooms, &distances);
    let tree_edges = edges.len();
    augment_large_rooms(rooms, &distances, &mut edges);

    debug!(
        "Room graph: {} rooms, {} tree edges, {} total edges",
        rooms.len(),
        tree_edges,
        edges.len()
    );
    edges
}

/// Whether the edges join all `room_count` rooms into one component.
pub fn is_graph_connected(room_count: usize, edges: &[Edge]) -> bool {
    if room_count <= 1 {
        return true;
    }
    let mut reached = vec![false; room_count];
    let mut stack = vec![1u32];
    reached[0] = true;

    while let Some(room) = stack.pop() {
        for edge in edges.iter().filter(|e| e.touches(room)) {
            let other = edge.other(room);
            let idx = (other - 1) as usize;
            if idx < room_count && !reached[idx] {
                reached[idx] = true;
                stack.push(other);
            }
        }
    }

    reached.iter().all(|&r| r)
}
