//! Binary Space Partitioning (BSP) for room placement
//!
//! Splits the grid into candidate room rectangles with randomized split points,
//! oversampling by the sparsity factor and keeping only the largest rooms.

use std::collections::VecDeque;

use log::debug;
use rand::Rng;

use crate::dungeon::params::DungeonParams;
use crate::dungeon::types::Rect;
use crate::error::DungeonError;

/// Pick a split offset inside `range` cells that leaves `min_dimension` cells
/// plus the half padding on both sides. `None` when no such offset exists.
fn find_split<R: Rng + ?Sized>(
    range: usize,
    half_padding: usize,
    min_dimension: usize,
    rng: &mut R,
) -> Option<usize> {
    let reserved = 2 * half_padding + 2 * min_dimension;
    if range > reserved {
        Some(rng.gen_range(0..range - reserved) + half_padding + min_dimension)
    } else {
        None
    }
}

/// Split along the longer side. Returns `None` if the rectangle has no valid split point.
fn split_rect<R: Rng + ?Sized>(
    rect: Rect,
    half_padding: usize,
    min_dimension: usize,
    rng: &mut R,
) -> Option<(Rect, Rect)> {
    let Rect { x1, y1, x2, y2 } = rect;
    if y2 - y1 > x2 - x1 {
        let split = find_split(y2 - y1, half_padding, min_dimension, rng)?;
        Some((
            Rect::new(x1, y1, x2, y1 + split - 1),
            Rect::new(x1, y1 + split, x2, y2),
        ))
    } else {
        let split = find_split(x2 - x1, half_padding, min_dimension, rng)?;
        Some((
            Rect::new(x1, y1, x1 + split - 1, y2),
            Rect::new(x1 + split, y1, x2, y2),
        ))
    }
}

/// Partition a `width x height` grid into at most `room_count` room rectangles,
/// largest first.
///
/// The whole grid is split once along its larger dimension; that split must
/// succeed or the parameters are rejected. After that a FIFO queue of
/// rectangles is split until it holds `room_count * sparsity` entries (so bigger
/// rectangles tend to be split before smaller ones); rectangles without a valid
/// split point are set aside. Every candidate is then shrunk by the half padding
/// on all sides and the largest `room_count` survivors are returned, equal areas
/// keeping their queue order. A padding that swallows every candidate is rejected.
pub fn partition_rooms<R: Rng + ?Sized>(
    params: &DungeonParams,
    rng: &mut R,
) -> Result<Vec<Rect>, DungeonError> {
    params.validate()?;

    let width = params.width;
    let height = params.height;
    let half_padding = params.half_padding();
    let min_dimension = params.min_dimension;

    let unsplittable = || DungeonError::Unsplittable {
        width,
        height,
        padding: params.padding,
        min_dimension,
    };

    // Initial split over the full extent of the larger dimension
    let mut queue = VecDeque::new();
    if width > height {
        let split = find_split(width, half_padding, min_dimension, rng).ok_or_else(unsplittable)?;
        queue.push_back(Rect::new(0, 0, split - 1, height - 1));
        queue.push_back(Rect::new(split, 0, width - 1, height - 1));
    } else {
        let split = find_split(height, half_padding, min_dimension, rng).ok_or_else(unsplittable)?;
        queue.push_back(Rect::new(0, 0, width - 1, split - 1));
        queue.push_back(Rect::new(0, split, width - 1, height - 1));
    }

    let target = params.candidate_target();
    let mut small_rooms = Vec::new();

    while !queue.is_empty() && (queue.len() as f64) < target {
        let Some(rect) = queue.pop_front() else {
            break;
        };
        match split_rect(rect, half_padding, min_dimension, rng) {
            Some((first, second)) => {
                queue.push_back(first);
                queue.push_back(second);
            }
            None => small_rooms.push(rect),
        }
    }

    let candidate_count = queue.len() + small_rooms.len();
    let mut rooms: Vec<Rect> = queue
        .into_iter()
        .chain(small_rooms)
        .filter_map(|rect| rect.shrink(half_padding))
        .collect();

    let survivors = rooms.len();
    if rooms.is_empty() {
        return Err(DungeonError::NoRoomFits {
            width,
            height,
            padding: params.padding,
        });
    }

    // Stable sort: equal areas keep their queue order
    rooms.sort_by(|a, b| b.area().cmp(&a.area()));
    rooms.truncate(params.room_count);

    debug!(
        "Partitioned {}x{} grid: {} candidates, {} survive padding, keeping {}",
        width,
        height,
        candidate_count,
        survivors,
        rooms.len()
    );

    Ok(rooms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn params(width: usize, height: usize, padding: usize, room_count: usize, sparsity: f64) -> DungeonParams {
        DungeonParams {
            width,
            height,
            padding,
            room_count,
            sparsity,
            min_dimension: 2,
        }
    }

    fn overlaps(a: &Rect, b: &Rect) -> bool {
        a.x1 <= b.x2 && b.x1 <= a.x2 && a.y1 <= b.y2 && b.y1 <= a.y2
    }

    #[test]
    fn test_find_split_respects_margins() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let split = find_split(20, 1, 2, &mut rng).unwrap();
            assert!(split >= 3, "split {} too close to the start", split);
            assert!(split < 20 - 3, "split {} too close to the end", split);
        }
        assert_eq!(find_split(6, 1, 2, &mut rng), None);
    }

    #[test]
    fn test_too_small_grid_is_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = partition_rooms(&params(2, 2, 0, 4, 2.0), &mut rng);
        assert_eq!(
            result,
            Err(DungeonError::Unsplittable {
                width: 2,
                height: 2,
                padding: 0,
                min_dimension: 2,
            })
        );
    }

    #[test]
    fn test_padding_consumes_every_room_is_refused() {
        // The first split works, but two-cell-wide strips vanish under the shrink
        for (width, height, padding) in [(2, 10, 2), (1, 20, 1), (3, 30, 3)] {
            let mut rng = ChaCha8Rng::seed_from_u64(0);
            let result = partition_rooms(&params(width, height, padding, 3, 2.0), &mut rng);
            assert_eq!(
                result,
                Err(DungeonError::NoRoomFits {
                    width,
                    height,
                    padding,
                })
            );
        }
    }

    #[test]
    fn test_rooms_inside_grid_and_apart() {
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let p = params(60, 40, 2, 10, 2.0);
            let rooms = partition_rooms(&p, &mut rng).unwrap();

            assert!(!rooms.is_empty());
            assert!(rooms.len() <= p.room_count);
            for room in &rooms {
                assert!(room.x1 >= 1 && room.y1 >= 1, "room {:?} ignores padding", room);
                assert!(room.x2 < 59 && room.y2 < 39, "room {:?} ignores padding", room);
            }
            for (i, a) in rooms.iter().enumerate() {
                for b in &rooms[i + 1..] {
                    assert!(!overlaps(a, b), "rooms {:?} and {:?} overlap", a, b);
                }
            }
        }
    }

    #[test]
    fn test_rooms_sorted_by_area() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let rooms = partition_rooms(&params(80, 50, 1, 12, 3.0), &mut rng).unwrap();
        for pair in rooms.windows(2) {
            assert!(pair[0].area() >= pair[1].area());
        }
    }

    #[test]
    fn test_room_count_capped_by_space() {
        // 12x12 can be cut into only a few pieces with these margins
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let rooms = partition_rooms(&params(12, 12, 1, 50, 1.0), &mut rng).unwrap();
        assert!(!rooms.is_empty());
        assert!(rooms.len() < 50);
    }

    #[test]
    fn test_same_seed_same_rooms() {
        let p = params(60, 40, 1, 10, 2.0);
        let a = partition_rooms(&p, &mut ChaCha8Rng::seed_from_u64(42)).unwrap();
        let b = partition_rooms(&p, &mut ChaCha8Rng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }
}
