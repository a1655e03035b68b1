//! Wall extraction
//!
//! Traces the floor/non-floor boundary of a finished grid as unit edges on the
//! grid-corner lattice and merges collinear runs into long segments.

use std::collections::BTreeMap;

use log::debug;

use crate::dungeon::types::{Axis, Grid, WallSegment};

/// Boundary walls of the grid's floor, merged into maximal straight segments.
///
/// Cells outside the grid count as non-floor, so floor on the grid border is
/// closed off too. Vertical segments come first, then horizontal ones.
pub fn extract_walls(grid: &Grid) -> Vec<WallSegment> {
    let is_floor = |x: i64, y: i64| grid.try_get(x, y).is_some_and(|tile| tile.is_floor);
    let width = grid.width as i64;
    let height = grid.height as i64;

    // Between (i, j) and (i + 1, j): wall on corner column i + 1
    let mut vertical = Vec::new();
    for j in 0..height {
        for i in -1..width {
            if is_floor(i, j) != is_floor(i + 1, j) {
                let x = (i + 1) as usize;
                let y = j as usize;
                vertical.push(WallSegment::vertical(x, y, y + 1));
            }
        }
    }

    // Between (i, j) and (i, j + 1): wall on corner row j + 1
    let mut horizontal = Vec::new();
    for i in 0..width {
        for j in -1..height {
            if is_floor(i, j) != is_floor(i, j + 1) {
                let x = i as usize;
                let y = (j + 1) as usize;
                horizontal.push(WallSegment::horizontal(y, x, x + 1));
            }
        }
    }

    let unit_count = vertical.len() + horizontal.len();
    let mut walls = merge_collinear(&vertical, Axis::Vertical);
    walls.extend(merge_collinear(&horizontal, Axis::Horizontal));

    debug!("Merged {} boundary edges into {} walls", unit_count, walls.len());
    walls
}

/// Merge segments of one orientation whose spans touch or overlap on the same
/// fixed coordinate.
///
/// Each line is processed from its far end down: a segment joins the running
/// one while its high end reaches the running low end.
fn merge_collinear(segments: &[WallSegment], axis: Axis) -> Vec<WallSegment> {
    let mut lines: BTreeMap<usize, Vec<(usize, usize)>> = BTreeMap::new();
    for segment in segments {
        lines.entry(segment.fixed()).or_default().push(segment.span());
    }

    let make = |fixed: usize, (lo, hi): (usize, usize)| match axis {
        Axis::Vertical => WallSegment::vertical(fixed, lo, hi),
        Axis::Horizontal => WallSegment::horizontal(fixed, lo, hi),
    };

    let mut merged = Vec::new();
    for (fixed, mut spans) in lines {
        spans.sort_by(|a, b| b.1.cmp(&a.1));

        let mut spans = spans.into_iter();
        let Some(mut current) = spans.next() else {
            continue;
        };
        for (lo, hi) in spans {
            if hi >= current.0 {
                current.0 = current.0.min(lo);
            } else {
                merged.push(make(fixed, current));
                current = (lo, hi);
            }
        }
        merged.push(make(fixed, current));
    }

    merged
}
