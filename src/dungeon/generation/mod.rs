//! Dungeon generation algorithms
//!
//! The stages of the generation pipeline, leaves first:
//!
//! - BSP (Binary Space Partitioning) for room rectangles
//! - Flood-fill labeling of connected floor regions
//! - Prim's minimum spanning tree plus extra edges for large rooms
//! - Shortest-path corridor carving between connected rooms

pub mod bsp;
pub mod graph;
pub mod hallways;
pub mod labeling;

pub use bsp::*;
pub use graph::*;
pub use hallways::*;
pub use labeling::*;
