//! Configuration parameters for dungeon generation
//!
//! Provides the editor defaults, a couple of presets and validation of the
//! parameter combinations that can be rejected without drawing any randomness.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DungeonError, ExportError};

/// Configuration for one generation run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonParams {
    /// Grid width in cells
    pub width: usize,
    /// Grid height in cells
    pub height: usize,
    /// Minimum empty margin around and between rooms
    pub padding: usize,
    /// Number of rooms to keep (fewer if the grid cannot hold them)
    pub room_count: usize,
    /// Oversampling factor: `room_count * sparsity` candidates are split out
    /// before the largest `room_count` are kept
    pub sparsity: f64,
    /// Smallest width/height a split may leave on either side
    pub min_dimension: usize,
}

impl Default for DungeonParams {
    fn default() -> Self {
        Self {
            width: 60,
            height: 40,
            padding: 1,
            room_count: 10,
            sparsity: 2.0,
            min_dimension: 2,
        }
    }
}

impl DungeonParams {
    /// Small map with a handful of rooms, handy for quick previews
    pub fn compact() -> Self {
        Self {
            width: 30,
            height: 20,
            room_count: 5,
            ..Default::default()
        }
    }

    /// Large map with many, very uneven rooms
    pub fn sprawling() -> Self {
        Self {
            width: 120,
            height: 80,
            padding: 2,
            room_count: 30,
            sparsity: 3.0,
            min_dimension: 3,
        }
    }

    /// Half the padding, rounded up: the margin each split keeps on its side.
    pub fn half_padding(&self) -> usize {
        self.padding.div_ceil(2)
    }

    /// Upper bound on the partitioner's work queue.
    pub fn candidate_target(&self) -> f64 {
        self.room_count as f64 * self.sparsity
    }

    /// Reject parameters that can never produce a grid.
    ///
    /// Whether the grid is large enough for the first split is checked by the
    /// partitioner itself.
    pub fn validate(&self) -> Result<(), DungeonError> {
        if self.width == 0 || self.height == 0 {
            return Err(DungeonError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }
        if self.room_count == 0 {
            return Err(DungeonError::NoRooms);
        }
        if !self.sparsity.is_finite() || self.sparsity < 1.0 {
            return Err(DungeonError::InvalidSparsity(self.sparsity));
        }
        if self.min_dimension == 0 {
            return Err(DungeonError::ZeroMinDimension);
        }
        Ok(())
    }

    /// Load parameters from a JSON file; absent fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ExportError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}
