//! Error types for dungeon generation and map export

use thiserror::Error;

/// Invalid generation parameters. A run that hits any of these is refused
/// before a grid is produced.
#[derive(Debug, Error, PartialEq)]
pub enum DungeonError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },

    #[error("room count must be positive")]
    NoRooms,

    #[error("sparsity must be a finite value of at least 1.0, got {0}")]
    InvalidSparsity(f64),

    #[error("minimum room dimension must be at least 1")]
    ZeroMinDimension,

    #[error(
        "a {width}x{height} grid has no valid split point with padding {padding} \
         and minimum room dimension {min_dimension}"
    )]
    Unsplittable {
        width: usize,
        height: usize,
        padding: usize,
        min_dimension: usize,
    },

    #[error("padding {padding} leaves no room inside a {width}x{height} grid")]
    NoRoomFits {
        width: usize,
        height: usize,
        padding: usize,
    },
}

/// Failures while reading parameter files or writing map documents.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsplittable_message_names_parameters() {
        let err = DungeonError::Unsplittable {
            width: 2,
            height: 2,
            padding: 0,
            min_dimension: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("2x2"));
        assert!(msg.contains("minimum room dimension 2"));
    }
}
