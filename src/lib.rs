//! Dungeon generation library
//!
//! Re-exports modules for use by binaries and tools.

pub mod dungeon;
pub mod error;
pub mod export;
pub mod tilemap;

pub use dungeon::params::DungeonParams;
pub use dungeon::{generate_dungeon, Dungeon};
pub use error::{DungeonError, ExportError};
