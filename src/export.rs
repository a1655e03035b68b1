//! Map export
//!
//! Writes a generated dungeon as a Universal VTT (`.dd2vtt`) document for virtual
//! tabletops, and the raw tile grid as JSON for renderers.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::dungeon::types::{Point, Tile};
use crate::dungeon::Dungeon;
use crate::error::ExportError;

/// Universal VTT format version written by this crate
pub const VTT_FORMAT: f64 = 0.2;

/// Smallest grid cell size virtual tabletops accept, in pixels
pub const MIN_PIXELS_PER_GRID: u32 = 50;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct VttCoord {
    pub x: usize,
    pub y: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VttResolution {
    pub map_origin: VttCoord,
    pub map_size: VttCoord,
    pub pixels_per_grid: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VttEnvironment {
    pub baked_lighting: bool,
    pub ambient_light: String,
}

impl Default for VttEnvironment {
    fn default() -> Self {
        Self {
            baked_lighting: true,
            ambient_light: "ffffffff".to_string(),
        }
    }
}

/// A `.dd2vtt` map: grid geometry, line-of-sight walls and an embedded image.
///
/// Portals and lights are always empty; dungeons have neither doors nor light
/// sources.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VttDocument {
    pub format: f64,
    pub resolution: VttResolution,
    pub line_of_sight: Vec<[Point; 2]>,
    pub portals: Vec<serde_json::Value>,
    pub environment: VttEnvironment,
    pub lights: Vec<serde_json::Value>,
    /// Base64 of the rendered map image, empty when none was supplied
    pub image: String,
}

impl VttDocument {
    /// Build the document for a dungeon. `image` holds the bytes of an image
    /// rendered elsewhere; `pixels_per_grid` is raised to the tabletop minimum.
    pub fn from_dungeon(dungeon: &Dungeon, pixels_per_grid: u32, image: Option<&[u8]>) -> Self {
        let line_of_sight = dungeon
            .walls
            .iter()
            .map(|wall| [wall.p1, wall.p2])
            .collect();

        let image = image
            .map(|bytes| base64::engine::general_purpose::STANDARD.encode(bytes))
            .unwrap_or_default();

        Self {
            format: VTT_FORMAT,
            resolution: VttResolution {
                map_origin: VttCoord { x: 0, y: 0 },
                map_size: VttCoord {
                    x: dungeon.width(),
                    y: dungeon.height(),
                },
                pixels_per_grid: pixels_per_grid.max(MIN_PIXELS_PER_GRID),
            },
            line_of_sight,
            portals: Vec::new(),
            environment: VttEnvironment::default(),
            lights: Vec::new(),
            image,
        }
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), ExportError> {
        write_pretty(self, writer)
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        write_pretty_file(self, path.as_ref())
    }
}

/// Row-major tile grid for the rendering layer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TileGridDocument {
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<Vec<Tile>>,
}

impl TileGridDocument {
    pub fn from_dungeon(dungeon: &Dungeon) -> Self {
        Self {
            width: dungeon.width(),
            height: dungeon.height(),
            tiles: dungeon.grid.rows().map(|row| row.to_vec()).collect(),
        }
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), ExportError> {
        write_pretty(self, writer)
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        write_pretty_file(self, path.as_ref())
    }
}

/// JSON with 4-space indentation, the layout tabletop tools write themselves.
fn write_pretty<T: Serialize, W: Write>(value: &T, writer: W) -> Result<(), ExportError> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
    value.serialize(&mut serializer)?;
    Ok(())
}

fn write_pretty_file<T: Serialize>(value: &T, path: &Path) -> Result<(), ExportError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_pretty(value, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// `map_{width}x{height}_{timestamp}.dd2vtt` for the current time, with a
/// compact UTC timestamp that is safe in file names on every platform.
pub fn default_output_name(width: usize, height: usize) -> String {
    output_name_at(width, height, Utc::now())
}

fn output_name_at(width: usize, height: usize, time: DateTime<Utc>) -> String {
    format!(
        "map_{}x{}_{}.dd2vtt",
        width,
        height,
        time.format("%Y%m%dT%H%M%S%.3fZ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::generate_dungeon;
    use crate::dungeon::params::DungeonParams;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn sample_dungeon() -> Dungeon {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        generate_dungeon(&DungeonParams::compact(), &mut rng).unwrap()
    }

    #[test]
    fn test_document_matches_dungeon() {
        let dungeon = sample_dungeon();
        let doc = VttDocument::from_dungeon(&dungeon, 70, None);

        assert_eq!(doc.format, 0.2);
        assert_eq!(doc.resolution.map_origin, VttCoord { x: 0, y: 0 });
        assert_eq!(doc.resolution.map_size, VttCoord { x: 30, y: 20 });
        assert_eq!(doc.resolution.pixels_per_grid, 70);
        assert_eq!(doc.line_of_sight.len(), dungeon.walls.len());
        for (pair, wall) in doc.line_of_sight.iter().zip(&dungeon.walls) {
            assert_eq!(pair, &[wall.p1, wall.p2]);
        }
        assert!(doc.portals.is_empty());
        assert!(doc.lights.is_empty());
        assert!(doc.image.is_empty());
    }

    #[test]
    fn test_pixels_per_grid_has_a_floor() {
        let dungeon = sample_dungeon();
        let doc = VttDocument::from_dungeon(&dungeon, 16, None);
        assert_eq!(doc.resolution.pixels_per_grid, MIN_PIXELS_PER_GRID);
    }

    #[test]
    fn test_image_is_base64() {
        let dungeon = sample_dungeon();
        let doc = VttDocument::from_dungeon(&dungeon, 50, Some(b"abc"));
        assert_eq!(doc.image, "YWJj");
    }

    #[test]
    fn test_json_layout() {
        let dungeon = sample_dungeon();
        let doc = VttDocument::from_dungeon(&dungeon, 50, None);

        let mut buffer = Vec::new();
        doc.to_writer(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("{\n    \"format\": 0.2,"));
        assert!(text.contains("\n        \"pixels_per_grid\": 50"));

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["environment"]["ambient_light"], "ffffffff");
        assert_eq!(value["environment"]["baked_lighting"], true);
        let first = &value["line_of_sight"][0];
        assert_eq!(first[0]["x"], dungeon.walls[0].p1.x);
        assert_eq!(first[1]["y"], dungeon.walls[0].p2.y);
    }

    #[test]
    fn test_tile_grid_document() {
        let dungeon = sample_dungeon();
        let doc = TileGridDocument::from_dungeon(&dungeon);

        assert_eq!(doc.tiles.len(), 20);
        assert!(doc.tiles.iter().all(|row| row.len() == 30));
        let (x, y) = dungeon.rooms[0].representative;
        assert_eq!(doc.tiles[y][x].room_id, 1);

        let mut buffer = Vec::new();
        doc.to_writer(&mut buffer).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["tiles"][y][x]["is_floor"], true);
        assert_eq!(value["tiles"][y][x]["pattern"], "flooring");
    }

    #[test]
    fn test_write_to_file() {
        let dungeon = sample_dungeon();
        let doc = VttDocument::from_dungeon(&dungeon, 50, None);
        let path = std::env::temp_dir().join("dungeon_generator_export_test.dd2vtt");

        doc.write(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["resolution"]["map_size"]["x"], 30);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_output_name() {
        let time = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 30).unwrap();
        assert_eq!(
            output_name_at(60, 40, time),
            "map_60x40_20240309T140530.000Z.dd2vtt"
        );

        let name = default_output_name(8, 6);
        assert!(name.starts_with("map_8x6_"));
        assert!(name.ends_with(".dd2vtt"));
        assert!(!name.contains(':'));
    }
}
