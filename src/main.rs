use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use dungeon_generator::export::{default_output_name, TileGridDocument, VttDocument, MIN_PIXELS_PER_GRID};
use dungeon_generator::{generate_dungeon, DungeonParams};

#[derive(Parser, Debug)]
#[command(name = "dungeon_generator")]
#[command(about = "Generate procedural dungeon maps and export them as Universal VTT files")]
struct Args {
    /// Width of the grid in cells
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Height of the grid in cells
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Empty margin kept around and between rooms
    #[arg(long)]
    padding: Option<usize>,

    /// Number of rooms to generate
    #[arg(short, long)]
    rooms: Option<usize>,

    /// Candidate oversampling factor (>= 1; larger means more uneven rooms)
    #[arg(long)]
    sparsity: Option<f64>,

    /// Smallest room side a split may leave
    #[arg(long)]
    min_dimension: Option<usize>,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Load parameters from a JSON file; flags given on the command line win
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output .dd2vtt path (default: map_{width}x{height}_{timestamp}.dd2vtt)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Image to embed in the map file (already rendered elsewhere)
    #[arg(long)]
    image: Option<PathBuf>,

    /// Pixels per grid cell in the exported map
    #[arg(long, default_value_t = MIN_PIXELS_PER_GRID)]
    pixels_per_grid: u32,

    /// Also write the tile grid as JSON
    #[arg(long)]
    tiles: Option<PathBuf>,
}

impl Args {
    fn params(&self) -> Result<DungeonParams, Box<dyn Error>> {
        let mut params = match &self.config {
            Some(path) => DungeonParams::from_json_file(path)?,
            None => DungeonParams::default(),
        };

        if let Some(width) = self.width {
            params.width = width;
        }
        if let Some(height) = self.height {
            params.height = height;
        }
        if let Some(padding) = self.padding {
            params.padding = padding;
        }
        if let Some(rooms) = self.rooms {
            params.room_count = rooms;
        }
        if let Some(sparsity) = self.sparsity {
            params.sparsity = sparsity;
        }
        if let Some(min_dimension) = self.min_dimension {
            params.min_dimension = min_dimension;
        }

        Ok(params)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let params = args.params()?;

    // Initialize RNG
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    println!("Generating dungeon with seed: {}", seed);
    println!(
        "Map size: {}x{}, {} rooms, padding {}, sparsity {:.1}",
        params.width, params.height, params.room_count, params.padding, params.sparsity
    );

    let dungeon = generate_dungeon(&params, &mut rng)?;

    println!(
        "Created {} rooms ({} requested) joined by {} edges",
        dungeon.room_count(),
        dungeon.rooms_requested,
        dungeon.edges.len()
    );
    if dungeon.is_short_of_rooms() {
        println!("  Grid too small for every room; try fewer rooms or a larger map");
    }
    println!(
        "Floor: {} tiles ({} corridor), {} wall segments",
        dungeon.floor_tile_count(),
        dungeon.corridor_tile_count(),
        dungeon.walls.len()
    );

    let image = match &args.image {
        Some(path) => Some(fs::read(path)?),
        None => None,
    };

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(default_output_name(dungeon.width(), dungeon.height())));
    println!("Exporting map to {}...", output.display());
    VttDocument::from_dungeon(&dungeon, args.pixels_per_grid, image.as_deref()).write(&output)?;

    if let Some(path) = &args.tiles {
        println!("Exporting tile grid to {}...", path.display());
        TileGridDocument::from_dungeon(&dungeon).write(path)?;
    }

    println!("Done!");
    Ok(())
}
