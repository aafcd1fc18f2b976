//! dungeon-gen: generate a BSP dungeon from the command line
//!
//! Prints a room table, mesh statistics and optionally an ASCII map, or a
//! JSON summary with `--json`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, Log, Metadata, Record};
use serde::Serialize;
use strum::IntoEnumIterator;

use dgen_core::dungeon::{Position, Rect, RoomType};
use dgen_core::mesh::WallStats;
use dgen_core::{DungeonConfig, DungeonResult, generate};
use dgen_save::{SeedRecord, default_seed_path, list_seeds, load_seed, save_seed};

/// Procedural BSP dungeon generator
#[derive(Parser, Debug)]
#[command(name = "dungeon-gen")]
#[command(author, version, about = "Generate a BSP dungeon layout", long_about = None)]
struct Args {
    /// Seed; a random one is drawn when omitted
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Dungeon width in cells
    #[arg(short = 'W', long = "width")]
    width: Option<u32>,

    /// Dungeon length in cells
    #[arg(short = 'L', long = "length")]
    length: Option<u32>,

    /// Smallest partition width
    #[arg(long = "min-room-width")]
    min_room_width: Option<u32>,

    /// Smallest partition length
    #[arg(long = "min-room-length")]
    min_room_length: Option<u32>,

    /// Partition depth budget
    #[arg(short = 'i', long = "iterations")]
    iterations: Option<u32>,

    /// Corridor width in cells
    #[arg(long = "corridor-width")]
    corridor_width: Option<u32>,

    /// Skip corner pillars in the wall mesh
    #[arg(long = "no-pillars")]
    no_pillars: bool,

    /// JSON config file; command-line values override it
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Print a JSON summary instead of tables
    #[arg(long = "json")]
    json: bool,

    /// Print the ASCII map
    #[arg(short = 'm', long = "map")]
    map: bool,

    /// Save the seed under this label
    #[arg(long = "save")]
    save: Option<String>,

    /// Reuse the seed saved under this label
    #[arg(long = "load", conflicts_with = "seed")]
    load: Option<String>,

    /// List saved seeds and exit
    #[arg(long = "list")]
    list: bool,

    /// Verbose output
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

impl Args {
    /// Config file (or defaults) with command-line overrides applied
    fn dungeon_config(&self) -> Result<DungeonConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => DungeonConfig::default(),
        };

        if let Some(v) = self.width {
            config.dungeon_width = v;
        }
        if let Some(v) = self.length {
            config.dungeon_length = v;
        }
        if let Some(v) = self.min_room_width {
            config.room_width_min = v;
        }
        if let Some(v) = self.min_room_length {
            config.room_length_min = v;
        }
        if let Some(v) = self.iterations {
            config.max_iterations = v;
        }
        if let Some(v) = self.corridor_width {
            config.corridor_width = v;
        }
        if self.no_pillars {
            config.use_corner_pillars = false;
        }
        Ok(config)
    }

    fn resolve_seed(&self) -> Result<u64> {
        if let Some(label) = &self.load {
            let path = default_seed_path(label)?;
            let record = load_seed(&path)
                .with_context(|| format!("loading seed '{}' from {}", label, path.display()))?;
            return Ok(record.seed);
        }
        Ok(self.seed.unwrap_or_else(dgen_rng::random_seed))
    }
}

/// Minimal stderr logger
struct StderrLogger {
    level: LevelFilter,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:<5} {}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let logger = Box::new(StderrLogger { level });
    if log::set_boxed_logger(logger).is_ok() {
        log::set_max_level(level);
    }
}

#[derive(Debug, Serialize)]
struct RoomSummary {
    id: usize,
    label: String,
    room_type: RoomType,
    rect: Rect,
    center: Position,
}

#[derive(Debug, Serialize)]
struct Summary {
    seed: u64,
    width: u32,
    length: u32,
    rooms: Vec<RoomSummary>,
    corridors: usize,
    unreachable_floor: usize,
    walls: WallStats,
    floor_vertices: usize,
}

impl Summary {
    fn new(result: &DungeonResult) -> Self {
        Self {
            seed: result.seed,
            width: result.grid.width(),
            length: result.grid.length(),
            rooms: result
                .rooms
                .iter()
                .map(|r| RoomSummary {
                    id: r.id.0,
                    label: r.label(),
                    room_type: r.room_type,
                    rect: r.rect,
                    center: r.center(),
                })
                .collect(),
            corridors: result.corridors.len(),
            unreachable_floor: result.unreachable_floor().len(),
            walls: result.wall_stats,
            floor_vertices: result.floor.vertex_count(),
        }
    }
}

fn print_report(result: &DungeonResult) {
    println!(
        "Dungeon {}x{}  seed {}",
        result.grid.width(),
        result.grid.length(),
        result.seed
    );
    println!();
    println!("{:<4} {:<8} {:>14} {:>9}", "id", "type", "origin", "size");
    for room in &result.rooms {
        println!(
            "{:<4} {:<8} {:>14} {:>9}",
            room.id,
            room.room_type.to_string(),
            format!("({}, {})", room.rect.min.x, room.rect.min.y),
            format!("{}x{}", room.rect.width(), room.rect.length()),
        );
    }

    let counts: Vec<String> = RoomType::iter()
        .map(|t| (t, result.rooms_by_type(t).len()))
        .filter(|(_, n)| *n > 0)
        .map(|(t, n)| format!("{} {}", n, t))
        .collect();
    println!();
    println!("Rooms:      {}", counts.join(", "));
    println!("Corridors:  {}", result.corridors.len());

    let stats = &result.wall_stats;
    println!(
        "Walls:      {} segments ({} horizontal, {} vertical) from {} units, {} pillars",
        stats.segments(),
        stats.horizontal_segments,
        stats.vertical_segments,
        stats.unit_segments,
        stats.pillars
    );
    println!(
        "Mesh:       {} wall + {} floor vertices, {} triangles, ~{} KiB",
        stats.vertices,
        result.floor.vertex_count(),
        stats.triangles + result.floor.triangle_count(),
        (stats.estimated_bytes + result.floor.estimated_bytes()) / 1024
    );

    let unreachable = result.unreachable_floor().len();
    if unreachable > 0 {
        println!("Warning:    {} floor cells unreachable from start", unreachable);
    }
}

/// Grid as text, north at the top
fn render_map(result: &DungeonResult) -> String {
    let width = result.grid.width() as i32;
    let length = result.grid.length() as i32;
    let start = result.start_room().map(|r| r.center());
    let boss = result.boss_room().map(|r| r.center());
    let mut out = String::with_capacity(((width + 1) * length) as usize);
    for y in (0..length).rev() {
        for x in 0..width {
            let pos = Position::new(x, y);
            let symbol = if Some(pos) == start {
                'S'
            } else if Some(pos) == boss {
                'B'
            } else {
                result.grid.cell_type(pos).map_or(' ', |t| t.symbol())
            };
            out.push(symbol);
        }
        out.push('\n');
    }
    out
}

/// One line per saved seed: label, seed, save time and file
fn render_seed_list(seeds: &[(PathBuf, SeedRecord)]) -> String {
    seeds
        .iter()
        .map(|(path, record)| {
            format!(
                "{:<16} {:>20}  {}  {}\n",
                record.label,
                record.seed,
                record.saved_at.format("%Y-%m-%d %H:%M"),
                path.file_name().map(Path::new).unwrap_or(path).display()
            )
        })
        .collect()
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.list {
        let seeds = list_seeds().context("listing saved seeds")?;
        if seeds.is_empty() {
            println!("No saved seeds");
        } else {
            print!("{}", render_seed_list(&seeds));
        }
        return Ok(());
    }

    let config = args.dungeon_config()?;
    let seed = args.resolve_seed()?;
    let result = generate(seed, &config).context("generating dungeon")?;

    if let Some(label) = &args.save {
        let path = default_seed_path(label)?;
        save_seed(&SeedRecord::new(seed, label.as_str()), &path)
            .with_context(|| format!("saving seed to {}", path.display()))?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&Summary::new(&result))?);
    } else {
        print_report(&result);
        if args.map {
            println!();
            print!("{}", render_map(&result));
        }
    }

    Ok(())
}
