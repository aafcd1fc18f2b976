//! dgen-core: BSP dungeon generation
//!
//! Splits a rectangular area with binary space partitioning, carves one room
//! per leaf, joins sibling subtrees with corridors, stamps everything into a
//! cell grid and builds a merged wall mesh plus floor quads from it.
//!
//! Pure logic with no I/O; every random draw goes through
//! [`dgen_rng::RandomSource`] so a seed fully determines the output.

pub mod config;
pub mod dungeon;
mod error;
mod generator;
pub mod mesh;

pub use config::DungeonConfig;
pub use error::GenerationError;
pub use generator::{Dungeon, DungeonResult, generate};

pub use dgen_rng::{DungeonRng, RandomSource};
