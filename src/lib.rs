//! # TileForge
//!
//! A seeded procedural tile-map generation engine for dungeons, mazes,
//! and terrain.
//!
//! ## Quick Start
//!
//! ```rust
//! use tileforge::{generate, Kind, Options};
//!
//! let result = generate(Kind::parse("caves").unwrap(), 32, &Options::seeded(42)).unwrap();
//! let grid = result.map.as_dungeon().unwrap();
//!
//! println!("Generated {} floor tiles", grid.count(|t| t.is_walkable()));
//! ```
//!
//! ## Generators
//!
//! Seven generator kinds behind one [`generate`] call:
//! - `caves` - cellular automata for organic caverns
//! - `drunkard` - random walk carving (simple, multiple, weighted)
//! - `bsp` - binary space partitioning with rooms and corridors
//! - `wfc` - Wave Function Collapse with backtracking
//! - `maze` - perfect mazes (backtracking, Prim, recursive division)
//! - `perlin` - fractal-noise terrain, optionally masked into an island
//! - `default` - a fixed hand-authored fallback map
//!
//! Every run owns a single mulberry32 PRNG, so the same
//! `(kind, size, seed)` reproduces the same grid bit for bit.
//!
//! ## Post-processing
//!
//! Dungeon output is repaired by [`effects`]: keep-largest-region pruning
//! or corridor stitching, plus start/end marker placement. Shortfalls
//! (a stalled walk, an exhausted backtrack budget) surface in the result
//! stats, never as errors.

mod algorithm;
mod error;
mod generate;
mod grid;
mod rng;
mod stats;

pub mod algorithms;
pub mod effects;
pub mod noise;

pub use algorithm::Algorithm;
pub use error::{Error, Result};
pub use generate::{generate, Generated, Kind, Options, TileMap, MIN_SIZE};
pub use grid::{Cell, Grid, Terrain, Tile};
pub use rng::Rng;
pub use stats::Stats;
