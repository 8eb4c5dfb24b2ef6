//! Algorithm trait for map generators

use crate::{Cell, Grid, Rng, Stats};

/// Trait for map generation algorithms.
///
/// Generators draw every random number from the `Rng` they are handed; the
/// facade owns the single PRNG of a generation run and threads it through
/// generation and post-processing. The returned stats carry
/// generator-specific quantities only; the facade adds the shared ones.
pub trait Algorithm<C: Cell = crate::Tile> {
    /// Generate content into the grid.
    fn generate(&self, grid: &mut Grid<C>, rng: &mut Rng) -> Stats;

    /// Algorithm name for identification
    fn name(&self) -> &'static str;
}
