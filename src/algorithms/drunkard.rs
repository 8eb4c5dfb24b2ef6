//! Drunkard's walk cave generator

use crate::{Algorithm, Grid, Rng, Stats, Tile};
use serde::{Deserialize, Serialize};

/// Movement policy for the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalkVariant {
    /// One walker, uniform moves.
    Simple,
    /// Several walkers with a shared floor quota.
    Multiple,
    /// One walker biased toward unexplored (wall-heavy) neighbours.
    #[default]
    Weighted,
}

impl WalkVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            WalkVariant::Simple => "simple",
            WalkVariant::Multiple => "multiple",
            WalkVariant::Weighted => "weighted",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DrunkardConfig {
    pub variant: WalkVariant,
    /// Target fraction of the grid to carve.
    pub fill_percentage: f64,
    /// Walker count for the multiple variant.
    pub num_walkers: usize,
}

impl Default for DrunkardConfig {
    fn default() -> Self {
        Self {
            variant: WalkVariant::Weighted,
            fill_percentage: 0.45,
            num_walkers: 4,
        }
    }
}

const DIRS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Carves floor into a solid grid by random walking.
///
/// A walk that stalls returns the grid carved so far; the shortfall is
/// reported in stats rather than as an error.
pub struct DrunkardWalk {
    config: DrunkardConfig,
}

impl DrunkardWalk {
    pub fn new(config: DrunkardConfig) -> Self {
        Self { config }
    }
}

impl Default for DrunkardWalk {
    fn default() -> Self {
        Self::new(DrunkardConfig::default())
    }
}

impl Algorithm<Tile> for DrunkardWalk {
    fn generate(&self, grid: &mut Grid<Tile>, rng: &mut Rng) -> Stats {
        let (w, h) = (grid.width(), grid.height());
        grid.fill(Tile::Wall);
        let target = (self.config.fill_percentage * (w * h) as f64) as usize;

        let carved = match self.config.variant {
            WalkVariant::Simple => walk_simple(grid, rng, target),
            WalkVariant::Multiple => walk_multiple(grid, rng, target, self.config.num_walkers),
            WalkVariant::Weighted => walk_weighted(grid, rng, target),
        };

        let mut stats = Stats::new();
        stats.set("variant", self.config.variant.as_str());
        stats.set("target_floor", target as u64);
        stats.set("carved_floor", carved as u64);
        if carved < target {
            stats.set("shortfall", (target - carved) as u64);
        }
        stats
    }

    fn name(&self) -> &'static str {
        "drunkard"
    }
}

/// Single walker, uniform neighbour choice. Stops at the floor target or
/// after a full grid's worth of steps without carving anything new.
fn walk_simple(grid: &mut Grid<Tile>, rng: &mut Rng, target: usize) -> usize {
    let (w, h) = (grid.width(), grid.height());
    let (mut x, mut y) = (w / 2, h / 2);
    let stall_limit = w * h;
    let mut carved = 0;
    let mut stalled = 0;

    loop {
        if grid[(x, y)].is_wall() {
            grid.set(x as i32, y as i32, Tile::Floor);
            carved += 1;
            stalled = 0;
        } else {
            stalled += 1;
        }
        if carved >= target || stalled >= stall_limit {
            return carved;
        }

        let &(dx, dy) = rng.pick(&DIRS).unwrap_or(&DIRS[0]);
        let nx = x as i32 + dx;
        let ny = y as i32 + dy;
        if nx >= 1 && nx < (w - 1) as i32 && ny >= 1 && ny < (h - 1) as i32 {
            x = nx as usize;
            y = ny as usize;
        }
    }
}

/// Several walkers, each with a share of the target. The first starts at
/// the center, later ones on an already carved tile.
fn walk_multiple(grid: &mut Grid<Tile>, rng: &mut Rng, target: usize, num_walkers: usize) -> usize {
    let (w, h) = (grid.width(), grid.height());
    let walkers = num_walkers.max(1);
    let quota = target.div_ceil(walkers);
    let stall_limit = w * h;
    let mut carved = 0;

    for i in 0..walkers {
        let (mut x, mut y) = if i == 0 {
            (w / 2, h / 2)
        } else {
            let floors: Vec<(usize, usize)> = grid
                .iter()
                .filter(|(_, _, t)| t.is_walkable())
                .map(|(x, y, _)| (x, y))
                .collect();
            match rng.pick(&floors) {
                Some(&p) => p,
                None => (w / 2, h / 2),
            }
        };

        let mut walker_carved = 0;
        let mut stalled = 0;
        while walker_carved < quota && stalled < stall_limit {
            if grid[(x, y)].is_wall() {
                grid.set(x as i32, y as i32, Tile::Floor);
                carved += 1;
                walker_carved += 1;
                stalled = 0;
            } else {
                stalled += 1;
            }

            let &(dx, dy) = rng.pick(&DIRS).unwrap_or(&DIRS[0]);
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;
            if nx >= 1 && nx < (w - 1) as i32 && ny >= 1 && ny < (h - 1) as i32 {
                x = nx as usize;
                y = ny as usize;
            }
        }
    }
    carved
}

/// Single walker whose moves favour wall-heavy neighbourhoods, which cuts
/// down on ping-ponging through already carved space.
fn walk_weighted(grid: &mut Grid<Tile>, rng: &mut Rng, target: usize) -> usize {
    let (w, h) = (grid.width(), grid.height());
    let (mut x, mut y) = (w / 2, h / 2);
    let max_steps = 4 * w * h;
    let mut carved = 0;

    for _ in 0..max_steps {
        if grid[(x, y)].is_wall() {
            grid.set(x as i32, y as i32, Tile::Floor);
            carved += 1;
        }
        if carved >= target {
            break;
        }

        let mut weights = [0.0f64; 4];
        for (i, &(dx, dy)) in DIRS.iter().enumerate() {
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;
            if nx >= 1 && nx < (w - 1) as i32 && ny >= 1 && ny < (h - 1) as i32 {
                weights[i] = 1.0 + wall_count_3x3(grid, nx, ny) as f64;
            }
        }
        let (dx, dy) = DIRS[rng.weighted_index(&weights)];
        let nx = x as i32 + dx;
        let ny = y as i32 + dy;
        if nx >= 1 && nx < (w - 1) as i32 && ny >= 1 && ny < (h - 1) as i32 {
            x = nx as usize;
            y = ny as usize;
        }
    }
    carved
}

fn wall_count_3x3(grid: &Grid<Tile>, cx: i32, cy: i32) -> usize {
    let mut count = 0;
    for dy in -1..=1 {
        for dx in -1..=1 {
            if grid.get(cx + dx, cy + dy).is_none_or(Tile::is_wall) {
                count += 1;
            }
        }
    }
    count
}
