//! Generation facade: kind dispatch, options, result record

use crate::algorithms::{
    static_map, Bsp, BspConfig, CellularAutomata, CellularConfig, DrunkardConfig, DrunkardWalk,
    Maze, MazeAlgorithm, MazeConfig, PerlinConfig, PerlinTerrain, WalkVariant, Wfc, WfcConfig,
};
use crate::effects::{self, ConnectivityPolicy};
use crate::{Algorithm, Error, Grid, Result, Rng, Stats, Terrain, Tile};
use serde::{Deserialize, Serialize};

/// Smallest supported grid side.
pub const MIN_SIZE: usize = 8;

/// Generator selection with per-kind configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    /// The baked-in fallback map; no generation.
    Default,
    Caves(CellularConfig),
    Drunkard(DrunkardConfig),
    Bsp(BspConfig),
    Wfc(WfcConfig),
    Maze(MazeConfig),
    Perlin(PerlinConfig),
}

impl Kind {
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Default => "default",
            Kind::Caves(_) => "caves",
            Kind::Drunkard(_) => "drunkard",
            Kind::Bsp(_) => "bsp",
            Kind::Wfc(_) => "wfc",
            Kind::Maze(_) => "maze",
            Kind::Perlin(_) => "perlin",
        }
    }

    /// Resolve a kind name, with default configuration, from the registry.
    /// Variant suffixes select walk variants, maze algorithms and the
    /// island terrain mode.
    pub fn parse(name: &str) -> Result<Kind> {
        let kind = match name {
            "default" => Kind::Default,
            "caves" | "cellular" => Kind::Caves(CellularConfig::default()),
            "drunkard" => Kind::Drunkard(DrunkardConfig::default()),
            "drunkard_simple" => Kind::Drunkard(DrunkardConfig {
                variant: WalkVariant::Simple,
                ..DrunkardConfig::default()
            }),
            "drunkard_multiple" => Kind::Drunkard(DrunkardConfig {
                variant: WalkVariant::Multiple,
                ..DrunkardConfig::default()
            }),
            "bsp" => Kind::Bsp(BspConfig::default()),
            "wfc" => Kind::Wfc(WfcConfig::default()),
            "maze" => Kind::Maze(MazeConfig::default()),
            "maze_prim" => Kind::Maze(MazeConfig {
                algorithm: MazeAlgorithm::Prim,
                ..MazeConfig::default()
            }),
            "maze_division" => Kind::Maze(MazeConfig {
                algorithm: MazeAlgorithm::Division,
                ..MazeConfig::default()
            }),
            "perlin" | "terrain" => Kind::Perlin(PerlinConfig::default()),
            "perlin_island" | "island" => Kind::Perlin(PerlinConfig {
                island_mode: true,
                ..PerlinConfig::default()
            }),
            _ => return Err(Error::UnknownKind(name.to_string())),
        };
        Ok(kind)
    }

    /// Base kind names accepted by [`Kind::parse`].
    pub fn names() -> &'static [&'static str] {
        &["default", "caves", "drunkard", "bsp", "wfc", "maze", "perlin"]
    }

    /// Fail fast on configuration values outside their documented ranges.
    fn validate(&self) -> Result<()> {
        match self {
            Kind::Default | Kind::Wfc(_) => Ok(()),
            Kind::Caves(c) => probability("initial_density", c.initial_density),
            Kind::Drunkard(c) => {
                probability("fill_percentage", c.fill_percentage)?;
                if c.num_walkers == 0 {
                    return Err(Error::InvalidConfig(
                        "num_walkers must be at least 1".to_string(),
                    ));
                }
                Ok(())
            }
            Kind::Bsp(c) => probability("door_chance", c.door_chance),
            Kind::Maze(c) => {
                probability("loop_chance", c.loop_chance)?;
                probability("openness", c.openness)
            }
            Kind::Perlin(c) => {
                if c.octaves == 0 {
                    return Err(Error::InvalidConfig(
                        "octaves must be at least 1".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }
}

fn probability(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!(
            "{} must be in [0, 1], got {}",
            name, value
        )))
    }
}

/// Options shared by every generator kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Explicit seed; derived from entropy when absent.
    pub seed: Option<u32>,
    pub ensure_connected: bool,
    /// `None` falls back to the kind default (on for maze, off otherwise).
    pub place_markers: Option<bool>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            seed: None,
            ensure_connected: true,
            place_markers: None,
        }
    }
}

impl Options {
    pub fn seeded(seed: u32) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}

/// A generated grid in one of the two vocabularies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileMap {
    Dungeon(Grid<Tile>),
    Terrain(Grid<Terrain>),
}

impl TileMap {
    pub fn width(&self) -> usize {
        match self {
            TileMap::Dungeon(g) => g.width(),
            TileMap::Terrain(g) => g.width(),
        }
    }

    pub fn height(&self) -> usize {
        match self {
            TileMap::Dungeon(g) => g.height(),
            TileMap::Terrain(g) => g.height(),
        }
    }

    pub fn as_dungeon(&self) -> Option<&Grid<Tile>> {
        match self {
            TileMap::Dungeon(g) => Some(g),
            TileMap::Terrain(_) => None,
        }
    }

    pub fn as_terrain(&self) -> Option<&Grid<Terrain>> {
        match self {
            TileMap::Terrain(g) => Some(g),
            TileMap::Dungeon(_) => None,
        }
    }
}

/// Result record: the grid, the seed that produced it, and quality stats.
#[derive(Debug, Clone, Serialize)]
pub struct Generated {
    pub map: TileMap,
    pub seed: u32,
    pub stats: Stats,
}

enum MarkerStyle {
    None,
    Ranked,
    Scanline,
}

/// Generate a map.
///
/// One PRNG is constructed per call and threaded through the generator and
/// every post-processing step, so results are reproducible from the
/// reported seed. Invalid arguments fail fast; generation shortfalls are
/// reported through stats on an otherwise valid result.
pub fn generate(kind: Kind, size: usize, options: &Options) -> Result<Generated> {
    if size < MIN_SIZE {
        return Err(Error::SizeTooSmall {
            size,
            min: MIN_SIZE,
        });
    }
    kind.validate()?;

    let seed = options.seed.unwrap_or_else(Rng::seed_from_entropy);
    let mut rng = Rng::new(seed);
    let kind_name = kind.name();
    let markers_on = options.place_markers;

    let (map, mut stats) = match kind {
        Kind::Default => {
            let grid = static_map();
            let style = marker_style(markers_on.unwrap_or(false), false);
            finish_dungeon(grid, Stats::new(), &mut rng, None, style)
        }
        Kind::Caves(config) => {
            let policy = options.ensure_connected.then_some(config.connectivity);
            let mut grid = Grid::new(size, size);
            let stats = CellularAutomata::new(config).generate(&mut grid, &mut rng);
            let style = marker_style(markers_on.unwrap_or(false), false);
            finish_dungeon(grid, stats, &mut rng, policy, style)
        }
        Kind::Drunkard(config) => {
            let policy = options
                .ensure_connected
                .then_some(ConnectivityPolicy::KeepLargest);
            let mut grid = Grid::new(size, size);
            let stats = DrunkardWalk::new(config).generate(&mut grid, &mut rng);
            let style = marker_style(markers_on.unwrap_or(false), false);
            finish_dungeon(grid, stats, &mut rng, policy, style)
        }
        Kind::Bsp(config) => {
            let policy = options
                .ensure_connected
                .then_some(ConnectivityPolicy::Stitch);
            let mut grid = Grid::new(size, size);
            let stats = Bsp::new(config).generate(&mut grid, &mut rng);
            let style = marker_style(markers_on.unwrap_or(false), false);
            finish_dungeon(grid, stats, &mut rng, policy, style)
        }
        Kind::Wfc(config) => {
            let policy = options
                .ensure_connected
                .then_some(ConnectivityPolicy::KeepLargest);
            let mut grid = Grid::new(size, size);
            let stats = Wfc::new(config).generate(&mut grid, &mut rng);
            let style = marker_style(markers_on.unwrap_or(false), false);
            finish_dungeon(grid, stats, &mut rng, policy, style)
        }
        Kind::Maze(config) => {
            let policy = options
                .ensure_connected
                .then_some(ConnectivityPolicy::KeepLargest);
            let mut grid = Grid::new(size, size);
            let stats = Maze::new(config).generate(&mut grid, &mut rng);
            let style = marker_style(markers_on.unwrap_or(true), true);
            finish_dungeon(grid, stats, &mut rng, policy, style)
        }
        Kind::Perlin(config) => {
            let mut grid = Grid::new(size, size);
            let stats = PerlinTerrain::new(config).generate(&mut grid, &mut rng);
            (TileMap::Terrain(grid), stats)
        }
    };

    stats.set("seed", u64::from(seed));
    stats.set("kind", kind_name);
    Ok(Generated { map, seed, stats })
}

fn marker_style(requested: bool, scanline: bool) -> MarkerStyle {
    match (requested, scanline) {
        (false, _) => MarkerStyle::None,
        (true, false) => MarkerStyle::Ranked,
        (true, true) => MarkerStyle::Scanline,
    }
}

fn finish_dungeon(
    mut grid: Grid<Tile>,
    mut stats: Stats,
    rng: &mut Rng,
    policy: Option<ConnectivityPolicy>,
    markers: MarkerStyle,
) -> (TileMap, Stats) {
    if let Some(policy) = policy {
        effects::ensure_connected(&mut grid, policy);
    }

    let placed = match markers {
        MarkerStyle::None => None,
        MarkerStyle::Ranked => effects::place_markers(&mut grid, rng),
        MarkerStyle::Scanline => effects::place_markers_scanline(&mut grid),
    };
    if let Some((start, end)) = placed {
        stats.set_coord("start", start);
        stats.set_coord("end", end);
    }

    let total = (grid.width() * grid.height()) as f64;
    let walkable = grid.count(Tile::is_walkable) as f64;
    stats.set("floor_percentage", walkable / total * 100.0);
    stats.set("regions", grid.flood_regions().len() as u64);

    (TileMap::Dungeon(grid), stats)
}
