//! Fractal-noise terrain generator

use crate::noise::{Fbm, NoiseSource, Perlin};
use crate::{Algorithm, Grid, Rng, Stats, Terrain};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerlinConfig {
    /// Base noise frequency per cell.
    pub scale: f64,
    pub octaves: u32,
    pub lacunarity: f64,
    pub persistence: f64,
    /// Fade heights radially so the map becomes an island.
    pub island_mode: bool,
    pub island_falloff: f64,
    /// Diffusion smoothing passes over the height field.
    pub erosion_iterations: usize,
    /// Shallow-water band threshold; deep water sits 0.1 below it.
    pub water_level: f64,
}

impl Default for PerlinConfig {
    fn default() -> Self {
        Self {
            scale: 0.1,
            octaves: 4,
            lacunarity: 2.0,
            persistence: 0.5,
            island_mode: false,
            island_falloff: 1.8,
            erosion_iterations: 2,
            water_level: 0.35,
        }
    }
}

// Fixed upper band thresholds; only the water line moves with config.
const SAND_LEVEL: f64 = 0.4;
const GRASS_LEVEL: f64 = 0.6;
const FOREST_LEVEL: f64 = 0.75;

/// Multi-octave Perlin heights banded into terrain tiers.
///
/// Terrain carries no border guarantee; coastline shape is entirely up to
/// the noise and the optional island mask.
pub struct PerlinTerrain {
    config: PerlinConfig,
}

impl PerlinTerrain {
    pub fn new(config: PerlinConfig) -> Self {
        Self { config }
    }
}

impl Default for PerlinTerrain {
    fn default() -> Self {
        Self::new(PerlinConfig::default())
    }
}

impl Algorithm<Terrain> for PerlinTerrain {
    fn generate(&self, grid: &mut Grid<Terrain>, rng: &mut Rng) -> Stats {
        let (w, h) = (grid.width(), grid.height());
        let cfg = &self.config;
        let fbm = Fbm::new(
            Perlin::new(rng),
            cfg.octaves,
            cfg.lacunarity,
            cfg.persistence,
        );

        let mut heights = vec![0.0f64; w * h];
        let (cx, cy) = ((w as f64 - 1.0) / 2.0, (h as f64 - 1.0) / 2.0);
        let half_extent = (w.min(h) as f64) / 2.0;
        for y in 0..h {
            for x in 0..w {
                let n = fbm.sample(x as f64 * cfg.scale, y as f64 * cfg.scale);
                let mut v = ((n + 1.0) * 0.5).clamp(0.0, 1.0);
                if cfg.island_mode {
                    let dx = x as f64 - cx;
                    let dy = y as f64 - cy;
                    let d = (dx * dx + dy * dy).sqrt() / half_extent;
                    v *= (1.0 - d.powf(cfg.island_falloff)).max(0.0);
                }
                heights[y * w + x] = v;
            }
        }

        for _ in 0..cfg.erosion_iterations {
            heights = erode(&heights, w, h);
        }

        for y in 0..h {
            for x in 0..w {
                grid.set(x as i32, y as i32, band(heights[y * w + x], cfg.water_level));
            }
        }

        let total = (w * h) as f64;
        let water = grid.count(Terrain::is_water) as f64;
        let land = grid.count(Terrain::is_walkable) as f64;
        let mountain = grid.count(|t| *t == Terrain::Mountain) as f64;

        let mut stats = Stats::new();
        stats.set("water_percent", water / total * 100.0);
        stats.set("land_percent", land / total * 100.0);
        stats.set("mountain_percent", mountain / total * 100.0);
        stats.set("island_mode", cfg.island_mode);
        stats
    }

    fn name(&self) -> &'static str {
        "perlin"
    }
}

/// One diffusion pass: each height pulls 20% toward the mean of its
/// 4-neighbours, computed from a snapshot.
fn erode(heights: &[f64], w: usize, h: usize) -> Vec<f64> {
    let mut out = vec![0.0f64; w * h];
    for y in 0..h {
        for x in 0..w {
            let mut sum = 0.0;
            let mut n = 0.0;
            if x > 0 {
                sum += heights[y * w + x - 1];
                n += 1.0;
            }
            if x + 1 < w {
                sum += heights[y * w + x + 1];
                n += 1.0;
            }
            if y > 0 {
                sum += heights[(y - 1) * w + x];
                n += 1.0;
            }
            if y + 1 < h {
                sum += heights[(y + 1) * w + x];
                n += 1.0;
            }
            out[y * w + x] = 0.8 * heights[y * w + x] + 0.2 * (sum / n);
        }
    }
    out
}

fn band(height: f64, water_level: f64) -> Terrain {
    if height < water_level - 0.1 {
        Terrain::DeepWater
    } else if height < water_level {
        Terrain::Water
    } else if height < SAND_LEVEL {
        Terrain::Sand
    } else if height < GRASS_LEVEL {
        Terrain::Grass
    } else if height < FOREST_LEVEL {
        Terrain::Forest
    } else {
        Terrain::Mountain
    }
}
