//! Maze generator: backtracker, Prim frontier, recursive division

use crate::effects;
use crate::{Algorithm, Grid, Rng, Stats, Tile};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MazeAlgorithm {
    #[default]
    Backtracking,
    Prim,
    Division,
}

impl MazeAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            MazeAlgorithm::Backtracking => "backtracking",
            MazeAlgorithm::Prim => "prim",
            MazeAlgorithm::Division => "division",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    pub algorithm: MazeAlgorithm,
    /// Chance to open an inter-cell wall, creating loops.
    pub loop_chance: f64,
    /// Chance to open any interior wall, carving wider open space.
    pub openness: f64,
    /// Dead-end pruning iterations after carving.
    pub dead_end_removal: usize,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            algorithm: MazeAlgorithm::Backtracking,
            loop_chance: 0.0,
            openness: 0.0,
            dead_end_removal: 0,
        }
    }
}

/// Perfect maze carving on an odd lattice, with optional imperfections.
///
/// The working area is trimmed to odd dimensions; when the grid side is
/// even the last row and column stay wall. Cells live at odd coordinates,
/// walls between them at mixed parity.
pub struct Maze {
    config: MazeConfig,
}

impl Maze {
    pub fn new(config: MazeConfig) -> Self {
        Self { config }
    }
}

impl Default for Maze {
    fn default() -> Self {
        Self::new(MazeConfig::default())
    }
}

const CELL_DIRS: [(i32, i32); 4] = [(2, 0), (-2, 0), (0, 2), (0, -2)];

impl Algorithm<Tile> for Maze {
    fn generate(&self, grid: &mut Grid<Tile>, rng: &mut Rng) -> Stats {
        let w = odd_extent(grid.width());
        let h = odd_extent(grid.height());
        grid.fill(Tile::Wall);

        match self.config.algorithm {
            MazeAlgorithm::Backtracking => carve_backtracking(grid, rng, w, h),
            MazeAlgorithm::Prim => carve_prim(grid, rng, w, h),
            MazeAlgorithm::Division => carve_division(grid, rng, w, h),
        }

        if self.config.loop_chance > 0.0 {
            inject_loops(grid, rng, w, h, self.config.loop_chance);
        }
        if self.config.openness > 0.0 {
            open_walls(grid, rng, w, h, self.config.openness);
        }
        if self.config.dead_end_removal > 0 {
            effects::remove_dead_ends(grid, self.config.dead_end_removal);
        }

        let mut stats = Stats::new();
        stats.set("algorithm", self.config.algorithm.as_str());
        stats
    }

    fn name(&self) -> &'static str {
        "maze"
    }
}

fn odd_extent(n: usize) -> usize {
    if n % 2 == 0 {
        n - 1
    } else {
        n
    }
}

fn in_cell_bounds(x: i32, y: i32, w: usize, h: usize) -> bool {
    x >= 1 && y >= 1 && x <= (w - 2) as i32 && y <= (h - 2) as i32
}

/// Depth-first carving with an explicit stack.
fn carve_backtracking(grid: &mut Grid<Tile>, rng: &mut Rng, w: usize, h: usize) {
    grid.set(1, 1, Tile::Floor);
    let mut stack: Vec<(i32, i32)> = vec![(1, 1)];

    while let Some(&(cx, cy)) = stack.last() {
        let mut dirs = CELL_DIRS;
        rng.shuffle(&mut dirs);

        let mut advanced = false;
        for (dx, dy) in dirs {
            let nx = cx + dx;
            let ny = cy + dy;
            if in_cell_bounds(nx, ny, w, h)
                && grid.get(nx, ny).is_some_and(Tile::is_wall)
            {
                grid.set(cx + dx / 2, cy + dy / 2, Tile::Floor);
                grid.set(nx, ny, Tile::Floor);
                stack.push((nx, ny));
                advanced = true;
                break;
            }
        }
        if !advanced {
            stack.pop();
        }
    }
}

/// Frontier-based carving in the manner of Prim's algorithm.
fn carve_prim(grid: &mut Grid<Tile>, rng: &mut Rng, w: usize, h: usize) {
    grid.set(1, 1, Tile::Floor);
    let mut frontier: Vec<(i32, i32)> = Vec::new();
    push_frontier(grid, &mut frontier, 1, 1, w, h);

    while !frontier.is_empty() {
        let idx = (rng.random() * frontier.len() as f64) as usize;
        let (fx, fy) = frontier.swap_remove(idx);
        if !grid.get(fx, fy).is_some_and(Tile::is_wall) {
            continue;
        }

        let carved: Vec<(i32, i32)> = CELL_DIRS
            .iter()
            .map(|&(dx, dy)| (fx + dx, fy + dy))
            .filter(|&(nx, ny)| {
                in_cell_bounds(nx, ny, w, h) && grid.get(nx, ny).is_some_and(Tile::is_walkable)
            })
            .collect();
        let Some(&(px, py)) = rng.pick(&carved) else {
            continue;
        };

        grid.set((fx + px) / 2, (fy + py) / 2, Tile::Floor);
        grid.set(fx, fy, Tile::Floor);
        push_frontier(grid, &mut frontier, fx, fy, w, h);
    }
}

fn push_frontier(grid: &Grid<Tile>, frontier: &mut Vec<(i32, i32)>, x: i32, y: i32, w: usize, h: usize) {
    for (dx, dy) in CELL_DIRS {
        let nx = x + dx;
        let ny = y + dy;
        if in_cell_bounds(nx, ny, w, h)
            && grid.get(nx, ny).is_some_and(Tile::is_wall)
            && !frontier.contains(&(nx, ny))
        {
            frontier.push((nx, ny));
        }
    }
}

/// Recursive division: open interior, then walls with single gaps.
fn carve_division(grid: &mut Grid<Tile>, rng: &mut Rng, w: usize, h: usize) {
    grid.fill_rect(1, 1, w - 2, h - 2, Tile::Floor);
    divide(grid, rng, 1, 1, w - 2, h - 2);
}

fn divide(grid: &mut Grid<Tile>, rng: &mut Rng, x: usize, y: usize, w: usize, h: usize) {
    if w < 3 || h < 3 {
        return;
    }

    let split_vertical = if w > h {
        true
    } else if h > w {
        false
    } else {
        rng.chance(0.5)
    };

    if split_vertical {
        // Wall at an even column, gap at an odd row.
        let walls: Vec<usize> = (x + 1..x + w - 1).filter(|v| v % 2 == 0).collect();
        let gaps: Vec<usize> = (y..y + h).filter(|v| v % 2 == 1).collect();
        let (Some(&wx), Some(&gy)) = (rng.pick(&walls), rng.pick(&gaps)) else {
            return;
        };
        for yy in y..y + h {
            if yy != gy {
                grid.set(wx as i32, yy as i32, Tile::Wall);
            }
        }
        divide(grid, rng, x, y, wx - x, h);
        divide(grid, rng, wx + 1, y, x + w - wx - 1, h);
    } else {
        let walls: Vec<usize> = (y + 1..y + h - 1).filter(|v| v % 2 == 0).collect();
        let gaps: Vec<usize> = (x..x + w).filter(|v| v % 2 == 1).collect();
        let (Some(&wy), Some(&gx)) = (rng.pick(&walls), rng.pick(&gaps)) else {
            return;
        };
        for xx in x..x + w {
            if xx != gx {
                grid.set(xx as i32, wy as i32, Tile::Wall);
            }
        }
        divide(grid, rng, x, y, w, wy - y);
        divide(grid, rng, x, wy + 1, w, y + h - wy - 1);
    }
}

/// Open inter-cell walls (mixed-parity coordinates) with the given chance.
fn inject_loops(grid: &mut Grid<Tile>, rng: &mut Rng, w: usize, h: usize, chance: f64) {
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            if (x % 2 == 0) != (y % 2 == 0)
                && grid[(x, y)].is_wall()
                && rng.chance(chance)
            {
                grid.set(x as i32, y as i32, Tile::Floor);
            }
        }
    }
}

/// Open any interior wall with the given chance.
fn open_walls(grid: &mut Grid<Tile>, rng: &mut Rng, w: usize, h: usize, chance: f64) {
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            if grid[(x, y)].is_wall() && rng.chance(chance) {
                grid.set(x as i32, y as i32, Tile::Floor);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Count 4-adjacent walkable pairs without double counting.
    fn walkable_edges(grid: &Grid<Tile>) -> usize {
        let mut edges = 0;
        for (x, y, t) in grid.iter() {
            if !t.is_walkable() {
                continue;
            }
            if x + 1 < grid.width() && grid[(x + 1, y)].is_walkable() {
                edges += 1;
            }
            if y + 1 < grid.height() && grid[(x, y + 1)].is_walkable() {
                edges += 1;
            }
        }
        edges
    }

    #[test]
    fn perfect_mazes_are_trees() {
        for algorithm in [
            MazeAlgorithm::Backtracking,
            MazeAlgorithm::Prim,
            MazeAlgorithm::Division,
        ] {
            let mut grid: Grid<Tile> = Grid::new(17, 17);
            Maze::new(MazeConfig {
                algorithm,
                ..MazeConfig::default()
            })
            .generate(&mut grid, &mut Rng::new(1));

            let cells = grid.count(|t| t.is_walkable());
            assert_eq!(
                walkable_edges(&grid),
                cells - 1,
                "{} should carve a tree",
                algorithm.as_str()
            );
            assert_eq!(grid.flood_regions().len(), 1);
        }
    }

    #[test]
    fn backtracking_has_no_open_blocks() {
        let mut grid: Grid<Tile> = Grid::new(17, 17);
        Maze::default().generate(&mut grid, &mut Rng::new(1));
        for y in 0..16 {
            for x in 0..16 {
                let open = grid[(x, y)].is_walkable()
                    && grid[(x + 1, y)].is_walkable()
                    && grid[(x, y + 1)].is_walkable()
                    && grid[(x + 1, y + 1)].is_walkable();
                assert!(!open, "2x2 open block at ({},{})", x, y);
            }
        }
    }

    #[test]
    fn even_size_keeps_last_strip_walled() {
        let mut grid: Grid<Tile> = Grid::new(16, 16);
        Maze::default().generate(&mut grid, &mut Rng::new(3));
        for i in 0..16 {
            assert!(grid[(15, i)].is_wall());
            assert!(grid[(i, 15)].is_wall());
        }
    }

    #[test]
    fn loops_break_tree_structure() {
        let mut grid: Grid<Tile> = Grid::new(33, 33);
        Maze::new(MazeConfig {
            loop_chance: 0.5,
            ..MazeConfig::default()
        })
        .generate(&mut grid, &mut Rng::new(8));
        let cells = grid.count(|t| t.is_walkable());
        assert!(walkable_edges(&grid) > cells - 1);
        assert_eq!(grid.flood_regions().len(), 1, "loops must not disconnect");
    }

    #[test]
    fn maze_deterministic() {
        let mut g1: Grid<Tile> = Grid::new(21, 21);
        let mut g2: Grid<Tile> = Grid::new(21, 21);
        Maze::default().generate(&mut g1, &mut Rng::new(42));
        Maze::default().generate(&mut g2, &mut Rng::new(42));
        assert_eq!(g1, g2);
    }

    #[test]
    fn dead_end_removal_reduces_spurs() {
        let mut pruned: Grid<Tile> = Grid::new(21, 21);
        let mut raw: Grid<Tile> = Grid::new(21, 21);
        Maze::default().generate(&mut raw, &mut Rng::new(6));
        Maze::new(MazeConfig {
            dead_end_removal: 3,
            ..MazeConfig::default()
        })
        .generate(&mut pruned, &mut Rng::new(6));
        assert!(pruned.count(|t| t.is_walkable()) < raw.count(|t| t.is_walkable()));
    }
}
