//! Connectivity repair for dungeon grids

use crate::{Grid, Tile};
use serde::{Deserialize, Serialize};

/// How a generator guarantees a single walkable region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectivityPolicy {
    /// Wall in every walkable cell outside the largest region.
    #[default]
    KeepLargest,
    /// Carve corridors between regions until one remains.
    Stitch,
}

/// Apply the chosen policy. A grid with no walkable cell at all is left
/// unchanged; that case is reported through stats, not as an error.
pub fn ensure_connected(grid: &mut Grid<Tile>, policy: ConnectivityPolicy) {
    match policy {
        ConnectivityPolicy::KeepLargest => {
            keep_largest_region(grid);
        }
        ConnectivityPolicy::Stitch => {
            stitch_regions(grid);
        }
    }
}

/// Fill every walkable cell outside the largest region with wall. Ties are
/// broken by first-encountered region. Returns the number of cells filled.
pub fn keep_largest_region(grid: &mut Grid<Tile>) -> usize {
    let regions = grid.flood_regions();
    if regions.len() <= 1 {
        return 0;
    }

    let mut largest = 0;
    for (i, region) in regions.iter().enumerate() {
        if region.len() > regions[largest].len() {
            largest = i;
        }
    }

    let mut filled = 0;
    for (i, region) in regions.iter().enumerate() {
        if i == largest {
            continue;
        }
        for &(x, y) in region {
            grid.set(x as i32, y as i32, Tile::Wall);
            filled += 1;
        }
    }
    filled
}

/// Carve L-shaped corridors between the closest pair of regions until a
/// single region remains. Returns the number of corridors carved.
///
/// Each pass joins at least two regions, so the loop terminates.
pub fn stitch_regions(grid: &mut Grid<Tile>) -> usize {
    let mut corridors = 0;
    loop {
        let regions = grid.flood_regions();
        if regions.len() <= 1 {
            return corridors;
        }

        let mut best: Option<((usize, usize), (usize, usize))> = None;
        let mut best_dist = usize::MAX;
        for i in 0..regions.len() {
            for j in (i + 1)..regions.len() {
                for &a in &regions[i] {
                    for &b in &regions[j] {
                        let dist = manhattan(a, b);
                        if dist < best_dist {
                            best_dist = dist;
                            best = Some((a, b));
                        }
                    }
                }
            }
        }

        let Some((a, b)) = best else {
            return corridors;
        };
        carve_l_corridor(grid, a, b);
        corridors += 1;
    }
}

/// Horizontal-then-vertical corridor, converting intervening walls only.
fn carve_l_corridor(grid: &mut Grid<Tile>, from: (usize, usize), to: (usize, usize)) {
    let (x0, y0) = (from.0 as i32, from.1 as i32);
    let (x1, y1) = (to.0 as i32, to.1 as i32);

    let mut x = x0;
    while x != x1 {
        x += (x1 - x0).signum();
        carve_corridor_cell(grid, x, y0);
    }
    let mut y = y0;
    while y != y1 {
        y += (y1 - y0).signum();
        carve_corridor_cell(grid, x1, y);
    }
}

fn carve_corridor_cell(grid: &mut Grid<Tile>, x: i32, y: i32) {
    if grid.get(x, y).is_some_and(Tile::is_wall) {
        grid.set(x, y, Tile::Corridor);
    }
}

/// Iteratively wall in floor cells with at most one walkable neighbour.
pub fn remove_dead_ends(grid: &mut Grid<Tile>, iterations: usize) {
    let (w, h) = (grid.width(), grid.height());

    for _ in 0..iterations {
        let mut changed = false;
        for y in 1..h - 1 {
            for x in 1..w - 1 {
                if !grid[(x, y)].is_walkable() {
                    continue;
                }
                let open = [
                    grid[(x - 1, y)].is_walkable(),
                    grid[(x + 1, y)].is_walkable(),
                    grid[(x, y - 1)].is_walkable(),
                    grid[(x, y + 1)].is_walkable(),
                ]
                .iter()
                .filter(|&&b| b)
                .count();
                if open <= 1 {
                    grid.set(x as i32, y as i32, Tile::Wall);
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }
}

pub(crate) fn manhattan(a: (usize, usize), b: (usize, usize)) -> usize {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_island_grid() -> Grid<Tile> {
        let mut grid: Grid<Tile> = Grid::new(20, 20);
        grid.fill_rect(2, 2, 4, 4, Tile::Floor);
        grid.fill_rect(12, 12, 3, 3, Tile::Floor);
        grid
    }

    #[test]
    fn keep_largest_leaves_one_region() {
        let mut grid = two_island_grid();
        let filled = keep_largest_region(&mut grid);
        assert_eq!(filled, 9);
        assert_eq!(grid.flood_regions().len(), 1);
        assert_eq!(grid.count(|t| t.is_walkable()), 16);
    }

    #[test]
    fn keep_largest_tie_keeps_first() {
        let mut grid: Grid<Tile> = Grid::new(12, 12);
        grid.fill_rect(1, 1, 2, 2, Tile::Floor);
        grid.fill_rect(8, 8, 2, 2, Tile::Floor);
        keep_largest_region(&mut grid);
        assert!(grid[(1, 1)].is_walkable());
        assert!(grid[(8, 8)].is_wall());
    }

    #[test]
    fn stitch_joins_regions_with_corridor_tiles() {
        let mut grid = two_island_grid();
        let carved = stitch_regions(&mut grid);
        assert_eq!(carved, 1);
        assert_eq!(grid.flood_regions().len(), 1);
        assert!(grid.count(|t| *t == Tile::Corridor) > 0);
    }

    #[test]
    fn stitch_three_regions_terminates() {
        let mut grid: Grid<Tile> = Grid::new(24, 24);
        grid.fill_rect(1, 1, 3, 3, Tile::Floor);
        grid.fill_rect(10, 10, 3, 3, Tile::Floor);
        grid.fill_rect(19, 2, 3, 3, Tile::Floor);
        stitch_regions(&mut grid);
        assert_eq!(grid.flood_regions().len(), 1);
    }

    #[test]
    fn stitch_on_empty_grid_is_noop() {
        let mut grid: Grid<Tile> = Grid::new(10, 10);
        assert_eq!(stitch_regions(&mut grid), 0);
        assert_eq!(grid.count(|t| t.is_walkable()), 0);
    }

    #[test]
    fn dead_end_removal_prunes_corridors() {
        let mut grid: Grid<Tile> = Grid::new(12, 12);
        grid.fill_rect(2, 2, 4, 4, Tile::Floor);
        // A one-wide spur off the room.
        for x in 6..10 {
            grid.set(x, 3, Tile::Floor);
        }
        remove_dead_ends(&mut grid, 10);
        assert!(grid[(9, 3)].is_wall());
        assert!(grid[(2, 2)].is_walkable());
    }
}
