//! Core grid and tile types for map generation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Trait for grid cells
pub trait Cell: Clone + Default {
    fn is_passable(&self) -> bool;
}

/// Dungeon tile vocabulary.
///
/// Discriminants are the wire values downstream layers expect; every tile
/// except [`Tile::Wall`] is walkable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Tile {
    #[default]
    Wall = 0,
    Floor = 1,
    Door = 2,
    SecretDoor = 3,
    Start = 4,
    End = 5,
    Corridor = 6,
}

impl Tile {
    pub fn is_wall(&self) -> bool {
        matches!(self, Tile::Wall)
    }

    /// Walkable set of the dungeon vocabulary.
    pub fn is_walkable(&self) -> bool {
        !self.is_wall()
    }

    /// Floor-like set used for connectivity analysis. Identical to the
    /// walkable set in this vocabulary.
    pub fn is_floor_like(&self) -> bool {
        self.is_walkable()
    }
}

impl Cell for Tile {
    fn is_passable(&self) -> bool {
        self.is_walkable()
    }
}

/// Terrain tile vocabulary, banded from low elevation to high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Terrain {
    #[default]
    DeepWater = 0,
    Water = 1,
    Sand = 2,
    Grass = 3,
    Forest = 4,
    Mountain = 5,
}

impl Terrain {
    /// Walkable set of the terrain vocabulary. Water and mountain are
    /// impassable.
    pub fn is_walkable(&self) -> bool {
        matches!(self, Terrain::Sand | Terrain::Grass | Terrain::Forest)
    }

    pub fn is_water(&self) -> bool {
        matches!(self, Terrain::DeepWater | Terrain::Water)
    }
}

impl Cell for Terrain {
    fn is_passable(&self) -> bool {
        self.is_walkable()
    }
}

/// 2D grid of cells, row-major. `(x, y)` addresses row `y`, column `x`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid<C: Cell = Tile> {
    width: usize,
    height: usize,
    cells: Vec<C>,
}

impl<C: Cell> Grid<C> {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![C::default(); width * height],
        }
    }

    #[must_use]
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    #[must_use]
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<&C> {
        if self.in_bounds(x, y) {
            Some(&self.cells[y as usize * self.width + x as usize])
        } else {
            None
        }
    }

    #[inline]
    pub fn set(&mut self, x: i32, y: i32, cell: C) -> bool {
        if self.in_bounds(x, y) {
            self.cells[y as usize * self.width + x as usize] = cell;
            true
        } else {
            false
        }
    }

    pub fn fill(&mut self, cell: C) {
        self.cells.fill(cell);
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: usize, h: usize, cell: C) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx as i32, y + dy as i32, cell.clone());
            }
        }
    }

    #[must_use]
    pub fn count<F: Fn(&C) -> bool>(&self, predicate: F) -> usize {
        self.cells.iter().filter(|c| predicate(c)).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &C)> {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| (i % self.width, i / self.width, c))
    }

    /// 4-directional neighbors within bounds.
    pub fn neighbors_4(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> {
        let (w, h) = (self.width, self.height);
        let mut n = Vec::with_capacity(4);
        if x > 0 {
            n.push((x - 1, y));
        }
        if x + 1 < w {
            n.push((x + 1, y));
        }
        if y > 0 {
            n.push((x, y - 1));
        }
        if y + 1 < h {
            n.push((x, y + 1));
        }
        n.into_iter()
    }

    /// DFS from `(sx, sy)` over cells satisfying `pred`, returns all
    /// reachable cells including the start when it satisfies `pred`.
    pub fn flood_fill_where<F>(&self, sx: usize, sy: usize, pred: F) -> Vec<(usize, usize)>
    where
        F: Fn(&C) -> bool,
    {
        let (w, h) = (self.width, self.height);
        if sx >= w || sy >= h || !pred(&self[(sx, sy)]) {
            return Vec::new();
        }
        let mut visited = vec![false; w * h];
        let mut stack = vec![(sx, sy)];
        let mut cells = Vec::new();
        while let Some((x, y)) = stack.pop() {
            let idx = y * w + x;
            if visited[idx] {
                continue;
            }
            visited[idx] = true;
            cells.push((x, y));
            if x > 0 && pred(&self[(x - 1, y)]) {
                stack.push((x - 1, y));
            }
            if x + 1 < w && pred(&self[(x + 1, y)]) {
                stack.push((x + 1, y));
            }
            if y > 0 && pred(&self[(x, y - 1)]) {
                stack.push((x, y - 1));
            }
            if y + 1 < h && pred(&self[(x, y + 1)]) {
                stack.push((x, y + 1));
            }
        }
        cells
    }

    /// DFS from `(sx, sy)`, returns all connected passable cells.
    pub fn flood_fill(&self, sx: usize, sy: usize) -> Vec<(usize, usize)> {
        self.flood_fill_where(sx, sy, C::is_passable)
    }

    /// All connected passable regions, in row-major order of their first
    /// cell.
    pub fn flood_regions(&self) -> Vec<Vec<(usize, usize)>> {
        let (w, h) = (self.width, self.height);
        let mut visited = vec![false; w * h];
        let mut regions = Vec::new();
        for y in 0..h {
            for x in 0..w {
                let idx = y * w + x;
                if !visited[idx] && self[(x, y)].is_passable() {
                    let mut stack = vec![(x, y)];
                    let mut region = Vec::new();
                    while let Some((cx, cy)) = stack.pop() {
                        let ci = cy * w + cx;
                        if visited[ci] {
                            continue;
                        }
                        visited[ci] = true;
                        region.push((cx, cy));
                        if cx > 0 && self[(cx - 1, cy)].is_passable() {
                            stack.push((cx - 1, cy));
                        }
                        if cx + 1 < w && self[(cx + 1, cy)].is_passable() {
                            stack.push((cx + 1, cy));
                        }
                        if cy > 0 && self[(cx, cy - 1)].is_passable() {
                            stack.push((cx, cy - 1));
                        }
                        if cy + 1 < h && self[(cx, cy + 1)].is_passable() {
                            stack.push((cx, cy + 1));
                        }
                    }
                    regions.push(region);
                }
            }
        }
        regions
    }
}

impl<C: Cell> Index<(usize, usize)> for Grid<C> {
    type Output = C;
    #[inline]
    fn index(&self, (x, y): (usize, usize)) -> &Self::Output {
        &self.cells[y * self.width + x]
    }
}

impl<C: Cell> IndexMut<(usize, usize)> for Grid<C> {
    #[inline]
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut Self::Output {
        &mut self.cells[y * self.width + x]
    }
}

impl<C: Cell + PartialEq> PartialEq for Grid<C> {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.cells == other.cells
    }
}

impl<C: Cell + Eq> Eq for Grid<C> {}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Tile::Wall => '#',
            Tile::Floor => '.',
            Tile::Door => '+',
            Tile::SecretDoor => '*',
            Tile::Start => '<',
            Tile::End => '>',
            Tile::Corridor => ',',
        };
        write!(f, "{}", c)
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Terrain::DeepWater => '~',
            Terrain::Water => '-',
            Terrain::Sand => '.',
            Terrain::Grass => '"',
            Terrain::Forest => '&',
            Terrain::Mountain => '^',
        };
        write!(f, "{}", c)
    }
}

impl<C: Cell + fmt::Display> fmt::Display for Grid<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                write!(f, "{}", self[(x, y)])?;
            }
            if y + 1 < self.height {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_values_match_vocabulary() {
        assert_eq!(Tile::Wall as u8, 0);
        assert_eq!(Tile::Floor as u8, 1);
        assert_eq!(Tile::Door as u8, 2);
        assert_eq!(Tile::SecretDoor as u8, 3);
        assert_eq!(Tile::Start as u8, 4);
        assert_eq!(Tile::End as u8, 5);
        assert_eq!(Tile::Corridor as u8, 6);
        assert_eq!(Terrain::DeepWater as u8, 0);
        assert_eq!(Terrain::Mountain as u8, 5);
    }

    #[test]
    fn walkable_sets() {
        assert!(!Tile::Wall.is_walkable());
        for t in [
            Tile::Floor,
            Tile::Door,
            Tile::SecretDoor,
            Tile::Start,
            Tile::End,
            Tile::Corridor,
        ] {
            assert!(t.is_walkable());
            assert!(t.is_floor_like());
        }
        for t in [Terrain::Sand, Terrain::Grass, Terrain::Forest] {
            assert!(t.is_walkable());
        }
        for t in [Terrain::DeepWater, Terrain::Water, Terrain::Mountain] {
            assert!(!t.is_walkable());
        }
    }

    #[test]
    fn flood_fill_respects_walls() {
        let mut grid: Grid<Tile> = Grid::new(10, 10);
        grid.fill_rect(1, 1, 3, 3, Tile::Floor);
        grid.fill_rect(6, 6, 2, 2, Tile::Floor);
        let filled = grid.flood_fill(1, 1);
        assert_eq!(filled.len(), 9);
        assert_eq!(grid.flood_regions().len(), 2);
    }

    #[test]
    fn flood_fill_from_wall_is_empty() {
        let grid: Grid<Tile> = Grid::new(8, 8);
        assert!(grid.flood_fill(0, 0).is_empty());
    }

    #[test]
    fn display_renders_rows() {
        let mut grid: Grid<Tile> = Grid::new(3, 2);
        grid.set(1, 0, Tile::Floor);
        assert_eq!(grid.to_string(), "#.#\n###");
    }
}
