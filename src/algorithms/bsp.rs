//! BSP dungeon generator

use crate::{Algorithm, Grid, Rng, Stats, Tile};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BspConfig {
    /// Smallest side a partition may be split down to.
    pub min_partition_size: usize,
    pub min_room_size: usize,
    /// Cells kept clear between a room and its partition edge.
    pub padding: usize,
    pub max_depth: usize,
    /// Convert qualifying corridor cells to doors.
    pub doors: bool,
    pub door_chance: f64,
}

impl Default for BspConfig {
    fn default() -> Self {
        Self {
            min_partition_size: 6,
            min_room_size: 4,
            padding: 1,
            max_depth: 4,
            doors: false,
            door_chance: 0.3,
        }
    }
}

/// Binary space partitioning: recursive splits, one room per viable leaf,
/// L-corridors joining sibling subtrees bottom-up.
pub struct Bsp {
    config: BspConfig,
}

impl Bsp {
    pub fn new(config: BspConfig) -> Self {
        Self { config }
    }
}

impl Default for Bsp {
    fn default() -> Self {
        Self::new(BspConfig::default())
    }
}

#[derive(Debug, Clone, Copy)]
struct Rect {
    x: usize,
    y: usize,
    w: usize,
    h: usize,
}

impl Rect {
    fn center(&self) -> (usize, usize) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }
}

struct BspNode {
    x: usize,
    y: usize,
    w: usize,
    h: usize,
    left: Option<Box<BspNode>>,
    right: Option<Box<BspNode>>,
    room: Option<Rect>,
}

impl BspNode {
    fn new(x: usize, y: usize, w: usize, h: usize) -> Self {
        Self {
            x,
            y,
            w,
            h,
            left: None,
            right: None,
            room: None,
        }
    }

    fn split(&mut self, rng: &mut Rng, min_size: usize, depth: usize, max_depth: usize) {
        if depth >= max_depth || self.left.is_some() {
            return;
        }

        let wf = self.w as f64;
        let hf = self.h as f64;
        let vertical = if wf / hf >= 1.25 {
            true
        } else if hf / wf >= 1.25 {
            false
        } else {
            rng.chance(0.5)
        };

        let axis = if vertical { self.w } else { self.h };
        if axis <= min_size {
            return;
        }
        let max_split = axis - min_size;
        if max_split <= min_size {
            return;
        }
        let offset = rng.range_usize(min_size, max_split);

        if vertical {
            self.left = Some(Box::new(BspNode::new(self.x, self.y, offset, self.h)));
            self.right = Some(Box::new(BspNode::new(
                self.x + offset,
                self.y,
                self.w - offset,
                self.h,
            )));
        } else {
            self.left = Some(Box::new(BspNode::new(self.x, self.y, self.w, offset)));
            self.right = Some(Box::new(BspNode::new(
                self.x,
                self.y + offset,
                self.w,
                self.h - offset,
            )));
        }

        if let Some(ref mut left) = self.left {
            left.split(rng, min_size, depth + 1, max_depth);
        }
        if let Some(ref mut right) = self.right {
            right.split(rng, min_size, depth + 1, max_depth);
        }
    }

    fn create_rooms(&mut self, rng: &mut Rng, min_room: usize, padding: usize) {
        if self.left.is_some() || self.right.is_some() {
            if let Some(ref mut left) = self.left {
                left.create_rooms(rng, min_room, padding);
            }
            if let Some(ref mut right) = self.right {
                right.create_rooms(rng, min_room, padding);
            }
            return;
        }

        let avail_w = self.w.saturating_sub(padding * 2);
        let avail_h = self.h.saturating_sub(padding * 2);
        if avail_w < min_room || avail_h < min_room {
            return;
        }

        let room_w = rng.range_usize(min_room, avail_w);
        let room_h = rng.range_usize(min_room, avail_h);
        let rx = self.x + padding + rng.range_usize(0, avail_w - room_w);
        let ry = self.y + padding + rng.range_usize(0, avail_h - room_h);
        self.room = Some(Rect {
            x: rx,
            y: ry,
            w: room_w,
            h: room_h,
        });
    }

    /// First room found beneath this node, preferring the left subtree.
    fn first_room(&self) -> Option<Rect> {
        if let Some(room) = self.room {
            return Some(room);
        }
        self.left
            .as_ref()
            .and_then(|n| n.first_room())
            .or_else(|| self.right.as_ref().and_then(|n| n.first_room()))
    }

    fn carve_rooms(&self, grid: &mut Grid<Tile>) -> usize {
        let mut rooms = 0;
        if let Some(room) = self.room {
            grid.fill_rect(room.x as i32, room.y as i32, room.w, room.h, Tile::Floor);
            rooms += 1;
        }
        if let Some(ref left) = self.left {
            rooms += left.carve_rooms(grid);
        }
        if let Some(ref right) = self.right {
            rooms += right.carve_rooms(grid);
        }
        rooms
    }

    /// Post-order corridor routing between sibling subtrees.
    fn carve_corridors(&self, grid: &mut Grid<Tile>, rng: &mut Rng) -> usize {
        let mut corridors = 0;
        if let (Some(ref left), Some(ref right)) = (&self.left, &self.right) {
            corridors += left.carve_corridors(grid, rng);
            corridors += right.carve_corridors(grid, rng);

            if let (Some(a), Some(b)) = (left.first_room(), right.first_room()) {
                carve_l_corridor(grid, rng, a.center(), b.center());
                corridors += 1;
            }
        }
        corridors
    }
}

/// L-shaped corridor between two points, horizontal-first or
/// vertical-first at random. Only wall cells are converted.
fn carve_l_corridor(grid: &mut Grid<Tile>, rng: &mut Rng, a: (usize, usize), b: (usize, usize)) {
    let (ax, ay) = (a.0 as i32, a.1 as i32);
    let (bx, by) = (b.0 as i32, b.1 as i32);

    let horizontal_first = rng.chance(0.5);
    if horizontal_first {
        carve_run(grid, ax, bx, ay, true);
        carve_run(grid, ay, by, bx, false);
    } else {
        carve_run(grid, ay, by, ax, false);
        carve_run(grid, ax, bx, by, true);
    }
}

fn carve_run(grid: &mut Grid<Tile>, from: i32, to: i32, fixed: i32, horizontal: bool) {
    let lo = from.min(to);
    let hi = from.max(to);
    for v in lo..=hi {
        let (x, y) = if horizontal { (v, fixed) } else { (fixed, v) };
        if grid.get(x, y).is_some_and(Tile::is_wall) {
            grid.set(x, y, Tile::Corridor);
        }
    }
}

/// Corridor cells touching both a room and a wall become doors.
fn place_doors(grid: &mut Grid<Tile>, rng: &mut Rng, chance: f64) -> usize {
    let (w, h) = (grid.width(), grid.height());
    let mut doors = 0;
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            if grid[(x, y)] != Tile::Corridor {
                continue;
            }
            let neighbors = [
                grid[(x - 1, y)],
                grid[(x + 1, y)],
                grid[(x, y - 1)],
                grid[(x, y + 1)],
            ];
            let touches_floor = neighbors.iter().any(|t| *t == Tile::Floor);
            let touches_wall = neighbors.iter().any(Tile::is_wall);
            if touches_floor && touches_wall && rng.chance(chance) {
                grid.set(x as i32, y as i32, Tile::Door);
                doors += 1;
            }
        }
    }
    doors
}

impl Algorithm<Tile> for Bsp {
    fn generate(&self, grid: &mut Grid<Tile>, rng: &mut Rng) -> Stats {
        let (w, h) = (grid.width(), grid.height());
        grid.fill(Tile::Wall);

        let mut root = BspNode::new(1, 1, w - 2, h - 2);
        root.split(rng, self.config.min_partition_size, 0, self.config.max_depth);
        root.create_rooms(rng, self.config.min_room_size, self.config.padding);
        let rooms = root.carve_rooms(grid);
        let corridors = root.carve_corridors(grid, rng);

        let doors = if self.config.doors {
            place_doors(grid, rng, self.config.door_chance)
        } else {
            0
        };

        let mut stats = Stats::new();
        stats.set("rooms", rooms as u64);
        stats.set("corridors", corridors as u64);
        stats.set("doors", doors as u64);
        stats
    }

    fn name(&self) -> &'static str {
        "bsp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bsp_places_rooms_and_corridors() {
        let mut grid: Grid<Tile> = Grid::new(48, 48);
        let stats = Bsp::default().generate(&mut grid, &mut Rng::new(12345));
        assert!(stats.as_u64("rooms").unwrap() >= 2);
        assert!(grid.count(|t| *t == Tile::Floor) > 0);
        assert!(grid.count(|t| *t == Tile::Corridor) > 0);
    }

    #[test]
    fn bsp_deterministic() {
        let mut g1: Grid<Tile> = Grid::new(40, 40);
        let mut g2: Grid<Tile> = Grid::new(40, 40);
        Bsp::default().generate(&mut g1, &mut Rng::new(42));
        Bsp::default().generate(&mut g2, &mut Rng::new(42));
        assert_eq!(g1, g2);
    }

    #[test]
    fn bsp_respects_border() {
        let mut grid: Grid<Tile> = Grid::new(30, 30);
        Bsp::default().generate(&mut grid, &mut Rng::new(99));
        for i in 0..30 {
            assert!(grid[(i, 0)].is_wall());
            assert!(grid[(i, 29)].is_wall());
            assert!(grid[(0, i)].is_wall());
            assert!(grid[(29, i)].is_wall());
        }
    }

    #[test]
    fn doors_sit_between_floor_and_wall() {
        let mut grid: Grid<Tile> = Grid::new(48, 48);
        Bsp::new(BspConfig {
            doors: true,
            door_chance: 1.0,
            ..BspConfig::default()
        })
        .generate(&mut grid, &mut Rng::new(7));

        for (x, y, t) in grid.iter() {
            if *t == Tile::Door {
                let neighbors = [
                    grid[(x - 1, y)],
                    grid[(x + 1, y)],
                    grid[(x, y - 1)],
                    grid[(x, y + 1)],
                ];
                assert!(neighbors.iter().any(|n| *n == Tile::Floor));
            }
        }
    }

    #[test]
    fn deeper_trees_make_more_rooms() {
        let mut shallow: Grid<Tile> = Grid::new(64, 64);
        let mut deep: Grid<Tile> = Grid::new(64, 64);
        let s1 = Bsp::new(BspConfig {
            max_depth: 1,
            ..BspConfig::default()
        })
        .generate(&mut shallow, &mut Rng::new(42));
        let s2 = Bsp::new(BspConfig {
            max_depth: 5,
            ..BspConfig::default()
        })
        .generate(&mut deep, &mut Rng::new(42));
        assert!(s2.as_u64("rooms").unwrap() >= s1.as_u64("rooms").unwrap());
    }
}
