//! Hand-authored fallback dungeon

use crate::{Grid, Tile};

/// Side length of the baked-in fallback map.
pub const STATIC_MAP_SIZE: usize = 16;

// Four rooms, three doors, one secret door; fully connected.
const MAP: [&str; STATIC_MAP_SIZE] = [
    "################",
    "#......#.......#",
    "#......#.......#",
    "#......+.......#",
    "#......#.......#",
    "###+####.......#",
    "#......#.......#",
    "#......####+####",
    "#......#.......#",
    "#......#.......#",
    "#..............#",
    "#......#.......#",
    "#......#.......#",
    "####*###.......#",
    "#..............#",
    "################",
];

/// The fixed dungeon returned for the `default` kind: a deterministic
/// baseline that involves no generation at all.
pub fn static_map() -> Grid<Tile> {
    let mut grid = Grid::new(STATIC_MAP_SIZE, STATIC_MAP_SIZE);
    for (y, row) in MAP.iter().enumerate() {
        for (x, c) in row.chars().enumerate() {
            let tile = match c {
                '.' => Tile::Floor,
                '+' => Tile::Door,
                '*' => Tile::SecretDoor,
                '<' => Tile::Start,
                '>' => Tile::End,
                ',' => Tile::Corridor,
                _ => Tile::Wall,
            };
            grid.set(x as i32, y as i32, tile);
        }
    }
    grid
}
