//! Literal end-to-end scenarios across the generator family.

use tileforge::algorithms::{BspConfig, DrunkardConfig, MazeAlgorithm, MazeConfig, PerlinConfig, WalkVariant, WfcConfig};
use tileforge::{generate, Kind, Options, Terrain, Tile};

#[test]
fn caves_32_seed_42() {
    let result = generate(Kind::parse("caves").unwrap(), 32, &Options::seeded(42)).unwrap();
    let grid = result.map.as_dungeon().unwrap();

    for i in 0..32 {
        assert!(grid[(i, 0)].is_wall());
        assert!(grid[(i, 31)].is_wall());
        assert!(grid[(0, i)].is_wall());
        assert!(grid[(31, i)].is_wall());
    }

    let pct = result.stats.as_f64("floor_percentage").unwrap();
    assert!((15.0..=75.0).contains(&pct), "floor percentage {}", pct);
    assert_eq!(grid.flood_regions().len(), 1);

    let again = generate(Kind::parse("caves").unwrap(), 32, &Options::seeded(42)).unwrap();
    assert_eq!(result.map, again.map);
}

#[test]
fn bsp_32_seed_7_with_markers() {
    let kind = Kind::Bsp(BspConfig {
        min_partition_size: 6,
        max_depth: 4,
        ..BspConfig::default()
    });
    let options = Options {
        place_markers: Some(true),
        ..Options::seeded(7)
    };
    let result = generate(kind, 32, &options).unwrap();
    let grid = result.map.as_dungeon().unwrap();

    assert!(result.stats.as_u64("rooms").unwrap() >= 2);
    assert!(grid.count(|t| *t == Tile::Floor) > 0);
    assert!(grid.count(|t| *t == Tile::Corridor) > 0);
    assert_eq!(grid.count(|t| *t == Tile::Start), 1);
    assert_eq!(grid.count(|t| *t == Tile::End), 1);
}

#[test]
fn wfc_16_seed_100_obeys_adjacency() {
    fn ok(a: Tile, b: Tile) -> bool {
        match a {
            Tile::Wall => !matches!(b, Tile::Door),
            Tile::Door => matches!(b, Tile::Floor | Tile::Corridor),
            _ => true,
        }
    }

    let kind = Kind::Wfc(WfcConfig { max_backtracks: 50 });
    let result = generate(kind, 16, &Options::seeded(100)).unwrap();
    let grid = result.map.as_dungeon().unwrap();

    for (x, y, t) in grid.iter() {
        for (nx, ny) in grid.neighbors_4(x, y) {
            let n = grid[(nx, ny)];
            assert!(ok(*t, n), "{:?} at ({},{}) adjacent to {:?}", t, x, y, n);
            if *t == Tile::Door {
                assert!(n != Tile::Wall && n != Tile::Door);
            }
        }
    }
}

#[test]
fn maze_17_seed_1_is_a_perfect_tree() {
    let kind = Kind::Maze(MazeConfig {
        algorithm: MazeAlgorithm::Backtracking,
        loop_chance: 0.0,
        ..MazeConfig::default()
    });
    let result = generate(kind, 17, &Options::seeded(1)).unwrap();
    let grid = result.map.as_dungeon().unwrap();

    let cells = grid.count(|t| t.is_walkable());
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
    assert_eq!(edges, cells - 1, "walkable cells must form a tree");

    assert_eq!(grid.count(|t| *t == Tile::Start), 1);
    assert_eq!(grid.count(|t| *t == Tile::End), 1);

    for y in 0..grid.height() - 1 {
        for x in 0..grid.width() - 1 {
            let open = grid[(x, y)].is_walkable()
                && grid[(x + 1, y)].is_walkable()
                && grid[(x, y + 1)].is_walkable()
                && grid[(x + 1, y + 1)].is_walkable();
            assert!(!open, "2x2 open block at ({},{})", x, y);
        }
    }
}

#[test]
fn perlin_64_seed_9_island() {
    let kind = Kind::Perlin(PerlinConfig {
        island_mode: true,
        island_falloff: 1.8,
        ..PerlinConfig::default()
    });
    let result = generate(kind, 64, &Options::seeded(9)).unwrap();
    let grid = result.map.as_terrain().unwrap();

    for (x, y) in [(0, 0), (63, 0), (0, 63), (63, 63)] {
        assert_eq!(grid[(x, y)], Terrain::DeepWater);
    }

    let sum = result.stats.as_f64("water_percent").unwrap()
        + result.stats.as_f64("land_percent").unwrap()
        + result.stats.as_f64("mountain_percent").unwrap();
    assert!((sum - 100.0).abs() <= 0.3, "percentages summed to {}", sum);
}

#[test]
fn drunkard_24_seed_5_weighted() {
    let kind = Kind::Drunkard(DrunkardConfig {
        variant: WalkVariant::Weighted,
        fill_percentage: 0.45,
        ..DrunkardConfig::default()
    });
    let result = generate(kind, 24, &Options::seeded(5)).unwrap();
    let grid = result.map.as_dungeon().unwrap();

    let pct = result.stats.as_f64("floor_percentage").unwrap();
    assert!((30.0..=55.0).contains(&pct), "floor percentage {}", pct);
    assert_eq!(grid.flood_regions().len(), 1);
}

#[test]
fn perlin_smoothness_over_a_seed_sample() {
    // Adjacent cells should be within one band of each other for at least
    // 98% of adjacent pairs, sampled over 50 seeds.
    let mut within = 0usize;
    let mut total = 0usize;
    for seed in 0..50u32 {
        let result =
            generate(Kind::parse("perlin").unwrap(), 32, &Options::seeded(seed)).unwrap();
        let grid = result.map.as_terrain().unwrap();
        for (x, y, t) in grid.iter() {
            for (nx, ny) in [(x + 1, y), (x, y + 1)] {
                if nx < grid.width() && ny < grid.height() {
                    total += 1;
                    if (*t as i8 - grid[(nx, ny)] as i8).abs() <= 1 {
                        within += 1;
                    }
                }
            }
        }
    }
    let ratio = within as f64 / total as f64;
    assert!(ratio >= 0.98, "only {:.4} of adjacent pairs within one band", ratio);
}
