//! Wave Function Collapse dungeon generator

use crate::{Algorithm, Grid, Rng, Stats, Tile};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WfcConfig {
    /// Snapshot restores allowed before giving up.
    pub max_backtracks: usize,
}

impl Default for WfcConfig {
    fn default() -> Self {
        Self { max_backtracks: 100 }
    }
}

// Possibility bitmask over the four-tile WFC domain.
const WALL: u8 = 1 << 0;
const FLOOR: u8 = 1 << 1;
const DOOR: u8 = 1 << 2;
const CORRIDOR: u8 = 1 << 3;
const ALL: u8 = WALL | FLOOR | DOOR | CORRIDOR;

const BITS: [u8; 4] = [WALL, FLOOR, DOOR, CORRIDOR];

/// Symmetric adjacency: doors may only touch floor and corridor; every
/// other pairing is free except wall-door.
fn allowed_neighbors(bit: u8) -> u8 {
    match bit {
        WALL => WALL | FLOOR | CORRIDOR,
        FLOOR => ALL,
        DOOR => FLOOR | CORRIDOR,
        CORRIDOR => ALL,
        _ => 0,
    }
}

fn collapse_weight(bit: u8) -> f64 {
    match bit {
        WALL => 2.0,
        FLOOR => 5.0,
        DOOR => 1.0,
        CORRIDOR => 3.0,
        _ => 0.0,
    }
}

fn bit_to_tile(bit: u8) -> Tile {
    match bit {
        FLOOR => Tile::Floor,
        DOOR => Tile::Door,
        CORRIDOR => Tile::Corridor,
        _ => Tile::Wall,
    }
}

fn first_bit(mask: u8) -> u8 {
    mask & mask.wrapping_neg()
}

/// One restorable decision: the cell state before a collapse, plus which
/// cell was collapsed.
struct Frame {
    options: Vec<u8>,
    collapsed: Vec<bool>,
    cell: usize,
}

/// Constraint-propagation generator with snapshot backtracking.
///
/// Cells start in full superposition, the border pre-collapsed to wall and
/// a central disc pinned to open tiles so the map grows outward from a
/// walkable core. A contradiction restores the latest snapshot and strikes
/// the first option of the cell collapsed there; cells that still hold
/// several options when the backtrack budget runs out fall back to their
/// first remaining option.
pub struct Wfc {
    config: WfcConfig,
}

impl Wfc {
    pub fn new(config: WfcConfig) -> Self {
        Self { config }
    }
}

impl Default for Wfc {
    fn default() -> Self {
        Self::new(WfcConfig::default())
    }
}

struct WfcState {
    w: usize,
    h: usize,
    options: Vec<u8>,
    collapsed: Vec<bool>,
}

impl WfcState {
    fn new(w: usize, h: usize) -> Self {
        let mut state = Self {
            w,
            h,
            options: vec![ALL; w * h],
            collapsed: vec![false; w * h],
        };

        for x in 0..w {
            state.pin(x, 0, WALL);
            state.pin(x, h - 1, WALL);
        }
        for y in 0..h {
            state.pin(0, y, WALL);
            state.pin(w - 1, y, WALL);
        }

        // Walkable seed disc around the center.
        let (cx, cy) = (w / 2, h / 2);
        let radius = w.min(h) / 6;
        for y in 1..h - 1 {
            for x in 1..w - 1 {
                if cx.abs_diff(x) + cy.abs_diff(y) <= radius {
                    state.options[y * w + x] = FLOOR | CORRIDOR;
                }
            }
        }
        state
    }

    fn pin(&mut self, x: usize, y: usize, bit: u8) {
        let idx = y * self.w + x;
        self.options[idx] = bit;
        self.collapsed[idx] = true;
    }

    /// Uncollapsed cell with the fewest (nonzero) options; ties resolved
    /// by a uniform pick.
    fn min_entropy_cell(&self, rng: &mut Rng) -> Option<usize> {
        let mut min = u32::MAX;
        let mut candidates = Vec::new();
        for idx in 0..self.options.len() {
            if self.collapsed[idx] {
                continue;
            }
            let n = self.options[idx].count_ones();
            if n == 0 {
                continue;
            }
            if n < min {
                min = n;
                candidates.clear();
                candidates.push(idx);
            } else if n == min {
                candidates.push(idx);
            }
        }
        rng.pick(&candidates).copied()
    }

    fn collapse(&mut self, idx: usize, rng: &mut Rng) {
        let mask = self.options[idx];
        let bits: Vec<u8> = BITS.iter().copied().filter(|&b| mask & b != 0).collect();
        let weights: Vec<f64> = bits.iter().map(|&b| collapse_weight(b)).collect();
        let chosen = bits[rng.weighted_index(&weights)];
        self.options[idx] = chosen;
        self.collapsed[idx] = true;
    }

    /// Worklist constraint propagation from `start`. Returns `false` on
    /// contradiction (some neighbour lost its last option).
    fn propagate(&mut self, start: usize) -> bool {
        let mut worklist = VecDeque::new();
        worklist.push_back(start);

        while let Some(idx) = worklist.pop_front() {
            let (x, y) = (idx % self.w, idx / self.w);
            let from = self.options[idx];

            let mut neighbors = [usize::MAX; 4];
            let mut count = 0;
            if x > 0 {
                neighbors[count] = idx - 1;
                count += 1;
            }
            if x + 1 < self.w {
                neighbors[count] = idx + 1;
                count += 1;
            }
            if y > 0 {
                neighbors[count] = idx - self.w;
                count += 1;
            }
            if y + 1 < self.h {
                neighbors[count] = idx + self.w;
                count += 1;
            }

            for &nidx in &neighbors[..count] {
                let current = self.options[nidx];

                // Union of tiles the source still permits next door.
                let mut forward = 0u8;
                for &b in &BITS {
                    if from & b != 0 {
                        forward |= allowed_neighbors(b);
                    }
                }
                // Back-constraint: neighbour options that allow at least
                // one of the source's options from their side.
                let mut back = 0u8;
                for &b in &BITS {
                    if current & b != 0 && allowed_neighbors(b) & from != 0 {
                        back |= b;
                    }
                }

                let next = current & forward & back;
                if next == current {
                    continue;
                }
                if next == 0 {
                    return false;
                }
                self.options[nidx] = next;
                if next.count_ones() == 1 {
                    self.collapsed[nidx] = true;
                    worklist.push_back(nidx);
                }
            }
        }
        true
    }
}

impl Algorithm<Tile> for Wfc {
    fn generate(&self, grid: &mut Grid<Tile>, rng: &mut Rng) -> Stats {
        let (w, h) = (grid.width(), grid.height());
        let mut state = WfcState::new(w, h);
        let mut history: VecDeque<Frame> = VecDeque::new();
        let history_cap = 2 * self.config.max_backtracks;
        let mut backtracks = 0usize;
        let mut gave_up = false;

        'main: while let Some(idx) = state.min_entropy_cell(rng) {
            history.push_back(Frame {
                options: state.options.clone(),
                collapsed: state.collapsed.clone(),
                cell: idx,
            });
            if history.len() > history_cap {
                history.pop_front();
            }

            state.collapse(idx, rng);
            if state.propagate(idx) {
                continue;
            }

            // Contradiction: rewind, striking the first option of each
            // restored frame's cell until a live choice remains. When the
            // budget runs out the last restored snapshot is kept as is, so
            // the state stays consistent for the defaulting pass.
            loop {
                let Some(frame) = history.pop_back() else {
                    gave_up = true;
                    break 'main;
                };
                state.options = frame.options;
                state.collapsed = frame.collapsed;
                if backtracks >= self.config.max_backtracks {
                    gave_up = true;
                    break 'main;
                }
                backtracks += 1;
                let remaining = state.options[frame.cell] & !first_bit(state.options[frame.cell]);
                state.options[frame.cell] = remaining;
                if remaining != 0 {
                    break;
                }
            }
        }

        // Any cell still holding several options keeps its first one.
        let mut defaulted = 0u64;
        for idx in 0..state.options.len() {
            if state.options[idx].count_ones() != 1 {
                state.options[idx] = if state.options[idx] == 0 {
                    WALL
                } else {
                    first_bit(state.options[idx])
                };
                defaulted += 1;
            }
        }

        for y in 0..h {
            for x in 0..w {
                grid.set(x as i32, y as i32, bit_to_tile(state.options[y * w + x]));
            }
        }

        let mut stats = Stats::new();
        stats.set("backtracks", backtracks as u64);
        stats.set("max_backtracks", self.config.max_backtracks as u64);
        stats.set("defaulted_cells", defaulted);
        if gave_up {
            stats.set("backtrack_budget_exhausted", true);
        }
        stats
    }

    fn name(&self) -> &'static str {
        "wfc"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile_bit(t: Tile) -> u8 {
        match t {
            Tile::Floor => FLOOR,
            Tile::Door => DOOR,
            Tile::Corridor => CORRIDOR,
            _ => WALL,
        }
    }

    #[test]
    fn wfc_deterministic() {
        let mut g1: Grid<Tile> = Grid::new(16, 16);
        let mut g2: Grid<Tile> = Grid::new(16, 16);
        Wfc::default().generate(&mut g1, &mut Rng::new(100));
        Wfc::default().generate(&mut g2, &mut Rng::new(100));
        assert_eq!(g1, g2);
    }

    #[test]
    fn wfc_output_obeys_adjacency() {
        for seed in [1u32, 9, 100, 555] {
            let mut grid: Grid<Tile> = Grid::new(16, 16);
            Wfc::default().generate(&mut grid, &mut Rng::new(seed));
            for (x, y, t) in grid.iter() {
                for (nx, ny) in grid.neighbors_4(x, y) {
                    let n = grid[(nx, ny)];
                    assert!(
                        allowed_neighbors(tile_bit(*t)) & tile_bit(n) != 0,
                        "seed {}: {:?} at ({},{}) next to {:?}",
                        seed,
                        t,
                        x,
                        y,
                        n
                    );
                }
            }
        }
    }

    #[test]
    fn no_door_touches_wall_or_door() {
        let mut grid: Grid<Tile> = Grid::new(16, 16);
        Wfc::default().generate(&mut grid, &mut Rng::new(100));
        for (x, y, t) in grid.iter() {
            if *t == Tile::Door {
                for (nx, ny) in grid.neighbors_4(x, y) {
                    let n = grid[(nx, ny)];
                    assert!(n != Tile::Wall && n != Tile::Door);
                }
            }
        }
    }

    #[test]
    fn border_collapses_to_wall() {
        let mut grid: Grid<Tile> = Grid::new(20, 20);
        Wfc::default().generate(&mut grid, &mut Rng::new(3));
        for i in 0..20 {
            assert!(grid[(i, 0)].is_wall());
            assert!(grid[(i, 19)].is_wall());
            assert!(grid[(0, i)].is_wall());
            assert!(grid[(19, i)].is_wall());
        }
    }

    #[test]
    fn seed_disc_stays_open() {
        let mut grid: Grid<Tile> = Grid::new(24, 24);
        Wfc::default().generate(&mut grid, &mut Rng::new(42));
        // Disc cells can only be floor or corridor.
        let (cx, cy) = (12usize, 12usize);
        for (x, y, t) in grid.iter() {
            if cx.abs_diff(x) + cy.abs_diff(y) <= 4 {
                assert!(matches!(t, Tile::Floor | Tile::Corridor), "({},{}) = {:?}", x, y, t);
            }
        }
    }
}
