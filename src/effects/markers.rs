//! Start/end marker placement

use super::connectivity::manhattan;
use crate::{Grid, Rng, Tile};

/// Place start and end markers on walkable cells.
///
/// The start is a uniform pick over all walkable cells; the end is a
/// uniform pick among the top 20% (at least one) of the remaining walkable
/// cells ranked by Manhattan distance from the start, descending. With
/// fewer than two walkable cells the grid is left unchanged and `None` is
/// returned.
pub fn place_markers(grid: &mut Grid<Tile>, rng: &mut Rng) -> Option<((usize, usize), (usize, usize))> {
    let walkable: Vec<(usize, usize)> = grid
        .iter()
        .filter(|(_, _, t)| t.is_walkable())
        .map(|(x, y, _)| (x, y))
        .collect();
    if walkable.len() < 2 {
        return None;
    }

    let start = *rng.pick(&walkable)?;
    let mut candidates: Vec<(usize, usize)> =
        walkable.into_iter().filter(|&c| c != start).collect();
    candidates.sort_by_key(|&c| std::cmp::Reverse(manhattan(start, c)));
    let top = (candidates.len() / 5).max(1);
    let end = *rng.pick(&candidates[..top])?;

    grid.set(start.0 as i32, start.1 as i32, Tile::Start);
    grid.set(end.0 as i32, end.1 as i32, Tile::End);
    Some((start, end))
}

/// Scanline marker placement used by the maze generator: the first floor
/// cell from the top-left becomes the start, the first from the
/// bottom-right becomes the end.
pub fn place_markers_scanline(grid: &mut Grid<Tile>) -> Option<((usize, usize), (usize, usize))> {
    let (w, h) = (grid.width(), grid.height());
    let mut start = None;
    'forward: for y in 0..h {
        for x in 0..w {
            if grid[(x, y)].is_walkable() {
                start = Some((x, y));
                break 'forward;
            }
        }
    }
    let mut end = None;
    'backward: for y in (0..h).rev() {
        for x in (0..w).rev() {
            if grid[(x, y)].is_walkable() {
                end = Some((x, y));
                break 'backward;
            }
        }
    }

    match (start, end) {
        (Some(s), Some(e)) if s != e => {
            grid.set(s.0 as i32, s.1 as i32, Tile::Start);
            grid.set(e.0 as i32, e.1 as i32, Tile::End);
            Some((s, e))
        }
        _ => None,
    }
}
