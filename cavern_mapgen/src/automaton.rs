// Cellular-automaton cave generation.
//
// Builds the raw occupancy grid in two stages:
//
// 1. `random_fill()`: every border cell is forced solid; every interior cell
//    draws a uniform integer in [0, 100) from the caller's `CaveRng` and is
//    solid iff the draw is below `fill_percent`. Cells are visited column by
//    column (`x` outer, `y` inner) and border cells consume no draw, so the
//    draw sequence, and therefore the grid, is a pure function of the seed.
// 2. `smooth_pass()`: the 4-5 rule over the Moore neighborhood: more than 4
//    solid neighbors makes a cell solid, fewer than 4 makes it open, exactly 4
//    leaves it unchanged. Off-grid neighbors count as solid, which is what
//    keeps the map walled. Each pass reads a snapshot of the previous pass,
//    so update order never matters.
//
// Padding with the outer solid ring is done afterwards by
// `OccupancyGrid::padded()`.
//
// See also: `grid.rs` for the grid and neighbor counting, `bake.rs` which
// drives these stages from a `CaveConfig`.
//
// **Critical constraint: determinism.** All randomness comes from the
// `CaveRng` passed by the caller.

use cavern_prng::CaveRng;
use log::debug;

use crate::grid::{Cell, OccupancyGrid};

/// Neighbor count at which a cell keeps its current state.
const SURVIVAL_THRESHOLD: u32 = 4;

/// Build a `width × height` grid of random noise with a solid border.
pub fn random_fill(width: u32, height: u32, fill_percent: u32, rng: &mut CaveRng) -> OccupancyGrid {
    let mut grid = OccupancyGrid::filled(width, height, Cell::Solid);
    for x in 0..width {
        for y in 0..height {
            if grid.is_border(x, y) {
                continue;
            }
            if rng.range_u32(0, 100) >= fill_percent {
                grid.set(x as i32, y as i32, Cell::Open);
            }
        }
    }
    grid
}

/// The smoothing rule for a single cell.
fn next_state(current: Cell, solid_neighbors: u32) -> Cell {
    match solid_neighbors.cmp(&SURVIVAL_THRESHOLD) {
        std::cmp::Ordering::Greater => Cell::Solid,
        std::cmp::Ordering::Less => Cell::Open,
        std::cmp::Ordering::Equal => current,
    }
}

/// Apply one smoothing pass in place. Returns the number of cells changed.
pub fn smooth_pass(grid: &mut OccupancyGrid) -> usize {
    let snapshot = grid.clone();
    let mut changed = 0;
    for y in 0..snapshot.height() as i32 {
        for x in 0..snapshot.width() as i32 {
            let current = snapshot.get(x, y);
            let next = next_state(current, snapshot.solid_neighbor_count(x, y));
            if next != current {
                grid.set(x, y, next);
                changed += 1;
            }
        }
    }
    changed
}

/// Apply `passes` smoothing passes. Returns the total number of cell changes.
pub fn smooth(grid: &mut OccupancyGrid, passes: u32) -> usize {
    let mut total = 0;
    for pass in 0..passes {
        let changed = smooth_pass(grid);
        debug!("smoothing pass {}/{passes}: {changed} cells changed", pass + 1);
        total += changed;
    }
    total
}

/// Smooth until a pass changes nothing, running at most `max_passes` passes.
///
/// Returns `Some(n)` where `n` is the number of passes that changed at least
/// one cell (the grid is now a fixed point), or `None` if the grid was still
/// changing when the cap was reached.
pub fn smooth_until_stable(grid: &mut OccupancyGrid, max_passes: u32) -> Option<u32> {
    for pass in 0..max_passes {
        if smooth_pass(grid) == 0 {
            return Some(pass);
        }
    }
    None
}

/// Random fill followed by `smoothing_passes` smoothing passes.
pub fn generate_grid(
    width: u32,
    height: u32,
    fill_percent: u32,
    smoothing_passes: u32,
    rng: &mut CaveRng,
) -> OccupancyGrid {
    let mut grid = random_fill(width, height, fill_percent, rng);
    debug!(
        "random fill {width}x{height} at {fill_percent}%: {} solid cells",
        grid.solid_count()
    );
    smooth(&mut grid, smoothing_passes);
    grid
}
