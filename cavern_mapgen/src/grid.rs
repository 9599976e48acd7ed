// Dense 2D occupancy grid for cave maps.
//
// The grid is stored as a flat `Vec<Cell>` indexed by `x + y * width`,
// giving O(1) read/write access. Out-of-bounds reads return `Solid`, which is
// exactly the rule the smoothing automaton needs ("anything beyond the map is
// wall"); out-of-bounds writes are no-ops.
//
// `PaddedGrid` wraps a grid that has been surrounded by a forced-solid ring.
// It is built once per bake by `OccupancyGrid::padded()` and is read-only
// afterward: it derefs to `OccupancyGrid` but exposes no mutation.
//
// The ASCII form (`#` solid, `.` open) is used for test fixtures and for the
// CLI's `--ascii` output. Rows are written top-down, so the first line is the
// highest `y`, matching the mesher's "TopLeft is (x, y+1)" orientation.
//
// See also: `automaton.rs` for the fill/smooth passes that mutate the grid,
// `squares.rs` for the control-node lattice built on top of it.

use std::fmt;
use std::ops::Deref;

/// The state of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    Open,
    Solid,
}

impl Cell {
    pub fn is_solid(self) -> bool {
        self == Cell::Solid
    }

    /// ASCII glyph used by `Display` and `from_ascii`.
    pub fn glyph(self) -> char {
        match self {
            Cell::Open => '.',
            Cell::Solid => '#',
        }
    }
}

/// Moore neighborhood offsets (the 8 cells around a cell).
const MOORE_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Dense 2D binary grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupancyGrid {
    /// Flat storage: index = x + y * width.
    cells: Vec<Cell>,
    width: u32,
    height: u32,
}

impl OccupancyGrid {
    /// Create a grid with every cell set to `cell`.
    pub fn filled(width: u32, height: u32, cell: Cell) -> Self {
        Self {
            cells: vec![cell; width as usize * height as usize],
            width,
            height,
        }
    }

    /// Create a grid by evaluating `f(x, y)` for every cell.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Cell) -> Self {
        let mut grid = Self::filled(width, height, Cell::Open);
        for y in 0..height {
            for x in 0..width {
                grid.cells[x as usize + y as usize * width as usize] = f(x, y);
            }
        }
        grid
    }

    /// Parse a grid from rows of `#` (solid) and `.` (open).
    ///
    /// The first row is the top of the map (highest `y`). Returns `None` if
    /// the rows are ragged or contain any other character.
    pub fn from_ascii(rows: &[&str]) -> Option<Self> {
        let height = rows.len() as u32;
        let width = rows.first().map_or(0, |r| r.chars().count()) as u32;
        let mut grid = Self::filled(width, height, Cell::Open);
        for (row_idx, row) in rows.iter().enumerate() {
            if row.chars().count() as u32 != width {
                return None;
            }
            let y = height as i32 - 1 - row_idx as i32;
            for (x, ch) in row.chars().enumerate() {
                let cell = match ch {
                    '#' => Cell::Solid,
                    '.' => Cell::Open,
                    _ => return None,
                };
                grid.set(x as i32, y, cell);
            }
        }
        Some(grid)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Check whether a coordinate is within bounds.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(x, y) {
            Some(x as usize + y as usize * self.width as usize)
        } else {
            None
        }
    }

    /// Read a cell. Returns `Solid` for out-of-bounds coordinates.
    pub fn get(&self, x: i32, y: i32) -> Cell {
        self.index(x, y)
            .map(|i| self.cells[i])
            .unwrap_or(Cell::Solid)
    }

    /// Write a cell. No-op for out-of-bounds coordinates.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    /// True if the cell lies on the outermost ring of the grid.
    pub fn is_border(&self, x: u32, y: u32) -> bool {
        x == 0 || y == 0 || x + 1 == self.width || y + 1 == self.height
    }

    /// Count solid cells in the 8-neighborhood of `(x, y)`.
    ///
    /// Neighbors outside the grid count as solid (via `get()`), so a corner
    /// cell always sees at least 5 solid neighbors.
    pub fn solid_neighbor_count(&self, x: i32, y: i32) -> u32 {
        MOORE_OFFSETS
            .iter()
            .filter(|&&(dx, dy)| self.get(x + dx, y + dy).is_solid())
            .count() as u32
    }

    /// Total number of solid cells.
    pub fn solid_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_solid()).count()
    }

    /// Copy this grid into the interior of a new grid surrounded by a
    /// `border`-thick ring of solid cells.
    ///
    /// Panics if the padded size overflows `u32`; `CaveConfig::validate()`
    /// bounds bake dimensions well below that.
    pub fn padded(&self, border: u32) -> PaddedGrid {
        let ring = border.saturating_mul(2);
        let (Some(width), Some(height)) =
            (self.width.checked_add(ring), self.height.checked_add(ring))
        else {
            panic!(
                "padding a {}x{} grid by {border} overflows u32",
                self.width, self.height
            );
        };
        let b = border as i32;
        let grid = Self::from_fn(width, height, |x, y| {
            // Outside the source this reads Solid, which is the ring.
            self.get(x as i32 - b, y as i32 - b)
        });
        PaddedGrid { grid, border }
    }
}

impl fmt::Display for OccupancyGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.height as i32).rev() {
            for x in 0..self.width as i32 {
                write!(f, "{}", self.get(x, y).glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A grid surrounded by a forced-solid ring. Read-only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaddedGrid {
    grid: OccupancyGrid,
    border: u32,
}

impl PaddedGrid {
    /// Width of the solid ring in cells.
    pub fn border(&self) -> u32 {
        self.border
    }

    pub fn as_grid(&self) -> &OccupancyGrid {
        &self.grid
    }
}

impl Deref for PaddedGrid {
    type Target = OccupancyGrid;

    fn deref(&self) -> &OccupancyGrid {
        &self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_grid_has_uniform_cells() {
        let grid = OccupancyGrid::filled(4, 3, Cell::Open);
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.solid_count(), 0);
    }

    #[test]
    fn set_and_get() {
        let mut grid = OccupancyGrid::filled(5, 5, Cell::Open);
        grid.set(2, 3, Cell::Solid);
        assert_eq!(grid.get(2, 3), Cell::Solid);
        assert_eq!(grid.get(3, 2), Cell::Open);
    }

    #[test]
    fn out_of_bounds_read_returns_solid() {
        let grid = OccupancyGrid::filled(4, 4, Cell::Open);
        assert_eq!(grid.get(-1, 0), Cell::Solid);
        assert_eq!(grid.get(0, -1), Cell::Solid);
        assert_eq!(grid.get(4, 0), Cell::Solid);
        assert_eq!(grid.get(0, 4), Cell::Solid);
    }

    #[test]
    fn out_of_bounds_write_is_noop() {
        let mut grid = OccupancyGrid::filled(4, 4, Cell::Open);
        grid.set(-1, 0, Cell::Solid);
        grid.set(100, 0, Cell::Solid);
        assert_eq!(grid.solid_count(), 0);
    }

    #[test]
    fn indexing_is_row_major_in_y() {
        let mut grid = OccupancyGrid::filled(6, 4, Cell::Open);
        grid.set(5, 1, Cell::Solid);
        assert_eq!(grid.cells[5 + 6], Cell::Solid);
    }

    #[test]
    fn neighbor_count_treats_outside_as_solid() {
        let grid = OccupancyGrid::filled(5, 5, Cell::Open);
        // Corner: 5 of 8 neighbors are off-grid.
        assert_eq!(grid.solid_neighbor_count(0, 0), 5);
        // Edge: 3 of 8 neighbors are off-grid.
        assert_eq!(grid.solid_neighbor_count(2, 0), 3);
        // Interior of an all-open grid.
        assert_eq!(grid.solid_neighbor_count(2, 2), 0);
    }

    #[test]
    fn neighbor_count_excludes_the_cell_itself() {
        let grid = OccupancyGrid::filled(3, 3, Cell::Solid);
        assert_eq!(grid.solid_neighbor_count(1, 1), 8);
    }

    #[test]
    fn padding_adds_a_solid_ring_and_copies_interior() {
        let grid = OccupancyGrid::from_ascii(&["...", ".#.", "..."]).unwrap();
        let padded = grid.padded(1);
        assert_eq!(padded.width(), 5);
        assert_eq!(padded.height(), 5);
        assert_eq!(padded.border(), 1);
        for y in 0..5 {
            for x in 0..5 {
                let expected = if padded.is_border(x, y) {
                    Cell::Solid
                } else {
                    grid.get(x as i32 - 1, y as i32 - 1)
                };
                assert_eq!(padded.get(x as i32, y as i32), expected, "({x}, {y})");
            }
        }
    }

    #[test]
    #[should_panic(expected = "overflows u32")]
    fn padding_past_u32_is_an_invariant_violation() {
        OccupancyGrid::filled(u32::MAX - 1, 0, Cell::Open).padded(1);
    }

    #[test]
    fn from_ascii_puts_first_row_on_top() {
        let grid = OccupancyGrid::from_ascii(&["#.", ".."]).unwrap();
        assert_eq!(grid.get(0, 1), Cell::Solid);
        assert_eq!(grid.get(0, 0), Cell::Open);
    }

    #[test]
    fn from_ascii_rejects_ragged_and_unknown_input() {
        assert!(OccupancyGrid::from_ascii(&["##", "#"]).is_none());
        assert!(OccupancyGrid::from_ascii(&["#x"]).is_none());
    }

    #[test]
    fn display_roundtrips_through_from_ascii() {
        let rows = ["####", "#..#", "#.##", "####"];
        let grid = OccupancyGrid::from_ascii(&rows).unwrap();
        let rendered = grid.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines, rows);
    }
}
