use std::fs::File;
use std::io::{BufRead, BufReader};

use anyhow::bail;
use rand::Rng;

use crate::common::Position;
use crate::error::GridError;

/// Exclusive cell states. `Start` and `Goal` are structural markers,
/// `Visited`/`Frontier`/`Path` are transient animation markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Wall,
    Start,
    Goal,
    Visited,
    Frontier,
    Path,
}

impl Cell {
    /// Protected states are never overwritten by a stage update.
    pub fn is_protected(self) -> bool {
        matches!(self, Cell::Wall | Cell::Start | Cell::Goal)
    }

    pub fn is_transient(self) -> bool {
        matches!(self, Cell::Visited | Cell::Frontier | Cell::Path)
    }

    pub fn glyph(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Wall => '@',
            Cell::Start => 'S',
            Cell::Goal => 'G',
            Cell::Visited => 'o',
            Cell::Frontier => '+',
            Cell::Path => '*',
        }
    }
}

/// Row-major `rows x cols` cell store. Holds at most one `Start` and one
/// `Goal`; placing either clears the previous holder.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Result<Self, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::InvalidDimensions { rows, cols });
        }
        Ok(Grid {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
        })
    }

    /// Wholesale replacement with all-`Empty` cells of the new dimensions.
    pub fn resize(&mut self, rows: usize, cols: usize) -> Result<(), GridError> {
        *self = Grid::new(rows, cols)?;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    fn index(&self, row: usize, col: usize) -> Result<usize, GridError> {
        if row >= self.rows || col >= self.cols {
            return Err(GridError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(row * self.cols + col)
    }

    pub fn cell(&self, row: usize, col: usize) -> Result<Cell, GridError> {
        Ok(self.cells[self.index(row, col)?])
    }

    /// Applies one edit command. `Start`/`Goal` displace the previous holder
    /// and overwrite whatever occupies the target cell; `Wall` toggles on a
    /// wall cell, is refused on `Start`/`Goal`, and overwrites anything else;
    /// `Empty` clears unconditionally.
    ///
    /// Accepts edit markers only; transient markers belong to
    /// [`apply_stage_update`](Grid::apply_stage_update).
    pub fn set_cell(&mut self, row: usize, col: usize, marker: Cell) -> Result<(), GridError> {
        debug_assert!(
            !marker.is_transient(),
            "transient marker {marker:?} passed to set_cell"
        );
        let idx = self.index(row, col)?;
        match marker {
            Cell::Start | Cell::Goal => {
                self.clear_marker(marker);
                self.cells[idx] = marker;
            }
            Cell::Wall => match self.cells[idx] {
                Cell::Wall => self.cells[idx] = Cell::Empty,
                Cell::Start | Cell::Goal => {}
                _ => self.cells[idx] = Cell::Wall,
            },
            Cell::Empty => self.cells[idx] = Cell::Empty,
            Cell::Visited | Cell::Frontier | Cell::Path => {}
        }
        Ok(())
    }

    fn clear_marker(&mut self, marker: Cell) {
        for cell in &mut self.cells {
            if *cell == marker {
                *cell = Cell::Empty;
            }
        }
    }

    /// Animation-driver write path: silently refuses to overwrite protected
    /// cells. A `Frontier` marker additionally lands only on `Empty` terrain,
    /// so a frontier event for an already-expanded neighbor never downgrades
    /// its `Visited` mark.
    pub fn apply_stage_update(&mut self, position: Position, marker: Cell) -> Result<(), GridError> {
        let idx = self.index(position.0, position.1)?;
        if self.cells[idx].is_protected() {
            return Ok(());
        }
        if marker == Cell::Frontier && self.cells[idx] != Cell::Empty {
            return Ok(());
        }
        self.cells[idx] = marker;
        Ok(())
    }

    /// Resets all `Visited`/`Frontier`/`Path` markers left by a previous run.
    pub fn clear_transient(&mut self) {
        for cell in &mut self.cells {
            if cell.is_transient() {
                *cell = Cell::Empty;
            }
        }
    }

    /// Owned copy handed to the search engine so it never observes edits
    /// made while a run is in flight.
    pub fn snapshot(&self) -> Grid {
        self.clone()
    }

    pub fn find_marker(&self, marker: Cell) -> Option<Position> {
        self.cells
            .iter()
            .position(|&cell| cell == marker)
            .map(|idx| (idx / self.cols, idx % self.cols))
    }

    pub fn open_neighbors(&self, position: Position) -> Vec<Position> {
        let directions = [(-1_isize, 0_isize), (1, 0), (0, -1), (0, 1)]; // Up, down, left, right
        let mut neighbors = Vec::new();

        for &(d_row, d_col) in &directions {
            let new_row = position.0 as isize + d_row;
            let new_col = position.1 as isize + d_col;
            if new_row >= 0
                && new_col >= 0
                && (new_row as usize) < self.rows
                && (new_col as usize) < self.cols
                && self.cells[new_row as usize * self.cols + new_col as usize] != Cell::Wall
            {
                neighbors.push((new_row as usize, new_col as usize));
            }
        }

        neighbors
    }

    /// Scatters walls over empty cells with the given per-cell probability.
    pub fn scatter_walls<R: Rng + ?Sized>(&mut self, density: f64, rng: &mut R) {
        for cell in &mut self.cells {
            if *cell == Cell::Empty && rng.gen_bool(density) {
                *cell = Cell::Wall;
            }
        }
    }

    /// Loads a layout from a text map: `.` empty, `@` wall, `S` start, `G` goal.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut rows = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            rows.push(line);
        }
        Self::from_lines(&rows)
    }

    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> anyhow::Result<Self> {
        let rows = lines.len();
        let cols = lines
            .first()
            .map(|line| line.as_ref().chars().count())
            .unwrap_or(0);
        let mut grid = Grid::new(rows, cols)?;

        for (row, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            if line.chars().count() != cols {
                bail!(
                    "map row {row} has {} columns, expected {cols}",
                    line.chars().count()
                );
            }
            for (col, ch) in line.chars().enumerate() {
                match ch {
                    '.' => {}
                    '@' => grid.set_cell(row, col, Cell::Wall)?,
                    'S' => grid.set_cell(row, col, Cell::Start)?,
                    'G' => grid.set_cell(row, col, Cell::Goal)?,
                    _ => bail!("unknown map character {ch:?} at ({row}, {col})"),
                }
            }
        }

        Ok(grid)
    }

    /// ASCII frame of the current grid state, one line per row.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity((self.cols + 1) * self.rows);
        for row in 0..self.rows {
            for col in 0..self.cols {
                out.push(self.cells[row * self.cols + col].glyph());
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(
            Grid::new(0, 5),
            Err(GridError::InvalidDimensions { rows: 0, cols: 5 })
        ));
        assert!(matches!(
            Grid::new(3, 0),
            Err(GridError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_out_of_bounds_edit_rejected() {
        let mut grid = Grid::new(3, 3).unwrap();
        assert!(matches!(
            grid.set_cell(3, 0, Cell::Wall),
            Err(GridError::OutOfBounds { row: 3, col: 0, .. })
        ));
        assert!(grid.cell(0, 3).is_err());
        // Rejected edits leave the grid untouched.
        for row in 0..3 {
            for col in 0..3 {
                assert_eq!(grid.cell(row, col).unwrap(), Cell::Empty);
            }
        }
    }

    #[test]
    fn test_single_start_invariant() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.set_cell(0, 0, Cell::Start).unwrap();
        grid.set_cell(2, 2, Cell::Start).unwrap();
        grid.set_cell(1, 1, Cell::Start).unwrap();

        let start_count = (0..3)
            .flat_map(|row| (0..3).map(move |col| (row, col)))
            .filter(|&(row, col)| grid.cell(row, col).unwrap() == Cell::Start)
            .count();
        assert_eq!(start_count, 1);
        assert_eq!(grid.find_marker(Cell::Start), Some((1, 1)));
        // Displaced cells revert to empty.
        assert_eq!(grid.cell(0, 0).unwrap(), Cell::Empty);
        assert_eq!(grid.cell(2, 2).unwrap(), Cell::Empty);
    }

    #[test]
    fn test_goal_displaces_previous_goal_only() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.set_cell(0, 0, Cell::Start).unwrap();
        grid.set_cell(0, 1, Cell::Goal).unwrap();
        grid.set_cell(1, 1, Cell::Goal).unwrap();

        assert_eq!(grid.find_marker(Cell::Goal), Some((1, 1)));
        assert_eq!(grid.cell(0, 1).unwrap(), Cell::Empty);
        // Start is untouched by goal placement.
        assert_eq!(grid.cell(0, 0).unwrap(), Cell::Start);
    }

    #[test]
    fn test_wall_toggle_is_idempotent() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.set_cell(0, 0, Cell::Wall).unwrap();
        assert_eq!(grid.cell(0, 0).unwrap(), Cell::Wall);
        grid.set_cell(0, 0, Cell::Wall).unwrap();
        assert_eq!(grid.cell(0, 0).unwrap(), Cell::Empty);
    }

    #[test]
    fn test_wall_refused_on_endpoints() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.set_cell(0, 0, Cell::Start).unwrap();
        grid.set_cell(1, 1, Cell::Goal).unwrap();
        grid.set_cell(0, 0, Cell::Wall).unwrap();
        grid.set_cell(1, 1, Cell::Wall).unwrap();
        assert_eq!(grid.cell(0, 0).unwrap(), Cell::Start);
        assert_eq!(grid.cell(1, 1).unwrap(), Cell::Goal);
    }

    #[test]
    fn test_empty_clears_any_state() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.set_cell(0, 0, Cell::Start).unwrap();
        grid.set_cell(0, 1, Cell::Wall).unwrap();
        grid.set_cell(0, 0, Cell::Empty).unwrap();
        grid.set_cell(0, 1, Cell::Empty).unwrap();
        assert_eq!(grid.cell(0, 0).unwrap(), Cell::Empty);
        assert_eq!(grid.cell(0, 1).unwrap(), Cell::Empty);
    }

    #[test]
    fn test_stage_update_respects_protected_cells() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.set_cell(0, 0, Cell::Start).unwrap();
        grid.set_cell(0, 1, Cell::Wall).unwrap();
        grid.set_cell(1, 1, Cell::Goal).unwrap();

        grid.apply_stage_update((0, 0), Cell::Visited).unwrap();
        grid.apply_stage_update((0, 1), Cell::Frontier).unwrap();
        grid.apply_stage_update((1, 1), Cell::Path).unwrap();
        grid.apply_stage_update((1, 0), Cell::Visited).unwrap();

        assert_eq!(grid.cell(0, 0).unwrap(), Cell::Start);
        assert_eq!(grid.cell(0, 1).unwrap(), Cell::Wall);
        assert_eq!(grid.cell(1, 1).unwrap(), Cell::Goal);
        assert_eq!(grid.cell(1, 0).unwrap(), Cell::Visited);
    }

    #[test]
    fn test_frontier_never_downgrades_visited() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.apply_stage_update((0, 0), Cell::Visited).unwrap();
        grid.apply_stage_update((0, 1), Cell::Path).unwrap();

        // Frontier lands on empty terrain only.
        grid.apply_stage_update((0, 0), Cell::Frontier).unwrap();
        grid.apply_stage_update((0, 1), Cell::Frontier).unwrap();
        grid.apply_stage_update((1, 0), Cell::Frontier).unwrap();

        assert_eq!(grid.cell(0, 0).unwrap(), Cell::Visited);
        assert_eq!(grid.cell(0, 1).unwrap(), Cell::Path);
        assert_eq!(grid.cell(1, 0).unwrap(), Cell::Frontier);

        // Visited and path still overwrite a frontier mark.
        grid.apply_stage_update((1, 0), Cell::Visited).unwrap();
        assert_eq!(grid.cell(1, 0).unwrap(), Cell::Visited);
        grid.apply_stage_update((1, 0), Cell::Path).unwrap();
        assert_eq!(grid.cell(1, 0).unwrap(), Cell::Path);
    }

    #[test]
    #[should_panic(expected = "transient marker")]
    fn test_set_cell_rejects_transient_markers() {
        let mut grid = Grid::new(2, 2).unwrap();
        let _ = grid.set_cell(0, 0, Cell::Visited);
    }

    #[test]
    fn test_clear_transient_keeps_structure() {
        let mut grid = Grid::new(2, 3).unwrap();
        grid.set_cell(0, 0, Cell::Start).unwrap();
        grid.set_cell(0, 2, Cell::Goal).unwrap();
        grid.set_cell(1, 0, Cell::Wall).unwrap();
        grid.apply_stage_update((0, 1), Cell::Visited).unwrap();
        grid.apply_stage_update((1, 1), Cell::Frontier).unwrap();
        grid.apply_stage_update((1, 2), Cell::Path).unwrap();

        grid.clear_transient();

        assert_eq!(grid.cell(0, 0).unwrap(), Cell::Start);
        assert_eq!(grid.cell(0, 2).unwrap(), Cell::Goal);
        assert_eq!(grid.cell(1, 0).unwrap(), Cell::Wall);
        assert_eq!(grid.cell(0, 1).unwrap(), Cell::Empty);
        assert_eq!(grid.cell(1, 1).unwrap(), Cell::Empty);
        assert_eq!(grid.cell(1, 2).unwrap(), Cell::Empty);
    }

    #[test]
    fn test_open_neighbors_skips_walls_and_bounds() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.set_cell(1, 0, Cell::Wall).unwrap();

        let neighbors = grid.open_neighbors((0, 0));
        assert_eq!(neighbors, vec![(0, 1)]);

        // Up, down, left, right order from the center.
        let neighbors = grid.open_neighbors((1, 1));
        assert_eq!(neighbors, vec![(0, 1), (2, 1), (1, 2)]);
    }

    #[test]
    fn test_from_lines_parses_layout() {
        let grid = Grid::from_lines(&["S.@", "..@", "..G"]).unwrap();
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.find_marker(Cell::Start), Some((0, 0)));
        assert_eq!(grid.find_marker(Cell::Goal), Some((2, 2)));
        assert_eq!(grid.cell(0, 2).unwrap(), Cell::Wall);
        assert_eq!(grid.cell(1, 2).unwrap(), Cell::Wall);
        assert_eq!(grid.cell(1, 1).unwrap(), Cell::Empty);
    }

    #[test]
    fn test_from_lines_rejects_bad_input() {
        assert!(Grid::from_lines(&["S.", "..."]).is_err());
        assert!(Grid::from_lines(&["Sx", ".G"]).is_err());
        assert!(Grid::from_lines::<&str>(&[]).is_err());
    }

    #[test]
    fn test_render_frame() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.set_cell(0, 0, Cell::Start).unwrap();
        grid.set_cell(1, 1, Cell::Goal).unwrap();
        grid.apply_stage_update((0, 1), Cell::Path).unwrap();
        assert_eq!(grid.render(), "S*\n.G\n");
    }

    #[test]
    fn test_scatter_walls_full_density() {
        let mut grid = Grid::new(4, 4).unwrap();
        grid.set_cell(0, 0, Cell::Start).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        grid.scatter_walls(1.0, &mut rng);

        // Every empty cell turned into a wall, the start survived.
        assert_eq!(grid.cell(0, 0).unwrap(), Cell::Start);
        assert_eq!(grid.cell(3, 3).unwrap(), Cell::Wall);
        assert_eq!(grid.find_marker(Cell::Empty), None);
    }

    #[test]
    fn test_resize_replaces_wholesale() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.set_cell(0, 0, Cell::Start).unwrap();
        grid.resize(4, 5).unwrap();
        assert_eq!(grid.rows(), 4);
        assert_eq!(grid.cols(), 5);
        assert_eq!(grid.find_marker(Cell::Start), None);

        // Failed resize keeps the old grid.
        grid.set_cell(0, 0, Cell::Start).unwrap();
        assert!(grid.resize(0, 5).is_err());
        assert_eq!(grid.rows(), 4);
        assert_eq!(grid.find_marker(Cell::Start), Some((0, 0)));
    }
}
