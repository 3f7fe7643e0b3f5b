use std::fs::File;
use std::io::BufReader;

use serde::Deserialize;

use crate::grid::{Cell, Grid};

/// Declarative grid layout: dimensions, wall cells, and the two endpoints.
/// This is input configuration for a run, not session persistence.
#[derive(Debug, Deserialize)]
pub struct Scenario {
    pub rows: usize,
    pub cols: usize,
    #[serde(default)]
    pub walls: Vec<[usize; 2]>,
    pub start: [usize; 2],
    pub goal: [usize; 2],
}

impl Scenario {
    pub fn load_from_file(path: &str) -> anyhow::Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_yaml::from_reader(reader)?)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(raw)
    }

    /// Builds the grid through the normal edit surface, so the scenario is
    /// subject to the same bounds and marker rules as interactive edits.
    pub fn build_grid(&self) -> anyhow::Result<Grid> {
        let mut grid = Grid::new(self.rows, self.cols)?;
        for wall in &self.walls {
            grid.set_cell(wall[0], wall[1], Cell::Wall)?;
        }
        grid.set_cell(self.start[0], self.start[1], Cell::Start)?;
        grid.set_cell(self.goal[0], self.goal[1], Cell::Goal)?;
        Ok(grid)
    }
}
