use anyhow::anyhow;
use clap::Parser;

use crate::common::Position;

#[derive(Parser, Debug)]
#[command(
    name = "astar-viz",
    about = "Staged A* pathfinding over a 2-D grid, animated in the terminal.",
    version = "1.0"
)]
pub struct Cli {
    #[arg(long, help = "Number of grid rows", default_value_t = 30)]
    pub rows: usize,

    #[arg(long, help = "Number of grid columns", default_value_t = 50)]
    pub cols: usize,

    #[arg(long, help = "Start cell as `row,col`", use_value_delimiter = true)]
    pub start: Vec<usize>,

    #[arg(long, help = "Goal cell as `row,col`", use_value_delimiter = true)]
    pub goal: Vec<usize>,

    #[arg(long, help = "Path to a YAML scenario file")]
    pub scenario_path: Option<String>,

    #[arg(long, help = "Path to a text map file")]
    pub map_path: Option<String>,

    #[arg(
        long,
        help = "Fraction of cells scattered as walls",
        default_value_t = 0.2
    )]
    pub wall_density: f64,

    #[arg(
        long,
        help = "Seed for the random number generator",
        default_value_t = 0
    )]
    pub seed: usize,

    #[arg(
        long,
        help = "Delay per visited cell in milliseconds",
        default_value_t = 50
    )]
    pub visit_delay_ms: u64,

    #[arg(
        long,
        help = "Delay per path cell in milliseconds",
        default_value_t = 100
    )]
    pub path_delay_ms: u64,

    #[arg(long, help = "Path to a JSON stats output file")]
    pub output_path: Option<String>,

    #[arg(long, help = "Disable terminal frame rendering", default_value_t = false)]
    pub no_render: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub rows: usize,
    pub cols: usize,
    pub start: Vec<usize>,
    pub goal: Vec<usize>,
    pub scenario_path: Option<String>,
    pub map_path: Option<String>,
    pub wall_density: f64,
    pub seed: usize,
    pub visit_delay_ms: u64,
    pub path_delay_ms: u64,
    pub output_path: Option<String>,
    pub no_render: bool,
}

impl Config {
    pub fn new(cli: &Cli) -> Self {
        Self {
            rows: cli.rows,
            cols: cli.cols,
            start: cli.start.clone(),
            goal: cli.goal.clone(),
            scenario_path: cli.scenario_path.clone(),
            map_path: cli.map_path.clone(),
            wall_density: cli.wall_density,
            seed: cli.seed,
            visit_delay_ms: cli.visit_delay_ms,
            path_delay_ms: cli.path_delay_ms,
            output_path: cli.output_path.clone(),
            no_render: cli.no_render,
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.scenario_path.is_some() && self.map_path.is_some() {
            return Err(anyhow!(
                "--scenario-path and --map-path are mutually exclusive"
            ));
        }
        if !(0.0..1.0).contains(&self.wall_density) {
            return Err(anyhow!(
                "Wall density must be in [0.0, 1.0), got {}",
                self.wall_density
            ));
        }
        for (flag, coords) in [("start", &self.start), ("goal", &self.goal)] {
            if !coords.is_empty() && coords.len() != 2 {
                return Err(anyhow!(
                    "--{} expects `row,col`, got {} values",
                    flag,
                    coords.len()
                ));
            }
        }
        Ok(())
    }

    pub fn start_position(&self) -> Option<Position> {
        (self.start.len() == 2).then(|| (self.start[0], self.start[1]))
    }

    pub fn goal_position(&self) -> Option<Position> {
        (self.goal.len() == 2).then(|| (self.goal[0], self.goal[1]))
    }
}
