use astar_viz::animation::{run_simulation, FrameSink, NullSink, Pacing};
use astar_viz::common::SearchOutcome;
use astar_viz::config::{Cli, Config};
use astar_viz::grid::{Cell, Grid};
use astar_viz::scenario::Scenario;

use std::io::Write;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info, Level};
use tracing_subscriber;

struct TermRenderer;

impl FrameSink for TermRenderer {
    fn frame(&mut self, grid: &Grid) {
        // Home the cursor and clear so the frame redraws in place.
        print!("\x1b[2J\x1b[H{}", grid.render());
        let _ = std::io::stdout().flush();
    }
}

fn build_grid(config: &Config) -> anyhow::Result<Grid> {
    if let Some(path) = &config.scenario_path {
        let scenario = Scenario::load_from_file(path)
            .with_context(|| format!("error with scenario file: {path}"))?;
        return scenario.build_grid();
    }
    if let Some(path) = &config.map_path {
        return Grid::from_file(path).with_context(|| format!("error with map file: {path}"));
    }

    let mut grid = Grid::new(config.rows, config.cols)?;
    let mut rng = StdRng::seed_from_u64(config.seed as u64);
    grid.scatter_walls(config.wall_density, &mut rng);

    let start = config.start_position().unwrap_or((0, 0));
    let goal = config
        .goal_position()
        .unwrap_or((grid.rows() - 1, grid.cols() - 1));
    grid.set_cell(start.0, start.1, Cell::Start)?;
    grid.set_cell(goal.0, goal.1, Cell::Goal)?;
    Ok(grid)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();
    let cli = Cli::parse();
    let config = Config::new(&cli);
    config.validate()?;

    let mut grid = build_grid(&config)?;
    let pacing = Pacing::from_millis(config.visit_delay_ms, config.path_delay_ms);

    let mut renderer = TermRenderer;
    let mut null_sink = NullSink;
    let sink: &mut dyn FrameSink = if config.no_render {
        &mut null_sink
    } else {
        &mut renderer
    };

    let (outcome, stats) = run_simulation(&mut grid, pacing, sink).await?;
    match &outcome {
        SearchOutcome::Found(path) => info!("path found, {} cells", path.len()),
        SearchOutcome::NotFound => error!("no path between start and goal"),
    }

    if let Some(output_path) = &config.output_path {
        stats
            .write_json(output_path)
            .with_context(|| format!("error writing stats to: {output_path}"))?;
    }

    Ok(())
}
