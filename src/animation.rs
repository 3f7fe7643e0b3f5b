use std::time::{Duration, Instant};

use tokio::time::sleep;
use tracing::instrument;

use crate::algorithm::AstarSearch;
use crate::common::{SearchOutcome, StageEvent};
use crate::grid::{Cell, Grid};
use crate::stat::Stats;

/// Fixed inter-step delays for the staged replay. Reference cadence is
/// 50 ms per visited cell and 100 ms per path cell.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    pub visit_delay: Duration,
    pub path_delay: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Pacing {
            visit_delay: Duration::from_millis(50),
            path_delay: Duration::from_millis(100),
        }
    }
}

impl Pacing {
    pub fn from_millis(visit_ms: u64, path_ms: u64) -> Self {
        Pacing {
            visit_delay: Duration::from_millis(visit_ms),
            path_delay: Duration::from_millis(path_ms),
        }
    }

    /// Zero delays, for callers that only want the final grid state.
    pub fn immediate() -> Self {
        Pacing {
            visit_delay: Duration::ZERO,
            path_delay: Duration::ZERO,
        }
    }
}

/// Observer for staged grid snapshots. Called once per completed mutation
/// batch, never mid-expansion.
pub trait FrameSink {
    fn frame(&mut self, grid: &Grid);
}

pub struct NullSink;

impl FrameSink for NullSink {
    fn frame(&mut self, _grid: &Grid) {}
}

/// Snapshots the grid, runs the search, and replays its stage events onto
/// the live grid: each `Visited` mark lands after `visit_delay`, the
/// `Frontier` marks of the same expansion land immediately, and a found
/// path replays at `path_delay` per cell. Returns once animation completes.
///
/// Suspension happens only at the delay points, so every published frame
/// reflects a completed expansion step.
#[instrument(skip_all, fields(rows = grid.rows(), cols = grid.cols()), level = "debug")]
pub async fn run_simulation(
    grid: &mut Grid,
    pacing: Pacing,
    sink: &mut dyn FrameSink,
) -> anyhow::Result<(SearchOutcome, Stats)> {
    let run_start_time = Instant::now();

    // Markers left over from a previous run would pollute the replay.
    grid.clear_transient();

    let mut search = AstarSearch::new(grid.snapshot())?;
    while let Some(event) = search.next() {
        match event {
            StageEvent::Visited(position) => {
                sink.frame(grid);
                sleep(pacing.visit_delay).await;
                grid.apply_stage_update(position, Cell::Visited)?;
            }
            StageEvent::Frontier(position) => {
                grid.apply_stage_update(position, Cell::Frontier)?;
            }
        }
    }

    let mut stats = search.stats().clone();
    let outcome = search.into_outcome();

    if let SearchOutcome::Found(path) = &outcome {
        stats.path_length = path.len();
        for &position in path {
            sleep(pacing.path_delay).await;
            grid.apply_stage_update(position, Cell::Path)?;
            sink.frame(grid);
        }
    }
    sink.frame(grid);

    stats.time_us = run_start_time.elapsed().as_micros() as usize;
    stats.print();
    Ok((outcome, stats))
}
